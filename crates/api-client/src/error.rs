use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to send the HTTP request: {0}")]
    Request(#[from] reqwest::Error),

    #[error("The API request returned HTTP status {0}")]
    Status(u16),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("The API response matched no recognized shape: {0}")]
    UnrecognizedShape(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),
}
