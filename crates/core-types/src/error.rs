use thiserror::Error;

/// Reasons an inbound request body or path parameter is rejected.
///
/// The `Display` text of each variant is sent to the client verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Missing required fields: year, projectName, currency")]
    MissingCurrencyFields,

    #[error("Invalid project ID")]
    InvalidId,

    #[error("Project ID must be a positive number")]
    NonPositiveId,

    #[error("Invalid year: must be a number between 1900 and 2100")]
    InvalidYear,

    #[error("Invalid projectName: must be a non-empty string")]
    InvalidName,

    #[error("Invalid currency: must be a non-empty string")]
    InvalidCurrency,

    #[error("Invalid request body: {0}")]
    MalformedBody(String),
}
