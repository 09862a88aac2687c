use serde::Deserialize;

/// The response shapes the historical-rate provider is known to return for a
/// converted amount. Variants are tried in declaration order; extra fields are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConversionResponse {
    ConversionResult { conversion_result: f64 },
    Result { result: f64 },
    ConvertedAmount { converted_amount: f64 },
}

impl ConversionResponse {
    pub fn amount(&self) -> f64 {
        match self {
            ConversionResponse::ConversionResult { conversion_result } => *conversion_result,
            ConversionResponse::Result { result } => *result,
            ConversionResponse::ConvertedAmount { converted_amount } => *converted_amount,
        }
    }
}
