use crate::error::ApiError;
use async_trait::async_trait;
use configuration::CurrencyApiSettings;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::time::Duration;

pub mod converter;
pub mod error;
pub mod responses;

// --- Public API ---
pub use converter::{fallback_conversion, CurrencyConverter, FALLBACK_USD_TTD_RATE};
pub use responses::ConversionResponse;

/// The abstract interface for a historical exchange-rate lookup.
/// The converter talks to this trait so the live provider can be swapped for a stub.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Converts `amount` from `from` to `to` at the rate published for the given calendar date.
    async fn historical_conversion(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
        year: i32,
        month: u32,
        day: u32,
    ) -> Result<Decimal, ApiError>;
}

/// A concrete `RateProvider` for the exchangerate-api.com v6 history endpoint.
#[derive(Clone)]
pub struct ExchangeRateClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl ExchangeRateClient {
    pub fn new(settings: &CurrencyApiSettings) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
        })
    }

    fn history_url(&self, amount: Decimal, from: &str, year: i32, month: u32, day: u32) -> String {
        format!(
            "{}/v6/{}/history/{}/{}/{}/{}/{}",
            self.base_url, self.api_key, from, year, month, day, amount
        )
    }
}

/// Extracts the converted amount from a raw provider response body.
pub fn parse_conversion_body(body: &str) -> Result<Decimal, ApiError> {
    let value: serde_json::Value =
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))?;

    let response: ConversionResponse = serde_json::from_value(value)
        .map_err(|e| ApiError::UnrecognizedShape(e.to_string()))?;

    let amount = response.amount();
    Decimal::from_f64(amount)
        .ok_or_else(|| ApiError::InvalidData(format!("converted amount {amount} is not representable")))
}

#[async_trait]
impl RateProvider for ExchangeRateClient {
    async fn historical_conversion(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
        year: i32,
        month: u32,
        day: u32,
    ) -> Result<Decimal, ApiError> {
        let url = self.history_url(amount, from, year, month, day);
        tracing::debug!(%from, %to, year, month, day, "Requesting historical conversion.");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        parse_conversion_body(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn settings(base_url: &str) -> CurrencyApiSettings {
        CurrencyApiSettings {
            base_url: base_url.to_string(),
            api_key: "key123".to_string(),
            timeout_secs: 2,
        }
    }

    #[test]
    fn builds_history_url() {
        let client = ExchangeRateClient::new(&settings("https://v6.exchangerate-api.com/")).unwrap();
        assert_eq!(
            client.history_url(dec!(125000), "USD", 2024, 1, 1),
            "https://v6.exchangerate-api.com/v6/key123/history/USD/2024/1/1/125000"
        );
    }

    #[test]
    fn recognizes_each_response_shape() {
        assert_eq!(parse_conversion_body(r#"{"conversion_result": 850.5}"#).unwrap(), dec!(850.5));
        assert_eq!(parse_conversion_body(r#"{"result": 12}"#).unwrap(), dec!(12));
        assert_eq!(
            parse_conversion_body(r#"{"converted_amount": 68.25, "base_code": "USD"}"#).unwrap(),
            dec!(68.25)
        );
    }

    #[test]
    fn rejects_unrecognized_or_invalid_bodies() {
        assert!(matches!(
            parse_conversion_body(r#"{"result": "success", "conversion_amounts": {"TTD": 6.7}}"#),
            Err(ApiError::UnrecognizedShape(_))
        ));
        assert!(matches!(
            parse_conversion_body("<html>gateway timeout</html>"),
            Err(ApiError::Deserialization(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_provider_is_a_request_error() {
        let client = ExchangeRateClient::new(&settings("http://127.0.0.1:1")).unwrap();
        let result = client
            .historical_conversion(dec!(10), "USD", "TTD", 2000, 1, 1)
            .await;
        assert!(matches!(result, Err(ApiError::Request(_))));
    }
}
