use crate::RateProvider;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

/// Approximate USD to TTD multiplier used when the provider cannot answer.
pub const FALLBACK_USD_TTD_RATE: Decimal = dec!(6.8);

/// The fixed-ratio estimate substituted for a failed lookup.
///
/// Saturates at `Decimal::MAX` / `Decimal::MIN` for amounts too large to scale.
pub fn fallback_conversion(amount: Decimal) -> Decimal {
    amount
        .checked_mul(FALLBACK_USD_TTD_RATE)
        .unwrap_or(if amount.is_sign_negative() {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
}

/// Converts amounts through a `RateProvider`, never failing.
///
/// Any provider error (network, timeout, non-2xx status, unparseable or
/// unrecognized body) is logged and replaced by `fallback_conversion`.
#[derive(Clone)]
pub struct CurrencyConverter {
    provider: Arc<dyn RateProvider>,
}

impl CurrencyConverter {
    pub fn new(provider: Arc<dyn RateProvider>) -> Self {
        Self { provider }
    }

    pub async fn convert(
        &self,
        amount: Decimal,
        from: &str,
        to: &str,
        year: i32,
        month: u32,
        day: u32,
    ) -> Decimal {
        match self
            .provider
            .historical_conversion(amount, from, to, year, month, day)
            .await
        {
            Ok(converted) => converted,
            Err(e) => {
                let fallback = fallback_conversion(amount);
                tracing::warn!(
                    error = %e,
                    %amount,
                    %from,
                    %to,
                    year,
                    %fallback,
                    "Currency lookup failed, using fallback conversion."
                );
                fallback
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::{ExchangeRateClient, RateProvider};
    use async_trait::async_trait;
    use configuration::CurrencyApiSettings;
    use std::sync::Mutex;

    struct StubProvider {
        answer: fn(Decimal) -> Result<Decimal, ApiError>,
        calls: Mutex<Vec<(String, String, i32, u32, u32)>>,
    }

    #[async_trait]
    impl RateProvider for StubProvider {
        async fn historical_conversion(
            &self,
            amount: Decimal,
            from: &str,
            to: &str,
            year: i32,
            month: u32,
            day: u32,
        ) -> Result<Decimal, ApiError> {
            self.calls
                .lock()
                .unwrap()
                .push((from.to_string(), to.to_string(), year, month, day));
            (self.answer)(amount)
        }
    }

    #[tokio::test]
    async fn passes_through_provider_result() {
        let stub = Arc::new(StubProvider {
            answer: |amount| Ok(amount * dec!(6.75)),
            calls: Mutex::new(Vec::new()),
        });
        let converter = CurrencyConverter::new(stub.clone());

        let converted = converter.convert(dec!(100), "USD", "TTD", 2024, 1, 1).await;
        assert_eq!(converted, dec!(675));
        assert_eq!(
            stub.calls.lock().unwrap().as_slice(),
            &[("USD".to_string(), "TTD".to_string(), 2024, 1, 1)]
        );
    }

    #[tokio::test]
    async fn falls_back_on_provider_error() {
        for answer in [
            (|_| Err(ApiError::Status(503))) as fn(Decimal) -> Result<Decimal, ApiError>,
            |_| Err(ApiError::UnrecognizedShape("{}".to_string())),
            |_| Err(ApiError::Deserialization("eof".to_string())),
        ] {
            let converter = CurrencyConverter::new(Arc::new(StubProvider {
                answer,
                calls: Mutex::new(Vec::new()),
            }));
            let converted = converter.convert(dec!(125000), "USD", "TTD", 2024, 1, 1).await;
            assert_eq!(converted, dec!(850000));
        }
    }

    #[test]
    fn fallback_saturates_instead_of_overflowing() {
        let huge = Decimal::from_i128_with_scale(20_000_000_000_000_000_000_000_000_000, 0);
        assert_eq!(fallback_conversion(huge), Decimal::MAX);
        assert_eq!(fallback_conversion(-huge), Decimal::MIN);
        assert_eq!(fallback_conversion(dec!(10)), dec!(68));
    }

    #[tokio::test]
    async fn huge_amounts_still_convert_when_provider_fails() {
        let converter = CurrencyConverter::new(Arc::new(StubProvider {
            answer: |_| Err(ApiError::Status(500)),
            calls: Mutex::new(Vec::new()),
        }));
        let huge = Decimal::from_i128_with_scale(20_000_000_000_000_000_000_000_000_000, 0);
        let converted = converter.convert(huge, "USD", "TTD", 2024, 1, 1).await;
        assert_eq!(converted, Decimal::MAX);
    }

    #[tokio::test]
    async fn falls_back_when_provider_is_unreachable() {
        let client = ExchangeRateClient::new(&CurrencyApiSettings {
            base_url: "http://127.0.0.1:1".to_string(),
            api_key: String::new(),
            timeout_secs: 2,
        })
        .unwrap();
        let converter = CurrencyConverter::new(Arc::new(client));

        let converted = converter.convert(dec!(247106.75), "USD", "TTD", 2000, 1, 1).await;
        assert_eq!(converted, fallback_conversion(dec!(247106.75)));
        assert_eq!(converted, dec!(1680325.900));
    }
}
