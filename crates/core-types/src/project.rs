use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A persisted project budget record, keyed by the caller-assigned `project_id`.
///
/// Field order mirrors the column order of the `project` table and is the order
/// in which fields appear in JSON responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub project_id: i64,
    pub project_name: String,
    pub year: i32,
    /// 3-letter code of the currency the local budget was drawn up in.
    pub currency: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub initial_budget_local: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub budget_usd: Decimal,
    pub initial_schedule_estimate_months: i32,
    pub adjusted_schedule_estimate_months: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub contingency_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub escalation_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_budget_usd: Decimal,
}

/// Every column of a project except its id. This is what a full update replaces.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectFields {
    pub project_name: String,
    pub year: i32,
    pub currency: String,
    pub initial_budget_local: Decimal,
    pub budget_usd: Decimal,
    pub initial_schedule_estimate_months: i32,
    pub adjusted_schedule_estimate_months: i32,
    pub contingency_rate: Decimal,
    pub escalation_rate: Decimal,
    pub final_budget_usd: Decimal,
}

impl ProjectFields {
    pub fn into_project(self, project_id: i64) -> Project {
        Project {
            project_id,
            project_name: self.project_name,
            year: self.year,
            currency: self.currency,
            initial_budget_local: self.initial_budget_local,
            budget_usd: self.budget_usd,
            initial_schedule_estimate_months: self.initial_schedule_estimate_months,
            adjusted_schedule_estimate_months: self.adjusted_schedule_estimate_months,
            contingency_rate: self.contingency_rate,
            escalation_rate: self.escalation_rate,
            final_budget_usd: self.final_budget_usd,
        }
    }
}

/// An inbound create/update body before validation.
///
/// Every field is optional so that an absent or `null` field can be reported by
/// name instead of failing deserialization as a whole.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPayload {
    #[serde(default)]
    pub project_id: Option<i64>,
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub initial_budget_local: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub budget_usd: Option<Decimal>,
    #[serde(default)]
    pub initial_schedule_estimate_months: Option<i32>,
    #[serde(default)]
    pub adjusted_schedule_estimate_months: Option<i32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub contingency_rate: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub escalation_rate: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub final_budget_usd: Option<Decimal>,
}

/// The validated body of a currency-enriched lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyRequest {
    pub year: i32,
    pub project_name: String,
    pub currency: String,
}

impl CurrencyRequest {
    /// Whether the requested currency is Trinidad and Tobago dollars, compared case-insensitively.
    pub fn wants_ttd(&self) -> bool {
        self.currency.eq_ignore_ascii_case("TTD")
    }
}

/// A read-time projection of a project with its final budget converted to TTD.
/// Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedProject {
    #[serde(flatten)]
    pub project: Project,
    /// `None` serializes as `null` when no conversion was requested or it could not be produced.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub final_budget_ttd: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn sample() -> Project {
        Project {
            project_id: 10001,
            project_name: "Test Project".to_string(),
            year: 2024,
            currency: "EUR".to_string(),
            initial_budget_local: dec!(316974.5),
            budget_usd: dec!(233724.23),
            initial_schedule_estimate_months: 13,
            adjusted_schedule_estimate_months: 12,
            contingency_rate: dec!(2.19),
            escalation_rate: dec!(3.46),
            final_budget_usd: dec!(247106.75),
        }
    }

    #[test]
    fn project_serializes_with_camel_case_numbers() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["projectId"], json!(10001));
        assert_eq!(value["projectName"], json!("Test Project"));
        assert_eq!(value["contingencyRate"].as_f64(), Some(2.19));
        assert_eq!(value["finalBudgetUsd"].as_f64(), Some(247106.75));
    }

    #[test]
    fn enriched_project_flattens_and_emits_null_ttd() {
        let enriched = EnrichedProject { project: sample(), final_budget_ttd: None };
        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["projectId"], json!(10001));
        assert!(value.get("finalBudgetTtd").is_some());
        assert!(value["finalBudgetTtd"].is_null());

        let enriched = EnrichedProject { project: sample(), final_budget_ttd: Some(dec!(680)) };
        let value = serde_json::to_value(&enriched).unwrap();
        assert_eq!(value["finalBudgetTtd"].as_f64(), Some(680.0));
    }

    #[test]
    fn payload_accepts_integer_amounts_and_nulls() {
        let payload: ProjectPayload = serde_json::from_value(json!({
            "projectId": 1,
            "initialBudgetLocal": 100000,
            "budgetUsd": null,
        }))
        .unwrap();
        assert_eq!(payload.project_id, Some(1));
        assert_eq!(payload.initial_budget_local, Some(dec!(100000)));
        assert_eq!(payload.budget_usd, None);
        assert_eq!(payload.project_name, None);
    }

    #[test]
    fn ttd_match_is_case_insensitive() {
        let request = CurrencyRequest {
            year: 2000,
            project_name: "X".to_string(),
            currency: "ttd".to_string(),
        };
        assert!(request.wants_ttd());
    }
}
