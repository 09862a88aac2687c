//! Pure, synchronous checks on request payloads and path parameters.
//!
//! Each validator returns the typed value it proved well-formed, so handlers
//! never touch an unvalidated field.

use crate::error::ValidationError;
use crate::project::{CurrencyRequest, Project, ProjectFields, ProjectPayload};
use serde_json::Value;

const MIN_YEAR: f64 = 1900.0;
const MAX_YEAR: f64 = 2100.0;

/// Deserializes a raw JSON body into a `ProjectPayload`.
///
/// Absent and `null` fields are fine at this stage; a field of the wrong JSON
/// type (e.g. a string where a number belongs) is not.
pub fn parse_project_payload(body: Value) -> Result<ProjectPayload, ValidationError> {
    if !body.is_object() {
        return Err(ValidationError::MalformedBody(
            "expected a JSON object".to_string(),
        ));
    }
    serde_json::from_value(body).map_err(|e| ValidationError::MalformedBody(e.to_string()))
}

/// Checks the ten mandatory non-id fields in a fixed order and reports the first absent one.
/// Numeric zero counts as present.
pub fn validate_project_payload(payload: &ProjectPayload) -> Result<ProjectFields, ValidationError> {
    fn require<T: Clone>(field: &Option<T>, name: &'static str) -> Result<T, ValidationError> {
        field.clone().ok_or(ValidationError::MissingField(name))
    }

    Ok(ProjectFields {
        project_name: require(&payload.project_name, "projectName")?,
        year: require(&payload.year, "year")?,
        currency: require(&payload.currency, "currency")?,
        initial_budget_local: require(&payload.initial_budget_local, "initialBudgetLocal")?,
        budget_usd: require(&payload.budget_usd, "budgetUsd")?,
        initial_schedule_estimate_months: require(
            &payload.initial_schedule_estimate_months,
            "initialScheduleEstimateMonths",
        )?,
        adjusted_schedule_estimate_months: require(
            &payload.adjusted_schedule_estimate_months,
            "adjustedScheduleEstimateMonths",
        )?,
        contingency_rate: require(&payload.contingency_rate, "contingencyRate")?,
        escalation_rate: require(&payload.escalation_rate, "escalationRate")?,
        final_budget_usd: require(&payload.final_budget_usd, "finalBudgetUsd")?,
    })
}

/// Validates a create body: the ten mandatory fields first, then the caller-assigned id.
pub fn validate_new_project(payload: &ProjectPayload) -> Result<Project, ValidationError> {
    let fields = validate_project_payload(payload)?;
    let project_id = payload
        .project_id
        .ok_or(ValidationError::MissingField("projectId"))?;
    Ok(fields.into_project(project_id))
}

/// Parses a path segment as a strictly positive project id.
///
/// Like `parseInt`, only the leading integer counts: leading whitespace and an
/// optional sign are accepted and anything after the first non-digit is
/// ignored, so `"12abc"` and `"12.7"` both address project 12.
pub fn validate_project_id(raw: &str) -> Result<i64, ValidationError> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => ("-", &trimmed[1..]),
        Some(b'+') => ("", &trimmed[1..]),
        _ => ("", trimmed),
    };
    let digits_end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return Err(ValidationError::InvalidId);
    }

    let project_id: i64 = format!("{sign}{}", &rest[..digits_end])
        .parse()
        .map_err(|_| ValidationError::InvalidId)?;

    if project_id <= 0 {
        return Err(ValidationError::NonPositiveId);
    }

    Ok(project_id)
}

/// Validates the `{year, projectName, currency}` body of an enriched lookup.
pub fn validate_currency_request(body: &Value) -> Result<CurrencyRequest, ValidationError> {
    let year = body.get("year");
    let project_name = body.get("projectName");
    let currency = body.get("currency");

    if is_falsy(year) || is_falsy(project_name) || is_falsy(currency) {
        return Err(ValidationError::MissingCurrencyFields);
    }

    let year = year
        .and_then(Value::as_f64)
        .filter(|y| y.fract() == 0.0 && (MIN_YEAR..=MAX_YEAR).contains(y))
        .ok_or(ValidationError::InvalidYear)? as i32;

    let project_name = non_blank_string(project_name).ok_or(ValidationError::InvalidName)?;
    let currency = non_blank_string(currency).ok_or(ValidationError::InvalidCurrency)?;

    Ok(CurrencyRequest {
        year,
        project_name,
        currency,
    })
}

/// Absent, `null`, `false`, `0` and `""` all count as "not provided".
fn is_falsy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64().is_none_or(|f| f == 0.0),
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => false,
    }
}

fn non_blank_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}
