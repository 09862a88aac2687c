//! Read-time currency enrichment of matched projects.

use api_client::CurrencyConverter;
use core_types::{EnrichedProject, Project};
use futures_util::FutureExt;
use rust_decimal::Decimal;
use std::panic::AssertUnwindSafe;

/// Attaches `final_budget_ttd` to each project, preserving input order.
///
/// Only a TTD target (case-insensitive) triggers a lookup; any other target
/// leaves the field `None`. Conversion uses the January 1 rate of the
/// project's own year. Projects are converted one at a time.
pub async fn enrich(
    converter: &CurrencyConverter,
    projects: Vec<Project>,
    target_currency: &str,
) -> Vec<EnrichedProject> {
    let wants_ttd = target_currency.eq_ignore_ascii_case("TTD");
    let mut enriched = Vec::with_capacity(projects.len());

    for project in projects {
        let final_budget_ttd = if wants_ttd {
            convert_final_budget(converter, &project).await
        } else {
            None
        };
        enriched.push(EnrichedProject {
            project,
            final_budget_ttd,
        });
    }

    enriched
}

/// `CurrencyConverter::convert` cannot fail, but a panic below it must only
/// cost this project its converted value.
async fn convert_final_budget(converter: &CurrencyConverter, project: &Project) -> Option<Decimal> {
    let conversion = converter.convert(project.final_budget_usd, "USD", "TTD", project.year, 1, 1);

    match AssertUnwindSafe(conversion).catch_unwind().await {
        Ok(amount) => Some(amount),
        Err(_) => {
            tracing::error!(
                project_id = project.project_id,
                "Currency conversion aborted unexpectedly, leaving finalBudgetTtd empty."
            );
            None
        }
    }
}
