use crate::{DbError, ProjectStore};
use async_trait::async_trait;
use core_types::{Project, ProjectFields};
use rust_decimal::Decimal;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::str::FromStr;

const SELECT_COLUMNS: &str = r#"
    SELECT project_id, project_name, year, currency, initial_budget_local, budget_usd,
           initial_schedule_estimate_months, adjusted_schedule_estimate_months,
           contingency_rate, escalation_rate, final_budget_usd
    FROM project
"#;

/// `ProjectStore` backed by an embedded SQLite database.
///
/// SQLite has no decimal type, so monetary columns are stored as TEXT and
/// parsed back into `Decimal` on read.
#[derive(Debug, Clone)]
pub struct SqliteProjectStore {
    pool: SqlitePool,
}

impl SqliteProjectStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// A fresh, migrated, private in-memory store.
    pub async fn in_memory() -> Result<Self, DbError> {
        let pool = crate::connection::connect_sqlite("sqlite::memory:", 1).await?;
        crate::connection::run_sqlite_migrations(&pool).await?;
        Ok(Self::new(pool))
    }
}

fn decimal_column(row: &SqliteRow, column: &'static str) -> Result<Decimal, DbError> {
    let text: String = row.try_get(column)?;
    Decimal::from_str(&text).map_err(|e| DbError::DecodeError {
        column,
        reason: e.to_string(),
    })
}

fn project_from_row(row: &SqliteRow) -> Result<Project, DbError> {
    Ok(Project {
        project_id: row.try_get("project_id")?,
        project_name: row.try_get("project_name")?,
        year: row.try_get("year")?,
        currency: row.try_get("currency")?,
        initial_budget_local: decimal_column(row, "initial_budget_local")?,
        budget_usd: decimal_column(row, "budget_usd")?,
        initial_schedule_estimate_months: row.try_get("initial_schedule_estimate_months")?,
        adjusted_schedule_estimate_months: row.try_get("adjusted_schedule_estimate_months")?,
        contingency_rate: decimal_column(row, "contingency_rate")?,
        escalation_rate: decimal_column(row, "escalation_rate")?,
        final_budget_usd: decimal_column(row, "final_budget_usd")?,
    })
}

#[async_trait]
impl ProjectStore for SqliteProjectStore {
    async fn find_by_id(&self, project_id: i64) -> Result<Option<Project>, DbError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE project_id = ?"))
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(project_from_row).transpose()
    }

    async fn find_by_name_and_year(
        &self,
        project_name: &str,
        year: i32,
    ) -> Result<Vec<Project>, DbError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE project_name = ? AND year = ? ORDER BY project_id"
        ))
        .bind(project_name)
        .bind(year)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(project_from_row).collect()
    }

    async fn exists(&self, project_id: i64) -> Result<bool, DbError> {
        let row = sqlx::query("SELECT project_id FROM project WHERE project_id = ?")
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn insert(&self, project: &Project) -> Result<(), DbError> {
        sqlx::query(
            r#"
            INSERT INTO project (
                project_id, project_name, year, currency, initial_budget_local, budget_usd,
                initial_schedule_estimate_months, adjusted_schedule_estimate_months,
                contingency_rate, escalation_rate, final_budget_usd
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(project.project_id)
        .bind(&project.project_name)
        .bind(project.year)
        .bind(&project.currency)
        .bind(project.initial_budget_local.to_string())
        .bind(project.budget_usd.to_string())
        .bind(project.initial_schedule_estimate_months)
        .bind(project.adjusted_schedule_estimate_months)
        .bind(project.contingency_rate.to_string())
        .bind(project.escalation_rate.to_string())
        .bind(project.final_budget_usd.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_insert(e, project.project_id))?;
        Ok(())
    }

    async fn update(&self, project_id: i64, fields: &ProjectFields) -> Result<u64, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE project SET
                project_name = ?, year = ?, currency = ?, initial_budget_local = ?,
                budget_usd = ?, initial_schedule_estimate_months = ?,
                adjusted_schedule_estimate_months = ?, contingency_rate = ?,
                escalation_rate = ?, final_budget_usd = ?
            WHERE project_id = ?
            "#,
        )
        .bind(&fields.project_name)
        .bind(fields.year)
        .bind(&fields.currency)
        .bind(fields.initial_budget_local.to_string())
        .bind(fields.budget_usd.to_string())
        .bind(fields.initial_schedule_estimate_months)
        .bind(fields.adjusted_schedule_estimate_months)
        .bind(fields.contingency_rate.to_string())
        .bind(fields.escalation_rate.to_string())
        .bind(fields.final_budget_usd.to_string())
        .bind(project_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn remove(&self, project_id: i64) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM project WHERE project_id = ?")
            .bind(project_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64, DbError> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM project")
            .fetch_one(&self.pool)
            .await?
            .try_get("count")?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn project(project_id: i64, name: &str, year: i32) -> Project {
        Project {
            project_id,
            project_name: name.to_string(),
            year,
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

    #[tokio::test]
    async fn insert_then_find_round_trips_decimals_exactly() {
        let store = SqliteProjectStore::in_memory().await.unwrap();
        let original = project(10001, "Test Project", 2024);
        store.insert(&original).await.unwrap();

        let fetched = store.find_by_id(10001).await.unwrap();
        assert_eq!(fetched, Some(original));
        assert!(store.exists(10001).await.unwrap());
        assert!(!store.exists(10002).await.unwrap());
        assert_eq!(store.find_by_id(10002).await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_insert_is_a_constraint_violation() {
        let store = SqliteProjectStore::in_memory().await.unwrap();
        store.insert(&project(7, "A", 2000)).await.unwrap();

        let err = store.insert(&project(7, "B", 2001)).await.unwrap_err();
        assert!(matches!(err, DbError::ConstraintViolation(7)));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn find_by_name_and_year_filters_and_orders() {
        let store = SqliteProjectStore::in_memory().await.unwrap();
        store.insert(&project(3, "Rigua Nintendo", 2001)).await.unwrap();
        store.insert(&project(1, "Rigua Nintendo", 2001)).await.unwrap();
        store.insert(&project(2, "Rigua Nintendo", 2002)).await.unwrap();
        store.insert(&project(4, "Choucroute Cartier", 2001)).await.unwrap();

        let ids: Vec<i64> = store
            .find_by_name_and_year("Rigua Nintendo", 2001)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.project_id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(store.find_by_name_and_year("Nobody", 2001).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_and_remove_report_rows_affected() {
        let store = SqliteProjectStore::in_memory().await.unwrap();
        store.insert(&project(5, "Before", 2024)).await.unwrap();

        let mut replacement = project(5, "After", 2025);
        replacement.final_budget_usd = dec!(1);
        let fields = ProjectFields {
            project_name: replacement.project_name.clone(),
            year: replacement.year,
            currency: replacement.currency.clone(),
            initial_budget_local: replacement.initial_budget_local,
            budget_usd: replacement.budget_usd,
            initial_schedule_estimate_months: replacement.initial_schedule_estimate_months,
            adjusted_schedule_estimate_months: replacement.adjusted_schedule_estimate_months,
            contingency_rate: replacement.contingency_rate,
            escalation_rate: replacement.escalation_rate,
            final_budget_usd: replacement.final_budget_usd,
        };

        assert_eq!(store.update(5, &fields).await.unwrap(), 1);
        assert_eq!(store.update(6, &fields).await.unwrap(), 0);
        assert_eq!(store.find_by_id(5).await.unwrap(), Some(replacement));

        assert_eq!(store.remove(5).await.unwrap(), 1);
        assert_eq!(store.remove(5).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
