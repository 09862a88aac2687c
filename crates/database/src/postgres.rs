use crate::{DbError, ProjectStore};
use async_trait::async_trait;
use core_types::{Project, ProjectFields};
use sqlx::postgres::PgPool;

const SELECT_COLUMNS: &str = r#"
    SELECT project_id, project_name, year, currency, initial_budget_local, budget_usd,
           initial_schedule_estimate_months, adjusted_schedule_estimate_months,
           contingency_rate, escalation_rate, final_budget_usd
    FROM project
"#;

/// `ProjectStore` backed by a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PgProjectStore {
    pool: PgPool,
}

impl PgProjectStore {
    /// Creates a new `PgProjectStore` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn find_by_id(&self, project_id: i64) -> Result<Option<Project>, DbError> {
        let project = sqlx::query_as::<_, Project>(&format!("{SELECT_COLUMNS} WHERE project_id = $1"))
            .bind(project_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(project)
    }

    async fn find_by_name_and_year(
        &self,
        project_name: &str,
        year: i32,
    ) -> Result<Vec<Project>, DbError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "{SELECT_COLUMNS} WHERE project_name = $1 AND year = $2 ORDER BY project_id"
        ))
        .bind(project_name)
        .bind(year)
        .fetch_all(&self.pool)
        .await?;
        Ok(projects)
    }

    async fn exists(&self, project_id: i64) -> Result<bool, DbError> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT project_id FROM project WHERE project_id = $1")
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
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(project.project_id)
        .bind(&project.project_name)
        .bind(project.year)
        .bind(&project.currency)
        .bind(project.initial_budget_local)
        .bind(project.budget_usd)
        .bind(project.initial_schedule_estimate_months)
        .bind(project.adjusted_schedule_estimate_months)
        .bind(project.contingency_rate)
        .bind(project.escalation_rate)
        .bind(project.final_budget_usd)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from_insert(e, project.project_id))?;
        Ok(())
    }

    async fn update(&self, project_id: i64, fields: &ProjectFields) -> Result<u64, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE project SET
                project_name = $1, year = $2, currency = $3, initial_budget_local = $4,
                budget_usd = $5, initial_schedule_estimate_months = $6,
                adjusted_schedule_estimate_months = $7, contingency_rate = $8,
                escalation_rate = $9, final_budget_usd = $10
            WHERE project_id = $11
            "#,
        )
        .bind(&fields.project_name)
        .bind(fields.year)
        .bind(&fields.currency)
        .bind(fields.initial_budget_local)
        .bind(fields.budget_usd)
        .bind(fields.initial_schedule_estimate_months)
        .bind(fields.adjusted_schedule_estimate_months)
        .bind(fields.contingency_rate)
        .bind(fields.escalation_rate)
        .bind(fields.final_budget_usd)
        .bind(project_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn remove(&self, project_id: i64) -> Result<u64, DbError> {
        let result = sqlx::query("DELETE FROM project WHERE project_id = $1")
            .bind(project_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64, DbError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM project")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
