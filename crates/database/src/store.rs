use crate::DbError;
use async_trait::async_trait;
use core_types::{Project, ProjectFields};

/// The single query contract every storage backend fulfils for the `project` table.
///
/// Each method is one parameterized statement and one round trip. Nothing here
/// spans a transaction, so an `exists` followed by a mutation is not atomic;
/// callers rely on the primary key and on rows-affected counts to close that gap.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn find_by_id(&self, project_id: i64) -> Result<Option<Project>, DbError>;

    /// All projects with exactly this name and year, in id order.
    async fn find_by_name_and_year(
        &self,
        project_name: &str,
        year: i32,
    ) -> Result<Vec<Project>, DbError>;

    async fn exists(&self, project_id: i64) -> Result<bool, DbError>;

    /// Fails with `DbError::ConstraintViolation` if the id is already taken.
    async fn insert(&self, project: &Project) -> Result<(), DbError>;

    /// Replaces every non-id column. Returns the number of rows touched (0 or 1).
    async fn update(&self, project_id: i64, fields: &ProjectFields) -> Result<u64, DbError>;

    /// Returns the number of rows deleted (0 or 1).
    async fn remove(&self, project_id: i64) -> Result<u64, DbError>;

    async fn count(&self) -> Result<i64, DbError>;
}
