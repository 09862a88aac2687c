use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Invalid database configuration: {0}")]
    ConnectionConfigError(String),

    #[error("Database query failed: {0}")]
    QueryError(#[from] sqlx::Error),

    #[error("Database migration failed: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),

    #[error("Failed to decode column `{column}`: {reason}")]
    DecodeError { column: &'static str, reason: String },

    #[error("A project with id {0} already exists.")]
    ConstraintViolation(i64),
}

impl DbError {
    /// Maps a unique-key violation on insert to `ConstraintViolation`, passing other errors through.
    pub(crate) fn from_insert(err: sqlx::Error, project_id: i64) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                DbError::ConstraintViolation(project_id)
            }
            _ => DbError::QueryError(err),
        }
    }
}
