use crate::error::DbError;
use crate::{PgProjectStore, ProjectStore, SqliteProjectStore};
use configuration::{DatabaseBackend, DatabaseSettings};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

/// Connects the configured backend, applies its migrations, and returns it
/// behind the backend-agnostic `ProjectStore` interface.
pub async fn connect(settings: &DatabaseSettings) -> Result<Arc<dyn ProjectStore>, DbError> {
    if settings.url.trim().is_empty() {
        return Err(DbError::ConnectionConfigError(
            "database.url must be set.".to_string(),
        ));
    }

    let store: Arc<dyn ProjectStore> = match settings.backend {
        DatabaseBackend::Sqlite => {
            let pool = connect_sqlite(&settings.url, settings.max_connections).await?;
            run_sqlite_migrations(&pool).await?;
            Arc::new(SqliteProjectStore::new(pool))
        }
        DatabaseBackend::Postgres => {
            let pool = connect_postgres(&settings.url, settings.max_connections).await?;
            run_postgres_migrations(&pool).await?;
            Arc::new(PgProjectStore::new(pool))
        }
    };

    tracing::info!(backend = ?settings.backend, "Project store connected and migrated.");
    Ok(store)
}

/// Establishes a connection pool to the PostgreSQL database.
pub async fn connect_postgres(url: &str, max_connections: u32) -> Result<PgPool, DbError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(url)
        .await?;

    Ok(pool)
}

/// Establishes a connection pool to an SQLite database file, creating it if missing.
///
/// An in-memory database lives only as long as its connection, so for
/// `:memory:` URLs the pool is pinned to one connection that is never recycled.
pub async fn connect_sqlite(url: &str, max_connections: u32) -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(|e| DbError::ConnectionConfigError(e.to_string()))?
        .create_if_missing(true);

    let in_memory = url.contains(":memory:") || url.contains("mode=memory");
    let pool_options = if in_memory {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
    } else {
        SqlitePoolOptions::new().max_connections(max_connections)
    };

    let pool = pool_options
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await?;

    Ok(pool)
}

pub async fn run_postgres_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations/postgres").run(pool).await?;
    Ok(())
}

pub async fn run_sqlite_migrations(pool: &SqlitePool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations/sqlite").run(pool).await?;
    Ok(())
}
