//! # Project Budget Database Crate
//!
//! This crate is the persistence gateway for the `project` table. It hides the
//! SQL and the choice of storage engine behind one capability trait.
//!
//! ## Architectural Principles
//!
//! - **One contract, two engines:** `ProjectStore` is implemented by
//!   `SqliteProjectStore` (embedded, the default and what tests use) and
//!   `PgProjectStore` (networked, for operational use). Business logic only
//!   ever sees `Arc<dyn ProjectStore>`.
//! - **Injected, not global:** the store is built once at startup by `connect`
//!   and handed to whoever needs it.
//! - **Asynchronous & Pooled:** every operation is a single awaited statement
//!   on a shared `sqlx` pool, safe to call from concurrent requests.
//!
//! ## Public API
//!
//! - `connect`: builds the configured backend, runs its migrations, returns the store.
//! - `ProjectStore`: find/exists/insert/update/remove/count.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod postgres;
pub mod sqlite;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, connect_postgres, connect_sqlite};
pub use error::DbError;
pub use postgres::PgProjectStore;
pub use sqlite::SqliteProjectStore;
pub use store::ProjectStore;
