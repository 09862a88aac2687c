//! Domain types shared by every crate in the workspace: the `Project` record,
//! its wire payloads, the enriched read-time view, and the pure request validators.

pub mod error;
pub mod project;
pub mod validation;

// Re-export the core types to provide a clean public API.
pub use error::ValidationError;
pub use project::{CurrencyRequest, EnrichedProject, Project, ProjectFields, ProjectPayload};
