use crate::error::ConfigError;
use crate::settings::LogSettings;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Installs the global `fmt` subscriber. Call once, from the binary.
pub fn init_tracing(log: &LogSettings) -> Result<(), ConfigError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| ConfigError::TracingError(e.to_string()))
}
