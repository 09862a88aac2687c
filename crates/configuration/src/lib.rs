
// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use logging::init_tracing;
pub use settings::{
    CurrencyApiSettings, DatabaseBackend, DatabaseSettings, LogSettings, ServerSettings, Settings,
};

/// Loads the application settings.
///
/// Sources are layered in increasing priority: built-in defaults, an optional
/// `config.toml` in the working directory, then `APP__SECTION__KEY` environment
/// variables. A non-empty `CURRENCY_API_KEY` is honoured as a shorthand for the API key.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let builder = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name("config").required(false))
        .add_source(config::Environment::with_prefix("APP").separator("__"))
        .set_override_option(
            "currency_api.api_key",
            non_empty(std::env::var("CURRENCY_API_KEY").ok()),
        )?;

    finish(builder)
}

/// An empty variable (e.g. `KEY=` copied from `.env.example`) counts as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Loads settings from an in-memory TOML document layered over the defaults.
pub fn load_settings_from_str(toml: &str) -> Result<Settings, ConfigError> {
    let builder = with_defaults(config::Config::builder())?
        .add_source(config::File::from_str(toml, config::FileFormat::Toml));

    finish(builder)
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    Ok(builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 3000)?
        .set_default("database.backend", "sqlite")?
        .set_default("database.url", "sqlite::memory:")?
        .set_default("database.max_connections", 5)?
        .set_default("currency_api.base_url", "https://v6.exchangerate-api.com")?
        .set_default("currency_api.api_key", "")?
        .set_default("currency_api.timeout_secs", 10)?
        .set_default("log.level", "info")?)
}

fn finish(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> Result<Settings, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Settings` struct
    let settings = builder.build()?.try_deserialize::<Settings>()?;

    if settings.database.max_connections == 0 {
        return Err(ConfigError::ValidationError(
            "database.max_connections must be at least 1".to_string(),
        ));
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_api_key_variable_is_ignored() {
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some(String::new())), None);
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some("abc123".to_string())), Some("abc123".to_string()));
    }

    #[test]
    fn defaults_select_in_memory_sqlite() {
        let settings = load_settings_from_str("").unwrap();
        assert_eq!(settings.database.backend, DatabaseBackend::Sqlite);
        assert_eq!(settings.database.url, "sqlite::memory:");
        assert_eq!(settings.currency_api.timeout_secs, 10);
        assert_eq!(settings.server.socket_addr().unwrap().port(), 3000);
    }

    #[test]
    fn file_overrides_defaults() {
        let settings = load_settings_from_str(
            r#"
            [database]
            backend = "postgres"
            url = "postgres://budget@localhost/budget"

            [currency_api]
            api_key = "secret"
            timeout_secs = 3
            "#,
        )
        .unwrap();
        assert_eq!(settings.database.backend, DatabaseBackend::Postgres);
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.currency_api.api_key, "secret");
        assert_eq!(settings.currency_api.timeout_secs, 3);
    }

    #[test]
    fn rejects_unknown_backend_and_zero_pool() {
        assert!(load_settings_from_str("[database]\nbackend = \"mysql\"").is_err());
        assert!(matches!(
            load_settings_from_str("[database]\nmax_connections = 0"),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
