//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every field carries a serde default so that an empty
//! file still yields a usable development configuration.

pub mod app;
pub mod database;
pub mod logging;
pub mod mail;
pub mod transfer;
pub mod worker;

use serde::{Deserialize, Serialize};

pub use self::app::{AppSettings, CorsConfig, ServerConfig};
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;
pub use self::mail::MailConfig;
pub use self::transfer::TransferConfig;
pub use self::worker::WorkerConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Deployment-wide settings.
    #[serde(default)]
    pub app: AppSettings,
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Background worker settings.
    #[serde(default)]
    pub worker: WorkerConfig,
    /// Outbound mail settings.
    #[serde(default)]
    pub mail: MailConfig,
    /// Hiring-manager transfer workflow settings.
    #[serde(default)]
    pub transfer: TransferConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config/default.toml` with an environment-specific overlay
    /// (`config/{env}.toml`) and environment variables prefixed with
    /// `STAFFHUB__` (e.g. `STAFFHUB__DATABASE__URL`).
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_from("config/default", env)
    }

    /// Load configuration starting from an explicit base file path.
    pub fn load_from(base: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("STAFFHUB")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Whether the deployment runs in production mode.
    pub fn is_production(&self) -> bool {
        self.app.environment.eq_ignore_ascii_case("production")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.transfer.cleanup_delay_days, 7);
        assert!(!config.mail.enabled);
        assert!(!config.is_production());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let raw = r#"
            [app]
            environment = "production"

            [transfer]
            payroll_email = "payroll@example.com"
        "#;
        let config: AppConfig = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .expect("build")
            .try_deserialize()
            .expect("deserialize");

        assert!(config.is_production());
        assert_eq!(
            config.transfer.payroll_email.as_deref(),
            Some("payroll@example.com")
        );
        assert_eq!(config.worker.reminder_cron, "0 */5 * * * *");
        assert_eq!(config.database.max_connections, 20);
    }
}
