//! Application configuration management.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::AppError;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Cash engine tuning.
    #[serde(default)]
    pub cash: CashConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Cash engine tuning knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct CashConfig {
    /// Variance tolerance for a single day's count; scaled by √days.
    #[serde(default = "default_variance_base_tolerance")]
    pub variance_base_tolerance: Decimal,
    /// Allowed gap between a deposit amount and the selected days' total.
    #[serde(default = "default_deposit_match_tolerance")]
    pub deposit_match_tolerance: Decimal,
    /// Pending age (in days) at which a deposit becomes a warning.
    #[serde(default = "default_warning_days")]
    pub warning_days: i64,
}

impl Default for CashConfig {
    fn default() -> Self {
        Self {
            variance_base_tolerance: default_variance_base_tolerance(),
            deposit_match_tolerance: default_deposit_match_tolerance(),
            warning_days: default_warning_days(),
        }
    }
}

fn default_variance_base_tolerance() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn default_deposit_match_tolerance() -> Decimal {
    crate::types::MONEY_EPSILON
}

fn default_warning_days() -> i64 {
    3
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, AppError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("STRONGROOM").separator("__"))
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cash_config_defaults() {
        let cash = CashConfig::default();
        assert_eq!(cash.variance_base_tolerance, dec!(100));
        assert_eq!(cash.deposit_match_tolerance, dec!(0.01));
        assert_eq!(cash.warning_days, 3);
    }

    #[test]
    fn test_server_config_defaults() {
        let server = ServerConfig::default();
        assert_eq!(server.host, "0.0.0.0");
        assert_eq!(server.port, 8080);
    }

    #[test]
    fn test_load_from_environment() {
        let config = temp_env::with_vars(
            [
                (
                    "STRONGROOM__DATABASE__URL",
                    Some("postgres://localhost/strongroom_test"),
                ),
                ("STRONGROOM__SERVER__PORT", Some("9090")),
            ],
            AppConfig::load,
        )
        .expect("config should load");

        assert_eq!(config.database.url, "postgres://localhost/strongroom_test");
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.cash.warning_days, 3);
    }

    #[test]
    fn test_load_without_database_url_fails() {
        let result = temp_env::with_vars(
            [("STRONGROOM__DATABASE__URL", None::<&str>)],
            AppConfig::load,
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
