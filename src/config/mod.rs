use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::burnout::{RiskConfig, RiskThresholds};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub cache: CacheConfig,
    pub risk: RiskConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let cache_path = env::var("CARE_CACHE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("care-cache.csv"));
        let retention_days =
            parse_env("CARE_CACHE_RETENTION_DAYS", 30i64, |raw| raw.parse().ok())?;

        let defaults = RiskConfig::default();
        let risk = RiskConfig {
            thresholds: RiskThresholds::default(),
            trend_epsilon: parse_env("CARE_TREND_EPSILON", defaults.trend_epsilon, |raw| {
                raw.parse().ok().filter(|value: &f32| *value >= 0.0)
            })?,
            projection_horizon_weeks: parse_env(
                "CARE_PROJECTION_HORIZON_WEEKS",
                defaults.projection_horizon_weeks,
                |raw| raw.parse().ok(),
            )?,
            lookback_days: parse_env("CARE_LOOKBACK_DAYS", defaults.lookback_days, |raw| {
                raw.parse().ok().filter(|value: &u32| *value > 0)
            })?,
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            cache: CacheConfig {
                path: cache_path,
                retention_days,
            },
            risk,
        })
    }
}

fn parse_env<T>(
    key: &'static str,
    default: T,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => parse(raw.trim()).ok_or(ConfigError::InvalidNumber { key }),
        Err(_) => Ok(default),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Local assessment cache location and retention window.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    pub path: PathBuf,
    pub retention_days: i64,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a valid non-negative number")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::InvalidNumber { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("CARE_CACHE_PATH");
        env::remove_var("CARE_CACHE_RETENTION_DAYS");
        env::remove_var("CARE_TREND_EPSILON");
        env::remove_var("CARE_PROJECTION_HORIZON_WEEKS");
        env::remove_var("CARE_LOOKBACK_DAYS");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.cache.retention_days, 30);
        assert_eq!(config.risk, RiskConfig::default());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        env::remove_var("APP_HOST");
    }

    #[test]
    fn risk_overrides_come_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CARE_TREND_EPSILON", "0.35");
        env::set_var("CARE_PROJECTION_HORIZON_WEEKS", "8");
        env::set_var("CARE_LOOKBACK_DAYS", "60");
        let config = AppConfig::load().expect("config loads");
        assert!((config.risk.trend_epsilon - 0.35).abs() < f32::EPSILON);
        assert_eq!(config.risk.projection_horizon_weeks, 8);
        assert_eq!(config.risk.lookback_days, 60);
        reset_env();
    }

    #[test]
    fn rejects_malformed_numeric_overrides() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("CARE_LOOKBACK_DAYS", "zero");
        match AppConfig::load() {
            Err(ConfigError::InvalidNumber { key }) => assert_eq!(key, "CARE_LOOKBACK_DAYS"),
            other => panic!("expected invalid number error, got {other:?}"),
        }
        reset_env();
    }
}
