use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use crate::consumption::DEFAULT_TREND_WINDOW_DAYS;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Deployment stage, parsed leniently from `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Process configuration assembled from the environment (and `.env`, if present).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = var("APP_ENV")
            .map(|raw| AppEnvironment::parse(&raw))
            .unwrap_or(AppEnvironment::Development);

        let server = ServerConfig {
            host: var("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: match var("APP_PORT") {
                Some(raw) => raw
                    .parse::<u16>()
                    .map_err(|_| ConfigError::InvalidPort { value: raw })?,
                None => DEFAULT_PORT,
            },
        };

        let telemetry = TelemetryConfig {
            log_level: var("APP_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        };

        let scoring = ScoringConfig {
            artifacts_path: var("GREEN_SCORE_ARTIFACTS").map(PathBuf::from),
            features_path: var("GREEN_SCORE_FEATURES").map(PathBuf::from),
            trend_window_days: match var("GREEN_SCORE_TREND_DAYS") {
                Some(raw) => parse_window(raw)?,
                None => DEFAULT_TREND_WINDOW_DAYS,
            },
        };

        Ok(Self {
            environment,
            server,
            telemetry,
            scoring,
        })
    }
}

/// Trimmed value of `key`; unset and blank are both `None`.
fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_window(raw: String) -> Result<u32, ConfigError> {
    match raw.parse::<u32>() {
        Ok(days) if days > 0 => Ok(days),
        _ => Err(ConfigError::InvalidTrendWindow { value: raw }),
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Bind address; `localhost` maps to the IPv4 loopback.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost {
                    value: self.host.clone(),
                    source,
                })?
        };
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Locations of the pre-fitted estimator artifacts and the trend window.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    pub artifacts_path: Option<PathBuf>,
    pub features_path: Option<PathBuf>,
    pub trend_window_days: u32,
}

impl ScoringConfig {
    pub fn require_artifacts(&self) -> Result<&PathBuf, ConfigError> {
        self.artifacts_path.as_ref().ok_or(ConfigError::MissingPath {
            variable: "GREEN_SCORE_ARTIFACTS",
        })
    }

    pub fn require_features(&self) -> Result<&PathBuf, ConfigError> {
        self.features_path.as_ref().ok_or(ConfigError::MissingPath {
            variable: "GREEN_SCORE_FEATURES",
        })
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort {
        value: String,
    },
    InvalidHost {
        value: String,
        source: std::net::AddrParseError,
    },
    InvalidTrendWindow {
        value: String,
    },
    MissingPath {
        variable: &'static str,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort { value } => {
                write!(f, "APP_PORT '{value}' is not a valid port number")
            }
            ConfigError::InvalidHost { value, .. } => {
                write!(f, "APP_HOST '{value}' is neither localhost nor an IP address")
            }
            ConfigError::InvalidTrendWindow { value } => write!(
                f,
                "GREEN_SCORE_TREND_DAYS must be a positive whole number of days, got '{value}'"
            ),
            ConfigError::MissingPath { variable } => {
                write!(f, "{variable} must point to a file for this command")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source, .. } => Some(source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    const KEYS: [&str; 7] = [
        "APP_ENV",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "GREEN_SCORE_ARTIFACTS",
        "GREEN_SCORE_FEATURES",
        "GREEN_SCORE_TREND_DAYS",
    ];

    /// Serializes env access and clears every key this module reads.
    fn scoped_env(vars: &[(&str, &str)]) -> MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        let guard = LOCK
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for key in KEYS {
            env::remove_var(key);
        }
        for (key, value) in vars {
            env::set_var(key, value);
        }
        guard
    }

    #[test]
    fn defaults_apply_without_env() {
        let _env = scoped_env(&[]);
        let config = AppConfig::load().expect("defaults load");

        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(
            config.server.socket_addr().unwrap(),
            SocketAddr::from(([127, 0, 0, 1], 3000))
        );
        assert_eq!(config.telemetry.log_level, "info");
        assert!(config.scoring.artifacts_path.is_none());
        assert!(config.scoring.features_path.is_none());
        assert_eq!(config.scoring.trend_window_days, DEFAULT_TREND_WINDOW_DAYS);
    }

    #[test]
    fn localhost_binds_loopback() {
        let _env = scoped_env(&[("APP_HOST", "LocalHost"), ("APP_PORT", "8088")]);
        let config = AppConfig::load().expect("config loads");

        assert_eq!(
            config.server.socket_addr().unwrap(),
            SocketAddr::from(([127, 0, 0, 1], 8088))
        );
    }

    #[test]
    fn reads_scoring_settings() {
        let _env = scoped_env(&[
            ("APP_ENV", "production"),
            ("GREEN_SCORE_ARTIFACTS", "/srv/green/artifacts.json"),
            ("GREEN_SCORE_FEATURES", "  "),
            ("GREEN_SCORE_TREND_DAYS", "14"),
        ]);
        let config = AppConfig::load().expect("config loads");

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(
            config.scoring.require_artifacts().unwrap(),
            &PathBuf::from("/srv/green/artifacts.json")
        );
        assert!(matches!(
            config.scoring.require_features(),
            Err(ConfigError::MissingPath {
                variable: "GREEN_SCORE_FEATURES"
            })
        ));
        assert_eq!(config.scoring.trend_window_days, 14);
    }

    #[test]
    fn rejects_bad_numbers() {
        for (key, value) in [
            ("GREEN_SCORE_TREND_DAYS", "0"),
            ("GREEN_SCORE_TREND_DAYS", "-3"),
            ("APP_PORT", "70000"),
        ] {
            let _env = scoped_env(&[(key, value)]);
            match AppConfig::load() {
                Err(ConfigError::InvalidTrendWindow { value: got })
                | Err(ConfigError::InvalidPort { value: got }) => assert_eq!(got, value),
                other => panic!("{key}={value}: expected rejection, got {other:?}"),
            }
        }
    }

    #[test]
    fn unparseable_host_is_reported() {
        let _env = scoped_env(&[("APP_HOST", "green.internal")]);
        let config = AppConfig::load().expect("host is only checked on bind");

        assert!(matches!(
            config.server.socket_addr(),
            Err(ConfigError::InvalidHost { value, .. }) if value == "green.internal"
        ));
    }
}
