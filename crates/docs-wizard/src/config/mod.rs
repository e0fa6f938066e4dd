use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::wizard::ResetPolicy;

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
    pub wizard: WizardConfig,
    pub sessions: SessionConfig,
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

        let checklist_dir = env::var("APP_CHECKLIST_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CHECKLIST_DIR));
        let reset_policy = match env::var("APP_RESET_POLICY") {
            Ok(raw) => raw
                .parse::<ResetPolicy>()
                .map_err(|value| ConfigError::InvalidResetPolicy { value })?,
            Err(_) => ResetPolicy::default(),
        };

        let idle_ttl = match env::var("APP_SESSION_TTL_SECS") {
            Ok(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidSessionTtl { value: raw }),
            },
            Err(_) => Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        };

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            wizard: WizardConfig {
                checklist_dir,
                reset_policy,
            },
            sessions: SessionConfig { idle_ttl },
        })
    }
}

pub const DEFAULT_CHECKLIST_DIR: &str = "checklists";
pub const DEFAULT_SESSION_TTL_SECS: u64 = 30 * 60;

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

/// Where checklists land and how a new application treats the last one.
#[derive(Debug, Clone)]
pub struct WizardConfig {
    pub checklist_dir: PathBuf,
    pub reset_policy: ResetPolicy,
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            checklist_dir: PathBuf::from(DEFAULT_CHECKLIST_DIR),
            reset_policy: ResetPolicy::default(),
        }
    }
}

/// Sessions untouched for longer than `idle_ttl` are dropped from the store.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub idle_ttl: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidResetPolicy { value: String },
    InvalidSessionTtl { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidResetPolicy { value } => write!(
                f,
                "APP_RESET_POLICY must be 'retain' or 'clear' (got '{value}')"
            ),
            ConfigError::InvalidSessionTtl { value } => write!(
                f,
                "APP_SESSION_TTL_SECS must be a positive number of seconds (got '{value}')"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort
            | ConfigError::InvalidResetPolicy { .. }
            | ConfigError::InvalidSessionTtl { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
