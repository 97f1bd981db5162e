use crate::finance::{MonthlyBudget, ScoringConfig, StatusTable};
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

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
    pub scoring: ScoringSettings,
    pub coach: CoachConfig,
    pub receipts: ReceiptConfig,
    /// Seed the in-memory stores with the sample transactions and goals.
    pub seed_demo_data: bool,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "8000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let monthly_budget = optional_number("SMARTSAVE_MONTHLY_BUDGET")?
            .map(|value| MonthlyBudget::new(value).map_err(|_| ConfigError::InvalidBudget(value)))
            .transpose()?;
        let excellent_min = optional_number("SMARTSAVE_SCORE_EXCELLENT")?.unwrap_or(80.0);
        let good_min = optional_number("SMARTSAVE_SCORE_GOOD")?.unwrap_or(50.0);
        if !(0.0..=100.0).contains(&good_min)
            || !(0.0..=100.0).contains(&excellent_min)
            || good_min >= excellent_min
        {
            return Err(ConfigError::InvalidThresholds {
                excellent_min,
                good_min,
            });
        }

        let seed_demo_data = match env::var("SMARTSAVE_SEED_DEMO") {
            Ok(value) => parse_flag("SMARTSAVE_SEED_DEMO", &value)?,
            Err(_) => environment != AppEnvironment::Production,
        };

        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string());
        let base_url =
            env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let history_limit = match env::var("SMARTSAVE_COACH_HISTORY") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|_| ConfigError::InvalidNumber {
                    variable: "SMARTSAVE_COACH_HISTORY",
                    value: raw,
                })?,
            Err(_) => 20,
        };

        let tesseract_bin = env::var("TESSERACT_BIN")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("tesseract"));
        let languages = env::var("TESSERACT_LANGS").unwrap_or_else(|_| "eng+fra".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            scoring: ScoringSettings {
                monthly_budget,
                engine: ScoringConfig {
                    statuses: StatusTable::with_bounds(excellent_min, good_min),
                    ..ScoringConfig::default()
                },
            },
            coach: CoachConfig {
                api_key,
                model,
                base_url,
                history_limit,
            },
            receipts: ReceiptConfig {
                tesseract_bin,
                languages,
            },
            seed_demo_data,
        })
    }
}

fn optional_number(variable: &'static str) -> Result<Option<f64>, ConfigError> {
    match env::var(variable) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidNumber {
                variable,
                value: raw,
            }),
        Err(_) => Ok(None),
    }
}

fn parse_flag(variable: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            variable,
            value: value.to_string(),
        }),
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

/// Serenity Score tunables plus the budget applied when a request names none.
#[derive(Debug, Clone)]
pub struct ScoringSettings {
    pub monthly_budget: Option<MonthlyBudget>,
    pub engine: ScoringConfig,
}

/// Chat-completion backend settings. Without an API key the offline coach answers.
#[derive(Clone)]
pub struct CoachConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub history_limit: usize,
}

impl fmt::Debug for CoachConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoachConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("history_limit", &self.history_limit)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ReceiptConfig {
    pub tesseract_bin: PathBuf,
    pub languages: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost {
        source: std::net::AddrParseError,
    },
    InvalidNumber {
        variable: &'static str,
        value: String,
    },
    InvalidFlag {
        variable: &'static str,
        value: String,
    },
    InvalidBudget(f64),
    InvalidThresholds {
        excellent_min: f64,
        good_min: f64,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { variable, value } => {
                write!(f, "{variable} must be a number, got '{value}'")
            }
            ConfigError::InvalidFlag { variable, value } => {
                write!(f, "{variable} must be true or false, got '{value}'")
            }
            ConfigError::InvalidBudget(value) => {
                write!(f, "SMARTSAVE_MONTHLY_BUDGET must be positive, got {value}")
            }
            ConfigError::InvalidThresholds {
                excellent_min,
                good_min,
            } => write!(
                f,
                "score thresholds must satisfy 0 <= good ({good_min}) < excellent ({excellent_min}) <= 100"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
