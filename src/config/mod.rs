use std::env;
use std::fmt;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Some(Self::Production),
            "test" | "ci" => Some(Self::Test),
            "dev" | "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// Top-level configuration for an embedding application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = match env::var("APP_ENV") {
            Ok(value) => AppEnvironment::parse(&value)
                .ok_or(ConfigError::UnknownEnvironment { value })?,
            Err(_) => AppEnvironment::Development,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    UnknownEnvironment { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::UnknownEnvironment { value } => {
                write!(f, "APP_ENV '{value}' is not one of development/test/production")
            }
        }
    }
}

impl std::error::Error for ConfigError {}
