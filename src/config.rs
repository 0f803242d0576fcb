use thiserror::Error;

/// Default cap on input size for the dump binary (8 MiB).
const DEFAULT_MAX_INPUT_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
    #[error("failed to parse {name} as integer: {source}")]
    ParseInt {
        name: String,
        #[source]
        source: std::num::ParseIntError,
    },
    #[error("failed to parse {name} as boolean: {value}")]
    ParseBool { name: String, value: String },
}

/// Configuration for the `tildee-dump` binary, loaded from environment variables.
///
/// The extraction engine itself takes no configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub log_format: LogFormat,
    pub pretty: bool,
    pub max_input_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            log_format: parse_log_format(&env_or_default("LOG_FORMAT", "text"))?,
            pretty: parse_env_bool("DUMP_PRETTY", true)?,
            max_input_bytes: parse_env_usize("DUMP_MAX_INPUT_BYTES", DEFAULT_MAX_INPUT_BYTES)?,
        })
    }

    /// Validate that the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_input_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                name: "DUMP_MAX_INPUT_BYTES".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Defaults without touching the environment.
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            log_format: LogFormat::Text,
            pretty: true,
            max_input_bytes: DEFAULT_MAX_INPUT_BYTES,
        }
    }
}

fn env_or_default(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => val.parse().map_err(|e| ConfigError::ParseInt {
            name: name.to_string(),
            source: e,
        }),
        _ => Ok(default),
    }
}

fn parse_env_bool(name: &str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(val) if !val.is_empty() => match val.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::ParseBool {
                name: name.to_string(),
                value: val,
            }),
        },
        _ => Ok(default),
    }
}

fn parse_log_format(value: &str) -> Result<LogFormat, ConfigError> {
    match value.to_lowercase().as_str() {
        "text" | "pretty" => Ok(LogFormat::Text),
        "json" | "structured" => Ok(LogFormat::Json),
        _ => Err(ConfigError::InvalidValue {
            name: "LOG_FORMAT".to_string(),
            message: format!("must be 'text' or 'json', got '{value}'"),
        }),
    }
}
