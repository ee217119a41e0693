//! Runtime user preferences sourced from environment variables
//!
//! Preferences tune observability only; they never change what the tokenizer
//! or parser produce for a given query.

use serde::{Deserialize, Serialize};

/// Environment variable names, collected in one place
pub mod env_vars {
    pub const LOG_LEVEL: &str = "SFQ_LOG_LEVEL";
    pub const LOG_FORMAT: &str = "SFQ_LOG_FORMAT";
    pub const TRACK_METRICS: &str = "SFQ_TRACK_METRICS";
    pub const TRACE_TRANSITIONS: &str = "SFQ_TRACE_TRANSITIONS";
}

/// User-facing log level; converted to the event level used by the logging
/// service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Error,
    Warning,
    Info,
    Debug,
}

impl LogLevel {
    pub fn to_events_log_level(self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse a log level from an environment variable value
pub fn parse_log_level(value: &str) -> Option<LogLevel> {
    match value.to_ascii_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warn" | "warning" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_parsed<T>(name: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
    std::env::var(name).ok().and_then(|v| parse(&v))
}

/// Logging preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingPreferences {
    pub min_log_level: LogLevel,
    /// Emit JSON lines instead of human-readable text
    pub use_structured_logging: bool,
    pub enable_console_logging: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            min_log_level: LogLevel::Warning,
            use_structured_logging: false,
            enable_console_logging: true,
        }
    }
}

impl LoggingPreferences {
    /// Build preferences from the environment, falling back to defaults for
    /// unset or unparseable variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            min_log_level: env_parsed(env_vars::LOG_LEVEL, parse_log_level)
                .unwrap_or(defaults.min_log_level),
            use_structured_logging: std::env::var(env_vars::LOG_FORMAT)
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(defaults.use_structured_logging),
            enable_console_logging: defaults.enable_console_logging,
        }
    }
}

/// Tokenizer preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenizerPreferences {
    /// Count emitted tokens per kind
    pub track_token_metrics: bool,
    /// Log every state transition at debug level; expensive, off by default
    pub log_state_transitions: bool,
    /// Replace the computed step budget; used by tests exercising the
    /// defect path
    pub step_budget_override: Option<u64>,
}

impl Default for TokenizerPreferences {
    fn default() -> Self {
        Self {
            track_token_metrics: true,
            log_state_transitions: false,
            step_budget_override: None,
        }
    }
}

impl TokenizerPreferences {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            track_token_metrics: env_parsed(env_vars::TRACK_METRICS, parse_bool)
                .unwrap_or(defaults.track_token_metrics),
            log_state_transitions: env_parsed(env_vars::TRACE_TRANSITIONS, parse_bool)
                .unwrap_or(defaults.log_state_transitions),
            step_budget_override: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("invalid"), None);
    }

    #[test]
    fn test_bool_parsing() {
        assert_eq!(parse_bool("1"), Some(true));
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_defaults_are_quiet_and_cheap() {
        let logging = LoggingPreferences::default();
        assert_eq!(logging.min_log_level, LogLevel::Warning);
        assert!(!logging.use_structured_logging);

        let tokenizer = TokenizerPreferences::default();
        assert!(tokenizer.track_token_metrics);
        assert!(!tokenizer.log_state_transitions);
        assert!(tokenizer.step_budget_override.is_none());
    }

    #[test]
    fn test_env_var_names_exist() {
        assert!(!env_vars::LOG_LEVEL.is_empty());
        assert!(!env_vars::LOG_FORMAT.is_empty());
        assert!(!env_vars::TRACK_METRICS.is_empty());
        assert!(!env_vars::TRACE_TRANSITIONS.is_empty());
    }
}
