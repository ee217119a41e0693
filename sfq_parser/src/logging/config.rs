//! Configuration bridge between runtime preferences and the logging service

use crate::config::runtime::LoggingPreferences;
use std::sync::OnceLock;

type EventsLogLevel = crate::logging::events::LogLevel;

static RUNTIME_PREFERENCES: OnceLock<LoggingPreferences> = OnceLock::new();

/// Initialize runtime preferences; rejects a second initialization
pub fn init_runtime_preferences(preferences: LoggingPreferences) -> Result<(), String> {
    RUNTIME_PREFERENCES
        .set(preferences)
        .map_err(|_| "Runtime logging preferences already initialized".to_string())
}

/// Get runtime preferences, falling back to the environment when unset
fn get_runtime_preferences() -> LoggingPreferences {
    RUNTIME_PREFERENCES
        .get()
        .cloned()
        .unwrap_or_else(LoggingPreferences::from_env)
}

/// Minimum log level in effect
pub fn get_min_log_level() -> EventsLogLevel {
    get_runtime_preferences().min_log_level.to_events_log_level()
}

/// Whether JSON-line output is enabled
pub fn use_structured_logging() -> bool {
    get_runtime_preferences().use_structured_logging
}

/// Whether console output is enabled
pub fn use_console_logging() -> bool {
    get_runtime_preferences().enable_console_logging
}
