//! Configuration for the SFQ parser
//!
//! Hard bounds live in `constants` and are fixed at compile time; user-facing
//! knobs live in `runtime` and come from environment variables.

pub mod constants;
pub mod runtime;

pub use constants::compile_time;
pub use runtime::{LogLevel, LoggingPreferences, TokenizerPreferences};
