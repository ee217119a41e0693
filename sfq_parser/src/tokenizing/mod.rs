//! Lexical analysis for search-filter queries
//!
//! A single forward pass over the source: the driver in [`tokenizer`] owns
//! the cursor and token queue, the state machine in [`state`] owns the
//! classification rules, and [`time`] holds the unit-suffix table.

pub mod error;
pub(crate) mod state;
pub(crate) mod time;
pub mod tokenizer;

pub use error::TokenizerDefect;
pub use time::TIME_UNITS;
pub use tokenizer::{plain_text_tokens, ResolveMode, Tokenizer, TokenizerMetrics, Vocabulary};
