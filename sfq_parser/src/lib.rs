// Internal modules
pub mod config;
#[macro_use]
pub mod logging;
pub mod parsing;
pub mod tokenizing;
pub mod tokens;
pub mod trie;
pub mod utils;

// Re-export key types for library consumers
pub use parsing::{parse_criteria, CriterionParser, SearchCriterion, TokenRange};
pub use tokenizing::{plain_text_tokens, ResolveMode, Tokenizer, Vocabulary};
pub use tokens::{CompareOp, Token, TokenContent, TokenKind};
pub use trie::Trie;
pub use utils::Span;
