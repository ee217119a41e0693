//! Token model for the SFQ tokenizer

pub mod token;

pub use token::{CompareOp, Token, TokenContent, TokenKind};
