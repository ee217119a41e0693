//! Token records emitted by the scanning state machine
//!
//! Tokens are transient value objects: the driver builds one from the
//! currently buffered span, the criterion parser consumes it once. `V` is
//! the vocabulary payload type the caller registered into the tries.
use crate::utils::Span;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Classification of one lexeme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    /// Virtual terminator, emitted exactly once per scan and cached thereafter
    End,
    Integer,
    /// Integer magnitude suffixed with `%`
    Percentage,
    Real,
    /// Duration such as `2:30` or `1m30s`
    TimeSpan,
    /// Registered keyword (left-hand field of a criterion)
    Key,
    /// Registered enumeration value, exact or prefix match
    EnumerationValue,
    /// Fallback classification; never a scan failure
    PlainText,
    Operator,
}

impl TokenKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::End => "end",
            Self::Integer => "integer",
            Self::Percentage => "percentage",
            Self::Real => "real",
            Self::TimeSpan => "time_span",
            Self::Key => "key",
            Self::EnumerationValue => "enumeration_value",
            Self::PlainText => "plain_text",
            Self::Operator => "operator",
        }
    }

    /// Whether this kind came out of a vocabulary trie traversal
    pub const fn is_vocabulary(self) -> bool {
        matches!(self, Self::Key | Self::EnumerationValue)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparison operators of the query language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompareOp {
    /// `:`, containment / loose equality, also the bare-term default
    Contains,
    /// `=` or `==`
    Eq,
    /// `!=`
    NotEq,
    /// `<`
    Less,
    /// `<=`
    LessEq,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,
    /// Token-initial `-`, the criterion negation marker
    Not,
}

impl CompareOp {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Contains => ":",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Greater => ">",
            Self::GreaterEq => ">=",
            Self::Not => "-",
        }
    }

    /// Whether this operator can sit between a key and a value
    pub const fn is_comparison(self) -> bool {
        !matches!(self, Self::Not)
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed parsed value carried by a token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TokenContent<V> {
    /// No parsed value (End, and vocabulary hits without payload)
    None,
    Integer(i64),
    Real(f64),
    Duration(Duration),
    Text(String),
    /// Payload of the complete vocabulary word this token matched
    Vocabulary(V),
    /// Payloads of every registered word the buffered prefix could still
    /// become; carried by partial enumeration matches
    Candidates(Vec<V>),
    Operator(CompareOp),
}

/// One classified lexeme: kind, covering span, parsed content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token<V> {
    pub kind: TokenKind,
    pub span: Span,
    pub content: TokenContent<V>,
    /// True only when a trie traversal ended exactly on a terminal node
    pub is_complete_match: bool,
}

impl<V> Token<V> {
    pub fn new(kind: TokenKind, span: Span, content: TokenContent<V>) -> Self {
        Self {
            kind,
            span,
            content,
            is_complete_match: false,
        }
    }

    pub fn with_complete_match(mut self, is_complete_match: bool) -> Self {
        self.is_complete_match = is_complete_match;
        self
    }

    /// The source text this token was derived from
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source)
    }

    pub fn is_end(&self) -> bool {
        self.kind == TokenKind::End
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self.content {
            TokenContent::Integer(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_real(&self) -> Option<f64> {
        match self.content {
            TokenContent::Real(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_duration(&self) -> Option<Duration> {
        match self.content {
            TokenContent::Duration(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_operator(&self) -> Option<CompareOp> {
        match self.content {
            TokenContent::Operator(op) => Some(op),
            _ => None,
        }
    }

    pub fn as_vocabulary(&self) -> Option<&V> {
        match &self.content {
            TokenContent::Vocabulary(payload) => Some(payload),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_accessors() {
        let token: Token<&str> = Token::new(
            TokenKind::Integer,
            Span::new(0, 3),
            TokenContent::Integer(123),
        );
        assert_eq!(token.as_integer(), Some(123));
        assert_eq!(token.as_real(), None);
        assert_eq!(token.text("123 foo"), "123");
        assert!(!token.is_complete_match);
    }

    #[test]
    fn test_vocabulary_token() {
        let token = Token::new(
            TokenKind::Key,
            Span::new(0, 3),
            TokenContent::Vocabulary("bpm_field"),
        )
        .with_complete_match(true);
        assert!(token.kind.is_vocabulary());
        assert!(token.is_complete_match);
        assert_eq!(token.as_vocabulary(), Some(&"bpm_field"));
    }

    #[test]
    fn test_operator_strings() {
        assert_eq!(CompareOp::Contains.as_str(), ":");
        assert_eq!(CompareOp::GreaterEq.as_str(), ">=");
        assert!(CompareOp::Less.is_comparison());
        assert!(!CompareOp::Not.is_comparison());
    }

    #[test]
    fn test_token_serializes() {
        let token: Token<String> = Token::new(
            TokenKind::TimeSpan,
            Span::new(0, 4),
            TokenContent::Duration(Duration::from_secs(150)),
        );
        let json = serde_json::to_string(&token).expect("token serializes");
        assert!(json.contains("time_span") || json.contains("TimeSpan"));
    }
}
