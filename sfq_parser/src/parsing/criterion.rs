//! Assembled search criteria
//!
//! A criterion is the unit an evaluator consumes: optional key, optional
//! comparison operator, one value token, a negation flag, and the token
//! range it was assembled from. Criteria are immutable once built.

use crate::tokens::{CompareOp, Token};
use crate::utils::Span;
use serde::{Deserialize, Serialize};

/// Inclusive range of token indices covered by one construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRange {
    pub start: usize,
    pub end: usize,
}

impl TokenRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted token range");
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// Inclusive ranges always cover at least one token
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }
}

/// One predicate of a query.
///
/// `key == None` marks the unqualified catch-all field: evaluators match the
/// value against their default text field(s). `operator == None` marks a
/// bare term, which carries implicit [`CompareOp::Contains`] semantics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchCriterion<V> {
    pub key: Option<Token<V>>,
    pub operator: Option<Token<V>>,
    pub value: Token<V>,
    pub invert: bool,
    pub range: TokenRange,
}

impl<V> SearchCriterion<V> {
    pub fn is_bare_term(&self) -> bool {
        self.key.is_none() && self.operator.is_none()
    }

    /// The comparison to apply; bare terms default to Contains
    pub fn effective_op(&self) -> CompareOp {
        self.operator
            .as_ref()
            .and_then(|token| token.as_operator())
            .unwrap_or(CompareOp::Contains)
    }

    /// Byte span covering every token of the criterion
    pub fn span(&self) -> Span {
        let mut span = self.value.span;
        if let Some(key) = &self.key {
            span = span.merge(key.span);
        }
        if let Some(operator) = &self.operator {
            span = span.merge(operator.span);
        }
        span
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::{TokenContent, TokenKind};

    #[test]
    fn test_token_range() {
        let range = TokenRange::new(2, 4);
        assert_eq!(range.len(), 3);
        assert!(range.contains(2));
        assert!(range.contains(4));
        assert!(!range.contains(5));
    }

    #[test]
    fn test_bare_term_defaults_to_contains() {
        let criterion: SearchCriterion<&str> = SearchCriterion {
            key: None,
            operator: None,
            value: Token::new(
                TokenKind::PlainText,
                Span::new(0, 3),
                TokenContent::Text("foo".to_string()),
            ),
            invert: false,
            range: TokenRange::new(0, 0),
        };
        assert!(criterion.is_bare_term());
        assert_eq!(criterion.effective_op(), CompareOp::Contains);
        assert_eq!(criterion.span(), Span::new(0, 3));
    }

    #[test]
    fn test_span_covers_all_tokens() {
        let criterion: SearchCriterion<&str> = SearchCriterion {
            key: Some(Token::new(
                TokenKind::Key,
                Span::new(0, 3),
                TokenContent::Vocabulary("bpm"),
            )),
            operator: Some(Token::new(
                TokenKind::Operator,
                Span::new(3, 4),
                TokenContent::Operator(CompareOp::Contains),
            )),
            value: Token::new(TokenKind::Integer, Span::new(4, 7), TokenContent::Integer(180)),
            invert: false,
            range: TokenRange::new(0, 2),
        };
        assert_eq!(criterion.span(), Span::new(0, 7));
        assert_eq!(criterion.effective_op(), CompareOp::Contains);
    }
}
