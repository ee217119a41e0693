//! Token-to-criterion assembly
//!
//! Positional consumption of the token stream with one token of lookahead.
//! The parser never rejects input: dangling operators are dropped with a
//! logged warning, everything else folds into a criterion or a bare term.

use crate::config::compile_time::parsing::CRITERIA_SOFT_CAP;
use crate::logging::codes;
use crate::parsing::criterion::{SearchCriterion, TokenRange};
use crate::tokens::{Token, TokenKind};
use crate::tokenizing::{Tokenizer, Vocabulary};
use crate::{log_success, log_warning};

pub struct CriterionParser {
    criteria_cap: usize,
}

impl CriterionParser {
    pub fn new() -> Self {
        Self {
            criteria_cap: CRITERIA_SOFT_CAP,
        }
    }

    /// Cap override, mainly for tests
    pub fn with_criteria_cap(criteria_cap: usize) -> Self {
        Self { criteria_cap }
    }

    /// Assemble the ordered criteria list from a token stream. The stream is
    /// consumed through its first End token.
    pub fn parse<V, I>(&self, tokens: I) -> Vec<SearchCriterion<V>>
    where
        I: IntoIterator<Item = Token<V>>,
    {
        let mut stream = tokens.into_iter().peekable();
        let mut criteria = Vec::new();
        let mut index = 0usize;
        let mut invert = false;
        let mut invert_start: Option<usize> = None;

        while let Some(token) = stream.next() {
            if token.is_end() {
                break;
            }
            if criteria.len() >= self.criteria_cap {
                log_warning!(
                    code = codes::parsing::CRITERIA_SOFT_CAP,
                    "criteria cap reached, remaining tokens dropped",
                    "cap" => self.criteria_cap
                );
                break;
            }

            if let Some(op) = token.as_operator() {
                if op.is_comparison() {
                    // operator with no key in front of it
                    log_warning!(
                        code = codes::parsing::DANGLING_OPERATOR,
                        "dangling operator dropped",
                        "operator" => op,
                        "token_index" => index
                    );
                } else {
                    // negation marker; repeats are idempotent
                    invert = true;
                    invert_start.get_or_insert(index);
                }
                index += 1;
                continue;
            }

            let start = invert_start.take().unwrap_or(index);
            let qualifies = matches!(token.kind, TokenKind::Key | TokenKind::PlainText)
                && stream
                    .peek()
                    .and_then(Token::as_operator)
                    .is_some_and(|op| op.is_comparison());

            if qualifies {
                // the peek above guarantees the operator token is there
                let Some(operator) = stream.next() else {
                    break;
                };
                let value = match stream.peek() {
                    Some(next) if !next.is_end() && next.as_operator().is_none() => {
                        match stream.next() {
                            Some(value) => value,
                            None => break,
                        }
                    }
                    _ => {
                        // operator with no value behind it; keep the key as
                        // a bare term
                        log_warning!(
                            code = codes::parsing::DANGLING_OPERATOR,
                            "dangling operator dropped",
                            "operator" => operator.as_operator().map(|op| op.as_str()).unwrap_or("?"),
                            "token_index" => index + 1
                        );
                        criteria.push(SearchCriterion {
                            key: None,
                            operator: None,
                            value: token,
                            invert,
                            range: TokenRange::new(start, index),
                        });
                        invert = false;
                        index += 2;
                        continue;
                    }
                };
                criteria.push(SearchCriterion {
                    key: Some(token),
                    operator: Some(operator),
                    value,
                    invert,
                    range: TokenRange::new(start, index + 2),
                });
                invert = false;
                index += 3;
            } else {
                criteria.push(SearchCriterion {
                    key: None,
                    operator: None,
                    value: token,
                    invert,
                    range: TokenRange::new(start, index),
                });
                invert = false;
                index += 1;
            }
        }

        log_success!(
            codes::success::PARSE_COMPLETED,
            "query parsed",
            "criteria" => criteria.len(),
            "tokens" => index
        );
        criteria
    }
}

impl Default for CriterionParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Tokenize `source` against `vocabulary` and assemble criteria in one call
pub fn parse_criteria<'s, V: Clone>(
    source: &'s str,
    vocabulary: &'s Vocabulary<V>,
) -> Vec<SearchCriterion<V>> {
    let tokenizer = Tokenizer::new(source, vocabulary);
    CriterionParser::new().parse(tokenizer)
}
