//! The scanning state machine
//!
//! One tagged union, one exhaustive-match step function. Each variant
//! carries only its own accumulator; the driver is passed in explicitly so
//! transitions have no ambient state. A transition inspects exactly one
//! lookahead character and either consumes it, enqueues finished tokens, or
//! re-classifies the already-buffered span. It never rescans and consumes in
//! the same transition, which keeps the whole scan linear in the input.
//!
//! Re-classification is the interesting move: `10m` is consumed as an
//! integer until the `m` arrives, at which point the buffered span is walked
//! through the unit/keyword tries from the root. The walk is bounded by the
//! buffer, and the buffer is never re-walked twice for the same token, so no
//! backtracking over the source ever happens.

use crate::tokenizing::error::TokenizerDefect;
use crate::tokenizing::time;
use crate::tokenizing::tokenizer::Tokenizer;
use crate::tokens::{CompareOp, TokenContent, TokenKind};
use crate::trie::NodeId;
use std::time::Duration;

/// Running totals for a time span under construction.
///
/// Colon chains are positional base-60 (`1:2:30` is 1h 2m 30s); unit
/// suffixes apply their multiplier to the magnitude directly before them,
/// and the two forms may mix (`2:30`, `90s`, `1m30s`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct TimeAccumulator {
    total_seconds: u64,
    colon_value: u64,
    saw_colon: bool,
    magnitude: u64,
    unit_node: Option<NodeId>,
}

impl TimeAccumulator {
    pub(crate) fn with_magnitude(magnitude: u64) -> Self {
        Self {
            magnitude,
            ..Self::default()
        }
    }

    fn push_digit(&mut self, digit: u64) {
        self.magnitude = self.magnitude.saturating_mul(10).saturating_add(digit);
    }

    fn push_colon(&mut self) {
        self.colon_value = self
            .colon_value
            .saturating_mul(60)
            .saturating_add(self.magnitude);
        self.magnitude = 0;
        self.saw_colon = true;
    }

    fn apply_unit(&mut self, multiplier: u64) {
        self.total_seconds = self
            .total_seconds
            .saturating_add(self.magnitude.saturating_mul(multiplier));
        self.magnitude = 0;
        self.unit_node = None;
    }

    fn finish(&self) -> Duration {
        let tail = if self.saw_colon {
            self.colon_value
                .saturating_mul(60)
                .saturating_add(self.magnitude)
        } else {
            self.magnitude
        };
        Duration::from_secs(self.total_seconds.saturating_add(tail))
    }
}

/// Scanner states. Each variant is a pure transition over one lookahead
/// character plus the buffered span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum State {
    /// Between tokens; dispatches the first character of the next one
    Empty,
    Integer {
        value: i64,
    },
    Real {
        value: f64,
        scale: f64,
    },
    TimeSpan(TimeAccumulator),
    /// Mid-traversal through the keyword trie
    Key {
        node: NodeId,
    },
    /// Mid-traversal through the enumeration trie
    Enumeration {
        node: NodeId,
    },
    PlainText,
    /// Terminal; the driver stops stepping once this is reached
    End,
}

/// End-of-input (the permanent virtual terminator) or the token separator.
fn is_separator(lookahead: Option<char>) -> bool {
    matches!(lookahead, None | Some(' '))
}

/// Characters that begin a comparison operator. Plain text yields at these
/// so `year<2020` scans as a key, an operator and a value even when `year`
/// is not registered. `-` is absent: a minus is only the negation marker at
/// token start, inside a word it stays plain text.
fn starts_operator(ch: char) -> bool {
    matches!(ch, ':' | '=' | '<' | '>' | '!')
}

fn digit_value(ch: char) -> u64 {
    (ch as u8 - b'0') as u64
}

/// Re-classify the buffered span from the trie roots after a numeric state
/// hit a character it cannot use. Keys win over enumerations; an
/// unrecognized span becomes plain text.
fn reclassify<V: Clone>(t: &Tokenizer<'_, V>) -> State {
    if let Some(keys) = t.keywords() {
        if let Some(node) = keys.try_advance(None, t.buffer()) {
            return State::Key { node };
        }
    }
    enumeration_fallback(t)
}

/// Retry the buffered span against the enumeration trie before giving up on
/// plain text. Used when a keyword traversal dead-ends without completing.
fn enumeration_fallback<V: Clone>(t: &Tokenizer<'_, V>) -> State {
    if let Some(enums) = t.enumerations() {
        if let Some(node) = enums.try_advance(None, t.buffer()) {
            return State::Enumeration { node };
        }
    }
    State::PlainText
}

impl State {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            State::Empty => "empty",
            State::Integer { .. } => "integer",
            State::Real { .. } => "real",
            State::TimeSpan(_) => "time_span",
            State::Key { .. } => "key",
            State::Enumeration { .. } => "enumeration",
            State::PlainText => "plain_text",
            State::End => "end",
        }
    }

    /// Advance the machine by one transition.
    pub(crate) fn step<V: Clone>(self, t: &mut Tokenizer<'_, V>) -> State {
        match self {
            State::Empty => Self::step_empty(t),

            State::Integer { value } => match t.lookahead() {
                None | Some(' ') => {
                    t.emit(TokenKind::Integer, TokenContent::Integer(value), false);
                    State::Empty
                }
                Some('%') => {
                    t.advance();
                    t.emit(TokenKind::Percentage, TokenContent::Integer(value), false);
                    State::Empty
                }
                Some('.') => {
                    t.advance();
                    State::Real {
                        value: value as f64,
                        scale: 0.1,
                    }
                }
                Some(c) if c.is_ascii_digit() => {
                    t.advance();
                    State::Integer {
                        value: value
                            .saturating_mul(10)
                            .saturating_add(digit_value(c) as i64),
                    }
                }
                Some(c) if c == ':' || time::starts_unit(c) => {
                    // keep the accumulated value as the first magnitude; the
                    // lookahead is left for the time-span state to consume
                    State::TimeSpan(TimeAccumulator::with_magnitude(value as u64))
                }
                Some(_) => reclassify(t),
            },

            State::Real { value, scale } => match t.lookahead() {
                None | Some(' ') => {
                    t.emit(TokenKind::Real, TokenContent::Real(value), false);
                    State::Empty
                }
                Some(c) if c.is_ascii_digit() => {
                    t.advance();
                    State::Real {
                        value: value + digit_value(c) as f64 * scale,
                        scale: scale / 10.0,
                    }
                }
                Some(_) => reclassify(t),
            },

            State::TimeSpan(acc) => Self::step_time_span(acc, t),

            State::Key { node } => {
                if let Some(c) = t.lookahead() {
                    if let Some(next) = t.keyword_trie().try_next(Some(node), c) {
                        t.advance();
                        return State::Key { node: next };
                    }
                }
                // lookahead cannot extend the traversal: a complete node wins
                let trie = t.keyword_trie();
                if trie.is_complete(node) {
                    let content = match trie.value(node) {
                        Some(payload) => TokenContent::Vocabulary(payload.clone()),
                        None => TokenContent::None,
                    };
                    t.emit(TokenKind::Key, content, true);
                    State::Empty
                } else {
                    enumeration_fallback(t)
                }
            }

            State::Enumeration { node } => {
                if let Some(c) = t.lookahead() {
                    if let Some(next) = t.enumeration_trie().try_next(Some(node), c) {
                        t.advance();
                        return State::Enumeration { node: next };
                    }
                }
                let trie = t.enumeration_trie();
                if trie.is_complete(node) {
                    let content = match trie.value(node) {
                        Some(payload) => TokenContent::Vocabulary(payload.clone()),
                        None => TokenContent::None,
                    };
                    t.emit(TokenKind::EnumerationValue, content, true);
                    State::Empty
                } else if is_separator(t.lookahead()) {
                    // registered prefix at end of word: surface the
                    // candidate payloads instead of degrading to text
                    let candidates = trie.collect_values(node);
                    t.emit(
                        TokenKind::EnumerationValue,
                        TokenContent::Candidates(candidates),
                        false,
                    );
                    State::Empty
                } else {
                    State::PlainText
                }
            }

            State::PlainText => match t.lookahead() {
                None | Some(' ') => {
                    let text = t.buffer().to_string();
                    t.emit(TokenKind::PlainText, TokenContent::Text(text), false);
                    State::Empty
                }
                // yield at an operator without consuming it; the empty state
                // scans it next
                Some(c) if starts_operator(c) => {
                    let text = t.buffer().to_string();
                    t.emit(TokenKind::PlainText, TokenContent::Text(text), false);
                    State::Empty
                }
                Some(_) => {
                    t.advance();
                    State::PlainText
                }
            },

            State::End => {
                t.record_defect(TokenizerDefect::SteppedAfterEnd);
                State::End
            }
        }
    }

    fn step_empty<V: Clone>(t: &mut Tokenizer<'_, V>) -> State {
        let Some(c) = t.lookahead() else {
            return State::End;
        };
        match c {
            ' ' => {
                // separator between tokens; never part of a span
                t.advance();
                t.discard_buffer();
                State::Empty
            }
            '0'..='9' => {
                t.advance();
                State::Integer {
                    value: digit_value(c) as i64,
                }
            }
            ':' => {
                t.advance();
                t.emit_operator(CompareOp::Contains);
                State::Empty
            }
            '=' => {
                t.advance();
                if t.lookahead() == Some('=') {
                    t.advance();
                }
                t.emit_operator(CompareOp::Eq);
                State::Empty
            }
            '<' => {
                t.advance();
                let op = if t.lookahead() == Some('=') {
                    t.advance();
                    CompareOp::LessEq
                } else {
                    CompareOp::Less
                };
                t.emit_operator(op);
                State::Empty
            }
            '>' => {
                t.advance();
                let op = if t.lookahead() == Some('=') {
                    t.advance();
                    CompareOp::GreaterEq
                } else {
                    CompareOp::Greater
                };
                t.emit_operator(op);
                State::Empty
            }
            '!' => {
                t.advance();
                if t.lookahead() == Some('=') {
                    t.advance();
                    t.emit_operator(CompareOp::NotEq);
                    State::Empty
                } else {
                    // a lone '!' is not an operator; the buffered '!' rides
                    // along as plain text
                    State::PlainText
                }
            }
            '-' => {
                // token-initial minus is the negation marker; inside a word
                // it is plain text and never reaches this state
                t.advance();
                t.emit_operator(CompareOp::Not);
                State::Empty
            }
            _ => {
                if let Some(keys) = t.keywords() {
                    if let Some(node) = keys.try_next(None, c) {
                        t.advance();
                        return State::Key { node };
                    }
                }
                if let Some(enums) = t.enumerations() {
                    if let Some(node) = enums.try_next(None, c) {
                        t.advance();
                        return State::Enumeration { node };
                    }
                }
                t.advance();
                State::PlainText
            }
        }
    }

    fn step_time_span<V: Clone>(mut acc: TimeAccumulator, t: &mut Tokenizer<'_, V>) -> State {
        // finish an in-progress unit suffix before looking at anything else
        if let Some(unit) = acc.unit_node {
            if let Some(c) = t.lookahead() {
                if let Some(next) = time::next_unit_node(Some(unit), c) {
                    t.advance();
                    acc.unit_node = Some(next);
                    return State::TimeSpan(acc);
                }
            }
            match time::unit_multiplier(unit) {
                Some(multiplier) => acc.apply_unit(multiplier),
                // dead-ended inside a unit name: the span was never a time
                None => return reclassify(t),
            }
        }

        match t.lookahead() {
            None | Some(' ') => {
                t.emit(
                    TokenKind::TimeSpan,
                    TokenContent::Duration(acc.finish()),
                    false,
                );
                State::Empty
            }
            Some(':') => {
                t.advance();
                acc.push_colon();
                State::TimeSpan(acc)
            }
            Some(c) if c.is_ascii_digit() => {
                t.advance();
                acc.push_digit(digit_value(c));
                State::TimeSpan(acc)
            }
            Some(c) => match time::next_unit_node(None, c) {
                Some(node) => {
                    t.advance();
                    acc.unit_node = Some(node);
                    State::TimeSpan(acc)
                }
                None => reclassify(t),
            },
        }
    }
}
