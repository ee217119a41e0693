//! The tokenizer driver
//!
//! Owns the cursor over the source, the pending token queue, and the current
//! machine state. Tokens are produced lazily: `next_token` steps the state
//! machine only until something lands in the queue, so callers that stop
//! early never pay for the rest of the input.

use crate::config::compile_time::lexical::{STEP_BUDGET_BASE, STEP_BUDGET_PER_BYTE};
use crate::config::TokenizerPreferences;
use crate::tokenizing::error::TokenizerDefect;
use crate::tokenizing::state::State;
use crate::tokens::{CompareOp, Token, TokenContent, TokenKind};
use crate::trie::Trie;
use crate::utils::Span;
use crate::{log_debug, log_error};
use std::collections::VecDeque;

/// Which trie families the scanner consults when classifying a word.
/// Plain text is always the fallback regardless of mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolveMode {
    #[default]
    Both,
    Keys,
    Enumerations,
    Neither,
}

impl ResolveMode {
    pub fn keys_enabled(self) -> bool {
        matches!(self, ResolveMode::Both | ResolveMode::Keys)
    }

    pub fn enumerations_enabled(self) -> bool {
        matches!(self, ResolveMode::Both | ResolveMode::Enumerations)
    }
}

/// The key and enumeration tries a tokenizer scans against. Both carry the
/// same payload type so a caller can funnel either into one criterion model.
#[derive(Debug, Clone)]
pub struct Vocabulary<V> {
    keys: Trie<V>,
    enumerations: Trie<V>,
}

impl<V> Vocabulary<V> {
    pub fn new() -> Self {
        Self {
            keys: Trie::new(),
            enumerations: Trie::new(),
        }
    }

    pub fn add_key(&mut self, word: &str, payload: V) {
        self.keys.insert(word, payload);
    }

    pub fn add_enumeration(&mut self, word: &str, payload: V) {
        self.enumerations.insert(word, payload);
    }

    pub fn keys(&self) -> &Trie<V> {
        &self.keys
    }

    pub fn enumerations(&self) -> &Trie<V> {
        &self.enumerations
    }
}

impl<V> Default for Vocabulary<V> {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-run counters, filled in as tokens are handed out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizerMetrics {
    pub total_tokens: usize,
    pub integer_tokens: usize,
    pub percentage_tokens: usize,
    pub real_tokens: usize,
    pub time_span_tokens: usize,
    pub key_tokens: usize,
    pub enumeration_tokens: usize,
    pub plain_text_tokens: usize,
    pub operator_tokens: usize,
    pub steps: u64,
}

impl TokenizerMetrics {
    fn record_token(&mut self, kind: TokenKind) {
        if kind == TokenKind::End {
            return;
        }
        self.total_tokens += 1;
        match kind {
            TokenKind::Integer => self.integer_tokens += 1,
            TokenKind::Percentage => self.percentage_tokens += 1,
            TokenKind::Real => self.real_tokens += 1,
            TokenKind::TimeSpan => self.time_span_tokens += 1,
            TokenKind::Key => self.key_tokens += 1,
            TokenKind::EnumerationValue => self.enumeration_tokens += 1,
            TokenKind::PlainText => self.plain_text_tokens += 1,
            TokenKind::Operator => self.operator_tokens += 1,
            TokenKind::End => {}
        }
    }
}

/// Single-pass scanner over one source string.
///
/// The cursor is a pair of byte offsets: `start..lookahead` is the buffered
/// span of the token under construction, and the character at `lookahead`
/// (or the virtual terminator at end of input) is what the state machine
/// inspects next. Both offsets only ever move forward.
pub struct Tokenizer<'s, V> {
    source: &'s str,
    vocabulary: &'s Vocabulary<V>,
    resolve_mode: ResolveMode,
    preferences: TokenizerPreferences,
    start: usize,
    lookahead: usize,
    pending: VecDeque<Token<V>>,
    state: State,
    steps: u64,
    step_budget: u64,
    exhausted: bool,
    metrics: TokenizerMetrics,
}

impl<'s, V> Tokenizer<'s, V> {
    pub fn new(source: &'s str, vocabulary: &'s Vocabulary<V>) -> Self {
        Self::with_preferences(source, vocabulary, TokenizerPreferences::default())
    }

    pub fn with_preferences(
        source: &'s str,
        vocabulary: &'s Vocabulary<V>,
        preferences: TokenizerPreferences,
    ) -> Self {
        let step_budget = preferences.step_budget_override.unwrap_or(
            STEP_BUDGET_BASE + STEP_BUDGET_PER_BYTE * source.len() as u64,
        );
        Self {
            source,
            vocabulary,
            resolve_mode: ResolveMode::default(),
            preferences,
            start: 0,
            lookahead: 0,
            pending: VecDeque::new(),
            state: State::Empty,
            steps: 0,
            step_budget,
            exhausted: false,
            metrics: TokenizerMetrics::default(),
        }
    }

    pub fn set_resolve_mode(&mut self, mode: ResolveMode) {
        self.resolve_mode = mode;
    }

    pub fn resolve_mode(&self) -> ResolveMode {
        self.resolve_mode
    }

    pub fn source(&self) -> &'s str {
        self.source
    }

    pub fn metrics(&self) -> &TokenizerMetrics {
        &self.metrics
    }

    /// The character under the cursor; `None` is the virtual terminator at
    /// end of input, which behaves as a permanent separator
    pub(crate) fn lookahead(&self) -> Option<char> {
        self.source[self.lookahead..].chars().next()
    }

    /// Consume the lookahead character into the buffer. Saturates at end of
    /// input.
    pub(crate) fn advance(&mut self) {
        if let Some(c) = self.lookahead() {
            self.lookahead += c.len_utf8();
        }
    }

    /// Drop the buffered span without emitting anything
    pub(crate) fn discard_buffer(&mut self) {
        self.start = self.lookahead;
    }

    /// The span consumed so far for the token under construction
    pub(crate) fn buffer(&self) -> &'s str {
        debug_assert!(self.start <= self.lookahead, "cursor inverted");
        &self.source[self.start..self.lookahead]
    }

    pub(crate) fn keyword_trie(&self) -> &'s Trie<V> {
        self.vocabulary.keys()
    }

    pub(crate) fn enumeration_trie(&self) -> &'s Trie<V> {
        self.vocabulary.enumerations()
    }

    /// Keyword trie, gated by the resolve mode
    pub(crate) fn keywords(&self) -> Option<&'s Trie<V>> {
        self.resolve_mode.keys_enabled().then(|| self.keyword_trie())
    }

    /// Enumeration trie, gated by the resolve mode
    pub(crate) fn enumerations(&self) -> Option<&'s Trie<V>> {
        self.resolve_mode
            .enumerations_enabled()
            .then(|| self.enumeration_trie())
    }

    /// Record a scanner defect. Defects are bugs in the scanner, not in the
    /// input; they are logged and asserted but never surfaced as failures.
    pub(crate) fn record_defect(&self, defect: TokenizerDefect) {
        log_error!(
            defect.code(),
            "tokenizer defect",
            "detail" => &defect,
            "source_len" => self.source.len(),
            "lookahead" => self.lookahead
        );
        debug_assert!(
            matches!(defect, TokenizerDefect::StepBudgetExhausted { .. }),
            "tokenizer defect: {defect}"
        );
    }

    /// Queue a finished token covering the buffered span, then reset the
    /// buffer to start the next one
    pub(crate) fn emit(&mut self, kind: TokenKind, content: TokenContent<V>, complete: bool) {
        if self.start > self.lookahead {
            self.record_defect(TokenizerDefect::CursorInverted {
                start: self.start,
                lookahead: self.lookahead,
            });
            self.start = self.lookahead;
        }
        let span = Span::new(self.start, self.lookahead);
        self.discard_buffer();
        self.pending
            .push_back(Token::new(kind, span, content).with_complete_match(complete));
    }

    pub(crate) fn emit_operator(&mut self, op: CompareOp) {
        self.emit(TokenKind::Operator, TokenContent::Operator(op), false);
    }

    fn end_token(&self) -> Token<V> {
        Token::new(
            TokenKind::End,
            Span::empty_at(self.source.len()),
            TokenContent::None,
        )
    }
}

impl<'s, V: Clone> Tokenizer<'s, V> {
    /// Produce the next token, stepping the machine as far as needed. After
    /// the input is exhausted this returns End tokens forever.
    pub fn next_token(&mut self) -> Token<V> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                if self.preferences.track_token_metrics {
                    self.metrics.record_token(token.kind);
                }
                return token;
            }
            if matches!(self.state, State::End) {
                return self.end_token();
            }
            if self.steps >= self.step_budget {
                self.record_defect(TokenizerDefect::StepBudgetExhausted {
                    steps: self.steps,
                    input_len: self.source.len(),
                });
                self.state = State::End;
                continue;
            }
            self.steps += 1;
            self.metrics.steps = self.steps;

            let state = std::mem::replace(&mut self.state, State::End);
            let next = state.step(self);
            if self.preferences.log_state_transitions {
                log_debug!(
                    "tokenizer transition",
                    "state" => next.name(),
                    "lookahead" => self.lookahead
                );
            }
            self.state = next;
        }
    }
}

impl<'s, V: Clone> Iterator for Tokenizer<'s, V> {
    type Item = Token<V>;

    /// Yields every token including the final End, then `None`
    fn next(&mut self) -> Option<Token<V>> {
        if self.exhausted {
            return None;
        }
        let token = self.next_token();
        if token.is_end() {
            self.exhausted = true;
        }
        Some(token)
    }
}

/// Split `text` into plain-text tokens on single spaces, bypassing the state
/// machine entirely. Spans are offset by `base_offset` so tokens re-tokenized
/// out of a larger source keep their original positions.
pub fn plain_text_tokens<V>(text: &str, base_offset: usize) -> Vec<Token<V>> {
    let mut tokens = Vec::new();
    let mut start = 0usize;
    while start <= text.len() {
        let rest = &text[start..];
        let segment_len = rest.find(' ').unwrap_or(rest.len());
        if segment_len > 0 {
            let segment = &text[start..start + segment_len];
            tokens.push(Token::new(
                TokenKind::PlainText,
                Span::new(base_offset + start, base_offset + start + segment_len),
                TokenContent::Text(segment.to_string()),
            ));
        }
        start += segment_len + 1;
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::time::Duration;

    fn vocabulary() -> Vocabulary<&'static str> {
        let mut v = Vocabulary::new();
        v.add_key("bpm", "bpm");
        v.add_key("bpmrange", "bpmrange");
        v.add_key("artist", "artist");
        v.add_key("length", "length");
        v.add_enumeration("easy", "easy");
        v.add_enumeration("extreme", "extreme");
        v.add_enumeration("4k", "4k");
        v
    }

    fn tokenize(source: &str) -> Vec<Token<&'static str>> {
        let v = vocabulary();
        let mut tokenizer = Tokenizer::new(source, &v);
        let mut tokens = Vec::new();
        loop {
            let token = tokenizer.next_token();
            let done = token.is_end();
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    #[test]
    fn test_empty_input_yields_end_only() {
        let tokens = tokenize("");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].kind, TokenKind::End);
        assert_eq!(tokens[0].span, Span::empty_at(0));
    }

    #[test]
    fn test_integer() {
        let tokens = tokenize("123");
        assert_eq!(tokens[0].kind, TokenKind::Integer);
        assert_matches!(tokens[0].content, TokenContent::Integer(123));
        assert_eq!(tokens[0].span, Span::new(0, 3));
    }

    #[test]
    fn test_percentage() {
        let tokens = tokenize("123%");
        assert_eq!(tokens[0].kind, TokenKind::Percentage);
        assert_matches!(tokens[0].content, TokenContent::Integer(123));
        assert_eq!(tokens[0].span, Span::new(0, 4));
    }

    #[test]
    fn test_real() {
        let tokens = tokenize("123.5");
        assert_eq!(tokens[0].kind, TokenKind::Real);
        assert_matches!(tokens[0].content, TokenContent::Real(v) if (v - 123.5).abs() < 1e-9);
    }

    #[test]
    fn test_colon_time_span() {
        let tokens = tokenize("2:30");
        assert_eq!(tokens[0].kind, TokenKind::TimeSpan);
        assert_eq!(tokens[0].as_duration(), Some(Duration::from_secs(150)));
    }

    #[test]
    fn test_unit_time_spans() {
        let tokens = tokenize("90s");
        assert_eq!(tokens[0].as_duration(), Some(Duration::from_secs(90)));

        let tokens = tokenize("10m");
        assert_eq!(tokens[0].as_duration(), Some(Duration::from_secs(600)));

        let tokens = tokenize("1m30s");
        assert_eq!(tokens[0].as_duration(), Some(Duration::from_secs(90)));

        let tokens = tokenize("1:2:30");
        assert_eq!(tokens[0].as_duration(), Some(Duration::from_secs(3750)));
    }

    #[test]
    fn test_key_and_operator_and_value() {
        let tokens = tokenize("bpm:180");
        assert_eq!(tokens[0].kind, TokenKind::Key);
        assert_matches!(tokens[0].content, TokenContent::Vocabulary("bpm"));
        assert!(tokens[0].is_complete_match);
        assert_eq!(tokens[1].as_operator(), Some(CompareOp::Contains));
        assert_matches!(tokens[2].content, TokenContent::Integer(180));
        assert_eq!(tokens[3].kind, TokenKind::End);
    }

    #[test]
    fn test_two_character_operators() {
        let tokens = tokenize("length>=2:30");
        assert_matches!(tokens[0].content, TokenContent::Vocabulary("length"));
        assert_eq!(tokens[1].as_operator(), Some(CompareOp::GreaterEq));
        assert_eq!(tokens[2].as_duration(), Some(Duration::from_secs(150)));

        let tokens = tokenize("bpm!=180");
        assert_eq!(tokens[1].as_operator(), Some(CompareOp::NotEq));

        let tokens = tokenize("bpm==180");
        assert_eq!(tokens[1].as_operator(), Some(CompareOp::Eq));
        assert_eq!(tokens[1].span, Span::new(3, 5));
    }

    #[test]
    fn test_negation_marker() {
        let tokens = tokenize("-bpm:180");
        assert_eq!(tokens[0].as_operator(), Some(CompareOp::Not));
        assert_matches!(tokens[1].content, TokenContent::Vocabulary("bpm"));
    }

    #[test]
    fn test_lone_bang_is_plain_text() {
        let tokens = tokenize("!loud");
        assert_eq!(tokens[0].kind, TokenKind::PlainText);
        assert_matches!(tokens[0].content, TokenContent::Text(ref s) if s == "!loud");
    }

    #[test]
    fn test_keyword_prefix_divergence_falls_back() {
        // "bpmx" walks the keyword trie to the complete node for "bpm" and
        // dead-ends on 'x'; the complete node wins, 'x' starts a new token
        let tokens = tokenize("bpmx");
        assert_matches!(tokens[0].content, TokenContent::Vocabulary("bpm"));
        assert_eq!(tokens[1].kind, TokenKind::PlainText);
        assert_matches!(tokens[1].content, TokenContent::Text(ref s) if s == "x");
    }

    #[test]
    fn test_longest_keyword_wins_when_input_continues() {
        let tokens = tokenize("bpmrange:100");
        assert_matches!(tokens[0].content, TokenContent::Vocabulary("bpmrange"));
        assert_eq!(tokens[0].span, Span::new(0, 8));
    }

    #[test]
    fn test_enumeration_value() {
        let tokens = tokenize("easy");
        assert_eq!(tokens[0].kind, TokenKind::EnumerationValue);
        assert_matches!(tokens[0].content, TokenContent::Vocabulary("easy"));
        assert!(tokens[0].is_complete_match);
    }

    #[test]
    fn test_enumeration_prefix_yields_candidates() {
        let tokens = tokenize("ea");
        assert_eq!(tokens[0].kind, TokenKind::EnumerationValue);
        assert!(!tokens[0].is_complete_match);
        assert_matches!(
            tokens[0].content,
            TokenContent::Candidates(ref c) if c == &["easy"]
        );

        let tokens = tokenize("e");
        assert_matches!(
            tokens[0].content,
            TokenContent::Candidates(ref c) if c == &["easy", "extreme"]
        );
    }

    #[test]
    fn test_digit_leading_enumeration() {
        // "4k" starts as an integer and re-classifies once 'k' arrives
        let tokens = tokenize("4k");
        assert_eq!(tokens[0].kind, TokenKind::EnumerationValue);
        assert_matches!(tokens[0].content, TokenContent::Vocabulary("4k"));
    }

    #[test]
    fn test_unknown_word_is_plain_text() {
        let tokens = tokenize("zzz");
        assert_eq!(tokens[0].kind, TokenKind::PlainText);
        assert_matches!(tokens[0].content, TokenContent::Text(ref s) if s == "zzz");
    }

    #[test]
    fn test_resolve_mode_gates_tries() {
        let v = vocabulary();

        let mut tokenizer = Tokenizer::new("bpm", &v);
        tokenizer.set_resolve_mode(ResolveMode::Neither);
        let token = tokenizer.next_token();
        assert_eq!(token.kind, TokenKind::PlainText);

        let mut tokenizer = Tokenizer::new("easy", &v);
        tokenizer.set_resolve_mode(ResolveMode::Keys);
        let token = tokenizer.next_token();
        assert_eq!(token.kind, TokenKind::PlainText);

        let mut tokenizer = Tokenizer::new("easy", &v);
        tokenizer.set_resolve_mode(ResolveMode::Enumerations);
        let token = tokenizer.next_token();
        assert_eq!(token.kind, TokenKind::EnumerationValue);
    }

    #[test]
    fn test_spans_reconstruct_source() {
        let source = "-artist:foo  bpm>=180 2:30 easy ea 50% zzz!";
        let tokens = tokenize(source);
        let mut rebuilt = String::new();
        let mut cursor = 0;
        for token in &tokens {
            assert!(token.span.start >= cursor, "spans must not overlap");
            for _ in cursor..token.span.start {
                rebuilt.push(' ');
            }
            rebuilt.push_str(token.span.slice(source));
            cursor = token.span.end;
        }
        for _ in cursor..source.len() {
            rebuilt.push(' ');
        }
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_iterator_stops_after_end() {
        let v = vocabulary();
        let tokenizer = Tokenizer::new("bpm:180", &v);
        let tokens: Vec<_> = tokenizer.collect();
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::End));
        assert_eq!(tokens.iter().filter(|t| t.is_end()).count(), 1);
    }

    #[test]
    fn test_determinism() {
        let source = "bpm:180 -artist:foo e 2:30";
        assert_eq!(tokenize(source), tokenize(source));
    }

    #[test]
    fn test_metrics() {
        let v = vocabulary();
        let mut tokenizer = Tokenizer::new("bpm:180 easy", &v);
        while !tokenizer.next_token().is_end() {}
        let metrics = tokenizer.metrics();
        assert_eq!(metrics.total_tokens, 4);
        assert_eq!(metrics.key_tokens, 1);
        assert_eq!(metrics.operator_tokens, 1);
        assert_eq!(metrics.integer_tokens, 1);
        assert_eq!(metrics.enumeration_tokens, 1);
        assert!(metrics.steps > 0);
    }

    #[test]
    fn test_step_budget_degrades_to_end() {
        let v = vocabulary();
        let preferences = TokenizerPreferences {
            step_budget_override: Some(3),
            ..TokenizerPreferences::default()
        };
        let mut tokenizer = Tokenizer::with_preferences("bpm:180 easy 2:30", &v, preferences);
        // the budget runs out long before the input does; the stream must
        // still terminate with End rather than hang or panic
        let mut count = 0;
        while !tokenizer.next_token().is_end() {
            count += 1;
            assert!(count < 100);
        }
    }

    #[test]
    fn test_plain_text_tokens_helper() {
        let tokens: Vec<Token<&'static str>> = plain_text_tokens("foo  bar", 10);
        assert_eq!(tokens.len(), 2);
        assert_matches!(tokens[0].content, TokenContent::Text(ref s) if s == "foo");
        assert_eq!(tokens[0].span, Span::new(10, 13));
        assert_matches!(tokens[1].content, TokenContent::Text(ref s) if s == "bar");
        assert_eq!(tokens[1].span, Span::new(15, 18));

        let tokens: Vec<Token<&'static str>> = plain_text_tokens("", 0);
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_end_of_input_terminates_every_accumulating_state() {
        // each accumulating state must emit at the virtual terminator, not
        // just at a space
        let tokens = tokenize("7");
        assert_matches!(tokens[0].content, TokenContent::Integer(7));
        assert_eq!(tokens[1].kind, TokenKind::End);

        let tokens = tokenize("7.5");
        assert_matches!(tokens[0].content, TokenContent::Real(v) if (v - 7.5).abs() < 1e-9);
        assert_eq!(tokens[1].kind, TokenKind::End);

        let tokens = tokenize("1:05");
        assert_eq!(tokens[0].as_duration(), Some(Duration::from_secs(65)));
        assert_eq!(tokens[1].kind, TokenKind::End);

        let tokens = tokenize("zzz");
        assert_matches!(tokens[0].content, TokenContent::Text(ref s) if s == "zzz");
        assert_eq!(tokens[1].kind, TokenKind::End);
    }

    #[test]
    fn test_multibyte_input_stays_on_char_boundaries() {
        let tokens = tokenize("héllo 123");
        assert_eq!(tokens[0].kind, TokenKind::PlainText);
        assert_matches!(tokens[0].content, TokenContent::Text(ref s) if s == "héllo");
        assert_matches!(tokens[1].content, TokenContent::Integer(123));
    }
}
