//! Internal defect conditions of the scanner
//!
//! The query grammar has no reject state; malformed input degrades to plain
//! text. The conditions below are bugs in the scanner itself: they are
//! logged with a code and asserted in debug builds, and the stream degrades
//! to End instead of surfacing a parse failure.

use crate::logging::codes::{self, Code};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizerDefect {
    #[error("step budget exhausted after {steps} steps over a {input_len}-byte input")]
    StepBudgetExhausted { steps: u64, input_len: usize },

    #[error("buffer start {start} is past lookahead {lookahead}")]
    CursorInverted { start: usize, lookahead: usize },

    #[error("state machine stepped after reaching the end state")]
    SteppedAfterEnd,
}

impl TokenizerDefect {
    pub fn code(&self) -> Code {
        match self {
            TokenizerDefect::StepBudgetExhausted { .. } => {
                codes::tokenizing::STEP_BUDGET_EXHAUSTED
            }
            TokenizerDefect::CursorInverted { .. } => codes::tokenizing::CURSOR_INVERTED,
            TokenizerDefect::SteppedAfterEnd => codes::tokenizing::STEPPED_AFTER_END,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defect_codes_and_messages() {
        let defect = TokenizerDefect::StepBudgetExhausted {
            steps: 99,
            input_len: 4,
        };
        assert_eq!(defect.code().as_str(), "SFQ-T001");
        assert!(defect.to_string().contains("99 steps"));

        let defect = TokenizerDefect::CursorInverted {
            start: 5,
            lookahead: 3,
        };
        assert_eq!(defect.code().as_str(), "SFQ-T002");

        assert_eq!(TokenizerDefect::SteppedAfterEnd.code().as_str(), "SFQ-T003");
    }
}
