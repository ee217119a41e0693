pub mod compile_time {
    pub mod lexical {
        /// Fixed step allowance independent of input length
        /// HARDENING: lets the empty input and tiny queries finish their
        /// bookkeeping transitions without tripping the budget
        pub const STEP_BUDGET_BASE: u64 = 16;

        /// Step allowance per source byte
        /// HARDENING: every transition either consumes a character or is one
        /// of a bounded number of re-classification/emit steps; a scan that
        /// exceeds this multiple of the input length is a defective state
        /// machine, not a slow query
        pub const STEP_BUDGET_PER_BYTE: u64 = 8;
    }

    pub mod parsing {
        /// Criteria count past which the parser logs a warning
        /// RESOURCE: queries are typed by humans; thousands of predicates is
        /// a sign of machine-generated input worth flagging, never an error
        pub const CRITERIA_SOFT_CAP: usize = 10_000;
    }

    pub mod logging {
        /// Maximum events retained by the in-memory test logger
        /// RESOURCE: bounds memory when a misbehaving test loops on logging
        pub const LOG_BUFFER_SIZE: usize = 1000;
    }
}

#[cfg(test)]
mod tests {
    use super::compile_time::*;

    #[test]
    fn test_step_budget_covers_empty_input() {
        // empty input still needs the Empty -> End transition plus slack
        assert!(lexical::STEP_BUDGET_BASE >= 2);
    }

    #[test]
    fn test_step_budget_covers_worst_case_transitions() {
        // consume + emit + reclassify chain (key -> enumeration -> plain
        // text) stays under the per-byte allowance
        assert!(lexical::STEP_BUDGET_PER_BYTE >= 4);
    }

    #[test]
    fn test_caps_are_nonzero() {
        assert!(parsing::CRITERIA_SOFT_CAP > 0);
        assert!(logging::LOG_BUFFER_SIZE > 0);
    }
}
