//! Error and success codes with classification metadata
//!
//! Single source of truth for every code this crate emits. Codes are stable
//! strings so downstream tooling can match on them.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Universal code wrapper for both error and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    High = 0,
    Medium = 1,
    Low = 2,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// Tokenizer defect codes. These mark bugs in the scanner, never user input.
pub mod tokenizing {
    use super::Code;

    pub const STEP_BUDGET_EXHAUSTED: Code = Code::new("SFQ-T001");
    pub const CURSOR_INVERTED: Code = Code::new("SFQ-T002");
    pub const STEPPED_AFTER_END: Code = Code::new("SFQ-T003");
}

/// Parsing diagnostics. Queries are never rejected; these only explain what
/// was dropped or flagged on the way to the criteria list.
pub mod parsing {
    use super::Code;

    pub const DANGLING_OPERATOR: Code = Code::new("SFQ-P001");
    pub const CRITERIA_SOFT_CAP: Code = Code::new("SFQ-P002");
}

pub mod success {
    use super::Code;

    pub const PARSE_COMPLETED: Code = Code::new("SFQ-S001");
    pub const LOGGING_INITIALIZED: Code = Code::new("SFQ-S002");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

struct CodeInfo {
    severity: Severity,
    category: &'static str,
    description: &'static str,
}

fn registry() -> &'static HashMap<&'static str, CodeInfo> {
    static REGISTRY: OnceLock<HashMap<&'static str, CodeInfo>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut map = HashMap::new();
        map.insert(
            tokenizing::STEP_BUDGET_EXHAUSTED.as_str(),
            CodeInfo {
                severity: Severity::High,
                category: "tokenizing",
                description: "Scan exceeded its step budget; stream forced to end",
            },
        );
        map.insert(
            tokenizing::CURSOR_INVERTED.as_str(),
            CodeInfo {
                severity: Severity::High,
                category: "tokenizing",
                description: "Buffer start cursor moved past the lookahead cursor",
            },
        );
        map.insert(
            tokenizing::STEPPED_AFTER_END.as_str(),
            CodeInfo {
                severity: Severity::High,
                category: "tokenizing",
                description: "State machine stepped after reaching the end state",
            },
        );
        map.insert(
            parsing::DANGLING_OPERATOR.as_str(),
            CodeInfo {
                severity: Severity::Low,
                category: "parsing",
                description: "Operator token with no usable operand was dropped",
            },
        );
        map.insert(
            parsing::CRITERIA_SOFT_CAP.as_str(),
            CodeInfo {
                severity: Severity::Medium,
                category: "parsing",
                description: "Criteria count passed the soft cap",
            },
        );
        map.insert(
            success::PARSE_COMPLETED.as_str(),
            CodeInfo {
                severity: Severity::Low,
                category: "parsing",
                description: "Query parsed into a criteria list",
            },
        );
        map.insert(
            success::LOGGING_INITIALIZED.as_str(),
            CodeInfo {
                severity: Severity::Low,
                category: "logging",
                description: "Global logging system initialized",
            },
        );
        map
    })
}

pub fn get_severity(code: &str) -> Severity {
    registry()
        .get(code)
        .map(|info| info.severity)
        .unwrap_or(Severity::Low)
}

pub fn get_category(code: &str) -> &'static str {
    registry()
        .get(code)
        .map(|info| info.category)
        .unwrap_or("unknown")
}

pub fn get_description(code: &str) -> &'static str {
    registry()
        .get(code)
        .map(|info| info.description)
        .unwrap_or("Unknown code")
}

/// Codes that indicate a bug rather than a diagnosable condition
pub fn is_defect(code: &str) -> bool {
    get_category(code) == "tokenizing" && get_severity(code) == Severity::High
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_codes_registered() {
        let codes = [
            tokenizing::STEP_BUDGET_EXHAUSTED,
            tokenizing::CURSOR_INVERTED,
            tokenizing::STEPPED_AFTER_END,
            parsing::DANGLING_OPERATOR,
            parsing::CRITERIA_SOFT_CAP,
            success::PARSE_COMPLETED,
            success::LOGGING_INITIALIZED,
        ];
        for code in codes {
            assert_ne!(
                get_description(code.as_str()),
                "Unknown code",
                "missing metadata for {}",
                code
            );
        }
    }

    #[test]
    fn test_defect_classification() {
        assert!(is_defect(tokenizing::STEP_BUDGET_EXHAUSTED.as_str()));
        assert!(!is_defect(parsing::DANGLING_OPERATOR.as_str()));
        assert!(!is_defect("SFQ-X999"));
    }
}
