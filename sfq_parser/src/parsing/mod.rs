//! Criterion assembly over the token stream

pub mod criterion;
pub mod parser;

pub use criterion::{SearchCriterion, TokenRange};
pub use parser::{parse_criteria, CriterionParser};
