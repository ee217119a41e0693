//! Shared utilities for the SFQ parser

pub mod span;

pub use span::Span;
