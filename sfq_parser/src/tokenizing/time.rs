//! Recognized time-unit suffixes
//!
//! Unit suffixes live in a static trie so the scanner can probe them one
//! character at a time exactly like the vocabulary tries. Multipliers are in
//! seconds. Colon chains (`2:30`) are handled positionally by the time-span
//! state and do not appear here.

use crate::trie::{NodeId, Trie};
use std::sync::OnceLock;

/// Unit suffix -> multiplier in seconds
pub const TIME_UNITS: &[(&str, u64)] = &[("s", 1), ("m", 60), ("h", 3600), ("d", 86400)];

static UNIT_TRIE: OnceLock<Trie<u64>> = OnceLock::new();

/// The shared unit trie, built on first use
pub(crate) fn unit_trie() -> &'static Trie<u64> {
    UNIT_TRIE.get_or_init(|| {
        let mut trie = Trie::new();
        for &(unit, multiplier) in TIME_UNITS {
            trie.insert(unit, multiplier);
        }
        trie
    })
}

/// Whether `ch` begins a recognized unit suffix
pub(crate) fn starts_unit(ch: char) -> bool {
    unit_trie().try_next(None, ch).is_some()
}

/// Advance one edge through the unit trie
pub(crate) fn next_unit_node(from: Option<NodeId>, ch: char) -> Option<NodeId> {
    unit_trie().try_next(from, ch)
}

/// Multiplier registered at `node`, if a full unit ends there
pub(crate) fn unit_multiplier(node: NodeId) -> Option<u64> {
    unit_trie().value(node).copied()
}
