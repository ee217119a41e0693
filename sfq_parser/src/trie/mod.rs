//! Incremental prefix trie backing the vocabulary and time-unit tables
//!
//! The tokenizer classifies a growing buffer one character at a time, so the
//! trie exposes single-edge traversal (`try_next`) with a copyable node id as
//! the traversal state. Nodes live in an arena `Vec`; no borrows escape into
//! the scanning state machine.
//!
//! A node is complete iff a full registered word ends there. Intermediate
//! nodes on the path of a longer word are reachable but not complete, which
//! is what lets "bpm" and "bpmrange" share a prefix without ambiguity: a
//! match only finalizes on a complete node once the lookahead can no longer
//! extend the traversal.

use std::collections::HashMap;

/// Opaque handle to a trie node. Valid only for the trie that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
struct Node<V> {
    children: HashMap<char, NodeId>,
    value: Option<V>,
    terminal: bool,
}

impl<V> Node<V> {
    fn new() -> Self {
        Self {
            children: HashMap::new(),
            value: None,
            terminal: false,
        }
    }
}

/// Prefix tree with typed terminal payloads and incremental traversal.
#[derive(Debug, Clone)]
pub struct Trie<V> {
    nodes: Vec<Node<V>>,
}

impl<V> Trie<V> {
    /// Create an empty trie (root only)
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new()],
        }
    }

    fn root() -> NodeId {
        NodeId(0)
    }

    /// Register one complete word, marking its final node terminal with `payload`.
    ///
    /// Re-inserting a word replaces its payload.
    pub fn insert(&mut self, word: &str, payload: V) {
        let mut current = Self::root();
        for ch in word.chars() {
            current = match self.nodes[current.0].children.get(&ch) {
                Some(&next) => next,
                None => {
                    let next = NodeId(self.nodes.len());
                    self.nodes.push(Node::new());
                    self.nodes[current.0].children.insert(ch, next);
                    next
                }
            };
        }
        let node = &mut self.nodes[current.0];
        node.value = Some(payload);
        node.terminal = true;
    }

    /// Advance one edge from `from` (the root when `None`) without rescanning
    /// any earlier character.
    pub fn try_next(&self, from: Option<NodeId>, ch: char) -> Option<NodeId> {
        let from = from.unwrap_or_else(Self::root);
        self.nodes[from.0].children.get(&ch).copied()
    }

    /// Walk a whole buffered span from `from`. Used when an already-consumed
    /// buffer has to be re-classified mid-token; the walk is bounded by the
    /// buffer length, so total work over a scan stays linear in the input.
    pub fn try_advance(&self, from: Option<NodeId>, text: &str) -> Option<NodeId> {
        let mut current = from.unwrap_or_else(Self::root);
        for ch in text.chars() {
            current = self.try_next(Some(current), ch)?;
        }
        Some(current)
    }

    /// Whether a registered word ends exactly at `node`.
    pub fn is_complete(&self, node: NodeId) -> bool {
        self.nodes[node.0].terminal
    }

    /// Terminal payload at `node`, if a registered word ends there.
    pub fn value(&self, node: NodeId) -> Option<&V> {
        self.nodes[node.0].value.as_ref()
    }

    /// Number of registered words
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.terminal).count()
    }

    /// Check if no words are registered
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> Trie<V> {
    /// Payloads of every registered word at or below `node`, in child-order
    /// sorted by character so the result is deterministic across scans.
    pub fn collect_values(&self, node: NodeId) -> Vec<V> {
        let mut out = Vec::new();
        self.collect_into(node, &mut out);
        out
    }

    fn collect_into(&self, node: NodeId, out: &mut Vec<V>) {
        if let Some(value) = &self.nodes[node.0].value {
            out.push(value.clone());
        }
        let mut children: Vec<(char, NodeId)> = self.nodes[node.0]
            .children
            .iter()
            .map(|(&ch, &id)| (ch, id))
            .collect();
        children.sort_by_key(|&(ch, _)| ch);
        for (_, child) in children {
            self.collect_into(child, out);
        }
    }
}

impl<V> Default for Trie<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(trie: &Trie<u32>, from: Option<NodeId>, text: &str) -> Option<NodeId> {
        let mut current = from;
        for ch in text.chars() {
            current = Some(trie.try_next(current, ch)?);
        }
        current
    }

    #[test]
    fn test_shared_prefix_completeness() {
        let mut trie = Trie::new();
        trie.insert("bpm", 1u32);
        trie.insert("bpmrange", 2u32);

        // "bpm" ends on a complete node
        let bpm = walk(&trie, None, "bpm").expect("bpm path exists");
        assert!(trie.is_complete(bpm));
        assert_eq!(trie.value(bpm), Some(&1));

        // continuing with "range" reaches a second complete node
        let bpmrange = walk(&trie, Some(bpm), "range").expect("range path exists");
        assert!(trie.is_complete(bpmrange));
        assert_eq!(trie.value(bpmrange), Some(&2));

        // no intermediate node on either path is complete
        for prefix in ["b", "bp", "bpmr", "bpmra", "bpmran", "bpmrang"] {
            let node = walk(&trie, None, prefix).expect("prefix path exists");
            assert!(!trie.is_complete(node), "prefix {:?} must not be complete", prefix);
        }
    }

    #[test]
    fn test_try_next_miss() {
        let mut trie = Trie::new();
        trie.insert("bpm", 1u32);
        assert!(trie.try_next(None, 'x').is_none());
        let b = trie.try_next(None, 'b').unwrap();
        assert!(trie.try_next(Some(b), 'x').is_none());
    }

    #[test]
    fn test_try_advance_matches_stepwise_walk() {
        let mut trie = Trie::new();
        trie.insert("length", 7u32);
        assert_eq!(trie.try_advance(None, "len"), walk(&trie, None, "len"));
        assert_eq!(trie.try_advance(None, "length"), walk(&trie, None, "length"));
        assert!(trie.try_advance(None, "lengths").is_none());
    }

    #[test]
    fn test_collect_values_is_sorted_and_complete() {
        let mut trie = Trie::new();
        trie.insert("insane", 1u32);
        trie.insert("impossible", 2u32);
        trie.insert("intermediate", 3u32);

        let i = trie.try_next(None, 'i').unwrap();
        // 'm' sorts before 'n', and under "in" the 's' of "insane" sorts
        // before the 't' of "intermediate"
        assert_eq!(trie.collect_values(i), vec![2, 1, 3]);

        let im = trie.try_advance(None, "im").unwrap();
        assert_eq!(trie.collect_values(im), vec![2]);
    }

    #[test]
    fn test_reinsert_replaces_payload() {
        let mut trie = Trie::new();
        trie.insert("bpm", 1u32);
        trie.insert("bpm", 9u32);
        let node = trie.try_advance(None, "bpm").unwrap();
        assert_eq!(trie.value(node), Some(&9));
        assert_eq!(trie.len(), 1);
    }
}
