//! Aho-Corasick automaton over the DNA alphabet
//!
//! The automaton is an arena of nodes indexed by [`NodeId`]; failure links are
//! ids, never ownership, so the built structure has no cycles to manage and can
//! be shared freely between scan contexts. Children are a direct-addressed
//! table over the five-letter alphabet `A, C, G, T, N`.
//!
//! # Partitioned seeds
//!
//! Approximate matching with up to `k` mismatches (`k` in `{1, 2}`) is driven
//! by the pigeonhole principle: every adapter is split into `k + 1` contiguous
//! seeds, and an occurrence with at most `k` mismatches must contain at least
//! one exactly-matching seed. The builder inserts each seed as an independent
//! root-rooted path and records `(pattern id, seed end offset)` on the node
//! that completes it; the scanner collects these records and verifies the
//! implied placements (see [`crate::scan`]).

use crate::error::{Result, SiftError};
use crate::pattern::{Pattern, PatternKind, PatternTable};
use std::collections::VecDeque;

/// Index of a node in the automaton arena
pub type NodeId = u32;

/// The arena index of the root node
pub const ROOT: NodeId = 0;

const ALPHABET: usize = 5;

/// Map an uppercase base to its child-table slot
#[inline]
fn base_index(c: u8) -> Option<usize> {
    match c {
        b'A' => Some(0),
        b'C' => Some(1),
        b'G' => Some(2),
        b'T' => Some(3),
        b'N' => Some(4),
        _ => None,
    }
}

/// Seed end offsets for an adapter of length `len` at the given mismatch budget
///
/// Coincident offsets (possible for very short patterns) are collapsed.
pub(crate) fn seed_ends(len: usize, errors: u8) -> Vec<usize> {
    let mut ends = match errors {
        1 => vec![len / 2, len - 1],
        2 => vec![len / 3, len * 2 / 3, len - 1],
        _ => Vec::new(),
    };
    ends.dedup();
    ends
}

/// A single automaton vertex
#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// Direct-addressed transitions, one slot per base
    pub(crate) children: [Option<NodeId>; ALPHABET],
    /// Failure link; the root fails to itself
    pub(crate) fail: NodeId,
    /// Pattern kind completed at this node, if any
    pub(crate) terminal: Option<PatternKind>,
    /// `(pid, seed_end_offset)` records, sorted by `(pid, seed_end_offset)`
    pub(crate) seed_hits: Vec<(u32, u32)>,
}

impl Node {
    fn new() -> Self {
        Self {
            children: [None; ALPHABET],
            fail: ROOT,
            terminal: None,
            seed_hits: Vec::new(),
        }
    }
}

/// Pattern data the automaton retains for placement verification
#[derive(Debug, Clone)]
struct StoredPattern {
    bytes: Box<[u8]>,
    seed_ends: Box<[u32]>,
}

/// Builder for the automaton
///
/// Insert every pattern, then call [`AutomatonBuilder::build`] to wire the
/// failure links. The common path is [`Automaton::build`], which does both
/// from a frozen [`PatternTable`].
pub struct AutomatonBuilder {
    nodes: Vec<Node>,
    patterns: Vec<StoredPattern>,
    errors: u8,
}

impl AutomatonBuilder {
    /// Create a builder for the given mismatch budget
    ///
    /// Budgets other than 0, 1 or 2 are rejected.
    pub fn new(errors: u8) -> Result<Self> {
        if errors > 2 {
            return Err(SiftError::Config(format!(
                "possible errors count are 0, 1, 2 (got {})",
                errors
            )));
        }
        Ok(Self {
            nodes: vec![Node::new()],
            patterns: Vec::new(),
            errors,
        })
    }

    /// Insert one pattern, assigning it the next pattern id
    ///
    /// Non-adapter patterns only get a terminal mark; adapters additionally
    /// get seed records when the budget is positive. Each non-final seed
    /// resets the walk to the root, so seeds form independent paths.
    pub fn insert(&mut self, pattern: &Pattern) -> Result<()> {
        let pid = self.patterns.len() as u32;
        let bytes = pattern.bytes();
        let len = bytes.len();

        let ends = if pattern.kind() == PatternKind::Adapter && self.errors > 0 {
            seed_ends(len, self.errors)
        } else {
            Vec::new()
        };
        let mut next_end = 0usize;

        let mut curr = ROOT;
        for (j, &b) in bytes.iter().enumerate() {
            let idx = base_index(b).ok_or_else(|| {
                SiftError::Config(format!("invalid base '{}' in pattern", b as char))
            })?;
            curr = self.walk_or_extend(curr, idx);
            if j == len - 1 {
                self.nodes[curr as usize].terminal = Some(pattern.kind());
            }
            if next_end < ends.len() && j == ends[next_end] {
                self.nodes[curr as usize].seed_hits.push((pid, j as u32));
                next_end += 1;
                if j != len - 1 {
                    curr = ROOT;
                }
            }
        }

        self.patterns.push(StoredPattern {
            bytes: bytes.into(),
            seed_ends: ends.iter().map(|&e| e as u32).collect(),
        });
        Ok(())
    }

    fn walk_or_extend(&mut self, curr: NodeId, idx: usize) -> NodeId {
        if let Some(next) = self.nodes[curr as usize].children[idx] {
            return next;
        }
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node::new());
        self.nodes[curr as usize].children[idx] = Some(id);
        id
    }

    /// Wire the failure links and freeze the automaton
    ///
    /// Links are computed breadth-first: a node's failure target is the
    /// longest proper suffix of its path that is also a path in the trie.
    pub fn build(mut self) -> Automaton {
        let mut queue = VecDeque::new();

        // Depth-1 nodes fail to the root
        for idx in 0..ALPHABET {
            if let Some(child) = self.nodes[ROOT as usize].children[idx] {
                self.nodes[child as usize].fail = ROOT;
                queue.push_back(child);
            }
        }

        while let Some(v) = queue.pop_front() {
            for idx in 0..ALPHABET {
                let Some(w) = self.nodes[v as usize].children[idx] else {
                    continue;
                };
                queue.push_back(w);

                let mut f = self.nodes[v as usize].fail;
                self.nodes[w as usize].fail = loop {
                    if let Some(u) = self.nodes[f as usize].children[idx] {
                        break u;
                    }
                    if f == ROOT {
                        break ROOT;
                    }
                    f = self.nodes[f as usize].fail;
                };
            }
        }

        // Sorted seed records permit binary search during verification
        for node in &mut self.nodes {
            node.seed_hits.sort_unstable();
        }

        Automaton {
            nodes: self.nodes,
            patterns: self.patterns,
            errors: self.errors,
        }
    }
}

/// Immutable matching automaton
///
/// Built once from a frozen pattern table; read-only afterwards, so it may be
/// shared across any number of concurrent scan contexts without
/// synchronization.
pub struct Automaton {
    nodes: Vec<Node>,
    patterns: Vec<StoredPattern>,
    errors: u8,
}

impl Automaton {
    /// Build the automaton for every pattern in the table
    pub fn build(table: &PatternTable, errors: u8) -> Result<Self> {
        let mut builder = AutomatonBuilder::new(errors)?;
        for (_, pattern) in table.iter() {
            builder.insert(pattern)?;
        }
        Ok(builder.build())
    }

    /// Advance from `curr` on input base `c` (already upper-cased)
    ///
    /// Follows failure links until a transition exists; bases outside the
    /// alphabet reset to the root. Amortized O(1) per input character.
    #[inline]
    pub(crate) fn step(&self, mut curr: NodeId, c: u8) -> NodeId {
        let Some(idx) = base_index(c) else {
            return ROOT;
        };
        loop {
            if let Some(next) = self.nodes[curr as usize].children[idx] {
                return next;
            }
            if curr == ROOT {
                return ROOT;
            }
            curr = self.nodes[curr as usize].fail;
        }
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    /// Mismatch budget the automaton was built for
    pub fn errors(&self) -> u8 {
        self.errors
    }

    /// Number of nodes in the arena (including the root)
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of patterns the automaton was built from
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    #[inline]
    pub(crate) fn pattern_bytes(&self, pid: u32) -> &[u8] {
        &self.patterns[pid as usize].bytes
    }

    /// Seed end offsets of a pattern (empty for non-adapters or a zero budget)
    #[inline]
    pub(crate) fn pattern_seed_ends(&self, pid: u32) -> &[u32] {
        &self.patterns[pid as usize].seed_ends
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(adapters: &[&str]) -> PatternTable {
        PatternTable::from_adapters(adapters, 0).unwrap()
    }

    #[test]
    fn test_seed_ends_one_error() {
        assert_eq!(seed_ends(13, 1), vec![6, 12]);
        assert_eq!(seed_ends(8, 1), vec![4, 7]);
    }

    #[test]
    fn test_seed_ends_two_errors() {
        assert_eq!(seed_ends(13, 2), vec![4, 8, 12]);
        assert_eq!(seed_ends(6, 2), vec![2, 4, 5]);
    }

    #[test]
    fn test_seed_ends_degenerate_dedup() {
        // L = 2 with one error: both offsets collapse to 1
        assert_eq!(seed_ends(2, 1), vec![1]);
        // L = 3 with two errors: 1, 2, 2 collapses to 1, 2
        assert_eq!(seed_ends(3, 2), vec![1, 2]);
    }

    #[test]
    fn test_exact_build_shares_prefixes() {
        let aut = Automaton::build(&table(&["ACGT", "ACGA"]), 0).unwrap();
        // Root + shared ACG + two leaves + the injected NN path
        assert_eq!(aut.node_count(), 8);
    }

    #[test]
    fn test_seed_paths_are_root_rooted() {
        // "ACGTAC" with one error splits at offsets 3 and 5: the trie holds
        // the prefix path ACGT and an independent path AC, which here shares
        // the existing A-C prefix.
        let exact = Automaton::build(&table(&["ACGTAC"]), 0).unwrap();
        let seeded = Automaton::build(&table(&["ACGTAC"]), 1).unwrap();
        assert!(seeded.node_count() < exact.node_count());
    }

    #[test]
    fn test_terminal_kinds() {
        let table = PatternTable::from_adapters(&["ACGT"], 3).unwrap();
        let aut = Automaton::build(&table, 0).unwrap();

        let mut curr = ROOT;
        for &b in b"GGG" {
            curr = aut.step(curr, b);
        }
        assert_eq!(aut.node(curr).terminal, Some(PatternKind::PolyG));
    }

    #[test]
    fn test_invalid_errors_rejected() {
        assert!(AutomatonBuilder::new(3).is_err());
        assert!(AutomatonBuilder::new(2).is_ok());
    }

    #[test]
    fn test_step_resets_on_unknown_base() {
        let aut = Automaton::build(&table(&["ACGT"]), 0).unwrap();
        let mut curr = ROOT;
        for &b in b"ACG" {
            curr = aut.step(curr, b);
        }
        assert_ne!(curr, ROOT);
        assert_eq!(aut.step(curr, b'X'), ROOT);
    }

    #[test]
    fn test_failure_links_follow_suffixes() {
        // After reading "GACGT" the automaton must still report the ACGT
        // suffix path even though G is a dead start.
        let aut = Automaton::build(&table(&["ACGT", "CG"]), 0).unwrap();
        let mut curr = ROOT;
        for &b in b"GACG" {
            curr = aut.step(curr, b);
        }
        // Current path is "ACG"; its failure chain contains the "CG" terminal
        let mut chain = curr;
        let mut found = false;
        while chain != ROOT {
            if aut.node(chain).terminal.is_some() {
                found = true;
                break;
            }
            chain = aut.node(chain).fail;
        }
        assert!(found);
    }
}
