//! Exact and approximate read scanners
//!
//! A [`Scanner`] drives a shared [`Automaton`] over one read at a time. The
//! exact scan reports the first terminal on the suffix chain; the approximate
//! scan runs in two phases:
//!
//! 1. **Seed collection** — a single automaton pass records every completed
//!    seed as `(text position, seed end offset)` per pattern. If the seeds of
//!    one pattern line up into a full placement, the scan exits early.
//! 2. **Partial verification** — remaining seed hits imply candidate
//!    placements; each is accepted iff the mismatch count over the placement's
//!    unmatched segments stays within the budget.
//!
//! Each scanner owns its transient seed storage, so any number of scanners
//! may share one automaton across threads.

use crate::automaton::{Automaton, ROOT};
use crate::pattern::PatternKind;

/// Reusable per-pattern seed hit lists
///
/// Cleared and reused between reads rather than reallocated; a touched list
/// keeps clearing proportional to the patterns actually hit.
#[derive(Debug, Default)]
struct SeedScratch {
    per_pid: Vec<Vec<(usize, usize)>>,
    touched: Vec<u32>,
}

impl SeedScratch {
    fn with_patterns(count: usize) -> Self {
        Self {
            per_pid: vec![Vec::new(); count],
            touched: Vec::new(),
        }
    }

    fn clear(&mut self) {
        for &pid in &self.touched {
            self.per_pid[pid as usize].clear();
        }
        self.touched.clear();
    }
}

/// Scan context over a shared automaton
pub struct Scanner<'a> {
    automaton: &'a Automaton,
    scratch: SeedScratch,
}

impl<'a> Scanner<'a> {
    /// Create a scan context for the automaton
    pub fn new(automaton: &'a Automaton) -> Self {
        Self {
            automaton,
            scratch: SeedScratch::with_patterns(automaton.pattern_count()),
        }
    }

    /// Exact scan: report the first pattern kind occurring in `seq`
    ///
    /// After each step the whole suffix chain is inspected, closest node
    /// first, so overlapping candidates resolve to the longest match.
    pub fn search_any(&self, seq: &[u8]) -> Option<PatternKind> {
        let aut = self.automaton;
        let mut curr = ROOT;
        for &raw in seq {
            curr = aut.step(curr, raw.to_ascii_uppercase());
            let mut node = curr;
            while node != ROOT {
                if let Some(kind) = aut.node(node).terminal {
                    return Some(kind);
                }
                node = aut.node(node).fail;
            }
        }
        None
    }

    /// Approximate scan at the automaton's mismatch budget
    ///
    /// Non-adapter patterns are always matched exactly and returned
    /// immediately; adapters are admitted with up to `errors` substitutions.
    pub fn search_inexact(&mut self, seq: &[u8]) -> Option<PatternKind> {
        let aut = self.automaton;
        let errors = aut.errors() as usize;
        if errors == 0 {
            return self.search_any(seq);
        }
        self.scratch.clear();

        let mut curr = ROOT;
        for (i, &raw) in seq.iter().enumerate() {
            curr = aut.step(curr, raw.to_ascii_uppercase());
            let mut node = curr;
            while node != ROOT {
                let n = aut.node(node);
                if let Some(kind) = n.terminal {
                    if kind != PatternKind::Adapter {
                        return Some(kind);
                    }
                }
                for &(pid, seed_end) in &n.seed_hits {
                    if self.record_seed(pid, i, seed_end as usize) {
                        return Some(PatternKind::Adapter);
                    }
                }
                node = n.fail;
            }
        }

        if self.verify_partials(seq) {
            return Some(PatternKind::Adapter);
        }
        None
    }

    /// Append one seed hit; true when the hit completes a full placement
    fn record_seed(&mut self, pid: u32, pos: usize, seed_end: usize) -> bool {
        let list = &mut self.scratch.per_pid[pid as usize];
        if list.is_empty() {
            self.scratch.touched.push(pid);
        }
        let entry = (pos, seed_end);
        if let Err(idx) = list.binary_search(&entry) {
            list.insert(idx, entry);
        }

        // Early exit: every seed of the implied placement is already present
        let errors = self.automaton.errors() as usize;
        if list.len() <= errors || pos < seed_end {
            return false;
        }
        let begin = pos - seed_end;
        self.automaton
            .pattern_seed_ends(pid)
            .iter()
            .all(|&end| list.binary_search(&(begin + end as usize, end as usize)).is_ok())
    }

    /// Phase 2: upgrade partial seed hits to full placements by bounded
    /// Hamming verification of the unmatched segments
    fn verify_partials(&mut self, seq: &[u8]) -> bool {
        let aut = self.automaton;
        let errors = aut.errors() as usize;

        for t in 0..self.scratch.touched.len() {
            let pid = self.scratch.touched[t];
            let pattern = aut.pattern_bytes(pid);
            let ends = aut.pattern_seed_ends(pid);
            let len = pattern.len();

            let list = &mut self.scratch.per_pid[pid as usize];
            while !list.is_empty() {
                let (pos, seed_end) = list.remove(0);
                if pos < seed_end {
                    continue;
                }
                let begin = pos - seed_end;
                if begin + len > seq.len() {
                    continue;
                }

                let mut mismatches = 0usize;
                let mut start = 0usize;
                for &end in ends {
                    let end = end as usize;
                    let seg = start..end + 1;
                    start = end + 1;
                    if end == seed_end {
                        continue;
                    }
                    // A partner hit proves this segment exact; consume it so
                    // it is not reverified as its own placement
                    if let Ok(idx) = list.binary_search(&(begin + end, end)) {
                        list.remove(idx);
                        continue;
                    }
                    mismatches += count_mismatches(
                        &seq[begin + seg.start..begin + seg.end],
                        &pattern[seg],
                        errors - mismatches,
                    );
                    if mismatches > errors {
                        break;
                    }
                }
                if mismatches <= errors {
                    return true;
                }
            }
        }
        false
    }
}

/// Case-insensitive mismatch count, short-circuited once `limit` is exceeded
fn count_mismatches(text: &[u8], pattern: &[u8], limit: usize) -> usize {
    debug_assert_eq!(text.len(), pattern.len());
    let mut count = 0;
    for (&t, &p) in text.iter().zip(pattern) {
        if t.to_ascii_uppercase() != p {
            count += 1;
            if count > limit {
                break;
            }
        }
    }
    count
}
