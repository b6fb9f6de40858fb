//! Matching a motif's expression against a suffix array: L5. Grounded on
//! `original_source/src/algorithms/motif.c`'s mutually recursive
//! `match_node`/`match_edge`, and the top-level `match`/`occurs` entry
//! points.
//!
//! The original threads a dozen parameters (buffers, a pair stack, the
//! expression, the running mismatch count) through both functions by hand.
//! Here they live on a single `Walk`, the way a stateful recursive
//! algorithm's scratch space is usually kept in this codebase (compare
//! `alignment::pairwise::banded`'s aligner struct) rather than passed
//! argument by argument.

use crate::alphabet::{self, DString};
use crate::motif::{self, ExprKind, Motif};
use crate::params::Params;
use crate::suffix_array::{Interval, VTree};

/// One reported occurrence of a motif (`match_t`).
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: Option<usize>,
    pub offset: usize,
    pub length: usize,
    pub sequence: String,
    pub structure: String,
}

struct Walk<'a> {
    v: &'a VTree,
    nodes: &'a [motif::ExprNode],
    seed: &'a DString,
    params: &'a Params,
    save_all: bool,
    decision_mode: bool,
    sbuf: Vec<u8>,
    bbuf: Vec<u8>,
    stack: Vec<u8>,
    matches: Vec<Match>,
}

impl<'a> Walk<'a> {
    /// `add_match`. Unlike the original, which records `v.suftab[interval.lb]`
    /// as the offset of *every* occurrence within `interval` when
    /// `save_all` is set, each occurrence gets its own suffix position —
    /// `interval` can span several suffixes sharing the matched prefix, and
    /// they start at different places in the text.
    fn add_match(&mut self, interval: Interval, length: usize) {
        let n = if self.save_all { interval.rb - interval.lb + 1 } else { 1 };
        let sequence: String = self.sbuf.iter().map(|&s| alphabet::decode(s) as char).collect();
        let structure: String = self.bbuf.iter().map(|&b| b as char).collect();

        for k in 0..n {
            self.matches.push(Match {
                id: self.v.id,
                offset: self.v.suftab[interval.lb + k],
                length,
                sequence: sequence.clone(),
                structure: structure.clone(),
            });
        }
    }

    /// `match_node`: at an internal node, recurse into every child edge;
    /// `save_all` forces visiting all children even after the first match.
    fn match_node(&mut self, interval: Interval, node_id: Option<usize>, pos: usize, offset: usize, m: usize) -> bool {
        let mut query_found = false;
        for child in self.v.child_intervals(interval) {
            if query_found && !self.save_all {
                break;
            }
            if self.match_edge(child, node_id, pos, offset, m) {
                query_found = true;
            }
        }
        query_found
    }

    /// `match_edge`: walk one edge label against the current expression
    /// node, switching to `match_node` when the edge's branch point is
    /// reached before the expression does.
    fn match_edge(&mut self, interval: Interval, node_id: Option<usize>, pos: usize, offset: usize, m: usize) -> bool {
        let id = match node_id {
            None => {
                debug_assert!(self.stack.is_empty(), "pair stack must be empty when an expression completes");
                if !self.decision_mode {
                    self.add_match(interval, pos);
                }
                return true;
            }
            Some(id) => id,
        };

        if interval.lb != interval.rb && pos == self.v.lcp(interval) {
            return self.match_node(interval, Some(id), pos, offset, m);
        }

        match self.nodes[id].kind {
            ExprKind::Left => self.match_left(interval, id, pos, offset, m),
            ExprKind::Right => self.match_right(interval, id, pos, offset, m),
            ExprKind::Range => self.match_range(interval, id, pos, offset, m),
        }
    }

    fn text_symbol(&self, interval: Interval, pos: usize) -> u8 {
        self.v.text[self.v.suftab[interval.lb] + pos]
    }

    fn match_left(&mut self, interval: Interval, id: usize, pos: usize, offset: usize, m: usize) -> bool {
        let node = &self.nodes[id];
        if offset >= node.length {
            return self.match_edge(interval, node.nested, pos, 0, m);
        }

        let a = self.text_symbol(interval, pos);
        if a == alphabet::GAP || a == alphabet::TER {
            return false;
        }
        let b = motif::get_sym_5_to_3(self.nodes, self.seed, id, offset);
        if b == alphabet::TER {
            return false;
        }

        let mut m = m;
        if alphabet::cmp(a, b) == 0 && { m += 1; m > self.params.max_mismatch } {
            return false;
        }

        if !self.decision_mode {
            self.sbuf.push(a);
            self.bbuf.push(b'(');
        }
        self.stack.push(a);
        let result = self.match_edge(interval, Some(id), pos + 1, offset + 1, m);
        self.stack.pop();
        if !self.decision_mode {
            self.sbuf.pop();
            self.bbuf.pop();
        }
        result
    }

    fn match_right(&mut self, interval: Interval, id: usize, pos: usize, offset: usize, m: usize) -> bool {
        let node = &self.nodes[id];
        if offset >= node.length {
            return self.match_edge(interval, node.adjacent, pos, 0, m);
        }

        let a = self.text_symbol(interval, pos);
        if a == alphabet::GAP || a == alphabet::TER {
            return false;
        }
        let b = motif::get_sym_5_to_3(self.nodes, self.seed, id, offset);
        if b == alphabet::TER {
            return false;
        }

        let c = self.stack.pop().expect("a right node always has a left partner on the stack");
        let mut m = m;
        let bad = alphabet::cmp(a, b) == 0 || !alphabet::is_base_pair(c, a, !self.params.nogu);

        let result = if bad && { m += 1; m > self.params.max_mismatch } {
            false
        } else {
            if !self.decision_mode {
                self.sbuf.push(a);
                self.bbuf.push(b')');
            }
            let r = self.match_edge(interval, Some(id), pos + 1, offset + 1, m);
            if !self.decision_mode {
                self.sbuf.pop();
                self.bbuf.pop();
            }
            r
        };
        self.stack.push(c);
        result
    }

    fn match_range(&mut self, interval: Interval, id: usize, pos: usize, offset: usize, m: usize) -> bool {
        let node = &self.nodes[id];

        if offset >= node.length {
            let mut result = self.match_edge(interval, node.adjacent, pos, 0, m);

            if (!result || self.save_all) && offset < node.length + self.params.range {
                let a = self.text_symbol(interval, pos);
                if !self.decision_mode {
                    self.sbuf.push(a);
                    self.bbuf.push(b'.');
                }
                result = self.match_edge(interval, Some(id), pos + 1, offset + 1, m);
                if !self.decision_mode {
                    self.sbuf.pop();
                    self.bbuf.pop();
                }
            }
            result
        } else {
            let a = self.text_symbol(interval, pos);
            if a == alphabet::GAP || a == alphabet::TER {
                return false;
            }
            if !self.decision_mode {
                self.sbuf.push(a);
                self.bbuf.push(b'.');
            }
            let result = self.match_edge(interval, Some(id), pos + 1, offset + 1, m);
            if !self.decision_mode {
                self.sbuf.pop();
                self.bbuf.pop();
            }
            result
        }
    }
}

/// Every match of `motif` against the sequence behind `v` (`match`).
pub fn find_matches(v: &VTree, motif: &Motif, seed: &DString, save_all: bool, params: &Params) -> Vec<Match> {
    let mut walk = Walk {
        v,
        nodes: &motif.nodes,
        seed,
        params,
        save_all,
        decision_mode: false,
        sbuf: Vec::new(),
        bbuf: Vec::new(),
        stack: Vec::new(),
        matches: Vec::new(),
    };
    walk.match_node(v.root_interval(), Some(motif.root), 0, 0, 0);
    walk.matches
}

/// Does `motif` occur at least once in the sequence behind `v`? (`occurs`).
/// The original increments a run-wide `match_count` instrument here; that
/// statistic lives in the discovery pipeline's own counters instead, bumped
/// by the caller.
pub fn occurs(v: &VTree, motif: &Motif, seed: &DString, params: &Params) -> bool {
    let mut walk = Walk {
        v,
        nodes: &motif.nodes,
        seed,
        params,
        save_all: false,
        decision_mode: true,
        sbuf: Vec::new(),
        bbuf: Vec::new(),
        stack: Vec::new(),
        matches: Vec::new(),
    };
    walk.match_node(v.root_interval(), Some(motif.root), 0, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motif::new_stem_motif;

    fn fully_fixed_stem(i: usize, j: usize, length: usize, seed: &DString) -> Motif {
        let mut m = new_stem_motif(i, j, length, 0);
        for k in 0..length {
            m.nodes[0].mask.as_mut().unwrap().insert(k);
        }
        m.num_fixed_pos = length;
        m
    }

    #[test]
    fn exact_hairpin_is_found_in_its_own_sequence() {
        let seed = DString::encode(b"GGGGAAAACCCC").unwrap();
        let v = VTree::build(seed.symbols.clone());
        let m = fully_fixed_stem(0, 11, 4, &seed);
        let mut params = Params::default();
        params.max_mismatch = 0;

        let matches = find_matches(&v, &m, &seed, false, &params);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].offset, 0);
        assert_eq!(matches[0].sequence, "GGGGAAAACCCC");
        assert_eq!(matches[0].structure, "((((....))))");
    }

    #[test]
    fn occurs_agrees_with_find_matches() {
        let seed = DString::encode(b"GGGGAAAACCCC").unwrap();
        let v = VTree::build(seed.symbols.clone());
        let m = fully_fixed_stem(0, 11, 4, &seed);
        let params = Params::default();

        assert!(occurs(&v, &m, &seed, &params));

        let absent_seed = DString::encode(b"AAAAAAAAAAAA").unwrap();
        let v2 = VTree::build(absent_seed.symbols.clone());
        assert!(!occurs(&v2, &m, &seed, &params));
    }

    #[test]
    fn save_all_matches_reports_every_occurrence_with_distinct_offsets() {
        let seed = DString::encode(b"GGGGAAAACCCCGGGGAAAACCCC").unwrap();
        let v = VTree::build(seed.symbols.clone());
        let m = fully_fixed_stem(0, 11, 4, &seed);
        let mut params = Params::default();
        params.max_mismatch = 0;

        let matches = find_matches(&v, &m, &seed, true, &params);
        assert_eq!(matches.len(), 2);
        let mut offsets: Vec<usize> = matches.iter().map(|mm| mm.offset).collect();
        offsets.sort();
        assert_eq!(offsets, vec![0, 12]);
    }

    #[test]
    fn mismatch_within_budget_still_matches() {
        // Breaking one paired position costs two mismatches: one for the
        // strand whose literal symbol changed, one for the opposite
        // strand's base-pairing check against that changed symbol.
        let seed = DString::encode(b"GGGGAAAACCCC").unwrap();
        let m = fully_fixed_stem(0, 11, 4, &seed);

        let target = DString::encode(b"GGGCAAAACCCC").unwrap(); // one mismatch at position 3
        let tv = VTree::build(target.symbols.clone());

        let mut params = Params::default();
        params.max_mismatch = 1;
        assert!(!occurs(&tv, &m, &seed, &params));

        params.max_mismatch = 2;
        assert!(occurs(&tv, &m, &seed, &params));
    }

    #[test]
    fn gu_wobble_match_requires_gu_allowed() {
        // The seed's own stem already pairs G (position 3) with U
        // (position 8); re-matching the seed against itself must re-check
        // that pairing, so whether it counts as a mismatch depends on
        // `nogu` even though the match is otherwise exact.
        let seed = DString::encode(b"GGGGAAAAUCCC").unwrap();
        let v = VTree::build(seed.symbols.clone());
        let m = fully_fixed_stem(0, 11, 4, &seed);

        let mut params = Params::default();
        params.max_mismatch = 0;
        params.nogu = false;
        assert!(occurs(&v, &m, &seed, &params));

        params.nogu = true;
        assert!(!occurs(&v, &m, &seed, &params));
    }
}
