//! O(1)-per-step virtual suffix-tree navigation over the enhanced suffix
//! array, grounded on `original_source/src/libvtree/access.c`'s
//! `vtree_getChildIntervals`, `vtree_getlcp`, `vtree_getInterval`, and
//! `vtree_find_exact_match`. These four functions are the only way the
//! rest of the crate ever touches the suffix array: nothing else indexes
//! `suftab`/`lcptab`/`childtab` directly.

use super::childtab::NONE;
use super::VTree;

/// A half-open... actually *closed* range `[lb, rb]` of suffix array rows,
/// i.e. an lcp-interval. A singleton (`lb == rb`) is a leaf: one suffix,
/// no further branching.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interval {
    pub lb: usize,
    pub rb: usize,
}

impl Interval {
    pub fn is_leaf(&self) -> bool {
        self.lb == self.rb
    }
}

impl VTree {
    /// Root interval spanning the whole suffix array.
    pub fn root_interval(&self) -> Interval {
        Interval {
            lb: 0,
            rb: self.suftab.len() - 1,
        }
    }

    /// The string depth shared by every suffix in `interval`
    /// (`vtree_getlcp`). Root-node special case: `down[0]` doubles as the
    /// root's first-child marker since `up[0]` is otherwise unused.
    pub fn lcp(&self, interval: Interval) -> usize {
        if interval.is_leaf() {
            return self.suftab.len() - interval.lb;
        }
        let n = self.suftab.len();
        let is_root = interval.lb == 0 && interval.rb == n - 1;
        if is_root {
            return 0;
        }
        let j1 = interval.rb + 1;
        if j1 < n && self.childtab.up[j1] != NONE && interval.lb < self.childtab.up[j1] && self.childtab.up[j1] <= interval.rb {
            self.lcptab[self.childtab.up[j1]]
        } else {
            self.lcptab[self.childtab.down[interval.lb]]
        }
    }

    /// All maximal child lcp-intervals of `interval`, left to right
    /// (`vtree_getChildIntervals`). Empty for a leaf interval.
    pub fn child_intervals(&self, interval: Interval) -> Vec<Interval> {
        if interval.is_leaf() {
            return Vec::new();
        }

        let n = self.suftab.len();
        let is_root = interval.lb == 0 && interval.rb == n - 1;

        let mut i1 = if is_root {
            self.childtab.down[0]
        } else {
            let j1 = interval.rb + 1;
            if j1 < n
                && self.childtab.up[j1] != NONE
                && interval.lb < self.childtab.up[j1]
                && self.childtab.up[j1] <= interval.rb
            {
                self.childtab.up[j1]
            } else {
                self.childtab.down[interval.lb]
            }
        };

        let mut children = Vec::new();
        children.push(Interval {
            lb: interval.lb,
            rb: i1 - 1,
        });

        while self.childtab.next[i1] != NONE && self.childtab.next[i1] <= interval.rb {
            let i2 = self.childtab.next[i1];
            children.push(Interval { lb: i1, rb: i2 - 1 });
            i1 = i2;
        }
        children.push(Interval { lb: i1, rb: interval.rb });

        children
    }

    /// Among `interval`'s children, the one whose branch starts with
    /// `symbol` at string depth `self.lcp(interval)`, if any
    /// (`vtree_getInterval`).
    pub fn get_interval(&self, interval: Interval, depth: usize, symbol: u8) -> Option<Interval> {
        for child in self.child_intervals(interval) {
            let pos = self.suftab[child.lb] + depth;
            if pos < self.text.len() && self.text[pos] == symbol {
                return Some(child);
            }
        }
        None
    }

    /// Walk the virtual suffix tree matching `pattern` exactly, character
    /// by character, returning the final interval if the whole pattern is
    /// found (`vtree_find_exact_match`).
    pub fn find_exact_match(&self, pattern: &[u8]) -> Option<Interval> {
        let mut interval = self.root_interval();
        let mut depth = 0;

        while depth < pattern.len() {
            if interval.is_leaf() {
                let pos = self.suftab[interval.lb] + depth;
                if pos + (pattern.len() - depth) > self.text.len() {
                    return None;
                }
                if self.text[pos..pos + (pattern.len() - depth)] == pattern[depth..] {
                    return Some(interval);
                }
                return None;
            }

            let lcp = self.lcp(interval);
            if depth < lcp {
                // Match the remaining characters up to this branch point
                // against a representative leaf's suffix.
                let rep = self.suftab[interval.lb];
                let take = (lcp - depth).min(pattern.len() - depth);
                if self.text[rep + depth..rep + depth + take] != pattern[depth..depth + take] {
                    return None;
                }
                depth += take;
                continue;
            }

            match self.get_interval(interval, depth, pattern[depth]) {
                Some(child) => {
                    interval = child;
                    depth += 1;
                }
                None => return None,
            }
        }

        Some(interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suffix_array::VTree;

    #[test]
    fn exact_match_of_iss_in_mississippi() {
        let v = VTree::build(b"mississippi$".to_vec());
        let hit = v.find_exact_match(b"iss");
        assert!(hit.is_some());
        let interval = hit.unwrap();
        let mut positions: Vec<usize> = (interval.lb..=interval.rb)
            .map(|r| v.suftab[r])
            .collect();
        positions.sort();
        assert_eq!(positions, vec![1, 4]);
    }

    #[test]
    fn exact_match_absent() {
        let v = VTree::build(b"mississippi$".to_vec());
        assert!(v.find_exact_match(b"xyz").is_none());
    }

    #[test]
    fn exact_match_whole_text() {
        let v = VTree::build(b"banana$".to_vec());
        let hit = v.find_exact_match(b"banana$");
        assert!(hit.is_some());
        let interval = hit.unwrap();
        assert_eq!(v.suftab[interval.lb], 0);
    }
}
