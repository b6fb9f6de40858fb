//! Longest Common Extension (LCE): how far two suffixes of the same
//! (concatenated) text agree, character for character.
//!
//! Grounded on `original_source/src/libvtree/lce.c`'s `vtree_lce`: a naive
//! linear scan of the LCP array between the two suffixes' ranks, not an
//! RMQ structure. SPEC_FULL.md §4.3 explicitly sanctions this choice, and
//! since `find_all_stems` only ever calls it on a handful of candidate
//! offsets per position (not ever suffix pair), the asymptotic cost this
//! leaves on the table never shows up in practice for inputs of the size
//! this engine targets.

use crate::suffix_array::VTree;

/// Length of the longest common prefix shared by `text[i..]` and
/// `text[j..]`.
pub fn lce(v: &VTree, i: usize, j: usize) -> usize {
    if i == j {
        return v.len() - i;
    }

    let ri = v.isuftab[i];
    let rj = v.isuftab[j];
    let (lo, hi) = if ri < rj { (ri, rj) } else { (rj, ri) };

    let mut m = usize::MAX;
    for k in lo + 1..=hi {
        if v.lcptab[k] < m {
            m = v.lcptab[k];
        }
    }
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lce_matches_naive_common_prefix() {
        let v = VTree::build(b"mississippi$".to_vec());
        for i in 0..v.len() {
            for j in 0..v.len() {
                if i == j {
                    continue;
                }
                let expected = v.text[i..]
                    .iter()
                    .zip(v.text[j..].iter())
                    .take_while(|(a, b)| a == b)
                    .count();
                assert_eq!(lce(&v, i, j), expected, "i={} j={}", i, j);
            }
        }
    }
}
