//! Stem enumeration: finding every admissible hairpin stem within the seed
//! sequence. Grounded on `original_source/src/algorithms/stems.c`'s
//! `make_dpalindrome`, `get_lce`, and `find_all_stems`.
//!
//! The approach builds a single text `T = seed . reverse_complement(seed)`
//! (one shared terminator, via [`DString::append`]), a suffix array over
//! `T`, and for every candidate `(i, j)` pair of seed positions probes how
//! far they extend into a base-paired stem using a longest-common-extension
//! query against `T` — because position `j`'s reverse-complement image
//! sits at a computable offset inside `T`'s second half, a common prefix
//! there *is* a run of Watson-Crick (or wobble) pairs in the seed.

use crate::alphabet::{self, DString};
use crate::lce;
use crate::motif::{self, Motif};
use crate::params::Params;
use crate::suffix_array::VTree;

/// Longest common extension between `(v, i, j)`, additionally absorbing
/// trailing G·U/U·G wobble pairs up to `stem_max_gu` of them
/// (`get_lce`). The two strands are read through the reverse-complement
/// half of the dpalindrome text, so a genomic G·U wobble shows up here as
/// a G matching an A, or a U matching a C.
fn wobble_tolerant_lce(v: &VTree, i: usize, j: usize, gu_allowed: bool, stem_max_gu: usize) -> usize {
    let mut ii = i;
    let mut jj = j;
    let mut size = 0usize;
    let mut num_gu = 0usize;

    loop {
        let mut block = lce::lce(v, ii, jj);
        let a = v.text[ii + block];
        let b = v.text[jj + block];

        let wobble = gu_allowed
            && num_gu < stem_max_gu
            && ((a == alphabet::G && b == alphabet::A) || (a == alphabet::U && b == alphabet::C));

        if wobble {
            block += 1;
            num_gu += 1;
        }

        ii += block;
        jj += block;
        size += block;

        if !wobble {
            break;
        }
    }

    size
}

/// Enumerates every single-stem motif admissible in `seed` under `params`
/// (`find_all_stems`). Positions are expressed in `i64` internally,
/// matching the original's signed `pos_t` arithmetic, since several
/// intermediate quantities (loop-length checks, mismatch offsets) are
/// naturally differences that must stay representable before they are
/// validated and narrowed back to `usize` at the point a [`Motif`] is
/// built.
pub fn find_all_stems(seed: &DString, params: &Params) -> Vec<Motif> {
    let mut motifs = Vec::new();

    let n = seed.len() as i64;
    let mindist = params.min_stem_span() as i64;
    let stem_min_len = params.stem_min_len as i64;
    let loop_min_len = params.loop_min_len as i64;
    let gu_allowed = !params.nogu;

    if n <= mindist {
        return motifs;
    }

    let dpalindrome = seed.append(&seed.revcomp());
    let v = VTree::build(dpalindrome.symbols.clone());

    let mut i = 0i64;
    while i < n - mindist {
        let j0 = if params.stem_max_separation == 0 {
            n - 2
        } else {
            (i + params.stem_max_separation as i64).min(n - 2)
        };

        let mut j = j0;
        while j - i >= mindist {
            let (mut ii, mut jj) = (i, j);
            let mut size = 0i64;
            let mut m = 0usize;
            let mut okay = true;

            while m <= params.max_mismatch && jj - ii >= mindist && okay {
                let offset = 2 * (n - 1) - jj - 1;
                let mut block = wobble_tolerant_lce(&v, ii as usize, offset as usize, gu_allowed, params.stem_max_gu) as i64;

                if block < stem_min_len {
                    okay = false;
                } else {
                    while (jj - block) - (ii + block) + 1 < loop_min_len {
                        block -= 1;
                    }

                    if block >= stem_min_len {
                        size = (ii + block) - i;
                        ii = i + size + 1;
                        jj = j - size - 1;
                        m += 1;
                    } else {
                        okay = false;
                    }
                }
            }

            if size >= stem_min_len {
                let mut min_size = if params.skip_keep_longest_stems { stem_min_len } else { size };

                while min_size <= size {
                    motifs.push(motif::new_stem_motif(i as usize, j as usize, min_size as usize, m - 1));
                    min_size += 1;
                }
            }

            j -= 1;
        }

        i += 1;
    }

    motifs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(stem_min_len: usize, loop_min_len: usize, max_mismatch: usize, nogu: bool) -> Params {
        let mut p = Params::default();
        p.stem_min_len = stem_min_len;
        p.loop_min_len = loop_min_len;
        p.max_mismatch = max_mismatch;
        p.nogu = nogu;
        p.stem_max_separation = 0;
        p
    }

    #[test]
    fn hairpin_ggggaaaacccc_is_found() {
        let seed = DString::encode(b"GGGGAAAACCCC").unwrap();
        let p = params(3, 4, 0, true);
        let motifs = find_all_stems(&seed, &p);

        assert!(!motifs.is_empty());

        let full = motifs
            .iter()
            .find(|m| m.nodes[m.root].length == 4 && m.nodes[m.root].start == 0)
            .expect("the maximal 4-bp stem should be reported");

        let range = &full.nodes[1];
        assert_eq!(range.start, 4);
        assert_eq!(range.length, 4);
        let right = &full.nodes[2];
        assert_eq!(right.start, 11);
        assert_eq!(right.length, 4);

        for m in &motifs {
            assert!(m.nodes[m.root].length >= 3);
            assert!(m.nodes[1].length >= 4);
        }
    }

    #[test]
    fn gu_wobble_tolerance_depends_on_nogu() {
        let seed = DString::encode(b"GUGUAAAACACA").unwrap();

        let with_gu = params(4, 4, 0, false);
        let motifs_with_gu = find_all_stems(&seed, &with_gu);
        assert!(motifs_with_gu.iter().any(|m| m.nodes[m.root].length >= 4));

        let without_gu = params(4, 4, 0, true);
        let motifs_without_gu = find_all_stems(&seed, &without_gu);
        assert!(!motifs_without_gu.iter().any(|m| m.nodes[m.root].length >= 4));
    }
}
