//! Enhanced suffix array: the suffix array proper, its inverse, the LCP
//! array, the Burrows-Wheeler array, and the child table, bundled as a
//! `VTree` the way `vtree_t` bundles them in
//! `original_source/src/libvtree/libvtree.h`. Construction is
//! `vtree_create` in `construct.c`: `vtree_init` then
//! `create_suffix_array` (DC3/skew) then `create_lcp_array` (Kasai) then
//! `create_bw_array` then the two child-table passes.

pub mod access;
pub mod childtab;
pub mod dc3;

pub use access::Interval;
use childtab::ChildTab;

/// One digitalized text plus its enhanced suffix array. `id` identifies
/// which input sequence this tree was built from when several vtrees are
/// built over a motif-discovery run's inputs (`vtree_t.id` in the
/// original, `-1` there for "no id assigned").
pub struct VTree {
    pub text: Vec<u8>,
    pub suftab: Vec<usize>,
    pub isuftab: Vec<usize>,
    pub lcptab: Vec<usize>,
    pub bwtab: Vec<u8>,
    pub childtab: ChildTab,
    pub id: Option<usize>,
}

impl VTree {
    /// Build the enhanced suffix array over `text` (already digitalized,
    /// including its trailing terminator symbol).
    pub fn build(text: Vec<u8>) -> Self {
        Self::build_with_id(text, None)
    }

    pub fn build_with_id(text: Vec<u8>, id: Option<usize>) -> Self {
        let n = text.len();
        assert!(n > 0, "cannot build a suffix array over an empty text");

        let mut s: Vec<usize> = text.iter().map(|&b| b as usize).collect();
        s.push(0);
        s.push(0);
        s.push(0);
        let k = *s[..n].iter().max().unwrap_or(&0);

        let suftab = dc3::suffix_array(&s, n, k);

        let mut isuftab = vec![0usize; n];
        for (rank, &pos) in suftab.iter().enumerate() {
            isuftab[pos] = rank;
        }

        let lcptab = childtab::lcp_array(&text, &suftab, &isuftab);
        let bwtab = childtab::bw_array(&text, &suftab);
        let childtab = ChildTab::build(&lcptab);

        VTree {
            text,
            suftab,
            isuftab,
            lcptab,
            bwtab,
            childtab,
            id,
        }
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suftab_is_lexicographic_order() {
        let v = VTree::build(b"mississippi$".to_vec());
        for w in v.suftab.windows(2) {
            assert!(v.text[w[0]..] <= v.text[w[1]..]);
        }
    }

    #[test]
    fn isuftab_is_inverse_of_suftab() {
        let v = VTree::build(b"banana$".to_vec());
        for (rank, &pos) in v.suftab.iter().enumerate() {
            assert_eq!(v.isuftab[pos], rank);
        }
    }

    #[test]
    fn mississippi_suftab_and_lcptab_match_the_known_arrays() {
        // No trailing `$`: the classic Karkkainen/Sanders running example
        // treats DC3's own zero sentinels as the string terminator.
        let v = VTree::build(b"mississippi".to_vec());
        assert_eq!(v.suftab, vec![10, 7, 4, 1, 0, 9, 8, 6, 3, 5, 2]);
        assert_eq!(v.lcptab, vec![0, 1, 1, 4, 0, 0, 1, 0, 2, 1, 3]);
    }

    #[test]
    fn bwtab_matches_text_predecessor() {
        let v = VTree::build(b"banana$".to_vec());
        for (rank, &pos) in v.suftab.iter().enumerate() {
            let expected = if pos == 0 {
                *v.text.last().unwrap()
            } else {
                v.text[pos - 1]
            };
            assert_eq!(v.bwtab[rank], expected);
        }
    }
}
