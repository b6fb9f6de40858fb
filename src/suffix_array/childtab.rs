//! LCP array (Kasai's algorithm), Burrows-Wheeler array, and child table
//! construction, grounded on `original_source/src/libvtree/construct.c`'s
//! `create_lcp_array`, `create_bw_array`, `create_childtab_updown` and
//! `create_childtab_next`.
//!
//! The child table lets [`crate::suffix_array::access`] navigate the
//! virtual suffix tree in O(1) per step without ever materializing
//! explicit tree nodes, per Abouelhoda, Kurtz & Ohlebusch's enhanced
//! suffix array construction. `up`/`down`/`next` are kept as three
//! parallel arrays (rather than one overlaid array as in the C original)
//! since Rust has no equivalent of the union trick used there, and the
//! original's two linear stack-based passes translate directly.

/// Sentinel for "no such child table entry", matching the `-1` convention
/// used throughout `libvtree`.
pub const NONE: usize = usize::MAX;

/// Kasai's O(n) LCP array construction. `lcptab[0]` is always 0;
/// `lcptab[i]` for `i > 0` is the length of the common prefix of
/// `text[suftab[i-1]..]` and `text[suftab[i]..]`.
pub fn lcp_array(text: &[u8], suftab: &[usize], isuftab: &[usize]) -> Vec<usize> {
    let n = text.len();
    let mut lcptab = vec![0usize; n];
    let mut h = 0usize;
    for i in 0..n {
        let rank = isuftab[i];
        if rank > 0 {
            let j = suftab[rank - 1];
            while i + h < n && j + h < n && text[i + h] == text[j + h] {
                h += 1;
            }
            lcptab[rank] = h;
            if h > 0 {
                h -= 1;
            }
        } else {
            h = 0;
        }
    }
    lcptab
}

/// Burrows-Wheeler array: `bwtab[i] = text[suftab[i] - 1]`, or the
/// terminator symbol `text.last()` when `suftab[i] == 0` (there is no
/// character to the left of the whole text).
pub fn bw_array(text: &[u8], suftab: &[usize]) -> Vec<u8> {
    suftab
        .iter()
        .map(|&s| if s == 0 { *text.last().unwrap() } else { text[s - 1] })
        .collect()
}

/// The child table: for every suffix-array interval, `up`/`down` mark the
/// boundary where the LCP drops to delimit the interval's first child
/// branch, and `next` chains sibling-branch start indices together, so
/// that [`crate::suffix_array::access::child_intervals`] can enumerate all
/// children of an internal node in O(branching factor).
pub struct ChildTab {
    pub up: Vec<usize>,
    pub down: Vec<usize>,
    pub next: Vec<usize>,
}

impl ChildTab {
    pub fn build(lcptab: &[usize]) -> Self {
        let n = lcptab.len();
        let mut up = vec![NONE; n];
        let mut down = vec![NONE; n];
        let mut next = vec![NONE; n];

        Self::build_up_down(lcptab, &mut up, &mut down);
        Self::build_next(lcptab, &mut next);

        ChildTab { up, down, next }
    }

    fn build_up_down(lcptab: &[usize], up: &mut [usize], down: &mut [usize]) {
        let n = lcptab.len();
        let mut stack: Vec<usize> = vec![0];
        let mut last_index = NONE;

        for i in 1..n {
            while lcptab[i] < lcptab[*stack.last().unwrap()] {
                last_index = stack.pop().unwrap();
                let top = *stack.last().unwrap();
                if lcptab[i] <= lcptab[top] && lcptab[top] != lcptab[last_index] {
                    down[top] = last_index;
                }
                last_index = NONE;
            }
            if last_index != NONE {
                up[i] = last_index;
                last_index = NONE;
            }
            stack.push(i);
        }
    }

    fn build_next(lcptab: &[usize], next: &mut [usize]) {
        let n = lcptab.len();
        let mut stack: Vec<usize> = vec![0];

        for i in 1..n {
            while lcptab[i] < lcptab[*stack.last().unwrap()] {
                stack.pop();
            }
            if lcptab[i] == lcptab[*stack.last().unwrap()] {
                let last_index = stack.pop().unwrap();
                next[last_index] = i;
            }
            stack.push(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suffix_array::dc3;

    fn isuftab_of(suftab: &[usize]) -> Vec<usize> {
        let mut isuftab = vec![0usize; suftab.len()];
        for (rank, &pos) in suftab.iter().enumerate() {
            isuftab[pos] = rank;
        }
        isuftab
    }

    #[test]
    fn lcp_of_mississippi() {
        let text = b"mississippi$";
        let s: Vec<usize> = text.iter().map(|&b| b as usize).collect();
        let mut padded = s.clone();
        padded.push(0);
        padded.push(0);
        padded.push(0);
        let suftab = dc3::suffix_array(&padded, text.len(), 256);
        let isuftab = isuftab_of(&suftab);
        let lcptab = lcp_array(text, &suftab, &isuftab);

        // suftab should be in lexicographic order of suffixes.
        for w in suftab.windows(2) {
            assert!(&text[w[0]..] < &text[w[1]..] || &text[w[0]..] <= &text[w[1]..]);
        }
        assert_eq!(lcptab[0], 0);
        // lcptab[rank] must equal the real common-prefix length.
        for rank in 1..suftab.len() {
            let a = &text[suftab[rank - 1]..];
            let b = &text[suftab[rank]..];
            let real = a.iter().zip(b.iter()).take_while(|(x, y)| x == y).count();
            assert_eq!(lcptab[rank], real);
        }
    }
}
