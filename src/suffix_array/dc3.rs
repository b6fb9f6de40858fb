//! Linear-time suffix array construction via the DC3/skew algorithm
//! (Kärkkäinen & Sanders, "Simple Linear Work Suffix Array Construction").
//!
//! Grounded on `original_source/src/libvtree/construct.c`'s `skew`: the
//! classic three-way split into a mod-1/mod-2 sample (`SA12`), a recursive
//! call on the renamed sample when names aren't already unique, a radix
//! sort of the mod-0 sample (`SA0`) using the already-sorted `SA12` as a
//! secondary key, and a final linear merge of `SA0`/`SA12` using the
//! lexicographic comparators `leq2`/`leq3`.

/// Radix-sort `a` into `b` by the `K+1` possible values of `r[a[i] + offset]`.
fn radix_pass(a: &[usize], b: &mut [usize], r: &[usize], offset: usize, k: usize) {
    let mut count = vec![0usize; k + 2];
    for &ai in a {
        count[r[ai + offset] + 1] += 1;
    }
    for i in 1..count.len() {
        count[i] += count[i - 1];
    }
    for &ai in a {
        let key = r[ai + offset];
        b[count[key]] = ai;
        count[key] += 1;
    }
}

fn leq2(a0: usize, a1: usize, b0: usize, b1: usize) -> bool {
    a0 < b0 || (a0 == b0 && a1 <= b1)
}

fn leq3(a0: usize, a1: usize, a2: usize, b0: usize, b1: usize, b2: usize) -> bool {
    a0 < b0 || (a0 == b0 && leq2(a1, a2, b1, b2))
}

/// `s` has length `n + 3`, with `s[n] == s[n+1] == s[n+2] == 0` acting as
/// sentinels strictly smaller than every real symbol. `k` is one past the
/// largest symbol value appearing in `s[0..n]`. Returns the suffix array of
/// `s[0..n]` (length `n`).
pub fn suffix_array(s: &[usize], n: usize, k: usize) -> Vec<usize> {
    assert!(s.len() >= n + 3);

    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![0];
    }

    let n0 = (n + 2) / 3;
    let n1 = (n + 1) / 3;
    let n2 = n / 3;
    let n02 = n0 + n2;

    // s12: positions i in [0,n+(n0-n1)) with i % 3 != 0, i.e. the mod-1 and
    // mod-2 sample, plus padding so later indexing stays in range.
    let mut s12: Vec<usize> = Vec::with_capacity(n02 + 3);
    for i in 0..n + (n0 - n1) {
        if i % 3 != 0 {
            s12.push(i);
        }
    }
    s12.push(0);
    s12.push(0);
    s12.push(0);

    let mut sa12 = vec![0usize; n02 + 3];
    radix_pass(&s12[..n02], &mut sa12[..n02], s, 2, k);
    let tmp = sa12[..n02].to_vec();
    radix_pass(&tmp, &mut s12[..n02], s, 1, k);
    let tmp = s12[..n02].to_vec();
    radix_pass(&tmp, &mut sa12[..n02], s, 0, k);

    // Assign names to the mod-1/mod-2 sample's triples.
    let mut name = 0usize;
    let (mut c0, mut c1, mut c2) = (usize::MAX, usize::MAX, usize::MAX);
    let mut s12_named = vec![0usize; n02 + 3];
    for i in 0..n02 {
        let pos = sa12[i];
        if s[pos] != c0 || s[pos + 1] != c1 || s[pos + 2] != c2 {
            name += 1;
            c0 = s[pos];
            c1 = s[pos + 1];
            c2 = s[pos + 2];
        }
        if pos % 3 == 1 {
            s12_named[pos / 3] = name;
        } else {
            s12_named[pos / 3 + n0] = name;
        }
    }

    let sa12_final: Vec<usize> = if name < n02 {
        // Names are not unique: recurse on the renamed sample.
        let recursed = suffix_array(&s12_named, n02, name);
        // Invert to get ranks back, storing directly into s12 (reused as
        // "rank of i-th mod-1/2 suffix").
        for (i, &r) in recursed.iter().enumerate() {
            s12_named[r] = i + 1;
        }
        recursed
    } else {
        let mut out = vec![0usize; n02];
        for i in 0..n02 {
            out[s12_named[i] - 1] = i;
        }
        out
    };

    // Recover true text positions for SA12 from the (possibly recursively
    // sorted) sample ranks.
    let mut sa12_positions = vec![0usize; n02];
    for (i, &v) in sa12_final.iter().enumerate() {
        sa12_positions[i] = if v < n0 { v * 3 + 1 } else { (v - n0) * 3 + 2 };
    }

    // Stably sort the mod-0 sample using SA12 order as the secondary key.
    let mut s0 = vec![0usize; n0];
    let mut j = 0;
    for &p in &sa12_positions {
        if p % 3 == 1 {
            s0[j] = p - 1;
            j += 1;
        }
    }
    if n % 3 == 1 {
        s0[j] = n - 1;
    }
    let mut sa0 = vec![0usize; n0];
    radix_pass(&s0, &mut sa0, s, 0, k);

    // Merge SA0 and SA12.
    let mut rank12 = vec![0usize; n02 + 3];
    for (i, &p) in sa12_positions.iter().enumerate() {
        rank12[if p % 3 == 1 { p / 3 } else { p / 3 + n0 }] = i + 1;
    }
    let get_i = |t: usize| -> usize {
        if t < n0 {
            t * 3 + 1
        } else {
            (t - n0) * 3 + 2
        }
    };

    let mut sa = Vec::with_capacity(n);
    let (mut p, mut t) = (0usize, 0usize);
    while t < n02 && p < n0 {
        let pos12 = get_i(t);
        let pos0 = sa0[p];
        let less = if pos12 % 3 == 1 {
            leq2(
                s[pos12],
                rank12[pos12 / 3 + n0],
                s[pos0],
                rank12[pos0 / 3 + n0],
            )
        } else {
            leq3(
                s[pos12],
                s[pos12 + 1],
                rank12[pos12 / 3 + 1],
                s[pos0],
                s[pos0 + 1],
                rank12[pos0 / 3 + n0 + 1],
            )
        };
        if less {
            sa.push(pos12);
            t += 1;
        } else {
            sa.push(pos0);
            p += 1;
        }
    }
    while t < n02 {
        sa.push(get_i(t));
        t += 1;
    }
    while p < n0 {
        sa.push(sa0[p]);
        p += 1;
    }

    sa
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_sa(text: &[usize]) -> Vec<usize> {
        let n = text.len();
        let mut idx: Vec<usize> = (0..n).collect();
        idx.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
        idx
    }

    #[test]
    fn matches_naive_on_mississippi() {
        // 'mississippi' mapped to small integers, 0 reserved as sentinel.
        let text = "mississippi$";
        let mut s: Vec<usize> = text.bytes().map(|b| b as usize).collect();
        let n = s.len();
        s.push(0);
        s.push(0);
        s.push(0);
        let sa = suffix_array(&s, n, 256);
        let s_no_pad = &s[..n];
        assert_eq!(sa, naive_sa(s_no_pad));
    }

    #[test]
    fn single_character() {
        let s = vec![5usize, 0, 0, 0];
        assert_eq!(suffix_array(&s, 1, 6), vec![0]);
    }
}
