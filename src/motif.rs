//! The motif expression graph and its algebra: construction from a single
//! stem, cloning, positional specialisation, composition, and the
//! string-based equivalence key. Grounded on
//! `original_source/src/algorithms/motif.c`/`motif.h`'s `expression_t` /
//! `motif_t` and the functions operating on them (`new_stem_motif`,
//! `clone_expression`, `combine`, `stem_within`, `motif_to_string`,
//! `motif_num_base_pair`).
//!
//! The original represents the graph with raw pointers and a pointer-shared
//! mask between a Left node and its Right partner (SPEC_FULL.md §9's design
//! note asks for an arena index instead). Here each [`Motif`] owns its
//! nodes in a single `Vec<ExprNode>` (`nodes`), referenced by `usize`
//! indices (`nested`/`adjacent`); only the Left node of a stem owns a
//! mask, and the matching Right node holds its Left's index (`nested`) to
//! reach it. One consequence of this shape: since a `Motif` never shares
//! nodes with another `Motif`, cloning one is exactly `Vec::clone`/
//! `#[derive(Clone)]` — there is no need for the original's recursive
//! `clone_expression` with its `(old_adj, new_adj)` back-edge rewriting,
//! because there are no cross-graph back edges to rewrite in the first
//! place.

use bit_set::BitSet;

use crate::alphabet::{self, DString};

/// One node of the expression graph (`element_t` in the original).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExprKind {
    Left,
    Right,
    Range,
}

/// `expression_t`, minus the shared `dstring` back-reference (callers pass
/// the seed [`DString`] explicitly to the handful of functions that decode
/// symbols) and the dead `range` field (set to `0` and read only by
/// `motif.c`'s retired, commented-out `element_is_equivalent`).
#[derive(Clone, Debug)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub start: usize,
    pub length: usize,
    pub mismatch: usize,
    pub nested: Option<usize>,
    pub adjacent: Option<usize>,
    /// `Some` only on a Left node: which of its positions are pinned to
    /// the seed's symbol (`1`) vs. left as a joker `N` (`0`). A Right node
    /// reaches its pair's mask through `nested`.
    pub mask: Option<BitSet>,
}

/// Sentinel for `Motif::next` meaning "no descendant boundary assigned
/// yet" (`-1` in the original).
pub const NO_NEXT: usize = usize::MAX;

/// `motif_t`.
#[derive(Clone, Debug)]
pub struct Motif {
    pub nodes: Vec<ExprNode>,
    pub root: usize,
    pub num_fixed_pos: usize,
    pub num_stem: usize,
    /// Exclusive upper bound, in the discovery pipeline's output vector,
    /// of this motif's own descendant block (see `fix_all2`/
    /// `combine_allall` in `src/discover.rs`). [`NO_NEXT`] until assigned.
    pub next: usize,
    /// Fraction of sequences this motif occurs in, or `-1.0` if not yet
    /// computed (`calculate_support` in the original).
    pub support: f64,
}

fn element_start(node: &ExprNode) -> usize {
    match node.kind {
        ExprKind::Left | ExprKind::Range => node.start,
        ExprKind::Right => node.start - node.length + 1,
    }
}

fn element_end(node: &ExprNode) -> usize {
    match node.kind {
        ExprKind::Left | ExprKind::Range => node.start + node.length - 1,
        ExprKind::Right => node.start,
    }
}

fn expression_start(nodes: &[ExprNode], id: usize) -> usize {
    match nodes[id].kind {
        ExprKind::Left | ExprKind::Range => nodes[id].start,
        ExprKind::Right => nodes[nodes[id].nested.expect("right node indexes its left partner")].start,
    }
}

fn expression_end(nodes: &[ExprNode], id: usize) -> usize {
    let mut cur = id;
    while let Some(adj) = nodes[cur].adjacent {
        cur = adj;
    }
    element_end(&nodes[cur])
}

pub fn motif_start(m: &Motif) -> usize {
    expression_start(&m.nodes, m.root)
}

pub fn motif_end(m: &Motif) -> usize {
    expression_end(&m.nodes, m.root)
}

/// True iff `a` entirely precedes `b` in seed coordinates.
pub fn motif_before(a: &Motif, b: &Motif) -> bool {
    motif_end(a) < motif_start(b)
}

/// The decoded symbol at `offset` within node `id`, 5'-to-3' along the
/// node's own local numbering (`get_sym_5_to_3`).
pub fn get_sym_5_to_3(nodes: &[ExprNode], seed: &DString, id: usize, offset: usize) -> u8 {
    let node = &nodes[id];
    match node.kind {
        ExprKind::Left => {
            let mask = node.mask.as_ref().expect("left node owns a mask");
            if mask.contains(offset) {
                seed.symbols[node.start + offset]
            } else {
                alphabet::N
            }
        }
        ExprKind::Right => {
            let left = node.nested.expect("right node indexes its left partner");
            let mask = nodes[left].mask.as_ref().expect("left node owns a mask");
            let ioffset = node.length - offset - 1;
            if mask.contains(ioffset) {
                seed.symbols[node.start - node.length + 1 + offset]
            } else {
                alphabet::N
            }
        }
        ExprKind::Range => alphabet::N,
    }
}

/// Builds the three-node expression for one stem: Left at `i` of arm
/// length `length`, an unpaired Range filling the loop, Right at `j`
/// (`new_stem_motif`). Positions are seed coordinates; `mismatch` is the
/// count of wobble/mismatch extensions absorbed while this stem was
/// enumerated.
pub fn new_stem_motif(i: usize, j: usize, length: usize, mismatch: usize) -> Motif {
    debug_assert!(j >= i + 2 * length - 1, "stem arms would overlap");

    let left = ExprNode {
        kind: ExprKind::Left,
        start: i,
        length,
        mismatch,
        nested: Some(1),
        adjacent: Some(2),
        mask: Some(BitSet::with_capacity(length)),
    };
    let range = ExprNode {
        kind: ExprKind::Range,
        start: i + length,
        length: j - i - 2 * length + 1,
        mismatch: 0,
        nested: None,
        adjacent: Some(2),
        mask: None,
    };
    let right = ExprNode {
        kind: ExprKind::Right,
        start: j,
        length,
        mismatch,
        nested: Some(0),
        adjacent: None,
        mask: None,
    };

    Motif {
        nodes: vec![left, range, right],
        root: 0,
        num_fixed_pos: 0,
        num_stem: 1,
        next: NO_NEXT,
        support: -1.0,
    }
}

/// The highest-indexed fixed position in a stem's Left mask, or `None` if
/// none is set (`dev_bitset_leftmost_one`, which despite its name scans
/// from the top bit down — the fix-all specialisation pass only ever
/// fixes positions strictly above this one, to avoid revisiting a subset
/// of fixed positions it has already explored).
pub fn highest_fixed_bit(mask: &BitSet) -> Option<usize> {
    mask.iter().max()
}

/// True iff stem `a`'s outer extent is nested within stem `b`'s
/// (`stem_within`); both motifs must be single, unspecialised stems (root
/// is Left, whose `adjacent` is the matching Right).
pub fn stem_within(a: &Motif, b: &Motif) -> bool {
    let a_left = &a.nodes[a.root];
    let a_right = &a.nodes[a_left.adjacent.expect("stem left node has a right partner")];
    let b_left = &b.nodes[b.root];
    let b_right = &b.nodes[b_left.adjacent.expect("stem left node has a right partner")];

    element_start(a_left) >= element_start(b_left)
        && element_end(a_left) <= element_end(b_left)
        && element_start(a_right) >= element_start(b_right)
        && element_end(a_right) <= element_end(b_right)
}

fn splice_nodes_from(dest: &mut Vec<ExprNode>, src: &[ExprNode]) -> usize {
    let offset = dest.len();
    for node in src {
        let mut copy = node.clone();
        copy.nested = node.nested.map(|x| x + offset);
        copy.adjacent = node.adjacent.map(|x| x + offset);
        dest.push(copy);
    }
    offset
}

/// `expression_append`/`motif_append`: `a` fully precedes `b`, so splice a
/// fresh Range bridging the gap between them.
fn append(a: &Motif, b: &Motif) -> Motif {
    let mut nodes = a.nodes.clone();

    let mut tail = a.root;
    while let Some(adj) = nodes[tail].adjacent {
        tail = adj;
    }
    let a_end = element_end(&nodes[tail]);

    let b_offset = splice_nodes_from(&mut nodes, &b.nodes);
    let b_root = b.root + b_offset;
    let b_start = expression_start(&b.nodes, b.root);

    let connector_id = nodes.len();
    nodes.push(ExprNode {
        kind: ExprKind::Range,
        start: a_end + 1,
        length: b_start - a_end - 1,
        mismatch: 0,
        nested: None,
        adjacent: Some(b_root),
        mask: None,
    });
    nodes[tail].adjacent = Some(connector_id);

    Motif {
        nodes,
        root: a.root,
        num_fixed_pos: a.num_fixed_pos + b.num_fixed_pos,
        num_stem: a.num_stem + b.num_stem,
        next: NO_NEXT,
        support: -1.0,
    }
}

/// `motif_insert`/`replace_range_by_stem`: `b` (a single stem) is nested
/// inside one of `a`'s Range elements. Walks `a` looking for that Range,
/// replacing it with `left_connector . b . right_connector`. Returns
/// `None` if no such Range exists or the two motifs' coordinates are
/// inconsistent (overlapping, or `b` straddling more than one element).
fn insert(a: &Motif, b: &Motif) -> Option<Motif> {
    debug_assert_eq!(b.num_stem, 1, "insert only admits a single-stem motif");

    let mut nodes = a.nodes.clone();
    let b_start = expression_start(&b.nodes, b.root);
    let b_end = expression_end(&b.nodes, b.root);

    let mut pa = a.root;
    loop {
        let next = match nodes[pa].kind {
            ExprKind::Left => nodes[pa].nested,
            _ => nodes[pa].adjacent,
        }?;

        if nodes[next].kind == ExprKind::Range
            && b_start >= element_start(&nodes[next])
            && b_end <= element_end(&nodes[next])
        {
            let prev_end = element_end(&nodes[pa]);
            let next_adjacent = nodes[next]
                .adjacent
                .expect("a range element inside a motif always has a successor");

            let b_offset = splice_nodes_from(&mut nodes, &b.nodes);
            let b_root = b.root + b_offset;
            let mut b_tail = b_root;
            while let Some(adj) = nodes[b_tail].adjacent {
                b_tail = adj;
            }

            let cleft_id = nodes.len();
            nodes.push(ExprNode {
                kind: ExprKind::Range,
                start: prev_end + 1,
                length: b_start - prev_end - 1,
                mismatch: 0,
                nested: None,
                adjacent: Some(b_root),
                mask: None,
            });

            let cright_start = b_end + 1;
            let cright_id = nodes.len();
            nodes.push(ExprNode {
                kind: ExprKind::Range,
                start: cright_start,
                length: element_start(&nodes[next_adjacent]) - cright_start,
                mismatch: 0,
                nested: None,
                adjacent: Some(next_adjacent),
                mask: None,
            });

            match nodes[pa].kind {
                ExprKind::Left => nodes[pa].nested = Some(cleft_id),
                _ => nodes[pa].adjacent = Some(cleft_id),
            }
            nodes[b_tail].adjacent = Some(cright_id);
            // The replaced range node (`next`) is now unreachable from
            // `root`; it stays in the arena as harmless, unindexed slack
            // rather than being compacted out.

            return Some(Motif {
                nodes,
                root: a.root,
                num_fixed_pos: a.num_fixed_pos + b.num_fixed_pos,
                num_stem: a.num_stem + b.num_stem,
                next: NO_NEXT,
                support: -1.0,
            });
        }

        if element_end(&nodes[next]) >= b_start {
            return None;
        }

        if nodes[pa].kind == ExprKind::Left {
            let right = nodes[pa].adjacent.expect("left node has a right partner");
            if b_end < element_start(&nodes[right]) {
                pa = next;
                continue;
            }
        }
        pa = nodes[pa].adjacent?;
    }
}

/// `combine`: appends non-overlapping motifs in seed-coordinate order, or
/// nests a single-stem `b` inside one of `a`'s Range elements.
pub fn combine(a: &Motif, b: &Motif) -> Option<Motif> {
    let mut result = if motif_before(a, b) {
        Some(append(a, b))
    } else if motif_before(b, a) {
        Some(append(b, a))
    } else {
        insert(a, b)
    };

    if let Some(r) = result.as_mut() {
        r.next = b.next;
    }
    result
}

/// Sum of `length` over every Left node reachable from the root
/// (`motif_num_base_pair`).
pub fn motif_num_base_pair(m: &Motif) -> usize {
    let mut total = 0;
    let mut cur = Some(m.root);
    while let Some(id) = cur {
        let node = &m.nodes[id];
        if node.kind == ExprKind::Left {
            total += node.length;
        }
        cur = match node.kind {
            ExprKind::Left => node.nested,
            _ => node.adjacent,
        };
    }
    total
}

/// Decoded sequence and bracket/dot structure string, in 5'-to-3' order
/// (`motif_to_string`). This pair is the motif's canonical equivalence
/// key: two motifs are considered equivalent iff both strings match
/// (SPEC_FULL.md §9's "Open question" — the retired structural-equality
/// check in the original stays retired).
pub fn motif_to_string(m: &Motif, seed: &DString) -> (String, String) {
    let n = motif_end(m) - motif_start(m) + 1;
    let mut seq = String::with_capacity(n);
    let mut sec = String::with_capacity(n);

    let mut cur = Some(m.root);
    while let Some(id) = cur {
        let node = &m.nodes[id];
        let bracket = match node.kind {
            ExprKind::Left => '(',
            ExprKind::Right => ')',
            ExprKind::Range => '.',
        };
        for k in 0..node.length {
            let sym = get_sym_5_to_3(&m.nodes, seed, id, k);
            seq.push(alphabet::decode(sym) as char);
            sec.push(bracket);
        }
        cur = match node.kind {
            ExprKind::Left => node.nested,
            _ => node.adjacent,
        };
    }

    (seq, sec)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed() -> DString {
        DString::encode(b"GGGGAAAACCCC").unwrap()
    }

    #[test]
    fn new_stem_motif_has_three_nodes_in_order() {
        let m = new_stem_motif(0, 11, 4, 0);
        assert_eq!(m.nodes.len(), 3);
        assert_eq!(m.nodes[0].kind, ExprKind::Left);
        assert_eq!(m.nodes[1].kind, ExprKind::Range);
        assert_eq!(m.nodes[2].kind, ExprKind::Right);
        assert_eq!(m.nodes[1].length, 4);
        assert_eq!(motif_num_base_pair(&m), 8);
    }

    #[test]
    fn motif_to_string_is_all_jokers_when_unspecialised() {
        let m = new_stem_motif(0, 11, 4, 0);
        let (seq, sec) = motif_to_string(&m, &seed());
        assert_eq!(seq, "NNNNNNNNNNNN");
        assert_eq!(sec, "((((....))))");
        assert_eq!(sec.len(), seq.len());
    }

    #[test]
    fn fixing_a_left_position_reveals_its_seed_symbol() {
        let mut m = new_stem_motif(0, 11, 4, 0);
        m.nodes[0].mask.as_mut().unwrap().insert(0);
        m.num_fixed_pos = 1;
        let (seq, _) = motif_to_string(&m, &seed());
        assert_eq!(seq.as_bytes()[0], b'G');
    }

    #[test]
    fn clone_preserves_the_equivalence_key() {
        let m = new_stem_motif(0, 11, 4, 0);
        let cloned = m.clone();
        assert_eq!(motif_to_string(&m, &seed()), motif_to_string(&cloned, &seed()));
    }

    #[test]
    fn stem_within_detects_strict_nesting() {
        let outer = new_stem_motif(0, 11, 3, 0);
        let inner = new_stem_motif(1, 10, 3, 0);
        assert!(stem_within(&inner, &outer));
        assert!(!stem_within(&outer, &inner));
    }

    #[test]
    fn combine_appends_disjoint_motifs() {
        let a = new_stem_motif(0, 5, 2, 0);
        let b = new_stem_motif(10, 15, 2, 0);
        let combined = combine(&a, &b).expect("disjoint motifs always combine");
        assert_eq!(combined.num_stem, 2);
        assert_eq!(motif_num_base_pair(&combined), 4);
    }

    #[test]
    fn combine_inserts_a_single_stem_into_a_range() {
        let outer = new_stem_motif(0, 19, 2, 0); // range spans [2,17]
        let inner = new_stem_motif(5, 14, 2, 0);
        let combined = combine(&outer, &inner).expect("inner stem sits inside outer's loop");
        assert_eq!(combined.num_stem, 2);
        assert_eq!(motif_num_base_pair(&combined), 4);
    }

    #[test]
    fn combine_rejects_overlapping_motifs() {
        let a = new_stem_motif(0, 10, 3, 0);
        let b = new_stem_motif(2, 12, 3, 0);
        assert!(combine(&a, &b).is_none());
    }
}
