//! Rendering discovered motifs and their matches. Grounded on
//! `original_source/src/algorithms/motif.c`'s `save_matches`, `save_motif`,
//! `save_matches_as_ct`, and `save_motifs`, which write an XML-ish dump and
//! a classic connectivity-table (`.ct`) file per match into a directory
//! tree named from the seed description (`make_dirname`). This module
//! keeps the CT writer (§10.5 calls out its exact column format as worth
//! preserving) and replaces the XML dump with a single `serde_json`
//! report, the way [`crate::params`] replaces the original's XML parameter
//! dump with JSON.

use std::io::Write;

use serde::Serialize;

use crate::alphabet::DString;
use crate::discover::RunStats;
use crate::error::Result;
use crate::matcher::{self, Match};
use crate::motif::{self, Motif};
use crate::params::Params;
use crate::suffix_array::VTree;

#[derive(Serialize)]
pub struct MatchReport {
    pub sequence_id: Option<usize>,
    pub offset: usize,
    pub length: usize,
    pub sequence: String,
    pub structure: String,
}

impl From<Match> for MatchReport {
    fn from(m: Match) -> Self {
        MatchReport {
            sequence_id: m.id,
            offset: m.offset,
            length: m.length,
            sequence: m.sequence,
            structure: m.structure,
        }
    }
}

#[derive(Serialize)]
pub struct MotifReport {
    pub sequence: String,
    pub structure: String,
    pub num_stem: usize,
    pub num_fixed_pos: usize,
    pub support: f64,
    pub matches: Vec<MatchReport>,
}

#[derive(Serialize)]
pub struct Report {
    pub motifs: Vec<MotifReport>,
    pub match_operations: u64,
}

/// Builds the full report: every surviving motif's canonical
/// `(sequence, structure)` pair plus every one of its matches across
/// `vs` (`save_matches`/`save_motif`, folded into one pass).
pub fn build_report(motifs: &[Motif], vs: &[VTree], seed: &DString, params: &Params, stats: &RunStats) -> Report {
    let mut reports = Vec::with_capacity(motifs.len());

    for m in motifs {
        let (sequence, structure) = motif::motif_to_string(m, seed);
        let mut matches = Vec::new();
        for v in vs {
            for found in matcher::find_matches(v, m, seed, params.save_all_matches, params) {
                matches.push(MatchReport::from(found));
            }
        }
        reports.push(MotifReport {
            sequence,
            structure,
            num_stem: m.num_stem,
            num_fixed_pos: m.num_fixed_pos,
            support: m.support,
            matches,
        });
    }

    Report {
        motifs: reports,
        match_operations: stats.match_count,
    }
}

pub fn write_json<W: Write>(report: &Report, writer: W) -> Result<()> {
    serde_json::to_writer_pretty(writer, report).map_err(|e| crate::error::SeedError::Other(e.to_string()))
}

/// Writes one match as a classic `.ct` connectivity table, embedded at its
/// true offset within the *whole* source sequence `v` rather than
/// renumbered from its own short span — `save_match_as_ct`'s behavior:
/// the structure is an all-dots canvas the length of `v` (minus its
/// terminator) with `m.structure` spliced in at `m.offset`, and the
/// pair table (`create_base_pair_pos_array`) is computed over that full
/// canvas, not over `m.structure` alone.
///
/// Columns are `index base previous next pair natural_numbering`, with
/// `pair = 0` for an unpaired position. `previous`/`next` follow the
/// original's literal (unclamped) arithmetic: `next` at the last
/// position is `n + 1`, not `0`.
pub fn write_ct<W: Write>(description: &str, v: &VTree, m: &Match, mut writer: W) -> Result<()> {
    let n = v.len() - 1; // exclude the trailing terminator symbol
    let sequence: Vec<u8> = v.text[..n].iter().map(|&s| crate::alphabet::decode(s)).collect();

    let mut structure = vec![b'.'; n];
    let match_structure = m.structure.as_bytes();
    for k in 0..m.length {
        structure[m.offset + k] = match_structure[k];
    }

    let mut pair = vec![0usize; n];
    let mut stack = Vec::new();
    for (i, &c) in structure.iter().enumerate() {
        match c {
            b'(' => stack.push(i),
            b')' => {
                if let Some(j) = stack.pop() {
                    pair[i] = j + 1;
                    pair[j] = i + 1;
                }
            }
            _ => {}
        }
    }

    writeln!(writer, "{:5}   dG = 0.0  [initially     0.0]    {}", n, description)?;
    for i in 0..n {
        let index = i + 1;
        writeln!(
            writer,
            "{:5} {} {:5} {:5} {:5} {:5}",
            index, sequence[i] as char, i, i + 2, pair[i], index
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ct_pairs_a_simple_hairpin_spanning_the_whole_sequence() {
        let v = VTree::build(crate::alphabet::DString::encode(b"GGGGAAAACCCC").unwrap().symbols);
        let m = Match {
            id: Some(0),
            offset: 0,
            length: 12,
            sequence: "GGGGAAAACCCC".to_string(),
            structure: "((((....))))".to_string(),
        };
        let mut buf = Vec::new();
        write_ct("hairpin", &v, &m, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 13);
        // position 1 (G) pairs with position 12 (C).
        let row1: Vec<&str> = lines[1].split_whitespace().collect();
        assert_eq!(row1[4], "12");
        let row12: Vec<&str> = lines[12].split_whitespace().collect();
        assert_eq!(row12[4], "1");
        // position 5 (A, first loop base) is unpaired.
        let row5: Vec<&str> = lines[5].split_whitespace().collect();
        assert_eq!(row5[4], "0");
        // last row's `next` is unclamped, matching the original literally.
        assert_eq!(row12[3], "13");
    }

    #[test]
    fn ct_embeds_a_match_at_its_true_offset_in_a_longer_sequence() {
        // The hairpin above, now as the tail of a longer source sequence: the
        // leading bases must render as dots, not be dropped or renumbered.
        let v = VTree::build(crate::alphabet::DString::encode(b"AAAGGGGAAAACCCC").unwrap().symbols);
        let m = Match {
            id: Some(0),
            offset: 3,
            length: 12,
            sequence: "GGGGAAAACCCC".to_string(),
            structure: "((((....))))".to_string(),
        };
        let mut buf = Vec::new();
        write_ct("hairpin", &v, &m, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        // header + 15 positions (full sequence length minus the terminator).
        assert_eq!(lines.len(), 16);
        // the three leading, unmatched bases are unpaired.
        for i in 1..=3 {
            let row: Vec<&str> = lines[i].split_whitespace().collect();
            assert_eq!(row[4], "0");
        }
        // position 4 (the first G of the stem, offset 3 + 1) pairs with
        // position 15 (the last C, offset 3 + 12).
        let row4: Vec<&str> = lines[4].split_whitespace().collect();
        assert_eq!(row4[4], "15");
        let row15: Vec<&str> = lines[15].split_whitespace().collect();
        assert_eq!(row15[4], "4");
    }

    #[test]
    fn json_report_round_trips_through_serde_value() {
        let report = Report {
            motifs: vec![MotifReport {
                sequence: "GGGG".to_string(),
                structure: "((((".to_string(),
                num_stem: 1,
                num_fixed_pos: 0,
                support: 1.0,
                matches: vec![],
            }],
            match_operations: 3,
        };
        let mut buf = Vec::new();
        write_json(&report, &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["match_operations"], 3);
        assert_eq!(value["motifs"][0]["sequence"], "GGGG");
    }
}
