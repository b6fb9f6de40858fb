//! Run parameters: the knobs that shape stem discovery and motif
//! composition. Grounded on `original_source/src/algorithms/seed.h`'s
//! `param_t` struct and its `#define` default constants, and on
//! `seed.c`'s `param_init`/`process_argv`/`save_params`.
//!
//! Unlike the original, command-line parsing lives in `src/bin/seed.rs`
//! via `clap`'s derive macros (see [`crate::cli::SeedArgs`]); this module
//! only holds the validated, algorithm-facing parameter set, serializable
//! with `serde` so a run's configuration can be written out as JSON
//! alongside its results instead of the original's XML `save_params` dump.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SeedError};

/// Parameters governing one discovery run. Field names and defaults
/// mirror `param_t` one-to-one; instrumentation fields (`start_time`,
/// `match_count`, `version`) live outside this struct since they're
/// runtime state, not configuration (see [`crate::discover::RunStats`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Params {
    /// Index, among the input sequences, of the one to use as the seed
    /// whose stems are enumerated (`--seed`).
    pub seed: usize,
    /// Minimum length of a stem's paired region (`--stem_min_len`).
    pub stem_min_len: usize,
    /// Minimum number of stems a surviving motif must contain
    /// (`--min_num_stem`).
    pub min_num_stem: usize,
    /// Stop composing motifs once they reach this many stems
    /// (`--max_num_stem`).
    pub max_num_stem: usize,
    /// Maximum G-U wobble pairs tolerated within one stem
    /// (`--stem_max_gu`).
    pub stem_max_gu: usize,
    /// Maximum distance, in the seed sequence, between a stem's two
    /// halves; `0` means unbounded (`--stem_max_separation`).
    pub stem_max_separation: usize,
    /// Skip the O(n^2) longest-stems-only filtering pass
    /// (`--skip_keep_longest_stems`).
    pub skip_keep_longest_stems: bool,
    /// Minimum loop length between a stem's two halves
    /// (`--loop_min_len`).
    pub loop_min_len: usize,
    /// Disallow G-U wobble pairs entirely (`--nogu`).
    pub nogu: bool,
    /// Maximum run of unpaired positions absorbed into a `Range` element
    /// during matching (`--range`).
    pub range: usize,
    /// Maximum mismatches tolerated while extending a stem
    /// (`--max_mismatch`).
    pub max_mismatch: usize,
    /// Maximum positions a motif may fix before it is emitted as final
    /// (`--max_fixed_pos`).
    pub max_fixed_pos: usize,
    /// Minimum total base pairs (summed stem length) a surviving motif
    /// must have (`--min_base_pair`).
    pub min_base_pair: usize,
    /// Minimum fraction of input sequences a motif must occur in
    /// (`--min_support`).
    pub min_support: f64,
    /// Wall-clock budget in minutes; `0` means unbounded (`--time_limit`).
    pub time_limit: u64,
    /// Record every occurrence of a match, not just one per interval
    /// (`--save_all_matches`).
    pub save_all_matches: bool,
    /// Emit matches in classic connectivity-table (`.ct`) format
    /// (`--save_as_ct`).
    pub save_as_ct: bool,
    /// Emit the surviving motifs themselves, not just their matches
    /// (`--save_motifs`).
    pub save_motifs: bool,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            seed: 0,
            stem_min_len: 3,
            min_num_stem: 1,
            max_num_stem: 2,
            stem_max_gu: 100,
            stem_max_separation: 150,
            skip_keep_longest_stems: false,
            loop_min_len: 4,
            nogu: false,
            range: 1,
            max_mismatch: 1,
            max_fixed_pos: 100,
            min_base_pair: 5,
            min_support: 0.70,
            time_limit: 0,
            save_all_matches: false,
            save_as_ct: false,
            save_motifs: false,
        }
    }
}

impl Params {
    /// Minimum span, in the seed sequence, a stem of length
    /// `stem_min_len` plus its loop can occupy:
    /// `2 * stem_min_len + loop_min_len - 1` (`mindist` in
    /// `stems.c`'s `find_all_stems`).
    pub fn min_stem_span(&self) -> usize {
        2 * self.stem_min_len + self.loop_min_len - 1
    }

    /// Validate cross-field constraints `process_argv` enforces before a
    /// run starts.
    pub fn validate(&self, num_seqs: usize) -> Result<()> {
        if self.stem_max_separation != 0 && self.stem_max_separation < self.min_stem_span() {
            return Err(SeedError::InvalidSeparation {
                stem_max_separation: self.stem_max_separation,
                min_required: self.min_stem_span(),
            });
        }
        if self.seed >= num_seqs {
            return Err(SeedError::SeedOutOfRange {
                seed: self.seed,
                num_seqs,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_original_constants() {
        let p = Params::default();
        assert_eq!(p.stem_min_len, 3);
        assert_eq!(p.max_num_stem, 2);
        assert_eq!(p.max_mismatch, 1);
        assert!((p.min_support - 0.70).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_too_small_separation() {
        let mut p = Params::default();
        p.stem_max_separation = 1;
        assert!(p.validate(1).is_err());
    }

    #[test]
    fn zero_separation_means_unbounded() {
        let mut p = Params::default();
        p.stem_max_separation = 0;
        assert!(p.validate(1).is_ok());
    }

    #[test]
    fn rejects_out_of_range_seed() {
        let mut p = Params::default();
        p.seed = 5;
        assert!(p.validate(2).is_err());
    }
}
