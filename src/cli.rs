//! Command-line argument surfaces for the `seed` and `seed-find` binaries.
//! Grounded on `original_source/src/algorithms/seed.c`'s `process_argv`
//! (every option name and default below is read verbatim from there/
//! `seed.h`), re-expressed as a `clap::Parser` derive struct the way this
//! pack's CLIs do rather than the original's hand-rolled `getopt` loop.

use std::path::PathBuf;

use clap::Parser;

use crate::error::Result;
use crate::params::Params;

/// `seed`: discover motifs shared across a set of input sequences.
#[derive(Parser, Debug)]
#[command(name = "seed", about = "Discover RNA secondary-structure motifs shared across a set of sequences")]
pub struct SeedArgs {
    /// FASTA file of input sequences.
    pub input: PathBuf,

    /// Directory matches and the JSON report are written into.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    #[arg(long, default_value_t = 0)]
    pub seed: usize,
    #[arg(long, default_value_t = 3)]
    pub stem_min_len: usize,
    #[arg(long, default_value_t = 1)]
    pub min_num_stem: usize,
    #[arg(long, default_value_t = 2)]
    pub max_num_stem: usize,
    #[arg(long, default_value_t = 100)]
    pub stem_max_gu: usize,
    #[arg(long, default_value_t = 150)]
    pub stem_max_separation: usize,
    #[arg(long)]
    pub skip_keep_longest_stems: bool,
    #[arg(long, default_value_t = 4)]
    pub loop_min_len: usize,
    #[arg(long)]
    pub nogu: bool,
    #[arg(long, default_value_t = 1)]
    pub range: usize,
    #[arg(long, default_value_t = 1)]
    pub max_mismatch: usize,
    #[arg(long, default_value_t = 100)]
    pub max_fixed_pos: usize,
    #[arg(long, default_value_t = 5)]
    pub min_base_pair: usize,
    #[arg(long, default_value_t = 0.70)]
    pub min_support: f64,
    #[arg(long, default_value_t = 0)]
    pub time_limit: u64,
    #[arg(long)]
    pub save_all_matches: bool,
    #[arg(long)]
    pub save_as_ct: bool,
    #[arg(long)]
    pub save_motifs: bool,

    /// Accepted for compatibility with the original's optional RNAlib
    /// scoring pass; this build carries no bundled energy model, so
    /// passing it fails fast with `SeedError::FeatureNotBuilt`.
    #[arg(long)]
    pub energy: bool,

    /// Increase log verbosity (`-v`, `-vv`, ...).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl SeedArgs {
    pub fn to_params(&self, num_seqs: usize) -> Result<Params> {
        let params = Params {
            seed: self.seed,
            stem_min_len: self.stem_min_len,
            min_num_stem: self.min_num_stem,
            max_num_stem: self.max_num_stem,
            stem_max_gu: self.stem_max_gu,
            stem_max_separation: self.stem_max_separation,
            skip_keep_longest_stems: self.skip_keep_longest_stems,
            loop_min_len: self.loop_min_len,
            nogu: self.nogu,
            range: self.range,
            max_mismatch: self.max_mismatch,
            max_fixed_pos: self.max_fixed_pos,
            min_base_pair: self.min_base_pair,
            min_support: self.min_support,
            time_limit: self.time_limit,
            save_all_matches: self.save_all_matches,
            save_as_ct: self.save_as_ct,
            save_motifs: self.save_motifs,
        };
        params.validate(num_seqs)?;
        Ok(params)
    }
}

/// `seed-find`: match one already-known stem (given by its coordinates in
/// a reference sequence) against a separate set of candidate sequences,
/// the standalone-matcher counterpart to full discovery.
#[derive(Parser, Debug)]
#[command(name = "seed-find", about = "Match a known stem against a set of candidate sequences")]
pub struct FindArgs {
    /// FASTA file of candidate sequences to search.
    pub input: PathBuf,

    /// FASTA file containing the single reference sequence the stem
    /// coordinates below are expressed against.
    pub reference: PathBuf,

    /// Directory matches are written into.
    #[arg(long, default_value = ".")]
    pub out_dir: PathBuf,

    /// 0-based start of the stem's left arm in the reference sequence.
    #[arg(long)]
    pub stem_start: usize,
    /// 0-based position of the stem's outermost right-arm base.
    #[arg(long)]
    pub stem_end: usize,
    /// Arm length.
    #[arg(long)]
    pub stem_length: usize,

    #[arg(long, default_value_t = 1)]
    pub max_mismatch: usize,
    #[arg(long, default_value_t = 1)]
    pub range: usize,
    #[arg(long)]
    pub nogu: bool,
    #[arg(long)]
    pub save_all_matches: bool,
    #[arg(long)]
    pub save_as_ct: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl FindArgs {
    pub fn to_params(&self) -> Params {
        let mut params = Params::default();
        params.max_mismatch = self.max_mismatch;
        params.range = self.range;
        params.nogu = self.nogu;
        params.save_all_matches = self.save_all_matches;
        params.save_as_ct = self.save_as_ct;
        params
    }
}
