//! Error types for the crate's fallible, data-dependent operations.
//!
//! Programmer errors (out-of-bounds indices, invariant violations in the
//! expression graph) remain `assert!`/`debug_assert!` panics, matching the
//! original C implementation's use of `assert()` for the same conditions.
//! Only user-facing, data-dependent failures (bad FASTA input, invalid
//! parameter combinations, unsupported features) are modeled here.

use thiserror::Error;

/// Errors that can occur while loading sequences, validating parameters, or
/// writing results.
#[derive(Error, Debug)]
pub enum SeedError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed FASTA input: {0}")]
    Fasta(String),

    #[error("sequence {0} contains a character outside the IUPAC nucleotide alphabet: {1:?}")]
    InvalidNucleotide(usize, char),

    #[error("seed index {seed} is out of range for {num_seqs} input sequence(s)")]
    SeedOutOfRange { seed: usize, num_seqs: usize },

    #[error("stem_max_separation ({stem_max_separation}) < 2 * stem_min_len + loop_min_len - 1 ({min_required})")]
    InvalidSeparation {
        stem_max_separation: usize,
        min_required: usize,
    },

    #[error("{0} is not a directory")]
    NotADirectory(String),

    #[error("feature not built into this binary: {0}")]
    FeatureNotBuilt(&'static str),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SeedError>;
