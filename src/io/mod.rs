//! Sequence input. Grounded on `original_source/src/libbio/seq.c`'s
//! `bio_read_fasta`/`bio_fasta_has_next`/`bio_read_seq_fasta`.

pub mod fasta;

use crate::alphabet::DString;
use crate::error::Result;

/// An iterable source of `(description, sequence)` pairs, storage-agnostic
/// the way the original's file-handle-based reader is storage-specific but
/// the algorithm layer never cares (§6.1: "the core does not prescribe
/// storage or format").
pub trait SequenceInput {
    fn into_sequences(self) -> Result<Vec<(String, DString)>>;
}
