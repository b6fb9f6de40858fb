//! A minimal streaming FASTA reader. The teacher's own `bio::io::fasta`
//! module (used elsewhere in the pack as `fasta::Reader::new(reader).records()`)
//! isn't part of the retrieved subset, so this is a small from-scratch
//! reader in the same per-record streaming style, validating each
//! sequence's characters against the IUPAC alphabet as it reads
//! (`bio_read_seq_fasta`'s character check in the original).

use std::io::{BufRead, BufReader, Read};

use crate::alphabet::DString;
use crate::error::{Result, SeedError};

use super::SequenceInput;

/// Wraps any `Read` in buffered, per-record FASTA parsing.
pub struct Reader<R> {
    reader: BufReader<R>,
}

impl<R: Read> Reader<R> {
    pub fn new(reader: R) -> Self {
        Reader {
            reader: BufReader::new(reader),
        }
    }

    pub fn records(self) -> Records<R> {
        Records {
            reader: self.reader,
            next_header: None,
            done: false,
        }
    }
}

/// Iterator over `(description, sequence)` records, in file order.
pub struct Records<R> {
    reader: BufReader<R>,
    next_header: Option<String>,
    done: bool,
}

impl<R: Read> Records<R> {
    fn read_header(&mut self) -> Result<Option<String>> {
        if let Some(h) = self.next_header.take() {
            return Ok(Some(h));
        }
        let mut line = String::new();
        loop {
            line.clear();
            let n = self.reader.read_line(&mut line).map_err(SeedError::Io)?;
            if n == 0 {
                return Ok(None);
            }
            let trimmed = line.trim_end();
            if trimmed.is_empty() {
                continue;
            }
            return match trimmed.strip_prefix('>') {
                Some(rest) => Ok(Some(rest.to_string())),
                None => Err(SeedError::Fasta(format!(
                    "expected a '>' header line, found {:?}",
                    trimmed
                ))),
            };
        }
    }
}

impl<R: Read> Iterator for Records<R> {
    type Item = Result<(String, DString)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let description = match self.read_header() {
            Ok(Some(h)) => h,
            Ok(None) => {
                self.done = true;
                return None;
            }
            Err(e) => {
                self.done = true;
                return Some(Err(e));
            }
        };

        let mut seq = String::new();
        let mut line = String::new();
        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => {
                    self.done = true;
                    break;
                }
                Ok(_) => {
                    let trimmed = line.trim_end();
                    if let Some(rest) = trimmed.strip_prefix('>') {
                        self.next_header = Some(rest.to_string());
                        break;
                    }
                    seq.push_str(trimmed);
                }
                Err(e) => return Some(Err(SeedError::Io(e))),
            }
        }

        if seq.is_empty() {
            return Some(Err(SeedError::Fasta(format!(
                "sequence {:?} has no bases",
                description
            ))));
        }

        Some(DString::encode(seq.as_bytes()).map(|d| (description, d)))
    }
}

impl<R: Read> SequenceInput for Reader<R> {
    fn into_sequences(self) -> Result<Vec<(String, DString)>> {
        self.records().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_two_records() {
        let data = b">one\nGGGG\nAAAA\n>two\nCCCC\n".to_vec();
        let records: Result<Vec<_>> = Reader::new(&data[..]).records().collect();
        let records = records.expect("well-formed FASTA");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].0, "one");
        assert_eq!(records[0].1.to_ascii(), b"GGGGAAAA$");
        assert_eq!(records[1].0, "two");
    }

    #[test]
    fn rejects_a_non_iupac_character() {
        let data = b">one\nGGGXAAAA\n".to_vec();
        let records: Result<Vec<_>> = Reader::new(&data[..]).records().collect();
        assert!(records.is_err());
    }

    #[test]
    fn rejects_text_before_the_first_header() {
        let data = b"GGGG\n>one\nAAAA\n".to_vec();
        let records: Result<Vec<_>> = Reader::new(&data[..]).records().collect();
        assert!(records.is_err());
    }
}
