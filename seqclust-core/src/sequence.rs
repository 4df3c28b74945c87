//! The immutable N x L matrix of DNA sequences the engine classifies.

use std::fs::File;
use std::path::Path;

use bio::io::fasta;

use crate::dna;
use crate::matrix::Matrix2D;
use crate::types::SeqClustError;

/// An N x L matrix of DNA bases, validated and canonicalized at
/// construction time.
///
/// Bases are stored as alphabet indices (A=0, C=1, G=2, T=3), so lookups
/// in the classification hot loops need no further validation. The matrix
/// is immutable once built.
///
/// # Examples
///
/// ```rust
/// use seqclust_core::sequence::SequenceMatrix;
///
/// let sequences = SequenceMatrix::from_rows(&[b"ACGT", b"acgt"])?;
/// assert_eq!(sequences.n_seq(), 2);
/// assert_eq!(sequences.seq_len(), 4);
/// assert_eq!(sequences.base_at(1, 0), b'A'); // canonicalized to upper case
/// # Ok::<(), seqclust_core::types::SeqClustError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SequenceMatrix {
    indices: Matrix2D<u8>,
}

impl SequenceMatrix {
    /// Builds a sequence matrix from equal-length byte rows.
    ///
    /// # Errors
    ///
    /// - [`SeqClustError::InvalidConfig`] if no rows or empty rows are given
    /// - [`SeqClustError::ShapeMismatch`] if row lengths differ
    /// - [`SeqClustError::InvalidBase`] on any character outside
    ///   {A, C, G, T, a, c, g, t}
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, SeqClustError> {
        if rows.is_empty() {
            return Err(SeqClustError::InvalidConfig(
                "at least one sequence is required".to_string(),
            ));
        }
        let length = rows[0].as_ref().len();
        if length == 0 {
            return Err(SeqClustError::InvalidConfig(
                "sequences must not be empty".to_string(),
            ));
        }

        let mut indices = Matrix2D::new(rows.len(), length, 0u8);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != length {
                return Err(SeqClustError::ShapeMismatch(format!(
                    "sequence {} has length {}, expected {}",
                    i,
                    row.len(),
                    length
                )));
            }
            for (j, &base) in row.iter().enumerate() {
                indices[(i, j)] = dna::base_index(base)? as u8;
            }
        }
        Ok(Self { indices })
    }

    /// Reads every record of a FASTA file into a sequence matrix.
    ///
    /// All records must have the same length and contain only DNA bases;
    /// case is canonicalized.
    ///
    /// # Errors
    ///
    /// Returns [`SeqClustError::IoError`] if the file cannot be opened,
    /// [`SeqClustError::ParseError`] on malformed FASTA, and the
    /// [`Self::from_rows`] errors for invalid sequence content.
    pub fn from_fasta<P: AsRef<Path>>(path: P) -> Result<Self, SeqClustError> {
        let file = File::open(path)?;
        let reader = fasta::Reader::new(file);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| SeqClustError::ParseError(e.to_string()))?;
            rows.push(record.seq().to_vec());
        }
        Self::from_rows(&rows)
    }

    /// Number of sequences (rows).
    #[must_use]
    pub fn n_seq(&self) -> usize {
        self.indices.n_row()
    }

    /// Common sequence length (columns).
    #[must_use]
    pub fn seq_len(&self) -> usize {
        self.indices.n_col()
    }

    /// Alphabet index (0..4) of the base at `(seq, position)`.
    #[must_use]
    pub fn index_at(&self, seq: usize, position: usize) -> usize {
        self.indices[(seq, position)] as usize
    }

    /// Canonical (upper-case) base character at `(seq, position)`.
    #[must_use]
    pub fn base_at(&self, seq: usize, position: usize) -> u8 {
        dna::BASES[self.index_at(seq, position)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn from_rows_encodes_and_canonicalizes() {
        let sequences = SequenceMatrix::from_rows(&[b"ACGT", b"tgca"]).unwrap();
        assert_eq!(sequences.n_seq(), 2);
        assert_eq!(sequences.seq_len(), 4);
        assert_eq!(sequences.index_at(0, 0), 0);
        assert_eq!(sequences.index_at(1, 0), 3);
        assert_eq!(sequences.base_at(1, 1), b'G');
    }

    #[test]
    fn from_rows_rejects_empty_input() {
        let rows: [&[u8]; 0] = [];
        assert!(matches!(
            SequenceMatrix::from_rows(&rows),
            Err(SeqClustError::InvalidConfig(_))
        ));
        assert!(matches!(
            SequenceMatrix::from_rows(&[b""]),
            Err(SeqClustError::InvalidConfig(_))
        ));
    }

    #[test]
    fn from_rows_rejects_unequal_lengths() {
        assert!(matches!(
            SequenceMatrix::from_rows(&[b"ACGT".as_slice(), b"ACG".as_slice()]),
            Err(SeqClustError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn from_rows_rejects_invalid_base() {
        assert!(matches!(
            SequenceMatrix::from_rows(&[b"ACNT"]),
            Err(SeqClustError::InvalidBase('N'))
        ));
    }

    #[test]
    fn from_fasta_reads_records() {
        let dir = std::env::temp_dir();
        let path = dir.join("seqclust_sequence_matrix_test.fa");
        let mut file = File::create(&path).unwrap();
        writeln!(file, ">one\nACGT\n>two\ntgca").unwrap();
        drop(file);

        let sequences = SequenceMatrix::from_fasta(&path).unwrap();
        assert_eq!(sequences.n_seq(), 2);
        assert_eq!(sequences.seq_len(), 4);
        assert_eq!(sequences.base_at(0, 0), b'A');

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn from_fasta_missing_file_is_io_error() {
        assert!(matches!(
            SequenceMatrix::from_fasta("no_such_file.fa"),
            Err(SeqClustError::IoError(_))
        ));
    }
}
