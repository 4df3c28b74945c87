//! DNA alphabet codec, background composition, and log-space window scoring.

use crate::constants::NUM_BASES;
use crate::matrix::Matrix2D;
use crate::sequence::SequenceMatrix;
use crate::types::{BaseProbs, SeqClustError};

/// The canonical base for each index, in index order.
pub const BASES: [u8; NUM_BASES] = *b"ACGT";

/// Maps a base to its index: A=0, C=1, G=2, T=3, case-insensitive.
///
/// # Errors
///
/// Returns [`SeqClustError::InvalidBase`] for any other character.
pub fn base_index(base: u8) -> Result<usize, SeqClustError> {
    match base {
        b'A' | b'a' => Ok(0),
        b'C' | b'c' => Ok(1),
        b'G' | b'g' => Ok(2),
        b'T' | b't' => Ok(3),
        other => Err(SeqClustError::InvalidBase(other as char)),
    }
}

/// Maps a base to the index of its complement (A <-> T, C <-> G).
///
/// Equivalent to `3 - base_index(base)`.
///
/// # Errors
///
/// Returns [`SeqClustError::InvalidBase`] for any non-DNA character.
pub fn base_index_complement(base: u8) -> Result<usize, SeqClustError> {
    Ok(NUM_BASES - 1 - base_index(base)?)
}

/// Returns the complementary base, preserving case.
///
/// # Errors
///
/// Returns [`SeqClustError::InvalidBase`] for any non-DNA character.
pub fn complement(base: u8) -> Result<u8, SeqClustError> {
    match base {
        b'A' => Ok(b'T'),
        b'a' => Ok(b't'),
        b'C' => Ok(b'G'),
        b'c' => Ok(b'g'),
        b'G' => Ok(b'C'),
        b'g' => Ok(b'c'),
        b'T' => Ok(b'A'),
        b't' => Ok(b'a'),
        other => Err(SeqClustError::InvalidBase(other as char)),
    }
}

/// Per-base frequencies over the whole sequence matrix.
///
/// With `both_strands`, every position also contributes its complement, so
/// the result is palindromic (`p[A] == p[T]`, `p[C] == p[G]`). Alphabet
/// validity is guaranteed by [`SequenceMatrix`] construction.
#[must_use]
pub fn base_composition(sequences: &SequenceMatrix, both_strands: bool) -> BaseProbs {
    let mut counts = [0.0; NUM_BASES];
    let mut total = 0.0;
    for i in 0..sequences.n_seq() {
        for j in 0..sequences.seq_len() {
            let index = sequences.index_at(i, j);
            counts[index] += 1.0;
            total += 1.0;
            if both_strands {
                counts[NUM_BASES - 1 - index] += 1.0;
                total += 1.0;
            }
        }
    }
    for count in &mut counts {
        *count /= total;
    }
    counts
}

/// Scores the window `[from, from + W)` of sequence `seq_index` against a
/// 4 x W log-probability motif.
///
/// Returns the summed log-likelihood; the caller exponentiates to obtain a
/// probability. The motif must have been pseudocount-floored before taking
/// logs so that every cell is finite.
#[must_use]
pub fn score_window(
    sequences: &SequenceMatrix,
    seq_index: usize,
    from: usize,
    motif_log: &Matrix2D<f64>,
) -> f64 {
    assert_eq!(motif_log.n_row(), NUM_BASES, "motif must have 4 rows");
    assert!(seq_index < sequences.n_seq(), "sequence index out of range");
    let to = from + motif_log.n_col();
    assert!(to <= sequences.seq_len(), "window exceeds sequence length");

    let mut log_likelihood = 0.0;
    for (j, position) in (from..to).enumerate() {
        log_likelihood += motif_log[(sequences.index_at(seq_index, position), j)];
    }
    log_likelihood
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_index_maps_both_cases() {
        for (i, base) in BASES.iter().enumerate() {
            assert_eq!(base_index(*base).unwrap(), i);
            assert_eq!(base_index(base.to_ascii_lowercase()).unwrap(), i);
        }
    }

    #[test]
    fn base_index_rejects_non_dna() {
        for base in [b'N', b'n', b'U', b'-', b' ', b'1'] {
            assert!(matches!(
                base_index(base),
                Err(SeqClustError::InvalidBase(_))
            ));
        }
    }

    #[test]
    fn complement_index_is_mirrored() {
        assert_eq!(base_index_complement(b'A').unwrap(), 3);
        assert_eq!(base_index_complement(b'C').unwrap(), 2);
        assert_eq!(base_index_complement(b'G').unwrap(), 1);
        assert_eq!(base_index_complement(b'T').unwrap(), 0);
    }

    #[test]
    fn complement_preserves_case() {
        assert_eq!(complement(b'A').unwrap(), b'T');
        assert_eq!(complement(b'g').unwrap(), b'c');
        assert!(complement(b'N').is_err());
    }

    #[test]
    fn composition_single_strand() {
        let sequences = SequenceMatrix::from_rows(&[b"AACG", b"AATT"]).unwrap();
        let probs = base_composition(&sequences, false);
        assert_eq!(probs, [4.0 / 8.0, 1.0 / 8.0, 1.0 / 8.0, 2.0 / 8.0]);
    }

    #[test]
    fn composition_both_strands_is_palindromic() {
        let sequences = SequenceMatrix::from_rows(&[b"AAAC", b"AGGG"]).unwrap();
        let probs = base_composition(&sequences, true);
        assert!((probs[0] - probs[3]).abs() < 1e-12);
        assert!((probs[1] - probs[2]).abs() < 1e-12);
        assert!((probs.iter().sum::<f64>() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn window_score_sums_log_cells() {
        let sequences = SequenceMatrix::from_rows(&[b"ACGT"]).unwrap();
        // log-motif that scores 0.0 for the bases of "CG" and ln(0.5) otherwise
        let mut motif_log = Matrix2D::new(4, 2, 0.5f64.ln());
        motif_log[(1, 0)] = 0.0;
        motif_log[(2, 1)] = 0.0;

        assert_eq!(score_window(&sequences, 0, 1, &motif_log), 0.0);
        let off_target = score_window(&sequences, 0, 0, &motif_log);
        assert!((off_target - 2.0 * 0.5f64.ln()).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "window exceeds sequence length")]
    fn window_past_end_panics() {
        let sequences = SequenceMatrix::from_rows(&[b"ACGT"]).unwrap();
        let motif_log = Matrix2D::new(4, 3, 0.0);
        score_window(&sequences, 0, 2, &motif_log);
    }
}
