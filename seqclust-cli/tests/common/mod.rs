#![allow(dead_code)]

use std::fs;
use std::path::Path;

use assert_cmd::Command;

/// Six equal-length sequences sharing an ACGT core at varying offsets.
pub const TEST_FASTA: &str = "\
>seq1
ACGTACGTACGT
>seq2
TTACGTGGCATA
>seq3
GGACGTTTACCA
>seq4
CCACGTAAGTTG
>seq5
ATACGTCCGATT
>seq6
GTACGTAGCTAA
";

/// Number of sequences in [`TEST_FASTA`].
pub const TEST_N_SEQ: usize = 6;

/// Common sequence length in [`TEST_FASTA`].
pub const TEST_SEQ_LEN: usize = 12;

pub fn write_test_fasta(path: &Path) {
    fs::write(path, TEST_FASTA).unwrap();
}

/// Runs the seqclust binary with the given arguments.
pub fn run_seqclust(args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("seqclust").unwrap();
    cmd.args(args);
    cmd.assert()
}

/// Parses a whitespace-separated numeric matrix file.
pub fn read_matrix(path: &Path) -> Vec<Vec<f64>> {
    let text = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e));
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            line.split_whitespace()
                .map(|token| token.parse().unwrap())
                .collect()
        })
        .collect()
}
