mod common;

use std::fs;

use tempfile::TempDir;

use crate::common::{run_seqclust, write_test_fasta};

#[test]
fn help_lists_the_classification_options() {
    let assert = run_seqclust(&["--help"]).success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for option in ["--input", "--classes", "--width", "--flip", "--bg-class", "--seed"] {
        assert!(stdout.contains(option), "help is missing {}", option);
    }
}

#[test]
fn input_argument_is_required() {
    run_seqclust(&["-k", "2"]).failure();
}

#[test]
fn missing_input_file_fails() {
    run_seqclust(&["-i", "does_not_exist.fa", "-q"]).failure();
}

#[test]
fn zero_classes_is_rejected() {
    let dir = TempDir::new().unwrap();
    let fasta = dir.path().join("input.fa");
    write_test_fasta(&fasta);

    run_seqclust(&["-i", fasta.to_str().unwrap(), "-k", "0", "-q"]).failure();
}

#[test]
fn oversized_motif_width_is_rejected() {
    let dir = TempDir::new().unwrap();
    let fasta = dir.path().join("input.fa");
    write_test_fasta(&fasta);

    // sequences are 12 bp, a 13 bp motif cannot fit
    run_seqclust(&["-i", fasta.to_str().unwrap(), "-w", "13", "-q"]).failure();
}

#[test]
fn unknown_seeding_method_is_rejected() {
    let dir = TempDir::new().unwrap();
    let fasta = dir.path().join("input.fa");
    write_test_fasta(&fasta);

    run_seqclust(&[
        "-i",
        fasta.to_str().unwrap(),
        "-w",
        "4",
        "--seeding",
        "mystery",
        "-q",
    ])
    .failure();
}

#[test]
fn ragged_fasta_is_rejected() {
    let dir = TempDir::new().unwrap();
    let fasta = dir.path().join("ragged.fa");
    fs::write(&fasta, ">a\nACGTACGT\n>b\nACGT\n").unwrap();

    run_seqclust(&["-i", fasta.to_str().unwrap(), "-q"]).failure();
}

#[test]
fn non_dna_characters_are_rejected() {
    let dir = TempDir::new().unwrap();
    let fasta = dir.path().join("invalid.fa");
    fs::write(&fasta, ">a\nACGTNCGT\n>b\nACGTACGT\n").unwrap();

    run_seqclust(&["-i", fasta.to_str().unwrap(), "-w", "4", "-q"]).failure();
}

#[test]
fn zero_iteration_cap_is_rejected() {
    let dir = TempDir::new().unwrap();
    let fasta = dir.path().join("input.fa");
    write_test_fasta(&fasta);

    run_seqclust(&["-i", fasta.to_str().unwrap(), "-n", "0", "-q"]).failure();
}
