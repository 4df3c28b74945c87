//! # SeqClust CLI - EM Sequence Classifier
//!
//! Command-line front end for the SeqClust classification engine.
//!
//! ## Usage
//!
//! ```bash
//! # Classify into 4 classes with 12 bp motifs
//! seqclust -i promoters.fasta -k 4 -w 12 -o promoters
//!
//! # Reproducible run, scoring both strands, with a background class
//! seqclust -i sites.fasta -k 2 -w 8 --flip --bg-class --seed run-1
//!
//! # Cap the iteration budget and keep stderr quiet
//! seqclust -i sites.fasta -n 500 -q
//! ```
//!
//! ## Options
//!
//! - `-i, --input <FILE>`: input FASTA file of equal-length DNA sequences
//! - `-o, --output <PREFIX>`: prefix for the result matrices (default: seqclust)
//! - `-k, --classes <K>`: number of classes to discover (default: 2)
//! - `-w, --width <W>`: motif width in bases (default: 10)
//! - `-n, --iterations <N>`: iteration cap (default: 100)
//! - `--flip`: also score the reverse-complement strand
//! - `--bg-class`: add a class frozen to the background composition
//! - `--center-shift`: re-center the shift distribution each iteration
//! - `--seed <STRING>`: seed string for reproducible runs
//! - `--seeding <METHOD>`: posterior seeding method (default: random)
//! - `--threads <N>`: worker threads for the E/M loops
//! - `-q, --quiet`: suppress progress messages
//!
//! ## Output
//!
//! One `<prefix>_motif_<k>.mat` file per class (W x 4, one line per motif
//! position), plus `<prefix>_posterior.mat`, `<prefix>_class_prob.mat`,
//! and `<prefix>_class_prob_marginal.mat`.

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command};
use indicatif::ProgressBar;

use seqclust_core::config::EmConfig;
use seqclust_core::engine::{ClusteringEngine, EmSequenceEngine};
use seqclust_core::output::write_result_files;
use seqclust_core::progress::ProgressSink;
use seqclust_core::sequence::SequenceMatrix;
use seqclust_core::types::StepOutcome;

/// Progress sink backed by an indicatif bar; hidden in quiet mode.
struct BarProgress(ProgressBar);

impl ProgressSink for BarProgress {
    fn notify(&mut self, iteration: usize) {
        self.0.set_position(iteration as u64);
    }
}

/// Main entry point for the SeqClust CLI.
///
/// Parses command-line arguments, loads the sequence matrix, runs the EM
/// engine up to the iteration cap or convergence, and writes the result
/// matrices.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("seqclust")
        .version(env!("CARGO_PKG_VERSION"))
        .about("EM classification of fixed-length DNA sequences")
        .arg(
            Arg::new("input")
                .short('i')
                .long("input")
                .value_name("FILE")
                .required(true)
                .help("Input FASTA file of equal-length DNA sequences"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("PREFIX")
                .default_value("seqclust")
                .help("Prefix for the result matrices"),
        )
        .arg(
            Arg::new("classes")
                .short('k')
                .long("classes")
                .value_name("K")
                .default_value("2")
                .help("Number of classes to discover"),
        )
        .arg(
            Arg::new("width")
                .short('w')
                .long("width")
                .value_name("W")
                .default_value("10")
                .help("Motif width in bases"),
        )
        .arg(
            Arg::new("iterations")
                .short('n')
                .long("iterations")
                .value_name("N")
                .default_value("100")
                .help("Maximum number of EM iterations"),
        )
        .arg(
            Arg::new("flip")
                .long("flip")
                .action(ArgAction::SetTrue)
                .help("Also score the reverse-complement strand"),
        )
        .arg(
            Arg::new("bg-class")
                .long("bg-class")
                .action(ArgAction::SetTrue)
                .help("Add an extra class frozen to the background composition"),
        )
        .arg(
            Arg::new("center-shift")
                .long("center-shift")
                .action(ArgAction::SetTrue)
                .help("Re-center the shift distribution after each iteration"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_name("STRING")
                .help("Seed string for reproducible runs"),
        )
        .arg(
            Arg::new("seeding")
                .long("seeding")
                .value_name("METHOD")
                .default_value("random")
                .help("Posterior seeding method"),
        )
        .arg(
            Arg::new("threads")
                .long("threads")
                .value_name("N")
                .help("Number of worker threads (default: all cores)"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .help("Suppress progress messages"),
        )
        .get_matches();

    let input = matches
        .get_one::<String>("input")
        .ok_or("an input FASTA file is required")?;
    let quiet = matches.get_flag("quiet");

    let n_classes: usize = matches
        .get_one::<String>("classes")
        .map(String::as_str)
        .unwrap_or("2")
        .parse()
        .map_err(|_| "Invalid number of classes")?;
    let motif_width: usize = matches
        .get_one::<String>("width")
        .map(String::as_str)
        .unwrap_or("10")
        .parse()
        .map_err(|_| "Invalid motif width")?;
    let max_iterations: usize = matches
        .get_one::<String>("iterations")
        .map(String::as_str)
        .unwrap_or("100")
        .parse()
        .map_err(|_| "Invalid iteration cap")?;
    if max_iterations == 0 {
        return Err("The iteration cap must be at least 1".into());
    }
    let num_threads = match matches.get_one::<String>("threads") {
        Some(threads) => Some(threads.parse().map_err(|_| "Invalid thread count")?),
        None => None,
    };

    let sequences = SequenceMatrix::from_fasta(input)?;
    if !quiet {
        eprintln!(
            "Loaded {} sequences of length {} from {}",
            sequences.n_seq(),
            sequences.seq_len(),
            input
        );
    }

    let config = EmConfig {
        n_classes,
        motif_width,
        flip: matches.get_flag("flip"),
        bg_class: matches.get_flag("bg-class"),
        center_shift: matches.get_flag("center-shift"),
        seed: matches.get_one::<String>("seed").cloned(),
        seeding: matches
            .get_one::<String>("seeding")
            .cloned()
            .unwrap_or_else(|| "random".to_string()),
        num_threads,
    };

    let mut engine = EmSequenceEngine::new(sequences, &config)?;
    if !quiet {
        eprintln!(
            "Classifying into {} classes (motif width {}, {} shift states, {} orientation{})...",
            engine.n_classes(),
            engine.motif_width(),
            engine.n_shift(),
            engine.n_flip(),
            if engine.n_flip() == 2 { "s" } else { "" }
        );
    }

    let bar = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(max_iterations as u64)
    };
    let mut sink = BarProgress(bar);

    let mut outcome = StepOutcome::Progress;
    for iteration in 1..=max_iterations {
        outcome = engine.step();
        sink.notify(iteration);
        if outcome == StepOutcome::Converged {
            break;
        }
    }
    sink.0.finish_and_clear();

    if !quiet {
        match outcome {
            StepOutcome::Converged => {
                eprintln!("Converged after {} iterations", engine.n_iter());
            }
            StepOutcome::Progress => {
                eprintln!(
                    "Stopped after {} iterations without reaching convergence",
                    engine.n_iter()
                );
            }
        }
        let marginals = engine.class_prob_marginal();
        for k in 0..engine.n_classes() {
            let information: f64 = engine.information_content(k).iter().sum();
            eprintln!(
                "class {}: marginal probability {:.4}, information content {:.2} bits",
                k + 1,
                marginals[k],
                information
            );
        }
    }

    let prefix = PathBuf::from(
        matches
            .get_one::<String>("output")
            .map(String::as_str)
            .unwrap_or("seqclust"),
    );
    let written = write_result_files(&engine, &prefix)?;
    if !quiet {
        eprintln!(
            "Wrote {} result files under prefix {}",
            written.len(),
            prefix.display()
        );
    }

    Ok(())
}
