//! # SeqClust - EM Sequence Classification
//!
//! Unsupervised probabilistic classification of fixed-length DNA
//! sequences by expectation-maximization.
//!
//! ## Overview
//!
//! Given N equal-length sequences, SeqClust jointly discovers K sequence
//! classes, each characterized by a position-specific probability matrix
//! (a motif) of configurable width W. Every sequence is softly assigned
//! to every (class, shift offset, strand orientation) triple; the motifs
//! are re-estimated from those soft assignments; iteration proceeds until
//! the posterior tensor stabilizes.
//!
//! ## Features
//!
//! - **Shift alignment**: motifs narrower than the sequences are scored
//!   at every offset, and an optional Gaussian prior re-centers the shift
//!   distribution each iteration
//! - **Both-strand scoring**: windows can be evaluated forward and
//!   reverse-complemented
//! - **Background class**: an optional extra class frozen to the
//!   empirical base composition absorbs unexplained sequences
//! - **Deterministic runs**: a string seed reproduces results
//!   bit-for-bit
//! - **Parallel E/M loops**: sequences and classes are processed with
//!   Rayon
//!
//! ## Quick Start
//!
//! ```rust
//! use seqclust_core::config::EmConfig;
//! use seqclust_core::engine::{ClusteringEngine, EmSequenceEngine};
//! use seqclust_core::sequence::SequenceMatrix;
//! use seqclust_core::types::StepOutcome;
//!
//! let sequences = SequenceMatrix::from_rows(&[b"ACGTACGTAC", b"TTACGTGGCA"])?;
//! let config = EmConfig {
//!     n_classes: 1,
//!     motif_width: 4,
//!     seed: Some("demo".to_string()),
//!     ..Default::default()
//! };
//!
//! let mut engine = EmSequenceEngine::new(sequences, &config)?;
//! for _ in 0..100 {
//!     if engine.step() == StepOutcome::Converged {
//!         break;
//!     }
//! }
//!
//! let motifs = engine.motifs();
//! let posterior = engine.posterior();
//! println!("classified after {} iterations", engine.n_iter());
//! # Ok::<(), seqclust_core::types::SeqClustError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: configuration of a classification run
//! - [`engine`]: the EM engine and the clustering trait
//! - [`sequence`]: the validated N x L sequence matrix and FASTA loading
//! - [`dna`]: base codec, background composition, window scoring
//! - [`matrix`]: dense rank-2/3/4 tensors
//! - [`stats`]: weighted statistics and the Gaussian density
//! - [`rng`]: seedable random-number source
//! - [`progress`]: iteration progress callback
//! - [`output`]: plain-text result serialization
//! - [`types`]: errors and shared type aliases
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, SeqClustError>`](types::SeqClustError):
//! invalid configurations, non-DNA characters, unknown seeding methods,
//! mismatched tensor shapes, and I/O failures. The numerical guards
//! (pseudo-count floor, convergence tolerance) are handled inside the
//! engine and never surface.

pub mod config;
pub mod constants;
pub mod dna;
pub mod engine;
pub mod matrix;
pub mod output;
pub mod progress;
pub mod rng;
pub mod sequence;
pub mod stats;
pub mod types;

pub use engine::{ClusteringEngine, EmSequenceEngine};
pub use types::{SeqClustError, StepOutcome};
