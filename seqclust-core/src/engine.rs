//! The EM classification engine.
//!
//! [`EmSequenceEngine`] jointly discovers K sequence classes, each
//! described by a position-specific probability matrix (a motif) of width
//! W, from N equal-length DNA sequences. Every sequence is softly assigned
//! to every (class, shift, orientation) triple; the motifs are
//! re-estimated from those soft assignments; iteration proceeds until the
//! posterior tensor stabilizes.
//!
//! ## Overview
//!
//! One call to [`ClusteringEngine::step`] runs a full EM round:
//!
//! 1. **E-step**: score every motif against every shifted sub-window of
//!    every sequence (in log space, optionally on both strands), derive
//!    the posterior assignment tensor, and update the class probabilities.
//! 2. **M-step**: re-estimate each motif by posterior-weighted base
//!    counting, add a pseudo count, and renormalize the columns. The
//!    optional background class keeps its frozen motif.
//! 3. Optionally re-center the marginal shift distribution toward a
//!    Gaussian on the middle shift state.
//!
//! The engine exclusively owns all tensors; callers obtain deep copies
//! through the read-only accessors.
//!
//! ## Examples
//!
//! ```rust
//! use seqclust_core::config::EmConfig;
//! use seqclust_core::engine::{ClusteringEngine, EmSequenceEngine};
//! use seqclust_core::sequence::SequenceMatrix;
//! use seqclust_core::types::StepOutcome;
//!
//! let sequences = SequenceMatrix::from_rows(&[b"ACGTACGT", b"TACGTACG"])?;
//! let config = EmConfig {
//!     n_classes: 1,
//!     motif_width: 4,
//!     seed: Some("example".to_string()),
//!     ..Default::default()
//! };
//!
//! let mut engine = EmSequenceEngine::new(sequences, &config)?;
//! for _ in 0..100 {
//!     if engine.step() == StepOutcome::Converged {
//!         break;
//!     }
//! }
//! let motifs = engine.motifs();
//! assert_eq!(motifs[0].n_col(), 4);
//! # Ok::<(), seqclust_core::types::SeqClustError>(())
//! ```

use std::io::Write;

use rand::RngCore;
use rand_distr::{Beta, Distribution};
use rayon::prelude::*;

use crate::config::EmConfig;
use crate::constants::{DELTA_MAX, FORWARD, NUM_BASES, PSEUDO_COUNT, REVERSE};
use crate::dna;
use crate::matrix::{Matrix2D, Matrix3D, Matrix4D};
use crate::output;
use crate::rng::rng_from;
use crate::sequence::SequenceMatrix;
use crate::stats::{gaussian_pdf, weighted_sd};
use crate::types::{BaseProbs, SeqClustError, StepOutcome};

/// Capability set of a sequence clustering algorithm: iterate, seed,
/// write out results.
///
/// [`EmSequenceEngine`] is the concrete EM implementation; alternative
/// algorithms over the same sequence matrix would implement this trait as
/// well.
pub trait ClusteringEngine {
    /// Runs a single round of data assignment to the classes.
    ///
    /// Returns [`StepOutcome::Converged`] when the solution is stable, in
    /// which case further calls are permitted but will not move it.
    fn step(&mut self) -> StepOutcome;

    /// Initializes the soft assignments with the named seeding method.
    ///
    /// # Errors
    ///
    /// Returns [`SeqClustError::UnknownSeeding`] if the method name is not
    /// recognized.
    fn seed(&mut self, method: &str, rng: &mut dyn RngCore) -> Result<(), SeqClustError>;

    /// Writes the current per-class motifs to the given stream.
    ///
    /// # Errors
    ///
    /// Returns [`SeqClustError::IoError`] if writing fails.
    fn write_results(&self, writer: &mut dyn Write) -> Result<(), SeqClustError>;
}

/// EM classifier over a fixed matrix of equal-length DNA sequences.
///
/// See the [module documentation](self) for the algorithm outline and a
/// usage example.
pub struct EmSequenceEngine {
    sequences: SequenceMatrix,

    /// Per-class 4 x W motifs, background class last when present.
    motifs: Vec<Matrix2D<f64>>,
    /// Log-space scratch copies of the motifs, refreshed each E-step.
    motif_log: Vec<Matrix2D<f64>>,
    motif_log_rc: Vec<Matrix2D<f64>>,

    bg_prob: BaseProbs,

    /// Window probabilities, shape (N, K', S', F).
    likelihood: Matrix4D<f64>,
    /// Soft assignments, shape (N, K', S', F); rows over (k, s, f) sum to 1.
    post_prob: Matrix4D<f64>,
    /// Previous-iteration posterior, kept for the convergence test.
    post_prob_prev: Matrix4D<f64>,
    /// Class probabilities, shape (K', S', F), summing to 1.
    class_prob: Matrix3D<f64>,
    /// Per-class marginal of `class_prob`, length K'.
    class_prob_marginal: Vec<f64>,

    n_seq: usize,
    n_class: usize,
    l_motif: usize,
    n_shift: usize,
    n_flip: usize,
    bg_class: bool,
    center_shift: bool,
    n_iter: usize,
}

impl EmSequenceEngine {
    /// Builds an engine and seeds its posterior tensor de novo.
    ///
    /// The background distribution is computed from the sequences
    /// (symmetrized when `config.flip` is set), the posterior is
    /// initialized with the configured seeding method, and the motifs are
    /// re-estimated once from that seeding so the engine is in a valid
    /// state before the first [`step`](ClusteringEngine::step).
    ///
    /// # Errors
    ///
    /// - [`SeqClustError::InvalidConfig`] unless
    ///   `1 <= n_classes <= n_seq` and `1 <= motif_width <= seq_len`
    /// - [`SeqClustError::UnknownSeeding`] for an unrecognized
    ///   `config.seeding` name
    pub fn new(sequences: SequenceMatrix, config: &EmConfig) -> Result<Self, SeqClustError> {
        configure_thread_pool(config)?;
        let mut engine = Self::allocate(
            sequences,
            config.n_classes,
            config.motif_width,
            config.flip,
            config.bg_class,
            config.center_shift,
        )?;
        let mut rng = rng_from(config.seed.as_deref());
        engine.seed(&config.seeding, &mut rng)?;
        Ok(engine)
    }

    /// Builds an engine from caller-supplied motifs (warm start).
    ///
    /// The motifs are taken as given (the background class, when
    /// configured, is appended after them); the posterior is initialized
    /// to the per-sequence normalized likelihood under these motifs, with
    /// zero entries replaced by the pseudo-count floor. The
    /// `n_classes`, `motif_width`, `seed`, and `seeding` fields of
    /// `config` are ignored; class count and width come from the motifs
    /// themselves.
    ///
    /// # Errors
    ///
    /// - [`SeqClustError::ShapeMismatch`] if any motif is not 4 rows wide
    ///   or differs in width from the first
    /// - [`SeqClustError::InvalidConfig`] unless
    ///   `1 <= motifs.len() <= n_seq` and `1 <= width <= seq_len`
    pub fn with_motifs(
        sequences: SequenceMatrix,
        motifs: Vec<Matrix2D<f64>>,
        config: &EmConfig,
    ) -> Result<Self, SeqClustError> {
        configure_thread_pool(config)?;
        if motifs.is_empty() {
            return Err(SeqClustError::InvalidConfig(
                "at least one motif is required".to_string(),
            ));
        }
        let motif_width = motifs[0].n_col();
        for (k, motif) in motifs.iter().enumerate() {
            if motif.n_row() != NUM_BASES {
                return Err(SeqClustError::ShapeMismatch(format!(
                    "motif {} has {} rows, expected {}",
                    k,
                    motif.n_row(),
                    NUM_BASES
                )));
            }
            if motif.n_col() != motif_width {
                return Err(SeqClustError::ShapeMismatch(format!(
                    "motif {} has width {}, expected {}",
                    k,
                    motif.n_col(),
                    motif_width
                )));
            }
        }

        let mut engine = Self::allocate(
            sequences,
            motifs.len(),
            motif_width,
            config.flip,
            config.bg_class,
            config.center_shift,
        )?;
        for (k, motif) in motifs.into_iter().enumerate() {
            engine.motifs[k] = motif;
        }
        engine.posterior_from_likelihood();
        engine.compute_class_prob();
        Ok(engine)
    }

    fn allocate(
        sequences: SequenceMatrix,
        n_classes: usize,
        motif_width: usize,
        flip: bool,
        bg_class: bool,
        center_shift: bool,
    ) -> Result<Self, SeqClustError> {
        let n_seq = sequences.n_seq();
        let l_seq = sequences.seq_len();
        if n_classes == 0 || n_classes > n_seq {
            return Err(SeqClustError::InvalidConfig(format!(
                "the number of classes must be between 1 and the number of sequences ({}), got {}",
                n_seq, n_classes
            )));
        }
        if motif_width == 0 || motif_width > l_seq {
            return Err(SeqClustError::InvalidConfig(format!(
                "the motif width must be between 1 and the sequence length ({}), got {}",
                l_seq, motif_width
            )));
        }

        let n_shift = l_seq - motif_width + 1;
        let n_flip = if flip { 2 } else { 1 };
        let n_class = n_classes + usize::from(bg_class);

        let bg_prob = dna::base_composition(&sequences, flip);
        let mut motifs = vec![Matrix2D::new(NUM_BASES, motif_width, 0.0); n_classes];
        if bg_class {
            let mut bg_motif = Matrix2D::new(NUM_BASES, motif_width, 0.0);
            for r in 0..NUM_BASES {
                for j in 0..motif_width {
                    bg_motif[(r, j)] = bg_prob[r];
                }
            }
            motifs.push(bg_motif);
        }

        Ok(Self {
            sequences,
            motifs,
            motif_log: vec![Matrix2D::new(NUM_BASES, motif_width, 0.0); n_class],
            motif_log_rc: vec![Matrix2D::new(NUM_BASES, motif_width, 0.0); n_class],
            bg_prob,
            likelihood: Matrix4D::new(n_seq, n_class, n_shift, n_flip, 0.0),
            post_prob: Matrix4D::new(n_seq, n_class, n_shift, n_flip, 0.0),
            post_prob_prev: Matrix4D::new(n_seq, n_class, n_shift, n_flip, 0.0),
            class_prob: Matrix3D::new(n_class, n_shift, n_flip, 0.0),
            class_prob_marginal: vec![0.0; n_class],
            n_seq,
            n_class,
            l_motif: motif_width,
            n_shift,
            n_flip,
            bg_class,
            center_shift,
            n_iter: 0,
        })
    }

    // ------------------------------------------------------------------
    // read-only accessors
    // ------------------------------------------------------------------

    /// Deep copies of the per-class motifs (background class last when
    /// configured). Each is 4 x W and column-stochastic.
    #[must_use]
    pub fn motifs(&self) -> Vec<Matrix2D<f64>> {
        self.motifs.clone()
    }

    /// Deep copy of the posterior assignment tensor, shape (N, K', S', F).
    #[must_use]
    pub fn posterior(&self) -> Matrix4D<f64> {
        self.post_prob.clone()
    }

    /// Deep copy of the class-probability tensor, shape (K', S', F).
    #[must_use]
    pub fn class_prob(&self) -> Matrix3D<f64> {
        self.class_prob.clone()
    }

    /// Per-class marginal probabilities, length K', summing to 1.
    #[must_use]
    pub fn class_prob_marginal(&self) -> Vec<f64> {
        self.class_prob_marginal.clone()
    }

    /// The background base distribution the engine was built with.
    #[must_use]
    pub fn background(&self) -> BaseProbs {
        self.bg_prob
    }

    /// The sequence matrix being classified.
    #[must_use]
    pub fn sequences(&self) -> &SequenceMatrix {
        &self.sequences
    }

    /// Number of completed EM iterations.
    #[must_use]
    pub fn n_iter(&self) -> usize {
        self.n_iter
    }

    /// Effective class count K' (including any background class).
    #[must_use]
    pub fn n_classes(&self) -> usize {
        self.n_class
    }

    /// Motif width W.
    #[must_use]
    pub fn motif_width(&self) -> usize {
        self.l_motif
    }

    /// Number of shift states S' = L - W + 1.
    #[must_use]
    pub fn n_shift(&self) -> usize {
        self.n_shift
    }

    /// Number of strand orientations (2 when scoring reverse complements).
    #[must_use]
    pub fn n_flip(&self) -> usize {
        self.n_flip
    }

    /// Per-column information content of class `class_index`'s motif, in
    /// bits, with the small-sample correction `4 / (2 N)`.
    #[must_use]
    pub fn information_content(&self, class_index: usize) -> Vec<f64> {
        let motif = &self.motifs[class_index];
        let correction = NUM_BASES as f64 / (2.0 * self.n_seq as f64);
        (0..self.l_motif)
            .map(|j| {
                let column = motif.column(j);
                let total: f64 = column.iter().sum();
                let entropy: f64 = -column
                    .iter()
                    .map(|p| {
                        let p = p / total;
                        p * p.log2()
                    })
                    .sum::<f64>();
                (NUM_BASES as f64).log2() - (entropy + correction)
            })
            .collect()
    }

    // ------------------------------------------------------------------
    // seeding
    // ------------------------------------------------------------------

    /// Draws every posterior cell from Beta(1, N), normalizes per
    /// sequence, and derives class probabilities and motifs from the
    /// result.
    fn seed_random(&mut self, rng: &mut dyn RngCore) -> Result<(), SeqClustError> {
        let beta = Beta::new(1.0, self.n_seq as f64)
            .map_err(|e| SeqClustError::InvalidConfig(format!("Beta(1, {}): {}", self.n_seq, e)))?;
        for cell in self.post_prob.iter_mut() {
            *cell = beta.sample(rng);
        }

        let per_seq = self.n_class * self.n_shift * self.n_flip;
        for row in self.post_prob.as_mut_slice().chunks_mut(per_seq) {
            let sum: f64 = row.iter().sum();
            for cell in row.iter_mut() {
                *cell /= sum;
            }
        }

        self.compute_class_prob();
        self.compute_motifs();
        Ok(())
    }

    /// Warm-start initialization: posterior = likelihood normalized per
    /// sequence, with zero entries floored to the pseudo count.
    fn posterior_from_likelihood(&mut self) {
        self.compute_likelihood();

        let per_seq = self.n_class * self.n_shift * self.n_flip;
        self.post_prob
            .as_mut_slice()
            .par_chunks_mut(per_seq)
            .zip(self.likelihood.as_slice().par_chunks(per_seq))
            .for_each(|(posterior, likelihood)| {
                let sum: f64 = likelihood.iter().sum();
                for (cell, &lik) in posterior.iter_mut().zip(likelihood) {
                    *cell = if lik == 0.0 { PSEUDO_COUNT } else { lik / sum };
                }
            });
    }

    // ------------------------------------------------------------------
    // E-step
    // ------------------------------------------------------------------

    fn refresh_log_motifs(&mut self) {
        for k in 0..self.n_class {
            let motif = &self.motifs[k];
            let motif_log = &mut self.motif_log[k];
            let motif_log_rc = &mut self.motif_log_rc[k];
            for r in 0..NUM_BASES {
                for j in 0..self.l_motif {
                    let log_p = motif[(r, j)].ln();
                    motif_log[(r, j)] = log_p;
                    motif_log_rc[(NUM_BASES - 1 - r, self.l_motif - 1 - j)] = log_p;
                }
            }
        }
    }

    /// Recomputes the window probability of every (sequence, class,
    /// shift, orientation) combination. Sequences are independent, so the
    /// outer loop runs in parallel.
    fn compute_likelihood(&mut self) {
        self.refresh_log_motifs();

        let n_class = self.n_class;
        let n_shift = self.n_shift;
        let n_flip = self.n_flip;
        let sequences = &self.sequences;
        let motif_log = &self.motif_log;
        let motif_log_rc = &self.motif_log_rc;

        let per_seq = n_class * n_shift * n_flip;
        self.likelihood
            .as_mut_slice()
            .par_chunks_mut(per_seq)
            .enumerate()
            .for_each(|(i, row)| {
                for k in 0..n_class {
                    for s in 0..n_shift {
                        let offset = (k * n_shift + s) * n_flip;
                        row[offset + FORWARD] =
                            dna::score_window(sequences, i, s, &motif_log[k]).exp();
                        if n_flip == 2 {
                            row[offset + REVERSE] =
                                dna::score_window(sequences, i, s, &motif_log_rc[k]).exp();
                        }
                    }
                }
            });
    }

    /// Posterior over (class, shift, orientation) per sequence:
    /// likelihood times class probability, normalized per sequence, with
    /// zero results floored to the pseudo count.
    fn compute_posterior(&mut self) {
        let per_seq = self.n_class * self.n_shift * self.n_flip;
        // class_prob is laid out (k, s, f), the same order as one
        // per-sequence chunk of the 4-D tensors
        let class_prob = self.class_prob.as_slice();
        self.post_prob
            .as_mut_slice()
            .par_chunks_mut(per_seq)
            .zip(self.likelihood.as_slice().par_chunks(per_seq))
            .for_each(|(posterior, likelihood)| {
                let mut sum = 0.0;
                for (u, cell) in posterior.iter_mut().enumerate() {
                    *cell = likelihood[u] * class_prob[u];
                    sum += *cell;
                }
                for cell in posterior.iter_mut() {
                    *cell /= sum;
                    if *cell == 0.0 {
                        *cell = PSEUDO_COUNT;
                    }
                }
            });
    }

    /// Class probabilities as the sequence-marginal of the posterior,
    /// normalized to sum to 1 over (class, shift, orientation).
    fn compute_class_prob(&mut self) {
        for marginal in self.class_prob_marginal.iter_mut() {
            *marginal = 0.0;
        }

        let mut total = 0.0;
        for k in 0..self.n_class {
            for s in 0..self.n_shift {
                for f in 0..self.n_flip {
                    let mut prob = 0.0;
                    for i in 0..self.n_seq {
                        prob += self.post_prob[(i, k, s, f)];
                    }
                    self.class_prob[(k, s, f)] = prob;
                    self.class_prob_marginal[k] += prob;
                    total += prob;
                }
            }
        }

        for cell in self.class_prob.iter_mut() {
            *cell /= total;
        }
        for marginal in self.class_prob_marginal.iter_mut() {
            *marginal /= total;
        }
    }

    // ------------------------------------------------------------------
    // M-step
    // ------------------------------------------------------------------

    /// Re-estimates every non-background motif by posterior-weighted base
    /// counting, then pseudo-counts and renormalizes the columns. Classes
    /// are independent, so they run in parallel.
    fn compute_motifs(&mut self) {
        let n_update = self.n_class - usize::from(self.bg_class);
        let n_shift = self.n_shift;
        let n_flip = self.n_flip;
        let n_seq = self.n_seq;
        let l_motif = self.l_motif;
        let sequences = &self.sequences;
        let post_prob = &self.post_prob;

        let (update, _background) = self.motifs.split_at_mut(n_update);
        update.par_iter_mut().enumerate().for_each(|(k, motif)| {
            for cell in motif.iter_mut() {
                *cell = 0.0;
            }
            for s in 0..n_shift {
                for j in 0..l_motif {
                    for i in 0..n_seq {
                        let r = sequences.index_at(i, s + j);
                        motif[(r, j)] += post_prob[(i, k, s, FORWARD)];
                        if n_flip == 2 {
                            motif[(NUM_BASES - 1 - r, l_motif - 1 - j)] +=
                                post_prob[(i, k, s, REVERSE)];
                        }
                    }
                }
            }
            normalize_motif_columns(motif);
        });
    }

    // ------------------------------------------------------------------
    // shift re-centering
    // ------------------------------------------------------------------

    /// Rewrites the class probabilities so the marginal shift
    /// distribution follows a Gaussian centered on the middle shift
    /// state, with the spread measured from the data. Per-class marginal
    /// mass is preserved.
    fn center_shifts(&mut self) {
        if self.n_shift == 1 {
            return;
        }

        let shifts: Vec<f64> = (1..=self.n_shift).map(|s| s as f64).collect();
        let mut shift_prob = vec![0.0; self.n_shift];
        for (s, prob) in shift_prob.iter_mut().enumerate() {
            for k in 0..self.n_class {
                for f in 0..self.n_flip {
                    *prob += self.class_prob[(k, s, f)];
                }
            }
        }

        let sd = weighted_sd(&shifts, &shift_prob, true);
        let center = (self.n_shift / 2 + 1) as f64;
        let centered: Vec<f64> = shifts
            .iter()
            .map(|&x| gaussian_pdf(x, center, sd))
            .collect();
        let centered_total: f64 = centered.iter().sum();

        for k in 0..self.n_class {
            for s in 0..self.n_shift {
                for f in 0..self.n_flip {
                    self.class_prob[(k, s, f)] = self.class_prob_marginal[k] * centered[s]
                        / (self.n_flip as f64 * centered_total);
                }
            }
        }
    }

    // ------------------------------------------------------------------
    // convergence
    // ------------------------------------------------------------------

    /// Element-wise stability of the posterior tensor against the
    /// previous iteration. Needs at least two completed iterations.
    fn converged(&self) -> bool {
        if self.n_iter < 2 {
            return false;
        }
        self.post_prob
            .iter()
            .zip(self.post_prob_prev.iter())
            .all(|(current, previous)| (current - previous).abs() <= DELTA_MAX)
    }
}

impl ClusteringEngine for EmSequenceEngine {
    fn step(&mut self) -> StepOutcome {
        if self.n_iter > 0 {
            self.post_prob_prev.clone_from(&self.post_prob);
        }

        // E-step
        self.compute_likelihood();
        self.compute_posterior();
        self.compute_class_prob();

        // M-step; the background class, when present, stays frozen
        self.compute_motifs();

        if self.center_shift {
            self.center_shifts();
        }
        self.n_iter += 1;

        if self.converged() {
            StepOutcome::Converged
        } else {
            StepOutcome::Progress
        }
    }

    fn seed(&mut self, method: &str, rng: &mut dyn RngCore) -> Result<(), SeqClustError> {
        match method {
            "random" => self.seed_random(rng),
            other => Err(SeqClustError::UnknownSeeding(other.to_string())),
        }
    }

    fn write_results(&self, mut writer: &mut dyn Write) -> Result<(), SeqClustError> {
        for motif in &self.motifs {
            output::write_motif(&mut writer, motif)?;
            writeln!(writer)?;
        }
        Ok(())
    }
}

/// Adds the pseudo count to every cell and renormalizes each column to
/// sum to 1.
fn normalize_motif_columns(motif: &mut Matrix2D<f64>) {
    for j in 0..motif.n_col() {
        let mut sum = 0.0;
        for r in 0..NUM_BASES {
            motif[(r, j)] += PSEUDO_COUNT;
            sum += motif[(r, j)];
        }
        for r in 0..NUM_BASES {
            motif[(r, j)] /= sum;
        }
    }
}

fn configure_thread_pool(config: &EmConfig) -> Result<(), SeqClustError> {
    if let Some(num_threads) = config.num_threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                SeqClustError::InvalidConfig(format!("failed to configure thread pool: {}", e))
            })?;
    }
    Ok(())
}
