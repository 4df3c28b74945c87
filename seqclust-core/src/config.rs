/// Configuration for an EM sequence classification run.
///
/// # Examples
///
/// ## Default configuration
///
/// ```rust
/// use seqclust_core::config::EmConfig;
///
/// let config = EmConfig::default();
/// assert_eq!(config.n_classes, 2);
/// ```
///
/// ## Both-strand classification with a background class
///
/// ```rust
/// use seqclust_core::config::EmConfig;
///
/// let config = EmConfig {
///     n_classes: 4,
///     motif_width: 12,
///     flip: true,
///     bg_class: true,
///     seed: Some("run-1".to_string()),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct EmConfig {
    /// Number of sequence classes to discover (K).
    ///
    /// Must be at least 1 and at most the number of sequences.
    ///
    /// **Default**: `2`
    pub n_classes: usize,

    /// Width of each class motif in bases (W).
    ///
    /// Must be at least 1 and at most the common sequence length. The
    /// number of shift states follows as `L - W + 1`.
    ///
    /// **Default**: `10`
    pub motif_width: usize,

    /// Also score the reverse-complement strand of every window.
    ///
    /// Doubles the flip dimension of the posterior tensor and symmetrizes
    /// the background distribution.
    ///
    /// **Default**: `false`
    pub flip: bool,

    /// Append an extra class whose motif is frozen to the background
    /// base distribution.
    ///
    /// The background class soaks up sequences that none of the trained
    /// motifs explain; its motif is never updated by the M-step.
    ///
    /// **Default**: `false`
    pub bg_class: bool,

    /// Re-center the marginal shift distribution after each M-step.
    ///
    /// Reshapes the shift marginal toward a Gaussian centered on the
    /// middle shift state while preserving per-class mass, which counters
    /// degenerate solutions that pile all mass onto one edge shift.
    ///
    /// **Default**: `false`
    pub center_shift: bool,

    /// Seed string for the random number generator.
    ///
    /// Two runs with the same seed, data, and configuration produce
    /// bit-identical results. `None` or an empty string seeds from
    /// operating-system entropy.
    ///
    /// **Default**: `None`
    pub seed: Option<String>,

    /// Name of the posterior seeding method used by de-novo construction.
    ///
    /// Currently `"random"` (independent Beta(1, N) draws). Unknown names
    /// are rejected at construction.
    ///
    /// **Default**: `"random"`
    pub seeding: String,

    /// Number of threads for parallel E/M computation.
    ///
    /// When set, configures the global Rayon thread pool. `None` uses all
    /// available cores.
    ///
    /// **Default**: `None`
    pub num_threads: Option<usize>,
}

impl Default for EmConfig {
    fn default() -> Self {
        Self {
            n_classes: 2,
            motif_width: 10,
            flip: false,
            bg_class: false,
            center_shift: false,
            seed: None,
            seeding: "random".to_string(),
            num_threads: None,
        }
    }
}
