use thiserror::Error;

/// Per-base probability vector in A, C, G, T order.
///
/// Used for the background distribution and for single motif columns.
pub type BaseProbs = [f64; 4];

/// Outcome of a single EM iteration.
///
/// Returned by [`ClusteringEngine::step`](crate::engine::ClusteringEngine::step).
/// `Converged` means the posterior tensor is element-wise stable with
/// respect to the previous iteration; further steps are allowed but will
/// not change the solution meaningfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The posterior tensor is stable; the solution can be read out.
    Converged,
    /// The iteration completed but the posteriors are still moving.
    Progress,
}

/// Error types that can occur while building or running a classification.
#[derive(Error, Debug)]
pub enum SeqClustError {
    /// Class count, motif width, or supplied motif dimensions violate the
    /// construction constraints.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// A sequence character is outside {A, C, G, T, a, c, g, t}.
    #[error("unrecognized DNA base: {0:?}")]
    InvalidBase(char),
    /// The requested seeding method is not recognized.
    #[error("unknown seeding method: {0}")]
    UnknownSeeding(String),
    /// Tensor operand shapes disagree (e.g., a warm-start motif of the
    /// wrong width).
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    /// File I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// Error parsing input data.
    #[error("parse error: {0}")]
    ParseError(String),
}
