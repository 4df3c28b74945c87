//! Numerical constants shared across the classification engine.

// =============================================================================
// =============================================================================

/// Pseudo count added to motif cells before column normalization and
/// substituted for posterior entries that would otherwise be exactly zero.
///
/// Keeps every motif probability strictly positive so that log-space
/// scoring never produces `-inf`.
pub const PSEUDO_COUNT: f64 = 1e-8;

/// Element-wise posterior delta under which two consecutive iterations
/// are considered identical for the convergence test.
pub const DELTA_MAX: f64 = 1e-6;

// =============================================================================
// =============================================================================

/// Number of DNA bases in the alphabet
pub const NUM_BASES: usize = 4;

/// Index of the forward orientation in the flip dimension
pub const FORWARD: usize = 0;

/// Index of the reverse-complement orientation in the flip dimension
pub const REVERSE: usize = 1;
