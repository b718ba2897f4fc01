//! Error types for straight skeleton construction.

use thiserror::Error;

/// Errors that can occur while building a straight skeleton.
///
/// The first group are usage errors: the caller supplied input the solver
/// cannot work with. The rest are fatal internal failures; they carry enough
/// context (edge ids, positions, parents) to reproduce the run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkeletonError {
    /// Fewer than three points were supplied.
    #[error("a polygon needs at least 3 points, got {count}")]
    TooFewPoints {
        /// Number of points supplied.
        count: usize,
    },

    /// Consecutive points coincide or the polygon has no area.
    #[error("degenerate input: coincident points or zero area")]
    DegenerateInput,

    /// The points wind counter-clockwise (positive signed area).
    #[error("polygon winds the wrong way: expected clockwise (negative signed area)")]
    WrongWinding,

    /// A step handler was given a group it cannot resolve.
    #[error("invalid input group of size {size}")]
    InvalidGroupSize {
        /// Number of interior edges in the group.
        size: usize,
    },

    /// Recomputed geometry disagrees with a collision the event model claimed.
    #[error("geometric inconsistency: {context}")]
    GeometricInconsistency {
        /// Edge ids, positions and parents involved.
        context: String,
    },

    /// The event queue ran dry while the wavefront was still alive.
    #[error("event queue exhausted with {unaccepted} exterior edges unaccepted")]
    HeapExhausted {
        /// Number of exterior edges never accepted.
        unaccepted: usize,
    },

    /// Algorithm did not converge within the iteration limit.
    #[error("convergence failed after {iterations} iterations")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: usize,
    },
}
