//! Solver configuration.

/// Tuning knobs for a skeleton run.
///
/// `epsilon` is relative: the solver multiplies it by the larger side of the
/// input's bounding box (never less than one) to get the absolute distance
/// tolerance used for every coincidence test. The raw value doubles as the
/// angular tolerance for parallel and antiparallel edge tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Relative tolerance.
    pub epsilon: f64,
    /// Upper bound on processed events. `None` derives a bound from the
    /// vertex count.
    pub max_steps: Option<usize>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-9,
            max_steps: None,
        }
    }
}

impl SolverConfig {
    /// Returns a copy with the given relative tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Returns a copy with an explicit step limit.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Absolute distance tolerance for an input whose bounding box has the
    /// given extent.
    pub fn absolute_tolerance(&self, extent: f64) -> f64 {
        self.epsilon * extent.max(1.0)
    }

    /// Step limit for an input with `vertex_count` vertices.
    pub(crate) fn step_limit(&self, vertex_count: usize) -> usize {
        self.max_steps
            .unwrap_or_else(|| 1024 + 32 * vertex_count * vertex_count)
    }
}
