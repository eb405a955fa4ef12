use crate::constants::Float;

// --------------------------------------------------------------------- STRUCT: Residuals

/// Largest componentwise velocity change across the grid over one step;
/// what the console reporting prints and the steady-state test consumes.
#[derive(Debug, Clone, Copy)]
pub struct Residuals {
    pub velocity: [Float; 2],
}

impl Residuals {
    pub fn new(velocity: [Float; 2]) -> Self {
        Residuals { velocity }
    }

    pub fn max(&self) -> Float {
        self.velocity[0].max(self.velocity[1])
    }

    pub fn below(&self, threshold: Float) -> bool {
        self.max() < threshold
    }
}

// ----------------------------------------------------------------------------- FUNCTIONS

/// Steady-state test over two successive velocity fields: true iff the
/// largest componentwise |u_current - u_previous| over all nodes is below
/// `threshold`. Stateless; the caller keeps the previous snapshot.
///
/// # Examples
/// ```
/// # use lbsim::monitor::has_converged;
/// let previous = vec![[0.0, 0.0], [0.1, 0.0]];
/// let current = vec![[0.0, 0.0], [0.1000004, 0.0]];
///
/// assert!(has_converged(&previous, &current, 1e-6));
/// assert!(!has_converged(&previous, &current, 1e-7));
/// ```
pub fn has_converged(
    u_previous: &[[Float; 2]],
    u_current: &[[Float; 2]],
    threshold: Float,
) -> bool {
    u_previous
        .iter()
        .zip(u_current.iter())
        .all(|(prev, cur)| {
            (cur[0] - prev[0]).abs() < threshold && (cur[1] - prev[1]).abs() < threshold
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_converged_on_identical_fields() {
        let field = vec![[0.1, 0.0], [0.2, -0.1]];

        assert!(has_converged(&field, &field, 1e-12));
    }

    #[test]
    fn test_has_converged_respects_threshold() {
        let previous = vec![[0.1, 0.0], [0.2, -0.1]];
        let current = vec![[0.1, 0.0], [0.2, -0.1 + 5e-7]];

        assert!(has_converged(&previous, &current, 1e-6));
        assert!(!has_converged(&previous, &current, 1e-7));
    }

    #[test]
    fn test_has_converged_checks_both_components() {
        let previous = vec![[0.0, 0.0]];
        let current = vec![[0.0, 1e-3]];

        assert!(!has_converged(&previous, &current, 1e-6));
    }

    #[test]
    fn test_residuals_max_and_below() {
        let residuals = Residuals::new([1e-7, 3e-7]);

        assert!((residuals.max() - 3e-7).abs() < 1e-20);
        assert!(residuals.below(1e-6));
        assert!(!residuals.below(1e-7));
    }
}
