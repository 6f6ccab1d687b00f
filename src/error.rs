//! Error type for Riemann solver evaluations.
//!
//! Every failure is local to a single interface evaluation. The caller decides
//! whether to abort the step, substitute a fallback flux, or halt.

use thiserror::Error;

use crate::flux::RiemannStructure;

/// Failure of a single interface evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Error)]
pub enum RiemannError {
    /// Outer wave speeds coincide, so the two-speed decomposition is undefined.
    #[error("degenerate wave speed spread: s1 = {s1}, s2 = {s2}")]
    DegenerateSpeeds { s1: f64, s2: f64 },

    /// Outer wave speeds supplied in the wrong order.
    #[error("wave speeds out of order: s1 = {s1} > s2 = {s2}")]
    UnorderedSpeeds { s1: f64, s2: f64 },

    /// Newton iteration hit a zero derivative or a non-finite iterate.
    #[error("Newton iteration degenerated for {structure} at depth {depth}")]
    DegenerateNewton {
        structure: RiemannStructure,
        depth: f64,
    },

    /// Newton residual still above tolerance after the iteration cap.
    #[error("Newton iteration did not converge after {iterations} iterations (residual {residual:e})")]
    NotConverged { iterations: usize, residual: f64 },

    /// NaN or infinite input value.
    #[error("non-finite input: {quantity} = {value}")]
    NonFinite { quantity: &'static str, value: f64 },

    /// Solver configuration rejected by [`SolverConfig::validate`](crate::SolverConfig::validate).
    #[error("invalid solver configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RiemannError>;

/// Reject NaN and infinite inputs.
#[inline]
pub(crate) fn ensure_finite(quantity: &'static str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(RiemannError::NonFinite { quantity, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite("h", 1.0).is_ok());
        assert_eq!(
            ensure_finite("hu", f64::NAN).unwrap_err().to_string(),
            "non-finite input: hu = NaN"
        );
        assert!(matches!(
            ensure_finite("b", f64::INFINITY),
            Err(RiemannError::NonFinite { quantity: "b", .. })
        ));
    }

    #[test]
    fn test_error_display() {
        let err = RiemannError::DegenerateSpeeds { s1: 1.0, s2: 1.0 };
        assert_eq!(err.to_string(), "degenerate wave speed spread: s1 = 1, s2 = 1");

        let err = RiemannError::DegenerateNewton {
            structure: RiemannStructure::TwoShocks,
            depth: 0.0,
        };
        assert_eq!(
            err.to_string(),
            "Newton iteration degenerated for two shocks at depth 0"
        );
    }
}
