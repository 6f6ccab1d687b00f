//! Solver configuration.
//!
//! A plain value passed by reference into every kernel call. Nothing in the
//! crate keeps configuration in global state.

use crate::error::{Result, RiemannError};

/// Configuration shared by the classifier and the wave solvers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// Gravitational acceleration (m/s²)
    pub gravity: f64,
    /// Depth at or below which a state is dry (m)
    pub dry_tolerance: f64,
    /// Cap on the steady-state iteration of the augmented solver.
    ///
    /// Each pass recomputes the steady-state wave on the star states left
    /// by the previous one, so a single pass only sees the cell states. The
    /// default of two passes gives the classic solver; more help near
    /// transcritical flow over topography.
    pub max_iterations: usize,
    /// Cap on Newton iterations in the Riemann structure classifier
    pub newton_max_iterations: usize,
    /// Wave strength increments below this (in norm) end the steady-state iteration
    pub convergence_tolerance: f64,
    /// Relative residual accepted by the classifier's Newton solve
    pub newton_tolerance: f64,
    /// Threshold for sonic/resonant detection and speed-sign tests
    pub critical_tolerance: f64,
    /// Fail an interface whose classifier Newton solve stops at its cap
    /// instead of accepting the estimated speeds
    pub strict_convergence: bool,
}

impl SolverConfig {
    /// Create a configuration with the given gravity and dry tolerance.
    ///
    /// The critical tolerance scales with `g * dry_tolerance`, floored at 1e-6.
    pub fn new(gravity: f64, dry_tolerance: f64) -> Self {
        Self {
            gravity,
            dry_tolerance,
            max_iterations: 2,
            newton_max_iterations: 50,
            convergence_tolerance: 1e-16,
            newton_tolerance: 1e-12,
            critical_tolerance: (gravity * dry_tolerance).max(1e-6),
            strict_convergence: false,
        }
    }

    /// Set the steady-state iteration cap of the augmented solver.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the Newton iteration cap of the classifier.
    pub fn with_newton_max_iterations(mut self, newton_max_iterations: usize) -> Self {
        self.newton_max_iterations = newton_max_iterations;
        self
    }

    /// Set the convergence tolerance of the steady-state iteration.
    pub fn with_convergence_tolerance(mut self, tolerance: f64) -> Self {
        self.convergence_tolerance = tolerance;
        self
    }

    /// Set the relative residual tolerance of the classifier's Newton solve.
    pub fn with_newton_tolerance(mut self, tolerance: f64) -> Self {
        self.newton_tolerance = tolerance;
        self
    }

    /// Set the sonic/resonance detection threshold.
    pub fn with_critical_tolerance(mut self, tolerance: f64) -> Self {
        self.critical_tolerance = tolerance;
        self
    }

    /// Reject interfaces whose classification did not converge.
    pub fn with_strict_convergence(mut self, strict: bool) -> Self {
        self.strict_convergence = strict;
        self
    }

    /// Check the configuration for values the kernels cannot work with.
    ///
    /// Called on entry by [`classify`](crate::classify) and
    /// [`solve_interface`](crate::solve_interface).
    pub fn validate(&self) -> Result<()> {
        if !(self.gravity.is_finite() && self.gravity > 0.0) {
            return Err(RiemannError::InvalidConfig("gravity must be positive and finite"));
        }
        if !(self.dry_tolerance.is_finite() && self.dry_tolerance >= 0.0) {
            return Err(RiemannError::InvalidConfig(
                "dry tolerance must be non-negative and finite",
            ));
        }
        if self.newton_max_iterations == 0 {
            return Err(RiemannError::InvalidConfig(
                "classifier needs at least one Newton iteration",
            ));
        }
        if !(self.convergence_tolerance >= 0.0 && self.newton_tolerance > 0.0) {
            return Err(RiemannError::InvalidConfig("tolerances must be positive"));
        }
        if !(self.critical_tolerance.is_finite() && self.critical_tolerance > 0.0) {
            return Err(RiemannError::InvalidConfig(
                "critical tolerance must be positive and finite",
            ));
        }
        Ok(())
    }

    /// Check if a depth counts as dry.
    #[inline]
    pub fn is_dry(&self, h: f64) -> bool {
        h <= self.dry_tolerance
    }

    /// Wave celerity sqrt(g h), with negative depths clamped to zero.
    #[inline]
    pub fn celerity(&self, h: f64) -> f64 {
        (self.gravity * h.max(0.0)).sqrt()
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self::new(9.81, 1e-3)
    }
}
