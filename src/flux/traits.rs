//! Trait-based wave solver abstraction.
//!
//! Both kernels share one signature, so a caller can pick a solver at
//! compile time (unit structs), at runtime without allocation
//! ([`SolverMethod`]) or through a trait object.
//!
//! # Example
//! ```
//! use swe_riemann::flux::{AugmentedSolver, SolverMethod, WaveSolver, WaveSpeeds};
//! use swe_riemann::{FluidState, SolverConfig};
//!
//! let config = SolverConfig::default();
//! let left = FluidState::new(2.0, 0.0, 0.0, 0.0, &config).unwrap();
//! let right = FluidState::new(1.0, 0.0, 0.0, 0.0, &config).unwrap();
//! let speeds = WaveSpeeds::einfeldt(&left, &right, &config);
//!
//! // Using concrete type
//! let waves = AugmentedSolver.solve(&left, &right, speeds, &config).unwrap();
//!
//! // Using trait object
//! let solver: &dyn WaveSolver = &SolverMethod::FWave;
//! let fwaves = solver.solve(&left, &right, speeds, &config).unwrap();
//!
//! assert_eq!(waves.speeds, fwaves.speeds);
//! ```

use crate::config::SolverConfig;
use crate::error::Result;
use crate::state::FluidState;

use super::speeds::WaveSpeeds;
use super::waves::WaveDecomposition;

// =============================================================================
// Wave Solver Trait
// =============================================================================

/// Trait for point-wise wave solvers of the shallow water equations.
///
/// # Implementation Notes
///
/// - Depth-row waves must sum to Δhu, momentum-row waves to
///   Δφ - `steady_state.flux_jump`
/// - A lake at rest must produce zero waves
/// - `solve` should not allocate memory
pub trait WaveSolver: Send + Sync {
    /// Decompose the jump between `left` and `right` into waves.
    ///
    /// # Arguments
    /// * `left` - Left state in the face-normal frame
    /// * `right` - Right state in the face-normal frame
    /// * `speeds` - Outer wave speed estimates
    /// * `config` - Solver configuration
    fn solve(
        &self,
        left: &FluidState,
        right: &FluidState,
        speeds: WaveSpeeds,
        config: &SolverConfig,
    ) -> Result<WaveDecomposition>;

    /// Human-readable name for debugging and logging.
    fn name(&self) -> &'static str;

    /// Whether the solver refines its bed-source treatment iteratively.
    fn is_iterative(&self) -> bool {
        false
    }
}

// =============================================================================
// Concrete Solvers
// =============================================================================

/// Augmented solver with steady-state wave subtraction.
///
/// Preferred near transcritical flow over topography and at wet/dry fronts.
#[derive(Clone, Copy, Debug, Default)]
pub struct AugmentedSolver;

impl WaveSolver for AugmentedSolver {
    #[inline]
    fn solve(
        &self,
        left: &FluidState,
        right: &FluidState,
        speeds: WaveSpeeds,
        config: &SolverConfig,
    ) -> Result<WaveDecomposition> {
        super::solve_augmented(left, right, speeds, config)
    }

    fn name(&self) -> &'static str {
        "augmented"
    }

    fn is_iterative(&self) -> bool {
        true
    }
}

/// F-wave solver with a hydrostatic bed source.
#[derive(Clone, Copy, Debug, Default)]
pub struct FWaveSolver;

impl WaveSolver for FWaveSolver {
    #[inline]
    fn solve(
        &self,
        left: &FluidState,
        right: &FluidState,
        speeds: WaveSpeeds,
        config: &SolverConfig,
    ) -> Result<WaveDecomposition> {
        super::solve_fwave(left, right, speeds, config)
    }

    fn name(&self) -> &'static str {
        "fwave"
    }
}

// =============================================================================
// Solver Enum (Zero-Cost Dispatch)
// =============================================================================

/// Runtime solver selection without virtual dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum SolverMethod {
    /// Augmented solver everywhere
    #[default]
    Augmented,
    /// F-wave solver everywhere
    FWave,
    /// F-wave on a flat bed, augmented across a bed step
    Auto,
}

impl SolverMethod {
    /// Concrete solver used for an interface with beds `b_l`, `b_r`.
    #[inline]
    pub fn resolve(self, b_l: f64, b_r: f64) -> Self {
        match self {
            Self::Auto if b_l == b_r => Self::FWave,
            Self::Auto => Self::Augmented,
            method => method,
        }
    }
}

impl WaveSolver for SolverMethod {
    #[inline]
    fn solve(
        &self,
        left: &FluidState,
        right: &FluidState,
        speeds: WaveSpeeds,
        config: &SolverConfig,
    ) -> Result<WaveDecomposition> {
        match self.resolve(left.b, right.b) {
            SolverMethod::FWave => super::solve_fwave(left, right, speeds, config),
            _ => super::solve_augmented(left, right, speeds, config),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SolverMethod::Augmented => "augmented",
            SolverMethod::FWave => "fwave",
            SolverMethod::Auto => "auto",
        }
    }

    fn is_iterative(&self) -> bool {
        !matches!(self, SolverMethod::FWave)
    }
}

// =============================================================================
// Boxed Solver (Runtime Polymorphism)
// =============================================================================

/// Type alias for a boxed solver.
pub type BoxedWaveSolver = Box<dyn WaveSolver>;

/// Create a boxed solver from a method enum.
pub fn create_solver(method: SolverMethod) -> BoxedWaveSolver {
    match method {
        SolverMethod::Augmented => Box::new(AugmentedSolver),
        SolverMethod::FWave => Box::new(FWaveSolver),
        SolverMethod::Auto => Box::new(method),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const G: f64 = 10.0;
    const TOL: f64 = 1e-12;

    fn config() -> SolverConfig {
        SolverConfig::new(G, 1e-3)
    }

    fn states(b_r: f64) -> (FluidState, FluidState) {
        let left = FluidState::new(2.0, 1.0, 0.5, 0.0, &config()).unwrap();
        let right = FluidState::new(1.0, -0.5, 0.0, b_r, &config()).unwrap();
        (left, right)
    }

    fn assert_same(a: &WaveDecomposition, b: &WaveDecomposition) {
        for (wa, wb) in a.fwaves.iter().zip(&b.fwaves) {
            for (x, y) in wa.iter().zip(wb) {
                assert!((x - y).abs() < TOL);
            }
        }
    }

    #[test]
    fn test_enum_matches_concrete() {
        let (left, right) = states(0.2);
        let speeds = WaveSpeeds::einfeldt(&left, &right, &config());

        let concrete = AugmentedSolver.solve(&left, &right, speeds, &config()).unwrap();
        let by_enum = SolverMethod::Augmented
            .solve(&left, &right, speeds, &config())
            .unwrap();
        assert_same(&concrete, &by_enum);

        let concrete = FWaveSolver.solve(&left, &right, speeds, &config()).unwrap();
        let by_enum = SolverMethod::FWave.solve(&left, &right, speeds, &config()).unwrap();
        assert_same(&concrete, &by_enum);
    }

    #[test]
    fn test_auto_selects_by_bed() {
        assert_eq!(SolverMethod::Auto.resolve(0.0, 0.0), SolverMethod::FWave);
        assert_eq!(SolverMethod::Auto.resolve(0.0, 0.1), SolverMethod::Augmented);
        assert_eq!(SolverMethod::FWave.resolve(0.0, 0.1), SolverMethod::FWave);

        let (left, right) = states(0.3);
        let speeds = WaveSpeeds::einfeldt(&left, &right, &config());
        let auto = SolverMethod::Auto.solve(&left, &right, speeds, &config()).unwrap();
        let augmented = AugmentedSolver.solve(&left, &right, speeds, &config()).unwrap();
        assert_same(&auto, &augmented);
    }

    #[test]
    fn test_boxed_solver() {
        let (left, right) = states(0.0);
        let speeds = WaveSpeeds::einfeldt(&left, &right, &config());

        let solver = create_solver(SolverMethod::FWave);
        let boxed = solver.solve(&left, &right, speeds, &config()).unwrap();
        let direct = FWaveSolver.solve(&left, &right, speeds, &config()).unwrap();
        assert_same(&boxed, &direct);
        assert_eq!(create_solver(SolverMethod::Auto).name(), "auto");
    }

    #[test]
    fn test_solver_names() {
        assert_eq!(AugmentedSolver.name(), "augmented");
        assert_eq!(FWaveSolver.name(), "fwave");
        assert_eq!(SolverMethod::default(), SolverMethod::Augmented);
        assert!(AugmentedSolver.is_iterative());
        assert!(!FWaveSolver.is_iterative());
    }
}
