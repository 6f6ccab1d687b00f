//! Point-wise Riemann solvers for the shallow water equations.
//!
//! Solves the normal Riemann problem at a single interface in the
//! face-normal frame:
//! - Riemann structure classification (shock/rarefaction, middle state)
//! - Augmented solver with steady-state wave subtraction
//! - F-wave solver with a hydrostatic bed source
//! - Outer wave speed estimates and fluctuations
//!
//! # Solver Trait
//!
//! The [`WaveSolver`] trait gives both kernels one interface, with
//! compile-time, enum and trait-object dispatch.
//!
//! ## Built-in Solvers
//! - [`AugmentedSolver`]: well-balanced, iterative, handles transcritical flow over steps
//! - [`FWaveSolver`]: single-pass f-wave splitting
//! - [`SolverMethod`]: enum for zero-cost runtime selection

mod augmented;
mod fwave;
mod riemann_type;
mod speeds;
pub mod traits;
mod waves;

pub use augmented::solve_augmented;
pub use fwave::solve_fwave;
pub use riemann_type::{Convergence, RiemannClassification, RiemannStructure, classify};
pub use speeds::{SpeedRegime, WaveSpeeds};
pub use waves::{Fluctuations, NUM_WAVES, SteadyStateWave, WaveDecomposition};

// Re-export trait-based solver types
pub use traits::{
    AugmentedSolver, BoxedWaveSolver, FWaveSolver, SolverMethod, WaveSolver, create_solver,
};
