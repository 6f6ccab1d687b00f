//! # swe-riemann
//!
//! Point-wise Riemann solvers for the two-dimensional shallow water
//! equations over variable topography, for wave-propagation finite volume
//! schemes.
//!
//! This crate provides:
//! - Riemann structure classification (shock/rarefaction, middle state)
//! - An augmented solver that subtracts a steady-state wave, so a lake at
//!   rest stays at rest over any bed step
//! - A plain f-wave solver with a hydrostatic bed source
//! - An interface driver with dry-neighbour (wall and overtopping) handling
//! - Fluctuations, face rotation and batch evaluation
//!
//! # Example
//! ```
//! use swe_riemann::{CellState, SolverConfig, SolverMethod, solve_interface};
//!
//! let config = SolverConfig::default();
//! let left = CellState::new(2.0, 0.0, 0.0, 0.0);
//! let right = CellState::new(1.0, 0.0, 0.0, 0.0);
//!
//! let waves = solve_interface(&left, &right, SolverMethod::Augmented, &config).unwrap();
//! let fluct = waves.fluctuations();
//! assert!((fluct.left_going[0] + fluct.right_going[0]).abs() < 1e-12);
//! ```

pub mod config;
pub mod error;
pub mod flux;
pub mod solver;
pub mod state;

// Re-export main types for convenience
pub use config::SolverConfig;
pub use error::{Result, RiemannError};
pub use flux::{
    AugmentedSolver, Convergence, FWaveSolver, Fluctuations, RiemannClassification,
    RiemannStructure, SolverMethod, SpeedRegime, SteadyStateWave, WaveDecomposition,
    WaveSolver, WaveSpeeds, classify, solve_augmented, solve_fwave,
};
pub use solver::{max_wave_speed, solve_batch, solve_face, solve_interface};
pub use state::{CellState, FluidState};

#[cfg(feature = "parallel")]
pub use solver::solve_batch_parallel;
