//! Evaluation of many interfaces at once.
//!
//! Interfaces are independent, so the parallel version is a plain
//! `par_iter` with no shared state. Results keep the input order.

use crate::config::SolverConfig;
use crate::error::Result;
use crate::flux::{SolverMethod, WaveDecomposition};
use crate::state::CellState;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::solve_interface;

/// Solve every `(left, right)` pair, in order.
pub fn solve_batch(
    interfaces: &[(CellState, CellState)],
    method: SolverMethod,
    config: &SolverConfig,
) -> Vec<Result<WaveDecomposition>> {
    interfaces
        .iter()
        .map(|(left, right)| solve_interface(left, right, method, config))
        .collect()
}

/// Parallel version of [`solve_batch`] using rayon.
///
/// Produces the same vector as the serial version.
/// Enable with the `parallel` feature.
#[cfg(feature = "parallel")]
pub fn solve_batch_parallel(
    interfaces: &[(CellState, CellState)],
    method: SolverMethod,
    config: &SolverConfig,
) -> Vec<Result<WaveDecomposition>> {
    interfaces
        .par_iter()
        .map(|(left, right)| solve_interface(left, right, method, config))
        .collect()
}

/// Largest wave speed over a set of decompositions, for the CFL condition.
///
/// Returns 0 for an empty slice.
pub fn max_wave_speed(waves: &[WaveDecomposition]) -> f64 {
    waves
        .iter()
        .map(WaveDecomposition::max_speed)
        .fold(0.0, f64::max)
}
