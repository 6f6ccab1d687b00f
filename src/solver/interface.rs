//! Per-interface driver around the wave solvers.
//!
//! Builds the fluid states, treats a dry neighbour, estimates the outer
//! speeds and dispatches to the selected solver.
//!
//! # Dry neighbours
//!
//! When one side is dry, the wet side is solved against its own mirror image
//! to find the largest depth it can reach at the interface, h* = max(h, h_m).
//! - h* + b_wet < b_dry: the water cannot overtop the step, so the dry side
//!   acts as a reflecting wall. The mirror state replaces it and the waves
//!   that would enter the wall are zeroed.
//! - otherwise, if h + b_wet < b_dry, the dry bed is lowered to the wet free
//!   surface so the bed source cannot exceed what the water column supports.

use crate::config::SolverConfig;
use crate::error::Result;
use crate::flux::{Fluctuations, SolverMethod, WaveDecomposition, WaveSolver, WaveSpeeds, classify};
use crate::state::{CellState, FluidState};

/// Side of the interface treated as a reflecting wall.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Wall {
    None,
    Left,
    Right,
}

impl Wall {
    /// Waves entering the wall.
    fn masked_waves(self) -> &'static [usize] {
        match self {
            Wall::None => &[],
            Wall::Left => &[0, 1],
            Wall::Right => &[1, 2],
        }
    }
}

/// Solve the Riemann problem at one interface.
///
/// `left` and `right` must already be in the face-normal frame
/// (see [`CellState::rotate_to_normal`]).
///
/// # Errors
/// An invalid configuration, non-finite input, a degenerate classifier
/// iteration or degenerate outer speeds. With
/// [`SolverConfig::strict_convergence`] set, a classifier Newton solve that
/// stops at its cap gives [`RiemannError::NotConverged`](crate::RiemannError::NotConverged).
pub fn solve_interface(
    left: &CellState,
    right: &CellState,
    method: SolverMethod,
    config: &SolverConfig,
) -> Result<WaveDecomposition> {
    config.validate()?;

    let mut q_l = FluidState::from_cell(left, config)?;
    let mut q_r = FluidState::from_cell(right, config)?;

    let dry_l = q_l.is_dry(config);
    let dry_r = q_r.is_dry(config);

    if dry_l && dry_r {
        return Ok(WaveDecomposition::zero());
    }

    let mut wall = Wall::None;
    if dry_r {
        if blocked_by_step(&q_l, q_r.b, config)? {
            log::debug!(
                "right neighbour treated as wall: bed {:.4} above reachable surface",
                q_r.b
            );
            q_r = q_l.reflected();
            wall = Wall::Right;
        } else if q_l.surface_elevation() < q_r.b {
            q_r.b = q_l.surface_elevation();
        }
    } else if dry_l {
        if blocked_by_step(&q_r, q_l.b, config)? {
            log::debug!(
                "left neighbour treated as wall: bed {:.4} above reachable surface",
                q_l.b
            );
            q_l = q_r.reflected();
            wall = Wall::Left;
        } else if q_r.surface_elevation() < q_l.b {
            q_l.b = q_r.surface_elevation();
        }
    }

    let mut classification = classify(q_l.h, q_r.h, q_l.u, q_r.u, config)?;
    if config.strict_convergence {
        classification = classification.require_converged()?;
    }
    let speeds = WaveSpeeds::einfeldt(&q_l, &q_r, config).widened(&classification);

    let mut waves = method.solve(&q_l, &q_r, speeds, config)?;
    for &wave in wall.masked_waves() {
        waves.mask_wave(wave);
    }

    Ok(waves)
}

/// Whether the wet state cannot reach over a dry bed at `b_dry`.
fn blocked_by_step(wet: &FluidState, b_dry: f64, config: &SolverConfig) -> Result<bool> {
    let mirror = classify(wet.h, wet.h, wet.u, -wet.u, config)?;
    let h_reach = wet.h.max(mirror.h_middle);
    Ok(h_reach + wet.b < b_dry)
}

/// Solve across a face with unit normal (nx, ny) and return the
/// fluctuations in (x, y) components.
pub fn solve_face(
    left: &CellState,
    right: &CellState,
    normal: (f64, f64),
    method: SolverMethod,
    config: &SolverConfig,
) -> Result<Fluctuations> {
    let (nx, ny) = normal;
    let waves = solve_interface(
        &left.rotate_to_normal(nx, ny),
        &right.rotate_to_normal(nx, ny),
        method,
        config,
    )?;
    Ok(waves.fluctuations().rotate_from_normal(nx, ny))
}
