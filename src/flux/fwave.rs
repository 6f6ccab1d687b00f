//! Plain f-wave solver with a hydrostatic bed source.
//!
//! The flux jump, corrected by the bed source term
//! Δφ_src = -g (h_l + h_r)/2 Δb, is split onto the two outer speeds:
//!
//! β₁ = (s₂Δhu - (Δφ - Δφ_src))/(s₂ - s₁)
//! β₂ = ((Δφ - Δφ_src) - s₁Δhu)/(s₂ - s₁)
//!
//! Z₁ = β₁ (1, s₁, v_l),  Z₃ = β₂ (1, s₂, v_r)
//!
//! Cheaper than the augmented solver and exact for a lake at rest, but
//! without the steady-state iteration it handles transcritical flow over
//! topography less accurately.
//!
//! Reference: Bale, LeVeque, Mitran, Rossmanith, "A wave propagation method
//! for conservation laws and balance laws with spatially varying flux
//! functions", SIAM J. Sci. Comput. 24 (2002)

use crate::config::SolverConfig;
use crate::error::Result;
use crate::state::FluidState;

use super::speeds::WaveSpeeds;
use super::waves::{SteadyStateWave, WaveDecomposition};

/// F-wave solver for one interface in the face-normal frame.
///
/// # Errors
/// Same speed validation as [`solve_augmented`](super::solve_augmented).
pub fn solve_fwave(
    left: &FluidState,
    right: &FluidState,
    speeds: WaveSpeeds,
    config: &SolverConfig,
) -> Result<WaveDecomposition> {
    speeds.validate()?;

    let g = config.gravity;
    let delb = right.b - left.b;
    let delhu = right.hu - left.hu;
    let source = -0.5 * g * (left.h + right.h) * delb;
    let delphi = right.phi - left.phi - source;

    let WaveSpeeds { s1, s2 } = speeds;
    let spread = speeds.spread();
    let beta_1 = (s2 * delhu - delphi) / spread;
    let beta_2 = (delphi - s1 * delhu) / spread;

    let wave_1 = [beta_1, beta_1 * s1, beta_1 * left.v];
    let wave_3 = [beta_2, beta_2 * s2, beta_2 * right.v];
    let wave_2 = [
        0.0,
        0.0,
        right.transverse_flux() - left.transverse_flux() - wave_1[2] - wave_3[2],
    ];

    Ok(WaveDecomposition {
        speeds: [s1, speeds.mean(), s2],
        fwaves: [wave_1, wave_2, wave_3],
        steady_state: SteadyStateWave {
            depth_jump: -delb,
            flux_jump: source,
        },
    })
}
