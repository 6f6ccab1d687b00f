//! Augmented (steady-state subtracting) f-wave solver.
//!
//! The jump across the interface is split as
//!
//! ΔQ = (Δh, Δhu, Δφ) = steady-state wave + α₁ r₁ + α₂ r₂
//!
//! where the steady-state wave (δh, δφ) carries the part of the jump that
//! balances the bed step Δb. For a steady solution with h̄ = (h*_l + h*_r)/2:
//!
//! δh = Δb g h̄ / (s̄₁s̄₂),  δφ = -Δb g h̄ s̃₁s̃₂ / (s̄₁s̄₂)
//!
//! with s̄₁s̄₂ = (u*_l + u*_r)²/4 - g h̄ and s̃₁s̃₂ = max(0, u*_l u*_r) - g h̄
//! evaluated on the star states. Near sonic points
//! the product vanishes and the hydrostatic limit δh = -Δb, δφ = -g h̄ Δb is
//! used instead. The star states are refined by repeating the decomposition
//! up to `max_iterations` times.
//!
//! The dynamic remainder is split with the two outer speeds:
//!
//! α₁ = (s₂(Δh - δh) - Δhu)/(s₂ - s₁),  α₂ = (Δhu - s₁(Δh - δh))/(s₂ - s₁)
//! β₁ = (s₂Δhu - (Δφ - δφ))/(s₂ - s₁),  β₂ = ((Δφ - δφ) - s₁Δhu)/(s₂ - s₁)
//!
//! A lake at rest gives Δh = δh and Δφ = δφ, so every wave vanishes.
//!
//! Reference: George, "Augmented Riemann solvers for the shallow water
//! equations over variable topography with steady states and inundation",
//! J. Comput. Phys. 227 (2008)

use crate::config::SolverConfig;
use crate::error::Result;
use crate::state::FluidState;

use super::speeds::{SpeedRegime, WaveSpeeds};
use super::waves::{SteadyStateWave, WaveDecomposition};

/// Star states refined by the steady-state iteration.
#[derive(Clone, Copy, Debug)]
struct StarStates {
    h_l: f64,
    h_r: f64,
    u_l: f64,
    u_r: f64,
}

impl StarStates {
    fn new(left: &FluidState, right: &FluidState) -> Self {
        Self {
            h_l: left.h,
            h_r: right.h,
            u_l: left.u,
            u_r: right.u,
        }
    }

    /// Set depths and shared discharge, flooring dry depths to zero velocity.
    fn update(&mut self, h_l: f64, h_r: f64, hu: f64, config: &SolverConfig) {
        (self.h_l, self.u_l) = floored(h_l, hu, config);
        (self.h_r, self.u_r) = floored(h_r, hu, config);
    }
}

#[inline]
fn floored(h: f64, hu: f64, config: &SolverConfig) -> (f64, f64) {
    if config.is_dry(h) {
        (h.max(0.0), 0.0)
    } else {
        (h, hu / h)
    }
}

/// Two-speed split of a (depth, discharge, flux) jump.
#[derive(Clone, Copy, Debug, Default)]
struct Strengths {
    alpha: [f64; 2],
    beta: [f64; 2],
}

impl Strengths {
    #[inline]
    fn split(delh: f64, delhu: f64, delphi: f64, speeds: WaveSpeeds) -> Self {
        let WaveSpeeds { s1, s2 } = speeds;
        let spread = speeds.spread();
        Self {
            alpha: [
                (s2 * delh - delhu) / spread,
                (delhu - s1 * delh) / spread,
            ],
            beta: [
                (s2 * delhu - delphi) / spread,
                (delphi - s1 * delhu) / spread,
            ],
        }
    }
}

/// Augmented solver for one interface in the face-normal frame.
///
/// `speeds` are the outer speed estimates, usually the Einfeldt speeds
/// widened by the classifier's middle-state speeds.
///
/// # Errors
/// - [`RiemannError::NonFinite`](crate::RiemannError::NonFinite) for NaN or infinite speeds
/// - [`RiemannError::UnorderedSpeeds`](crate::RiemannError::UnorderedSpeeds) if s1 > s2
/// - [`RiemannError::DegenerateSpeeds`](crate::RiemannError::DegenerateSpeeds) if s2 - s1 vanishes
pub fn solve_augmented(
    left: &FluidState,
    right: &FluidState,
    speeds: WaveSpeeds,
    config: &SolverConfig,
) -> Result<WaveDecomposition> {
    speeds.validate()?;

    let steady_state = steady_state_wave(left, right, speeds, config);

    let delh = right.h - left.h;
    let delhu = right.hu - left.hu;
    let delphi = right.phi - left.phi;

    let Strengths { alpha, beta } = Strengths::split(
        delh - steady_state.depth_jump,
        delhu,
        delphi - steady_state.flux_jump,
        speeds,
    );

    let WaveSpeeds { s1, s2 } = speeds;
    let wave_1 = [alpha[0] * s1, beta[0] * s1, alpha[0] * s1 * left.v];
    let wave_3 = [alpha[1] * s2, beta[1] * s2, alpha[1] * s2 * right.v];
    let wave_2 = [
        0.0,
        0.0,
        right.transverse_flux() - left.transverse_flux() - wave_1[2] - wave_3[2],
    ];

    Ok(WaveDecomposition {
        speeds: [s1, speeds.mean(), s2],
        fwaves: [wave_1, wave_2, wave_3],
        steady_state,
    })
}

/// Iteratively determine the steady-state wave attributable to the bed step.
fn steady_state_wave(
    left: &FluidState,
    right: &FluidState,
    speeds: WaveSpeeds,
    config: &SolverConfig,
) -> SteadyStateWave {
    let g = config.gravity;
    let delb = right.b - left.b;

    let mut wave = SteadyStateWave {
        depth_jump: -delb,
        flux_jump: -g * 0.5 * (left.h + right.h) * delb,
    };
    if delb == 0.0 {
        return wave;
    }

    let tol = config.critical_tolerance;
    let WaveSpeeds { s1, s2 } = speeds;
    let spread = speeds.spread();

    let delh = right.h - left.h;
    let delhu = right.hu - left.hu;
    let delphi = right.phi - left.phi;

    // Middle state of an HLL solver, used to keep star depths non-negative
    let h_hll = ((left.hu - right.hu + s2 * right.h - s1 * left.h) / spread).max(0.0);
    let bound_regime = speeds.regime(tol);
    let update_regime = speeds.regime(0.0);

    let mut star = StarStates::new(left, right);
    let mut strengths = Strengths::default();

    for iter in 0..config.max_iterations {
        let h_bar = (0.5 * (star.h_l + star.h_r)).max(0.0);
        let s1s2_bar = 0.25 * (star.u_l + star.u_r).powi(2) - g * h_bar;
        let s1s2_tilde = (star.u_l * star.u_r).max(0.0) - g * h_bar;

        let sonic = s1s2_bar.abs() <= tol
            || s1s2_bar * s1s2_tilde <= tol * tol
            || s1s2_bar * s1 * s2 <= tol * tol
            || s1.abs().min(s2.abs()) < tol.sqrt();

        let mut depth_jump = if sonic {
            -delb
        } else {
            delb * g * h_bar / s1s2_bar
        };

        // Keep the implied star depths non-negative
        match bound_regime {
            Some(SpeedRegime::Transonic) => {
                depth_jump = depth_jump.min(h_hll * spread / s2);
                depth_jump = depth_jump.max(h_hll * spread / s1);
            }
            Some(SpeedRegime::RightGoing) => {
                depth_jump = depth_jump.min(h_hll * spread / s1);
                depth_jump = depth_jump.max(-left.h);
            }
            Some(SpeedRegime::LeftGoing) => {
                depth_jump = depth_jump.min(right.h);
                depth_jump = depth_jump.max(h_hll * spread / s2);
            }
            None => {}
        }

        let mut flux_jump = if sonic {
            -g * h_bar * delb
        } else {
            -delb * g * h_bar * s1s2_tilde / s1s2_bar
        };

        // Bed source lies between the hydrostatic values of the two star states
        let source_l = -star.h_l * delb;
        let source_r = -star.h_r * delb;
        flux_jump = flux_jump.min(g * source_l.max(source_r));
        flux_jump = flux_jump.max(g * source_l.min(source_r));

        wave = SteadyStateWave {
            depth_jump,
            flux_jump,
        };

        let next = Strengths::split(delh - depth_jump, delhu, delphi - flux_jump, speeds);
        let increment_1 = next.alpha[0] - strengths.alpha[0];
        let increment_2 = next.alpha[1] - strengths.alpha[1];
        strengths = next;

        let increment = increment_1 * increment_1 + increment_2 * increment_2;
        log::trace!(
            "steady-state iter {}: sonic = {}, depth jump = {:.6e}, strength increment = {:.3e}",
            iter,
            sonic,
            depth_jump,
            increment.sqrt()
        );

        if increment < config.convergence_tolerance.powi(2) {
            break;
        }

        let [alpha_1, alpha_2] = strengths.alpha;
        match update_regime {
            Some(SpeedRegime::Transonic) => star.update(
                left.h + alpha_1,
                right.h - alpha_2,
                left.hu + strengths.beta[0],
                config,
            ),
            Some(SpeedRegime::RightGoing) => star.update(
                left.h,
                right.h - alpha_1 - alpha_2,
                left.hu,
                config,
            ),
            Some(SpeedRegime::LeftGoing) => star.update(
                left.h + alpha_1 + alpha_2,
                right.h,
                right.hu,
                config,
            ),
            None => {}
        }
    }

    wave
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RiemannError;

    const G: f64 = 9.81;
    const TOL: f64 = 1e-10;

    fn config() -> SolverConfig {
        SolverConfig::new(G, 1e-3)
    }

    fn state(h: f64, hu: f64, hv: f64, b: f64) -> FluidState {
        FluidState::new(h, hu, hv, b, &config()).unwrap()
    }

    fn assert_conservative(left: &FluidState, right: &FluidState, waves: &WaveDecomposition) {
        let sum = waves.flux_sum();
        assert!((sum[0] - (right.hu - left.hu)).abs() < TOL);
        assert!(
            (sum[1] - (right.phi - left.phi - waves.steady_state.flux_jump)).abs() < TOL
        );
        assert!(
            (sum[2] - (right.transverse_flux() - left.transverse_flux())).abs() < TOL
        );
    }

    #[test]
    fn test_lake_at_rest_over_step() {
        let config = config().with_max_iterations(5);
        let left = FluidState::new(2.0, 0.0, 0.0, 0.0, &config).unwrap();
        let right = FluidState::new(1.5, 0.0, 0.0, 0.5, &config).unwrap();
        let speeds = WaveSpeeds::einfeldt(&left, &right, &config);

        let waves = solve_augmented(&left, &right, speeds, &config).unwrap();

        for wave in &waves.fwaves {
            for component in wave {
                assert!(component.abs() < TOL, "wave component {}", component);
            }
        }
        assert!((waves.steady_state.depth_jump + 0.5).abs() < TOL);
    }

    #[test]
    fn test_flat_bed_has_no_steady_state() {
        let left = state(2.0, 1.0, 0.2, 0.3);
        let right = state(1.0, 0.5, -0.4, 0.3);
        let speeds = WaveSpeeds::einfeldt(&left, &right, &config());

        let waves = solve_augmented(&left, &right, speeds, &config()).unwrap();

        assert_eq!(waves.steady_state.depth_jump, 0.0);
        assert_eq!(waves.steady_state.flux_jump, 0.0);
        assert_conservative(&left, &right, &waves);
    }

    #[test]
    fn test_conservation_over_bed_step() {
        let config = config().with_max_iterations(3);
        let left = FluidState::new(1.2, 0.8, 0.3, 0.0, &config).unwrap();
        let right = FluidState::new(0.7, 0.4, -0.1, 0.2, &config).unwrap();
        let speeds = WaveSpeeds::einfeldt(&left, &right, &config);

        let waves = solve_augmented(&left, &right, speeds, &config).unwrap();

        assert_conservative(&left, &right, &waves);
        assert!(waves.speeds[0] <= waves.speeds[1] && waves.speeds[1] <= waves.speeds[2]);
        assert_eq!(waves.fwaves[1][0], 0.0);
        assert_eq!(waves.fwaves[1][1], 0.0);
    }

    #[test]
    fn test_supercritical_right_going() {
        // Both speeds positive: all waves go right
        let config = config().with_max_iterations(4);
        let left = FluidState::new(0.5, 4.0, 0.0, 0.1, &config).unwrap();
        let right = FluidState::new(0.45, 3.8, 0.0, 0.0, &config).unwrap();
        let speeds = WaveSpeeds::einfeldt(&left, &right, &config);
        assert_eq!(speeds.regime(0.0), Some(SpeedRegime::RightGoing));

        let waves = solve_augmented(&left, &right, speeds, &config).unwrap();

        assert_conservative(&left, &right, &waves);
        let fluct = waves.fluctuations();
        assert_eq!(fluct.left_going, [0.0; 3]);
    }

    #[test]
    fn test_flux_jump_bounded_by_hydrostatic_values() {
        // One pass: the bounds use the cell depths as star depths
        let config = config().with_max_iterations(1);
        let delb = 0.3;
        let left = FluidState::new(1.0, 0.5, 0.0, 0.0, &config).unwrap();
        let right = FluidState::new(0.4, 0.3, 0.0, delb, &config).unwrap();
        let speeds = WaveSpeeds::einfeldt(&left, &right, &config);

        let waves = solve_augmented(&left, &right, speeds, &config).unwrap();
        let flux_jump = waves.steady_state.flux_jump;

        let source_l = -G * left.h * delb;
        let source_r = -G * right.h * delb;
        assert!(flux_jump >= source_l.min(source_r) - TOL);
        assert!(flux_jump <= source_l.max(source_r) + TOL);
        assert_conservative(&left, &right, &waves);
    }

    #[test]
    fn test_critical_flow_uses_hydrostatic_limit() {
        // u^2 = g h on both sides: the steady-state denominator vanishes
        let config = config().with_max_iterations(1);
        let delb = 0.05;
        let hu = G.sqrt();
        let left = FluidState::new(1.0, hu, 0.0, 0.0, &config).unwrap();
        let right = FluidState::new(1.0, hu, 0.0, delb, &config).unwrap();

        let waves = solve_augmented(&left, &right, WaveSpeeds::new(-1.0, 5.0), &config).unwrap();

        assert!((waves.steady_state.depth_jump + delb).abs() < TOL);
        assert!((waves.steady_state.flux_jump + G * delb).abs() < TOL);
    }

    #[test]
    fn test_near_sonic_speed_uses_hydrostatic_limit() {
        // |s1| below sqrt(critical tolerance)
        let config = config().with_max_iterations(1);
        let delb = 0.1;
        let left = FluidState::new(1.0, 0.0, 0.0, 0.0, &config).unwrap();
        let right = FluidState::new(0.8, 0.0, 0.0, delb, &config).unwrap();
        let speeds = WaveSpeeds::new(-0.05, 3.0);
        assert!(speeds.s1.abs() < config.critical_tolerance.sqrt());

        let waves = solve_augmented(&left, &right, speeds, &config).unwrap();

        let h_bar = 0.5 * (left.h + right.h);
        assert!((waves.steady_state.depth_jump + delb).abs() < TOL);
        assert!((waves.steady_state.flux_jump + G * h_bar * delb).abs() < TOL);
    }

    #[test]
    fn test_resonant_depth_jump_clamped_transonic() {
        // Near-critical drop: δh = Δb g h̄ / s̄₁s̄₂ is far above the HLL bound
        let config = config().with_max_iterations(1);
        let left = FluidState::new(1.0, 3.0, 0.0, 0.0, &config).unwrap();
        let right = FluidState::new(1.0, 3.0, 0.0, -0.2, &config).unwrap();
        let speeds = WaveSpeeds::new(-1.0, 4.0);
        assert_eq!(speeds.regime(config.critical_tolerance), Some(SpeedRegime::Transonic));

        let waves = solve_augmented(&left, &right, speeds, &config).unwrap();

        let h_hll = (left.hu - right.hu + speeds.s2 * right.h - speeds.s1 * left.h)
            / speeds.spread();
        let bound = h_hll * speeds.spread() / speeds.s2;
        assert!((waves.steady_state.depth_jump - bound).abs() < TOL);
        assert_conservative(&left, &right, &waves);
    }

    #[test]
    fn test_resonant_depth_jump_clamped_right_going() {
        // Supercritical drop: the left star depth h_l + δh must stay non-negative
        let config = config().with_max_iterations(1);
        let left = FluidState::new(1.0, 3.3, 0.0, 0.0, &config).unwrap();
        let right = FluidState::new(1.0, 3.3, 0.0, -0.5, &config).unwrap();
        let speeds = WaveSpeeds::new(0.5, 6.0);
        assert_eq!(speeds.regime(config.critical_tolerance), Some(SpeedRegime::RightGoing));

        let waves = solve_augmented(&left, &right, speeds, &config).unwrap();

        assert!((waves.steady_state.depth_jump + left.h).abs() < TOL);
        assert_conservative(&left, &right, &waves);
    }

    #[test]
    fn test_resonant_depth_jump_clamped_left_going() {
        // Mirror of the right-going case: h_r - δh must stay non-negative
        let config = config().with_max_iterations(1);
        let left = FluidState::new(1.0, -3.3, 0.0, -0.5, &config).unwrap();
        let right = FluidState::new(1.0, -3.3, 0.0, 0.0, &config).unwrap();
        let speeds = WaveSpeeds::new(-6.0, -0.5);
        assert_eq!(speeds.regime(config.critical_tolerance), Some(SpeedRegime::LeftGoing));

        let waves = solve_augmented(&left, &right, speeds, &config).unwrap();

        assert!((waves.steady_state.depth_jump - right.h).abs() < TOL);
        assert_conservative(&left, &right, &waves);
    }

    #[test]
    fn test_degenerate_speeds_rejected() {
        let left = state(1.0, 0.0, 0.0, 0.0);
        let right = state(1.0, 0.0, 0.0, 0.0);

        assert!(matches!(
            solve_augmented(&left, &right, WaveSpeeds::new(2.0, 2.0), &config()),
            Err(RiemannError::DegenerateSpeeds { .. })
        ));
        assert!(matches!(
            solve_augmented(&left, &right, WaveSpeeds::new(2.0, -2.0), &config()),
            Err(RiemannError::UnorderedSpeeds { .. })
        ));
    }
}
