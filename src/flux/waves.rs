//! Wave decomposition output and the fluctuations formed from it.
//!
//! Both solvers return three f-waves Z_k with speeds s_k, ordered left
//! (1-family), middle (transverse advection), right (2-family). Each wave
//! has three components: depth, normal momentum, transverse momentum.
//!
//! The fluctuations consumed by a wave-propagation update are
//!
//! A⁻ΔQ = Σ_{s_k < 0} Z_k,  A⁺ΔQ = Σ_{s_k > 0} Z_k
//!
//! with waves of zero speed split equally between the two.

/// Number of waves (and of equations) in a decomposition.
pub const NUM_WAVES: usize = 3;

/// Part of the jump attributed to the bed step and removed before splitting.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SteadyStateWave {
    /// Depth jump of the steady-state wave
    pub depth_jump: f64,
    /// Momentum flux jump balancing the bed source term
    pub flux_jump: f64,
}

/// Three f-waves with their speeds.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaveDecomposition {
    /// Wave speeds [s1, (s1 + s2) / 2, s2]
    pub speeds: [f64; NUM_WAVES],
    /// F-waves indexed `[wave][equation]`
    pub fwaves: [[f64; NUM_WAVES]; NUM_WAVES],
    /// Steady-state wave that was subtracted
    pub steady_state: SteadyStateWave,
}

impl WaveDecomposition {
    /// All waves zero, all speeds zero.
    #[inline]
    pub fn zero() -> Self {
        Self::default()
    }

    /// Largest wave speed magnitude, for the CFL condition.
    #[inline]
    pub fn max_speed(&self) -> f64 {
        self.speeds.iter().fold(0.0_f64, |acc, s| acc.max(s.abs()))
    }

    /// Sum of the waves per equation.
    pub fn flux_sum(&self) -> [f64; NUM_WAVES] {
        let mut sum = [0.0; NUM_WAVES];
        for wave in &self.fwaves {
            for (total, component) in sum.iter_mut().zip(wave) {
                *total += component;
            }
        }
        sum
    }

    /// Zero out one wave, keeping its speed.
    #[inline]
    pub fn mask_wave(&mut self, wave: usize) {
        self.fwaves[wave] = [0.0; NUM_WAVES];
    }

    /// Left- and right-going fluctuations.
    pub fn fluctuations(&self) -> Fluctuations {
        let mut fluct = Fluctuations::default();

        for (speed, wave) in self.speeds.iter().zip(&self.fwaves) {
            for m in 0..NUM_WAVES {
                if *speed < 0.0 {
                    fluct.left_going[m] += wave[m];
                } else if *speed > 0.0 {
                    fluct.right_going[m] += wave[m];
                } else {
                    fluct.left_going[m] += 0.5 * wave[m];
                    fluct.right_going[m] += 0.5 * wave[m];
                }
            }
        }

        fluct
    }
}

/// Fluctuations A⁻ΔQ and A⁺ΔQ, components (h, hu, hv).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Fluctuations {
    /// A⁻ΔQ, applied to the left cell
    pub left_going: [f64; NUM_WAVES],
    /// A⁺ΔQ, applied to the right cell
    pub right_going: [f64; NUM_WAVES],
}

impl Fluctuations {
    /// Rotate from the face-normal frame back to (x, y) components.
    ///
    /// Inverse of [`CellState::rotate_to_normal`](crate::CellState::rotate_to_normal):
    /// - F_x = F_n * nx - F_t * ny
    /// - F_y = F_n * ny + F_t * nx
    #[inline]
    pub fn rotate_from_normal(&self, nx: f64, ny: f64) -> Self {
        let rotate = |f: &[f64; NUM_WAVES]| [f[0], f[1] * nx - f[2] * ny, f[1] * ny + f[2] * nx];
        Self {
            left_going: rotate(&self.left_going),
            right_going: rotate(&self.right_going),
        }
    }

    /// Total fluctuation A⁻ΔQ + A⁺ΔQ.
    #[inline]
    pub fn total(&self) -> [f64; NUM_WAVES] {
        [
            self.left_going[0] + self.right_going[0],
            self.left_going[1] + self.right_going[1],
            self.left_going[2] + self.right_going[2],
        ]
    }
}
