//! Outer wave speed estimates and their sign regime.
//!
//! The wave solvers take the two outer speeds as input. [`WaveSpeeds::einfeldt`]
//! provides the usual estimate:
//!
//! s1 = min(u_l - c_l, û - ĉ),  s2 = max(u_r + c_r, û + ĉ)
//!
//! with û the sqrt(h)-weighted Roe velocity and ĉ = sqrt(g (h_l + h_r) / 2).
//! The interface driver widens these with the classifier's middle-state speeds.
//!
//! Reference: Einfeldt, "On Godunov-type methods for gas dynamics", SINUM 1988

use crate::config::SolverConfig;
use crate::error::{Result, RiemannError, ensure_finite};
use crate::state::FluidState;

use super::riemann_type::RiemannClassification;

/// Sign pattern of the two outer wave speeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedRegime {
    /// s1 < 0 < s2: waves travel both ways
    Transonic,
    /// s1 >= 0: everything travels right
    RightGoing,
    /// s2 <= 0: everything travels left
    LeftGoing,
}

impl SpeedRegime {
    /// Classify a speed pair with a dead band of half-width `tolerance`.
    ///
    /// Returns `None` when a speed falls inside the dead band and the pair
    /// fits no regime. With `tolerance == 0` an ordered pair always
    /// classifies.
    #[inline]
    pub fn classify(s1: f64, s2: f64, tolerance: f64) -> Option<Self> {
        if s1 < -tolerance && s2 > tolerance {
            Some(Self::Transonic)
        } else if s1 >= tolerance {
            Some(Self::RightGoing)
        } else if s2 <= -tolerance {
            Some(Self::LeftGoing)
        } else {
            None
        }
    }
}

/// Left and right outer wave speeds, s1 <= s2.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveSpeeds {
    /// Left-going (1-family) speed
    pub s1: f64,
    /// Right-going (2-family) speed
    pub s2: f64,
}

impl WaveSpeeds {
    /// Create a speed pair.
    #[inline]
    pub fn new(s1: f64, s2: f64) -> Self {
        Self { s1, s2 }
    }

    /// Einfeldt speed estimate from the two interface states.
    pub fn einfeldt(left: &FluidState, right: &FluidState, config: &SolverConfig) -> Self {
        let c_l = config.celerity(left.h);
        let c_r = config.celerity(right.h);

        let s_l = left.u - c_l;
        let s_r = right.u + c_r;

        let (u_roe, c_roe) = if c_l + c_r > 0.0 {
            let u_roe = (c_l * left.u + c_r * right.u) / (c_l + c_r);
            let c_roe = (config.gravity * 0.5 * (left.h + right.h)).sqrt();
            (u_roe, c_roe)
        } else {
            (0.0, 0.0)
        };

        Self {
            s1: s_l.min(u_roe - c_roe),
            s2: s_r.max(u_roe + c_roe),
        }
    }

    /// Widen the estimate so it brackets the classifier's middle-state speeds.
    #[inline]
    pub fn widened(self, classification: &RiemannClassification) -> Self {
        Self {
            s1: self.s1.min(classification.s2_middle),
            s2: self.s2.max(classification.s1_middle),
        }
    }

    /// Width of the speed interval, s2 - s1.
    #[inline]
    pub fn spread(&self) -> f64 {
        self.s2 - self.s1
    }

    /// Arithmetic mean, used as the speed of the transverse-advection wave.
    #[inline]
    pub fn mean(&self) -> f64 {
        0.5 * (self.s1 + self.s2)
    }

    /// Largest speed magnitude.
    #[inline]
    pub fn max_abs(&self) -> f64 {
        self.s1.abs().max(self.s2.abs())
    }

    /// Sign regime with the given dead band.
    #[inline]
    pub fn regime(&self, tolerance: f64) -> Option<SpeedRegime> {
        SpeedRegime::classify(self.s1, self.s2, tolerance)
    }

    /// Check that the pair can be used as a divisor `s2 - s1`.
    pub fn validate(&self) -> Result<()> {
        ensure_finite("s1", self.s1)?;
        ensure_finite("s2", self.s2)?;

        if self.s1 > self.s2 {
            return Err(RiemannError::UnorderedSpeeds {
                s1: self.s1,
                s2: self.s2,
            });
        }
        if self.spread() <= f64::EPSILON * self.max_abs() {
            return Err(RiemannError::DegenerateSpeeds {
                s1: self.s1,
                s2: self.s2,
            });
        }
        Ok(())
    }
}
