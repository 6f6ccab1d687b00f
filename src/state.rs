//! Interface states for the shallow water Riemann problem.
//!
//! [`CellState`] holds the conserved values a caller stores per cell:
//! depth h, discharges (hu, hv) and bed elevation b.
//! [`FluidState`] adds the derived quantities the solvers need, with the
//! dry-tolerance floor already applied:
//! - u = hu / h, v = hv / h (zero when h <= drytol)
//! - phi = hu * u + g h² / 2 (momentum flux plus hydrostatic pressure)

use crate::config::SolverConfig;
use crate::error::{Result, ensure_finite};

/// Conserved cell values (h, hu, hv) plus bed elevation b.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CellState {
    /// Water depth h
    pub h: f64,
    /// Discharge along the first axis (normal after rotation)
    pub hu: f64,
    /// Discharge along the second axis (tangential after rotation)
    pub hv: f64,
    /// Bed elevation b
    pub b: f64,
}

impl CellState {
    /// Create a new cell state.
    #[inline(always)]
    pub fn new(h: f64, hu: f64, hv: f64, b: f64) -> Self {
        Self { h, hu, hv, b }
    }

    /// Create a cell state from primitive variables (h, u, v, b).
    #[inline(always)]
    pub fn from_primitives(h: f64, u: f64, v: f64, b: f64) -> Self {
        Self {
            h,
            hu: h * u,
            hv: h * v,
            b,
        }
    }

    /// Rotate discharges into the frame of a face with unit normal (nx, ny).
    ///
    /// Transforms (hu, hv) to (h*u_n, h*u_t) where:
    /// - u_n = u*nx + v*ny (normal component)
    /// - u_t = -u*ny + v*nx (tangential component)
    #[inline]
    pub fn rotate_to_normal(&self, nx: f64, ny: f64) -> Self {
        Self {
            h: self.h,
            hu: self.hu * nx + self.hv * ny,
            hv: -self.hu * ny + self.hv * nx,
            b: self.b,
        }
    }

    /// Free surface elevation eta = h + b.
    #[inline]
    pub fn surface_elevation(&self) -> f64 {
        self.h + self.b
    }
}

/// Fluid state on one side of an interface, in the face-normal frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FluidState {
    /// Water depth, never negative
    pub h: f64,
    /// Normal discharge
    pub hu: f64,
    /// Transverse discharge
    pub hv: f64,
    /// Bed elevation
    pub b: f64,
    /// Normal velocity
    pub u: f64,
    /// Transverse velocity
    pub v: f64,
    /// Normal momentum flux hu*u + g h²/2
    pub phi: f64,
}

impl FluidState {
    /// Build a state from conserved values.
    ///
    /// Negative depths are clamped to zero. Depths at or below the dry
    /// tolerance get zero velocity and zero discharge.
    pub fn new(h: f64, hu: f64, hv: f64, b: f64, config: &SolverConfig) -> Result<Self> {
        ensure_finite("h", h)?;
        ensure_finite("hu", hu)?;
        ensure_finite("hv", hv)?;
        ensure_finite("b", b)?;

        let h = h.max(0.0);
        let g = config.gravity;

        if config.is_dry(h) {
            return Ok(Self {
                h,
                hu: 0.0,
                hv: 0.0,
                b,
                u: 0.0,
                v: 0.0,
                phi: 0.5 * g * h * h,
            });
        }

        let u = hu / h;
        let v = hv / h;
        Ok(Self {
            h,
            hu,
            hv,
            b,
            u,
            v,
            phi: hu * u + 0.5 * g * h * h,
        })
    }

    /// Build a state from a cell already rotated to the face normal.
    #[inline]
    pub fn from_cell(cell: &CellState, config: &SolverConfig) -> Result<Self> {
        Self::new(cell.h, cell.hu, cell.hv, cell.b, config)
    }

    /// Dry state on a bed of elevation `b`.
    #[inline]
    pub fn dry(b: f64) -> Self {
        Self {
            b,
            ..Self::default()
        }
    }

    /// Mirror image across the interface: same depth and bed, normal
    /// velocity reversed. Used for reflecting-wall treatment.
    #[inline]
    pub fn reflected(&self) -> Self {
        Self {
            hu: -self.hu,
            u: -self.u,
            ..*self
        }
    }

    /// Check if this state is dry.
    #[inline]
    pub fn is_dry(&self, config: &SolverConfig) -> bool {
        config.is_dry(self.h)
    }

    /// Transverse momentum flux h*u*v carried across the interface.
    #[inline]
    pub fn transverse_flux(&self) -> f64 {
        self.h * self.u * self.v
    }

    /// Free surface elevation eta = h + b.
    #[inline]
    pub fn surface_elevation(&self) -> f64 {
        self.h + self.b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    fn config() -> SolverConfig {
        SolverConfig::new(10.0, 1e-3)
    }

    #[test]
    fn test_derived_quantities() {
        let state = FluidState::new(2.0, 6.0, 2.0, -1.0, &config()).unwrap();

        assert!((state.u - 3.0).abs() < TOL);
        assert!((state.v - 1.0).abs() < TOL);
        // phi = hu*u + g h²/2 = 18 + 20
        assert!((state.phi - 38.0).abs() < TOL);
        assert!((state.transverse_flux() - 6.0).abs() < TOL);
        assert!((state.surface_elevation() - 1.0).abs() < TOL);
    }

    #[test]
    fn test_dry_state_has_no_velocity() {
        let state = FluidState::new(5e-4, 1.0, -1.0, 0.0, &config()).unwrap();

        assert!(state.is_dry(&config()));
        assert_eq!(state.u, 0.0);
        assert_eq!(state.v, 0.0);
        assert_eq!(state.hu, 0.0);
        assert_eq!(state.hv, 0.0);
    }

    #[test]
    fn test_negative_depth_clamped() {
        let state = FluidState::new(-1e-12, 0.0, 0.0, 0.0, &config()).unwrap();
        assert_eq!(state.h, 0.0);
        assert_eq!(state.phi, 0.0);
    }

    #[test]
    fn test_non_finite_rejected() {
        assert!(FluidState::new(f64::NAN, 0.0, 0.0, 0.0, &config()).is_err());
        assert!(FluidState::new(1.0, f64::INFINITY, 0.0, 0.0, &config()).is_err());
    }

    #[test]
    fn test_reflected() {
        let state = FluidState::new(1.0, 2.0, 0.5, 0.3, &config()).unwrap();
        let mirror = state.reflected();

        assert_eq!(mirror.h, state.h);
        assert_eq!(mirror.hu, -state.hu);
        assert_eq!(mirror.u, -state.u);
        assert_eq!(mirror.hv, state.hv);
        assert_eq!(mirror.phi, state.phi);
    }

    #[test]
    fn test_rotation() {
        // State: h=2, u=3, v=4
        let cell = CellState::from_primitives(2.0, 3.0, 4.0, 0.0);

        let rotated = cell.rotate_to_normal(1.0, 0.0);
        assert!((rotated.hu - 6.0).abs() < TOL);
        assert!((rotated.hv - 8.0).abs() < TOL);

        // Face normal along y: normal discharge is hv, tangential is -hu
        let rotated = cell.rotate_to_normal(0.0, 1.0);
        assert!((rotated.hu - 8.0).abs() < TOL);
        assert!((rotated.hv + 6.0).abs() < TOL);
    }
}
