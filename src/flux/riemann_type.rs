//! Riemann structure classification for the shallow water equations.
//!
//! Determines which wave type each characteristic family takes (shock or
//! rarefaction), together with the middle state (h_m, u_m) and the two
//! middle-state characteristic speeds. The speeds are used to widen the
//! Einfeldt estimate so it brackets the true Riemann fan.
//!
//! Two test functions decide the structure. With h_min, h_max the smaller and
//! larger depth and Δu = u_r - u_l:
//!
//! F_min = Δu + 2(sqrt(g h_min) - sqrt(g h_max))
//! F_max = Δu + (h_max - h_min) sqrt(g (h_max + h_min) / (2 h_max h_min))
//!
//! - F_min > 0: two rarefactions (closed form)
//! - F_max <= 0: two shocks (Newton on sqrt(h) from h_max)
//! - otherwise: one shock and one rarefaction (Newton on h in [h_min, h_max])
//!
//! Reference: Toro, "Shock-Capturing Methods for Free-Surface Shallow Flows", ch. 5

use std::fmt;

use crate::config::SolverConfig;
use crate::error::{Result, RiemannError, ensure_finite};

/// Wave structure of the Riemann problem.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RiemannStructure {
    /// At least one side is dry
    DryBed,
    /// Both families are rarefactions
    TwoRarefactions,
    /// Both families are shocks
    TwoShocks,
    /// One shock and one rarefaction
    ShockRarefaction,
}

impl fmt::Display for RiemannStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DryBed => "dry bed",
            Self::TwoRarefactions => "two rarefactions",
            Self::TwoShocks => "two shocks",
            Self::ShockRarefaction => "shock and rarefaction",
        };
        f.write_str(name)
    }
}

/// How the middle depth was obtained.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Convergence {
    /// Closed-form expression, no iteration needed
    ClosedForm,
    /// Newton residual dropped below tolerance
    Converged { iterations: usize },
    /// Iteration cap reached with the residual still above tolerance.
    /// `residual` is relative to the velocity scale of the problem.
    MaxIterationsReached { iterations: usize, residual: f64 },
}

/// Result of classifying a Riemann problem.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RiemannClassification {
    /// Wave structure
    pub structure: RiemannStructure,
    /// Middle-state depth h_m
    pub h_middle: f64,
    /// Middle-state velocity u_m
    pub u_middle: f64,
    /// 1-family characteristic speed in the middle state
    pub s1_middle: f64,
    /// 2-family characteristic speed in the middle state
    pub s2_middle: f64,
    /// Whether the 1-family wave is a rarefaction
    pub rarefaction_1: bool,
    /// Whether the 2-family wave is a rarefaction
    pub rarefaction_2: bool,
    /// Root-finding outcome
    pub convergence: Convergence,
}

impl RiemannClassification {
    /// Whether the middle depth is trustworthy (closed form or converged).
    #[inline]
    pub fn is_converged(&self) -> bool {
        !matches!(self.convergence, Convergence::MaxIterationsReached { .. })
    }

    /// Turn an unconverged Newton solve into an error.
    pub fn require_converged(self) -> Result<Self> {
        match self.convergence {
            Convergence::MaxIterationsReached {
                iterations,
                residual,
            } => Err(RiemannError::NotConverged {
                iterations,
                residual,
            }),
            _ => Ok(self),
        }
    }
}

/// Classify the Riemann problem between (h_l, u_l) and (h_r, u_r).
///
/// Negative depths are clamped to zero. A side at or below the dry tolerance
/// is treated as dry with zero velocity.
///
/// # Errors
/// - [`RiemannError::InvalidConfig`] if `config` fails [`SolverConfig::validate`]
/// - [`RiemannError::NonFinite`] for NaN or infinite input
/// - [`RiemannError::DegenerateNewton`] when the root finder breaks down
///
/// An unconverged Newton solve is not an error here; it is reported through
/// [`RiemannClassification::convergence`].
pub fn classify(
    h_l: f64,
    h_r: f64,
    u_l: f64,
    u_r: f64,
    config: &SolverConfig,
) -> Result<RiemannClassification> {
    config.validate()?;
    ensure_finite("h_l", h_l)?;
    ensure_finite("h_r", h_r)?;
    ensure_finite("u_l", u_l)?;
    ensure_finite("u_r", u_r)?;

    let g = config.gravity;
    let h_l = h_l.max(0.0);
    let h_r = h_r.max(0.0);
    let dry_l = config.is_dry(h_l);
    let dry_r = config.is_dry(h_r);

    if dry_l || dry_r {
        return Ok(dry_bed(h_l, h_r, u_l, u_r, dry_l, dry_r, config));
    }

    let h_min = h_l.min(h_r);
    let h_max = h_l.max(h_r);
    let delu = u_r - u_l;
    let c_l = (g * h_l).sqrt();
    let c_r = (g * h_r).sqrt();

    let f_min = delu + 2.0 * ((g * h_min).sqrt() - (g * h_max).sqrt());
    let f_max = delu + (h_max - h_min) * (0.5 * g * (h_max + h_min) / (h_max * h_min)).sqrt();

    if f_min > 0.0 {
        // Two rarefactions: Riemann invariants meet in closed form
        let h_m = (-delu + 2.0 * (c_l + c_r)).max(0.0).powi(2) / (16.0 * g);
        let c_m = (g * h_m).sqrt();
        // A vacuum opens between the fans when h_m underflows to zero
        let u_m = if h_m > 0.0 { u_l + 2.0 * (c_l - c_m) } else { 0.0 };

        Ok(RiemannClassification {
            structure: RiemannStructure::TwoRarefactions,
            h_middle: h_m,
            u_middle: u_m,
            s1_middle: u_l + 2.0 * c_l - 3.0 * c_m,
            s2_middle: u_r - 2.0 * c_r + 3.0 * c_m,
            rarefaction_1: true,
            rarefaction_2: true,
            convergence: Convergence::ClosedForm,
        })
    } else if f_max <= 0.0 {
        let (h_m, convergence) = two_shock_depth(h_l, h_r, delu, config)?;
        let c_m = (g * h_m).sqrt();
        let u1_m = u_l - (h_m - h_l) * (0.5 * g * (1.0 / h_m + 1.0 / h_l)).sqrt();
        let u2_m = u_r + (h_m - h_r) * (0.5 * g * (1.0 / h_m + 1.0 / h_r)).sqrt();

        Ok(RiemannClassification {
            structure: RiemannStructure::TwoShocks,
            h_middle: h_m,
            u_middle: 0.5 * (u1_m + u2_m),
            s1_middle: u1_m - c_m,
            s2_middle: u2_m + c_m,
            rarefaction_1: false,
            rarefaction_2: false,
            convergence,
        })
    } else {
        let (h_m, convergence) = shock_rarefaction_depth(h_min, h_max, delu, config)?;
        let c_m = (g * h_m).sqrt();

        let classification = if h_l > h_r {
            // 1-rarefaction from the deep left state, 2-shock into the right
            RiemannClassification {
                structure: RiemannStructure::ShockRarefaction,
                h_middle: h_m,
                u_middle: u_l + 2.0 * (c_l - c_m),
                s1_middle: u_l + 2.0 * c_l - 3.0 * c_m,
                s2_middle: u_l + 2.0 * c_l - c_m,
                rarefaction_1: true,
                rarefaction_2: false,
                convergence,
            }
        } else {
            RiemannClassification {
                structure: RiemannStructure::ShockRarefaction,
                h_middle: h_m,
                u_middle: u_r - 2.0 * (c_r - c_m),
                s1_middle: u_r - 2.0 * c_r + c_m,
                s2_middle: u_r - 2.0 * c_r + 3.0 * c_m,
                rarefaction_1: false,
                rarefaction_2: true,
                convergence,
            }
        };
        Ok(classification)
    }
}

/// Dry-bed case: both middle speeds equal the wet front speed.
fn dry_bed(
    h_l: f64,
    h_r: f64,
    u_l: f64,
    u_r: f64,
    dry_l: bool,
    dry_r: bool,
    config: &SolverConfig,
) -> RiemannClassification {
    let (u_l, c_l) = if dry_l { (0.0, 0.0) } else { (u_l, config.celerity(h_l)) };
    let (u_r, c_r) = if dry_r { (0.0, 0.0) } else { (u_r, config.celerity(h_r)) };

    // u_l + 2 c_l for a dry right side, u_r - 2 c_r for a dry left side
    let front = u_r + u_l - 2.0 * c_r + 2.0 * c_l;

    RiemannClassification {
        structure: RiemannStructure::DryBed,
        h_middle: 0.0,
        u_middle: 0.0,
        s1_middle: front,
        s2_middle: front,
        rarefaction_1: dry_l,
        rarefaction_2: dry_r,
        convergence: Convergence::ClosedForm,
    }
}

/// Velocity scale used to make Newton residuals relative.
#[inline]
fn velocity_scale(delu: f64, h_max: f64, config: &SolverConfig) -> f64 {
    delu.abs().max(config.celerity(h_max))
}

/// Two-shock root function and its derivative with respect to h.
#[inline]
fn two_shock_function(h: f64, h_l: f64, h_r: f64, delu: f64, g: f64) -> (f64, f64) {
    let g_l = (0.5 * g * (1.0 / h + 1.0 / h_l)).sqrt();
    let g_r = (0.5 * g * (1.0 / h + 1.0 / h_r)).sqrt();
    let f = delu + (h - h_l) * g_l + (h - h_r) * g_r;
    let dfdh = g_l - g * (h - h_l) / (4.0 * h * h * g_l) + g_r - g * (h - h_r) / (4.0 * h * h * g_r);
    (f, dfdh)
}

/// Middle depth for two shocks: Newton iteration on sqrt(h), starting at h_max.
fn two_shock_depth(
    h_l: f64,
    h_r: f64,
    delu: f64,
    config: &SolverConfig,
) -> Result<(f64, Convergence)> {
    let g = config.gravity;
    let h_max = h_l.max(h_r);
    let scale = velocity_scale(delu, h_max, config);
    let tolerance = config.newton_tolerance * scale;
    let degenerate = |depth| RiemannError::DegenerateNewton {
        structure: RiemannStructure::TwoShocks,
        depth,
    };

    let mut h0 = h_max;
    for iter in 0..config.newton_max_iterations {
        let (f0, dfdh) = two_shock_function(h0, h_l, h_r, delu, g);
        log::trace!("two-shock Newton iter {}: h = {:.6e}, residual = {:.6e}", iter, h0, f0);

        if f0.abs() <= tolerance {
            return Ok((h0, Convergence::Converged { iterations: iter }));
        }

        let slope = 2.0 * h0.sqrt() * dfdh;
        if slope == 0.0 || !slope.is_finite() {
            return Err(degenerate(h0));
        }

        let root = h0.sqrt() - f0 / slope;
        h0 = root * root;
        if !(h0.is_finite() && h0 > 0.0) {
            return Err(degenerate(h0));
        }
    }

    let (residual, _) = two_shock_function(h0, h_l, h_r, delu, g);
    let convergence = final_convergence(residual, tolerance, scale, config.newton_max_iterations);
    Ok((h0, convergence))
}

/// Shock-rarefaction root function and its derivative with respect to h.
#[inline]
fn shock_rarefaction_function(h: f64, h_min: f64, h_max: f64, delu: f64, g: f64) -> (f64, f64) {
    let g_s = (0.5 * g * (1.0 / h + 1.0 / h_min)).sqrt();
    let f = delu + 2.0 * ((g * h).sqrt() - (g * h_max).sqrt()) + (h - h_min) * g_s;
    let dfdh = (g / h).sqrt() + g_s - g * (h - h_min) / (4.0 * h * h * g_s);
    (f, dfdh)
}

/// Middle depth for one shock and one rarefaction.
///
/// Newton iteration on h starting from the shallower depth. The root lies in
/// [h_min, h_max] (F(h_min) = F_min <= 0 < F_max = F(h_max)); a step leaving
/// the current bracket falls back to bisection.
fn shock_rarefaction_depth(
    h_min: f64,
    h_max: f64,
    delu: f64,
    config: &SolverConfig,
) -> Result<(f64, Convergence)> {
    let g = config.gravity;
    let scale = velocity_scale(delu, h_max, config);
    let tolerance = config.newton_tolerance * scale;

    let mut lo = h_min;
    let mut hi = h_max;
    let mut h0 = h_min;

    for iter in 0..config.newton_max_iterations {
        let (f0, dfdh) = shock_rarefaction_function(h0, h_min, h_max, delu, g);
        log::trace!(
            "shock-rarefaction Newton iter {}: h = {:.6e}, residual = {:.6e}",
            iter,
            h0,
            f0
        );

        if f0.abs() <= tolerance {
            return Ok((h0, Convergence::Converged { iterations: iter }));
        }
        if !f0.is_finite() {
            return Err(RiemannError::DegenerateNewton {
                structure: RiemannStructure::ShockRarefaction,
                depth: h0,
            });
        }

        if f0 < 0.0 {
            lo = h0;
        } else {
            hi = h0;
        }

        let step = h0 - f0 / dfdh;
        h0 = if dfdh > 0.0 && step > lo && step < hi {
            step
        } else {
            0.5 * (lo + hi)
        };
    }

    let (residual, _) = shock_rarefaction_function(h0, h_min, h_max, delu, g);
    let convergence = final_convergence(residual, tolerance, scale, config.newton_max_iterations);
    Ok((h0, convergence))
}

fn final_convergence(residual: f64, tolerance: f64, scale: f64, iterations: usize) -> Convergence {
    if residual.abs() <= tolerance {
        Convergence::Converged { iterations }
    } else {
        let residual = residual.abs() / scale;
        log::debug!(
            "Newton stopped after {} iterations with relative residual {:.3e}",
            iterations,
            residual
        );
        Convergence::MaxIterationsReached {
            iterations,
            residual,
        }
    }
}
