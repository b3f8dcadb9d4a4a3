//! Stress-intensity model for a crack growing through a pipe wall.

use std::f64::consts::PI;

use crate::error::{ensure_positive, Error, Result};

/// Geometry correction factor `Y(a/t)`.
///
/// Empirical polynomial for a surface crack while `a ≤ t`, and the through-wall
/// idealisation `Y = 1` once the crack has penetrated the wall.
pub fn geometry_factor(a: f64, t: f64) -> Result<f64> {
    ensure_positive("crack length", a)?;
    ensure_positive("wall thickness", t)?;
    let ratio = a / t;
    Ok(if a <= t { 0.728 + 0.373 * ratio.powi(2) - 0.029 * ratio.powi(4) } else { 1.0 })
}

/// Stress-intensity factor range `ΔK = Y(a/t)·σ·√(πa)`.
///
/// # Examples
///
/// ```
/// use pipecrack::sif::stress_intensity_range;
///
/// let dk = stress_intensity_range(0.02, 0.01, 100e6).unwrap();
/// assert!((dk - 100e6 * (std::f64::consts::PI * 0.02).sqrt()).abs() < 1e-3);
/// assert!(stress_intensity_range(0.0, 0.01, 100e6).is_err());
/// ```
pub fn stress_intensity_range(a: f64, t: f64, sigma: f64) -> Result<f64> {
    Ok(geometry_factor(a, t)? * sigma * (PI * a).sqrt())
}

/// Toughness-limited critical crack length `(K_IC / σ)² / π`.
pub fn critical_crack_length(k_ic: f64, sigma: f64) -> Result<f64> {
    if !(k_ic.is_finite() && k_ic > 0.0) {
        return Err(Error::invalid_material(format!("fracture toughness must be greater than 0.0, got {}", k_ic)));
    }
    ensure_positive("stress", sigma)?;
    Ok((k_ic / sigma).powi(2) / PI)
}

/// Safety factor against unstable fracture, `K_IC / ΔK`.
///
/// A crack without driving force is infinitely safe.
pub fn toughness_safety_factor(k_ic: f64, a: f64, t: f64, sigma: f64) -> Result<f64> {
    if !(k_ic.is_finite() && k_ic > 0.0) {
        return Err(Error::invalid_material(format!("fracture toughness must be greater than 0.0, got {}", k_ic)));
    }
    let dk = stress_intensity_range(a, t, sigma)?;
    if dk <= 0.0 {
        return Ok(f64::INFINITY);
    }
    Ok(k_ic / dk)
}
