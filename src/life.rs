//! Fatigue life of a growing crack: Paris' law integrated over crack length.

use log::{debug, warn};
use rayon::prelude::*;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::geometry::{LoadCondition, PipeGeometry};
use crate::material::{MaterialProperties, ParisLaw};
use crate::quadrature::Quadrature;
use crate::sif;

/// Remaining life of one crack size, optionally paired with the chance it is missed at inspection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FatigueResult {
    pub crack_length: f64,
    pub cycles: f64,
    pub probability_of_failure: Option<f64>,
}

/// Cycles to grow a crack from `a_initial` to `a_final`, `∫ da / (C·ΔK(a)^m)`.
///
/// `stress_intensity_fn` maps a crack length to its stress-intensity range.
/// The quadrature error estimate assumes a smooth integrand; when `ΔK` jumps
/// inside the interval, as the pipe geometry factor does at the wall
/// thickness, pass the jump to [`cycles_to_grow_with`] as a breakpoint.
///
/// # Errors
///
/// * `InvalidMaterialConstant` for non-positive `c` or `m`.
/// * `InvalidInput` for negative, non-finite or reversed bounds.
/// * `NonIntegrableSingularity` when the crack starts at zero length or has
///   no growth somewhere on the interval.
/// * `IntegrationDidNotConverge` when the quadrature runs out of budget.
///
/// # Examples
///
/// ```
/// use pipecrack::life::cycles_to_grow;
///
/// // Constant ΔK gives N = (a_f − a_i) / (C·ΔK^m).
/// let n = cycles_to_grow(0.001, 0.003, |_| Ok(10.0), 1e-10, 3.0).unwrap();
/// assert!((n - 20_000.0).abs() < 1e-6);
/// ```
pub fn cycles_to_grow<F>(a_initial: f64, a_final: f64, stress_intensity_fn: F, c: f64, m: f64) -> Result<f64>
where
    F: Fn(f64) -> Result<f64>,
{
    cycles_to_grow_with(&Quadrature::default(), a_initial, a_final, &[], stress_intensity_fn, c, m)
}

/// Same as [`cycles_to_grow`] with caller-chosen integration tolerances.
///
/// The interval is integrated piecewise between the `breakpoints` that fall
/// strictly inside it; the others are ignored.
pub fn cycles_to_grow_with<F>(
    quadrature: &Quadrature,
    a_initial: f64,
    a_final: f64,
    breakpoints: &[f64],
    stress_intensity_fn: F,
    c: f64,
    m: f64,
) -> Result<f64>
where
    F: Fn(f64) -> Result<f64>,
{
    let law = ParisLaw::new(c, m)?;
    if !a_initial.is_finite() || !a_final.is_finite() || a_initial < 0.0 || a_final <= 0.0 {
        return Err(Error::invalid_input(format!(
            "crack lengths must be finite and positive, got {} to {}",
            a_initial, a_final
        )));
    }
    if a_initial > a_final {
        return Err(Error::invalid_input(format!(
            "initial crack length {} exceeds final crack length {}",
            a_initial, a_final
        )));
    }
    if a_initial == a_final {
        return Ok(0.0);
    }
    if a_initial == 0.0 {
        return Err(Error::NonIntegrableSingularity { at: 0.0 });
    }
    if stress_intensity_fn(a_initial)? <= 0.0 {
        return Err(Error::NonIntegrableSingularity { at: a_initial });
    }

    let inverse_rate = |a: f64| -> Result<f64> {
        let rate = law.rate(stress_intensity_fn(a)?)?;
        if rate <= 0.0 {
            return Err(Error::NonIntegrableSingularity { at: a });
        }
        Ok(1.0 / rate)
    };
    let mut cuts: Vec<f64> = breakpoints.iter().copied().filter(|&b| b > a_initial && b < a_final).collect();
    cuts.sort_by(f64::total_cmp);
    cuts.dedup();

    let (mut lower, mut cycles, mut evaluations) = (a_initial, 0.0, 0);
    for upper in cuts.into_iter().chain(std::iter::once(a_final)) {
        let estimate = quadrature.integrate(&inverse_rate, lower, upper)?;
        cycles += estimate.value;
        evaluations += estimate.evaluations;
        lower = upper;
    }
    debug!(
        "grew crack {:e} -> {:e} m in {:.1} cycles ({} evaluations)",
        a_initial, a_final, cycles, evaluations
    );
    Ok(cycles)
}

/// Evenly spaced samples from `start` to `stop` inclusive.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            (0..n).map(|i| if i == n - 1 { stop } else { start + step * i as f64 }).collect()
        }
    }
}

/// A cracked pipe under constant-amplitude pressure cycling.
///
/// The pressure cycles between zero and `load.pressure`, so the nominal
/// stress is also the stress range. The crack plane is circumferential by
/// default and is then opened by the axial stress alone.
#[derive(Debug, Clone, PartialEq)]
pub struct CrackGrowthModel {
    pub geometry: PipeGeometry,
    pub material: MaterialProperties,
    pub load: LoadCondition,
    /// Angle of the crack plane from the hoop direction, in radians.
    pub crack_angle: f64,
    pub quadrature: Quadrature,
}

impl CrackGrowthModel {
    pub fn new(geometry: PipeGeometry, material: MaterialProperties, load: LoadCondition) -> Result<Self> {
        geometry.validate()?;
        material.validate()?;
        load.validate()?;
        Ok(CrackGrowthModel { geometry, material, load, crack_angle: 0.0, quadrature: Quadrature::default() })
    }

    pub fn with_crack_angle(mut self, crack_angle: f64) -> Result<Self> {
        if !crack_angle.is_finite() {
            return Err(Error::invalid_input(format!("crack angle must be finite, got {}", crack_angle)));
        }
        self.crack_angle = crack_angle;
        Ok(self)
    }

    pub fn with_quadrature(mut self, quadrature: Quadrature) -> Result<Self> {
        quadrature.validate()?;
        self.quadrature = quadrature;
        Ok(self)
    }

    /// Same model at a different pressure.
    pub fn at_pressure(&self, pressure: f64) -> Result<Self> {
        Ok(CrackGrowthModel { load: LoadCondition::new(pressure)?, ..self.clone() })
    }

    /// Stress opening the crack faces at the bore.
    pub fn nominal_stress(&self) -> Result<f64> {
        if self.crack_angle == 0.0 {
            return Ok(self.load.axial_stress(&self.geometry));
        }
        let wall = self.load.wall_stress(&self.geometry, self.geometry.inner_radius())?;
        Ok(wall.crack_opening_stress(self.crack_angle))
    }

    pub fn stress_intensity_range(&self, a: f64) -> Result<f64> {
        sif::stress_intensity_range(a, self.geometry.wall_thickness, self.nominal_stress()?)
    }

    pub fn growth_rate(&self, a: f64) -> Result<f64> {
        self.material.paris.rate(self.stress_intensity_range(a)?)
    }

    /// Crack length at which `ΔK` reaches the fracture toughness.
    pub fn critical_crack_length(&self) -> Result<f64> {
        sif::critical_crack_length(self.material.fracture_toughness, self.nominal_stress()?)
    }

    pub fn toughness_safety_factor(&self, a: f64) -> Result<f64> {
        sif::toughness_safety_factor(
            self.material.fracture_toughness,
            a,
            self.geometry.wall_thickness,
            self.nominal_stress()?,
        )
    }

    /// Cycles to grow from `a_initial` to `a_final`.
    ///
    /// The geometry factor jumps where the crack breaks through the wall, so
    /// an interval spanning the wall thickness is integrated in two pieces.
    pub fn cycles_to_grow(&self, a_initial: f64, a_final: f64) -> Result<f64> {
        let (paris, sigma, t) = (self.material.paris, self.nominal_stress()?, self.geometry.wall_thickness);
        cycles_to_grow_with(
            &self.quadrature,
            a_initial,
            a_final,
            &[t],
            |a| sif::stress_intensity_range(a, t, sigma),
            paris.c,
            paris.m,
        )
    }

    /// Remaining life to `a_final` for each crack length, evaluated in parallel.
    ///
    /// Crack lengths at or beyond `a_final` have no life left.
    pub fn remaining_life_curve(&self, crack_lengths: &[f64], a_final: f64) -> Result<Vec<FatigueResult>> {
        let curve = crack_lengths
            .par_iter()
            .map(|&a| {
                let cycles = if a >= a_final { 0.0 } else { self.cycles_to_grow(a, a_final)? };
                Ok(FatigueResult { crack_length: a, cycles, probability_of_failure: None })
            })
            .collect::<Result<Vec<_>>>()?;
        if let Some(overshoot) = crack_lengths.iter().find(|&&a| a > a_final) {
            warn!("crack length {:e} m lies beyond the final crack length {:e} m", overshoot, a_final);
        }
        Ok(curve)
    }
}
