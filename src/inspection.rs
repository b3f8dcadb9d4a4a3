//! Inspection intervals for the leak and fracture failure modes of a cracked pipe.

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::detection::{find_safe_cycle_count_with, DetectionModel, SafePointSearch};
use crate::error::{Error, Result};
use crate::life::{linspace, CrackGrowthModel, FatigueResult};

/// The crack length that ends the service life.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureMode {
    /// The crack breaks through the wall.
    Leak,
    /// The crack reaches the toughness-limited critical length.
    Fracture,
}

impl FailureMode {
    pub fn final_crack_length(&self, model: &CrackGrowthModel) -> Result<f64> {
        match self {
            FailureMode::Leak => Ok(model.geometry.wall_thickness),
            FailureMode::Fracture => model.critical_crack_length(),
        }
    }
}

/// Sampling and acceptance settings for an inspection-interval search.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InspectionPlan {
    /// Number of crack sizes sampled between the start length and the final length.
    pub samples: usize,
    /// Smallest crack size sampled, in meters.
    pub start_crack_length: f64,
    /// Acceptable probability that a crack is missed.
    pub target_probability: f64,
    pub search: SafePointSearch,
}

impl Default for InspectionPlan {
    fn default() -> Self {
        InspectionPlan { samples: 200, start_crack_length: 0.001, target_probability: 0.01, search: SafePointSearch::FirstSample }
    }
}

/// Remaining-life curve of one failure mode and the inspection interval it allows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectionReport {
    pub mode: FailureMode,
    pub final_crack_length: f64,
    pub curve: Vec<FatigueResult>,
    /// `None` when no sampled crack meets the target probability.
    pub safe_cycles: Option<f64>,
}

impl InspectionPlan {
    pub fn validate(&self) -> Result<()> {
        if self.samples < 2 {
            return Err(Error::invalid_input(format!("samples must be at least 2, got {}", self.samples)));
        }
        if !(self.start_crack_length.is_finite() && self.start_crack_length > 0.0) {
            return Err(Error::invalid_input(format!(
                "start_crack_length must be greater than 0.0, got {}",
                self.start_crack_length
            )));
        }
        if !(0.0..=1.0).contains(&self.target_probability) {
            return Err(Error::invalid_input(format!(
                "target_probability must be between 0.0 and 1.0, got {}",
                self.target_probability
            )));
        }
        Ok(())
    }

    /// Samples crack sizes up to the failure length of `mode`, pairs each
    /// remaining life with the chance the crack is missed, and finds the
    /// largest life at which missing the crack is acceptably unlikely.
    pub fn evaluate(&self, model: &CrackGrowthModel, detection: &DetectionModel, mode: FailureMode) -> Result<InspectionReport> {
        self.validate()?;
        detection.validate()?;
        let final_crack_length = mode.final_crack_length(model)?;
        if final_crack_length <= self.start_crack_length {
            return Err(Error::invalid_input(format!(
                "{:?} final crack length {} does not exceed the start crack length {}",
                mode, final_crack_length, self.start_crack_length
            )));
        }

        let lengths = linspace(self.start_crack_length, final_crack_length, self.samples);
        let mut curve = model.remaining_life_curve(&lengths, final_crack_length)?;
        for result in curve.iter_mut() {
            result.probability_of_failure = Some(detection.probability_of_failure(result.crack_length)?);
        }

        let cycles: Vec<f64> = curve.iter().map(|r| r.cycles).collect();
        let probabilities: Vec<f64> = curve.iter().filter_map(|r| r.probability_of_failure).collect();
        let safe_cycles = find_safe_cycle_count_with(&cycles, &probabilities, self.target_probability, self.search);
        match safe_cycles {
            Some(n) => info!("{:?}: safe inspection interval {:.0} cycles", mode, n),
            None => warn!("{:?}: no safe point found in interval", mode),
        }
        Ok(InspectionReport { mode, final_crack_length, curve, safe_cycles })
    }
}

/// Toughness safety factor against crack size for one pressure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToughnessMargin {
    pub pressure: f64,
    pub crack_lengths: Vec<f64>,
    pub safety_factors: Vec<f64>,
}

/// `K_IC / ΔK` over `crack_lengths` for each pressure, evaluated in parallel.
pub fn toughness_margin_curve(model: &CrackGrowthModel, pressures: &[f64], crack_lengths: &[f64]) -> Result<Vec<ToughnessMargin>> {
    pressures
        .par_iter()
        .map(|&pressure| {
            let loaded = model.at_pressure(pressure)?;
            let safety_factors = crack_lengths
                .iter()
                .map(|&a| loaded.toughness_safety_factor(a))
                .collect::<Result<Vec<_>>>()?;
            Ok(ToughnessMargin { pressure, crack_lengths: crack_lengths.to_vec(), safety_factors })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LoadCondition, PipeGeometry};
    use crate::material::{MaterialProperties, ParisLaw};
    use approx::assert_relative_eq;

    fn model() -> CrackGrowthModel {
        let material = MaterialProperties {
            name: "steel".into(),
            fracture_toughness: 90e6,
            yield_stress: 400e6,
            poissons_ratio: 0.3,
            paris: ParisLaw { c: 1e-36, m: 4.0 },
        };
        CrackGrowthModel::new(PipeGeometry::new(0.2, 0.01).unwrap(), material, LoadCondition::new(40e6).unwrap()).unwrap()
    }

    #[test]
    fn test_leak_interval() {
        let detection = DetectionModel::new(0.00422).unwrap();
        let report = InspectionPlan::default().evaluate(&model(), &detection, FailureMode::Leak).unwrap();
        assert_eq!(report.curve.len(), 200);
        assert_eq!(report.final_crack_length, 0.01);
        // First sample past the 99 % detection size, a ≈ 6.20 mm.
        assert_relative_eq!(report.safe_cycles.unwrap(), 9_444.842, max_relative = 1e-4);
    }

    #[test]
    fn test_fracture_interval() {
        let detection = DetectionModel::new(0.00422).unwrap();
        let report = InspectionPlan::default().evaluate(&model(), &detection, FailureMode::Fracture).unwrap();
        assert_relative_eq!(report.final_crack_length, 0.088_665_022_3, max_relative = 1e-8);
        assert_relative_eq!(report.safe_cycles.unwrap(), 19_615.62, max_relative = 1e-4);
        assert_eq!(report.curve.last().unwrap().cycles, 0.0);
    }

    #[test]
    fn test_interpolated_interval_is_longer() {
        let detection = DetectionModel::new(0.00422).unwrap();
        let first = InspectionPlan::default().evaluate(&model(), &detection, FailureMode::Leak).unwrap();
        let plan = InspectionPlan { search: SafePointSearch::Interpolated, ..Default::default() };
        let interpolated = plan.evaluate(&model(), &detection, FailureMode::Leak).unwrap();
        // Remaining life falls with crack size, so the crossing lies before the first qualifying sample.
        assert!(interpolated.safe_cycles.unwrap() > first.safe_cycles.unwrap());
    }

    #[test]
    fn test_no_safe_point_is_reported() {
        // Poor inspection: even a through-wall crack is likely to be missed.
        let detection = DetectionModel::new(0.05).unwrap();
        let report = InspectionPlan::default().evaluate(&model(), &detection, FailureMode::Leak).unwrap();
        assert_eq!(report.safe_cycles, None);
    }

    #[test]
    fn test_invalid_plan() {
        let detection = DetectionModel::new(0.00422).unwrap();
        let plan = InspectionPlan { samples: 1, ..Default::default() };
        assert!(plan.evaluate(&model(), &detection, FailureMode::Leak).is_err());
        let plan = InspectionPlan { start_crack_length: 0.02, ..Default::default() };
        assert!(matches!(plan.evaluate(&model(), &detection, FailureMode::Leak), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_toughness_margin_curve() {
        let lengths = linspace(0.001, 0.1, 50);
        let margins = toughness_margin_curve(&model(), &[40e6, 80e6], &lengths).unwrap();
        assert_eq!(margins.len(), 2);
        for (low, high) in margins[0].safety_factors.iter().zip(&margins[1].safety_factors) {
            assert_relative_eq!(low / high, 2.0, max_relative = 1e-9);
        }
    }
}
