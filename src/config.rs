//! A module for validating and managing configurations for a pipe crack-growth analysis.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::detection::DetectionModel;
use crate::error::Error;
use crate::geometry::{LoadCondition, PipeGeometry};
use crate::inspection::{FailureMode, InspectionPlan};
use crate::life::CrackGrowthModel;
use crate::material::MaterialProperties;
use crate::quadrature::Quadrature;

/// Represents an error that can occur during validation of configuration data.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    /// Creates a new `ValidationError` with a given message.
    ///
    /// # Arguments
    ///
    /// * `message` - A description of the error.
    pub fn new(message: &str) -> ValidationError {
        ValidationError { message: message.to_owned() }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

impl From<Error> for ValidationError {
    fn from(err: Error) -> Self {
        ValidationError::new(&err.to_string())
    }
}

/// Represents the configuration for a crack-growth analysis.
#[derive(Debug, Deserialize)]
pub struct Config {
    pub solution: Solution,
    pub geometry: PipeGeometry,
    pub material: MaterialProperties,
    pub load: LoadSection,
    pub detection: DetectionSection,
    #[serde(default)]
    pub inspection: InspectionPlan,
    #[serde(default)]
    pub quadrature: Quadrature,
}

impl Config {
    /// Validates the entire configuration.
    ///
    /// This method checks the validity of each component of the configuration
    /// and ensures the sampled crack sizes start inside the wall.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.solution.validate()?;
        self.geometry.validate()?;
        self.material.validate()?;
        self.load.validate()?;
        self.detection.validate()?;
        self.inspection.validate()?;
        self.quadrature.validate()?;
        if self.inspection.start_crack_length >= self.geometry.wall_thickness {
            return Err(ValidationError::new(&format!(
                "start_crack_length {} must be smaller than wall_thickness {}",
                self.inspection.start_crack_length, self.geometry.wall_thickness
            )));
        }
        if let Some(length) = self.load.sweep_max_crack_length {
            if length <= self.inspection.start_crack_length {
                return Err(ValidationError::new(&format!(
                    "sweep_max_crack_length {} must exceed start_crack_length {}",
                    length, self.inspection.start_crack_length
                )));
            }
        }
        Ok(())
    }

    /// Builds the crack-growth model described by this configuration.
    pub fn model(&self) -> Result<CrackGrowthModel, Error> {
        CrackGrowthModel::new(self.geometry, self.material.clone(), LoadCondition::new(self.load.pressure)?)?
            .with_crack_angle(self.load.crack_angle.to_radians())?
            .with_quadrature(self.quadrature)
    }
}

/// Represents the solution configuration for an analysis session.
#[derive(Debug, Deserialize)]
pub struct Solution {
    /// The desired output format. Valid values are "JSON" and "CSV".
    pub output: String,
    /// Failure modes to assess. Defaults to both leak and fracture.
    #[serde(default = "default_failure_modes")]
    pub failure_modes: Vec<FailureMode>,
}

fn default_failure_modes() -> Vec<FailureMode> {
    vec![FailureMode::Leak, FailureMode::Fracture]
}

impl Solution {
    /// Validates the `Solution` configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipecrack::config::Solution;
    /// use pipecrack::inspection::FailureMode;
    ///
    /// let solution = Solution { output: String::from("JSON"), failure_modes: vec![FailureMode::Leak] };
    /// assert!(solution.validate().is_ok());
    ///
    /// let invalid = Solution { output: String::from("ANSYS"), failure_modes: vec![FailureMode::Leak] };
    /// assert!(invalid.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.output.as_str() {
            "JSON" | "CSV" => Ok(()),
            _ => Err(ValidationError::new(&format!("output must be JSON or CSV, got {}", self.output))),
        }?;
        if self.failure_modes.is_empty() {
            return Err(ValidationError::new("failure_modes must not be empty"));
        }
        Ok(())
    }
}

/// Represents the loading of the pipe.
#[derive(Debug, Deserialize)]
pub struct LoadSection {
    /// Internal pressure range of a load cycle, in Pa.
    pub pressure: f64,
    /// Angle of the crack plane from the hoop direction, in degrees.
    #[serde(default)]
    pub crack_angle: f64,
    /// Pressures for the toughness margin table. Empty skips the table.
    #[serde(default)]
    pub sweep: Vec<f64>,
    /// Largest crack length of the toughness margin table, in meters.
    /// Defaults to the critical crack length at the lowest swept pressure.
    #[serde(default)]
    pub sweep_max_crack_length: Option<f64>,
}

impl LoadSection {
    /// Validates the `LoadSection`, ensuring every pressure is a valid load.
    pub fn validate(&self) -> Result<(), ValidationError> {
        LoadCondition::new(self.pressure)?;
        if !self.crack_angle.is_finite() {
            return Err(ValidationError::new(&format!("crack_angle must be finite, got {}", self.crack_angle)));
        }
        for &pressure in &self.sweep {
            LoadCondition::new(pressure)?;
        }
        if let Some(length) = self.sweep_max_crack_length {
            if !length.is_finite() || length <= 0.0 {
                return Err(ValidationError::new(&format!("sweep_max_crack_length must be positive, got {}", length)));
            }
        } else if !self.sweep.is_empty() && self.sweep.iter().all(|&p| p == 0.0) {
            return Err(ValidationError::new("sweep needs a positive pressure or sweep_max_crack_length"));
        }
        Ok(())
    }

    /// Upper end of the toughness margin crack grid for `model`.
    pub fn sweep_crack_length(&self, model: &CrackGrowthModel) -> Result<f64, Error> {
        if let Some(length) = self.sweep_max_crack_length {
            return Ok(length);
        }
        let lowest = self
            .sweep
            .iter()
            .copied()
            .filter(|&p| p > 0.0)
            .min_by(f64::total_cmp)
            .ok_or_else(|| Error::invalid_input("sweep has no positive pressure"))?;
        model.at_pressure(lowest)?.critical_crack_length()
    }
}

/// Represents the inspection method.
#[derive(Debug, Deserialize)]
pub struct DetectionSection {
    /// Reference crack length of the detection curve, in meters.
    pub a0: f64,
    /// Detection probability that defines the minimum detectable crack.
    #[serde(default = "default_pod")]
    pub pod: f64,
}

fn default_pod() -> f64 {
    0.99
}

impl DetectionSection {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let model = self.model()?;
        model.minimum_detectable_size(self.pod)?;
        Ok(())
    }

    pub fn model(&self) -> Result<DetectionModel, Error> {
        DetectionModel::new(self.a0)
    }
}

/// Loads the configuration from a YAML file, or from TOML when the file ends in `.toml`.
///
/// # Arguments
///
/// * `config_path` - A path reference to the configuration file.
///
/// # Errors
///
/// This function will return an error if reading or parsing the configuration file fails.
pub fn load_config<P: AsRef<Path>>(config_path: P) -> Result<Config> {
    let path = config_path.as_ref();
    let content = fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let config = match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?,
        _ => serde_yaml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))?,
    };
    Ok(config)
}
