//! A module for material properties for a crack-growth fatigue analysis.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Represents material properties used in the fracture mechanics analysis.
///
/// Includes the material's fracture toughness, yield stress and Poisson's ratio,
/// along with a `ParisLaw` struct representing the material's crack-growth characteristics.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MaterialProperties {
    /// Name of the material.
    pub name: String,
    /// Plane-strain fracture toughness K_IC in Pa·√m.
    pub fracture_toughness: f64,
    /// Yield stress of the material in Pa.
    pub yield_stress: f64,
    /// Poisson's ratio of the material.
    pub poissons_ratio: f64,
    /// Crack-growth characteristics of the material.
    pub paris: ParisLaw,
}

impl MaterialProperties {
    /// Validates the `MaterialProperties` struct to ensure all mechanical properties are defined
    /// correctly and the `ParisLaw` constants are valid.
    ///
    /// # Returns
    ///
    /// Returns `Ok(())` if all properties are valid and within their expected ranges.
    /// Otherwise, it returns `Error::InvalidMaterialConstant` detailing the issue.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_material("name must not be empty"));
        }
        if !(self.fracture_toughness.is_finite() && self.fracture_toughness > 0.0) {
            return Err(Error::invalid_material(format!(
                "fracture_toughness must be greater than 0.0, got {}",
                self.fracture_toughness
            )));
        }
        if !self.yield_stress.is_finite() || self.yield_stress < 0.0 {
            return Err(Error::invalid_material(format!("yield_stress must not be negative, got {}", self.yield_stress)));
        }
        if !(0.0..0.5).contains(&self.poissons_ratio) {
            return Err(Error::invalid_material(format!(
                "poissons_ratio must be in [0.0, 0.5), got {}",
                self.poissons_ratio
            )));
        }
        self.paris.validate()?;
        Ok(())
    }
}

/// Represents the Paris' law constants `da/dN = C·ΔK^m`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ParisLaw {
    /// The coefficient C in m/cycle per (Pa·√m)^m.
    pub c: f64,
    /// The exponent m, typically between 2 and 6.
    pub m: f64,
}

impl ParisLaw {
    /// Creates validated Paris' law constants.
    pub fn new(c: f64, m: f64) -> Result<Self> {
        let law = ParisLaw { c, m };
        law.validate()?;
        Ok(law)
    }

    /// Validates the `ParisLaw` struct's fields.
    ///
    /// Ensures that both `c` and `m` are finite and greater than 0.
    pub fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(Error::invalid_material(format!("c must be greater than 0.0, got {}", self.c)));
        }
        if !(self.m.is_finite() && self.m > 0.0) {
            return Err(Error::invalid_material(format!("m must be greater than 0.0, got {}", self.m)));
        }
        Ok(())
    }

    /// Crack-growth rate for a stress-intensity range.
    pub fn rate(&self, delta_k: f64) -> Result<f64> {
        crate::paris::growth_rate(delta_k, self.c, self.m)
    }
}
