//! Pipe geometry, internal pressure loading and the thick-wall (Lamé) stress field.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, Error, Result};
use crate::stress::PlaneStress;

/// Cross-section of a thick-walled pipe.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PipeGeometry {
    /// Outer diameter in meters.
    pub outer_diameter: f64,
    /// Wall thickness in meters.
    pub wall_thickness: f64,
}

impl PipeGeometry {
    /// Creates a validated geometry.
    ///
    /// # Examples
    ///
    /// ```
    /// use pipecrack::geometry::PipeGeometry;
    ///
    /// let pipe = PipeGeometry::new(0.2, 0.01).unwrap();
    /// assert!((pipe.inner_radius() - 0.09).abs() < 1e-12);
    /// assert!(PipeGeometry::new(0.2, 0.1).is_err());
    /// ```
    pub fn new(outer_diameter: f64, wall_thickness: f64) -> Result<Self> {
        let geometry = PipeGeometry { outer_diameter, wall_thickness };
        geometry.validate()?;
        Ok(geometry)
    }

    /// Checks that `outer radius > inner radius > 0`.
    pub fn validate(&self) -> Result<()> {
        ensure_positive("outer_diameter", self.outer_diameter)?;
        ensure_positive("wall_thickness", self.wall_thickness)?;
        if self.inner_radius() <= 0.0 {
            return Err(Error::invalid_input(format!(
                "wall_thickness {} leaves no bore in a pipe of outer diameter {}",
                self.wall_thickness, self.outer_diameter
            )));
        }
        Ok(())
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_diameter / 2.0
    }

    pub fn inner_radius(&self) -> f64 {
        self.outer_radius() - self.wall_thickness
    }
}

/// Internal pressure acting on the bore.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LoadCondition {
    /// Internal pressure in Pa.
    pub pressure: f64,
}

impl LoadCondition {
    pub fn new(pressure: f64) -> Result<Self> {
        let load = LoadCondition { pressure };
        load.validate()?;
        Ok(load)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.pressure.is_finite() || self.pressure < 0.0 {
            return Err(Error::invalid_input(format!("pressure must not be negative, got {}", self.pressure)));
        }
        Ok(())
    }

    /// Axial wall stress of a closed-end pipe, `p·ri² / (ro² − ri²)`.
    ///
    /// This is the nominal stress that drives the crack.
    pub fn axial_stress(&self, geometry: &PipeGeometry) -> f64 {
        let ri2 = geometry.inner_radius().powi(2);
        let ro2 = geometry.outer_radius().powi(2);
        self.pressure * ri2 / (ro2 - ri2)
    }

    /// Radial stress at radius `r`; equals `-p` at the bore and zero at the outer surface.
    pub fn radial_stress(&self, geometry: &PipeGeometry, r: f64) -> Result<f64> {
        let ratio = Self::outer_ratio(geometry, r)?;
        Ok(self.axial_stress(geometry) * (1.0 - ratio))
    }

    /// Hoop stress at radius `r`, largest at the bore.
    pub fn hoop_stress(&self, geometry: &PipeGeometry, r: f64) -> Result<f64> {
        let ratio = Self::outer_ratio(geometry, r)?;
        Ok(self.axial_stress(geometry) * (1.0 + ratio))
    }

    /// In-plane wall stress at radius `r`, with x along the hoop direction and y along the pipe axis.
    pub fn wall_stress(&self, geometry: &PipeGeometry, r: f64) -> Result<PlaneStress> {
        Ok(PlaneStress::new(self.hoop_stress(geometry, r)?, self.axial_stress(geometry), 0.0))
    }

    /// `ro² / r²`, rejecting radii outside the wall.
    fn outer_ratio(geometry: &PipeGeometry, r: f64) -> Result<f64> {
        let (ri, ro) = (geometry.inner_radius(), geometry.outer_radius());
        if !(ri..=ro).contains(&r) {
            return Err(Error::invalid_input(format!("radius {} lies outside the wall [{}, {}]", r, ri, ro)));
        }
        Ok(ro.powi(2) / r.powi(2))
    }
}
