// src/lib.rs

#[cfg(feature = "wasm")]
use wasm_bindgen::prelude::*;

pub mod app_logic;
pub mod config;
pub mod detection;
pub mod error;
pub mod geometry;
pub mod inspection;
pub mod life;
pub mod material;
pub mod paris;
pub mod quadrature;
pub mod sif;
pub mod stress;

pub use error::{Error, Result};

// When the "wasm" feature is enabled, use wasm_bindgen to expose the life integrator to the host environment.
#[cfg(feature = "wasm")]
#[wasm_bindgen]
#[allow(clippy::too_many_arguments)]
pub fn cycles_to_failure(
    outer_diameter: f64,
    wall_thickness: f64,
    pressure: f64,
    fracture_toughness: f64,
    c: f64,
    m: f64,
    a_initial: f64,
    a_final: f64,
) -> std::result::Result<f64, JsValue> {
    let run = || -> Result<f64> {
        let geometry = geometry::PipeGeometry::new(outer_diameter, wall_thickness)?;
        let material = material::MaterialProperties {
            name: "wasm".into(),
            fracture_toughness,
            yield_stress: 0.0,
            poissons_ratio: 0.0,
            paris: material::ParisLaw::new(c, m)?,
        };
        let model = life::CrackGrowthModel::new(geometry, material, geometry::LoadCondition::new(pressure)?)?;
        model.cycles_to_grow(a_initial, a_final)
    };
    run().map_err(|e| JsValue::from_str(&e.to_string()))
}
