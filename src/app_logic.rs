//! A module for the main application logic for the crack-growth assessment tool
use anyhow::{Context, Result};
use log::{info, warn};
use serde::Serialize;
use std::io::Write;

use crate::config::{load_config, Config};
use crate::inspection::{toughness_margin_curve, InspectionReport, ToughnessMargin};
use crate::life::linspace;

/// Key lives of the configured pipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LifeSummary {
    pub nominal_stress: f64,
    /// Crack size detected with the configured probability.
    pub minimum_detectable_size: f64,
    pub critical_crack_length: f64,
    /// Cycles from the minimum detectable size to a through-wall crack.
    pub cycles_to_leak: Option<f64>,
    /// Cycles from the minimum detectable size to the critical crack length.
    pub cycles_to_fracture: Option<f64>,
}

/// Everything one analysis run produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub material: String,
    pub summary: LifeSummary,
    pub inspections: Vec<InspectionReport>,
    pub toughness_margins: Vec<ToughnessMargin>,
}

pub fn run(config_path: &str) -> Result<()> {
    info!("Running with configuration: {}", config_path);
    let conf = load_config(config_path)?;
    conf.validate().with_context(|| format!("invalid configuration {}", config_path))?;
    let report = analyse(&conf)?;
    let stdout = std::io::stdout();
    write_report(&report, &conf.solution.output, stdout.lock())?;
    Ok(())
}

/// Runs every analysis requested by a validated configuration.
pub fn analyse(conf: &Config) -> Result<AnalysisReport> {
    let model = conf.model()?;
    let detection = conf.detection.model()?;

    let nominal_stress = model.nominal_stress()?;
    let minimum_detectable_size = detection.minimum_detectable_size(conf.detection.pod)?;
    let critical_crack_length = model.critical_crack_length()?;
    info!("Nominal stress: {:.4e} Pa", nominal_stress);
    info!("Minimum detectable crack: {:.4e} m", minimum_detectable_size);
    info!("Critical crack length: {:.4e} m", critical_crack_length);

    let life_to = |a_final: f64| -> Result<Option<f64>> {
        if minimum_detectable_size >= a_final {
            warn!("minimum detectable crack {:.4e} m is not smaller than {:.4e} m", minimum_detectable_size, a_final);
            return Ok(None);
        }
        Ok(Some(model.cycles_to_grow(minimum_detectable_size, a_final)?))
    };
    let cycles_to_leak = life_to(conf.geometry.wall_thickness)?;
    let cycles_to_fracture = life_to(critical_crack_length)?;
    if let Some(n) = cycles_to_fracture {
        info!("Cycles to fracture: {:.0}", n);
    }

    let inspections = conf
        .solution
        .failure_modes
        .iter()
        .map(|&mode| conf.inspection.evaluate(&model, &detection, mode))
        .collect::<Result<Vec<_>, _>>()?;

    let toughness_margins = if conf.load.sweep.is_empty() {
        Vec::new()
    } else {
        let max_crack_length = conf.load.sweep_crack_length(&model)?;
        let lengths = linspace(conf.inspection.start_crack_length, max_crack_length, conf.inspection.samples);
        toughness_margin_curve(&model, &conf.load.sweep, &lengths)?
    };

    Ok(AnalysisReport {
        material: conf.material.name.clone(),
        summary: LifeSummary {
            nominal_stress,
            minimum_detectable_size,
            critical_crack_length,
            cycles_to_leak,
            cycles_to_fracture,
        },
        inspections,
        toughness_margins,
    })
}

#[derive(Debug, Serialize)]
struct CurveRow {
    mode: String,
    crack_length: f64,
    cycles: f64,
    probability_of_failure: Option<f64>,
}

/// Writes the report as pretty JSON, or the inspection curves as CSV rows.
pub fn write_report<W: Write>(report: &AnalysisReport, output: &str, mut writer: W) -> Result<()> {
    match output {
        "CSV" => {
            let mut csv_writer = csv::Writer::from_writer(writer);
            for inspection in &report.inspections {
                for result in &inspection.curve {
                    csv_writer.serialize(CurveRow {
                        mode: format!("{:?}", inspection.mode),
                        crack_length: result.crack_length,
                        cycles: result.cycles,
                        probability_of_failure: result.probability_of_failure,
                    })?;
                }
            }
            csv_writer.flush()?;
        }
        _ => {
            serde_json::to_writer_pretty(&mut writer, report)?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
