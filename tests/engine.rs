use approx::assert_relative_eq;
use pipecrack::detection::{find_safe_cycle_count, probability_of_failure, DetectionModel};
use pipecrack::geometry::{LoadCondition, PipeGeometry};
use pipecrack::life::{cycles_to_grow, linspace, CrackGrowthModel};
use pipecrack::material::{MaterialProperties, ParisLaw};
use pipecrack::paris::growth_rate;
use pipecrack::sif::{critical_crack_length, stress_intensity_range};
use pipecrack::Error;

const T: f64 = 0.01;
const C: f64 = 1e-36;
const M: f64 = 4.0;

fn sigma() -> f64 {
    let pipe = PipeGeometry::new(0.2, T).unwrap();
    LoadCondition::new(40e6).unwrap().axial_stress(&pipe)
}

#[test]
fn test_reference_scenario_through_free_functions() {
    let sigma = sigma();
    let dk = |a: f64| stress_intensity_range(a, T, sigma);
    let to_wall = cycles_to_grow(0.00618, 0.01, dk, C, M).unwrap();
    let beyond_wall = cycles_to_grow(0.01, 0.0887, dk, C, M).unwrap();
    assert!(to_wall.is_finite() && to_wall > 0.0);
    assert!(beyond_wall.is_finite() && beyond_wall > to_wall);
    assert_relative_eq!(to_wall, 9_561.245_687, max_relative = 1e-5);
    assert_relative_eq!(beyond_wall, 10_631.246_094, max_relative = 1e-5);
    // The upper bound stays inside the toughness-limited crack length.
    assert!(0.0887 < critical_crack_length(90e6, sigma).unwrap() + 1e-4);
}

#[test]
fn test_zero_initial_crack_is_rejected() {
    let sigma = sigma();
    let result = cycles_to_grow(0.0, 0.01, |a| stress_intensity_range(a, T, sigma), C, M);
    assert_eq!(result, Err(Error::NonIntegrableSingularity { at: 0.0 }));
}

#[test]
fn test_degenerate_interval_is_zero() {
    let sigma = sigma();
    for &a in &[1e-4, 0.005, 0.01, 0.05] {
        assert_eq!(cycles_to_grow(a, a, |a| stress_intensity_range(a, T, sigma), C, M).unwrap(), 0.0);
    }
}

#[test]
fn test_additivity_inside_wall() {
    let sigma = sigma();
    let dk = |a: f64| stress_intensity_range(a, T, sigma);
    let whole = cycles_to_grow(0.001, 0.009, dk, C, M).unwrap();
    let split = cycles_to_grow(0.001, 0.004, dk, C, M).unwrap() + cycles_to_grow(0.004, 0.009, dk, C, M).unwrap();
    assert_relative_eq!(whole, split, max_relative = 1e-5);
}

#[test]
fn test_growth_rate_follows_crack_size() {
    let sigma = sigma();
    let rates: Vec<f64> = linspace(0.001, T, 20)
        .into_iter()
        .map(|a| growth_rate(stress_intensity_range(a, T, sigma).unwrap(), C, M).unwrap())
        .collect();
    assert!(rates.windows(2).all(|w| w[1] > w[0]));
}

#[test]
fn test_leak_inspection_pipeline() {
    let material = MaterialProperties {
        name: "pipe steel".into(),
        fracture_toughness: 90e6,
        yield_stress: 400e6,
        poissons_ratio: 0.3,
        paris: ParisLaw { c: C, m: M },
    };
    let model =
        CrackGrowthModel::new(PipeGeometry::new(0.2, T).unwrap(), material, LoadCondition::new(40e6).unwrap()).unwrap();
    let detection = DetectionModel::new(0.00422).unwrap();

    let lengths = linspace(0.001, T, 200);
    let curve = model.remaining_life_curve(&lengths, T).unwrap();
    let cycles: Vec<f64> = curve.iter().map(|r| r.cycles).collect();
    let probs: Vec<f64> = lengths.iter().map(|&a| probability_of_failure(a, detection.a0).unwrap()).collect();

    let safe = find_safe_cycle_count(&cycles, &probs, 0.01).unwrap();
    assert_relative_eq!(safe, 9_444.842, max_relative = 1e-4);
    assert_eq!(find_safe_cycle_count(&cycles, &probs, 1e-300), None);
}
