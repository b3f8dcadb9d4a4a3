//! Probability of detecting a crack at inspection, and the search for a safe inspection interval.

use serde::{Deserialize, Serialize};

use crate::error::{ensure_positive, Error, Result};

/// Weibull-type probability-of-detection curve with scale `a0`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct DetectionModel {
    /// Reference crack length in meters.
    pub a0: f64,
}

impl DetectionModel {
    pub fn new(a0: f64) -> Result<Self> {
        ensure_positive("a0", a0)?;
        Ok(DetectionModel { a0 })
    }

    pub fn validate(&self) -> Result<()> {
        ensure_positive("a0", self.a0).map(|_| ())
    }

    pub fn probability_of_detection(&self, a: f64) -> Result<f64> {
        probability_of_detection(a, self.a0)
    }

    pub fn probability_of_failure(&self, a: f64) -> Result<f64> {
        probability_of_failure(a, self.a0)
    }

    /// Smallest crack found with probability `pod`, `a0·(−ln(1 − pod))^¼`.
    pub fn minimum_detectable_size(&self, pod: f64) -> Result<f64> {
        if !(0.0..1.0).contains(&pod) {
            return Err(Error::invalid_input(format!("probability of detection must be in [0, 1), got {}", pod)));
        }
        Ok((-(1.0 - pod).ln()).powf(0.25) * self.a0)
    }
}

/// `P_d(a) = 1 − exp(−(a/a0)⁴)`.
pub fn probability_of_detection(a: f64, a0: f64) -> Result<f64> {
    Ok(1.0 - probability_of_failure(a, a0)?)
}

/// Probability that a crack of length `a` is missed, `exp(−(a/a0)⁴)`.
///
/// # Examples
///
/// ```
/// use pipecrack::detection::probability_of_failure;
///
/// assert_eq!(probability_of_failure(0.0, 0.004).unwrap(), 1.0);
/// assert!(probability_of_failure(0.02, 0.004).unwrap() < 1e-100);
/// ```
pub fn probability_of_failure(a: f64, a0: f64) -> Result<f64> {
    ensure_positive("a0", a0)?;
    if a.is_nan() || a < 0.0 {
        return Err(Error::invalid_input(format!("crack length must not be negative, got {}", a)));
    }
    Ok((-(a / a0).powi(4)).exp())
}

/// How the safe-point search reports its answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafePointSearch {
    /// Cycle count of the first qualifying sample.
    #[default]
    FirstSample,
    /// Linear interpolation between the last sample above the target and the first at or below it.
    Interpolated,
}

/// Cycle count of the first sample whose probability of failure is at or below `target_prob`.
///
/// Samples are scanned in the order supplied and paired up to the shorter of
/// the two series. The scan is linear: the probability is only sampled, not
/// known to be monotonic between samples, so the result is the first
/// qualifying sample rather than a root.
///
/// # Examples
///
/// ```
/// use pipecrack::detection::find_safe_cycle_count;
///
/// let cycles = [900.0, 600.0, 300.0, 0.0];
/// let probs = [0.5, 0.05, 0.008, 0.0001];
/// assert_eq!(find_safe_cycle_count(&cycles, &probs, 0.01), Some(300.0));
/// assert_eq!(find_safe_cycle_count(&cycles, &probs, 1e-6), None);
/// ```
pub fn find_safe_cycle_count(cycle_series: &[f64], prob_series: &[f64], target_prob: f64) -> Option<f64> {
    find_safe_cycle_count_with(cycle_series, prob_series, target_prob, SafePointSearch::FirstSample)
}

pub fn find_safe_cycle_count_with(
    cycle_series: &[f64],
    prob_series: &[f64],
    target_prob: f64,
    search: SafePointSearch,
) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = cycle_series.iter().copied().zip(prob_series.iter().copied()).collect();
    let index = pairs.iter().position(|&(_, prob)| prob <= target_prob)?;
    let (cycles, prob) = pairs[index];
    match search {
        SafePointSearch::FirstSample => Some(cycles),
        SafePointSearch::Interpolated if index == 0 => Some(cycles),
        SafePointSearch::Interpolated => {
            let (prev_cycles, prev_prob) = pairs[index - 1];
            if prev_prob == prob {
                return Some(cycles);
            }
            let fraction = (prev_prob - target_prob) / (prev_prob - prob);
            Some(prev_cycles + fraction * (cycles - prev_cycles))
        }
    }
}

/// Like [`find_safe_cycle_count`], reporting a miss as `NoSafePointFound`.
pub fn require_safe_cycle_count(cycle_series: &[f64], prob_series: &[f64], target_prob: f64) -> Result<f64> {
    find_safe_cycle_count(cycle_series, prob_series, target_prob)
        .ok_or(Error::NoSafePointFound { target: target_prob })
}
