//! Paris' law crack-growth rate.

use crate::error::Result;
use crate::material::ParisLaw;

/// Crack-growth rate `da/dN = C·ΔK^m` in length per cycle.
///
/// Negative or undefined ranges are closing cycles and do not grow the crack,
/// so they give a zero rate. Non-positive constants fail with
/// `InvalidMaterialConstant`.
///
/// # Examples
///
/// ```
/// use pipecrack::paris::growth_rate;
///
/// let rate = growth_rate(10.0, 1e-11, 3.0).unwrap();
/// assert!((rate - 1e-8).abs() < 1e-20);
/// assert_eq!(growth_rate(-5.0, 1e-11, 3.0).unwrap(), 0.0);
/// ```
pub fn growth_rate(delta_k: f64, c: f64, m: f64) -> Result<f64> {
    ParisLaw { c, m }.validate()?;
    if delta_k.is_nan() || delta_k <= 0.0 {
        return Ok(0.0);
    }
    Ok(c * delta_k.powf(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use approx::assert_relative_eq;

    #[test]
    fn test_growth_rate() {
        assert_relative_eq!(growth_rate(3.24e7, 1e-36, 4.0).unwrap(), 1e-36 * 3.24e7f64.powi(4), max_relative = 1e-12);
    }

    #[test]
    fn test_growth_rate_non_negative() {
        for &m in &[0.5, 2.0, 3.3, 4.0, 6.0] {
            for &dk in &[0.0, 1e-3, 1.0, 25.0, 3e7] {
                assert!(growth_rate(dk, 1e-12, m).unwrap() >= 0.0);
            }
        }
    }

    #[test]
    fn test_closing_cycles_clamped() {
        assert_eq!(growth_rate(-1e6, 1e-12, 3.0).unwrap(), 0.0);
        assert_eq!(growth_rate(f64::NAN, 1e-12, 3.0).unwrap(), 0.0);
    }

    #[test]
    fn test_invalid_constants() {
        assert!(matches!(growth_rate(10.0, 0.0, 3.0), Err(Error::InvalidMaterialConstant(_))));
        assert!(matches!(growth_rate(10.0, 1e-12, -2.0), Err(Error::InvalidMaterialConstant(_))));
    }
}
