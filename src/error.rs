//! Error types for the crack-growth engine.

use thiserror::Error;

/// Result type alias using the engine `Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while evaluating crack growth.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Non-positive crack length, thickness, radius or other physically invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Non-positive Paris' law constant, exponent or fracture toughness.
    #[error("invalid material constant: {0}")]
    InvalidMaterialConstant(String),

    /// The inverse growth rate is infinite or undefined inside the integration interval.
    #[error("non-integrable singularity at crack length {at}")]
    NonIntegrableSingularity { at: f64 },

    /// The adaptive quadrature ran out of refinement budget.
    #[error("integration did not converge: estimate {estimate}, error {error}")]
    IntegrationDidNotConverge { estimate: f64, error: f64 },

    /// No sample met the target probability of failure.
    #[error("no safe point found for target probability {target}")]
    NoSafePointFound { target: f64 },
}

impl Error {
    pub(crate) fn invalid_input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    pub(crate) fn invalid_material(message: impl Into<String>) -> Self {
        Error::InvalidMaterialConstant(message.into())
    }
}

/// Rejects anything that is not a finite, strictly positive number.
pub(crate) fn ensure_positive(name: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(Error::invalid_input(format!("{} must be greater than 0.0, got {}", name, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_positive() {
        assert_eq!(ensure_positive("a", 0.5), Ok(0.5));
        assert!(matches!(ensure_positive("a", 0.0), Err(Error::InvalidInput(_))));
        assert!(matches!(ensure_positive("a", -1.0), Err(Error::InvalidInput(_))));
        assert!(matches!(ensure_positive("a", f64::NAN), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_display_carries_estimate() {
        let err = Error::IntegrationDidNotConverge { estimate: 12.5, error: 0.25 };
        assert_eq!(err.to_string(), "integration did not converge: estimate 12.5, error 0.25");
    }
}
