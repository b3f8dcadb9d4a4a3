extern crate nalgebra as na;
use na::{Matrix2, Vector3};
use serde::Serialize;

use crate::error::{Error, Result};

/// In-plane stress state at a crack site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneStress {
    matrix: Matrix2<f64>,
    vector: Vector3<f64>,
}

/// Principal stresses, largest first, with the angle of the first principal axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrincipalStresses {
    pub sigma_1: f64,
    pub sigma_2: f64,
    /// Angle from the x axis to the `sigma_1` direction, in radians.
    pub angle: f64,
}

impl PlaneStress {
    pub fn new(sigma_xx: f64, sigma_yy: f64, tau_xy: f64) -> Self {
        Self::from_vector(Vector3::new(sigma_xx, sigma_yy, tau_xy))
    }

    /// Builds the tensor from a symmetric matrix; the off-diagonal terms must agree.
    pub fn from_matrix(matrix: Matrix2<f64>) -> Result<Self> {
        let (upper, lower) = (matrix[(0, 1)], matrix[(1, 0)]);
        if (upper - lower).abs() > 1e-9 * upper.abs().max(lower.abs()).max(1.0) {
            return Err(Error::invalid_input(format!("stress matrix is not symmetric: {} vs {}", upper, lower)));
        }
        Ok(Self::from_vector(Self::matrix_to_vector(&matrix)))
    }

    fn from_vector(vector: Vector3<f64>) -> Self {
        PlaneStress { matrix: Self::vector_to_matrix(&vector), vector }
    }

    // Voigt order: σxx, σyy, τxy
    fn matrix_to_vector(matrix: &Matrix2<f64>) -> Vector3<f64> {
        Vector3::new(matrix[(0, 0)], matrix[(1, 1)], 0.5 * (matrix[(0, 1)] + matrix[(1, 0)]))
    }

    fn vector_to_matrix(vector: &Vector3<f64>) -> Matrix2<f64> {
        Matrix2::new(
            vector[0], vector[2],
            vector[2], vector[1],
        )
    }

    pub fn matrix(&self) -> &Matrix2<f64> {
        &self.matrix
    }

    pub fn sigma_xx(&self) -> f64 {
        self.vector[0]
    }

    pub fn sigma_yy(&self) -> f64 {
        self.vector[1]
    }

    pub fn tau_xy(&self) -> f64 {
        self.vector[2]
    }

    /// Superposes another stress state.
    pub fn superpose(&self, other: &PlaneStress) -> PlaneStress {
        Self::from_vector(self.vector + other.vector)
    }

    /// Stress expressed in axes rotated by `theta` radians, `R·σ·Rᵀ`.
    ///
    /// In the rotated frame the first axis runs along the crack, so
    /// `sigma_yy` of the result is the stress opening the crack faces.
    pub fn rotate(&self, theta: f64) -> PlaneStress {
        let (sin, cos) = theta.sin_cos();
        let rotation = Matrix2::new(
            cos, sin,
            -sin, cos,
        );
        let rotated = rotation * self.matrix * rotation.transpose();
        Self::from_vector(Self::matrix_to_vector(&rotated))
    }

    /// Normal stress acting across a crack whose plane lies at `theta` from the x axis.
    pub fn crack_opening_stress(&self, theta: f64) -> f64 {
        self.rotate(theta).sigma_yy()
    }

    pub fn principal_stresses(&self) -> PrincipalStresses {
        let eigen = self.matrix.symmetric_eigen();
        let (first, second) = if eigen.eigenvalues[0] >= eigen.eigenvalues[1] { (0, 1) } else { (1, 0) };
        let direction = eigen.eigenvectors.column(first);
        PrincipalStresses {
            sigma_1: eigen.eigenvalues[first],
            sigma_2: eigen.eigenvalues[second],
            angle: direction[1].atan2(direction[0]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_6};

    #[test]
    fn test_rotation_preserves_invariants() {
        let stress = PlaneStress::new(-50.0, 108.0, 25.0);
        let rotated = stress.rotate(0.7);
        assert_relative_eq!(rotated.sigma_xx() + rotated.sigma_yy(), 58.0, epsilon = 1e-9);
        assert_relative_eq!(rotated.matrix().determinant(), stress.matrix().determinant(), epsilon = 1e-6);
    }

    #[test]
    fn test_quarter_turn_swaps_normals() {
        let stress = PlaneStress::new(-50.0, 108.0, 0.0);
        let rotated = stress.rotate(FRAC_PI_2);
        assert_relative_eq!(rotated.sigma_xx(), 108.0, epsilon = 1e-9);
        assert_relative_eq!(rotated.sigma_yy(), -50.0, epsilon = 1e-9);
        assert_relative_eq!(rotated.tau_xy(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_superposed_uniaxial_load() {
        // Uniaxial σp applied at 30° adds (3/4, 1/4, √3/4)·σp; sign of the shear follows the rotation convention.
        let sigma_p = 100.0;
        let base = PlaneStress::new(-50.0, 108.0, 0.0);
        let applied = PlaneStress::new(sigma_p, 0.0, 0.0).rotate(-FRAC_PI_6);
        let total = base.superpose(&applied);
        assert_relative_eq!(total.sigma_xx(), -50.0 + 0.75 * sigma_p, epsilon = 1e-9);
        assert_relative_eq!(total.sigma_yy(), 108.0 + 0.25 * sigma_p, epsilon = 1e-9);
        assert_relative_eq!(total.tau_xy().abs(), 3f64.sqrt() / 4.0 * sigma_p, epsilon = 1e-9);
    }

    #[test]
    fn test_principal_stresses() {
        let stress = PlaneStress::new(80.0, 20.0, 40.0);
        let principal = stress.principal_stresses();
        assert_relative_eq!(principal.sigma_1, 100.0, epsilon = 1e-9);
        assert_relative_eq!(principal.sigma_2, 0.0, epsilon = 1e-9);
        let aligned = stress.rotate(principal.angle);
        assert_relative_eq!(aligned.sigma_xx(), 100.0, epsilon = 1e-9);
        assert_relative_eq!(aligned.tau_xy(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_crack_opening_stress() {
        let hoop = PlaneStress::new(0.0, 200.0, 0.0);
        assert_relative_eq!(hoop.crack_opening_stress(0.0), 200.0, epsilon = 1e-9);
        assert_relative_eq!(hoop.crack_opening_stress(FRAC_PI_2), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_from_matrix() {
        let matrix = Matrix2::new(1.0, 2.0, 2.0, 3.0);
        let stress = PlaneStress::from_matrix(matrix).unwrap();
        assert_eq!(stress.vector, Vector3::new(1.0, 3.0, 2.0));
        assert!(PlaneStress::from_matrix(Matrix2::new(1.0, 2.0, 5.0, 3.0)).is_err());
    }
}
