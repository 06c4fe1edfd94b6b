//! Parametric warps mapping template coordinates into the target image.

pub mod affine;

use nalgebra::{SMatrix, SVector};

pub use affine::AffineWarp;

/// A warp with `K` parameters whose zero vector is the identity.
pub trait WarpModel<const K: usize> {
    /// Warped position of template point `(x, y)`.
    fn apply(&self, params: &SVector<f64, K>, x: f64, y: f64) -> (f64, f64);

    /// Derivative of the warped position with respect to the parameters,
    /// evaluated at template point `(x, y)`.
    fn jacobian(&self, x: f64, y: f64) -> SMatrix<f64, 2, K>;

    fn parameter_count(&self) -> usize {
        K
    }
}

/// `x' = x + dx`, `y' = y + dy`; parameters `(dx, dy)`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TranslationModel;

impl WarpModel<2> for TranslationModel {
    fn apply(&self, params: &SVector<f64, 2>, x: f64, y: f64) -> (f64, f64) {
        (x + params[0], y + params[1])
    }

    fn jacobian(&self, _x: f64, _y: f64) -> SMatrix<f64, 2, 2> {
        SMatrix::<f64, 2, 2>::identity()
    }
}

/// Parameters `(a, b, tx, c, d, ty)` of the matrix
/// `[[1 + a, b, tx], [c, 1 + d, ty]]`.
#[derive(Clone, Copy, Debug, Default)]
pub struct AffineModel;

impl WarpModel<6> for AffineModel {
    fn apply(&self, params: &SVector<f64, 6>, x: f64, y: f64) -> (f64, f64) {
        (
            (1.0 + params[0]) * x + params[1] * y + params[2],
            params[3] * x + (1.0 + params[4]) * y + params[5],
        )
    }

    fn jacobian(&self, x: f64, y: f64) -> SMatrix<f64, 2, 6> {
        SMatrix::<f64, 2, 6>::from_row_slice(&[
            x, y, 1.0, 0.0, 0.0, 0.0, //
            0.0, 0.0, 0.0, x, y, 1.0,
        ])
    }
}
