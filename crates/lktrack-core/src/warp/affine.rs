use nalgebra::{Matrix2x3, Matrix3, SVector};

use crate::consts::SINGULAR_DET_EPSILON;
use crate::frame::{Rect, Translation};

/// A 2x3 affine warp `[[1 + a, b, tx], [c, 1 + d, ty]]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffineWarp {
    pub matrix: Matrix2x3<f64>,
}

impl Default for AffineWarp {
    fn default() -> Self {
        Self::identity()
    }
}

impl AffineWarp {
    pub fn identity() -> Self {
        Self {
            matrix: Matrix2x3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0),
        }
    }

    /// Build from parameters `(a, b, tx, c, d, ty)`.
    pub fn from_params(p: &SVector<f64, 6>) -> Self {
        Self {
            matrix: Matrix2x3::new(1.0 + p[0], p[1], p[2], p[3], 1.0 + p[4], p[5]),
        }
    }

    pub fn params(&self) -> SVector<f64, 6> {
        let m = &self.matrix;
        SVector::<f64, 6>::from_column_slice(&[
            m[(0, 0)] - 1.0,
            m[(0, 1)],
            m[(0, 2)],
            m[(1, 0)],
            m[(1, 1)] - 1.0,
            m[(1, 2)],
        ])
    }

    pub fn from_rows(rows: [[f64; 3]; 2]) -> Self {
        let [r0, r1] = rows;
        Self {
            matrix: Matrix2x3::new(r0[0], r0[1], r0[2], r1[0], r1[1], r1[2]),
        }
    }

    pub fn rows(&self) -> [[f64; 3]; 2] {
        let m = &self.matrix;
        [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
        ]
    }

    pub fn to_homogeneous(&self) -> Matrix3<f64> {
        let m = &self.matrix;
        Matrix3::new(
            m[(0, 0)],
            m[(0, 1)],
            m[(0, 2)],
            m[(1, 0)],
            m[(1, 1)],
            m[(1, 2)],
            0.0,
            0.0,
            1.0,
        )
    }

    /// Drop the last row of a homogeneous matrix.
    pub fn from_homogeneous(h: &Matrix3<f64>) -> Self {
        Self {
            matrix: h.fixed_view::<2, 3>(0, 0).into_owned(),
        }
    }

    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let m = &self.matrix;
        (
            m[(0, 0)] * x + m[(0, 1)] * y + m[(0, 2)],
            m[(1, 0)] * x + m[(1, 1)] * y + m[(1, 2)],
        )
    }

    pub fn translation(&self) -> Translation {
        Translation::new(self.matrix[(0, 2)], self.matrix[(1, 2)])
    }

    /// Axis-aligned bounding box of the warped rectangle corners.
    pub fn transform_rect(&self, rect: &Rect) -> Rect {
        let corners = [
            self.apply(rect.x1, rect.y1),
            self.apply(rect.x2, rect.y1),
            self.apply(rect.x1, rect.y2),
            self.apply(rect.x2, rect.y2),
        ];
        let (mut x1, mut y1) = corners[0];
        let (mut x2, mut y2) = corners[0];
        for &(x, y) in &corners[1..] {
            x1 = x1.min(x);
            y1 = y1.min(y);
            x2 = x2.max(x);
            y2 = y2.max(y);
        }
        Rect::new(x1, y1, x2, y2)
    }

    /// Inverse-compositional update `W <- W o dW^-1`.
    ///
    /// Returns `false` and leaves the warp untouched when the increment is
    /// singular.
    pub fn compose_inverse_increment(&mut self, delta: &SVector<f64, 6>) -> bool {
        let increment = Self::from_params(delta).to_homogeneous();
        match invert_homogeneous(&increment) {
            Some(inverse) => {
                *self = Self::from_homogeneous(&(self.to_homogeneous() * inverse));
                true
            }
            None => false,
        }
    }
}

/// Closed-form inverse of a 3x3 matrix via its adjugate.
pub fn invert_homogeneous(m: &Matrix3<f64>) -> Option<Matrix3<f64>> {
    let (a, b, c) = (m[(0, 0)], m[(0, 1)], m[(0, 2)]);
    let (d, e, f) = (m[(1, 0)], m[(1, 1)], m[(1, 2)]);
    let (g, h, i) = (m[(2, 0)], m[(2, 1)], m[(2, 2)]);

    let co00 = e * i - f * h;
    let co01 = -(d * i - f * g);
    let co02 = d * h - e * g;
    let det = a * co00 + b * co01 + c * co02;
    if !det.is_finite() || det.abs() < SINGULAR_DET_EPSILON {
        return None;
    }

    let adjugate = Matrix3::new(
        co00,
        -(b * i - c * h),
        b * f - c * e,
        co01,
        a * i - c * g,
        -(a * f - c * d),
        co02,
        -(a * h - b * g),
        a * e - b * d,
    );
    Some(adjugate / det)
}
