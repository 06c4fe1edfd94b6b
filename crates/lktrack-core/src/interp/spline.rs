//! Bicubic B-spline interpolation.
//!
//! The image is converted once into cubic B-spline coefficients with the
//! recursive prefilter of Unser et al. (mirror boundary conditions), applied
//! separably along rows and then columns. Evaluation touches a 4x4 block of
//! coefficients, so value and gradient queries are O(1).
//!
//! Out-of-range coordinates are clamped to the image domain before
//! evaluation: outside the grid the surface is extended as a constant along
//! the clamped axis, and the gradient component along that axis is zero.

use ndarray::{Array2, Axis};

use crate::consts::{BSPLINE_INIT_TOLERANCE, CUBIC_BSPLINE_POLE};

use super::Sampler;

/// Cubic spline surface fitted to one image.
#[derive(Clone, Debug)]
pub struct SplineSurface {
    coefficients: Array2<f64>,
}

impl SplineSurface {
    /// Fit the interpolant. The surface passes exactly through every sample.
    pub fn new(image: &Array2<f64>) -> Self {
        let mut coefficients = image.clone();
        for axis in [Axis(0), Axis(1)] {
            let mut line = Vec::new();
            for mut lane in coefficients.lanes_mut(axis) {
                line.clear();
                line.extend(lane.iter().copied());
                prefilter_line(&mut line);
                lane.iter_mut().zip(&line).for_each(|(dst, &v)| *dst = v);
            }
        }
        Self { coefficients }
    }

    pub fn width(&self) -> usize {
        self.coefficients.ncols()
    }

    pub fn height(&self) -> usize {
        self.coefficients.nrows()
    }

    fn evaluate(&self, x: f64, y: f64) -> (f64, f64, f64) {
        let (h, w) = self.coefficients.dim();
        let cx = x.clamp(0.0, w.saturating_sub(1) as f64);
        let cy = y.clamp(0.0, h.saturating_sub(1) as f64);
        let ix = cx.floor();
        let iy = cy.floor();
        let (wx, dx) = basis(cx - ix);
        let (wy, dy) = basis(cy - iy);
        let ix = ix as isize;
        let iy = iy as isize;

        let cols: [usize; 4] = std::array::from_fn(|i| mirror(ix - 1 + i as isize, w));

        let mut value = 0.0;
        let mut grad_x = 0.0;
        let mut grad_y = 0.0;
        for (j, (&wyj, &dyj)) in wy.iter().zip(dy.iter()).enumerate() {
            let row = self.coefficients.row(mirror(iy - 1 + j as isize, h));
            let mut along = 0.0;
            let mut along_dx = 0.0;
            for (i, &c) in cols.iter().enumerate() {
                let coeff = row[c];
                along += wx[i] * coeff;
                along_dx += dx[i] * coeff;
            }
            value += wyj * along;
            grad_x += wyj * along_dx;
            grad_y += dyj * along;
        }

        if w == 1 {
            grad_x = 0.0;
        }
        if h == 1 {
            grad_y = 0.0;
        }
        (value, grad_x, grad_y)
    }
}

impl Sampler for SplineSurface {
    fn value(&self, x: f64, y: f64) -> f64 {
        self.evaluate(x, y).0
    }

    fn gradient(&self, x: f64, y: f64) -> (f64, f64) {
        let (_, gx, gy) = self.evaluate(x, y);
        (gx, gy)
    }

    fn value_and_gradient(&self, x: f64, y: f64) -> (f64, f64, f64) {
        self.evaluate(x, y)
    }
}

/// Cubic B-spline weights and their derivatives for the four taps
/// `floor(x) - 1 ..= floor(x) + 2` at fractional offset `t`.
fn basis(t: f64) -> ([f64; 4], [f64; 4]) {
    let s = 1.0 - t;
    let t2 = t * t;
    let t3 = t2 * t;
    let weights = [
        s * s * s / 6.0,
        (3.0 * t3 - 6.0 * t2 + 4.0) / 6.0,
        (-3.0 * t3 + 3.0 * t2 + 3.0 * t + 1.0) / 6.0,
        t3 / 6.0,
    ];
    let derivatives = [
        -s * s / 2.0,
        (3.0 * t2 - 4.0 * t) / 2.0,
        (-3.0 * t2 + 2.0 * t + 1.0) / 2.0,
        t2 / 2.0,
    ];
    (weights, derivatives)
}

/// Whole-sample mirror indexing: `-1 -> 1`, `n -> n - 2`.
fn mirror(k: isize, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * n as isize - 2;
    let k = k.abs() % period;
    if k >= n as isize {
        (period - k) as usize
    } else {
        k as usize
    }
}

/// In-place conversion of samples to cubic B-spline coefficients.
fn prefilter_line(line: &mut [f64]) {
    let n = line.len();
    if n < 2 {
        return;
    }
    let z = CUBIC_BSPLINE_POLE;
    let gain = (1.0 - z) * (1.0 - 1.0 / z);
    line.iter_mut().for_each(|v| *v *= gain);

    line[0] = initial_causal(line, z);
    for k in 1..n {
        line[k] += z * line[k - 1];
    }
    line[n - 1] = (z / (z * z - 1.0)) * (z * line[n - 2] + line[n - 1]);
    for k in (0..n - 1).rev() {
        line[k] = z * (line[k + 1] - line[k]);
    }
}

fn initial_causal(line: &[f64], z: f64) -> f64 {
    let n = line.len();
    let horizon = (BSPLINE_INIT_TOLERANCE.ln() / z.abs().ln()).ceil() as usize;
    if horizon < n {
        let mut zn = z;
        let mut sum = line[0];
        for &v in &line[1..horizon] {
            sum += zn * v;
            zn *= z;
        }
        sum
    } else {
        let mut zn = z;
        let iz = 1.0 / z;
        let mut z2n = z.powi(n as i32 - 1);
        let mut sum = line[0] + z2n * line[n - 1];
        z2n *= z2n * iz;
        for &v in &line[1..n - 1] {
            sum += (zn + z2n) * v;
            zn *= z;
            z2n *= iz;
        }
        sum / (1.0 - zn * zn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ramp_image(h: usize, w: usize) -> Array2<f64> {
        Array2::from_shape_fn((h, w), |(r, c)| 2.0 * c as f64 + 0.5 * r as f64 + 1.0)
    }

    fn wavy_image(h: usize, w: usize) -> Array2<f64> {
        Array2::from_shape_fn((h, w), |(r, c)| {
            (c as f64 * 0.4).sin() * (r as f64 * 0.3).cos() + 0.01 * (r * c) as f64
        })
    }

    #[test]
    fn test_interpolates_grid_samples() {
        let img = wavy_image(17, 23);
        let surface = SplineSurface::new(&img);
        for r in 0..17 {
            for c in 0..23 {
                assert_abs_diff_eq!(
                    surface.value(c as f64, r as f64),
                    img[[r, c]],
                    epsilon = 1e-9
                );
            }
        }
    }

    #[test]
    fn test_linear_ramp_reproduced_in_interior() {
        let surface = SplineSurface::new(&ramp_image(40, 40));
        let (v, gx, gy) = surface.value_and_gradient(20.3, 19.6);
        assert_abs_diff_eq!(v, 2.0 * 20.3 + 0.5 * 19.6 + 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(gx, 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(gy, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_gradient_matches_finite_difference() {
        let surface = SplineSurface::new(&wavy_image(30, 30));
        let (x, y, h) = (12.37, 9.81, 1e-5);
        let (gx, gy) = surface.gradient(x, y);
        let fd_x = (surface.value(x + h, y) - surface.value(x - h, y)) / (2.0 * h);
        let fd_y = (surface.value(x, y + h) - surface.value(x, y - h)) / (2.0 * h);
        assert_abs_diff_eq!(gx, fd_x, epsilon = 1e-6);
        assert_abs_diff_eq!(gy, fd_y, epsilon = 1e-6);
    }

    #[test]
    fn test_out_of_bounds_clamps_to_border() {
        let img = wavy_image(12, 15);
        let surface = SplineSurface::new(&img);
        assert_abs_diff_eq!(surface.value(-4.5, 3.0), img[[3, 0]], epsilon = 1e-9);
        assert_abs_diff_eq!(surface.value(40.0, 3.0), img[[3, 14]], epsilon = 1e-9);
        assert_abs_diff_eq!(surface.value(2.0, -1.0), img[[0, 2]], epsilon = 1e-9);
        assert_abs_diff_eq!(surface.value(99.0, 99.0), img[[11, 14]], epsilon = 1e-9);

        let (gx, gy) = surface.gradient(-3.0, 5.5);
        assert_eq!(gx, 0.0);
        assert!(gy.is_finite());
        let (gx, gy) = surface.gradient(6.5, 30.0);
        assert!(gx.is_finite());
        assert_eq!(gy, 0.0);
    }

    #[test]
    fn test_single_pixel_image_is_constant() {
        let img = Array2::from_elem((1, 1), 3.5);
        let surface = SplineSurface::new(&img);
        let (v, gx, gy) = surface.value_and_gradient(0.4, -2.0);
        assert_abs_diff_eq!(v, 3.5, epsilon = 1e-12);
        assert_eq!((gx, gy), (0.0, 0.0));
    }

    #[test]
    fn test_single_row_image() {
        let img = Array2::from_shape_fn((1, 8), |(_, c)| c as f64);
        let surface = SplineSurface::new(&img);
        assert_abs_diff_eq!(surface.value(5.0, 0.0), 5.0, epsilon = 1e-9);
        assert_eq!(surface.gradient(3.5, 0.0).1, 0.0);
    }

    #[test]
    fn test_mirror_indexing() {
        assert_eq!(mirror(-1, 5), 1);
        assert_eq!(mirror(-2, 5), 2);
        assert_eq!(mirror(5, 5), 3);
        assert_eq!(mirror(6, 5), 2);
        assert_eq!(mirror(3, 5), 3);
        assert_eq!(mirror(7, 1), 0);
    }
}
