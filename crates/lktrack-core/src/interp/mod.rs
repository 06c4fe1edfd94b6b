//! Continuous-domain access to discrete images.

pub mod spline;

pub use spline::SplineSurface;

/// Value and gradient queries at real-valued `(x, y)` positions.
///
/// `x` runs along columns and `y` along rows. Implementations must accept
/// coordinates outside the image and return a finite, well-defined result.
pub trait Sampler {
    fn value(&self, x: f64, y: f64) -> f64;

    /// `(dI/dx, dI/dy)`.
    fn gradient(&self, x: f64, y: f64) -> (f64, f64);

    /// `(I, dI/dx, dI/dy)` in one pass.
    fn value_and_gradient(&self, x: f64, y: f64) -> (f64, f64, f64) {
        let (gx, gy) = self.gradient(x, y);
        (self.value(x, y), gx, gy)
    }
}
