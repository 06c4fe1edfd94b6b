/// Default convergence threshold on the norm of the parameter increment.
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 0.01875;

/// Default cap on Gauss-Newton iterations per optimizer run.
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Default number of pyramid levels (level 0 is full resolution).
pub const DEFAULT_PYRAMID_LEVELS: usize = 3;

/// Default per-level downsampling factor.
pub const DEFAULT_PYRAMID_SCALE: f64 = 0.5;

/// Default Gaussian anti-alias kernel size (pixels, odd).
pub const DEFAULT_BLUR_KERNEL: usize = 5;

/// Default Gaussian anti-alias sigma.
pub const DEFAULT_BLUR_SIGMA: f64 = 1.0;

/// Huber threshold: residuals above this magnitude are down-weighted.
pub const DEFAULT_HUBER_DELTA: f64 = 1.0;

/// Tukey biweight threshold: residuals at or above this magnitude are rejected.
pub const DEFAULT_TUKEY_C: f64 = 4.685;

/// Relative cutoff for singular values in the pseudo-inverse, as a fraction
/// of the largest singular value.
pub const PINV_RCOND: f64 = 1e-12;

/// Determinant magnitude below which a 3x3 warp increment is treated as singular.
pub const SINGULAR_DET_EPSILON: f64 = 1e-12;

/// Pole of the cubic B-spline interpolation prefilter: sqrt(3) - 2.
pub const CUBIC_BSPLINE_POLE: f64 = -0.267_949_192_431_122_7;

/// Truncation tolerance for the causal prefilter initialisation.
pub const BSPLINE_INIT_TOLERANCE: f64 = 1e-12;
