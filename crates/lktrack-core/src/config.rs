use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_BLUR_KERNEL, DEFAULT_BLUR_SIGMA, DEFAULT_CONVERGENCE_THRESHOLD,
    DEFAULT_MAX_ITERATIONS, DEFAULT_PYRAMID_LEVELS, DEFAULT_PYRAMID_SCALE,
};
use crate::error::{Result, TrackError};
use crate::robust::RobustConfig;

/// Stopping rules for one Gauss-Newton run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Stop once the norm of the parameter increment drops below this.
    pub threshold: f64,
    /// Hard cap on iterations; reaching it still yields the last estimate.
    pub max_iterations: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.threshold.is_finite() && self.threshold > 0.0) {
            return Err(TrackError::InvalidConfig(format!(
                "threshold must be positive, got {}",
                self.threshold
            )));
        }
        if self.max_iterations == 0 {
            return Err(TrackError::InvalidConfig(
                "max_iterations must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Coarse-to-fine pyramid parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PyramidConfig {
    /// Number of levels including full resolution.
    pub levels: usize,
    /// Downsampling factor between consecutive levels, in (0, 1).
    pub scale: f64,
    /// Gaussian anti-alias kernel size in pixels (odd).
    pub blur_kernel: usize,
    pub blur_sigma: f64,
}

impl Default for PyramidConfig {
    fn default() -> Self {
        Self {
            levels: DEFAULT_PYRAMID_LEVELS,
            scale: DEFAULT_PYRAMID_SCALE,
            blur_kernel: DEFAULT_BLUR_KERNEL,
            blur_sigma: DEFAULT_BLUR_SIGMA,
        }
    }
}

impl PyramidConfig {
    pub fn validate(&self) -> Result<()> {
        if self.levels == 0 {
            return Err(TrackError::InvalidConfig(
                "pyramid levels must be at least 1".into(),
            ));
        }
        if !(self.scale > 0.0 && self.scale < 1.0) {
            return Err(TrackError::InvalidConfig(format!(
                "pyramid scale must lie in (0, 1), got {}",
                self.scale
            )));
        }
        if self.blur_kernel % 2 == 0 {
            return Err(TrackError::InvalidConfig(format!(
                "blur kernel size must be odd, got {}",
                self.blur_kernel
            )));
        }
        if !(self.blur_sigma.is_finite() && self.blur_sigma > 0.0) {
            return Err(TrackError::InvalidConfig(format!(
                "blur sigma must be positive, got {}",
                self.blur_sigma
            )));
        }
        Ok(())
    }
}

/// Which warp model and optimizer variant to run.
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
pub enum TrackingMethod {
    /// Forward-additive, translation only.
    Translation,
    /// Forward-additive, six-parameter affine.
    #[default]
    Affine,
    /// Inverse-compositional affine.
    InverseCompositional,
    /// Forward-additive affine with M-estimator weights.
    Robust(RobustConfig),
    /// Coarse-to-fine translation.
    Pyramid(PyramidConfig),
}

impl std::fmt::Display for TrackingMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackingMethod::Translation => write!(f, "Translation"),
            TrackingMethod::Affine => write!(f, "Affine"),
            TrackingMethod::InverseCompositional => write!(f, "Inverse-Compositional Affine"),
            TrackingMethod::Robust(r) => write!(f, "Robust Affine ({})", r.estimator),
            TrackingMethod::Pyramid(p) => write!(
                f,
                "Pyramid Translation ({} levels, scale {})",
                p.levels, p.scale
            ),
        }
    }
}

/// Full tracking configuration as stored in TOML files.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackingConfig {
    #[serde(default)]
    pub method: TrackingMethod,
    #[serde(default)]
    pub tracker: TrackerConfig,
}

impl TrackingConfig {
    pub fn validate(&self) -> Result<()> {
        self.tracker.validate()?;
        match &self.method {
            TrackingMethod::Robust(robust) => robust.validate(),
            TrackingMethod::Pyramid(pyramid) => pyramid.validate(),
            _ => Ok(()),
        }
    }
}
