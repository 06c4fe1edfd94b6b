pub mod config;
pub mod pair;
pub mod sequence;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use lktrack_core::config::{PyramidConfig, TrackerConfig, TrackingConfig, TrackingMethod};
use lktrack_core::consts::{
    DEFAULT_CONVERGENCE_THRESHOLD, DEFAULT_HUBER_DELTA, DEFAULT_MAX_ITERATIONS,
    DEFAULT_PYRAMID_LEVELS, DEFAULT_TUKEY_C,
};
use lktrack_core::robust::{Estimator, RobustConfig};

#[derive(Clone, Copy, Debug, PartialEq, ValueEnum)]
pub enum MethodArg {
    Translation,
    Affine,
    InverseCompositional,
    Robust,
    Pyramid,
}

/// Method selection shared by the tracking subcommands.
#[derive(Args, Debug)]
pub struct TrackingArgs {
    /// Tracking config file (TOML); replaces the method flags below
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Tracking method
    #[arg(long, value_enum, default_value = "affine")]
    pub method: MethodArg,

    /// Robust estimator for --method robust (none, huber, tukey)
    #[arg(long, default_value = "huber")]
    pub estimator: Estimator,

    /// Huber threshold, in unit intensities (pixels are loaded into [0, 1])
    #[arg(long, default_value_t = DEFAULT_HUBER_DELTA)]
    pub huber_delta: f64,

    /// Tukey threshold, in unit intensities (pixels are loaded into [0, 1])
    #[arg(long, default_value_t = DEFAULT_TUKEY_C)]
    pub tukey_c: f64,

    /// Pyramid levels for --method pyramid
    #[arg(long, default_value_t = DEFAULT_PYRAMID_LEVELS)]
    pub levels: usize,

    /// Convergence threshold on the parameter increment norm
    #[arg(long, default_value_t = DEFAULT_CONVERGENCE_THRESHOLD)]
    pub threshold: f64,

    /// Maximum Gauss-Newton iterations
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    pub max_iterations: usize,
}

impl TrackingArgs {
    /// Build the tracking config from the config file or the flags.
    pub fn resolve(&self) -> Result<TrackingConfig> {
        let config = if let Some(ref path) = self.config {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            toml::from_str(&contents).context("Invalid tracking config")?
        } else {
            self.build_config()
        };
        config.validate().context("Invalid tracking config")?;
        Ok(config)
    }

    fn build_config(&self) -> TrackingConfig {
        let method = match self.method {
            MethodArg::Translation => TrackingMethod::Translation,
            MethodArg::Affine => TrackingMethod::Affine,
            MethodArg::InverseCompositional => TrackingMethod::InverseCompositional,
            MethodArg::Robust => TrackingMethod::Robust(RobustConfig {
                estimator: self.estimator,
                huber_delta: self.huber_delta,
                tukey_c: self.tukey_c,
            }),
            MethodArg::Pyramid => TrackingMethod::Pyramid(PyramidConfig {
                levels: self.levels,
                ..PyramidConfig::default()
            }),
        };
        TrackingConfig {
            method,
            tracker: TrackerConfig {
                threshold: self.threshold,
                max_iterations: self.max_iterations,
            },
        }
    }
}
