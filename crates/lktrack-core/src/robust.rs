//! M-estimator weights for iteratively reweighted least squares.
//!
//! Each weight multiplies both the steepest-descent row and the residual of
//! its sample before the normal equations are formed.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HUBER_DELTA, DEFAULT_TUKEY_C};
use crate::error::{Result, TrackError};

/// Robust loss selecting how residuals are weighted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Estimator {
    /// Plain least squares, every weight is 1.
    #[default]
    None,
    Huber,
    Tukey,
}

impl std::fmt::Display for Estimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Estimator::None => write!(f, "none"),
            Estimator::Huber => write!(f, "huber"),
            Estimator::Tukey => write!(f, "tukey"),
        }
    }
}

impl FromStr for Estimator {
    type Err = TrackError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Estimator::None),
            "huber" => Ok(Estimator::Huber),
            "tukey" => Ok(Estimator::Tukey),
            _ => Err(TrackError::UnknownEstimator(s.to_string())),
        }
    }
}

/// An estimator together with its tuning thresholds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RobustConfig {
    pub estimator: Estimator,
    /// Huber threshold δ.
    pub huber_delta: f64,
    /// Tukey biweight threshold c.
    pub tukey_c: f64,
}

impl Default for RobustConfig {
    fn default() -> Self {
        Self {
            estimator: Estimator::Huber,
            huber_delta: DEFAULT_HUBER_DELTA,
            tukey_c: DEFAULT_TUKEY_C,
        }
    }
}

impl From<Estimator> for RobustConfig {
    fn from(estimator: Estimator) -> Self {
        Self {
            estimator,
            ..Default::default()
        }
    }
}

impl RobustConfig {
    pub fn validate(&self) -> Result<()> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.huber_delta) {
            return Err(TrackError::InvalidConfig(format!(
                "huber_delta must be positive, got {}",
                self.huber_delta
            )));
        }
        if !positive(self.tukey_c) {
            return Err(TrackError::InvalidConfig(format!(
                "tukey_c must be positive, got {}",
                self.tukey_c
            )));
        }
        Ok(())
    }

    /// Weight of a single residual.
    pub fn weight(&self, residual: f64) -> f64 {
        let abs_r = residual.abs();
        match self.estimator {
            Estimator::None => 1.0,
            Estimator::Huber => {
                if abs_r <= self.huber_delta {
                    1.0
                } else {
                    self.huber_delta / abs_r
                }
            }
            Estimator::Tukey => {
                if abs_r < self.tukey_c {
                    let u = residual / self.tukey_c;
                    let t = 1.0 - u * u;
                    t * t
                } else {
                    0.0
                }
            }
        }
    }

    /// Per-sample weights for a residual vector.
    pub fn weights(&self, residuals: &[f64]) -> Vec<f64> {
        residuals.iter().map(|&r| self.weight(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_none_is_uniform() {
        let robust = RobustConfig::from(Estimator::None);
        assert_eq!(robust.weights(&[0.0, -3.0, 1e6]), vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_huber_weights() {
        let robust = RobustConfig::from(Estimator::Huber);
        assert_eq!(robust.weight(0.5), 1.0);
        assert_eq!(robust.weight(-1.0), 1.0);
        assert_relative_eq!(robust.weight(4.0), 0.25);
        assert_relative_eq!(robust.weight(-2.0), 0.5);
    }

    #[test]
    fn test_tukey_weights() {
        let robust = RobustConfig::from(Estimator::Tukey);
        assert_eq!(robust.weight(0.0), 1.0);
        let r = 2.0;
        let expected = (1.0 - (r / DEFAULT_TUKEY_C).powi(2)).powi(2);
        assert_relative_eq!(robust.weight(r), expected);
        assert_relative_eq!(robust.weight(-r), expected);
        assert_eq!(robust.weight(DEFAULT_TUKEY_C), 0.0);
        assert_eq!(robust.weight(50.0), 0.0);
    }

    #[test]
    fn test_tukey_tapers_monotonically() {
        let robust = RobustConfig::from(Estimator::Tukey);
        let ws = robust.weights(&[0.0, 1.0, 2.0, 3.0, 4.0, 4.6]);
        assert!(ws.windows(2).all(|p| p[1] < p[0]), "{ws:?}");
    }

    #[test]
    fn test_parse_estimator() {
        assert_eq!("huber".parse::<Estimator>(), Ok(Estimator::Huber));
        assert_eq!(" Tukey ".parse::<Estimator>(), Ok(Estimator::Tukey));
        assert_eq!("none".parse::<Estimator>(), Ok(Estimator::None));
        assert_eq!(
            "cauchy".parse::<Estimator>(),
            Err(TrackError::UnknownEstimator("cauchy".into()))
        );
    }

    #[test]
    fn test_validate_rejects_bad_thresholds() {
        let bad = RobustConfig {
            tukey_c: 0.0,
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(TrackError::InvalidConfig(_))));
        assert!(RobustConfig::default().validate().is_ok());
    }
}
