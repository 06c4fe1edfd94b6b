use ndarray::Array2;

use crate::config::{TrackingConfig, TrackingMethod};
use crate::error::Result;
use crate::frame::{Rect, Translation};
use crate::warp::AffineWarp;

use super::{
    track_affine, track_affine_inverse_compositional, track_affine_weighted, track_translation,
    track_translation_pyramidal,
};

/// Motion estimated by any of the trackers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    Translation(Translation),
    Affine(AffineWarp),
}

impl Motion {
    /// Rectangle covering the tracked patch in the target frame.
    ///
    /// Affine motion yields the bounding box of the warped corners.
    pub fn apply_to_rect(&self, rect: &Rect) -> Rect {
        match self {
            Motion::Translation(t) => rect.translated(t.dx, t.dy),
            Motion::Affine(warp) => warp.transform_rect(rect),
        }
    }

    pub fn translation(&self) -> Translation {
        match self {
            Motion::Translation(t) => *t,
            Motion::Affine(warp) => warp.translation(),
        }
    }
}

/// Track the patch under `rect` with the configured method.
pub fn track_configured(
    template: &Array2<f64>,
    target: &Array2<f64>,
    rect: &Rect,
    config: &TrackingConfig,
) -> Result<Motion> {
    config.validate()?;
    let tracker = &config.tracker;
    match &config.method {
        TrackingMethod::Translation => {
            track_translation(template, target, rect, tracker).map(Motion::Translation)
        }
        TrackingMethod::Affine => track_affine(template, target, rect, tracker).map(Motion::Affine),
        TrackingMethod::InverseCompositional => {
            track_affine_inverse_compositional(template, target, rect, tracker).map(Motion::Affine)
        }
        TrackingMethod::Robust(robust) => {
            track_affine_weighted(template, target, rect, robust, tracker).map(Motion::Affine)
        }
        TrackingMethod::Pyramid(pyramid) => {
            track_translation_pyramidal(template, target, rect, pyramid, tracker)
                .map(Motion::Translation)
        }
    }
}
