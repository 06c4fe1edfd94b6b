//! Coarse-to-fine translation tracking.
//!
//! Both frames are reduced into Gaussian pyramids. Translation is estimated
//! at the coarsest level first, where large motions shrink into the basin of
//! convergence, and each finer level starts from the accumulated estimate.

use nalgebra::Vector2;
use ndarray::Array2;
use tracing::debug;

use crate::config::{PyramidConfig, TrackerConfig};
use crate::error::Result;
use crate::filters::gaussian_blur::gaussian_blur_array;
use crate::filters::resize::resize_area;
use crate::frame::{ensure_valid_image, Rect, Translation};
use crate::robust::{Estimator, RobustConfig};
use crate::warp::TranslationModel;

use super::solve_forward_additive;

/// Estimate translation with coarse-to-fine pyramid refinement.
///
/// At level `l` (scale `s = scale^l`) the rectangle is scaled by `s`, the
/// optimizer is seeded with the running estimate times `s`, and the
/// level-local increment is divided by `s` before being accumulated.
pub fn track_translation_pyramidal(
    template: &Array2<f64>,
    target: &Array2<f64>,
    rect: &Rect,
    pyramid: &PyramidConfig,
    config: &TrackerConfig,
) -> Result<Translation> {
    pyramid.validate()?;
    config.validate()?;
    rect.validate()?;
    ensure_valid_image(template)?;
    ensure_valid_image(target)?;

    let tpl_pyramid = build_pyramid(template, pyramid);
    let tgt_pyramid = build_pyramid(target, pyramid);
    let robust = RobustConfig::from(Estimator::None);

    let mut total = Vector2::<f64>::zeros();

    // Coarsest level first; level 0 is full resolution
    for level in (0..pyramid.levels).rev() {
        let s = pyramid.scale.powi(level as i32);
        let seed = total * s;
        let solution = solve_forward_additive(
            &TranslationModel,
            &tpl_pyramid[level],
            &tgt_pyramid[level],
            &rect.scaled(s),
            seed,
            &robust,
            config,
        )?;
        total += (solution.params - seed) / s;

        debug!(
            level,
            scale = s,
            dx = total.x,
            dy = total.y,
            iterations = solution.iterations,
            converged = solution.converged,
            "pyramid level done"
        );
    }

    Ok(Translation::new(total.x, total.y))
}

/// Build a pyramid of `config.levels` images; index 0 is the input image and
/// the last entry is the coarsest.
pub fn build_pyramid(data: &Array2<f64>, config: &PyramidConfig) -> Vec<Array2<f64>> {
    let mut pyramid = Vec::with_capacity(config.levels);
    pyramid.push(data.clone());

    for _ in 1..config.levels {
        let Some(previous) = pyramid.last() else {
            break;
        };
        let blurred = gaussian_blur_array(previous, config.blur_kernel, config.blur_sigma);
        pyramid.push(resize_area(&blurred, config.scale));
    }

    pyramid
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pyramid_sizes() {
        let img = Array2::from_elem((100, 64), 1.0);
        let levels = build_pyramid(&img, &PyramidConfig::default());
        let dims: Vec<_> = levels.iter().map(|l| l.dim()).collect();
        assert_eq!(dims, vec![(100, 64), (50, 32), (25, 16)]);
    }

    #[test]
    fn test_single_level_is_input() {
        let img = Array2::from_shape_fn((8, 8), |(r, c)| (r + c) as f64);
        let config = PyramidConfig {
            levels: 1,
            ..Default::default()
        };
        let levels = build_pyramid(&img, &config);
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0], img);
    }
}
