//! Template trackers: estimate how the patch under a rectangle moved
//! between a template frame and a target frame.

mod dispatcher;
pub mod gauss_newton;
pub mod grid;
pub mod pyramid;

use nalgebra::SVector;
use ndarray::Array2;
use tracing::debug;

use crate::config::TrackerConfig;
use crate::error::Result;
use crate::frame::{ensure_valid_image, Rect, Translation};
use crate::interp::SplineSurface;
use crate::robust::{Estimator, RobustConfig};
use crate::warp::{AffineModel, AffineWarp, TranslationModel, WarpModel};

use self::gauss_newton::Solution;
use self::grid::{SampleGrid, TemplatePatch};

pub use dispatcher::{track_configured, Motion};
pub use pyramid::track_translation_pyramidal;

/// Estimate the translation `(dx, dy)` of the patch under `rect`.
pub fn track_translation(
    template: &Array2<f64>,
    target: &Array2<f64>,
    rect: &Rect,
    config: &TrackerConfig,
) -> Result<Translation> {
    let solution = solve_forward_additive(
        &TranslationModel,
        template,
        target,
        rect,
        SVector::<f64, 2>::zeros(),
        &RobustConfig::from(Estimator::None),
        config,
    )?;
    Ok(Translation::new(solution.params[0], solution.params[1]))
}

/// Estimate a full affine warp with forward-additive updates.
pub fn track_affine(
    template: &Array2<f64>,
    target: &Array2<f64>,
    rect: &Rect,
    config: &TrackerConfig,
) -> Result<AffineWarp> {
    let solution = solve_forward_additive(
        &AffineModel,
        template,
        target,
        rect,
        SVector::<f64, 6>::zeros(),
        &RobustConfig::from(Estimator::None),
        config,
    )?;
    Ok(AffineWarp::from_params(&solution.params))
}

/// Estimate a full affine warp with inverse-compositional updates.
pub fn track_affine_inverse_compositional(
    template: &Array2<f64>,
    target: &Array2<f64>,
    rect: &Rect,
    config: &TrackerConfig,
) -> Result<AffineWarp> {
    let solution = solve_inverse_compositional(template, target, rect, config)?;
    Ok(AffineWarp::from_params(&solution.params))
}

/// Affine tracking with M-estimator weights and the default thresholds.
pub fn track_affine_robust(
    template: &Array2<f64>,
    target: &Array2<f64>,
    rect: &Rect,
    estimator: Estimator,
    config: &TrackerConfig,
) -> Result<AffineWarp> {
    track_affine_weighted(template, target, rect, &RobustConfig::from(estimator), config)
}

/// Affine tracking with fully specified robust weighting.
pub fn track_affine_weighted(
    template: &Array2<f64>,
    target: &Array2<f64>,
    rect: &Rect,
    robust: &RobustConfig,
    config: &TrackerConfig,
) -> Result<AffineWarp> {
    robust.validate()?;
    let solution = solve_forward_additive(
        &AffineModel,
        template,
        target,
        rect,
        SVector::<f64, 6>::zeros(),
        robust,
        config,
    )?;
    Ok(AffineWarp::from_params(&solution.params))
}

/// Run forward-additive Gauss-Newton for any warp model and return the full
/// optimizer state, including the cost history.
pub fn solve_forward_additive<W, const K: usize>(
    warp: &W,
    template: &Array2<f64>,
    target: &Array2<f64>,
    rect: &Rect,
    initial: SVector<f64, K>,
    robust: &RobustConfig,
    config: &TrackerConfig,
) -> Result<Solution<K>>
where
    W: WarpModel<K>,
{
    config.validate()?;
    let patch = prepare_template(template, rect)?;
    ensure_valid_image(target)?;
    let target = SplineSurface::new(target);
    Ok(gauss_newton::forward_additive(
        warp, &patch, &target, initial, robust, config,
    ))
}

/// Run inverse-compositional Gauss-Newton for the affine warp.
pub fn solve_inverse_compositional(
    template: &Array2<f64>,
    target: &Array2<f64>,
    rect: &Rect,
    config: &TrackerConfig,
) -> Result<Solution<6>> {
    config.validate()?;
    let patch = prepare_template(template, rect)?;
    ensure_valid_image(target)?;
    let target = SplineSurface::new(target);
    Ok(gauss_newton::inverse_compositional(&patch, &target, config))
}

fn prepare_template(template: &Array2<f64>, rect: &Rect) -> Result<TemplatePatch> {
    rect.validate()?;
    ensure_valid_image(template)?;
    let (h, w) = template.dim();
    let grid = SampleGrid::new(rect, w, h);
    debug!(
        %rect,
        columns = grid.columns(),
        rows = grid.rows(),
        "sampling template"
    );
    Ok(TemplatePatch::sample(&SplineSurface::new(template), &grid))
}
