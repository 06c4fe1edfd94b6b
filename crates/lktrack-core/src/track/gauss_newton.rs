//! Gauss-Newton image alignment.
//!
//! Two update schemes share the same stopping rules:
//!
//! * **Forward additive**: residuals and steepest-descent rows are rebuilt
//!   from the target at the current warp every iteration and the parameters
//!   are updated by `p <- p + dp`. Works for any [`WarpModel`] and accepts
//!   robust weights.
//! * **Inverse compositional**: steepest-descent rows and the Hessian come
//!   from the template once; each iteration only re-samples the target and
//!   composes the warp with the inverted increment.
//!
//! Every linear solve goes through an SVD pseudo-inverse, so rank-deficient
//! systems yield the minimum-norm increment instead of failing.

use nalgebra::{DMatrix, RowVector2, SMatrix, SVector};
use tracing::{debug, trace, warn};

use crate::config::TrackerConfig;
use crate::consts::PINV_RCOND;
use crate::interp::Sampler;
use crate::robust::RobustConfig;
use crate::warp::{AffineModel, AffineWarp, WarpModel};

use super::grid::TemplatePatch;

/// Outcome of one optimizer run.
#[derive(Clone, Debug)]
pub struct Solution<const K: usize> {
    pub params: SVector<f64, K>,
    /// Number of increments computed.
    pub iterations: usize,
    /// `true` when the increment norm fell below the threshold.
    pub converged: bool,
    /// Norm of the last increment.
    pub last_step: f64,
    /// Sum of squared (weighted) residuals, measured before each update.
    pub cost_history: Vec<f64>,
}

impl<const K: usize> Solution<K> {
    fn start(params: SVector<f64, K>, capacity: usize) -> Self {
        Self {
            params,
            iterations: 0,
            converged: false,
            last_step: f64::INFINITY,
            cost_history: Vec::with_capacity(capacity),
        }
    }
}

/// Forward-additive Gauss-Newton starting from `initial`.
pub fn forward_additive<W, S, const K: usize>(
    warp: &W,
    patch: &TemplatePatch,
    target: &S,
    initial: SVector<f64, K>,
    robust: &RobustConfig,
    config: &TrackerConfig,
) -> Solution<K>
where
    W: WarpModel<K>,
    S: Sampler,
{
    let n = patch.len();
    let mut solution = Solution::start(initial, config.max_iterations);
    let mut residuals = Vec::with_capacity(n);
    let mut rows: Vec<SMatrix<f64, 1, K>> = Vec::with_capacity(n);

    for iteration in 0..config.max_iterations {
        residuals.clear();
        rows.clear();
        for s in &patch.samples {
            let (xw, yw) = warp.apply(&solution.params, s.x, s.y);
            let (value, gx, gy) = target.value_and_gradient(xw, yw);
            residuals.push(s.value - value);
            rows.push(RowVector2::new(gx, gy) * warp.jacobian(s.x, s.y));
        }

        let weights = robust.weights(&residuals);
        let mut hessian = SMatrix::<f64, K, K>::zeros();
        let mut rhs = SVector::<f64, K>::zeros();
        let mut cost = 0.0;
        for ((row, &r), &w) in rows.iter().zip(&residuals).zip(&weights) {
            let w2 = w * w;
            hessian += row.transpose() * row * w2;
            rhs += row.transpose() * (r * w2);
            cost += w2 * r * r;
        }
        if !(hessian.iter().all(|v| v.is_finite()) && rhs.iter().all(|v| v.is_finite())) {
            warn!(iteration, "non-finite normal equations, keeping last estimate");
            break;
        }
        solution.cost_history.push(cost);

        let delta = solve_min_norm(&hessian, &rhs);
        if !delta.iter().all(|v| v.is_finite()) {
            warn!(iteration, "non-finite increment, keeping last estimate");
            break;
        }

        solution.params += delta;
        solution.iterations = iteration + 1;
        solution.last_step = delta.norm();
        trace!(iteration, cost, step = solution.last_step, "forward-additive step");

        if solution.last_step < config.threshold {
            solution.converged = true;
            break;
        }
    }

    debug!(
        iterations = solution.iterations,
        converged = solution.converged,
        last_step = solution.last_step,
        samples = n,
        "forward-additive finished"
    );
    solution
}

/// Inverse-compositional Gauss-Newton for the affine warp, from identity.
///
/// `patch` must carry template gradients; the returned parameters encode the
/// final warp matrix.
pub fn inverse_compositional<S: Sampler>(
    patch: &TemplatePatch,
    target: &S,
    config: &TrackerConfig,
) -> Solution<6> {
    let n = patch.len();
    let rows: Vec<SMatrix<f64, 1, 6>> = patch
        .samples
        .iter()
        .map(|s| RowVector2::new(s.grad_x, s.grad_y) * AffineModel.jacobian(s.x, s.y))
        .collect();
    let hessian = rows
        .iter()
        .fold(SMatrix::<f64, 6, 6>::zeros(), |acc, row| acc + row.transpose() * row);
    let hessian_pinv = pseudo_inverse(&hessian);

    let mut warp = AffineWarp::identity();
    let mut solution = Solution::start(warp.params(), config.max_iterations);
    if !hessian.iter().all(|v| v.is_finite()) {
        warn!(samples = n, "non-finite template Hessian, returning identity");
        return solution;
    }

    for iteration in 0..config.max_iterations {
        let mut rhs = SVector::<f64, 6>::zeros();
        let mut cost = 0.0;
        for (s, row) in patch.samples.iter().zip(&rows) {
            let (xw, yw) = warp.apply(s.x, s.y);
            let error = target.value(xw, yw) - s.value;
            rhs += row.transpose() * error;
            cost += error * error;
        }
        solution.cost_history.push(cost);

        let delta = hessian_pinv * rhs;
        if !delta.iter().all(|v| v.is_finite()) {
            warn!(iteration, "non-finite increment, keeping last estimate");
            break;
        }
        if !warp.compose_inverse_increment(&delta) {
            warn!(iteration, "singular warp increment, keeping last estimate");
            break;
        }

        solution.iterations = iteration + 1;
        solution.last_step = delta.norm();
        trace!(iteration, cost, step = solution.last_step, "inverse-compositional step");

        if solution.last_step < config.threshold {
            solution.converged = true;
            break;
        }
    }

    solution.params = warp.params();
    debug!(
        iterations = solution.iterations,
        converged = solution.converged,
        last_step = solution.last_step,
        samples = n,
        "inverse-compositional finished"
    );
    solution
}

/// Minimum-norm solution of `h * x = b` for a symmetric `h`.
fn solve_min_norm<const K: usize>(h: &SMatrix<f64, K, K>, b: &SVector<f64, K>) -> SVector<f64, K> {
    pseudo_inverse(h) * b
}

/// Moore-Penrose pseudo-inverse, dropping singular values below
/// `PINV_RCOND` times the largest one. A matrix with non-finite entries maps
/// to zero.
fn pseudo_inverse<const K: usize>(h: &SMatrix<f64, K, K>) -> SMatrix<f64, K, K> {
    if !h.iter().all(|v| v.is_finite()) {
        return SMatrix::<f64, K, K>::zeros();
    }
    let svd = DMatrix::from_column_slice(K, K, h.as_slice()).svd(true, true);
    let cutoff = svd.singular_values.max() * PINV_RCOND;
    match svd.pseudo_inverse(cutoff.max(0.0)) {
        Ok(pinv) => SMatrix::<f64, K, K>::from_column_slice(pinv.as_slice()),
        Err(_) => SMatrix::<f64, K, K>::zeros(),
    }
}
