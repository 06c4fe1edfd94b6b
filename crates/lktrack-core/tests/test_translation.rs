#[allow(dead_code)]
mod common;

use nalgebra::SVector;
use ndarray::Array2;

use lktrack_core::config::{PyramidConfig, TrackerConfig};
use lktrack_core::error::TrackError;
use lktrack_core::frame::Rect;
use lktrack_core::robust::{Estimator, RobustConfig};
use lktrack_core::track::{
    solve_forward_additive, track_affine, track_affine_inverse_compositional, track_translation,
    track_translation_pyramidal,
};
use lktrack_core::warp::TranslationModel;

fn rect() -> Rect {
    Rect::new(12.0, 12.0, 52.0, 52.0)
}

#[test]
fn test_identical_frames_give_zero_translation() {
    let image = common::render(64, 64, common::scene);
    let t = track_translation(&image, &image, &rect(), &TrackerConfig::default()).unwrap();
    assert!(t.dx.abs() < 1e-9, "dx={}", t.dx);
    assert!(t.dy.abs() < 1e-9, "dy={}", t.dy);
}

#[test]
fn test_identity_holds_for_several_rects() {
    let image = common::render(64, 64, common::scene);
    let rects = [
        Rect::new(5.0, 5.0, 30.0, 30.0),
        Rect::new(20.5, 10.25, 58.0, 40.0),
        Rect::new(0.0, 0.0, 63.0, 63.0),
    ];
    for r in &rects {
        let t = track_translation(&image, &image, r, &TrackerConfig::default()).unwrap();
        assert!(t.norm() < 1e-9, "rect {r}: {t:?}");
    }
}

#[test]
fn test_recovers_subpixel_shift() {
    let template = common::render(64, 64, common::scene);
    let target = common::render_shifted(64, 64, common::scene, 1.3, -0.7);
    let t = track_translation(&template, &target, &rect(), &TrackerConfig::default()).unwrap();
    assert!((t.dx - 1.3).abs() < 1e-3, "dx={}", t.dx);
    assert!((t.dy + 0.7).abs() < 1e-3, "dy={}", t.dy);
}

#[test]
fn test_affine_tracker_recovers_pure_translation() {
    let template = common::render(64, 64, common::scene);
    let target = common::render_shifted(64, 64, common::scene, 1.3, -0.7);
    let warp = track_affine(&template, &target, &rect(), &TrackerConfig::default()).unwrap();
    let expected = [[1.0, 0.0, 1.3], [0.0, 1.0, -0.7]];
    let diff = common::max_abs_diff(warp.rows(), expected);
    assert!(diff < 1e-3, "max diff {diff}, rows {:?}", warp.rows());
}

#[test]
fn test_cost_decreases_and_converges() {
    let template = common::render(64, 64, common::scene);
    let target = common::render_shifted(64, 64, common::scene, 1.3, -0.7);
    let solution = solve_forward_additive(
        &TranslationModel,
        &template,
        &target,
        &rect(),
        SVector::<f64, 2>::zeros(),
        &RobustConfig::from(Estimator::None),
        &TrackerConfig::default(),
    )
    .unwrap();

    assert!(solution.converged);
    assert!(solution.iterations <= 10, "took {} iterations", solution.iterations);
    for pair in solution.cost_history.windows(2) {
        assert!(pair[1] <= pair[0], "cost rose: {:?}", solution.cost_history);
    }
}

#[test]
fn test_single_iteration_returns_best_effort() {
    let template = common::render(64, 64, common::scene);
    let target = common::render_shifted(64, 64, common::scene, 1.3, -0.7);
    let config = TrackerConfig {
        max_iterations: 1,
        ..TrackerConfig::default()
    };
    let t = track_translation(&template, &target, &rect(), &config).unwrap();
    assert!(t.dx.is_finite() && t.dy.is_finite());
    assert!(t.dx > 0.0 && t.dy < 0.0, "first step heads the right way: {t:?}");
}

#[test]
fn test_rect_partially_outside_is_clamped() {
    let image = common::render(64, 64, common::scene);
    let r = Rect::new(-10.0, -5.0, 30.0, 25.0);
    let t = track_translation(&image, &image, &r, &TrackerConfig::default()).unwrap();
    assert!(t.norm() < 1e-9, "{t:?}");
}

#[test]
fn test_flat_image_yields_zero_motion() {
    let flat = Array2::from_elem((32, 32), 0.5);
    let r = Rect::new(4.0, 4.0, 28.0, 28.0);
    let t = track_translation(&flat, &flat, &r, &TrackerConfig::default()).unwrap();
    assert!(t.norm() < 1e-9, "{t:?}");
}

#[test]
fn test_degenerate_rect_still_tracks() {
    let image = common::render(64, 64, common::scene);
    let point = Rect::new(20.0, 22.0, 20.0, 22.0);
    let t = track_translation(&image, &image, &point, &TrackerConfig::default()).unwrap();
    assert!(t.dx.is_finite() && t.dy.is_finite());
}

#[test]
fn test_different_target_size_is_accepted() {
    let template = common::render(64, 64, common::scene);
    let target = common::render(80, 72, common::scene);
    let t = track_translation(&template, &target, &rect(), &TrackerConfig::default()).unwrap();
    assert!(t.norm() < 1e-6, "{t:?}");
}

#[test]
fn test_empty_image_is_rejected() {
    let image = common::render(64, 64, common::scene);
    let empty = Array2::<f64>::zeros((0, 10));
    let err = track_translation(&empty, &image, &rect(), &TrackerConfig::default()).unwrap_err();
    assert!(matches!(err, TrackError::InvalidDimensions { .. }), "{err:?}");
    let err = track_translation(&image, &empty, &rect(), &TrackerConfig::default()).unwrap_err();
    assert!(matches!(err, TrackError::InvalidDimensions { .. }), "{err:?}");
}

#[test]
fn test_non_finite_rect_is_rejected() {
    let image = common::render(64, 64, common::scene);
    let r = Rect::new(f64::NAN, 0.0, 10.0, 10.0);
    let err = track_translation(&image, &image, &r, &TrackerConfig::default()).unwrap_err();
    assert!(matches!(err, TrackError::InvalidRect(_)), "{err:?}");
}

#[test]
fn test_invalid_tracker_config_is_rejected() {
    let image = common::render(64, 64, common::scene);
    let zero_iterations = TrackerConfig {
        max_iterations: 0,
        ..TrackerConfig::default()
    };
    let err = track_translation(&image, &image, &rect(), &zero_iterations).unwrap_err();
    assert!(matches!(err, TrackError::InvalidConfig(_)), "{err:?}");

    let negative = TrackerConfig {
        threshold: -1.0,
        ..TrackerConfig::default()
    };
    assert!(track_translation(&image, &image, &rect(), &negative).is_err());
}

#[test]
fn test_nan_pixel_is_rejected() {
    let clean = common::render(64, 64, common::scene);
    let mut broken = clean.clone();
    broken[[30, 30]] = f64::NAN;
    let config = TrackerConfig::default();

    let err = track_translation(&broken, &clean, &rect(), &config).unwrap_err();
    assert_eq!(err, TrackError::NonFiniteImage { row: 30, col: 30 });
    let err = track_affine(&clean, &broken, &rect(), &config).unwrap_err();
    assert_eq!(err, TrackError::NonFiniteImage { row: 30, col: 30 });

    let err = track_translation_pyramidal(
        &clean,
        &broken,
        &rect(),
        &PyramidConfig::default(),
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, TrackError::NonFiniteImage { .. }), "{err:?}");
}

#[test]
fn test_overflowing_intensities_return_finite_estimate() {
    let board = Array2::from_shape_fn((32, 32), |(r, c)| {
        if (r + c) % 2 == 0 {
            1e200
        } else {
            -1e200
        }
    });
    let r = Rect::new(4.0, 4.0, 28.0, 28.0);
    let config = TrackerConfig::default();

    let t = track_translation(&board, &board, &r, &config).unwrap();
    assert!(t.dx.is_finite() && t.dy.is_finite(), "{t:?}");

    for warp in [
        track_affine(&board, &board, &r, &config).unwrap(),
        track_affine_inverse_compositional(&board, &board, &r, &config).unwrap(),
    ] {
        assert!(
            warp.rows().iter().flatten().all(|v| v.is_finite()),
            "{:?}",
            warp.rows()
        );
    }
}
