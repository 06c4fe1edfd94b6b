use ndarray::Array2;

/// Gaussian blobs `(cx, cy, sigma, amplitude)` of the small test scene.
const BLOBS: [(f64, f64, f64, f64); 5] = [
    (20.0, 22.0, 6.0, 0.9),
    (42.0, 18.0, 5.0, -0.6),
    (30.0, 40.0, 7.0, 0.7),
    (48.0, 44.0, 4.5, 0.5),
    (14.0, 46.0, 5.0, -0.4),
];

/// Broad blobs of the large scene used for pyramid tests.
const BIG_BLOBS: [(f64, f64, f64, f64); 5] = [
    (50.0, 56.0, 12.0, 1.0),
    (82.0, 48.0, 10.0, -0.7),
    (66.0, 84.0, 14.0, 0.8),
    (96.0, 92.0, 9.0, 0.6),
    (36.0, 92.0, 10.0, -0.5),
];

fn blob_sum(blobs: &[(f64, f64, f64, f64)], x: f64, y: f64) -> f64 {
    blobs
        .iter()
        .map(|&(cx, cy, s, a)| {
            let d2 = (x - cx).powi(2) + (y - cy).powi(2);
            a * (-d2 / (2.0 * s * s)).exp()
        })
        .sum()
}

/// Smooth intensity field on a gentle ramp, values roughly in [0, 1].
pub fn scene(x: f64, y: f64) -> f64 {
    0.2 + 0.002 * x + 0.001 * y + blob_sum(&BLOBS, x, y)
}

/// Broad blobs overlaid with a fine checker texture that defeats
/// single-level tracking for large shifts.
pub fn textured_scene(x: f64, y: f64) -> f64 {
    let texture = 0.25
        * (std::f64::consts::TAU * x / 5.0).sin()
        * (std::f64::consts::TAU * y / 6.0).sin();
    0.3 + blob_sum(&BIG_BLOBS, x, y) + texture
}

/// Sample `f` at every integer pixel of an `h` x `w` image.
pub fn render(h: usize, w: usize, f: impl Fn(f64, f64) -> f64) -> Array2<f64> {
    Array2::from_shape_fn((h, w), |(r, c)| f(c as f64, r as f64))
}

/// Render the scene as it appears after moving by `(dx, dy)`.
pub fn render_shifted(
    h: usize,
    w: usize,
    f: impl Fn(f64, f64) -> f64,
    dx: f64,
    dy: f64,
) -> Array2<f64> {
    render(h, w, |x, y| f(x - dx, y - dy))
}

/// Render the scene as it appears after the affine map `m` (2x3, rows),
/// i.e. `target(m * p) = scene(p)`.
pub fn render_affine(
    h: usize,
    w: usize,
    f: impl Fn(f64, f64) -> f64,
    m: [[f64; 3]; 2],
) -> Array2<f64> {
    let [[a, b, tx], [c, d, ty]] = m;
    let det = a * d - b * c;
    render(h, w, |u, v| {
        let (du, dv) = (u - tx, v - ty);
        let x = (d * du - b * dv) / det;
        let y = (-c * du + a * dv) / det;
        f(x, y)
    })
}

/// Largest absolute element-wise difference between two 2x3 matrices.
pub fn max_abs_diff(a: [[f64; 3]; 2], b: [[f64; 3]; 2]) -> f64 {
    a.iter()
        .flatten()
        .zip(b.iter().flatten())
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}
