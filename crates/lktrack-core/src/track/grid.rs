//! Fixed sample positions inside the template rectangle.

use crate::frame::Rect;
use crate::interp::Sampler;

/// Evenly spaced sample coordinates covering a clamped rectangle.
///
/// Column count is `floor(x2 - x1) + 1` (at least one), spanning `x1..=x2`;
/// rows likewise. Points are visited row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleGrid {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl SampleGrid {
    /// Clamp `rect` into a `width` x `height` image and lay out the grid.
    pub fn new(rect: &Rect, width: usize, height: usize) -> Self {
        let r = rect.clamped(width, height);
        Self {
            xs: linspace(r.x1, r.width()),
            ys: linspace(r.y1, r.height()),
        }
    }

    pub fn columns(&self) -> usize {
        self.xs.len()
    }

    pub fn rows(&self) -> usize {
        self.ys.len()
    }

    pub fn len(&self) -> usize {
        self.xs.len() * self.ys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.ys
            .iter()
            .flat_map(move |&y| self.xs.iter().map(move |&x| (x, y)))
    }
}

/// `floor(span) + 1` points from `start` to `start + span` inclusive.
fn linspace(start: f64, span: f64) -> Vec<f64> {
    let count = (span.floor() as usize + 1).max(1);
    if count == 1 {
        return vec![start];
    }
    let step = span / (count - 1) as f64;
    (0..count).map(|i| start + step * i as f64).collect()
}

/// One template sample: position, intensity and intensity gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TemplateSample {
    pub x: f64,
    pub y: f64,
    pub value: f64,
    pub grad_x: f64,
    pub grad_y: f64,
}

/// Template intensities evaluated once on the sample grid.
#[derive(Clone, Debug)]
pub struct TemplatePatch {
    pub samples: Vec<TemplateSample>,
}

impl TemplatePatch {
    pub fn sample<S: Sampler>(template: &S, grid: &SampleGrid) -> Self {
        let samples = grid
            .points()
            .map(|(x, y)| {
                let (value, grad_x, grad_y) = template.value_and_gradient(x, y);
                TemplateSample {
                    x,
                    y,
                    value,
                    grad_x,
                    grad_y,
                }
            })
            .collect();
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
