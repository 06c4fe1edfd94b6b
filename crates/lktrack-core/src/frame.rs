use std::str::FromStr;

use ndarray::Array2;
use num_traits::AsPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackError};

/// A single grayscale frame of a tracked sequence.
///
/// Intensities are stored as `f64`; the trackers never rescale them, so the
/// robust-estimator thresholds are expressed in the same units as the pixels.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Pixel data, row-major, shape = (height, width)
    pub data: Array2<f64>,
    /// Position of the frame in its sequence
    pub index: usize,
}

impl Frame {
    pub fn new(data: Array2<f64>, index: usize) -> Self {
        Self { data, index }
    }

    /// Convert any primitive pixel array (u8, u16, f32, ...) into a frame.
    pub fn from_pixels<T>(pixels: &Array2<T>, index: usize) -> Self
    where
        T: AsPrimitive<f64>,
    {
        Self::new(pixels.mapv(|v| v.as_()), index)
    }

    pub fn width(&self) -> usize {
        self.data.ncols()
    }

    pub fn height(&self) -> usize {
        self.data.nrows()
    }
}

/// Reject images that have no samples along either axis.
pub fn ensure_non_empty(data: &Array2<f64>) -> Result<()> {
    let (h, w) = data.dim();
    if h == 0 || w == 0 {
        return Err(TrackError::InvalidDimensions {
            width: w,
            height: h,
        });
    }
    Ok(())
}

/// Reject images holding NaN or infinite samples.
pub fn ensure_finite(data: &Array2<f64>) -> Result<()> {
    match data.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), _)) => Err(TrackError::NonFiniteImage { row, col }),
        None => Ok(()),
    }
}

/// Reject empty or non-finite images.
pub fn ensure_valid_image(data: &Array2<f64>) -> Result<()> {
    ensure_non_empty(data)?;
    ensure_finite(data)
}

/// Axis-aligned rectangle `(x1, y1)`-`(x2, y2)` in pixel coordinates.
///
/// Corners are inclusive and may be given in any order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Rect {
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn validate(&self) -> Result<()> {
        if [self.x1, self.y1, self.x2, self.y2]
            .iter()
            .all(|v| v.is_finite())
        {
            Ok(())
        } else {
            Err(TrackError::InvalidRect(format!(
                "non-finite corner in {self}"
            )))
        }
    }

    pub fn width(&self) -> f64 {
        (self.x2 - self.x1).abs()
    }

    pub fn height(&self) -> f64 {
        (self.y2 - self.y1).abs()
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x1 + dx, self.y1 + dy, self.x2 + dx, self.y2 + dy)
    }

    pub fn scaled(&self, s: f64) -> Self {
        Self::new(self.x1 * s, self.y1 * s, self.x2 * s, self.y2 * s)
    }

    /// Clamp every corner into a `width` x `height` image and sort the
    /// corners so that `x1 <= x2` and `y1 <= y2`.
    pub fn clamped(&self, width: usize, height: usize) -> Self {
        let max_x = width.saturating_sub(1) as f64;
        let max_y = height.saturating_sub(1) as f64;
        let xa = self.x1.clamp(0.0, max_x);
        let xb = self.x2.clamp(0.0, max_x);
        let ya = self.y1.clamp(0.0, max_y);
        let yb = self.y2.clamp(0.0, max_y);
        Self::new(xa.min(xb), ya.min(yb), xa.max(xb), ya.max(yb))
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({:.2}, {:.2})-({:.2}, {:.2})",
            self.x1, self.y1, self.x2, self.y2
        )
    }
}

impl FromStr for Rect {
    type Err = TrackError;

    /// Parse `"x1,y1,x2,y2"`.
    fn from_str(s: &str) -> Result<Self> {
        let values: Vec<f64> = s
            .split(',')
            .map(|part| part.trim().parse::<f64>())
            .collect::<std::result::Result<_, _>>()
            .map_err(|e| TrackError::InvalidRect(format!("{s:?}: {e}")))?;
        match values.as_slice() {
            &[x1, y1, x2, y2] => {
                let rect = Rect::new(x1, y1, x2, y2);
                rect.validate()?;
                Ok(rect)
            }
            _ => Err(TrackError::InvalidRect(format!(
                "{s:?}: expected four comma-separated values"
            ))),
        }
    }
}

/// Translation of the tracked patch, in pixels of the full-resolution image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub dx: f64,
    pub dy: f64,
}

impl Translation {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }

    pub fn norm(&self) -> f64 {
        self.dx.hypot(self.dy)
    }
}
