//! Ink stroke types.

use kurbo::BezPath;
use serde::{Deserialize, Serialize};

/// An 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba8 {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Rgba8 {
    /// Opaque black, used when a stroke has no colour entry.
    pub const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 255);

    /// Create a colour from its components.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Read a colour from 4 RGBA bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        match bytes {
            [r, g, b, a, ..] => Some(Self::new(*r, *g, *b, *a)),
            _ => None,
        }
    }

    /// Components as floats in [0, 1].
    pub fn to_f32(self) -> [f32; 4] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            f32::from(self.a) / 255.0,
        ]
    }
}

/// One stroke as stored in the ink overlay, in document coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke<'a> {
    /// Interleaved x,y coordinates
    pub points: &'a [f32],

    /// Line width
    pub width: f32,

    /// Stroke colour
    pub color: Rgba8,
}

impl Stroke<'_> {
    /// Number of points in the stroke.
    pub fn point_count(&self) -> usize {
        self.points.len() / 2
    }

    /// Iterate over (x, y) pairs.
    pub fn iter_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .chunks_exact(2)
            .map(|p| (f64::from(p[0]), f64::from(p[1])))
    }
}

/// The part of a stroke visible on one page, in page-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderableStroke {
    /// Polyline: one move-to followed by line-tos
    pub path: BezPath,

    /// Line width
    pub width: f64,

    /// Stroke colour
    pub color: Rgba8,
}
