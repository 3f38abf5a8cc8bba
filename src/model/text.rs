//! Attributed text types.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// Font family used when a run declares none.
pub const DEFAULT_FONT_FAMILY: &str = "Helvetica";

/// Font size used when a run declares none.
pub const DEFAULT_FONT_SIZE: f64 = 12.0;

/// An RGB colour with float components in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl Rgb {
    /// Black.
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };

    /// Create a colour, clamping every component to [0, 1].
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    /// A grey level.
    pub fn grey(level: f32) -> Self {
        Self::new(level, level, level)
    }
}

impl Default for Rgb {
    fn default() -> Self {
        Self::BLACK
    }
}

/// A run of text with uniform font and colour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    /// Byte range into the backing string
    pub range: Range<usize>,

    /// The run's text (NFC)
    pub text: String,

    /// Font family name
    pub font_family: String,

    /// Font size in document units
    pub font_size: f64,

    /// Text colour
    pub color: Rgb,
}

impl TextRun {
    /// Create a run with the default font and colour.
    pub fn new(range: Range<usize>, text: impl Into<String>) -> Self {
        Self {
            range,
            text: text.into(),
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            color: Rgb::BLACK,
        }
    }

    /// Set the font.
    pub fn with_font(mut self, family: impl Into<String>, size: f64) -> Self {
        self.font_family = family.into();
        self.font_size = size;
        self
    }

    /// Set the colour.
    pub fn with_color(mut self, color: Rgb) -> Self {
        self.color = color;
        self
    }

    /// Check if the run has no text.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// A run placed in document coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedRun {
    /// Left edge
    pub x: f64,

    /// Top edge in document coordinates
    pub y: f64,

    /// Rendered height (line count × font size)
    pub height: f64,

    /// The run
    pub run: TextRun,
}
