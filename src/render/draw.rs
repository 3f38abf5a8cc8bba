//! Draw lists: the per-page output of rendering.

use kurbo::{Affine, BezPath, Point, Rect, Size};
use serde::Serialize;

use crate::model::{PlacedImage, PlacedRun, RenderableStroke, Rgba8, TextRun};

use super::surface::Surface;

/// One drawing instruction in page-local coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawInstruction {
    /// Stroke a polyline
    Stroke {
        /// Move-to followed by line-tos
        path: BezPath,
        /// Line width
        width: f64,
        /// Stroke colour
        color: Rgba8,
    },
    /// Composite a decoded image
    Image {
        /// Target rectangle
        rect: Rect,
        /// Premultiplied pixels at the rectangle's logical size
        image: PlacedImage,
    },
    /// Draw one text run
    Text {
        /// Top-left corner of the run
        origin: Point,
        /// Styled text
        run: TextRun,
        /// Height the run occupies
        height: f64,
    },
}

impl From<RenderableStroke> for DrawInstruction {
    fn from(stroke: RenderableStroke) -> Self {
        DrawInstruction::Stroke {
            path: stroke.path,
            width: stroke.width,
            color: stroke.color,
        }
    }
}

impl From<PlacedImage> for DrawInstruction {
    fn from(image: PlacedImage) -> Self {
        DrawInstruction::Image {
            rect: image.rect,
            image,
        }
    }
}

impl From<PlacedRun> for DrawInstruction {
    fn from(placed: PlacedRun) -> Self {
        DrawInstruction::Text {
            origin: Point::new(placed.x, placed.y),
            run: placed.run,
            height: placed.height,
        }
    }
}

/// Instructions for one page, in paint order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawList {
    /// Page index (0-indexed)
    pub page_index: u32,

    /// Page size in document units
    pub page_size: Size,

    /// Page-to-surface transform
    pub transform: Affine,

    /// Instructions, later ones composite over earlier ones
    pub instructions: Vec<DrawInstruction>,
}

impl DrawList {
    /// Create an empty list.
    pub fn new(page_index: u32, page_size: Size) -> Self {
        Self {
            page_index,
            page_size,
            transform: Affine::IDENTITY,
            instructions: Vec::new(),
        }
    }

    /// Scale page coordinates onto a surface of the given size.
    pub fn with_target_size(mut self, target: Size) -> Self {
        self.transform = surface_transform(self.page_size, target);
        self
    }

    /// Append an instruction.
    pub fn push(&mut self, instruction: impl Into<DrawInstruction>) {
        self.instructions.push(instruction.into());
    }

    /// Number of instructions.
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Check if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Count stroke instructions.
    pub fn stroke_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| matches!(i, DrawInstruction::Stroke { .. }))
            .count()
    }

    /// Count image instructions.
    pub fn image_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| matches!(i, DrawInstruction::Image { .. }))
            .count()
    }

    /// Count text instructions.
    pub fn text_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| matches!(i, DrawInstruction::Text { .. }))
            .count()
    }

    /// Drive a drawing surface with this list.
    pub fn replay(&self, surface: &mut dyn Surface) {
        surface.begin_page(self.page_index, self.page_size, self.transform);
        for instruction in &self.instructions {
            match instruction {
                DrawInstruction::Stroke { path, width, color } => {
                    surface.stroke(path, *width, *color)
                }
                DrawInstruction::Image { rect, image } => surface.image(*rect, image),
                DrawInstruction::Text {
                    origin,
                    run,
                    height,
                } => surface.text(*origin, run, *height),
            }
        }
        surface.end_page(self.page_index);
    }
}

/// Per-axis scale from page units to surface units.
fn surface_transform(page: Size, target: Size) -> Affine {
    if page.width <= 0.0 || page.height <= 0.0 {
        return Affine::IDENTITY;
    }
    Affine::scale_non_uniform(target.width / page.width, target.height / page.height)
}
