//! Positioned media objects (images and text blocks).

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

use crate::graph::GraphNode;

/// A media object resolved from the graph for one render call.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaObject<'s> {
    /// Raster image stored in the container
    Image(ImageObject),
    /// Block of attributed text
    Text(TextBlockObject<'s>),
}

impl MediaObject<'_> {
    /// Top-left corner in document coordinates.
    pub fn origin(&self) -> Point {
        match self {
            MediaObject::Image(img) => img.origin,
            MediaObject::Text(text) => text.origin,
        }
    }

    /// Logical (unscaled) size.
    pub fn size(&self) -> Size {
        match self {
            MediaObject::Image(img) => img.size,
            MediaObject::Text(text) => text.size,
        }
    }

    /// Object-table index the object was read from.
    pub fn index(&self) -> usize {
        match self {
            MediaObject::Image(img) => img.index,
            MediaObject::Text(text) => text.index,
        }
    }

    /// Check if this is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, MediaObject::Image(_))
    }

    /// Check if this is a text block.
    pub fn is_text(&self) -> bool {
        matches!(self, MediaObject::Text(_))
    }
}

/// An image media object.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageObject {
    /// Object-table index
    pub index: usize,
    /// Top-left corner in document coordinates
    pub origin: Point,
    /// Logical size
    pub size: Size,
    /// Container path relative to the note root
    pub archive_path: String,
    /// The producing application lost the backing file
    pub is_missing: bool,
    /// JPEG when set, PNG otherwise
    pub is_jpeg: bool,
}

/// A text block media object.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlockObject<'s> {
    /// Object-table index
    pub index: usize,
    /// Top-left corner in document coordinates
    pub origin: Point,
    /// Logical size
    pub size: Size,
    /// Text store node backing the block
    pub text_store: &'s GraphNode,
}

/// A decoded image placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedImage {
    /// Target rectangle in page-local coordinates
    pub rect: Rect,

    /// Pixel width after resampling
    pub width: u32,

    /// Pixel height after resampling
    pub height: u32,

    /// Premultiplied RGBA8, row-major, tightly packed
    #[serde(skip)]
    pub rgba8_premul: Vec<u8>,
}

impl PlacedImage {
    /// Size of the pixel buffer in bytes.
    pub fn byte_len(&self) -> usize {
        self.rgba8_premul.len()
    }
}
