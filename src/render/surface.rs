//! Drawing surface seam.
//!
//! A [`Surface`] receives the instructions of a [`DrawList`](super::DrawList)
//! in paint order. Hosts implement it over their 2D backend; all methods
//! default to doing nothing.
//!
//! # Example
//!
//! ```
//! use kurbo::BezPath;
//! use unnote::model::Rgba8;
//! use unnote::render::Surface;
//!
//! #[derive(Default)]
//! struct InkCounter(usize);
//!
//! impl Surface for InkCounter {
//!     fn stroke(&mut self, _path: &BezPath, _width: f64, _color: Rgba8) {
//!         self.0 += 1;
//!     }
//! }
//! ```

use kurbo::{Affine, BezPath, Point, Rect, Size};

use crate::model::{PlacedImage, Rgba8, TextRun};

/// Receiver of drawing instructions.
pub trait Surface {
    /// Called before the first instruction of a page.
    fn begin_page(&mut self, page_index: u32, page_size: Size, transform: Affine) {
        let _ = (page_index, page_size, transform);
    }

    /// Stroke a polyline.
    fn stroke(&mut self, path: &BezPath, width: f64, color: Rgba8) {
        let _ = (path, width, color);
    }

    /// Composite premultiplied RGBA8 pixels into a rectangle.
    fn image(&mut self, rect: Rect, image: &PlacedImage) {
        let _ = (rect, image);
    }

    /// Draw a run of text with its top-left corner at `origin`.
    fn text(&mut self, origin: Point, run: &TextRun, height: f64) {
        let _ = (origin, run, height);
    }

    /// Called after the last instruction of a page.
    fn end_page(&mut self, page_index: u32) {
        let _ = page_index;
    }
}

/// Event captured by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// Page started
    BeginPage(u32),
    /// Stroke with its point count and width
    Stroke {
        /// Number of path elements
        elements: usize,
        /// Line width
        width: f64,
    },
    /// Image with its target rectangle
    Image(Rect),
    /// Text run with its origin
    Text {
        /// Top-left corner
        origin: Point,
        /// Run text
        text: String,
    },
    /// Page finished
    EndPage(u32),
}

/// Surface that records what it is asked to draw.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    events: Vec<SurfaceEvent>,
}

impl RecordingSurface {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events in order.
    pub fn events(&self) -> &[SurfaceEvent] {
        &self.events
    }

    /// Take the recorded events.
    pub fn into_events(self) -> Vec<SurfaceEvent> {
        self.events
    }
}

impl Surface for RecordingSurface {
    fn begin_page(&mut self, page_index: u32, _page_size: Size, _transform: Affine) {
        self.events.push(SurfaceEvent::BeginPage(page_index));
    }

    fn stroke(&mut self, path: &BezPath, width: f64, _color: Rgba8) {
        self.events.push(SurfaceEvent::Stroke {
            elements: path.elements().len(),
            width,
        });
    }

    fn image(&mut self, rect: Rect, _image: &PlacedImage) {
        self.events.push(SurfaceEvent::Image(rect));
    }

    fn text(&mut self, origin: Point, run: &TextRun, _height: f64) {
        self.events.push(SurfaceEvent::Text {
            origin,
            text: run.text.clone(),
        });
    }

    fn end_page(&mut self, page_index: u32) {
        self.events.push(SurfaceEvent::EndPage(page_index));
    }
}
