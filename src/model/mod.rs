//! Document model types for note content.
//!
//! The descriptor is computed once at open. Strokes, media objects and text
//! runs are transient: they are rebuilt from the object graph on every
//! render call and dropped when it returns.

mod document;
mod media;
mod page;
mod stroke;
mod text;

pub use document::{DocumentDescriptor, Metadata, MetadataValue};
pub use media::{ImageObject, MediaObject, PlacedImage, TextBlockObject};
pub use page::PageSpan;
pub use stroke::{RenderableStroke, Rgba8, Stroke};
pub use text::{PlacedRun, Rgb, TextRun, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE};
