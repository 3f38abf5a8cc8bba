//! Note parsing module.
//!
//! Opening a note decodes the session graph once and derives the page
//! geometry. Everything else (ink, media, text) is resolved per page.

mod geometry;
mod image;
mod ink;
mod media;
mod note_parser;
mod options;
mod text;

pub use geometry::{page_count_for, DocumentGeometry};
pub use image::{decode_image, ImageDecoder};
pub use ink::{InkOverlay, Strokes};
pub use media::{on_page, parse_composite, MediaResolver};
pub use note_parser::{NoteDocument, Page};
pub use options::{ErrorMode, OverlapPolicy, ParseOptions, DEFAULT_PAGE_RATIO, DEFAULT_PAGE_WIDTH};
pub use text::{
    layout_runs, runs_on_page, AttributeSet, LineBreakMeasure, TextMeasure, TextRunResolver,
};
