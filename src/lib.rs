//! # unnote
//!
//! Decoding and pagination of handwritten-note containers.
//!
//! A note is a zip archive holding a serialized object graph (the session)
//! plus media files. This library decodes the graph, derives the page
//! geometry of the note's single tall canvas, and turns each page into a
//! draw list of ink strokes, placed images and styled text runs.
//!
//! ## Quick Start
//!
//! ```no_run
//! use unnote::{open, RenderOptions};
//!
//! fn main() -> unnote::Result<()> {
//!     let doc = open("lecture.note")?;
//!     println!("{} pages", doc.page_count());
//!
//!     let (width, height) = doc.page_size(0)?;
//!     let list = doc.render_page(0, &RenderOptions::default())?;
//!     println!("{}x{}: {} instructions", width, height, list.len());
//!
//!     doc.close();
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Ink**: strokes decoded from the handwriting overlay arrays
//! - **Media**: PNG/JPEG images decoded and premultiplied for compositing
//! - **Text**: attributed text runs with font and colour
//! - **Parallel rendering**: Rayon across pages of one document

pub mod container;
pub mod detect;
pub mod error;
pub mod graph;
pub mod model;
pub mod parser;
pub mod render;

#[cfg(feature = "ffi")]
pub mod ffi;

pub use container::NoteArchive;
pub use detect::{detect_format_from_bytes, detect_format_from_path, is_note, NoteFormat};
pub use error::{Error, Result};
pub use model::{DocumentDescriptor, Metadata, PageSpan, RenderableStroke, Rgba8, TextRun};
pub use parser::{ErrorMode, NoteDocument, OverlapPolicy, Page, ParseOptions};
pub use render::{
    render_page, render_pages, DrawInstruction, DrawList, JsonFormat, Layers, PageSelection,
    RenderOptions, Surface,
};

use std::io::Read;
use std::path::Path;

/// Open a note file.
///
/// # Example
///
/// ```no_run
/// let doc = unnote::open("lecture.note").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn open<P: AsRef<Path>>(path: P) -> Result<NoteDocument> {
    NoteDocument::open(path)
}

/// Open a note file with custom options.
///
/// # Example
///
/// ```no_run
/// use unnote::{open_with_options, ParseOptions};
///
/// let options = ParseOptions::new().lenient().sequential();
/// let doc = open_with_options("lecture.note", options).unwrap();
/// ```
pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<NoteDocument> {
    NoteDocument::open_with_options(path, options)
}

/// Open a note held in memory.
pub fn open_bytes(data: Vec<u8>) -> Result<NoteDocument> {
    NoteDocument::from_bytes(data)
}

/// Open a note held in memory with custom options.
pub fn open_bytes_with_options(data: Vec<u8>, options: ParseOptions) -> Result<NoteDocument> {
    NoteDocument::from_bytes_with_options(data, options)
}

/// Open a note from a reader.
pub fn open_reader<R: Read>(reader: R) -> Result<NoteDocument> {
    NoteDocument::from_reader(reader)
}

/// Open a note file without blocking the async runtime on file I/O.
#[cfg(feature = "async")]
pub async fn open_async<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<NoteDocument> {
    let data = tokio::fs::read(path.as_ref()).await?;
    NoteDocument::from_bytes_with_options(data, options)
}

/// Render one page of a note file to JSON.
///
/// # Example
///
/// ```no_run
/// use unnote::{page_to_json, JsonFormat};
///
/// let json = page_to_json("lecture.note", 0, JsonFormat::Pretty).unwrap();
/// std::fs::write("page1.json", json).unwrap();
/// ```
pub fn page_to_json<P: AsRef<Path>>(path: P, page_index: u32, format: JsonFormat) -> Result<String> {
    let doc = open(path)?;
    let list = doc.render_page(page_index, &RenderOptions::default())?;
    render::to_json(&list, format)
}
