//! Note document opening and per-page content queries.

use std::fmt;
use std::io::{Cursor, Read};
use std::path::Path;
use std::sync::Arc;

use kurbo::Point;

use crate::container::NoteArchive;
use crate::error::{Error, Result};
use crate::graph::{schema, GraphNode, GraphStore, SchemaIndices};
use crate::model::{
    DocumentDescriptor, ImageObject, MediaObject, Metadata, MetadataValue, PageSpan, PlacedImage,
    PlacedRun, RenderableStroke, TextBlockObject,
};
use crate::render::{self, DrawList, RenderOptions};

use super::geometry::DocumentGeometry;
use super::image::ImageDecoder;
use super::ink::InkOverlay;
use super::media::MediaResolver;
use super::options::{ErrorMode, ParseOptions};
use super::text::{layout_runs, runs_on_page, LineBreakMeasure, TextMeasure, TextRunResolver};

/// An open note.
///
/// Owns the container handle and the decoded object graph. Both are
/// read-only after [`NoteDocument::open`] returns, so pages may be rendered
/// concurrently.
pub struct NoteDocument {
    archive: NoteArchive,
    store: GraphStore,
    schema: &'static SchemaIndices,
    descriptor: DocumentDescriptor,
    metadata: Metadata,
    options: ParseOptions,
    measure: Arc<dyn TextMeasure>,
}

impl fmt::Debug for NoteDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteDocument")
            .field("archive", &self.archive)
            .field("objects", &self.store.len())
            .field("schema", &self.schema.revision)
            .field("descriptor", &self.descriptor)
            .field("options", &self.options)
            .finish()
    }
}

impl NoteDocument {
    /// Open a note file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a note file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Opening note {}", path.display());
        Self::from_archive(NoteArchive::open(path)?, options)
    }

    /// Open a note held in memory.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Open a note held in memory with custom options.
    pub fn from_bytes_with_options(data: Vec<u8>, options: ParseOptions) -> Result<Self> {
        Self::from_archive(NoteArchive::from_bytes(data)?, options)
    }

    /// Open a note from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Open a note from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(data, options)
    }

    /// Decode the session of an open container and derive its geometry.
    pub fn from_archive(archive: NoteArchive, options: ParseOptions) -> Result<Self> {
        let store = GraphStore::load(&archive.session()?)?;
        let schema = schema::detect(&store)?;

        let ink = match InkOverlay::load(&store, schema) {
            Ok(ink) => ink,
            Err(e) if options.error_mode == ErrorMode::Lenient => {
                log::warn!("Cannot read handwriting overlay ({}), assuming no ink", e);
                None
            }
            Err(e) => return Err(e),
        };
        let descriptor = DocumentGeometry::new(&store, schema, &options).descriptor(ink.as_ref())?;
        let metadata = read_metadata(&archive, &store, schema);

        Ok(Self {
            archive,
            store,
            schema,
            descriptor,
            metadata,
            options,
            measure: Arc::new(LineBreakMeasure),
        })
    }

    /// Replace the line-counting strategy used for text layout.
    pub fn with_text_measure(mut self, measure: Arc<dyn TextMeasure>) -> Self {
        self.measure = measure;
        self
    }

    /// Page geometry.
    pub fn descriptor(&self) -> &DocumentDescriptor {
        &self.descriptor
    }

    /// Document metadata.
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Options the document was opened with.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// The decoded object graph.
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Schema revision in use.
    pub fn schema(&self) -> &SchemaIndices {
        self.schema
    }

    /// The underlying container.
    pub fn archive(&self) -> &NoteArchive {
        &self.archive
    }

    /// Number of pages.
    pub fn page_count(&self) -> u32 {
        self.descriptor.page_count
    }

    /// Size of a page as (width, height). All pages share one size.
    pub fn page_size(&self, page_index: u32) -> Result<(f64, f64)> {
        self.check_page(page_index)?;
        Ok(self.descriptor.page_size())
    }

    /// Get a page (0-indexed).
    pub fn page(&self, page_index: u32) -> Result<Page<'_>> {
        self.check_page(page_index)?;
        Ok(Page {
            document: self,
            index: page_index,
            span: self.descriptor.span(page_index),
        })
    }

    /// Iterate over all pages.
    pub fn pages(&self) -> impl Iterator<Item = Page<'_>> + '_ {
        (0..self.page_count()).map(move |index| Page {
            document: self,
            index,
            span: self.descriptor.span(index),
        })
    }

    /// Render a page (0-indexed) into a draw list.
    pub fn render_page(&self, page_index: u32, options: &RenderOptions) -> Result<DrawList> {
        render::render_page(self, page_index, options)
    }

    /// Release the container and all decoded state.
    pub fn close(self) {
        log::debug!("Closing note '{}'", self.metadata.title);
    }

    fn check_page(&self, page_index: u32) -> Result<()> {
        if self.descriptor.contains_page(page_index) {
            Ok(())
        } else {
            Err(Error::PageOutOfRange(page_index, self.descriptor.page_count))
        }
    }

    fn ink(&self) -> Option<InkOverlay> {
        match InkOverlay::load(&self.store, self.schema) {
            Ok(ink) => ink,
            Err(e) => {
                log::warn!("Cannot read handwriting overlay: {}", e);
                None
            }
        }
    }
}

/// One page of an open note.
///
/// Borrows its document; all content is recomputed from the graph on each
/// query.
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    document: &'a NoteDocument,
    index: u32,
    span: PageSpan,
}

impl<'a> Page<'a> {
    /// Page index (0-indexed).
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Vertical span in document coordinates.
    pub fn span(&self) -> PageSpan {
        self.span
    }

    /// Page size as (width, height).
    pub fn size(&self) -> (f64, f64) {
        self.document.descriptor.page_size()
    }

    /// The owning document.
    pub fn document(&self) -> &'a NoteDocument {
        self.document
    }

    /// Ink strokes visible on this page, in paint order.
    pub fn strokes(&self) -> Vec<RenderableStroke> {
        let strokes = self
            .document
            .ink()
            .map(|ink| ink.strokes_for_page(self.span))
            .unwrap_or_default();
        log::trace!("Page {}: {} strokes", self.index, strokes.len());
        strokes
    }

    /// Media objects assigned to this page.
    pub fn media_objects(&self) -> Vec<MediaObject<'a>> {
        let doc = self.document;
        MediaResolver::new(&doc.store, doc.schema).objects_overlapping(self.span, doc.options.overlap)
    }

    /// Decode an image object for this page.
    pub fn image(&self, object: &ImageObject) -> Result<Option<PlacedImage>> {
        ImageDecoder::new(&self.document.archive).decode(object, self.span)
    }

    /// Placed runs of a text block that fall on this page, in page-local
    /// coordinates.
    pub fn text_block(&self, block: &TextBlockObject<'a>) -> Result<Vec<PlacedRun>> {
        self.place_text(block.text_store, block.origin, block.size.width)
    }

    /// Placed runs of the global text store that fall on this page.
    pub fn global_text(&self) -> Result<Vec<PlacedRun>> {
        let doc = self.document;
        match TextRunResolver::new(&doc.store).global_store(doc.schema)? {
            Some(text_store) => {
                self.place_text(text_store, Point::ORIGIN, doc.descriptor.page_width)
            }
            None => Ok(Vec::new()),
        }
    }

    fn place_text(
        &self,
        text_store: &'a GraphNode,
        origin: Point,
        max_width: f64,
    ) -> Result<Vec<PlacedRun>> {
        let doc = self.document;
        let runs = TextRunResolver::new(&doc.store).runs(text_store)?;
        let placed = layout_runs(runs, origin, max_width, doc.measure.as_ref());
        Ok(runs_on_page(placed, self.span)
            .into_iter()
            .map(|mut placed| {
                placed.y = self.span.to_local(placed.y);
                placed
            })
            .collect())
    }
}

fn read_metadata(archive: &NoteArchive, store: &GraphStore, schema: &SchemaIndices) -> Metadata {
    let mut metadata = Metadata {
        title: archive.root().to_string(),
        archiver: store.archiver().map(str::to_string),
        archive_version: store.version(),
        schema_revision: schema.revision,
        entry_count: archive.entry_count(),
        ..Default::default()
    };

    let data = match archive.metadata() {
        Ok(Some(data)) => data,
        Ok(None) => return metadata,
        Err(e) => {
            log::warn!("Cannot read metadata: {}", e);
            return metadata;
        }
    };

    match plist::Value::from_reader(Cursor::new(data)) {
        Ok(plist::Value::Dictionary(dict)) => {
            for (key, value) in dict {
                if let Some(value) = metadata_value(value) {
                    metadata.properties.insert(key, value);
                }
            }
        }
        Ok(_) => log::warn!("Metadata root is not a dictionary"),
        Err(e) => log::warn!("Cannot decode metadata: {}", e),
    }
    metadata
}

fn metadata_value(value: plist::Value) -> Option<MetadataValue> {
    match value {
        plist::Value::String(s) => Some(MetadataValue::String(s)),
        plist::Value::Integer(i) => i.as_signed().map(MetadataValue::Integer),
        plist::Value::Real(r) => Some(MetadataValue::Real(r)),
        plist::Value::Boolean(b) => Some(MetadataValue::Bool(b)),
        plist::Value::Date(d) => Some(MetadataValue::Date(
            std::time::SystemTime::from(d).into(),
        )),
        _ => None,
    }
}
