//! Rendering module: turns pages into draw lists.
//!
//! Paint order on a page is media objects (in list order), then the global
//! text store, then ink strokes (in stored order). A media object or text
//! run that fails to decode is logged and left out; it never fails the
//! page.

mod draw;
mod json;
mod options;
mod surface;

pub use draw::{DrawInstruction, DrawList};
pub use json::{to_json, JsonFormat};
pub use options::{Layers, PageSelection, RenderOptions};
pub use surface::{RecordingSurface, Surface, SurfaceEvent};

use kurbo::Size;
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::model::MediaObject;
use crate::parser::NoteDocument;

/// Render one page (0-indexed).
///
/// Printing requests are rejected with [`Error::NotImplemented`].
pub fn render_page(doc: &NoteDocument, page_index: u32, options: &RenderOptions) -> Result<DrawList> {
    if options.printing {
        return Err(Error::NotImplemented("printing and export output".to_string()));
    }

    let page = doc.page(page_index)?;
    let (width, height) = page.size();
    let mut list = DrawList::new(page_index, Size::new(width, height));
    if let Some(target) = options.target_size {
        list = list.with_target_size(target);
    }
    let layers = options.layers;

    if layers.images || layers.text {
        for object in page.media_objects() {
            match object {
                MediaObject::Image(image) if layers.images => match page.image(&image) {
                    Ok(Some(placed)) => list.push(placed),
                    Ok(None) => {}
                    Err(e) => log::warn!("Skipping image object {}: {}", image.index, e),
                },
                MediaObject::Text(block) if layers.text => match page.text_block(&block) {
                    Ok(runs) => runs.into_iter().for_each(|run| list.push(run)),
                    Err(e) => log::warn!("Skipping text object {}: {}", block.index, e),
                },
                _ => {}
            }
        }
    }

    if layers.text {
        match page.global_text() {
            Ok(runs) => runs.into_iter().for_each(|run| list.push(run)),
            Err(e) => log::warn!("Skipping global text: {}", e),
        }
    }

    if layers.ink {
        page.strokes().into_iter().for_each(|stroke| list.push(stroke));
    }

    log::trace!(
        "Page {}: {} strokes, {} images, {} text runs",
        page_index,
        list.stroke_count(),
        list.image_count(),
        list.text_count()
    );
    Ok(list)
}

/// Render every selected page.
///
/// Pages run in parallel when the document was opened with
/// [`ParseOptions::parallel`](crate::ParseOptions) set.
pub fn render_pages(doc: &NoteDocument, options: &RenderOptions) -> Result<Vec<DrawList>> {
    if options.printing {
        return Err(Error::NotImplemented("printing and export output".to_string()));
    }

    let selected: Vec<u32> = (0..doc.page_count())
        .filter(|index| options.page_selection.includes(index + 1))
        .collect();

    if doc.options().parallel {
        selected
            .into_par_iter()
            .map(|index| render_page(doc, index, options))
            .collect()
    } else {
        selected
            .into_iter()
            .map(|index| render_page(doc, index, options))
            .collect()
    }
}
