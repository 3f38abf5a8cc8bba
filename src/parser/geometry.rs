//! Page geometry derivation.
//!
//! A session carries no page count and no page height. Width comes from the
//! reflow state, the aspect ratio from the paper identifier, and the page
//! count from the lowest ink point.

use crate::error::{Error, Result};
use crate::graph::schema::{self, keys, ReflowKind, PAPER_NOT_RENDERABLE};
use crate::graph::{access, access_from, class_name, GraphStore, SchemaIndices};
use crate::model::DocumentDescriptor;

use super::ink::InkOverlay;
use super::options::{ErrorMode, ParseOptions};

/// Derives the [`DocumentDescriptor`] of a session.
#[derive(Debug, Clone, Copy)]
pub struct DocumentGeometry<'a> {
    store: &'a GraphStore,
    schema: &'a SchemaIndices,
    options: &'a ParseOptions,
}

impl<'a> DocumentGeometry<'a> {
    /// Create a geometry reader.
    pub fn new(store: &'a GraphStore, schema: &'a SchemaIndices, options: &'a ParseOptions) -> Self {
        Self {
            store,
            schema,
            options,
        }
    }

    /// Page width in document units.
    ///
    /// Only a locked layout declares a usable width. Reflowable layouts fall
    /// back to the default width; widths below 1 are clamped to it.
    pub fn page_width(&self) -> Result<f64> {
        let default = self.options.default_page_width;

        let reflow = match access(
            self.store,
            self.schema.layout_info,
            &[keys::REFLOW_STATE.into()],
        )
        .and_then(|leaf| leaf.into_node())
        {
            Ok(node) => node,
            Err(e) => return self.recover("reflow state", e.into(), default),
        };

        let kind = match class_name(self.store, reflow) {
            Ok(name) => ReflowKind::from_class_name(name),
            Err(e) => {
                log::warn!("Reflow state has no class name: {}", e);
                ReflowKind::Unknown(String::new())
            }
        };

        let declared = access_from(self.store, reflow, &[keys::PAGE_WIDTH.into()])
            .and_then(|leaf| leaf.into_real());

        let width = match kind {
            ReflowKind::Locked => match declared {
                Ok(width) => width,
                Err(e) => return self.recover("page width", e.into(), default),
            },
            ReflowKind::Reflowable => {
                log::warn!(
                    "Text layout is still reflowable, using default width {}",
                    default
                );
                return Ok(default);
            }
            ReflowKind::Unknown(name) => {
                log::warn!("Unknown reflow state '{}', reading width best-effort", name);
                declared.unwrap_or(default)
            }
        };

        if !(width >= 1.0) {
            log::warn!("Setting invalid width {} to {}", width, default);
            return Ok(default);
        }
        Ok(width)
    }

    /// Page aspect ratio (height / width).
    ///
    /// Unknown and not-renderable paper identifiers use the default ratio.
    pub fn page_ratio(&self) -> Result<f64> {
        let default = self.options.default_page_ratio;

        let identifier = match access(
            self.store,
            self.schema.general_info,
            &[
                keys::PAPER_LAYOUT.into(),
                keys::PAPER_ATTRIBUTES.into(),
                keys::PAPER_IDENTIFIER.into(),
            ],
        )
        .and_then(|leaf| leaf.into_str())
        {
            Ok(identifier) => identifier,
            Err(e) => return self.recover("paper identifier", e.into(), default),
        };

        if identifier == PAPER_NOT_RENDERABLE {
            log::warn!(
                "Paper '{}' identifies as not renderable, using ratio {}",
                identifier,
                default
            );
            return Ok(default);
        }

        match schema::paper_ratio(identifier) {
            Some(ratio) => Ok(ratio),
            None => {
                log::warn!(
                    "{}",
                    Error::UnknownSchemaValue(format!("paper identifier '{}'", identifier))
                );
                Ok(default)
            }
        }
    }

    /// Number of pages needed to show all ink.
    pub fn page_count(ink: Option<&InkOverlay>, page_height: f64) -> u32 {
        let max_y = ink.map(InkOverlay::max_y).unwrap_or(0.0);
        page_count_for(max_y, page_height)
    }

    /// Derive the full descriptor.
    pub fn descriptor(&self, ink: Option<&InkOverlay>) -> Result<DocumentDescriptor> {
        let width = self.page_width()?;
        let ratio = self.page_ratio()?;
        let count = Self::page_count(ink, width * ratio);

        let descriptor = DocumentDescriptor::new(width, ratio, count);
        log::debug!(
            "Page size {}x{}, {} pages",
            descriptor.page_width,
            descriptor.page_height,
            descriptor.page_count
        );
        Ok(descriptor)
    }

    fn recover(&self, what: &str, err: Error, default: f64) -> Result<f64> {
        match self.options.error_mode {
            ErrorMode::Strict => Err(err),
            ErrorMode::Lenient => {
                log::warn!("Cannot read {} ({}), using {}", what, err, default);
                Ok(default)
            }
        }
    }
}

/// `floor(max_y / page_height) + 1`, never less than one page.
pub fn page_count_for(max_y: f64, page_height: f64) -> u32 {
    if !(page_height > 0.0) || !max_y.is_finite() || max_y <= 0.0 {
        return 1;
    }
    ((max_y / page_height).floor() as u32).saturating_add(1)
}
