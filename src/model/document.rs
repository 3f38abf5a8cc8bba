//! Document-level types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::PageSpan;

/// Page geometry of an open note.
///
/// All pages share one size; there is no per-page variance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DocumentDescriptor {
    /// Page width in document units
    pub page_width: f64,

    /// Page height in document units (`page_width * page_ratio`)
    pub page_height: f64,

    /// Aspect ratio (height / width) derived from the paper identifier
    pub page_ratio: f64,

    /// Number of pages, derived from the lowest ink point
    pub page_count: u32,
}

impl DocumentDescriptor {
    /// Create a descriptor from width, ratio and page count.
    pub fn new(page_width: f64, page_ratio: f64, page_count: u32) -> Self {
        Self {
            page_width,
            page_height: page_width * page_ratio,
            page_ratio,
            page_count,
        }
    }

    /// Get page dimensions as (width, height) tuple.
    pub fn page_size(&self) -> (f64, f64) {
        (self.page_width, self.page_height)
    }

    /// Vertical span of a page (0-indexed).
    pub fn span(&self, page_index: u32) -> PageSpan {
        PageSpan::for_page(page_index, self.page_height)
    }

    /// Check if a 0-indexed page exists.
    pub fn contains_page(&self, page_index: u32) -> bool {
        page_index < self.page_count
    }
}

/// Document metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Note title (the archive root folder)
    pub title: String,

    /// Keyed archiver that wrote the session
    pub archiver: Option<String>,

    /// Archive format version
    pub archive_version: Option<u64>,

    /// Schema revision used to read the session
    pub schema_revision: u64,

    /// Number of entries in the container
    pub entry_count: usize,

    /// Top-level scalar entries of `metadata.plist`
    pub properties: BTreeMap<String, MetadataValue>,
}

impl Metadata {
    /// Get a string property.
    pub fn string(&self, key: &str) -> Option<&str> {
        match self.properties.get(key) {
            Some(MetadataValue::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Get a date property.
    pub fn date(&self, key: &str) -> Option<DateTime<Utc>> {
        match self.properties.get(key) {
            Some(MetadataValue::Date(d)) => Some(*d),
            _ => None,
        }
    }
}

/// A scalar metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Text
    String(String),
    /// Whole number
    Integer(i64),
    /// Floating point number
    Real(f64),
    /// Flag
    Bool(bool),
    /// Timestamp
    Date(DateTime<Utc>),
}
