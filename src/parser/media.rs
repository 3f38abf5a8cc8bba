//! Media object enumeration and page assignment.

use std::sync::OnceLock;

use kurbo::{Point, Size};
use regex::Regex;

use crate::error::{Error, Result};
use crate::graph::schema::{classes, keys};
use crate::graph::{
    access, access_from, class_name, string_value, GraphNode, GraphStore, SchemaIndices,
};
use crate::model::{ImageObject, MediaObject, PageSpan, TextBlockObject};

use super::options::OverlapPolicy;

fn composite_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        let number = r"[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?";
        Regex::new(&format!(r"^\s*\{{\s*({number})\s*,\s*({number})\s*\}}\s*$")).ok()
    })
    .as_ref()
}

/// Parse a `{a, b}` composite string into its two numbers.
///
/// ```
/// use unnote::parser::parse_composite;
///
/// assert_eq!(parse_composite("{12.5, 7.25}").unwrap(), (12.5, 7.25));
/// assert!(parse_composite("{12.5, 7.25").is_err());
/// ```
pub fn parse_composite(text: &str) -> Result<(f64, f64)> {
    let malformed = || Error::Format(format!("malformed composite value '{}'", text));

    let caps = composite_regex()
        .and_then(|re| re.captures(text))
        .ok_or_else(malformed)?;
    let a = caps[1].parse::<f64>().map_err(|_| malformed())?;
    let b = caps[2].parse::<f64>().map_err(|_| malformed())?;
    Ok((a, b))
}

/// Enumerates the media objects of a session.
#[derive(Debug, Clone, Copy)]
pub struct MediaResolver<'s> {
    store: &'s GraphStore,
    schema: &'s SchemaIndices,
}

impl<'s> MediaResolver<'s> {
    /// Create a resolver.
    pub fn new(store: &'s GraphStore, schema: &'s SchemaIndices) -> Self {
        Self { store, schema }
    }

    /// Object-table indices of all media objects, in paint order.
    ///
    /// A session without a media list has no objects.
    pub fn object_refs(&self) -> Result<Vec<usize>> {
        let list = match access(
            self.store,
            self.schema.layout_info,
            &[keys::MEDIA_OBJECTS.into(), keys::NS_OBJECTS.into()],
        ) {
            Ok(leaf) => leaf.into_array()?,
            Err(e) if e.is_missing() => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(list
            .iter()
            .enumerate()
            .filter_map(|(i, item)| match item.uid().map(usize::try_from) {
                Some(Ok(index)) => Some(index),
                _ => {
                    log::warn!("Media list item {} is not an object reference", i);
                    None
                }
            })
            .collect())
    }

    /// Resolve one media object.
    ///
    /// Returns `Ok(None)` for classes this crate does not render.
    pub fn resolve_object(&self, index: usize) -> Result<Option<MediaObject<'s>>> {
        let node = access(self.store, index, &[])?.into_node()?;
        let class = class_name(self.store, node)?;

        let is_image = classes::IMAGE_MEDIA.iter().any(|c| *c == class);
        let is_text = classes::TEXT_MEDIA.iter().any(|c| *c == class);
        if !is_image && !is_text {
            log::info!(
                "{}",
                Error::UnknownSchemaValue(format!("media class '{}' (object {})", class, index))
            );
            return Ok(None);
        }

        let (x, y) = self.composite(node, keys::CONTENT_ORIGIN)?;
        let (width, height) = self.composite(node, keys::CONTENT_SIZE)?;
        let origin = Point::new(x, y);
        let size = Size::new(width, height);

        if is_image {
            let archive_path = self.string(node, keys::RELATIVE_PATH)?.to_string();
            let is_missing = self.flag(node, keys::IS_MISSING)?.unwrap_or(false);
            let is_jpeg = match self.flag(node, keys::IS_JPEG)? {
                Some(flag) => flag,
                None => has_jpeg_extension(&archive_path),
            };
            return Ok(Some(MediaObject::Image(ImageObject {
                index,
                origin,
                size,
                archive_path,
                is_missing,
                is_jpeg,
            })));
        }

        let text_store = access_from(self.store, node, &[keys::TEXT_STORE.into()])?.into_node()?;
        Ok(Some(MediaObject::Text(TextBlockObject {
            index,
            origin,
            size,
            text_store,
        })))
    }

    /// All renderable media objects. Objects that fail to resolve are
    /// logged and skipped.
    pub fn objects(&self) -> Vec<MediaObject<'s>> {
        let refs = match self.object_refs() {
            Ok(refs) => refs,
            Err(e) => {
                log::warn!("Cannot enumerate media objects: {}", e);
                return Vec::new();
            }
        };

        refs.into_iter()
            .filter_map(|index| match self.resolve_object(index) {
                Ok(object) => object,
                Err(e) => {
                    log::warn!("Skipping media object {}: {}", index, e);
                    None
                }
            })
            .collect()
    }

    /// Media objects that belong on a page.
    pub fn objects_overlapping(
        &self,
        span: PageSpan,
        policy: OverlapPolicy,
    ) -> Vec<MediaObject<'s>> {
        let objects: Vec<_> = self
            .objects()
            .into_iter()
            .filter(|object| on_page(object, span, policy))
            .collect();
        log::trace!(
            "{} media objects on span [{}, {})",
            objects.len(),
            span.start,
            span.end
        );
        objects
    }

    fn composite(&self, node: &'s GraphNode, key: &str) -> Result<(f64, f64)> {
        parse_composite(self.string(node, key)?)
    }

    /// Read a string stored either inline or as an archived string object.
    fn string(&self, node: &'s GraphNode, key: &str) -> Result<&'s str> {
        let leaf = access_from(self.store, node, &[key.into()])?;
        Ok(string_value(self.store, leaf)?)
    }

    fn flag(&self, node: &'s GraphNode, key: &str) -> Result<Option<bool>> {
        match access_from(self.store, node, &[key.into()]) {
            Ok(leaf) => Ok(Some(leaf.into_bool()?)),
            Err(e) if e.is_missing() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Check whether an object belongs on a page under the given policy.
pub fn on_page(object: &MediaObject<'_>, span: PageSpan, policy: OverlapPolicy) -> bool {
    let top = object.origin().y;
    let height = object.size().height;
    match policy {
        OverlapPolicy::Intersect => span.overlaps(top, height),
        OverlapPolicy::Contain => span.contains_extent(top, height),
    }
}

fn has_jpeg_extension(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.ends_with(".jpg") || lower.ends_with(".jpeg")
}
