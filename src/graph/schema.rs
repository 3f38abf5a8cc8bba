//! Schema constants recovered from the producing application.
//!
//! Object-table indices and key names are not discoverable in-band. They are
//! collected here so a new format revision only needs a new table entry.

use crate::error::{Error, Result};

use super::keypath::{access, access_from, LeafValue, ResolveError};
use super::node::GraphNode;
use super::store::GraphStore;

/// `$version` written by the keyed archiver of known sessions.
pub const KEYED_ARCHIVE_VERSION: u64 = 100_000;

/// Well-known object-table indices for one format revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaIndices {
    /// `$version` marker this table applies to
    pub revision: u64,
    /// General document info (paper layout)
    pub general_info: usize,
    /// Page-format and layout info (reflow state, overlay, media objects)
    pub layout_info: usize,
    /// Global text store
    pub text_store: usize,
}

/// Known revisions, newest last.
pub const SCHEMA_TABLE: &[SchemaIndices] = &[SchemaIndices {
    revision: KEYED_ARCHIVE_VERSION,
    general_info: 1,
    layout_info: 2,
    text_store: 2,
}];

/// Keyed-archive and session key names.
pub mod keys {
    /// Class reference of an archived object
    pub const CLASS: &str = "$class";
    /// Class name inside a class descriptor
    pub const CLASS_NAME: &str = "$classname";
    /// Keys of an archived dictionary
    pub const NS_KEYS: &str = "NS.keys";
    /// Values of an archived dictionary or array
    pub const NS_OBJECTS: &str = "NS.objects";
    /// Contents of an archived mutable string
    pub const NS_STRING: &str = "NS.string";

    pub const REFLOW_STATE: &str = "reflowState";
    pub const PAGE_WIDTH: &str = "pageWidthInDocumentCoordsKey";

    pub const PAPER_LAYOUT: &str = "NBNoteTakingSessionDocumentPaperLayoutModelKey";
    pub const PAPER_ATTRIBUTES: &str = "documentPaperAttributes";
    pub const PAPER_IDENTIFIER: &str = "paperIdentifier";

    pub const HANDWRITING_OVERLAY: &str = "Handwriting Overlay";
    pub const SPATIAL_HASH: &str = "SpatialHash";
    pub const CURVES_POINTS: &str = "curvespoints";
    pub const CURVES_NUM_POINTS: &str = "curvesnumpoints";
    pub const CURVES_WIDTH: &str = "curveswidth";
    pub const CURVES_COLORS: &str = "curvescolors";

    pub const MEDIA_OBJECTS: &str = "mediaObjects";
    pub const CONTENT_ORIGIN: &str = "documentContentOrigin";
    pub const CONTENT_SIZE: &str = "unscaledContentSize";
    pub const RELATIVE_PATH: &str = "relativePath";
    pub const IS_MISSING: &str = "isMissing";
    pub const IS_JPEG: &str = "isJPEG";
    pub const TEXT_STORE: &str = "textStore";

    pub const ATTRIBUTED_STRING: &str = "attributedString";
    pub const STRING: &str = "NSString";
    pub const ATTRIBUTES: &str = "NSAttributes";

    pub const ATTR_RANGE: &str = "range";
    pub const ATTR_FONT: &str = "font";
    pub const ATTR_OTHER: &str = "otherAttributes";
    pub const ATTR_COLOR: &str = "color";
    pub const ATTR_CROSS_PLATFORM_COLOR: &str = "crossPlatformColor";

    pub const FONT_NAME: &str = "NSName";
    pub const FONT_SIZE: &str = "NSSize";
    pub const COLOR_RGB: &str = "NSRGB";
    pub const COLOR_WHITE: &str = "NSWhite";
}

/// Media object class names.
pub mod classes {
    pub const IMAGE_MEDIA: &[&str] = &["NBImageMediaObject"];
    pub const TEXT_MEDIA: &[&str] = &["NBTextBlockMediaObject"];
}

/// Paper identifier that marks a page as not renderable.
pub const PAPER_NOT_RENDERABLE: &str = "Legacy:0";

/// Paper identifiers with a known aspect ratio (height / width).
pub const PAPER_RATIOS: &[(&str, f64)] = &[("Legacy:13", 1.3)];

/// Look up the aspect ratio of a paper identifier.
pub fn paper_ratio(identifier: &str) -> Option<f64> {
    PAPER_RATIOS
        .iter()
        .find(|(id, _)| *id == identifier)
        .map(|(_, ratio)| *ratio)
}

/// Layout state declared by the reflow-state class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflowKind {
    /// Text layout is locked to a fixed page width
    Locked,
    /// Text layout still reflows with the viewport
    Reflowable,
    /// Any other class (or none)
    Unknown(String),
}

impl ReflowKind {
    /// Classify a reflow-state class name.
    pub fn from_class_name(name: &str) -> Self {
        if name.contains("Locked") {
            ReflowKind::Locked
        } else if name.contains("Reflowable") {
            ReflowKind::Reflowable
        } else {
            ReflowKind::Unknown(name.to_string())
        }
    }
}

/// Resolve the `$class` → `$classname` string of an archived object.
pub fn class_name<'s>(
    store: &'s GraphStore,
    node: &'s GraphNode,
) -> std::result::Result<&'s str, ResolveError> {
    access_from(store, node, &[keys::CLASS.into(), keys::CLASS_NAME.into()])?.into_str()
}

/// Read a string leaf stored either inline or as an archived string object
/// (`NS.string`).
pub fn string_value<'s>(
    store: &'s GraphStore,
    leaf: LeafValue<'s>,
) -> std::result::Result<&'s str, ResolveError> {
    match leaf {
        LeafValue::Str(s) => Ok(s),
        other => access_from(store, other.into_node()?, &[keys::NS_STRING.into()])?.into_str(),
    }
}

/// Pick the index table for a store and check it against the graph.
///
/// Every well-known index must hold a dictionary. An unknown `$version`
/// falls back to the newest table.
pub fn detect(store: &GraphStore) -> Result<&'static SchemaIndices> {
    let newest = SCHEMA_TABLE
        .last()
        .ok_or_else(|| Error::Format("no schema revisions registered".to_string()))?;

    let schema = match store.version() {
        Some(version) => match SCHEMA_TABLE.iter().find(|s| s.revision == version) {
            Some(schema) => schema,
            None => {
                log::warn!(
                    "Unknown archive version {}, assuming revision {}",
                    version,
                    newest.revision
                );
                newest
            }
        },
        None => newest,
    };

    for (role, index) in [
        ("general info", schema.general_info),
        ("layout info", schema.layout_info),
        ("text store", schema.text_store),
    ] {
        access(store, index, &[])
            .and_then(|leaf| leaf.into_dict())
            .map_err(|e| Error::Format(format!("object {} ({}): {}", index, role, e)))?;
    }

    log::debug!("Using schema revision {}", schema.revision);
    Ok(schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> GraphStore {
        GraphStore::from_objects(vec![
            GraphNode::String("$null".into()),
            GraphNode::dict([("a", GraphNode::Boolean(true))]),
            GraphNode::dict([(keys::CLASS, GraphNode::Reference(3))]),
            GraphNode::dict([(keys::CLASS_NAME, GraphNode::String("NBLockedReflowState".into()))]),
        ])
    }

    #[test]
    fn test_detect_known_revision() {
        let store = store().with_version(KEYED_ARCHIVE_VERSION);
        let schema = detect(&store).unwrap();
        assert_eq!(schema.layout_info, 2);
    }

    #[test]
    fn test_detect_unknown_revision_falls_back() {
        let store = store().with_version(7);
        assert_eq!(detect(&store).unwrap().revision, KEYED_ARCHIVE_VERSION);
    }

    #[test]
    fn test_detect_validates_tags() {
        let store = GraphStore::from_objects(vec![
            GraphNode::String("$null".into()),
            GraphNode::Real(1.0),
            GraphNode::dict([("a", GraphNode::Boolean(true))]),
        ]);
        let err = detect(&store).unwrap_err();
        assert!(matches!(err, Error::Format(msg) if msg.contains("general info")));
    }

    #[test]
    fn test_class_name() {
        let store = store();
        let node = store.node(2).unwrap();
        assert_eq!(class_name(&store, node).unwrap(), "NBLockedReflowState");
    }

    #[test]
    fn test_string_value() {
        let store = GraphStore::from_objects(vec![
            GraphNode::String("$null".into()),
            GraphNode::dict([
                ("inline", GraphNode::String("a".into())),
                ("archived", GraphNode::Reference(2)),
            ]),
            GraphNode::dict([(keys::NS_STRING, GraphNode::String("b".into()))]),
        ]);
        let inline = access(&store, 1, &["inline".into()]).unwrap();
        let archived = access(&store, 1, &["archived".into()]).unwrap();
        assert_eq!(string_value(&store, inline).unwrap(), "a");
        assert_eq!(string_value(&store, archived).unwrap(), "b");
    }

    #[test]
    fn test_reflow_kind() {
        assert_eq!(
            ReflowKind::from_class_name("NBLockedReflowState"),
            ReflowKind::Locked
        );
        assert_eq!(
            ReflowKind::from_class_name("NBReflowableState"),
            ReflowKind::Reflowable
        );
        assert!(matches!(
            ReflowKind::from_class_name("Other"),
            ReflowKind::Unknown(_)
        ));
    }

    #[test]
    fn test_paper_ratio() {
        assert_eq!(paper_ratio("Legacy:13"), Some(1.3));
        assert_eq!(paper_ratio(PAPER_NOT_RENDERABLE), None);
    }
}
