//! The object table of an open note.

use std::io::Cursor;

use crate::detect::is_binary_plist;
use crate::error::{Error, Result};

use super::keypath::ResolveError;
use super::node::GraphNode;

/// Maximum number of reference hops followed by [`GraphStore::resolve`].
///
/// The format never chains references, but one extra hop is tolerated.
pub const MAX_REFERENCE_HOPS: usize = 2;

/// Root key holding the object table.
const OBJECTS_KEY: &str = "$objects";
const ARCHIVER_KEY: &str = "$archiver";
const VERSION_KEY: &str = "$version";

/// Decoded object graph of one document.
///
/// Immutable after construction; safe to share between concurrent page
/// renders.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphStore {
    objects: Vec<GraphNode>,
    archiver: Option<String>,
    version: Option<u64>,
}

impl GraphStore {
    /// Decode a binary keyed archive.
    ///
    /// Fails with [`Error::Format`] when the bytes are not a binary property
    /// list, or when the root `$objects` table is missing or not an array.
    pub fn load(data: &[u8]) -> Result<Self> {
        if !is_binary_plist(data) {
            return Err(Error::Format(
                "session is not a binary property list".to_string(),
            ));
        }

        let root = plist::Value::from_reader(Cursor::new(data))?;
        let plist::Value::Dictionary(mut root) = root else {
            return Err(Error::Format("session root is not a dictionary".to_string()));
        };

        let archiver = root
            .get(ARCHIVER_KEY)
            .and_then(|v| v.as_string())
            .map(str::to_string);
        let version = root
            .get(VERSION_KEY)
            .and_then(|v| v.as_unsigned_integer());

        let objects = match root.remove(OBJECTS_KEY) {
            Some(plist::Value::Array(items)) => items
                .into_iter()
                .map(GraphNode::from_plist)
                .collect::<Result<Vec<_>>>()?,
            Some(_) => {
                return Err(Error::Format(format!("{} is not an array", OBJECTS_KEY)));
            }
            None => {
                return Err(Error::Format(format!("missing {} table", OBJECTS_KEY)));
            }
        };

        log::debug!(
            "Loaded object table with {} nodes (archiver {:?}, version {:?})",
            objects.len(),
            archiver,
            version
        );

        Ok(Self {
            objects,
            archiver,
            version,
        })
    }

    /// Build a store from an already-decoded object table.
    pub fn from_objects(objects: Vec<GraphNode>) -> Self {
        Self {
            objects,
            archiver: None,
            version: None,
        }
    }

    /// Set the format-version marker.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    /// Get the node at a table index.
    pub fn node(&self, index: usize) -> Option<&GraphNode> {
        self.objects.get(index)
    }

    /// Dereference a node.
    ///
    /// Non-reference nodes are returned unchanged. References are followed
    /// for at most [`MAX_REFERENCE_HOPS`] hops.
    pub fn resolve<'a>(&'a self, node: &'a GraphNode) -> std::result::Result<&'a GraphNode, ResolveError> {
        let mut current = node;
        for _ in 0..MAX_REFERENCE_HOPS {
            match current {
                GraphNode::Reference(uid) => current = self.deref(*uid)?,
                _ => return Ok(current),
            }
        }

        match current {
            GraphNode::Reference(uid) => Err(ResolveError::ReferenceChain {
                index: *uid,
                max: MAX_REFERENCE_HOPS,
            }),
            _ => Ok(current),
        }
    }

    /// Follow a single reference.
    pub fn deref(&self, uid: u64) -> std::result::Result<&GraphNode, ResolveError> {
        usize::try_from(uid)
            .ok()
            .and_then(|i| self.objects.get(i))
            .ok_or(ResolveError::DanglingReference {
                index: uid,
                len: self.objects.len(),
            })
    }

    /// Number of nodes in the table.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Name of the archiver that produced the graph.
    pub fn archiver(&self) -> Option<&str> {
        self.archiver.as_deref()
    }

    /// Format-version marker of the archive.
    pub fn version(&self) -> Option<u64> {
        self.version
    }
}
