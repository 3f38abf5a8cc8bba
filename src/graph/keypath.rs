//! Keypath navigation over the object graph.
//!
//! Every read of the graph goes through [`access`]: a start node plus an
//! ordered list of [`Step`]s. References met along the way are followed
//! transparently and never consume a step.
//!
//! # Example
//!
//! ```
//! use unnote::graph::{access, GraphNode, GraphStore};
//! use unnote::keypath;
//!
//! let store = GraphStore::from_objects(vec![
//!     GraphNode::String("$null".into()),
//!     GraphNode::dict([("reflowState", GraphNode::Reference(2))]),
//!     GraphNode::dict([("pageWidthInDocumentCoordsKey", GraphNode::Real(612.0))]),
//! ]);
//!
//! let width = access(&store, 1, &keypath!["reflowState", "pageWidthInDocumentCoordsKey"])
//!     .and_then(|leaf| leaf.into_real())
//!     .unwrap();
//! assert_eq!(width, 612.0);
//! ```

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::node::{GraphNode, NodeTag};
use super::store::GraphStore;

/// One navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<'k> {
    /// Index into an array
    Index(usize),
    /// Key into a dictionary
    Key(&'k str),
}

impl fmt::Display for Step<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Index(i) => write!(f, "[{}]", i),
            Step::Key(k) => write!(f, ".{}", k),
        }
    }
}

impl From<usize> for Step<'_> {
    fn from(index: usize) -> Self {
        Step::Index(index)
    }
}

impl From<u32> for Step<'_> {
    fn from(index: u32) -> Self {
        Step::Index(usize::try_from(index).unwrap_or(usize::MAX))
    }
}

/// Negative indices never resolve.
impl From<i32> for Step<'_> {
    fn from(index: i32) -> Self {
        Step::Index(usize::try_from(index).unwrap_or(usize::MAX))
    }
}

impl<'k> From<&'k str> for Step<'k> {
    fn from(key: &'k str) -> Self {
        Step::Key(key)
    }
}

/// Build a step array from index and key expressions.
#[macro_export]
macro_rules! keypath {
    ($($step:expr),* $(,)?) => {
        [$($crate::graph::Step::from($step)),*]
    };
}

/// Keypath resolution failure.
///
/// `position` is the zero-based index of the failing step.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// A reference points outside the object table.
    #[error("reference {index} is out of range (table has {len} objects)")]
    DanglingReference {
        /// Referenced index
        index: u64,
        /// Size of the object table
        len: usize,
    },

    /// A reference chain is longer than the tolerated hop count.
    #[error("reference chain through {index} exceeds {max} hops")]
    ReferenceChain {
        /// Last index reached
        index: u64,
        /// Hop limit
        max: usize,
    },

    /// The step kind does not match the node it is applied to.
    #[error("step {position} ({step}): expected {expected}, found {actual}")]
    TypeMismatch {
        /// Failing step position
        position: usize,
        /// Failing step
        step: String,
        /// Expected node tag
        expected: NodeTag,
        /// Actual node tag
        actual: NodeTag,
    },

    /// Array index out of bounds.
    #[error("step {position} ({step}): array has {len} items")]
    IndexOutOfBounds {
        /// Failing step position
        position: usize,
        /// Failing step
        step: String,
        /// Array length
        len: usize,
    },

    /// Dictionary key not present.
    #[error("step {position} ({step}): key not found")]
    MissingKey {
        /// Failing step position
        position: usize,
        /// Failing step
        step: String,
    },

    /// A scalar leaf was reached with steps remaining.
    #[error("step {position} ({step}): reached {actual} leaf with {remaining} steps left")]
    PrematureLeaf {
        /// Failing step position
        position: usize,
        /// Failing step
        step: String,
        /// Leaf tag
        actual: NodeTag,
        /// Steps left unconsumed, including the failing one
        remaining: usize,
    },

    /// The resolved leaf is not of the requested type.
    #[error("expected {expected} leaf, found {actual}")]
    UnexpectedLeaf {
        /// Requested tag
        expected: NodeTag,
        /// Actual tag
        actual: NodeTag,
    },
}

impl ResolveError {
    /// Check if the error means "the value is simply absent".
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            ResolveError::MissingKey { .. } | ResolveError::IndexOutOfBounds { .. }
        )
    }
}

/// Result of a keypath access.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeafValue<'s> {
    /// Boolean leaf
    Bool(bool),
    /// Unsigned integer leaf
    UInt(u64),
    /// Signed integer leaf
    Int(i64),
    /// Real leaf
    Real(f64),
    /// String leaf
    Str(&'s str),
    /// Date leaf
    Date(DateTime<Utc>),
    /// Data leaf
    Data(&'s [u8]),
    /// Array or dictionary node
    Node(&'s GraphNode),
}

impl<'s> LeafValue<'s> {
    fn from_node(node: &'s GraphNode) -> Self {
        match node {
            GraphNode::Boolean(b) => LeafValue::Bool(*b),
            GraphNode::UnsignedInt(u) => LeafValue::UInt(*u),
            GraphNode::SignedInt(i) => LeafValue::Int(*i),
            GraphNode::Real(r) => LeafValue::Real(*r),
            GraphNode::String(s) => LeafValue::Str(s),
            GraphNode::Date(d) => LeafValue::Date(*d),
            GraphNode::Data(d) => LeafValue::Data(d),
            other => LeafValue::Node(other),
        }
    }

    /// Tag of the underlying node.
    pub fn tag(&self) -> NodeTag {
        match self {
            LeafValue::Bool(_) => NodeTag::Boolean,
            LeafValue::UInt(_) => NodeTag::UnsignedInt,
            LeafValue::Int(_) => NodeTag::SignedInt,
            LeafValue::Real(_) => NodeTag::Real,
            LeafValue::Str(_) => NodeTag::String,
            LeafValue::Date(_) => NodeTag::Date,
            LeafValue::Data(_) => NodeTag::Data,
            LeafValue::Node(n) => n.tag(),
        }
    }

    fn unexpected(&self, expected: NodeTag) -> ResolveError {
        ResolveError::UnexpectedLeaf {
            expected,
            actual: self.tag(),
        }
    }

    /// Read a number; integers are widened to `f64`.
    pub fn into_real(self) -> Result<f64, ResolveError> {
        match self {
            LeafValue::Real(r) => Ok(r),
            LeafValue::UInt(u) => Ok(u as f64),
            LeafValue::Int(i) => Ok(i as f64),
            other => Err(other.unexpected(NodeTag::Real)),
        }
    }

    /// Read an unsigned integer.
    pub fn into_uint(self) -> Result<u64, ResolveError> {
        match self {
            LeafValue::UInt(u) => Ok(u),
            other => Err(other.unexpected(NodeTag::UnsignedInt)),
        }
    }

    /// Read a boolean.
    pub fn into_bool(self) -> Result<bool, ResolveError> {
        match self {
            LeafValue::Bool(b) => Ok(b),
            other => Err(other.unexpected(NodeTag::Boolean)),
        }
    }

    /// Read a string.
    pub fn into_str(self) -> Result<&'s str, ResolveError> {
        match self {
            LeafValue::Str(s) => Ok(s),
            other => Err(other.unexpected(NodeTag::String)),
        }
    }

    /// Read raw bytes.
    pub fn into_data(self) -> Result<&'s [u8], ResolveError> {
        match self {
            LeafValue::Data(d) => Ok(d),
            other => Err(other.unexpected(NodeTag::Data)),
        }
    }

    /// Read an array node.
    pub fn into_array(self) -> Result<&'s [GraphNode], ResolveError> {
        match self {
            LeafValue::Node(GraphNode::Array(items)) => Ok(items),
            other => Err(other.unexpected(NodeTag::Array)),
        }
    }

    /// Read a dictionary node.
    pub fn into_dict(self) -> Result<&'s HashMap<String, GraphNode>, ResolveError> {
        match self {
            LeafValue::Node(GraphNode::Dict(map)) => Ok(map),
            other => Err(other.unexpected(NodeTag::Dict)),
        }
    }

    /// Get the node handle, for further navigation with [`access_from`].
    pub fn into_node(self) -> Result<&'s GraphNode, ResolveError> {
        match self {
            LeafValue::Node(n) => Ok(n),
            other => Err(other.unexpected(NodeTag::Dict)),
        }
    }
}

/// Walk `steps` starting at the object-table entry `start`.
pub fn access<'s>(
    store: &'s GraphStore,
    start: usize,
    steps: &[Step<'_>],
) -> Result<LeafValue<'s>, ResolveError> {
    let node = store
        .node(start)
        .ok_or(ResolveError::DanglingReference {
            index: start as u64,
            len: store.len(),
        })?;
    access_from(store, node, steps)
}

/// Walk `steps` starting at an arbitrary node handle.
pub fn access_from<'s>(
    store: &'s GraphStore,
    start: &'s GraphNode,
    steps: &[Step<'_>],
) -> Result<LeafValue<'s>, ResolveError> {
    let mut current = start;
    let mut position = 0;

    while let Some(step) = steps.get(position) {
        current = match (current, step) {
            (GraphNode::Reference(_), _) => {
                // same step is retried against the target
                store.resolve(current)?
            }
            (GraphNode::Array(items), Step::Index(i)) => {
                position += 1;
                items.get(*i).ok_or_else(|| ResolveError::IndexOutOfBounds {
                    position: position - 1,
                    step: step.to_string(),
                    len: items.len(),
                })?
            }
            (GraphNode::Dict(map), Step::Key(k)) => {
                position += 1;
                map.get(*k).ok_or_else(|| ResolveError::MissingKey {
                    position: position - 1,
                    step: step.to_string(),
                })?
            }
            (GraphNode::Array(_), Step::Key(_)) => {
                return Err(ResolveError::TypeMismatch {
                    position,
                    step: step.to_string(),
                    expected: NodeTag::Dict,
                    actual: NodeTag::Array,
                });
            }
            (GraphNode::Dict(_), Step::Index(_)) => {
                return Err(ResolveError::TypeMismatch {
                    position,
                    step: step.to_string(),
                    expected: NodeTag::Array,
                    actual: NodeTag::Dict,
                });
            }
            (leaf, _) => {
                return Err(ResolveError::PrematureLeaf {
                    position,
                    step: step.to_string(),
                    actual: leaf.tag(),
                    remaining: steps.len() - position,
                });
            }
        };
    }

    Ok(LeafValue::from_node(store.resolve(current)?))
}
