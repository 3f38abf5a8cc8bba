//! Typed nodes of a decoded keyed archive.

use std::collections::HashMap;
use std::fmt;
use std::time::SystemTime;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};

/// A node in the object graph.
///
/// Cross-object links are stored as [`GraphNode::Reference`] indices into the
/// owning [`GraphStore`](super::GraphStore) table and are only followed
/// through the store.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphNode {
    /// Boolean leaf
    Boolean(bool),
    /// Non-negative integer leaf
    UnsignedInt(u64),
    /// Negative integer leaf
    SignedInt(i64),
    /// Floating point leaf
    Real(f64),
    /// String leaf
    String(String),
    /// Date leaf
    Date(DateTime<Utc>),
    /// Raw bytes
    Data(Vec<u8>),
    /// Ordered sequence of nodes
    Array(Vec<GraphNode>),
    /// String-keyed mapping; insertion order is not preserved
    Dict(HashMap<String, GraphNode>),
    /// Back-reference into the object table
    Reference(u64),
}

/// Tag of a [`GraphNode`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeTag {
    /// Boolean
    Boolean,
    /// Unsigned integer
    UnsignedInt,
    /// Signed integer
    SignedInt,
    /// Real
    Real,
    /// String
    String,
    /// Date
    Date,
    /// Data
    Data,
    /// Array
    Array,
    /// Dictionary
    Dict,
    /// Reference
    Reference,
}

impl fmt::Display for NodeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeTag::Boolean => "bool",
            NodeTag::UnsignedInt => "uint",
            NodeTag::SignedInt => "int",
            NodeTag::Real => "real",
            NodeTag::String => "string",
            NodeTag::Date => "date",
            NodeTag::Data => "data",
            NodeTag::Array => "array",
            NodeTag::Dict => "dict",
            NodeTag::Reference => "uid",
        };
        f.write_str(name)
    }
}

impl GraphNode {
    /// Get the tag of this node.
    pub fn tag(&self) -> NodeTag {
        match self {
            GraphNode::Boolean(_) => NodeTag::Boolean,
            GraphNode::UnsignedInt(_) => NodeTag::UnsignedInt,
            GraphNode::SignedInt(_) => NodeTag::SignedInt,
            GraphNode::Real(_) => NodeTag::Real,
            GraphNode::String(_) => NodeTag::String,
            GraphNode::Date(_) => NodeTag::Date,
            GraphNode::Data(_) => NodeTag::Data,
            GraphNode::Array(_) => NodeTag::Array,
            GraphNode::Dict(_) => NodeTag::Dict,
            GraphNode::Reference(_) => NodeTag::Reference,
        }
    }

    /// Check if this node is a scalar leaf.
    pub fn is_leaf(&self) -> bool {
        !matches!(
            self,
            GraphNode::Array(_) | GraphNode::Dict(_) | GraphNode::Reference(_)
        )
    }

    /// Target index if this node is a reference.
    pub fn uid(&self) -> Option<u64> {
        match self {
            GraphNode::Reference(uid) => Some(*uid),
            _ => None,
        }
    }

    /// Build a dictionary node from key/value pairs.
    pub fn dict<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, GraphNode)>,
    {
        GraphNode::Dict(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Convert a decoded property list value into a graph node.
    pub fn from_plist(value: plist::Value) -> Result<Self> {
        let node = match value {
            plist::Value::Boolean(b) => GraphNode::Boolean(b),
            plist::Value::Integer(i) => match i.as_unsigned() {
                Some(u) => GraphNode::UnsignedInt(u),
                None => GraphNode::SignedInt(i.as_signed().ok_or_else(|| {
                    Error::Format(format!("integer {:?} does not fit in 64 bits", i))
                })?),
            },
            plist::Value::Real(r) => GraphNode::Real(r),
            plist::Value::String(s) => GraphNode::String(s),
            plist::Value::Date(d) => GraphNode::Date(DateTime::<Utc>::from(SystemTime::from(d))),
            plist::Value::Data(d) => GraphNode::Data(d),
            plist::Value::Uid(uid) => GraphNode::Reference(uid.get()),
            plist::Value::Array(items) => GraphNode::Array(
                items
                    .into_iter()
                    .map(GraphNode::from_plist)
                    .collect::<Result<Vec<_>>>()?,
            ),
            plist::Value::Dictionary(dict) => GraphNode::Dict(
                dict.into_iter()
                    .map(|(k, v)| GraphNode::from_plist(v).map(|n| (k, n)))
                    .collect::<Result<HashMap<_, _>>>()?,
            ),
            other => {
                return Err(Error::Format(format!(
                    "unsupported property list value: {:?}",
                    other
                )))
            }
        };
        Ok(node)
    }
}
