//! Object graph of a decoded session.
//!
//! The session descriptor is a keyed archive: a flat `$objects` table whose
//! entries link to each other through integer references. [`GraphStore`]
//! owns the table, and [`access`] is the only way the rest of the crate
//! reads it.

mod dump;
mod keypath;
mod node;
pub mod schema;
mod store;

pub use dump::dump;
pub use keypath::{access, access_from, LeafValue, ResolveError, Step};
pub use node::{GraphNode, NodeTag};
pub use schema::{class_name, string_value, SchemaIndices};
pub use store::{GraphStore, MAX_REFERENCE_HOPS};
