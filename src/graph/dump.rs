//! Text dump of object subgraphs, for reverse engineering new revisions.

use std::fmt::Write;

use super::node::GraphNode;
use super::store::GraphStore;

const INDENT: usize = 4;

/// Render the subgraph rooted at object `index` as indented XML-like text.
///
/// References are printed as `<uid>` leaves and never followed; nesting
/// deeper than `max_depth` is elided.
pub fn dump(store: &GraphStore, index: usize, max_depth: usize) -> String {
    let mut out = String::new();
    match store.node(index) {
        Some(node) => dump_node(&mut out, node, 0, max_depth),
        None => {
            let _ = writeln!(out, "<missing index=\"{}\"/>", index);
        }
    }
    out
}

fn pad(out: &mut String, depth: usize) {
    out.extend(std::iter::repeat(' ').take(depth * INDENT));
}

fn dump_node(out: &mut String, node: &GraphNode, depth: usize, max_depth: usize) {
    pad(out, depth);

    // writing into a String cannot fail
    let _ = match node {
        GraphNode::Boolean(b) => writeln!(out, "<bool>{}</bool>", b),
        GraphNode::UnsignedInt(u) => writeln!(out, "<uint>{}</uint>", u),
        GraphNode::SignedInt(i) => writeln!(out, "<int>{}</int>", i),
        GraphNode::Real(r) => writeln!(out, "<real>{:.6}</real>", r),
        GraphNode::String(s) => writeln!(out, "<string>{}</string>", s),
        GraphNode::Date(d) => writeln!(out, "<date>{}</date>", d.to_rfc3339()),
        GraphNode::Data(d) => writeln!(out, "<data length=\"{}\">...</data>", d.len()),
        GraphNode::Reference(uid) => writeln!(out, "<uid>{}</uid>", uid),
        GraphNode::Array(_) | GraphNode::Dict(_) if depth >= max_depth => {
            writeln!(out, "<{}>...</{}>", node.tag(), node.tag())
        }
        GraphNode::Array(items) => {
            let _ = writeln!(out, "<array>");
            for (id, item) in items.iter().enumerate() {
                pad(out, depth + 1);
                let _ = writeln!(out, "<array_item id=\"{}\">", id);
                dump_node(out, item, depth + 2, max_depth);
                pad(out, depth + 1);
                let _ = writeln!(out, "</array_item>");
            }
            pad(out, depth);
            writeln!(out, "</array>")
        }
        GraphNode::Dict(map) => {
            let _ = writeln!(out, "<dict>");
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            for (id, (key, value)) in entries.into_iter().enumerate() {
                pad(out, depth + 1);
                let _ = writeln!(out, "<dict_item key=\"{}\" id=\"{}\">", key, id);
                dump_node(out, value, depth + 2, max_depth);
                pad(out, depth + 1);
                let _ = writeln!(out, "</dict_item>");
            }
            pad(out, depth);
            writeln!(out, "</dict>")
        }
    };
}
