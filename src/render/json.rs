//! JSON rendering of draw lists.

use crate::error::{Error, Result};

use super::DrawList;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a draw list to JSON. Pixel buffers are omitted.
pub fn to_json(list: &DrawList, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(list),
        JsonFormat::Compact => serde_json::to_string(list),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}
