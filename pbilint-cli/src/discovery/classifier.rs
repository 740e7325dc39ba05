//! Item classification from the `.platform` marker file.

use crate::errors::LintError;
use serde_json::Value as JsonValue;
use std::path::Path;

use super::MARKER_FILE;

/// Read `metadata.<field>` from the marker file of an item.
///
/// A missing marker file is not an error: the item is simply unclassified.
pub fn read_metadata_field(item_path: &Path, field: &str) -> Result<Option<String>, LintError> {
    let marker = item_path.join(MARKER_FILE);
    if !marker.is_file() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(&marker).map_err(|e| LintError::io(&marker, e))?;
    let json: JsonValue = serde_json::from_str(strip_bom(&content)).map_err(|e| {
        LintError::malformed(format!("{} is not valid JSON: {}", marker.display(), e))
    })?;

    Ok(json
        .get("metadata")
        .and_then(|m| m.get(field))
        .and_then(JsonValue::as_str)
        .map(str::to_string))
}

/// Declared type of an item (`metadata.type`), if any
pub fn classify(item_path: &Path) -> Result<Option<String>, LintError> {
    read_metadata_field(item_path, "type")
}

/// Drop a leading UTF-8 byte order mark
pub(crate) fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{feff}').unwrap_or(content)
}
