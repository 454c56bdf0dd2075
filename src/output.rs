//! JSON output.
//!
//! A single-frame extraction is written as one object,
//! `{"pixels": [..]}`; a run of frames as an array of such objects in
//! decode order.

use std::{fs, path::Path};

use crate::{configuration::SelectionPolicy, error::LumaError, region::ExtractionRecord};

/// Top-level shape of the JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputShape {
    /// One record as a bare object.
    Object,
    /// All records in an array.
    Array,
}

impl OutputShape {
    /// Object for [`SelectionPolicy::Single`], array for
    /// [`SelectionPolicy::Run`].
    pub fn for_policy(policy: &SelectionPolicy) -> Self {
        match policy {
            SelectionPolicy::Single { .. } => OutputShape::Object,
            SelectionPolicy::Run { .. } => OutputShape::Array,
        }
    }
}

/// Serialize `records`. Returns `None` when there is nothing to write.
///
/// With [`OutputShape::Object`] only the first record is written.
pub fn render(
    records: &[ExtractionRecord],
    shape: OutputShape,
    pretty: bool,
) -> Result<Option<String>, LumaError> {
    let rendered = match (shape, records.first()) {
        (_, None) => return Ok(None),
        (OutputShape::Object, Some(first)) if pretty => serde_json::to_string_pretty(first)?,
        (OutputShape::Object, Some(first)) => serde_json::to_string(first)?,
        (OutputShape::Array, Some(_)) if pretty => serde_json::to_string_pretty(records)?,
        (OutputShape::Array, Some(_)) => serde_json::to_string(records)?,
    };
    Ok(Some(rendered))
}

/// Write a rendered document to `path`, followed by a newline.
pub fn write_document<P: AsRef<Path>>(path: P, document: &str) -> Result<(), LumaError> {
    let path = path.as_ref();
    log::debug!("Writing {} bytes to {}", document.len() + 1, path.display());
    fs::write(path, format!("{document}\n"))?;
    Ok(())
}
