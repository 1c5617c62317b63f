//! Gallery manifest: the JSON document listing image files and captions.
//!
//! The expected shape is `{"images": [{"file": "name.jpg", "title": "Caption"}]}`.
//! Parsing is lenient past the JSON layer: a missing or non-array `images`
//! yields an empty manifest, and entries without a usable `file` are kept
//! with an empty file name so the renderer can skip them while preserving
//! every other entry's index.

use serde::Serialize;
use serde_json::Value;

/// One manifest entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImageEntry {
    /// File name relative to the image base; empty means "skip"
    pub file: String,
    /// Caption / alt text; empty when absent
    pub title: String,
}

impl ImageEntry {
    pub fn new(file: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            title: title.into(),
        }
    }

    /// Entries without a file name produce no gallery item.
    pub fn is_renderable(&self) -> bool {
        !self.file.is_empty()
    }
}

/// Parsed manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Manifest {
    pub images: Vec<ImageEntry>,
}

impl Manifest {
    /// Parse a manifest body. Only invalid JSON is an error.
    pub fn from_json(body: &str) -> serde_json::Result<Self> {
        let value: Value = serde_json::from_str(body)?;
        Ok(Self::from_value(&value))
    }

    /// Build a manifest from arbitrary JSON, normalizing malformed parts.
    pub fn from_value(value: &Value) -> Self {
        let images = value
            .get("images")
            .and_then(Value::as_array)
            .map(|items| items.iter().map(entry_from_value).collect())
            .unwrap_or_default();
        Self { images }
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Number of entries that will produce a gallery item.
    pub fn renderable_count(&self) -> usize {
        self.images.iter().filter(|e| e.is_renderable()).count()
    }
}

fn entry_from_value(value: &Value) -> ImageEntry {
    ImageEntry {
        file: field_text(value, "file"),
        title: field_text(value, "title"),
    }
}

// Strings pass through, numbers are stringified (zero counts as missing),
// everything else is treated as absent.
fn field_text(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        _ => String::new(),
    }
}
