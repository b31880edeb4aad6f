//! Exported document format: build, parse and validate.
//!
//! A document is the JSON file a layout is saved to:
//!
//! ```json
//! {
//!   "project": { "name": "...", "version": "1.0", "created": "...", "lastModified": "..." },
//!   "canvas": { "width": 1200, "height": 800, "grid": { "enabled": true, "size": 10, "snap": true } },
//!   "elements": [ { "id": "...", "type": "card", "content": {}, "position": {}, "responsive": {} } ],
//!   "metadata": { "totalElements": 1, "exportFormat": "json", "exportVersion": "2.0" }
//! }
//! ```
//!
//! Parsing is structural only. [`validate`] reports problems as messages and
//! never blocks an export or an import.

use crate::element::{Coordinate, Element, ElementContent, ElementKind, Position, ResponsiveConfig};
use crate::snap::GridConfig;
use chrono::{SecondsFormat, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::LazyLock;
use thiserror::Error;

pub const EXPORT_FORMAT: &str = "json";
pub const EXPORT_VERSION: &str = "2.0";

static ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^elem_[a-zA-Z0-9_-]+_[0-9]{3}$").expect("valid regex"));

/// Errors reading a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Invalid document: {0}")]
    InvalidJson(#[from] serde_json::Error),
    #[error("Document has no elements")]
    MissingElements,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectInfo {
    pub name: String,
    pub version: String,
    /// RFC 3339, UTC, millisecond precision.
    pub created: String,
    pub last_modified: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasInfo {
    pub width: f64,
    pub height: f64,
    pub grid: GridConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentMetadata {
    pub total_elements: usize,
    pub export_format: String,
    pub export_version: String,
}

/// One element as written in a document.
///
/// Required fields are lenient here so that a document with holes still
/// parses and can be reported by [`validate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: ElementKind,
    #[serde(default)]
    pub content: ElementContent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub responsive: ResponsiveConfig,
}

impl From<&Element> for ElementRecord {
    fn from(element: &Element) -> Self {
        Self {
            id: element.id.clone(),
            kind: element.kind.clone(),
            content: element.content.clone(),
            position: Some(element.position.clone()),
            responsive: element.responsive.clone(),
        }
    }
}

impl ElementRecord {
    /// Convert into a store element. A missing position becomes the default
    /// position at the origin.
    pub fn into_element(self) -> Element {
        let position = self.position.unwrap_or_else(|| {
            log::warn!("Element {:?} has no position, placing it at the origin", self.id);
            Position::default()
        });
        Element::new(self.id, self.kind, self.content, position).with_responsive(self.responsive)
    }
}

/// A saved layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedDocument {
    #[serde(default)]
    pub project: ProjectInfo,
    #[serde(default)]
    pub canvas: CanvasInfo,
    pub elements: Vec<ElementRecord>,
    #[serde(default)]
    pub metadata: DocumentMetadata,
}

impl ExportedDocument {
    /// Snapshot a set of elements into a new document stamped with the
    /// current time.
    pub fn new(name: &str, version: &str, canvas: CanvasInfo, elements: &[Element]) -> Self {
        let now = timestamp_now();
        Self {
            project: ProjectInfo {
                name: name.to_string(),
                version: version.to_string(),
                created: now.clone(),
                last_modified: now,
            },
            canvas,
            elements: elements.iter().map(ElementRecord::from).collect(),
            metadata: DocumentMetadata {
                total_elements: elements.len(),
                export_format: EXPORT_FORMAT.to_string(),
                export_version: EXPORT_VERSION.to_string(),
            },
        }
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Current time as written in documents, e.g. `2025-01-31T09:15:02.481Z`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a document.
///
/// Fails with [`DocumentError::MissingElements`] when the JSON has no usable
/// `elements` entry, and with [`DocumentError::InvalidJson`] for anything
/// that isn't JSON or doesn't have the document's shape.
pub fn parse_document(json: &str) -> Result<ExportedDocument, DocumentError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    match value.get("elements") {
        None | Some(serde_json::Value::Null) => return Err(DocumentError::MissingElements),
        Some(_) => {}
    }
    Ok(serde_json::from_value(value)?)
}

/// Check a document for structural problems.
///
/// Every check runs independently; an empty list means the document is valid.
pub fn validate(document: &ExportedDocument) -> Vec<String> {
    let mut errors = Vec::new();
    let elements = &document.elements;

    let mut seen = HashSet::new();
    let mut duplicates: Vec<&str> = Vec::new();
    for el in elements {
        if !seen.insert(el.id.as_str()) && !duplicates.contains(&el.id.as_str()) {
            duplicates.push(&el.id);
        }
    }
    if !duplicates.is_empty() {
        errors.push(format!("Duplicate IDs: {}", duplicates.join(", ")));
    }

    let bad_ids: Vec<&str> = elements
        .iter()
        .map(|el| el.id.as_str())
        .filter(|id| !ID_PATTERN.is_match(id))
        .collect();
    if !bad_ids.is_empty() {
        errors.push(format!("IDs not matching pattern: {}", bad_ids.join(", ")));
    }

    for el in elements {
        let Some(position) = &el.position else {
            continue;
        };
        // String coordinates are not bounds-checked.
        let out_of_range = |coord: &Coordinate, max: f64| coord.as_px().is_some_and(|v| v < 0.0 || v > max);
        if out_of_range(&position.x, document.canvas.width) {
            errors.push(format!("{}: x out of range", el.id));
        }
        if out_of_range(&position.y, document.canvas.height) {
            errors.push(format!("{}: y out of range", el.id));
        }
        if !position.width.is_valid() {
            errors.push(format!("{}: invalid", el.id));
        }
        if !position.height.is_valid() {
            errors.push(format!("{}: invalid", el.id));
        }
    }

    let mut zs: Vec<i64> = elements
        .iter()
        .map(|el| el.position.as_ref().map_or(0, |p| p.z_index))
        .collect();
    zs.sort_unstable();
    if let (Some(&first), Some(&max)) = (zs.first(), zs.last()) {
        if first != 1 {
            errors.push("z-index should start from 1".to_string());
        }
        if let Some(missing) = (1..=max).find(|z| zs.binary_search(z).is_err()) {
            errors.push(format!("z-index missing value {}", missing));
        }
    }

    let unsupported: Vec<&str> = elements
        .iter()
        .filter(|el| !el.kind.is_known())
        .map(|el| el.id.as_str())
        .collect();
    if !unsupported.is_empty() {
        errors.push(format!("Unsupported types: {}", unsupported.join(", ")));
    }

    for el in elements {
        if el.id.is_empty() || el.kind.is_missing() || el.position.is_none() {
            let id = if el.id.is_empty() { "<missing id>" } else { el.id.as_str() };
            errors.push(format!("{}: missing required fields", id));
        }
    }

    errors
}
