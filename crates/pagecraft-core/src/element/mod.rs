//! Layout elements placed on the canvas.

mod content;
mod coordinate;
mod dimension;

pub use content::{ContentField, ElementContent};
pub use coordinate::Coordinate;
pub use dimension::Dimension;

use crate::geometry::rect_from_xywh;
use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier of an element, formatted `elem_<type>_<NNN>` for elements
/// created by the template catalog.
pub type ElementId = String;

/// The type tag of an element.
///
/// Tags outside the known set are preserved as [`ElementKind::Other`] so an
/// imported document can still be loaded and then reported by validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ElementKind {
    Header,
    Footer,
    Card,
    TextContent,
    Slider,
    Other(String),
}

impl ElementKind {
    /// All known kinds, in palette order.
    pub const ALL: [ElementKind; 5] = [
        ElementKind::Header,
        ElementKind::Footer,
        ElementKind::Card,
        ElementKind::TextContent,
        ElementKind::Slider,
    ];

    /// The tag as written in documents.
    pub fn as_str(&self) -> &str {
        match self {
            ElementKind::Header => "header",
            ElementKind::Footer => "footer",
            ElementKind::Card => "card",
            ElementKind::TextContent => "text-content",
            ElementKind::Slider => "slider",
            ElementKind::Other(tag) => tag,
        }
    }

    /// Check if the tag is one of the known kinds.
    pub fn is_known(&self) -> bool {
        !matches!(self, ElementKind::Other(_))
    }

    /// Check if the tag is absent (empty string).
    pub fn is_missing(&self) -> bool {
        matches!(self, ElementKind::Other(tag) if tag.is_empty())
    }
}

/// A missing tag.
impl Default for ElementKind {
    fn default() -> Self {
        ElementKind::Other(String::new())
    }
}

impl From<&str> for ElementKind {
    fn from(tag: &str) -> Self {
        match tag {
            "header" => ElementKind::Header,
            "footer" => ElementKind::Footer,
            "card" => ElementKind::Card,
            "text-content" => ElementKind::TextContent,
            "slider" => ElementKind::Slider,
            other => ElementKind::Other(other.to_string()),
        }
    }
}

impl From<String> for ElementKind {
    fn from(tag: String) -> Self {
        match ElementKind::from(tag.as_str()) {
            ElementKind::Other(_) => ElementKind::Other(tag),
            known => known,
        }
    }
}

impl From<ElementKind> for String {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placement of an element on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Left edge, canvas-local.
    pub x: Coordinate,
    /// Top edge, canvas-local.
    pub y: Coordinate,
    pub width: Dimension,
    pub height: Dimension,
    /// Paint order. Higher is on top. Not necessarily contiguous.
    #[serde(default, deserialize_with = "deserialize_z_index")]
    pub z_index: i64,
    /// Pinned element (e.g. a sticky footer). Carried through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed: Option<bool>,
    /// Height floor used when `height` is `auto`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<f64>,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            x: Coordinate::default(),
            y: Coordinate::default(),
            width: Dimension::Auto,
            height: Dimension::Auto,
            z_index: 0,
            fixed: None,
            min_height: None,
        }
    }
}

impl Position {
    pub fn new(x: f64, y: f64, width: Dimension, height: Dimension, z_index: i64) -> Self {
        Self {
            x: Coordinate::Px(x),
            y: Coordinate::Px(y),
            width,
            height,
            z_index,
            ..Self::default()
        }
    }

    /// Top-left corner. String coordinates count as zero.
    pub fn origin(&self) -> Point {
        Point::new(self.x.px_or_zero(), self.y.px_or_zero())
    }

    /// Top-left corner on a canvas of the given size, with percentage
    /// coordinates resolved.
    pub fn resolved_origin(&self, canvas: Size) -> Point {
        Point::new(self.x.resolve(canvas.width), self.y.resolve(canvas.height))
    }

    /// Rectangle used for collision checks. Non-pixel values count as zero.
    pub fn collision_rect(&self) -> Rect {
        rect_from_xywh(
            self.x.px_or_zero(),
            self.y.px_or_zero(),
            self.width.as_fixed().unwrap_or(0.0),
            self.height.as_fixed().unwrap_or(0.0),
        )
    }

    /// Rectangle the element occupies when drawn on a canvas of the given
    /// size. Percentages resolve against the canvas; `auto` height uses
    /// `min_height`.
    pub fn display_rect(&self, canvas: Size) -> Rect {
        let width = match self.width {
            Dimension::Fixed(v) => v,
            Dimension::Percent(p) => canvas.width * p / 100.0,
            _ => 0.0,
        };
        let height = match self.height {
            Dimension::Fixed(v) => v,
            Dimension::Percent(p) => canvas.height * p / 100.0,
            Dimension::Auto => self.min_height.unwrap_or(0.0),
            Dimension::Raw(_) => 0.0,
        };
        let origin = self.resolved_origin(canvas);
        rect_from_xywh(origin.x, origin.y, width, height)
    }
}

/// Read a z-index the lenient way documents write it: numbers, numeric
/// strings and booleans are accepted, fractions truncate, and anything else
/// (including `null` and non-numeric strings) reads as 0.
fn deserialize_z_index<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(z_index_from_value(&Value::deserialize(deserializer)?))
}

fn z_index_from_value(value: &Value) -> i64 {
    let number = match value {
        Value::Number(n) => match n.as_i64() {
            Some(z) => return z,
            None => n.as_f64(),
        },
        Value::String(s) => {
            let s = s.trim();
            match s.parse::<i64>() {
                Ok(z) => return z,
                Err(_) => s.parse::<f64>().ok(),
            }
        }
        Value::Bool(b) => return i64::from(*b),
        _ => None,
    };
    // `as` saturates at the i64 bounds.
    number.filter(|v| v.is_finite()).map_or(0, |v| v.trunc() as i64)
}

/// Size overrides for one breakpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakpointSize {
    pub width: Dimension,
    pub height: Dimension,
}

/// Declared per-breakpoint overrides. Stored, never computed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponsiveConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<BreakpointSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tablet: Option<BreakpointSize>,
}

impl ResponsiveConfig {
    pub fn is_empty(&self) -> bool {
        self.mobile.is_none() && self.tablet.is_none()
    }
}

/// A positioned, typed unit of page content.
///
/// Elements are values: to change one, build a modified copy and hand it back
/// to the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub id: ElementId,
    #[serde(rename = "type")]
    pub kind: ElementKind,
    pub content: ElementContent,
    pub position: Position,
    #[serde(default)]
    pub responsive: ResponsiveConfig,
}

impl Element {
    pub fn new(id: impl Into<ElementId>, kind: ElementKind, content: ElementContent, position: Position) -> Self {
        Self {
            id: id.into(),
            kind,
            content,
            position,
            responsive: ResponsiveConfig::default(),
        }
    }

    /// Copy of this element with a new position.
    pub fn with_position(&self, position: Position) -> Self {
        Self {
            position,
            ..self.clone()
        }
    }

    /// Copy of this element with new content.
    pub fn with_content(&self, content: ElementContent) -> Self {
        Self {
            content,
            ..self.clone()
        }
    }

    pub fn with_responsive(mut self, responsive: ResponsiveConfig) -> Self {
        self.responsive = responsive;
        self
    }

    pub fn z_index(&self) -> i64 {
        self.position.z_index
    }
}
