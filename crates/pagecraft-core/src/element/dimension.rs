//! Width/height values that may be pixels, percentages, or `auto`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One axis of an element's size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DimensionRepr", into = "DimensionRepr")]
pub enum Dimension {
    /// Size in pixels.
    Fixed(f64),
    /// Percentage of the containing canvas, stored without the `%` sign.
    Percent(f64),
    /// The literal `"auto"`.
    Auto,
    /// Any other string (CSS length, malformed percentage, ...). Kept verbatim.
    Raw(String),
}

/// Wire form: a JSON number or a JSON string.
#[derive(Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum DimensionRepr {
    Number(f64),
    Text(String),
}

impl From<DimensionRepr> for Dimension {
    fn from(repr: DimensionRepr) -> Self {
        match repr {
            DimensionRepr::Number(v) => Dimension::Fixed(v),
            DimensionRepr::Text(s) => Dimension::parse_str(&s),
        }
    }
}

impl From<Dimension> for DimensionRepr {
    fn from(dim: Dimension) -> Self {
        match dim {
            Dimension::Fixed(v) => DimensionRepr::Number(v),
            other => DimensionRepr::Text(other.to_string()),
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::Auto
    }
}

impl From<f64> for Dimension {
    fn from(px: f64) -> Self {
        Self::Fixed(px)
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dimension::Fixed(v) => write!(f, "{}", v),
            Dimension::Percent(v) => write!(f, "{}%", v),
            Dimension::Auto => f.write_str("auto"),
            Dimension::Raw(s) => f.write_str(s),
        }
    }
}

impl Dimension {
    /// Full canvas width.
    pub const FULL: Dimension = Dimension::Percent(100.0);

    /// Classify a string value.
    pub fn parse_str(s: &str) -> Self {
        if s == "auto" {
            return Dimension::Auto;
        }
        if let Some(number) = s.strip_suffix('%') {
            if let Ok(v) = number.trim().parse::<f64>() {
                if v.is_finite() {
                    return Dimension::Percent(v);
                }
            }
        }
        Dimension::Raw(s.to_string())
    }

    /// Coerce a manual text entry.
    ///
    /// Anything that reads as a bare number (surrounding whitespace allowed,
    /// blank counts as zero) becomes [`Dimension::Fixed`]; everything else is
    /// classified like a stored string.
    pub fn from_input(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Dimension::Fixed(0.0);
        }
        match trimmed.parse::<f64>() {
            Ok(v) if v.is_finite() => Dimension::Fixed(v),
            _ => Dimension::parse_str(input),
        }
    }

    /// The pixel value, if this is a fixed size.
    pub fn as_fixed(&self) -> Option<f64> {
        match self {
            Dimension::Fixed(v) => Some(*v),
            _ => None,
        }
    }

    /// Pixel value, or `fallback` for anything that isn't a non-zero pixel size.
    pub fn fixed_or(&self, fallback: f64) -> f64 {
        match self {
            Dimension::Fixed(v) if *v != 0.0 && !v.is_nan() => *v,
            _ => fallback,
        }
    }

    /// Check whether the value is acceptable in an exported document:
    /// a non-negative number, a string ending in `%`, or `auto`.
    pub fn is_valid(&self) -> bool {
        match self {
            Dimension::Fixed(v) => *v >= 0.0,
            Dimension::Percent(_) | Dimension::Auto => true,
            Dimension::Raw(s) => s.ends_with('%'),
        }
    }

    /// Check if this is `auto`.
    pub fn is_auto(&self) -> bool {
        matches!(self, Dimension::Auto)
    }
}
