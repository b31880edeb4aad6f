//! x/y values: pixels, or a string carried through from an imported document.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One coordinate of an element's top-left corner.
///
/// Elements created in the builder always use [`Coordinate::Px`]. Imported
/// documents may carry strings such as `"10%"`; those are kept verbatim and
/// are never bounds-checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Px(f64),
    Text(String),
}

impl Default for Coordinate {
    fn default() -> Self {
        Coordinate::Px(0.0)
    }
}

impl From<f64> for Coordinate {
    fn from(px: f64) -> Self {
        Coordinate::Px(px)
    }
}

impl PartialEq<f64> for Coordinate {
    fn eq(&self, other: &f64) -> bool {
        matches!(self, Coordinate::Px(v) if v == other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Px(v) => write!(f, "{}", v),
            Coordinate::Text(s) => f.write_str(s),
        }
    }
}

impl Coordinate {
    /// The pixel value, if this is one.
    pub fn as_px(&self) -> Option<f64> {
        match self {
            Coordinate::Px(v) => Some(*v),
            Coordinate::Text(_) => None,
        }
    }

    /// Pixel value, with strings counting as zero.
    pub fn px_or_zero(&self) -> f64 {
        self.as_px().unwrap_or(0.0)
    }

    /// Pixel offset along an axis of length `extent`. `"N%"` resolves against
    /// the extent, bare numeric strings read as pixels, anything else is 0.
    pub fn resolve(&self, extent: f64) -> f64 {
        match self {
            Coordinate::Px(v) => *v,
            Coordinate::Text(s) => {
                let s = s.trim();
                let parsed = match s.strip_suffix('%') {
                    Some(percent) => percent.trim().parse::<f64>().map(|p| extent * p / 100.0),
                    None => s.parse::<f64>(),
                };
                parsed.ok().filter(|v| v.is_finite()).unwrap_or(0.0)
            }
        }
    }
}
