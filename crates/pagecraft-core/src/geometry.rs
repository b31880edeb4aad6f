//! Axis-aligned rectangle helpers.

use kurbo::Rect;

/// Build a rectangle from a top-left corner and a size.
///
/// Unlike [`Rect::from_origin_size`] this does not normalize negative sizes,
/// so `x1 = x + width` always holds.
pub fn rect_from_xywh(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(x, y, x + width, y + height)
}

/// Check if two rectangles overlap.
///
/// The test is exclusive: rectangles that only share an edge do not overlap.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    !(a.x1 <= b.x0 || b.x1 <= a.x0 || a.y1 <= b.y0 || b.y1 <= a.y0)
}
