//! Inspector panel logic: collision warning and manual field edits.

use crate::element::{ContentField, Coordinate, Dimension, Element, ElementKind};
use crate::geometry::rects_overlap;
use serde::{Deserialize, Serialize};

/// A manual edit typed into one inspector field.
///
/// Values are the raw text of the input box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "lowercase")]
pub enum FieldEdit {
    X(String),
    Y(String),
    Width(String),
    Height(String),
    Content(ContentField, String),
}

/// What the inspector shows for the selected element.
#[derive(Debug, Clone, PartialEq)]
pub struct InspectorSummary {
    pub id: String,
    pub kind: ElementKind,
    pub x: Coordinate,
    pub y: Coordinate,
    pub width: Dimension,
    pub height: Dimension,
    pub collides: bool,
}

impl InspectorSummary {
    pub fn of(elements: &[Element], id: &str) -> Option<Self> {
        let el = elements.iter().find(|e| e.id == id)?;
        Some(Self {
            id: el.id.clone(),
            kind: el.kind.clone(),
            x: el.position.x.clone(),
            y: el.position.y.clone(),
            width: el.position.width.clone(),
            height: el.position.height.clone(),
            collides: check_collision(elements, id),
        })
    }
}

/// Check whether the element overlaps any other element.
///
/// Non-pixel widths and heights count as zero. Pinned elements are not
/// excluded. Returns false when `id` isn't present.
pub fn check_collision(elements: &[Element], id: &str) -> bool {
    let Some(target) = elements.iter().find(|e| e.id == id) else {
        return false;
    };
    let rect = target.position.collision_rect();
    elements
        .iter()
        .filter(|e| e.id != id)
        .any(|other| rects_overlap(&rect, &other.position.collision_rect()))
}

/// Parse a typed coordinate. Blank input reads as zero.
pub fn parse_coordinate(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Apply an edit to the element with the given id, replacing only the
/// touched field. Returns false when the id is missing or a coordinate
/// doesn't parse.
pub fn apply_edit(elements: &mut [Element], id: &str, edit: &FieldEdit) -> bool {
    let Some(slot) = elements.iter_mut().find(|e| e.id == id) else {
        log::debug!("Ignoring edit for missing element {}", id);
        return false;
    };

    let mut position = slot.position.clone();
    match edit {
        FieldEdit::X(input) => match parse_coordinate(input) {
            Some(x) => position.x = Coordinate::Px(x),
            None => return false,
        },
        FieldEdit::Y(input) => match parse_coordinate(input) {
            Some(y) => position.y = Coordinate::Px(y),
            None => return false,
        },
        FieldEdit::Width(input) => position.width = Dimension::from_input(input),
        FieldEdit::Height(input) => position.height = Dimension::from_input(input),
        FieldEdit::Content(field, value) => {
            *slot = slot.with_content(slot.content.with_field(*field, value));
            return true;
        }
    }
    *slot = slot.with_position(position);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementContent, Position};

    fn el(id: &str, x: f64, y: f64, w: Dimension, h: Dimension) -> Element {
        Element::new(id, ElementKind::Card, ElementContent::card("Card", "Body"), Position::new(x, y, w, h, 1))
    }

    fn px(v: f64) -> Dimension {
        Dimension::Fixed(v)
    }

    #[test]
    fn test_collision() {
        let elements = vec![
            el("a", 0.0, 0.0, px(100.0), px(100.0)),
            el("b", 50.0, 50.0, px(100.0), px(100.0)),
            el("c", 500.0, 500.0, px(10.0), px(10.0)),
        ];
        assert!(check_collision(&elements, "a"));
        assert!(check_collision(&elements, "b"));
        assert!(!check_collision(&elements, "c"));
        assert!(!check_collision(&elements, "missing"));
    }

    #[test]
    fn test_percent_width_counts_as_zero() {
        let elements = vec![
            el("header", 0.0, 0.0, Dimension::FULL, px(80.0)),
            el("card", 50.0, 20.0, px(300.0), px(200.0)),
        ];
        assert!(!check_collision(&elements, "header"));
    }

    #[test]
    fn test_touching_elements_do_not_collide() {
        let elements = vec![
            el("a", 0.0, 0.0, px(100.0), px(100.0)),
            el("b", 100.0, 0.0, px(100.0), px(100.0)),
        ];
        assert!(!check_collision(&elements, "a"));
    }

    #[test]
    fn test_width_edit_coercion() {
        let mut elements = vec![el("a", 0.0, 0.0, px(100.0), px(100.0))];
        assert!(apply_edit(&mut elements, "a", &FieldEdit::Width("250".into())));
        assert_eq!(elements[0].position.width, px(250.0));

        apply_edit(&mut elements, "a", &FieldEdit::Width("50%".into()));
        assert_eq!(elements[0].position.width, Dimension::Percent(50.0));

        apply_edit(&mut elements, "a", &FieldEdit::Height("auto".into()));
        assert_eq!(elements[0].position.height, Dimension::Auto);

        apply_edit(&mut elements, "a", &FieldEdit::Height("12em".into()));
        assert_eq!(elements[0].position.height, Dimension::Raw("12em".into()));
        assert_eq!(elements[0].position.width, Dimension::Percent(50.0));
    }

    #[test]
    fn test_coordinate_edit() {
        let mut elements = vec![el("a", 10.0, 20.0, px(100.0), px(100.0))];
        assert!(apply_edit(&mut elements, "a", &FieldEdit::X(" 42 ".into())));
        assert_eq!(elements[0].position.x, 42.0);
        assert_eq!(elements[0].position.y, 20.0);

        assert!(!apply_edit(&mut elements, "a", &FieldEdit::Y("abc".into())));
        assert_eq!(elements[0].position.y, 20.0);

        assert!(apply_edit(&mut elements, "a", &FieldEdit::Y("".into())));
        assert_eq!(elements[0].position.y, 0.0);
    }

    #[test]
    fn test_content_edit() {
        let mut elements = vec![el("a", 0.0, 0.0, px(100.0), px(100.0))];
        apply_edit(&mut elements, "a", &FieldEdit::Content(ContentField::Title, "Pricing".into()));
        assert_eq!(elements[0].content.title.as_deref(), Some("Pricing"));
        assert_eq!(elements[0].content.description.as_deref(), Some("Body"));
    }

    #[test]
    fn test_edit_missing_element_is_noop() {
        let mut elements = vec![el("a", 0.0, 0.0, px(100.0), px(100.0))];
        let before = elements.clone();
        assert!(!apply_edit(&mut elements, "zzz", &FieldEdit::X("5".into())));
        assert_eq!(elements, before);
    }

    #[test]
    fn test_summary() {
        let elements = vec![
            el("a", 0.0, 0.0, px(100.0), px(100.0)),
            el("b", 50.0, 50.0, px(100.0), px(100.0)),
        ];
        let summary = InspectorSummary::of(&elements, "a").unwrap();
        assert_eq!(summary.kind, ElementKind::Card);
        assert!(summary.collides);
        assert!(InspectorSummary::of(&elements, "zzz").is_none());
    }

    #[test]
    fn test_edit_json_form() {
        let edit: FieldEdit = serde_json::from_str(r#"{"field":"width","value":"100%"}"#).unwrap();
        assert_eq!(edit, FieldEdit::Width("100%".into()));
        let edit: FieldEdit = serde_json::from_str(r#"{"field":"content","value":["title","Hi"]}"#).unwrap();
        assert_eq!(edit, FieldEdit::Content(ContentField::Title, "Hi".into()));
    }
}
