//! Canvas document and builder state.

use crate::document::{self, CanvasInfo, DocumentError, ExportedDocument};
use crate::element::{Element, ElementId, ElementKind};
use crate::inspector::{self, FieldEdit, InspectorSummary};
use crate::snap::{GridConfig, snap, snap_point};
use crate::template::{TemplateCatalog, TemplateError};
use crate::zorder;
use kurbo::{Point, Rect, Size};

/// Default canvas width in pixels.
pub const DEFAULT_CANVAS_WIDTH: f64 = 1200.0;
/// Default canvas height in pixels.
pub const DEFAULT_CANVAS_HEIGHT: f64 = 800.0;
pub const DEFAULT_PROJECT_NAME: &str = "Test Builder Layout";
pub const DEFAULT_PROJECT_VERSION: &str = "1.0";

/// Side length of the resize handle drawn at an element's bottom-right corner.
pub const RESIZE_HANDLE_SIZE: f64 = 16.0;

/// Initial settings for a canvas.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasConfig {
    pub size: Size,
    pub grid: GridConfig,
    pub project_name: String,
    pub project_version: String,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            size: Size::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT),
            grid: GridConfig::default(),
            project_name: DEFAULT_PROJECT_NAME.to_string(),
            project_version: DEFAULT_PROJECT_VERSION.to_string(),
        }
    }
}

/// Ordered collection of elements. Store order is insertion order; paint
/// order comes from z-indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasDocument {
    elements: Vec<Element>,
}

impl CanvasDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_elements(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// Append an element.
    pub fn add(&mut self, element: Element) {
        self.elements.push(element);
    }

    /// Remove an element by id.
    pub fn remove(&mut self, id: &str) -> Option<Element> {
        let index = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(index))
    }

    /// Replace the element that has the same id. Returns false if there is none.
    pub fn replace(&mut self, element: Element) -> bool {
        match self.elements.iter_mut().find(|e| e.id == element.id) {
            Some(slot) => {
                *slot = element;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Mutable access for bulk operations that replace elements in place.
    pub(crate) fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    /// Elements back to front.
    pub fn elements_ordered(&self) -> impl Iterator<Item = &Element> {
        zorder::paint_order(&self.elements)
            .into_iter()
            .map(move |i| &self.elements[i])
    }

    /// Topmost element drawn under `point`.
    pub fn element_at_point(&self, point: Point, canvas: Size) -> Option<&Element> {
        let order = zorder::paint_order(&self.elements);
        order
            .into_iter()
            .rev()
            .map(|i| &self.elements[i])
            .find(|e| e.position.display_rect(canvas).contains(point))
    }

    pub fn clear(&mut self) {
        self.elements.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }
}

/// The builder: element store plus selection, canvas size, grid and the
/// template catalog that mints new elements.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// The elements being edited. Written only through `Canvas` operations.
    pub(crate) document: CanvasDocument,
    /// Canvas size in pixels.
    pub size: Size,
    pub grid: GridConfig,
    /// Currently selected element, if any.
    pub selection: Option<ElementId>,
    /// Template catalog and its id counters.
    pub catalog: TemplateCatalog,
    /// Snapped position shown while a template is dragged over the canvas.
    pub drop_preview: Option<Point>,
    pub project_name: String,
    pub project_version: String,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an empty canvas with default settings.
    pub fn new() -> Self {
        Self::with_config(CanvasConfig::default())
    }

    /// Create an empty canvas.
    pub fn with_config(config: CanvasConfig) -> Self {
        Self {
            document: CanvasDocument::new(),
            size: config.size,
            grid: config.grid,
            selection: None,
            catalog: TemplateCatalog::new(),
            drop_preview: None,
            project_name: config.project_name,
            project_version: config.project_version,
        }
    }

    /// Create a canvas holding the starter layout.
    pub fn with_starter_layout(config: CanvasConfig) -> Self {
        let mut canvas = Self::with_config(config);
        let layout = canvas.catalog.starter_layout();
        canvas.document = CanvasDocument::from_elements(layout);
        canvas
    }

    pub fn elements(&self) -> &[Element] {
        self.document.elements()
    }

    /// Read access to the element store.
    pub fn document(&self) -> &CanvasDocument {
        &self.document
    }

    pub fn element(&self, id: &str) -> Option<&Element> {
        self.document.get(id)
    }

    /// Append an element as-is.
    pub fn add_element(&mut self, element: Element) {
        log::debug!("Adding element {}", element.id);
        self.document.add(element);
    }

    /// Replace an element with a modified copy. Returns false if the id is gone.
    pub fn replace_element(&mut self, element: Element) -> bool {
        self.document.replace(element)
    }

    /// Delete an element, clearing the selection if it pointed at it.
    pub fn delete(&mut self, id: &str) -> Option<Element> {
        let removed = self.document.remove(id)?;
        if self.selection.as_deref() == Some(id) {
            self.selection = None;
        }
        log::debug!("Deleted element {}", id);
        Some(removed)
    }

    /// Delete the selected element.
    pub fn delete_selected(&mut self) -> Option<Element> {
        let id = self.selection.clone()?;
        self.delete(&id)
    }

    /// Select an element. Returns false if the id isn't present.
    pub fn select(&mut self, id: &str) -> bool {
        if !self.document.contains(id) {
            return false;
        }
        self.selection = Some(id.to_string());
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selection.as_deref() == Some(id)
    }

    /// The selected element, if it still exists.
    pub fn selected_element(&self) -> Option<&Element> {
        self.selection.as_deref().and_then(|id| self.document.get(id))
    }

    /// Start over with an empty page.
    pub fn new_page(&mut self) {
        self.document.clear();
        self.selection = None;
        self.drop_preview = None;
        log::info!("Started a new page");
    }

    /// Snapped preview position for a template dragged to `(x, y)`.
    pub fn drop_preview(&mut self, x: f64, y: f64) -> Point {
        let point = snap_point(Point::new(x.round(), y.round()), &self.grid);
        self.drop_preview = Some(point);
        point
    }

    pub fn clear_drop_preview(&mut self) {
        self.drop_preview = None;
    }

    /// Drop a template at `(x, y)`: the point is rounded to whole pixels,
    /// snapped, and the new element is appended and selected.
    pub fn drop_template(&mut self, kind: &ElementKind, x: f64, y: f64) -> Result<ElementId, TemplateError> {
        let x = snap(x.round(), &self.grid);
        let y = snap(y.round(), &self.grid);
        let id = self.insert_from_template(kind, x, y)?;
        self.drop_preview = None;
        Ok(id)
    }

    /// Add a template at its quick-add spot without snapping: cards at
    /// (100, 100), text blocks at (50, 50), everything else at the origin.
    pub fn quick_add(&mut self, kind: &ElementKind) -> Result<ElementId, TemplateError> {
        let (x, y) = match kind {
            ElementKind::Card => (100.0, 100.0),
            ElementKind::TextContent => (50.0, 50.0),
            _ => (0.0, 0.0),
        };
        self.insert_from_template(kind, x, y)
    }

    fn insert_from_template(&mut self, kind: &ElementKind, x: f64, y: f64) -> Result<ElementId, TemplateError> {
        let element = self
            .catalog
            .instantiate(kind, x, y, self.size.width, self.document.elements())?;
        let id = element.id.clone();
        self.add_element(element);
        self.selection = Some(id.clone());
        Ok(id)
    }

    pub fn bring_to_front(&mut self, id: &str) -> bool {
        zorder::bring_to_front(self.document.elements_mut(), id)
    }

    pub fn send_to_back(&mut self, id: &str) -> bool {
        zorder::send_to_back(self.document.elements_mut(), id)
    }

    /// Renumber z-indices to 1..=n keeping the stacking order.
    pub fn normalize_z_order(&mut self) {
        zorder::normalize(self.document.elements_mut());
    }

    /// Check whether an element overlaps any other.
    pub fn check_collision(&self, id: &str) -> bool {
        inspector::check_collision(self.document.elements(), id)
    }

    /// Apply an inspector edit.
    pub fn apply_edit(&mut self, id: &str, edit: &FieldEdit) -> bool {
        inspector::apply_edit(self.document.elements_mut(), id, edit)
    }

    /// Inspector view of the selected element.
    pub fn inspect_selection(&self) -> Option<InspectorSummary> {
        let id = self.selection.as_deref()?;
        InspectorSummary::of(self.document.elements(), id)
    }

    pub fn set_grid(&mut self, grid: GridConfig) {
        self.grid = grid;
    }

    pub fn toggle_grid_visibility(&mut self) {
        self.grid.toggle_enabled();
    }

    pub fn toggle_snap(&mut self) {
        self.grid.toggle_snap();
    }

    /// Topmost element under a canvas point.
    pub fn element_at(&self, point: Point) -> Option<&Element> {
        self.document.element_at_point(point, self.size)
    }

    /// Resize handle of an element, centered on its bottom-right corner.
    pub fn resize_handle(&self, id: &str) -> Option<Rect> {
        let element = self.document.get(id)?;
        let rect = element.position.display_rect(self.size);
        Some(Rect::from_center_size(
            Point::new(rect.x1, rect.y1),
            Size::new(RESIZE_HANDLE_SIZE, RESIZE_HANDLE_SIZE),
        ))
    }

    /// Snapshot the canvas into an exportable document.
    pub fn build_document(&self) -> ExportedDocument {
        let canvas = CanvasInfo {
            width: self.size.width,
            height: self.size.height,
            grid: self.grid,
        };
        ExportedDocument::new(&self.project_name, &self.project_version, canvas, self.document.elements())
    }

    /// Export as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        self.build_document().to_json()
    }

    /// Replace the elements with those of a parsed document.
    ///
    /// The canvas size is taken from the document only when both dimensions
    /// are positive. The selection is dropped if its element is gone.
    pub fn import(&mut self, document: ExportedDocument) {
        let elements: Vec<Element> = document
            .elements
            .into_iter()
            .map(|record| record.into_element())
            .collect();
        log::info!("Imported {} elements", elements.len());
        self.document = CanvasDocument::from_elements(elements);

        let CanvasInfo { width, height, .. } = document.canvas;
        if width > 0.0 && height > 0.0 {
            self.size = Size::new(width, height);
            log::debug!("Canvas resized to {}x{}", width, height);
        }

        if self
            .selection
            .as_deref()
            .is_some_and(|id| !self.document.contains(id))
        {
            self.selection = None;
        }
        self.drop_preview = None;
    }

    /// Parse and import a JSON document.
    ///
    /// A document without `elements` is ignored and yields `Ok(false)`.
    /// Malformed JSON is an error and leaves the canvas untouched.
    pub fn load_json(&mut self, json: &str) -> Result<bool, DocumentError> {
        match document::parse_document(json) {
            Ok(document) => {
                self.import(document);
                Ok(true)
            }
            Err(DocumentError::MissingElements) => {
                log::debug!("Ignoring document without elements");
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Validate the current state as it would be exported.
    pub fn validate(&self) -> Vec<String> {
        document::validate(&self.build_document())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{Coordinate, Dimension};

    fn canvas() -> Canvas {
        Canvas::new()
    }

    #[test]
    fn test_new_canvas_defaults() {
        let canvas = canvas();
        assert_eq!(canvas.size, Size::new(1200.0, 800.0));
        assert_eq!(canvas.grid, GridConfig::new(true, 10, true));
        assert!(canvas.document.is_empty());
        assert!(canvas.selection.is_none());
    }

    #[test]
    fn test_drop_template_snaps_and_selects() {
        let mut canvas = canvas();
        let id = canvas.drop_template(&ElementKind::Card, 103.0, 207.0).unwrap();
        assert_eq!(id, "elem_card_001");
        let card = canvas.element(&id).unwrap();
        assert_eq!(card.position.origin(), Point::new(100.0, 210.0));
        assert_eq!(card.position.width, Dimension::Fixed(300.0));
        assert!(canvas.is_selected(&id));
    }

    #[test]
    fn test_drop_rounds_before_snapping() {
        let mut canvas = canvas();
        canvas.set_grid(GridConfig::new(true, 10, false));
        let id = canvas.drop_template(&ElementKind::Card, 12.6, 7.4).unwrap();
        let card = canvas.element(&id).unwrap();
        assert_eq!(card.position.origin(), Point::new(13.0, 7.0));
    }

    #[test]
    fn test_drop_unknown_type_leaves_store_alone() {
        let mut canvas = canvas();
        assert!(canvas.drop_template(&ElementKind::from("gallery"), 0.0, 0.0).is_err());
        assert!(canvas.document.is_empty());
    }

    #[test]
    fn test_drop_header_spans_canvas() {
        let mut canvas = canvas();
        let id = canvas.drop_template(&ElementKind::Header, 0.0, 0.0).unwrap();
        assert_eq!(canvas.element(&id).unwrap().position.width, Dimension::Fixed(1200.0));
    }

    #[test]
    fn test_drop_preview() {
        let mut canvas = canvas();
        assert_eq!(canvas.drop_preview(44.0, 46.0), Point::new(40.0, 50.0));
        assert_eq!(canvas.drop_preview, Some(Point::new(40.0, 50.0)));
        canvas.drop_template(&ElementKind::Card, 44.0, 46.0).unwrap();
        assert!(canvas.drop_preview.is_none());
    }

    #[test]
    fn test_quick_add() {
        let mut canvas = canvas();
        let card = canvas.quick_add(&ElementKind::Card).unwrap();
        let text = canvas.quick_add(&ElementKind::TextContent).unwrap();
        assert_eq!(canvas.element(&card).unwrap().position.origin(), Point::new(100.0, 100.0));
        let text_el = canvas.element(&text).unwrap();
        assert_eq!(text_el.position.origin(), Point::new(50.0, 50.0));
        assert_eq!(text_el.z_index(), 2);
        assert!(canvas.is_selected(&text));
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut canvas = canvas();
        let a = canvas.quick_add(&ElementKind::Card).unwrap();
        let b = canvas.quick_add(&ElementKind::Card).unwrap();
        assert!(canvas.delete(&a).is_some());
        assert!(canvas.is_selected(&b));
        assert!(canvas.delete(&b).is_some());
        assert!(canvas.selection.is_none());
        assert!(canvas.delete("missing").is_none());
    }

    #[test]
    fn test_new_page() {
        let mut canvas = Canvas::with_starter_layout(CanvasConfig::default());
        canvas.select("elem_card_001");
        canvas.new_page();
        assert!(canvas.document.is_empty());
        assert!(canvas.selection.is_none());
        assert_eq!(canvas.quick_add(&ElementKind::Card).unwrap(), "elem_card_003");
    }

    #[test]
    fn test_select_missing_id() {
        let mut canvas = canvas();
        assert!(!canvas.select("elem_card_001"));
        assert!(canvas.selection.is_none());
    }

    #[test]
    fn test_starter_layout_validates() {
        let canvas = Canvas::with_starter_layout(CanvasConfig::default());
        assert_eq!(canvas.elements().len(), 5);
        assert!(canvas.validate().is_empty());
    }

    #[test]
    fn test_instantiated_store_validates() {
        let mut canvas = canvas();
        for kind in ElementKind::ALL {
            canvas.drop_template(&kind, 20.0, 30.0).unwrap();
        }
        assert!(canvas.validate().is_empty());
    }

    #[test]
    fn test_z_order_changes_then_normalize() {
        let mut canvas = Canvas::with_starter_layout(CanvasConfig::default());
        assert!(canvas.bring_to_front("elem_header_001"));
        assert!(canvas.send_to_back("elem_footer_001"));
        assert!(!canvas.validate().is_empty());

        canvas.normalize_z_order();
        assert!(canvas.validate().is_empty());
        let top = canvas.document.elements_ordered().last().unwrap();
        assert_eq!(top.id, "elem_header_001");
        let bottom = canvas.document.elements_ordered().next().unwrap();
        assert_eq!(bottom.id, "elem_footer_001");
    }

    #[test]
    fn test_round_trip_import() {
        let original = Canvas::with_starter_layout(CanvasConfig::default());
        let json = original.to_json().unwrap();

        let mut restored = Canvas::with_config(CanvasConfig {
            size: Size::new(640.0, 480.0),
            ..CanvasConfig::default()
        });
        assert!(restored.load_json(&json).unwrap());
        assert_eq!(restored.document, original.document);
        assert_eq!(restored.size, original.size);
    }

    #[test]
    fn test_import_keeps_size_without_positive_dimensions() {
        let mut canvas = canvas();
        let json = r#"{"canvas":{"width":0,"height":600},"elements":[]}"#;
        assert!(canvas.load_json(json).unwrap());
        assert_eq!(canvas.size, Size::new(1200.0, 800.0));
    }

    #[test]
    fn test_load_without_elements_is_ignored() {
        let mut canvas = Canvas::with_starter_layout(CanvasConfig::default());
        assert!(!canvas.load_json(r#"{"canvas":{"width":10,"height":10}}"#).unwrap());
        assert_eq!(canvas.elements().len(), 5);
        assert_eq!(canvas.size, Size::new(1200.0, 800.0));
    }

    #[test]
    fn test_load_invalid_json_leaves_store() {
        let mut canvas = Canvas::with_starter_layout(CanvasConfig::default());
        let before = canvas.document.clone();
        assert!(canvas.load_json("{oops").is_err());
        assert_eq!(canvas.document, before);
    }

    #[test]
    fn test_import_drops_stale_selection() {
        let mut canvas = Canvas::with_starter_layout(CanvasConfig::default());
        canvas.select("elem_card_002");
        canvas.load_json(r#"{"elements":[]}"#).unwrap();
        assert!(canvas.selection.is_none());
    }

    #[test]
    fn test_extreme_imported_z_index() {
        let mut canvas = canvas();
        let json = format!(
            r#"{{"elements":[
                {{"id":"elem_card_001","type":"card","content":{{}},
                  "position":{{"x":0,"y":0,"width":300,"height":200,"zIndex":{}}}}},
                {{"id":"elem_card_002","type":"card","content":{{}},
                  "position":{{"x":400,"y":0,"width":300,"height":200,"zIndex":{}}}}}
            ]}}"#,
            i64::MAX,
            i64::MIN
        );
        assert!(canvas.load_json(&json).unwrap());

        assert!(!canvas.bring_to_front("elem_card_002"));
        assert!(!canvas.send_to_back("elem_card_001"));
        assert_eq!(canvas.element("elem_card_001").unwrap().z_index(), i64::MAX);
        assert_eq!(canvas.element("elem_card_002").unwrap().z_index(), i64::MIN);

        let id = canvas.quick_add(&ElementKind::Card).unwrap();
        assert_eq!(canvas.element(&id).unwrap().z_index(), i64::MAX);
    }

    #[test]
    fn test_import_lenient_values() {
        let mut canvas = canvas();
        let json = r#"{"elements":[
            {"id":"elem_card_001","type":"card","content":{"title":"T","text":5},
             "position":{"x":"10%","y":"20","width":300,"height":200,"zIndex":"2"}},
            {"id":"elem_header_001","type":"header","content":{"text":"Hi"},
             "position":{"x":-5,"y":0,"width":"100%","height":80,"zIndex":1}}
        ]}"#;
        assert!(canvas.load_json(json).unwrap());

        let card = canvas.element("elem_card_001").unwrap();
        assert_eq!(card.z_index(), 2);
        assert_eq!(card.position.x, Coordinate::Text("10%".into()));
        assert_eq!(card.content.extra.get("text"), Some(&serde_json::Value::from(5)));
        assert_eq!(card.position.display_rect(canvas.size).origin(), Point::new(120.0, 20.0));

        // Only the numeric x of the header is bounds-checked.
        assert_eq!(canvas.validate(), vec!["elem_header_001: x out of range".to_string()]);

        let exported: serde_json::Value = serde_json::from_str(&canvas.to_json().unwrap()).unwrap();
        assert_eq!(exported["elements"][0]["position"]["x"], "10%");
        assert_eq!(exported["elements"][0]["content"]["text"], 5);
    }

    #[test]
    fn test_element_at_point_prefers_top() {
        let mut canvas = canvas();
        let a = canvas.quick_add(&ElementKind::Card).unwrap();
        let b = canvas.quick_add(&ElementKind::Card).unwrap();
        let point = Point::new(150.0, 150.0);
        assert_eq!(canvas.element_at(point).unwrap().id, b);
        canvas.bring_to_front(&a);
        assert_eq!(canvas.element_at(point).unwrap().id, a);
        assert!(canvas.element_at(Point::new(1000.0, 700.0)).is_none());
    }

    #[test]
    fn test_resize_handle() {
        let mut canvas = canvas();
        let id = canvas.quick_add(&ElementKind::Card).unwrap();
        let handle = canvas.resize_handle(&id).unwrap();
        assert_eq!(handle, Rect::new(392.0, 292.0, 408.0, 308.0));
    }

    #[test]
    fn test_collision_through_canvas() {
        let mut canvas = Canvas::with_starter_layout(CanvasConfig::default());
        assert!(!canvas.check_collision("elem_card_001"));
        canvas.apply_edit("elem_card_002", &FieldEdit::X("200".into()));
        assert!(canvas.check_collision("elem_card_001"));
    }

    #[test]
    fn test_grid_toggles() {
        let mut canvas = canvas();
        canvas.toggle_grid_visibility();
        assert!(!canvas.grid.enabled);
        canvas.drop_template(&ElementKind::Card, 103.0, 207.0).unwrap();
        assert_eq!(canvas.elements()[0].position.origin(), Point::new(103.0, 207.0));
        canvas.toggle_grid_visibility();
        canvas.toggle_snap();
        assert!(!canvas.grid.is_snapping());
    }
}
