//! Template catalog: default size and content for each element type.

use crate::element::{
    BreakpointSize, Dimension, Element, ElementContent, ElementKind, Position, ResponsiveConfig,
};
use crate::zorder;
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

/// Width used when a template's string width isn't `100%`.
pub const FALLBACK_WIDTH: f64 = 300.0;
/// Height used when a template's height is `auto`.
pub const AUTO_HEIGHT: f64 = 100.0;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Template errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown element type: {0}")]
    UnknownType(String),
}

/// Default shape of one element type.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    pub kind: ElementKind,
    pub default_width: Dimension,
    pub default_height: Dimension,
    pub content: ElementContent,
}

impl Template {
    fn new(kind: ElementKind, width: Dimension, height: Dimension, content: ElementContent) -> Self {
        Self {
            kind,
            default_width: width,
            default_height: height,
            content,
        }
    }

    /// Width for a new element on a canvas of the given width.
    pub fn resolve_width(&self, canvas_width: f64) -> Dimension {
        match &self.default_width {
            Dimension::Fixed(px) => Dimension::Fixed(*px),
            Dimension::Percent(p) if *p == 100.0 => Dimension::Fixed(canvas_width),
            _ => Dimension::Fixed(FALLBACK_WIDTH),
        }
    }

    /// Height for a new element.
    pub fn resolve_height(&self) -> Dimension {
        match &self.default_height {
            Dimension::Auto => Dimension::Fixed(AUTO_HEIGHT),
            other => other.clone(),
        }
    }

    /// Human-readable default size, e.g. `{"width":"100%","height":80}`.
    pub fn size_label(&self) -> String {
        serde_json::json!({
            "width": self.default_width,
            "height": self.default_height,
        })
        .to_string()
    }
}

/// Registry of templates plus the per-type counters used to mint ids.
///
/// Counters live as long as the catalog; they are not persisted, so ids can
/// repeat across runs.
#[derive(Debug, Clone)]
pub struct TemplateCatalog {
    templates: Vec<Template>,
    counters: HashMap<ElementKind, u32>,
}

impl Default for TemplateCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateCatalog {
    /// Create the catalog with the built-in templates and fresh counters.
    pub fn new() -> Self {
        let templates = vec![
            Template::new(
                ElementKind::Header,
                Dimension::FULL,
                Dimension::Fixed(80.0),
                ElementContent::header("Site Title"),
            ),
            Template::new(
                ElementKind::Footer,
                Dimension::FULL,
                Dimension::Fixed(60.0),
                ElementContent::footer("© Test Builder | Test Case"),
            ),
            Template::new(
                ElementKind::Card,
                Dimension::Fixed(300.0),
                Dimension::Fixed(200.0),
                ElementContent::card("Card", "Card description..."),
            ),
            Template::new(
                ElementKind::TextContent,
                Dimension::Fixed(650.0),
                Dimension::Auto,
                ElementContent::text_block("<p>Text content will go here</p>"),
            ),
            Template::new(
                ElementKind::Slider,
                Dimension::FULL,
                Dimension::Fixed(400.0),
                ElementContent::slider(Vec::new()),
            ),
        ];
        let counters = templates.iter().map(|t| (t.kind.clone(), 1)).collect();
        Self { templates, counters }
    }

    /// All templates in palette order.
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    /// Look up a template.
    pub fn get(&self, kind: &ElementKind) -> Option<&Template> {
        self.templates.iter().find(|t| &t.kind == kind)
    }

    /// Mint the next id for a type: `elem_<type>_<NNN>`.
    pub fn next_id(&mut self, kind: &ElementKind) -> String {
        let counter = self.counters.entry(kind.clone()).or_insert(1);
        let index = *counter;
        *counter += 1;
        let token = WHITESPACE.replace_all(kind.as_str(), "_");
        format!("elem_{}_{:03}", token, index)
    }

    /// Create a new element from a template.
    ///
    /// The element gets a fresh id, the next free z-index above `existing`,
    /// and its own copy of the template content. Coordinates are used as given.
    pub fn instantiate(
        &mut self,
        kind: &ElementKind,
        x: f64,
        y: f64,
        canvas_width: f64,
        existing: &[Element],
    ) -> Result<Element, TemplateError> {
        let template = self
            .get(kind)
            .ok_or_else(|| TemplateError::UnknownType(kind.to_string()))?;
        let width = template.resolve_width(canvas_width);
        let height = template.resolve_height();
        let content = template.content.clone();

        let id = self.next_id(kind);
        let position = Position::new(x, y, width, height, zorder::next_z_index(existing));
        log::debug!("Instantiated {} at ({}, {})", id, x, y);
        Ok(Element::new(id, kind.clone(), content, position))
    }

    /// The layout a fresh builder opens with: header, two cards, a text
    /// block and a pinned footer, stacked 1..=5.
    pub fn starter_layout(&mut self) -> Vec<Element> {
        let header = Element::new(
            self.next_id(&ElementKind::Header),
            ElementKind::Header,
            ElementContent::header("Site Title"),
            Position::new(0.0, 0.0, Dimension::FULL, Dimension::Fixed(80.0), 1),
        )
        .with_responsive(ResponsiveConfig {
            mobile: Some(BreakpointSize {
                width: Dimension::FULL,
                height: Dimension::Fixed(60.0),
            }),
            tablet: Some(BreakpointSize {
                width: Dimension::FULL,
                height: Dimension::Fixed(70.0),
            }),
        });

        let card_at = |catalog: &mut Self, x: f64, z: i64| {
            Element::new(
                catalog.next_id(&ElementKind::Card),
                ElementKind::Card,
                ElementContent::card("Card Title", "Card Description..."),
                Position::new(x, 120.0, Dimension::Fixed(300.0), Dimension::Fixed(200.0), z),
            )
        };
        let first_card = card_at(self, 50.0, 2);
        let second_card = card_at(self, 380.0, 3);

        let mut text_position = Position::new(50.0, 340.0, Dimension::Fixed(650.0), Dimension::Auto, 4);
        text_position.min_height = Some(100.0);
        let text = Element::new(
            self.next_id(&ElementKind::TextContent),
            ElementKind::TextContent,
            ElementContent::text_block("<p>Text content will go here</p>"),
            text_position,
        );

        let mut footer_position = Position::new(0.0, 740.0, Dimension::FULL, Dimension::Fixed(60.0), 5);
        footer_position.fixed = Some(true);
        let footer = Element::new(
            self.next_id(&ElementKind::Footer),
            ElementKind::Footer,
            ElementContent::footer("© Test Builder | Test Case"),
            footer_position,
        );

        vec![header, first_card, second_card, text, footer]
    }
}
