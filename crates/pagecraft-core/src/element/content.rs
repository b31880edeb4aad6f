//! Element content payloads.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Content of an element. Which fields are used depends on the element type:
///
/// - header: `text`
/// - footer: `copyright`
/// - card: `title`, `description`
/// - text-content: `html`
/// - slider: `slides`
///
/// Content is opaque to the builder: unrecognized keys from imported
/// documents, and known keys whose value has an unexpected JSON type, are
/// kept as-is in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct ElementContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slides: Option<Vec<Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Editable text fields of [`ElementContent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentField {
    Text,
    Html,
    Title,
    Description,
    Copyright,
}

impl From<Value> for ElementContent {
    fn from(value: Value) -> Self {
        let mut extra = match value {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                log::warn!("Ignoring non-object element content: {}", other);
                Map::new()
            }
        };
        let mut take_text = |key: &str| match extra.remove(key) {
            Some(Value::String(s)) => Some(s),
            Some(other) => {
                extra.insert(key.to_string(), other);
                None
            }
            None => None,
        };
        let text = take_text("text");
        let html = take_text("html");
        let title = take_text("title");
        let description = take_text("description");
        let copyright = take_text("copyright");
        let slides = match extra.remove("slides") {
            Some(Value::Array(slides)) => Some(slides),
            Some(other) => {
                extra.insert("slides".to_string(), other);
                None
            }
            None => None,
        };
        Self {
            text,
            html,
            title,
            description,
            copyright,
            slides,
            extra,
        }
    }
}

impl ContentField {
    /// Key of the field in a document.
    pub fn key(self) -> &'static str {
        match self {
            ContentField::Text => "text",
            ContentField::Html => "html",
            ContentField::Title => "title",
            ContentField::Description => "description",
            ContentField::Copyright => "copyright",
        }
    }
}

impl ElementContent {
    pub fn header(text: &str) -> Self {
        Self {
            text: Some(text.to_string()),
            ..Self::default()
        }
    }

    pub fn footer(copyright: &str) -> Self {
        Self {
            copyright: Some(copyright.to_string()),
            ..Self::default()
        }
    }

    pub fn card(title: &str, description: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            description: Some(description.to_string()),
            ..Self::default()
        }
    }

    pub fn text_block(html: &str) -> Self {
        Self {
            html: Some(html.to_string()),
            ..Self::default()
        }
    }

    pub fn slider(slides: Vec<Value>) -> Self {
        Self {
            slides: Some(slides),
            ..Self::default()
        }
    }

    /// Get a text field.
    pub fn field(&self, field: ContentField) -> Option<&str> {
        match field {
            ContentField::Text => self.text.as_deref(),
            ContentField::Html => self.html.as_deref(),
            ContentField::Title => self.title.as_deref(),
            ContentField::Description => self.description.as_deref(),
            ContentField::Copyright => self.copyright.as_deref(),
        }
    }

    /// Return a copy with one text field replaced.
    pub fn with_field(&self, field: ContentField, value: &str) -> Self {
        let mut content = self.clone();
        content.extra.remove(field.key());
        let slot = match field {
            ContentField::Text => &mut content.text,
            ContentField::Html => &mut content.html,
            ContentField::Title => &mut content.title,
            ContentField::Description => &mut content.description,
            ContentField::Copyright => &mut content.copyright,
        };
        *slot = Some(value.to_string());
        content
    }
}
