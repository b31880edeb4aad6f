//! PageCraft Core Library
//!
//! Platform-agnostic data model and logic for the PageCraft page builder:
//! elements on a fixed-size canvas, templates, drag gestures, z-ordering, and
//! the JSON document format layouts are exported to.

pub mod canvas;
pub mod document;
pub mod element;
pub mod geometry;
pub mod input;
pub mod inspector;
pub mod interaction;
pub mod snap;
pub mod storage;
pub mod template;
pub mod zorder;

pub use canvas::{Canvas, CanvasConfig, CanvasDocument};
pub use document::{DocumentError, ExportedDocument, parse_document, validate};
pub use element::{ContentField, Coordinate, Dimension, Element, ElementContent, ElementId, ElementKind, Position};
pub use input::{MouseButton, PointerEvent};
pub use inspector::{FieldEdit, InspectorSummary};
pub use interaction::InteractionController;
pub use snap::{GridConfig, snap, snap_point};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError, StorageResult};
pub use template::{TemplateCatalog, TemplateError};
