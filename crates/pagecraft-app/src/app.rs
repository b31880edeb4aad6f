//! Application shell: owns the canvas, dispatches builder actions and moves
//! documents between the canvas, files, named storage and the clipboard.

use crate::error::{AppError, AppResult};
use crate::event_handler::{BuilderAction, Dispatch, EventHandler, ShellCommand};
use pagecraft_core::canvas::{Canvas, CanvasConfig};
use pagecraft_core::document;
use pagecraft_core::storage::{FileStorage, Storage, block_on};
use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "native")]
mod file_ops {
    /// Copy text to the system clipboard.
    pub fn copy_text_to_clipboard(text: &str) -> bool {
        match arboard::Clipboard::new() {
            Ok(mut clipboard) => match clipboard.set_text(text) {
                Ok(()) => {
                    log::info!("Copied {} bytes to clipboard", text.len());
                    true
                }
                Err(e) => {
                    log::error!("Failed to copy to clipboard: {}", e);
                    false
                }
            },
            Err(e) => {
                log::error!("Failed to access clipboard: {}", e);
                false
            }
        }
    }
}

#[cfg(not(feature = "native"))]
mod file_ops {
    pub fn copy_text_to_clipboard(_text: &str) -> bool {
        log::warn!("Clipboard not available without the native feature");
        false
    }
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub canvas: CanvasConfig,
    /// Directory for named documents. `None` uses the platform data directory.
    pub documents_dir: Option<PathBuf>,
    /// Seed a new page with the starter layout.
    pub starter_layout: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasConfig::default(),
            documents_dir: None,
            starter_layout: true,
        }
    }
}

/// Counts from replaying a list of actions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    pub applied: usize,
    pub ignored: usize,
    pub failed: usize,
}

/// Human-readable validation outcome.
pub fn validation_report(errors: &[String]) -> String {
    if errors.is_empty() {
        "Validation passed".to_string()
    } else {
        let mut report = String::from("Validation errors:");
        for error in errors {
            report.push_str("\n  - ");
            report.push_str(error);
        }
        report
    }
}

/// The builder application.
pub struct App {
    config: AppConfig,
    canvas: Canvas,
    events: EventHandler,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let canvas = if config.starter_layout {
            Canvas::with_starter_layout(config.canvas.clone())
        } else {
            Canvas::with_config(config.canvas.clone())
        };
        Self {
            config,
            canvas,
            events: EventHandler::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    /// Apply one action. Shell commands are carried out here.
    pub fn dispatch(&mut self, action: BuilderAction) -> AppResult<Dispatch> {
        let dispatch = self.events.handle(&mut self.canvas, action)?;
        match dispatch {
            Dispatch::Shell(ShellCommand::CopyJson) => {
                self.copy_json_to_clipboard()?;
            }
            Dispatch::Shell(ShellCommand::Validate) => {
                log::info!("{}", validation_report(&self.validate()));
            }
            Dispatch::Applied | Dispatch::Ignored => {}
        }
        Ok(dispatch)
    }

    /// Apply actions in order. A failing action is logged and skipped.
    pub fn replay(&mut self, actions: impl IntoIterator<Item = BuilderAction>) -> ReplayReport {
        let mut report = ReplayReport::default();
        for (index, action) in actions.into_iter().enumerate() {
            match self.dispatch(action) {
                Ok(Dispatch::Ignored) => report.ignored += 1,
                Ok(_) => report.applied += 1,
                Err(e) => {
                    log::error!("Action {} failed: {}", index, e);
                    report.failed += 1;
                }
            }
        }
        report
    }

    pub fn validate(&self) -> Vec<String> {
        self.canvas.validate()
    }

    /// Validate a document file as written, without importing it.
    pub fn validate_file(path: &Path) -> AppResult<Vec<String>> {
        let json = fs::read_to_string(path).map_err(AppError::io(path))?;
        let document = document::parse_document(&json)?;
        Ok(document::validate(&document))
    }

    /// Load a document file into the canvas.
    ///
    /// Returns `false` when the file has no element list; the canvas is left
    /// as it was.
    pub fn open_file(&mut self, path: &Path) -> AppResult<bool> {
        let json = fs::read_to_string(path).map_err(AppError::io(path))?;
        let loaded = self.canvas.load_json(&json)?;
        if loaded {
            self.events = EventHandler::new();
            log::info!("Loaded document from: {:?}", path);
        } else {
            log::warn!("No elements in {:?}, canvas unchanged", path);
        }
        Ok(loaded)
    }

    /// Write the current layout as a document file.
    pub fn save_file(&self, path: &Path) -> AppResult<()> {
        let json = self.canvas.to_json()?;
        fs::write(path, json).map_err(AppError::io(path))?;
        log::info!("Saved document to: {:?}", path);
        Ok(())
    }

    fn storage(&self) -> AppResult<FileStorage> {
        let storage = match &self.config.documents_dir {
            Some(dir) => FileStorage::new(dir)?,
            None => FileStorage::default_location()?,
        };
        Ok(storage)
    }

    /// Save the current layout under a name in the documents directory.
    pub fn save_named(&self, name: &str) -> AppResult<()> {
        let storage = self.storage()?;
        block_on(storage.save(name, &self.canvas.build_document()))?;
        log::info!("Saved document '{}' to {:?}", name, storage.base_path());
        Ok(())
    }

    /// Replace the canvas with a named document.
    pub fn load_named(&mut self, name: &str) -> AppResult<()> {
        let document = block_on(self.storage()?.load(name))?;
        self.canvas.import(document);
        self.events = EventHandler::new();
        log::info!("Loaded document '{}'", name);
        Ok(())
    }

    pub fn delete_named(&self, name: &str) -> AppResult<()> {
        block_on(self.storage()?.delete(name))?;
        Ok(())
    }

    /// Names of saved documents.
    pub fn list_named(&self) -> AppResult<Vec<String>> {
        Ok(block_on(self.storage()?.list())?)
    }

    /// Put the layout JSON on the clipboard. Returns `false` if the
    /// clipboard could not be written.
    pub fn copy_json_to_clipboard(&self) -> AppResult<bool> {
        self.copy_json_with(file_ops::copy_text_to_clipboard)
    }

    fn copy_json_with(&self, copy: impl FnOnce(&str) -> bool) -> AppResult<bool> {
        let json = self.canvas.to_json()?;
        let copied = copy(&json);
        if !copied {
            log::warn!("Layout JSON was not copied");
        }
        Ok(copied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_core::document::DocumentError;
    use pagecraft_core::element::ElementKind;
    use pagecraft_core::storage::StorageError;
    use tempfile::TempDir;

    fn app_in(dir: &TempDir) -> App {
        App::new(AppConfig {
            documents_dir: Some(dir.path().join("documents")),
            ..AppConfig::default()
        })
    }

    #[test]
    fn test_new_app_has_starter_layout() {
        let app = App::new(AppConfig::default());
        assert_eq!(app.canvas().elements().len(), 5);
        assert!(app.validate().is_empty());

        let empty = App::new(AppConfig {
            starter_layout: false,
            ..AppConfig::default()
        });
        assert!(empty.canvas().elements().is_empty());
    }

    #[test]
    fn test_save_and_open_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("layout.json");
        let app = app_in(&dir);
        app.save_file(&path).unwrap();

        let mut other = App::new(AppConfig {
            starter_layout: false,
            ..AppConfig::default()
        });
        assert!(other.open_file(&path).unwrap());
        assert_eq!(other.canvas().elements(), app.canvas().elements());
    }

    #[test]
    fn test_open_file_without_elements() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, r#"{"project": {"name": "x"}}"#).unwrap();
        let mut app = app_in(&dir);
        assert!(!app.open_file(&path).unwrap());
        assert_eq!(app.canvas().elements().len(), 5);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        let result = app.open_file(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(AppError::Io { .. })));
    }

    #[test]
    fn test_named_documents() {
        let dir = TempDir::new().unwrap();
        let mut app = app_in(&dir);
        app.save_named("home page").unwrap();
        assert_eq!(app.list_named().unwrap(), vec!["home_page".to_string()]);

        app.dispatch(BuilderAction::NewPage).unwrap();
        assert!(app.canvas().elements().is_empty());
        app.load_named("home page").unwrap();
        assert_eq!(app.canvas().elements().len(), 5);

        app.delete_named("home page").unwrap();
        assert!(matches!(
            app.load_named("home page"),
            Err(AppError::Storage(StorageError::NotFound(_)))
        ));
    }

    #[test]
    fn test_replay_continues_after_failure() {
        let mut app = App::new(AppConfig {
            starter_layout: false,
            ..AppConfig::default()
        });
        let report = app.replay([
            BuilderAction::QuickAdd {
                kind: ElementKind::from("gallery"),
            },
            BuilderAction::QuickAdd { kind: ElementKind::Card },
            BuilderAction::Delete {
                id: Some("missing".into()),
            },
        ]);
        assert_eq!(
            report,
            ReplayReport {
                applied: 1,
                ignored: 1,
                failed: 1
            }
        );
        assert!(app.canvas().element("elem_card_001").is_some());
    }

    #[test]
    fn test_validate_file_checks_document_as_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("holes.json");
        fs::write(
            &path,
            r#"{
                "canvas": {"width": 1200, "height": 800},
                "elements": [
                    {"id": "elem_card_001", "type": "card", "content": {},
                     "position": {"x": 40, "y": 40, "width": 300, "height": 200, "zIndex": 1}},
                    {"id": "elem_card_002", "type": "card", "content": {}}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(
            App::validate_file(&path).unwrap(),
            vec![
                "z-index should start from 1".to_string(),
                "elem_card_002: missing required fields".to_string(),
            ]
        );
    }

    #[test]
    fn test_validate_file_without_elements() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "{}").unwrap();
        assert!(matches!(
            App::validate_file(&path),
            Err(AppError::Document(DocumentError::MissingElements))
        ));
    }

    #[test]
    fn test_clipboard_failure_is_not_an_error() {
        let app = App::new(AppConfig::default());
        let mut copied = String::new();
        assert!(
            app.copy_json_with(|json| {
                copied = json.to_string();
                true
            })
            .unwrap()
        );
        assert_eq!(copied, app.canvas().to_json().unwrap());
        assert!(!app.copy_json_with(|_| false).unwrap());
    }

    #[cfg(not(feature = "native"))]
    #[test]
    fn test_clipboard_unavailable_without_native() {
        let app = App::new(AppConfig::default());
        assert!(!app.copy_json_to_clipboard().unwrap());
    }

    #[test]
    fn test_validation_report() {
        assert_eq!(validation_report(&[]), "Validation passed");
        let report = validation_report(&["Duplicate IDs found: a".to_string()]);
        assert_eq!(report, "Validation errors:\n  - Duplicate IDs found: a");
    }
}
