//! Builder actions and their translation to canvas operations.

use crate::error::{AppError, AppResult};
use crate::shortcuts::ShortcutRegistry;
use pagecraft_core::canvas::Canvas;
use pagecraft_core::element::{ElementId, ElementKind};
use pagecraft_core::input::PointerEvent;
use pagecraft_core::inspector::FieldEdit;
use pagecraft_core::interaction::InteractionController;
use pagecraft_core::snap::GridConfig;
use serde::{Deserialize, Serialize};

/// One thing a user can do in the builder.
///
/// Actions that take an optional `id` fall back to the current selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
pub enum BuilderAction {
    /// A palette template dropped on the canvas.
    Drop { kind: ElementKind, x: f64, y: f64 },
    /// A palette template dragged over the canvas.
    DragOver { x: f64, y: f64 },
    /// Template drag left the canvas or was cancelled.
    DragEnd,
    QuickAdd { kind: ElementKind },
    Select { id: ElementId },
    ClearSelection,
    Delete {
        #[serde(default)]
        id: Option<ElementId>,
    },
    BringToFront {
        #[serde(default)]
        id: Option<ElementId>,
    },
    SendToBack {
        #[serde(default)]
        id: Option<ElementId>,
    },
    NormalizeZOrder,
    Edit {
        #[serde(default)]
        id: Option<ElementId>,
        edit: FieldEdit,
    },
    ToggleGrid,
    ToggleSnap,
    SetGrid { grid: GridConfig },
    NewPage,
    Pointer { event: PointerEvent },
    Key {
        key: String,
        #[serde(default)]
        ctrl: bool,
        #[serde(default)]
        shift: bool,
    },
    /// Abort any gesture and drop the selection.
    Cancel,
    CopyJson,
    Validate,
}

/// Work the shell has to do itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellCommand {
    CopyJson,
    Validate,
}

/// Result of dispatching an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The canvas changed or the action took effect.
    Applied,
    /// Nothing to do (no target, no active gesture, unbound key).
    Ignored,
    Shell(ShellCommand),
}

impl From<bool> for Dispatch {
    fn from(applied: bool) -> Self {
        if applied { Dispatch::Applied } else { Dispatch::Ignored }
    }
}

/// Parse a script: a JSON array of actions.
pub fn parse_script(json: &str) -> AppResult<Vec<BuilderAction>> {
    serde_json::from_str(json).map_err(AppError::Script)
}

/// Translates builder actions into canvas operations.
#[derive(Debug, Default)]
pub struct EventHandler {
    interaction: InteractionController,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interaction(&self) -> &InteractionController {
        &self.interaction
    }

    fn target(canvas: &Canvas, id: Option<ElementId>) -> Option<ElementId> {
        id.or_else(|| canvas.selection.clone())
    }

    /// Apply one action.
    pub fn handle(&mut self, canvas: &mut Canvas, action: BuilderAction) -> AppResult<Dispatch> {
        let dispatch = match action {
            BuilderAction::Drop { kind, x, y } => {
                let id = canvas.drop_template(&kind, x, y)?;
                log::info!("Dropped {} as {}", kind, id);
                Dispatch::Applied
            }
            BuilderAction::DragOver { x, y } => {
                canvas.drop_preview(x, y);
                Dispatch::Applied
            }
            BuilderAction::DragEnd => {
                canvas.clear_drop_preview();
                Dispatch::Applied
            }
            BuilderAction::QuickAdd { kind } => {
                let id = canvas.quick_add(&kind)?;
                log::info!("Added {}", id);
                Dispatch::Applied
            }
            BuilderAction::Select { id } => {
                if !canvas.select(&id) {
                    return Err(AppError::UnknownElement(id));
                }
                Dispatch::Applied
            }
            BuilderAction::ClearSelection => {
                canvas.clear_selection();
                Dispatch::Applied
            }
            BuilderAction::Delete { id } => match Self::target(canvas, id) {
                Some(id) => canvas.delete(&id).is_some().into(),
                None => Dispatch::Ignored,
            },
            BuilderAction::BringToFront { id } => match Self::target(canvas, id) {
                Some(id) => canvas.bring_to_front(&id).into(),
                None => Dispatch::Ignored,
            },
            BuilderAction::SendToBack { id } => match Self::target(canvas, id) {
                Some(id) => canvas.send_to_back(&id).into(),
                None => Dispatch::Ignored,
            },
            BuilderAction::NormalizeZOrder => {
                canvas.normalize_z_order();
                Dispatch::Applied
            }
            BuilderAction::Edit { id, edit } => match Self::target(canvas, id) {
                Some(id) => canvas.apply_edit(&id, &edit).into(),
                None => Dispatch::Ignored,
            },
            BuilderAction::ToggleGrid => {
                canvas.toggle_grid_visibility();
                Dispatch::Applied
            }
            BuilderAction::ToggleSnap => {
                canvas.toggle_snap();
                Dispatch::Applied
            }
            BuilderAction::SetGrid { grid } => {
                canvas.set_grid(GridConfig::new(grid.enabled, grid.size, grid.snap));
                Dispatch::Applied
            }
            BuilderAction::NewPage => {
                self.interaction.release_all();
                canvas.new_page();
                Dispatch::Applied
            }
            BuilderAction::Pointer { event } => self.interaction.handle_pointer_event(canvas, event).into(),
            BuilderAction::Key { key, ctrl, shift } => match ShortcutRegistry::action_for(&key, ctrl, shift) {
                Some(action) => return self.handle(canvas, action),
                None => {
                    log::debug!("No binding for {}", key);
                    Dispatch::Ignored
                }
            },
            BuilderAction::Cancel => {
                self.interaction.release_all();
                canvas.clear_selection();
                canvas.clear_drop_preview();
                Dispatch::Applied
            }
            BuilderAction::CopyJson => Dispatch::Shell(ShellCommand::CopyJson),
            BuilderAction::Validate => Dispatch::Shell(ShellCommand::Validate),
        };
        Ok(dispatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Point;
    use pagecraft_core::canvas::CanvasConfig;
    use pagecraft_core::input::MouseButton;

    #[test]
    fn test_parse_script() {
        let script = r#"[
            {"action": "drop", "kind": "card", "x": 103, "y": 207},
            {"action": "pointer", "event": {"kind": "down", "position": {"x": 150, "y": 250}}},
            {"action": "pointer", "event": {"kind": "move", "position": {"x": 173, "y": 244}}},
            {"action": "pointer", "event": {"kind": "up", "position": {"x": 173, "y": 244}}},
            {"action": "edit", "edit": {"field": "width", "value": "50%"}},
            {"action": "key", "key": "Delete"},
            {"action": "copy-json"}
        ]"#;
        let actions = parse_script(script).unwrap();
        assert_eq!(actions.len(), 7);
        assert_eq!(
            actions[0],
            BuilderAction::Drop {
                kind: ElementKind::Card,
                x: 103.0,
                y: 207.0
            }
        );
        assert!(matches!(actions[6], BuilderAction::CopyJson));
    }

    #[test]
    fn test_bad_script() {
        assert!(matches!(parse_script(r#"[{"action": "fly"}]"#), Err(AppError::Script(_))));
    }

    #[test]
    fn test_drop_then_drag() {
        let mut canvas = Canvas::new();
        let mut handler = EventHandler::new();
        let actions = [
            BuilderAction::Drop {
                kind: ElementKind::Card,
                x: 103.0,
                y: 207.0,
            },
            BuilderAction::Pointer {
                event: PointerEvent::Down {
                    position: Point::new(150.0, 250.0),
                    button: MouseButton::Left,
                },
            },
            BuilderAction::Pointer {
                event: PointerEvent::Move {
                    position: Point::new(173.0, 244.0),
                },
            },
            BuilderAction::Pointer {
                event: PointerEvent::Up {
                    position: Point::new(173.0, 244.0),
                    button: MouseButton::Left,
                },
            },
        ];
        for action in actions {
            handler.handle(&mut canvas, action).unwrap();
        }
        let card = canvas.element("elem_card_001").unwrap();
        assert_eq!(card.position.origin(), Point::new(120.0, 200.0));
        assert!(handler.interaction().listeners().is_empty());
    }

    #[test]
    fn test_actions_fall_back_to_selection() {
        let mut canvas = Canvas::with_starter_layout(CanvasConfig::default());
        let mut handler = EventHandler::new();
        handler
            .handle(&mut canvas, BuilderAction::Select { id: "elem_card_001".into() })
            .unwrap();
        let dispatch = handler
            .handle(&mut canvas, BuilderAction::BringToFront { id: None })
            .unwrap();
        assert_eq!(dispatch, Dispatch::Applied);
        assert_eq!(canvas.element("elem_card_001").unwrap().z_index(), 6);

        handler
            .handle(
                &mut canvas,
                BuilderAction::Key {
                    key: "Delete".into(),
                    ctrl: false,
                    shift: false,
                },
            )
            .unwrap();
        assert!(canvas.element("elem_card_001").is_none());
        assert!(canvas.selection.is_none());

        let dispatch = handler.handle(&mut canvas, BuilderAction::Delete { id: None }).unwrap();
        assert_eq!(dispatch, Dispatch::Ignored);
    }

    #[test]
    fn test_unknown_template_is_an_error() {
        let mut canvas = Canvas::new();
        let mut handler = EventHandler::new();
        let result = handler.handle(
            &mut canvas,
            BuilderAction::QuickAdd {
                kind: ElementKind::from("gallery"),
            },
        );
        assert!(matches!(result, Err(AppError::Template(_))));
        assert!(canvas.elements().is_empty());
    }

    #[test]
    fn test_select_unknown_element() {
        let mut canvas = Canvas::new();
        let mut handler = EventHandler::new();
        let result = handler.handle(&mut canvas, BuilderAction::Select { id: "nope".into() });
        assert!(matches!(result, Err(AppError::UnknownElement(id)) if id == "nope"));
    }

    #[test]
    fn test_shell_commands_pass_through() {
        let mut canvas = Canvas::new();
        let mut handler = EventHandler::new();
        assert_eq!(
            handler.handle(&mut canvas, BuilderAction::Validate).unwrap(),
            Dispatch::Shell(ShellCommand::Validate)
        );
    }

    #[test]
    fn test_set_grid_clamps_size() {
        let mut canvas = Canvas::new();
        let mut handler = EventHandler::new();
        let grid = GridConfig {
            enabled: true,
            size: 0,
            snap: true,
        };
        handler.handle(&mut canvas, BuilderAction::SetGrid { grid }).unwrap();
        assert_eq!(canvas.grid.size, 1);
    }
}
