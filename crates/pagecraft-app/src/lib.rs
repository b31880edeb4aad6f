//! PageCraft Application
//!
//! The application shell around the core canvas: builder actions, keyboard
//! shortcuts, document files, named storage and the clipboard.

mod app;
mod error;
mod event_handler;
mod shortcuts;

pub use app::{App, AppConfig, ReplayReport, validation_report};
pub use error::{AppError, AppResult};
pub use event_handler::{BuilderAction, Dispatch, EventHandler, ShellCommand, parse_script};
pub use shortcuts::{Shortcut, ShortcutCommand, ShortcutRegistry};
