//! Pane modules for the workspace
//!
//! Each pane renders into a `&mut Ui` with its own state and `SharedState`,
//! and returns `Vec<AppAction>` instead of mutating app state directly.

pub mod editor;
pub mod log_viewer;
pub mod ports;

pub use editor::EditorPaneState;
pub use log_viewer::LogViewerState;
pub use ports::PortsPaneState;
