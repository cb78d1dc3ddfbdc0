//! Pane registry: data-driven pane registration.
//!
//! The registry is the single source of truth for all pane kinds:
//! display names, singleton flags, and factory functions.
//! The View menu and workspace pane creation are driven from this data.

use crate::config::FormatKind;
use crate::frontend::pane_trait::Pane;
use crate::frontend::panes::{EditorPaneState, LogViewerState, PortsPaneState};
use crate::frontend::workspace::PaneKind;

/// Metadata for a pane kind, including its factory function.
pub struct PaneKindInfo {
    pub kind: PaneKind,
    pub display_name: &'static str,
    pub is_singleton: bool,
    pub factory: fn() -> Box<dyn Pane>,
}

/// Build the pane registry with all known pane kinds.
pub fn build_registry() -> Vec<PaneKindInfo> {
    vec![
        // Singletons
        PaneKindInfo {
            kind: PaneKind::Ports,
            display_name: "Ports",
            is_singleton: true,
            factory: || Box::new(PortsPaneState::default()),
        },
        // Multi-instance
        PaneKindInfo {
            kind: PaneKind::ConfigEditor,
            display_name: "Configuration",
            is_singleton: false,
            factory: || Box::new(EditorPaneState::new(FormatKind::Configuration)),
        },
        PaneKindInfo {
            kind: PaneKind::LogSettingsEditor,
            display_name: "Log Settings",
            is_singleton: false,
            factory: || Box::new(EditorPaneState::new(FormatKind::Logging)),
        },
        PaneKindInfo {
            kind: PaneKind::LogViewer,
            display_name: "Log Viewer",
            is_singleton: false,
            factory: || Box::new(LogViewerState::default()),
        },
    ]
}
