//! Shared state types for the frontend
//!
//! Panes receive `SharedState` via borrowing and return `AppAction`s instead of
//! mutating app-wide state they do not own. The one exception is
//! [`AppState`], which panes may update through its accessors.

use std::path::PathBuf;

use crate::config::{AppState, FormatKind, FormatLibrary};
use crate::sidecar::SidecarCommand;

use super::notifications::Notifications;
use super::workspace::{PaneId, PaneKind};

/// Shared state accessible by all panes (borrowed, not owned).
pub struct SharedState<'a> {
    /// Selected port, recent files, preferences
    pub app_state: &'a mut AppState,

    /// Reference formats and option lists (read-only)
    pub formats: &'a FormatLibrary,

    pub notifications: &'a mut Notifications,

    /// Commands submitted to the sidecar and not yet answered
    pub sidecar_pending: usize,

    /// Pane being rendered, if any
    pub current_pane_id: Option<PaneId>,
}

impl SharedState<'_> {
    pub fn sidecar_busy(&self) -> bool {
        self.sidecar_pending > 0
    }

    /// Selected port, or a warning notification when none is selected
    pub fn require_port(&mut self) -> Option<String> {
        match self.app_state.selected_port() {
            Some(port) => Some(port.to_string()),
            None => {
                self.notifications.warning(
                    "No port selected",
                    "Detect ports and pick one in the Ports pane first.",
                );
                None
            }
        }
    }

    /// Sidecar action whose reply is routed back to the current pane
    pub fn sidecar_action(&self, command: SidecarCommand) -> AppAction {
        AppAction::RunSidecar {
            origin: self.current_pane_id,
            command,
        }
    }
}

/// Actions that any pane can emit
///
/// Panes return `Vec<AppAction>` instead of mutating state directly.
#[derive(Debug, Clone)]
pub enum AppAction {
    // Sidecar
    /// Run a sidecar command; the reply goes to `origin` when set
    RunSidecar {
        origin: Option<PaneId>,
        command: SidecarCommand,
    },
    /// Shortcut for `port.detect` with no origin
    DetectPorts,

    // Files
    /// Open a configuration or log-settings document in a new editor
    OpenDocument { kind: FormatKind, path: PathBuf },
    /// Open a CSV log file in a new viewer
    OpenLog(PathBuf),
    /// Open CSV text fetched from the device in a new viewer
    OpenLogText { title: String, csv: String },

    // Dialogs
    OpenDialog(DialogId),

    // Workspace actions
    /// Open/focus a singleton pane, or create if not exists
    OpenPane(PaneKind),
    /// Create a new editor instance
    NewEditor(FormatKind),
    /// Close a pane (remove from dock and clean up state)
    ClosePane(PaneId),
}

/// Dialog identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogId {
    Preferences,
}
