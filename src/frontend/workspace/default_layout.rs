//! Default workspace layout
//!
//! Builds the initial dock layout with the ports pane on the left and a
//! configuration editor plus an empty log viewer on the right.

use egui_dock::{DockState, NodeIndex};

use super::{PaneId, PaneKind, Workspace};

/// Build the default dock layout and return the DockState.
///
/// Layout:
/// ```text
/// ┌──────────────┬────────────────────────────────┐
/// │              │ [Configuration 1] [Log Viewer 1]│
/// │   Ports      ├────────────────────────────────┤
/// │              │                                │
/// │              │          Editor form           │
/// │              │                                │
/// └──────────────┴────────────────────────────────┘
/// ```
pub fn build_default_layout(workspace: &mut Workspace) -> DockState<PaneId> {
    let center: Vec<PaneId> = [
        (PaneKind::ConfigEditor, "Configuration 1"),
        (PaneKind::LogViewer, "Log Viewer 1"),
    ]
    .into_iter()
    .filter_map(|(kind, title)| workspace.register_pane(kind, title))
    .collect();

    let mut dock = DockState::new(center);

    if let Some(ports_id) = workspace.register_pane(PaneKind::Ports, "Ports") {
        // Split left 25% for the ports pane
        dock.main_surface_mut()
            .split_left(NodeIndex::root(), 0.25, vec![ports_id]);
    }

    dock
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_panes() {
        let mut workspace = Workspace::new();
        let dock = build_default_layout(&mut workspace);

        assert_eq!(workspace.pane_entries.len(), 3);
        assert!(workspace.find_singleton(PaneKind::Ports).is_some());
        assert_eq!(dock.iter_all_tabs().count(), 3);
    }
}
