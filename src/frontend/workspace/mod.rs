//! Workspace module for dockable pane management
//!
//! Provides the core workspace types: PaneId, PaneKind, Workspace.
//! Uses egui_dock for drag-and-drop docking, tabs, and splits.

pub mod default_layout;
pub mod tab_viewer;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::FormatKind;
use crate::frontend::pane_registry::{self, PaneKindInfo};
use crate::frontend::pane_trait::Pane;

/// Unique identifier for a pane instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaneId(pub u64);

static NEXT_PANE_ID: AtomicU64 = AtomicU64::new(1);

impl PaneId {
    pub fn next() -> Self {
        Self(NEXT_PANE_ID.fetch_add(1, Ordering::SeqCst))
    }
}

/// Kind of pane (used for dispatch and menu display)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneKind {
    // Utility (singleton)
    Ports,
    // Documents (multiple instances allowed)
    ConfigEditor,
    LogSettingsEditor,
    LogViewer,
}

impl PaneKind {
    /// Editor pane kind for a document format
    pub fn editor_for(format: FormatKind) -> Self {
        match format {
            FormatKind::Configuration => PaneKind::ConfigEditor,
            FormatKind::Logging => PaneKind::LogSettingsEditor,
        }
    }
}

/// Metadata entry for a pane
pub struct PaneEntry {
    pub id: PaneId,
    pub kind: PaneKind,
    pub title: String,
}

/// The workspace holds all dock state, pane data, and the pane registry.
pub struct Workspace {
    pub dock_state: egui_dock::DockState<PaneId>,
    pub pane_states: HashMap<PaneId, Box<dyn Pane>>,
    pub pane_entries: HashMap<PaneId, PaneEntry>,
    registry: Vec<PaneKindInfo>,
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl Workspace {
    /// Create a new workspace with the pane registry.
    pub fn new() -> Self {
        Self {
            dock_state: egui_dock::DockState::new(vec![]),
            pane_states: HashMap::new(),
            pane_entries: HashMap::new(),
            registry: pane_registry::build_registry(),
        }
    }

    fn info(&self, kind: PaneKind) -> Option<&PaneKindInfo> {
        self.registry.iter().find(|info| info.kind == kind)
    }

    /// Register a fresh pane of `kind` built by the registry factory.
    pub fn register_pane(&mut self, kind: PaneKind, title: impl Into<String>) -> Option<PaneId> {
        let state = self.info(kind).map(|info| (info.factory)())?;
        Some(self.insert_pane(state, title))
    }

    /// Register an already-built pane and return its ID.
    pub fn insert_pane(&mut self, state: Box<dyn Pane>, title: impl Into<String>) -> PaneId {
        let id = PaneId::next();
        let kind = state.kind();
        self.pane_states.insert(id, state);
        self.pane_entries.insert(
            id,
            PaneEntry {
                id,
                kind,
                title: title.into(),
            },
        );
        id
    }

    /// Look up the display name for a pane kind from the registry.
    pub fn display_name(&self, kind: PaneKind) -> &'static str {
        self.info(kind).map(|info| info.display_name).unwrap_or("Unknown")
    }

    /// Check whether a pane kind is a singleton.
    pub fn is_singleton(&self, kind: PaneKind) -> bool {
        self.info(kind).map(|info| info.is_singleton).unwrap_or(false)
    }

    /// Iterate all singleton pane kinds in the registry.
    pub fn registry_singletons(&self) -> impl Iterator<Item = &PaneKindInfo> {
        self.registry.iter().filter(|info| info.is_singleton)
    }

    /// Iterate all multi-instance pane kinds in the registry.
    pub fn registry_multi(&self) -> impl Iterator<Item = &PaneKindInfo> {
        self.registry.iter().filter(|info| !info.is_singleton)
    }

    /// Find an existing singleton pane ID.
    pub fn find_singleton(&self, kind: PaneKind) -> Option<PaneId> {
        self.pane_entries
            .values()
            .find(|e| e.kind == kind)
            .map(|e| e.id)
    }

    /// Number of open panes of `kind`
    pub fn count_of(&self, kind: PaneKind) -> usize {
        self.pane_entries.values().filter(|e| e.kind == kind).count()
    }

    /// Add a pane to the dock and focus it
    pub fn show_pane(&mut self, id: PaneId) {
        match self.dock_state.find_tab(&id) {
            Some(location) => self.dock_state.set_active_tab(location),
            None => self.dock_state.push_to_first_leaf(id),
        }
    }

    /// Downcast a pane to its concrete state type
    pub fn pane_mut<T: Pane>(&mut self, id: PaneId) -> Option<&mut T> {
        self.pane_states
            .get_mut(&id)
            .and_then(|p| p.as_any_mut().downcast_mut::<T>())
    }

    /// Remove a pane by ID.
    pub fn remove_pane(&mut self, id: PaneId) {
        self.pane_states.remove(&id);
        self.pane_entries.remove(&id);
    }
}
