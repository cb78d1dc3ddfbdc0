//! Pane trait: polymorphic interface for all pane state types.
//!
//! Each pane state type implements `Pane`, and dispatch is via vtable.

use std::any::Any;

use egui::Ui;

use crate::error::Result;
use crate::frontend::state::{AppAction, SharedState};
use crate::frontend::workspace::PaneKind;
use crate::sidecar::{SidecarCommand, SidecarReply};

/// Trait implemented by all pane state types.
pub trait Pane: Any {
    /// Pane kind identifier.
    fn kind(&self) -> PaneKind;

    /// Render the pane UI. Returns actions for the app to handle.
    fn render(&mut self, shared: &mut SharedState, ui: &mut Ui) -> Vec<AppAction>;

    /// Receive the reply to a sidecar command this pane submitted.
    ///
    /// Errors have already been shown as notifications.
    fn on_sidecar_reply(
        &mut self,
        _shared: &mut SharedState,
        _command: &SidecarCommand,
        _result: &Result<SidecarReply>,
    ) -> Vec<AppAction> {
        Vec::new()
    }

    /// Downcast support.
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}
