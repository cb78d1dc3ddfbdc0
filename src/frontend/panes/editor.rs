//! Editor pane for configuration and log-settings documents
//!
//! One pane type serves both formats; the format decides the reference shape,
//! the pane kind and which device commands the toolbar offers.

use std::path::{Path, PathBuf};

use egui::{Color32, RichText, Ui};

use crate::config::{validate_save_path, FormatKind, CONFIG_FILE_EXTENSION};
use crate::error::{Result, ResultExt, StudioError};
use crate::frontend::form::{render_tree, FormState};
use crate::frontend::pane_trait::Pane;
use crate::frontend::state::{AppAction, SharedState};
use crate::frontend::workspace::PaneKind;
use crate::schema::{self, SchemaObject};
use crate::sidecar::{SidecarCommand, SidecarReply};

/// State for an editor pane
pub struct EditorPaneState {
    format: FormatKind,
    /// Filled from the reference format on first render
    document: Option<SchemaObject>,
    path: Option<PathBuf>,
    dirty: bool,
    form: FormState,
}

impl EditorPaneState {
    pub fn new(format: FormatKind) -> Self {
        Self {
            format,
            document: None,
            path: None,
            dirty: false,
            form: FormState::default(),
        }
    }

    /// Editor holding a document that already passed validation
    pub fn with_document(format: FormatKind, document: SchemaObject, path: Option<PathBuf>) -> Self {
        Self {
            document: Some(document),
            path,
            ..Self::new(format)
        }
    }

    /// Read `path` and validate it against `reference`
    pub fn open(format: FormatKind, path: &Path, reference: &SchemaObject) -> Result<Self> {
        let document = read_document(path, reference)?;
        Ok(Self::with_document(format, document, Some(path.to_path_buf())))
    }

    pub fn format(&self) -> FormatKind {
        self.format
    }

    pub fn document(&self) -> Option<&SchemaObject> {
        self.document.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn replace_document(&mut self, document: SchemaObject) {
        self.document = Some(document);
        self.form.reset();
    }

    /// Start over from the reference format
    pub fn reset_to(&mut self, reference: &SchemaObject) {
        self.replace_document(reference.clone());
        self.path = None;
        self.dirty = false;
    }

    /// Replace the document with the file at `path`. On error nothing changes.
    pub fn load_file(&mut self, path: &Path, reference: &SchemaObject) -> Result<()> {
        let document = read_document(path, reference)?;
        self.replace_document(document);
        self.path = Some(path.to_path_buf());
        self.dirty = false;
        Ok(())
    }

    /// Replace the document with JSON text read from the device
    pub fn load_device_text(&mut self, text: &str, reference: &SchemaObject) -> Result<()> {
        let document = schema::load_str(text, reference)?;
        self.replace_document(document);
        self.dirty = true;
        Ok(())
    }

    /// Save to `path` after checking the target. Returns the path written.
    pub fn save_to(&mut self, path: &Path) -> Result<PathBuf> {
        let path = validate_save_path(path, CONFIG_FILE_EXTENSION)?;
        let document = self
            .document
            .as_ref()
            .ok_or_else(|| StudioError::Config("nothing to save".to_string()))?;
        let text = document.to_json_string_pretty()?;
        std::fs::write(&path, text)
            .map_err(StudioError::from)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        tracing::info!("Saved {} to {:?}", self.format.display_name(), path);
        self.path = Some(path.clone());
        self.dirty = false;
        Ok(path)
    }

    /// Mark the document as edited
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn save_as(&mut self, shared: &mut SharedState) {
        let Some(path) = rfd::FileDialog::new()
            .set_title(format!("Save {}", self.format.display_name()))
            .add_filter("JSON", &[CONFIG_FILE_EXTENSION])
            .save_file()
        else {
            return;
        };
        self.save_and_report(&path, shared);
    }

    fn save_and_report(&mut self, path: &Path, shared: &mut SharedState) {
        match self.save_to(path) {
            Ok(path) => shared.app_state.add_recent_config(&path, self.format),
            Err(e) => shared.notifications.error(&e),
        }
    }

    fn render_toolbar(&mut self, shared: &mut SharedState, ui: &mut Ui) -> Vec<AppAction> {
        let mut actions = Vec::new();
        let formats = shared.formats;
        let reference = formats.reference(self.format);

        ui.horizontal(|ui| {
            if ui.button("New").clicked() {
                self.reset_to(reference);
            }
            if ui.button("Open...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("JSON", &[CONFIG_FILE_EXTENSION])
                    .pick_file()
                {
                    match self.load_file(&path, reference) {
                        Ok(()) => shared.app_state.add_recent_config(&path, self.format),
                        Err(e) => shared.notifications.error(&e),
                    }
                }
            }
            if ui.button("Save").clicked() {
                match self.path.clone() {
                    Some(path) => self.save_and_report(&path, shared),
                    None => self.save_as(shared),
                }
            }
            if ui.button("Save As...").clicked() {
                self.save_as(shared);
            }

            ui.separator();

            let device_enabled = !shared.sidecar_busy();
            match self.format {
                FormatKind::Configuration => {
                    if ui
                        .add_enabled(device_enabled, egui::Button::new("Read from Device"))
                        .clicked()
                    {
                        if let Some(port) = shared.require_port() {
                            actions.push(shared.sidecar_action(SidecarCommand::GetConfig { port }));
                        }
                    }
                    if ui
                        .add_enabled(device_enabled, egui::Button::new("Write to Device"))
                        .clicked()
                    {
                        if let Some(action) = self.device_write(shared, |port, json| {
                            SidecarCommand::SetConfig { port, json }
                        }) {
                            actions.push(action);
                        }
                    }
                }
                FormatKind::Logging => {
                    if ui
                        .add_enabled(device_enabled, egui::Button::new("Start Logging"))
                        .clicked()
                    {
                        if let Some(action) = self.device_write(shared, |port, json| {
                            SidecarCommand::StartLog {
                                port,
                                settings: Some(json),
                            }
                        }) {
                            actions.push(action);
                        }
                    }
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if self.dirty {
                    ui.colored_label(Color32::YELLOW, "● modified");
                }
                let name = self
                    .path
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "untitled".to_string());
                ui.label(RichText::new(name).weak());
            });
        });

        actions
    }

    /// Build a command carrying the document as compact JSON
    fn device_write(
        &self,
        shared: &mut SharedState,
        build: impl FnOnce(String, String) -> SidecarCommand,
    ) -> Option<AppAction> {
        let json = match self.document.as_ref().map(SchemaObject::to_json_string) {
            Some(Ok(json)) => json,
            Some(Err(e)) => {
                shared.notifications.error(&e);
                return None;
            }
            None => return None,
        };
        let port = shared.require_port()?;
        Some(shared.sidecar_action(build(port, json)))
    }
}

fn read_document(path: &Path, reference: &SchemaObject) -> Result<SchemaObject> {
    let text = std::fs::read_to_string(path)
        .map_err(StudioError::from)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    schema::load_str(&text, reference).with_context(|| format!("{}", path.display()))
}

impl Pane for EditorPaneState {
    fn kind(&self) -> PaneKind {
        PaneKind::editor_for(self.format)
    }

    fn render(&mut self, shared: &mut SharedState, ui: &mut Ui) -> Vec<AppAction> {
        let actions = self.render_toolbar(shared, ui);
        ui.separator();

        if self.form.has_invalid_fields() {
            ui.colored_label(
                Color32::LIGHT_RED,
                "Some numeric fields are invalid; their last valid value is kept.",
            );
        }

        let format = self.format;
        let formats = shared.formats;
        let document = self
            .document
            .get_or_insert_with(|| formats.template(format));

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                if render_tree(ui, &mut self.form, document, &formats.options) {
                    self.dirty = true;
                }
            });

        actions
    }

    fn on_sidecar_reply(
        &mut self,
        shared: &mut SharedState,
        _command: &SidecarCommand,
        result: &Result<SidecarReply>,
    ) -> Vec<AppAction> {
        match result {
            Ok(SidecarReply::Config { port, document }) => {
                let formats = shared.formats;
                let reference = formats.reference(self.format);
                match self.load_device_text(document, reference) {
                    Ok(()) => shared
                        .notifications
                        .info("Configuration read", format!("Loaded from {}", port)),
                    Err(e) => shared
                        .notifications
                        .error(&e.with_context(format!("Configuration from {}", port))),
                }
            }
            Ok(SidecarReply::ConfigWritten { port }) => {
                shared
                    .notifications
                    .info("Configuration written", format!("Sent to {}", port));
            }
            Ok(SidecarReply::LogStarted) => {
                shared.notifications.info("Logging started", "");
            }
            _ => {}
        }
        Vec::new()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
