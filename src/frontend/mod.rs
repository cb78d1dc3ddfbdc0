//! Frontend module for egui UI
//!
//! The frontend is an egui_dock workspace where every UI element is a pane:
//! the ports pane, configuration and log-settings editors, and log viewers.
//! Device commands run on the sidecar worker; their replies are drained once
//! per frame and routed back to the pane that asked.
//!
//! # Main Types
//!
//! - [`StudioApp`] - Main application state implementing [`eframe::App`]
//! - [`Workspace`](workspace::Workspace) - Dock state and pane management
//!
//! # Submodules
//!
//! - `workspace` - Dock workspace, tab viewer, default layout
//! - `panes` - Pane state types
//! - `form` - Schema-driven form rendering
//! - `dialogs` - Dialog trait and the preferences dialog
//! - `notifications` - Toast notifications
//! - `widgets` - Custom UI widgets

pub mod dialogs;
pub mod form;
pub mod notifications;
pub mod pane_registry;
pub mod pane_trait;
pub mod panes;
pub mod state;
pub mod status_bar;
pub mod widgets;
pub mod workspace;

pub use notifications::{Notification, NotificationLevel, Notifications};
pub use state::{AppAction, DialogId, SharedState};
pub use widgets::*;

use std::path::{Path, PathBuf};
use std::time::Duration;

use dialogs::{show_dialog, PreferencesAction, PreferencesContext, PreferencesDialog, PreferencesState};
use panes::{EditorPaneState, LogViewerState};
use status_bar::{render_status_bar, StatusBarContext};
use workspace::tab_viewer::WorkspaceTabViewer;
use workspace::{PaneId, PaneKind, Workspace};

use crate::config::ui_session::EditorTabSession;
use crate::config::{
    AppState, FormatKind, FormatLibrary, RecentFile, UiPreferences, UiSessionState, CONFIG_FILE_EXTENSION,
    LOG_FILE_EXTENSION,
};
use crate::logfile::CsvLog;
use crate::sidecar::{ProcessCli, SidecarBridge, SidecarCommand, SidecarReply};

/// Poll interval for sidecar replies while commands are in flight
const SIDECAR_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Main application state
pub struct StudioApp {
    app_state: AppState,
    session: UiSessionState,
    formats: FormatLibrary,
    sidecar: SidecarBridge,
    notifications: Notifications,
    workspace: Workspace,
    preferences_open: bool,
    preferences_state: PreferencesState,
}

/// Apply dark mode and font scale to the context
fn apply_appearance(ctx: &egui::Context, prefs: &UiPreferences) {
    let (theme, visuals) = if prefs.dark_mode {
        (egui::Theme::Dark, egui::Visuals::dark())
    } else {
        (egui::Theme::Light, egui::Visuals::light())
    };
    ctx.set_theme(theme);

    let mut style = egui::Style {
        visuals,
        ..egui::Style::default()
    };
    style.text_styles.iter_mut().for_each(|(_, font_id)| {
        font_id.size *= prefs.font_scale;
    });
    ctx.set_style(style);
}

/// Tab title for a file-backed pane
fn file_title(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled")
        .to_string()
}

/// Reopen a recent document with the format it was recorded under
fn recent_document_action(entry: &RecentFile) -> AppAction {
    AppAction::OpenDocument {
        kind: entry.kind,
        path: entry.path.clone(),
    }
}

impl StudioApp {
    /// Create a new application instance
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        app_state: AppState,
        session: UiSessionState,
        formats: FormatLibrary,
        sidecar: SidecarBridge,
    ) -> Self {
        apply_appearance(&cc.egui_ctx, &app_state.ui_preferences);

        let mut workspace = Workspace::new();
        let dock_state = workspace::default_layout::build_default_layout(&mut workspace);
        workspace.dock_state = dock_state;

        let mut app = Self {
            app_state,
            session,
            formats,
            sidecar,
            notifications: Notifications::default(),
            workspace,
            preferences_open: false,
            preferences_state: PreferencesState::default(),
        };

        if app.app_state.ui_preferences.restore_session {
            app.restore_session();
        }
        app
    }

    /// Reopen the editor and log tabs of the previous run
    fn restore_session(&mut self) {
        let editors = std::mem::take(&mut self.session.editor_tabs);
        for tab in editors {
            if let Some(path) = tab.path {
                self.handle_action(AppAction::OpenDocument {
                    kind: tab.kind,
                    path,
                });
            }
        }

        let logs = std::mem::take(&mut self.session.log_tabs);
        for tab in logs {
            match LogViewerState::restore(&tab) {
                Ok(state) => {
                    let id = self
                        .workspace
                        .insert_pane(Box::new(state), file_title(&tab.path));
                    self.workspace.show_pane(id);
                }
                Err(e) => {
                    tracing::warn!("Could not restore log tab {:?}: {}", tab.path, e);
                    self.notifications.error(&e);
                }
            }
        }
    }

    /// Collect the tabs worth reopening next time
    fn capture_session(&mut self) {
        let mut log_tabs = Vec::new();
        let mut editor_tabs = Vec::new();
        for pane in self.workspace.pane_states.values() {
            if let Some(viewer) = pane.as_any().downcast_ref::<LogViewerState>() {
                log_tabs.extend(viewer.session());
            } else if let Some(editor) = pane.as_any().downcast_ref::<EditorPaneState>() {
                if let Some(path) = editor.path() {
                    editor_tabs.push(EditorTabSession {
                        kind: editor.format(),
                        path: Some(path.to_path_buf()),
                    });
                }
            }
        }
        self.session.log_tabs = log_tabs;
        self.session.editor_tabs = editor_tabs;
    }

    /// Drain finished sidecar commands and hand each reply to its pane
    fn process_sidecar_replies(&mut self) -> bool {
        let responses = self.sidecar.drain();
        let had_responses = !responses.is_empty();

        for response in responses {
            match &response.result {
                Err(e) => self.notifications.error(e),
                Ok(SidecarReply::Ports(ports)) => {
                    if ports.is_empty() {
                        self.notifications
                            .info("No ports found", "Check the cable and the driver power.");
                    }
                    self.app_state.set_known_ports(ports.clone());
                }
                Ok(_) => {}
            }

            if response.tag == 0 {
                continue;
            }
            let Some(pane) = self.workspace.pane_states.get_mut(&PaneId(response.tag)) else {
                tracing::debug!(
                    "Dropping {} reply for closed pane {}",
                    response.command.subcommand(),
                    response.tag
                );
                continue;
            };

            let mut shared = SharedState {
                app_state: &mut self.app_state,
                formats: &self.formats,
                notifications: &mut self.notifications,
                sidecar_pending: self.sidecar.pending(),
                current_pane_id: Some(PaneId(response.tag)),
            };
            let actions = pane.on_sidecar_reply(&mut shared, &response.command, &response.result);
            for action in actions {
                self.handle_action(action);
            }
        }

        had_responses
    }

    fn next_title(&self, kind: PaneKind) -> String {
        format!(
            "{} {}",
            self.workspace.display_name(kind),
            self.workspace.count_of(kind) + 1
        )
    }

    fn open_pane(&mut self, kind: PaneKind) {
        if self.workspace.is_singleton(kind) {
            if let Some(id) = self.workspace.find_singleton(kind) {
                self.workspace.show_pane(id);
                return;
            }
        }
        let title = self.next_title(kind);
        if let Some(id) = self.workspace.register_pane(kind, title) {
            self.workspace.show_pane(id);
        }
    }

    fn handle_action(&mut self, action: AppAction) {
        match action {
            AppAction::RunSidecar { origin, command } => {
                let tag = origin.map(|id| id.0).unwrap_or(0);
                if let Err(e) = self.sidecar.submit(tag, command) {
                    self.notifications.error(&e);
                }
            }
            AppAction::DetectPorts => {
                self.handle_action(AppAction::RunSidecar {
                    origin: self.workspace.find_singleton(PaneKind::Ports),
                    command: SidecarCommand::DetectPorts,
                });
            }
            AppAction::OpenDocument { kind, path } => {
                let reference = self.formats.reference(kind);
                match EditorPaneState::open(kind, &path, reference) {
                    Ok(state) => {
                        let id = self.workspace.insert_pane(Box::new(state), file_title(&path));
                        self.workspace.show_pane(id);
                        self.app_state.add_recent_config(&path, kind);
                    }
                    Err(e) => self.notifications.error(&e),
                }
            }
            AppAction::OpenLog(path) => match LogViewerState::open(&path) {
                Ok(state) => {
                    let id = self.workspace.insert_pane(Box::new(state), file_title(&path));
                    self.workspace.show_pane(id);
                    self.app_state.add_recent_log(&path);
                }
                Err(e) => self.notifications.error(&e),
            },
            AppAction::OpenLogText { title, csv } => match CsvLog::parse(&csv) {
                Ok(log) => {
                    let state = LogViewerState::from_log(log, None);
                    let id = self.workspace.insert_pane(Box::new(state), title);
                    self.workspace.show_pane(id);
                }
                Err(e) => self.notifications.error(&e),
            },
            AppAction::OpenDialog(DialogId::Preferences) => {
                self.preferences_state = PreferencesState::from_app_state(&self.app_state);
                self.preferences_open = true;
            }
            AppAction::OpenPane(kind) => self.open_pane(kind),
            AppAction::NewEditor(format) => self.open_pane(PaneKind::editor_for(format)),
            AppAction::ClosePane(id) => self.workspace.remove_pane(id),
        }
    }

    fn pick_document(kind: FormatKind) -> Option<AppAction> {
        rfd::FileDialog::new()
            .set_title(format!("Open {}", kind.display_name()))
            .add_filter("JSON", &[CONFIG_FILE_EXTENSION])
            .pick_file()
            .map(|path| AppAction::OpenDocument { kind, path })
    }

    fn pick_log() -> Option<AppAction> {
        rfd::FileDialog::new()
            .set_title("Open Log")
            .add_filter("CSV Log", &[LOG_FILE_EXTENSION])
            .pick_file()
            .map(AppAction::OpenLog)
    }

    /// Open a recent entry, dropping it when the file is gone
    fn open_recent(&mut self, path: PathBuf, action: AppAction) {
        if path.exists() {
            self.handle_action(action);
        } else {
            self.app_state.remove_recent(&path);
            self.notifications
                .warning("File not found", path.display().to_string());
        }
    }

    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        let mut actions = Vec::new();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::MenuBar::new().ui(ui, |ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("New Configuration").clicked() {
                        actions.push(AppAction::NewEditor(FormatKind::Configuration));
                        ui.close();
                    }
                    if ui.button("New Log Settings").clicked() {
                        actions.push(AppAction::NewEditor(FormatKind::Logging));
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Open Configuration...").clicked() {
                        actions.extend(Self::pick_document(FormatKind::Configuration));
                        ui.close();
                    }
                    if ui.button("Open Log Settings...").clicked() {
                        actions.extend(Self::pick_document(FormatKind::Logging));
                        ui.close();
                    }
                    if ui.button("Open Log...").clicked() {
                        actions.extend(Self::pick_log());
                        ui.close();
                    }

                    ui.menu_button("Recent", |ui| {
                        self.render_recent_menu(ui);
                    });

                    ui.separator();
                    if ui.button("Preferences...").clicked() {
                        actions.push(AppAction::OpenDialog(DialogId::Preferences));
                        ui.close();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ui.ctx().send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });

                ui.menu_button("View", |ui| {
                    let singletons: Vec<_> = self
                        .workspace
                        .registry_singletons()
                        .map(|info| (info.kind, info.display_name))
                        .collect();
                    for (kind, name) in singletons {
                        if ui.button(name).clicked() {
                            actions.push(AppAction::OpenPane(kind));
                            ui.close();
                        }
                    }

                    ui.separator();

                    let multi: Vec<_> = self
                        .workspace
                        .registry_multi()
                        .map(|info| (info.kind, info.display_name))
                        .collect();
                    for (kind, name) in multi {
                        if ui.button(format!("New {}", name)).clicked() {
                            actions.push(AppAction::OpenPane(kind));
                            ui.close();
                        }
                    }

                    ui.separator();
                    ui.checkbox(&mut self.session.show_status_bar, "Status Bar");
                });

                ui.menu_button("Device", |ui| {
                    let enabled = !self.sidecar.is_busy();
                    if ui
                        .add_enabled(enabled, egui::Button::new("Detect Ports"))
                        .clicked()
                    {
                        actions.push(AppAction::DetectPorts);
                        ui.close();
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add(StatusIndicator::sidecar(self.sidecar.pending()));
                });
            });
        });

        for action in actions {
            self.handle_action(action);
        }
    }

    fn render_recent_menu(&mut self, ui: &mut egui::Ui) {
        let configs: Vec<(PathBuf, AppAction)> = self
            .app_state
            .recent_configs
            .iter()
            .map(|f| (f.path.clone(), recent_document_action(f)))
            .collect();
        let logs: Vec<PathBuf> = self
            .app_state
            .recent_logs
            .iter()
            .map(|f| f.path.clone())
            .collect();

        if configs.is_empty() && logs.is_empty() {
            ui.label(egui::RichText::new("No recent files").weak());
            return;
        }

        for (path, action) in configs {
            if ui.button(file_title(&path)).on_hover_text(path.display().to_string()).clicked() {
                self.open_recent(path, action);
                ui.close();
            }
        }
        ui.separator();
        for path in logs {
            if ui.button(file_title(&path)).on_hover_text(path.display().to_string()).clicked() {
                let action = AppAction::OpenLog(path.clone());
                self.open_recent(path, action);
                ui.close();
            }
        }
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        if !self.session.show_status_bar {
            return;
        }
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let status = StatusBarContext {
                selected_port: self.app_state.selected_port(),
                sidecar_pending: self.sidecar.pending(),
                last_notification: self.notifications.last(),
            };
            render_status_bar(ui, &status);
        });
    }

    fn render_workspace(&mut self, ctx: &egui::Context) {
        let mut viewer = WorkspaceTabViewer {
            app_state: &mut self.app_state,
            formats: &self.formats,
            notifications: &mut self.notifications,
            sidecar_pending: self.sidecar.pending(),
            pane_states: &mut self.workspace.pane_states,
            pane_entries: &self.workspace.pane_entries,
            actions: Vec::new(),
        };

        egui_dock::DockArea::new(&mut self.workspace.dock_state)
            .style(egui_dock::Style::from_egui(ctx.style().as_ref()))
            .show(ctx, &mut viewer);

        let actions = viewer.actions;
        for action in actions {
            self.handle_action(action);
        }
    }

    fn render_preferences(&mut self, ctx: &egui::Context) {
        let Some(PreferencesAction::Apply(prefs)) = show_dialog::<PreferencesDialog>(
            ctx,
            &mut self.preferences_open,
            &mut self.preferences_state,
            PreferencesContext,
        ) else {
            return;
        };

        let sidecar_changed = prefs.apply_to(&mut self.app_state);
        apply_appearance(ctx, &self.app_state.ui_preferences);
        if sidecar_changed {
            tracing::info!("Sidecar changed to {:?}", self.app_state.sidecar_path);
            self.sidecar
                .replace_cli(ProcessCli::new(self.app_state.sidecar_path.clone()));
        }
        if let Err(e) = self.app_state.save() {
            tracing::warn!("Failed to save app state: {}", e);
        }
    }

    fn handle_keyboard_shortcuts(&mut self, ctx: &egui::Context) {
        use egui::Key;

        let mut open_log = false;
        let mut new_config = false;
        let mut preferences = false;

        ctx.input(|i| {
            if i.key_pressed(Key::O) && i.modifiers.command_only() {
                open_log = true;
            }
            if i.key_pressed(Key::N) && i.modifiers.command_only() {
                new_config = true;
            }
            if i.key_pressed(Key::Comma) && i.modifiers.command_only() {
                preferences = true;
            }
        });

        if open_log {
            if let Some(action) = Self::pick_log() {
                self.handle_action(action);
            }
        }
        if new_config {
            self.handle_action(AppAction::NewEditor(FormatKind::Configuration));
        }
        if preferences {
            self.handle_action(AppAction::OpenDialog(DialogId::Preferences));
        }
    }

    fn track_window(&mut self, ctx: &egui::Context) {
        ctx.input(|i| {
            let viewport = i.viewport();
            self.session.window.maximized = viewport.maximized.unwrap_or(false);
            if let Some(rect) = viewport.inner_rect {
                if !self.session.window.maximized {
                    self.session.window.size = (rect.width() as u32, rect.height() as u32);
                }
            }
        });
    }
}

impl eframe::App for StudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let had_replies = self.process_sidecar_replies();
        self.handle_keyboard_shortcuts(ctx);
        self.track_window(ctx);

        if had_replies {
            ctx.request_repaint();
        } else if self.sidecar.is_busy() {
            ctx.request_repaint_after(SIDECAR_POLL_INTERVAL);
        }

        self.render_menu_bar(ctx);
        self.render_status_bar(ctx);
        self.render_workspace(ctx);
        self.render_preferences(ctx);
        self.notifications.show(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.capture_session();
        if let Err(e) = self.session.save() {
            tracing::warn!("Failed to save UI session: {}", e);
        }

        if let Err(e) = self.app_state.save() {
            tracing::warn!("Failed to save app state: {}", e);
        }

        self.sidecar.shutdown();
    }
}
