//! Preferences dialog
//!
//! App-wide settings: dark mode, font scale, session restore, sidecar path.

use std::path::PathBuf;

use egui::Ui;

use crate::config::{AppState, UiPreferences};
use crate::frontend::dialogs::{Dialog, DialogAction, DialogState, DialogWindowConfig};

/// State for the preferences dialog
#[derive(Debug, Clone, PartialEq)]
pub struct PreferencesState {
    pub dark_mode: bool,
    pub font_scale: f32,
    pub restore_session: bool,
    /// Sidecar executable, edited as text
    pub sidecar_path: String,
}

impl Default for PreferencesState {
    fn default() -> Self {
        Self::from_app_state(&AppState::default())
    }
}

impl PreferencesState {
    /// Create from the current app state
    pub fn from_app_state(app_state: &AppState) -> Self {
        let prefs = &app_state.ui_preferences;
        Self {
            dark_mode: prefs.dark_mode,
            font_scale: prefs.font_scale,
            restore_session: prefs.restore_session,
            sidecar_path: app_state.sidecar_path.display().to_string(),
        }
    }

    /// Write the edited values back. Returns whether the sidecar path changed.
    pub fn apply_to(&self, app_state: &mut AppState) -> bool {
        app_state.ui_preferences = UiPreferences {
            dark_mode: self.dark_mode,
            font_scale: self.font_scale,
            restore_session: self.restore_session,
        };
        let sidecar = PathBuf::from(self.sidecar_path.trim());
        if sidecar != app_state.sidecar_path {
            app_state.sidecar_path = sidecar;
            return true;
        }
        false
    }
}

impl DialogState for PreferencesState {
    fn is_valid(&self) -> bool {
        !self.sidecar_path.trim().is_empty()
    }
}

/// Actions produced by the preferences dialog
#[derive(Debug, Clone)]
pub enum PreferencesAction {
    /// Apply preferences
    Apply(PreferencesState),
}

/// Context for rendering
pub struct PreferencesContext;

/// The preferences dialog
pub struct PreferencesDialog;

impl Dialog for PreferencesDialog {
    type State = PreferencesState;
    type Action = PreferencesAction;
    type Context<'a> = PreferencesContext;

    fn title(_state: &Self::State) -> &'static str {
        "Preferences"
    }

    fn window_config() -> DialogWindowConfig {
        DialogWindowConfig::centered(420.0)
    }

    fn render(
        state: &mut Self::State,
        _ctx: Self::Context<'_>,
        ui: &mut Ui,
    ) -> DialogAction<Self::Action> {
        // === Appearance ===
        ui.heading("Appearance");
        ui.add_space(4.0);

        egui::Grid::new("prefs_appearance_grid")
            .num_columns(2)
            .spacing([10.0, 8.0])
            .show(ui, |ui| {
                ui.label("Dark mode:");
                ui.checkbox(&mut state.dark_mode, "");
                ui.end_row();

                ui.label("Font scale:");
                ui.add(egui::Slider::new(&mut state.font_scale, 0.5..=2.0).step_by(0.1));
                ui.end_row();

                ui.label("Reopen logs on start:");
                ui.checkbox(&mut state.restore_session, "");
                ui.end_row();
            });

        ui.add_space(8.0);

        // === Sidecar ===
        ui.heading("Sidecar");
        ui.add_space(4.0);
        ui.horizontal(|ui| {
            ui.label("Executable:");
            ui.text_edit_singleline(&mut state.sidecar_path);
            if ui.button("Browse...").clicked() {
                if let Some(path) = rfd::FileDialog::new().pick_file() {
                    state.sidecar_path = path.display().to_string();
                }
            }
        });

        ui.add_space(8.0);
        ui.separator();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(state.is_valid(), egui::Button::new("Apply"))
                .clicked()
            {
                return DialogAction::CloseWithAction(PreferencesAction::Apply(state.clone()));
            }
            if ui.button("Cancel").clicked() {
                return DialogAction::Close;
            }
            DialogAction::None
        })
        .inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_reports_sidecar_change() {
        let mut app_state = AppState::default();
        let mut prefs = PreferencesState::from_app_state(&app_state);
        prefs.font_scale = 1.5;
        assert!(!prefs.apply_to(&mut app_state));
        assert_eq!(app_state.ui_preferences.font_scale, 1.5);

        prefs.sidecar_path = " /opt/driver/bin/driver-cli ".to_string();
        assert!(prefs.apply_to(&mut app_state));
        assert_eq!(
            app_state.sidecar_path,
            PathBuf::from("/opt/driver/bin/driver-cli")
        );
    }

    #[test]
    fn test_empty_sidecar_path_invalid() {
        let mut prefs = PreferencesState::default();
        assert!(prefs.is_valid());
        prefs.sidecar_path = "   ".to_string();
        assert!(!prefs.is_valid());
    }
}
