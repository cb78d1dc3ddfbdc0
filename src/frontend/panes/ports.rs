//! Ports pane - port detection, selection and device logging control

use egui::{Color32, RichText, Ui};

use crate::error::Result;
use crate::frontend::pane_trait::Pane;
use crate::frontend::state::{AppAction, SharedState};
use crate::frontend::widgets::StatusIndicator;
use crate::frontend::workspace::PaneKind;
use crate::sidecar::{LogStatus, SidecarCommand, SidecarReply};

/// State for the Ports pane
#[derive(Debug, Default)]
pub struct PortsPaneState {
    /// Last known logging state of the selected port
    log_status: Option<LogStatus>,
}

impl PortsPaneState {
    pub fn log_status(&self) -> Option<LogStatus> {
        self.log_status
    }

    fn render_ports(&mut self, shared: &mut SharedState, ui: &mut Ui, actions: &mut Vec<AppAction>) {
        ui.horizontal(|ui| {
            ui.heading("Ports");
            if ui
                .add_enabled(!shared.sidecar_busy(), egui::Button::new("Detect"))
                .clicked()
            {
                actions.push(shared.sidecar_action(SidecarCommand::DetectPorts));
            }
            if shared.sidecar_busy() {
                ui.spinner();
            }
        });

        if shared.app_state.known_ports.is_empty() {
            ui.label(RichText::new("No ports detected").weak());
            return;
        }

        let selected = shared.app_state.selected_port().map(str::to_string);
        let mut choice = None;
        for port in &shared.app_state.known_ports {
            let is_selected = selected.as_deref() == Some(port.as_str());
            if ui.selectable_label(is_selected, port).clicked() && !is_selected {
                choice = Some(port.clone());
            }
        }
        if let Some(port) = choice {
            shared.app_state.select_port(Some(port));
            self.log_status = None;
        }
    }

    fn render_logging(&mut self, shared: &mut SharedState, ui: &mut Ui, actions: &mut Vec<AppAction>) {
        ui.heading("Logging");

        let Some(port) = shared.app_state.selected_port().map(str::to_string) else {
            ui.label(RichText::new("Select a port to control logging").weak());
            return;
        };

        let indicator = match self.log_status {
            Some(LogStatus { active: true, .. }) => StatusIndicator::new(Color32::GREEN, "Logging"),
            Some(LogStatus { active: false, .. }) => StatusIndicator::new(Color32::GRAY, "Idle"),
            None => StatusIndicator::new(Color32::DARK_GRAY, "Unknown"),
        };
        ui.add(indicator);
        if let Some(status) = self.log_status {
            ui.label(format!("Samples: {}", status.samples));
        }

        let enabled = !shared.sidecar_busy();
        ui.horizontal(|ui| {
            let mut command = None;
            if ui.add_enabled(enabled, egui::Button::new("Start")).clicked() {
                command = Some(SidecarCommand::StartLog {
                    port: port.clone(),
                    settings: None,
                });
            }
            if ui.add_enabled(enabled, egui::Button::new("Stop")).clicked() {
                command = Some(SidecarCommand::StopLog { port: port.clone() });
            }
            if ui.add_enabled(enabled, egui::Button::new("Status")).clicked() {
                command = Some(SidecarCommand::LogStatus { port: port.clone() });
            }
            if ui
                .add_enabled(enabled, egui::Button::new("Fetch Log"))
                .on_hover_text("Download the device log into a new viewer")
                .clicked()
            {
                command = Some(SidecarCommand::GetLog { port: port.clone() });
            }
            if let Some(command) = command {
                actions.push(shared.sidecar_action(command));
            }
        });
    }
}

impl Pane for PortsPaneState {
    fn kind(&self) -> PaneKind {
        PaneKind::Ports
    }

    fn render(&mut self, shared: &mut SharedState, ui: &mut Ui) -> Vec<AppAction> {
        let mut actions = Vec::new();
        self.render_ports(shared, ui, &mut actions);
        ui.separator();
        self.render_logging(shared, ui, &mut actions);
        actions
    }

    fn on_sidecar_reply(
        &mut self,
        _shared: &mut SharedState,
        _command: &SidecarCommand,
        result: &Result<SidecarReply>,
    ) -> Vec<AppAction> {
        match result {
            Ok(SidecarReply::LogStatus(status)) => self.log_status = Some(*status),
            Ok(SidecarReply::LogStarted) => {
                let samples = self.log_status.map(|s| s.samples).unwrap_or(0);
                self.log_status = Some(LogStatus {
                    active: true,
                    samples,
                });
            }
            Ok(SidecarReply::LogStopped) => {
                if let Some(status) = &mut self.log_status {
                    status.active = false;
                } else {
                    self.log_status = Some(LogStatus::default());
                }
            }
            Ok(SidecarReply::LogData { port, csv }) => {
                return vec![AppAction::OpenLogText {
                    title: format!("Log {}", port),
                    csv: csv.clone(),
                }];
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
