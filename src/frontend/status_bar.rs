//! Status bar panel: bottom bar showing port, sidecar and notification info.
//!
//! Sits below the dock workspace area.

use egui::{Color32, RichText, Ui};

use crate::frontend::notifications::{Notification, NotificationLevel};
use crate::frontend::widgets::StatusIndicator;

/// Context needed to render the status bar.
pub struct StatusBarContext<'a> {
    pub selected_port: Option<&'a str>,
    pub sidecar_pending: usize,
    pub last_notification: Option<&'a Notification>,
}

/// Render the status bar.
pub fn render_status_bar(ui: &mut Ui, ctx: &StatusBarContext<'_>) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        // === Selected port ===
        match ctx.selected_port {
            Some(port) => {
                ui.colored_label(Color32::GREEN, "●");
                ui.label(RichText::new(format!("Port: {}", port)).small());
            }
            None => {
                ui.colored_label(Color32::GRAY, "●");
                ui.label(RichText::new("No port selected").small());
            }
        }

        ui.separator();

        // === Sidecar ===
        ui.label(RichText::new("Sidecar:").small());
        ui.add(StatusIndicator::sidecar(ctx.sidecar_pending));

        // === Last notification (right-aligned) ===
        if let Some(notification) = ctx.last_notification {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let color = match notification.level {
                    NotificationLevel::Error => Color32::RED,
                    NotificationLevel::Warning => Color32::YELLOW,
                    NotificationLevel::Info => Color32::GRAY,
                };
                ui.colored_label(color, RichText::new(&notification.title).small())
                    .on_hover_text(&notification.description);
            });
        }
    });
}
