//! Custom widgets for the Driver Studio UI
//!
//! - [`StatusIndicator`] - Colored status dot with label

use egui::{Color32, Response, Ui, Widget};

/// A widget that displays a colored status indicator
pub struct StatusIndicator {
    color: Color32,
    label: String,
    tooltip: Option<String>,
}

impl StatusIndicator {
    /// Create a new status indicator with the given color and label
    pub fn new(color: Color32, label: impl Into<String>) -> Self {
        Self {
            color,
            label: label.into(),
            tooltip: None,
        }
    }

    /// Indicator for the sidecar worker
    pub fn sidecar(pending: usize) -> Self {
        if pending > 0 {
            Self::new(Color32::YELLOW, "Busy").with_tooltip(format!("{} command(s) running", pending))
        } else {
            Self::new(Color32::GREEN, "Ready")
        }
    }

    /// Add a tooltip to the indicator
    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }
}

impl Widget for StatusIndicator {
    fn ui(self, ui: &mut Ui) -> Response {
        let response = ui.horizontal(|ui| {
            ui.colored_label(self.color, "●");
            ui.label(&self.label);
        });

        let response = response.response;

        if let Some(tooltip) = self.tooltip {
            response.on_hover_text(tooltip)
        } else {
            response
        }
    }
}
