//! Toast notifications
//!
//! Every recoverable error ends up here as a title plus a description. Toasts
//! stack in the bottom-right corner and expire on their own.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use egui::{Align2, Color32, Context, RichText};

use crate::error::StudioError;

/// How long a toast stays on screen
pub const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(6);

/// Toasts beyond this count push out the oldest
const MAX_VISIBLE: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

impl NotificationLevel {
    fn color(self) -> Color32 {
        match self {
            NotificationLevel::Info => Color32::from_rgb(100, 180, 255),
            NotificationLevel::Warning => Color32::from_rgb(255, 200, 100),
            NotificationLevel::Error => Color32::from_rgb(255, 110, 110),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
    created: Instant,
}

impl Notification {
    pub fn new(
        level: NotificationLevel,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            level,
            title: title.into(),
            description: description.into(),
            created: Instant::now(),
        }
    }

    pub fn from_error(err: &StudioError) -> Self {
        Self::new(NotificationLevel::Error, err.title(), err.to_string())
    }

    fn expired(&self, now: Instant) -> bool {
        now.duration_since(self.created) >= NOTIFICATION_TIMEOUT
    }
}

/// Active toasts plus the most recent one for the status bar
#[derive(Debug, Default)]
pub struct Notifications {
    active: VecDeque<Notification>,
    last: Option<Notification>,
}

impl Notifications {
    pub fn push(&mut self, notification: Notification) {
        match notification.level {
            NotificationLevel::Error => {
                tracing::error!("{}: {}", notification.title, notification.description)
            }
            NotificationLevel::Warning => {
                tracing::warn!("{}: {}", notification.title, notification.description)
            }
            NotificationLevel::Info => {
                tracing::info!("{}: {}", notification.title, notification.description)
            }
        }
        if self.active.len() == MAX_VISIBLE {
            self.active.pop_front();
        }
        self.last = Some(notification.clone());
        self.active.push_back(notification);
    }

    pub fn info(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(Notification::new(NotificationLevel::Info, title, description));
    }

    pub fn warning(&mut self, title: impl Into<String>, description: impl Into<String>) {
        self.push(Notification::new(
            NotificationLevel::Warning,
            title,
            description,
        ));
    }

    pub fn error(&mut self, err: &StudioError) {
        self.push(Notification::from_error(err));
    }

    pub fn active(&self) -> impl Iterator<Item = &Notification> {
        self.active.iter()
    }

    pub fn last(&self) -> Option<&Notification> {
        self.last.as_ref()
    }

    /// Drop toasts older than [`NOTIFICATION_TIMEOUT`]
    pub fn prune(&mut self, now: Instant) {
        self.active.retain(|n| !n.expired(now));
    }

    /// Render the toast stack
    pub fn show(&mut self, ctx: &Context) {
        self.prune(Instant::now());
        if self.active.is_empty() {
            return;
        }

        let mut dismissed = None;
        egui::Area::new(egui::Id::new("notifications"))
            .anchor(Align2::RIGHT_BOTTOM, [-12.0, -36.0])
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                ui.set_max_width(340.0);
                for (index, notification) in self.active.iter().enumerate() {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.horizontal(|ui| {
                            ui.colored_label(notification.level.color(), "●");
                            ui.label(RichText::new(&notification.title).strong());
                            ui.with_layout(
                                egui::Layout::right_to_left(egui::Align::Center),
                                |ui| {
                                    if ui.small_button("✕").clicked() {
                                        dismissed = Some(index);
                                    }
                                },
                            );
                        });
                        ui.label(&notification.description);
                    });
                    ui.add_space(4.0);
                }
            });

        if let Some(index) = dismissed {
            self.active.remove(index);
        }

        // Keep repainting so toasts expire without input
        ctx.request_repaint_after(Duration::from_millis(500));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_maps_to_title_and_description() {
        let mut notifications = Notifications::default();
        notifications.error(&StudioError::InvalidNumber {
            path: "limits.max_speed".to_string(),
        });

        let last = notifications.last().unwrap();
        assert_eq!(last.level, NotificationLevel::Error);
        assert_eq!(last.title, "Invalid number");
        assert!(last.description.contains("limits.max_speed"));
    }

    #[test]
    fn test_oldest_is_dropped_when_full() {
        let mut notifications = Notifications::default();
        for i in 0..MAX_VISIBLE + 2 {
            notifications.info(format!("n{}", i), "");
        }
        let titles: Vec<_> = notifications.active().map(|n| n.title.clone()).collect();
        assert_eq!(titles.len(), MAX_VISIBLE);
        assert_eq!(titles[0], "n2");
    }

    #[test]
    fn test_prune_expired() {
        let mut notifications = Notifications::default();
        notifications.warning("Stale", "old");
        notifications.prune(Instant::now() + NOTIFICATION_TIMEOUT);
        assert_eq!(notifications.active().count(), 0);
        assert!(notifications.last().is_some());
    }
}
