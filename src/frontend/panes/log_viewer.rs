//! Log Viewer pane - stacked plots of a CSV log
//!
//! Every group of the [`SeriesPartition`] gets its own plot. Plots share the
//! X axis (sample index) so panning one pans all. Unchecking series and
//! pressing Split moves the unchecked ones into a new plot below.

use std::path::{Path, PathBuf};

use egui::{Color32, Ui};
use egui_plot::{Legend, Line, Plot, PlotPoints};

use crate::config::{LogTabSession, LOG_FILE_EXTENSION};
use crate::error::Result;
use crate::frontend::pane_trait::Pane;
use crate::frontend::state::{AppAction, SharedState};
use crate::frontend::workspace::PaneKind;
use crate::logfile::CsvLog;
use crate::plot::{
    decimate_points, is_uniform, series_color, split_at_gaps, SeriesPartition, MAX_RENDER_POINTS,
};

/// Smallest height given to one plot
const MIN_PLOT_HEIGHT: f32 = 120.0;

/// State for the Log Viewer pane
pub struct LogViewerState {
    log: Option<CsvLog>,
    /// File the log came from; `None` for logs fetched from the device
    source: Option<PathBuf>,
    partition: SeriesPartition,
    /// Visibility checkbox per series
    visible: Vec<bool>,
    /// Decimated line runs per series, built once per log
    lines: Vec<Vec<Vec<[f64; 2]>>>,
}

impl Default for LogViewerState {
    fn default() -> Self {
        Self {
            log: None,
            source: None,
            partition: SeriesPartition::new(0),
            visible: Vec::new(),
            lines: Vec::new(),
        }
    }
}

impl LogViewerState {
    pub fn from_log(log: CsvLog, source: Option<PathBuf>) -> Self {
        let lines = (0..log.series_count())
            .map(|column| {
                split_at_gaps(&log.points(column))
                    .iter()
                    .map(|run| decimate_points(run, MAX_RENDER_POINTS))
                    .collect()
            })
            .collect();

        Self {
            partition: log.initial_partition(),
            visible: vec![true; log.series_count()],
            lines,
            log: Some(log),
            source,
        }
    }

    /// Load a CSV file
    pub fn open(path: &Path) -> Result<Self> {
        let log = CsvLog::load(path)?;
        tracing::info!(
            "Opened log {:?}: {} series, {} samples",
            path,
            log.series_count(),
            log.sample_count()
        );
        Ok(Self::from_log(log, Some(path.to_path_buf())))
    }

    /// Reopen a log from the last session, keeping its partition if it still fits
    pub fn restore(session: &LogTabSession) -> Result<Self> {
        let mut state = Self::open(&session.path)?;
        if session.partition.fits(state.series_count()) {
            state.partition = session.partition.clone();
        } else {
            tracing::warn!(
                "Saved partition for {:?} no longer matches the header, starting fresh",
                session.path
            );
        }
        Ok(state)
    }

    /// Session entry for logs that came from a file
    pub fn session(&self) -> Option<LogTabSession> {
        self.source.as_ref().map(|path| LogTabSession {
            path: path.clone(),
            partition: self.partition.clone(),
        })
    }

    pub fn log(&self) -> Option<&CsvLog> {
        self.log.as_ref()
    }

    pub fn partition(&self) -> &SeriesPartition {
        &self.partition
    }

    pub fn series_count(&self) -> usize {
        self.visible.len()
    }

    pub fn set_visible(&mut self, series: usize, visible: bool) {
        if let Some(flag) = self.visible.get_mut(series) {
            *flag = visible;
        }
    }

    /// Visibility of each member of `group`, in group order
    pub fn group_mask(&self, group: usize) -> Vec<bool> {
        self.partition
            .group(group)
            .map(|members| members.iter().map(|&i| self.visible[i]).collect())
            .unwrap_or_default()
    }

    /// Whether Split is offered for `group`
    pub fn can_split(&self, group: usize) -> bool {
        let mask = self.group_mask(group);
        !mask.is_empty() && !is_uniform(&mask)
    }

    /// Move the hidden members of `group` into a new group right after it.
    /// Does nothing when every member is visible or every member is hidden.
    pub fn split_group(&mut self, group: usize) -> bool {
        if !self.can_split(group) {
            return false;
        }
        let mask = self.group_mask(group);
        self.partition.split(group, &mask);

        // Both halves start fully visible in their new plots
        for index in self.partition.groups()[group..=group + 1].iter().flatten() {
            self.visible[*index] = true;
        }
        true
    }

    /// Back to one plot with every series visible
    pub fn reset(&mut self) {
        self.partition.reset();
        self.visible.iter_mut().for_each(|v| *v = true);
    }

    fn render_toolbar(&mut self, shared: &mut SharedState, ui: &mut Ui) {
        ui.horizontal(|ui| {
            if ui.button("Open...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("CSV Log", &[LOG_FILE_EXTENSION])
                    .pick_file()
                {
                    match Self::open(&path) {
                        Ok(state) => {
                            *self = state;
                            shared.app_state.add_recent_log(&path);
                        }
                        Err(e) => shared.notifications.error(&e),
                    }
                }
            }
            if ui
                .add_enabled(self.partition.group_count() > 1, egui::Button::new("Reset"))
                .clicked()
            {
                self.reset();
            }

            if let Some(log) = &self.log {
                ui.separator();
                let source = self
                    .source
                    .as_ref()
                    .and_then(|p| p.file_name())
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "device".to_string());
                ui.label(format!(
                    "{}: {} series × {} samples",
                    source,
                    log.series_count(),
                    log.sample_count()
                ));
            }
        });
    }

    fn render_plots(&mut self, ui: &mut Ui) {
        let Some(log) = &self.log else {
            ui.centered_and_justified(|ui| {
                ui.label("Open a CSV log to plot it");
            });
            return;
        };

        let group_count = self.partition.group_count().max(1);
        let controls_height = ui.spacing().interact_size.y + ui.spacing().item_spacing.y * 2.0;
        let plot_height = ((ui.available_height() / group_count as f32) - controls_height)
            .max(MIN_PLOT_HEIGHT);
        let link_id = ui.id().with("log_x_link");

        let mut split_request = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                for (group_index, members) in self.partition.groups().iter().enumerate() {
                    ui.horizontal_wrapped(|ui| {
                        for &series in members {
                            let [r, g, b, a] = series_color(series);
                            let label = egui::RichText::new(&log.header[series])
                                .color(Color32::from_rgba_unmultiplied(r, g, b, a));
                            ui.checkbox(&mut self.visible[series], label);
                        }

                        let mask: Vec<bool> = members.iter().map(|&i| self.visible[i]).collect();
                        let response = ui
                            .add_enabled(!is_uniform(&mask), egui::Button::new("Split"))
                            .on_disabled_hover_text("Uncheck some series (not all) to split");
                        if response.clicked() {
                            split_request = Some(group_index);
                        }
                    });

                    Plot::new(("log_plot", group_index))
                        .height(plot_height)
                        .legend(Legend::default())
                        .link_axis(link_id, [true, false])
                        .link_cursor(link_id, [true, false])
                        .x_axis_label("Sample")
                        .show(ui, |plot_ui| {
                            for &series in members {
                                if !self.visible[series] {
                                    continue;
                                }
                                let [r, g, b, a] = series_color(series);
                                let color = Color32::from_rgba_unmultiplied(r, g, b, a);
                                for run in &self.lines[series] {
                                    plot_ui.line(
                                        Line::new(
                                            log.header[series].as_str(),
                                            PlotPoints::from(run.clone()),
                                        )
                                        .color(color),
                                    );
                                }
                            }
                        });
                }
            });

        if let Some(group) = split_request {
            self.split_group(group);
        }
    }
}

impl Pane for LogViewerState {
    fn kind(&self) -> PaneKind {
        PaneKind::LogViewer
    }

    fn render(&mut self, shared: &mut SharedState, ui: &mut Ui) -> Vec<AppAction> {
        self.render_toolbar(shared, ui);
        ui.separator();
        self.render_plots(ui);
        Vec::new()
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
        self
    }
}
