//! UI session state persistence
//!
//! Session state is "where I was": window size and the tabs that were open.
//! It is saved automatically on exit and is not meant to be shared, unlike
//! configuration documents which are saved explicitly.
//!
//! Log tabs keep their pane partition so a log reopens split the same way,
//! provided its header length has not changed.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::formats::FormatKind;
use super::{app_data_dir, ensure_app_data_dir};
use crate::error::StudioError;
use crate::plot::SeriesPartition;

/// UI session state filename
pub const UI_SESSION_FILE: &str = "ui_session.json";

/// UI session state persisted between app launches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiSessionState {
    /// Version for migration
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub window: WindowState,

    #[serde(default)]
    pub log_tabs: Vec<LogTabSession>,

    #[serde(default)]
    pub editor_tabs: Vec<EditorTabSession>,

    #[serde(default = "default_true")]
    pub show_status_bar: bool,
}

fn default_version() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

impl Default for UiSessionState {
    fn default() -> Self {
        Self {
            version: 1,
            window: WindowState::default(),
            log_tabs: Vec::new(),
            editor_tabs: Vec::new(),
            show_status_bar: true,
        }
    }
}

impl UiSessionState {
    /// Load UI session state from default location
    pub fn load() -> Self {
        match app_data_dir().map(|p| p.join(UI_SESSION_FILE)) {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from `path`, falling back to defaults on any problem
    pub fn load_from(path: &Path) -> Self {
        if path.exists() {
            if let Ok(content) = std::fs::read_to_string(path) {
                match serde_json::from_str(&content) {
                    Ok(state) => {
                        tracing::info!("Loaded UI session state from {:?}", path);
                        return state;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse UI session state: {}, using defaults", e);
                    }
                }
            }
        }
        Self::default()
    }

    /// Save UI session state to default location
    pub fn save(&self) -> Result<(), StudioError> {
        let dir = ensure_app_data_dir()?;
        self.save_to(&dir.join(UI_SESSION_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<(), StudioError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| StudioError::Config(format!("Failed to serialize UI session: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| StudioError::Config(format!("Failed to write UI session: {}", e)))?;

        tracing::debug!("Saved UI session state to {:?}", path);
        Ok(())
    }
}

/// Window size
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowState {
    #[serde(default = "default_window_size")]
    pub size: (u32, u32),
    #[serde(default)]
    pub maximized: bool,
}

fn default_window_size() -> (u32, u32) {
    (1280, 720)
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            size: default_window_size(),
            maximized: false,
        }
    }
}

/// An open log viewer tab
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogTabSession {
    pub path: PathBuf,
    pub partition: SeriesPartition,
}

/// An open configuration or log-settings editor tab
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorTabSession {
    pub kind: FormatKind,
    #[serde(default)]
    pub path: Option<PathBuf>,
}
