//! Configuration module for Driver Studio
//!
//! This module handles persistent application state:
//! - Application state (selected port, recent files, preferences)
//! - UI session state (window, open log tabs with their pane layout)
//! - Reference formats and option lists for the configuration forms
//!
//! # App Data Location
//!
//! Application data is stored in the platform-appropriate location:
//! - **Linux**: `~/.local/share/dev.driverstudio.app/`
//! - **macOS**: `~/Library/Application Support/dev.driverstudio.app/`
//! - **Windows**: `%APPDATA%\dev.driverstudio.app\`
//!
//! # Files
//!
//! - `app_state.json` - Selected port, recent files, preferences
//! - `ui_session.json` - Window and open tabs
//! - `formats.json` - Optional override of the reference formats
//! - `logs/` - Rolling application log

pub mod formats;
pub mod ui_session;

pub use formats::{FormatKind, FormatLibrary};
pub use ui_session::{LogTabSession, UiSessionState};

use crate::error::{Result, StudioError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for data directories
pub const APP_ID: &str = "dev.driverstudio.app";

/// App state filename
pub const APP_STATE_FILE: &str = "app_state.json";

/// Configuration documents are saved as JSON
pub const CONFIG_FILE_EXTENSION: &str = "json";

/// Logs are saved as CSV
pub const LOG_FILE_EXTENSION: &str = "csv";

/// Maximum number of recent files remembered per list
pub const MAX_RECENT_FILES: usize = 10;

/// Sidecar executable looked up on PATH when none is configured
pub const DEFAULT_SIDECAR: &str = "driver-cli";

/// Folder under the app data directory holding the rolling log
pub const LOG_DIR: &str = "logs";

// ==================== App Data Directory ====================

/// Get the application data directory path
pub fn app_data_dir() -> Option<PathBuf> {
    dirs_next::data_dir().map(|p| p.join(APP_ID))
}

/// Ensure the app data directory exists
pub fn ensure_app_data_dir() -> Result<PathBuf> {
    let dir = app_data_dir().ok_or_else(|| {
        StudioError::Config("Could not determine app data directory".to_string())
    })?;

    if !dir.exists() {
        std::fs::create_dir_all(&dir).map_err(|e| {
            StudioError::Config(format!("Failed to create app data directory: {}", e))
        })?;
    }

    Ok(dir)
}

/// Create the application log folder inside `data_dir`
pub fn ensure_log_dir(data_dir: &Path) -> Result<PathBuf> {
    let dir = data_dir.join(LOG_DIR);
    std::fs::create_dir_all(&dir).map_err(|e| {
        StudioError::Config(format!("Failed to create {}: {}", dir.display(), e))
    })?;
    Ok(dir)
}

/// Get the path to the app state file
pub fn app_state_path() -> Option<PathBuf> {
    app_data_dir().map(|p| p.join(APP_STATE_FILE))
}

/// Check a user-chosen save target.
///
/// The path must be non-empty, carry `extension` (case-insensitive) and live
/// in an existing folder.
pub fn validate_save_path(path: &Path, extension: &str) -> Result<PathBuf> {
    if path.as_os_str().is_empty() {
        return Err(StudioError::InvalidPath("no file selected".to_string()));
    }

    let matches = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension));
    if !matches {
        return Err(StudioError::InvalidPath(format!(
            "'{}' must have a .{} extension",
            path.display(),
            extension
        )));
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            return Err(StudioError::InvalidPath(format!(
                "folder '{}' does not exist",
                parent.display()
            )));
        }
    }

    Ok(path.to_path_buf())
}

// ==================== Recent File Entry ====================

/// A recently opened configuration or log file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentFile {
    pub path: PathBuf,

    /// Display name (file name)
    pub name: String,

    pub last_opened: DateTime<Utc>,

    /// Format a configuration document was edited with (unused for logs)
    #[serde(default)]
    pub kind: FormatKind,
}

impl RecentFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            path,
            name,
            last_opened: Utc::now(),
            kind: FormatKind::default(),
        }
    }

    pub fn with_kind(mut self, kind: FormatKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if the file still exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

fn push_recent(list: &mut Vec<RecentFile>, entry: RecentFile) {
    list.retain(|f| f.path != entry.path);
    list.insert(0, entry);
    list.truncate(MAX_RECENT_FILES);
}

// ==================== App State ====================

/// Persistent application state.
///
/// One instance is owned by the app and lent to panes through
/// `SharedState`; nothing else holds cross-page state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppState {
    /// Version for future migration support
    #[serde(default = "default_app_state_version")]
    pub version: u32,

    /// Port the sidecar talks to
    #[serde(default)]
    selected_port: Option<String>,

    /// Ports reported by the last detection
    #[serde(default)]
    pub known_ports: Vec<String>,

    #[serde(default)]
    pub recent_configs: Vec<RecentFile>,

    #[serde(default)]
    pub recent_logs: Vec<RecentFile>,

    /// Sidecar executable
    #[serde(default = "default_sidecar_path")]
    pub sidecar_path: PathBuf,

    #[serde(default)]
    pub ui_preferences: UiPreferences,
}

fn default_app_state_version() -> u32 {
    1
}

fn default_sidecar_path() -> PathBuf {
    PathBuf::from(DEFAULT_SIDECAR)
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            version: 1,
            selected_port: None,
            known_ports: Vec::new(),
            recent_configs: Vec::new(),
            recent_logs: Vec::new(),
            sidecar_path: default_sidecar_path(),
            ui_preferences: UiPreferences::default(),
        }
    }
}

impl AppState {
    /// Load app state from the default location
    pub fn load() -> Result<Self> {
        let path = app_state_path().ok_or_else(|| {
            StudioError::Config("Could not determine app state path".to_string())
        })?;
        Self::load_from(&path)
    }

    /// Load app state from `path`; a missing file yields defaults
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| StudioError::Config(format!("Failed to read app state: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| StudioError::Config(format!("Failed to parse app state: {}", e)))
    }

    /// Load app state, returning defaults on any error
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Failed to load app state, using defaults: {}", e);
            Self::default()
        })
    }

    /// Save app state to the default location
    pub fn save(&self) -> Result<()> {
        let dir = ensure_app_data_dir()?;
        self.save_to(&dir.join(APP_STATE_FILE))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| StudioError::Config(format!("Failed to serialize app state: {}", e)))?;

        std::fs::write(path, content)
            .map_err(|e| StudioError::Config(format!("Failed to write app state: {}", e)))
    }

    pub fn selected_port(&self) -> Option<&str> {
        self.selected_port.as_deref()
    }

    /// Select the port used by sidecar commands (`None` clears the selection)
    pub fn select_port(&mut self, port: Option<String>) {
        if self.selected_port != port {
            tracing::info!("Selected port: {:?}", port);
        }
        self.selected_port = port;
    }

    /// Replace the detected port list, dropping a selection that disappeared
    pub fn set_known_ports(&mut self, ports: Vec<String>) {
        if let Some(selected) = &self.selected_port {
            if !ports.contains(selected) {
                tracing::info!("Port {} no longer present", selected);
                self.selected_port = None;
            }
        }
        if self.selected_port.is_none() && ports.len() == 1 {
            self.selected_port = ports.first().cloned();
        }
        self.known_ports = ports;
    }

    /// Remember a configuration document together with the format it belongs to
    pub fn add_recent_config(&mut self, path: impl AsRef<Path>, kind: FormatKind) {
        let entry = RecentFile::new(path.as_ref()).with_kind(kind);
        push_recent(&mut self.recent_configs, entry);
    }

    pub fn add_recent_log(&mut self, path: impl AsRef<Path>) {
        push_recent(&mut self.recent_logs, RecentFile::new(path.as_ref()));
    }

    /// Remove a file from both recent lists
    pub fn remove_recent(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.recent_configs.retain(|f| f.path != path);
        self.recent_logs.retain(|f| f.path != path);
    }

    /// Clean up recent entries whose files no longer exist
    pub fn cleanup_missing_files(&mut self) {
        self.recent_configs.retain(RecentFile::exists);
        self.recent_logs.retain(RecentFile::exists);
    }
}

/// UI preferences that persist across sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiPreferences {
    /// Enable dark mode
    #[serde(default = "default_true")]
    pub dark_mode: bool,

    /// Font scale factor
    #[serde(default = "default_font_scale")]
    pub font_scale: f32,

    /// Reopen log tabs from the last session
    #[serde(default = "default_true")]
    pub restore_session: bool,
}

fn default_true() -> bool {
    true
}

fn default_font_scale() -> f32 {
    1.0
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            dark_mode: true,
            font_scale: 1.0,
            restore_session: true,
        }
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_state_default() {
        let state = AppState::default();
        assert!(state.recent_configs.is_empty());
        assert!(state.selected_port().is_none());
        assert_eq!(state.sidecar_path, PathBuf::from(DEFAULT_SIDECAR));
        assert_eq!(state.version, 1);
    }

    #[test]
    fn test_add_recent_config() {
        let mut state = AppState::default();

        state.add_recent_config("/path/to/axis.json", FormatKind::Configuration);
        state.add_recent_config("/path/to/line.json", FormatKind::Logging);
        assert_eq!(state.recent_configs.len(), 2);
        assert_eq!(state.recent_configs[0].name, "line.json"); // Most recent first

        // Adding same path again should move it, not duplicate
        state.add_recent_config("/path/to/axis.json", FormatKind::Configuration);
        assert_eq!(state.recent_configs.len(), 2);
        assert_eq!(state.recent_configs[0].name, "axis.json");
        assert!(state.recent_logs.is_empty());
    }

    #[test]
    fn test_recent_files_max_limit() {
        let mut state = AppState::default();
        for i in 0..15 {
            state.add_recent_log(format!("/logs/run{}.csv", i));
        }
        assert_eq!(state.recent_logs.len(), MAX_RECENT_FILES);
        assert_eq!(state.recent_logs[0].name, "run14.csv");
    }

    #[test]
    fn test_known_ports_update_selection() {
        let mut state = AppState::default();
        state.set_known_ports(vec!["COM3".to_string()]);
        assert_eq!(state.selected_port(), Some("COM3"));

        state.set_known_ports(vec!["COM4".to_string(), "COM5".to_string()]);
        assert_eq!(state.selected_port(), None);

        state.select_port(Some("COM5".to_string()));
        state.set_known_ports(vec!["COM4".to_string(), "COM5".to_string()]);
        assert_eq!(state.selected_port(), Some("COM5"));
    }

    #[test]
    fn test_app_state_serialization() {
        let mut state = AppState::default();
        state.add_recent_config("/test/drive.json", FormatKind::Logging);
        state.select_port(Some("/dev/ttyUSB0".to_string()));

        let json = serde_json::to_string_pretty(&state).unwrap();
        let parsed: AppState = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.recent_configs.len(), 1);
        assert_eq!(parsed.recent_configs[0].kind, FormatKind::Logging);
        assert_eq!(parsed.selected_port(), Some("/dev/ttyUSB0"));
    }

    #[test]
    fn test_recent_entry_without_kind_defaults_to_configuration() {
        let json = r#"{"recent_configs":[{"path":"/d/drive.json","name":"drive.json","last_opened":"2024-01-01T00:00:00Z"}]}"#;
        let parsed: AppState = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.recent_configs[0].kind, FormatKind::Configuration);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let parsed: AppState = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.sidecar_path, PathBuf::from(DEFAULT_SIDECAR));
        assert!(parsed.ui_preferences.dark_mode);
    }

    #[test]
    fn test_ensure_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let logs = ensure_log_dir(dir.path()).unwrap();
        assert!(logs.is_dir());
        assert_eq!(ensure_log_dir(dir.path()).unwrap(), logs);

        let blocked = tempfile::tempdir().unwrap();
        std::fs::write(blocked.path().join(LOG_DIR), "not a folder").unwrap();
        let err = ensure_log_dir(blocked.path()).unwrap_err();
        assert!(matches!(err, StudioError::Config(_)));
    }

    #[test]
    fn test_validate_save_path() {
        assert!(validate_save_path(Path::new(""), "json").is_err());
        assert!(validate_save_path(Path::new("drive.txt"), "json").is_err());
        assert!(validate_save_path(Path::new("drive"), "json").is_err());
        assert!(validate_save_path(Path::new("drive.JSON"), "json").is_ok());
        assert!(validate_save_path(Path::new("/no/such/folder/drive.json"), "json").is_err());

        let err = validate_save_path(Path::new("run.json"), "csv").unwrap_err();
        assert_eq!(err.title(), "Invalid file path");
    }
}
