//! # Driver Studio
//!
//! Desktop companion for a motion-control driver: edit configuration and
//! log-settings documents, read and write them on the device, and plot CSV
//! logs in stacked, linked charts.
//!
//! ## Architecture
//!
//! - **Schema**: dynamic JSON documents checked against a reference shape
//! - **Plot**: partitioning of log series into stacked plots
//! - **Logfile**: CSV log parsing
//! - **Sidecar**: device access through an external CLI, run on a worker thread
//! - **Frontend**: eframe/egui with an egui_dock workspace
//!
//! ## Configuration
//!
//! Application state (selected port, recent files, preferences) is stored in
//! the platform-appropriate data directory under `dev.driverstudio.app`:
//!
//! - **Linux**: `~/.local/share/dev.driverstudio.app/`
//! - **macOS**: `~/Library/Application Support/dev.driverstudio.app/`
//! - **Windows**: `%APPDATA%\dev.driverstudio.app\`
//!
//! ## Example
//!
//! ```ignore
//! use driver_studio::{
//!     config::{AppState, FormatLibrary, UiSessionState},
//!     frontend::StudioApp,
//!     sidecar::{ProcessCli, SidecarBridge},
//! };
//!
//! fn main() -> eframe::Result<()> {
//!     let app_state = AppState::load_or_default();
//!     let session = UiSessionState::load();
//!     let formats = FormatLibrary::load_or_default();
//!     let bridge = SidecarBridge::spawn(ProcessCli::new(app_state.sidecar_path.clone()));
//!
//!     eframe::run_native(
//!         "Driver Studio",
//!         eframe::NativeOptions::default(),
//!         Box::new(|cc| Ok(Box::new(StudioApp::new(cc, app_state, session, formats, bridge)))),
//!     )
//! }
//! ```

pub mod config;
pub mod error;
pub mod frontend;
pub mod logfile;
pub mod plot;
pub mod schema;
pub mod sidecar;

// Re-export commonly used types
pub use config::{AppState, FormatKind, FormatLibrary, UiSessionState};
pub use error::{Result, StudioError};
pub use frontend::StudioApp;
pub use logfile::CsvLog;
pub use plot::SeriesPartition;
pub use schema::{SchemaObject, SchemaValue};
pub use sidecar::{DriverCli, ProcessCli, SidecarBridge, SidecarCommand, SidecarReply};
