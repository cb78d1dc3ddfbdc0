//! Driver Studio - Main Entry Point
//!
//! Configuration editor, log plotter and port manager for motion-control
//! drivers. Device access goes through the sidecar CLI.

use std::path::PathBuf;

use anyhow::Context;
use driver_studio::{
    config::{ensure_app_data_dir, ensure_log_dir, AppState, FormatLibrary, UiSessionState},
    frontend::StudioApp,
    sidecar::{ProcessCli, SidecarBridge},
};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn log_file_dir() -> anyhow::Result<PathBuf> {
    let data_dir = ensure_app_data_dir().context("no data directory for logs")?;
    Ok(ensure_log_dir(&data_dir)?)
}

/// Install the console subscriber, plus the rolling file when its folder exists.
///
/// The returned guard flushes the file writer when dropped.
fn init_logging() -> anyhow::Result<Option<WorkerGuard>> {
    let log_dir = log_file_dir();
    let (file_writer, guard) = match &log_dir {
        Ok(dir) => {
            let file_appender = tracing_appender::rolling::daily(dir, "driver-studio.log");
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            (Some(writer), Some(guard))
        }
        Err(_) => (None, None),
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,driver_studio=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .with(file_writer.map(|writer| {
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer)
        }))
        .try_init()
        .context("failed to install tracing subscriber")?;

    if let Err(e) = log_dir {
        tracing::warn!("File logging disabled: {:#}", e);
    }
    Ok(guard)
}

fn main() -> eframe::Result<()> {
    let _log_guard = init_logging().unwrap_or_else(|e| {
        eprintln!("Logging disabled: {:#}", e);
        None
    });

    tracing::info!("Starting Driver Studio");

    // Load application state (selected port, recent files, preferences)
    let mut app_state = AppState::load_or_default();
    app_state.cleanup_missing_files();

    let session = UiSessionState::load();
    let formats = FormatLibrary::load_or_default();

    tracing::info!("Using sidecar {:?}", app_state.sidecar_path);
    let bridge = SidecarBridge::spawn(ProcessCli::new(app_state.sidecar_path.clone()));

    let (width, height) = session.window.size;
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([width as f32, height as f32])
            .with_min_inner_size([800.0, 600.0])
            .with_maximized(session.window.maximized)
            .with_title("Driver Studio"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "Driver Studio",
        native_options,
        Box::new(|cc| {
            Ok(Box::new(StudioApp::new(
                cc, app_state, session, formats, bridge,
            )))
        }),
    );

    tracing::info!("Shutting down...");
    result
}
