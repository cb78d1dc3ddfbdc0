//! Thread boundary between the UI and the sidecar process.
//!
//! The UI submits tagged commands and drains tagged responses once per frame.
//! The tag is opaque to the bridge; the app uses it to route a reply back to
//! the pane that asked.

use super::{execute, DriverCli, SidecarCommand, SidecarReply};
use crate::error::{Result, StudioError};
use crossbeam_channel::{bounded, Receiver, SendTimeoutError, Sender};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Channel capacity for commands (UI → worker).
const CMD_CHANNEL_CAPACITY: usize = 64;
/// Channel capacity for responses (worker → UI).
const REPLY_CHANNEL_CAPACITY: usize = 64;
/// How long shutdown waits for an idle worker before detaching it
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);
/// Retry interval for a reply blocked on a full queue
const REPLY_RETRY_INTERVAL: Duration = Duration::from_millis(50);

/// Messages handled by the worker thread
enum WorkerMessage {
    Run { tag: u64, command: SidecarCommand },
    /// Replace the CLI, e.g. after the executable path changed
    Swap(Box<dyn DriverCli>),
    Shutdown,
}

/// Result of one submitted command
#[derive(Debug)]
pub struct SidecarResponse {
    pub tag: u64,
    pub command: SidecarCommand,
    pub result: Result<SidecarReply>,
}

/// UI-side handle for the sidecar worker thread
pub struct SidecarBridge {
    cmd_tx: Sender<WorkerMessage>,
    reply_rx: Receiver<SidecarResponse>,
    pending: Arc<AtomicUsize>,
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl SidecarBridge {
    /// Spawn the worker thread owning `cli`
    pub fn spawn(cli: impl DriverCli + 'static) -> Self {
        let (cmd_tx, cmd_rx) = bounded(CMD_CHANNEL_CAPACITY);
        let (reply_tx, reply_rx) = bounded(REPLY_CHANNEL_CAPACITY);
        let pending = Arc::new(AtomicUsize::new(0));
        let stop = Arc::new(AtomicBool::new(false));

        let worker = Worker {
            cmd_rx,
            reply_tx,
            pending: pending.clone(),
            stop: stop.clone(),
        };
        let handle = std::thread::Builder::new()
            .name("sidecar".to_string())
            .spawn(move || worker.run(Box::new(cli)))
            .map_err(|e| tracing::error!("Failed to spawn sidecar worker: {}", e))
            .ok();

        Self {
            cmd_tx,
            reply_rx,
            pending,
            stop,
            handle,
        }
    }

    /// Queue a command. Fails when the worker is gone or the queue is full.
    pub fn submit(&self, tag: u64, command: SidecarCommand) -> Result<()> {
        if self.stop.load(Ordering::SeqCst) {
            return Err(StudioError::Channel("sidecar worker stopped".to_string()));
        }
        tracing::debug!("Submitting {} (tag {})", command.subcommand(), tag);
        self.pending.fetch_add(1, Ordering::SeqCst);
        self.cmd_tx
            .try_send(WorkerMessage::Run { tag, command })
            .map_err(|e| {
                self.pending.fetch_sub(1, Ordering::SeqCst);
                StudioError::Channel(format!("sidecar worker unavailable: {}", e))
            })
    }

    /// Replace the CLI used for subsequent commands
    pub fn replace_cli(&self, cli: impl DriverCli + 'static) {
        let _ = self.cmd_tx.send(WorkerMessage::Swap(Box::new(cli)));
    }

    /// Drain all finished responses
    pub fn drain(&self) -> Vec<SidecarResponse> {
        self.reply_rx.try_iter().collect()
    }

    /// Block until one response arrives or `timeout` passes
    pub fn recv_timeout(&self, timeout: Duration) -> Option<SidecarResponse> {
        self.reply_rx.recv_timeout(timeout).ok()
    }

    /// Commands submitted but not yet answered
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn is_busy(&self) -> bool {
        self.pending() > 0
    }

    /// Stop the worker. Queued commands are dropped unanswered.
    ///
    /// Waits briefly for the worker to exit; a worker still inside a sidecar
    /// call is detached and exits once that call returns.
    pub fn shutdown(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        let Some(handle) = self.handle.take() else {
            return;
        };
        // A full queue still wakes the worker, which checks the flag per message
        let _ = self.cmd_tx.try_send(WorkerMessage::Shutdown);

        let deadline = Instant::now() + SHUTDOWN_GRACE;
        while !handle.is_finished() && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(5));
        }
        if handle.is_finished() {
            if handle.join().is_err() {
                tracing::error!("Sidecar worker panicked");
            }
        } else {
            tracing::warn!("Sidecar worker busy at shutdown, detaching");
        }
        self.pending.store(0, Ordering::SeqCst);
    }
}

impl Drop for SidecarBridge {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Worker-side ends of the bridge
struct Worker {
    cmd_rx: Receiver<WorkerMessage>,
    reply_tx: Sender<SidecarResponse>,
    pending: Arc<AtomicUsize>,
    stop: Arc<AtomicBool>,
}

impl Worker {
    fn run(self, mut cli: Box<dyn DriverCli>) {
        tracing::info!("Sidecar worker started");

        for message in self.cmd_rx.iter() {
            if self.stop.load(Ordering::SeqCst) {
                break;
            }
            match message {
                WorkerMessage::Run { tag, command } => {
                    let result = execute(cli.as_mut(), &command);
                    if let Err(e) = &result {
                        tracing::warn!("{} failed: {}", command.subcommand(), e);
                    }
                    let delivered = self.deliver(SidecarResponse {
                        tag,
                        command,
                        result,
                    });
                    let _ = self
                        .pending
                        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
                    if !delivered {
                        break;
                    }
                }
                WorkerMessage::Swap(new_cli) => {
                    tracing::info!("Sidecar CLI replaced");
                    cli = new_cli;
                }
                WorkerMessage::Shutdown => break,
            }
        }

        tracing::info!("Sidecar worker stopped");
    }

    /// Send a reply, giving up once the UI is gone or shutdown was requested
    fn deliver(&self, mut response: SidecarResponse) -> bool {
        loop {
            match self.reply_tx.send_timeout(response, REPLY_RETRY_INTERVAL) {
                Ok(()) => return true,
                Err(SendTimeoutError::Timeout(r)) if !self.stop.load(Ordering::SeqCst) => {
                    response = r;
                }
                Err(_) => return false,
            }
        }
    }
}
