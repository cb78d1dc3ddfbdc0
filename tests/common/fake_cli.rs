//! Scripted sidecar for integration tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use driver_studio::error::{Result, StudioError};
use driver_studio::{DriverCli, SidecarCommand};

/// A `DriverCli` that answers from a table keyed by subcommand and records
/// every command it receives.
#[derive(Clone, Default)]
pub struct FakeCli {
    replies: HashMap<&'static str, std::result::Result<String, String>>,
    log: Arc<Mutex<Vec<SidecarCommand>>>,
}

impl FakeCli {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, subcommand: &'static str, stdout: &str) -> Self {
        self.replies.insert(subcommand, Ok(stdout.to_string()));
        self
    }

    pub fn fail(mut self, subcommand: &'static str, stderr: &str) -> Self {
        self.replies.insert(subcommand, Err(stderr.to_string()));
        self
    }

    /// Shared view of the commands received so far
    pub fn received(&self) -> Arc<Mutex<Vec<SidecarCommand>>> {
        self.log.clone()
    }
}

impl DriverCli for FakeCli {
    fn run(&mut self, command: &SidecarCommand) -> Result<String> {
        self.log.lock().unwrap().push(command.clone());
        match self.replies.get(command.subcommand()) {
            Some(Ok(stdout)) => Ok(stdout.clone()),
            Some(Err(stderr)) => Err(StudioError::Sidecar(stderr.clone())),
            None => Err(StudioError::Sidecar(format!(
                "no scripted reply for {}",
                command.subcommand()
            ))),
        }
    }
}
