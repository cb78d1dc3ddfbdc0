//! Sidecar CLI access
//!
//! All device traffic goes through an external command-line tool. Each
//! operation is one process invocation:
//!
//! ```text
//! driver-cli port.detect
//! driver-cli config.get --port COM3
//! driver-cli config.set --port COM3 '{"system":{...}}'
//! driver-cli log.start  --port COM3 ['{"log":{...}}']
//! driver-cli log.stop   --port COM3
//! driver-cli log.status --port COM3
//! driver-cli log.get    --port COM3
//! ```
//!
//! The [`DriverCli`] trait is the seam between the app and the process;
//! [`SidecarBridge`] runs it on a worker thread so the UI never blocks.

pub mod bridge;

pub use bridge::{SidecarBridge, SidecarResponse};

use crate::error::{Result, ResultExt, StudioError};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// One sidecar invocation
#[derive(Debug, Clone, PartialEq)]
pub enum SidecarCommand {
    DetectPorts,
    GetConfig { port: String },
    SetConfig { port: String, json: String },
    /// Optional log-settings document passed through to the driver
    StartLog { port: String, settings: Option<String> },
    StopLog { port: String },
    LogStatus { port: String },
    GetLog { port: String },
}

impl SidecarCommand {
    /// Subcommand name on the CLI
    pub fn subcommand(&self) -> &'static str {
        match self {
            SidecarCommand::DetectPorts => "port.detect",
            SidecarCommand::GetConfig { .. } => "config.get",
            SidecarCommand::SetConfig { .. } => "config.set",
            SidecarCommand::StartLog { .. } => "log.start",
            SidecarCommand::StopLog { .. } => "log.stop",
            SidecarCommand::LogStatus { .. } => "log.status",
            SidecarCommand::GetLog { .. } => "log.get",
        }
    }

    pub fn port(&self) -> Option<&str> {
        match self {
            SidecarCommand::DetectPorts => None,
            SidecarCommand::GetConfig { port }
            | SidecarCommand::SetConfig { port, .. }
            | SidecarCommand::StartLog { port, .. }
            | SidecarCommand::StopLog { port }
            | SidecarCommand::LogStatus { port }
            | SidecarCommand::GetLog { port } => Some(port),
        }
    }

    /// Full argument list: subcommand, `--port <name>`, then the payload
    pub fn args(&self) -> Vec<String> {
        let mut args = vec![self.subcommand().to_string()];
        if let Some(port) = self.port() {
            args.push("--port".to_string());
            args.push(port.to_string());
        }
        match self {
            SidecarCommand::SetConfig { json, .. } => args.push(json.clone()),
            SidecarCommand::StartLog {
                settings: Some(json),
                ..
            } => args.push(json.clone()),
            _ => {}
        }
        args
    }
}

/// Runs sidecar commands and returns their standard output
#[cfg_attr(test, mockall::automock)]
pub trait DriverCli: Send {
    fn run(&mut self, command: &SidecarCommand) -> Result<String>;
}

/// Longest a single sidecar invocation may run before it is killed
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Interval between exit checks on a running sidecar process
const EXIT_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// [`DriverCli`] backed by a child process
#[derive(Debug, Clone)]
pub struct ProcessCli {
    program: PathBuf,
    timeout: Duration,
}

impl ProcessCli {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            timeout: DEFAULT_COMMAND_TIMEOUT,
        }
    }

    /// Kill invocations that run longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    /// Wait for `child` until the timeout passes, then kill it
    fn wait_or_kill(&self, child: &mut Child, subcommand: &str) -> Result<ExitStatus> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if Instant::now() >= deadline {
                tracing::warn!("{} timed out, killing sidecar", subcommand);
                if let Err(e) = child.kill() {
                    tracing::warn!("Failed to kill sidecar: {}", e);
                }
                let _ = child.wait();
                return Err(StudioError::Sidecar(format!(
                    "{} timed out after {:.1}s",
                    subcommand,
                    self.timeout.as_secs_f64()
                )));
            }
            std::thread::sleep(EXIT_POLL_INTERVAL);
        }
    }
}

/// Collect a child pipe on its own thread so a full pipe never stalls the child
fn read_pipe(pipe: Option<impl Read + Send + 'static>) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

impl DriverCli for ProcessCli {
    fn run(&mut self, command: &SidecarCommand) -> Result<String> {
        let mut process = Command::new(&self.program);
        process
            .args(command.args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            process.creation_flags(CREATE_NO_WINDOW);
        }

        tracing::debug!("Running {:?} {}", self.program, command.subcommand());
        let mut child = process.spawn().map_err(|e| {
            StudioError::Sidecar(format!("failed to launch {}: {}", self.program.display(), e))
        })?;

        let stdout = read_pipe(child.stdout.take());
        let stderr = read_pipe(child.stderr.take());
        let status = self.wait_or_kill(&mut child, command.subcommand())?;
        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).trim().to_string();
            let message = if stderr.is_empty() {
                format!("{} exited with {}", command.subcommand(), status)
            } else {
                stderr
            };
            return Err(StudioError::Sidecar(message));
        }

        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

/// Reply of `log.status`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LogStatus {
    pub active: bool,
    #[serde(default)]
    pub samples: u64,
}

/// Decoded reply of a successful command
#[derive(Debug, Clone, PartialEq)]
pub enum SidecarReply {
    Ports(Vec<String>),
    /// Raw JSON text of the device configuration
    Config { port: String, document: String },
    ConfigWritten { port: String },
    LogStarted,
    LogStopped,
    LogStatus(LogStatus),
    /// CSV text of the device log
    LogData { port: String, csv: String },
}

/// `port.detect` output: a JSON array of names, or one name per line
pub fn parse_ports(stdout: &str) -> Result<Vec<String>> {
    let trimmed = stdout.trim();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed)
            .map_err(|e| StudioError::Sidecar(format!("unreadable port list: {}", e)));
    }
    Ok(trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

pub fn parse_log_status(stdout: &str) -> Result<LogStatus> {
    serde_json::from_str(stdout.trim())
        .map_err(|e| StudioError::Sidecar(format!("unreadable log status: {}", e)))
}

/// Run `command` and decode its output
pub fn execute(cli: &mut dyn DriverCli, command: &SidecarCommand) -> Result<SidecarReply> {
    let stdout = cli.run(command).context(command.subcommand())?;

    let reply = match command {
        SidecarCommand::DetectPorts => SidecarReply::Ports(parse_ports(&stdout)?),
        SidecarCommand::GetConfig { port } => SidecarReply::Config {
            port: port.clone(),
            document: stdout,
        },
        SidecarCommand::SetConfig { port, .. } => SidecarReply::ConfigWritten { port: port.clone() },
        SidecarCommand::StartLog { .. } => SidecarReply::LogStarted,
        SidecarCommand::StopLog { .. } => SidecarReply::LogStopped,
        SidecarCommand::LogStatus { .. } => SidecarReply::LogStatus(parse_log_status(&stdout)?),
        SidecarCommand::GetLog { port } => SidecarReply::LogData {
            port: port.clone(),
            csv: stdout,
        },
    };
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;

    #[test]
    fn test_args_layout() {
        assert_eq!(SidecarCommand::DetectPorts.args(), vec!["port.detect"]);
        assert_eq!(
            SidecarCommand::SetConfig {
                port: "COM3".to_string(),
                json: "{}".to_string()
            }
            .args(),
            vec!["config.set", "--port", "COM3", "{}"]
        );
        assert_eq!(
            SidecarCommand::StartLog {
                port: "COM3".to_string(),
                settings: None
            }
            .args(),
            vec!["log.start", "--port", "COM3"]
        );
    }

    #[test]
    fn test_parse_ports() {
        assert_eq!(
            parse_ports("[\"COM3\",\"COM4\"]\n").unwrap(),
            vec!["COM3", "COM4"]
        );
        assert_eq!(
            parse_ports("/dev/ttyUSB0\n\n/dev/ttyACM1\n").unwrap(),
            vec!["/dev/ttyUSB0", "/dev/ttyACM1"]
        );
        assert!(parse_ports("").unwrap().is_empty());
        assert!(parse_ports("[1,").is_err());
    }

    #[test]
    fn test_parse_log_status() {
        let status = parse_log_status("{\"active\":true,\"samples\":42}").unwrap();
        assert_eq!(
            status,
            LogStatus {
                active: true,
                samples: 42
            }
        );
        assert!(!parse_log_status("{\"active\":false}").unwrap().active);
        assert!(parse_log_status("running").is_err());
    }

    #[test]
    fn test_execute_get_config() {
        let command = SidecarCommand::GetConfig {
            port: "COM3".to_string(),
        };
        let mut cli = MockDriverCli::new();
        cli.expect_run()
            .with(eq(command.clone()))
            .times(1)
            .returning(|_| Ok("{\"system\":{}}".to_string()));

        let reply = execute(&mut cli, &command).unwrap();
        assert_eq!(
            reply,
            SidecarReply::Config {
                port: "COM3".to_string(),
                document: "{\"system\":{}}".to_string()
            }
        );
    }

    #[test]
    fn test_execute_adds_subcommand_context() {
        let mut cli = MockDriverCli::new();
        cli.expect_run()
            .returning(|_| Err(StudioError::Sidecar("no device".to_string())));

        let err = execute(
            &mut cli,
            &SidecarCommand::StopLog {
                port: "COM3".to_string(),
            },
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "log.stop: Sidecar error: no device");
        assert_eq!(err.title(), "Device command failed");
    }

    #[test]
    fn test_missing_program_reports_launch_failure() {
        let mut cli = ProcessCli::new("/definitely/not/a/driver-cli");
        let err = cli.run(&SidecarCommand::DetectPorts).unwrap_err();
        assert!(err.to_string().contains("failed to launch"));
    }

    #[cfg(unix)]
    fn write_script(dir: &std::path::Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join("driver-cli");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn test_process_output_and_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let ok = write_script(dir.path(), "echo \"$1\"");
        let mut cli = ProcessCli::new(&ok);
        assert_eq!(cli.run(&SidecarCommand::DetectPorts).unwrap().trim(), "port.detect");

        let failing = write_script(dir.path(), "echo 'no device' >&2; exit 3");
        let mut cli = ProcessCli::new(&failing);
        let err = cli.run(&SidecarCommand::DetectPorts).unwrap_err();
        assert_eq!(err.to_string(), "Sidecar error: no device");
    }

    #[cfg(unix)]
    #[test]
    fn test_hung_process_is_killed() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "exec sleep 10");
        let mut cli = ProcessCli::new(&script).with_timeout(Duration::from_millis(200));

        let started = Instant::now();
        let err = cli.run(&SidecarCommand::DetectPorts).unwrap_err();
        assert!(err.to_string().contains("timed out"), "{}", err);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
