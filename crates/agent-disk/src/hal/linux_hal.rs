//! Linux implementations backed by real processes and files.

use super::{CmdRunner, FileOps};
use crate::config::DEFAULT_COMMAND_TIMEOUT;
use crate::{DiskError, DiskResult};
use std::fs;
use std::io::Read;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;
use wait_timeout::ChildExt;

/// Runs commands on the host, killing any that outlive the timeout.
#[derive(Debug, Clone)]
pub struct LinuxCmdRunner {
    timeout: Duration,
}

impl Default for LinuxCmdRunner {
    fn default() -> Self {
        Self::new(DEFAULT_COMMAND_TIMEOUT)
    }
}

impl LinuxCmdRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

fn spawn_error(program: &str, err: std::io::Error) -> DiskError {
    match err.kind() {
        std::io::ErrorKind::NotFound => DiskError::CommandNotFound(program.to_string()),
        _ => DiskError::Io(err),
    }
}

/// Read a child pipe to the end on its own thread.
fn drain<P: Read + Send + 'static>(pipe: Option<P>) -> JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

/// Run `cmd` to completion, capturing both streams, killing it after `timeout`.
fn run_captured(program: &str, cmd: &mut Command, timeout: Duration) -> DiskResult<Output> {
    let mut child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| spawn_error(program, e))?;

    // Both pipes drain concurrently so a chatty child cannot block on a full pipe.
    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    let Some(status) = child.wait_timeout(timeout)? else {
        let _ = child.kill();
        let _ = child.wait();
        let _ = (stdout.join(), stderr.join());
        return Err(DiskError::CommandTimeout {
            program: program.to_string(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        });
    };

    Ok(Output {
        status,
        stdout: stdout.join().unwrap_or_default(),
        stderr: stderr.join().unwrap_or_default(),
    })
}

impl CmdRunner for LinuxCmdRunner {
    fn run_command(&self, program: &str, args: &[&str]) -> DiskResult<String> {
        log::debug!("running: {} {}", program, args.join(" "));

        let mut cmd = Command::new(program);
        cmd.args(args);
        let output = run_captured(program, &mut cmd, self.timeout)?;

        if !output.status.success() {
            return Err(DiskError::CommandFailed {
                program: program.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Reads files straight from the host filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinuxFileSystem;

impl LinuxFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileOps for LinuxFileSystem {
    fn read_file_string(&self, path: &Path) -> DiskResult<String> {
        Ok(fs::read_to_string(path)?)
    }
}
