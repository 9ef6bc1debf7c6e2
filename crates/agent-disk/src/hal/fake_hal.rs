//! Fake HAL implementations for testing.
//!
//! These record every command without executing anything, allowing
//! CI-safe testing of mount decisions without root or real block devices.

use super::{CmdRunner, FileOps};
use crate::{DiskError, DiskResult};
use std::collections::{HashMap, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Canned outcome for one command line.
#[derive(Debug, Clone, Default)]
pub struct FakeCmdResult {
    pub stdout: String,
    /// When set, the command fails with this message as stderr.
    pub error: Option<String>,
    /// Sticky results are never consumed and answer every later call.
    pub sticky: bool,
}

impl FakeCmdResult {
    pub fn stdout(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            ..Self::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn sticky(mut self) -> Self {
        self.sticky = true;
        self
    }
}

#[derive(Debug, Default)]
struct FakeCmdRunnerState {
    /// Every command issued, program first.
    run_commands: Vec<Vec<String>>,
    /// Queued results keyed by the space-joined command line.
    results: HashMap<String, VecDeque<FakeCmdResult>>,
}

/// Command runner that records calls and replays queued results.
///
/// Commands without a queued result succeed with empty stdout.
#[derive(Debug, Clone, Default)]
pub struct FakeCmdRunner {
    state: Arc<Mutex<FakeCmdRunnerState>>,
}

impl FakeCmdRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a result for `command_line` (e.g. `"umount /dev/xvdb2"`).
    pub fn add_cmd_result(&self, command_line: &str, result: FakeCmdResult) {
        self.lock()
            .results
            .entry(command_line.to_string())
            .or_default()
            .push_back(result);
    }

    /// All recorded commands, program first.
    pub fn run_commands(&self) -> Vec<Vec<String>> {
        self.lock().run_commands.clone()
    }

    pub fn command_count(&self) -> usize {
        self.lock().run_commands.len()
    }

    pub fn clear(&self) {
        let mut state = self.lock();
        state.run_commands.clear();
        state.results.clear();
    }

    fn lock(&self) -> MutexGuard<'_, FakeCmdRunnerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_result(state: &mut FakeCmdRunnerState, key: &str) -> FakeCmdResult {
        let Some(queue) = state.results.get_mut(key) else {
            return FakeCmdResult::default();
        };
        if queue.front().is_some_and(|r| r.sticky) {
            return queue.front().cloned().unwrap_or_default();
        }
        queue.pop_front().unwrap_or_default()
    }
}

impl CmdRunner for FakeCmdRunner {
    fn run_command(&self, program: &str, args: &[&str]) -> DiskResult<String> {
        let mut line = Vec::with_capacity(args.len() + 1);
        line.push(program.to_string());
        line.extend(args.iter().map(|a| a.to_string()));
        let key = line.join(" ");

        log::info!("FAKE HAL: {}", key);

        let mut state = self.lock();
        state.run_commands.push(line);
        let result = Self::next_result(&mut state, &key);

        match result.error {
            Some(stderr) => Err(DiskError::CommandFailed {
                program: program.to_string(),
                code: Some(1),
                stderr,
            }),
            None => Ok(result.stdout),
        }
    }
}

#[derive(Debug, Default)]
struct FakeFileSystemState {
    /// Contents handed out one read at a time; the last one is repeated.
    files: HashMap<PathBuf, VecDeque<String>>,
    reads: Vec<PathBuf>,
}

/// In-memory file source.
///
/// A path written with [`FakeFileSystem::write_file_sequence`] yields a
/// different snapshot on every read, modelling a mount table that changes
/// underneath the caller.
#[derive(Debug, Clone, Default)]
pub struct FakeFileSystem {
    state: Arc<Mutex<FakeFileSystemState>>,
}

impl FakeFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_file_string(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        self.write_file_sequence(path, [content.into()]);
    }

    pub fn write_file_sequence<I, S>(&self, path: impl Into<PathBuf>, contents: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queue = contents.into_iter().map(Into::into).collect();
        self.lock().files.insert(path.into(), queue);
    }

    /// Paths read so far, in order.
    pub fn reads(&self) -> Vec<PathBuf> {
        self.lock().reads.clone()
    }

    fn lock(&self) -> MutexGuard<'_, FakeFileSystemState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl FileOps for FakeFileSystem {
    fn read_file_string(&self, path: &Path) -> DiskResult<String> {
        let mut state = self.lock();
        state.reads.push(path.to_path_buf());

        let not_found = || {
            DiskError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("fake file not found: {}", path.display()),
            ))
        };
        let queue = state.files.get_mut(path).ok_or_else(not_found)?;
        if queue.len() > 1 {
            return queue.pop_front().ok_or_else(not_found);
        }
        queue.front().cloned().ok_or_else(not_found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fake_runner_records_commands() {
        let runner = FakeCmdRunner::new();

        runner.run_command("mount", &["/dev/foo", "/mnt/foo"]).unwrap();
        runner.run_command("swapon", &["-s"]).unwrap();

        assert_eq!(runner.command_count(), 2);
        assert_eq!(
            runner.run_commands(),
            vec![
                vec!["mount".to_string(), "/dev/foo".to_string(), "/mnt/foo".to_string()],
                vec!["swapon".to_string(), "-s".to_string()],
            ]
        );
    }

    #[test]
    fn fake_runner_consumes_queued_results_in_order() {
        let runner = FakeCmdRunner::new();
        runner.add_cmd_result("umount /mnt/a", FakeCmdResult::error("busy"));
        runner.add_cmd_result("umount /mnt/a", FakeCmdResult::stdout("done"));

        assert!(runner.run_command("umount", &["/mnt/a"]).is_err());
        assert_eq!(runner.run_command("umount", &["/mnt/a"]).unwrap(), "done");
        // Queue drained: default success.
        assert_eq!(runner.run_command("umount", &["/mnt/a"]).unwrap(), "");
    }

    #[test]
    fn fake_runner_sticky_result_repeats() {
        let runner = FakeCmdRunner::new();
        runner.add_cmd_result("umount /mnt/a", FakeCmdResult::error("busy").sticky());

        for _ in 0..5 {
            let err = runner.run_command("umount", &["/mnt/a"]).unwrap_err();
            assert!(matches!(err, DiskError::CommandFailed { ref stderr, .. } if stderr == "busy"));
        }
        assert_eq!(runner.command_count(), 5);
    }

    #[test]
    fn fake_runner_can_clear() {
        let runner = FakeCmdRunner::new();
        runner.add_cmd_result("swapon -s", FakeCmdResult::error("nope").sticky());
        runner.run_command("swapon", &["-s"]).unwrap_err();

        runner.clear();

        assert_eq!(runner.command_count(), 0);
        assert!(runner.run_command("swapon", &["-s"]).is_ok());
    }

    #[test]
    fn fake_fs_sequence_advances_then_repeats_last() {
        let fs = FakeFileSystem::new();
        fs.write_file_sequence("/proc/mounts", ["first", "second"]);

        let path = Path::new("/proc/mounts");
        assert_eq!(fs.read_file_string(path).unwrap(), "first");
        assert_eq!(fs.read_file_string(path).unwrap(), "second");
        assert_eq!(fs.read_file_string(path).unwrap(), "second");
        assert_eq!(fs.reads().len(), 3);
    }

    #[test]
    fn fake_fs_missing_path_is_io_error() {
        let fs = FakeFileSystem::new();
        let err = fs.read_file_string(Path::new("/proc/mounts")).unwrap_err();
        assert!(matches!(err, DiskError::Io(_)));
    }
}
