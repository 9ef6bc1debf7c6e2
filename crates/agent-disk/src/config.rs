//! Mounter configuration.
//!
//! Loaded from TOML; every key is optional.
//!
//! ```toml
//! mounts_path = "/proc/mounts"
//! retry_interval_ms = 1000
//! max_retry_window_secs = 600
//! max_unmount_attempts = 600
//! command_timeout_secs = 300
//! ```

use crate::mounter::RetryPolicy;
use crate::{DiskError, DiskResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MOUNTS_PATH: &str = "/proc/mounts";
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);
pub const DEFAULT_MAX_RETRY_WINDOW: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_MAX_UNMOUNT_ATTEMPTS: u32 = 600;
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MounterConfig {
    /// Pseudo-file describing current mounts.
    pub mounts_path: PathBuf,
    /// Pause between failed unmount attempts.
    pub retry_interval_ms: u64,
    /// Stop retrying once this much time has passed since the first attempt.
    pub max_retry_window_secs: u64,
    /// Hard cap on unmount attempts, independent of the window.
    pub max_unmount_attempts: u32,
    /// Upper bound on any single external command.
    pub command_timeout_secs: u64,
}

impl Default for MounterConfig {
    fn default() -> Self {
        Self {
            mounts_path: PathBuf::from(DEFAULT_MOUNTS_PATH),
            retry_interval_ms: DEFAULT_RETRY_INTERVAL.as_millis() as u64,
            max_retry_window_secs: DEFAULT_MAX_RETRY_WINDOW.as_secs(),
            max_unmount_attempts: DEFAULT_MAX_UNMOUNT_ATTEMPTS,
            command_timeout_secs: DEFAULT_COMMAND_TIMEOUT.as_secs(),
        }
    }
}

impl MounterConfig {
    pub fn from_toml_str(toml_text: &str) -> DiskResult<Self> {
        let cfg: MounterConfig = toml::from_str(toml_text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> DiskResult<Self> {
        let content = std::fs::read_to_string(path)?;
        log::debug!("loading mounter config from {}", path.display());
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> DiskResult<()> {
        if self.max_unmount_attempts == 0 {
            return Err(DiskError::InvalidConfig(
                "max_unmount_attempts must be at least 1".to_string(),
            ));
        }
        if self.command_timeout_secs == 0 {
            return Err(DiskError::InvalidConfig(
                "command_timeout_secs must be greater than 0".to_string(),
            ));
        }
        if self.mounts_path.as_os_str().is_empty() {
            return Err(DiskError::InvalidConfig(
                "mounts_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(Duration::from_millis(self.retry_interval_ms))
            .max_window(Duration::from_secs(self.max_retry_window_secs))
            .max_attempts(self.max_unmount_attempts)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}
