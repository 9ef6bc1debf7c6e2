//! Mounter driving `mount`, `umount` and `swapon` on Linux.

use super::{Mounter, RetryPolicy};
use crate::clock::{Clock, SystemClock};
use crate::config::MounterConfig;
use crate::hal::{CmdRunner, FileOps, LinuxCmdRunner, LinuxFileSystem};
use crate::procfs::{parse_mounts, parse_swaps, MountTable};
use crate::{DiskError, DiskResult};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug)]
pub struct LinuxMounter<R, F, C = SystemClock> {
    runner: R,
    fs: F,
    clock: C,
    mounts_path: PathBuf,
    retry: RetryPolicy,
}

impl LinuxMounter<LinuxCmdRunner, LinuxFileSystem> {
    /// Production mounter built entirely from `config`.
    pub fn from_config(config: &MounterConfig) -> DiskResult<Self> {
        config.validate()?;
        Ok(LinuxMounter::new(
            LinuxCmdRunner::new(config.command_timeout()),
            LinuxFileSystem::new(),
            Duration::from_millis(config.retry_interval_ms),
        )
        .with_mounts_path(&config.mounts_path)
        .with_retry_policy(config.retry_policy()))
    }
}

impl<R: CmdRunner, F: FileOps> LinuxMounter<R, F> {
    /// Mounter reading the default mount table and retrying unmounts every
    /// `unmount_retry_interval` within the default budget.
    pub fn new(runner: R, fs: F, unmount_retry_interval: Duration) -> Self {
        Self {
            runner,
            fs,
            clock: SystemClock,
            mounts_path: PathBuf::from(crate::config::DEFAULT_MOUNTS_PATH),
            retry: RetryPolicy::new(unmount_retry_interval),
        }
    }
}

impl<R: CmdRunner, F: FileOps, C: Clock> LinuxMounter<R, F, C> {
    pub fn with_clock<C2: Clock>(self, clock: C2) -> LinuxMounter<R, F, C2> {
        LinuxMounter {
            runner: self.runner,
            fs: self.fs,
            clock,
            mounts_path: self.mounts_path,
            retry: self.retry,
        }
    }

    pub fn with_mounts_path(mut self, path: impl AsRef<Path>) -> Self {
        self.mounts_path = path.as_ref().to_path_buf();
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    /// Fresh snapshot of the mount table.
    pub fn mount_table(&self) -> DiskResult<MountTable> {
        let content = self.fs.read_file_string(&self.mounts_path)?;
        let table = parse_mounts(&content);
        log::debug!(
            "read {} mount entries from {}",
            table.len(),
            self.mounts_path.display()
        );
        Ok(table)
    }

    fn run(&self, program: &str, args: &[&str]) -> DiskResult<String> {
        log::info!("{} {}", program, args.join(" "));
        self.runner.run_command(program, args)
    }
}

impl<R: CmdRunner, F: FileOps, C: Clock> Mounter for LinuxMounter<R, F, C> {
    fn mount_with_options(
        &self,
        device: &str,
        mount_point: &str,
        options: &[&str],
    ) -> DiskResult<()> {
        let table = self.mount_table()?;

        if let Some(entry) = table.find_by_device(device) {
            if entry.mount_point == mount_point {
                log::debug!("{} already mounted at {}", device, mount_point);
                return Ok(());
            }
            return Err(DiskError::DeviceMountedElsewhere {
                device: device.to_string(),
                mounted_at: entry.mount_point.clone(),
                requested: mount_point.to_string(),
            });
        }

        if let Some(entry) = table.find_by_mount_point(mount_point) {
            return Err(DiskError::MountPointInUse {
                mount_point: mount_point.to_string(),
                occupant: entry.device.clone(),
                requested: device.to_string(),
            });
        }

        let mut args = Vec::with_capacity(options.len() + 2);
        args.push(device);
        args.push(mount_point);
        args.extend_from_slice(options);
        self.run("mount", &args)?;
        Ok(())
    }

    fn unmount(&self, device_or_mount_point: &str) -> DiskResult<bool> {
        let table = self.mount_table()?;
        if table
            .find_by_device_or_mount_point(device_or_mount_point)
            .is_none()
        {
            log::debug!("{} is not mounted, nothing to unmount", device_or_mount_point);
            return Ok(false);
        }

        self.retry
            .retry(&self.clock, |_| self.run("umount", &[device_or_mount_point]))
            .map_err(|(attempts, err)| DiskError::UnmountExhausted {
                target: device_or_mount_point.to_string(),
                attempts,
                source: Box::new(err),
            })?;
        Ok(true)
    }

    fn remount_as_readonly(&self, mount_point: &str) -> DiskResult<()> {
        let device = self.device_at(mount_point)?;
        self.unmount(mount_point)?;
        self.mount_with_options(&device, mount_point, &["-o", "ro"])
    }

    fn remount(&self, from_mount_point: &str, to_mount_point: &str) -> DiskResult<()> {
        let device = self.device_at(from_mount_point)?;
        self.unmount(from_mount_point)?;
        self.mount(&device, to_mount_point)
    }

    fn swap_on(&self, device: &str) -> DiskResult<()> {
        let listing = self.run("swapon", &["-s"])?;
        if parse_swaps(&listing).contains(device) {
            log::debug!("swap already enabled on {}", device);
            return Ok(());
        }

        self.run("swapon", &[device])?;
        Ok(())
    }

    fn is_mount_point(&self, path: &str) -> DiskResult<bool> {
        Ok(self.mount_table()?.find_by_mount_point(path).is_some())
    }

    fn is_mounted(&self, device_or_mount_point: &str) -> DiskResult<bool> {
        Ok(self
            .mount_table()?
            .find_by_device_or_mount_point(device_or_mount_point)
            .is_some())
    }
}

impl<R: CmdRunner, F: FileOps, C: Clock> LinuxMounter<R, F, C> {
    fn device_at(&self, mount_point: &str) -> DiskResult<String> {
        self.mount_table()?
            .find_by_mount_point(mount_point)
            .map(|entry| entry.device.clone())
            .ok_or_else(|| DiskError::NotMounted(mount_point.to_string()))
    }
}
