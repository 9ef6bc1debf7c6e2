//! Mount reconciliation.

pub mod linux_mounter;
pub mod retry;

pub use linux_mounter::LinuxMounter;
pub use retry::RetryPolicy;

use crate::DiskResult;

/// Idempotent mount management against the live mount table.
///
/// Every method re-reads host state before acting; nothing is cached between
/// calls.
pub trait Mounter {
    /// Mount `device` at `mount_point`.
    ///
    /// A no-op when that exact pairing is already mounted. Fails with a
    /// conflict, issuing nothing, when the device is mounted elsewhere or
    /// another device occupies the mount point.
    fn mount(&self, device: &str, mount_point: &str) -> DiskResult<()> {
        self.mount_with_options(device, mount_point, &[])
    }

    /// Like [`Mounter::mount`], appending `options` verbatim to the command.
    fn mount_with_options(
        &self,
        device: &str,
        mount_point: &str,
        options: &[&str],
    ) -> DiskResult<()>;

    /// Unmount by device path or mount point.
    ///
    /// Returns `Ok(false)` without running anything when nothing matches.
    fn unmount(&self, device_or_mount_point: &str) -> DiskResult<bool>;

    /// Unmount `mount_point` and mount the same device there read-only.
    fn remount_as_readonly(&self, mount_point: &str) -> DiskResult<()>;

    /// Move the device mounted at `from_mount_point` to `to_mount_point`.
    fn remount(&self, from_mount_point: &str, to_mount_point: &str) -> DiskResult<()>;

    /// Enable swap on `device` unless it is already active.
    fn swap_on(&self, device: &str) -> DiskResult<()>;

    fn is_mount_point(&self, path: &str) -> DiskResult<bool>;

    /// True when `device_or_mount_point` matches either column of any entry.
    fn is_mounted(&self, device_or_mount_point: &str) -> DiskResult<bool>;
}
