use crate::Mounter;

/// RAII guard that unmounts a device or mount point when dropped.
#[derive(Debug)]
pub struct MountGuard<'a, M: Mounter + ?Sized> {
    mounter: &'a M,
    target: String,
    active: bool,
}

impl<'a, M: Mounter + ?Sized> MountGuard<'a, M> {
    pub fn new(mounter: &'a M, target: impl Into<String>) -> Self {
        Self {
            mounter,
            target: target.into(),
            active: true,
        }
    }

    /// Mount `device` at `mount_point` and guard the mount point.
    ///
    /// When that pairing was already mounted the guard comes back disarmed:
    /// it only ever undoes a mount it made.
    pub fn mount(mounter: &'a M, device: &str, mount_point: &str) -> crate::DiskResult<Self> {
        let pre_existing = mounter.is_mount_point(mount_point)?;
        mounter.mount(device, mount_point)?;

        let mut guard = Self::new(mounter, mount_point);
        if pre_existing {
            log::debug!("{} was already mounted at {}, not guarding", device, mount_point);
            guard.active = false;
        }
        Ok(guard)
    }

    /// Whether dropping the guard will unmount.
    pub fn is_armed(&self) -> bool {
        self.active
    }

    /// Prevent automatic unmounting and return the target.
    pub fn release(mut self) -> String {
        self.active = false;
        std::mem::take(&mut self.target)
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

impl<'a, M: Mounter + ?Sized> Drop for MountGuard<'a, M> {
    fn drop(&mut self) {
        if !self.active {
            return;
        }
        if let Err(err) = self.mounter.unmount(&self.target) {
            log::warn!("mount guard failed to unmount {}: {}", self.target, err);
        }
    }
}
