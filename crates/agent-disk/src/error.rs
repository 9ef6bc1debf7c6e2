use thiserror::Error;

pub type DiskResult<T> = std::result::Result<T, DiskError>;

/// Coarse classification callers branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskErrorKind {
    /// The requested mount is already satisfied by something else.
    Conflict,
    /// A remount source is not mounted.
    NotMounted,
    /// An external command did not succeed.
    ExecutionFailure,
    /// Reading host state failed.
    Io,
    /// Configuration could not be parsed or is out of range.
    Config,
}

#[derive(Error, Debug)]
pub enum DiskError {
    #[error("Device {device} is already mounted at {mounted_at}, refusing to mount it at {requested}")]
    DeviceMountedElsewhere {
        device: String,
        mounted_at: String,
        requested: String,
    },

    #[error("Mount point {mount_point} is already in use by {occupant}, refusing to mount {requested}")]
    MountPointInUse {
        mount_point: String,
        occupant: String,
        requested: String,
    },

    #[error("Not mounted: {0}")]
    NotMounted(String),

    #[error("Command not found: {0}")]
    CommandNotFound(String),

    #[error("Command failed: {program} (exit={code:?}): {stderr}")]
    CommandFailed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Command timed out: {program} after {timeout_ms}ms")]
    CommandTimeout { program: String, timeout_ms: u64 },

    #[error("Failed to unmount {target} after {attempts} attempt(s): {source}")]
    UnmountExhausted {
        target: String,
        attempts: u32,
        #[source]
        source: Box<DiskError>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

impl DiskError {
    pub fn kind(&self) -> DiskErrorKind {
        match self {
            DiskError::DeviceMountedElsewhere { .. } | DiskError::MountPointInUse { .. } => {
                DiskErrorKind::Conflict
            }
            DiskError::NotMounted(_) => DiskErrorKind::NotMounted,
            DiskError::CommandNotFound(_)
            | DiskError::CommandFailed { .. }
            | DiskError::CommandTimeout { .. }
            | DiskError::UnmountExhausted { .. } => DiskErrorKind::ExecutionFailure,
            DiskError::Io(_) => DiskErrorKind::Io,
            DiskError::InvalidConfig(_) | DiskError::ConfigParse(_) => DiskErrorKind::Config,
        }
    }

    pub fn is_conflict(&self) -> bool {
        self.kind() == DiskErrorKind::Conflict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_variants_share_a_kind() {
        let elsewhere = DiskError::DeviceMountedElsewhere {
            device: "/dev/foo".to_string(),
            mounted_at: "/mnt/other".to_string(),
            requested: "/mnt/foo".to_string(),
        };
        let in_use = DiskError::MountPointInUse {
            mount_point: "/mnt/foo".to_string(),
            occupant: "/dev/baz".to_string(),
            requested: "/dev/foo".to_string(),
        };
        assert!(elsewhere.is_conflict());
        assert!(in_use.is_conflict());
        assert!(!DiskError::NotMounted("/mnt/foo".to_string()).is_conflict());
    }

    #[test]
    fn unmount_exhausted_names_target_and_attempts() {
        let err = DiskError::UnmountExhausted {
            target: "/dev/xvdb2".to_string(),
            attempts: 3,
            source: Box::new(DiskError::CommandFailed {
                program: "umount".to_string(),
                code: Some(32),
                stderr: "target is busy".to_string(),
            }),
        };
        let msg = err.to_string();
        assert!(msg.contains("/dev/xvdb2"));
        assert!(msg.contains("3 attempt(s)"));
        assert!(msg.contains("target is busy"));
        assert_eq!(err.kind(), DiskErrorKind::ExecutionFailure);
    }
}
