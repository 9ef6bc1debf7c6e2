//! Disk mount manager for the host agent.
//!
//! Makes mount, unmount, remount and swap operations idempotent and
//! retry-safe against the live mount table. All host interaction goes through
//! the [`hal`] traits; [`LinuxMounter`] holds the decision logic.

pub mod clock;
pub mod config;
pub mod error;
pub mod guards;
pub mod hal;
pub mod logging;
pub mod mounter;
pub mod procfs;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::MounterConfig;
pub use error::{DiskError, DiskErrorKind, DiskResult};
pub use guards::MountGuard;
pub use hal::{
    CmdRunner, FakeCmdResult, FakeCmdRunner, FakeFileSystem, FileOps, LinuxCmdRunner,
    LinuxFileSystem,
};
pub use mounter::{LinuxMounter, Mounter, RetryPolicy};
pub use procfs::{parse_mounts, parse_swaps, MountEntry, MountTable, SwapSet};
