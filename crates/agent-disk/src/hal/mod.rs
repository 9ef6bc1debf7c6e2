//! OS boundary: external commands and text pseudo-files.
//!
//! Everything that touches the host goes through these traits so the mounter
//! can be exercised with the fakes instead of real processes.

pub mod fake_hal;
pub mod file_ops;
pub mod linux_hal;
pub mod process_ops;

pub use fake_hal::{FakeCmdResult, FakeCmdRunner, FakeFileSystem};
pub use file_ops::FileOps;
pub use linux_hal::{LinuxCmdRunner, LinuxFileSystem};
pub use process_ops::CmdRunner;
