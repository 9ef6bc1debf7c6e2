//! Parsers for the text state the kernel and `swapon` expose.

pub mod mounts;
pub mod swaps;

pub use mounts::{parse_mounts, MountEntry, MountTable};
pub use swaps::{parse_swaps, SwapSet};
