//! Text pseudo-file access (read-only).

use crate::DiskResult;
use std::path::Path;

pub trait FileOps {
    /// Current contents of `path` as UTF-8 text.
    fn read_file_string(&self, path: &Path) -> DiskResult<String>;
}

impl<T: FileOps + ?Sized> FileOps for &T {
    fn read_file_string(&self, path: &Path) -> DiskResult<String> {
        (**self).read_file_string(path)
    }
}
