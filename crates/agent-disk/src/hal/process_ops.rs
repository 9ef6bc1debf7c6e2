//! Process execution.

use crate::DiskResult;

/// External command runner.
pub trait CmdRunner {
    /// Run `program` with `args` and return its captured stdout.
    ///
    /// A non-zero exit status is an error; stdout of failed runs is discarded.
    fn run_command(&self, program: &str, args: &[&str]) -> DiskResult<String>;
}

impl<T: CmdRunner + ?Sized> CmdRunner for &T {
    fn run_command(&self, program: &str, args: &[&str]) -> DiskResult<String> {
        (**self).run_command(program, args)
    }
}
