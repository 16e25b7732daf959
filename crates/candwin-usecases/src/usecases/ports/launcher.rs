//! Helper process launcher port.

use std::io;
use std::io::Read;
use std::io::Write;
use std::os::fd::RawFd;
use std::path::Path;
use std::sync::Arc;

use super::errors::LaunchError;

/// Read side of the pipe pair, connected to the helper's stdout.
pub trait HelperReader: Read + Send {
    fn raw_fd(&self) -> Option<RawFd>;
    fn set_nonblocking(&self) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReapStatus {
    Running,
    Exited(Option<i32>),
}

pub trait HelperChild: Send {
    fn pid(&self) -> Option<u32>;
    /// Collects the exit status without blocking.
    fn try_reap(&mut self) -> io::Result<ReapStatus>;
}

pub struct HelperPipes {
    pub child: Box<dyn HelperChild>,
    pub reader: Box<dyn HelperReader>,
    pub writer: Box<dyn Write + Send>,
}

pub trait HelperLauncher: Send + Sync {
    /// Starts `command` with its stdin and stdout connected to fresh pipes.
    /// No arguments are passed.
    fn launch(&self, command: &Path) -> Result<HelperPipes, LaunchError>;
}

pub type LauncherHandle = Arc<dyn HelperLauncher>;
