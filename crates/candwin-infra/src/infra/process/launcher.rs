use std::io;
use std::io::Read;
use std::os::fd::AsRawFd;
use std::os::fd::RawFd;
use std::path::Path;
use std::process::Child;
use std::process::ChildStdout;
use std::process::Command;
use std::process::Stdio;

use tracing::debug;

use super::fd::set_non_blocking;
use crate::usecases::ports::HelperChild;
use crate::usecases::ports::HelperLauncher;
use crate::usecases::ports::HelperPipes;
use crate::usecases::ports::HelperReader;
use crate::usecases::ports::LaunchError;
use crate::usecases::ports::ReapStatus;

/// Spawns helpers with `std::process`, stdin and stdout piped and stderr
/// inherited so helper diagnostics land in the host's log.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessLauncher;

impl ProcessLauncher {
    pub fn new() -> Self {
        Self
    }
}

impl HelperLauncher for ProcessLauncher {
    fn launch(&self, command: &Path) -> Result<HelperPipes, LaunchError> {
        let mut child = Command::new(command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| LaunchError::Spawn {
                command: command.to_path_buf(),
                source,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(LaunchError::MissingPipe {
                command: command.to_path_buf(),
                stream: "stdio",
            });
        };

        debug!(command = %command.display(), pid = child.id(), "Spawned helper process");
        Ok(HelperPipes {
            child: Box::new(ProcessChild { child }),
            reader: Box::new(PipeReader { stdout }),
            writer: Box::new(stdin),
        })
    }
}

pub struct PipeReader {
    stdout: ChildStdout,
}

impl Read for PipeReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stdout.read(buf)
    }
}

impl HelperReader for PipeReader {
    fn raw_fd(&self) -> Option<RawFd> {
        Some(self.stdout.as_raw_fd())
    }

    fn set_nonblocking(&self) -> io::Result<()> {
        set_non_blocking(self.stdout.as_raw_fd())
    }
}

pub struct ProcessChild {
    child: Child,
}

impl HelperChild for ProcessChild {
    fn pid(&self) -> Option<u32> {
        Some(self.child.id())
    }

    fn try_reap(&mut self) -> io::Result<ReapStatus> {
        Ok(match self.child.try_wait()? {
            Some(status) => ReapStatus::Exited(status.code()),
            None => ReapStatus::Running,
        })
    }
}
