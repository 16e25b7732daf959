//! Errors raised by the infrastructure behind the ports.
//!
//! None of these reach the input method server: the candidate window logs
//! them and falls back to an inert or disconnected session.

use std::io;
use std::os::fd::RawFd;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Failed to spawn candidate window helper {}: {source}", .command.display())]
    Spawn {
        command: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Candidate window helper {} started without a {stream} pipe", .command.display())]
    MissingPipe {
        command: PathBuf,
        stream: &'static str,
    },
}

impl LaunchError {
    pub fn suggestion(&self) -> String {
        match self {
            LaunchError::Spawn { source, .. } => match source.kind() {
                io::ErrorKind::NotFound => {
                    "Helper program not found. Check UIM_CANDWIN_PROG or the uim-candwin-prog setting."
                        .to_string()
                }
                io::ErrorKind::PermissionDenied => {
                    "Permission denied. Check that the helper program is executable.".to_string()
                }
                _ => "Helper spawn failed. Candidate window stays disabled until the next attempt."
                    .to_string(),
            },
            LaunchError::MissingPipe { .. } => {
                "The helper was started without its pipes. This is a launcher bug.".to_string()
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(RawFd),
    #[error("Descriptor {0} is already watched")]
    AlreadyWatched(RawFd),
    #[error("Readiness poll failed: {0}")]
    Poll(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_not_found_suggestion() {
        let err = LaunchError::Spawn {
            command: PathBuf::from("/nope/candwin"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.suggestion().contains("not found"));
        assert!(err.to_string().contains("/nope/candwin"));
    }

    #[test]
    fn test_spawn_permission_suggestion() {
        let err = LaunchError::Spawn {
            command: PathBuf::from("/tmp/helper"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(err.suggestion().contains("Permission"));
    }

    #[test]
    fn test_missing_pipe_message() {
        let err = LaunchError::MissingPipe {
            command: PathBuf::from("/tmp/helper"),
            stream: "stdout",
        };
        assert_eq!(
            err.to_string(),
            "Candidate window helper /tmp/helper started without a stdout pipe"
        );
    }
}
