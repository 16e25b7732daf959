//! Helper process spawning.

mod fd;
mod launcher;

pub use fd::set_non_blocking;
pub use launcher::PipeReader;
pub use launcher::ProcessChild;
pub use launcher::ProcessLauncher;
