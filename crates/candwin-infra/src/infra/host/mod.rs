//! Host event loop the bridge registers its helper descriptor with.

mod poll_loop;

pub use poll_loop::PollLoop;
