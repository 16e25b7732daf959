pub mod bridge;
pub mod candidate_window;
pub mod command_resolver;
pub mod ports;

pub use bridge::Delivery;
pub use bridge::InputContextBridge;
pub use bridge::event_channel;
pub use candidate_window::CandidateWindow;
pub use candidate_window::ReadOutcome;
pub use candidate_window::SendStatus;
pub use candidate_window::SessionStatus;
pub use candidate_window::is_broken_connection;
pub use command_resolver::CommandResolver;
pub use command_resolver::CommandSource;
pub use command_resolver::DEFAULT_OVERRIDE_VAR;
pub use command_resolver::DEFAULT_PROGRAM_SYMBOL;
pub use command_resolver::ResolverSettings;
