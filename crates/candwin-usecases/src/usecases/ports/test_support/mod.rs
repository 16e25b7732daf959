//! Test-only mocks for use case ports.
#![allow(clippy::unwrap_used, clippy::expect_used)]

mod mock_contexts;
mod mock_launcher;
mod mock_notifier;
mod mock_symbols;

pub use mock_contexts::ContextCall;
pub use mock_contexts::MockContext;
pub use mock_contexts::MockContexts;
pub use mock_launcher::MockChild;
pub use mock_launcher::MockLauncher;
pub use mock_launcher::MockSessionIo;
pub use mock_launcher::ReadScript;
pub use mock_launcher::SharedBuffer;
pub use mock_notifier::MockNotifier;
pub use mock_symbols::MockSymbols;
