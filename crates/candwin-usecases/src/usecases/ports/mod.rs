//! Port interfaces owned by use cases.

pub mod errors;
pub mod input_context;
pub mod launcher;
pub mod notifier;
pub mod symbols;
#[cfg(test)]
pub mod test_support;

pub use errors::LaunchError;
pub use errors::NotifierError;
pub use input_context::FocusedContext;
pub use input_context::FocusedContextHandle;
pub use input_context::InputContextRegistry;
pub use launcher::HelperChild;
pub use launcher::HelperLauncher;
pub use launcher::HelperPipes;
pub use launcher::HelperReader;
pub use launcher::LauncherHandle;
pub use launcher::ReapStatus;
pub use notifier::NotifierHandle;
pub use notifier::Readiness;
pub use notifier::ReadinessNotifier;
pub use notifier::WatchCallback;
pub use symbols::SymbolLookup;
pub use symbols::SymbolLookupHandle;
