mod sync;
mod telemetry;

pub use sync::mutex_lock_or_recover;
pub use telemetry::TelemetryGuard;
pub use telemetry::init_tracing;
pub use telemetry::log_file_path_from_env;
