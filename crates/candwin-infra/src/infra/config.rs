//! Bridge configuration.

use std::env;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::usecases::ResolverSettings;

const COMPILED_LIBEXEC_DIR: &str = match option_env!("CANDWIN_LIBEXECDIR") {
    Some(dir) => dir,
    None => "/usr/local/libexec",
};
/// Unset when no default toolkit was chosen at build time.
const COMPILED_DEFAULT_PROGRAM: Option<&str> = option_env!("CANDWIN_DEFAULT_PROG");
const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

pub const LIBEXEC_DIR_ENV: &str = "CANDWIN_LIBEXECDIR";
pub const POLL_INTERVAL_ENV: &str = "CANDWIN_POLL_INTERVAL_MS";

#[derive(Debug, Clone)]
pub struct BridgeConfig {
    libexec_dir: PathBuf,
    default_program: Option<PathBuf>,
    override_var: Option<String>,
    poll_interval: Duration,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl BridgeConfig {
    pub fn from_env() -> Self {
        let libexec_dir = env::var(LIBEXEC_DIR_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| COMPILED_LIBEXEC_DIR.to_string());

        Self {
            libexec_dir: PathBuf::from(libexec_dir),
            default_program: COMPILED_DEFAULT_PROGRAM.map(PathBuf::from),
            override_var: None,
            poll_interval: Duration::from_millis(parse_env_u64(
                POLL_INTERVAL_ENV,
                DEFAULT_POLL_INTERVAL_MS,
            )),
        }
    }

    pub fn libexec_dir(&self) -> &Path {
        &self.libexec_dir
    }

    pub fn default_program(&self) -> Option<&Path> {
        self.default_program.as_deref()
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    pub fn with_libexec_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.libexec_dir = dir.into();
        self
    }

    pub fn with_default_program(mut self, program: Option<PathBuf>) -> Self {
        self.default_program = program;
        self
    }

    /// Replaces the environment variable consulted for the program override.
    pub fn with_override_var(mut self, name: impl Into<String>) -> Self {
        self.override_var = Some(name.into());
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn resolver_settings(&self) -> ResolverSettings {
        let settings = ResolverSettings::new(self.libexec_dir.clone())
            .with_default_program(self.default_program.clone());
        match &self.override_var {
            Some(name) => settings.with_override_var(name.clone()),
            None => settings,
        }
    }
}

fn parse_env_u64(key: &str, default: u64) -> u64 {
    let value = match env::var(key) {
        Ok(value) => value,
        Err(_) => return default,
    };
    if value.trim().is_empty() {
        return default;
    }
    match value.parse::<u64>() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(value = %value, key, "Invalid numeric config; using default");
            default
        }
    }
}
