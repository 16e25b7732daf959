//! Helper program resolution.
//!
//! Precedence, first match wins:
//! 1. the override environment variable, taken as the exact program path;
//! 2. the configuration symbol, a base name under the libexec directory;
//! 3. the compiled-in default, which may be absent.
//!
//! The answer is cached for the resolver's lifetime, including "no program".

use std::cell::OnceCell;
use std::env;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;
use tracing::info;

use crate::usecases::ports::SymbolLookupHandle;

pub const DEFAULT_OVERRIDE_VAR: &str = "UIM_CANDWIN_PROG";
pub const DEFAULT_PROGRAM_SYMBOL: &str = "uim-candwin-prog";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandSource {
    Override,
    Symbol,
    Default,
}

#[derive(Debug, Clone)]
pub struct ResolverSettings {
    override_var: String,
    program_symbol: String,
    libexec_dir: PathBuf,
    default_program: Option<PathBuf>,
}

impl ResolverSettings {
    pub fn new(libexec_dir: impl Into<PathBuf>) -> Self {
        Self {
            override_var: DEFAULT_OVERRIDE_VAR.to_string(),
            program_symbol: DEFAULT_PROGRAM_SYMBOL.to_string(),
            libexec_dir: libexec_dir.into(),
            default_program: None,
        }
    }

    pub fn with_override_var(mut self, name: impl Into<String>) -> Self {
        self.override_var = name.into();
        self
    }

    pub fn with_default_program(mut self, program: Option<PathBuf>) -> Self {
        self.default_program = program;
        self
    }

    pub fn override_var(&self) -> &str {
        &self.override_var
    }

    pub fn program_symbol(&self) -> &str {
        &self.program_symbol
    }

    pub fn libexec_dir(&self) -> &Path {
        &self.libexec_dir
    }

    pub fn default_program(&self) -> Option<&Path> {
        self.default_program.as_deref()
    }
}

pub struct CommandResolver {
    settings: ResolverSettings,
    symbols: SymbolLookupHandle,
    resolved: OnceCell<Option<(PathBuf, CommandSource)>>,
}

impl CommandResolver {
    pub fn new(settings: ResolverSettings, symbols: SymbolLookupHandle) -> Self {
        Self {
            settings,
            symbols,
            resolved: OnceCell::new(),
        }
    }

    pub fn settings(&self) -> &ResolverSettings {
        &self.settings
    }

    /// Resolves on first call and returns the cached answer afterwards.
    pub fn resolve(&self) -> Option<&Path> {
        self.resolved
            .get_or_init(|| {
                let resolved = self.lookup();
                match &resolved {
                    Some((path, source)) => info!(
                        command = %path.display(),
                        source = ?source,
                        "Resolved candidate window helper"
                    ),
                    None => info!("No candidate window helper configured"),
                }
                resolved
            })
            .as_ref()
            .map(|(path, _)| path.as_path())
    }

    pub fn source(&self) -> Option<CommandSource> {
        self.resolved
            .get()
            .and_then(|resolved| resolved.as_ref().map(|(_, source)| *source))
    }

    /// `Some(false)` once resolution ran and found nothing.
    pub fn is_resolved(&self) -> Option<bool> {
        self.resolved.get().map(Option::is_some)
    }

    /// Drops the cached answer so the next `resolve` looks again.
    pub fn forget(&mut self) {
        if self.resolved.take().is_some() {
            debug!("Discarded cached candidate window helper path");
        }
    }

    fn lookup(&self) -> Option<(PathBuf, CommandSource)> {
        if let Some(program) = non_empty(env::var(&self.settings.override_var).ok()) {
            return Some((PathBuf::from(program), CommandSource::Override));
        }

        if let Some(name) = non_empty(self.symbols.symbol_value_str(&self.settings.program_symbol))
        {
            return Some((self.settings.libexec_dir.join(name), CommandSource::Symbol));
        }

        self.settings
            .default_program
            .clone()
            .map(|path| (path, CommandSource::Default))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
