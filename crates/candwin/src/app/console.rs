//! Console stand-in for the input method server's input contexts.

use std::io;
use std::io::Write;
use std::sync::Arc;
use std::sync::Mutex;

use serde_json::json;
use tracing::debug;
use tracing::warn;

use crate::app::commands::OutputFormat;
use crate::common::mutex_lock_or_recover;
use crate::domain::CandidateEvent;
use crate::usecases::SessionStatus;
use crate::usecases::ports::FocusedContext;
use crate::usecases::ports::FocusedContextHandle;
use crate::usecases::ports::InputContextRegistry;

type SharedWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Line oriented output shared by the host and its input contexts.
#[derive(Clone)]
pub struct Console {
    format: OutputFormat,
    out: SharedWriter,
}

impl Console {
    pub fn new(format: OutputFormat, out: Box<dyn Write + Send>) -> Self {
        Self {
            format,
            out: Arc::new(Mutex::new(out)),
        }
    }

    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(format, Box::new(io::stdout()))
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn selected(&self, context: &str, index: i32) {
        let line = match self.format {
            OutputFormat::Text => format!("selected {} ({})", index, context),
            OutputFormat::Json => {
                let event = CandidateEvent::Selected { index };
                match serde_json::to_value(event) {
                    Ok(mut value) => {
                        value["context"] = json!(context);
                        value.to_string()
                    }
                    Err(err) => {
                        warn!(error = %err, "Failed to encode selection");
                        return;
                    }
                }
            }
        };
        self.write_line(&line);
    }

    pub fn status(&self, status: &SessionStatus) {
        let line = match self.format {
            OutputFormat::Text => status_text(status),
            OutputFormat::Json => status_json(status).to_string(),
        };
        self.write_line(&line);
    }

    pub fn notice(&self, message: &str) {
        let line = match self.format {
            OutputFormat::Text => message.to_string(),
            OutputFormat::Json => json!({ "event": "notice", "message": message }).to_string(),
        };
        self.write_line(&line);
    }

    fn write_line(&self, line: &str) {
        let mut out = mutex_lock_or_recover(&self.out);
        if let Err(err) = writeln!(out, "{}", line).and_then(|()| out.flush()) {
            warn!(error = %err, "Failed to write console output");
        }
    }
}

fn status_text(status: &SessionStatus) -> String {
    match status {
        SessionStatus::Unresolved => "status unresolved".to_string(),
        SessionStatus::Disconnected => "status disconnected".to_string(),
        SessionStatus::Inert { command } => format!("status inert {}", command.display()),
        SessionStatus::Connected {
            pid,
            command,
            started_at,
            watching,
        } => format!(
            "status connected {} pid={} since={} watching={}",
            command.display(),
            pid.map_or_else(|| "-".to_string(), |pid| pid.to_string()),
            started_at.to_rfc3339(),
            watching
        ),
    }
}

fn status_json(status: &SessionStatus) -> serde_json::Value {
    match status {
        SessionStatus::Unresolved => json!({ "event": "status", "state": "unresolved" }),
        SessionStatus::Disconnected => json!({ "event": "status", "state": "disconnected" }),
        SessionStatus::Inert { command } => json!({
            "event": "status",
            "state": "inert",
            "command": command.display().to_string(),
        }),
        SessionStatus::Connected {
            pid,
            command,
            started_at,
            watching,
        } => json!({
            "event": "status",
            "state": "connected",
            "command": command.display().to_string(),
            "pid": pid,
            "started_at": started_at,
            "watching": watching,
        }),
    }
}

/// Input context that reports selections on the console once flushed.
pub struct ConsoleContext {
    name: String,
    console: Console,
    selected: Mutex<Option<i32>>,
    engine_index: Mutex<Option<i32>>,
}

impl ConsoleContext {
    pub fn new(name: impl Into<String>, console: Console) -> Self {
        Self {
            name: name.into(),
            console,
            selected: Mutex::new(None),
            engine_index: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn selected(&self) -> Option<i32> {
        *mutex_lock_or_recover(&self.selected)
    }

    pub fn engine_index(&self) -> Option<i32> {
        *mutex_lock_or_recover(&self.engine_index)
    }
}

impl FocusedContext for ConsoleContext {
    fn candidate_select(&self, index: i32) {
        *mutex_lock_or_recover(&self.selected) = Some(index);
    }

    fn set_engine_candidate_index(&self, index: i32) {
        *mutex_lock_or_recover(&self.engine_index) = Some(index);
    }

    fn force_send_packet(&self) {
        match self.selected() {
            Some(index) => self.console.selected(&self.name, index),
            None => debug!(context = %self.name, "Flush without a selection"),
        }
    }
}

/// Registry with a single console context that can be focused or blurred.
pub struct ConsoleContexts {
    context: Arc<ConsoleContext>,
    focused: Mutex<bool>,
}

impl ConsoleContexts {
    pub fn new(context: Arc<ConsoleContext>) -> Self {
        Self {
            context,
            focused: Mutex::new(true),
        }
    }

    pub fn context(&self) -> &Arc<ConsoleContext> {
        &self.context
    }

    pub fn focus(&self) {
        *mutex_lock_or_recover(&self.focused) = true;
    }

    pub fn blur(&self) {
        *mutex_lock_or_recover(&self.focused) = false;
    }

    pub fn is_focused(&self) -> bool {
        *mutex_lock_or_recover(&self.focused)
    }
}

impl InputContextRegistry for ConsoleContexts {
    fn focused(&self) -> Option<FocusedContextHandle> {
        if !self.is_focused() {
            return None;
        }
        let context: FocusedContextHandle = self.context.clone();
        Some(context)
    }
}
