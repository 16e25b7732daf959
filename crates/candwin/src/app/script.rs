//! Line script accepted on stdin.

use std::str::SplitWhitespace;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverCommand {
    Activate {
        display_limit: i32,
        candidates: Vec<String>,
    },
    NrCandidates {
        count: i32,
        display_limit: i32,
    },
    Page {
        page: i32,
        candidates: Vec<String>,
    },
    ShowPage(i32),
    Select {
        index: i32,
        need_hilite: bool,
    },
    Show,
    Hide,
    Deactivate,
    Move {
        x: i32,
        y: i32,
    },
    Caret {
        timeout: i32,
        text: String,
    },
    CaretUpdate,
    CaretHide,
    Focus,
    Blur,
    Rescan,
    Status,
    Quit,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),
    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
    #[error("{command}: {argument} must be an integer, got {value:?}")]
    InvalidNumber {
        command: &'static str,
        argument: &'static str,
        value: String,
    },
    #[error("{command}: unexpected argument {value:?}")]
    UnexpectedArgument { command: &'static str, value: String },
}

/// Parses one script line. Blank lines and `#` comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<DriverCommand>, ScriptError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut args = Args::new(line);
    let Some(verb) = args.words.next() else {
        return Ok(None);
    };

    let command = match verb {
        "activate" => {
            args.command = "activate";
            DriverCommand::Activate {
                display_limit: args.int("display limit")?,
                candidates: args.rest(),
            }
        }
        "nr" => {
            args.command = "nr";
            let count = args.int("count")?;
            let display_limit = args.int("display limit")?;
            args.finish()?;
            DriverCommand::NrCandidates {
                count,
                display_limit,
            }
        }
        "page" => {
            args.command = "page";
            DriverCommand::Page {
                page: args.int("page")?,
                candidates: args.rest(),
            }
        }
        "show-page" => {
            args.command = "show-page";
            let page = args.int("page")?;
            args.finish()?;
            DriverCommand::ShowPage(page)
        }
        "select" => {
            args.command = "select";
            let index = args.int("index")?;
            let need_hilite = args.int("highlight flag")? != 0;
            args.finish()?;
            DriverCommand::Select { index, need_hilite }
        }
        "move" => {
            args.command = "move";
            let x = args.int("x")?;
            let y = args.int("y")?;
            args.finish()?;
            DriverCommand::Move { x, y }
        }
        "caret" => {
            args.command = "caret";
            DriverCommand::Caret {
                timeout: args.int("timeout")?,
                text: args.rest().join(" "),
            }
        }
        "show" => args.bare("show", DriverCommand::Show)?,
        "hide" => args.bare("hide", DriverCommand::Hide)?,
        "deactivate" => args.bare("deactivate", DriverCommand::Deactivate)?,
        "caret-update" => args.bare("caret-update", DriverCommand::CaretUpdate)?,
        "caret-hide" => args.bare("caret-hide", DriverCommand::CaretHide)?,
        "focus" => args.bare("focus", DriverCommand::Focus)?,
        "blur" => args.bare("blur", DriverCommand::Blur)?,
        "rescan" => args.bare("rescan", DriverCommand::Rescan)?,
        "status" => args.bare("status", DriverCommand::Status)?,
        "quit" | "exit" => DriverCommand::Quit,
        other => return Err(ScriptError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

struct Args<'a> {
    command: &'static str,
    words: SplitWhitespace<'a>,
}

impl<'a> Args<'a> {
    fn new(line: &'a str) -> Self {
        Self {
            command: "",
            words: line.split_whitespace(),
        }
    }

    fn int(&mut self, argument: &'static str) -> Result<i32, ScriptError> {
        let value = self.words.next().ok_or(ScriptError::MissingArgument {
            command: self.command,
            argument,
        })?;
        value.parse().map_err(|_| ScriptError::InvalidNumber {
            command: self.command,
            argument,
            value: value.to_string(),
        })
    }

    fn rest(&mut self) -> Vec<String> {
        self.words.by_ref().map(str::to_string).collect()
    }

    fn finish(&mut self) -> Result<(), ScriptError> {
        match self.words.next() {
            Some(value) => Err(ScriptError::UnexpectedArgument {
                command: self.command,
                value: value.to_string(),
            }),
            None => Ok(()),
        }
    }

    fn bare(
        &mut self,
        command: &'static str,
        parsed: DriverCommand,
    ) -> Result<DriverCommand, ScriptError> {
        self.command = command;
        self.finish()?;
        Ok(parsed)
    }
}
