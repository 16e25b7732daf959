//! Outbound command catalog.
//!
//! Every frame is a verb line, zero or more payload lines and a blank
//! terminator line. Payload strings are written as-is; there is no escaping.

use std::fmt::Display;

use super::batch::CandidateBatch;

/// Declares the encoding of text-carrying frames.
pub const CHARSET_FIELD: &str = "charset=UTF-8";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateCommand<'a> {
    Activate(&'a CandidateBatch),
    SetNrCandidates { count: i32, display_limit: i32 },
    SetPageCandidates { page: i32, candidates: &'a [String] },
    ShowPage { page: i32 },
    Select { index: i32, need_hilite: bool },
    Deactivate,
    Show,
    Hide,
    Move { x: i32, y: i32 },
    ShowCaretState { text: &'a str, timeout: i32 },
    UpdateCaretState,
    HideCaretState,
}

impl CandidateCommand<'_> {
    pub fn verb(&self) -> &'static str {
        match self {
            CandidateCommand::Activate(_) => "activate",
            CandidateCommand::SetNrCandidates { .. } => "set_nr_candidates",
            CandidateCommand::SetPageCandidates { .. } => "set_page_candidates",
            CandidateCommand::ShowPage { .. } => "show_page",
            CandidateCommand::Select { .. } => "select",
            CandidateCommand::Deactivate => "deactivate",
            CandidateCommand::Show => "show",
            CandidateCommand::Hide => "hide",
            CandidateCommand::Move { .. } => "move",
            CandidateCommand::ShowCaretState { .. } => "show_caret_state",
            CandidateCommand::UpdateCaretState => "update_caret_state",
            CandidateCommand::HideCaretState => "hide_caret_state",
        }
    }

    /// Serializes the complete frame, blank terminator included.
    pub fn encode(&self) -> String {
        let mut frame = Frame::new(self.verb());
        match self {
            CandidateCommand::Activate(batch) => {
                frame.line(CHARSET_FIELD);
                frame.line(format_args!("display_limit={}", batch.display_limit()));
                frame.lines(batch.candidates());
            }
            CandidateCommand::SetNrCandidates {
                count,
                display_limit,
            } => {
                frame.line(count);
                frame.line(display_limit);
            }
            // Deployed helpers read the charset field before the page field.
            CandidateCommand::SetPageCandidates { page, candidates } => {
                frame.line(CHARSET_FIELD);
                frame.line(format_args!("page={}", page));
                frame.lines(candidates);
            }
            CandidateCommand::ShowPage { page } => frame.line(page),
            CandidateCommand::Select { index, need_hilite } => {
                frame.line(index);
                frame.line(u8::from(*need_hilite));
            }
            CandidateCommand::Move { x, y } => {
                frame.line(x);
                frame.line(y);
            }
            CandidateCommand::ShowCaretState { text, timeout } => {
                frame.line(timeout);
                frame.line(text);
            }
            CandidateCommand::Deactivate
            | CandidateCommand::Show
            | CandidateCommand::Hide
            | CandidateCommand::UpdateCaretState
            | CandidateCommand::HideCaretState => {}
        }
        frame.finish()
    }
}

struct Frame {
    buf: String,
}

impl Frame {
    fn new(verb: &str) -> Self {
        let mut buf = String::with_capacity(64);
        buf.push_str(verb);
        buf.push('\n');
        Self { buf }
    }

    fn line(&mut self, value: impl Display) {
        use std::fmt::Write;
        // Writing into a String cannot fail.
        let _ = writeln!(self.buf, "{}", value);
    }

    fn lines(&mut self, values: &[String]) {
        for value in values {
            self.buf.push_str(value);
            self.buf.push('\n');
        }
    }

    fn finish(mut self) -> String {
        self.buf.push('\n');
        self.buf
    }
}
