//! Inbound events written by the helper on its stdout.
//!
//! A chunk is one read of at most [`READ_CHUNK_SIZE`] - 1 bytes and is assumed
//! to hold exactly one frame. There is no reassembly across reads.

use std::borrow::Cow;

use serde::Serialize;

pub const READ_CHUNK_SIZE: usize = 1024;
pub const ERROR_SENTINEL: &str = "err";
pub const INDEX_VERB: &str = "index";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// The helper asked to be shut down.
    PeerError,
    /// The user picked candidate `index` in the window.
    Index(i32),
    /// Any other verb. Ignored by the bridge.
    Unrecognized(String),
}

/// Event forwarded to the input context subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CandidateEvent {
    Selected { index: i32 },
}

/// Chunks are C strings on the helper side: anything after a NUL is dropped.
pub fn decode_chunk(bytes: &[u8]) -> Cow<'_, str> {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end])
}

pub fn parse_chunk(chunk: &str) -> InboundEvent {
    if chunk == ERROR_SENTINEL {
        return InboundEvent::PeerError;
    }

    let mut lines = chunk.split('\n');
    let verb = lines.next().unwrap_or_default();
    if verb == INDEX_VERB {
        let payload = lines.next().unwrap_or_default();
        return InboundEvent::Index(parse_lenient_int(payload));
    }

    InboundEvent::Unrecognized(verb.to_string())
}

/// Reads a leading decimal integer the way `%d` scanning does.
///
/// Leading ASCII whitespace and one sign are accepted and trailing bytes are
/// ignored. A payload with no digits, or one that overflows `i32`, yields 0.
pub fn parse_lenient_int(line: &str) -> i32 {
    let trimmed = line.trim_start_matches(|c: char| c.is_ascii_whitespace());
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits_end = rest
        .as_bytes()
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(rest.len());
    if digits_end == 0 {
        return 0;
    }

    let digits = &rest[..digits_end];
    let parsed = if negative {
        format!("-{}", digits).parse::<i32>()
    } else {
        digits.parse::<i32>()
    };
    parsed.unwrap_or(0)
}
