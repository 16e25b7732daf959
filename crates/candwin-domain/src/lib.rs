#![deny(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Domain layer crate: the candidate window wire protocol.

pub mod domain;
pub use domain::*;
