#![deny(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

//! Application composition for the `candwin-bridge` debug host.

pub mod app;
pub use app::*;

pub mod common {
    pub use candwin_common::common::*;
}

pub mod domain {
    pub use candwin_domain::domain::*;
}

pub mod usecases {
    pub use candwin_usecases::usecases::*;
}

pub mod infra {
    pub use candwin_infra::infra::*;
}
