//! Library interface for the barkeep CLI
//!
//! Wiring and report rendering live here so they can be tested without
//! spawning the binary.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod app;
pub mod report;

pub use anyhow::Result;
pub use app::App;
pub use barkeep_core::config::Config;
