//! Proteus probe registry library crate.
//!
//! Registers measurement probes, authenticates them by password, and
//! authorizes metadata updates with short-lived bearer tokens.

pub mod config;
pub mod errors;
pub mod http;
pub mod registry;
pub mod storage;
