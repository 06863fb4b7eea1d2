//! In-memory storage implementations
//!
//! Suitable for development and testing; records do not survive a restart.

mod clients;

pub use clients::MemoryClientStorage;
