//! gempa-watch application library
//!
//! Adapters, the monitor service and the terminal UI, exposed for testing.

pub mod adapters;
pub mod cli;
pub mod runtime;
pub mod services;
pub mod tui;
