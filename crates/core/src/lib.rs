//! gempa-core - Pure domain logic with no external dependencies
//!
//! This crate contains the feed record types, the refresh-cycle logic
//! (coordinate parsing, change detection, severity encoding, render
//! descriptions) and the ports (interfaces) for gempa-watch. It has no
//! dependencies on terminal UI, HTTP or filesystem code - those are
//! handled by adapters.

pub mod domain;
pub mod ports;
pub mod app;
pub mod error;

// Re-exports for ergonomics
pub use domain::*;
pub use error::*;
