pub mod quake;
pub mod coords;
pub mod severity;
pub mod events;

// Re-exports for convenience
pub use quake::*;
pub use coords::*;
pub use severity::*;
pub use events::*;
