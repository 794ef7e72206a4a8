pub mod feed;
pub mod persistence;
pub mod time;

// Re-exports
pub use feed::*;
pub use persistence::*;
pub use time::*;
