pub mod commands;
pub mod session;
pub mod render;
pub mod queries;

pub use commands::*;
pub use session::*;
pub use render::*;
pub use queries::*;
