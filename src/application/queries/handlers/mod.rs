//! Query Handlers 实现

mod book_handlers;
mod voice_handlers;

pub use book_handlers::*;
pub use voice_handlers::*;
