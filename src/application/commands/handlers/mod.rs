//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod convert_handlers;
mod speak_handlers;
mod tag_handlers;

pub use convert_handlers::*;
pub use speak_handlers::*;
pub use tag_handlers::*;
