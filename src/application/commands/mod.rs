//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod convert_commands;
mod speak_commands;
mod tag_commands;

pub mod handlers;

pub use convert_commands::*;
pub use speak_commands::*;
pub use tag_commands::*;
