//! Infrastructure Adapters
//!
//! 六边形架构的适配器实现

pub mod epub;
pub mod storage;
pub mod tagging;
pub mod tts;

pub use self::epub::*;
pub use storage::*;
pub use tagging::*;
pub use tts::*;
