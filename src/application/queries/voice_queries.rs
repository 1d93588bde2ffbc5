//! Voice Queries

/// 列出可用音色查询
///
/// `locales` 为空时不过滤
#[derive(Debug, Clone, Default)]
pub struct ListVoices {
    pub locales: Vec<String>,
}
