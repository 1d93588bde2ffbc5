//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::book::TitlePolicy;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// TTS 引擎配置
    #[serde(default)]
    pub tts: TtsConfig,

    /// 章节转换配置
    #[serde(default)]
    pub conversion: ConversionConfig,

    /// 音色列表配置
    #[serde(default)]
    pub voices: VoicesConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// TTS 引擎配置
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// TTS 服务基础 URL
    #[serde(default = "default_tts_url")]
    pub url: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_tts_timeout")]
    pub timeout_secs: u64,

    /// 最大重试次数
    #[serde(default)]
    pub max_retries: u32,

    /// 默认音色
    #[serde(default = "default_voice")]
    pub voice: String,

    /// 音高调整，如 `-10Hz`
    #[serde(default)]
    pub pitch: Option<String>,

    /// 设置后不调用 TTS 服务，所有合成都返回该文件内容
    #[serde(default)]
    pub fake_audio: Option<PathBuf>,
}

fn default_tts_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_tts_timeout() -> u64 {
    120
}

fn default_voice() -> String {
    "en-US-BrianNeural".to_string()
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            url: default_tts_url(),
            timeout_secs: default_tts_timeout(),
            max_retries: 0,
            voice: default_voice(),
            pitch: None,
            fake_audio: None,
        }
    }
}

/// 章节转换配置
#[derive(Debug, Clone, Deserialize)]
pub struct ConversionConfig {
    /// 输出目录
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// 同时进行的合成任务数
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    #[serde(default)]
    pub title_policy: TitlePolicy,

    /// 需要跳过的章节标题
    #[serde(default)]
    pub fluff_titles: Vec<String>,

    /// 已存在的输出文件不再合成
    #[serde(default)]
    pub skip_existing: bool,

    /// 合成后写入 ID3 标签
    #[serde(default = "default_tag_audio")]
    pub tag_audio: bool,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_max_concurrent() -> usize {
    10
}

fn default_tag_audio() -> bool {
    true
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            max_concurrent: default_max_concurrent(),
            title_policy: TitlePolicy::default(),
            fluff_titles: Vec::new(),
            skip_existing: false,
            tag_audio: default_tag_audio(),
        }
    }
}

/// 音色列表配置
#[derive(Debug, Clone, Deserialize)]
pub struct VoicesConfig {
    /// 只列出这些语言区域的音色，为空则全部列出
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,
}

fn default_locales() -> Vec<String> {
    vec!["en-US".to_string(), "en-GB".to_string(), "pl-PL".to_string()]
}

impl Default for VoicesConfig {
    fn default() -> Self {
        Self {
            locales: default_locales(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否使用 JSON 格式
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
