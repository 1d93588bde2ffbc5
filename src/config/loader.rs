//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（audiobooker.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["audiobooker", "audiobooker.local"];

/// 环境变量前缀
const ENV_PREFIX: &str = "AUDIOBOOKER";

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `AUDIOBOOKER_`，层级分隔符 `__`）
/// 2. 配置文件（audiobooker.toml 或 audiobooker.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `AUDIOBOOKER_TTS__URL=http://tts-server:8000`
/// - `AUDIOBOOKER_TTS__VOICE=en-GB-RyanNeural`
/// - `AUDIOBOOKER_CONVERSION__MAX_CONCURRENT=4`
/// - `AUDIOBOOKER_CONVERSION__FLUFF_TITLES=Contents,Acknowledgments`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("tts.url", "http://localhost:8000")?
        .set_default("tts.timeout_secs", 120)?
        .set_default("tts.max_retries", 0)?
        .set_default("tts.voice", "en-US-BrianNeural")?
        .set_default("conversion.output_dir", "output")?
        .set_default("conversion.max_concurrent", 10)?
        .set_default("conversion.title_policy", "attribute")?
        .set_default("conversion.skip_existing", false)?
        .set_default("conversion.tag_audio", true)?
        .set_default("voices.locales", vec!["en-US", "en-GB", "pl-PL"])?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 例如: AUDIOBOOKER_TTS__URL=http://tts-server:8000
    // 列表项用逗号分隔
    builder = builder.add_source(environment_source(ENV_PREFIX));

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

fn environment_source(prefix: &str) -> Environment {
    Environment::with_prefix(prefix)
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("conversion.fluff_titles")
        .with_list_parse_key("voices.locales")
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.tts.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS URL cannot be empty".to_string(),
        ));
    }

    if config.tts.voice.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "TTS voice cannot be empty".to_string(),
        ));
    }

    if config.conversion.max_concurrent == 0 {
        return Err(ConfigError::ValidationError(
            "max_concurrent must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::debug!("=== Application Configuration ===");
    tracing::debug!("TTS URL: {}", config.tts.url);
    tracing::debug!("TTS Timeout: {}s", config.tts.timeout_secs);
    tracing::debug!("TTS Voice: {}", config.tts.voice);
    if let Some(fake) = &config.tts.fake_audio {
        tracing::debug!("TTS Fake Audio: {:?}", fake);
    }
    tracing::debug!("Output Directory: {:?}", config.conversion.output_dir);
    tracing::debug!("Max Concurrent: {}", config.conversion.max_concurrent);
    tracing::debug!("Title Policy: {}", config.conversion.title_policy);
    tracing::debug!("Fluff Titles: {}", config.conversion.fluff_titles.len());
    tracing::debug!("Voice Locales: {:?}", config.voices.locales);
    tracing::debug!("Log Level: {}", config.log.level);
    tracing::debug!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::book::TitlePolicy;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.tts.url, "http://localhost:8000");
        assert_eq!(config.tts.voice, "en-US-BrianNeural");
        assert_eq!(config.conversion.max_concurrent, 10);
        assert_eq!(config.conversion.title_policy, TitlePolicy::Attribute);
        assert!(config.conversion.tag_audio);
        assert_eq!(config.voices.locales, vec!["en-US", "en-GB", "pl-PL"]);
    }

    #[test]
    fn test_load_from_file() {
        let file = toml_file(
            r#"
[tts]
voice = "en-GB-RyanNeural"
pitch = "-10Hz"

[conversion]
max_concurrent = 3
title_policy = "title_case_prefix"
fluff_titles = ["Contents", "Acknowledgments"]
"#,
        );

        let config = load_config_from_path(Some(file.path())).unwrap();

        assert_eq!(config.tts.voice, "en-GB-RyanNeural");
        assert_eq!(config.tts.pitch.as_deref(), Some("-10Hz"));
        assert_eq!(config.tts.timeout_secs, 120);
        assert_eq!(config.conversion.max_concurrent, 3);
        assert_eq!(config.conversion.title_policy, TitlePolicy::TitleCasePrefix);
        assert_eq!(config.conversion.fluff_titles, vec!["Contents", "Acknowledgments"]);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = load_config_from_path(Some(Path::new("/no/such/audiobooker.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }

    #[test]
    fn test_invalid_file_fails_validation() {
        let file = toml_file("[conversion]\nmax_concurrent = 0\n");
        let result = load_config_from_path(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_environment_source_lists() {
        // 使用独立前缀，避免与其他测试共享进程环境变量
        std::env::set_var("ABTEST_CONVERSION__FLUFF_TITLES", "Contents,Copyright");
        std::env::set_var("ABTEST_TTS__MAX_RETRIES", "2");

        let config: AppConfig = Config::builder()
            .add_source(environment_source("ABTEST"))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        std::env::remove_var("ABTEST_CONVERSION__FLUFF_TITLES");
        std::env::remove_var("ABTEST_TTS__MAX_RETRIES");

        assert_eq!(config.conversion.fluff_titles, vec!["Contents", "Copyright"]);
        assert_eq!(config.tts.max_retries, 2);
    }

    #[test]
    fn test_validation() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());

        let mut config = AppConfig::default();
        config.tts.url = String::new();
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.tts.voice = "  ".to_string();
        assert!(validate_config(&config).is_err());

        let mut config = AppConfig::default();
        config.conversion.max_concurrent = 0;
        assert!(validate_config(&config).is_err());
    }
}
