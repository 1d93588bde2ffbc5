//! Audiobooker - EPUB 有声书生成工具
//!
//! 子命令:
//! - chapters: 列出提取出的章节
//! - convert: 逐章合成 MP3 并写入标签
//! - tag: 为目录中的 MP3 写入标签
//! - speak: 合成单个文本文件
//! - voices: 列出 TTS 音色

mod cli;

use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use clap::Parser;

use audiobooker::application::{
    ConvertBook, ConvertBookHandler, ListChapters, ListChaptersHandler, ListVoices,
    ListVoicesHandler, SpeakText, SpeakTextHandler, TagDirectory, TagDirectoryHandler,
    TagOptions, TtsEnginePort,
};
use audiobooker::config::{load_config_from_path, print_config, AppConfig, LogConfig, TtsConfig};
use audiobooker::domain::book::FluffSet;
use audiobooker::domain::ExtractorConfig;
use audiobooker::infrastructure::adapters::HttpTtsClientConfig;
use audiobooker::infrastructure::{
    EpubBookSource, FakeTtsClient, FileAudioStorage, HttpTtsClient, Id3Tagger,
};

use cli::{Cli, Command, ExtractArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config_from_path(cli.config.as_deref())
        .map_err(|e| anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config.log);
    print_config(&config);

    match cli.command {
        Command::Chapters {
            epub,
            json,
            extract,
        } => {
            let handler = ListChaptersHandler::new(Arc::new(EpubBookSource::new()));
            let response = handler
                .handle(ListChapters {
                    book_path: epub,
                    extractor: extractor_config(&config, &extract).await?,
                })
                .await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response.chapters)?);
            } else {
                println!(
                    "{} by {} ({} chapters from {} items)",
                    response.metadata.title.as_deref().unwrap_or("Untitled"),
                    response.metadata.author.as_deref().unwrap_or("Unknown Author"),
                    response.chapters.len(),
                    response.item_count
                );
                for summary in response.summaries() {
                    println!(
                        "{:>4}  {}  ({} words)",
                        summary.chapter_number, summary.title, summary.word_count
                    );
                }
            }
        }

        Command::Convert {
            epub,
            output_dir,
            voice,
            extract,
            max_concurrent,
            skip_existing,
            no_tag,
            tags,
        } => {
            let tagging = (config.conversion.tag_audio && !no_tag).then(|| TagOptions {
                author: tags.author,
                book_title: tags.title,
                cover_image: tags.cover,
            });

            let cmd = ConvertBook {
                book_path: epub,
                output_dir: output_dir.unwrap_or_else(|| config.conversion.output_dir.clone()),
                extractor: extractor_config(&config, &extract).await?,
                voice: voice.voice.unwrap_or_else(|| config.tts.voice.clone()),
                pitch: voice.pitch.or_else(|| config.tts.pitch.clone()),
                max_concurrent: max_concurrent.unwrap_or(config.conversion.max_concurrent),
                skip_existing: skip_existing || config.conversion.skip_existing,
                tagging,
            };

            let tts = tts_engine(&config.tts)?;
            if !tts.health_check().await {
                tracing::warn!(url = %config.tts.url, "TTS service health check failed");
            }

            let handler = ConvertBookHandler::new(
                Arc::new(EpubBookSource::new()),
                tts,
                Arc::new(FileAudioStorage::new()),
                Arc::new(Id3Tagger::new()),
            );
            let report = handler.handle(cmd).await?;

            println!(
                "{} chapters: {} written, {} skipped, {} failed",
                report.total_chapters,
                report.written.len(),
                report.skipped.len(),
                report.failed.len()
            );
            for failed in &report.failed {
                println!(
                    "  failed {}. {}: {}",
                    failed.chapter_number, failed.title, failed.error
                );
            }
            if !report.is_success() {
                bail!("{} chapter(s) failed", report.failed.len());
            }
        }

        Command::Tag {
            dir,
            author,
            title,
            cover,
        } => {
            let handler = TagDirectoryHandler::new(Arc::new(Id3Tagger::new()));
            let report = handler
                .handle(TagDirectory {
                    dir,
                    author,
                    book_title: title,
                    cover_image: cover,
                })
                .await?;

            println!("Tagged {} file(s)", report.tagged.len());
            for (path, error) in &report.failed {
                println!("  failed {}: {}", path.display(), error);
            }
            if !report.failed.is_empty() {
                bail!("{} file(s) could not be tagged", report.failed.len());
            }
        }

        Command::Speak {
            input,
            output,
            voice,
        } => {
            let output_path = output.unwrap_or_else(|| {
                SpeakText::default_output_path(&input, &config.conversion.output_dir)
            });

            let handler =
                SpeakTextHandler::new(tts_engine(&config.tts)?, Arc::new(FileAudioStorage::new()));
            let response = handler
                .handle(SpeakText {
                    input_path: input,
                    output_path,
                    voice: voice.voice.unwrap_or_else(|| config.tts.voice.clone()),
                    pitch: voice.pitch.or_else(|| config.tts.pitch.clone()),
                })
                .await?;

            println!(
                "Wrote {} ({} bytes)",
                response.output_path.display(),
                response.audio_size
            );
        }

        Command::Voices { locales, all } => {
            let locales = if all {
                Vec::new()
            } else if locales.is_empty() {
                config.voices.locales.clone()
            } else {
                locales
            };

            let handler = ListVoicesHandler::new(tts_engine(&config.tts)?);
            for voice in handler.handle(ListVoices { locales }).await? {
                println!(
                    "{}\t{}\t{}",
                    voice.short_name,
                    voice.locale,
                    voice.gender.as_deref().unwrap_or("-")
                );
            }
        }
    }

    Ok(())
}

/// 初始化日志，输出到 stderr，RUST_LOG 优先于配置
fn init_tracing(log: &LogConfig) {
    let log_filter = format!("{},audiobooker={}", log.level, log.level);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if log.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// 创建 TTS 引擎：配置了 fake_audio 时使用离线客户端
fn tts_engine(config: &TtsConfig) -> anyhow::Result<Arc<dyn TtsEnginePort>> {
    if let Some(path) = &config.fake_audio {
        let client = FakeTtsClient::from_file(path)
            .with_context(|| format!("Failed to read fake audio {}", path.display()))?;
        return Ok(Arc::new(client));
    }

    let client_config = HttpTtsClientConfig::new(config.url.clone())
        .with_timeout(config.timeout_secs)
        .with_retries(config.max_retries, HttpTtsClientConfig::default().retry_backoff_ms);
    tracing::info!(url = %config.url, "Using HTTP TTS client");

    Ok(Arc::new(HttpTtsClient::new(client_config)?))
}

/// 合并配置文件、--fluff 和 --fluff-file 中的排除标题
async fn extractor_config(
    config: &AppConfig,
    args: &ExtractArgs,
) -> anyhow::Result<ExtractorConfig> {
    let mut fluff: FluffSet = config.conversion.fluff_titles.iter().cloned().collect();
    fluff.extend(args.fluff.iter().cloned());
    if let Some(path) = &args.fluff_file {
        fluff.extend(read_fluff_file(path).await?);
    }

    Ok(ExtractorConfig::new(
        args.policy.unwrap_or(config.conversion.title_policy),
        fluff,
    ))
}

async fn read_fluff_file(path: &Path) -> anyhow::Result<FluffSet> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read fluff file {}", path.display()))?;
    Ok(FluffSet::parse_lines(&text))
}
