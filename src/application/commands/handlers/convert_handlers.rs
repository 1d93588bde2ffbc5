//! Convert Command Handlers
//!
//! 电子书 -> 章节 -> 并发 TTS 合成 -> 写文件 -> 写标签

use futures_util::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;

use crate::application::commands::{ConvertBook, TagOptions};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AudioStoragePort, AudioTaggerPort, BookSourcePort, LoadedBook, SynthesisRequest,
    TagRequest, TtsEnginePort,
};
use crate::domain::book::ChapterRecord;
use crate::domain::{extract_chapters, output_paths};

const UNKNOWN_AUTHOR: &str = "Unknown Author";
const COVER_FILE_STEM: &str = "cover";

// ============================================================================
// Response
// ============================================================================

/// 合成失败的章节
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedChapter {
    pub chapter_number: u32,
    pub title: String,
    pub error: String,
}

/// 转换结果，列表顺序与章节顺序一致
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    pub total_chapters: usize,
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<FailedChapter>,
}

impl ConversionReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// 单个章节任务的结果
#[derive(Debug)]
enum ChapterOutcome {
    Written(PathBuf),
    Skipped(PathBuf),
    Failed(FailedChapter),
}

/// 写入标签时使用的书籍级信息
#[derive(Debug, Clone)]
struct TagContext {
    author: String,
    book_title: String,
    cover_image: Option<PathBuf>,
}

/// 所有章节任务共享的依赖和参数
struct ChapterPipeline {
    tts_engine: Arc<dyn TtsEnginePort>,
    storage: Arc<dyn AudioStoragePort>,
    tagger: Arc<dyn AudioTaggerPort>,
    voice: String,
    pitch: Option<String>,
    skip_existing: bool,
    tag_context: Option<TagContext>,
    total: usize,
}

// ============================================================================
// Handler
// ============================================================================

/// ConvertBook Handler
pub struct ConvertBookHandler {
    book_source: Arc<dyn BookSourcePort>,
    tts_engine: Arc<dyn TtsEnginePort>,
    storage: Arc<dyn AudioStoragePort>,
    tagger: Arc<dyn AudioTaggerPort>,
}

impl ConvertBookHandler {
    pub fn new(
        book_source: Arc<dyn BookSourcePort>,
        tts_engine: Arc<dyn TtsEnginePort>,
        storage: Arc<dyn AudioStoragePort>,
        tagger: Arc<dyn AudioTaggerPort>,
    ) -> Self {
        Self {
            book_source,
            tts_engine,
            storage,
            tagger,
        }
    }

    pub async fn handle(&self, cmd: ConvertBook) -> Result<ConversionReport, ApplicationError> {
        if cmd.max_concurrent == 0 {
            return Err(ApplicationError::validation("max_concurrent must be at least 1"));
        }
        if cmd.voice.trim().is_empty() {
            return Err(ApplicationError::validation("voice cannot be empty"));
        }

        let book = self.book_source.load(&cmd.book_path).await?;
        let chapters = extract_chapters(&book.items, &cmd.extractor);
        let total = chapters.len();

        tracing::info!(
            book = %cmd.book_path.display(),
            items = book.items.len(),
            chapters = total,
            "Book chunked"
        );

        if chapters.is_empty() {
            tracing::warn!(book = %cmd.book_path.display(), "No chapters to convert");
            return Ok(ConversionReport::default());
        }

        self.storage.ensure_dir(&cmd.output_dir).await?;

        let tag_context = match &cmd.tagging {
            Some(options) => Some(
                self.resolve_tag_context(options, &book, &cmd.book_path, &cmd.output_dir)
                    .await?,
            ),
            None => None,
        };

        let pipeline = Arc::new(ChapterPipeline {
            tts_engine: self.tts_engine.clone(),
            storage: self.storage.clone(),
            tagger: self.tagger.clone(),
            voice: cmd.voice.clone(),
            pitch: cmd.pitch.clone(),
            skip_existing: cmd.skip_existing,
            tag_context,
            total,
        });

        // 输出路径在派发前全部确定且互不相同，任务之间不共享可变状态
        let paths = output_paths(&cmd.output_dir, &chapters);
        let jobs: Vec<(ChapterRecord, PathBuf)> = chapters.into_iter().zip(paths).collect();

        // 使用 semaphore 控制并发
        let semaphore = Arc::new(Semaphore::new(cmd.max_concurrent));
        let mut handles = Vec::with_capacity(jobs.len());

        for (chapter, path) in jobs {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| ApplicationError::internal(format!("Semaphore closed: {}", e)))?;
            let pipeline = pipeline.clone();
            let label = (chapter.chapter_number(), chapter.title().to_string());

            let handle = tokio::spawn(async move {
                let _permit = permit; // 持有 permit 直到任务完成
                pipeline.run(chapter, path).await
            });
            handles.push((label, handle));
        }

        let (labels, handles): (Vec<_>, Vec<_>) = handles.into_iter().unzip();
        let mut report = ConversionReport {
            total_chapters: total,
            ..Default::default()
        };

        for ((chapter_number, title), outcome) in labels.into_iter().zip(join_all(handles).await) {
            match outcome {
                Ok(ChapterOutcome::Written(path)) => report.written.push(path),
                Ok(ChapterOutcome::Skipped(path)) => report.skipped.push(path),
                Ok(ChapterOutcome::Failed(failed)) => report.failed.push(failed),
                Err(e) => {
                    tracing::error!(chapter = chapter_number, title = %title, error = %e, "Chapter task panicked");
                    report.failed.push(FailedChapter {
                        chapter_number,
                        title,
                        error: format!("Chapter task failed: {}", e),
                    });
                }
            }
        }

        tracing::info!(
            total = report.total_chapters,
            written = report.written.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            output_dir = %cmd.output_dir.display(),
            "Conversion finished"
        );

        Ok(report)
    }

    /// 确定作者、书名和封面：显式参数 > 电子书元数据 > 默认值
    async fn resolve_tag_context(
        &self,
        options: &TagOptions,
        book: &LoadedBook,
        book_path: &Path,
        output_dir: &Path,
    ) -> Result<TagContext, ApplicationError> {
        let author = options
            .author
            .clone()
            .or_else(|| book.metadata.author.clone())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        let book_title = options
            .book_title
            .clone()
            .or_else(|| book.metadata.title.clone())
            .unwrap_or_else(|| {
                book_path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default()
            });

        let cover_image = match (&options.cover_image, &book.cover) {
            (Some(path), _) => Some(path.clone()),
            (None, Some(cover)) => {
                let path = output_dir.join(format!("{}.{}", COVER_FILE_STEM, cover.extension()));
                self.storage.save(&path, &cover.data).await?;
                tracing::debug!(path = %path.display(), "Cover extracted from book");
                Some(path)
            }
            (None, None) => None,
        };

        Ok(TagContext {
            author,
            book_title,
            cover_image,
        })
    }
}

impl ChapterPipeline {
    /// 处理单个章节，错误记录到结果中而不中断其他任务
    async fn run(&self, chapter: ChapterRecord, path: PathBuf) -> ChapterOutcome {
        match self.process(&chapter, &path).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(
                    chapter = chapter.chapter_number(),
                    title = %chapter.title(),
                    error = %e,
                    "Chapter conversion failed"
                );
                ChapterOutcome::Failed(FailedChapter {
                    chapter_number: chapter.chapter_number(),
                    title: chapter.title().to_string(),
                    error: e.to_string(),
                })
            }
        }
    }

    async fn process(
        &self,
        chapter: &ChapterRecord,
        path: &Path,
    ) -> Result<ChapterOutcome, ApplicationError> {
        if self.skip_existing && self.storage.exists(path).await {
            tracing::info!(path = %path.display(), "Output exists, skipping");
            return Ok(ChapterOutcome::Skipped(path.to_path_buf()));
        }

        tracing::info!(
            chapter = chapter.chapter_number(),
            total = self.total,
            title = %chapter.title(),
            "Processing chapter {}/{}",
            chapter.chapter_number(),
            self.total
        );

        let request = SynthesisRequest::new(chapter.content(), &self.voice, self.pitch.clone());
        let response = self.tts_engine.synthesize(request).await?;
        self.storage.save(path, &response.audio_data).await?;

        if let Some(context) = &self.tag_context {
            let request = TagRequest {
                path: path.to_path_buf(),
                author: context.author.clone(),
                book_title: context.book_title.clone(),
                chapter_title: chapter.title().to_string(),
                track_number: Some(chapter.chapter_number()),
                cover_image: context.cover_image.clone(),
            };
            self.tagger.tag(&request).await?;
        }

        tracing::info!(
            chapter = chapter.chapter_number(),
            total = self.total,
            title = %chapter.title(),
            path = %path.display(),
            duration_ms = ?response.duration_ms,
            "Saved {}/{}",
            chapter.chapter_number(),
            self.total
        );

        Ok(ChapterOutcome::Written(path.to_path_buf()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{SynthesisResponse, TaggingError, TtsError, VoiceInfo};
    use crate::domain::book::{BookMetadata, CoverImage, DocumentItem, FluffSet, TitlePolicy};
    use crate::domain::ExtractorConfig;
    use crate::infrastructure::adapters::{FakeTtsClient, FileAudioStorage};
    use crate::infrastructure::memory::InMemoryBookSource;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::tempdir;

    /// 记录所有标签请求
    #[derive(Default)]
    struct RecordingTagger {
        requests: Mutex<Vec<TagRequest>>,
    }

    impl RecordingTagger {
        fn requests(&self) -> Vec<TagRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AudioTaggerPort for RecordingTagger {
        async fn tag(&self, request: &TagRequest) -> Result<(), TaggingError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(())
        }
    }

    fn chapter_page(attr: &str, heading: &str, body: &str) -> String {
        format!(
            "<html><body><h1 title=\"{}\">{}</h1><p>{}</p></body></html>",
            attr, heading, body
        )
    }

    fn sample_book(chapters: usize) -> LoadedBook {
        let mut items = vec![DocumentItem::xhtml(
            "Text/toc.html",
            "<html><body><h1>Contents</h1><p>...</p></body></html>",
        )];
        for i in 1..=chapters {
            items.push(DocumentItem::xhtml(
                format!("Text/ch{}.html", i),
                chapter_page(&format!("{}. Chapter {}", i, i), "x", &format!("Text of chapter {}", i)),
            ));
        }
        LoadedBook {
            metadata: BookMetadata {
                title: Some("Lorem ipsum".to_string()),
                author: Some("Jane Doe".to_string()),
            },
            items,
            cover: Some(CoverImage {
                data: b"png-bytes".to_vec(),
                media_type: "image/png".to_string(),
            }),
        }
    }

    fn command(output_dir: &Path, max_concurrent: usize) -> ConvertBook {
        ConvertBook {
            book_path: PathBuf::from("book.epub"),
            output_dir: output_dir.to_path_buf(),
            extractor: ExtractorConfig::new(
                TitlePolicy::Attribute,
                ["Contents"].into_iter().collect::<FluffSet>(),
            ),
            voice: "en-US-BrianNeural".to_string(),
            pitch: Some("-10Hz".to_string()),
            max_concurrent,
            skip_existing: false,
            tagging: Some(TagOptions::default()),
        }
    }

    struct Fixture {
        handler: ConvertBookHandler,
        tts: Arc<FakeTtsClient>,
        tagger: Arc<RecordingTagger>,
    }

    fn fixture(book: LoadedBook, tts: FakeTtsClient) -> Fixture {
        let source = InMemoryBookSource::new();
        source.insert("book.epub", book);
        let tts = Arc::new(tts);
        let tagger = Arc::new(RecordingTagger::default());
        let storage = Arc::new(FileAudioStorage::new());
        let handler = ConvertBookHandler::new(Arc::new(source), tts.clone(), storage, tagger.clone());
        Fixture {
            handler,
            tts,
            tagger,
        }
    }

    #[tokio::test]
    async fn test_converts_every_chapter() {
        let temp_dir = tempdir().unwrap();
        let out = temp_dir.path().join("out");
        let f = fixture(sample_book(3), FakeTtsClient::new(b"ID3audio".to_vec()));

        let report = f.handler.handle(command(&out, 2)).await.unwrap();

        assert!(report.is_success());
        assert_eq!(report.total_chapters, 3);
        assert_eq!(
            report.written,
            vec![
                out.join("1. Chapter 1.mp3"),
                out.join("2. Chapter 2.mp3"),
                out.join("3. Chapter 3.mp3"),
            ]
        );
        for path in &report.written {
            assert_eq!(std::fs::read(path).unwrap(), b"ID3audio");
        }

        let requests = f.tts.requests();
        assert_eq!(requests.len(), 3);
        assert!(requests.iter().all(|r| r.voice == "en-US-BrianNeural"));
        assert!(requests.iter().all(|r| r.pitch.as_deref() == Some("-10Hz")));
    }

    #[tokio::test]
    async fn test_tags_use_book_metadata_and_extracted_cover() {
        let temp_dir = tempdir().unwrap();
        let out = temp_dir.path().join("out");
        let f = fixture(sample_book(2), FakeTtsClient::new(b"a".to_vec()));

        f.handler.handle(command(&out, 1)).await.unwrap();

        let mut requests = f.tagger.requests();
        requests.sort_by_key(|r| r.track_number);
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].author, "Jane Doe");
        assert_eq!(requests[0].book_title, "Lorem ipsum");
        assert_eq!(requests[0].chapter_title, "Chapter 1");
        assert_eq!(requests[0].track_number, Some(1));
        assert_eq!(requests[1].track_number, Some(2));

        let cover = out.join("cover.png");
        assert_eq!(requests[0].cover_image.as_deref(), Some(cover.as_path()));
        assert_eq!(std::fs::read(&cover).unwrap(), b"png-bytes");
    }

    #[tokio::test]
    async fn test_explicit_tag_options_win() {
        let temp_dir = tempdir().unwrap();
        let out = temp_dir.path().join("out");
        let f = fixture(sample_book(1), FakeTtsClient::new(b"a".to_vec()));

        let mut cmd = command(&out, 1);
        cmd.tagging = Some(TagOptions {
            author: Some("Someone Else".to_string()),
            book_title: Some("Other".to_string()),
            cover_image: Some(PathBuf::from("art.jpg")),
        });
        f.handler.handle(cmd).await.unwrap();

        let requests = f.tagger.requests();
        assert_eq!(requests[0].author, "Someone Else");
        assert_eq!(requests[0].book_title, "Other");
        assert_eq!(requests[0].cover_image, Some(PathBuf::from("art.jpg")));
        assert!(!out.join("cover.png").exists());
    }

    #[tokio::test]
    async fn test_tagging_disabled() {
        let temp_dir = tempdir().unwrap();
        let out = temp_dir.path().join("out");
        let f = fixture(sample_book(2), FakeTtsClient::new(b"a".to_vec()));

        let mut cmd = command(&out, 2);
        cmd.tagging = None;
        let report = f.handler.handle(cmd).await.unwrap();

        assert_eq!(report.written.len(), 2);
        assert!(f.tagger.requests().is_empty());
    }

    #[tokio::test]
    async fn test_failed_chapter_does_not_stop_others() {
        let temp_dir = tempdir().unwrap();
        let out = temp_dir.path().join("out");
        let tts = FakeTtsClient::new(b"a".to_vec()).fail_when_text_contains("chapter 2");
        let f = fixture(sample_book(3), tts);

        let report = f.handler.handle(command(&out, 3)).await.unwrap();

        assert!(!report.is_success());
        assert_eq!(report.written.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].chapter_number, 2);
        assert_eq!(report.failed[0].title, "Chapter 2");
        assert!(!out.join("2. Chapter 2.mp3").exists());
    }

    #[tokio::test]
    async fn test_chapters_sharing_a_title_get_distinct_files() {
        let temp_dir = tempdir().unwrap();
        let out = temp_dir.path().join("out");
        let book = LoadedBook {
            items: vec![
                DocumentItem::xhtml(
                    "Text/ch3a.html",
                    chapter_page("3. Long Chapter", "Long Chapter", "First half"),
                ),
                DocumentItem::xhtml(
                    "Text/ch3b.html",
                    chapter_page("3. Long Chapter", "Long Chapter", "Second half"),
                ),
            ],
            ..Default::default()
        };
        let f = fixture(book, FakeTtsClient::new(b"a".to_vec()));

        let mut cmd = command(&out, 2);
        cmd.tagging = None;
        let report = f.handler.handle(cmd).await.unwrap();

        assert!(report.is_success());
        assert_eq!(
            report.written,
            vec![
                out.join("3. Long Chapter.mp3"),
                out.join("3. Long Chapter (2).mp3"),
            ]
        );
        let files_on_disk = std::fs::read_dir(&out).unwrap().count();
        assert_eq!(files_on_disk, 2);
    }

    /// 合成时 panic 的 TTS 引擎
    struct PanickingTts;

    #[async_trait]
    impl TtsEnginePort for PanickingTts {
        async fn synthesize(&self, request: SynthesisRequest) -> Result<SynthesisResponse, TtsError> {
            if request.text.contains("chapter 2") {
                panic!("engine crashed");
            }
            Ok(SynthesisResponse {
                audio_data: b"a".to_vec(),
                duration_ms: None,
            })
        }

        async fn list_voices(&self) -> Result<Vec<VoiceInfo>, TtsError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_panicking_chapter_is_reported_as_failed() {
        let temp_dir = tempdir().unwrap();
        let out = temp_dir.path().join("out");
        let source = InMemoryBookSource::new();
        source.insert("book.epub", sample_book(3));
        let handler = ConvertBookHandler::new(
            Arc::new(source),
            Arc::new(PanickingTts),
            Arc::new(FileAudioStorage::new()),
            Arc::new(RecordingTagger::default()),
        );

        let mut cmd = command(&out, 3);
        cmd.tagging = None;
        let report = handler.handle(cmd).await.unwrap();

        assert_eq!(report.written.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].chapter_number, 2);
        assert_eq!(report.failed[0].title, "Chapter 2");
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let temp_dir = tempdir().unwrap();
        let out = temp_dir.path().join("out");
        let tts = FakeTtsClient::new(b"a".to_vec()).with_latency(Duration::from_millis(20));
        let f = fixture(sample_book(8), tts);

        let report = f.handler.handle(command(&out, 3)).await.unwrap();

        assert_eq!(report.written.len(), 8);
        assert!(f.tts.max_in_flight() <= 3);
        assert!(f.tts.max_in_flight() >= 1);
    }

    #[tokio::test]
    async fn test_skip_existing() {
        let temp_dir = tempdir().unwrap();
        let out = temp_dir.path().join("out");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("1. Chapter 1.mp3"), b"old").unwrap();
        let f = fixture(sample_book(2), FakeTtsClient::new(b"new".to_vec()));

        let mut cmd = command(&out, 2);
        cmd.skip_existing = true;
        let report = f.handler.handle(cmd).await.unwrap();

        assert_eq!(report.skipped, vec![out.join("1. Chapter 1.mp3")]);
        assert_eq!(report.written, vec![out.join("2. Chapter 2.mp3")]);
        assert_eq!(std::fs::read(out.join("1. Chapter 1.mp3")).unwrap(), b"old");
        assert_eq!(f.tts.requests().len(), 1);
    }

    #[tokio::test]
    async fn test_book_without_chapters() {
        let temp_dir = tempdir().unwrap();
        let out = temp_dir.path().join("out");
        let f = fixture(sample_book(0), FakeTtsClient::new(b"a".to_vec()));

        let report = f.handler.handle(command(&out, 2)).await.unwrap();

        assert_eq!(report.total_chapters, 0);
        assert!(report.written.is_empty());
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn test_rejects_zero_concurrency() {
        let temp_dir = tempdir().unwrap();
        let f = fixture(sample_book(1), FakeTtsClient::new(b"a".to_vec()));

        let err = f.handler.handle(command(temp_dir.path(), 0)).await.unwrap_err();
        assert!(matches!(err, ApplicationError::ValidationError(_)));
    }
}
