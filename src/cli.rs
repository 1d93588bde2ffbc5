//! 命令行参数定义

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use audiobooker::domain::book::TitlePolicy;

#[derive(Debug, Parser)]
#[command(name = "audiobooker")]
#[command(about = "Turn EPUB chapters into tagged MP3 audiobook tracks", long_about = None)]
#[command(version)]
pub(crate) struct Cli {
    /// 配置文件路径（默认搜索 audiobooker.toml / audiobooker.local.toml）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// List the chapters extracted from an EPUB
    Chapters {
        epub: PathBuf,
        /// Print full chapter records as JSON
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        extract: ExtractArgs,
    },

    /// Synthesize every chapter of an EPUB into numbered MP3 files
    Convert {
        epub: PathBuf,
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
        #[command(flatten)]
        voice: VoiceArgs,
        #[command(flatten)]
        extract: ExtractArgs,
        /// Number of chapters synthesized at once
        #[arg(short = 'j', long)]
        max_concurrent: Option<usize>,
        /// Keep chapter files that already exist
        #[arg(long)]
        skip_existing: bool,
        /// Do not write ID3 tags
        #[arg(long)]
        no_tag: bool,
        #[command(flatten)]
        tags: TagArgs,
    },

    /// Write ID3 tags to every MP3 in a directory
    Tag {
        dir: PathBuf,
        #[arg(long)]
        author: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        cover: Option<PathBuf>,
    },

    /// Synthesize a plain UTF-8 text file into one MP3
    Speak {
        input: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[command(flatten)]
        voice: VoiceArgs,
    },

    /// List available TTS voices
    Voices {
        /// Locale filter, repeatable (defaults to voices.locales)
        #[arg(long = "locale")]
        locales: Vec<String>,
        /// Ignore the locale filter
        #[arg(long, conflicts_with = "locales")]
        all: bool,
    },
}

#[derive(Debug, Args)]
pub(crate) struct ExtractArgs {
    /// attribute, heading_text or title_case_prefix
    #[arg(long)]
    pub policy: Option<TitlePolicy>,
    /// Chapter title to exclude, repeatable
    #[arg(long = "fluff")]
    pub fluff: Vec<String>,
    /// File with one excluded chapter title per line
    #[arg(long)]
    pub fluff_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub(crate) struct VoiceArgs {
    #[arg(long)]
    pub voice: Option<String>,
    /// Pitch adjustment such as -10Hz
    #[arg(long, allow_hyphen_values = true)]
    pub pitch: Option<String>,
}

#[derive(Debug, Args)]
pub(crate) struct TagArgs {
    /// Artist tag, defaults to the book's author
    #[arg(long)]
    pub author: Option<String>,
    /// Album tag, defaults to the book's title
    #[arg(long)]
    pub title: Option<String>,
    /// Cover image, defaults to the cover inside the EPUB
    #[arg(long)]
    pub cover: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chapters() {
        let cli = Cli::parse_from([
            "audiobooker",
            "chapters",
            "book.epub",
            "--json",
            "--policy",
            "title-case-prefix",
            "--fluff",
            "Contents",
            "--fluff",
            "Copyright",
        ]);

        match cli.command {
            Command::Chapters { epub, json, extract } => {
                assert_eq!(epub, PathBuf::from("book.epub"));
                assert!(json);
                assert_eq!(extract.policy, Some(TitlePolicy::TitleCasePrefix));
                assert_eq!(extract.fluff, vec!["Contents", "Copyright"]);
                assert!(extract.fluff_file.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::parse_from([
            "audiobooker",
            "--config",
            "custom.toml",
            "convert",
            "book.epub",
            "-o",
            "out",
            "-j",
            "4",
            "--pitch",
            "-10Hz",
            "--skip-existing",
            "--author",
            "Jane",
            "--cover",
            "c.jpg",
        ]);

        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        match cli.command {
            Command::Convert {
                output_dir,
                voice,
                max_concurrent,
                skip_existing,
                no_tag,
                tags,
                ..
            } => {
                assert_eq!(output_dir, Some(PathBuf::from("out")));
                assert_eq!(voice.pitch.as_deref(), Some("-10Hz"));
                assert!(voice.voice.is_none());
                assert_eq!(max_concurrent, Some(4));
                assert!(skip_existing);
                assert!(!no_tag);
                assert_eq!(tags.author.as_deref(), Some("Jane"));
                assert!(tags.title.is_none());
                assert_eq!(tags.cover, Some(PathBuf::from("c.jpg")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_tag_requires_author_and_title() {
        assert!(Cli::try_parse_from(["audiobooker", "tag", "dir"]).is_err());
        assert!(Cli::try_parse_from([
            "audiobooker", "tag", "dir", "--author", "A", "--title", "T"
        ])
        .is_ok());
    }

    #[test]
    fn test_invalid_policy_rejected() {
        assert!(Cli::try_parse_from([
            "audiobooker", "chapters", "b.epub", "--policy", "bogus"
        ])
        .is_err());
    }

    #[test]
    fn test_voices_all_conflicts_with_locale() {
        assert!(Cli::try_parse_from(["audiobooker", "voices", "--all", "--locale", "en-US"]).is_err());
    }
}
