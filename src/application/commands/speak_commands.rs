//! Speak Commands

use std::path::{Path, PathBuf};

use crate::domain::output_naming::AUDIO_EXTENSION;

/// 将整篇文本文件合成为单个音频的命令
#[derive(Debug, Clone)]
pub struct SpeakText {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub voice: String,
    pub pitch: Option<String>,
}

impl SpeakText {
    /// 默认输出路径：输出目录下与输入同名的 `.mp3`
    pub fn default_output_path(input_path: &Path, output_dir: &Path) -> PathBuf {
        let stem = input_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audiobook".to_string());
        output_dir.join(format!("{}.{}", stem, AUDIO_EXTENSION))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path() {
        let path = SpeakText::default_output_path(Path::new("texts/story.txt"), Path::new("output"));
        assert_eq!(path, Path::new("output").join("story.mp3"));
    }
}
