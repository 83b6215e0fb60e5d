//! Configuration structures for the split/merge orchestrators.
//!
//! Behavior that the original tool controlled through a process-wide debug
//! flag and loose function arguments travels here as an explicit value that
//! the consumer (e.g. chapterize-cli) constructs and hands to the core.

use std::fmt;
use std::str::FromStr;

/// Target audio format for optional post-split conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Aac,
    Opus,
    Flac,
}

impl AudioFormat {
    /// The ffmpeg encoder name for this format.
    #[must_use]
    pub fn codec(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "libmp3lame",
            AudioFormat::Aac => "aac",
            AudioFormat::Opus => "libopus",
            AudioFormat::Flac => "flac",
        }
    }

    /// The file extension for this format.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Aac => "m4a",
            AudioFormat::Opus => "opus",
            AudioFormat::Flac => "flac",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::Aac => "aac",
            AudioFormat::Opus => "opus",
            AudioFormat::Flac => "flac",
        };
        f.write_str(name)
    }
}

impl FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mp3" => Ok(AudioFormat::Mp3),
            "aac" | "m4a" => Ok(AudioFormat::Aac),
            "opus" => Ok(AudioFormat::Opus),
            "flac" => Ok(AudioFormat::Flac),
            other => Err(format!(
                "unknown audio format '{other}' (expected mp3, aac, opus or flac)"
            )),
        }
    }
}

/// When post-split conversion runs relative to chapter extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvertTiming {
    /// Convert each chapter file immediately after it is extracted.
    PerChapter,
    /// Extract every chapter first, then convert the whole set.
    #[default]
    AfterSplit,
}

/// Main configuration structure for the chapterize-core library.
///
/// Created by the consumer and passed to the orchestrators to control
/// split behavior. Merge currently needs no knobs beyond the input paths.
#[derive(Debug, Clone, Default)]
pub struct CoreConfig {
    /// Optional target format each extracted chapter is transcoded to.
    pub convert_format: Option<AudioFormat>,

    /// Optional audio bitrate in kbps for the conversion step.
    pub bitrate_kbps: Option<u32>,

    /// Whether conversion runs per chapter or after the full split.
    pub convert_timing: ConvertTiming,

    /// Delete the extracted container-format chapter file once its
    /// converted counterpart exists. Ignored when no conversion is
    /// requested.
    pub remove_intermediates: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_format_from_str() {
        assert_eq!("mp3".parse::<AudioFormat>().unwrap(), AudioFormat::Mp3);
        assert_eq!("MP3".parse::<AudioFormat>().unwrap(), AudioFormat::Mp3);
        assert_eq!("m4a".parse::<AudioFormat>().unwrap(), AudioFormat::Aac);
        assert_eq!("opus".parse::<AudioFormat>().unwrap(), AudioFormat::Opus);
        assert!("wma".parse::<AudioFormat>().is_err());
    }

    #[test]
    fn test_audio_format_codec_and_extension() {
        assert_eq!(AudioFormat::Mp3.codec(), "libmp3lame");
        assert_eq!(AudioFormat::Mp3.extension(), "mp3");
        assert_eq!(AudioFormat::Aac.extension(), "m4a");
        assert_eq!(AudioFormat::Flac.codec(), "flac");
    }
}
