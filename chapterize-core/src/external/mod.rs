//! Interactions with external CLI tools.
//!
//! Everything the core needs from the outside world goes through the two
//! traits here: [`Transcoder`] for ffmpeg/ffprobe media operations and
//! [`FilePropertyProvider`] for per-file tag lookup. The orchestrators
//! only ever see these seams, which keeps command construction, quoting
//! and process handling in one place and makes the workflows testable
//! with the mocks module.
//!
//! All calls are blocking; an operation returns once the external process
//! has exited. No timeout is applied.

use crate::config::AudioFormat;
use crate::error::{CoreError, CoreResult};
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub mod ffmpeg;
pub mod ffprobe;
pub mod mocks;

pub use ffmpeg::FfmpegTranscoder;
pub use ffprobe::FfprobeTagReader;

/// One chapter extraction request: a `[start, end)` segment copied
/// losslessly out of the container, tagged with title and track number.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRequest {
    pub input: PathBuf,
    pub output: PathBuf,
    pub start_secs: f64,
    pub end_secs: f64,
    pub title: String,
    pub track: u32,
}

/// Media operations performed by the external transcoder.
///
/// Implementations report failure as [`CoreError::CommandFailed`] carrying
/// the tool's diagnostic text.
pub trait Transcoder {
    /// Emits FFMETADATA1-format text for a container.
    fn probe_metadata(&self, input: &Path) -> CoreResult<String>;

    /// Returns the precise media duration in milliseconds.
    ///
    /// This is the only trusted duration source; container length
    /// properties are too coarse for chapter arithmetic.
    fn probe_duration(&self, input: &Path) -> CoreResult<u64>;

    /// Lossless segment copy with tag overwrite.
    fn extract_segment(&self, request: &SegmentRequest) -> CoreResult<()>;

    /// Best-effort cover-art extraction. Callers treat failure as
    /// "no cover present", not as an error.
    fn extract_cover(&self, input: &Path, output: &Path) -> CoreResult<()>;

    /// Re-encodes audio to the given format.
    fn transcode_audio(
        &self,
        input: &Path,
        output: &Path,
        format: AudioFormat,
        bitrate_kbps: Option<u32>,
    ) -> CoreResult<()>;

    /// Lossless concatenation of the files named in a concat list file.
    fn concat(&self, list_file: &Path, output: &Path) -> CoreResult<()>;

    /// Attaches an FFMETADATA blob to an audio stream losslessly.
    fn remux_with_metadata(
        &self,
        audio: &Path,
        metadata: &Path,
        output: &Path,
    ) -> CoreResult<()>;
}

/// Per-file tag lookup, used by the merge path for the ordering tag and
/// the album/artist/title tag set.
pub trait FilePropertyProvider {
    /// Returns the named property, or `None` when the file has no such
    /// tag. Property names are matched case-insensitively.
    fn get_property(&self, path: &Path, name: &str) -> CoreResult<Option<String>>;
}

/// Checks that a required external command is available and executable by
/// running it with `-version`.
pub(crate) fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {}", cmd_name);
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{}' not found.", cmd_name);
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check for '{}': {}", cmd_name, e);
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}

/// Verifies that ffmpeg and ffprobe are both invocable.
pub fn verify_dependencies() -> CoreResult<()> {
    check_dependency("ffmpeg")?;
    check_dependency("ffprobe")?;
    Ok(())
}
