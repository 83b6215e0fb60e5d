//! FFmpeg-backed implementation of the [`Transcoder`] capability.
//!
//! Commands are built with ffmpeg-sidecar and run to completion, with the
//! process's log/error events collected into a stderr buffer so a failed
//! invocation surfaces the tool's own diagnostics. Duration probing goes
//! through the ffprobe crate.

use crate::config::AudioFormat;
use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::external::{SegmentRequest, Transcoder};
use crate::temp_files;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::fs;
use std::path::Path;

/// Production [`Transcoder`] shelling out to ffmpeg and ffprobe.
#[derive(Debug, Clone, Default)]
pub struct FfmpegTranscoder;

impl FfmpegTranscoder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

/// Runs an ffmpeg command to completion, buffering its log output.
/// Returns `CommandFailed` with the buffered stderr on non-zero exit.
fn run_ffmpeg(context: &str, mut cmd: FfmpegCommand) -> CoreResult<()> {
    log::debug!("Running {context} command: {cmd:?}");

    let mut child = cmd.spawn().map_err(|e| CoreError::CommandFailed {
        tool: context.to_string(),
        status: None,
        stderr: format!("Failed to start: {e}"),
    })?;

    let mut stderr_buffer = String::new();
    let iterator = child.iter().map_err(|e| CoreError::CommandFailed {
        tool: context.to_string(),
        status: None,
        stderr: format!("Failed to get event iterator: {e}"),
    })?;
    for event in iterator {
        match event {
            FfmpegEvent::Log(_level, message) => {
                stderr_buffer.push_str(&message);
                stderr_buffer.push('\n');
            }
            FfmpegEvent::Error(error) => {
                stderr_buffer.push_str(&format!("ERROR: {error}\n"));
            }
            _ => {}
        }
    }

    let status = child.wait().map_err(|e| CoreError::CommandFailed {
        tool: context.to_string(),
        status: None,
        stderr: format!("Failed to wait for process: {e}"),
    })?;

    if status.success() {
        Ok(())
    } else {
        log::error!("{context} failed ({status}): {}", stderr_buffer.trim());
        Err(command_failed_error(
            context,
            status,
            stderr_buffer.trim().to_string(),
        ))
    }
}

impl Transcoder for FfmpegTranscoder {
    fn probe_metadata(&self, input: &Path) -> CoreResult<String> {
        let temp_path =
            temp_files::create_temp_file_path(&std::env::temp_dir(), "ffmetadata", "txt");

        let mut cmd = FfmpegCommand::new();
        cmd.arg("-y");
        cmd.input(input.to_string_lossy().as_ref());
        cmd.args(["-f", "ffmetadata"]);
        cmd.output(temp_path.to_string_lossy().as_ref());

        let result = run_ffmpeg("ffmpeg (metadata probe)", cmd).and_then(|()| {
            let text = fs::read_to_string(&temp_path)?;
            if text.trim().is_empty() {
                return Err(CoreError::EmptyProbeOutput(
                    "ffmpeg (metadata probe)".to_string(),
                ));
            }
            Ok(text)
        });

        // The probe file is scratch either way.
        if let Err(e) = fs::remove_file(&temp_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    "Failed to remove temp metadata file {}: {}",
                    temp_path.display(),
                    e
                );
            }
        }

        result
    }

    fn probe_duration(&self, input: &Path) -> CoreResult<u64> {
        log::debug!("Running ffprobe for duration on: {}", input.display());
        match ffprobe::ffprobe(input) {
            Ok(metadata) => {
                let duration_secs = metadata
                    .format
                    .duration
                    .as_deref()
                    .and_then(|d| d.parse::<f64>().ok())
                    .ok_or_else(|| CoreError::MissingDuration(input.to_path_buf()))?;
                Ok((duration_secs * 1000.0).round() as u64)
            }
            Err(err) => {
                log::error!("ffprobe failed for duration on {}: {:?}", input.display(), err);
                Err(CoreError::CommandFailed {
                    tool: "ffprobe (duration)".to_string(),
                    status: None,
                    stderr: format!("{err:?}"),
                })
            }
        }
    }

    fn extract_segment(&self, request: &SegmentRequest) -> CoreResult<()> {
        let mut cmd = FfmpegCommand::new();
        cmd.arg("-y");
        cmd.input(request.input.to_string_lossy().as_ref());
        cmd.args(["-ss", &request.start_secs.to_string()]);
        cmd.args(["-to", &request.end_secs.to_string()]);
        cmd.args(["-c", "copy"]);
        cmd.args(["-metadata", &format!("title={}", request.title)]);
        cmd.args(["-metadata", &format!("track={}", request.track)]);
        cmd.output(request.output.to_string_lossy().as_ref());

        run_ffmpeg("ffmpeg (segment extraction)", cmd)
    }

    fn extract_cover(&self, input: &Path, output: &Path) -> CoreResult<()> {
        let mut cmd = FfmpegCommand::new();
        cmd.arg("-y");
        cmd.input(input.to_string_lossy().as_ref());
        cmd.args(["-an", "-vcodec", "copy"]);
        cmd.output(output.to_string_lossy().as_ref());

        run_ffmpeg("ffmpeg (cover extraction)", cmd)
    }

    fn transcode_audio(
        &self,
        input: &Path,
        output: &Path,
        format: AudioFormat,
        bitrate_kbps: Option<u32>,
    ) -> CoreResult<()> {
        let mut cmd = FfmpegCommand::new();
        cmd.arg("-y");
        cmd.input(input.to_string_lossy().as_ref());
        cmd.args(["-vn", "-c:a", format.codec()]);
        if let Some(kbps) = bitrate_kbps {
            cmd.args(["-b:a", &format!("{kbps}k")]);
        }
        cmd.output(output.to_string_lossy().as_ref());

        run_ffmpeg("ffmpeg (audio conversion)", cmd)
    }

    fn concat(&self, list_file: &Path, output: &Path) -> CoreResult<()> {
        let mut cmd = FfmpegCommand::new();
        cmd.arg("-y");
        cmd.args(["-f", "concat", "-safe", "0"]);
        cmd.input(list_file.to_string_lossy().as_ref());
        cmd.args(["-c", "copy"]);
        cmd.output(output.to_string_lossy().as_ref());

        run_ffmpeg("ffmpeg (concat)", cmd)
    }

    fn remux_with_metadata(&self, audio: &Path, metadata: &Path, output: &Path) -> CoreResult<()> {
        let mut cmd = FfmpegCommand::new();
        cmd.arg("-y");
        cmd.input(audio.to_string_lossy().as_ref());
        cmd.args(["-f", "ffmetadata"]);
        cmd.input(metadata.to_string_lossy().as_ref());
        cmd.args(["-map_metadata", "1", "-map", "0", "-c", "copy"]);
        cmd.output(output.to_string_lossy().as_ref());

        run_ffmpeg("ffmpeg (metadata remux)", cmd)
    }
}
