//! Split workflow: one chaptered container into per-chapter files.
//!
//! For each chapter the transcoder losslessly copies the `[start, end)`
//! segment into `{basename}_split/{track}. {title}.{ext}`, then cover art
//! is extracted best-effort. Optionally every chapter file is transcoded
//! to a secondary format, either immediately after its extraction or once
//! the whole split is done, deleting the container-format intermediate
//! only after the converted file exists.
//!
//! The first extraction failure aborts the remaining chapters;
//! already-written files stay on disk.

use crate::config::{ConvertTiming, CoreConfig};
use crate::error::{CoreError, CoreResult};
use crate::external::{SegmentRequest, Transcoder};
use crate::metadata::{Chapter, Metadata};
use crate::utils::sanitize_filename;
use std::fs;
use std::path::{Path, PathBuf};

/// Files produced by a completed split.
#[derive(Debug, Clone)]
pub struct SplitOutcome {
    pub output_dir: PathBuf,
    pub chapter_files: Vec<PathBuf>,
    pub cover: Option<PathBuf>,
    pub converted_files: Vec<PathBuf>,
}

/// Splits a bound container into per-chapter files.
///
/// `meta` must carry a `source_path` (as produced by
/// [`super::load_metadata`]); an unbound metadata fails with a path error.
pub fn split_container<T: Transcoder>(
    transcoder: &T,
    config: &CoreConfig,
    meta: &Metadata,
) -> CoreResult<SplitOutcome> {
    let input = meta.source_path.as_deref().ok_or_else(|| {
        CoreError::PathError("metadata is not bound to a container file".to_string())
    })?;

    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .ok_or_else(|| {
            CoreError::PathError(format!("no file stem for {}", input.display()))
        })?;
    let extension = input
        .extension()
        .map_or_else(|| "m4b".to_string(), |e| e.to_string_lossy().into_owned());

    let output_dir = input
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .join(format!("{stem}_split"));
    fs::create_dir_all(&output_dir)?;

    let total = meta.chapters().len();
    let mut chapter_files = Vec::with_capacity(total);
    let mut converted_files = Vec::new();

    for chapter in meta.chapters() {
        let output = chapter_output_path(&output_dir, chapter, &extension);
        log::info!(
            "Extracting chapter {}/{}: {}",
            chapter.track_number,
            total,
            chapter.title
        );

        transcoder.extract_segment(&SegmentRequest {
            input: input.to_path_buf(),
            output: output.clone(),
            start_secs: chapter.start_seconds(),
            end_secs: chapter.end_seconds(),
            title: chapter.title.clone(),
            track: chapter.track_number,
        })?;

        if config.convert_timing == ConvertTiming::PerChapter {
            if let Some(converted) = convert_chapter(transcoder, config, &output)? {
                converted_files.push(converted);
            }
        }
        chapter_files.push(output);
    }

    let cover_path = output_dir.join("cover.jpg");
    let cover = match transcoder.extract_cover(input, &cover_path) {
        Ok(()) => Some(cover_path),
        Err(e) => {
            // Missing cover art is not an error.
            log::debug!("No cover art extracted from {}: {}", input.display(), e);
            None
        }
    };

    if config.convert_timing == ConvertTiming::AfterSplit {
        for file in &chapter_files {
            if let Some(converted) = convert_chapter(transcoder, config, file)? {
                converted_files.push(converted);
            }
        }
    }

    log::info!(
        "Split {} into {} chapter file(s) under {}",
        input.display(),
        chapter_files.len(),
        output_dir.display()
    );

    Ok(SplitOutcome {
        output_dir,
        chapter_files,
        cover,
        converted_files,
    })
}

/// `{track}. {sanitized title}.{ext}`, falling back to `Chapter {track}`
/// for titles that sanitize to nothing. Identical sanitized titles are
/// not deduplicated.
fn chapter_output_path(output_dir: &Path, chapter: &Chapter, extension: &str) -> PathBuf {
    let mut name = sanitize_filename(&chapter.title);
    if name.is_empty() {
        name = format!("Chapter {}", chapter.track_number);
    }
    output_dir.join(format!("{}. {}.{}", chapter.track_number, name, extension))
}

/// Transcodes one extracted chapter to the configured secondary format.
/// Returns the converted path, or `None` when no conversion is requested.
/// The intermediate is deleted only after its converted counterpart
/// exists on disk.
fn convert_chapter<T: Transcoder>(
    transcoder: &T,
    config: &CoreConfig,
    file: &Path,
) -> CoreResult<Option<PathBuf>> {
    let Some(format) = config.convert_format else {
        return Ok(None);
    };

    let target = file.with_extension(format.extension());
    if target == *file {
        return Err(CoreError::PathError(format!(
            "conversion target equals source: {}",
            file.display()
        )));
    }

    log::info!("Converting {} to {}", file.display(), format);
    transcoder.transcode_audio(file, &target, format, config.bitrate_kbps)?;

    if config.remove_intermediates {
        if target.is_file() {
            fs::remove_file(file)?;
        } else {
            log::warn!(
                "Converted file {} not found; keeping intermediate {}",
                target.display(),
                file.display()
            );
        }
    }

    Ok(Some(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AudioFormat;
    use crate::external::mocks::MockTranscoder;
    use crate::processing::load_metadata;

    const BLOB: &str = "\
;FFMETADATA1
album=Some Book
[CHAPTER]
TIMEBASE=1/1000
START=0
END=5000
title=Intro
[CHAPTER]
TIMEBASE=1/1000
START=5000
END=12000
title=Chapter One
";

    fn setup(transcoder: &MockTranscoder) -> (tempfile::TempDir, Metadata) {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("book.m4b");
        std::fs::File::create(&input).unwrap();
        transcoder.expect_metadata(&input, BLOB);
        let meta = load_metadata(transcoder, &input).unwrap();
        (dir, meta)
    }

    #[test]
    fn test_split_issues_expected_requests() {
        let transcoder = MockTranscoder::new();
        let (_dir, meta) = setup(&transcoder);

        let outcome = split_container(&transcoder, &CoreConfig::default(), &meta).unwrap();

        let requests = transcoder.segment_requests.borrow();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].start_secs, 0.0);
        assert_eq!(requests[0].end_secs, 5.0);
        assert_eq!(requests[0].title, "Intro");
        assert_eq!(requests[0].track, 1);
        assert_eq!(requests[1].start_secs, 5.0);
        assert_eq!(requests[1].end_secs, 12.0);
        assert_eq!(requests[1].track, 2);

        assert_eq!(transcoder.cover_requests.borrow().len(), 1);
        assert_eq!(outcome.cover.as_deref().unwrap().file_name().unwrap(), "cover.jpg");

        let names: Vec<String> = outcome
            .chapter_files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["1. Intro.m4b", "2. Chapter One.m4b"]);
        assert!(outcome.output_dir.ends_with("book_split"));
        assert!(outcome.converted_files.is_empty());
    }

    #[test]
    fn test_missing_cover_is_not_an_error() {
        let transcoder = MockTranscoder::new();
        transcoder.fail_cover.set(true);
        let (_dir, meta) = setup(&transcoder);

        let outcome = split_container(&transcoder, &CoreConfig::default(), &meta).unwrap();
        assert!(outcome.cover.is_none());
        assert_eq!(outcome.chapter_files.len(), 2);
    }

    #[test]
    fn test_extraction_failure_aborts_remaining_chapters() {
        let transcoder = MockTranscoder::new();
        transcoder.fail_extraction_at.set(Some(1));
        let (_dir, meta) = setup(&transcoder);

        let result = split_container(&transcoder, &CoreConfig::default(), &meta);
        assert!(matches!(result, Err(CoreError::CommandFailed { .. })));

        // First chapter was attempted and written; no cover request follows.
        assert_eq!(transcoder.segment_requests.borrow().len(), 2);
        assert!(transcoder.cover_requests.borrow().is_empty());
        let first = transcoder.segment_requests.borrow()[0].output.clone();
        assert!(first.is_file(), "already-written chapter is left on disk");
    }

    #[test]
    fn test_convert_after_split_removes_intermediates() {
        let transcoder = MockTranscoder::new();
        let (_dir, meta) = setup(&transcoder);

        let config = CoreConfig {
            convert_format: Some(AudioFormat::Mp3),
            bitrate_kbps: Some(128),
            convert_timing: ConvertTiming::AfterSplit,
            remove_intermediates: true,
        };
        let outcome = split_container(&transcoder, &config, &meta).unwrap();

        // All extractions happen before any conversion in this mode.
        let transcodes = transcoder.transcode_requests.borrow();
        assert_eq!(transcodes.len(), 2);
        assert_eq!(transcodes[0].2, AudioFormat::Mp3);
        assert_eq!(transcodes[0].3, Some(128));

        assert_eq!(outcome.converted_files.len(), 2);
        for converted in &outcome.converted_files {
            assert_eq!(converted.extension().unwrap(), "mp3");
            assert!(converted.is_file());
        }
        for intermediate in &outcome.chapter_files {
            assert!(!intermediate.exists(), "intermediate not deleted");
        }
    }

    #[test]
    fn test_convert_per_chapter_interleaves() {
        let transcoder = MockTranscoder::new();
        let (_dir, meta) = setup(&transcoder);

        let config = CoreConfig {
            convert_format: Some(AudioFormat::Opus),
            convert_timing: ConvertTiming::PerChapter,
            ..Default::default()
        };
        let outcome = split_container(&transcoder, &config, &meta).unwrap();

        assert_eq!(transcoder.transcode_requests.borrow().len(), 2);
        assert_eq!(outcome.converted_files.len(), 2);
        // No deletion requested, so intermediates remain.
        for intermediate in &outcome.chapter_files {
            assert!(intermediate.is_file());
        }
    }

    #[test]
    fn test_unbound_metadata_is_rejected() {
        let transcoder = MockTranscoder::new();
        let meta = Metadata::new();
        assert!(matches!(
            split_container(&transcoder, &CoreConfig::default(), &meta),
            Err(CoreError::PathError(_))
        ));
    }
}
