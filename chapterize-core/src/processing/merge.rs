//! Merge workflow: a directory of per-chapter audio files into one
//! chaptered container.
//!
//! Files are ordered by their explicit `track` tag (never by filename
//! alone), durations are probed precisely per file (the container-level
//! length property is too coarse and is never consulted), the chapter
//! timeline is computed by cumulative sum, and the ordered files are
//! concatenated and remuxed with a generated FFMETADATA blob.
//!
//! On success the intermediate artifacts (`concat.txt`, `metadata.txt`,
//! the concatenated stream) are deleted. On failure they are deliberately
//! left in place so the external tool's failure can be diagnosed.

use crate::discovery::find_audio_files;
use crate::error::{CoreError, CoreResult};
use crate::external::{FilePropertyProvider, Transcoder};
use crate::metadata::{Metadata, tags};
use crate::timeline::{SourceTrack, build_timeline};
use crate::utils::sanitize_filename;
use std::fs;
use std::path::{Path, PathBuf};

/// Result of a completed merge.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    pub output: PathBuf,
    pub chapter_count: usize,
}

/// Merges the audio files in `input_dir` into one chaptered container
/// under the sibling directory `combined/{sanitized title}/`.
pub fn merge_directory<T: Transcoder, P: FilePropertyProvider>(
    transcoder: &T,
    properties: &P,
    input_dir: &Path,
) -> CoreResult<MergeOutcome> {
    let files = find_audio_files(input_dir)?;
    log::info!(
        "Merging {} file(s) from {}",
        files.len(),
        input_dir.display()
    );

    // Order by the explicit track tag; a missing or unparsable tag on any
    // file aborts the merge.
    let mut ordered: Vec<(u32, PathBuf)> = Vec::with_capacity(files.len());
    for file in files {
        let track = ordering_tag(properties, &file)?;
        ordered.push((track, file));
    }
    ordered.sort_by_key(|(track, _)| *track);

    // Precise durations, then the chapter timeline.
    let mut items = Vec::with_capacity(ordered.len());
    for (_, file) in &ordered {
        let duration_ms = transcoder.probe_duration(file)?;
        items.push(SourceTrack {
            path: file.clone(),
            title: track_title(properties, file)?,
            duration_ms: Some(duration_ms),
        });
    }
    let chapters = build_timeline(&items)?;
    let chapter_count = chapters.len();

    let meta = container_metadata(properties, &ordered[0].1, input_dir, chapters)?;
    let title = meta.display_title()?;
    let mut dir_name = sanitize_filename(&title);
    if dir_name.is_empty() {
        dir_name = "combined".to_string();
    }

    let output_dir = input_dir
        .parent()
        .unwrap_or(input_dir)
        .join("combined")
        .join(&dir_name);
    fs::create_dir_all(&output_dir)?;

    let metadata_path = output_dir.join("metadata.txt");
    fs::write(&metadata_path, meta.to_ffmetadata())?;

    let concat_path = output_dir.join("concat.txt");
    fs::write(&concat_path, concat_list(&ordered))?;

    let stream_extension = ordered[0]
        .1
        .extension()
        .map_or_else(|| "m4a".to_string(), |e| e.to_string_lossy().into_owned());
    let intermediate = output_dir.join(format!("combined_audio.{stream_extension}"));
    let output = output_dir.join(format!("{dir_name}.m4b"));

    // Failure from here on leaves metadata.txt/concat.txt/the intermediate
    // stream behind for diagnosis.
    transcoder.concat(&concat_path, &intermediate)?;
    transcoder.remux_with_metadata(&intermediate, &metadata_path, &output)?;

    fs::remove_file(&concat_path)?;
    fs::remove_file(&metadata_path)?;
    fs::remove_file(&intermediate)?;

    log::info!(
        "Merged {} chapter(s) into {}",
        chapter_count,
        output.display()
    );

    Ok(MergeOutcome {
        output,
        chapter_count,
    })
}

/// Reads the track/position tag. Accepts plain integers and `N/M` pair
/// values; anything else is as good as absent.
fn ordering_tag<P: FilePropertyProvider>(properties: &P, file: &Path) -> CoreResult<u32> {
    let value = properties
        .get_property(file, tags::TRACK)?
        .ok_or_else(|| CoreError::MissingOrderingTag(file.to_path_buf()))?;

    value
        .split('/')
        .next()
        .unwrap_or("")
        .trim()
        .parse::<u32>()
        .map_err(|_| CoreError::MissingOrderingTag(file.to_path_buf()))
}

/// Chapter title for one source file: its `title` tag, else the file stem.
fn track_title<P: FilePropertyProvider>(properties: &P, file: &Path) -> CoreResult<String> {
    if let Some(title) = properties
        .get_property(file, tags::TITLE)?
        .filter(|t| !t.trim().is_empty())
    {
        return Ok(title);
    }
    Ok(file
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "untitled".to_string()))
}

/// Builds the container-level metadata: album/artist tag set copied from
/// the first track where present, plus the computed chapter sequence.
fn container_metadata<P: FilePropertyProvider>(
    properties: &P,
    first_file: &Path,
    input_dir: &Path,
    chapters: Vec<crate::metadata::Chapter>,
) -> CoreResult<Metadata> {
    let mut meta = Metadata::new();

    for key in [
        tags::ALBUM,
        tags::ARTIST,
        tags::ALBUM_ARTIST,
        tags::GENRE,
        tags::DATE,
        tags::COMPOSER,
    ] {
        if let Some(value) = properties.get_property(first_file, key)? {
            meta.set_tag(key, value);
        }
    }

    // Container title: the album name, else the input directory's name.
    let title = match meta.tag(tags::ALBUM) {
        Some(album) => album.to_string(),
        None => input_dir
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "combined".to_string()),
    };
    meta.set_tag(tags::TITLE, title);

    meta.set_chapters(chapters);
    Ok(meta)
}

/// Concat-demuxer list: one `file '...'` line per input in track order.
/// Single quotes in paths are closed, escaped and reopened per the
/// demuxer's quoting rules.
fn concat_list(ordered: &[(u32, PathBuf)]) -> String {
    let mut out = String::new();
    for (_, path) in ordered {
        let escaped = path.to_string_lossy().replace('\'', "'\\''");
        out.push_str(&format!("file '{escaped}'\n"));
    }
    out
}
