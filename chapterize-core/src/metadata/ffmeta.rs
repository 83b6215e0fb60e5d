//! FFMETADATA1 text codec.
//!
//! Parses the line-oriented metadata format that `ffmpeg -f ffmetadata`
//! emits and writes it back. The format: a `;FFMETADATA1` header line,
//! `key=value` tag lines (a line without `=` continues the previous
//! value), `;`-prefixed comments, then zero or more `[CHAPTER]` sections
//! each carrying TIMEBASE, START, END and a title line in that order.
//!
//! Parsing is a pure transform over the text. Chapter timelines coming
//! from external tools are taken at face value; contiguity is only ever
//! produced (and guaranteed) by the timeline builder, not re-validated
//! here.

use crate::error::{CoreError, CoreResult};
use crate::metadata::{Chapter, Metadata, Timebase};

/// Line that opens each chapter section.
const CHAPTER_MARKER: &str = "[CHAPTER]";

/// Header line identifying the format.
const HEADER: &str = ";FFMETADATA1";

/// Parses raw FFMETADATA1 text into a [`Metadata`].
///
/// With `require_chapters` set, input without a single `[CHAPTER]` marker
/// fails with [`CoreError::MalformedMetadata`]; otherwise a tags-only
/// parse is permitted.
///
/// Track numbers are assigned from section order (1-based), never read
/// from the text.
pub fn parse(raw: &str, require_chapters: bool) -> CoreResult<Metadata> {
    let lines: Vec<&str> = raw.lines().collect();
    let marker_index = lines.iter().position(|line| *line == CHAPTER_MARKER);

    let header_region = match marker_index {
        Some(index) => &lines[..index],
        None if require_chapters => {
            return Err(CoreError::MalformedMetadata(format!(
                "no {CHAPTER_MARKER} section found"
            )));
        }
        None => &lines[..],
    };

    let mut meta = Metadata::new();
    let mut current_key: Option<String> = None;

    for (offset, line) in header_region.iter().enumerate() {
        if line.starts_with(';') {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) => {
                let key = key.to_lowercase();
                meta.set_tag(&key, value);
                current_key = Some(key);
            }
            None => {
                let Some(key) = current_key.as_deref() else {
                    return Err(CoreError::DanglingContinuation {
                        line_number: offset + 1,
                        line: (*line).to_string(),
                    });
                };
                meta.append_to_tag(key, line);
            }
        }
    }

    if let Some(index) = marker_index {
        meta.set_chapters(parse_chapters(&lines[index..])?);
    }

    Ok(meta)
}

/// Splits the chapter region into per-marker chunks and decodes each one.
/// `region` starts at (and includes) the first marker line.
fn parse_chapters(region: &[&str]) -> CoreResult<Vec<Chapter>> {
    let mut chunks: Vec<Vec<&str>> = Vec::new();
    for line in region {
        if *line == CHAPTER_MARKER {
            chunks.push(Vec::new());
        } else if !line.trim().is_empty() {
            // Blank separator lines between sections carry nothing.
            if let Some(chunk) = chunks.last_mut() {
                chunk.push(line);
            }
        }
    }
    chunks.retain(|chunk| !chunk.is_empty());

    let mut chapters = Vec::with_capacity(chunks.len());
    for (i, chunk) in chunks.iter().enumerate() {
        let index = i + 1;
        chapters.push(parse_chapter(index, chunk)?);
    }
    Ok(chapters)
}

/// Decodes one chapter chunk: TIMEBASE, START, END, title, in that order.
fn parse_chapter(index: usize, chunk: &[&str]) -> CoreResult<Chapter> {
    if chunk.len() < 4 {
        return Err(CoreError::MalformedChapter {
            index,
            reason: format!("expected 4 fields, found {}", chunk.len()),
        });
    }

    let field = |pos: usize, name: &'static str| -> CoreResult<&str> {
        chunk[pos]
            .split_once('=')
            .map(|(_, value)| value)
            .ok_or_else(|| CoreError::MalformedChapter {
                index,
                reason: format!("{name} line has no '=': {:?}", chunk[pos]),
            })
    };

    let timebase_text = field(0, "TIMEBASE")?;
    let timebase: Timebase =
        timebase_text
            .parse()
            .map_err(|_| CoreError::InvalidTimestamp {
                index,
                field: "TIMEBASE",
                value: timebase_text.to_string(),
            })?;

    let start_text = field(1, "START")?;
    let start: i64 = start_text
        .parse()
        .map_err(|_| CoreError::InvalidTimestamp {
            index,
            field: "START",
            value: start_text.to_string(),
        })?;

    let end_text = field(2, "END")?;
    let end: i64 = end_text.parse().map_err(|_| CoreError::InvalidTimestamp {
        index,
        field: "END",
        value: end_text.to_string(),
    })?;

    let title = field(3, "TITLE")?.to_string();

    Ok(Chapter {
        timebase,
        start,
        end,
        title,
        track_number: index as u32,
    })
}

/// Serializes a [`Metadata`] to FFMETADATA1 text.
///
/// Round-trip contract: `parse(serialize(m), ..) == m` for any metadata
/// this codec produced (source path binding excluded; it never appears in
/// the text).
#[must_use]
pub fn serialize(meta: &Metadata) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');

    for (key, value) in meta.tags() {
        out.push_str(key);
        out.push('=');
        out.push_str(value);
        out.push('\n');
    }

    for chapter in meta.chapters() {
        out.push_str(CHAPTER_MARKER);
        out.push('\n');
        out.push_str(&format!("TIMEBASE={}\n", chapter.timebase));
        out.push_str(&format!("START={}\n", chapter.start));
        out.push_str(&format!("END={}\n", chapter.end));
        // ffmpeg's own ffmetadata muxer writes the chapter title with a
        // lower-case key; the parser is positional, so either spelling
        // round-trips.
        out.push_str(&format!("title={}\n", chapter.title));
    }

    out
}
