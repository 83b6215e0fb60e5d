//! In-memory model of a chaptered container's metadata.
//!
//! `Metadata` holds the file-level tag mapping and the ordered chapter
//! sequence extracted from (or destined for) an FFMETADATA stream. It is a
//! plain value holder: the codec and the timeline builder are responsible
//! for the invariants (lower-cased keys, contiguous gapless chapters,
//! positional track numbers). Hand-constructing an inconsistent `Metadata`
//! bypasses that enforcement; nothing here detects it.

pub mod ffmeta;

use crate::error::{CoreError, CoreResult};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Recognized file-level tag keys. Unknown keys round-trip through the tag
/// mapping just the same; these constants only exist so callers don't
/// scatter string literals.
pub mod tags {
    pub const MAJOR_BRAND: &str = "major_brand";
    pub const MINOR_VERSION: &str = "minor_version";
    pub const COMPATIBLE_BRANDS: &str = "compatible_brands";
    pub const DISC: &str = "disc";
    pub const GENRE: &str = "genre";
    pub const DATE: &str = "date";
    pub const ALBUM: &str = "album";
    pub const PUBLISHER: &str = "publisher";
    pub const COMPOSER: &str = "composer";
    pub const COMMENT: &str = "comment";
    pub const ARTIST: &str = "artist";
    pub const ALBUM_ARTIST: &str = "album_artist";
    pub const ENCODER: &str = "encoder";
    pub const TITLE: &str = "title";
    pub const TRACK: &str = "track";
}

/// A unit fraction mapping integer chapter ticks to seconds (e.g. 1/1000).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timebase {
    pub num: u32,
    pub den: u32,
}

impl Timebase {
    /// Millisecond timebase, used for all timelines this crate computes.
    pub const MILLIS: Timebase = Timebase { num: 1, den: 1000 };

    /// Converts a tick count in this timebase to seconds.
    #[must_use]
    pub fn ticks_to_seconds(self, ticks: i64) -> f64 {
        ticks as f64 * f64::from(self.num) / f64::from(self.den)
    }
}

impl fmt::Display for Timebase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

impl FromStr for Timebase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (num, den) = s
            .split_once('/')
            .ok_or_else(|| format!("timebase '{s}' is not of the form N/D"))?;
        let num: u32 = num
            .trim()
            .parse()
            .map_err(|_| format!("timebase numerator '{num}' is not an integer"))?;
        let den: u32 = den
            .trim()
            .parse()
            .map_err(|_| format!("timebase denominator '{den}' is not an integer"))?;
        if den == 0 {
            return Err(format!("timebase '{s}' has a zero denominator"));
        }
        Ok(Timebase { num, den })
    }
}

/// One addressable segment of the container's timeline.
///
/// `start` is inclusive, `end` exclusive, both in `timebase` ticks.
/// `track_number` is always the 1-based position in the owning sequence,
/// assigned by the producer; it is never read from source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub timebase: Timebase,
    pub start: i64,
    pub end: i64,
    pub title: String,
    pub track_number: u32,
}

impl Chapter {
    /// Chapter start offset in seconds.
    #[must_use]
    pub fn start_seconds(&self) -> f64 {
        self.timebase.ticks_to_seconds(self.start)
    }

    /// Chapter end offset in seconds.
    #[must_use]
    pub fn end_seconds(&self) -> f64 {
        self.timebase.ticks_to_seconds(self.end)
    }
}

/// File-level tags plus the ordered chapter sequence of one container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Path of the container this metadata was read from, once bound.
    pub source_path: Option<PathBuf>,
    tags: BTreeMap<String, String>,
    chapters: Vec<Chapter>,
}

impl Metadata {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses FFMETADATA1 text. See [`ffmeta::parse`].
    pub fn from_ffmetadata(raw: &str, require_chapters: bool) -> CoreResult<Self> {
        ffmeta::parse(raw, require_chapters)
    }

    /// Serializes back to FFMETADATA1 text. See [`ffmeta::serialize`].
    #[must_use]
    pub fn to_ffmetadata(&self) -> String {
        ffmeta::serialize(self)
    }

    /// Looks up a tag value. Keys are case-insensitive.
    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Sets a tag value, storing the key canonically lower-cased.
    /// A repeated key overwrites the previous value.
    pub fn set_tag(&mut self, key: &str, value: impl Into<String>) {
        self.tags.insert(key.to_lowercase(), value.into());
    }

    /// Appends text to an existing tag value (multi-line continuation).
    /// Returns false if the key is not present.
    pub fn append_to_tag(&mut self, key: &str, more: &str) -> bool {
        match self.tags.get_mut(&key.to_lowercase()) {
            Some(value) => {
                value.push_str(more);
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn tags(&self) -> &BTreeMap<String, String> {
        &self.tags
    }

    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Replaces the chapter sequence. The caller guarantees the sequence
    /// invariants (contiguity, positional track numbers).
    pub fn set_chapters(&mut self, chapters: Vec<Chapter>) {
        self.chapters = chapters;
    }

    /// Display title for the container: the `title` tag, falling back to
    /// the `album` tag, then the source file stem.
    pub fn display_title(&self) -> CoreResult<String> {
        if let Some(title) = self.tag(tags::TITLE).or_else(|| self.tag(tags::ALBUM)) {
            return Ok(title.to_string());
        }
        let path = self.source_path.as_deref().ok_or_else(|| {
            CoreError::MalformedMetadata("no title, album or source path available".to_string())
        })?;
        Ok(path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "untitled".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_timebase_parse_and_display() {
        let tb: Timebase = "1/1000".parse().unwrap();
        assert_eq!(tb, Timebase::MILLIS);
        assert_eq!(tb.to_string(), "1/1000");
        assert_eq!("1/90000".parse::<Timebase>().unwrap().den, 90000);

        assert!("1000".parse::<Timebase>().is_err());
        assert!("a/b".parse::<Timebase>().is_err());
        assert!("1/0".parse::<Timebase>().is_err());
    }

    #[test]
    fn test_ticks_to_seconds() {
        assert_eq!(Timebase::MILLIS.ticks_to_seconds(5000), 5.0);
        assert_eq!(Timebase::MILLIS.ticks_to_seconds(0), 0.0);
        let tb = Timebase { num: 1, den: 10 };
        assert_eq!(tb.ticks_to_seconds(25), 2.5);
    }

    #[test]
    fn test_tag_keys_case_insensitive() {
        let mut meta = Metadata::new();
        meta.set_tag("Artist", "Someone");
        assert_eq!(meta.tag("artist"), Some("Someone"));
        assert_eq!(meta.tag("ARTIST"), Some("Someone"));

        // Last write wins.
        meta.set_tag("ARTIST", "Someone Else");
        assert_eq!(meta.tag("artist"), Some("Someone Else"));
        assert_eq!(meta.tags().len(), 1);
    }

    #[test]
    fn test_append_to_tag() {
        let mut meta = Metadata::new();
        assert!(!meta.append_to_tag("comment", "more"));
        meta.set_tag("comment", "a");
        assert!(meta.append_to_tag("comment", "b"));
        assert_eq!(meta.tag("comment"), Some("ab"));
    }

    #[test]
    fn test_display_title_fallbacks() {
        let mut meta = Metadata::new();
        assert!(meta.display_title().is_err());

        meta.source_path = Some(Path::new("/books/My Book.m4b").to_path_buf());
        assert_eq!(meta.display_title().unwrap(), "My Book");

        meta.set_tag("album", "Album Name");
        assert_eq!(meta.display_title().unwrap(), "Album Name");

        meta.set_tag("title", "Title Name");
        assert_eq!(meta.display_title().unwrap(), "Title Name");
    }
}
