//! Chapter timeline construction for the merge path.
//!
//! Given an ordered set of source tracks with probed durations, computes a
//! contiguous, gapless chapter sequence by cumulative sum. The split path
//! needs no reconciliation: chapters parsed from a container already carry
//! explicit boundaries and are used as-is.

use crate::error::{CoreError, CoreResult};
use crate::metadata::{Chapter, Timebase};
use std::path::PathBuf;

/// One source media item destined to become a chapter.
///
/// The caller supplies items in the intended track order (usually after
/// sorting by an explicit track tag); the timeline builder never resorts.
#[derive(Debug, Clone)]
pub struct SourceTrack {
    pub path: PathBuf,
    /// Display title, copied verbatim into the chapter.
    pub title: String,
    /// Precise duration in milliseconds, if resolvable.
    pub duration_ms: Option<u64>,
}

/// Builds the chapter sequence for an ordered track set.
///
/// Chapter `i` starts where chapter `i-1` ended (the first at 0) and ends
/// `duration_ms` later, in the fixed 1/1000 timebase. Track numbers are
/// the 1-based position in the given order.
///
/// Any item without a resolvable, non-zero duration fails the whole set
/// with [`CoreError::MissingDuration`]; no partial sequence is returned.
/// A zero duration would yield a chapter with `end == start`, so it is
/// treated the same as an absent one.
pub fn build_timeline(items: &[SourceTrack]) -> CoreResult<Vec<Chapter>> {
    let mut chapters = Vec::with_capacity(items.len());
    let mut cursor: i64 = 0;

    for (i, item) in items.iter().enumerate() {
        let duration_ms = item
            .duration_ms
            .filter(|d| *d > 0)
            .ok_or_else(|| CoreError::MissingDuration(item.path.clone()))?;

        let start = cursor;
        let end = start + duration_ms as i64;
        chapters.push(Chapter {
            timebase: Timebase::MILLIS,
            start,
            end,
            title: item.title.clone(),
            track_number: (i + 1) as u32,
        });
        cursor = end;
    }

    Ok(chapters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn track(name: &str, duration_ms: Option<u64>) -> SourceTrack {
        SourceTrack {
            path: Path::new(name).to_path_buf(),
            title: name.to_string(),
            duration_ms,
        }
    }

    #[test]
    fn test_two_tracks() {
        let chapters =
            build_timeline(&[track("01.mp3", Some(60000)), track("02.mp3", Some(45000))]).unwrap();
        assert_eq!(chapters.len(), 2);
        assert_eq!(chapters[0].start, 0);
        assert_eq!(chapters[0].end, 60000);
        assert_eq!(chapters[1].start, 60000);
        assert_eq!(chapters[1].end, 105000);
        assert_eq!(chapters[0].timebase, Timebase::MILLIS);
    }

    #[test]
    fn test_contiguity_and_track_numbers() {
        let items: Vec<SourceTrack> = (0..8)
            .map(|i| track(&format!("{i}.mp3"), Some(1000 + i * 137)))
            .collect();
        let chapters = build_timeline(&items).unwrap();

        assert_eq!(chapters[0].start, 0);
        for i in 0..chapters.len() - 1 {
            assert_eq!(chapters[i].end, chapters[i + 1].start);
        }
        for (i, chapter) in chapters.iter().enumerate() {
            assert_eq!(chapter.track_number, (i + 1) as u32);
            assert!(chapter.end > chapter.start);
        }
    }

    #[test]
    fn test_titles_copied_verbatim() {
        let chapters = build_timeline(&[SourceTrack {
            path: Path::new("x.mp3").to_path_buf(),
            title: "  Chapter: One  ".to_string(),
            duration_ms: Some(10),
        }])
        .unwrap();
        assert_eq!(chapters[0].title, "  Chapter: One  ");
    }

    #[test]
    fn test_missing_duration_aborts_whole_set() {
        let result = build_timeline(&[
            track("a.mp3", Some(1000)),
            track("b.mp3", None),
            track("c.mp3", Some(1000)),
        ]);
        match result {
            Err(CoreError::MissingDuration(path)) => {
                assert_eq!(path, Path::new("b.mp3"));
            }
            other => panic!("expected MissingDuration, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_duration_rejected() {
        // end == start is never a valid chapter.
        let result = build_timeline(&[track("a.mp3", Some(1000)), track("b.mp3", Some(0))]);
        match result {
            Err(CoreError::MissingDuration(path)) => {
                assert_eq!(path, Path::new("b.mp3"));
            }
            other => panic!("expected MissingDuration, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_set() {
        assert!(build_timeline(&[]).unwrap().is_empty());
    }
}
