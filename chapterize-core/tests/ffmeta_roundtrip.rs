//! Integration tests exercising the public codec and timeline API
//! together, the way the merge orchestrator uses them.

use chapterize_core::{Metadata, SourceTrack, Timebase, build_timeline};
use std::path::Path;

#[test]
fn timeline_to_blob_to_metadata_round_trip() {
    let items = vec![
        SourceTrack {
            path: Path::new("01.mp3").to_path_buf(),
            title: "Intro".to_string(),
            duration_ms: Some(60000),
        },
        SourceTrack {
            path: Path::new("02.mp3").to_path_buf(),
            title: "Chapter One".to_string(),
            duration_ms: Some(45000),
        },
    ];

    let chapters = build_timeline(&items).unwrap();
    let mut meta = Metadata::new();
    meta.set_tag("album", "My Book");
    meta.set_tag("artist", "Someone");
    meta.set_chapters(chapters);

    let blob = meta.to_ffmetadata();
    let reparsed = Metadata::from_ffmetadata(&blob, true).unwrap();
    assert_eq!(reparsed, meta);

    let chapters = reparsed.chapters();
    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0].start, 0);
    assert_eq!(chapters[0].end, 60000);
    assert_eq!(chapters[1].start, 60000);
    assert_eq!(chapters[1].end, 105000);
    assert_eq!(chapters[0].timebase, Timebase::MILLIS);
    assert_eq!(chapters[1].track_number, 2);
}

#[test]
fn ffmpeg_style_probe_output_parses() {
    // Shaped like actual `ffmpeg -f ffmetadata` output for an m4b, with
    // the encoder comment line ffmpeg appends after the chapter title.
    let raw = "\
;FFMETADATA1
major_brand=M4A
minor_version=512
compatible_brands=M4A isomiso2
title=The Book
artist=The Author
album=The Book
genre=Audiobook
date=2021
encoder=Lavf59.27.100
[CHAPTER]
TIMEBASE=1/1000
START=0
END=1047000
title=Opening Credits
[CHAPTER]
TIMEBASE=1/1000
START=1047000
END=2211000
title=Part 1
";
    let meta = Metadata::from_ffmetadata(raw, true).unwrap();
    assert_eq!(meta.tag("major_brand"), Some("M4A"));
    assert_eq!(meta.tag("compatible_brands"), Some("M4A isomiso2"));
    assert_eq!(meta.tag("genre"), Some("Audiobook"));
    assert_eq!(meta.chapters().len(), 2);
    assert_eq!(meta.chapters()[1].start, 1047000);
    assert_eq!(meta.chapters()[1].title, "Part 1");
    assert_eq!(meta.display_title().unwrap(), "The Book");
}
