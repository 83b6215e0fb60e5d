//! Core library for splitting and assembling chaptered audiobook
//! containers using ffmpeg and ffprobe.
//!
//! This crate parses and writes the FFMETADATA text format, reconciles
//! chapter timelines, and drives the two workflows: splitting one
//! chaptered container into per-chapter files, and merging a directory of
//! audio files into one container with generated chapter markers.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use chapterize_core::{CoreConfig, FfmpegTranscoder, load_metadata, split_container};
//! use std::path::Path;
//!
//! let transcoder = FfmpegTranscoder::new();
//! let meta = load_metadata(&transcoder, Path::new("/books/book.m4b")).unwrap();
//! for chapter in meta.chapters() {
//!     println!("{} - {}", chapter.track_number, chapter.title);
//! }
//!
//! let outcome = split_container(&transcoder, &CoreConfig::default(), &meta).unwrap();
//! println!("wrote {} chapter file(s)", outcome.chapter_files.len());
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
pub mod metadata;
pub mod processing;
pub mod temp_files;
pub mod timeline;
pub mod utils;

// Re-exports for public API
pub use config::{AudioFormat, ConvertTiming, CoreConfig};
pub use discovery::find_audio_files;
pub use error::{CoreError, CoreResult};
pub use external::{
    FfmpegTranscoder, FfprobeTagReader, FilePropertyProvider, SegmentRequest, Transcoder,
    verify_dependencies,
};
pub use metadata::{Chapter, Metadata, Timebase};
pub use processing::{
    MergeOutcome, SplitOutcome, load_metadata, merge_directory, split_container,
};
pub use timeline::{SourceTrack, build_timeline};
pub use utils::{format_duration, sanitize_filename};
