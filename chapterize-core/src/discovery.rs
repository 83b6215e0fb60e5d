//! File discovery for the merge path.
//!
//! Scans the top level of a directory for audio files by extension. No
//! recursion; ordering by track tag happens later in the merge
//! orchestrator, but the scan result is name-sorted so behavior is
//! deterministic when tags tie or are being diagnosed.

use crate::error::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Audio extensions eligible for merging (case-insensitive).
const AUDIO_EXTENSIONS: &[&str] = &["m4b", "m4a", "mp3", "flac", "ogg", "opus", "wav"];

/// Finds audio files eligible for merging in the specified directory.
///
/// Returns `Err(CoreError::NoFilesFound)` if the directory holds none.
pub fn find_audio_files(input_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let read_dir = std::fs::read_dir(input_dir)?;
    let mut files: Vec<PathBuf> = read_dir
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let path = entry.path();

            if !path.is_file() {
                return None;
            }

            path.extension()
                .and_then(|ext| ext.to_str())
                .filter(|ext_str| {
                    AUDIO_EXTENSIONS
                        .iter()
                        .any(|known| ext_str.eq_ignore_ascii_case(known))
                })
                .map(|_| path.clone())
        })
        .collect();

    if files.is_empty() {
        return Err(CoreError::NoFilesFound);
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;

    #[test]
    fn test_finds_only_audio_files() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["02.mp3", "01.MP3", "cover.jpg", "notes.txt", "a.flac"] {
            File::create(dir.path().join(name)).unwrap();
        }
        std::fs::create_dir(dir.path().join("sub.mp3")).unwrap();

        let files = find_audio_files(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["01.MP3", "02.mp3", "a.flac"]);
    }

    #[test]
    fn test_empty_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            find_audio_files(dir.path()),
            Err(CoreError::NoFilesFound)
        ));
    }
}
