//! Temporary file helpers.
//!
//! The metadata probe writes its FFMETADATA output to a short-lived file;
//! the path helper here gives it a collision-free name. Cleanup is the
//! caller's responsibility since the external tool, not this process,
//! creates the file.

use std::path::{Path, PathBuf};

/// Returns a temporary file path with a random suffix. Does not create
/// the file.
#[must_use]
pub fn create_temp_file_path(dir: &Path, prefix: &str, extension: &str) -> PathBuf {
    use rand::distributions::Alphanumeric;
    use rand::{Rng, thread_rng};

    let random_suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(char::from)
        .collect();

    let filename = format!("{prefix}_{random_suffix}.{extension}");
    dir.join(filename)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_temp_file_path() {
        let dir = std::env::temp_dir();
        let a = create_temp_file_path(&dir, "ffmeta", "txt");
        let b = create_temp_file_path(&dir, "ffmeta", "txt");
        assert_ne!(a, b);
        assert!(a.to_string_lossy().ends_with(".txt"));
        assert!(a.starts_with(&dir));
    }
}
