//! FFprobe-backed implementation of the [`FilePropertyProvider`] capability.
//!
//! Free-form container tags (track, album, artist, ...) come from
//! `ffprobe -print_format json -show_format`, deserialized into a small
//! serde model. Tag lookup is case-insensitive since containers disagree
//! about key casing (`track` vs `TRACK` vs `Track`).

use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::external::FilePropertyProvider;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::process::Command;

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    format: ProbeFormat,
}

#[derive(Debug, Deserialize)]
struct ProbeFormat {
    #[serde(default)]
    tags: HashMap<String, String>,
}

/// Production [`FilePropertyProvider`] shelling out to ffprobe.
#[derive(Debug, Clone, Default)]
pub struct FfprobeTagReader;

impl FfprobeTagReader {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn probe_tags(&self, path: &Path) -> CoreResult<HashMap<String, String>> {
        log::debug!("Running ffprobe for format tags on: {}", path.display());
        let output = Command::new("ffprobe")
            .args(["-v", "quiet", "-print_format", "json", "-show_format"])
            .arg(path)
            .output()
            .map_err(|e| command_start_error("ffprobe (format tags)", e))?;

        if !output.status.success() {
            return Err(command_failed_error(
                "ffprobe (format tags)",
                output.status,
                String::from_utf8_lossy(&output.stderr).into_owned(),
            ));
        }

        let probe: ProbeOutput = serde_json::from_slice(&output.stdout).map_err(|e| {
            CoreError::CommandFailed {
                tool: "ffprobe (format tags)".to_string(),
                status: None,
                stderr: format!("output deserialization: {e}"),
            }
        })?;

        Ok(probe.format.tags)
    }
}

impl FilePropertyProvider for FfprobeTagReader {
    fn get_property(&self, path: &Path, name: &str) -> CoreResult<Option<String>> {
        let tags = self.probe_tags(path)?;
        Ok(tags
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_output_deserialization() {
        let json = r#"{"format":{"filename":"01.mp3","tags":{"track":"3/12","Album":"X"}}}"#;
        let probe: ProbeOutput = serde_json::from_str(json).unwrap();
        assert_eq!(probe.format.tags.get("track").map(String::as_str), Some("3/12"));
        assert_eq!(probe.format.tags.get("Album").map(String::as_str), Some("X"));
    }

    #[test]
    fn test_probe_output_without_tags() {
        let json = r#"{"format":{"filename":"01.mp3"}}"#;
        let probe: ProbeOutput = serde_json::from_str(json).unwrap();
        assert!(probe.format.tags.is_empty());
    }
}
