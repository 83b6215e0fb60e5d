// Mocking infrastructure for testing the orchestrators without ffmpeg.
//
// Compiled for unit tests and for downstream suites via the "test-mocks"
// feature. The transcoder mock records every request it receives and
// creates dummy output files so filesystem-dependent logic (intermediate
// deletion, cleanup) can run against a tempdir.
#![cfg(any(test, feature = "test-mocks"))]

use crate::config::AudioFormat;
use crate::error::{CoreError, CoreResult};
use crate::external::{FilePropertyProvider, SegmentRequest, Transcoder};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

fn create_dummy_output(path: &Path) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::File::create(path)?;
    Ok(())
}

fn mock_failure(tool: &str) -> CoreError {
    CoreError::CommandFailed {
        tool: tool.to_string(),
        status: Some(1),
        stderr: "mock failure".to_string(),
    }
}

/// Mock [`Transcoder`] recording all calls.
#[derive(Default)]
pub struct MockTranscoder {
    metadata_by_path: RefCell<HashMap<PathBuf, String>>,
    duration_by_path: RefCell<HashMap<PathBuf, u64>>,

    pub segment_requests: RefCell<Vec<SegmentRequest>>,
    pub cover_requests: RefCell<Vec<(PathBuf, PathBuf)>>,
    pub transcode_requests: RefCell<Vec<(PathBuf, PathBuf, AudioFormat, Option<u32>)>>,
    pub concat_requests: RefCell<Vec<(PathBuf, PathBuf)>>,
    pub remux_requests: RefCell<Vec<(PathBuf, PathBuf, PathBuf)>>,
    /// Content of the metadata file at the moment of each remux call,
    /// captured before the orchestrator deletes it.
    pub remux_metadata_blobs: RefCell<Vec<String>>,

    /// Fail the Nth segment extraction (0-based) and every one after it.
    pub fail_extraction_at: Cell<Option<usize>>,
    pub fail_cover: Cell<bool>,
    pub fail_concat: Cell<bool>,
    pub fail_remux: Cell<bool>,
}

impl MockTranscoder {
    #[must_use]
    pub fn new() -> Self {
        Default::default()
    }

    pub fn expect_metadata(&self, path: &Path, text: &str) {
        self.metadata_by_path
            .borrow_mut()
            .insert(path.to_path_buf(), text.to_string());
    }

    pub fn expect_duration(&self, path: &Path, duration_ms: u64) {
        self.duration_by_path
            .borrow_mut()
            .insert(path.to_path_buf(), duration_ms);
    }
}

impl Transcoder for MockTranscoder {
    fn probe_metadata(&self, input: &Path) -> CoreResult<String> {
        self.metadata_by_path
            .borrow()
            .get(input)
            .cloned()
            .ok_or_else(|| mock_failure("mock probe_metadata (no expectation)"))
    }

    fn probe_duration(&self, input: &Path) -> CoreResult<u64> {
        self.duration_by_path
            .borrow()
            .get(input)
            .copied()
            .ok_or_else(|| CoreError::MissingDuration(input.to_path_buf()))
    }

    fn extract_segment(&self, request: &SegmentRequest) -> CoreResult<()> {
        let index = self.segment_requests.borrow().len();
        self.segment_requests.borrow_mut().push(request.clone());
        if self
            .fail_extraction_at
            .get()
            .is_some_and(|at| index >= at)
        {
            return Err(mock_failure("mock extract_segment"));
        }
        create_dummy_output(&request.output)
    }

    fn extract_cover(&self, input: &Path, output: &Path) -> CoreResult<()> {
        self.cover_requests
            .borrow_mut()
            .push((input.to_path_buf(), output.to_path_buf()));
        if self.fail_cover.get() {
            return Err(mock_failure("mock extract_cover"));
        }
        create_dummy_output(output)
    }

    fn transcode_audio(
        &self,
        input: &Path,
        output: &Path,
        format: AudioFormat,
        bitrate_kbps: Option<u32>,
    ) -> CoreResult<()> {
        self.transcode_requests.borrow_mut().push((
            input.to_path_buf(),
            output.to_path_buf(),
            format,
            bitrate_kbps,
        ));
        create_dummy_output(output)
    }

    fn concat(&self, list_file: &Path, output: &Path) -> CoreResult<()> {
        self.concat_requests
            .borrow_mut()
            .push((list_file.to_path_buf(), output.to_path_buf()));
        if self.fail_concat.get() {
            return Err(mock_failure("mock concat"));
        }
        create_dummy_output(output)
    }

    fn remux_with_metadata(&self, audio: &Path, metadata: &Path, output: &Path) -> CoreResult<()> {
        self.remux_requests.borrow_mut().push((
            audio.to_path_buf(),
            metadata.to_path_buf(),
            output.to_path_buf(),
        ));
        if let Ok(blob) = fs::read_to_string(metadata) {
            self.remux_metadata_blobs.borrow_mut().push(blob);
        }
        if self.fail_remux.get() {
            return Err(mock_failure("mock remux_with_metadata"));
        }
        create_dummy_output(output)
    }
}

/// Mock [`FilePropertyProvider`] backed by an in-memory map.
#[derive(Default)]
pub struct MockPropertyProvider {
    properties: RefCell<HashMap<(PathBuf, String), String>>,
}

impl MockPropertyProvider {
    #[must_use]
    pub fn new() -> Self {
        Default::default()
    }

    pub fn set_property(&self, path: &Path, name: &str, value: &str) {
        self.properties
            .borrow_mut()
            .insert((path.to_path_buf(), name.to_lowercase()), value.to_string());
    }
}

impl FilePropertyProvider for MockPropertyProvider {
    fn get_property(&self, path: &Path, name: &str) -> CoreResult<Option<String>> {
        Ok(self
            .properties
            .borrow()
            .get(&(path.to_path_buf(), name.to_lowercase()))
            .cloned())
    }
}
