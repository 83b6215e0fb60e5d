//! Split/merge orchestration.
//!
//! Both workflows are strictly sequential: one external-tool invocation
//! at a time, each blocking until the child process exits. The first
//! failure aborts the run; nothing is retried.

pub mod merge;
pub mod split;

pub use merge::{MergeOutcome, merge_directory};
pub use split::{SplitOutcome, split_container};

use crate::error::CoreResult;
use crate::external::Transcoder;
use crate::metadata::Metadata;
use std::path::Path;

/// Probes a container's metadata and parses it, binding the source path.
///
/// Containers without chapters are rejected; splitting needs at least one
/// chapter to act on.
pub fn load_metadata<T: Transcoder>(transcoder: &T, input: &Path) -> CoreResult<Metadata> {
    log::debug!("Loading metadata from {}", input.display());
    let raw = transcoder.probe_metadata(input)?;
    let mut meta = Metadata::from_ffmetadata(&raw, true)?;
    meta.source_path = Some(input.to_path_buf());
    Ok(meta)
}
