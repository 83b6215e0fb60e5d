//! The `merge` command: a directory of audio files into one chaptered
//! container.

use chapterize_core::{
    CoreError, CoreResult, FfmpegTranscoder, FfprobeTagReader, merge_directory,
    verify_dependencies,
};
use clap::Args;
use console::style;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct MergeArgs {
    /// Directory of per-chapter audio files to combine; each file must
    /// carry a track tag
    #[arg(required = true, value_name = "INPUT_DIR")]
    pub input_dir: PathBuf,
}

pub fn run_merge(args: MergeArgs) -> CoreResult<()> {
    verify_dependencies()?;

    if !args.input_dir.is_dir() {
        return Err(CoreError::PathError(format!(
            "input directory not found: {}",
            args.input_dir.display()
        )));
    }

    let transcoder = FfmpegTranscoder::new();
    let properties = FfprobeTagReader::new();
    let outcome = merge_directory(&transcoder, &properties, &args.input_dir)?;

    println!(
        "{} {} chapter(s) into {}",
        style("Merged").green().bold(),
        outcome.chapter_count,
        outcome.output.display()
    );

    Ok(())
}
