//! The `split` command: one chaptered container into per-chapter files.

use chapterize_core::{
    AudioFormat, ConvertTiming, CoreConfig, CoreError, CoreResult, FfmpegTranscoder,
    format_duration, load_metadata, split_container, verify_dependencies,
};
use clap::Args;
use console::style;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Chaptered container file to split (e.g. an .m4b audiobook)
    #[arg(required = true, value_name = "INPUT_FILE")]
    pub input: PathBuf,

    /// Convert extracted chapters to this format (mp3, aac, opus, flac)
    #[arg(short, long, value_name = "FORMAT")]
    pub convert: Option<AudioFormat>,

    /// Audio bitrate in kbps for the conversion step
    #[arg(short, long, value_name = "KBPS", requires = "convert")]
    pub bitrate: Option<u32>,

    /// Convert each chapter right after it is extracted instead of after
    /// the whole split
    #[arg(long, requires = "convert")]
    pub convert_each: bool,

    /// Delete each container-format chapter file once its converted
    /// counterpart exists
    #[arg(short, long, requires = "convert")]
    pub delete: bool,
}

pub fn run_split(args: SplitArgs) -> CoreResult<()> {
    verify_dependencies()?;

    if !args.input.is_file() {
        return Err(CoreError::PathError(format!(
            "input file not found: {}",
            args.input.display()
        )));
    }

    let transcoder = FfmpegTranscoder::new();
    let meta = load_metadata(&transcoder, &args.input)?;

    println!(
        "{}",
        style(format!("Chapters in {}:", args.input.display())).bold()
    );
    for chapter in meta.chapters() {
        let length = chapter.end_seconds() - chapter.start_seconds();
        println!(
            "  {:>3}. {} ({})",
            chapter.track_number,
            chapter.title,
            format_duration(length)
        );
    }
    println!();

    let config = CoreConfig {
        convert_format: args.convert,
        bitrate_kbps: args.bitrate,
        convert_timing: if args.convert_each {
            ConvertTiming::PerChapter
        } else {
            ConvertTiming::AfterSplit
        },
        remove_intermediates: args.delete,
    };

    let outcome = split_container(&transcoder, &config, &meta)?;

    println!(
        "{} {} chapter file(s) to {}",
        style("Wrote").green().bold(),
        outcome.chapter_files.len(),
        outcome.output_dir.display()
    );
    if let Some(cover) = &outcome.cover {
        println!("Cover art: {}", cover.display());
    }
    if let Some(format) = args.convert {
        println!(
            "Converted {} file(s) to {}",
            outcome.converted_files.len(),
            format
        );
    }

    Ok(())
}
