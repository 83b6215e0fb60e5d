// chapterize-cli/src/commands/mod.rs
//
// Command implementations for the chapterize binary.

pub mod merge;
pub mod split;
