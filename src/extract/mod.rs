//! Stage 0 -> 1: raw lyric markup to slide-line records.

/// Block markup parsing.
pub mod markup;
/// Preprocessed text format.
pub mod preprocessed;
/// Slide-line record type.
pub mod record;
