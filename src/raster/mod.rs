//! Stage 2 -> 3: the rasterizer collaborator.
//!
//! A rasterizer turns one deck into one image per slide inside a song's image folder. It is a
//! synchronous, whole-deck call with no partial results.

use std::path::{Path, PathBuf};

use crate::foundation::error::{RavaError, RavaResult};

/// External converter shelled out to through a command line.
pub mod command;
/// Built-in SVG renderer (`usvg` + `resvg`).
pub mod svg;

/// Rasterizer collaborator: deck file in, slide images out.
pub trait Rasterizer {
    /// Render `deck_path` into `out_dir`, one image per slide named `<song><NN>.png`, and return
    /// the paths it wrote.
    fn rasterize(&self, deck_path: &Path, out_dir: &Path) -> RavaResult<Vec<PathBuf>>;
}

/// Song name of a deck file (`02_pptx/<song>.json` -> `<song>`).
pub(crate) fn deck_song(deck_path: &Path) -> RavaResult<String> {
    deck_path
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| {
            RavaError::rasterization(format!(
                "cannot derive a song name from deck path '{}'",
                deck_path.display()
            ))
        })
}
