use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::foundation::error::RavaResult;
use crate::foundation::fs::{has_extension, list_files_with_ext};
use crate::layout::paths::{ProjectLayout, Stage};

/// Raw source extensions picked up from `00_raw`.
pub const RAW_EXTENSIONS: [&str; 2] = ["tex", "txt"];

/// How a raw source turns into preprocessed text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RawKind {
    /// Block markup that goes through the extractor.
    Markup,
    /// Already one slide per line; copied verbatim.
    PlainText,
}

/// One discovered raw lyric source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawInput {
    /// Song name: the file name up to its first `.`.
    pub song: String,
    /// Path of the raw file.
    pub path: PathBuf,
    /// Preprocessing route.
    pub kind: RawKind,
}

/// Song name for a raw file name, or `None` for hidden or nameless files.
pub fn song_name(file_name: &str) -> Option<&str> {
    let stem = file_name.split('.').next().unwrap_or_default();
    if stem.is_empty() { None } else { Some(stem) }
}

/// List the project's raw sources, sorted by file name, one per song.
///
/// When two files map to the same song the first in sorted order wins.
pub fn discover(layout: &ProjectLayout) -> RavaResult<Vec<RawInput>> {
    let dir = layout.stage_dir(Stage::Raw);

    let mut paths = Vec::new();
    for ext in RAW_EXTENSIONS {
        paths.extend(list_files_with_ext(&dir, ext)?);
    }
    paths.sort();
    paths.dedup();

    let mut seen = BTreeSet::new();
    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            tracing::warn!("skipping raw file with non UTF-8 name: {}", path.display());
            continue;
        };
        let Some(song) = song_name(file_name) else {
            tracing::debug!("skipping hidden raw file {}", path.display());
            continue;
        };
        if !seen.insert(song.to_owned()) {
            tracing::warn!(
                "{song}: ignoring duplicate raw source {}, another file already provides this song",
                path.display()
            );
            continue;
        }

        let kind = if has_extension(&path, "txt") {
            RawKind::PlainText
        } else {
            RawKind::Markup
        };
        out.push(RawInput {
            song: song.to_owned(),
            path,
            kind,
        });
    }

    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/discover.rs"]
mod tests;
