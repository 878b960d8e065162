use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::catalog::discover::RawInput;

/// Folder under the project root that holds every stage directory.
pub const LYRICS_DIR: &str = "lyrics";
/// Extension of stage-1 preprocessed text files.
pub const PREPROCESSED_EXT: &str = "txt";
/// Extension of stage-2 deck files.
pub const DECK_EXT: &str = "json";
/// Extension of stage-3 slide images.
pub const IMAGE_EXT: &str = "png";
/// Optional per-project configuration file, relative to the project root.
pub const CONFIG_FILE: &str = "rava.json";
/// Optional per-project font folder, relative to the project root.
pub const FONTS_DIR: &str = "fonts";

/// One of the four pipeline stages, in dependency order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Raw lyric sources as authored (`00_raw`).
    Raw,
    /// One slide per line plain text (`01_preprocessed`).
    Preprocessed,
    /// Styled slide deck (`02_pptx`).
    Deck,
    /// Rasterized slide images, one folder per song (`03_png`).
    Images,
}

impl Stage {
    /// Directory name of this stage under `<project>/lyrics/`.
    ///
    /// These names are relied on by show-control tooling and must not change.
    pub fn dir_name(self) -> &'static str {
        match self {
            Stage::Raw => "00_raw",
            Stage::Preprocessed => "01_preprocessed",
            Stage::Deck => "02_pptx",
            Stage::Images => "03_png",
        }
    }

    /// Two-digit label used in log lines (`00`, `01`, ...).
    pub fn label(self) -> &'static str {
        &self.dir_name()[..2]
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Deterministic path derivation for one project folder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectLayout {
    root: PathBuf,
}

impl ProjectLayout {
    /// Layout rooted at `root` (the `--project` folder).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The project folder itself.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<project>/lyrics/<NN_stage>`.
    pub fn stage_dir(&self, stage: Stage) -> PathBuf {
        self.root.join(LYRICS_DIR).join(stage.dir_name())
    }

    /// `<project>/rava.json`.
    pub fn config_path(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    /// `<project>/fonts`.
    pub fn fonts_dir(&self) -> PathBuf {
        self.root.join(FONTS_DIR)
    }

    /// Every artifact path of one discovered song.
    ///
    /// Raw sources keep whatever extension they were authored with, so the raw path comes from
    /// discovery; the derived stages are fixed by `(root, stage, song)`.
    pub fn song_paths(&self, input: &RawInput) -> SongPaths {
        let song = input.song.as_str();
        let stage_dir = |stage: Stage, file: String| self.stage_dir(stage).join(file);
        SongPaths {
            song: input.song.clone(),
            raw: input.path.clone(),
            preprocessed: stage_dir(Stage::Preprocessed, format!("{song}.{PREPROCESSED_EXT}")),
            deck: stage_dir(Stage::Deck, format!("{song}.{DECK_EXT}")),
            images: stage_dir(Stage::Images, song.to_owned()),
        }
    }
}

/// Typed artifact paths of one song, one per stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongPaths {
    /// Song name.
    pub song: String,
    /// `00_raw/<song>.<ext>`
    pub raw: PathBuf,
    /// `01_preprocessed/<song>.txt`
    pub preprocessed: PathBuf,
    /// `02_pptx/<song>.json`
    pub deck: PathBuf,
    /// `03_png/<song>/` (directory)
    pub images: PathBuf,
}

/// File name of the `ordinal`-th (1-based) image of `song`: `<song><NN>.png`.
pub fn image_file_name(song: &str, ordinal: usize) -> String {
    format!("{song}{ordinal:02}.{IMAGE_EXT}")
}

#[cfg(test)]
#[path = "../../tests/unit/layout/paths.rs"]
mod tests;
