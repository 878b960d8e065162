use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::deck::style::DeckStyle;
use crate::extract::markup::MarkupSyntax;
use crate::foundation::error::{RavaError, RavaResult};
use crate::layout::paths::ProjectLayout;

/// Which rasterizer turns decks into images.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterizerConfig {
    /// In-process SVG renderer.
    #[default]
    Builtin,
    /// External converter command line (`{deck}`, `{out_dir}`, `{song}` are substituted).
    Command(Vec<String>),
}

/// Contents of `<project>/rava.json`. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Raw lyric markup tokens.
    pub markup: MarkupSyntax,
    /// Deck styling.
    pub style: DeckStyle,
    /// Rasterizer selection.
    pub rasterizer: RasterizerConfig,
}

impl ProjectConfig {
    /// Parse a config from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> RavaResult<Self> {
        let cfg: ProjectConfig = serde_json::from_reader(r)
            .map_err(|e| RavaError::config(format!("parse project config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a config file, or return defaults when it does not exist.
    pub fn load_or_default(path: &Path) -> RavaResult<Self> {
        let f = match File::open(path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(RavaError::config(format!(
                    "open project config '{}': {e}",
                    path.display()
                )));
            }
        };
        Self::from_reader(BufReader::new(f))
    }

    /// Check every section.
    pub fn validate(&self) -> RavaResult<()> {
        self.markup.validate()?;
        self.style.validate()?;
        if let RasterizerConfig::Command(argv) = &self.rasterizer
            && argv.first().is_none_or(|p| p.trim().is_empty())
        {
            return Err(RavaError::config("rasterizer.command must name a program"));
        }
        Ok(())
    }
}

/// An opened project folder: its layout plus its configuration.
#[derive(Clone, Debug)]
pub struct Project {
    /// Path derivation for the project.
    pub layout: ProjectLayout,
    /// Loaded `rava.json` (or defaults).
    pub config: ProjectConfig,
}

impl Project {
    /// Open the project at `root`.
    ///
    /// Fails with [`RavaError::Precondition`] when the folder is missing or the config is invalid.
    pub fn open(root: impl AsRef<Path>) -> RavaResult<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(RavaError::precondition(format!(
                "the folder '{}' does not exist; create it from the project template and populate lyrics/00_raw/",
                root.display()
            )));
        }
        let layout = ProjectLayout::new(root);
        let config = ProjectConfig::load_or_default(&layout.config_path())
            .map_err(|e| RavaError::precondition(e.to_string()))?;
        Ok(Self { layout, config })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/project.rs"]
mod tests;
