use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::SystemTime;

use anyhow::Context as _;

use crate::foundation::error::{RavaError, RavaResult};
use crate::foundation::fs::{list_files_with_ext, modified_time};
use crate::layout::paths::IMAGE_EXT;
use crate::raster::{Rasterizer, deck_song};

/// Rasterizer that runs an external converter to completion.
///
/// `argv` is the program followed by its arguments. `{deck}`, `{out_dir}` and `{song}` are
/// substituted in every element. The converter must write `<song><NN>.png` files into `{out_dir}`.
#[derive(Clone, Debug)]
pub struct CommandRasterizer {
    argv: Vec<String>,
}

impl CommandRasterizer {
    /// Wrap a converter command line.
    pub fn new(argv: Vec<String>) -> RavaResult<Self> {
        if argv.first().is_none_or(|p| p.trim().is_empty()) {
            return Err(RavaError::config(
                "rasterizer command must name a program",
            ));
        }
        Ok(Self { argv })
    }

    fn expand(arg: &str, deck: &Path, out_dir: &Path, song: &str) -> String {
        arg.replace("{deck}", &deck.to_string_lossy())
            .replace("{out_dir}", &out_dir.to_string_lossy())
            .replace("{song}", song)
    }
}

impl Rasterizer for CommandRasterizer {
    fn rasterize(&self, deck_path: &Path, out_dir: &Path) -> RavaResult<Vec<PathBuf>> {
        let song = deck_song(deck_path)?;
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("create image folder '{}'", out_dir.display()))?;
        let before = snapshot(out_dir)?;

        let mut args = self
            .argv
            .iter()
            .map(|a| Self::expand(a, deck_path, out_dir, &song));
        let program = args
            .next()
            .ok_or_else(|| RavaError::rasterization("empty rasterizer command"))?;

        let out = Command::new(&program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                RavaError::rasterization(format!(
                    "failed to spawn '{program}' (is it installed and on PATH?): {e}"
                ))
            })?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(RavaError::rasterization(format!(
                "'{program}' exited with status {}: {}",
                out.status,
                stderr.trim()
            )));
        }

        let after = snapshot(out_dir)?;
        let written: Vec<PathBuf> = after
            .into_iter()
            .filter(|(path, t)| before.get(path) != Some(t))
            .map(|(path, _)| path)
            .collect();
        if written.is_empty() {
            return Err(RavaError::rasterization(format!(
                "'{program}' finished but wrote no .{IMAGE_EXT} files to '{}'",
                out_dir.display()
            )));
        }
        Ok(written)
    }
}

/// Image files in `dir` with their current mtimes.
fn snapshot(dir: &Path) -> RavaResult<BTreeMap<PathBuf, SystemTime>> {
    let mut out = BTreeMap::new();
    for path in list_files_with_ext(dir, IMAGE_EXT)? {
        if let Some(t) = modified_time(&path)? {
            out.insert(path, t);
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/command.rs"]
mod tests;
