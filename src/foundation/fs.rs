use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use anyhow::Context as _;

use crate::foundation::error::{RavaError, RavaResult};

/// Steps tried, in order, when an artifact has to be pushed past its upstream's mtime.
///
/// The larger steps cover filesystems that store timestamps at 1 s or 2 s resolution.
const FRESHNESS_NUDGES: [Duration; 3] = [
    Duration::from_millis(1),
    Duration::from_secs(1),
    Duration::from_secs(2),
];

/// Last-modification time of `path`, or `None` when nothing exists there.
pub fn modified_time(path: &Path) -> RavaResult<Option<SystemTime>> {
    match fs::metadata(path) {
        Ok(meta) => {
            let t = meta
                .modified()
                .with_context(|| format!("read mtime of '{}'", path.display()))?;
            Ok(Some(t))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(RavaError::from(
            anyhow::Error::new(e).context(format!("stat '{}'", path.display())),
        )),
    }
}

/// Overwrite the mtime of an existing file.
pub fn set_modified_time(path: &Path, t: SystemTime) -> RavaResult<()> {
    let f = fs::File::options()
        .write(true)
        .open(path)
        .with_context(|| format!("open '{}' to set mtime", path.display()))?;
    f.set_modified(t)
        .with_context(|| format!("set mtime of '{}'", path.display()))?;
    Ok(())
}

/// Make sure `path` is strictly newer than `upstream` and return its final mtime.
///
/// Two writes inside the same filesystem clock tick share an mtime, which the strict freshness
/// comparison would read as stale on the next run.
pub fn ensure_newer_than(path: &Path, upstream: SystemTime) -> RavaResult<SystemTime> {
    let mut current = modified_time(path)?
        .ok_or_else(|| anyhow::anyhow!("artifact '{}' vanished after write", path.display()))?;
    if current > upstream {
        return Ok(current);
    }

    for step in FRESHNESS_NUDGES {
        set_modified_time(path, upstream + step)?;
        current = modified_time(path)?.unwrap_or(upstream);
        if current > upstream {
            return Ok(current);
        }
    }

    Err(RavaError::from(anyhow::anyhow!(
        "could not make '{}' newer than its source",
        path.display()
    )))
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> RavaResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Delete `dir` with everything in it (if present) and create it again empty.
pub fn reset_dir(dir: &Path) -> RavaResult<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => {
            return Err(RavaError::from(
                anyhow::Error::new(e).context(format!("remove '{}'", dir.display())),
            ));
        }
    }
    fs::create_dir_all(dir).with_context(|| format!("create '{}'", dir.display()))?;
    Ok(())
}

/// Write `bytes` to `path` through a sibling temp file and a rename.
///
/// Readers either see the previous file or the complete new one, never a truncated write.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> RavaResult<()> {
    ensure_parent_dir(path)?;
    let tmp = temp_sibling(path);
    if let Err(e) = fs::write(&tmp, bytes) {
        let _ = fs::remove_file(&tmp);
        return Err(RavaError::from(
            anyhow::Error::new(e).context(format!("write '{}'", tmp.display())),
        ));
    }
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(RavaError::from(anyhow::Error::new(e).context(format!(
            "move '{}' into place at '{}'",
            tmp.display(),
            path.display()
        ))));
    }
    Ok(())
}

/// Regular files directly inside `dir` whose extension matches `ext` (case-insensitive).
///
/// A missing directory yields an empty list. Results are sorted by path.
pub fn list_files_with_ext(dir: &Path, ext: &str) -> RavaResult<Vec<PathBuf>> {
    let rd = match fs::read_dir(dir) {
        Ok(rd) => rd,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(RavaError::from(
                anyhow::Error::new(e).context(format!("list '{}'", dir.display())),
            ));
        }
    };

    let mut out = Vec::new();
    for entry in rd {
        let entry = entry.with_context(|| format!("list '{}'", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if has_extension(&path, ext) {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Case-insensitive extension check.
pub fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/fs.rs"]
mod tests;
