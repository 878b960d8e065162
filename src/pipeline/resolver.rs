use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Serialize;

use crate::foundation::error::RavaResult;
use crate::foundation::fs::{list_files_with_ext, modified_time};
use crate::layout::paths::{IMAGE_EXT, SongPaths};

/// Freshness of one stage artifact relative to its upstream artifact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactStatus {
    /// Nothing on disk (or an empty image folder).
    Absent,
    /// Present but not strictly newer than the upstream mtime it carries.
    StaleRelativeTo(SystemTime),
    /// Present and strictly newer than upstream.
    Fresh,
}

impl ArtifactStatus {
    /// Status of a single-file artifact. Equal mtimes are stale.
    pub fn of(artifact: Option<SystemTime>, upstream: SystemTime) -> Self {
        match artifact {
            None => Self::Absent,
            Some(t) if t > upstream => Self::Fresh,
            Some(_) => Self::StaleRelativeTo(upstream),
        }
    }
}

/// What to do with one stage of one song.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Decision {
    /// Artifact is fresh; leave it alone.
    SkipFresh,
    /// Artifact is absent or stale; (re)build it.
    Generate,
    /// Upstream artifact is missing; nothing can be built.
    SkipMissingDependency,
}

/// Result of checking one stage: either the upstream is missing, or it exists with a known mtime
/// and this stage's artifact has a status relative to it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageCheck {
    /// Upstream artifact is missing.
    MissingDependency,
    /// Upstream present.
    Ready {
        /// Upstream mtime, reused for freshness nudging and reconciliation.
        upstream: SystemTime,
        /// This stage's artifact relative to `upstream`.
        status: ArtifactStatus,
    },
}

impl StageCheck {
    /// Decision implied by this check.
    pub fn decision(&self) -> Decision {
        match self {
            Self::MissingDependency => Decision::SkipMissingDependency,
            Self::Ready {
                status: ArtifactStatus::Fresh,
                ..
            } => Decision::SkipFresh,
            Self::Ready { .. } => Decision::Generate,
        }
    }
}

/// Decisions for all three transitions of one song, as predicted before any work runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// `00 -> 01`.
    pub preprocess: Decision,
    /// `01 -> 02`.
    pub deck: Decision,
    /// `02 -> 03`.
    pub images: Decision,
}

impl Resolution {
    /// Decisions once force mode has emptied the deck and image folders: both stages rebuild
    /// unless the song is blocked before them.
    pub fn forced(self) -> Self {
        if self.preprocess == Decision::SkipMissingDependency {
            return self;
        }
        Self {
            deck: Decision::Generate,
            images: Decision::Generate,
            ..self
        }
    }
}

/// Decides, per stage, whether a song's artifact is skipped, (re)generated, or blocked.
#[derive(Clone, Copy, Debug)]
pub struct StageResolver<'a> {
    paths: &'a SongPaths,
}

impl<'a> StageResolver<'a> {
    /// Resolver for one song.
    pub fn new(paths: &'a SongPaths) -> Self {
        Self { paths }
    }

    /// `00 -> 01`: an existing preprocessed file is always kept.
    ///
    /// Raw sources are treated as immutable once preprocessed; re-editing one means deleting its
    /// preprocessed file.
    pub fn preprocessed(&self) -> RavaResult<StageCheck> {
        let Some(raw) = modified_time(&self.paths.raw)? else {
            return Ok(StageCheck::MissingDependency);
        };
        let status = match modified_time(&self.paths.preprocessed)? {
            Some(_) => ArtifactStatus::Fresh,
            None => ArtifactStatus::Absent,
        };
        Ok(StageCheck::Ready {
            upstream: raw,
            status,
        })
    }

    /// `01 -> 02`: the deck is fresh iff strictly newer than the preprocessed file.
    pub fn deck(&self) -> RavaResult<StageCheck> {
        let Some(upstream) = modified_time(&self.paths.preprocessed)? else {
            return Ok(StageCheck::MissingDependency);
        };
        let status = ArtifactStatus::of(modified_time(&self.paths.deck)?, upstream);
        Ok(StageCheck::Ready { upstream, status })
    }

    /// `02 -> 03`: the image folder is fresh iff it is non-empty and every image in it is
    /// strictly newer than the deck. One stale member makes the whole folder stale.
    pub fn images(&self) -> RavaResult<StageCheck> {
        let Some(upstream) = modified_time(&self.paths.deck)? else {
            return Ok(StageCheck::MissingDependency);
        };
        let members = image_members(&self.paths.images)?;
        if members.is_empty() {
            return Ok(StageCheck::Ready {
                upstream,
                status: ArtifactStatus::Absent,
            });
        }

        for member in &members {
            let fresh = modified_time(member)?.is_some_and(|t| t > upstream);
            if !fresh {
                return Ok(StageCheck::Ready {
                    upstream,
                    status: ArtifactStatus::StaleRelativeTo(upstream),
                });
            }
        }
        Ok(StageCheck::Ready {
            upstream,
            status: ArtifactStatus::Fresh,
        })
    }

    /// Predict all three decisions without touching anything.
    ///
    /// A stage downstream of a `Generate` is predicted as `Generate` (its input will be newer);
    /// downstream of a missing dependency everything is blocked.
    pub fn resolve(&self) -> RavaResult<Resolution> {
        let preprocess = self.preprocessed()?.decision();
        let deck = match preprocess {
            Decision::SkipFresh => self.deck()?.decision(),
            other => other,
        };
        let images = match deck {
            Decision::SkipFresh => self.images()?.decision(),
            other => other,
        };
        Ok(Resolution {
            preprocess,
            deck,
            images,
        })
    }
}

/// Image files currently in a song's image folder.
pub fn image_members(dir: &Path) -> RavaResult<Vec<PathBuf>> {
    list_files_with_ext(dir, IMAGE_EXT)
}

/// Outcome of a reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reconciliation {
    /// Images deleted because they predate the deck.
    pub removed: usize,
    /// Images left in the folder.
    pub retained: usize,
}

/// Delete every image in `dir` older than `deck_mtime`.
///
/// Run after rasterization: leftovers the rasterizer did not overwrite (e.g. the deck lost
/// slides) belong to a superseded deck.
pub fn reconcile_images(dir: &Path, deck_mtime: SystemTime) -> RavaResult<Reconciliation> {
    let mut out = Reconciliation::default();
    for member in image_members(dir)? {
        let older = modified_time(&member)?.is_some_and(|t| t < deck_mtime);
        if older {
            std::fs::remove_file(&member).map_err(|e| {
                anyhow::Error::new(e).context(format!("remove stale image '{}'", member.display()))
            })?;
            tracing::debug!("removed stale image {}", member.display());
            out.removed += 1;
        } else {
            out.retained += 1;
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/resolver.rs"]
mod tests;
