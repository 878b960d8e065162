use std::fmt;
use std::path::Path;

use serde::{Serialize, Serializer};

use crate::foundation::error::{RavaError, RavaResult};
use crate::foundation::fs::write_atomic;
use crate::layout::paths::Stage;

/// One of the three stage transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// `00 -> 01`
    RawToPreprocessed,
    /// `01 -> 02`
    PreprocessedToDeck,
    /// `02 -> 03`
    DeckToImages,
}

impl Transition {
    /// All transitions in pipeline order.
    pub const ALL: [Transition; 3] = [
        Transition::RawToPreprocessed,
        Transition::PreprocessedToDeck,
        Transition::DeckToImages,
    ];

    /// `(from, to)` stages.
    pub fn stages(self) -> (Stage, Stage) {
        match self {
            Self::RawToPreprocessed => (Stage::Raw, Stage::Preprocessed),
            Self::PreprocessedToDeck => (Stage::Preprocessed, Stage::Deck),
            Self::DeckToImages => (Stage::Deck, Stage::Images),
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (a, b) = self.stages();
        write!(f, "{a} -> {b}")
    }
}

/// Per-stage outcome recorded in the report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageStatus {
    /// Artifact was fresh and left untouched.
    SkippedFresh,
    /// Artifact was (re)built.
    Generated,
    /// Upstream artifact missing; nothing was built.
    SkippedMissingDependency,
    /// The stage failed; carries the failure tag (`malformed-markup`, ...).
    Error(String),
}

impl StageStatus {
    /// Status for a caught error.
    pub fn from_error(err: &RavaError) -> Self {
        Self::Error(err.failure_tag().to_owned())
    }

    /// `true` when the stage left a usable artifact for the next stage.
    pub fn unblocks_downstream(&self) -> bool {
        matches!(self, Self::SkippedFresh | Self::Generated)
    }
}

impl fmt::Display for StageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedFresh => f.write_str("skipped-fresh"),
            Self::Generated => f.write_str("generated"),
            Self::SkippedMissingDependency => f.write_str("skipped-missing-dependency"),
            Self::Error(tag) => write!(f, "error:{tag}"),
        }
    }
}

impl Serialize for StageStatus {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

/// Outcome of one transition of one song.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
    /// Which transition.
    pub transition: Transition,
    /// What happened.
    pub status: StageStatus,
    /// Human-readable detail, as logged.
    pub reason: String,
}

/// Report entry for one song. Never mutated once the song is done.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SongReport {
    /// Song name.
    pub song: String,
    /// Outcomes in transition order (always three once complete).
    pub stages: Vec<StageOutcome>,
    /// Images written by the rasterizer in this run.
    pub images_written: usize,
    /// Stale images deleted by reconciliation.
    pub images_removed: usize,
    /// Images left in the folder after reconciliation.
    pub images_retained: usize,
}

impl SongReport {
    pub(crate) fn new(song: &str) -> Self {
        Self {
            song: song.to_owned(),
            ..Self::default()
        }
    }

    /// Status of one transition, if it was recorded.
    pub fn status(&self, transition: Transition) -> Option<&StageStatus> {
        self.stages
            .iter()
            .find(|s| s.transition == transition)
            .map(|s| &s.status)
    }

    /// `true` when any stage failed.
    pub fn is_failed(&self) -> bool {
        self.stages
            .iter()
            .any(|s| matches!(s.status, StageStatus::Error(_)))
    }

    /// `true` when every stage was skipped as fresh.
    pub fn is_all_fresh(&self) -> bool {
        !self.stages.is_empty()
            && self
                .stages
                .iter()
                .all(|s| s.status == StageStatus::SkippedFresh)
    }
}

/// Counts over a whole run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    /// Songs processed.
    pub songs: usize,
    /// Songs where at least one stage was generated and none failed.
    pub generated: usize,
    /// Songs where every stage was fresh.
    pub fresh: usize,
    /// Songs blocked by a missing dependency without a failure.
    pub skipped: usize,
    /// Songs with at least one failed stage.
    pub failed: usize,
}

/// Aggregated per-song outcomes of one run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Entries in processing order.
    pub songs: Vec<SongReport>,
}

impl RunReport {
    /// Entry for `song`, if it was processed.
    pub fn song(&self, song: &str) -> Option<&SongReport> {
        self.songs.iter().find(|s| s.song == song)
    }

    /// Per-song classification counts.
    pub fn summary(&self) -> RunSummary {
        let mut out = RunSummary {
            songs: self.songs.len(),
            ..RunSummary::default()
        };
        for song in &self.songs {
            if song.is_failed() {
                out.failed += 1;
            } else if song
                .stages
                .iter()
                .any(|s| s.status == StageStatus::Generated)
            {
                out.generated += 1;
            } else if song.is_all_fresh() {
                out.fresh += 1;
            } else {
                out.skipped += 1;
            }
        }
        out
    }

    /// Write the report as pretty JSON.
    pub fn write_json(&self, path: &Path) -> RavaResult<()> {
        let mut bytes = serde_json::to_vec_pretty(self)
            .map_err(|e| RavaError::Other(anyhow::anyhow!("serialize run report: {e}")))?;
        bytes.push(b'\n');
        write_atomic(path, &bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/report.rs"]
mod tests;
