use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::Context as _;

use crate::catalog::discover::{RawInput, RawKind, discover};
use crate::config::project::{Project, RasterizerConfig};
use crate::deck::author::{DeckAuthor, JsonDeckAuthor};
use crate::extract::markup::Extractor;
use crate::extract::preprocessed::{parse_preprocessed, render_preprocessed};
use crate::foundation::error::{RavaError, RavaResult};
use crate::foundation::fs::{ensure_newer_than, reset_dir, write_atomic};
use crate::layout::paths::{ProjectLayout, SongPaths, Stage};
use crate::pipeline::report::{RunReport, SongReport, StageOutcome, StageStatus, Transition};
use crate::pipeline::resolver::{
    Decision, Resolution, StageCheck, StageResolver, image_members, reconcile_images,
};
use crate::raster::Rasterizer;
use crate::raster::command::CommandRasterizer;
use crate::raster::svg::SvgRasterizer;

/// Options for one pipeline run.
#[derive(Clone, Copy, Debug, Default)]
pub struct RunOpts {
    /// Delete and recreate the deck and image folders before processing, so every song is
    /// regenerated from its preprocessed text. Preprocessed files are never touched.
    pub force: bool,
}

/// Predicted decisions for one song (dry run).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongPlan {
    /// Song name.
    pub song: String,
    /// Decisions per transition.
    pub resolution: Resolution,
}

/// Drives every song of a project through stages 0 -> 3.
///
/// Songs run one after another. A failure in one song is recorded in its report entry and the
/// run moves on; only top-level preconditions abort a run.
pub struct Pipeline {
    layout: ProjectLayout,
    extractor: Extractor,
    author: Box<dyn DeckAuthor>,
    rasterizer: Box<dyn Rasterizer>,
}

impl Pipeline {
    /// Pipeline with explicit collaborators.
    pub fn new(
        layout: ProjectLayout,
        extractor: Extractor,
        author: Box<dyn DeckAuthor>,
        rasterizer: Box<dyn Rasterizer>,
    ) -> Self {
        Self {
            layout,
            extractor,
            author,
            rasterizer,
        }
    }

    /// Pipeline wired from a project's configuration.
    pub fn for_project(project: &Project) -> RavaResult<Self> {
        let cfg = &project.config;
        let rasterizer: Box<dyn Rasterizer> = match &cfg.rasterizer {
            RasterizerConfig::Builtin => {
                Box::new(SvgRasterizer::new(&[project.layout.fonts_dir()]))
            }
            RasterizerConfig::Command(argv) => Box::new(CommandRasterizer::new(argv.clone())?),
        };
        Ok(Self::new(
            project.layout.clone(),
            Extractor::new(cfg.markup.clone()),
            Box::new(JsonDeckAuthor::new(cfg.style.clone())),
            rasterizer,
        ))
    }

    /// Run the whole catalog and return the report.
    pub fn run(&self, opts: RunOpts) -> RavaResult<RunReport> {
        self.run_with(opts, |_| {})
    }

    /// Like [`Pipeline::run`], calling `on_song` after each song completes.
    pub fn run_with(
        &self,
        opts: RunOpts,
        mut on_song: impl FnMut(&SongReport),
    ) -> RavaResult<RunReport> {
        self.check_root()?;

        if opts.force {
            tracing::warn!(
                "force flag set - removing {} and {} completely; cue playback may still point at the removed files",
                Stage::Deck.dir_name(),
                Stage::Images.dir_name()
            );
            for stage in [Stage::Deck, Stage::Images] {
                reset_dir(&self.layout.stage_dir(stage))
                    .map_err(|e| RavaError::precondition(format!("force reset: {e:#}")))?;
            }
        }

        let inputs = discover(&self.layout)?;
        let mut report = RunReport::default();
        if inputs.is_empty() {
            tracing::info!(
                "No files found in {}. Quitting.",
                self.layout.stage_dir(Stage::Raw).display()
            );
            return Ok(report);
        }

        for input in &inputs {
            let entry = self.process_song(input);
            on_song(&entry);
            report.songs.push(entry);
        }

        let summary = report.summary();
        tracing::info!(
            "run complete: {} songs, {} generated, {} up to date, {} skipped, {} failed",
            summary.songs,
            summary.generated,
            summary.fresh,
            summary.skipped,
            summary.failed
        );
        Ok(report)
    }

    /// Predict per-song decisions of a run with `opts` without building anything.
    pub fn plan(&self, opts: RunOpts) -> RavaResult<Vec<SongPlan>> {
        self.check_root()?;
        discover(&self.layout)?
            .iter()
            .map(|input| {
                let paths = self.layout.song_paths(input);
                let resolution = StageResolver::new(&paths).resolve()?;
                Ok(SongPlan {
                    song: input.song.clone(),
                    resolution: if opts.force {
                        resolution.forced()
                    } else {
                        resolution
                    },
                })
            })
            .collect()
    }

    fn check_root(&self) -> RavaResult<()> {
        let root = self.layout.root();
        if root.is_dir() {
            Ok(())
        } else {
            Err(RavaError::precondition(format!(
                "the folder '{}' does not exist",
                root.display()
            )))
        }
    }

    /// Every error is caught here and turned into report entries.
    #[tracing::instrument(level = "debug", skip(self, input), fields(song = %input.song))]
    fn process_song(&self, input: &RawInput) -> SongReport {
        let song = input.song.as_str();
        let paths = self.layout.song_paths(input);
        let resolver = StageResolver::new(&paths);
        let mut report = SongReport::new(song);
        tracing::info!("{song}: processing...");

        let pre = self.preprocess_stage(input, &paths, &resolver);
        let go_on = pre.status.unblocks_downstream();
        record(&mut report, pre);
        if !go_on {
            block_remaining(&mut report, "preprocessed file does not exist");
            return report;
        }

        let deck = self.deck_stage(&paths, &resolver);
        let go_on = deck.status.unblocks_downstream();
        record(&mut report, deck);
        if !go_on {
            block_remaining(&mut report, "deck does not exist");
            return report;
        }

        let images = self.images_stage(&paths, &resolver, &mut report);
        record(&mut report, images);
        report
    }

    fn preprocess_stage(
        &self,
        input: &RawInput,
        paths: &SongPaths,
        resolver: &StageResolver<'_>,
    ) -> StageOutcome {
        let t = Transition::RawToPreprocessed;
        let check = match resolver.preprocessed() {
            Ok(c) => c,
            Err(e) => return failed(t, &e),
        };
        let upstream = match check_decision(t, check, "preprocessed song already exists") {
            Ok(upstream) => upstream,
            Err(outcome) => return outcome,
        };

        match self.generate_preprocessed(input, paths, upstream) {
            Ok(reason) => done(t, reason),
            Err(RavaError::NoBlocks(msg)) => outcome(
                t,
                StageStatus::SkippedMissingDependency,
                format!("no slides found ({msg})"),
            ),
            Err(e) => failed(t, &e),
        }
    }

    fn generate_preprocessed(
        &self,
        input: &RawInput,
        paths: &SongPaths,
        raw_mtime: SystemTime,
    ) -> RavaResult<String> {
        let reason = match input.kind {
            RawKind::PlainText => {
                let bytes = std::fs::read(&input.path)
                    .with_context(|| format!("read raw lyrics '{}'", input.path.display()))?;
                if parse_preprocessed(&String::from_utf8_lossy(&bytes)).is_empty() {
                    return Err(RavaError::no_blocks("plain text source has no lines"));
                }
                write_atomic(&paths.preprocessed, &bytes)?;
                "plain text copied verbatim".to_owned()
            }
            RawKind::Markup => {
                let raw = std::fs::read_to_string(&input.path)
                    .with_context(|| format!("read raw lyrics '{}'", input.path.display()))?;
                let records = self.extractor.extract(&raw)?;
                write_atomic(&paths.preprocessed, render_preprocessed(&records).as_bytes())?;
                format!("{} slides extracted", records.len())
            }
        };
        ensure_newer_than(&paths.preprocessed, raw_mtime)?;
        Ok(reason)
    }

    fn deck_stage(&self, paths: &SongPaths, resolver: &StageResolver<'_>) -> StageOutcome {
        let t = Transition::PreprocessedToDeck;
        let check = match resolver.deck() {
            Ok(c) => c,
            Err(e) => return failed(t, &e),
        };
        let upstream = match check_decision(t, check, "deck is up to date") {
            Ok(upstream) => upstream,
            Err(outcome) => return outcome,
        };

        match self.generate_deck(paths, upstream) {
            Ok(reason) => done(t, reason),
            Err(RavaError::NoBlocks(msg)) => outcome(
                t,
                StageStatus::SkippedMissingDependency,
                format!("no slides found ({msg})"),
            ),
            Err(e) => failed(t, &e),
        }
    }

    fn generate_deck(&self, paths: &SongPaths, preprocessed_mtime: SystemTime) -> RavaResult<String> {
        let text = std::fs::read_to_string(&paths.preprocessed).with_context(|| {
            format!("read preprocessed lyrics '{}'", paths.preprocessed.display())
        })?;
        let records = parse_preprocessed(&text);
        if records.is_empty() {
            return Err(RavaError::no_blocks(format!(
                "'{}' is empty",
                paths.preprocessed.display()
            )));
        }
        self.author.author(&records, &paths.deck)?;
        ensure_newer_than(&paths.deck, preprocessed_mtime)?;
        Ok(format!(
            "{} slides written to {}",
            records.len(),
            paths.deck.display()
        ))
    }

    fn images_stage(
        &self,
        paths: &SongPaths,
        resolver: &StageResolver<'_>,
        report: &mut SongReport,
    ) -> StageOutcome {
        let t = Transition::DeckToImages;
        let check = match resolver.images() {
            Ok(c) => c,
            Err(e) => return failed(t, &e),
        };
        let deck_mtime = match check_decision(t, check, "images are up to date") {
            Ok(upstream) => upstream,
            Err(outcome) => return outcome,
        };

        tracing::info!("{}: {t} creating..., rendering slide images, please wait", paths.song);
        match self.generate_images(paths, deck_mtime, report) {
            Ok(reason) => done(t, reason),
            Err(e) => failed(t, &e),
        }
    }

    fn generate_images(
        &self,
        paths: &SongPaths,
        deck_mtime: SystemTime,
        report: &mut SongReport,
    ) -> RavaResult<String> {
        std::fs::create_dir_all(&paths.images)
            .with_context(|| format!("create image folder '{}'", paths.images.display()))?;

        let written = self
            .rasterizer
            .rasterize(&paths.deck, &paths.images)
            .inspect_err(|_| discard_images(&paths.images))?;
        for image in &written {
            ensure_newer_than(image, deck_mtime)?;
        }

        let rec = reconcile_images(&paths.images, deck_mtime)?;
        report.images_written = written.len();
        report.images_removed = rec.removed;
        report.images_retained = rec.retained;
        if rec.removed > 0 {
            tracing::warn!(
                "{}: {} removed {} old images; make sure cue playback is not using them",
                paths.song,
                Transition::DeckToImages,
                rec.removed
            );
        }
        Ok(format!(
            "{} images written to {}",
            rec.retained,
            paths.images.display()
        ))
    }
}

/// Map a stage check to its skip outcome, or to the upstream mtime when the stage must run.
fn check_decision(
    t: Transition,
    check: StageCheck,
    fresh_reason: &str,
) -> Result<SystemTime, StageOutcome> {
    match (check.decision(), check) {
        (Decision::Generate, StageCheck::Ready { upstream, .. }) => Ok(upstream),
        (Decision::SkipFresh, _) => Err(outcome(t, StageStatus::SkippedFresh, fresh_reason)),
        _ => {
            let (from, _) = t.stages();
            Err(outcome(
                t,
                StageStatus::SkippedMissingDependency,
                format!("{} artifact does not exist", from.dir_name()),
            ))
        }
    }
}

/// Leave no partial image set behind that a later run could mistake for fresh.
fn discard_images(dir: &Path) {
    let members: Vec<PathBuf> = image_members(dir).unwrap_or_default();
    for member in members {
        if let Err(e) = std::fs::remove_file(&member) {
            tracing::warn!("could not remove partial image '{}': {e}", member.display());
        }
    }
}

fn record(report: &mut SongReport, outcome: StageOutcome) {
    log_outcome(&report.song, &outcome);
    report.stages.push(outcome);
}

fn block_remaining(report: &mut SongReport, reason: &str) {
    let recorded = report.stages.len();
    for t in Transition::ALL.into_iter().skip(recorded) {
        record(
            report,
            outcome(t, StageStatus::SkippedMissingDependency, reason),
        );
    }
}

fn log_outcome(song: &str, o: &StageOutcome) {
    let t = o.transition;
    match &o.status {
        StageStatus::SkippedFresh | StageStatus::SkippedMissingDependency => {
            tracing::info!("{song}: {t} skipped, {}.", o.reason);
        }
        StageStatus::Generated => tracing::info!("{song}: {t} done, {}.", o.reason),
        StageStatus::Error(_) => tracing::error!("{song}: {t} failed, {}.", o.reason),
    }
}

fn outcome(t: Transition, status: StageStatus, reason: impl Into<String>) -> StageOutcome {
    StageOutcome {
        transition: t,
        status,
        reason: reason.into(),
    }
}

fn done(t: Transition, reason: String) -> StageOutcome {
    outcome(t, StageStatus::Generated, reason)
}

fn failed(t: Transition, err: &RavaError) -> StageOutcome {
    outcome(t, StageStatus::from_error(err), format!("{err:#}"))
}
