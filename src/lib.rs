//! rava turns raw lyric sources into projected slide images for a live stage show.
//!
//! # Pipeline overview
//!
//! Each song moves through four on-disk stages under `<project>/lyrics/`:
//!
//! 1. **Raw** (`00_raw/<song>.tex|txt`): lyrics with `\begin{obeylines}` ... `\end{obeylines}`
//!    blocks, or plain text.
//! 2. **Preprocessed** (`01_preprocessed/<song>.txt`): one slide per line, produced by the
//!    [`Extractor`] or copied verbatim.
//! 3. **Deck** (`02_pptx/<song>.json`): styled slides, written by a [`DeckAuthor`].
//! 4. **Images** (`03_png/<song>/<song><NN>.png`): one image per slide, written by a
//!    [`Rasterizer`].
//!
//! Every stage is cached on disk. The [`StageResolver`] compares modification times (strictly:
//! equal timestamps count as stale) and the [`Pipeline`] only rebuilds what is stale, so rerunning
//! over an unchanged catalog rewrites nothing.
//!
//! Songs are independent: a failure in one song is recorded in the [`RunReport`] and the run
//! carries on with the next song.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod catalog;
mod config;
mod deck;
mod extract;
mod foundation;
mod layout;
mod pipeline;
mod raster;

pub use catalog::discover::{RAW_EXTENSIONS, RawInput, RawKind, discover, song_name};
pub use config::project::{Project, ProjectConfig, RasterizerConfig};
pub use deck::author::{DeckAuthor, JsonDeckAuthor};
pub use deck::model::{DECK_FORMAT_VERSION, Deck, Slide};
pub use deck::style::{DeckStyle, Rgba8, parse_hex};
pub use extract::markup::{Extractor, MarkupSyntax};
pub use extract::preprocessed::{LINE_BREAK, parse_preprocessed, render_preprocessed};
pub use extract::record::SlideLine;
pub use foundation::error::{RavaError, RavaResult};
pub use foundation::fs::{ensure_newer_than, modified_time, set_modified_time};
pub use layout::paths::{
    CONFIG_FILE, DECK_EXT, IMAGE_EXT, LYRICS_DIR, ProjectLayout, SongPaths, Stage,
    image_file_name,
};
pub use pipeline::orchestrator::{Pipeline, RunOpts, SongPlan};
pub use pipeline::report::{
    RunReport, RunSummary, SongReport, StageOutcome, StageStatus, Transition,
};
pub use pipeline::resolver::{
    ArtifactStatus, Decision, Reconciliation, Resolution, StageCheck, StageResolver,
    reconcile_images,
};
pub use raster::Rasterizer;
pub use raster::command::CommandRasterizer;
pub use raster::svg::{SvgRasterizer, slide_svg};
