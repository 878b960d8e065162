use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::deck::style::DeckStyle;
use crate::extract::record::SlideLine;
use crate::foundation::error::{RavaError, RavaResult};

/// Current on-disk deck format version.
pub const DECK_FORMAT_VERSION: u32 = 1;

/// A slide deck: fixed styling plus one slide per slide-line record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    /// Format version, see [`DECK_FORMAT_VERSION`].
    pub version: u32,
    /// Styling shared by all slides.
    pub style: DeckStyle,
    /// Slides in presentation order.
    pub slides: Vec<Slide>,
}

/// One slide. No lines means a blank slide.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slide {
    /// Text lines, top to bottom.
    pub lines: Vec<String>,
}

impl Deck {
    /// One slide per record, keeping embedded line breaks as separate slide lines.
    pub fn from_records(style: DeckStyle, records: &[SlideLine]) -> Self {
        let slides = records
            .iter()
            .map(|r| Slide {
                lines: r.lines().into_iter().map(str::to_owned).collect(),
            })
            .collect();
        Self {
            version: DECK_FORMAT_VERSION,
            style,
            slides,
        }
    }

    /// Parse a deck from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> RavaResult<Self> {
        let deck: Deck = serde_json::from_reader(r)
            .map_err(|e| RavaError::Other(anyhow::anyhow!("parse deck JSON: {e}")))?;
        if deck.version != DECK_FORMAT_VERSION {
            return Err(RavaError::Other(anyhow::anyhow!(
                "unsupported deck version {} (expected {DECK_FORMAT_VERSION})",
                deck.version
            )));
        }
        Ok(deck)
    }

    /// Parse a deck from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> RavaResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            RavaError::Other(anyhow::anyhow!("open deck '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Pretty JSON bytes, newline-terminated.
    pub fn to_json_bytes(&self) -> RavaResult<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(self)
            .map_err(|e| RavaError::Other(anyhow::anyhow!("serialize deck: {e}")))?;
        bytes.push(b'\n');
        Ok(bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deck/model.rs"]
mod tests;
