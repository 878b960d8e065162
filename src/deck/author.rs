use std::path::Path;

use crate::deck::model::Deck;
use crate::deck::style::DeckStyle;
use crate::extract::record::SlideLine;
use crate::foundation::error::{RavaError, RavaResult};
use crate::foundation::fs::write_atomic;

/// Deck-authoring collaborator: turns slide-line records into a deck file.
///
/// Implementations produce one slide per record, keep embedded line breaks as separate lines on
/// the same slide, and render an empty record as a blank slide. `out_path` is overwritten.
pub trait DeckAuthor {
    /// Write the deck for `lines` to `out_path`.
    fn author(&self, lines: &[SlideLine], out_path: &Path) -> RavaResult<()>;
}

/// Writes decks in rava's JSON deck format with a fixed [`DeckStyle`].
#[derive(Clone, Debug, Default)]
pub struct JsonDeckAuthor {
    style: DeckStyle,
}

impl JsonDeckAuthor {
    /// Author with the given styling.
    pub fn new(style: DeckStyle) -> Self {
        Self { style }
    }
}

impl DeckAuthor for JsonDeckAuthor {
    fn author(&self, lines: &[SlideLine], out_path: &Path) -> RavaResult<()> {
        let deck = Deck::from_records(self.style.clone(), lines);
        let bytes = deck
            .to_json_bytes()
            .map_err(|e| RavaError::authoring(e.to_string()))?;
        write_atomic(out_path, &bytes).map_err(|e| {
            RavaError::authoring(format!("write deck '{}': {e:#}", out_path.display()))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deck/author.rs"]
mod tests;
