//! Stage 1 -> 2: slide decks and the deck-authoring collaborator.

/// Deck-authoring collaborator trait and the JSON deck writer.
pub mod author;
/// Deck file model.
pub mod model;
/// Deck styling and colours.
pub mod style;
