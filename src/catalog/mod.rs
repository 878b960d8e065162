//! Discovery of the song catalog in `<project>/lyrics/00_raw`.

/// Raw source listing and song naming.
pub mod discover;
