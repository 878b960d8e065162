//! Error taxonomy and filesystem helpers shared by every stage.

pub mod error;
pub mod fs;
