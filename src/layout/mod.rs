//! On-disk project layout and artifact path derivation.

/// Stage directories and per-song artifact paths.
pub mod paths;
