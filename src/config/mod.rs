//! Project folder configuration (`rava.json`).

/// Project config model and loading.
pub mod project;
