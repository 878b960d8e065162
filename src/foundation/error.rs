/// Convenience result type used across rava.
pub type RavaResult<T> = Result<T, RavaError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Only [`RavaError::Precondition`] aborts a run. Every other variant is caught at the song
/// boundary and turned into a report entry.
#[derive(thiserror::Error, Debug)]
pub enum RavaError {
    /// Invalid or missing project path, or another condition checked before any song runs.
    #[error("precondition error: {0}")]
    Precondition(String),

    /// Structural violation in a raw lyric source (unbalanced or misordered block delimiters).
    #[error("malformed markup: {0}")]
    MalformedMarkup(String),

    /// A source yields no slides: no lyric blocks, blocks holding only comments and directives,
    /// or an empty text file.
    #[error("no lyric blocks: {0}")]
    NoBlocks(String),

    /// The deck-authoring collaborator failed.
    #[error("deck authoring error: {0}")]
    Authoring(String),

    /// The rasterizer collaborator failed.
    #[error("rasterization error: {0}")]
    Rasterization(String),

    /// Invalid `rava.json` project configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RavaError {
    /// Build a [`RavaError::Precondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`RavaError::MalformedMarkup`] value.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedMarkup(msg.into())
    }

    /// Build a [`RavaError::NoBlocks`] value.
    pub fn no_blocks(msg: impl Into<String>) -> Self {
        Self::NoBlocks(msg.into())
    }

    /// Build a [`RavaError::Authoring`] value.
    pub fn authoring(msg: impl Into<String>) -> Self {
        Self::Authoring(msg.into())
    }

    /// Build a [`RavaError::Rasterization`] value.
    pub fn rasterization(msg: impl Into<String>) -> Self {
        Self::Rasterization(msg.into())
    }

    /// Build a [`RavaError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Short token used in run reports as `error:<tag>`.
    pub fn failure_tag(&self) -> &'static str {
        match self {
            Self::Precondition(_) => "precondition-failed",
            Self::MalformedMarkup(_) => "malformed-markup",
            Self::NoBlocks(_) => "no-blocks",
            Self::Authoring(_) => "authoring-failed",
            Self::Rasterization(_) => "rasterizer-failed",
            Self::Config(_) => "config-invalid",
            Self::Other(_) => "io-failed",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
