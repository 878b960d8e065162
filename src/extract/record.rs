use std::fmt;

use serde::{Deserialize, Serialize};

/// One slide's worth of lyric text, in presentation order.
///
/// Embedded `\n` separate the text lines shown together on one slide. An empty record is an
/// intentional blank slide.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlideLine(String);

impl SlideLine {
    /// Record from already-normalised text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// A contentless pause slide.
    pub fn blank() -> Self {
        Self(String::new())
    }

    /// Build a record from the lines that share one slide.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = lines
            .into_iter()
            .map(|l| l.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join("\n");
        Self(joined)
    }

    /// Full text with embedded `\n` line breaks.
    pub fn text(&self) -> &str {
        &self.0
    }

    /// `true` for a blank slide.
    pub fn is_blank(&self) -> bool {
        self.0.is_empty()
    }

    /// Text lines shown on the slide; empty for a blank slide.
    pub fn lines(&self) -> Vec<&str> {
        if self.0.is_empty() {
            Vec::new()
        } else {
            self.0.split('\n').collect()
        }
    }
}

impl fmt::Display for SlideLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SlideLine {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}
