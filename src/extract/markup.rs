use serde::{Deserialize, Serialize};

use crate::extract::record::SlideLine;
use crate::foundation::error::{RavaError, RavaResult};

/// Tokens of the raw lyric markup.
///
/// Delimiters, prefixes and the blank token are matched against the trimmed source line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupSyntax {
    /// Line that opens a lyric block.
    pub begin: String,
    /// Line that closes a lyric block.
    pub end: String,
    /// Lines starting with this are comments.
    pub comment_prefix: String,
    /// Lines starting with this are markup directives, not lyrics.
    pub control_prefix: String,
    /// In-line sequence that splits one slide into several text lines.
    pub newline_escape: String,
    /// A line consisting of exactly this token is a blank slide.
    pub blank_token: String,
    /// Line-break marker stripped from the end of a lyric line.
    pub trailing_break: String,
}

impl Default for MarkupSyntax {
    fn default() -> Self {
        Self {
            begin: r"\begin{obeylines}".to_owned(),
            end: r"\end{obeylines}".to_owned(),
            comment_prefix: "%".to_owned(),
            control_prefix: r"\".to_owned(),
            newline_escape: r"\n".to_owned(),
            blank_token: "~".to_owned(),
            trailing_break: r"\\".to_owned(),
        }
    }
}

impl MarkupSyntax {
    /// Reject token sets the extractor cannot work with.
    pub fn validate(&self) -> RavaResult<()> {
        let required = [
            ("begin", &self.begin),
            ("end", &self.end),
            ("comment_prefix", &self.comment_prefix),
            ("control_prefix", &self.control_prefix),
            ("newline_escape", &self.newline_escape),
            ("blank_token", &self.blank_token),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(RavaError::config(format!("markup.{name} must be non-empty")));
            }
        }
        if self.begin.trim() == self.end.trim() {
            return Err(RavaError::config(
                "markup.begin and markup.end must differ",
            ));
        }
        Ok(())
    }
}

/// Parses raw lyric markup into slide-line records.
#[derive(Clone, Debug, Default)]
pub struct Extractor {
    syntax: MarkupSyntax,
}

impl Extractor {
    /// Extractor for the given markup tokens.
    pub fn new(syntax: MarkupSyntax) -> Self {
        Self { syntax }
    }

    /// Extract slide-line records from one raw source.
    ///
    /// Records come out in document order of blocks, then of lines within a block. Fails with
    /// [`RavaError::MalformedMarkup`] on unbalanced, nested or misordered delimiters (no records
    /// are produced in that case) and with [`RavaError::NoBlocks`] when there is no block or no
    /// block yields a record.
    pub fn extract(&self, raw: &str) -> RavaResult<Vec<SlideLine>> {
        let lines: Vec<&str> = raw.lines().collect();
        let blocks = self.block_ranges(&lines)?;
        if blocks.is_empty() {
            return Err(RavaError::no_blocks(format!(
                "no '{}' ... '{}' block found",
                self.syntax.begin, self.syntax.end
            )));
        }

        let mut out = Vec::new();
        for &(begin, end) in &blocks {
            out.extend(lines[begin + 1..end].iter().filter_map(|l| self.record(l)));
        }
        if out.is_empty() {
            return Err(RavaError::no_blocks(format!(
                "{} block(s) found but none holds a lyric line",
                blocks.len()
            )));
        }
        Ok(out)
    }

    /// Matched `(begin, end)` line indices, in document order.
    fn block_ranges(&self, lines: &[&str]) -> RavaResult<Vec<(usize, usize)>> {
        let begin = self.syntax.begin.trim();
        let end = self.syntax.end.trim();

        let begins = lines.iter().filter(|l| l.trim() == begin).count();
        let ends = lines.iter().filter(|l| l.trim() == end).count();
        if begins != ends {
            return Err(RavaError::malformed(format!(
                "found {begins} '{begin}' but {ends} '{end}' delimiters"
            )));
        }

        let mut ranges = Vec::with_capacity(begins);
        let mut open: Option<usize> = None;
        for (idx, line) in lines.iter().enumerate() {
            let t = line.trim();
            if t == begin {
                if let Some(start) = open {
                    return Err(RavaError::malformed(format!(
                        "'{begin}' on line {} opens a block inside the block opened on line {}",
                        idx + 1,
                        start + 1
                    )));
                }
                open = Some(idx);
            } else if t == end {
                let Some(start) = open.take() else {
                    return Err(RavaError::malformed(format!(
                        "'{end}' on line {} closes no open block",
                        idx + 1
                    )));
                };
                ranges.push((start, idx));
            }
        }
        Ok(ranges)
    }

    /// Turn one source line inside a block into a record, or drop it.
    fn record(&self, line: &str) -> Option<SlideLine> {
        let s = &self.syntax;
        let t = line.trim();
        if t == s.blank_token.trim() {
            return Some(SlideLine::blank());
        }
        if t.is_empty() || t.starts_with(s.comment_prefix.as_str()) {
            return None;
        }
        if t.starts_with(s.control_prefix.as_str()) {
            return None;
        }

        let t = match s.trailing_break.as_str() {
            "" => t,
            marker => t.strip_suffix(marker).unwrap_or(t),
        };

        let parts: Vec<String> = t
            .split(s.newline_escape.as_str())
            .map(normalize_spaces)
            .collect();
        let first = parts.iter().position(|p| !p.is_empty())?;
        let last = parts.iter().rposition(|p| !p.is_empty())?;
        Some(SlideLine::from_lines(&parts[first..=last]))
    }
}

/// Trim and collapse interior whitespace runs to a single space.
fn normalize_spaces(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
#[path = "../../tests/unit/extract/markup.rs"]
mod tests;
