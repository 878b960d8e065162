//! Stage-1 text format: one physical line per slide-line record.
//!
//! Line breaks inside a record are stored as a vertical tab so the record stays on one physical
//! line. An empty physical line is a blank slide.

use crate::extract::record::SlideLine;

/// In-record line break marker used in preprocessed files.
pub const LINE_BREAK: char = '\u{000B}';

/// Serialise records into preprocessed text.
pub fn render_preprocessed(records: &[SlideLine]) -> String {
    let mut out = String::new();
    for record in records {
        out.extend(record.text().chars().map(|c| if c == '\n' { LINE_BREAK } else { c }));
        out.push('\n');
    }
    out
}

/// Read preprocessed (or plain-text raw) content back into records.
pub fn parse_preprocessed(text: &str) -> Vec<SlideLine> {
    text.lines()
        .map(|line| {
            let parts: Vec<&str> = line.split(LINE_BREAK).map(str::trim).collect();
            if parts.iter().all(|p| p.is_empty()) {
                SlideLine::blank()
            } else {
                SlideLine::from_lines(parts)
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/extract/preprocessed.rs"]
mod tests;
