use serde::{Deserialize, Serialize};

use crate::foundation::error::{RavaError, RavaResult};

/// Fixed visual styling applied to every slide of a deck.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckStyle {
    /// Slide width in pixels.
    pub width: u32,
    /// Slide height in pixels.
    pub height: u32,
    /// Background colour, `#RRGGBB` or `#RRGGBBAA`.
    pub background: String,
    /// Text colour, `#RRGGBB` or `#RRGGBBAA`.
    pub text_color: String,
    /// CSS-style font family list.
    pub font_family: String,
    /// Font size in pixels.
    pub font_size_px: f32,
    /// Baseline-to-baseline distance as a multiple of the font size.
    pub line_spacing: f32,
}

impl Default for DeckStyle {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            background: "#000000".to_owned(),
            text_color: "#FFFFFF".to_owned(),
            font_family: "sans-serif".to_owned(),
            font_size_px: 72.0,
            line_spacing: 1.25,
        }
    }
}

impl DeckStyle {
    /// Reject styles that cannot be rendered.
    pub fn validate(&self) -> RavaResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RavaError::config("style width/height must be non-zero"));
        }
        const MAX_DIM: u32 = 16_384;
        if self.width > MAX_DIM || self.height > MAX_DIM {
            return Err(RavaError::config(format!(
                "style size too large: {}x{} (max {MAX_DIM}x{MAX_DIM})",
                self.width, self.height
            )));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(RavaError::config("style font_size_px must be finite and > 0"));
        }
        if !self.line_spacing.is_finite() || self.line_spacing <= 0.0 {
            return Err(RavaError::config("style line_spacing must be finite and > 0"));
        }
        if self.font_family.trim().is_empty() {
            return Err(RavaError::config("style font_family must be non-empty"));
        }
        self.background_rgba()?;
        self.text_rgba()?;
        Ok(())
    }

    /// Parsed background colour.
    pub fn background_rgba(&self) -> RavaResult<Rgba8> {
        parse_hex(&self.background)
            .map_err(|e| RavaError::config(format!("style background: {e}")))
    }

    /// Parsed text colour.
    pub fn text_rgba(&self) -> RavaResult<Rgba8> {
        parse_hex(&self.text_color).map_err(|e| RavaError::config(format!("style text_color: {e}")))
    }
}

/// Straight-alpha RGBA8 colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// `#rrggbb` without alpha.
    pub fn hex_rgb(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Alpha as an opacity in `0.0..=1.0`.
    pub fn opacity(self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

/// Parse `#RRGGBB` or `#RRGGBBAA` (case-insensitive, `#` optional).
pub fn parse_hex(s: &str) -> Result<Rgba8, String> {
    let s = s.trim();
    let s = s.strip_prefix('#').unwrap_or(s);

    fn hex_byte(pair: &str) -> Result<u8, String> {
        u8::from_str_radix(pair, 16).map_err(|_| format!("invalid hex byte \"{pair}\""))
    }

    if !s.is_ascii() {
        return Err("hex color must be ASCII".to_owned());
    }
    let (r, g, b, a) = match s.len() {
        6 => (hex_byte(&s[0..2])?, hex_byte(&s[2..4])?, hex_byte(&s[4..6])?, 255),
        8 => (
            hex_byte(&s[0..2])?,
            hex_byte(&s[2..4])?,
            hex_byte(&s[4..6])?,
            hex_byte(&s[6..8])?,
        ),
        _ => {
            return Err("hex color must be #RRGGBB or #RRGGBBAA (case-insensitive)".to_owned());
        }
    };
    Ok(Rgba8 { r, g, b, a })
}

#[cfg(test)]
#[path = "../../tests/unit/deck/style.rs"]
mod tests;
