use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::deck::model::{Deck, Slide};
use crate::deck::style::DeckStyle;
use crate::foundation::error::{RavaError, RavaResult};
use crate::foundation::fs::write_atomic;
use crate::layout::paths::image_file_name;
use crate::raster::{Rasterizer, deck_song};

/// In-process rasterizer: one SVG per slide, rendered with `resvg` and saved as PNG.
pub struct SvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl SvgRasterizer {
    /// Rasterizer using system fonts plus any `.ttf`/`.otf`/`.ttc` files in `font_dirs`.
    pub fn new(font_dirs: &[PathBuf]) -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        for dir in font_dirs {
            load_fonts_from_dir(&mut db, dir);
        }
        tracing::debug!("svg rasterizer loaded {} font faces", db.faces().count());
        Self::with_fontdb(Arc::new(db))
    }

    /// Rasterizer over a prepared font database.
    pub fn with_fontdb(fontdb: Arc<usvg::fontdb::Database>) -> Self {
        Self { fontdb }
    }

    fn render_slide(&self, style: &DeckStyle, slide: &Slide) -> RavaResult<Vec<u8>> {
        let svg = slide_svg(style, slide)?;
        let opts = usvg::Options {
            fontdb: Arc::clone(&self.fontdb),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(&svg, &opts)
            .map_err(|e| RavaError::rasterization(format!("parse slide svg: {e}")))?;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(style.width, style.height)
            .ok_or_else(|| RavaError::rasterization("failed to allocate slide pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::default(),
            &mut pixmap.as_mut(),
        );

        let mut rgba = pixmap.take();
        unpremultiply_rgba8_in_place(&mut rgba);
        encode_png(style.width, style.height, rgba)
    }
}

impl Rasterizer for SvgRasterizer {
    fn rasterize(&self, deck_path: &Path, out_dir: &Path) -> RavaResult<Vec<PathBuf>> {
        let song = deck_song(deck_path)?;
        let deck = Deck::from_path(deck_path)
            .map_err(|e| RavaError::rasterization(format!("load deck: {e}")))?;
        deck.style
            .validate()
            .map_err(|e| RavaError::rasterization(format!("deck style: {e}")))?;

        let mut written = Vec::with_capacity(deck.slides.len());
        for (idx, slide) in deck.slides.iter().enumerate() {
            let png = self.render_slide(&deck.style, slide)?;
            let path = out_dir.join(image_file_name(&song, idx + 1));
            write_atomic(&path, &png).map_err(|e| {
                RavaError::rasterization(format!("write '{}': {e:#}", path.display()))
            })?;
            written.push(path);
        }
        Ok(written)
    }
}

/// SVG document for one slide: background plus horizontally and vertically centred lines.
pub fn slide_svg(style: &DeckStyle, slide: &Slide) -> RavaResult<String> {
    let bg = style.background_rgba()?;
    let fg = style.text_rgba()?;
    let (w, h) = (style.width, style.height);

    let mut svg = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    svg.push_str(&format!(
        r#"<rect x="0" y="0" width="{w}" height="{h}" fill="{}" fill-opacity="{}"/>"#,
        bg.hex_rgb(),
        bg.opacity()
    ));

    if !slide.lines.is_empty() {
        let advance = style.font_size_px * style.line_spacing;
        let block = advance * (slide.lines.len() - 1) as f32;
        let first_y = h as f32 / 2.0 - block / 2.0;
        let cx = w as f32 / 2.0;

        svg.push_str(&format!(
            r#"<text font-family="{}" font-size="{}" fill="{}" fill-opacity="{}" text-anchor="middle" dominant-baseline="central">"#,
            escape_xml(&style.font_family),
            style.font_size_px,
            fg.hex_rgb(),
            fg.opacity()
        ));
        for (i, line) in slide.lines.iter().enumerate() {
            let y = first_y + advance * i as f32;
            svg.push_str(&format!(
                r#"<tspan x="{cx}" y="{y}">{}</tspan>"#,
                escape_xml(line)
            ));
        }
        svg.push_str("</text>");
    }

    svg.push_str("</svg>");
    Ok(svg)
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

fn encode_png(width: u32, height: u32, rgba: Vec<u8>) -> RavaResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(width, height, rgba)
        .ok_or_else(|| RavaError::rasterization("slide pixel buffer has the wrong size"))?;
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| RavaError::rasterization(format!("encode png: {e}")))?;
    Ok(buf)
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 || a == 255 {
            continue;
        }
        px[0] = ((px[0] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[1] = ((px[1] as u16 * 255 + a / 2) / a).min(255) as u8;
        px[2] = ((px[2] as u16 * 255 + a / 2) / a).min(255) as u8;
    }
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(e) = db.load_font_file(&path) {
            tracing::warn!("skipping font '{}': {e}", path.display());
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/raster/svg.rs"]
mod tests;
