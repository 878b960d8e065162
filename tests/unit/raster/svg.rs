use super::*;
use crate::extract::record::SlideLine;
use crate::foundation::fs::reset_dir;

fn tiny_style() -> DeckStyle {
    DeckStyle {
        width: 64,
        height: 36,
        background: "#102030".to_owned(),
        font_size_px: 10.0,
        ..DeckStyle::default()
    }
}

fn empty_fontdb() -> Arc<usvg::fontdb::Database> {
    Arc::new(usvg::fontdb::Database::new())
}

#[test]
fn slide_svg_escapes_text_and_centres_lines() {
    let slide = Slide {
        lines: vec!["Rock & <Roll>".to_owned(), "\"again\"".to_owned()],
    };
    let svg = slide_svg(&tiny_style(), &slide).unwrap();

    assert!(svg.contains("Rock &amp; &lt;Roll&gt;"));
    assert!(svg.contains("&quot;again&quot;"));
    assert_eq!(svg.matches("<tspan").count(), 2);
    assert!(svg.contains(r##"fill="#102030""##));
}

#[test]
fn blank_slide_has_background_only() {
    let svg = slide_svg(&tiny_style(), &Slide::default()).unwrap();
    assert!(!svg.contains("<text"));
    usvg::Tree::from_str(&svg, &usvg::Options::default()).unwrap();
}

#[test]
fn rasterize_writes_one_png_per_slide_with_ordinals() {
    let dir = PathBuf::from("target").join("unit-svg").join("two-slides");
    reset_dir(&dir).unwrap();
    let deck_path = dir.join("hello.json");
    let deck = Deck::from_records(
        tiny_style(),
        &[SlideLine::new("Hello"), SlideLine::new("World\nAgain")],
    );
    std::fs::write(&deck_path, deck.to_json_bytes().unwrap()).unwrap();

    let out_dir = dir.join("hello");
    let written = SvgRasterizer::with_fontdb(empty_fontdb())
        .rasterize(&deck_path, &out_dir)
        .unwrap();

    assert_eq!(
        written,
        vec![out_dir.join("hello01.png"), out_dir.join("hello02.png")]
    );
    let img = image::open(&written[0]).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (64, 36));
    assert_eq!(img.get_pixel(0, 0).0, [0x10, 0x20, 0x30, 255]);
}

#[test]
fn unreadable_deck_is_a_rasterization_error() {
    let dir = PathBuf::from("target").join("unit-svg").join("bad-deck");
    reset_dir(&dir).unwrap();
    let deck_path = dir.join("broken.json");
    std::fs::write(&deck_path, "not json").unwrap();

    let err = SvgRasterizer::with_fontdb(empty_fontdb())
        .rasterize(&deck_path, &dir.join("broken"))
        .unwrap_err();
    assert!(matches!(err, RavaError::Rasterization(_)));
}

#[test]
fn unpremultiply_restores_straight_alpha() {
    let mut px = vec![64u8, 0, 128, 128, 1, 2, 3, 255, 0, 0, 0, 0];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(&px[0..4], &[128, 0, 255, 128]);
    assert_eq!(&px[4..8], &[1, 2, 3, 255]);
    assert_eq!(&px[8..12], &[0, 0, 0, 0]);
}
