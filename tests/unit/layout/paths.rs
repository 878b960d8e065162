use super::*;
use crate::catalog::discover::RawKind;

#[test]
fn stage_dirs_match_fixed_layout() {
    let layout = ProjectLayout::new("revue_2024");
    assert_eq!(
        layout.stage_dir(Stage::Raw),
        PathBuf::from("revue_2024/lyrics/00_raw")
    );
    assert_eq!(
        layout.stage_dir(Stage::Images),
        PathBuf::from("revue_2024/lyrics/03_png")
    );
    assert_eq!(Stage::Deck.label(), "02");
}

#[test]
fn song_paths_are_derived_from_name() {
    let layout = ProjectLayout::new("show");
    let input = RawInput {
        song: "opening".to_string(),
        path: PathBuf::from("show/lyrics/00_raw/opening.tex"),
        kind: RawKind::Markup,
    };
    let p = layout.song_paths(&input);

    assert_eq!(p.raw, PathBuf::from("show/lyrics/00_raw/opening.tex"));
    assert_eq!(
        p.preprocessed,
        PathBuf::from("show/lyrics/01_preprocessed/opening.txt")
    );
    assert_eq!(p.deck, PathBuf::from("show/lyrics/02_pptx/opening.json"));
    assert_eq!(p.images, PathBuf::from("show/lyrics/03_png/opening"));
}

#[test]
fn image_names_use_two_digit_ordinals() {
    assert_eq!(image_file_name("finale", 1), "finale01.png");
    assert_eq!(image_file_name("finale", 12), "finale12.png");
    assert_eq!(image_file_name("finale", 123), "finale123.png");
}
