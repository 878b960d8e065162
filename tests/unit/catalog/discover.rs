use std::fs;

use super::*;
use crate::foundation::fs::reset_dir;

fn project(name: &str) -> ProjectLayout {
    let root = PathBuf::from("target").join("unit-discover").join(name);
    reset_dir(&root).unwrap();
    ProjectLayout::new(root)
}

#[test]
fn song_name_strips_everything_after_first_dot() {
    assert_eq!(song_name("opening.tex"), Some("opening"));
    assert_eq!(song_name("finale.v2.tex"), Some("finale"));
    assert_eq!(song_name(".hidden.tex"), None);
}

#[test]
fn missing_raw_dir_is_an_empty_catalog() {
    let layout = project("empty");
    assert!(discover(&layout).unwrap().is_empty());
}

#[test]
fn discovers_sorted_sources_and_drops_duplicates() {
    let layout = project("sorted");
    let raw = layout.stage_dir(Stage::Raw);
    fs::create_dir_all(&raw).unwrap();
    fs::write(raw.join("b_song.tex"), "").unwrap();
    fs::write(raw.join("a_song.txt"), "").unwrap();
    fs::write(raw.join("b_song.txt"), "").unwrap();
    fs::write(raw.join("notes.md"), "").unwrap();
    fs::write(raw.join(".draft.tex"), "").unwrap();

    let found = discover(&layout).unwrap();
    let summary: Vec<_> = found
        .iter()
        .map(|r| (r.song.as_str(), r.kind, r.path.file_name().unwrap().to_owned()))
        .collect();

    assert_eq!(summary.len(), 2);
    assert_eq!(summary[0].0, "a_song");
    assert_eq!(summary[0].1, RawKind::PlainText);
    assert_eq!(summary[1].0, "b_song");
    assert_eq!(summary[1].1, RawKind::Markup);
    assert_eq!(summary[1].2, "b_song.tex");
}
