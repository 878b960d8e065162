use std::time::{Duration, SystemTime};

use super::*;

fn scratch(name: &str) -> PathBuf {
    let dir = PathBuf::from("target").join("unit-fs").join(name);
    reset_dir(&dir).unwrap();
    dir
}

#[test]
fn modified_time_of_missing_path_is_none() {
    let dir = scratch("missing");
    assert!(modified_time(&dir.join("nope.txt")).unwrap().is_none());
}

#[test]
fn write_atomic_creates_parents_and_leaves_no_temp() {
    let dir = scratch("atomic");
    let path = dir.join("a").join("b").join("song.txt");
    write_atomic(&path, b"hello\n").unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"hello\n");
    let names: Vec<_> = fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names.len(), 1);
}

#[test]
fn ensure_newer_than_nudges_equal_timestamps() {
    let dir = scratch("nudge");
    let path = dir.join("deck.json");
    fs::write(&path, "{}").unwrap();
    let upstream = modified_time(&path).unwrap().unwrap();

    let t = ensure_newer_than(&path, upstream).unwrap();
    assert!(t > upstream);
    assert!(modified_time(&path).unwrap().unwrap() > upstream);
}

#[test]
fn ensure_newer_than_keeps_already_newer_files() {
    let dir = scratch("already-newer");
    let path = dir.join("deck.json");
    fs::write(&path, "{}").unwrap();
    let before = modified_time(&path).unwrap().unwrap();
    let upstream = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000);

    assert_eq!(ensure_newer_than(&path, upstream).unwrap(), before);
}

#[test]
fn list_files_with_ext_filters_and_sorts() {
    let dir = scratch("list");
    fs::write(dir.join("b02.png"), "").unwrap();
    fs::write(dir.join("b01.PNG"), "").unwrap();
    fs::write(dir.join("notes.txt"), "").unwrap();
    fs::create_dir_all(dir.join("sub.png")).unwrap();

    let files = list_files_with_ext(&dir, "png").unwrap();
    let names: Vec<_> = files
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["b01.PNG", "b02.png"]);

    assert!(
        list_files_with_ext(&dir.join("absent"), "png")
            .unwrap()
            .is_empty()
    );
}

#[test]
fn reset_dir_empties_existing_directory() {
    let dir = scratch("reset");
    fs::write(dir.join("old.png"), "").unwrap();
    reset_dir(&dir).unwrap();
    assert!(dir.is_dir());
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
}
