use std::fs;
use std::time::Duration;

use super::*;
use crate::foundation::fs::{reset_dir, set_modified_time};

fn at(secs: u64) -> SystemTime {
    SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000 + secs)
}

fn song(name: &str) -> SongPaths {
    let root = PathBuf::from("target").join("unit-resolver").join(name);
    reset_dir(&root).unwrap();
    SongPaths {
        song: "tune".to_owned(),
        raw: root.join("00_raw").join("tune.tex"),
        preprocessed: root.join("01_preprocessed").join("tune.txt"),
        deck: root.join("02_pptx").join("tune.json"),
        images: root.join("03_png").join("tune"),
    }
}

fn touch(path: &Path, t: SystemTime) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "x").unwrap();
    set_modified_time(path, t).unwrap();
}

#[test]
fn artifact_status_uses_strict_inequality() {
    assert_eq!(ArtifactStatus::of(None, at(5)), ArtifactStatus::Absent);
    assert_eq!(ArtifactStatus::of(Some(at(6)), at(5)), ArtifactStatus::Fresh);
    assert_eq!(
        ArtifactStatus::of(Some(at(5)), at(5)),
        ArtifactStatus::StaleRelativeTo(at(5))
    );
    assert_eq!(
        ArtifactStatus::of(Some(at(4)), at(5)),
        ArtifactStatus::StaleRelativeTo(at(5))
    );
}

#[test]
fn existing_preprocessed_file_is_kept_even_if_raw_is_newer() {
    let p = song("pre-kept");
    touch(&p.raw, at(10));
    touch(&p.preprocessed, at(1));
    assert_eq!(
        StageResolver::new(&p).preprocessed().unwrap().decision(),
        Decision::SkipFresh
    );
}

#[test]
fn missing_preprocessed_file_blocks_everything_downstream() {
    let p = song("blocked");
    touch(&p.deck, at(10));
    let r = StageResolver::new(&p);

    assert_eq!(r.deck().unwrap(), StageCheck::MissingDependency);
    let plan = r.resolve().unwrap();
    assert_eq!(plan.preprocess, Decision::SkipMissingDependency);
    assert_eq!(plan.deck, Decision::SkipMissingDependency);
    assert_eq!(plan.images, Decision::SkipMissingDependency);
}

#[test]
fn deck_with_equal_mtime_is_regenerated() {
    let p = song("deck-equal");
    touch(&p.raw, at(1));
    touch(&p.preprocessed, at(5));
    touch(&p.deck, at(5));

    let check = StageResolver::new(&p).deck().unwrap();
    assert_eq!(
        check,
        StageCheck::Ready {
            upstream: at(5),
            status: ArtifactStatus::StaleRelativeTo(at(5)),
        }
    );
    assert_eq!(check.decision(), Decision::Generate);
}

#[test]
fn image_folder_is_fresh_only_when_every_member_is_newer() {
    let p = song("images");
    touch(&p.raw, at(1));
    touch(&p.preprocessed, at(2));
    touch(&p.deck, at(3));
    let r = StageResolver::new(&p);

    fs::create_dir_all(&p.images).unwrap();
    assert_eq!(r.images().unwrap().decision(), Decision::Generate);

    touch(&p.images.join("tune01.png"), at(4));
    touch(&p.images.join("tune02.png"), at(4));
    assert_eq!(r.images().unwrap().decision(), Decision::SkipFresh);
    assert_eq!(
        r.resolve().unwrap(),
        Resolution {
            preprocess: Decision::SkipFresh,
            deck: Decision::SkipFresh,
            images: Decision::SkipFresh,
        }
    );

    touch(&p.images.join("tune03.png"), at(2));
    assert_eq!(
        r.images().unwrap(),
        StageCheck::Ready {
            upstream: at(3),
            status: ArtifactStatus::StaleRelativeTo(at(3)),
        }
    );
}

#[test]
fn generate_upstream_predicts_generate_downstream() {
    let p = song("predict");
    touch(&p.raw, at(1));
    let plan = StageResolver::new(&p).resolve().unwrap();
    assert_eq!(plan.preprocess, Decision::Generate);
    assert_eq!(plan.deck, Decision::Generate);
    assert_eq!(plan.images, Decision::Generate);
}

#[test]
fn reconciliation_removes_only_images_older_than_the_deck() {
    let p = song("reconcile");
    touch(&p.images.join("tune01.png"), at(20));
    touch(&p.images.join("tune02.png"), at(20));
    touch(&p.images.join("tune03.png"), at(5));
    touch(&p.images.join("tune04.png"), at(9));
    touch(&p.images.join("notes.txt"), at(1));

    let rec = reconcile_images(&p.images, at(10)).unwrap();
    assert_eq!(
        rec,
        Reconciliation {
            removed: 2,
            retained: 2
        }
    );

    let left = image_members(&p.images).unwrap();
    assert_eq!(
        left,
        vec![p.images.join("tune01.png"), p.images.join("tune02.png")]
    );
    assert!(p.images.join("notes.txt").exists());
}

#[test]
fn forced_resolution_rebuilds_deck_and_images_unless_blocked() {
    let fresh = Resolution {
        preprocess: Decision::SkipFresh,
        deck: Decision::SkipFresh,
        images: Decision::SkipFresh,
    };
    let forced = fresh.forced();
    assert_eq!(forced.preprocess, Decision::SkipFresh);
    assert_eq!(forced.deck, Decision::Generate);
    assert_eq!(forced.images, Decision::Generate);

    let blocked = Resolution {
        preprocess: Decision::SkipMissingDependency,
        deck: Decision::SkipMissingDependency,
        images: Decision::SkipMissingDependency,
    };
    assert_eq!(blocked.forced(), blocked);
}
