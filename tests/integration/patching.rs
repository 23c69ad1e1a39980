use super::{avi_bytes, tags, write_avi};
use fourcc_fixer::{
    enumerate, fix_files, BufferedLog, FilePattern, Policy, RunSummary, SearchMode,
};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_whole_tree_is_patched() {
    let dir = TempDir::new().unwrap();
    let xvid = write_avi(&dir.path().join("x.avi"), b"XVID");
    let divx = write_avi(&dir.path().join("shows/d.avi"), b"divx");
    let div3 = write_avi(&dir.path().join("shows/old/o.avi"), b"div3");
    let h264 = write_avi(&dir.path().join("shows/new/n.avi"), b"h264");
    let h264_before = fs::read(&h264).unwrap();

    let files = enumerate(dir.path(), &FilePattern::default(), SearchMode::AllDirectories);
    let mut log = BufferedLog::new();
    let summary = fix_files(&files, &Policy::default(), &mut log);

    assert_eq!(
        summary,
        RunSummary {
            patched: 3,
            unrecognized: 1,
            ..RunSummary::default()
        }
    );
    assert_eq!(tags(&xvid), ("fmp4".into(), "FMP4".into()));
    assert_eq!(tags(&divx), ("fmp4".into(), "FMP4".into()));
    assert_eq!(tags(&div3), ("mp43".into(), "MP43".into()));
    assert_eq!(fs::read(&h264).unwrap(), h264_before);
}

#[test]
fn test_backups_and_conflicts_in_one_run() {
    let dir = TempDir::new().unwrap();
    let fresh = write_avi(&dir.path().join("fresh.avi"), b"xvid");
    let conflicted = write_avi(&dir.path().join("conflicted.avi"), b"xvid");
    fs::write(dir.path().join("conflicted.avi.backup"), b"keep me").unwrap();
    let fresh_before = fs::read(&fresh).unwrap();
    let conflicted_before = fs::read(&conflicted).unwrap();

    let policy = Policy {
        backup: true,
        ..Policy::default()
    };
    let mut log = BufferedLog::new();
    let summary = fix_files([&conflicted, &fresh], &policy, &mut log);

    assert_eq!(summary.patched, 1);
    assert_eq!(summary.failed, 1);
    assert_eq!(
        fs::read(dir.path().join("fresh.avi.backup")).unwrap(),
        fresh_before
    );
    assert_eq!(fs::read(&conflicted).unwrap(), conflicted_before);
    assert_eq!(
        fs::read(dir.path().join("conflicted.avi.backup")).unwrap(),
        b"keep me"
    );
    assert!(log
        .lines()
        .iter()
        .any(|l| l.starts_with("Backup already exists: ")));
}

#[test]
fn test_log_transcript() {
    let dir = TempDir::new().unwrap();
    let good = write_avi(&dir.path().join("good.avi"), b"xvid");
    let other = write_avi(&dir.path().join("other.avi"), b"mjpg");
    let short = dir.path().join("short.avi");
    fs::write(&short, avi_bytes(b"xvid", 100)).unwrap();

    let mut log = BufferedLog::new();
    fix_files([&good, &other, &short], &Policy::default(), &mut log);

    let expected = format!(
        "{good}\nUsed FourCC: xvid\nChanged FourCC: FMP4\n\n\
         {other}\nUsed FourCC: mjpg\nNot divx/xvid/div3 FourCC, skipping\n\n\
         {short}\n",
        good = good.display(),
        other = other.display(),
        short = short.display(),
    );
    assert_eq!(log.contents(), expected);
}

#[test]
fn test_short_header_is_left_alone() {
    let dir = TempDir::new().unwrap();
    let short = dir.path().join("tiny.avi");
    let data = avi_bytes(b"xvid", 115);
    fs::write(&short, &data).unwrap();

    let summary = fix_files([&short], &Policy::default(), &mut BufferedLog::new());

    assert_eq!(summary.too_short, 1);
    assert_eq!(fs::read(&short).unwrap(), data);
}

#[test]
fn test_skip_check_patches_anything() {
    let dir = TempDir::new().unwrap();
    let path = write_avi(&dir.path().join("any.avi"), b"h264");
    let policy = Policy {
        skip_check: true,
        ..Policy::default()
    };

    let summary = fix_files([&path], &policy, &mut BufferedLog::new());

    assert_eq!(summary.patched, 1);
    assert_eq!(tags(&path), ("fmp4".into(), "FMP4".into()));
}
