use super::write_avi;
use fourcc_fixer::{enumerate, resolve_inputs, FilePattern, InputError, SearchMode};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn library() -> TempDir {
    let dir = TempDir::new().unwrap();
    write_avi(&dir.path().join("a.avi"), b"xvid");
    write_avi(&dir.path().join("Films/b.avi"), b"divx");
    write_avi(&dir.path().join("Films/Old/c.AVI"), b"div3");
    fs::write(dir.path().join("Films/readme.txt"), b"not a video").unwrap();
    fs::write(dir.path().join("Films/b.avi.backup"), b"old backup").unwrap();
    dir
}

fn sorted(mut paths: Vec<PathBuf>) -> Vec<PathBuf> {
    paths.sort();
    paths
}

#[test]
fn test_recursive_scan_finds_only_avi_files() {
    let dir = library();
    let found = enumerate(dir.path(), &FilePattern::default(), SearchMode::AllDirectories);

    assert_eq!(
        sorted(found),
        vec![
            dir.path().join("Films/Old/c.AVI"),
            dir.path().join("Films/b.avi"),
            dir.path().join("a.avi"),
        ]
    );
}

#[test]
fn test_top_level_scan() {
    let dir = library();
    let found = enumerate(dir.path(), &FilePattern::default(), SearchMode::TopDirectoryOnly);
    assert_eq!(found, vec![dir.path().join("a.avi")]);
}

#[test]
fn test_resolution_rejects_backup_file_argument() {
    let dir = library();
    let result = resolve_inputs(
        &[dir.path().join("Films/b.avi.backup")],
        &FilePattern::default(),
        SearchMode::AllDirectories,
    );
    assert!(matches!(result, Err(InputError::InvalidPath { .. })));
}

#[test]
#[cfg(unix)]
fn test_unreadable_subtree_does_not_hide_siblings() {
    use std::os::unix::fs::PermissionsExt;

    let dir = library();
    write_avi(&dir.path().join("Private/secret.avi"), b"xvid");
    let private = dir.path().join("Private");
    fs::set_permissions(&private, fs::Permissions::from_mode(0o000)).unwrap();
    let privileged = fs::read_dir(&private).is_ok();

    let found = enumerate(dir.path(), &FilePattern::default(), SearchMode::AllDirectories);

    fs::set_permissions(&private, fs::Permissions::from_mode(0o755)).unwrap();

    let expected = if privileged { 4 } else { 3 };
    assert_eq!(found.len(), expected);
    assert!(found.contains(&dir.path().join("Films/Old/c.AVI")));
}

#[test]
fn test_failing_roots_contribute_nothing() {
    let dir = library();
    let roots = [
        dir.path().join("Vanished"),
        dir.path().join("a.avi"),
        dir.path().join("Films"),
    ];

    let mut found = Vec::new();
    for root in &roots {
        found.extend(enumerate(root, &FilePattern::default(), SearchMode::AllDirectories));
    }

    assert_eq!(
        sorted(found),
        vec![dir.path().join("Films/Old/c.AVI"), dir.path().join("Films/b.avi")]
    );
}
