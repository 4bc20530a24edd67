use colly::collector::{CollectedFile, FileCollector};
use colly::errors::CollyError;
use colly::ignore::ExclusionSet;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn setup_project() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
    fs::write(root.join("b.txt"), "bravo").unwrap();
    fs::write(root.join("a.txt"), "alpha").unwrap();
    fs::write(root.join("debug.log"), "noise").unwrap();
    fs::write(root.join("sub/c.py"), "print('c')").unwrap();
    fs::write(root.join("node_modules/pkg/index.js"), "module.exports = 1").unwrap();
    dir
}

fn paths(files: Vec<CollectedFile>) -> Vec<PathBuf> {
    files.into_iter().map(|file| file.path).collect()
}

fn pattern(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

#[test]
fn test_walks_directory_in_sorted_order_and_prunes_exclusions() {
    let dir = setup_project();
    let root = dir.path();
    let exclusions = ExclusionSet::new(&[]);
    let collector = FileCollector::new(&exclusions, false, false);

    let files = paths(collector.collect(&[pattern(root)]).unwrap());

    assert_eq!(
        files,
        vec![root.join("a.txt"), root.join("b.txt"), root.join("sub/c.py")],
        "Unexpected collection: {:?}",
        files
    );
}

#[test]
fn test_relative_paths_start_at_the_named_root() {
    let dir = setup_project();
    let root = dir.path();
    let exclusions = ExclusionSet::new(&[]);
    let collector = FileCollector::new(&exclusions, false, false);

    let files = collector
        .collect(&[
            pattern(root),
            pattern(&root.join("debug.log")),
            format!("{}/su*/*.py", root.display()),
        ])
        .unwrap();
    let relative: Vec<PathBuf> = files.into_iter().map(|file| file.relative).collect();

    assert_eq!(
        relative,
        vec![
            PathBuf::from("a.txt"),
            PathBuf::from("b.txt"),
            PathBuf::from("sub/c.py"),
        ]
    );

    let files = FileCollector::new(&ExclusionSet::from_patterns(Vec::new()), false, false)
        .collect(&[pattern(&root.join("sub")), pattern(&root.join("debug.log"))])
        .unwrap();
    let relative: Vec<PathBuf> = files.into_iter().map(|file| file.relative).collect();
    assert_eq!(relative, vec![PathBuf::from("c.py"), PathBuf::from("debug.log")]);
}

#[test]
fn test_never_returns_duplicates() {
    let dir = setup_project();
    let root = dir.path();
    let exclusions = ExclusionSet::new(&[]);
    let collector = FileCollector::new(&exclusions, false, false);

    let files = paths(collector
        .collect(&[
            pattern(&root.join("a.txt")),
            pattern(root),
            pattern(&root.join("*.txt")),
        ])
        .unwrap());

    let unique: HashSet<PathBuf> = files.iter().map(|p| fs::canonicalize(p).unwrap()).collect();
    assert_eq!(unique.len(), files.len(), "Duplicates in {:?}", files);
    assert_eq!(files[0], root.join("a.txt"), "Input order must be kept");
    assert_eq!(files.len(), 3);
}

#[test]
fn test_never_returns_excluded_paths() {
    let dir = setup_project();
    let root = dir.path();
    let exclusions = ExclusionSet::new(&["*.txt".to_string()]);
    let collector = FileCollector::new(&exclusions, false, false);

    let files = paths(collector.collect(&[pattern(root)]).unwrap());

    for file in &files {
        let relative = file.strip_prefix(root).unwrap();
        assert!(
            !exclusions.is_excluded(relative),
            "Excluded path returned: {}",
            file.display()
        );
    }
    assert_eq!(files, vec![root.join("sub/c.py")]);
}

#[test]
fn test_glob_expansion_is_recursive() {
    let dir = setup_project();
    let root = dir.path();
    fs::write(root.join("top.py"), "x = 1").unwrap();
    let exclusions = ExclusionSet::new(&[]);
    let collector = FileCollector::new(&exclusions, false, false);

    let mut files = paths(collector
        .collect(&[format!("{}/**/*.py", root.display())])
        .unwrap());
    files.sort();

    assert_eq!(files, vec![root.join("sub/c.py"), root.join("top.py")]);
}

#[test]
fn test_glob_matching_a_directory_walks_it() {
    let dir = setup_project();
    let root = dir.path();
    let exclusions = ExclusionSet::new(&[]);
    let collector = FileCollector::new(&exclusions, false, false);

    let files = paths(collector.collect(&[format!("{}/su*", root.display())]).unwrap());

    assert_eq!(files, vec![root.join("sub/c.py")]);
}

#[test]
fn test_missing_path_warns_unless_strict() {
    let dir = setup_project();
    let root = dir.path();
    let exclusions = ExclusionSet::new(&[]);
    let missing = pattern(&root.join("does-not-exist.rs"));

    let lenient = FileCollector::new(&exclusions, false, false);
    let files = paths(lenient
        .collect(&[missing.clone(), pattern(&root.join("a.txt"))])
        .unwrap());
    assert_eq!(files, vec![root.join("a.txt")]);

    let strict = FileCollector::new(&exclusions, false, true);
    let result = strict.collect(&[missing, pattern(&root.join("a.txt"))]);
    assert!(
        matches!(result, Err(CollyError::CollectionError(_))),
        "Expected collection error, got {:?}",
        result
    );
}

#[test]
fn test_no_matches_is_a_collection_error() {
    let dir = tempdir().unwrap();
    let exclusions = ExclusionSet::new(&[]);
    let collector = FileCollector::new(&exclusions, false, false);

    let result = collector.collect(&[format!("{}/*.nothing", dir.path().display())]);

    assert!(matches!(result, Err(CollyError::CollectionError(_))));
}

#[test]
fn test_explicit_file_is_checked_against_exclusions() {
    let dir = setup_project();
    let root = dir.path();
    let exclusions = ExclusionSet::new(&[]);
    let collector = FileCollector::new(&exclusions, false, false);

    let files = paths(collector
        .collect(&[pattern(&root.join("debug.log")), pattern(&root.join("b.txt"))])
        .unwrap());

    assert_eq!(files, vec![root.join("b.txt")]);
}

#[cfg(unix)]
#[test]
fn test_symlinks_follow_policy() {
    let outside = tempdir().unwrap();
    fs::write(outside.path().join("target.md"), "linked").unwrap();

    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::write(root.join("real.md"), "real").unwrap();
    std::os::unix::fs::symlink(outside.path().join("target.md"), root.join("link.md")).unwrap();

    let exclusions = ExclusionSet::new(&[]);

    let files = paths(FileCollector::new(&exclusions, false, false)
        .collect(&[pattern(root)])
        .unwrap());
    assert_eq!(files, vec![root.join("real.md")]);

    let files = paths(FileCollector::new(&exclusions, true, false)
        .collect(&[pattern(root)])
        .unwrap());
    assert_eq!(files, vec![root.join("link.md"), root.join("real.md")]);
}
