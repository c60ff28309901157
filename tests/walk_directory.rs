// tests/walk_directory.rs

use std::path::{Path, PathBuf};

use ww::errors::WwError;
use ww::fs::MockFileSystem;
use ww::watch::{walk_directory, NameExcludes};

fn paths(list: &[&str]) -> Vec<PathBuf> {
    list.iter().map(PathBuf::from).collect()
}

fn excludes(patterns: &[&str]) -> NameExcludes {
    NameExcludes::new(patterns).unwrap()
}

#[test]
fn excluded_directory_is_skipped_with_its_subtree() {
    let fs = MockFileSystem::new();
    fs.add_file("./README.md");
    fs.add_file("./src/main.rs");
    fs.add_file("./.git/HEAD");
    fs.add_file("./.git/objects/ab");

    let walked = walk_directory(&fs, Path::new("."), &excludes(&[".git"])).unwrap();

    assert_eq!(walked, paths(&[".", "./README.md", "./src", "./src/main.rs"]));
}

#[test]
fn glob_patterns_match_basenames_at_any_depth() {
    let fs = MockFileSystem::new();
    fs.add_file("./a.rs");
    fs.add_file("./a.rs.swp");
    fs.add_file("./nested/deeper/b.swp");
    fs.add_file("./nested/deeper/b.rs");

    let walked = walk_directory(&fs, Path::new("."), &excludes(&["*.swp"])).unwrap();

    assert_eq!(
        walked,
        paths(&[".", "./a.rs", "./nested", "./nested/deeper", "./nested/deeper/b.rs"])
    );
}

#[test]
fn no_excludes_returns_everything() {
    let fs = MockFileSystem::new();
    fs.add_file("./.git/HEAD");
    fs.add_file("./x");

    let walked = walk_directory(&fs, Path::new("."), &NameExcludes::empty()).unwrap();

    assert_eq!(walked, paths(&[".", "./.git", "./.git/HEAD", "./x"]));
}

#[test]
fn linked_directory_is_listed_but_not_walked_twice() {
    let fs = MockFileSystem::new();
    fs.add_dir("./real");
    fs.add_file("./real/a.txt");
    fs.add_dir_link("./link", "./real");

    let walked = walk_directory(&fs, Path::new("."), &NameExcludes::empty()).unwrap();

    assert_eq!(walked, paths(&[".", "./link", "./real", "./real/a.txt"]));
}

#[test]
fn link_back_to_the_root_does_not_loop() {
    let fs = MockFileSystem::new();
    fs.add_file("./file");
    fs.add_dir_link("./loop", ".");

    let walked = walk_directory(&fs, Path::new("."), &NameExcludes::empty()).unwrap();

    assert_eq!(walked, paths(&[".", "./file", "./loop"]));
}

#[test]
fn unreadable_nested_directory_is_kept_but_not_descended() {
    let fs = MockFileSystem::new();
    fs.add_file("./private/secret");
    fs.add_file("./public/info");
    fs.set_unreadable("./private");

    let walked = walk_directory(&fs, Path::new("."), &NameExcludes::empty()).unwrap();

    assert_eq!(
        walked,
        paths(&[".", "./private", "./public", "./public/info"])
    );
}

#[test]
fn unreadable_root_is_an_error() {
    let fs = MockFileSystem::new();
    fs.set_unreadable(".");

    match walk_directory(&fs, Path::new("."), &NameExcludes::empty()) {
        Err(WwError::ConfigError(msg)) => assert!(msg.contains("cannot read watch root")),
        other => panic!("Expected ConfigError, got: {other:?}"),
    }
}

#[test]
fn star_does_not_cross_path_separators() {
    let set = excludes(&["src*"]);

    assert!(set.matches_basename(Path::new("./srcfoo")));
    assert!(!set.matches_basename(Path::new("./lib")));
    assert_eq!(set.patterns(), &["src*".to_string()]);
}
