//! Source scanner tests over temporary trees.

use std::fs;
use std::path::Path;

use reelcheck_core::errors::ScanError;
use reelcheck_sources::SourceTree;

/// Named fixture roots keep temp-dir naming out of reported paths.
fn fixture_root() -> tempfile::TempDir {
    tempfile::Builder::new().prefix("src").tempdir().unwrap()
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn open_rejects_missing_root() {
    let err = SourceTree::open("/definitely/not/here").unwrap_err();
    assert!(matches!(err, ScanError::RootNotFound { .. }));
}

#[test]
fn find_file_skips_dependency_and_hidden_dirs() {
    let dir = fixture_root();
    write(dir.path(), "node_modules/pkg/scoring.ts", "stale");
    write(dir.path(), ".cache/scoring.ts", "hidden");
    write(dir.path(), "lib/engine/scoring.ts", "real");

    let tree = SourceTree::open(dir.path()).unwrap();
    let found = tree.find_file("scoring.ts").unwrap();
    assert!(found.ends_with("lib/engine/scoring.ts"));
    assert!(tree.find_file("absent.ts").is_none());
}

#[test]
fn hidden_files_are_found_outside_hidden_dirs() {
    let dir = fixture_root();
    write(dir.path(), ".env.example", "API_URL=");
    write(dir.path(), ".git/.env.example", "stale");

    let tree = SourceTree::open(dir.path()).unwrap();
    let found = tree.find_file(".env.example").unwrap();
    assert_eq!(tree.relative(&found), Path::new(".env.example"));
}

#[test]
fn find_file_where_matches_name_predicates() {
    let dir = fixture_root();
    write(dir.path(), "Views/PostWatchFeedbackView.swift", "struct V {}");
    write(dir.path(), "Views/feedback.md", "notes");

    let tree = SourceTree::open(dir.path()).unwrap();
    let found = tree
        .find_file_where(|name| name.to_lowercase().contains("feedback") && name.ends_with(".swift"))
        .unwrap();
    assert!(found.ends_with("Views/PostWatchFeedbackView.swift"));
    assert!(tree.find_file_where(|name| name.ends_with(".kt")).is_none());
}

#[test]
fn find_file_is_deterministic() {
    let dir = fixture_root();
    write(dir.path(), "b/Info.plist", "b");
    write(dir.path(), "a/Info.plist", "a");

    let tree = SourceTree::open(dir.path()).unwrap();
    for _ in 0..3 {
        assert!(tree.find_file("Info.plist").unwrap().ends_with("a/Info.plist"));
    }
}

#[test]
fn grep_is_case_insensitive_with_line_numbers() {
    let dir = fixture_root();
    write(
        dir.path(),
        "app/page.tsx",
        "export default function Page() {\n  return <p>Lorem Ipsum</p>;\n}\n",
    );
    write(dir.path(), "dist/page.js", "lorem ipsum");
    write(dir.path(), "assets/logo.png", "lorem ipsum");

    let tree = SourceTree::open(dir.path()).unwrap();
    let matches = tree.grep_tree("lorem ipsum").unwrap();
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].line_number, 2);
    assert_eq!(matches[0].line, "return <p>Lorem Ipsum</p>;");
    assert!(tree.relative(&matches[0].path).ends_with("app/page.tsx"));
}

#[test]
fn grep_skips_non_utf8_files() {
    let dir = fixture_root();
    fs::write(dir.path().join("blob.json"), [0xff, 0xfe, 0x00, 0x41]).unwrap();
    write(dir.path(), "ok.json", "{\"key\": \"A\"}");

    let tree = SourceTree::open(dir.path()).unwrap();
    let matches = tree.grep_tree("a").unwrap();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].path.ends_with("ok.json"));
}

#[test]
fn invalid_pattern_is_the_only_error() {
    let dir = fixture_root();
    let tree = SourceTree::open(dir.path()).unwrap();
    let err = tree.grep_tree("(unclosed").unwrap_err();
    assert!(matches!(err, ScanError::InvalidPattern { .. }));
}

#[test]
fn grep_where_filters_paths() {
    let dir = fixture_root();
    write(dir.path(), "server/keys.ts", "const SERVICE_ROLE = process.env.KEY");
    write(dir.path(), "client/keys.ts", "const SERVICE_ROLE = 'abc'");

    let tree = SourceTree::open(dir.path()).unwrap();
    let matches = tree
        .grep_where("service_role", |p| p.components().any(|c| c.as_os_str() == "client"))
        .unwrap();
    assert_eq!(matches.len(), 1);
    assert!(matches[0].path.ends_with("client/keys.ts"));
}

#[test]
fn read_text_and_git_head() {
    let dir = fixture_root();
    write(dir.path(), ".git/HEAD", "ref: refs/heads/main\n");
    write(dir.path(), "README.md", "hello");

    let tree = SourceTree::open(dir.path()).unwrap();
    assert_eq!(tree.read_text(Path::new("README.md")).as_deref(), Some("hello"));
    assert!(tree.read_text(Path::new("missing.md")).is_none());
    assert_eq!(tree.git_head().as_deref(), Some("main"));
}

#[test]
fn git_head_detached_returns_hash() {
    let dir = fixture_root();
    write(dir.path(), ".git/HEAD", "3f2a9c0d1e\n");
    let tree = SourceTree::open(dir.path()).unwrap();
    assert_eq!(tree.git_head().as_deref(), Some("3f2a9c0d1e"));
}
