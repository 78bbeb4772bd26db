//! Source text scanner: file lookup and line-oriented regex search.
//!
//! Deliberately shallow. Checks use it to approximate "does the source encode
//! invariant X" without parsing any language; results feed a human-reviewed
//! report, so false positives and negatives are tolerated.

use std::path::{Path, PathBuf};

use ignore::{DirEntry, Walk, WalkBuilder};
use regex::{Regex, RegexBuilder};
use reelcheck_core::errors::ScanError;

/// Build, dependency and VCS directories never descended into.
pub const SKIP_DIRS: &[&str] = &[
    "node_modules",
    "target",
    "build",
    "dist",
    "Pods",
    "DerivedData",
    "vendor",
    "coverage",
    ".git",
    ".next",
    ".expo",
];

/// Extensions treated as searchable text.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "ts", "tsx", "js", "jsx", "mjs", "cjs", "json", "html", "css", "scss", "md", "txt", "toml",
    "yaml", "yml", "xml", "sql", "swift", "m", "h", "plist", "xcprivacy", "entitlements",
    "pbxproj", "rs", "py", "kt", "java", "gradle",
];

/// Files larger than this are not searched.
const MAX_GREP_FILE_BYTES: u64 = 2 * 1024 * 1024;

/// One matching line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrepMatch {
    pub path: PathBuf,
    /// 1-based.
    pub line_number: usize,
    pub line: String,
}

/// A read-only source tree rooted at a directory.
#[derive(Debug, Clone)]
pub struct SourceTree {
    root: PathBuf,
}

impl SourceTree {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, ScanError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(ScanError::RootNotFound { path: root });
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Depth-first search for a file named exactly `filename`. Returns the
    /// first match in file-name order, skipping hidden and build directories.
    pub fn find_file(&self, filename: &str) -> Option<PathBuf> {
        self.find_file_where(|name| name == filename)
    }

    /// Like [`find_file`](Self::find_file), matching file names with a
    /// predicate instead.
    pub fn find_file_where(&self, matches: impl Fn(&str) -> bool) -> Option<PathBuf> {
        self.walk()
            .filter_map(Result::ok)
            .filter(is_file)
            .find(|entry| entry.file_name().to_str().is_some_and(&matches))
            .map(DirEntry::into_path)
    }

    /// Case-insensitive regex search over every text file under the root.
    /// Unreadable or non-UTF-8 files are skipped.
    pub fn grep_tree(&self, pattern: &str) -> Result<Vec<GrepMatch>, ScanError> {
        self.grep_where(pattern, |_| true)
    }

    /// Like [`grep_tree`](Self::grep_tree), restricted to files whose path
    /// satisfies `include`.
    pub fn grep_where(
        &self,
        pattern: &str,
        include: impl Fn(&Path) -> bool,
    ) -> Result<Vec<GrepMatch>, ScanError> {
        let regex = compile(pattern)?;
        let mut matches = Vec::new();
        for entry in self.walk().filter_map(Result::ok).filter(is_file) {
            let path = entry.path();
            if !is_text_file(path) || !include(path) {
                continue;
            }
            if entry.metadata().map(|m| m.len() > MAX_GREP_FILE_BYTES).unwrap_or(true) {
                continue;
            }
            grep_file(&regex, path, &mut matches);
        }
        Ok(matches)
    }

    /// Search a single file. A missing or unreadable file yields no matches.
    pub fn grep_file(&self, path: &Path, pattern: &str) -> Result<Vec<GrepMatch>, ScanError> {
        let regex = compile(pattern)?;
        let mut matches = Vec::new();
        grep_file(&regex, path, &mut matches);
        Ok(matches)
    }

    /// Best-effort read of a file, relative to the root or absolute.
    pub fn read_text(&self, path: &Path) -> Option<String> {
        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        std::fs::read_to_string(full).ok()
    }

    /// Advisory read of `.git/HEAD`: the checked-out branch, or the commit
    /// hash when detached. Never writes.
    pub fn git_head(&self) -> Option<String> {
        let head = self.read_text(Path::new(".git/HEAD"))?;
        let head = head.trim();
        Some(
            head.strip_prefix("ref: refs/heads/")
                .unwrap_or(head)
                .to_string(),
        )
    }

    /// Path relative to the root, for display.
    pub fn relative<'a>(&self, path: &'a Path) -> &'a Path {
        path.strip_prefix(&self.root).unwrap_or(path)
    }

    fn walk(&self) -> Walk {
        WalkBuilder::new(&self.root)
            .standard_filters(false)
            .follow_links(false)
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(|entry| !is_skipped_dir(entry))
            .build()
    }
}

fn compile(pattern: &str) -> Result<Regex, ScanError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| ScanError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })
}

fn grep_file(regex: &Regex, path: &Path, out: &mut Vec<GrepMatch>) {
    let Ok(content) = std::fs::read_to_string(path) else {
        tracing::trace!(path = %path.display(), "scanner: skipping unreadable file");
        return;
    };
    for (idx, line) in content.lines().enumerate() {
        if regex.is_match(line) {
            out.push(GrepMatch {
                path: path.to_path_buf(),
                line_number: idx + 1,
                line: line.trim().to_string(),
            });
        }
    }
}

fn is_file(entry: &DirEntry) -> bool {
    entry.file_type().is_some_and(|t| t.is_file())
}

/// Hidden directories and [`SKIP_DIRS`] below the root. Hidden files are
/// still visited.
fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_some_and(|t| t.is_dir())
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.starts_with('.') || SKIP_DIRS.contains(&name))
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| TEXT_EXTENSIONS.iter().any(|t| t.eq_ignore_ascii_case(ext)))
}
