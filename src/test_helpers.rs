//! Shared test utilities for the docmark test suite.
//!
//! Builds throwaway projects on disk from `(path, content)` pairs and offers
//! lookups that panic with a readable message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = write_project(&[
//!     ("README.md", "<!---[TOC](./docs)-->\n"),
//!     ("docs/1_Introduction.md", "# Intro\n"),
//! ]);
//! let tree = scan_project(&tmp);
//! let intro = node(&tree, &tmp, "docs/1_Introduction.md");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::config::ProjectConfig;
use crate::scan::{self, FileTree, NodeId};

// =========================================================================
// Fixture setup
// =========================================================================

/// Create a temp project containing the given files.
///
/// A path ending in `/` creates an empty directory.
pub fn write_project(files: &[(&str, &str)]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for (rel, content) in files {
        let path = tmp.path().join(rel);
        if rel.ends_with('/') {
            std::fs::create_dir_all(&path).unwrap();
            continue;
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
    }
    tmp
}

/// Scan a temp project with the default config.
pub fn scan_project(tmp: &TempDir) -> FileTree {
    scan::scan(tmp.path(), &ProjectConfig::default()).unwrap()
}

/// Read a project file back as a string.
pub fn read(tmp: &TempDir, rel: &str) -> String {
    std::fs::read_to_string(tmp.path().join(rel))
        .unwrap_or_else(|e| panic!("cannot read '{rel}': {e}"))
}

// =========================================================================
// Tree lookups: panic with a clear message on miss
// =========================================================================

/// Find a node by project-relative path. Panics if not found.
pub fn node(tree: &FileTree, tmp: &TempDir, rel: &str) -> NodeId {
    tree.lookup(&tmp.path().join(rel)).unwrap_or_else(|| {
        let known: Vec<String> = tree
            .descendants(tree.root())
            .iter()
            .map(|&id| tree.path(id).display().to_string())
            .collect();
        panic!("node '{rel}' not found. Available: {known:?}")
    })
}

/// Project-relative display of a path, for compact assertions.
pub fn rel(tmp: &TempDir, path: &Path) -> String {
    path.strip_prefix(tmp.path())
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}
