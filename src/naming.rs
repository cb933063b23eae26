//! Filename parsing for the `<index>_<CamelCaseName>[.md]` convention.
//!
//! Every entry that takes part in a table of contents is named with a numeric
//! index, one or more underscores and a camel-case name. The index gives the
//! position among siblings, the name becomes the display title:
//!
//! - `1_Introduction.md` → index 1, "Introduction"
//! - `02_docs` → index 2, "Docs"
//! - `3_ADifferentChapter.md` → index 3, "A different chapter"
//!
//! Anything else (`notIndexed.md`, `README.md`, `images/`) does not parse.
//! Whether that is an error is up to the caller: the TOC builder rejects a
//! non-indexed directory it was asked to traverse, but silently skips
//! non-indexed files.

use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

static INDEXED_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)_+([A-Za-z]\w*)(\.md)?$").unwrap());

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NamingError {
    #[error("Name '{name}' does not match <index>_<Name>[.md] (in path {})", .path.display())]
    NotIndexed { name: String, path: PathBuf },
    #[error("Index of '{name}' is out of range (in path {})", .path.display())]
    IndexOutOfRange { name: String, path: PathBuf },
}

/// Result of parsing an indexed entry name like `02_FirstDocs.md`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedName {
    pub index: u32,
    /// The captured name with the index and `.md` stripped (`FirstDocs`).
    pub name: String,
    /// Display title derived from the name (`First docs`).
    pub title: String,
}

/// Parse the last segment of `path` as an indexed name.
pub fn parse_indexed_path(path: &Path) -> Result<IndexedName, NamingError> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    parse_indexed_name(&name, path)
}

/// Parse `name`; `path` is only used to report where the name came from.
pub fn parse_indexed_name(name: &str, path: &Path) -> Result<IndexedName, NamingError> {
    let captures = INDEXED_NAME
        .captures(name)
        .ok_or_else(|| NamingError::NotIndexed {
            name: name.to_string(),
            path: path.to_path_buf(),
        })?;

    let index = captures[1]
        .parse::<u32>()
        .map_err(|_| NamingError::IndexOutOfRange {
            name: name.to_string(),
            path: path.to_path_buf(),
        })?;
    let raw = &captures[2];

    Ok(IndexedName {
        index,
        name: raw.to_string(),
        title: title_from_camel_case(raw),
    })
}

/// Cheap check used to filter candidate files before parsing them.
pub fn is_indexed_name(name: &str) -> bool {
    INDEXED_NAME.is_match(name)
}

/// The name without its index: `02_docs` → `docs`, `images` → `images`.
pub fn strip_index(name: &str) -> String {
    match INDEXED_NAME.captures(name) {
        Some(captures) => captures[2].to_string(),
        None => name.strip_suffix(".md").unwrap_or(name).to_string(),
    }
}

/// Split a camel-case word run into a sentence.
///
/// Every uppercase letter after the first character starts a new word and is
/// lower-cased; the first character is upper-cased. Consecutive capitals are
/// split one letter at a time (`AAA` → `A a a`).
pub fn title_from_camel_case(raw: &str) -> String {
    let mut title = String::with_capacity(raw.len() + 8);
    let mut chars = raw.chars();
    if let Some(first) = chars.next() {
        title.extend(first.to_uppercase());
    }
    for c in chars {
        if c.is_uppercase() {
            title.push(' ');
            title.extend(c.to_lowercase());
        } else {
            title.push(c);
        }
    }
    title
}
