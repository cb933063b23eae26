//! # Docmark
//!
//! Keeps markdown documentation in sync with itself. Directives are HTML
//! comments that render as nothing; docmark fills in the text after them:
//!
//! ```markdown
//! <!---[TOC](./docs)-->
//! 1. [Introduction](docs/1_Introduction.md)
//! 2. Setup
//!     1. [Install](docs/2_Setup/1_Install.md)
//! <!---EndOfToc-->
//! ```
//!
//! The filesystem is the data source: files and directories named
//! `<index>_<CamelName>` are ordered by their index and titled from their
//! name. No front matter, no separate ordering file.
//!
//! # Architecture: Snapshot, Then Passes
//!
//! ```text
//! 1. Scan      project/  →  FileTree          (one walk, in memory)
//! 2. Process   FileTree  →  spliced files     (GENERATE) or problem list (VALIDATE)
//!    Hugo      FileTree  →  hugo/content/     (weighted pages, synthesized indexes)
//! ```
//!
//! Every later pass works on the snapshot, never on the live filesystem, so a
//! run cannot see a half-updated project.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the project once into an arena [`scan::FileTree`] |
//! | [`naming`] | `<index>_<CamelName>` parser and title derivation |
//! | [`toc`] | TOC tree building, validation, rendering, and file order |
//! | [`navigation`] | `[Nav]` breadcrumb lines from the file order |
//! | [`directive`] | Directive matching, region detection, splicing |
//! | [`includes`] | `CodeSnippet`, `Link` and `Dependency` text |
//! | [`process`] | GENERATE and VALIDATE over the whole project |
//! | [`hugo`] | Hugo content projection with menu weights |
//! | [`config`] | `docmark.toml` loading, merging, validation |
//! | [`types`] | Shared types (`Goal`, `DirectiveError`) |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Fatal Versus Collected Errors
//!
//! A broken TOC tree (duplicate or missing indices, a bad directory) stops the
//! run before anything is written: every navigation line depends on it. A
//! stale snippet or a wrong link in one file does not affect any other file,
//! so those problems are collected and reported together at the end.
//!
//! ## Idempotent Regions
//!
//! Every directive owns a region of known shape right after it. GENERATE
//! replaces that region instead of appending, so a second run is a no-op and
//! VALIDATE after GENERATE is always clean.

pub mod config;
pub mod directive;
pub mod hugo;
pub mod includes;
pub mod naming;
pub mod navigation;
pub mod output;
pub mod process;
pub mod scan;
pub mod toc;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
