//! Table-of-contents model.
//!
//! A `[TOC]` directive points at a directory (the scan base). That directory
//! is turned into an ordered, validated tree of indexed entries:
//!
//! ```text
//! docs/                         TocRoot
//! ├── 1_Introduction.md         ├── File      1 Introduction
//! ├── 02_docs/                  ├── Directory 2 Docs
//! │   ├── 1_FirstDocs.md        │   ├── File  1 First docs
//! │   └── 2_SecondDocs.md       │   └── File  2 Second docs
//! ├── 3_chapter.md              └── File      3 Chapter
//! └── notIndexed.md             (skipped: not an indexed name)
//! ```
//!
//! The same tree feeds two consumers:
//!
//! - [`render`] produces the markdown list spliced after the directive.
//! - [`NavigationOrder`] flattens it to files only, giving each file its
//!   previous and next neighbour for `[Nav]` breadcrumbs.
//!
//! Trees are built per directive and dropped once its text is rendered.

mod builder;
mod linker;
mod render;

pub use builder::{TocBuilder, TocError};
pub use linker::NavigationOrder;
pub use render::{END_OF_TOC, render};

use crate::scan::NodeId;
use std::path::PathBuf;

/// Data shared by directory and file entries.
#[derive(Debug, Clone, PartialEq)]
pub struct TocItem {
    pub index: u32,
    pub title: String,
    /// Path of the entry relative to the directory links are written from.
    pub link: String,
    /// Absolute path of the backing file or directory.
    pub path: PathBuf,
    pub node: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TocNode {
    Directory {
        item: TocItem,
        children: Vec<TocNode>,
    },
    File(TocItem),
}

impl TocNode {
    pub fn item(&self) -> &TocItem {
        match self {
            TocNode::Directory { item, .. } => item,
            TocNode::File(item) => item,
        }
    }

    pub fn index(&self) -> u32 {
        self.item().index
    }

    pub fn children(&self) -> &[TocNode] {
        match self {
            TocNode::Directory { children, .. } => children,
            TocNode::File(_) => &[],
        }
    }
}

/// The scanned directory itself. It has no index or title of its own: it
/// stands for the file holding the directive, not for a TOC entry.
#[derive(Debug, Clone, PartialEq)]
pub struct TocRoot {
    pub directory: NodeId,
    pub path: PathBuf,
    pub children: Vec<TocNode>,
}
