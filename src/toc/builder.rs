use super::{TocItem, TocNode, TocRoot};
use crate::naming::{self, NamingError};
use crate::scan::{FileTree, NodeId, relative_link};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TocError {
    #[error("[TOC] Same TOC indices[{index}] used by multiple files [{}]", .paths.join(", "))]
    DuplicateIndex { index: u32, paths: Vec<String> },
    #[error("[TOC] Missing index {expected} for TOC in directory '{directory}'")]
    MissingIndex { expected: u32, directory: String },
    #[error("[TOC] {0}")]
    Naming(#[from] NamingError),
}

type TraversePredicate<'a> = Box<dyn Fn(&FileTree, NodeId) -> bool + 'a>;

/// Builds a [`TocRoot`] from a directory of the project snapshot.
///
/// Files are included when their name is indexed. Directories are included
/// when the traverse predicate accepts them (all of them by default) and must
/// then carry an indexed name themselves.
pub struct TocBuilder<'a> {
    tree: &'a FileTree,
    links_relative_to: PathBuf,
    traverse: TraversePredicate<'a>,
}

impl<'a> TocBuilder<'a> {
    pub fn new(tree: &'a FileTree, links_relative_to: &Path) -> Self {
        Self {
            tree,
            links_relative_to: links_relative_to.to_path_buf(),
            traverse: Box::new(|_, _| true),
        }
    }

    pub fn with_traverse(mut self, traverse: impl Fn(&FileTree, NodeId) -> bool + 'a) -> Self {
        self.traverse = Box::new(traverse);
        self
    }

    /// Build and validate the tree below `scan_base`.
    ///
    /// Validation runs at every level and does not stop at the first bad
    /// directory: all problems found anywhere in the tree are returned.
    pub fn build(&self, scan_base: NodeId) -> Result<TocRoot, Vec<TocError>> {
        let mut errors = Vec::new();
        let children = self.build_level(scan_base, &mut errors);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(TocRoot {
            directory: scan_base,
            path: self.tree.path(scan_base).to_path_buf(),
            children,
        })
    }

    fn build_level(&self, directory: NodeId, errors: &mut Vec<TocError>) -> Vec<TocNode> {
        let mut nodes = Vec::new();

        for &child in self.tree.children(directory) {
            if self.tree.is_dir(child) {
                if !(self.traverse)(self.tree, child) {
                    continue;
                }
                let children = self.build_level(child, errors);
                match self.item(child) {
                    Ok(item) => nodes.push(TocNode::Directory { item, children }),
                    Err(e) => errors.push(e.into()),
                }
            } else if naming::is_indexed_name(self.tree.name(child)) {
                match self.item(child) {
                    Ok(item) => nodes.push(TocNode::File(item)),
                    Err(e) => errors.push(e.into()),
                }
            }
        }

        nodes.sort_by_key(TocNode::index);
        errors.extend(self.validate_level(directory, &nodes));
        nodes
    }

    fn item(&self, node: NodeId) -> Result<TocItem, NamingError> {
        let path = self.tree.path(node);
        let parsed = naming::parse_indexed_name(self.tree.name(node), path)?;
        Ok(TocItem {
            index: parsed.index,
            title: parsed.title,
            link: relative_link(&self.links_relative_to, path),
            path: path.to_path_buf(),
            node,
        })
    }

    /// Indices of one sibling list (already sorted) must be exactly `1..=N`.
    fn validate_level(&self, directory: NodeId, nodes: &[TocNode]) -> Vec<TocError> {
        let mut by_index: BTreeMap<u32, Vec<&TocItem>> = BTreeMap::new();
        for node in nodes {
            by_index.entry(node.index()).or_default().push(node.item());
        }

        let duplicates: Vec<TocError> = by_index
            .into_iter()
            .filter(|(_, items)| items.len() > 1)
            .map(|(index, mut items)| {
                items.sort_by(|a, b| a.path.cmp(&b.path));
                TocError::DuplicateIndex {
                    index,
                    paths: items.iter().map(|i| i.link.clone()).collect(),
                }
            })
            .collect();
        if !duplicates.is_empty() {
            return duplicates;
        }

        for (position, node) in nodes.iter().enumerate() {
            let expected = position as u32 + 1;
            if node.index() != expected {
                return vec![TocError::MissingIndex {
                    expected,
                    directory: self.tree.name(directory).to_string(),
                }];
            }
        }
        vec![]
    }
}
