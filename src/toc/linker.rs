use super::{TocItem, TocNode, TocRoot};
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};

/// Files of a TOC in document order, with O(1) neighbour lookup by path.
///
/// Directories are structural only and never appear in the sequence.
#[derive(Debug, Clone, Default)]
pub struct NavigationOrder {
    files: Vec<TocItem>,
    by_path: HashMap<PathBuf, usize>,
}

impl NavigationOrder {
    pub fn new(root: &TocRoot) -> Self {
        let mut order = NavigationOrder::default();

        // A directory's children go to the front of the queue so they are
        // visited before its later siblings: same order as the rendered list.
        let mut queue: VecDeque<&TocNode> = root.children.iter().collect();
        while let Some(node) = queue.pop_front() {
            match node {
                TocNode::Directory { children, .. } => {
                    for child in children.iter().rev() {
                        queue.push_front(child);
                    }
                }
                TocNode::File(item) => order.push(item),
            }
        }
        order
    }

    fn push(&mut self, item: &TocItem) {
        self.by_path.insert(item.path.clone(), self.files.len());
        self.files.push(item.clone());
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.by_path.contains_key(path)
    }

    pub fn predecessor(&self, path: &Path) -> Option<&TocItem> {
        let position = *self.by_path.get(path)?;
        position.checked_sub(1).and_then(|p| self.files.get(p))
    }

    pub fn successor(&self, path: &Path) -> Option<&TocItem> {
        let position = *self.by_path.get(path)?;
        self.files.get(position + 1)
    }

    pub fn files(&self) -> &[TocItem] {
        &self.files
    }
}
