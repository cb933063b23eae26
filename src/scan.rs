//! Project snapshot.
//!
//! The first and only filesystem walk of a run. Everything later (TOC trees,
//! navigation, Hugo projection) works on the in-memory [`FileTree`] produced
//! here, so a run sees one consistent view of the project.
//!
//! ## Skipped Entries
//!
//! - Hidden files and directories (leading `.`)
//! - Directories named in `excluded_directories`
//! - The Hugo output directory, so projected pages are never re-read as sources
//!
//! ## Layout
//!
//! Nodes live in an arena indexed by [`NodeId`]. Children are stored in
//! file-name order. The tree carries no build-mode state; per-run data such as
//! the Hugo generation information lives in side tables keyed by `NodeId`.

use crate::config::ProjectConfig;
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Project root is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("Entry has no parent in the snapshot: {}", .0.display())]
    Orphan(PathBuf),
}

/// Index of a node in a [`FileTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Directory { children: Vec<NodeId> },
    File,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,
    /// Absolute, lexically normalized path.
    pub path: PathBuf,
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
}

/// Arena snapshot of a directory tree.
#[derive(Debug)]
pub struct FileTree {
    nodes: Vec<Node>,
    by_path: HashMap<PathBuf, NodeId>,
}

impl FileTree {
    /// A tree holding only its root directory.
    pub fn new(root: &Path) -> Self {
        let root = normalize_path(root);
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let mut by_path = HashMap::new();
        by_path.insert(root.clone(), NodeId(0));
        Self {
            nodes: vec![Node {
                name,
                path: root,
                parent: None,
                kind: NodeKind::Directory { children: vec![] },
            }],
            by_path,
        }
    }

    /// Add a node below `parent`. Children keep insertion order.
    pub fn insert(&mut self, parent: NodeId, name: &str, is_dir: bool) -> NodeId {
        let id = NodeId(self.nodes.len());
        let path = self.nodes[parent.0].path.join(name);
        self.nodes.push(Node {
            name: name.to_string(),
            path: path.clone(),
            parent: Some(parent),
            kind: if is_dir {
                NodeKind::Directory { children: vec![] }
            } else {
                NodeKind::File
            },
        });
        if let NodeKind::Directory { children } = &mut self.nodes[parent.0].kind {
            children.push(id);
        }
        self.by_path.insert(path, id);
        id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn path(&self, id: NodeId) -> &Path {
        &self.nodes[id.0].path
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn is_dir(&self, id: NodeId) -> bool {
        matches!(self.nodes[id.0].kind, NodeKind::Directory { .. })
    }

    /// Children of a directory; empty for files.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match &self.nodes[id.0].kind {
            NodeKind::Directory { children } => children,
            NodeKind::File => &[],
        }
    }

    /// Look up a node by absolute path. The path is normalized first.
    pub fn lookup(&self, path: &Path) -> Option<NodeId> {
        self.by_path.get(&normalize_path(path)).copied()
    }

    /// `id` and everything below it, parents before children.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// All `.md` files in the tree, sorted by path.
    pub fn markdown_files(&self) -> Vec<NodeId> {
        let mut files: Vec<NodeId> = (0..self.nodes.len())
            .map(NodeId)
            .filter(|&id| !self.is_dir(id) && is_markdown(self.name(id)))
            .collect();
        files.sort_by(|a, b| self.path(*a).cmp(self.path(*b)));
        files
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Walk `root` and build the project snapshot.
pub fn scan(root: &Path, config: &ProjectConfig) -> Result<FileTree, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::NotADirectory(root.to_path_buf()));
    }
    let root = normalize_path(&std::path::absolute(root)?);
    let hugo_output = normalize_path(&root.join(&config.hugo.output));

    let mut tree = FileTree::new(&root);
    let walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .min_depth(1)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 {
                return true;
            }
            let name = e.file_name().to_string_lossy();
            if name.starts_with('.') {
                return false;
            }
            if e.file_type().is_dir()
                && (config.is_excluded(&name) || normalize_path(e.path()) == hugo_output)
            {
                return false;
            }
            true
        });

    for entry in walker {
        let entry = entry?;
        let path = normalize_path(entry.path());
        let parent_path = path
            .parent()
            .ok_or_else(|| ScanError::Orphan(path.clone()))?;
        let parent = tree
            .lookup(parent_path)
            .ok_or_else(|| ScanError::Orphan(path.clone()))?;
        let name = entry.file_name().to_string_lossy().to_string();
        tree.insert(parent, &name, entry.file_type().is_dir());
    }

    tracing::debug!(root = %root.display(), nodes = tree.len(), "Project scan completed");
    Ok(tree)
}

pub fn is_markdown(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

/// Remove `.` and resolve `..` components without touching the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Relative link from directory `from_dir` to `to`, using `/` separators.
///
/// Both paths must be absolute and normalized.
pub fn relative_link(from_dir: &Path, to: &Path) -> String {
    let from: Vec<Component> = from_dir.components().collect();
    let target: Vec<Component> = to.components().collect();
    let common = from
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut parts: Vec<String> = Vec::new();
    for _ in common..from.len() {
        parts.push("..".to_string());
    }
    for component in &target[common..] {
        parts.push(component.as_os_str().to_string_lossy().to_string());
    }
    parts.join("/")
}
