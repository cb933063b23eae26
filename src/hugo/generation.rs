use crate::naming;
use crate::scan::{FileTree, NodeId};
use std::collections::HashMap;
use std::path::PathBuf;

/// Where a node sits relative to the documentation root.
///
/// The two variants share the weight computation and differ only in the
/// number of padding levels and in where the target path comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Root,
    Nested { parent: NodeId },
}

/// Progress of one node through the projection.
#[derive(Debug, Clone, PartialEq)]
pub enum ComputeState {
    Uncomputed,
    TargetPathComputed {
        target: PathBuf,
    },
    WeightComputed {
        target: PathBuf,
        prefix: String,
        weight: String,
    },
}

/// Per-run projection state of a node inside the documentation root.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationInfo {
    pub placement: Placement,
    /// Indexed path segments from the documentation root down to this node's
    /// directory. Files share the level of the directory holding them.
    pub level: usize,
    pub state: ComputeState,
}

impl GenerationInfo {
    pub fn target(&self) -> Option<&PathBuf> {
        match &self.state {
            ComputeState::Uncomputed => None,
            ComputeState::TargetPathComputed { target }
            | ComputeState::WeightComputed { target, .. } => Some(target),
        }
    }

    pub fn weight(&self) -> Option<(&str, &str)> {
        match &self.state {
            ComputeState::WeightComputed { prefix, weight, .. } => Some((prefix, weight)),
            _ => None,
        }
    }
}

/// Side table from snapshot nodes to their [`GenerationInfo`].
///
/// The snapshot itself stays free of projection fields: a GENERATE run never
/// builds one of these.
#[derive(Debug)]
pub struct GenerationTable {
    pub root: NodeId,
    pub max_level: usize,
    /// Nodes in pre-order, root first; the order computation must follow.
    pub order: Vec<NodeId>,
    infos: HashMap<NodeId, GenerationInfo>,
}

impl GenerationTable {
    /// Record every node below `root`, skipping the `legacy` subtree.
    pub fn collect(tree: &FileTree, root: NodeId, legacy: Option<NodeId>) -> Self {
        let mut table = Self {
            root,
            max_level: 0,
            order: vec![root],
            infos: HashMap::new(),
        };
        table.infos.insert(
            root,
            GenerationInfo {
                placement: Placement::Root,
                level: 0,
                state: ComputeState::Uncomputed,
            },
        );
        table.collect_children(tree, root, 0, legacy);
        table
    }

    fn collect_children(
        &mut self,
        tree: &FileTree,
        directory: NodeId,
        level: usize,
        legacy: Option<NodeId>,
    ) {
        for &child in tree.children(directory) {
            if Some(child) == legacy {
                tracing::debug!(path = %tree.path(child).display(), "Skipping legacy directory");
                continue;
            }
            let is_dir = tree.is_dir(child);
            let own_level = if is_dir && naming::is_indexed_name(tree.name(child)) {
                level + 1
            } else {
                level
            };
            if is_dir {
                self.max_level = self.max_level.max(own_level);
            }
            self.order.push(child);
            self.infos.insert(
                child,
                GenerationInfo {
                    placement: Placement::Nested { parent: directory },
                    level: own_level,
                    state: ComputeState::Uncomputed,
                },
            );
            if is_dir {
                self.collect_children(tree, child, own_level, legacy);
            }
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&GenerationInfo> {
        self.infos.get(&id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut GenerationInfo> {
        self.infos.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.infos.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }
}
