//! Target paths and menu weights.
//!
//! Weights are digit strings built from the zero-padded index of every
//! indexed segment on the way down, then right-padded to a common depth:
//!
//! ```text
//! max level 1
//! docs/                  root    prefix 00       weight 00 0000
//! docs/1_Intro.md        level 0 prefix 0001     weight 0001 00
//! docs/2_Guide/          level 1 prefix 0002     weight 0002
//! docs/2_Guide/1_Inst.md level 1 prefix 000201   weight 000201
//! ```
//!
//! The root adds one padding level more than nested nodes. Its files sit one
//! level inside it, and the extra level keeps the root sorting before them.
//!
//! Each component is two digits wide, so at most 99 siblings per level sort
//! correctly.

use super::HugoError;
use super::generation::{ComputeState, GenerationTable, Placement};
use crate::naming;
use crate::scan::{FileTree, NodeId};
use std::path::Path;

const PADDING: &str = "00";

/// Two-digit component for `index`.
pub fn pad(index: u32) -> String {
    format!("{index:02}")
}

/// Index of a node for weighting; names without an index count as 0.
fn own_index(tree: &FileTree, id: NodeId) -> u32 {
    naming::parse_indexed_name(tree.name(id), tree.path(id))
        .map(|parsed| parsed.index)
        .unwrap_or(0)
}

/// Compute target path and weight for every collected node, root first.
///
/// `output` is the target path of the documentation root.
pub fn compute_all(
    tree: &FileTree,
    table: &mut GenerationTable,
    output: &Path,
) -> Result<(), HugoError> {
    let order = table.order.clone();
    for id in order {
        compute_target_path(tree, table, id, output)?;
        compute_weight(tree, table, id)?;
    }
    Ok(())
}

fn compute_target_path(
    tree: &FileTree,
    table: &mut GenerationTable,
    id: NodeId,
    output: &Path,
) -> Result<(), HugoError> {
    let info = table
        .get(id)
        .ok_or_else(|| HugoError::MissingParent(tree.path(id).to_path_buf()))?;

    let target = match info.placement {
        Placement::Root => output.to_path_buf(),
        Placement::Nested { parent } => table
            .get(parent)
            .and_then(|p| p.target())
            .ok_or_else(|| HugoError::MissingParent(tree.path(id).to_path_buf()))?
            .join(tree.name(id)),
    };

    if let Some(info) = table.get_mut(id) {
        info.state = ComputeState::TargetPathComputed { target };
    }
    Ok(())
}

fn compute_weight(tree: &FileTree, table: &mut GenerationTable, id: NodeId) -> Result<(), HugoError> {
    let max_level = table.max_level;
    let info = table
        .get(id)
        .ok_or_else(|| HugoError::NotComputed(tree.path(id).to_path_buf()))?;
    let target = info
        .target()
        .cloned()
        .ok_or_else(|| HugoError::NotComputed(tree.path(id).to_path_buf()))?;
    let level = info.level;
    let own = pad(own_index(tree, id));

    let (prefix, weight) = match info.placement {
        Placement::Root => {
            let padding = PADDING.repeat(max_level.saturating_sub(level) + 1);
            (own.clone(), format!("{own}{padding}"))
        }
        Placement::Nested { parent } => {
            let (parent_prefix, _) = table
                .get(parent)
                .and_then(|p| p.weight())
                .ok_or_else(|| HugoError::NotComputed(tree.path(parent).to_path_buf()))?;
            let prefix = format!("{parent_prefix}{own}");
            let padding = PADDING.repeat(max_level.saturating_sub(level));
            (prefix.clone(), format!("{prefix}{padding}"))
        }
    };

    if let Some(info) = table.get_mut(id) {
        info.state = ComputeState::WeightComputed {
            target,
            prefix,
            weight,
        };
    }
    Ok(())
}

/// Compare two weights as equal-length strings (right-padded with `0`).
pub fn compare_weights(a: &str, b: &str) -> std::cmp::Ordering {
    let width = a.len().max(b.len());
    format!("{a:0<width$}").cmp(&format!("{b:0<width$}"))
}
