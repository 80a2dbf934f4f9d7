//! Node bounds from the committed portals.

use crate::box_::BoundingBox;
use crate::error::Warning;
use crate::options::PortalOptions;
use crate::tree::{NodeId, Tree};

/// Bounds computed for one subtree, applied to the tree after the walk.
#[derive(Debug, Default)]
struct SubtreeBounds {
    bounds: BoundingBox,
    entries: Vec<(NodeId, BoundingBox)>,
    /// Nodes still waiting for an ancestor with usable bounds.
    pending: Vec<NodeId>,
    warnings: Vec<Warning>,
}

impl SubtreeBounds {
    fn merge(&mut self, other: SubtreeBounds) {
        self.entries.extend(other.entries);
        self.pending.extend(other.pending);
        self.warnings.extend(other.warnings);
    }

    fn resolve_pending(&mut self, bounds: BoundingBox) {
        for node in self.pending.drain(..) {
            self.entries.push((node, bounds));
        }
    }
}

/// Union of every portal winding touching the node.
fn calc_node_bounds(tree: &Tree, node: NodeId) -> BoundingBox {
    let mut bounds = BoundingBox::new();
    for &portal in &tree.nodes[node].portals {
        bounds.add_box(&tree.portals[portal].winding.bounds());
    }
    bounds
}

fn calc_tree_bounds_r(tree: &Tree, node: NodeId, options: &PortalOptions) -> SubtreeBounds {
    let is_leaf = tree.nodes[node].is_leaf();

    let mut result = match tree.nodes[node].children() {
        Some([front, back]) if !tree.nodes[node].is_cluster(tree.portal_type) => {
            let (front_result, back_result) = rayon::join(
                || calc_tree_bounds_r(tree, front, options),
                || calc_tree_bounds_r(tree, back, options),
            );

            let mut bounds = BoundingBox::new();
            for child in [&front_result, &back_result] {
                if !child.bounds.is_degenerate() {
                    bounds.add_box(&child.bounds);
                }
            }

            let mut result = SubtreeBounds { bounds, ..Default::default() };
            result.merge(front_result);
            result.merge(back_result);
            result
        }
        _ => SubtreeBounds {
            bounds: calc_node_bounds(tree, node),
            ..Default::default()
        },
    };

    let bounds = result.bounds;
    if bounds.is_degenerate() {
        result.warnings.push(Warning::NoVolume { node, is_leaf }.emit());
        result.pending.push(node);
    } else if bounds.exceeds(options.world_extent) {
        result.warnings.push(
            Warning::UnboundedVolume { node, is_leaf, mins: bounds.min, maxs: bounds.max }.emit(),
        );
        result.pending.push(node);
    } else {
        result.resolve_pending(bounds);
        result.entries.push((node, bounds));
    }

    result
}

/// Recomputes every node's bounds bottom up. Nodes without a usable volume take
/// the bounds of their closest usable ancestor, or the tree's bounds at the top.
pub fn calc_tree_bounds(tree: &mut Tree, options: &PortalOptions) -> Vec<Warning> {
    let mut result = calc_tree_bounds_r(tree, tree.head_node, options);
    let fallback = tree.bounds;
    result.resolve_pending(fallback);

    for (node, bounds) in result.entries {
        tree.nodes[node].bounds = bounds;
    }

    result.warnings
}
