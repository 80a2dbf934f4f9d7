//! Portal construction.
//!
//! The tree is cut into leaf-to-leaf portals top down. Every call of the
//! recursion owns the list of portals bounding its node; the node's own
//! splitting portal is built from its plane, the bounding portals are
//! distributed (or split) between the two children, and both children are
//! portalized in parallel. Finally the node's portal is pushed down both
//! subtrees until it connects leaves.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::bounds::calc_tree_bounds;
use crate::contents::ContentFlags;
use crate::error::{PortalError, Warning};
use crate::game::TargetGame;
use crate::math::{Plane, Vec3, SIDE_BACK, SIDE_FRONT};
use crate::options::PortalOptions;
use crate::tree::{NodeId, Portal, PortalId, PortalType, Tree};
use crate::winding::Winding;

/// A portal still being cut. Owned by exactly one worklist at a time.
#[derive(Clone, Debug, PartialEq)]
pub struct BuildPortal {
    pub plane: Plane,
    pub winding: Winding,
    /// Front (positive side of `plane`) and back node.
    pub nodes: [NodeId; 2],
    pub on_node: Option<NodeId>,
}

impl BuildPortal {
    pub fn side_of(&self, node: NodeId) -> Option<usize> {
        if self.nodes[SIDE_FRONT] == node {
            Some(SIDE_FRONT)
        } else if self.nodes[SIDE_BACK] == node {
            Some(SIDE_BACK)
        } else {
            None
        }
    }

    /// Puts `node` on `side` of the portal and `other` across from it.
    fn set_nodes_on_side(&mut self, side: usize, node: NodeId, other: NodeId) {
        if side == SIDE_FRONT {
            self.nodes = [node, other];
        } else {
            self.nodes = [other, node];
        }
    }
}

/// Portals handed to the front and back child of a node.
#[derive(Debug, Default)]
pub struct SplitPortals {
    pub front: Vec<BuildPortal>,
    pub back: Vec<BuildPortal>,
}

/// Counts nodes visited and logs progress in 10% steps.
#[derive(Debug, Default)]
pub struct ProgressClock {
    count: AtomicUsize,
    max: usize,
}

impl ProgressClock {
    pub fn new(max: usize) -> ProgressClock {
        ProgressClock { count: AtomicUsize::new(0), max }
    }

    pub fn increase(&self) {
        let count = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        if self.max == 0 {
            return;
        }
        let percent = count * 100 / self.max;
        let previous = (count - 1) * 100 / self.max;
        if percent / 10 != previous / 10 {
            log::debug!("{}%", percent.min(100));
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Relaxed)
    }
}

/// What a portalization produced.
#[derive(Debug, Default)]
pub struct PortalReport {
    pub tiny_portals: usize,
    pub tree_portals: usize,
    pub nodes_visited: usize,
    pub warnings: Vec<Warning>,
}

/// Seeds the six portals between the head node and the outside leaf,
/// enclosing the padded world bounds.
pub fn make_headnode_portals(tree: &mut Tree, game: &dyn TargetGame, options: &PortalOptions) -> Result<Vec<BuildPortal>, PortalError> {
    let outside = tree.outside_node;
    let head = tree.head_node;

    tree.leaf_mut(outside)?.contents = game.create_solid_contents();
    tree.nodes[outside].portals.clear();

    // Padding keeps every leaf at a non-zero volume.
    let bounds = tree.bounds.expand_by(options.side_space);

    // One inward-facing plane per box face.
    let mut bplanes: Vec<Plane> = Vec::with_capacity(6);
    let mut portals: Vec<BuildPortal> = Vec::with_capacity(6);
    for j in 0..2 {
        for i in 0..3 {
            let mut normal = Vec3::new(0.0, 0.0, 0.0);
            let plane = if j == 1 {
                normal[i] = -1.0;
                Plane::new(normal, -bounds[j][i])
            } else {
                normal[i] = 1.0;
                Plane::new(normal, bounds[j][i])
            };

            let (positive, flipped) = plane.to_positive();
            let nodes = if flipped { [outside, head] } else { [head, outside] };
            portals.push(BuildPortal {
                plane: positive,
                winding: Winding::base_for_plane(&positive, options.world_extent),
                nodes,
                on_node: None,
            });
            bplanes.push(plane);
        }
    }

    // Trim each face to the other five.
    for (i, portal) in portals.iter_mut().enumerate() {
        for (j, plane) in bplanes.iter().enumerate() {
            if j == i {
                continue;
            }
            portal.winding = portal
                .winding
                .clip_front(plane, options.epsilon, true)
                .ok_or(PortalError::WindingClippedAway { plane: *plane })?;
        }
    }

    Ok(portals)
}

/// Cuts a tree into portals. Shared by every recursive step of one portalization.
pub struct PortalBuilder<'a> {
    tree: &'a Tree,
    options: &'a PortalOptions,
    portal_type: PortalType,
    tiny_portals: AtomicUsize,
    clock: ProgressClock,
}

impl<'a> PortalBuilder<'a> {
    pub fn new(tree: &'a Tree, options: &'a PortalOptions, portal_type: PortalType) -> PortalBuilder<'a> {
        PortalBuilder {
            tree,
            options,
            portal_type,
            tiny_portals: AtomicUsize::new(0),
            clock: ProgressClock::new(tree.nodes.len() + 1),
        }
    }

    pub fn tiny_portals(&self) -> usize {
        self.tiny_portals.load(Ordering::Relaxed)
    }

    pub fn nodes_visited(&self) -> usize {
        self.clock.count()
    }

    fn count_tiny(&self) {
        self.tiny_portals.fetch_add(1, Ordering::Relaxed);
    }

    fn is_terminal(&self, node: NodeId) -> bool {
        self.tree.nodes[node].is_cluster(self.portal_type)
    }

    /// Winding of the node's plane, clipped by all parent nodes.
    fn base_winding_for_node(&self, node: NodeId) -> Result<Option<Winding>, PortalError> {
        let mut winding = Some(Winding::base_for_plane(self.tree.node_plane(node)?, self.options.world_extent));

        let mut child = node;
        let mut parent = self.tree.nodes[node].parent;
        while let (Some(np), Some(w)) = (parent, winding.as_ref()) {
            let split = self.tree.split(np)?;
            let plane = &self.tree.planes[split.plane_num];

            winding = if split.children[SIDE_FRONT] == child {
                w.clip_front(plane, self.options.base_winding_epsilon, false)
            } else {
                w.clip_back(plane, self.options.base_winding_epsilon, false)
            };

            child = np;
            parent = self.tree.nodes[np].parent;
        }

        Ok(winding)
    }

    /// The portal on the node's own plane, or None when nothing of it survives
    /// inside the node. The plane's base winding is trimmed to the node's half
    /// spaces, then to the portals bounding it.
    pub fn make_node_portal(&self, node: NodeId, boundary_portals: &[BuildPortal]) -> Result<Option<BuildPortal>, PortalError> {
        let split = self.tree.split(node)?;
        let mut winding = self.base_winding_for_node(node)?;

        for p in boundary_portals {
            let Some(w) = winding.as_ref() else {
                break;
            };

            let plane = match p.side_of(node) {
                Some(SIDE_FRONT) => p.plane,
                Some(_) => -p.plane,
                None => return Err(PortalError::MislinkedPortal { node }),
            };

            winding = w.clip_front(&plane, self.options.node_portal_epsilon, false);
        }

        let Some(winding) = winding else {
            return Ok(None);
        };

        if winding.is_tiny(self.options.tiny_portal_area) {
            self.count_tiny();
            return Ok(None);
        }

        Ok(Some(BuildPortal {
            plane: self.tree.planes[split.plane_num],
            winding,
            nodes: split.children,
            on_node: Some(node),
        }))
    }

    /// Hands each portal bounding `node` to the child it lies in, cutting the
    /// ones that straddle the node's plane.
    pub fn split_node_portals(&self, node: NodeId, boundary_portals: Vec<BuildPortal>) -> Result<SplitPortals, PortalError> {
        let split = self.tree.split(node)?;
        let plane = &self.tree.planes[split.plane_num];
        let [f, b] = split.children;

        let mut result = SplitPortals::default();

        for mut p in boundary_portals {
            let side = p.side_of(node).ok_or(PortalError::MislinkedPortal { node })?;
            let other_node = p.nodes[side ^ 1];

            let (mut front_winding, mut back_winding) = p.winding.clip(plane, self.options.split_winding_epsilon, true);

            if front_winding.as_ref().is_some_and(|w| w.is_tiny(self.options.tiny_portal_area)) {
                front_winding = None;
                self.count_tiny();
            }
            if back_winding.as_ref().is_some_and(|w| w.is_tiny(self.options.tiny_portal_area)) {
                back_winding = None;
                self.count_tiny();
            }

            match (front_winding, back_winding) {
                // Tiny windings on both sides.
                (None, None) => {}
                (None, Some(_)) => {
                    p.set_nodes_on_side(side, b, other_node);
                    result.back.push(p);
                }
                (Some(_), None) => {
                    p.set_nodes_on_side(side, f, other_node);
                    result.front.push(p);
                }
                (Some(front_winding), Some(back_winding)) => {
                    let mut front_portal = BuildPortal {
                        plane: p.plane,
                        winding: front_winding,
                        nodes: p.nodes,
                        on_node: p.on_node,
                    };
                    let mut back_portal = BuildPortal {
                        plane: p.plane,
                        winding: back_winding,
                        nodes: p.nodes,
                        on_node: p.on_node,
                    };
                    front_portal.set_nodes_on_side(side, f, other_node);
                    back_portal.set_nodes_on_side(side, b, other_node);

                    result.front.push(front_portal);
                    result.back.push(back_portal);
                }
            }
        }

        Ok(result)
    }

    /// Pushes portals that touch `node` down its subtree until that side of
    /// every fragment is a cluster. The far side is not changed.
    pub fn clip_node_portals_to_tree(&self, node: NodeId, portals: Vec<BuildPortal>) -> Result<Vec<BuildPortal>, PortalError> {
        if portals.is_empty() || self.is_terminal(node) {
            return Ok(portals);
        }

        let split = self.split_node_portals(node, portals)?;
        let [front, back] = self.tree.split(node)?.children;

        let mut merged = self.clip_node_portals_to_tree(front, split.front)?;
        merged.extend(self.clip_node_portals_to_tree(back, split.back)?);
        Ok(merged)
    }

    /// Portalizes the subtree under `node`, which is bounded by `boundary_portals`.
    pub fn make_tree_portals_r(&self, node: NodeId, boundary_portals: Vec<BuildPortal>) -> Result<Vec<BuildPortal>, PortalError> {
        self.clock.increase();

        if self.is_terminal(node) {
            return Ok(boundary_portals);
        }

        // Needs the boundary list before it is split up.
        let node_portal = self.make_node_portal(node, &boundary_portals)?;

        // Front and back share no portal after the split.
        let split = self.split_node_portals(node, boundary_portals)?;
        let [front, back] = self.tree.split(node)?.children;

        let (front_result, back_result) = rayon::join(
            || self.make_tree_portals_r(front, split.front),
            || self.make_tree_portals_r(back, split.back),
        );
        let mut merged = front_result?;
        merged.extend(back_result?);

        if let Some(node_portal) = node_portal {
            // These fragments have `back` on one side and leaves of `front` on the other.
            let half_clipped = self.clip_node_portals_to_tree(front, vec![node_portal])?;
            merged.extend(self.clip_node_portals_to_tree(back, half_clipped)?);
        }

        Ok(merged)
    }
}

/// Moves the finished build portals into the tree and links them to their nodes.
pub fn make_portals_from_build_portals(tree: &mut Tree, build_portals: Vec<BuildPortal>) -> Result<(), PortalError> {
    tree.portals.reserve(build_portals.len());
    for build_portal in build_portals {
        if tree.portal_type == PortalType::Tree {
            for node in build_portal.nodes {
                if !tree.nodes[node].is_leaf() {
                    return Err(PortalError::NotALeaf { node });
                }
            }
        }

        tree.add_portal(Portal {
            plane: build_portal.plane,
            winding: build_portal.winding,
            nodes: build_portal.nodes,
            on_node: build_portal.on_node,
            sides: [None, None],
            side_found: false,
        })?;
    }
    Ok(())
}

/// Cuts the whole tree into portals, commits them and recomputes node bounds.
pub fn make_tree_portals(tree: &mut Tree, game: &dyn TargetGame, options: &PortalOptions, portal_type: PortalType) -> Result<PortalReport, PortalError> {
    log::info!("---- make_tree_portals ----");

    tree.free_portals();
    tree.portal_type = portal_type;

    let headnode_portals = make_headnode_portals(tree, game, options)?;

    let (build_portals, tiny_portals, nodes_visited) = {
        let builder = PortalBuilder::new(tree, options, portal_type);
        let build_portals = builder.make_tree_portals_r(tree.head_node, headnode_portals)?;
        (build_portals, builder.tiny_portals(), builder.nodes_visited())
    };

    make_portals_from_build_portals(tree, build_portals)?;

    log::info!("---- calc_tree_bounds ----");
    let warnings = calc_tree_bounds(tree, options);

    log::info!("{:8} tiny portals", tiny_portals);
    log::info!("{:8} tree portals", tree.portals.len());

    Ok(PortalReport {
        tiny_portals,
        tree_portals: tree.portals.len(),
        nodes_visited,
        warnings,
    })
}

/// Whether visibility may pass through the portal. Both sides are treated
/// as clusters, so their merged contents decide.
pub fn portal_vis_flood(tree: &Tree, portal: PortalId, game: &dyn TargetGame, options: &PortalOptions) -> bool {
    let p = &tree.portals[portal];
    if p.on_node.is_none() {
        // World-bounding portal.
        return false;
    }

    let contents0 = tree.cluster_contents(p.nodes[0], game);
    let contents1 = tree.cluster_contents(p.nodes[1], game);

    game.portal_can_see_through(contents0, contents1, options.transwater)
}

/// Whether the area flood may pass through the portal. Never into solid.
/// Both sides must be leaves unless the tree was cut into vis clusters.
pub fn portal_entity_flood(tree: &Tree, portal: PortalId, game: &dyn TargetGame) -> Result<bool, PortalError> {
    let p = &tree.portals[portal];

    let mut contents = [ContentFlags::empty(); 2];
    for (side, &node) in p.nodes.iter().enumerate() {
        contents[side] = match tree.portal_type {
            PortalType::Tree => tree.leaf(node)?.contents,
            PortalType::Vis => tree.cluster_contents(node, game),
        };
    }

    Ok(!game.is_any_solid(contents[0]) && !game.is_any_solid(contents[1]))
}
