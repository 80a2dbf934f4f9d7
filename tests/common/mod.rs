#![allow(dead_code)]

use cgmath::InnerSpace;

use bsp_portals::box_::BoundingBox;
use bsp_portals::contents::ContentFlags;
use bsp_portals::math::{Plane, Vec3};
use bsp_portals::tree::{NodeId, Tree};

pub fn cube_bounds(half: f64) -> BoundingBox {
    BoundingBox::new_from_min_max(Vec3::new(-half, -half, -half), Vec3::new(half, half, half))
}

/// Plane with a unit normal along `axis`, at `dist`.
pub fn axis_plane(axis: usize, dist: f64) -> Plane {
    let mut normal = Vec3::new(0.0, 0.0, 0.0);
    normal[axis] = 1.0;
    Plane::new(normal, dist)
}

/// A single empty leaf as the whole tree.
pub fn single_leaf_tree(half: f64) -> (Tree, NodeId) {
    let mut tree = Tree::new(cube_bounds(half));
    let leaf = tree.add_leaf(ContentFlags::empty(), Vec::new());
    tree.set_head_node(leaf);
    (tree, leaf)
}

/// Two empty leaves split by x = 0. Returns the tree, the front and the back leaf.
pub fn two_leaf_tree(half: f64) -> (Tree, NodeId, NodeId) {
    let mut tree = Tree::new(cube_bounds(half));
    let front = tree.add_leaf(ContentFlags::empty(), Vec::new());
    let back = tree.add_leaf(ContentFlags::empty(), Vec::new());
    let head = tree.add_split(axis_plane(0, 0.0), front, back).unwrap();
    tree.set_head_node(head);
    (tree, front, back)
}

/// Sum of area-weighted outward normals of the portals around `node`.
/// Zero when the portals enclose the node.
pub fn portal_flux(tree: &Tree, node: NodeId) -> Vec3 {
    let mut flux = Vec3::new(0.0, 0.0, 0.0);
    for &portal in &tree.nodes[node].portals {
        let p = &tree.portals[portal];
        let area = p.winding.area();
        // The node lies on the front of the plane when it is nodes[0], so the
        // outward direction is the negated normal.
        if p.nodes[0] == node {
            flux -= p.plane.normal * area;
        } else {
            flux += p.plane.normal * area;
        }
    }
    flux
}

pub fn assert_closed(tree: &Tree, node: NodeId) {
    let flux = portal_flux(tree, node);
    assert!(flux.magnitude() < 1e-6, "node {} is not enclosed by its portals: {:?}", node, flux);
}

pub fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6 * a.abs().max(b.abs()).max(1.0)
}
