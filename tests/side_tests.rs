mod common;

use bsp_portals::brush::{Brush, BrushSide, SideRef};
use bsp_portals::contents::ContentFlags;
use bsp_portals::error::Warning;
use bsp_portals::game::Quake2;
use bsp_portals::map::MapFace;
use bsp_portals::math::{Plane, Vec3};
use bsp_portals::options::PortalOptions;
use bsp_portals::portals::make_tree_portals;
use bsp_portals::sides::{find_portal_side, mark_visible_sides};
use bsp_portals::tree::{NodeId, PortalId, PortalType, Tree};

use common::{axis_plane, cube_bounds};

struct Room {
    tree: Tree,
    empty: NodeId,
    filled: NodeId,
    /// The portal between the two leaves.
    portal: PortalId,
}

/// An empty leaf at x > 0 next to a leaf at x < 0 filled by one brush of
/// `contents`, whose x = 0 face comes from map face 0 and x = -64 face from
/// map face 1.
fn room(contents: ContentFlags) -> Room {
    let mut tree = Tree::new(cube_bounds(64.0));

    let wall = tree.planes.find_or_add(axis_plane(0, 0.0));
    let back_wall = tree.planes.find_or_add(Plane::new(Vec3::new(-1.0, 0.0, 0.0), 64.0));
    let bevel = tree.planes.find_or_add(axis_plane(1, 64.0));
    let brush = tree.add_brush(Brush::new(
        contents,
        vec![BrushSide::bevel(bevel), BrushSide::new(back_wall, Some(1)), BrushSide::new(wall, Some(0))],
    ));

    let empty = tree.add_leaf(ContentFlags::empty(), Vec::new());
    let filled = tree.add_leaf(contents, vec![brush]);
    let head = tree.add_split(axis_plane(0, 0.0), empty, filled).unwrap();
    tree.set_head_node(head);

    make_tree_portals(&mut tree, &Quake2, &PortalOptions::default(), PortalType::Tree).unwrap();

    let portal = tree.portals.iter().position(|p| p.on_node == Some(head)).unwrap();
    Room { tree, empty, filled, portal }
}

#[test]
fn solid_brush_exact_side_test() {
    let Room { mut tree, empty, filled, portal } = room(ContentFlags::Solid);
    assert_eq!(tree.portals[portal].nodes, [empty, filled]);

    let warning = find_portal_side(&mut tree, portal, &Quake2).unwrap();
    assert_eq!(warning, None);

    // The solid face is seen from the empty front side only.
    assert!(tree.portals[portal].side_found);
    assert_eq!(tree.portals[portal].sides, [Some(SideRef { brush: 0, side: 2 }), None]);
}

#[test]
fn water_brush_faces_both_ways_test() {
    let Room { mut tree, portal, .. } = room(ContentFlags::Water);

    find_portal_side(&mut tree, portal, &Quake2).unwrap();

    let side = Some(SideRef { brush: 0, side: 2 });
    assert_eq!(tree.portals[portal].sides, [side, side]);
}

#[test]
fn side_resolution_is_idempotent_test() {
    let Room { mut tree, portal, .. } = room(ContentFlags::Solid);

    find_portal_side(&mut tree, portal, &Quake2).unwrap();
    let resolved = tree.portals[portal].clone();

    // A resolved portal is never looked at again.
    tree.portals[portal].sides = [None, None];
    assert_eq!(find_portal_side(&mut tree, portal, &Quake2).unwrap(), None);
    assert_eq!(tree.portals[portal].sides, [None, None]);

    tree.portals[portal] = resolved.clone();
    find_portal_side(&mut tree, portal, &Quake2).unwrap();
    assert_eq!(tree.portals[portal], resolved);
}

#[test]
fn side_not_found_test() {
    let mut tree = Tree::new(cube_bounds(64.0));
    let empty = tree.add_leaf(ContentFlags::empty(), Vec::new());
    let solid = tree.add_leaf(ContentFlags::Solid, Vec::new());
    let head = tree.add_split(axis_plane(0, 0.0), empty, solid).unwrap();
    tree.set_head_node(head);
    make_tree_portals(&mut tree, &Quake2, &PortalOptions::default(), PortalType::Tree).unwrap();
    let portal = tree.portals.iter().position(|p| p.on_node == Some(head)).unwrap();

    let warning = find_portal_side(&mut tree, portal, &Quake2).unwrap();

    assert_eq!(warning, Some(Warning::SideNotFound { portal, plane: axis_plane(0, 0.0) }));
    assert!(tree.portals[portal].side_found);
    assert_eq!(tree.portals[portal].sides, [None, None]);
}

#[test]
fn no_content_change_needs_no_side_test() {
    let Room { mut tree, portal, .. } = room(ContentFlags::empty());

    assert_eq!(find_portal_side(&mut tree, portal, &Quake2).unwrap(), None);
    assert!(tree.portals[portal].side_found);
    assert_eq!(tree.portals[portal].sides, [None, None]);
}

#[test]
fn closest_side_without_exact_match_test() {
    // The brush has no face on the split plane; the face pointing most along
    // it wins.
    let mut tree = Tree::new(cube_bounds(64.0));
    let tilted = tree.planes.find_or_add(Plane::new(Vec3::new(2.0, 1.0, 0.0) / 5.0f64.sqrt(), 0.0));
    let side_wall = tree.planes.find_or_add(axis_plane(1, 64.0));
    let brush = tree.add_brush(Brush::new(
        ContentFlags::Solid,
        vec![BrushSide::new(side_wall, Some(1)), BrushSide::new(tilted, Some(0))],
    ));

    let empty = tree.add_leaf(ContentFlags::empty(), Vec::new());
    let solid = tree.add_leaf(ContentFlags::Solid, vec![brush]);
    let head = tree.add_split(axis_plane(0, 0.0), empty, solid).unwrap();
    tree.set_head_node(head);
    make_tree_portals(&mut tree, &Quake2, &PortalOptions::default(), PortalType::Tree).unwrap();
    let portal = tree.portals.iter().position(|p| p.on_node == Some(head)).unwrap();

    find_portal_side(&mut tree, portal, &Quake2).unwrap();
    assert_eq!(tree.portals[portal].sides, [Some(SideRef { brush: 0, side: 1 }), None]);
}

#[test]
fn mark_visible_sides_test() {
    let Room { mut tree, portal, .. } = room(ContentFlags::Solid);
    let mut faces = vec![MapFace::new(), MapFace::new(), MapFace::new()];
    faces[1].visible = true;
    faces[2].visible = true;

    let warnings = mark_visible_sides(&mut tree, &mut faces, &Quake2).unwrap();

    assert!(warnings.is_empty());
    assert!(tree.portals[portal].side_found);
    assert!(faces[0].visible);
    // Face 1 is only against the world boundary.
    assert!(!faces[1].visible);
    // Face 2 belongs to no brush and is left alone.
    assert!(faces[2].visible);

    // World-bounding portals are never resolved.
    assert!(tree.portals.iter().filter(|p| p.on_node.is_none()).all(|p| !p.side_found));
}
