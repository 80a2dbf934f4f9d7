//! Picks the brush side that textures each portal and marks the map faces
//! that end up visible.

use cgmath::InnerSpace;

use crate::brush::SideRef;
use crate::error::{PortalError, Warning};
use crate::game::TargetGame;
use crate::map::MapFace;
use crate::math::PlaneSide;
use crate::tree::{PortalId, Tree};

/// Picks the brush side drawn on each side of the portal. `sides[0]` is seen
/// from the front of the portal plane. Resolves a portal at most once.
pub fn find_portal_side(tree: &mut Tree, portal: PortalId, game: &dyn TargetGame) -> Result<Option<Warning>, PortalError> {
    let p = &tree.portals[portal];
    if p.side_found {
        return Ok(None);
    }
    let Some(on_node) = p.on_node else {
        tree.portals[portal].side_found = true;
        return Ok(None);
    };

    let visible_contents = game.portal_visible_contents(
        tree.cluster_contents(p.nodes[0], game),
        tree.cluster_contents(p.nodes[1], game),
    );
    if visible_contents.is_empty() {
        tree.portals[portal].side_found = true;
        return Ok(None);
    }

    let node_plane_num = tree.split(on_node)?.plane_num;
    let node_normal = tree.planes[node_plane_num].normal;

    let mut best_side: [Option<SideRef>; 2] = [None, None];
    let mut exact_side: [Option<SideRef>; 2] = [None, None];
    let mut best_dot = 0.0;

    for j in 0..2 {
        let Ok(leaf) = tree.leaf(p.nodes[j]) else {
            continue;
        };

        // Later brushes in map order win.
        for &brush_num in leaf.original_brushes.iter().rev() {
            let brush = &tree.brushes[brush_num];
            let outside_face = game.portal_generates_face(visible_contents, brush.contents, PlaneSide::Front);
            let inside_face = game.portal_generates_face(visible_contents, brush.contents, PlaneSide::Back);
            if !(outside_face || inside_face) {
                continue;
            }

            for (side_num, side) in brush.sides.iter().enumerate() {
                if side.bevel {
                    continue;
                }
                let side_ref = SideRef { brush: brush_num, side: side_num };

                if side.plane_num & !1 == node_plane_num {
                    // The brush is on side j, so this side faces away from j.
                    if outside_face && exact_side[j ^ 1].is_none() {
                        exact_side[j ^ 1] = Some(side_ref);
                    }
                    if inside_face && exact_side[j].is_none() {
                        exact_side[j] = Some(side_ref);
                    }
                    break;
                }

                let dot = node_normal.dot(tree.planes.positive(side.plane_num).normal);
                if dot > best_dot {
                    best_dot = dot;
                    if outside_face {
                        best_side[j ^ 1] = Some(side_ref);
                    }
                    if inside_face {
                        best_side[j] = Some(side_ref);
                    }
                }
            }
        }
    }

    // Exact sides over best sides.
    for i in 0..2 {
        if exact_side[i].is_some() {
            best_side[i] = exact_side[i];
        }
    }

    let warning = if best_side.iter().all(Option::is_none) {
        Some(Warning::SideNotFound { portal, plane: p.plane }.emit())
    } else {
        None
    };

    let p = &mut tree.portals[portal];
    p.sides = best_side;
    p.side_found = true;

    Ok(warning)
}

/// Flags the map faces some portal of a non-empty leaf is drawn with. Faces
/// owned by brushes start out hidden.
pub fn mark_visible_sides(tree: &mut Tree, faces: &mut [MapFace], game: &dyn TargetGame) -> Result<Vec<Warning>, PortalError> {
    log::info!("---- mark_visible_sides ----");

    for brush in &tree.brushes {
        for side in &brush.sides {
            if let Some(face) = side.source.and_then(|source| faces.get_mut(source)) {
                face.visible = false;
            }
        }
    }

    let mut warnings = Vec::new();
    let mut visible_faces = 0;

    for leaf in tree.leaves_under(tree.head_node) {
        if game.is_empty(tree.leaf(leaf)?.contents) {
            continue;
        }

        for portal in tree.nodes[leaf].portals.clone() {
            if tree.portals[portal].on_node.is_none() {
                continue;
            }

            warnings.extend(find_portal_side(tree, portal, game)?);

            for side_ref in tree.portals[portal].sides.iter().flatten() {
                let source = tree.brushes[side_ref.brush].sides[side_ref.side].source;
                if let Some(face) = source.and_then(|source| faces.get_mut(source)) {
                    if !face.visible {
                        visible_faces += 1;
                    }
                    face.visible = true;
                }
            }
        }
    }

    log::info!("{:8} visible faces", visible_faces);

    Ok(warnings)
}
