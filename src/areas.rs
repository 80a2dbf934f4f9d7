//! Area flooding.
//!
//! Areas are the regions of the map separated by func_areaportal brushes.
//! Every cluster reachable without crossing solid or an areaportal gets the
//! same area number; each areaportal entity records the (up to two) areas it
//! separates so the game can close them off from each other at runtime.

use crate::error::{PortalError, Warning};
use crate::game::TargetGame;
use crate::map::MapEntity;
use crate::portals::portal_entity_flood;
use crate::tree::{NodeId, NodeKind, Tree};

/// What an area flood produced.
#[derive(Debug, Default)]
pub struct AreaReport {
    pub num_areas: u32,
    pub warnings: Vec<Warning>,
}

/// One row of the area table: a slice of `AreaPortalTable::area_portals`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Area {
    pub first_area_portal: usize,
    pub num_area_portals: usize,
}

/// An areaportal as seen from one of the areas it touches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AreaPortal {
    pub portal_num: u32,
    pub other_area: u32,
}

/// The area adjacency lists. Index 0 of both arrays is a reserved dummy.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AreaPortalTable {
    pub areas: Vec<Area>,
    pub area_portals: Vec<AreaPortal>,
}

impl AreaPortalTable {
    /// The areaportals touching `area`.
    pub fn portals_of(&self, area: usize) -> &[AreaPortal] {
        match self.areas.get(area) {
            Some(a) => &self.area_portals[a.first_area_portal..a.first_area_portal + a.num_area_portals],
            None => &[],
        }
    }
}

struct AreaFlood<'a> {
    tree: &'a mut Tree,
    entities: &'a mut [MapEntity],
    game: &'a dyn TargetGame,
    num_areas: u32,
    warnings: Vec<Warning>,
}

impl<'a> AreaFlood<'a> {
    fn is_cluster(&self, node: NodeId) -> bool {
        self.tree.nodes[node].is_cluster(self.tree.portal_type)
    }

    fn is_areaportal(&self, node: NodeId) -> bool {
        self.game.is_areaportal(self.tree.cluster_contents(node, self.game))
    }

    /// Clusters under `node`, front first.
    fn clusters_under(&self, node: NodeId) -> Vec<NodeId> {
        let mut clusters = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            match self.tree.nodes[n].children() {
                Some([front, back]) if !self.is_cluster(n) => {
                    stack.push(back);
                    stack.push(front);
                }
                _ => clusters.push(n),
            }
        }
        clusters
    }

    /// The func_areaportal entity owning the first areaportal brush found under `node`.
    fn areaportal_entity_for_leaf(&self, node: NodeId) -> Option<usize> {
        self.tree.leaves_under(node).into_iter().find_map(|leaf| match &self.tree.nodes[leaf].kind {
            NodeKind::Leaf(leaf) => leaf
                .original_brushes
                .iter()
                .find_map(|&brush| self.tree.brushes[brush].areaportal_entity),
            NodeKind::Split(_) => None,
        })
    }

    fn apply_area(&mut self, node: NodeId, area: u32) {
        for n in self.tree.subtree(node) {
            self.tree.nodes[n].area = area;
        }
    }

    /// Records the current area on the areaportal bounding `node`.
    fn touch_areaportal(&mut self, node: NodeId) {
        let area = self.num_areas;

        let Some(entity_num) = self.areaportal_entity_for_leaf(node) else {
            let bounds = self.tree.nodes[node].bounds;
            self.warnings.push(
                Warning::AreaportalWithoutEntity { node, mins: bounds.min, maxs: bounds.max }.emit(),
            );
            return;
        };
        let entity = &mut self.entities[entity_num];

        if entity.portal_areas[0] == area || entity.portal_areas[1] == area {
            return;
        }

        if entity.portal_areas[1] != 0 {
            self.warnings.push(
                Warning::AreaportalTouchesTooManyAreas {
                    entity: entity_num,
                    mins: entity.bounds.min,
                    maxs: entity.bounds.max,
                }
                .emit(),
            );
            return;
        }

        if entity.portal_areas[0] != 0 {
            entity.portal_areas[1] = area;
        } else {
            entity.portal_areas[0] = area;
        }
    }

    fn flood_area(&mut self, start: NodeId) -> Result<(), PortalError> {
        let area = self.num_areas;
        let mut stack = vec![start];

        while let Some(node) = stack.pop() {
            // Areaportals stop the flood.
            if self.is_areaportal(node) {
                self.touch_areaportal(node);
                continue;
            }

            if self.tree.nodes[node].area != 0 {
                continue;
            }
            self.apply_area(node, area);

            let tree: &Tree = &*self.tree;
            for &portal in tree.nodes[node].portals.iter().rev() {
                if !portal_entity_flood(tree, portal, self.game)? {
                    continue;
                }
                let other = tree.portals[portal]
                    .other(node)
                    .ok_or(PortalError::MislinkedPortal { node })?;
                stack.push(other);
            }
        }

        Ok(())
    }

    fn find_areas(&mut self) -> Result<(), PortalError> {
        for cluster in self.clusters_under(self.tree.head_node) {
            if self.tree.nodes[cluster].area != 0 {
                continue;
            }

            let contents = self.tree.cluster_contents(cluster, self.game);
            if self.game.is_areaportal(contents) || self.game.is_any_solid(contents) {
                continue;
            }

            self.num_areas += 1;
            self.flood_area(cluster)?;
        }
        Ok(())
    }

    /// Gives every areaportal leaf the first area its entity separates.
    fn set_areaportal_areas(&mut self) {
        for leaf in self.tree.leaves_under(self.tree.head_node) {
            let contents = match self.tree.leaf(leaf) {
                Ok(leaf) => leaf.contents,
                Err(_) => continue,
            };
            if !self.game.is_areaportal(contents) || self.tree.nodes[leaf].area != 0 {
                continue;
            }

            let Some(entity_num) = self.areaportal_entity_for_leaf(leaf) else {
                let bounds = self.tree.nodes[leaf].bounds;
                self.warnings.push(
                    Warning::AreaportalWithoutEntity { node: leaf, mins: bounds.min, maxs: bounds.max }.emit(),
                );
                continue;
            };
            let entity = &self.entities[entity_num];

            self.tree.nodes[leaf].area = entity.portal_areas[0];
            if entity.portal_areas[1] == 0 {
                let bounds = self.tree.nodes[leaf].bounds;
                self.warnings.push(
                    Warning::AreaportalSingleArea {
                        entity: entity_num,
                        targetname: entity.targetname.clone(),
                        mins: bounds.min,
                        maxs: bounds.max,
                    }
                    .emit(),
                );
            }
        }
    }
}

/// Numbers the areas of the tree and records which areas each areaportal
/// entity separates.
pub fn flood_areas(tree: &mut Tree, entities: &mut [MapEntity], game: &dyn TargetGame) -> Result<AreaReport, PortalError> {
    log::info!("---- flood_areas ----");

    let mut flood = AreaFlood {
        tree,
        entities,
        game,
        num_areas: 0,
        warnings: Vec::new(),
    };
    flood.find_areas()?;
    flood.set_areaportal_areas();

    log::info!("{:5} areas", flood.num_areas);

    Ok(AreaReport {
        num_areas: flood.num_areas,
        warnings: flood.warnings,
    })
}

/// Builds the area adjacency table from the areas recorded on each areaportal entity.
pub fn emit_area_portals(entities: &[MapEntity], num_areas: u32) -> AreaPortalTable {
    log::info!("---- emit_area_portals ----");

    let mut table = AreaPortalTable {
        areas: vec![Area::default()],
        area_portals: vec![AreaPortal::default()],
    };

    for area in 1..=num_areas {
        let first_area_portal = table.area_portals.len();

        for entity in entities.iter().filter(|e| e.is_areaportal()) {
            let other_area = if entity.portal_areas[0] == area {
                entity.portal_areas[1]
            } else if entity.portal_areas[1] == area {
                entity.portal_areas[0]
            } else {
                continue;
            };

            let area_portal = AreaPortal { portal_num: entity.areaportal_num, other_area };
            if !table.area_portals[first_area_portal..].contains(&area_portal) {
                table.area_portals.push(area_portal);
            }
        }

        table.areas.push(Area {
            first_area_portal,
            num_area_portals: table.area_portals.len() - first_area_portal,
        });
    }

    log::info!("{:5} numareas", table.areas.len());
    log::info!("{:5} numareaportals", table.area_portals.len());

    table
}
