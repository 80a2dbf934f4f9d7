//! Fatal errors and recoverable warnings.

use crate::math::{Plane, Vec3};
use crate::tree::{NodeId, PortalId};

/// Broken tree topology. Any of these aborts the compile.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PortalError {
    #[error("portal {portal} already included")]
    PortalAlreadyIncluded { portal: PortalId },
    #[error("portal winding clipped away on plane {plane:?}")]
    WindingClippedAway { plane: Plane },
    #[error("mislinked portal: node {node} is on neither side")]
    MislinkedPortal { node: NodeId },
    #[error("node {node} is not a leaf")]
    NotALeaf { node: NodeId },
    #[error("node {node} is not a split node")]
    NotASplit { node: NodeId },
    #[error("node {child} already has parent {parent}")]
    AlreadyParented { child: NodeId, parent: NodeId },
    #[error("node {child} given as both children of one split")]
    SameChildren { child: NodeId },
    #[error("portal {portal} has node {node} on both sides")]
    PortalToItself { portal: PortalId, node: NodeId },
}

/// Questionable geometry. Logged, a fallback is applied, and the compile goes on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Warning {
    #[error("{} {node} without a volume", node_kind(.is_leaf))]
    NoVolume { node: NodeId, is_leaf: bool },
    #[error("{} {node} with unbounded volume: {mins:?} -> {maxs:?}", node_kind(.is_leaf))]
    UnboundedVolume { node: NodeId, is_leaf: bool, mins: Vec3, maxs: Vec3 },
    #[error("areaportal contents in node {node}, but no entity found: {mins:?} -> {maxs:?}")]
    AreaportalWithoutEntity { node: NodeId, mins: Vec3, maxs: Vec3 },
    #[error("areaportal entity {entity} touches > 2 areas\n  Entity Bounds: {mins:?} -> {maxs:?}")]
    AreaportalTouchesTooManyAreas { entity: usize, mins: Vec3, maxs: Vec3 },
    #[error("areaportal entity {entity} with targetname {targetname} doesn't touch two areas\n  Node bounds: {mins:?} -> {maxs:?}")]
    AreaportalSingleArea { entity: usize, targetname: String, mins: Vec3, maxs: Vec3 },
    #[error("side not found for portal {portal} on plane {plane:?}")]
    SideNotFound { portal: PortalId, plane: Plane },
}

fn node_kind(is_leaf: &bool) -> &'static str {
    if *is_leaf { "leaf" } else { "node" }
}

impl Warning {
    /// Logs the warning and hands it back, for collecting into a report.
    pub fn emit(self) -> Warning {
        log::warn!("{}", self);
        self
    }
}
