//! Portal graph construction for a finished bsp tree.
//!
//! Cuts the tree into leaf-to-leaf portals, recomputes node bounds, floods
//! the leaves into areas separated by areaportals and picks the brush sides
//! that end up visible.

pub mod math;
pub mod box_;
pub mod winding;
pub mod contents;
pub mod game;
pub mod brush;
pub mod map;
pub mod options;
pub mod error;
pub mod tree;
pub mod portals;
pub mod bounds;
pub mod areas;
pub mod sides;

pub use areas::{emit_area_portals, flood_areas, AreaPortalTable, AreaReport};
pub use bounds::calc_tree_bounds;
pub use error::{PortalError, Warning};
pub use game::{Quake2, TargetGame};
pub use options::PortalOptions;
pub use portals::{make_tree_portals, portal_entity_flood, portal_vis_flood, PortalReport};
pub use sides::{find_portal_side, mark_visible_sides};
pub use tree::{NodeId, PortalId, PortalType, Tree};
