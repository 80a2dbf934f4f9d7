/// Tunables for portalization, shared by every pass.
#[derive(Clone, Debug, PartialEq)]
pub struct PortalOptions {
    /// Clip epsilon for the world-bounding portals.
    pub epsilon: f64,
    /// Clip epsilon when cutting a node's base winding by its ancestors.
    pub base_winding_epsilon: f64,
    /// Clip epsilon when distributing portals to a node's children.
    pub split_winding_epsilon: f64,
    /// Clip epsilon when cutting a node portal by the portals bounding the node.
    pub node_portal_epsilon: f64,
    /// Padding around the world bounds, so there will never be null volume leafs.
    pub side_space: f64,
    /// Half-size of base windings, and the largest coordinate a sane node may have.
    pub world_extent: f64,
    /// Portals with a smaller area are discarded.
    pub tiny_portal_area: f64,
    /// Let the vis flood see through liquid surfaces.
    pub transwater: bool,
}

impl Default for PortalOptions {
    fn default() -> Self {
        PortalOptions {
            epsilon: 0.0001,
            base_winding_epsilon: 0.001,
            split_winding_epsilon: 0.001,
            node_portal_epsilon: 0.1,
            side_space: 24.0,
            world_extent: 65536.0,
            tiny_portal_area: 0.04,
            transwater: true,
        }
    }
}
