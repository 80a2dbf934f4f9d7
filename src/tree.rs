use crate::box_::BoundingBox;
use crate::brush::{Brush, SideRef};
use crate::contents::ContentFlags;
use crate::error::PortalError;
use crate::game::TargetGame;
use crate::math::{Plane, PlaneSet, SIDE_BACK, SIDE_FRONT};
use crate::winding::Winding;

/// Index into `Tree::nodes`.
pub type NodeId = usize;
/// Index into `Tree::portals`.
pub type PortalId = usize;

/// Which flavor of portals the tree was cut into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PortalType {
    /// Leaf-to-leaf portals over the whole tree.
    Tree,
    /// Portals stop at detail separators, which act as clusters.
    Vis,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Leaf {
    pub contents: ContentFlags,
    /// Indices into `Tree::brushes` of the unsplit brushes touching this leaf, in map order.
    pub original_brushes: Vec<usize>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Split {
    /// Always the positive plane of its pair.
    pub plane_num: usize,
    /// Front (0) and back (1) child.
    pub children: [NodeId; 2],
    /// Top of a detail cluster. Splits below it only matter for collision and rendering.
    pub detail_separator: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Leaf(Leaf),
    Split(Split),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub bounds: BoundingBox,
    /// 0 until the area flood reaches it.
    pub area: u32,
    /// Committed portals touching this node.
    pub portals: Vec<PortalId>,
}

impl Node {
    fn new(kind: NodeKind) -> Node {
        Node {
            kind,
            parent: None,
            bounds: BoundingBox::new(),
            area: 0,
            portals: Vec::new(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }

    pub fn leaf(&self) -> Option<&Leaf> {
        match &self.kind {
            NodeKind::Leaf(leaf) => Some(leaf),
            NodeKind::Split(_) => None,
        }
    }

    pub fn split(&self) -> Option<&Split> {
        match &self.kind {
            NodeKind::Split(split) => Some(split),
            NodeKind::Leaf(_) => None,
        }
    }

    pub fn children(&self) -> Option<[NodeId; 2]> {
        self.split().map(|split| split.children)
    }

    pub fn is_detail_separator(&self) -> bool {
        self.split().is_some_and(|split| split.detail_separator)
    }

    /// Leaves are always terminal. Detail separators are terminal when cutting vis portals.
    pub fn is_cluster(&self, portal_type: PortalType) -> bool {
        self.is_leaf() || (portal_type == PortalType::Vis && self.is_detail_separator())
    }
}

/// The convex polygon shared by two adjacent leaves.
#[derive(Clone, Debug, PartialEq)]
pub struct Portal {
    pub plane: Plane,
    pub winding: Winding,
    /// Front (positive side of `plane`) and back node.
    pub nodes: [NodeId; 2],
    /// The split node whose plane made this portal, None for the world-bounding ones.
    pub on_node: Option<NodeId>,
    /// Brush side drawn on each side of the portal, once resolved.
    pub sides: [Option<SideRef>; 2],
    pub side_found: bool,
}

impl Portal {
    /// Which side of the portal `node` is on.
    pub fn side_of(&self, node: NodeId) -> Option<usize> {
        if self.nodes[SIDE_FRONT] == node {
            Some(SIDE_FRONT)
        } else if self.nodes[SIDE_BACK] == node {
            Some(SIDE_BACK)
        } else {
            None
        }
    }

    /// The node across the portal from `node`.
    pub fn other(&self, node: NodeId) -> Option<NodeId> {
        self.side_of(node).map(|side| self.nodes[side ^ 1])
    }
}

/// A finished bsp tree, stored as an arena. The tree owns all nodes and portals;
/// everything else refers to them by index.
#[derive(Clone, Debug)]
pub struct Tree {
    pub nodes: Vec<Node>,
    pub portals: Vec<Portal>,
    pub planes: PlaneSet,
    pub brushes: Vec<Brush>,
    pub head_node: NodeId,
    /// Synthetic leaf on the far side of the world-bounding portals.
    pub outside_node: NodeId,
    /// Bounds of everything the tree was built from.
    pub bounds: BoundingBox,
    pub portal_type: PortalType,
}

impl Tree {
    /// An empty tree. Its only node is the outside leaf, which is also the head
    /// node until `set_head_node` is called.
    pub fn new(bounds: BoundingBox) -> Tree {
        let outside = Node::new(NodeKind::Leaf(Leaf {
            contents: ContentFlags::empty(),
            original_brushes: Vec::new(),
        }));

        Tree {
            nodes: vec![outside],
            portals: Vec::new(),
            planes: PlaneSet::new(),
            brushes: Vec::new(),
            head_node: 0,
            outside_node: 0,
            bounds,
            portal_type: PortalType::Tree,
        }
    }

    pub fn add_brush(&mut self, brush: Brush) -> usize {
        self.brushes.push(brush);
        self.brushes.len() - 1
    }

    pub fn add_leaf(&mut self, contents: ContentFlags, original_brushes: Vec<usize>) -> NodeId {
        self.nodes.push(Node::new(NodeKind::Leaf(Leaf { contents, original_brushes })));
        self.nodes.len() - 1
    }

    /// Adds a split node over two existing subtrees. A negative plane is
    /// stored as its positive twin with the children swapped.
    pub fn add_split(&mut self, plane: Plane, front: NodeId, back: NodeId) -> Result<NodeId, PortalError> {
        self.add_split_node(plane, front, back, false)
    }

    pub fn add_detail_separator(&mut self, plane: Plane, front: NodeId, back: NodeId) -> Result<NodeId, PortalError> {
        self.add_split_node(plane, front, back, true)
    }

    fn add_split_node(&mut self, plane: Plane, front: NodeId, back: NodeId, detail_separator: bool) -> Result<NodeId, PortalError> {
        if front == back {
            return Err(PortalError::SameChildren { child: front });
        }

        let plane_num = self.planes.find_or_add(plane);
        let children = if plane_num & 1 == 1 { [back, front] } else { [front, back] };

        let id = self.nodes.len();
        for child in children {
            if let Some(parent) = self.nodes[child].parent {
                return Err(PortalError::AlreadyParented { child, parent });
            }
        }
        for child in children {
            self.nodes[child].parent = Some(id);
        }

        self.nodes.push(Node::new(NodeKind::Split(Split {
            plane_num: plane_num & !1,
            children,
            detail_separator,
        })));
        Ok(id)
    }

    pub fn set_head_node(&mut self, node: NodeId) {
        self.head_node = node;
    }

    pub fn split(&self, node: NodeId) -> Result<&Split, PortalError> {
        self.nodes[node].split().ok_or(PortalError::NotASplit { node })
    }

    pub fn leaf(&self, node: NodeId) -> Result<&Leaf, PortalError> {
        self.nodes[node].leaf().ok_or(PortalError::NotALeaf { node })
    }

    pub fn leaf_mut(&mut self, node: NodeId) -> Result<&mut Leaf, PortalError> {
        match &mut self.nodes[node].kind {
            NodeKind::Leaf(leaf) => Ok(leaf),
            NodeKind::Split(_) => Err(PortalError::NotALeaf { node }),
        }
    }

    /// The splitting plane of a split node.
    pub fn node_plane(&self, node: NodeId) -> Result<&Plane, PortalError> {
        Ok(&self.planes[self.split(node)?.plane_num])
    }

    /// Contents of a leaf, or the merged contents of every leaf under a split.
    pub fn cluster_contents(&self, node: NodeId, game: &dyn TargetGame) -> ContentFlags {
        match &self.nodes[node].kind {
            NodeKind::Leaf(leaf) => leaf.contents,
            NodeKind::Split(split) => game.cluster_contents(
                self.cluster_contents(split.children[0], game),
                self.cluster_contents(split.children[1], game),
            ),
        }
    }

    /// Every leaf under `node`, front first.
    pub fn leaves_under(&self, node: NodeId) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            match &self.nodes[n].kind {
                NodeKind::Leaf(_) => leaves.push(n),
                NodeKind::Split(split) => {
                    stack.push(split.children[1]);
                    stack.push(split.children[0]);
                }
            }
        }
        leaves
    }

    /// `node` and all of its descendants.
    pub fn subtree(&self, node: NodeId) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            nodes.push(n);
            if let Some([front, back]) = self.nodes[n].children() {
                stack.push(back);
                stack.push(front);
            }
        }
        nodes
    }

    /// Drops every committed portal and clears the per-node lists.
    pub fn free_portals(&mut self) {
        self.portals.clear();
        for node in &mut self.nodes {
            node.portals.clear();
        }
    }

    /// Takes ownership of a portal and links it into both of its nodes' lists.
    pub fn add_portal(&mut self, portal: Portal) -> Result<PortalId, PortalError> {
        let id = self.portals.len();
        let [front, back] = portal.nodes;
        self.portals.push(portal);
        self.add_portal_to_nodes(id, front, back)?;
        Ok(id)
    }

    fn add_portal_to_nodes(&mut self, portal: PortalId, front: NodeId, back: NodeId) -> Result<(), PortalError> {
        if front == back {
            return Err(PortalError::PortalToItself { portal, node: front });
        }
        if self.nodes[front].portals.contains(&portal) || self.nodes[back].portals.contains(&portal) {
            return Err(PortalError::PortalAlreadyIncluded { portal });
        }

        self.nodes[front].portals.push(portal);
        self.nodes[back].portals.push(portal);
        Ok(())
    }
}
