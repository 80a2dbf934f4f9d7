use crate::contents::ContentFlags;

/// One face of a bsp brush.
#[derive(Clone, Debug, PartialEq)]
pub struct BrushSide {
    /// Index into the tree's plane set; the side faces out of the brush along it.
    pub plane_num: usize,
    /// Axial bevels are added for collision only and never textured.
    pub bevel: bool,
    /// Index of the map face this side was created from, if any.
    pub source: Option<usize>,
}

impl BrushSide {
    pub fn new(plane_num: usize, source: Option<usize>) -> BrushSide {
        BrushSide { plane_num, bevel: false, source }
    }

    pub fn bevel(plane_num: usize) -> BrushSide {
        BrushSide { plane_num, bevel: true, source: None }
    }
}

/// A convex brush as it entered the bsp, before any splitting.
#[derive(Clone, Debug, PartialEq)]
pub struct Brush {
    pub contents: ContentFlags,
    pub sides: Vec<BrushSide>,
    /// The func_areaportal entity this brush belongs to.
    pub areaportal_entity: Option<usize>,
}

impl Brush {
    pub fn new(contents: ContentFlags, sides: Vec<BrushSide>) -> Brush {
        Brush { contents, sides, areaportal_entity: None }
    }

    pub fn new_areaportal(contents: ContentFlags, sides: Vec<BrushSide>, entity: usize) -> Brush {
        Brush { contents, sides, areaportal_entity: Some(entity) }
    }
}

/// Names one side of one brush in the tree's brush list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SideRef {
    pub brush: usize,
    pub side: usize,
}
