use crate::box_::BoundingBox;

/// A face as authored in the map, before the bsp cut it up.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapFace {
    /// Set when some portal needs this face drawn.
    pub visible: bool,
}

impl MapFace {
    pub fn new() -> MapFace {
        MapFace { visible: false }
    }
}

/// The parts of a map entity the area flood needs.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MapEntity {
    pub classname: String,
    pub targetname: String,
    pub bounds: BoundingBox,
    /// Number of this func_areaportal, 0 for every other entity.
    pub areaportal_num: u32,
    /// The (up to two) areas this areaportal separates, 0 = none yet.
    pub portal_areas: [u32; 2],
}

impl MapEntity {
    pub fn new(classname: &str) -> MapEntity {
        MapEntity {
            classname: classname.to_string(),
            ..Default::default()
        }
    }

    pub fn new_areaportal(areaportal_num: u32, targetname: &str, bounds: BoundingBox) -> MapEntity {
        MapEntity {
            classname: "func_areaportal".to_string(),
            targetname: targetname.to_string(),
            bounds,
            areaportal_num,
            portal_areas: [0, 0],
        }
    }

    pub fn is_areaportal(&self) -> bool {
        self.areaportal_num != 0
    }
}
