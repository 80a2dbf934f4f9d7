//! Per-target-game content policy.
//!
//! Portal side resolution, area flooding and the vis flood all ask the target
//! game how contents interact instead of hard-coding one content scheme.

use crate::contents::{ContentFlags, LIQUID_CONTENTS, VISIBLE_CONTENTS};
use crate::math::PlaneSide;

pub trait TargetGame: Sync {
    /// Contents of the synthetic leaf bounding the world.
    fn create_solid_contents(&self) -> ContentFlags;

    fn is_any_solid(&self, contents: ContentFlags) -> bool;

    /// Empty leaves never border a visible face.
    fn is_empty(&self, contents: ContentFlags) -> bool;

    fn is_areaportal(&self, contents: ContentFlags) -> bool;

    /// Contents of a cluster made of two subtrees with the given contents.
    fn cluster_contents(&self, contents0: ContentFlags, contents1: ContentFlags) -> ContentFlags;

    /// The strongest content transition across a portal, empty if the
    /// portal does not need a face.
    fn portal_visible_contents(&self, contents0: ContentFlags, contents1: ContentFlags) -> ContentFlags;

    /// Whether a brush with `brush_contents` generates a face for a portal
    /// whose visible contents are `portal_visible_contents`, on the outside
    /// (`Front`) or the inside (`Back`) of the brush.
    fn portal_generates_face(&self, portal_visible_contents: ContentFlags, brush_contents: ContentFlags, side: PlaneSide) -> bool;

    /// Whether the PVS may see through a portal between these contents.
    fn portal_can_see_through(&self, contents0: ContentFlags, contents1: ContentFlags, transwater: bool) -> bool;
}

/// Quake II content rules: solid > window > aux > lava > slime > water > mist.
#[derive(Clone, Copy, Debug, Default)]
pub struct Quake2;

impl TargetGame for Quake2 {
    fn create_solid_contents(&self) -> ContentFlags {
        ContentFlags::Solid
    }

    fn is_any_solid(&self, contents: ContentFlags) -> bool {
        contents.contains(ContentFlags::Solid)
    }

    fn is_empty(&self, contents: ContentFlags) -> bool {
        !contents.intersects(VISIBLE_CONTENTS)
    }

    fn is_areaportal(&self, contents: ContentFlags) -> bool {
        contents.contains(ContentFlags::AreaPortal)
    }

    fn cluster_contents(&self, contents0: ContentFlags, contents1: ContentFlags) -> ContentFlags {
        let mut contents = contents0 | contents1;

        // Solid only if both halves are.
        if !contents0.contains(ContentFlags::Solid) || !contents1.contains(ContentFlags::Solid) {
            contents.remove(ContentFlags::Solid);
        }

        contents
    }

    fn portal_visible_contents(&self, contents0: ContentFlags, contents1: ContentFlags) -> ContentFlags {
        // Solid on both sides never shows.
        if contents0.contains(ContentFlags::Solid) && contents1.contains(ContentFlags::Solid) {
            return ContentFlags::empty();
        }

        (contents0 ^ contents1).visible()
    }

    fn portal_generates_face(&self, portal_visible_contents: ContentFlags, brush_contents: ContentFlags, side: PlaneSide) -> bool {
        if !portal_visible_contents.intersects(brush_contents) {
            return false;
        }

        match side {
            PlaneSide::Front => true,
            // Liquids are drawn from below the surface as well.
            PlaneSide::Back => {
                brush_contents.intersects(LIQUID_CONTENTS)
                    && !brush_contents.intersects(ContentFlags::Solid | ContentFlags::Window)
            }
        }
    }

    fn portal_can_see_through(&self, contents0: ContentFlags, contents1: ContentFlags, transwater: bool) -> bool {
        if (contents0 ^ contents1).visible().is_empty() {
            return true;
        }

        let strip = |contents: ContentFlags| {
            if contents.intersects(ContentFlags::Translucent | ContentFlags::Detail) {
                ContentFlags::empty()
            } else {
                contents
            }
        };
        let contents0 = strip(contents0);
        let contents1 = strip(contents1);

        if (contents0 | contents1).contains(ContentFlags::Solid) {
            return false;
        }
        if contents0 == contents1 {
            return true;
        }

        let visible = (contents0 ^ contents1).visible();
        if visible.is_empty() {
            return true;
        }

        transwater && visible.is_liquid()
    }
}
