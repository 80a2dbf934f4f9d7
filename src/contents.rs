use bitflags::bitflags;

/// Content flags carried by leaves and brushes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ContentFlags(u32);

bitflags! {
    impl ContentFlags : u32 {
        // Visible contents, strongest first.
        /// An eye is never valid in a solid.
        const Solid         = 0x00000001;
        /// Translucent, but not watery.
        const Window        = 0x00000002;
        const Aux           = 0x00000004;
        const Lava          = 0x00000008;
        const Slime         = 0x00000010;
        const Water         = 0x00000020;
        const Mist          = 0x00000040;

        // Remaining contents are non-visible, and don't eat brushes.
        /// Area boundary; the game toggles it at runtime.
        const AreaPortal    = 0x00008000;
        const PlayerClip    = 0x00010000;
        const MonsterClip   = 0x00020000;
        /// Removed before bsping an entity.
        const Origin        = 0x01000000;
        /// Brushes to be added after vis leafs.
        const Detail        = 0x08000000;
        /// Auto set if any surface has transparency.
        const Translucent   = 0x10000000;
        const Ladder        = 0x20000000;
    }
}

/// The weakest contents that still produce faces.
pub const LAST_VISIBLE_CONTENTS: ContentFlags = ContentFlags::Mist;

/// Every content bit that can produce a face.
pub const VISIBLE_CONTENTS: ContentFlags = ContentFlags::Solid
    .union(ContentFlags::Window)
    .union(ContentFlags::Aux)
    .union(ContentFlags::Lava)
    .union(ContentFlags::Slime)
    .union(ContentFlags::Water)
    .union(ContentFlags::Mist);

/// Contents that are drawn from the inside as well.
pub const LIQUID_CONTENTS: ContentFlags = ContentFlags::Lava
    .union(ContentFlags::Slime)
    .union(ContentFlags::Water);

// Content names as they appear in map tooling, in SCREAMING_SNAKE_CASE.
static CONTENT_NAMES: phf::Map<&'static str, u32> = phf::phf_map! {
    "SOLID" => 0x00000001,
    "WINDOW" => 0x00000002,
    "AUX" => 0x00000004,
    "LAVA" => 0x00000008,
    "SLIME" => 0x00000010,
    "WATER" => 0x00000020,
    "MIST" => 0x00000040,
    "AREAPORTAL" => 0x00008000,
    "PLAYERCLIP" => 0x00010000,
    "MONSTERCLIP" => 0x00020000,
    "ORIGIN" => 0x01000000,
    "DETAIL" => 0x08000000,
    "TRANSLUCENT" => 0x10000000,
    "LADDER" => 0x20000000,
};

impl ContentFlags {
    /// Unknown names are ignored.
    pub fn from_names<'a, I: IntoIterator<Item = &'a str>>(names: I) -> ContentFlags {
        let mut flags = ContentFlags::empty();
        for name in names {
            if let Some(bits) = CONTENT_NAMES.get(name) {
                flags |= ContentFlags::from_bits_retain(*bits);
            }
        }
        flags
    }

    /// The strongest visible content in `self`, or empty if there is none.
    pub fn visible(self) -> ContentFlags {
        let mut bit = ContentFlags::Solid.bits();
        while bit <= LAST_VISIBLE_CONTENTS.bits() {
            if self.bits() & bit != 0 {
                return ContentFlags::from_bits_retain(bit);
            }
            bit <<= 1;
        }
        ContentFlags::empty()
    }

    pub fn is_liquid(self) -> bool {
        self.intersects(LIQUID_CONTENTS)
    }
}
