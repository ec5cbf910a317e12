//! Map cell and terrain types

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Terrain feature occupying a cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum TerrainKind {
    #[default]
    RockWall = 0,
    StoneWall = 1,
    MetalWall = 2,
    CrystalWall = 3,
    SlimeWall = 4,
    PermaWall = 5,
    SecretDoor = 6,
    ClosedDoor = 7,
    OpenDoor = 8,
    StoneArch = 9,
    GraniteStatue = 10,
    Idol = 11,
    MechanicalTrap = 12,
    HiddenTrap = 13,
    Floor = 14,
    Water = 15,
    Lava = 16,
}

impl TerrainKind {
    /// Check if this is a wall type
    pub const fn is_wall(&self) -> bool {
        (*self as u8) <= 5
    }

    /// Check if this is a door
    pub const fn is_door(&self) -> bool {
        matches!(
            self,
            TerrainKind::SecretDoor | TerrainKind::ClosedDoor | TerrainKind::OpenDoor
        )
    }

    /// Check if this is passable (can walk through)
    pub const fn is_passable(&self) -> bool {
        matches!(
            self,
            TerrainKind::OpenDoor
                | TerrainKind::StoneArch
                | TerrainKind::MechanicalTrap
                | TerrainKind::HiddenTrap
                | TerrainKind::Floor
        )
    }

    /// Check if this is a liquid type
    pub const fn is_liquid(&self) -> bool {
        matches!(self, TerrainKind::Water | TerrainKind::Lava)
    }

    /// Check if this terrain blocks line of sight
    ///
    /// Statues and idols are opaque; arches, traps, and liquids are not.
    pub const fn blocks_sight(&self) -> bool {
        self.is_wall()
            || matches!(
                self,
                TerrainKind::SecretDoor
                    | TerrainKind::ClosedDoor
                    | TerrainKind::GraniteStatue
                    | TerrainKind::Idol
            )
    }

    /// Lowercase display name, as used in messages
    pub const fn name(&self) -> &'static str {
        match self {
            TerrainKind::RockWall => "rock wall",
            TerrainKind::StoneWall => "stone wall",
            TerrainKind::MetalWall => "metal wall",
            TerrainKind::CrystalWall => "crystal wall",
            TerrainKind::SlimeWall => "slime-covered wall",
            TerrainKind::PermaWall => "impenetrable wall",
            TerrainKind::SecretDoor => "secret door",
            TerrainKind::ClosedDoor => "closed door",
            TerrainKind::OpenDoor => "open door",
            TerrainKind::StoneArch => "stone archway",
            TerrainKind::GraniteStatue => "granite statue",
            TerrainKind::Idol => "stone idol",
            TerrainKind::MechanicalTrap => "mechanical trap",
            TerrainKind::HiddenTrap => "floor",
            TerrainKind::Floor => "floor",
            TerrainKind::Water => "shallow water",
            TerrainKind::Lava => "lava",
        }
    }

    /// Get the display character for this terrain
    pub const fn symbol(&self) -> char {
        match self {
            TerrainKind::RockWall => '#',
            TerrainKind::StoneWall => '|',
            TerrainKind::MetalWall => 'M',
            TerrainKind::CrystalWall => '*',
            TerrainKind::SlimeWall => 's',
            TerrainKind::PermaWall => 'P',
            TerrainKind::SecretDoor => '=',
            TerrainKind::ClosedDoor => '+',
            TerrainKind::OpenDoor => '\'',
            TerrainKind::StoneArch => 'A',
            TerrainKind::GraniteStatue => '8',
            TerrainKind::Idol => '7',
            TerrainKind::MechanicalTrap => '^',
            TerrainKind::HiddenTrap => ',',
            TerrainKind::Floor => '.',
            TerrainKind::Water => '~',
            TerrainKind::Lava => '}',
        }
    }

    /// Inverse of [`symbol`](Self::symbol), for ASCII map construction
    pub fn from_glyph(glyph: char) -> Option<TerrainKind> {
        use strum::IntoEnumIterator;
        TerrainKind::iter().find(|kind| kind.symbol() == glyph)
    }
}

bitflags! {
    /// Markers protecting a cell from destructive conversion
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct VetoFlags: u8 {
        const PRESERVE_SHATTER = 0x01;
        const PRESERVE_FRAGMENT = 0x02;
    }
}

// Manual serde impl for VetoFlags
impl Serialize for VetoFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for VetoFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(VetoFlags::from_bits_truncate(bits))
    }
}

/// A single map cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Actual terrain type
    pub typ: TerrainKind,

    /// Protection markers
    pub veto: VetoFlags,
}

impl Cell {
    /// Create a solid rock cell
    pub const fn rock() -> Self {
        Self {
            typ: TerrainKind::RockWall,
            veto: VetoFlags::empty(),
        }
    }

    /// Create a floor cell
    pub const fn floor() -> Self {
        Self {
            typ: TerrainKind::Floor,
            veto: VetoFlags::empty(),
        }
    }

    /// Create a cell of the given terrain
    pub const fn of(typ: TerrainKind) -> Self {
        Self {
            typ,
            veto: VetoFlags::empty(),
        }
    }

    /// Check if this cell blocks line of sight
    pub const fn blocks_sight(&self) -> bool {
        self.typ.blocks_sight()
    }

    /// Check if walkable
    pub const fn is_walkable(&self) -> bool {
        self.typ.is_passable()
    }
}
