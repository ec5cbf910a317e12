//! Monster species data

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::combat::Resists;

/// Magic resistance at or above this level shrugs off any hostile
/// translocation
pub const MAGIC_IMMUNE: i32 = 5000;

/// What a body is made of
///
/// Group-level outcome rules key off this; individual kinds override it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum Material {
    #[default]
    Flesh = 0,
    Skeletal = 1,
    Icy = 2,
    Gelatinous = 3,
    Stony = 4,
    Crystalline = 5,
    Metallic = 6,
    Wooden = 7,
    /// Insubstantial; mist, shadow, whirling energy
    Vaporous = 8,
}

bitflags! {
    /// Boolean species traits
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct SpeciesFlags: u8 {
        const FLIES = 0x01;
        const COLD_BLOOD = 0x02;
        const VENOMOUS = 0x04;
        const BLINK_RESIST = 0x08;
    }
}

// Manual serde impl for SpeciesFlags
impl Serialize for SpeciesFlags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SpeciesFlags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(SpeciesFlags::from_bits_truncate(bits))
    }
}

/// Static species template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpeciesData {
    pub name: &'static str,
    pub glyph: char,
    pub material: Material,
    pub flags: SpeciesFlags,
    pub resists: Resists,
    pub ac: i32,
    /// Hit points at spawn
    pub hp: i32,
    /// Willpower against hostile translocation
    pub magic_res: i32,
}

/// The closed species set
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
#[repr(u8)]
pub enum MonsterKind {
    #[default]
    Kobold = 0,
    Newt = 1,
    PitViper = 2,
    KillerBee = 3,
    Raven = 4,
    BlinkFrog = 5,
    QuicksilverDrake = 6,
    Ghost = 7,
    EnergyVortex = 8,
    OchreJelly = 9,
    WaterElemental = 10,
    Skeleton = 11,
    ChatteringSkull = 12,
    CursedSkull = 13,
    IceBeast = 14,
    ClayGolem = 15,
    StoneGolem = 16,
    IronGolem = 17,
    CrystalGolem = 18,
    WoodGolem = 19,
    EarthElemental = 20,
    GraniteGargoyle = 21,
    MetalGargoyle = 22,
    MoltenGargoyle = 23,
    AnimatedStatue = 24,
    SilverSentinel = 25,
    AmberSentinel = 26,
    DancingBlade = 27,
}

impl MonsterKind {
    /// Species template for this kind
    pub const fn data(self) -> SpeciesData {
        const NONE: SpeciesFlags = SpeciesFlags::empty();
        const FLIES: SpeciesFlags = SpeciesFlags::FLIES;

        match self {
            MonsterKind::Kobold => SpeciesData {
                name: "kobold",
                glyph: 'k',
                material: Material::Flesh,
                flags: NONE,
                resists: Resists::NONE,
                ac: 2,
                hp: 5,
                magic_res: 8,
            },
            MonsterKind::Newt => SpeciesData {
                name: "newt",
                glyph: ':',
                material: Material::Flesh,
                flags: SpeciesFlags::COLD_BLOOD,
                resists: Resists::NONE,
                ac: 0,
                hp: 3,
                magic_res: 4,
            },
            MonsterKind::PitViper => SpeciesData {
                name: "pit viper",
                glyph: 'S',
                material: Material::Flesh,
                flags: SpeciesFlags::COLD_BLOOD.union(SpeciesFlags::VENOMOUS),
                resists: Resists::new(0, 0, 0, 2),
                ac: 3,
                hp: 9,
                magic_res: 12,
            },
            MonsterKind::KillerBee => SpeciesData {
                name: "killer bee",
                glyph: 'a',
                material: Material::Flesh,
                flags: FLIES.union(SpeciesFlags::VENOMOUS),
                resists: Resists::new(0, 0, 0, 1),
                ac: 4,
                hp: 6,
                magic_res: 8,
            },
            MonsterKind::Raven => SpeciesData {
                name: "raven",
                glyph: 'B',
                material: Material::Flesh,
                flags: FLIES,
                resists: Resists::NONE,
                ac: 5,
                hp: 8,
                magic_res: 10,
            },
            MonsterKind::BlinkFrog => SpeciesData {
                name: "blink frog",
                glyph: 'F',
                material: Material::Flesh,
                flags: SpeciesFlags::BLINK_RESIST,
                resists: Resists::NONE,
                ac: 5,
                hp: 12,
                magic_res: 40,
            },
            MonsterKind::QuicksilverDrake => SpeciesData {
                name: "quicksilver drake",
                glyph: 'D',
                material: Material::Flesh,
                flags: FLIES,
                resists: Resists::new(1, 1, 1, 1),
                ac: 10,
                hp: 70,
                magic_res: 140,
            },
            MonsterKind::Ghost => SpeciesData {
                name: "ghost",
                glyph: 'X',
                material: Material::Vaporous,
                flags: FLIES,
                resists: Resists::new(0, 1, 1, 3),
                ac: 8,
                hp: 15,
                magic_res: 40,
            },
            MonsterKind::EnergyVortex => SpeciesData {
                name: "energy vortex",
                glyph: 'v',
                material: Material::Vaporous,
                flags: FLIES,
                resists: Resists::new(0, 0, 3, 3),
                ac: 2,
                hp: 10,
                magic_res: 30,
            },
            MonsterKind::OchreJelly => SpeciesData {
                name: "ochre jelly",
                glyph: 'j',
                material: Material::Gelatinous,
                flags: NONE,
                resists: Resists::new(0, 0, 0, 3),
                ac: 8,
                hp: 20,
                magic_res: 20,
            },
            MonsterKind::WaterElemental => SpeciesData {
                name: "water elemental",
                glyph: 'E',
                material: Material::Gelatinous,
                flags: NONE,
                resists: Resists::new(3, 0, 0, 3),
                ac: 4,
                hp: 40,
                magic_res: 60,
            },
            MonsterKind::Skeleton => SpeciesData {
                name: "skeleton",
                glyph: 'Z',
                material: Material::Skeletal,
                flags: NONE,
                resists: Resists::new(0, 2, 0, 3),
                ac: 4,
                hp: 20,
                magic_res: 30,
            },
            MonsterKind::ChatteringSkull => SpeciesData {
                name: "chattering skull",
                glyph: 'z',
                material: Material::Skeletal,
                flags: FLIES,
                resists: Resists::new(0, 2, 0, 3),
                ac: 8,
                hp: 10,
                magic_res: 25,
            },
            MonsterKind::CursedSkull => SpeciesData {
                name: "cursed skull",
                glyph: 'z',
                material: Material::Skeletal,
                flags: FLIES,
                resists: Resists::new(1, 2, 1, 3),
                ac: 12,
                hp: 35,
                magic_res: 70,
            },
            MonsterKind::IceBeast => SpeciesData {
                name: "ice beast",
                glyph: 'I',
                material: Material::Icy,
                flags: NONE,
                resists: Resists::new(-1, 3, 0, 3),
                ac: 5,
                hp: 25,
                magic_res: 20,
            },
            MonsterKind::ClayGolem => SpeciesData {
                name: "clay golem",
                glyph: '\'',
                material: Material::Stony,
                flags: NONE,
                resists: Resists::new(1, 1, 1, 3),
                ac: 7,
                hp: 45,
                magic_res: 60,
            },
            MonsterKind::StoneGolem => SpeciesData {
                name: "stone golem",
                glyph: '\'',
                material: Material::Stony,
                flags: NONE,
                resists: Resists::new(2, 2, 2, 3),
                ac: 10,
                hp: 60,
                magic_res: 80,
            },
            MonsterKind::IronGolem => SpeciesData {
                name: "iron golem",
                glyph: '\'',
                material: Material::Metallic,
                flags: NONE,
                resists: Resists::new(2, 1, 1, 3),
                ac: 15,
                hp: 80,
                magic_res: 100,
            },
            MonsterKind::CrystalGolem => SpeciesData {
                name: "crystal golem",
                glyph: '\'',
                material: Material::Crystalline,
                flags: NONE,
                resists: Resists::new(1, 1, 1, 3),
                ac: 12,
                hp: 55,
                magic_res: 80,
            },
            MonsterKind::WoodGolem => SpeciesData {
                name: "wood golem",
                glyph: '\'',
                material: Material::Wooden,
                flags: NONE,
                resists: Resists::new(-1, 1, 1, 3),
                ac: 6,
                hp: 40,
                magic_res: 50,
            },
            MonsterKind::EarthElemental => SpeciesData {
                name: "earth elemental",
                glyph: 'E',
                material: Material::Stony,
                flags: NONE,
                resists: Resists::new(1, 1, 2, 3),
                ac: 8,
                hp: 50,
                magic_res: 80,
            },
            MonsterKind::GraniteGargoyle => SpeciesData {
                name: "granite gargoyle",
                glyph: 'g',
                material: Material::Stony,
                flags: FLIES,
                resists: Resists::new(1, 1, 1, 3),
                ac: 14,
                hp: 25,
                magic_res: 45,
            },
            MonsterKind::MetalGargoyle => SpeciesData {
                name: "metal gargoyle",
                glyph: 'g',
                material: Material::Metallic,
                flags: FLIES,
                resists: Resists::new(1, 1, 1, 3),
                ac: 11,
                hp: 30,
                magic_res: 50,
            },
            // Soft half-melted rock, whatever the name suggests
            MonsterKind::MoltenGargoyle => SpeciesData {
                name: "molten gargoyle",
                glyph: 'g',
                material: Material::Flesh,
                flags: FLIES,
                resists: Resists::new(3, -1, 0, 3),
                ac: 12,
                hp: 24,
                magic_res: 45,
            },
            MonsterKind::AnimatedStatue => SpeciesData {
                name: "animated statue",
                glyph: '8',
                material: Material::Stony,
                flags: NONE,
                resists: Resists::new(2, 2, 2, 3),
                ac: 12,
                hp: 50,
                magic_res: MAGIC_IMMUNE,
            },
            MonsterKind::SilverSentinel => SpeciesData {
                name: "silver sentinel",
                glyph: '8',
                material: Material::Metallic,
                flags: NONE,
                resists: Resists::new(1, 1, 2, 3),
                ac: 14,
                hp: 60,
                magic_res: MAGIC_IMMUNE,
            },
            MonsterKind::AmberSentinel => SpeciesData {
                name: "amber sentinel",
                glyph: '8',
                material: Material::Crystalline,
                flags: NONE,
                resists: Resists::new(1, 1, 1, 3),
                ac: 13,
                hp: 65,
                magic_res: MAGIC_IMMUNE,
            },
            MonsterKind::DancingBlade => SpeciesData {
                name: "dancing blade",
                glyph: ')',
                material: Material::Metallic,
                flags: FLIES,
                resists: Resists::new(1, 1, 1, 3),
                ac: 16,
                hp: 20,
                magic_res: MAGIC_IMMUNE,
            },
        }
    }

    /// Species name
    pub const fn name(self) -> &'static str {
        self.data().name
    }

    /// A skull with no skeleton under it
    pub const fn is_bare_skull(self) -> bool {
        matches!(self, MonsterKind::ChatteringSkull | MonsterKind::CursedSkull)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_kind_has_data() {
        for kind in MonsterKind::iter() {
            let data = kind.data();
            assert!(!data.name.is_empty());
            assert!(data.hp > 0, "{} has no hit points", data.name);
            assert!(data.ac >= 0);
        }
    }

    #[test]
    fn test_vaporous_kinds_fly() {
        for kind in MonsterKind::iter() {
            let data = kind.data();
            if data.material == Material::Vaporous {
                assert!(
                    data.flags.contains(SpeciesFlags::FLIES),
                    "{} is vaporous but grounded",
                    data.name
                );
            }
        }
    }

    #[test]
    fn test_species_flags_serde() {
        let flags = SpeciesFlags::FLIES | SpeciesFlags::VENOMOUS;
        let json = serde_json::to_string(&flags).unwrap();
        let back: SpeciesFlags = serde_json::from_str(&json).unwrap();
        assert_eq!(back, flags);
    }
}
