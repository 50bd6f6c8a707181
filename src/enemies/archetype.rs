//! Enemy archetypes and their base stats.

use bevy::prelude::*;

use crate::physics::{FlightBand, Hitbox};

/// How an archetype moves through the level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Locomotion {
    /// Gravity plus platform resolution
    Ground,
    /// Free flight inside a band, ignoring platforms
    Flying(FlightBand),
    /// Position is driven entirely by the brain
    Scripted,
}

/// One concrete enemy or boss behaviour profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Archetype {
    BabyDragon,
    Goblin,
    FlyingEye,
    Skeleton,
    SkeletonMage,
    Lizardman,
    Imp,
    Harpy,
    Dragon,
    Gargoyle,
    DemonLord,
    Minotaur,
    HeadlessHorseman,
    Pyromancer,
}

/// Fixed numbers an archetype spawns with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    pub size: Vec2,
    pub hitbox: Hitbox,
    pub health: i32,
    pub damage: i32,
    pub speed: f32,
    pub score: u32,
    pub detection_range: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub locomotion: Locomotion,
}

const DRAGON_BAND: FlightBand = FlightBand {
    margin_x: 50.0,
    top: 50.0,
    bottom_gap: 200.0,
};

const GARGOYLE_BAND: FlightBand = FlightBand {
    margin_x: 50.0,
    top: 50.0,
    bottom_gap: 180.0,
};

impl Archetype {
    pub const ALL: [Archetype; 14] = [
        Archetype::BabyDragon,
        Archetype::Goblin,
        Archetype::FlyingEye,
        Archetype::Skeleton,
        Archetype::SkeletonMage,
        Archetype::Lizardman,
        Archetype::Imp,
        Archetype::Harpy,
        Archetype::Dragon,
        Archetype::Gargoyle,
        Archetype::DemonLord,
        Archetype::Minotaur,
        Archetype::HeadlessHorseman,
        Archetype::Pyromancer,
    ];

    /// Parse a level-data type key. `slime` and `bat` are legacy aliases.
    pub fn from_key(key: &str) -> Option<Self> {
        let archetype = match key {
            "baby_dragon" | "slime" => Archetype::BabyDragon,
            "goblin" => Archetype::Goblin,
            "flying_eye" | "bat" => Archetype::FlyingEye,
            "skeleton" => Archetype::Skeleton,
            "skeleton_mage" => Archetype::SkeletonMage,
            "lizardman" => Archetype::Lizardman,
            "imp" => Archetype::Imp,
            "harpy" => Archetype::Harpy,
            "dragon" => Archetype::Dragon,
            "gargoyle" => Archetype::Gargoyle,
            "demon_lord" => Archetype::DemonLord,
            "minotaur" => Archetype::Minotaur,
            "headless_horseman" => Archetype::HeadlessHorseman,
            "pyromancer" => Archetype::Pyromancer,
            _ => return None,
        };
        Some(archetype)
    }

    /// Like [`Archetype::from_key`], but unknown keys become a baby dragon.
    pub fn resolve(key: &str) -> Self {
        Self::from_key(key).unwrap_or_else(|| {
            warn!("Unknown enemy type '{}', spawning baby_dragon instead", key);
            Archetype::BabyDragon
        })
    }

    /// Canonical key, also used as the animation table name.
    pub fn key(self) -> &'static str {
        match self {
            Archetype::BabyDragon => "baby_dragon",
            Archetype::Goblin => "goblin",
            Archetype::FlyingEye => "flying_eye",
            Archetype::Skeleton => "skeleton",
            Archetype::SkeletonMage => "skeleton_mage",
            Archetype::Lizardman => "lizardman",
            Archetype::Imp => "imp",
            Archetype::Harpy => "harpy",
            Archetype::Dragon => "dragon",
            Archetype::Gargoyle => "gargoyle",
            Archetype::DemonLord => "demon_lord",
            Archetype::Minotaur => "minotaur",
            Archetype::HeadlessHorseman => "headless_horseman",
            Archetype::Pyromancer => "pyromancer",
        }
    }

    pub fn is_boss(self) -> bool {
        matches!(
            self,
            Archetype::Dragon
                | Archetype::Gargoyle
                | Archetype::DemonLord
                | Archetype::Minotaur
                | Archetype::HeadlessHorseman
                | Archetype::Pyromancer
        )
    }

    /// Seconds between death and removal.
    pub fn death_delay(self) -> f32 {
        match self {
            Archetype::Pyromancer => 1.0,
            a if a.is_boss() => 2.0,
            _ => 1.0,
        }
    }

    pub fn stats(self) -> EnemyStats {
        let base = EnemyStats {
            size: Vec2::splat(64.0),
            hitbox: Hitbox::new(16.0, 16.0, 32.0, 32.0),
            health: 1,
            damage: 1,
            speed: 60.0,
            score: 100,
            detection_range: 200.0,
            attack_range: 50.0,
            attack_cooldown: 0.0,
            locomotion: Locomotion::Ground,
        };

        match self {
            Archetype::BabyDragon => EnemyStats {
                size: Vec2::splat(80.0),
                hitbox: Hitbox::new(16.0, 24.0, 48.0, 44.0),
                speed: 80.0,
                ..base
            },
            Archetype::Goblin => EnemyStats {
                size: Vec2::splat(72.0),
                hitbox: Hitbox::new(14.0, 12.0, 44.0, 52.0),
                health: 2,
                speed: 70.0,
                score: 150,
                attack_range: 60.0,
                attack_cooldown: 1.5,
                ..base
            },
            Archetype::FlyingEye => EnemyStats {
                size: Vec2::splat(80.0),
                hitbox: Hitbox::new(16.0, 16.0, 48.0, 48.0),
                speed: 100.0,
                locomotion: Locomotion::Flying(FlightBand::MINION),
                ..base
            },
            Archetype::Skeleton => EnemyStats {
                size: Vec2::splat(72.0),
                hitbox: Hitbox::new(14.0, 8.0, 44.0, 56.0),
                health: 2,
                speed: 50.0,
                score: 200,
                attack_range: 250.0,
                attack_cooldown: 2.0,
                ..base
            },
            Archetype::SkeletonMage => EnemyStats {
                size: Vec2::splat(100.0),
                hitbox: Hitbox::new(25.0, 20.0, 50.0, 70.0),
                health: 3,
                speed: 40.0,
                score: 300,
                attack_range: 350.0,
                attack_cooldown: 2.0,
                ..base
            },
            Archetype::Lizardman => EnemyStats {
                size: Vec2::splat(128.0),
                hitbox: Hitbox::new(24.0, 0.0, 80.0, 76.0),
                health: 3,
                speed: 70.0,
                score: 250,
                attack_range: 70.0,
                attack_cooldown: 1.5,
                ..base
            },
            Archetype::Imp => EnemyStats {
                size: Vec2::new(128.0, 48.0),
                hitbox: Hitbox::new(32.0, 8.0, 64.0, 32.0),
                health: 2,
                speed: 80.0,
                score: 200,
                attack_range: 200.0,
                attack_cooldown: 2.5,
                locomotion: Locomotion::Flying(FlightBand::MINION),
                ..base
            },
            Archetype::Harpy => EnemyStats {
                size: Vec2::splat(80.0),
                hitbox: Hitbox::new(16.0, 16.0, 48.0, 48.0),
                health: 2,
                speed: 110.0,
                score: 200,
                locomotion: Locomotion::Flying(FlightBand::MINION),
                ..base
            },
            Archetype::Dragon => EnemyStats {
                size: Vec2::splat(160.0),
                hitbox: Hitbox::new(24.0, 40.0, 112.0, 90.0),
                health: 35,
                damage: 2,
                speed: 120.0,
                score: 2000,
                attack_cooldown: 1.0,
                locomotion: Locomotion::Flying(DRAGON_BAND),
                ..base
            },
            Archetype::Gargoyle => EnemyStats {
                size: Vec2::new(158.0, 125.0),
                hitbox: Hitbox::new(30.0, 40.0, 98.0, 75.0),
                health: 28,
                damage: 2,
                speed: 100.0,
                score: 2500,
                attack_cooldown: 1.5,
                locomotion: Locomotion::Flying(GARGOYLE_BAND),
                ..base
            },
            Archetype::DemonLord => EnemyStats {
                size: Vec2::splat(160.0),
                hitbox: Hitbox::new(28.0, 20.0, 104.0, 120.0),
                health: 45,
                speed: 130.0,
                score: 5000,
                attack_cooldown: 5.0,
                ..base
            },
            Archetype::Minotaur => EnemyStats {
                size: Vec2::splat(140.0),
                hitbox: Hitbox::new(20.0, 20.0, 100.0, 110.0),
                health: 120,
                damage: 2,
                speed: 100.0,
                score: 3000,
                attack_cooldown: 2.0,
                ..base
            },
            Archetype::HeadlessHorseman => EnemyStats {
                size: Vec2::splat(140.0),
                hitbox: Hitbox::new(20.0, 20.0, 100.0, 110.0),
                health: 50,
                damage: 2,
                speed: 150.0,
                score: 4000,
                attack_cooldown: 2.0,
                ..base
            },
            Archetype::Pyromancer => EnemyStats {
                size: Vec2::splat(206.0),
                hitbox: Hitbox::new(55.0, 41.0, 96.0, 137.0),
                health: 25,
                damage: 2,
                speed: 150.0,
                score: 5000,
                attack_cooldown: 1.0,
                locomotion: Locomotion::Scripted,
                ..base
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_and_fallback() {
        assert_eq!(Archetype::from_key("slime"), Some(Archetype::BabyDragon));
        assert_eq!(Archetype::from_key("bat"), Some(Archetype::FlyingEye));
        assert_eq!(Archetype::from_key("wyvern"), None);
        assert_eq!(Archetype::resolve("wyvern"), Archetype::BabyDragon);
    }

    #[test]
    fn keys_parse_back() {
        for archetype in Archetype::ALL {
            assert_eq!(Archetype::from_key(archetype.key()), Some(archetype));
        }
    }

    #[test]
    fn hitboxes_fit_inside_visual_bounds() {
        for archetype in Archetype::ALL {
            let stats = archetype.stats();
            let hb = stats.hitbox;
            assert!(hb.offset.x >= 0.0 && hb.offset.y >= 0.0, "{:?}", archetype);
            assert!(hb.offset.x + hb.size.x <= stats.size.x, "{:?}", archetype);
            assert!(hb.offset.y + hb.size.y <= stats.size.y, "{:?}", archetype);
        }
    }

    #[test]
    fn six_bosses() {
        let bosses = Archetype::ALL.iter().filter(|a| a.is_boss()).count();
        assert_eq!(bosses, 6);
    }
}
