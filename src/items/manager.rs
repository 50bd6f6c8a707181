//! Timed power-up effects on the player.

use bevy::prelude::*;

use super::components::PowerUpKind;
use crate::player::{Player, PlayerConfig};

/// One running power-up effect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub remaining: f32,
}

impl ActivePowerUp {
    /// Fraction of the duration still left, for HUD bars.
    pub fn fraction_left(&self) -> f32 {
        (self.remaining / self.kind.duration()).clamp(0.0, 1.0)
    }
}

/// Effects currently applied to the player. At most one per kind: a new
/// pickup of a running kind restarts it rather than stacking.
#[derive(Resource, Debug, Clone, Default)]
pub struct PowerUpManager {
    active: Vec<ActivePowerUp>,
}

pub const SPEED_BOOST: f32 = 1.5;

impl PowerUpManager {
    pub fn active(&self) -> &[ActivePowerUp] {
        &self.active
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.active.iter().any(|p| p.kind == kind)
    }

    pub fn apply(&mut self, kind: PowerUpKind, player: &mut Player, config: &PlayerConfig) {
        self.active.retain(|p| p.kind != kind);

        match kind {
            PowerUpKind::Speed => player.speed_multiplier = SPEED_BOOST,
            PowerUpKind::Shield => player.shield = true,
            PowerUpKind::RapidFire => player.rapid_fire = true,
            PowerUpKind::Damage => {
                player.melee_damage = config.melee_damage * 2;
                player.projectile_damage = 2;
            }
            PowerUpKind::Magnet => player.magnet = true,
        }

        self.active.push(ActivePowerUp {
            kind,
            remaining: kind.duration(),
        });
    }

    /// Count down every effect and revert the expired ones.
    pub fn update(&mut self, dt: f32, player: &mut Player, config: &PlayerConfig) {
        for effect in &mut self.active {
            effect.remaining -= dt;
        }
        let (expired, running): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.active)
                .into_iter()
                .partition(|p| p.remaining <= 0.0);
        self.active = running;
        for effect in expired {
            debug!("Power-up {:?} expired", effect.kind);
            revert(effect.kind, player, config);
        }
    }

    /// Forget every effect without touching the player (death, level load;
    /// the player reset already restores base values).
    pub fn clear(&mut self) {
        self.active.clear();
    }
}

fn revert(kind: PowerUpKind, player: &mut Player, config: &PlayerConfig) {
    match kind {
        PowerUpKind::Speed => player.speed_multiplier = 1.0,
        PowerUpKind::Shield => player.shield = false,
        PowerUpKind::RapidFire => player.rapid_fire = false,
        PowerUpKind::Damage => {
            player.melee_damage = config.melee_damage;
            player.projectile_damage = 1;
        }
        PowerUpKind::Magnet => player.magnet = false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_kind_replaces_instead_of_stacking() {
        let config = PlayerConfig::default();
        let mut player = Player::new(&config);
        let mut manager = PowerUpManager::default();

        manager.apply(PowerUpKind::Speed, &mut player, &config);
        manager.update(5.0, &mut player, &config);
        manager.apply(PowerUpKind::Speed, &mut player, &config);

        assert_eq!(manager.active().len(), 1);
        assert_eq!(manager.active()[0].remaining, 8.0);
        assert_eq!(player.speed_multiplier, SPEED_BOOST);
    }

    #[test]
    fn expiry_reverts_the_effect() {
        let config = PlayerConfig::default();
        let mut player = Player::new(&config);
        let mut manager = PowerUpManager::default();

        manager.apply(PowerUpKind::Damage, &mut player, &config);
        manager.apply(PowerUpKind::Shield, &mut player, &config);
        assert_eq!(player.melee_damage, 4);
        assert_eq!(player.projectile_damage, 2);

        manager.update(10.5, &mut player, &config);
        assert!(manager.active().is_empty());
        assert_eq!(player.melee_damage, 2);
        assert_eq!(player.projectile_damage, 1);
        assert!(!player.shield);
    }
}
