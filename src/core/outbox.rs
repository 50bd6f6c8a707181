//! Deferred side effects and spawn bookkeeping.
//!
//! Actor updates are plain functions over component data. Anything they
//! want to add to the world (projectiles, summoned enemies) or announce
//! (sounds, screen effects, banners) is queued here and applied by a flush
//! system between pipeline stages, so no collection is mutated while it is
//! being iterated.

use bevy::prelude::*;

use super::events::{Banner, SoundId};
use crate::combat::EffectCue;
use crate::enemies::Archetype;
use crate::projectiles::ProjectileSpawn;

/// Monotonic spawn order of an actor or projectile.
///
/// Enemies update in ascending order, which reproduces "spawn order"
/// independently of ECS storage layout.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpawnSeq(pub u64);

/// Source of fresh [`SpawnSeq`] values.
#[derive(Resource, Debug, Default)]
pub struct SpawnCounter(u64);

impl SpawnCounter {
    pub fn next(&mut self) -> SpawnSeq {
        self.0 += 1;
        SpawnSeq(self.0)
    }
}

/// Enemy requested at runtime by a boss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummonRequest {
    pub archetype: Archetype,
    pub pos: Vec2,
}

/// Queue of side effects produced during a stage.
#[derive(Resource, Debug, Default)]
pub struct Outbox {
    pub projectiles: Vec<ProjectileSpawn>,
    pub summons: Vec<SummonRequest>,
    pub sounds: Vec<SoundId>,
    pub effects: Vec<EffectCue>,
    pub banners: Vec<Banner>,
}

impl Outbox {
    pub fn sound(&mut self, id: SoundId) {
        self.sounds.push(id);
    }

    pub fn effect(&mut self, cue: EffectCue) {
        self.effects.push(cue);
    }

    pub fn banner(&mut self, banner: Banner) {
        self.banners.push(banner);
    }

    pub fn projectile(&mut self, spawn: ProjectileSpawn) {
        self.projectiles.push(spawn);
    }

    pub fn summon(&mut self, archetype: Archetype, pos: Vec2) {
        self.summons.push(SummonRequest { archetype, pos });
    }

    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
            && self.summons.is_empty()
            && self.sounds.is_empty()
            && self.effects.is_empty()
            && self.banners.is_empty()
    }

    /// Drop everything queued (used when a level is torn down).
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
