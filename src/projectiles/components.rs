//! Projectile components.

use bevy::prelude::*;

use crate::core::Bounds;

/// Seconds a projectile lives unless something removes it first.
pub const PROJECTILE_LIFETIME: f32 = 3.0;

/// How far outside the view a projectile may travel before it is dropped.
pub const OFF_SCREEN_MARGIN: f32 = 100.0;

/// Visual/physical type of a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectileKind {
    /// Player horn bolt and generic enemy magic
    Magic,
    Bone,
    Fireball,
    Skull,
    /// The only kind that arcs under gravity
    Rock,
}

impl ProjectileKind {
    pub fn size(self) -> Vec2 {
        match self {
            ProjectileKind::Magic => Vec2::new(32.0, 32.0),
            ProjectileKind::Bone => Vec2::new(20.0, 12.0),
            ProjectileKind::Fireball => Vec2::new(20.0, 20.0),
            ProjectileKind::Skull => Vec2::new(24.0, 24.0),
            ProjectileKind::Rock => Vec2::new(22.0, 22.0),
        }
    }

    /// Downward acceleration in px/s².
    pub fn gravity(self) -> f32 {
        match self {
            ProjectileKind::Rock => 300.0,
            _ => 0.0,
        }
    }

    /// Whether the sprite tumbles while flying.
    pub fn spins(self) -> bool {
        matches!(
            self,
            ProjectileKind::Bone | ProjectileKind::Skull | ProjectileKind::Rock
        )
    }
}

/// Which side fired a projectile, and so which collision rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Player,
    Enemy,
}

/// Request to create a projectile, queued by actors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn {
    pub pos: Vec2,
    pub vel: Vec2,
    pub owner: Owner,
    pub kind: ProjectileKind,
    pub damage: i32,
}

impl ProjectileSpawn {
    /// One-damage enemy shot.
    pub fn enemy(kind: ProjectileKind, pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            owner: Owner::Enemy,
            kind,
            damage: 1,
        }
    }

    /// Player horn bolt.
    pub fn player(pos: Vec2, vel: Vec2, damage: i32) -> Self {
        Self {
            pos,
            vel,
            owner: Owner::Player,
            kind: ProjectileKind::Magic,
            damage,
        }
    }
}

/// A projectile in flight.
#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub owner: Owner,
    pub kind: ProjectileKind,
    pub damage: i32,
    pub lifetime: f32,
    pub age: f32,
    /// Set on expiry or impact; the reap pass despawns marked projectiles
    pub marked: bool,
    /// Tumble angle in radians (renderer only)
    pub rotation: f32,
    /// Sprite frame for the animated player bolt
    pub frame: usize,
    frame_timer: f32,
}

impl Projectile {
    const BOLT_FRAMES: usize = 4;
    const BOLT_FPS: f32 = 12.0;

    pub fn new(spawn: ProjectileSpawn) -> Self {
        Self {
            pos: spawn.pos,
            vel: spawn.vel,
            size: spawn.kind.size(),
            owner: spawn.owner,
            kind: spawn.kind,
            damage: spawn.damage,
            lifetime: PROJECTILE_LIFETIME,
            age: 0.0,
            marked: false,
            rotation: 0.0,
            frame: 0,
            frame_timer: 0.0,
        }
    }

    /// Move, spin, animate and age by `dt`.
    pub fn update(&mut self, dt: f32) {
        self.vel.y += self.kind.gravity() * dt;
        self.pos += self.vel * dt;

        if self.kind.spins() {
            self.rotation += dt * 10.0;
        }

        if self.owner == Owner::Player && self.kind == ProjectileKind::Magic {
            self.frame_timer += dt;
            if self.frame_timer >= 1.0 / Self::BOLT_FPS {
                self.frame_timer = 0.0;
                self.frame = (self.frame + 1) % Self::BOLT_FRAMES;
            }
        }

        self.age += dt;
        if self.age >= self.lifetime {
            self.marked = true;
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_pos_size(self.pos, self.size)
    }

    /// Whether the projectile's origin has left `view` by more than
    /// [`OFF_SCREEN_MARGIN`].
    pub fn is_off_screen(&self, view: Bounds) -> bool {
        self.pos.x < view.x - OFF_SCREEN_MARGIN
            || self.pos.x > view.right() + OFF_SCREEN_MARGIN
            || self.pos.y < view.y - OFF_SCREEN_MARGIN
            || self.pos.y > view.bottom() + OFF_SCREEN_MARGIN
    }
}
