//! Shared harness: a real headless app driven frame by frame.
#![allow(dead_code)]

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use retrocorn::combat::Health;
use retrocorn::core::{
    Bounds, FrameClock, GameConfig, GameState, InputSnapshot, SpawnCounter, StartGame,
};
use retrocorn::enemies::Enemy;
use retrocorn::game::{GameStats, Session};
use retrocorn::physics::Body;
use retrocorn::player::Player;
use retrocorn::projectiles::{Projectile, ProjectileSpawn};
use retrocorn::world::{LevelDescriptor, LevelRegistry, PlatformDef, Point, SpawnDef};
use retrocorn::RetrocornPlugin;

/// One simulated frame at 60 Hz.
pub const FRAME_MS: f64 = 1000.0 / 60.0;

/// App plus the host clock that feeds it.
pub struct Sim {
    pub app: App,
    now_ms: f64,
}

impl Sim {
    /// Build an app over the given levels (played in the given order) and
    /// run it to the title screen.
    pub fn new(levels: Vec<(&str, LevelDescriptor)>) -> Self {
        let mut registry = LevelRegistry::default();
        let mut order = Vec::new();
        for (key, descriptor) in levels {
            order.push(key.to_string());
            registry.insert(key, descriptor);
        }

        let config = GameConfig {
            seed: Some(7),
            level_order: order,
            levels_dir: "no/such/dir".to_string(),
            animations_path: "no/such/animations.ron".to_string(),
            scores_path: None,
            ..default()
        };

        let mut app = App::new();
        app.add_plugins((MinimalPlugins, StatesPlugin))
            .insert_resource(registry)
            .add_plugins(RetrocornPlugin { config });

        let mut sim = Self { app, now_ms: 0.0 };
        sim.step_ms(0.0);
        sim.step();
        assert_eq!(sim.state(), GameState::Start);
        sim
    }

    /// Advance one frame whose real duration is `ms`.
    pub fn step_ms(&mut self, ms: f64) {
        self.now_ms += ms;
        let now = self.now_ms;
        self.app.world_mut().resource_mut::<FrameClock>().submit(now);
        self.app.update();
    }

    pub fn step(&mut self) {
        self.step_ms(FRAME_MS);
    }

    pub fn steps(&mut self, count: usize) {
        for _ in 0..count {
            self.step();
        }
    }

    /// Step until `state` is current, at most `limit` frames of `ms` each.
    pub fn step_until(&mut self, state: GameState, ms: f64, limit: usize) -> bool {
        for _ in 0..limit {
            if self.state() == state {
                return true;
            }
            self.step_ms(ms);
        }
        self.state() == state
    }

    /// Request a run and process the level load. The next step is the first
    /// gameplay tick.
    pub fn start(&mut self, level: usize) {
        self.app.world_mut().send_event(StartGame { level });
        self.step();
    }

    pub fn state(&self) -> GameState {
        *self.app.world().resource::<State<GameState>>().get()
    }

    pub fn input(&mut self) -> Mut<'_, InputSnapshot> {
        self.app.world_mut().resource_mut::<InputSnapshot>()
    }

    pub fn session(&self) -> &Session {
        self.app.world().resource::<Session>()
    }

    pub fn session_mut(&mut self) -> Mut<'_, Session> {
        self.app.world_mut().resource_mut::<Session>()
    }

    pub fn stats(&self) -> &GameStats {
        self.app.world().resource::<GameStats>()
    }

    /// Snapshot of the player's state.
    pub fn player(&mut self) -> (Player, Body, Health) {
        let world = self.app.world_mut();
        let mut query = world.query::<(&Player, &Body, &Health)>();
        let (player, body, health) = query.single(world);
        (player.clone(), body.clone(), *health)
    }

    /// Edit the player in place.
    pub fn with_player(&mut self, edit: impl FnOnce(&mut Player, &mut Body, &mut Health)) {
        let world = self.app.world_mut();
        let mut query = world.query::<(&mut Player, &mut Body, &mut Health)>();
        let (mut player, mut body, mut health) = query.single_mut(world);
        edit(&mut player, &mut body, &mut health);
    }

    pub fn enemies(&mut self) -> Vec<Enemy> {
        let world = self.app.world_mut();
        let mut query = world.query::<&Enemy>();
        query.iter(world).cloned().collect()
    }

    pub fn enemy_bodies(&mut self) -> Vec<(Enemy, Body)> {
        let world = self.app.world_mut();
        let mut query = world.query::<(&Enemy, &Body)>();
        query.iter(world).map(|(e, b)| (e.clone(), b.clone())).collect()
    }

    pub fn projectile_count(&mut self) -> usize {
        let world = self.app.world_mut();
        let mut query = world.query::<&Projectile>();
        query.iter(world).count()
    }

    /// Put a projectile into the world directly, as the flush would.
    pub fn spawn_projectile(&mut self, spawn: ProjectileSpawn) {
        let seq = self.app.world_mut().resource_mut::<SpawnCounter>().next();
        self.app.world_mut().spawn((Projectile::new(spawn), seq));
    }
}

/// Flat level: one floor slab at y=500, the player standing at `start`.
pub fn flat_level(name: &str, width: f32) -> LevelDescriptor {
    let mut level = LevelDescriptor::blank(name, width, 600.0);
    level.player_start = Point { x: 100.0, y: 100.0 };
    level.platforms.push(PlatformDef {
        x: 0.0,
        y: 500.0,
        width,
        height: 100.0,
        ground: true,
    });
    level.power_up_spawns = Some(Vec::new());
    level
}

/// Same level with an end zone around the player start.
pub fn finish_at_start(name: &str) -> LevelDescriptor {
    let mut level = flat_level(name, 1600.0);
    level.level_end = Some(Bounds::new(80.0, 80.0, 120.0, 120.0));
    level
}

pub fn spawn(kind: &str, x: f32, y: f32) -> SpawnDef {
    SpawnDef {
        kind: kind.to_string(),
        x,
        y,
    }
}
