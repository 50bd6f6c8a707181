//! Pose animation state.
//!
//! The core never touches images. It only tracks which pose an actor is
//! in and which frame of that pose is showing, using frame counts from an
//! [`AnimationSet`]. Playback rates and looping are fixed per rig.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Named animation clips an actor can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum Pose {
    Idle,
    Walk,
    Run,
    Jump,
    Fall,
    Attack,
    Shoot,
    Hurt,
    Death,
    Fly,
}

/// Which playback table an actor uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rig {
    Player,
    Enemy,
}

impl Rig {
    /// Frames per second and looping for a pose, or `None` if this rig has
    /// no such clip.
    pub fn playback(self, pose: Pose) -> Option<(f32, bool)> {
        match (self, pose) {
            (Rig::Player, Pose::Idle) => Some((6.0, true)),
            (Rig::Player, Pose::Run) => Some((10.0, true)),
            (Rig::Player, Pose::Jump) => Some((12.0, false)),
            (Rig::Player, Pose::Fall) => Some((10.0, true)),
            (Rig::Player, Pose::Attack) => Some((15.0, false)),
            (Rig::Player, Pose::Shoot) => Some((12.0, false)),
            (Rig::Player, Pose::Hurt) => Some((10.0, false)),
            (Rig::Player, Pose::Death) => Some((6.0, false)),
            (Rig::Enemy, Pose::Idle) => Some((8.0, true)),
            (Rig::Enemy, Pose::Walk) => Some((10.0, true)),
            (Rig::Enemy, Pose::Attack) => Some((12.0, false)),
            (Rig::Enemy, Pose::Hurt) => Some((10.0, false)),
            (Rig::Enemy, Pose::Death) => Some((8.0, false)),
            (Rig::Enemy, Pose::Fly) => Some((10.0, true)),
            _ => None,
        }
    }

    fn poses(self) -> &'static [Pose] {
        match self {
            Rig::Player => &[
                Pose::Idle,
                Pose::Run,
                Pose::Jump,
                Pose::Fall,
                Pose::Attack,
                Pose::Shoot,
                Pose::Hurt,
                Pose::Death,
            ],
            Rig::Enemy => &[Pose::Idle, Pose::Walk, Pose::Attack, Pose::Hurt, Pose::Death],
        }
    }
}

/// Frame counts per pose for one actor type.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct AnimationSet {
    pub frames: HashMap<Pose, usize>,
}

impl AnimationSet {
    /// One frame for every pose the rig defines. Used when an actor type
    /// has no table entry so the simulation still runs.
    pub fn placeholder(rig: Rig) -> Self {
        Self {
            frames: rig.poses().iter().map(|&pose| (pose, 1)).collect(),
        }
    }

    pub fn frame_count(&self, pose: Pose) -> Option<usize> {
        self.frames.get(&pose).copied().filter(|&count| count > 0)
    }
}

/// Playback state of the current pose.
#[derive(Debug, Clone)]
pub struct Animator {
    rig: Rig,
    set: AnimationSet,
    pose: Option<Pose>,
    frame: usize,
    timer: f32,
    finished: bool,
}

impl Animator {
    /// Start in `Idle` if the set has it.
    pub fn new(rig: Rig, set: AnimationSet) -> Self {
        let mut animator = Self {
            rig,
            set,
            pose: None,
            frame: 0,
            timer: 0.0,
            finished: false,
        };
        animator.play(Pose::Idle);
        animator
    }

    /// Swap in a (re)loaded set, keeping the current pose if possible.
    pub fn replace_set(&mut self, set: AnimationSet) {
        self.set = set;
        self.frame = 0;
        self.timer = 0.0;
        self.finished = false;
        if self.clip().is_none() {
            self.pose = None;
            self.play(Pose::Idle);
        }
    }

    /// Switch pose. Replaying the current pose is a no-op, and a pose the
    /// set lacks leaves the current one running.
    pub fn play(&mut self, pose: Pose) {
        if self.pose == Some(pose) {
            return;
        }
        if self.set.frame_count(pose).is_none() || self.rig.playback(pose).is_none() {
            return;
        }
        self.pose = Some(pose);
        self.frame = 0;
        self.timer = 0.0;
        self.finished = false;
    }

    /// Restart the current clip from frame 0.
    pub fn restart(&mut self) {
        self.frame = 0;
        self.timer = 0.0;
        self.finished = false;
    }

    fn clip(&self) -> Option<(usize, f32, bool)> {
        let pose = self.pose?;
        let frames = self.set.frame_count(pose)?;
        let (fps, looping) = self.rig.playback(pose)?;
        Some((frames, fps, looping))
    }

    /// Advance by `dt`, stepping at most one frame per call.
    pub fn advance(&mut self, dt: f32) {
        let Some((frames, fps, looping)) = self.clip() else {
            return;
        };
        if self.finished && !looping {
            return;
        }

        self.timer += dt;
        let frame_duration = 1.0 / fps;
        if self.timer >= frame_duration {
            self.timer -= frame_duration;
            self.frame += 1;
            if self.frame >= frames {
                if looping {
                    self.frame = 0;
                } else {
                    self.frame = frames - 1;
                    self.finished = true;
                }
            }
        }
    }

    /// A missing clip counts as finished so one-shot logic never waits on
    /// art that is not there.
    pub fn is_finished(&self) -> bool {
        match self.clip() {
            Some(_) => self.finished,
            None => true,
        }
    }

    pub fn pose(&self) -> Option<Pose> {
        self.pose
    }

    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Pin the displayed frame (held poses such as jump and fall).
    pub fn hold_frame(&mut self, frame: usize) {
        self.frame = frame;
    }
}

/// Animation tables for every actor type, keyed by actor type name.
#[derive(Resource, Debug, Default)]
pub struct AnimationLibrary {
    pub sets: HashMap<String, AnimationSet>,
}

impl AnimationLibrary {
    /// Table for an actor type, or a placeholder if none was loaded.
    pub fn set_for(&self, key: &str, rig: Rig) -> AnimationSet {
        match self.sets.get(key) {
            Some(set) => set.clone(),
            None => {
                debug!("No animation table for '{}', using placeholder frames", key);
                AnimationSet::placeholder(rig)
            }
        }
    }

    pub fn animator(&self, key: &str, rig: Rig) -> Animator {
        Animator::new(rig, self.set_for(key, rig))
    }
}

/// Load the animation tables file into the library.
///
/// A missing or malformed file leaves the library empty; every actor then
/// runs on placeholder frames.
pub fn load_animation_library(
    config: Res<crate::core::GameConfig>,
    mut library: ResMut<AnimationLibrary>,
) {
    let path = Path::new(&config.animations_path);

    if !path.exists() {
        warn!("Animation table not found: {:?}", path);
        return;
    }

    match fs::read_to_string(path) {
        Ok(contents) => match ron::from_str::<HashMap<String, AnimationSet>>(&contents) {
            Ok(sets) => {
                library.sets = sets;
                info!("Loaded {} animation tables", library.sets.len());
            }
            Err(e) => {
                error!("Failed to parse animation tables {:?}: {}", path, e);
            }
        },
        Err(e) => {
            error!("Failed to read animation tables {:?}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(pairs: &[(Pose, usize)]) -> AnimationSet {
        AnimationSet {
            frames: pairs.iter().copied().collect(),
        }
    }

    #[test]
    fn one_shot_clip_stops_on_last_frame() {
        let mut anim = Animator::new(Rig::Enemy, set(&[(Pose::Idle, 2), (Pose::Attack, 3)]));
        anim.play(Pose::Attack);
        for _ in 0..10 {
            anim.advance(1.0 / 12.0 + 1e-4);
        }
        assert_eq!(anim.frame(), 2);
        assert!(anim.is_finished());
    }

    #[test]
    fn looping_clip_wraps() {
        let mut anim = Animator::new(Rig::Enemy, set(&[(Pose::Idle, 2)]));
        anim.advance(0.13);
        assert_eq!(anim.frame(), 1);
        anim.advance(0.13);
        assert_eq!(anim.frame(), 0);
        assert!(!anim.is_finished());
    }

    #[test]
    fn missing_clip_keeps_pose_and_reports_finished() {
        let mut anim = Animator::new(Rig::Enemy, set(&[]));
        assert_eq!(anim.pose(), None);
        assert!(anim.is_finished());

        let mut anim = Animator::new(Rig::Enemy, set(&[(Pose::Idle, 2)]));
        anim.play(Pose::Attack);
        assert_eq!(anim.pose(), Some(Pose::Idle));
    }

    #[test]
    fn placeholder_covers_rig_poses() {
        let library = AnimationLibrary::default();
        let anim = library.animator("nobody", Rig::Player);
        assert_eq!(anim.pose(), Some(Pose::Idle));
        assert_eq!(AnimationSet::placeholder(Rig::Player).frame_count(Pose::Shoot), Some(1));
    }
}
