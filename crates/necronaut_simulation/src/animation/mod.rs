//! Animation: выбор клипа, playback surface, weapon relay
//!
//! Flow за тик:
//! ```text
//! controllers → select_animations (pure selector) → SpriteCall (play / flip)
//!   → relay_weapon_calls (weapon повторяет play-calls владельца)
//!   → advance_playback → AnimationFinished (читается в начале СЛЕДУЮЩЕГО тика)
//! ```

use serde::{Deserialize, Serialize};

use bevy::prelude::*;

use crate::components::Facing;

pub mod playback;
pub mod selector;
pub mod weapon;

pub use playback::{
    advance_playback, dispatch_animation_finished, report_missing_animators, AnimationFinished, ClipLibrary, ClipStarted,
    SpriteAnimator, SpriteCall, SpriteCallKind,
};
pub use selector::{select_animation, select_animations, AnimationContext};
pub use weapon::{relay_weapon_calls, WeaponProfile, WeaponRelay};

/// Клипы персонажей и оружия
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationClip {
    Idle,
    Walk,
    Run,
    Jump,
    Fall,
    Attack,
    FallingAttack,
    GroundAttack,
    Hit,
    Death,
}

impl AnimationClip {
    /// Имя клипа в sprite frames
    pub fn name(self) -> &'static str {
        match self {
            AnimationClip::Idle => "idle",
            AnimationClip::Walk => "walk",
            AnimationClip::Run => "run",
            AnimationClip::Jump => "jump",
            AnimationClip::Fall => "fall",
            AnimationClip::Attack => "attack",
            AnimationClip::FallingAttack => "falling attack",
            AnimationClip::GroundAttack => "ground attack",
            AnimationClip::Hit => "hit",
            AnimationClip::Death => "death",
        }
    }
}

/// Параметры анимации персонажа (speed scale по клипам, ходьба/бег)
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationProfile {
    /// Клип движения по земле ("run" у игрока, "walk" у гоблина)
    pub locomotion: AnimationClip,
    pub default_speed: f32,
    /// "attack" и "falling attack"
    pub attack_speed: f32,
    pub ground_attack_speed: f32,
    /// Куда смотрит спрайт без flip
    pub native_facing: Facing,
}

impl Default for AnimationProfile {
    fn default() -> Self {
        Self {
            locomotion: AnimationClip::Walk,
            default_speed: 1.0,
            attack_speed: 1.0,
            ground_attack_speed: 1.0,
            native_facing: Facing::Right,
        }
    }
}

impl AnimationProfile {
    pub fn speed_for(&self, clip: AnimationClip) -> f32 {
        match clip {
            AnimationClip::Attack | AnimationClip::FallingAttack => self.attack_speed,
            AnimationClip::GroundAttack => self.ground_attack_speed,
            _ => self.default_speed,
        }
    }

    /// flip_h нужен когда персонаж смотрит против нативного направления спрайта
    pub fn flip_for(&self, facing: Facing) -> bool {
        facing != self.native_facing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_names() {
        assert_eq!(AnimationClip::FallingAttack.name(), "falling attack");
        assert_eq!(AnimationClip::GroundAttack.name(), "ground attack");
        assert_eq!(AnimationClip::Idle.name(), "idle");
    }

    #[test]
    fn test_profile_speeds_and_flip() {
        let profile = AnimationProfile {
            locomotion: AnimationClip::Run,
            default_speed: 1.5,
            attack_speed: 2.0,
            ground_attack_speed: 2.5,
            native_facing: Facing::Left,
        };

        assert_eq!(profile.speed_for(AnimationClip::Run), 1.5);
        assert_eq!(profile.speed_for(AnimationClip::FallingAttack), 2.0);
        assert_eq!(profile.speed_for(AnimationClip::GroundAttack), 2.5);

        assert!(profile.flip_for(Facing::Right));
        assert!(!profile.flip_for(Facing::Left));
    }
}
