//! Weapon relay: визуал оружия повторяет play-calls владельца
//!
//! Relay не видит состояние персонажа, только вызовы (SpriteCall).
//! У оружия свой набор клипов: walk / hit / death игнорируются.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::playback::{SpriteAnimator, SpriteCall, SpriteCallKind};
use super::AnimationClip;

/// Оружие, привязанное к владельцу
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponRelay {
    pub owner: Entity,
}

/// Speed scale клипов оружия
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaponProfile {
    pub default_speed: f32,
    pub attack_speed: f32,
    pub ground_attack_speed: f32,
}

impl Default for WeaponProfile {
    fn default() -> Self {
        Self {
            default_speed: 1.5,
            attack_speed: 2.0,
            ground_attack_speed: 2.0,
        }
    }
}

impl WeaponProfile {
    /// Повторить play-call владельца. Возвращает true если клип запущен.
    pub fn relay_play(&self, animator: &mut SpriteAnimator, clip: AnimationClip) -> bool {
        match clip {
            AnimationClip::Attack | AnimationClip::FallingAttack => animator.play(clip, self.attack_speed),
            AnimationClip::GroundAttack => animator.play(clip, self.ground_attack_speed),
            AnimationClip::Idle => animator.play(clip, self.default_speed),
            // run / jump / fall не трогают speed scale
            AnimationClip::Run | AnimationClip::Jump | AnimationClip::Fall => {
                let speed = animator.speed_scale();
                animator.play(clip, speed)
            }
            AnimationClip::Walk | AnimationClip::Hit | AnimationClip::Death => false,
        }
    }

    /// Клип оружия доиграл
    pub fn relay_finished(&self, animator: &mut SpriteAnimator, clip: AnimationClip) {
        match clip {
            AnimationClip::Attack => {
                animator.play(AnimationClip::Idle, self.default_speed);
            }
            AnimationClip::GroundAttack => animator.set_speed_scale(self.default_speed),
            _ => {}
        }
    }
}

/// Система: раздать SpriteCall владельцев их weapon relay
pub fn relay_weapon_calls(
    mut calls: EventReader<SpriteCall>,
    mut relays: Query<(&WeaponRelay, &WeaponProfile, &mut SpriteAnimator)>,
) {
    for call in calls.read() {
        for (relay, profile, mut animator) in relays.iter_mut() {
            if relay.owner != call.owner {
                continue;
            }

            match call.call {
                SpriteCallKind::Play(clip) => {
                    profile.relay_play(&mut animator, clip);
                }
                SpriteCallKind::FlipH(flip) => {
                    animator.set_flip_h(flip);
                }
            }
        }
    }
}
