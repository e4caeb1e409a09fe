//! Animation playback surface (headless AnimatedSprite2D)
//!
//! - `SpriteAnimator`: текущий клип, speed scale, flip_h
//! - `ClipLibrary`: длительности одноразовых клипов, остальные зациклены
//! - `AnimationFinished`: сигнал окончания клипа, доставляется на СЛЕДУЮЩЕМ тике

use std::collections::HashSet;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::weapon::{WeaponProfile, WeaponRelay};
use super::AnimationClip;
use crate::components::{CombatState, Equipped, Health};
use crate::logger;
use crate::simulation::{TickDelta, TickEffects};

/// Длительности одноразовых клипов (секунды при speed_scale = 1.0)
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipLibrary {
    pub attack: f32,
    pub ground_attack: f32,
    pub hit: f32,
    pub death: f32,
}

impl Default for ClipLibrary {
    fn default() -> Self {
        Self {
            attack: 0.6,
            ground_attack: 0.5,
            hit: 0.4,
            death: 0.8,
        }
    }
}

impl ClipLibrary {
    /// None = клип зациклен и никогда не заканчивается
    pub fn duration(&self, clip: AnimationClip) -> Option<f32> {
        match clip {
            AnimationClip::Attack => Some(self.attack),
            AnimationClip::GroundAttack => Some(self.ground_attack),
            AnimationClip::Hit => Some(self.hit),
            AnimationClip::Death => Some(self.death),
            AnimationClip::Idle
            | AnimationClip::Walk
            | AnimationClip::Run
            | AnimationClip::Jump
            | AnimationClip::Fall
            | AnimationClip::FallingAttack => None,
        }
    }
}

/// Playback surface персонажа или оружия
#[derive(Component, Debug, Clone, PartialEq)]
pub struct SpriteAnimator {
    clip: Option<AnimationClip>,
    speed_scale: f32,
    elapsed: f32,
    finished: bool,
    flip_h: bool,
}

impl SpriteAnimator {
    pub fn new(speed_scale: f32) -> Self {
        Self {
            clip: None,
            speed_scale,
            elapsed: 0.0,
            finished: false,
            flip_h: false,
        }
    }

    pub fn clip(&self) -> Option<AnimationClip> {
        self.clip
    }

    pub fn speed_scale(&self) -> f32 {
        self.speed_scale
    }

    pub fn flip_h(&self) -> bool {
        self.flip_h
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn set_speed_scale(&mut self, speed_scale: f32) {
        self.speed_scale = speed_scale;
    }

    /// Проиграть клип. Тот же клип не перезапускается, пока не доиграл.
    ///
    /// Возвращает true если клип (пере)запущен.
    pub fn play(&mut self, clip: AnimationClip, speed_scale: f32) -> bool {
        self.speed_scale = speed_scale;
        if self.clip == Some(clip) && !self.finished {
            return false;
        }
        self.clip = Some(clip);
        self.elapsed = 0.0;
        self.finished = false;
        true
    }

    /// Возвращает true если flip изменился
    pub fn set_flip_h(&mut self, flip_h: bool) -> bool {
        let changed = self.flip_h != flip_h;
        self.flip_h = flip_h;
        changed
    }

    /// Продвинуть playback. Возвращает клип, который закончился на этом шаге.
    pub fn advance(&mut self, delta: f32, library: &ClipLibrary) -> Option<AnimationClip> {
        let clip = self.clip?;
        if self.finished {
            return None;
        }

        self.elapsed += delta * self.speed_scale;

        let duration = library.duration(clip)?;
        if self.elapsed >= duration {
            self.finished = true;
            Some(clip)
        } else {
            None
        }
    }
}

/// Вызов на playback surface (для weapon relay)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpriteCallKind {
    Play(AnimationClip),
    FlipH(bool),
}

/// Событие: персонаж вызвал play/flip на своём спрайте
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SpriteCall {
    pub owner: Entity,
    pub call: SpriteCallKind,
}

/// Событие: одноразовый клип доиграл
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AnimationFinished {
    pub entity: Entity,
    pub clip: AnimationClip,
}

/// Effect: клип запущен на персонаже
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipStarted {
    pub entity: Entity,
    pub clip: AnimationClip,
    pub speed: f32,
}

/// Система: продвинуть все playback surfaces
pub fn advance_playback(
    delta: Res<TickDelta>,
    library: Res<ClipLibrary>,
    mut animators: Query<(Entity, &mut SpriteAnimator)>,
    mut finished: EventWriter<AnimationFinished>,
) {
    for (entity, mut animator) in animators.iter_mut() {
        if let Some(clip) = animator.advance(delta.0, &library) {
            finished.write(AnimationFinished { entity, clip });
        }
    }
}

/// Система: предупредить (один раз на entity) о персонаже без playback surface
///
/// Без surface персонаж не атакует и не анимируется, "hit" снимается сразу.
pub fn report_missing_animators(
    spawned: Query<Entity, (Added<CombatState>, Without<SpriteAnimator>)>,
    mut removed: RemovedComponents<SpriteAnimator>,
    characters: Query<(), (With<CombatState>, Without<SpriteAnimator>)>,
    mut reported: Local<HashSet<Entity>>,
) {
    let missing: Vec<Entity> = spawned
        .iter()
        .chain(removed.read().filter(|entity| characters.contains(*entity)))
        .collect();

    for entity in missing {
        if reported.insert(entity) {
            logger::log_warning(&format!(
                "Entity {:?} has no animation surface: attacks and animation skipped",
                entity
            ));
        }
    }
}

/// Система: обработать AnimationFinished прошлого тика
///
/// - "attack" / "ground attack" / "hit" → CombatState возвращается в Ready
/// - "death" → despawn персонажа вместе с оружием
/// - клипы weapon relay → сброс speed scale, возврат в "idle"
pub fn dispatch_animation_finished(
    mut commands: Commands,
    mut finished: EventReader<AnimationFinished>,
    mut characters: Query<(&mut CombatState, &Health, Option<&Equipped>)>,
    mut relays: Query<(&WeaponProfile, &mut SpriteAnimator), With<WeaponRelay>>,
    mut effects: ResMut<TickEffects>,
) {
    for event in finished.read() {
        if let Ok((mut combat, health, equipped)) = characters.get_mut(event.entity) {
            if event.clip == AnimationClip::Death && health.is_dead() {
                if let Some(equipped) = equipped {
                    if let Ok(mut weapon_commands) = commands.get_entity(equipped.weapon) {
                        weapon_commands.despawn();
                    }
                }
                if let Ok(mut entity_commands) = commands.get_entity(event.entity) {
                    entity_commands.despawn();
                    effects.despawned.push(event.entity);
                    logger::log_info(&format!("Entity {:?} despawned after death animation", event.entity));
                }
                continue;
            }

            combat.finish_clip(event.clip);
            continue;
        }

        if let Ok((profile, mut animator)) = relays.get_mut(event.entity) {
            profile.relay_finished(&mut animator, event.clip);
        }
    }
}
