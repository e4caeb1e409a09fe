//! Animation state selector: чистая функция state → клип

use bevy::prelude::*;

use super::playback::{ClipStarted, SpriteAnimator, SpriteCall, SpriteCallKind};
use super::{AnimationClip, AnimationProfile};
use crate::components::{AttackPhase, CharacterBody, CombatState, GoblinState, Health};
use crate::simulation::TickEffects;

/// |vx| ниже порога считается стоянием
pub const MOVING_EPSILON: f32 = 0.1;

/// Всё, от чего зависит выбор клипа
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationContext {
    pub dead: bool,
    pub hit: bool,
    pub phase: AttackPhase,
    pub on_ground: bool,
    pub velocity: Vec2,
    /// Enemy proximity override (цель вплотную или выше)
    pub hold_idle: bool,
    pub locomotion: AnimationClip,
}

/// Выбор клипа по приоритету:
/// death > hit > attack > proximity idle > jump/fall > walk/run > idle
pub fn select_animation(ctx: &AnimationContext) -> AnimationClip {
    if ctx.dead {
        return AnimationClip::Death;
    }
    if ctx.hit {
        return AnimationClip::Hit;
    }

    match ctx.phase {
        AttackPhase::Ground => return AnimationClip::Attack,
        AttackPhase::AirStall { .. } | AttackPhase::AirDive => return AnimationClip::FallingAttack,
        AttackPhase::GroundFollowUp => return AnimationClip::GroundAttack,
        AttackPhase::Ready => {}
    }

    if ctx.hold_idle {
        return AnimationClip::Idle;
    }

    // vy == 0 в воздухе (вершина прыжка) уже "fall"
    if !ctx.on_ground {
        return if ctx.velocity.y < 0.0 {
            AnimationClip::Jump
        } else {
            AnimationClip::Fall
        };
    }

    if ctx.velocity.x.abs() > MOVING_EPSILON {
        ctx.locomotion
    } else {
        AnimationClip::Idle
    }
}

/// Система: выбрать и проиграть клип, синхронизировать flip
///
/// Персонажи без SpriteAnimator сюда не попадают (анимация пропускается).
pub fn select_animations(
    mut characters: Query<(
        Entity,
        &CharacterBody,
        &CombatState,
        &Health,
        &AnimationProfile,
        Option<&GoblinState>,
        &mut SpriteAnimator,
    )>,
    mut calls: EventWriter<SpriteCall>,
    mut effects: ResMut<TickEffects>,
) {
    for (entity, body, combat, health, profile, goblin, mut animator) in characters.iter_mut() {
        let ctx = AnimationContext {
            dead: health.is_dead(),
            hit: combat.hit,
            phase: combat.phase,
            on_ground: body.on_ground,
            velocity: body.velocity,
            hold_idle: goblin.is_some_and(|state| state.proximity_idle),
            locomotion: profile.locomotion,
        };

        let clip = select_animation(&ctx);
        let speed = profile.speed_for(clip);
        if animator.play(clip, speed) {
            calls.write(SpriteCall {
                owner: entity,
                call: SpriteCallKind::Play(clip),
            });
            effects.clips.push(ClipStarted { entity, clip, speed });
        }

        // Мёртвые не разворачиваются
        if !ctx.dead {
            let flip = profile.flip_for(body.facing);
            if animator.set_flip_h(flip) {
                calls.write(SpriteCall {
                    owner: entity,
                    call: SpriteCallKind::FlipH(flip),
                });
            }
        }
    }
}
