//! Goblin scout: патруль / преследование / атака вплотную
//!
//! Per-tick (пропускается целиком, пока оглушён / мёртв / атакует):
//! 1. Цель в follow_distance → преследование, иначе патруль
//!    (смена направления каждые patrol_interval секунд, скорость ×0.5)
//! 2. Гравитация с cap (на земле vy = 0)
//! 3. Proximity override: цель вплотную или выше → "idle"
//! 4. move_and_slide
//! 5. Цель в attack_distance и cooldown истёк → один AttackQuery

use bevy::prelude::*;

use crate::animation::SpriteAnimator;
use crate::combat::AttackQuery;
use crate::components::{
    AttackPhase, CharacterBody, CombatState, Damageable, Facing, GoblinScout, GoblinState, Health,
};
use crate::config::GoblinConfig;
use crate::logger;
use crate::physics::{apply_gravity, slide, Aabb, MovementService};
use crate::simulation::{TickContext, TickDelta};

/// Входы goblin AI на тик
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoblinStep {
    /// None = цели нет (не задана, despawned или мертва)
    pub target: Option<Aabb>,
    pub alive: bool,
    pub can_animate: bool,
}

/// Создать goblin scout с целью (dependency injection, без поиска по сцене)
pub fn spawn_goblin(world: &mut World, config: &GoblinConfig, position: Vec2, target: Option<Entity>) -> Entity {
    let state = GoblinState::new(target);
    let facing = state.patrol_direction;

    let goblin = world
        .spawn((
            GoblinScout,
            state,
            *config,
            CharacterBody::new(position, config.half_extents(), facing),
            Health::new(config.health),
            CombatState::default(),
            Damageable,
            config.animation,
            SpriteAnimator::new(config.animation.default_speed),
        ))
        .id();

    match target {
        Some(target) if world.get_entity(target).is_err() => {
            logger::log_warning(&format!("Goblin {:?}: target {:?} does not exist, patrol only", goblin, target));
        }
        None => {
            logger::log_warning(&format!("Goblin {:?}: no target, patrol only", goblin));
        }
        Some(_) => {}
    }

    goblin
}

/// Один тик goblin AI. Возвращает true если атака сработала.
pub fn advance_goblin(
    config: &GoblinConfig,
    step: GoblinStep,
    body: &mut CharacterBody,
    combat: &mut CombatState,
    state: &mut GoblinState,
    ctx: TickContext,
) -> bool {
    if !step.alive || combat.hit || combat.is_attacking() {
        return false;
    }

    state.patrol_timer += ctx.delta;

    let to_target = step.target.map(|target| target.center - body.position);
    match to_target {
        Some(offset) if offset.length() <= config.follow_distance => {
            let direction = offset.normalize_or_zero();
            body.velocity.x = direction.x * config.speed;
            if let Some(facing) = Facing::from_sign(direction.x) {
                body.facing = facing;
            }
        }
        _ => {
            if state.patrol_timer >= config.patrol_interval {
                state.patrol_direction = state.patrol_direction.flipped();
                state.patrol_timer = 0.0;
            }
            body.velocity.x = state.patrol_direction.sign() * config.speed * config.patrol_speed_factor;
            body.facing = state.patrol_direction;
        }
    }

    if body.on_ground {
        body.velocity.y = 0.0;
    } else {
        apply_gravity(&mut body.velocity, config.gravity, config.max_fall_speed, ctx.delta);
    }

    // Цель выше = её ноги выше наших (+y вниз)
    state.proximity_idle = step.target.is_some_and(|target| {
        target.center.distance(body.position) <= config.idle_distance || target.max().y < body.feet_y()
    });

    slide(body, ctx.backend, ctx.delta);

    let Some(target) = step.target else {
        return false;
    };
    let in_range = target.center.distance(body.position) <= config.attack_distance;
    if !in_range || !step.can_animate || !combat.can_attack() {
        return false;
    }

    combat.start_attack(AttackPhase::Ground, config.attack.cooldown);
    body.velocity = Vec2::ZERO;
    true
}

/// System: goblin AI
///
/// Цели берутся без GoblinScout (гоблины друг на друга не агрятся).
pub fn goblin_controller(
    delta: Res<TickDelta>,
    movement: Res<MovementService>,
    mut goblins: Query<
        (
            Entity,
            &GoblinConfig,
            &Health,
            Has<SpriteAnimator>,
            &mut CharacterBody,
            &mut CombatState,
            &mut GoblinState,
        ),
        With<GoblinScout>,
    >,
    targets: Query<(&CharacterBody, Option<&Health>), Without<GoblinScout>>,
    mut attacks: EventWriter<AttackQuery>,
) {
    let ctx = TickContext {
        delta: delta.0,
        backend: movement.0.as_ref(),
    };

    for (entity, config, health, can_animate, mut body, mut combat, mut state) in goblins.iter_mut() {
        if combat.hit && !can_animate {
            combat.hit = false;
        }

        // Despawned или мёртвая цель = цели нет
        let target = state
            .target
            .and_then(|target| targets.get(target).ok())
            .filter(|(_, health)| health.is_none_or(|health| health.is_alive()))
            .map(|(target_body, _)| target_body.bounds());

        let step = GoblinStep {
            target,
            alive: health.is_alive(),
            can_animate,
        };

        if advance_goblin(config, step, &mut body, &mut combat, &mut state, ctx) {
            logger::log(&format!("Goblin {:?} attack facing {:?}", entity, body.facing));
            attacks.write(AttackQuery::new(entity, &body, &config.attack));
        }
    }
}
