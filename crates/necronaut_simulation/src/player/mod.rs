//! Player controller: движение, прыжки, атаки по вводу
//!
//! Per-tick:
//! 1. Воздушная атака (зависание → пике) целиком перехватывает тик
//! 2. Гравитация в воздухе (с cap по max_fall_speed)
//! 3. Горизонталь от оси ввода, facing по знаку оси
//! 4. Прыжок / двойной прыжок
//! 5. move_and_slide через MovementService, сброс прыжков на приземлении
//! 6. Атака по фронту ввода → один AttackQuery
//!
//! Пока атакует / оглушён / мёртв: ввод игнорируется, гравитация и коллизии работают.

use bevy::prelude::*;

use crate::animation::{SpriteAnimator, WeaponRelay};
use crate::combat::AttackQuery;
use crate::components::{
    AttackPhase, CharacterBody, CombatState, Damageable, Equipped, Facing, Health, Player, PlayerState,
};
use crate::config::PlayerConfig;
use crate::input::ActionInput;
use crate::logger;
use crate::physics::{apply_gravity, move_toward, slide, MovementService};
use crate::simulation::{TickContext, TickDelta};

/// Входы контроллера игрока на тик
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerStep {
    pub input: ActionInput,
    pub alive: bool,
    /// Есть animation surface (без неё атак нет)
    pub can_animate: bool,
}

/// Создать игрока (+ weapon relay если он есть в конфиге)
pub fn spawn_player(world: &mut World, config: &PlayerConfig, position: Vec2) -> Entity {
    // Спрайт игрока нативно смотрит влево, стартуем без flip
    let facing = config.animation.native_facing;

    let player = world
        .spawn((
            Player,
            PlayerState::default(),
            ActionInput::default(),
            *config,
            CharacterBody::new(position, config.half_extents(), facing),
            Health::new(config.health),
            CombatState::default(),
            Damageable,
            config.animation,
            SpriteAnimator::new(config.animation.default_speed),
        ))
        .id();

    if let Some(profile) = config.weapon {
        let weapon = world
            .spawn((
                WeaponRelay { owner: player },
                profile,
                SpriteAnimator::new(profile.default_speed),
            ))
            .id();
        world.entity_mut(player).insert(Equipped { weapon });
    }

    logger::log(&format!("Spawned player {:?} at {:?}", player, position));
    player
}

/// Прыжок: с земли полный, в воздухе ослабленный пока есть прыжки
pub fn try_jump(config: &PlayerConfig, body: &mut CharacterBody, jumps: &mut PlayerState) -> bool {
    if body.on_ground {
        if config.max_jumps == 0 {
            return false;
        }
        body.velocity.y = config.jump_velocity;
        jumps.jumps_used = 1;
        true
    } else if jumps.jumps_used < config.max_jumps {
        body.velocity.y = config.jump_velocity * config.double_jump_multiplier;
        jumps.jumps_used += 1;
        true
    } else {
        false
    }
}

/// Зависание гасит velocity, по таймеру переходит в пике
fn advance_air_attack(config: &PlayerConfig, body: &mut CharacterBody, combat: &mut CombatState, delta: f32) {
    if let AttackPhase::AirStall { remaining } = combat.phase {
        let decel = config.air_attack.deceleration * delta;
        body.velocity.x = move_toward(body.velocity.x, 0.0, decel);
        body.velocity.y = move_toward(body.velocity.y, 0.0, decel);

        let remaining = remaining - delta;
        combat.phase = if remaining > 0.0 {
            AttackPhase::AirStall { remaining }
        } else {
            AttackPhase::AirDive
        };
    }

    if combat.phase == AttackPhase::AirDive {
        body.velocity = Vec2::new(0.0, config.air_attack.dive_speed);
    }
}

/// Один тик игрока. Возвращает true если атака сработала на этом тике.
pub fn advance_player(
    config: &PlayerConfig,
    step: PlayerStep,
    body: &mut CharacterBody,
    combat: &mut CombatState,
    jumps: &mut PlayerState,
    ctx: TickContext,
) -> bool {
    if combat.phase.is_airborne() {
        advance_air_attack(config, body, combat, ctx.delta);
        if slide(body, ctx.backend, ctx.delta) {
            jumps.jumps_used = 0;
        }
        // Приземлились из пике → добивание ("ground attack")
        if body.on_ground {
            combat.phase = AttackPhase::GroundFollowUp;
            body.velocity = Vec2::ZERO;
        }
        return false;
    }

    if !body.on_ground {
        apply_gravity(&mut body.velocity, config.gravity, config.max_fall_speed, ctx.delta);
    }

    let controllable = step.alive && !combat.hit && !combat.is_attacking();
    if controllable {
        let axis = step.input.axis();
        match Facing::from_sign(axis) {
            Some(facing) => {
                body.velocity.x = axis * config.speed;
                body.facing = facing;
            }
            None => body.velocity.x = move_toward(body.velocity.x, 0.0, config.speed),
        }

        if step.input.jump_pressed {
            try_jump(config, body, jumps);
        }
    } else {
        body.velocity.x = 0.0;
    }

    if slide(body, ctx.backend, ctx.delta) {
        jumps.jumps_used = 0;
    }

    let wants_attack = step.input.attack_pressed && controllable && step.can_animate;
    if !wants_attack || !combat.can_attack() {
        return false;
    }

    let phase = if body.on_ground {
        AttackPhase::Ground
    } else {
        AttackPhase::AirStall {
            remaining: config.air_attack.stall_time,
        }
    };
    combat.start_attack(phase, config.attack.cooldown);
    body.velocity.x = 0.0;
    true
}

/// System: player controller
pub fn player_controller(
    delta: Res<TickDelta>,
    movement: Res<MovementService>,
    mut players: Query<
        (
            Entity,
            &PlayerConfig,
            &ActionInput,
            &Health,
            Has<SpriteAnimator>,
            &mut CharacterBody,
            &mut CombatState,
            &mut PlayerState,
        ),
        With<Player>,
    >,
    mut attacks: EventWriter<AttackQuery>,
) {
    let ctx = TickContext {
        delta: delta.0,
        backend: movement.0.as_ref(),
    };

    for (entity, config, input, health, can_animate, mut body, mut combat, mut jumps) in players.iter_mut() {
        // Без спрайта "hit" никогда не доиграет
        if combat.hit && !can_animate {
            combat.hit = false;
        }

        let step = PlayerStep {
            input: *input,
            alive: health.is_alive(),
            can_animate,
        };

        if advance_player(config, step, &mut body, &mut combat, &mut jumps, ctx) {
            logger::log(&format!("Player {:?} attack {:?} facing {:?}", entity, combat.phase, body.facing));
            attacks.write(AttackQuery::new(entity, &body, &config.attack));
        }
    }
}
