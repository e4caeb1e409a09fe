//! Integration тесты: полный тик через Simulation
//!
//! Проверяем сценарии боя целиком: controllers → hit-query → урон →
//! анимации → AnimationFinished на следующем тике → despawn.

use bevy::prelude::*;
use necronaut_simulation::{
    ActionInput, AnimationClip, AttackPhase, CharacterBody, CombatState, Damageable, Equipped, Facing,
    Health, SimulationConfig, Simulation, SpriteAnimator,
};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const DT: f32 = 1.0 / 60.0;

fn face(sim: &mut Simulation, entity: Entity, facing: Facing) {
    if let Some(mut body) = sim.world_mut().get_mut::<CharacterBody>(entity) {
        body.facing = facing;
    }
}

fn body(sim: &Simulation, entity: Entity) -> CharacterBody {
    *sim.world().get::<CharacterBody>(entity).expect("entity has CharacterBody")
}

/// Неподвижная мишень с damage capability
fn spawn_dummy(sim: &mut Simulation, position: Vec2, health: u32) -> Entity {
    sim.world_mut()
        .spawn((
            CharacterBody::new(position, Vec2::new(12.0, 16.0), Facing::Left),
            Health::new(health),
            CombatState::default(),
            Damageable,
        ))
        .id()
}

#[test]
fn test_grounded_attack_hits_near_target_only() {
    // Пол на y=24: центр игрока ровно в (0, 0)
    let config = SimulationConfig {
        floor_y: 24.0,
        ..Default::default()
    };
    let mut sim = Simulation::new(config);
    let player = sim.spawn_player(Vec2::ZERO);
    face(&mut sim, player, Facing::Right);

    let near = spawn_dummy(&mut sim, Vec2::new(40.0, 0.0), 100);
    let far = spawn_dummy(&mut sim, Vec2::new(200.0, 0.0), 100);

    let effects = sim.tick(DT, &[(player, ActionInput::attack())]);

    assert_eq!(effects.attacks.len(), 1, "exactly one query per trigger");
    assert_eq!(effects.attacks[0].attacker, player);
    assert_eq!(effects.attacks[0].center, Vec2::new(50.0, 0.0));
    assert_eq!(effects.attacks[0].targets_hit, 1);

    assert_eq!(effects.damage.len(), 1);
    assert_eq!(effects.damage[0].target, near);
    assert_eq!(effects.damage[0].damage, 50);

    assert_eq!(sim.world().get::<Health>(near).map(|h| h.current), Some(50));
    assert_eq!(sim.world().get::<Health>(far).map(|h| h.current), Some(100));
    assert_eq!(sim.world().get::<Health>(player).map(|h| h.current), Some(200));
}

#[test]
fn test_bodies_without_capability_are_skipped() {
    let mut sim = Simulation::new(SimulationConfig::default());
    let player = sim.spawn_player(Vec2::new(0.0, -24.0));
    face(&mut sim, player, Facing::Right);

    // Ящик: тело и здоровье есть, Damageable нет
    let crate_body = sim
        .world_mut()
        .spawn((
            CharacterBody::new(Vec2::new(30.0, -16.0), Vec2::new(12.0, 16.0), Facing::Left),
            Health::new(100),
            CombatState::default(),
        ))
        .id();

    let effects = sim.tick(DT, &[(player, ActionInput::attack())]);

    assert_eq!(effects.attacks.len(), 1);
    assert!(effects.damage.is_empty());
    assert_eq!(sim.world().get::<Health>(crate_body).map(|h| h.current), Some(100));
}

#[test]
fn test_lethal_damage_plays_death_then_despawns() {
    let mut config = SimulationConfig::default();
    config.goblin.attack.damage = 250;

    let mut sim = Simulation::new(config);
    let player = sim.spawn_player(Vec2::new(0.0, -24.0));
    let weapon = sim
        .world()
        .get::<Equipped>(player)
        .map(|equipped| equipped.weapon)
        .expect("player spawned with weapon relay");
    let goblin = sim.spawn_goblin(Vec2::new(40.0, -16.0), Some(player));

    let effects = sim.tick(DT, &[]);

    assert_eq!(effects.deaths.len(), 1);
    assert_eq!(effects.deaths[0].entity, player);
    assert_eq!(effects.deaths[0].killer, Some(goblin));
    assert!(effects.damage.iter().any(|hit| hit.target == player && hit.target_died));
    assert!(effects
        .clips
        .iter()
        .any(|clip| clip.entity == player && clip.clip == AnimationClip::Death));

    let health = sim.world().get::<Health>(player).copied().expect("player alive until clip ends");
    assert_eq!(health.current, 0);
    assert!(health.is_dead());

    // Death clip доигрывает, despawn на следующем тике после конца клипа
    let mut despawned_at = None;
    for tick in 0..120 {
        let effects = sim.tick(DT, &[(player, ActionInput::right())]);

        // Мёртвая цель = цели нет: гоблин больше не атакует
        assert!(effects.attacks.iter().all(|attack| attack.attacker != goblin));

        if effects.despawned.contains(&player) {
            despawned_at = Some(tick);
            break;
        }

        let health = sim.world().get::<Health>(player).map(|h| h.current);
        assert_eq!(health, Some(0), "death is irreversible");
        let clip = sim.world().get::<SpriteAnimator>(player).and_then(|animator| animator.clip());
        assert_eq!(clip, Some(AnimationClip::Death));
    }

    assert!(despawned_at.is_some(), "player never despawned");
    assert!(sim.world().get_entity(player).is_err());
    assert!(sim.world().get_entity(weapon).is_err(), "weapon relay despawned with owner");

    // Цель пропала: гоблин просто патрулирует
    for _ in 0..120 {
        let effects = sim.tick(DT, &[]);
        assert!(effects.attacks.is_empty());
    }
    assert!(sim.world().get_entity(goblin).is_ok());
}

#[test]
fn test_attack_blocks_movement_until_clip_finishes() {
    let mut sim = Simulation::new(SimulationConfig::default());
    let player = sim.spawn_player(Vec2::new(0.0, -24.0));

    // Приземлились
    sim.tick(DT, &[]);
    let effects = sim.tick(DT, &[(player, ActionInput::attack())]);
    assert_eq!(effects.attacks.len(), 1);

    let mut released_after = None;
    for tick in 0..60 {
        let input = ActionInput {
            move_right: 1.0,
            jump_pressed: true,
            ..Default::default()
        };
        let effects = sim.tick(DT, &[(player, input)]);
        let combat = *sim.world().get::<CombatState>(player).expect("player combat");
        let current = body(&sim, player);

        if combat.is_attacking() {
            assert_eq!(current.velocity.x, 0.0);
            assert!(current.on_ground, "jump ignored while attacking");
            assert!(effects.attacks.is_empty());
        } else {
            released_after = Some(tick);
            assert_eq!(current.velocity.x, 300.0);
            break;
        }
    }

    // "attack" 0.6s на скорости 2.0 ≈ 18 тиков
    let released_after = released_after.expect("attack never finished");
    assert!((15..=22).contains(&released_after), "released after {}", released_after);
}

#[test]
fn test_gravity_monotonic_under_random_delta() {
    let mut rng = ChaCha8Rng::seed_from_u64(99);
    let config = SimulationConfig::default();
    let mut sim = Simulation::new(config);
    let player = sim.spawn_player(Vec2::new(0.0, -1_000_000.0));

    let gravity = config.player.gravity;
    let cap = config.player.max_fall_speed;
    let mut previous = body(&sim, player).velocity.y;

    for _ in 0..400 {
        let dt: f32 = rng.gen_range(0.0..0.05);
        sim.tick(dt, &[]);

        let vy = body(&sim, player).velocity.y;
        assert!(vy >= previous, "vy decreased: {} -> {}", previous, vy);
        assert!(vy <= cap);

        let expected = (previous + gravity * dt).min(cap);
        assert!((vy - expected).abs() < 1e-3, "expected {}, got {}", expected, vy);
        previous = vy;
    }
}

#[test]
fn test_goblin_switches_from_patrol_to_pursuit() {
    let mut sim = Simulation::new(SimulationConfig::default());
    let player = sim.spawn_player(Vec2::new(-300.0, -24.0));
    let goblin = sim.spawn_goblin(Vec2::new(0.0, -16.0), Some(player));

    sim.tick(DT, &[]);
    let patrol = body(&sim, goblin);
    assert_eq!(patrol.facing, Facing::Right);
    assert_eq!(patrol.velocity.x, 50.0);

    // Цель заходит в радиус 250
    let x = patrol.position.x - 200.0;
    if let Some(mut player_body) = sim.world_mut().get_mut::<CharacterBody>(player) {
        player_body.position.x = x;
    }

    sim.tick(DT, &[]);
    let pursuit = body(&sim, goblin);
    assert_eq!(pursuit.facing, Facing::Left);
    assert!(pursuit.velocity.x < -99.0);

    // Гоблин смотрит вправо нативно: влево = flip
    let flip = sim.world().get::<SpriteAnimator>(goblin).map(|animator| animator.flip_h());
    assert_eq!(flip, Some(true));
}

#[test]
fn test_goblin_hit_stun_recovers() {
    let mut sim = Simulation::new(SimulationConfig::default());
    let player = sim.spawn_player(Vec2::new(0.0, -24.0));
    face(&mut sim, player, Facing::Right);
    let goblin = sim.spawn_goblin(Vec2::new(80.0, -16.0), Some(player));

    let effects = sim.tick(DT, &[(player, ActionInput::attack())]);
    assert!(effects.damage.iter().any(|hit| hit.target == goblin && !hit.target_died));
    assert!(effects
        .clips
        .iter()
        .any(|clip| clip.entity == goblin && clip.clip == AnimationClip::Hit));

    let combat = *sim.world().get::<CombatState>(goblin).expect("goblin combat");
    assert!(combat.hit);
    assert_eq!(combat.phase, AttackPhase::Ready);
    assert_eq!(sim.world().get::<Health>(goblin).map(|h| h.current), Some(50));

    // Пока оглушён, тик гоблина пропускается
    let stunned_at = body(&sim, goblin).position;
    let mut recovered = false;
    for _ in 0..60 {
        sim.tick(DT, &[]);
        let combat = *sim.world().get::<CombatState>(goblin).expect("goblin combat");
        if !combat.hit {
            recovered = true;
            break;
        }
        assert_eq!(body(&sim, goblin).position, stunned_at);
    }
    assert!(recovered, "goblin stuck in hit stun");
}

#[test]
fn test_weapon_relay_mirrors_owner_clips() {
    let mut sim = Simulation::new(SimulationConfig::default());
    let player = sim.spawn_player(Vec2::new(0.0, -24.0));
    let weapon = sim
        .world()
        .get::<Equipped>(player)
        .map(|equipped| equipped.weapon)
        .expect("weapon relay");

    sim.tick(DT, &[]);
    let idle = sim.world().get::<SpriteAnimator>(weapon).cloned().expect("weapon animator");
    assert_eq!(idle.clip(), Some(AnimationClip::Idle));
    assert_eq!(idle.speed_scale(), 1.5);

    sim.tick(DT, &[(player, ActionInput::right())]);
    let run = sim.world().get::<SpriteAnimator>(weapon).cloned().expect("weapon animator");
    assert_eq!(run.clip(), Some(AnimationClip::Run));
    // Игрок нативно смотрит влево: вправо = flip, оружие повторяет
    assert!(run.flip_h());

    sim.tick(DT, &[(player, ActionInput::attack())]);
    let attack = sim.world().get::<SpriteAnimator>(weapon).cloned().expect("weapon animator");
    assert_eq!(attack.clip(), Some(AnimationClip::Attack));
    assert_eq!(attack.speed_scale(), 2.0);
}

#[test]
fn test_player_without_animator_never_attacks() {
    let mut sim = Simulation::new(SimulationConfig::default());
    let player = sim.spawn_player(Vec2::new(0.0, -24.0));
    sim.world_mut().entity_mut(player).remove::<SpriteAnimator>();
    let dummy = spawn_dummy(&mut sim, Vec2::new(-30.0, -16.0), 100);

    for _ in 0..30 {
        let effects = sim.tick(DT, &[(player, ActionInput::attack())]);
        assert!(effects.attacks.is_empty());
    }
    assert_eq!(sim.world().get::<Health>(dummy).map(|h| h.current), Some(100));
}

#[test]
fn test_killed_without_animator_despawns_immediately() {
    let mut config = SimulationConfig::default();
    config.goblin.attack.damage = 250;

    let mut sim = Simulation::new(config);
    let player = sim.spawn_player(Vec2::new(0.0, -24.0));
    let weapon = sim
        .world()
        .get::<Equipped>(player)
        .map(|equipped| equipped.weapon)
        .expect("player spawned with weapon relay");
    sim.world_mut().entity_mut(player).remove::<SpriteAnimator>();
    let goblin = sim.spawn_goblin(Vec2::new(40.0, -16.0), Some(player));

    // "death" некому доиграть: despawn в том же тике
    let effects = sim.tick(DT, &[]);
    assert_eq!(effects.deaths.len(), 1);
    assert_eq!(effects.deaths[0].entity, player);
    assert_eq!(effects.despawned, vec![player]);
    assert!(sim.world().get_entity(player).is_err());
    assert!(sim.world().get_entity(weapon).is_err(), "weapon relay despawned with owner");

    for _ in 0..60 {
        let effects = sim.tick(DT, &[]);
        assert!(effects.attacks.is_empty());
        assert!(effects.despawned.is_empty());
    }
    assert!(sim.world().get_entity(goblin).is_ok());
}

fn animator(sim: &Simulation, entity: Entity) -> SpriteAnimator {
    sim.world()
        .get::<SpriteAnimator>(entity)
        .cloned()
        .expect("entity has SpriteAnimator")
}

#[test]
fn test_air_attack_dives_then_follows_up_on_ground() {
    let mut sim = Simulation::new(SimulationConfig::default());
    let player = sim.spawn_player(Vec2::new(0.0, -24.0));
    let weapon = sim
        .world()
        .get::<Equipped>(player)
        .map(|equipped| equipped.weapon)
        .expect("weapon relay");

    sim.tick(DT, &[]);
    sim.tick(DT, &[(player, ActionInput::jump())]);
    assert!(!body(&sim, player).on_ground);

    let effects = sim.tick(DT, &[(player, ActionInput::attack())]);
    assert_eq!(effects.attacks.len(), 1);
    let combat = *sim.world().get::<CombatState>(player).expect("player combat");
    assert!(matches!(combat.phase, AttackPhase::AirStall { .. }));

    let falling = animator(&sim, weapon);
    assert_eq!(falling.clip(), Some(AnimationClip::FallingAttack));
    assert_eq!(falling.speed_scale(), 2.0);

    // Ввод держим всё время: пока идёт атака, он игнорируется
    let mut phases: Vec<&str> = Vec::new();
    let mut released = false;
    for _ in 0..120 {
        sim.tick(DT, &[(player, ActionInput::right())]);
        let combat = *sim.world().get::<CombatState>(player).expect("player combat");
        let current = body(&sim, player);
        let weapon_animator = animator(&sim, weapon);

        let phase = match combat.phase {
            AttackPhase::AirStall { .. } | AttackPhase::AirDive => {
                assert!(!current.on_ground);
                assert_eq!(current.velocity.x, 0.0);
                assert_eq!(weapon_animator.clip(), Some(AnimationClip::FallingAttack));
                if combat.phase == AttackPhase::AirDive {
                    assert_eq!(current.velocity.y, 2000.0);
                    "dive"
                } else {
                    "stall"
                }
            }
            AttackPhase::GroundFollowUp => {
                assert!(current.on_ground);
                assert_eq!(current.velocity, Vec2::ZERO);
                assert_eq!(animator(&sim, player).clip(), Some(AnimationClip::GroundAttack));
                assert_eq!(weapon_animator.clip(), Some(AnimationClip::GroundAttack));
                assert_eq!(weapon_animator.speed_scale(), 2.0);
                "follow-up"
            }
            AttackPhase::Ready => {
                // "ground attack" доиграл на прошлом тике: управление вернулось
                assert_eq!(current.velocity.x, 300.0);
                assert_eq!(animator(&sim, player).clip(), Some(AnimationClip::Run));
                // run сохраняет speed scale оружия: он уже сброшен на default
                assert_eq!(weapon_animator.clip(), Some(AnimationClip::Run));
                assert_eq!(weapon_animator.speed_scale(), 1.5);
                released = true;
                break;
            }
            AttackPhase::Ground => panic!("air attack turned into a ground attack"),
        };

        if phases.last() != Some(&phase) {
            phases.push(phase);
        }
    }

    assert!(released, "air attack never released control");
    assert_eq!(phases, vec!["stall", "dive", "follow-up"]);
}
