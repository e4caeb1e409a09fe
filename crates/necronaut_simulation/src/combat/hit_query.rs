//! Hit-query resolver
//!
//! Архитектура:
//! - Контроллер на триггере атаки пишет ОДИН `AttackQuery` (не каждый тик)
//! - Resolver строит регион (box или ray) перед атакующим
//! - Кандидаты: пропускаем самого атакующего и тела без `Damageable`
//! - Каждой оставшейся цели доставляется DamageEvent в том же тике
//! - Убитый без animation surface despawn'ится сразу ("death" некому доиграть)

use bevy::prelude::*;

use super::attacker::{AttackProfile, AttackShape};
use super::damage::{apply_damage, DamageDealt, DamageEvent, DamageOutcome, EntityDied};
use crate::animation::SpriteAnimator;
use crate::components::{CharacterBody, CombatState, Damageable, Equipped, Facing, Health};
use crate::logger;
use crate::physics::{intersect_region, Aabb, QueryRegion};
use crate::simulation::TickEffects;

/// Форма региона запроса
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryShape {
    Box { half_extents: Vec2 },
    Ray,
}

/// Запрос атаки: эфемерный, создаётся на каждый триггер
///
/// `attacker` передаётся явно, self-exclusion не зависит от сцены.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct AttackQuery {
    pub attacker: Entity,
    pub origin: Vec2,
    pub facing: Facing,
    pub reach: f32,
    pub shape: QueryShape,
    pub damage: u32,
}

impl AttackQuery {
    pub fn new(attacker: Entity, body: &CharacterBody, profile: &AttackProfile) -> Self {
        let shape = match profile.shape {
            AttackShape::Sweep { thickness } => QueryShape::Box {
                half_extents: Vec2::new(profile.reach / 2.0, thickness / 2.0),
            },
            AttackShape::Body => QueryShape::Box {
                half_extents: body.half_extents,
            },
            AttackShape::Ray => QueryShape::Ray,
        };

        Self {
            attacker,
            origin: body.position,
            facing: body.facing,
            reach: profile.reach,
            shape,
            damage: profile.damage,
        }
    }

    /// origin + facing · reach/2
    pub fn center(&self) -> Vec2 {
        self.origin + Vec2::new(self.facing.sign() * self.reach / 2.0, 0.0)
    }

    pub fn region(&self) -> QueryRegion {
        match self.shape {
            QueryShape::Box { half_extents } => QueryRegion::Box(Aabb::new(self.center(), half_extents)),
            QueryShape::Ray => QueryRegion::Ray {
                from: self.origin,
                to: self.origin + Vec2::new(self.facing.sign() * self.reach, 0.0),
            },
        }
    }
}

/// Тело-кандидат для spatial query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitCandidate {
    pub entity: Entity,
    pub bounds: Aabb,
    /// Есть ли damage-receiving capability
    pub damageable: bool,
}

/// Effect: атака сработала (один запрос)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackStarted {
    pub attacker: Entity,
    pub center: Vec2,
    pub targets_hit: usize,
}

/// Один spatial query → DamageEvent каждой подходящей цели
pub fn resolve_hits(query: &AttackQuery, candidates: &[HitCandidate]) -> Vec<DamageEvent> {
    let overlapping = intersect_region(
        &query.region(),
        candidates.iter().map(|candidate| (candidate.entity, candidate.bounds)),
    );

    overlapping
        .into_iter()
        // Не бьём самого себя
        .filter(|entity| *entity != query.attacker)
        .filter_map(|entity| candidates.iter().find(|candidate| candidate.entity == entity))
        .filter(|candidate| candidate.damageable)
        .map(|candidate| DamageEvent {
            source: query.attacker,
            target: candidate.entity,
            amount: query.damage,
        })
        .collect()
}

/// Система: выполнить все AttackQuery этого тика и доставить урон
pub fn resolve_hit_queries(
    mut commands: Commands,
    mut queries: EventReader<AttackQuery>,
    mut bodies: Query<(
        Entity,
        &CharacterBody,
        Has<Damageable>,
        Option<&mut Health>,
        Option<&mut CombatState>,
    )>,
    surfaces: Query<(Has<SpriteAnimator>, Option<&Equipped>)>,
    mut effects: ResMut<TickEffects>,
) {
    for query in queries.read() {
        let candidates: Vec<HitCandidate> = bodies
            .iter()
            .map(|(entity, body, damageable, _, _)| HitCandidate {
                entity,
                bounds: body.bounds(),
                damageable,
            })
            .collect();

        let hits = resolve_hits(query, &candidates);
        effects.attacks.push(AttackStarted {
            attacker: query.attacker,
            center: query.center(),
            targets_hit: hits.len(),
        });

        for event in hits {
            let Ok((_, _, _, Some(mut health), Some(mut combat))) = bodies.get_mut(event.target) else {
                logger::log_warning(&format!(
                    "Hit target {:?} is damageable but has no Health/CombatState",
                    event.target
                ));
                continue;
            };

            let outcome = apply_damage(&mut health, &mut combat, &event);
            if outcome == DamageOutcome::Ignored {
                continue;
            }

            let target_died = outcome == DamageOutcome::Killed;
            effects.damage.push(DamageDealt {
                attacker: event.source,
                target: event.target,
                damage: event.amount,
                target_died,
            });

            if target_died {
                effects.deaths.push(EntityDied {
                    entity: event.target,
                    killer: Some(event.source),
                });
                logger::log_info(&format!("Entity {:?} killed by {:?}", event.target, event.source));

                if let Ok((false, equipped)) = surfaces.get(event.target) {
                    despawn_without_death_clip(&mut commands, event.target, equipped, &mut effects);
                }
            }
        }
    }
}

/// Despawn убитого вместе с оружием, минуя "death"
fn despawn_without_death_clip(
    commands: &mut Commands,
    entity: Entity,
    equipped: Option<&Equipped>,
    effects: &mut TickEffects,
) {
    if let Some(equipped) = equipped {
        if let Ok(mut weapon_commands) = commands.get_entity(equipped.weapon) {
            weapon_commands.despawn();
        }
    }
    if let Ok(mut entity_commands) = commands.get_entity(entity) {
        entity_commands.despawn();
        effects.despawned.push(entity);
        logger::log_info(&format!("Entity {:?} despawned: no animation surface", entity));
    }
}
