//! Damage: доставка DamageEvent в Health/CombatState цели
//!
//! Урон безусловный: цель в середине своей атаки всё равно получает урон
//! (атака прерывается). Только мёртвые игнорируют урон.

use bevy::prelude::*;

use crate::components::{CombatState, Health};

/// Урон от атакующего конкретной цели
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageEvent {
    pub source: Entity,
    pub target: Entity,
    pub amount: u32,
}

/// Результат доставки урона
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Цель уже мертва
    Ignored,
    Wounded { remaining: u32 },
    Killed,
}

/// Effect: урон нанесён
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageDealt {
    pub attacker: Entity,
    pub target: Entity,
    pub damage: u32,
    pub target_died: bool,
}

/// Effect: entity умер (health <= 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityDied {
    pub entity: Entity,
    pub killer: Option<Entity>,
}

/// Применить урон к цели
///
/// - health убывает (saturating), при 0 → смерть, необратимо
/// - выжил → hit-stun ("hit"), текущая атака прерывается
pub fn apply_damage(health: &mut Health, combat: &mut CombatState, event: &DamageEvent) -> DamageOutcome {
    if health.is_dead() {
        return DamageOutcome::Ignored;
    }

    health.take_damage(event.amount);
    let survived = health.is_alive();
    combat.interrupt(survived);

    if survived {
        DamageOutcome::Wounded {
            remaining: health.current,
        }
    } else {
        DamageOutcome::Killed
    }
}
