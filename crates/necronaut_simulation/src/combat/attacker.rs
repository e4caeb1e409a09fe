//! Attacker: параметры атаки персонажа и cooldown таймеры

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::CombatState;
use crate::simulation::TickDelta;

/// Форма hit-query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttackShape {
    /// Box reach × thickness перед атакующим
    Sweep { thickness: f32 },
    /// Собственный collision box атакующего, сдвинутый вперёд
    Body,
    /// Луч от атакующего длиной reach
    Ray,
}

/// Параметры атаки (damage фиксированный, без модификаторов)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackProfile {
    /// Дальность удара; центр региона = origin + facing · reach/2
    pub reach: f32,
    pub damage: u32,
    /// Cooldown после каждой атаки (секунды)
    pub cooldown: f32,
    pub shape: AttackShape,
}

impl Default for AttackProfile {
    fn default() -> Self {
        Self {
            reach: 50.0,
            damage: 50,
            cooldown: 1.0,
            shape: AttackShape::Body,
        }
    }
}

/// System: обновление attack cooldown таймеров
///
/// Идёт для всех, включая мёртвых и атакующих (их контроллер пропускает тик).
pub fn tick_attack_cooldowns(delta: Res<TickDelta>, mut query: Query<&mut CombatState>) {
    for mut combat in query.iter_mut() {
        combat.tick_cooldown(delta.0);
    }
}
