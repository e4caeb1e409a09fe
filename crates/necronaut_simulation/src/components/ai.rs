//! AI компоненты: goblin scout (патруль / преследование)

use bevy::prelude::*;

use super::actor::Facing;

/// Маркер: entity управляется goblin AI
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct GoblinScout;

/// Состояние goblin AI
///
/// `target` передаётся при spawn (dependency injection вместо поиска по сцене).
/// Нет цели → только патруль, атак нет.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct GoblinState {
    pub target: Option<Entity>,
    /// Направление патруля (меняется каждые patrol_interval секунд)
    pub patrol_direction: Facing,
    pub patrol_timer: f32,
    /// Цель вплотную или выше: держим "idle" (без дрожания анимации)
    pub proximity_idle: bool,
}

impl GoblinState {
    pub fn new(target: Option<Entity>) -> Self {
        Self {
            target,
            patrol_direction: Facing::Right,
            patrol_timer: 0.0,
            proximity_idle: false,
        }
    }
}
