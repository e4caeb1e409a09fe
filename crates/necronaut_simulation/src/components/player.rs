//! Player компоненты: маркер и состояние прыжков

use bevy::prelude::*;

/// Маркер: entity управляется вводом игрока (ActionInput)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Состояние прыжков игрока
///
/// Инвариант: `jumps_used <= PlayerConfig::max_jumps` между приземлениями.
/// Сбрасывается в 0 только на тике приземления (on_ground false → true).
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerState {
    pub jumps_used: u32,
}
