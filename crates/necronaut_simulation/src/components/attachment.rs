//! Attachment: связь персонажа с оружием-визуалом

use bevy::prelude::*;

/// Персонаж держит weapon relay entity
///
/// Деспавнится вместе с владельцем.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Equipped {
    pub weapon: Entity,
}
