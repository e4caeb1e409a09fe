//! Actor компоненты: тело, направление взгляда, здоровье
//!
//! Система координат как в движке: +x вправо, +y ВНИЗ.
//! Прыжок = отрицательная vy, гравитация положительная.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::physics::Aabb;

/// Направление взгляда (и атаки) персонажа
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// ±1
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }

    /// Направление из знака оси; 0 не задаёт направления
    pub fn from_sign(value: f32) -> Option<Self> {
        if value > 0.0 {
            Some(Facing::Right)
        } else if value < 0.0 {
            Some(Facing::Left)
        } else {
            None
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Facing::Left => Facing::Right,
            Facing::Right => Facing::Left,
        }
    }
}

/// Кинематическое тело персонажа (аналог CharacterBody2D)
///
/// `on_ground` пишет только movement backend (через `physics::slide`).
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct CharacterBody {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Половина размеров collision box
    pub half_extents: Vec2,
    pub facing: Facing,
    pub on_ground: bool,
}

impl CharacterBody {
    pub fn new(position: Vec2, half_extents: Vec2, facing: Facing) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            half_extents,
            facing,
            on_ground: false,
        }
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::new(self.position, self.half_extents)
    }

    /// Y нижней грани (ноги)
    pub fn feet_y(&self) -> f32 {
        self.position.y + self.half_extents.y
    }
}

/// Здоровье актора
///
/// Инвариант: 0 ≤ current ≤ max, current только убывает.
/// `current == 0` ⇔ мёртв (необратимо, лечения нет).
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Health {
    pub current: u32,
    pub max: u32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Health {
    pub fn new(max: u32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0
    }

    pub fn is_dead(&self) -> bool {
        !self.is_alive()
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }
}

/// Capability: entity принимает DamageEvent
///
/// Тела без этого маркера (ящики, стены) hit-query пропускает.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Damageable;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage() {
        let mut health = Health::new(100);
        assert_eq!(health.current, 100);

        health.take_damage(30);
        assert_eq!(health.current, 70);
        assert!(health.is_alive());

        health.take_damage(100); // Saturating sub
        assert_eq!(health.current, 0);
        assert!(health.is_dead());
    }

    #[test]
    fn test_facing_from_sign() {
        assert_eq!(Facing::from_sign(0.3), Some(Facing::Right));
        assert_eq!(Facing::from_sign(-1.0), Some(Facing::Left));
        assert_eq!(Facing::from_sign(0.0), None);
        assert_eq!(Facing::Left.flipped(), Facing::Right);
        assert_eq!(Facing::Left.sign(), -1.0);
    }

    #[test]
    fn test_body_feet() {
        let body = CharacterBody::new(Vec2::new(0.0, 100.0), Vec2::new(10.0, 20.0), Facing::Right);
        assert_eq!(body.feet_y(), 120.0);
        assert!(!body.on_ground);
    }
}
