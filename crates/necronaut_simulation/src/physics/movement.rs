//! Movement/collision collaborator и кинематические helpers
//!
//! Архитектура:
//! - Контроллеры сами интегрируют velocity (gravity, input, jump)
//! - Разрешение коллизий делегируется `MovementBackend` (move_and_slide)
//! - Headless реализация: `FlatFloor` (пол на floor_y + опциональные стены)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::components::CharacterBody;

/// Результат move_and_slide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MoveResult {
    pub position: Vec2,
    pub velocity: Vec2,
    pub on_ground: bool,
}

/// Movement/collision service
///
/// Принимает желаемую velocity тела, возвращает скорректированные
/// position/velocity и флаг grounded.
pub trait MovementBackend: Send + Sync + 'static {
    fn move_and_slide(&self, body: &CharacterBody, delta: f32) -> MoveResult;
}

/// Resource с активным movement backend
#[derive(Resource)]
pub struct MovementService(pub Box<dyn MovementBackend>);

impl MovementService {
    pub fn new(backend: impl MovementBackend) -> Self {
        Self(Box::new(backend))
    }
}

/// Горизонтальные стены уровня
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelBounds {
    pub min_x: f32,
    pub max_x: f32,
}

/// Плоский пол на `floor_y` (+y вниз), опционально стены по x
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatFloor {
    pub floor_y: f32,
    pub bounds: Option<LevelBounds>,
}

impl FlatFloor {
    pub fn new(floor_y: f32) -> Self {
        Self { floor_y, bounds: None }
    }
}

impl MovementBackend for FlatFloor {
    fn move_and_slide(&self, body: &CharacterBody, delta: f32) -> MoveResult {
        let mut position = body.position + body.velocity * delta;
        let mut velocity = body.velocity;

        // Пол держит только падающее/стоящее тело, прыжок вверх проходит
        let feet = position.y + body.half_extents.y;
        let on_ground = velocity.y >= 0.0 && feet >= self.floor_y;
        if on_ground {
            position.y = self.floor_y - body.half_extents.y;
            velocity.y = 0.0;
        }

        if let Some(bounds) = self.bounds {
            let min_x = bounds.min_x + body.half_extents.x;
            let max_x = bounds.max_x - body.half_extents.x;
            if position.x < min_x {
                position.x = min_x;
                velocity.x = velocity.x.max(0.0);
            } else if position.x > max_x {
                position.x = max_x;
                velocity.x = velocity.x.min(0.0);
            }
        }

        MoveResult {
            position,
            velocity,
            on_ground,
        }
    }
}

/// Двигает `from` к `to` не больше чем на `max_delta`
pub fn move_toward(from: f32, to: f32, max_delta: f32) -> f32 {
    if (to - from).abs() <= max_delta {
        to
    } else {
        from + (to - from).signum() * max_delta
    }
}

/// Гравитация: vy += gravity·Δt, не быстрее max_fall_speed
///
/// Вызывается только для тел в воздухе.
pub fn apply_gravity(velocity: &mut Vec2, gravity: f32, max_fall_speed: f32, delta: f32) {
    velocity.y = (velocity.y + gravity * delta).min(max_fall_speed.max(velocity.y));
}

/// move_and_slide через backend и запись результата в тело.
///
/// Возвращает true на тике приземления (on_ground false → true).
pub fn slide(body: &mut CharacterBody, backend: &dyn MovementBackend, delta: f32) -> bool {
    let was_on_ground = body.on_ground;
    let result = backend.move_and_slide(body, delta);
    body.position = result.position;
    body.velocity = result.velocity;
    body.on_ground = result.on_ground;
    !was_on_ground && result.on_ground
}
