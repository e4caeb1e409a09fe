//! Physics collaborators
//!
//! Симуляция не владеет физикой: коллизии и spatial queries
//! живут за узкими интерфейсами, headless реализации рядом.

pub mod movement;
pub mod query;

// Re-export основных типов
pub use movement::{
    apply_gravity, move_toward, slide, FlatFloor, LevelBounds, MoveResult, MovementBackend,
    MovementService,
};
pub use query::{intersect_region, Aabb, QueryRegion};
