//! ECS компоненты персонажей
//!
//! Организация по доменам:
//! - actor: тело, направление, здоровье, damage capability
//! - combat: фазы атаки, hit-stun, cooldown
//! - player: маркер игрока, счётчик прыжков
//! - ai: goblin scout (цель, патруль)
//! - attachment: связь с weapon relay

pub mod actor;
pub mod ai;
pub mod attachment;
pub mod combat;
pub mod player;

// Re-exports для удобного импорта
pub use actor::*;
pub use ai::*;
pub use attachment::*;
pub use combat::*;
pub use player::*;
