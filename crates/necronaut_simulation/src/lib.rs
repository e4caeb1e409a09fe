//! Necronaut Simulation Core
//!
//! Headless симуляция персонажей 2D side-view экшена на Bevy ECS 0.16:
//! - Player: движение, двойной прыжок, наземная и воздушная атака
//! - GoblinScout: патруль, преследование, атака вплотную
//! - Weapon relay: визуал оружия повторяет play-calls владельца
//!
//! Движок (сцена, ассеты, физика, ввод) остаётся снаружи:
//! коллизии за `MovementBackend`, ввод через `ActionInput`,
//! тик гоняет хост через `Simulation::tick` / `step`.

// Публичные модули
pub mod ai;
pub mod animation;
pub mod combat;
pub mod components;
pub mod config;
pub mod input;
pub mod logger;
pub mod physics;
pub mod player;
pub mod simulation;

// Re-export базовых типов для удобства
pub use animation::{AnimationClip, AnimationProfile, ClipLibrary, SpriteAnimator, WeaponProfile, WeaponRelay};
pub use combat::{AttackProfile, AttackQuery, AttackShape, AttackStarted, DamageDealt, DamageEvent, EntityDied};
pub use components::*;
pub use config::{ConfigError, GoblinConfig, PlayerConfig, SimulationConfig};
pub use input::{ActionInput, RandomPilot};
pub use logger::{init_logger, set_log_level, LogLevel};
pub use physics::{FlatFloor, LevelBounds, MoveResult, MovementBackend, MovementService};
pub use simulation::{step, Simulation, SimulationPlugin, SimulationTick, TickDelta, TickEffects};
