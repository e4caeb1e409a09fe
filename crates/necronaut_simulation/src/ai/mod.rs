//! Enemy AI
//!
//! Goblin scout: патруль ↔ преследование по дистанции до цели,
//! атака вплотную. Цель передаётся при spawn.

pub mod goblin;

// Re-export основных типов
pub use goblin::{advance_goblin, goblin_controller, spawn_goblin, GoblinStep};
