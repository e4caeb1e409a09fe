//! Конфигурация симуляции (JSON через serde)
//!
//! Все структуры `#[serde(default)]`: файл может задавать только то,
//! что отличается от дефолтов.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::{AnimationClip, AnimationProfile, ClipLibrary, WeaponProfile};
use crate::combat::{AttackProfile, AttackShape};
use crate::components::Facing;
use crate::physics::LevelBounds;

/// Потолок для max_jumps (защита от опечаток в конфиге)
pub const MAX_JUMPS_LIMIT: u32 = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

/// Воздушная атака игрока: зависание → пике
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirAttackConfig {
    pub stall_time: f32,
    /// Насколько быстро гасится velocity во время зависания
    pub deceleration: f32,
    pub dive_speed: f32,
}

impl Default for AirAttackConfig {
    fn default() -> Self {
        Self {
            stall_time: 0.2,
            deceleration: 2000.0,
            dive_speed: 2000.0,
        }
    }
}

/// Параметры игрока (вешается на entity при spawn)
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub speed: f32,
    /// Отрицательная: +y вниз
    pub jump_velocity: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    pub max_jumps: u32,
    pub double_jump_multiplier: f32,
    pub health: u32,
    pub half_width: f32,
    pub half_height: f32,
    pub attack: AttackProfile,
    pub air_attack: AirAttackConfig,
    pub animation: AnimationProfile,
    /// None = игрок без weapon relay
    pub weapon: Option<WeaponProfile>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 300.0,
            jump_velocity: -650.0,
            gravity: 1000.0,
            max_fall_speed: 1200.0,
            max_jumps: 2,
            double_jump_multiplier: 0.65,
            health: 200,
            half_width: 14.0,
            half_height: 24.0,
            attack: AttackProfile {
                reach: 100.0,
                damage: 50,
                cooldown: 0.25,
                shape: AttackShape::Sweep { thickness: 48.0 },
            },
            air_attack: AirAttackConfig::default(),
            animation: AnimationProfile {
                locomotion: AnimationClip::Run,
                default_speed: 1.5,
                attack_speed: 2.0,
                ground_attack_speed: 2.0,
                native_facing: Facing::Left,
            },
            weapon: Some(WeaponProfile::default()),
        }
    }
}

impl PlayerConfig {
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.half_width, self.half_height)
    }
}

/// Параметры goblin scout (вешается на entity при spawn)
#[derive(Component, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoblinConfig {
    pub speed: f32,
    /// Доля speed при патруле
    pub patrol_speed_factor: f32,
    /// Смена направления патруля (секунды)
    pub patrol_interval: f32,
    pub gravity: f32,
    pub max_fall_speed: f32,
    /// Цель ближе → держим "idle"
    pub idle_distance: f32,
    pub attack_distance: f32,
    pub follow_distance: f32,
    pub health: u32,
    pub half_width: f32,
    pub half_height: f32,
    pub attack: AttackProfile,
    pub animation: AnimationProfile,
}

impl Default for GoblinConfig {
    fn default() -> Self {
        Self {
            speed: 100.0,
            patrol_speed_factor: 0.5,
            patrol_interval: 2.0,
            gravity: 500.0,
            max_fall_speed: 400.0,
            idle_distance: 20.0,
            attack_distance: 50.0,
            follow_distance: 250.0,
            health: 100,
            half_width: 12.0,
            half_height: 16.0,
            attack: AttackProfile::default(),
            animation: AnimationProfile::default(),
        }
    }
}

impl GoblinConfig {
    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.half_width, self.half_height)
    }
}

/// Корневой конфиг симуляции
#[derive(Resource, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Y пола для headless FlatFloor (+y вниз)
    pub floor_y: f32,
    pub bounds: Option<LevelBounds>,
    pub clips: ClipLibrary,
    pub player: PlayerConfig,
    pub goblin: GoblinConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            floor_y: 0.0,
            bounds: None,
            clips: ClipLibrary::default(),
            player: PlayerConfig::default(),
            goblin: GoblinConfig::default(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let player = &self.player;
        positive("player.speed", player.speed)?;
        positive("player.gravity", player.gravity)?;
        positive("player.max_fall_speed", player.max_fall_speed)?;
        positive("player.air_attack.stall_time", player.air_attack.stall_time)?;
        positive("player.air_attack.dive_speed", player.air_attack.dive_speed)?;
        positive("player.air_attack.deceleration", player.air_attack.deceleration)?;
        positive("player.double_jump_multiplier", player.double_jump_multiplier)?;
        if player.jump_velocity >= 0.0 {
            return Err(ConfigError::invalid(
                "player.jump_velocity",
                "must be negative (+y points down)",
            ));
        }
        if player.max_jumps > MAX_JUMPS_LIMIT {
            return Err(ConfigError::invalid(
                "player.max_jumps",
                format!("{} exceeds limit {}", player.max_jumps, MAX_JUMPS_LIMIT),
            ));
        }
        attack("player.attack", &player.attack)?;
        animation("player.animation", &player.animation)?;
        if let Some(weapon) = &player.weapon {
            positive("player.weapon.default_speed", weapon.default_speed)?;
            positive("player.weapon.attack_speed", weapon.attack_speed)?;
            positive("player.weapon.ground_attack_speed", weapon.ground_attack_speed)?;
        }

        let goblin = &self.goblin;
        positive("goblin.speed", goblin.speed)?;
        positive("goblin.gravity", goblin.gravity)?;
        positive("goblin.max_fall_speed", goblin.max_fall_speed)?;
        positive("goblin.patrol_interval", goblin.patrol_interval)?;
        positive("goblin.patrol_speed_factor", goblin.patrol_speed_factor)?;
        attack("goblin.attack", &goblin.attack)?;
        animation("goblin.animation", &goblin.animation)?;

        positive("clips.attack", self.clips.attack)?;
        positive("clips.ground_attack", self.clips.ground_attack)?;
        positive("clips.hit", self.clips.hit)?;
        positive("clips.death", self.clips.death)?;

        if let Some(bounds) = self.bounds {
            if bounds.min_x >= bounds.max_x {
                return Err(ConfigError::invalid("bounds", "min_x must be less than max_x"));
            }
        }

        Ok(())
    }
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {}", value)))
    }
}

fn attack(field: &str, profile: &AttackProfile) -> Result<(), ConfigError> {
    if !(profile.reach.is_finite() && profile.reach > 0.0) {
        return Err(ConfigError::invalid(
            &format!("{}.reach", field),
            format!("must be positive, got {}", profile.reach),
        ));
    }
    if profile.cooldown < 0.0 || !profile.cooldown.is_finite() {
        return Err(ConfigError::invalid(
            &format!("{}.cooldown", field),
            format!("must be non-negative, got {}", profile.cooldown),
        ));
    }
    Ok(())
}

/// Speed scale 0 = одноразовый клип никогда не доиграет
fn animation(field: &str, profile: &AnimationProfile) -> Result<(), ConfigError> {
    positive(&format!("{}.default_speed", field), profile.default_speed)?;
    positive(&format!("{}.attack_speed", field), profile.attack_speed)?;
    positive(&format!("{}.ground_attack_speed", field), profile.ground_attack_speed)
}
