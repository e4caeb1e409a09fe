//! Combat state: фазы атаки, hit-stun, cooldown

use bevy::prelude::*;

use crate::animation::AnimationClip;

/// Фаза атаки.
///
/// # Transitions
///
/// ```text
/// Ready ──attack (ground)──> Ground ──"attack" finished──> Ready
/// Ready ──attack (air)──> AirStall ──stall timer──> AirDive
/// AirStall | AirDive ──landed──> GroundFollowUp ──"ground attack" finished──> Ready
/// any ──damage──> Ready
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum AttackPhase {
    /// Не атакует
    #[default]
    Ready,
    /// Наземный удар, ждём конца клипа "attack"
    Ground,
    /// Воздушная атака: зависание, velocity гасится к нулю
    AirStall { remaining: f32 },
    /// Воздушная атака: пике вниз до приземления
    AirDive,
    /// Добивание после приземления из пике ("ground attack")
    GroundFollowUp,
}

impl AttackPhase {
    pub fn is_airborne(&self) -> bool {
        matches!(self, AttackPhase::AirStall { .. } | AttackPhase::AirDive)
    }
}

/// Боевое состояние персонажа
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct CombatState {
    pub phase: AttackPhase,
    /// Получил урон, проигрывается "hit" (персонаж оглушён)
    pub hit: bool,
    /// Текущий cooldown таймер (0 = готов атаковать)
    pub cooldown_timer: f32,
}

impl CombatState {
    pub fn is_attacking(&self) -> bool {
        self.phase != AttackPhase::Ready
    }

    pub fn on_cooldown(&self) -> bool {
        self.cooldown_timer > 0.0
    }

    /// Может ли начать новую атаку (не атакует, не оглушён, cooldown истёк)
    pub fn can_attack(&self) -> bool {
        !self.is_attacking() && !self.hit && !self.on_cooldown()
    }

    /// Начать атаку и взвести cooldown
    pub fn start_attack(&mut self, phase: AttackPhase, cooldown: f32) {
        self.phase = phase;
        self.cooldown_timer = cooldown;
    }

    pub fn tick_cooldown(&mut self, delta: f32) {
        if self.cooldown_timer > 0.0 {
            self.cooldown_timer = (self.cooldown_timer - delta).max(0.0);
        }
    }

    /// Урон прерывает текущую атаку
    pub fn interrupt(&mut self, survived: bool) {
        self.phase = AttackPhase::Ready;
        self.hit = survived;
        if !survived {
            self.cooldown_timer = 0.0;
        }
    }

    /// Реакция на завершение клипа. Возвращает true если состояние изменилось.
    pub fn finish_clip(&mut self, clip: AnimationClip) -> bool {
        match clip {
            AnimationClip::Attack if self.phase == AttackPhase::Ground => {
                self.phase = AttackPhase::Ready;
                true
            }
            AnimationClip::GroundAttack if self.phase == AttackPhase::GroundFollowUp => {
                self.phase = AttackPhase::Ready;
                true
            }
            AnimationClip::Hit if self.hit => {
                self.hit = false;
                self.phase = AttackPhase::Ready;
                true
            }
            _ => false,
        }
    }
}
