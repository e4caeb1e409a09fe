//! Input source: действия игрока за тик
//!
//! Хост пишет `ActionInput` перед каждым тиком (через `Simulation::tick`).
//! `RandomPilot` — seeded scripted input для демо и тестов детерминизма.

use bevy::prelude::*;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Ввод игрока на один тик
///
/// move_* — сила нажатия [0, 1], jump/attack — "just pressed" (фронт).
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct ActionInput {
    pub move_left: f32,
    pub move_right: f32,
    pub jump_pressed: bool,
    pub attack_pressed: bool,
}

impl ActionInput {
    /// right − left, clamp в [-1, 1]
    pub fn axis(&self) -> f32 {
        (self.move_right - self.move_left).clamp(-1.0, 1.0)
    }

    pub fn left() -> Self {
        Self {
            move_left: 1.0,
            ..Default::default()
        }
    }

    pub fn right() -> Self {
        Self {
            move_right: 1.0,
            ..Default::default()
        }
    }

    pub fn jump() -> Self {
        Self {
            jump_pressed: true,
            ..Default::default()
        }
    }

    pub fn attack() -> Self {
        Self {
            attack_pressed: true,
            ..Default::default()
        }
    }
}

/// Детерминистичный "пилот": держит направление несколько тиков,
/// изредка прыгает и атакует.
pub struct RandomPilot {
    rng: ChaCha8Rng,
    held: ActionInput,
    hold_ticks: u32,
}

impl RandomPilot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            held: ActionInput::default(),
            hold_ticks: 0,
        }
    }

    pub fn next_input(&mut self) -> ActionInput {
        if self.hold_ticks == 0 {
            self.hold_ticks = self.rng.gen_range(10..40);
            self.held = match self.rng.gen_range(0..3) {
                0 => ActionInput::left(),
                1 => ActionInput::right(),
                _ => ActionInput::default(),
            };
        }
        self.hold_ticks -= 1;

        ActionInput {
            jump_pressed: self.rng.gen_bool(0.03),
            attack_pressed: self.rng.gen_bool(0.08),
            ..self.held
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_is_clamped() {
        let both = ActionInput {
            move_left: 0.4,
            move_right: 1.0,
            ..Default::default()
        };
        assert!((both.axis() - 0.6).abs() < 1e-6);

        let overdriven = ActionInput {
            move_left: 3.0,
            ..Default::default()
        };
        assert_eq!(overdriven.axis(), -1.0);
        assert_eq!(ActionInput::default().axis(), 0.0);
    }

    #[test]
    fn test_pilot_is_deterministic() {
        let mut a = RandomPilot::new(7);
        let mut b = RandomPilot::new(7);
        for _ in 0..500 {
            assert_eq!(a.next_input(), b.next_input());
        }
    }
}
