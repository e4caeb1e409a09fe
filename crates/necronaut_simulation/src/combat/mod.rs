//! Combat: параметры атаки, hit-query, доставка урона
//!
//! ECS ответственность:
//! - Game state: Health, CombatState (фазы атаки, hit-stun, cooldown)
//! - Combat rules: фиксированный урон, смерть необратима
//! - Effects: AttackStarted, DamageDealt, EntityDied
//!
//! Collision backend ответственность:
//! - spatial query (box / ray) перед атакующим
//!
//! Flow: контроллер → AttackQuery → resolve_hit_queries → DamageEvent → apply_damage

pub mod attacker;
pub mod damage;
pub mod hit_query;

// Re-export основных типов
pub use attacker::{tick_attack_cooldowns, AttackProfile, AttackShape};
pub use damage::{apply_damage, DamageDealt, DamageEvent, DamageOutcome, EntityDied};
pub use hit_query::{resolve_hit_queries, resolve_hits, AttackQuery, AttackStarted, HitCandidate, QueryShape};
