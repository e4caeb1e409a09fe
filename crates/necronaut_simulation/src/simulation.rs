//! Simulation driver: один тик = один прогон `SimulationTick`
//!
//! Хост (движок, демо, тесты) вызывает `Simulation::tick(dt, inputs)`
//! или `step(world, dt)` для своего App. Никаких FixedUpdate / real time:
//! Δt приходит снаружи, порядок систем фиксирован chain'ом.
//!
//! Порядок за тик:
//! 0. report_missing_animators (warning один раз на entity)
//! 1. dispatch_animation_finished (сигналы прошлого тика)
//! 2. tick_attack_cooldowns
//! 3. player_controller → goblin_controller (пишут AttackQuery)
//! 4. resolve_hit_queries (урон синхронно, в этом же тике)
//! 5. select_animations → relay_weapon_calls
//! 6. advance_playback (AnimationFinished уйдёт в следующий тик)

use bevy::ecs::schedule::{ExecutorKind, ScheduleLabel};
use bevy::prelude::*;

use crate::ai::{goblin_controller, spawn_goblin};
use crate::animation::{
    advance_playback, dispatch_animation_finished, relay_weapon_calls, report_missing_animators, select_animations,
    AnimationFinished, ClipStarted, SpriteCall,
};
use crate::combat::{resolve_hit_queries, tick_attack_cooldowns, AttackQuery, AttackStarted, DamageDealt, EntityDied};
use crate::components::Player;
use crate::config::SimulationConfig;
use crate::input::ActionInput;
use crate::logger;
use crate::physics::{FlatFloor, MovementBackend, MovementService};
use crate::player::{player_controller, spawn_player};

/// Schedule одного тика симуляции
#[derive(ScheduleLabel, Debug, Clone, PartialEq, Eq, Hash)]
pub struct SimulationTick;

/// Δt текущего тика (секунды)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct TickDelta(pub f32);

/// Окружение тика для чистых функций контроллеров
#[derive(Clone, Copy)]
pub struct TickContext<'a> {
    pub delta: f32,
    pub backend: &'a dyn MovementBackend,
}

/// Всё, что произошло за тик (для хоста: звуки, UI, логи)
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct TickEffects {
    pub attacks: Vec<AttackStarted>,
    pub damage: Vec<DamageDealt>,
    pub deaths: Vec<EntityDied>,
    pub clips: Vec<ClipStarted>,
    pub despawned: Vec<Entity>,
}

impl TickEffects {
    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty()
            && self.damage.is_empty()
            && self.deaths.is_empty()
            && self.clips.is_empty()
            && self.despawned.is_empty()
    }
}

/// Plugin: ресурсы, события и системы тика
///
/// Movement backend по умолчанию FlatFloor из конфига; свой backend
/// вставляется как `MovementService` до добавления plugin'а.
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        if !app.world().contains_resource::<MovementService>() {
            app.insert_resource(MovementService::new(FlatFloor {
                floor_y: self.config.floor_y,
                bounds: self.config.bounds,
            }));
        }

        app.insert_resource(self.config)
            .insert_resource(self.config.clips)
            .init_resource::<TickDelta>()
            .init_resource::<TickEffects>()
            // Обновляются вручную в `step`, не через First
            .add_event::<AttackQuery>()
            .add_event::<SpriteCall>()
            .add_event::<AnimationFinished>()
            .add_systems(
                SimulationTick,
                (
                    report_missing_animators,
                    dispatch_animation_finished,
                    tick_attack_cooldowns,
                    player_controller,
                    goblin_controller,
                    resolve_hit_queries,
                    select_animations,
                    relay_weapon_calls,
                    advance_playback,
                )
                    .chain(), // Последовательное выполнение для детерминизма
            )
            .edit_schedule(SimulationTick, |schedule| {
                schedule.set_executor_kind(ExecutorKind::SingleThreaded);
            });
    }
}

/// Прогнать один тик на мире с установленным `SimulationPlugin`
///
/// Отрицательный или не-конечный Δt превращается в 0 (тик без движения).
pub fn step(world: &mut World, dt: f32) -> TickEffects {
    let dt = if dt.is_finite() && dt >= 0.0 {
        dt
    } else {
        logger::log_warning(&format!("Invalid tick delta {}, clamped to 0", dt));
        0.0
    };

    world.insert_resource(TickDelta(dt));
    world.run_schedule(SimulationTick);

    // Двойная буферизация: события тика N читаются в тике N+1, потом дропаются
    world.resource_mut::<Events<AttackQuery>>().update();
    world.resource_mut::<Events<SpriteCall>>().update();
    world.resource_mut::<Events<AnimationFinished>>().update();
    // Added / RemovedComponents: то, что хост сделал между тиками, видно следующему тику
    world.clear_trackers();

    world
        .get_resource_mut::<TickEffects>()
        .map(|mut effects| std::mem::take(&mut *effects))
        .unwrap_or_default()
}

/// Headless симуляция: App + конфиг
pub struct Simulation {
    app: App,
    config: SimulationConfig,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Self {
        let mut app = App::new();
        app.add_plugins(SimulationPlugin { config });
        Self { app, config }
    }

    /// Симуляция со своим movement/collision backend
    pub fn with_backend(config: SimulationConfig, backend: impl MovementBackend) -> Self {
        let mut app = App::new();
        app.insert_resource(MovementService::new(backend))
            .add_plugins(SimulationPlugin { config });
        Self { app, config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn spawn_player(&mut self, position: Vec2) -> Entity {
        let config = self.config.player;
        spawn_player(self.app.world_mut(), &config, position)
    }

    pub fn spawn_goblin(&mut self, position: Vec2, target: Option<Entity>) -> Entity {
        let config = self.config.goblin;
        spawn_goblin(self.app.world_mut(), &config, position, target)
    }

    /// Один тик. Игроки, не упомянутые в `inputs`, получают пустой ввод.
    pub fn tick(&mut self, dt: f32, inputs: &[(Entity, ActionInput)]) -> TickEffects {
        let world = self.app.world_mut();

        let mut players = world.query_filtered::<&mut ActionInput, With<Player>>();
        for mut input in players.iter_mut(world) {
            *input = ActionInput::default();
        }

        for (entity, input) in inputs {
            match world.get_mut::<ActionInput>(*entity) {
                Some(mut slot) => *slot = *input,
                None => logger::log_warning(&format!("Input for {:?} dropped: no ActionInput", entity)),
            }
        }

        step(world, dt)
    }

    pub fn world(&self) -> &World {
        self.app.world()
    }

    pub fn world_mut(&mut self) -> &mut World {
        self.app.world_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{CharacterBody, Health};

    #[test]
    fn test_invalid_delta_is_clamped() {
        let mut sim = Simulation::new(SimulationConfig::default());
        let player = sim.spawn_player(Vec2::new(0.0, -200.0));
        let before = *sim.world().get::<CharacterBody>(player).expect("player body");

        sim.tick(-1.0, &[]);
        sim.tick(f32::NAN, &[]);

        let after = *sim.world().get::<CharacterBody>(player).expect("player body");
        assert_eq!(before.position, after.position);
        assert_eq!(sim.world().resource::<TickDelta>().0, 0.0);
    }

    #[test]
    fn test_effects_are_drained_each_tick() {
        let mut sim = Simulation::new(SimulationConfig::default());
        let player = sim.spawn_player(Vec2::new(0.0, -24.0));

        // Первый тик: стартует "idle"
        let first = sim.tick(1.0 / 60.0, &[]);
        assert!(!first.clips.is_empty());

        let second = sim.tick(1.0 / 60.0, &[]);
        assert!(second.is_empty());
        assert_eq!(sim.world().get::<Health>(player).map(|h| h.current), Some(200));
    }
}
