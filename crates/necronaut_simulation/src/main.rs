//! Headless демо: seeded дуэль игрока против гоблинов
//!
//! Игрок управляется RandomPilot, гоблины своим AI.
//! Один seed = один и тот же бой.

use std::path::PathBuf;
use std::process::ExitCode;

use bevy::prelude::*;
use clap::Parser;

use necronaut_simulation::logger;
use necronaut_simulation::{init_logger, set_log_level, Health, LogLevel, RandomPilot, Simulation, SimulationConfig};

#[derive(Parser, Debug)]
#[command(name = "necronaut_simulation", about = "Headless Necronaut character simulation")]
struct Args {
    /// Seed для RandomPilot
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Количество тиков (60 Hz)
    #[arg(long, default_value_t = 1200)]
    ticks: u32,

    /// Количество гоблинов
    #[arg(long, default_value_t = 2)]
    goblins: u32,

    /// JSON конфиг (частичный, остальное по умолчанию)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Только warnings и errors
    #[arg(long)]
    quiet: bool,
}

const DT: f32 = 1.0 / 60.0;

fn main() -> ExitCode {
    let args = Args::parse();

    init_logger();
    set_log_level(if args.quiet { LogLevel::Warning } else { LogLevel::Info });

    let config = match &args.config {
        Some(path) => match SimulationConfig::load(path) {
            Ok(config) => config,
            Err(err) => {
                logger::log_error(&format!("{}: {}", path.display(), err));
                return ExitCode::FAILURE;
            }
        },
        None => SimulationConfig::default(),
    };

    println!("Starting Necronaut headless simulation (seed: {})", args.seed);

    let mut sim = Simulation::new(config);
    let floor = config.floor_y;
    let player = sim.spawn_player(Vec2::new(0.0, floor - config.player.half_height));

    let goblins: Vec<Entity> = (0..args.goblins)
        .map(|i| {
            let side = if i % 2 == 0 { 1.0 } else { -1.0 };
            let x = side * (150.0 + 120.0 * (i / 2) as f32);
            sim.spawn_goblin(Vec2::new(x, floor - config.goblin.half_height), Some(player))
        })
        .collect();

    let mut pilot = RandomPilot::new(args.seed);
    let mut attacks = 0;
    let mut hits = 0;
    let mut deaths = 0;

    for tick in 0..args.ticks {
        let effects = sim.tick(DT, &[(player, pilot.next_input())]);
        attacks += effects.attacks.len();
        hits += effects.damage.len();
        deaths += effects.deaths.len();

        if tick % 300 == 0 {
            let health = sim.world().get::<Health>(player).map(|h| h.current);
            logger::log_info(&format!("Tick {}: player health {:?}", tick, health));
        }

        if sim.world().get_entity(player).is_err() {
            logger::log_info(&format!("Player despawned at tick {}", tick));
            break;
        }
    }

    let alive_goblins = goblins
        .iter()
        .filter(|goblin| sim.world().get_entity(**goblin).is_ok())
        .count();

    println!(
        "Simulation complete: {} attacks, {} hits, {} deaths, {}/{} goblins left",
        attacks,
        hits,
        deaths,
        alive_goblins,
        goblins.len()
    );

    ExitCode::SUCCESS
}
