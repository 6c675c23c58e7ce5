/// Redline: drive a car around a walled field while the engine note
/// follows the simulated RPM
///
/// Architecture:
///   engine/ - minifb window loop, software renderer, audio synthesis
///   game/   - world state, tile map, collision, HUD
/// The vehicle simulation itself lives in the redline-sim crate.

mod engine;
mod game;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use redline_sim::{HeldKeys, SharedControls, SimulationSession, VehicleConfig};

use crate::engine::audio::EnginePreset;
use crate::game::World;

#[derive(Parser, Debug)]
#[command(name = "redline", version, about = "2D driving demo with RPM-tracking engine audio")]
struct Cli {
    /// Run without a window or audio device, printing per-second telemetry
    #[arg(long)]
    headless: bool,

    /// Tick count for the headless run
    #[arg(long, default_value_t = 1800)]
    ticks: u64,

    /// Seed for the wall layout (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Engine voice for the audio synthesizer
    #[arg(long, value_enum, default_value_t = EnginePreset::FormulaOne)]
    engine: EnginePreset,

    /// Master audio volume (0.0 - 1.0)
    #[arg(long, default_value_t = 1.0)]
    volume: f32,

    /// Vehicle tuning file (JSON, partial overrides allowed)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("redline_player=debug".parse()?)
                .add_directive("redline_sim=debug".parse()?),
        )
        .init();

    let cli = Cli::parse();
    tracing::info!("Redline v{}", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => VehicleConfig::load_or_default(path),
        None => VehicleConfig::default(),
    };

    if cli.headless {
        run_headless(config, cli.ticks, cli.seed)
    } else {
        engine::run(config, cli.seed, cli.engine, cli.volume)
    }
}

/// Scripted drive with no window or audio: shift up through the gears,
/// cruise with a turn in the middle, then brake to a stop.
fn run_headless(config: VehicleConfig, ticks: u64, seed: Option<u64>) -> Result<()> {
    let controls = SharedControls::new();
    let session = SimulationSession::new(config, controls.clone());
    let mut world = World::new(session, seed);
    let per_second = config.tick_rate as u64;

    println!(" tick |       position        |   km/h | gear |    rpm");
    for tick in 0..ticks {
        controls.publish(script(tick, ticks));
        world.update();

        if tick % per_second == 0 {
            let state = world.session.state();
            println!(
                "{:>5} | ({:>8.1}, {:>8.1}) | {:>6.1} | {:>4} | {:>6.0}",
                tick,
                state.position.0,
                state.position.1,
                state.display_speed(&config),
                state.gear_label(),
                state.rpm,
            );
        }
    }

    let state = *world.session.state();
    world.session.shutdown();
    println!(
        "done: {} ticks, final position ({:.1}, {:.1}), gear {}, {:.0} rpm",
        ticks,
        state.position.0,
        state.position.1,
        state.gear_label(),
        state.rpm,
    );
    Ok(())
}

/// Key script for the headless drive, phrased as held keys so the edge
/// latching in the simulation sees realistic press/release patterns
fn script(tick: u64, total: u64) -> HeldKeys {
    let upshift_phase = tick < total / 2;
    let throttle_phase = tick < total * 7 / 10;
    let turn_phase = tick >= total * 3 / 10 && tick < total * 2 / 5;
    let brake_phase = tick >= total * 4 / 5;

    HeldKeys {
        // Two-tick taps every 150 ticks read as separate presses
        shift_up: upshift_phase && tick % 150 < 2 && tick / 150 < 4,
        shift_down: false,
        throttle: throttle_phase,
        brake: brake_phase,
        steer_left: false,
        steer_right: turn_phase,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_taps_shift_up_four_times() {
        let total = 1800;
        let mut presses = 0;
        let mut prev = false;
        for tick in 0..total {
            let held = script(tick, total).shift_up;
            if held && !prev {
                presses += 1;
            }
            prev = held;
        }
        assert_eq!(presses, 4);
    }

    #[test]
    fn script_phases_do_not_fight() {
        let total = 1800;
        for tick in 0..total {
            let keys = script(tick, total);
            assert!(!(keys.throttle && keys.brake));
        }
    }
}
