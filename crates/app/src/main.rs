//! Headless runner for the rail network simulation.
//!
//! Builds the network, schedules the trains, and advances the simulation
//! for a bounded number of fixed ticks. An optional first argument names a
//! JSON `SimulationConfig` file; `RAILSIM_TICKS` overrides the run budget.

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;

use simulation::config::SimulationConfig;
use simulation::{SimulationPlugin, TickCounter};

const DEFAULT_RUN_TICKS: u64 = 3600;

fn main() {
    let run_ticks = std::env::var("RAILSIM_TICKS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(DEFAULT_RUN_TICKS);

    App::new()
        .add_plugins(
            MinimalPlugins
                .set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
        )
        .add_plugins(LogPlugin::default())
        .insert_resource(load_config())
        .insert_resource(RunBudget { ticks: run_ticks })
        .add_plugins(SimulationPlugin)
        .add_systems(FixedUpdate, exit_after_budget)
        .run();
}

/// Read the config from a JSON file given as the first argument; fall back
/// to defaults on any failure, loudly.
fn load_config() -> SimulationConfig {
    let Some(path) = std::env::args().nth(1) else {
        return SimulationConfig::default();
    };
    let parsed = std::fs::read_to_string(&path)
        .map_err(|e| e.to_string())
        .and_then(|text| serde_json::from_str(&text).map_err(|e| e.to_string()));
    match parsed {
        Ok(config) => config,
        Err(err) => {
            eprintln!("failed to load config from {path}: {err}; using defaults");
            SimulationConfig::default()
        }
    }
}

#[derive(Resource)]
struct RunBudget {
    ticks: u64,
}

fn exit_after_budget(
    budget: Res<RunBudget>,
    ticks: Res<TickCounter>,
    mut exit: EventWriter<AppExit>,
) {
    if ticks.0 >= budget.ticks {
        info!("run budget of {} ticks reached", budget.ticks);
        exit.send(AppExit::Success);
    }
}
