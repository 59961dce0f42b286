//! Rendezvous - headless simulation runner
//!
//! Runs at 60 ticks per second until the mission ends or the wall-clock
//! limit is reached.

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::log::LogPlugin;
use bevy::prelude::*;
use bevy::time::Real;
use clap::Parser;

use rendezvous::config::RendezvousConfig;
use rendezvous::mission::{get_preset, ActiveMission, MissionDescription, PRESETS};
use rendezvous::outcome::MissionOutcome;
use rendezvous::readout::FlightReadout;
use rendezvous::types::SimulationSet;
use rendezvous::RendezvousPlugin;

/// Wall-clock seconds before giving up on an unfinished mission.
const RUN_LIMIT_SECONDS: f64 = 600.0;

#[derive(Parser)]
#[command(version, about = "Headless two-body rendezvous simulation")]
struct Cli {
    /// Preset id or path to a mission JSON file (defaults to the first preset)
    mission: Option<String>,

    /// Simulation config JSON file (defaults to built-in values)
    config: Option<PathBuf>,

    /// Wall-clock seconds before giving up on an unfinished mission
    #[arg(long, default_value_t = RUN_LIMIT_SECONDS)]
    limit: f64,
}

#[derive(Resource)]
struct RunLimit(f64);

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mission = match cli.mission.as_deref() {
        Some(arg) => match get_preset(arg) {
            Some(preset) => preset.mission(),
            None => MissionDescription::load(arg)?,
        },
        None => PRESETS[0].mission(),
    };

    let config = match cli.config {
        Some(path) => RendezvousConfig::load(path)?,
        None => RendezvousConfig::default(),
    };

    let mut app = App::new();
    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_secs_f64(1.0 / 60.0))),
        LogPlugin::default(),
    ));
    config.insert_into(&mut app);
    app.insert_resource(ActiveMission(mission))
        .insert_resource(RunLimit(cli.limit))
        .add_plugins(RendezvousPlugin)
        .add_systems(Update, stop_when_done.after(SimulationSet::Readout));

    app.run();
    Ok(())
}

fn stop_when_done(
    outcome: Res<MissionOutcome>,
    readout: Res<FlightReadout>,
    time: Res<Time<Real>>,
    limit: Res<RunLimit>,
    mut exit: MessageWriter<AppExit>,
) {
    if outcome.is_terminal() {
        match outcome.summary() {
            Some(summary) => info!("{} {}", outcome.headline(), summary),
            None => info!("{}", outcome.headline()),
        }
        info!("Simulated {:.0} s", readout.elapsed);
        exit.write(AppExit::Success);
    } else if time.elapsed_secs_f64() >= limit.0 {
        info!(
            "Stopping after {:.0} s wall clock ({:.0} s simulated), mission still in progress",
            limit.0, readout.elapsed
        );
        exit.write(AppExit::Success);
    }
}
