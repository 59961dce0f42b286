//! Rendezvous - Orbital Rendezvous Simulator
//!
//! A library crate providing the simulation and collision core of a
//! two-body rendezvous game: a player spacecraft must reach a target in
//! orbit around a central body while avoiding hazards and debris.

pub mod body;
pub mod collision;
pub mod config;
pub mod input;
pub mod mission;
pub mod orbit;
pub mod outcome;
pub mod physics;
pub mod readout;
pub mod time;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use bevy::prelude::*;

use collision::CollisionPlugin;
use input::InputPlugin;
use mission::MissionPlugin;
use physics::PhysicsPlugin;
use readout::ReadoutPlugin;
use time::TimePlugin;
use types::SimulationSet;

/// Plugin bundling the whole simulation.
///
/// Each `Update` runs one tick: pilot input, then the physics step, then
/// collision resolution (only if the physics step advanced), then readout
/// and time-factor changes. Commands issued in one stage are applied before
/// the next, so despawned bodies never reach the readout.
pub struct RendezvousPlugin;

impl Plugin for RendezvousPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            Update,
            (
                SimulationSet::Input,
                SimulationSet::Physics,
                SimulationSet::Collision,
                SimulationSet::Readout,
            )
                .chain(),
        )
        .add_plugins((
            TimePlugin,
            InputPlugin,
            PhysicsPlugin,
            CollisionPlugin,
            MissionPlugin,
            ReadoutPlugin,
        ));
    }
}
