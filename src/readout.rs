//! Flight data for the HUD.
//!
//! Refreshed once per tick after collisions are resolved, so a renderer
//! reads values that agree with the body set it draws.

use bevy::prelude::*;

use crate::body::{AngleLockMode, CentralBody, Orbiter, Spacecraft};
use crate::collision::CollisionConfig;
use crate::input::PilotInput;
use crate::orbit::{orbit_geometry, OrbitGeometry};
use crate::outcome::MissionOutcome;
use crate::time::{apply_time_controls, TimeControl};
use crate::types::{BodyKind, BodyState, SimulationSet};

/// Closing data between the player and the target.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Approach {
    /// m
    pub distance: f64,
    /// The velocity change needed to match the target (m/s).
    pub relative_speed: f64,
    /// Contact now would be soft.
    pub within_safe_speed: bool,
}

/// Approach data, reported only while the target is within
/// `approach_range_factor` collision distances of the player.
pub fn approach_readout(player: &BodyState, target: &BodyState, config: &CollisionConfig) -> Option<Approach> {
    let distance = player.distance_to(target);
    if distance > config.collision_distance * config.approach_range_factor {
        return None;
    }
    let relative_speed = player.relative_speed_to(target);
    Some(Approach {
        distance,
        relative_speed,
        within_safe_speed: relative_speed <= config.safe_speed,
    })
}

/// Whether a body gets an orbit overlay.
pub fn shows_orbit(kind: BodyKind) -> bool {
    matches!(kind, BodyKind::Player | BodyKind::Target | BodyKind::Hazard)
}

/// Snapshot of everything the HUD displays.
#[derive(Resource, Clone, Debug, Default, PartialEq)]
pub struct FlightReadout {
    pub outcome: MissionOutcome,
    pub time_factor: f64,
    /// Simulated seconds since mission start.
    pub elapsed: f64,
    /// `None` once the player is gone.
    pub propellant_fraction: Option<f64>,
    pub lock_mode: Option<AngleLockMode>,
    pub firing: bool,
    pub approach: Option<Approach>,
    /// Orbit overlays, empty once the mission has ended or while the pilot
    /// has them switched off.
    pub orbits: Vec<(BodyKind, OrbitGeometry)>,
}

/// Plugin providing the flight readout.
pub struct ReadoutPlugin;

impl Plugin for ReadoutPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FlightReadout>().add_systems(
            Update,
            update_readout
                .in_set(SimulationSet::Readout)
                .after(apply_time_controls),
        );
    }
}

fn update_readout(
    outcome: Res<MissionOutcome>,
    time_control: Res<TimeControl>,
    config: Res<CollisionConfig>,
    input: Res<PilotInput>,
    central: Query<(&BodyState, &CentralBody)>,
    bodies: Query<(&BodyKind, &BodyState, Option<&Spacecraft>), With<Orbiter>>,
    mut readout: ResMut<FlightReadout>,
) {
    let mut next = FlightReadout {
        outcome: *outcome,
        time_factor: time_control.factor,
        elapsed: time_control.elapsed,
        ..Default::default()
    };

    let mut player = None;
    let mut target = None;
    for (kind, state, craft) in bodies.iter() {
        match kind {
            BodyKind::Player => player = Some((*state, craft)),
            BodyKind::Target => target = Some(*state),
            _ => {}
        }
    }

    if let Some((_, Some(craft))) = player {
        next.propellant_fraction = Some(craft.propellant_fraction());
        next.lock_mode = Some(craft.lock_mode);
        next.firing = craft.firing;
    }

    if let (Some((player_state, _)), Some(target_state)) = (player, target) {
        next.approach = approach_readout(&player_state, &target_state, &config);
    }

    if input.show_orbits
        && !outcome.is_terminal()
        && let Ok((central_state, central_body)) = central.single()
    {
        next.orbits = bodies
            .iter()
            .filter(|(kind, _, _)| shows_orbit(**kind))
            .filter_map(|(kind, state, _)| {
                orbit_geometry(central_body.gm(), central_state.pos, state.pos, state.vel)
                    .map(|geometry| (*kind, geometry))
            })
            .collect();
    }

    // Avoid tripping change detection when nothing moved
    readout.set_if_neq(next);
}
