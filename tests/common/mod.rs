//! Common test utilities for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use rendezvous::body::{CentralBody, DEFAULT_THRUST};
use rendezvous::mission::{
    ActiveMission, BodyDescription, MissionDescription, OrbiterDescription, PlayerDescription,
};
use rendezvous::physics::CentralField;
use rendezvous::types::{BodyKind, BodyState};
use rendezvous::RendezvousPlugin;

/// Earth-like central body used by every scenario.
pub fn earth() -> CentralBody {
    CentralBody {
        mass: 5.972e24,
        radius: 6.371e6,
        atmosphere_thickness: 1.0e5,
    }
}

pub fn earth_field() -> CentralField {
    CentralField {
        gm: earth().gm(),
        pos: DVec2::ZERO,
    }
}

/// Counter-clockwise circular orbit at the given altitude, on the +x axis.
pub fn circular_orbit(altitude: f64) -> BodyState {
    let r = earth().radius + altitude;
    let v = (earth().gm() / r).sqrt();
    BodyState::new(DVec2::new(r, 0.0), DVec2::new(0.0, v))
}

/// Specific orbital energy around [`earth`].
pub fn orbital_energy(state: &BodyState) -> f64 {
    0.5 * state.vel.length_squared() - earth().gm() / state.pos.length()
}

/// Specific angular momentum (2D scalar).
pub fn angular_momentum(state: &BodyState) -> f64 {
    state.pos.x * state.vel.y - state.pos.y * state.vel.x
}

/// Orbital period for elliptical orbit around [`earth`].
pub fn orbital_period(semi_major_axis: f64) -> f64 {
    use std::f64::consts::TAU;
    TAU * (semi_major_axis.powi(3) / earth().gm()).sqrt()
}

fn mainbody() -> BodyDescription {
    let earth = earth();
    BodyDescription::MainBody {
        mass: earth.mass,
        radius: earth.radius,
        atm_thickness: earth.atmosphere_thickness,
    }
}

/// Player description at `state` with the reference propulsion system.
pub fn player(state: BodyState) -> BodyDescription {
    BodyDescription::Player(PlayerDescription {
        pos_init: state.pos.to_array(),
        vel_init: state.vel.to_array(),
        mass_dry: 1000.0,
        mass_prop: 500.0,
        i_sp: 300.0,
        thrust: DEFAULT_THRUST,
        bodyscale: 0.05,
    })
}

pub fn orbiter(kind: BodyKind, state: BodyState) -> BodyDescription {
    let description = OrbiterDescription::new(state, 0.1);
    match kind {
        BodyKind::Target => BodyDescription::Target(description),
        BodyKind::Hazard => BodyDescription::Hazard(description),
        _ => BodyDescription::Debris(description),
    }
}

/// Mission with a player on a 400 km circular orbit and nothing else.
pub fn solo_mission() -> MissionDescription {
    MissionDescription {
        name: "Solo".to_string(),
        bodies: vec![mainbody(), player(circular_orbit(400.0e3))],
    }
}

/// Mission where the target starts `separation` meters radially outward
/// from the player, moving `closing_speed` m/s faster along the orbit.
pub fn contact_mission(separation: f64, closing_speed: f64) -> MissionDescription {
    let player_state = circular_orbit(400.0e3);
    let target_state = BodyState::new(
        player_state.pos + DVec2::new(separation, 0.0),
        player_state.vel + DVec2::new(0.0, closing_speed),
    );
    MissionDescription {
        name: "Contact".to_string(),
        bodies: vec![
            mainbody(),
            player(player_state),
            orbiter(BodyKind::Target, target_state),
        ],
    }
}

/// Headless app running the full simulation at a fixed real frame time.
///
/// The first update spawns the mission and integrates with zero elapsed time.
pub fn headless_app(mission: MissionDescription, frame: Duration) -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .insert_resource(TimeUpdateStrategy::ManualDuration(frame))
        .insert_resource(ActiveMission(mission))
        .add_plugins(RendezvousPlugin);
    app
}

/// Count entities of one kind.
pub fn count_kind(app: &mut App, kind: BodyKind) -> usize {
    let world = app.world_mut();
    world
        .query::<&BodyKind>()
        .iter(world)
        .filter(|k| **k == kind)
        .count()
}

/// State of the single body of `kind`, if present.
pub fn state_of(app: &mut App, kind: BodyKind) -> Option<BodyState> {
    let world = app.world_mut();
    world
        .query::<(&BodyKind, &BodyState)>()
        .iter(world)
        .find(|(k, _)| **k == kind)
        .map(|(_, state)| *state)
}
