//! Physics simulation for the rendezvous mission.
//!
//! Advances every orbiting body once per tick with semi-implicit Euler
//! under the central body's gravity, plus rocket-equation thrust for the
//! player. Runs in the `Update` schedule so the stall guard sees real frame
//! time: a frame that took longer than `max_frame_seconds` is skipped
//! entirely instead of producing one huge, wrong step.

mod kinematics;
mod propulsion;

#[cfg(test)]
mod proptest_physics;

use bevy::math::DVec2;
use bevy::prelude::*;
use bevy::time::Real;
use serde::{Deserialize, Serialize};

pub use kinematics::{
    gravitational_acceleration, integrate_position, integrate_velocity, specific_energy,
    MIN_SEPARATION,
};
pub use propulsion::{apply_thrust, exhaust_velocity, mass_flow_rate, resolve_facing, ThrustStep};

use crate::body::{CentralBody, Orbiter, Spacecraft};
use crate::input::PilotInput;
use crate::time::{TickStatus, TimeControl};
use crate::types::{BodyState, SimulationSet};

/// Configuration for the physics step.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Longest real frame time (seconds) that is still simulated. Default: 1/20.
    pub max_frame_seconds: f64,
    /// Separation (meters) below which gravity is not evaluated. Default: 1.
    pub min_separation: f64,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            max_frame_seconds: 1.0 / 20.0,
            min_separation: MIN_SEPARATION,
        }
    }
}

/// Gravity source seen by every orbiter during one step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CentralField {
    /// Standard gravitational parameter (m³/s²).
    pub gm: f64,
    /// Position of the central body (meters).
    pub pos: DVec2,
}

impl CentralField {
    pub fn from_body(state: &BodyState, body: &CentralBody) -> Self {
        Self {
            gm: body.gm(),
            pos: state.pos,
        }
    }
}

/// Simulation time step for a frame, or `None` when the frame stalled.
///
/// `dt = dt_frame · time_factor`. The stall test is on real frame time
/// (`dt / time_factor`), so it does not depend on the time factor.
pub fn simulation_dt(dt_frame: f64, time_factor: f64, config: &PhysicsConfig) -> Option<f64> {
    if dt_frame > config.max_frame_seconds {
        return None;
    }
    Some(dt_frame * time_factor)
}

/// Advance one orbiting body by `dt` seconds.
///
/// Order matters and is fixed: acceleration from the current position,
/// then (player only) facing from the pre-step velocity, then velocity from
/// gravity, then thrust on top of that velocity, then position from the
/// final velocity.
///
/// `aim` is the pilot's pointer direction, used only in `Free` lock mode.
pub fn advance_orbiter(
    state: &mut BodyState,
    orbiter: &mut Orbiter,
    craft: Option<&mut Spacecraft>,
    aim: Option<f64>,
    field: CentralField,
    dt: f64,
    config: &PhysicsConfig,
) -> Option<ThrustStep> {
    orbiter.acceleration =
        gravitational_acceleration(field.gm, field.pos, state.pos, config.min_separation);

    let mut vel = integrate_velocity(state.vel, orbiter.acceleration, dt);

    let thrust = craft.and_then(|craft| {
        craft.facing_angle = resolve_facing(craft.lock_mode, state.vel, aim, craft.facing_angle);
        apply_thrust(craft, &mut vel, dt)
    });

    state.vel = vel;
    state.pos = integrate_position(state.pos, vel, dt);

    thrust
}

/// Plugin providing the physics step.
pub struct PhysicsPlugin;

impl Plugin for PhysicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PhysicsConfig>()
            .add_systems(Update, physics_step.in_set(SimulationSet::Physics));
    }
}

/// Main physics integration system.
///
/// Skips the whole tick when the frame stalled; otherwise integrates every
/// orbiter against the central body's position at the start of the tick.
/// Orbiter updates are independent of each other, so query order is
/// irrelevant.
fn physics_step(
    time: Res<Time<Real>>,
    config: Res<PhysicsConfig>,
    input: Res<PilotInput>,
    mut time_control: ResMut<TimeControl>,
    central: Query<(&BodyState, &CentralBody), Without<Orbiter>>,
    mut orbiters: Query<(&mut BodyState, &mut Orbiter, Option<&mut Spacecraft>)>,
) {
    let Ok((central_state, central_body)) = central.single() else {
        warn_once!("No single central body in the world, physics is idle");
        time_control.last_tick = TickStatus::Idle;
        return;
    };
    let field = CentralField::from_body(central_state, central_body);

    let dt_frame = time.delta_secs_f64();
    let Some(dt) = simulation_dt(dt_frame, time_control.factor, &config) else {
        debug!("Frame took {:.3}s, skipping physics for this tick", dt_frame);
        time_control.last_tick = TickStatus::Stalled;
        time_control.stalled_ticks += 1;
        return;
    };

    for (mut state, mut orbiter, mut craft) in orbiters.iter_mut() {
        let step = advance_orbiter(
            &mut state,
            &mut orbiter,
            craft.as_deref_mut(),
            input.aim_angle,
            field,
            dt,
            &config,
        );

        if let Some(step) = step
            && step.cutoff
        {
            info!("Engine cutoff: propellant exhausted");
        }
    }

    time_control.elapsed += dt;
    time_control.last_tick = TickStatus::Advanced { dt };
}
