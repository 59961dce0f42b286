//! Rocket-equation propulsion and attitude for the player spacecraft.

use std::f64::consts::PI;

use bevy::math::DVec2;

use crate::body::{AngleLockMode, Spacecraft};
use crate::types::G0;

/// Result of one propulsion step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThrustStep {
    /// Velocity change magnitude (m/s).
    pub delta_v: f64,
    /// Propellant drawn this step (kg).
    pub propellant_used: f64,
    /// Whether the engine cut off because propellant ran out.
    pub cutoff: bool,
}

/// Exhaust velocity `g0 · Isp` (m/s).
#[inline]
pub fn exhaust_velocity(specific_impulse: f64) -> f64 {
    G0 * specific_impulse
}

/// Mass flow rate `F / v_e` (kg/s).
#[inline]
pub fn mass_flow_rate(thrust: f64, specific_impulse: f64) -> f64 {
    let v_e = exhaust_velocity(specific_impulse);
    if v_e <= 0.0 {
        return 0.0;
    }
    thrust / v_e
}

/// Fire the engine for `dt` seconds and add the resulting delta-v to `vel`.
///
/// Uses the Tsiolkovsky relation against the mass *before* this step's
/// consumption: `dv = v_e · ln(m / (m - dm))`. On the step that exhausts
/// the tank the full `dm` is still used for `dv`, so the final burn slightly
/// over-draws; the held propellant is then clamped to zero and the engine
/// cut off.
///
/// Does nothing unless the engine is firing with propellant left.
pub fn apply_thrust(craft: &mut Spacecraft, vel: &mut DVec2, dt: f64) -> Option<ThrustStep> {
    if !craft.firing || !craft.has_propellant() || dt <= 0.0 {
        return None;
    }

    let v_e = exhaust_velocity(craft.specific_impulse);
    let m_dot = mass_flow_rate(craft.thrust, craft.specific_impulse);
    let m = craft.total_mass();
    let mut dm = m_dot * dt;

    // A step long enough to burn the whole vehicle would put a non-positive
    // mass in the log; burn only what is left in the tank instead.
    if m - dm <= 0.0 {
        dm = craft.propellant_mass;
    }
    if dm <= 0.0 || m - dm <= 0.0 {
        craft.firing = false;
        return None;
    }

    let delta_v = v_e * (m / (m - dm)).ln();

    craft.propellant_mass -= dm;
    let cutoff = craft.propellant_mass <= 0.0;
    if cutoff {
        craft.propellant_mass = 0.0;
        craft.firing = false;
    }

    *vel += DVec2::from_angle(craft.facing_angle) * delta_v;

    Some(ThrustStep {
        delta_v,
        propellant_used: dm,
        cutoff,
    })
}

/// Resolve the facing angle for this step.
///
/// In `Free` mode the pilot's aim is used when present, otherwise the
/// previous facing is kept.
pub fn resolve_facing(mode: AngleLockMode, vel: DVec2, aim: Option<f64>, current: f64) -> f64 {
    match mode {
        AngleLockMode::Free => aim.unwrap_or(current),
        AngleLockMode::ProgradeLock => vel.y.atan2(vel.x),
        AngleLockMode::RetrogradeLock => vel.y.atan2(vel.x) + PI,
    }
}
