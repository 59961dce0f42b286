//! Gravity and semi-implicit Euler integration for orbiting bodies.
//!
//! The central body is treated as a point mass. Each step recomputes the
//! acceleration, integrates velocity with it, then integrates position
//! with the *updated* velocity. That ordering is what keeps orbits from
//! spiralling outward the way plain forward Euler does, so callers must
//! not reorder the three calls.

use bevy::math::DVec2;

/// Default minimum separation (meters) below which gravity is not evaluated.
pub const MIN_SEPARATION: f64 = 1.0;

/// Compute gravitational acceleration toward a point mass.
///
/// `a = -GM * (p - c) / |p - c|³`
///
/// # Arguments
/// * `gm` - Standard gravitational parameter of the central body (m³/s²)
/// * `central_pos` - Position of the central body (meters)
/// * `body_pos` - Position of the orbiting body (meters)
/// * `min_separation` - Separation (meters) at or below which the result is zero
///
/// # Returns
/// Acceleration vector in m/s², or zero inside the separation guard.
#[inline]
pub fn gravitational_acceleration(
    gm: f64,
    central_pos: DVec2,
    body_pos: DVec2,
    min_separation: f64,
) -> DVec2 {
    let delta = central_pos - body_pos;
    let r_squared = delta.length_squared();

    // Avoid the singularity at the center. Bodies this deep have long since
    // been removed by the central-body collision check anyway.
    if r_squared <= min_separation * min_separation {
        return DVec2::ZERO;
    }

    let r = r_squared.sqrt();
    delta * (gm / (r_squared * r))
}

/// Forward Euler velocity update: `v + a·dt`.
#[inline]
pub fn integrate_velocity(vel: DVec2, acc: DVec2, dt: f64) -> DVec2 {
    vel + acc * dt
}

/// Position update from the already-updated velocity: `p + v·dt`.
#[inline]
pub fn integrate_position(pos: DVec2, vel: DVec2, dt: f64) -> DVec2 {
    pos + vel * dt
}

/// Specific orbital energy `v²/2 - GM/r` relative to the central body.
///
/// Returns `None` inside the separation guard.
pub fn specific_energy(gm: f64, central_pos: DVec2, pos: DVec2, vel: DVec2) -> Option<f64> {
    let r = (pos - central_pos).length();
    if r <= MIN_SEPARATION {
        return None;
    }
    Some(0.5 * vel.length_squared() - gm / r)
}
