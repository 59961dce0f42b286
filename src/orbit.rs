//! Orbit geometry derived from state vectors.
//!
//! Used for the orbit-ellipse overlay only; gravity never depends on it.
//! Parabolic and hyperbolic trajectories (e ≥ 1) produce a non-physical
//! semi-major axis and a NaN ellipse width. That is accepted: the overlay
//! simply has nothing sensible to draw for an escaping body.

use bevy::math::DVec2;

use crate::physics::MIN_SEPARATION;

/// Ellipse parameters for drawing an orbit around the central body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitGeometry {
    /// Full length (2a) and width (2b) of the orbit ellipse in meters.
    pub extent: DVec2,
    /// Angle of the periapsis from the +x axis (radians).
    pub periapsis_angle: f64,
    /// Distance of the periapsis from the central body (meters).
    pub periapsis_radius: f64,
    /// Distance of the apoapsis from the central body (meters).
    pub apoapsis_radius: f64,
    /// Eccentricity (0 = circular, <1 = elliptical).
    pub eccentricity: f64,
    /// Semi-major axis (meters). Non-physical for e ≥ 1.
    pub semi_major_axis: f64,
    /// Specific angular momentum, signed (m²/s). Positive is counter-clockwise.
    pub angular_momentum: f64,
}

impl OrbitGeometry {
    /// Returns true if the orbit is a closed ellipse.
    pub fn is_bound(&self) -> bool {
        self.eccentricity < 1.0
    }

    /// Angle of the apoapsis from the +x axis (radians).
    pub fn apoapsis_angle(&self) -> f64 {
        self.periapsis_angle + std::f64::consts::PI
    }

    /// Offset from the ellipse center to the occupied focus along the major
    /// axis (meters). The renderer uses this to place the ellipse.
    pub fn center_to_focus(&self) -> f64 {
        self.extent.x / 2.0 - self.periapsis_radius
    }
}

/// Compute orbit geometry from position and velocity.
///
/// `h = rx·vy - ry·vx`, `e⃗ = (vy·h/GM - rx/r, -vx·h/GM - ry/r)`,
/// `a = h² / (GM·(1 - e²))`.
///
/// # Returns
/// `None` if the body sits on the central body's center.
pub fn orbit_geometry(gm: f64, central_pos: DVec2, pos: DVec2, vel: DVec2) -> Option<OrbitGeometry> {
    let rel = pos - central_pos;
    let r = rel.length();
    if r <= MIN_SEPARATION || gm <= 0.0 {
        return None;
    }

    let h = rel.x * vel.y - rel.y * vel.x;
    let ecc = DVec2::new(vel.y * h / gm - rel.x / r, -vel.x * h / gm - rel.y / r);
    let e = ecc.length();

    let a = h * h / (gm * (1.0 - e * e));

    let length = 2.0 * a;
    let width = 2.0 * (a * a * (1.0 - e * e)).sqrt();

    Some(OrbitGeometry {
        extent: DVec2::new(length, width),
        periapsis_angle: ecc.y.atan2(ecc.x),
        periapsis_radius: a * (1.0 - e),
        apoapsis_radius: a * (1.0 + e),
        eccentricity: e,
        semi_major_axis: a,
        angular_momentum: h,
    })
}
