//! Core physics types and constants for the rendezvous simulation.

use bevy::math::DVec2;
use bevy::prelude::*;

/// System sets making up one simulation tick, in execution order.
///
/// A renderer that reads the world after `Readout` sees one fully resolved
/// snapshot: bodies integrated, collisions applied, outcome updated.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Pilot controls (lock mode, firing) are applied to the spacecraft.
    Input,
    /// Gravity, propulsion and integration for every orbiting body.
    Physics,
    /// Pairwise collision detection and body-set mutation.
    Collision,
    /// HUD data and deferred time-factor changes.
    Readout,
}

// Physical constants (SI units)

/// Gravitational constant (m³·kg⁻¹·s⁻²)
pub const G: f64 = 6.6743015e-11;

/// Standard gravity (m/s²) for specific impulse calculations
pub const G0: f64 = 9.80665;

/// Kinematic state of a body in the simulation.
/// Uses f64 (DVec2) for accuracy at planetary orbit scales.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct BodyState {
    /// Position in meters from the simulation origin
    pub pos: DVec2,
    /// Velocity in meters per second
    pub vel: DVec2,
}

impl BodyState {
    /// Create a new body state
    pub fn new(pos: DVec2, vel: DVec2) -> Self {
        Self { pos, vel }
    }

    /// Distance to another body in meters.
    pub fn distance_to(&self, other: &BodyState) -> f64 {
        (self.pos - other.pos).length()
    }

    /// Magnitude of the velocity difference to another body in m/s.
    pub fn relative_speed_to(&self, other: &BodyState) -> f64 {
        (self.vel - other.vel).length()
    }

    /// Velocity in km/s
    pub fn vel_km_per_s(&self) -> DVec2 {
        self.vel * 0.001
    }
}

/// The role a body plays in a mission.
///
/// Behavior specializes on this tag: the central body is never integrated,
/// only the player carries propulsion, and collision policy depends on the
/// pair of kinds involved.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// The single gravitational source, fixed at the origin.
    CentralBody,
    /// Fragments from a crash. Debris never collides with debris.
    Debris,
    /// The pilot-controlled spacecraft.
    Player,
    /// The rendezvous target.
    Target,
    /// Any other orbiting object the player must avoid.
    Hazard,
}

impl BodyKind {
    /// Whether this body is integrated under gravity each tick.
    pub fn is_orbiting(self) -> bool {
        !matches!(self, BodyKind::CentralBody)
    }

    /// Display label for HUD and log output.
    pub fn label(self) -> &'static str {
        match self {
            BodyKind::CentralBody => "central body",
            BodyKind::Debris => "debris",
            BodyKind::Player => "player",
            BodyKind::Target => "target",
            BodyKind::Hazard => "hazard",
        }
    }
}
