//! Test utilities for rendezvous simulation tests.
//!
//! Provides fixtures for an Earth-like central body, circular orbits and a
//! reference spacecraft, plus helpers for building collision candidates.

use bevy::math::DVec2;

use crate::body::{CentralBody, Spacecraft};
use crate::collision::CollisionCandidate;
use crate::physics::CentralField;
use crate::types::{BodyKind, BodyState};

/// Fixtures for creating test bodies and orbits.
pub mod fixtures {
    use super::*;

    /// Earth-like central body.
    pub fn earth() -> CentralBody {
        CentralBody {
            mass: 5.972e24,
            radius: 6.371e6,
            atmosphere_thickness: 1.0e5,
        }
    }

    /// Gravity field of [`earth`] at the origin.
    pub fn earth_field() -> CentralField {
        CentralField {
            gm: earth().gm(),
            pos: DVec2::ZERO,
        }
    }

    /// Body in a counter-clockwise circular orbit at the given altitude above [`earth`].
    ///
    /// Placed on the positive x-axis with velocity in the +y direction.
    pub fn circular_orbit(altitude: f64) -> BodyState {
        let r = earth().radius + altitude;
        let v = (earth().gm() / r).sqrt();
        BodyState::new(DVec2::new(r, 0.0), DVec2::new(0.0, v))
    }

    /// The reference spacecraft: 100 kg dry, 50 kg propellant, 300 s, 500 N.
    pub fn spacecraft() -> Spacecraft {
        Spacecraft::new(100.0, 50.0, 300.0, 500.0)
    }

    /// Collision candidate for an orbiting body.
    pub fn candidate(id: usize, kind: BodyKind, pos: DVec2, vel: DVec2) -> CollisionCandidate<usize> {
        CollisionCandidate::orbiter(id, kind, BodyState::new(pos, vel), 1.0)
    }

    /// Collision candidate for [`earth`] at the origin.
    pub fn earth_candidate(id: usize) -> CollisionCandidate<usize> {
        CollisionCandidate::central(id, BodyState::default(), earth())
    }
}

/// Assertions and measures for physical invariants.
pub mod assertions {
    use super::*;

    /// Specific orbital energy around [`fixtures::earth`].
    pub fn orbital_energy(state: &BodyState) -> f64 {
        0.5 * state.vel.length_squared() - fixtures::earth().gm() / state.pos.length()
    }

    /// Specific angular momentum (2D scalar).
    pub fn angular_momentum(state: &BodyState) -> f64 {
        state.pos.x * state.vel.y - state.pos.y * state.vel.x
    }

    /// Orbital period for a semi-major axis around [`fixtures::earth`].
    pub fn orbital_period(semi_major_axis: f64) -> f64 {
        std::f64::consts::TAU * (semi_major_axis.powi(3) / fixtures::earth().gm()).sqrt()
    }
}
