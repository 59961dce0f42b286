//! Body components and spawning.
//!
//! Every body carries a [`BodyKind`] tag and a [`BodyState`]. The central
//! body adds [`CentralBody`]; everything else adds [`Orbiter`], and the
//! player additionally carries a [`Spacecraft`] with its propulsion state.
//! Bodies are only created at mission setup or as debris by the collision
//! engine, and only destroyed by the collision engine.

use bevy::math::DVec2;
use bevy::prelude::*;

use crate::types::{BodyKind, BodyState, G};

/// The gravitational source at the simulation origin.
#[derive(Component, Clone, Copy, Debug, PartialEq)]
pub struct CentralBody {
    /// Mass in kilograms.
    pub mass: f64,
    /// Surface radius in meters.
    pub radius: f64,
    /// Atmosphere thickness above the surface in meters.
    pub atmosphere_thickness: f64,
}

impl CentralBody {
    /// Standard gravitational parameter GM (m³/s²).
    pub fn gm(&self) -> f64 {
        self.mass * G
    }

    /// Distance from the center at which an orbiting body is lost.
    ///
    /// `margin_factor` scales the atmosphere thickness.
    pub fn collision_radius(&self, margin_factor: f64) -> f64 {
        self.radius + self.atmosphere_thickness * margin_factor
    }
}

/// Transient state shared by all orbiting bodies.
#[derive(Component, Clone, Copy, Debug, Default, PartialEq)]
pub struct Orbiter {
    /// Gravitational acceleration from the last step (m/s²). Recomputed every step.
    pub acceleration: DVec2,
    /// Presentation scale, inherited (tapered) by debris.
    pub image_scale: f64,
}

impl Orbiter {
    pub fn new(image_scale: f64) -> Self {
        Self {
            acceleration: DVec2::ZERO,
            image_scale,
        }
    }
}

/// How the player's facing angle is chosen each step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AngleLockMode {
    /// Facing follows the pilot's aim direction.
    #[default]
    Free,
    /// Facing follows the velocity vector.
    ProgradeLock,
    /// Facing opposes the velocity vector.
    RetrogradeLock,
}

impl AngleLockMode {
    /// Step toward prograde: Retrograde → Free → Prograde, saturating.
    pub fn step_up(self) -> Self {
        match self {
            AngleLockMode::RetrogradeLock => AngleLockMode::Free,
            AngleLockMode::Free | AngleLockMode::ProgradeLock => AngleLockMode::ProgradeLock,
        }
    }

    /// Step toward retrograde: Prograde → Free → Retrograde, saturating.
    pub fn step_down(self) -> Self {
        match self {
            AngleLockMode::ProgradeLock => AngleLockMode::Free,
            AngleLockMode::Free | AngleLockMode::RetrogradeLock => AngleLockMode::RetrogradeLock,
        }
    }

    /// HUD caption for the lock mode.
    pub fn label(self) -> &'static str {
        match self {
            AngleLockMode::Free => "No direction lock",
            AngleLockMode::ProgradeLock => "Prograde lock",
            AngleLockMode::RetrogradeLock => "Retrograde lock",
        }
    }
}

/// Propulsion and attitude state of the player spacecraft.
#[derive(Component, Clone, Debug, PartialEq)]
pub struct Spacecraft {
    /// Thrust direction in radians from the +x axis.
    pub facing_angle: f64,
    pub lock_mode: AngleLockMode,
    /// Structural mass without propellant (kg).
    pub dry_mass: f64,
    /// Remaining propellant (kg). Never increases while firing.
    pub propellant_mass: f64,
    /// Propellant at mission start (kg), for the HUD fraction.
    pub propellant_mass_initial: f64,
    /// Specific impulse (s).
    pub specific_impulse: f64,
    /// Engine thrust (N).
    pub thrust: f64,
    pub firing: bool,
}

/// Thrust of the player engine when a mission file does not specify one (N).
pub const DEFAULT_THRUST: f64 = 424.0;

impl Spacecraft {
    pub fn new(dry_mass: f64, propellant_mass: f64, specific_impulse: f64, thrust: f64) -> Self {
        Self {
            facing_angle: 0.0,
            lock_mode: AngleLockMode::Free,
            dry_mass,
            propellant_mass,
            propellant_mass_initial: propellant_mass,
            specific_impulse,
            thrust,
            firing: false,
        }
    }

    /// Current total mass (kg).
    pub fn total_mass(&self) -> f64 {
        self.dry_mass + self.propellant_mass
    }

    /// Remaining propellant as a fraction of the initial load, in `[0, 1]`.
    pub fn propellant_fraction(&self) -> f64 {
        if self.propellant_mass_initial <= 0.0 {
            return 0.0;
        }
        (self.propellant_mass / self.propellant_mass_initial).clamp(0.0, 1.0)
    }

    pub fn has_propellant(&self) -> bool {
        self.propellant_mass > 0.0
    }

    /// Apply the pilot's fire request. The engine only lights with propellant left.
    pub fn set_firing(&mut self, requested: bool) {
        self.firing = requested && self.has_propellant();
    }
}

/// Components for the central body, fixed at the origin.
pub fn central_body_bundle(body: CentralBody) -> impl Bundle {
    (
        BodyKind::CentralBody,
        BodyState::new(DVec2::ZERO, DVec2::ZERO),
        body,
    )
}

/// Components for a passive orbiting body (target, hazard or debris).
pub fn orbiter_bundle(kind: BodyKind, state: BodyState, image_scale: f64) -> impl Bundle {
    (kind, state, Orbiter::new(image_scale))
}

/// Components for the player spacecraft.
pub fn player_bundle(state: BodyState, spacecraft: Spacecraft, image_scale: f64) -> impl Bundle {
    (BodyKind::Player, state, Orbiter::new(image_scale), spacecraft)
}

/// Spawn one piece of debris.
pub fn spawn_debris(commands: &mut Commands, state: BodyState, image_scale: f64) -> Entity {
    commands
        .spawn(orbiter_bundle(BodyKind::Debris, state, image_scale))
        .id()
}
