//! Built-in missions.
//!
//! Used when no mission file is given. All bodies start on circular orbits
//! around an Earth-like central body, spread far enough apart that nothing
//! is in contact at mission start.

use bevy::math::DVec2;

use super::{BodyDescription, MissionDescription, OrbiterDescription, PlayerDescription};
use crate::body::DEFAULT_THRUST;
use crate::types::{BodyState, G};

const EARTH_MASS: f64 = 5.972e24;
const EARTH_RADIUS: f64 = 6.371e6;
const EARTH_ATMOSPHERE: f64 = 1.0e5;

/// A named mission generator.
#[derive(Clone, Copy, Debug)]
pub struct MissionPreset {
    /// Unique identifier, accepted by [`get_preset`].
    pub id: &'static str,
    pub name: &'static str,
    /// Brief description of the mission.
    pub description: &'static str,
    build: fn() -> MissionDescription,
}

impl MissionPreset {
    /// Build the mission bodies.
    pub fn mission(&self) -> MissionDescription {
        (self.build)()
    }
}

/// All available preset missions. The first is the default.
pub static PRESETS: &[MissionPreset] = &[LOW_ORBIT_RENDEZVOUS, CROWDED_ORBIT];

/// Catch a target 50 km higher and about 1000 km ahead.
pub static LOW_ORBIT_RENDEZVOUS: MissionPreset = MissionPreset {
    id: "low_orbit_rendezvous",
    name: "Low Orbit Rendezvous",
    description: "Match orbits with a target slightly above and ahead of you.",
    build: low_orbit_rendezvous,
};

/// Rendezvous with hazards and debris sharing the orbital band.
pub static CROWDED_ORBIT: MissionPreset = MissionPreset {
    id: "crowded_orbit",
    name: "Crowded Orbit",
    description: "Reach the target while avoiding a retrograde hazard and a debris field.",
    build: crowded_orbit,
};

/// Look up a preset by id.
pub fn get_preset(id: &str) -> Option<&'static MissionPreset> {
    PRESETS.iter().find(|preset| preset.id == id)
}

fn earth() -> BodyDescription {
    BodyDescription::MainBody {
        mass: EARTH_MASS,
        radius: EARTH_RADIUS,
        atm_thickness: EARTH_ATMOSPHERE,
    }
}

/// Counter-clockwise circular orbit at `altitude`, at `angle` from +x.
/// A negative `direction` gives a clockwise (retrograde) orbit.
fn circular(altitude: f64, angle: f64, direction: f64) -> BodyState {
    let r = EARTH_RADIUS + altitude;
    let speed = (G * EARTH_MASS / r).sqrt();
    let radial = DVec2::from_angle(angle);
    BodyState::new(radial * r, radial.perp() * speed * direction.signum())
}

fn player(altitude: f64, angle: f64) -> BodyDescription {
    let state = circular(altitude, angle, 1.0);
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

fn low_orbit_rendezvous() -> MissionDescription {
    MissionDescription {
        name: LOW_ORBIT_RENDEZVOUS.name.to_string(),
        bodies: vec![
            earth(),
            player(400.0e3, 0.0),
            BodyDescription::Target(OrbiterDescription::new(circular(450.0e3, 0.15, 1.0), 0.1)),
        ],
    }
}

fn crowded_orbit() -> MissionDescription {
    let mut bodies = vec![
        earth(),
        player(400.0e3, 0.0),
        BodyDescription::Target(OrbiterDescription::new(circular(800.0e3, 0.6, 1.0), 0.1)),
        BodyDescription::Hazard(OrbiterDescription::new(circular(600.0e3, 1.6, 1.0), 0.2)),
        BodyDescription::Hazard(OrbiterDescription::new(circular(700.0e3, 3.2, -1.0), 0.2)),
    ];
    bodies.extend(
        [4.4, 4.8, 5.2]
            .into_iter()
            .map(|angle| BodyDescription::Debris(OrbiterDescription::new(circular(500.0e3, angle, 1.0), 0.05))),
    );

    MissionDescription {
        name: CROWDED_ORBIT.name.to_string(),
        bodies,
    }
}
