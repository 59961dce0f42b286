//! Mission setup.
//!
//! A mission is a list of bodies with their initial state: exactly one
//! central body, at most one player and one target, and any number of
//! hazards and debris. Missions come from JSON files or from the built-in
//! presets, and are validated before anything is spawned.

pub mod presets;

use std::path::Path;

use bevy::math::DVec2;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::body::{
    central_body_bundle, orbiter_bundle, player_bundle, CentralBody, Spacecraft, DEFAULT_THRUST,
};
use crate::input::PilotInput;
use crate::outcome::MissionOutcome;
use crate::time::{TimeConfig, TimeControl};
use crate::types::{BodyKind, BodyState, SimulationSet};

pub use presets::{get_preset, MissionPreset, PRESETS};

/// Errors raised while loading or validating a mission.
#[derive(thiserror::Error, Debug)]
pub enum MissionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid mission JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("mission has no central body")]
    NoCentralBody,

    #[error("mission has {0} central bodies (expected exactly one)")]
    MultipleCentralBodies(usize),

    #[error("mission has {count} {kind} bodies (at most one allowed)")]
    TooMany { kind: &'static str, count: usize },

    #[error("body {index}: {field} must be {requirement}, got {value}")]
    NonPhysical {
        index: usize,
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },
}

/// A complete mission: a name and the bodies to spawn.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MissionDescription {
    pub name: String,
    pub bodies: Vec<BodyDescription>,
}

/// One body in a mission file, tagged by its `"type"` key.
///
/// Presentation keys such as `img` and `atm_color` are accepted and ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BodyDescription {
    MainBody {
        /// kg
        mass: f64,
        /// m
        radius: f64,
        /// m
        atm_thickness: f64,
    },
    Player(PlayerDescription),
    Target(OrbiterDescription),
    Hazard(OrbiterDescription),
    Debris(OrbiterDescription),
}

/// Initial state of a passive orbiting body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbiterDescription {
    /// m
    pub pos_init: [f64; 2],
    /// m/s
    pub vel_init: [f64; 2],
    #[serde(default = "default_bodyscale")]
    pub bodyscale: f64,
}

/// Initial state and propulsion of the player spacecraft.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerDescription {
    pub pos_init: [f64; 2],
    pub vel_init: [f64; 2],
    /// kg
    pub mass_dry: f64,
    /// kg
    pub mass_prop: f64,
    /// s
    pub i_sp: f64,
    /// N
    #[serde(default = "default_thrust")]
    pub thrust: f64,
    #[serde(default = "default_bodyscale")]
    pub bodyscale: f64,
}

fn default_thrust() -> f64 {
    DEFAULT_THRUST
}

fn default_bodyscale() -> f64 {
    1.0
}

impl BodyDescription {
    pub fn kind(&self) -> BodyKind {
        match self {
            BodyDescription::MainBody { .. } => BodyKind::CentralBody,
            BodyDescription::Player(_) => BodyKind::Player,
            BodyDescription::Target(_) => BodyKind::Target,
            BodyDescription::Hazard(_) => BodyKind::Hazard,
            BodyDescription::Debris(_) => BodyKind::Debris,
        }
    }

    /// Initial state, or `None` for the central body.
    pub fn initial_state(&self) -> Option<BodyState> {
        let (pos, vel) = match self {
            BodyDescription::MainBody { .. } => return None,
            BodyDescription::Player(p) => (p.pos_init, p.vel_init),
            BodyDescription::Target(o) | BodyDescription::Hazard(o) | BodyDescription::Debris(o) => {
                (o.pos_init, o.vel_init)
            }
        };
        Some(BodyState::new(DVec2::from_array(pos), DVec2::from_array(vel)))
    }
}

impl OrbiterDescription {
    pub fn new(state: BodyState, bodyscale: f64) -> Self {
        Self {
            pos_init: state.pos.to_array(),
            vel_init: state.vel.to_array(),
            bodyscale,
        }
    }
}

impl MissionDescription {
    /// Read and validate a mission file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MissionError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a mission from JSON text.
    pub fn from_json(text: &str) -> Result<Self, MissionError> {
        let mission: Self = serde_json::from_str(text)?;
        mission.validate()?;
        Ok(mission)
    }

    /// The central body, if the mission has one.
    pub fn central_body(&self) -> Option<CentralBody> {
        self.bodies.iter().find_map(|body| match body {
            BodyDescription::MainBody {
                mass,
                radius,
                atm_thickness,
            } => Some(CentralBody {
                mass: *mass,
                radius: *radius,
                atmosphere_thickness: *atm_thickness,
            }),
            _ => None,
        })
    }

    pub fn count(&self, kind: BodyKind) -> usize {
        self.bodies.iter().filter(|b| b.kind() == kind).count()
    }

    /// Check the body set and every physical attribute.
    pub fn validate(&self) -> Result<(), MissionError> {
        match self.count(BodyKind::CentralBody) {
            0 => return Err(MissionError::NoCentralBody),
            1 => {}
            n => return Err(MissionError::MultipleCentralBodies(n)),
        }

        for kind in [BodyKind::Player, BodyKind::Target] {
            let count = self.count(kind);
            if count > 1 {
                return Err(MissionError::TooMany {
                    kind: kind.label(),
                    count,
                });
            }
        }

        for (index, body) in self.bodies.iter().enumerate() {
            let check = |field: &'static str, value: f64, ok: bool, requirement: &'static str| {
                if ok {
                    Ok(())
                } else {
                    Err(MissionError::NonPhysical {
                        index,
                        field,
                        requirement,
                        value,
                    })
                }
            };
            let positive = |field: &'static str, value: f64| {
                check(field, value, value.is_finite() && value > 0.0, "positive")
            };
            let non_negative = |field: &'static str, value: f64| {
                check(field, value, value.is_finite() && value >= 0.0, "non-negative")
            };
            let finite = |field: &'static str, values: [f64; 2]| {
                values
                    .into_iter()
                    .try_for_each(|v| check(field, v, v.is_finite(), "finite"))
            };

            match body {
                BodyDescription::MainBody {
                    mass,
                    radius,
                    atm_thickness,
                } => {
                    positive("mass", *mass)?;
                    positive("radius", *radius)?;
                    non_negative("atm_thickness", *atm_thickness)?;
                }
                BodyDescription::Player(player) => {
                    finite("pos_init", player.pos_init)?;
                    finite("vel_init", player.vel_init)?;
                    positive("mass_dry", player.mass_dry)?;
                    non_negative("mass_prop", player.mass_prop)?;
                    positive("i_sp", player.i_sp)?;
                    positive("thrust", player.thrust)?;
                    positive("bodyscale", player.bodyscale)?;
                }
                BodyDescription::Target(orbiter)
                | BodyDescription::Hazard(orbiter)
                | BodyDescription::Debris(orbiter) => {
                    finite("pos_init", orbiter.pos_init)?;
                    finite("vel_init", orbiter.vel_init)?;
                    positive("bodyscale", orbiter.bodyscale)?;
                }
            }
        }

        Ok(())
    }
}

/// Spawn every body of a mission. Returns the number of entities spawned.
///
/// Expects a validated mission.
pub fn spawn_mission(commands: &mut Commands, mission: &MissionDescription) -> usize {
    for body in &mission.bodies {
        match body {
            BodyDescription::MainBody {
                mass,
                radius,
                atm_thickness,
            } => {
                commands.spawn(central_body_bundle(CentralBody {
                    mass: *mass,
                    radius: *radius,
                    atmosphere_thickness: *atm_thickness,
                }));
            }
            BodyDescription::Player(player) => {
                let state = BodyState::new(
                    DVec2::from_array(player.pos_init),
                    DVec2::from_array(player.vel_init),
                );
                let craft = Spacecraft::new(player.mass_dry, player.mass_prop, player.i_sp, player.thrust);
                commands.spawn(player_bundle(state, craft, player.bodyscale));
            }
            BodyDescription::Target(orbiter)
            | BodyDescription::Hazard(orbiter)
            | BodyDescription::Debris(orbiter) => {
                let state = BodyState::new(
                    DVec2::from_array(orbiter.pos_init),
                    DVec2::from_array(orbiter.vel_init),
                );
                commands.spawn(orbiter_bundle(body.kind(), state, orbiter.bodyscale));
            }
        }
    }
    mission.bodies.len()
}

/// The mission currently in play.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct ActiveMission(pub MissionDescription);

impl Default for ActiveMission {
    fn default() -> Self {
        Self(presets::LOW_ORBIT_RENDEZVOUS.mission())
    }
}

/// Request to replace the current mission.
#[derive(Message, Clone, Debug)]
pub struct LoadMission {
    pub mission: MissionDescription,
}

/// Plugin providing mission setup and reloading.
pub struct MissionPlugin;

impl Plugin for MissionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ActiveMission>()
            .add_message::<LoadMission>()
            .add_systems(Startup, spawn_active_mission)
            .add_systems(
                Update,
                // The ordering also inserts a sync point, so this tick's lock
                // requests reach the respawned spacecraft
                handle_load_mission
                    .in_set(SimulationSet::Input)
                    .before(crate::input::apply_pilot_controls),
            );
    }
}

fn spawn_active_mission(mut commands: Commands, active: Res<ActiveMission>) {
    let mission = &active.0;
    if let Err(err) = mission.validate() {
        warn!("Not starting mission '{}': {}", mission.name, err);
        return;
    }
    let count = spawn_mission(&mut commands, mission);
    info!("Mission loaded: {} ({} bodies)", mission.name, count);
}

/// Replace the body set and reset mission state.
fn handle_load_mission(
    mut commands: Commands,
    mut messages: MessageReader<LoadMission>,
    bodies: Query<Entity, With<BodyKind>>,
    time_config: Res<TimeConfig>,
    mut active: ResMut<ActiveMission>,
    mut outcome: ResMut<MissionOutcome>,
    mut time_control: ResMut<TimeControl>,
    mut input: ResMut<PilotInput>,
) {
    // Only the most recent request matters
    let Some(request) = messages.read().last() else {
        return;
    };

    if let Err(err) = request.mission.validate() {
        warn!("Ignoring mission '{}': {}", request.mission.name, err);
        return;
    }

    for entity in bodies.iter() {
        commands.entity(entity).despawn();
    }

    *outcome = MissionOutcome::Ongoing;
    time_control.reset(&time_config);
    *input = PilotInput::default();

    let count = spawn_mission(&mut commands, &request.mission);
    active.0 = request.mission.clone();
    info!("Mission loaded: {} ({} bodies)", request.mission.name, count);
}
