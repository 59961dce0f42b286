//! Collision detection and resolution between bodies.
//!
//! After every non-stalled physics step, each unordered pair of bodies is
//! examined exactly once. On collision:
//! - A body entering the central body's atmosphere is removed
//! - A soft contact between player and target completes the mission
//! - A crash removes both bodies and scatters debris from each
//!
//! Pairs are taken from a snapshot gathered before the pass, so debris
//! spawned during the pass is first checked on the next tick. A body removed
//! by one pair is skipped by every later pair in the same pass.

use std::collections::HashSet;
use std::hash::Hash;

use bevy::math::DVec2;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::body::{spawn_debris, CentralBody, Orbiter};
use crate::outcome::{crash_outcome, is_rendezvous_pair, MissionOutcome};
use crate::time::tick_advanced;
use crate::types::{BodyKind, BodyState, SimulationSet};

/// Collision thresholds and debris generation parameters.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Distance (meters) at or under which two orbiting bodies touch. Default: 500 km.
    pub collision_distance: f64,
    /// Relative speed (m/s) at or under which contact is safe. Default: 1000.
    pub safe_speed: f64,
    /// Multiplier on atmosphere thickness for the central-body threshold. Default: 1.0.
    pub atmosphere_margin_factor: f64,
    /// Debris pieces spawned from each crashed body. Must be odd. Default: 7.
    pub debris_count: u32,
    /// Position offset per debris index, on both axes (meters). Default: 1000.
    pub debris_position_step: f64,
    /// Velocity offset per debris index, on both axes (m/s). Default: 100.
    pub debris_velocity_step: f64,
    /// Scale of the central debris piece relative to its parent. Default: 0.5.
    pub debris_scale_factor: f64,
    /// Approach readout range as a multiple of `collision_distance`. Default: 10.
    pub approach_range_factor: f64,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            collision_distance: 500.0e3,
            safe_speed: 1000.0,
            atmosphere_margin_factor: 1.0,
            debris_count: 7,
            debris_position_step: 1000.0,
            debris_velocity_step: 100.0,
            debris_scale_factor: 0.5,
            approach_range_factor: 10.0,
        }
    }
}

/// How two bodies met this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContactMode {
    /// Farther apart than the collision distance.
    NoContact,
    /// Touching at or under the safe relative speed.
    SoftContact,
    /// Touching above the safe relative speed.
    Crash,
}

/// Classify the contact between two bodies.
///
/// Symmetric in `a` and `b`.
pub fn collision_check(
    a: &BodyState,
    b: &BodyState,
    collision_distance: f64,
    safe_speed: f64,
) -> ContactMode {
    if a.distance_to(b) > collision_distance {
        return ContactMode::NoContact;
    }
    if a.relative_speed_to(b) <= safe_speed {
        ContactMode::SoftContact
    } else {
        ContactMode::Crash
    }
}

/// Snapshot of one body taken before the collision pass.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionCandidate<Id> {
    pub id: Id,
    pub kind: BodyKind,
    pub state: BodyState,
    /// Presentation scale inherited by debris. Zero for the central body.
    pub image_scale: f64,
    /// Present only for the central body.
    pub central: Option<CentralBody>,
}

impl<Id> CollisionCandidate<Id> {
    pub fn orbiter(id: Id, kind: BodyKind, state: BodyState, image_scale: f64) -> Self {
        Self {
            id,
            kind,
            state,
            image_scale,
            central: None,
        }
    }

    pub fn central(id: Id, state: BodyState, body: CentralBody) -> Self {
        Self {
            id,
            kind: BodyKind::CentralBody,
            state,
            image_scale: 0.0,
            central: Some(body),
        }
    }
}

/// A debris piece to spawn after the pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DebrisSpawn {
    pub state: BodyState,
    pub image_scale: f64,
}

/// Report of one contact, for logging and the HUD.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct CollisionReport {
    /// Kinds of the two bodies, in pair order.
    pub kinds: (BodyKind, BodyKind),
    pub mode: ContactMode,
    /// Relative speed at contact (m/s).
    pub relative_speed: f64,
    /// Midpoint of the two bodies (meters).
    pub position: DVec2,
}

/// Everything the collision pass decided, applied by the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct CollisionResolution<Id> {
    /// Bodies to remove, each listed once.
    pub removed: Vec<Id>,
    pub debris: Vec<DebrisSpawn>,
    pub reports: Vec<CollisionReport>,
}

impl<Id> Default for CollisionResolution<Id> {
    fn default() -> Self {
        Self {
            removed: Vec::new(),
            debris: Vec::new(),
            reports: Vec::new(),
        }
    }
}

/// Tracks removals during a pass so each body is removed at most once.
struct RemovalSet<Id> {
    seen: HashSet<Id>,
    order: Vec<Id>,
}

impl<Id: Copy + Eq + Hash> RemovalSet<Id> {
    fn new() -> Self {
        Self {
            seen: HashSet::new(),
            order: Vec::new(),
        }
    }

    fn contains(&self, id: Id) -> bool {
        self.seen.contains(&id)
    }

    /// Removing an already-removed body is a no-op.
    fn remove(&mut self, id: Id) {
        if self.seen.insert(id) {
            self.order.push(id);
        }
    }
}

/// Debris fragments scattered from one crashed body.
///
/// Indices run symmetrically over `-n/2 ..= n/2`. Each fragment is offset
/// linearly by its index in position and velocity, and shrinks toward the
/// ends of the range.
pub fn debris_fragments(state: &BodyState, image_scale: f64, config: &CollisionConfig) -> Vec<DebrisSpawn> {
    let count = config.debris_count;
    let range = (count / 2) as i32;

    (-range..=range)
        .map(|i| {
            let index = i as f64;
            let taper = 1.0 - index.abs() / count as f64;
            DebrisSpawn {
                state: BodyState::new(
                    state.pos + DVec2::splat(config.debris_position_step * index),
                    state.vel + DVec2::splat(config.debris_velocity_step * index),
                ),
                image_scale: image_scale * taper * config.debris_scale_factor,
            }
        })
        .collect()
}

/// Resolve all collisions among a snapshot of bodies.
///
/// Pair policy, in priority order:
/// 1. Debris against debris is ignored.
/// 2. A pair with the central body uses its atmosphere-margin radius and
///    treats any contact as fatal for the orbiting body. Losing the player
///    this way is `Deorbited`.
/// 3. Any other pair uses the configured distance and safe speed. Soft
///    contact between player and target is `Success`; a crash records the
///    cause for its kind pair, scatters debris from both bodies and removes
///    both.
///
/// Outcomes go through [`MissionOutcome::record`], so only the first
/// terminal cause sticks. Removals and debris happen regardless.
pub fn resolve_collisions<Id: Copy + Eq + Hash>(
    bodies: &[CollisionCandidate<Id>],
    config: &CollisionConfig,
    outcome: &mut MissionOutcome,
) -> CollisionResolution<Id> {
    let mut resolution = CollisionResolution::default();
    let mut removals = RemovalSet::new();

    for (index, a) in bodies.iter().enumerate() {
        for b in &bodies[index + 1..] {
            if removals.contains(a.id) || removals.contains(b.id) {
                continue;
            }

            if a.kind == BodyKind::Debris && b.kind == BodyKind::Debris {
                continue;
            }

            match (&a.central, &b.central) {
                (Some(central), None) => {
                    resolve_central_pair(central, a, b, config, outcome, &mut removals, &mut resolution)
                }
                (None, Some(central)) => {
                    resolve_central_pair(central, b, a, config, outcome, &mut removals, &mut resolution)
                }
                (None, None) => resolve_orbiter_pair(a, b, config, outcome, &mut removals, &mut resolution),
                // Only one central body exists per mission
                (Some(_), Some(_)) => {}
            }
        }
    }

    resolution.removed = removals.order;
    resolution
}

fn resolve_central_pair<Id: Copy + Eq + Hash>(
    central: &CentralBody,
    center: &CollisionCandidate<Id>,
    body: &CollisionCandidate<Id>,
    config: &CollisionConfig,
    outcome: &mut MissionOutcome,
    removals: &mut RemovalSet<Id>,
    resolution: &mut CollisionResolution<Id>,
) {
    let threshold = central.collision_radius(config.atmosphere_margin_factor);
    if collision_check(&center.state, &body.state, threshold, 0.0) == ContactMode::NoContact {
        return;
    }

    // Any contact with the central body is fatal, even at zero relative speed
    if body.kind == BodyKind::Player {
        outcome.record(MissionOutcome::Deorbited);
    }
    removals.remove(body.id);
    resolution.reports.push(report(center, body, ContactMode::Crash));
}

fn resolve_orbiter_pair<Id: Copy + Eq + Hash>(
    a: &CollisionCandidate<Id>,
    b: &CollisionCandidate<Id>,
    config: &CollisionConfig,
    outcome: &mut MissionOutcome,
    removals: &mut RemovalSet<Id>,
    resolution: &mut CollisionResolution<Id>,
) {
    let mode = collision_check(&a.state, &b.state, config.collision_distance, config.safe_speed);

    match mode {
        ContactMode::NoContact => return,
        ContactMode::SoftContact => {
            if is_rendezvous_pair(a.kind, b.kind) {
                outcome.record(MissionOutcome::Success);
            }
        }
        ContactMode::Crash => {
            if let Some(cause) = crash_outcome(a.kind, b.kind) {
                outcome.record(cause);
            }
            resolution
                .debris
                .extend(debris_fragments(&a.state, a.image_scale, config));
            resolution
                .debris
                .extend(debris_fragments(&b.state, b.image_scale, config));
            removals.remove(a.id);
            removals.remove(b.id);
        }
    }

    resolution.reports.push(report(a, b, mode));
}

fn report<Id>(a: &CollisionCandidate<Id>, b: &CollisionCandidate<Id>, mode: ContactMode) -> CollisionReport {
    CollisionReport {
        kinds: (a.kind, b.kind),
        mode,
        relative_speed: a.state.relative_speed_to(&b.state),
        position: (a.state.pos + b.state.pos) * 0.5,
    }
}

/// Plugin providing collision detection between bodies.
pub struct CollisionPlugin;

impl Plugin for CollisionPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CollisionConfig>()
            .init_resource::<MissionOutcome>()
            .add_message::<CollisionReport>()
            .add_systems(
                Update,
                check_collisions
                    .in_set(SimulationSet::Collision)
                    .run_if(tick_advanced),
            );
    }
}

/// Check for collisions between all bodies and apply the result.
///
/// Runs after the physics step. Removals and debris spawns go through
/// `Commands`, so nothing in the world changes until the pass is complete.
pub fn check_collisions(
    mut commands: Commands,
    bodies: Query<(Entity, &BodyKind, &BodyState, Option<&Orbiter>, Option<&CentralBody>)>,
    config: Res<CollisionConfig>,
    mut outcome: ResMut<MissionOutcome>,
    mut reports: MessageWriter<CollisionReport>,
) {
    // Collect the snapshot first so the pass never sees its own mutations
    let snapshot: Vec<CollisionCandidate<Entity>> = bodies
        .iter()
        .map(|(entity, kind, state, orbiter, central)| match central {
            Some(central) => CollisionCandidate::central(entity, *state, *central),
            None => CollisionCandidate::orbiter(
                entity,
                *kind,
                *state,
                orbiter.map_or(1.0, |o| o.image_scale),
            ),
        })
        .collect();

    let previous = *outcome;
    let resolution = resolve_collisions(&snapshot, &config, &mut outcome);

    for report in &resolution.reports {
        info!(
            "{:?} between {} and {} at {:.0} m/s",
            report.mode,
            report.kinds.0.label(),
            report.kinds.1.label(),
            report.relative_speed,
        );
    }

    if *outcome != previous {
        info!("Mission outcome: {:?}", *outcome);
    }

    for entity in resolution.removed {
        commands.entity(entity).despawn();
    }

    for debris in resolution.debris {
        spawn_debris(&mut commands, debris.state, debris.image_scale);
    }

    reports.write_batch(resolution.reports);
}
