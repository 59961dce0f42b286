//! End-to-end collision scenarios without an App.
//!
//! Drives the pure physics step and collision resolution together, the way
//! the systems do each tick: integrate every orbiter, then resolve
//! collisions on a snapshot, then apply removals and spawn debris.

mod common;

use bevy::math::DVec2;
use rendezvous::collision::{resolve_collisions, CollisionCandidate, CollisionConfig, ContactMode};
use rendezvous::outcome::MissionOutcome;
use rendezvous::physics::{advance_orbiter, PhysicsConfig};
use rendezvous::body::Orbiter;
use rendezvous::types::{BodyKind, BodyState};

struct SimBody {
    id: usize,
    kind: BodyKind,
    state: BodyState,
    orbiter: Orbiter,
}

/// Minimal body set around the common Earth fixture.
struct Sim {
    bodies: Vec<SimBody>,
    next_id: usize,
    outcome: MissionOutcome,
    config: CollisionConfig,
    crashes: usize,
}

const CENTRAL_ID: usize = 0;

impl Sim {
    fn new(bodies: &[(BodyKind, BodyState)]) -> Self {
        let mut sim = Self {
            bodies: Vec::new(),
            next_id: CENTRAL_ID + 1,
            outcome: MissionOutcome::Ongoing,
            config: CollisionConfig::default(),
            crashes: 0,
        };
        for (kind, state) in bodies {
            sim.spawn(*kind, *state, 1.0);
        }
        sim
    }

    fn spawn(&mut self, kind: BodyKind, state: BodyState, scale: f64) {
        self.bodies.push(SimBody {
            id: self.next_id,
            kind,
            state,
            orbiter: Orbiter::new(scale),
        });
        self.next_id += 1;
    }

    fn tick(&mut self, dt: f64) {
        let field = common::earth_field();
        let physics = PhysicsConfig::default();
        for body in &mut self.bodies {
            advance_orbiter(&mut body.state, &mut body.orbiter, None, None, field, dt, &physics);
        }

        let mut snapshot = vec![CollisionCandidate::central(
            CENTRAL_ID,
            BodyState::default(),
            common::earth(),
        )];
        snapshot.extend(self.bodies.iter().map(|b| {
            CollisionCandidate::orbiter(b.id, b.kind, b.state, b.orbiter.image_scale)
        }));

        let resolution = resolve_collisions(&snapshot, &self.config, &mut self.outcome);

        self.crashes += resolution
            .reports
            .iter()
            .filter(|r| r.mode == ContactMode::Crash)
            .count();
        self.bodies.retain(|b| !resolution.removed.contains(&b.id));
        for debris in resolution.debris {
            self.spawn(BodyKind::Debris, debris.state, debris.image_scale);
        }
    }

    fn count(&self, kind: BodyKind) -> usize {
        self.bodies.iter().filter(|b| b.kind == kind).count()
    }
}

/// Player on a 400 km orbit, target `separation` m further out and
/// `closing_speed` m/s faster.
fn contact_pair(separation: f64, closing_speed: f64) -> [(BodyKind, BodyState); 2] {
    let player = common::circular_orbit(400.0e3);
    let target = BodyState::new(
        player.pos + DVec2::new(separation, 0.0),
        player.vel + DVec2::new(0.0, closing_speed),
    );
    [(BodyKind::Player, player), (BodyKind::Target, target)]
}

#[test]
fn test_soft_contact_is_success() {
    let mut sim = Sim::new(&contact_pair(400.0e3, 800.0));

    sim.tick(10.0);

    assert_eq!(sim.outcome, MissionOutcome::Success);
    assert_eq!(sim.count(BodyKind::Player), 1);
    assert_eq!(sim.count(BodyKind::Target), 1);
    assert_eq!(sim.count(BodyKind::Debris), 0);
}

#[test]
fn test_fast_contact_crashes_into_target() {
    let mut sim = Sim::new(&contact_pair(400.0e3, 1500.0));

    sim.tick(10.0);

    assert_eq!(sim.outcome, MissionOutcome::CrashedIntoTarget);
    assert_eq!(sim.count(BodyKind::Player), 0);
    assert_eq!(sim.count(BodyKind::Target), 0);
    assert_eq!(sim.count(BodyKind::Debris), 14);
}

#[test]
fn test_debris_from_crash_never_interacts_with_itself() {
    let mut sim = Sim::new(&contact_pair(400.0e3, 1500.0));
    sim.tick(10.0);
    assert_eq!(sim.count(BodyKind::Debris), 14);

    // Fragments start overlapping; they must all survive their own company
    for _ in 0..10 {
        sim.tick(1.0);
    }
    assert_eq!(sim.count(BodyKind::Debris), 14);
    assert_eq!(sim.crashes, 1);
}

#[test]
fn test_player_deorbits() {
    // Apoapsis start at 300 km with 90% of circular speed; periapsis is far
    // below the atmosphere.
    let mut start = common::circular_orbit(300.0e3);
    start.vel *= 0.9;
    let mut sim = Sim::new(&[(BodyKind::Player, start)]);

    for _ in 0..10_000 {
        sim.tick(1.0);
        if sim.outcome.is_terminal() {
            break;
        }
    }

    assert_eq!(sim.outcome, MissionOutcome::Deorbited);
    assert_eq!(sim.count(BodyKind::Player), 0);
    assert_eq!(sim.count(BodyKind::Debris), 0, "Deorbit leaves no debris");
}

#[test]
fn test_hazard_destroys_target() {
    // Target and hazard on the same orbit in opposite directions
    let target = common::circular_orbit(600.0e3);
    let hazard = BodyState::new(-target.pos, target.vel);
    let player = BodyState::new(DVec2::new(0.0, -8.0e6), DVec2::new(7060.0, 0.0));
    let mut sim = Sim::new(&[
        (BodyKind::Player, player),
        (BodyKind::Target, target),
        (BodyKind::Hazard, hazard),
    ]);

    for _ in 0..1_000 {
        sim.tick(5.0);
        if sim.outcome.is_terminal() {
            break;
        }
    }

    assert_eq!(sim.outcome, MissionOutcome::TargetCrashedIntoHazard);
    assert_eq!(sim.count(BodyKind::Target), 0);
    assert_eq!(sim.count(BodyKind::Hazard), 0);
}

#[test]
fn test_outcome_written_once_over_many_ticks() {
    // Soft contact first; a retrograde hazard on the player's orbit
    // arrives about a quarter orbit later.
    let [player, target] = contact_pair(400.0e3, 800.0);
    let hazard = BodyState::new(-player.1.pos, player.1.vel);
    let mut sim = Sim::new(&[player, target, (BodyKind::Hazard, hazard)]);

    sim.tick(10.0);
    assert_eq!(sim.outcome, MissionOutcome::Success);

    for _ in 0..1_000 {
        sim.tick(10.0);
        assert_eq!(sim.outcome, MissionOutcome::Success);
    }

    assert!(sim.crashes >= 1, "The hazard should have hit something");
    assert_eq!(sim.count(BodyKind::Hazard), 0);
}
