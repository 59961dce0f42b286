//! Mission outcome state machine.
//!
//! A mission starts `Ongoing` and moves to exactly one terminal state.
//! The first terminal cause wins: once set, the outcome is never
//! overwritten for the rest of the mission, even though collisions keep
//! being resolved and bodies keep moving.

use bevy::prelude::*;

use crate::types::BodyKind;

/// How (or whether) the mission has ended.
#[derive(Resource, Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MissionOutcome {
    /// Mission still in progress.
    #[default]
    Ongoing,
    /// Player reached the target at a safe relative speed.
    Success,
    /// Player entered the central body's atmosphere.
    Deorbited,
    /// Player hit the target too fast.
    CrashedIntoTarget,
    /// Player hit a hazard.
    CrashedIntoHazard,
    /// Player hit debris.
    CrashedIntoDebris,
    /// Target was destroyed by a hazard.
    TargetCrashedIntoHazard,
    /// Target was destroyed by debris.
    TargetCrashedIntoDebris,
}

impl MissionOutcome {
    /// Returns true once the mission has ended.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MissionOutcome::Ongoing)
    }

    /// Returns true if the mission ended in a successful rendezvous.
    pub fn is_success(&self) -> bool {
        matches!(self, MissionOutcome::Success)
    }

    /// Returns true if the mission ended in failure.
    pub fn is_failure(&self) -> bool {
        self.is_terminal() && !self.is_success()
    }

    /// Record a terminal outcome if the mission is still ongoing.
    ///
    /// Returns `true` if the outcome changed.
    pub fn record(&mut self, outcome: MissionOutcome) -> bool {
        if self.is_terminal() || !outcome.is_terminal() {
            return false;
        }
        *self = outcome;
        true
    }

    /// End-screen headline.
    pub fn headline(&self) -> &'static str {
        match self {
            MissionOutcome::Ongoing => "Mission in progress.",
            MissionOutcome::Success => "Mission successful!",
            _ => "Mission failed.",
        }
    }

    /// End-screen explanation of the failure cause, if any.
    pub fn summary(&self) -> Option<&'static str> {
        match self {
            MissionOutcome::Ongoing | MissionOutcome::Success => None,
            MissionOutcome::Deorbited => Some("You deorbited."),
            MissionOutcome::CrashedIntoTarget => {
                Some("You collided with the target at high velocity.")
            }
            MissionOutcome::CrashedIntoHazard => {
                Some("You collided with another orbiting body at high velocity.")
            }
            MissionOutcome::CrashedIntoDebris => Some("You collided with debris."),
            MissionOutcome::TargetCrashedIntoHazard => {
                Some("The target has been hit by another orbiting body.")
            }
            MissionOutcome::TargetCrashedIntoDebris => Some("The target has been hit by debris."),
        }
    }
}

/// Terminal outcome caused by a high-speed crash between two kinds of body.
///
/// Symmetric in its arguments. Returns `None` for crashes that do not
/// involve the player or the target (for example hazard against debris).
pub fn crash_outcome(a: BodyKind, b: BodyKind) -> Option<MissionOutcome> {
    use BodyKind::*;

    match (a, b) {
        (Player, Target) | (Target, Player) => Some(MissionOutcome::CrashedIntoTarget),
        (Player, Hazard) | (Hazard, Player) => Some(MissionOutcome::CrashedIntoHazard),
        (Player, Debris) | (Debris, Player) => Some(MissionOutcome::CrashedIntoDebris),
        (Target, Hazard) | (Hazard, Target) => Some(MissionOutcome::TargetCrashedIntoHazard),
        (Target, Debris) | (Debris, Target) => Some(MissionOutcome::TargetCrashedIntoDebris),
        _ => None,
    }
}

/// Returns true for the pair that completes the mission on soft contact.
pub fn is_rendezvous_pair(a: BodyKind, b: BodyKind) -> bool {
    matches!(
        (a, b),
        (BodyKind::Player, BodyKind::Target) | (BodyKind::Target, BodyKind::Player)
    )
}
