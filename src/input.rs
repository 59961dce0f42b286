//! Pilot controls.
//!
//! Input arrives in two forms: [`PilotInput`] holds the state sampled each
//! tick (engine held on, pointer direction), and [`ControlMessage`]s carry
//! discrete requests (lock mode changes, time factor steps). Lock changes and
//! the firing state are applied before the physics step.
//!
//! When a window is present, [`keyboard_controls`] maps arrow keys and the
//! right mouse button onto the same surface. Headless hosts drive it directly.

use bevy::prelude::*;

use crate::body::{AngleLockMode, Spacecraft};
use crate::types::SimulationSet;

/// Pilot state sampled every tick.
#[derive(Resource, Clone, Copy, Debug, PartialEq)]
pub struct PilotInput {
    /// Engine held on.
    pub firing: bool,
    /// Pointer direction in radians from +x, used in `Free` lock mode.
    pub aim_angle: Option<f64>,
    /// Orbit overlays requested in the readout.
    pub show_orbits: bool,
}

impl Default for PilotInput {
    fn default() -> Self {
        Self {
            firing: false,
            aim_angle: None,
            show_orbits: true,
        }
    }
}

/// Discrete pilot request.
#[derive(Message, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlMessage {
    /// Step the lock mode toward prograde.
    LockUp,
    /// Step the lock mode toward retrograde.
    LockDown,
    SetLock(AngleLockMode),
    /// Multiply the time factor by one step.
    SpeedUp,
    /// Divide the time factor by one step.
    SlowDown,
    ToggleOrbits,
}

/// Plugin providing the pilot control surface.
pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PilotInput>()
            .add_message::<ControlMessage>()
            .add_systems(
                Update,
                (
                    keyboard_controls.run_if(resource_exists::<ButtonInput<KeyCode>>),
                    apply_pilot_controls,
                )
                    .chain()
                    .in_set(SimulationSet::Input),
            );
    }
}

/// Apply lock requests, the overlay toggle and the firing state.
///
/// The engine only lights while propellant remains.
pub fn apply_pilot_controls(
    mut messages: MessageReader<ControlMessage>,
    mut input: ResMut<PilotInput>,
    mut crafts: Query<&mut Spacecraft>,
) {
    let requests: Vec<ControlMessage> = messages.read().copied().collect();

    let toggles = requests
        .iter()
        .filter(|request| **request == ControlMessage::ToggleOrbits)
        .count();
    if toggles % 2 == 1 {
        input.show_orbits = !input.show_orbits;
    }

    for mut craft in crafts.iter_mut() {
        for request in &requests {
            let mode = match request {
                ControlMessage::LockUp => craft.lock_mode.step_up(),
                ControlMessage::LockDown => craft.lock_mode.step_down(),
                ControlMessage::SetLock(mode) => *mode,
                ControlMessage::SpeedUp | ControlMessage::SlowDown | ControlMessage::ToggleOrbits => {
                    continue;
                }
            };
            if mode != craft.lock_mode {
                craft.lock_mode = mode;
                info!("{}", mode.label());
            }
        }

        // Only write on change so change detection stays meaningful
        let firing = input.firing && craft.has_propellant();
        if craft.firing != firing {
            craft.set_firing(input.firing);
        }
    }
}

/// Map window input onto the pilot surface.
///
/// Up/Down cycle the lock mode and Left/Right step the time factor. Space
/// toggles orbit overlays and the right mouse button fires the engine.
fn keyboard_controls(
    keys: Res<ButtonInput<KeyCode>>,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    mut input: ResMut<PilotInput>,
    mut controls: MessageWriter<ControlMessage>,
) {
    if keys.just_pressed(KeyCode::ArrowUp) {
        controls.write(ControlMessage::LockUp);
    }
    if keys.just_pressed(KeyCode::ArrowDown) {
        controls.write(ControlMessage::LockDown);
    }
    if keys.just_pressed(KeyCode::ArrowRight) {
        controls.write(ControlMessage::SpeedUp);
    }
    if keys.just_pressed(KeyCode::ArrowLeft) {
        controls.write(ControlMessage::SlowDown);
    }
    if keys.just_pressed(KeyCode::Space) {
        controls.write(ControlMessage::ToggleOrbits);
    }

    if let Some(mouse) = mouse {
        input.firing = mouse.pressed(MouseButton::Right);
    }
}
