//! Simulation time control.
//!
//! Simulation time advances by real frame time multiplied by the time
//! factor. The factor changes in multiplicative steps and only when the
//! result stays within its bounds; an out-of-range step is refused, not
//! clamped. Requests arrive as [`ControlMessage`]s and are applied after
//! the tick, so a tick always runs with a single factor.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::input::ControlMessage;
use crate::types::SimulationSet;

/// Time factor bounds and step.
#[derive(Resource, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Time factor at mission start. Default: 1.
    pub initial_factor: f64,
    /// Multiplier applied per speed-up or slow-down step. Default: 10.
    pub step_multiplier: f64,
    /// Default: 1.
    pub min_factor: f64,
    /// Default: 1000.
    pub max_factor: f64,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            initial_factor: 1.0,
            step_multiplier: 10.0,
            min_factor: 1.0,
            max_factor: 1000.0,
        }
    }
}

/// What the physics step did on the most recent tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum TickStatus {
    /// No mission loaded, nothing integrated.
    #[default]
    Idle,
    /// Bodies were integrated by `dt` simulated seconds.
    Advanced { dt: f64 },
    /// The frame took too long and the whole tick was skipped.
    Stalled,
}

/// Current time factor and tick bookkeeping.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct TimeControl {
    /// Simulated seconds per real second.
    pub factor: f64,
    /// Simulated seconds since mission start.
    pub elapsed: f64,
    pub last_tick: TickStatus,
    /// Ticks skipped by the stall guard since mission start.
    pub stalled_ticks: u64,
}

impl Default for TimeControl {
    fn default() -> Self {
        Self::new(&TimeConfig::default())
    }
}

impl TimeControl {
    pub fn new(config: &TimeConfig) -> Self {
        Self {
            factor: config.initial_factor,
            elapsed: 0.0,
            last_tick: TickStatus::Idle,
            stalled_ticks: 0,
        }
    }

    /// Multiply the factor by one step if the result is within bounds.
    ///
    /// Returns `true` if the factor changed.
    pub fn speed_up(&mut self, config: &TimeConfig) -> bool {
        self.try_set(self.factor * config.step_multiplier, config)
    }

    /// Divide the factor by one step if the result is within bounds.
    ///
    /// Returns `true` if the factor changed.
    pub fn slow_down(&mut self, config: &TimeConfig) -> bool {
        self.try_set(self.factor / config.step_multiplier, config)
    }

    fn try_set(&mut self, factor: f64, config: &TimeConfig) -> bool {
        if factor < config.min_factor || factor > config.max_factor {
            return false;
        }
        self.factor = factor;
        true
    }

    /// Return to mission-start state.
    pub fn reset(&mut self, config: &TimeConfig) {
        *self = Self::new(config);
    }
}

/// Run condition: the physics step integrated bodies this tick.
pub fn tick_advanced(time_control: Res<TimeControl>) -> bool {
    matches!(time_control.last_tick, TickStatus::Advanced { .. })
}

/// Plugin providing the time factor and tick status.
pub struct TimePlugin;

impl Plugin for TimePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TimeConfig>()
            .init_resource::<TimeControl>()
            .add_systems(Update, apply_time_controls.in_set(SimulationSet::Readout));
    }
}

/// Apply speed-up and slow-down requests received this tick.
pub fn apply_time_controls(
    mut messages: MessageReader<ControlMessage>,
    config: Res<TimeConfig>,
    mut time_control: ResMut<TimeControl>,
) {
    for message in messages.read() {
        let changed = match message {
            ControlMessage::SpeedUp => time_control.speed_up(&config),
            ControlMessage::SlowDown => time_control.slow_down(&config),
            _ => continue,
        };

        if changed {
            info!("Time factor: {}x", time_control.factor);
        } else {
            debug!("Time factor stays at {}x", time_control.factor);
        }
    }
}
