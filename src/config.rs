//! Simulation configuration loaded from JSON.
//!
//! Every section and field is optional; anything missing keeps its default.
//! The values are fixed for the whole run.

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::collision::CollisionConfig;
use crate::physics::PhysicsConfig;
use crate::time::TimeConfig;

/// Errors raised while loading or validating configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid {field}: {value} ({reason})")]
    Invalid {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// All tunable parameters of the simulation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendezvousConfig {
    pub physics: PhysicsConfig,
    pub collision: CollisionConfig,
    pub time: TimeConfig,
}

impl RendezvousConfig {
    /// Read and validate a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate config from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let require = |ok: bool, field: &'static str, value: f64, reason: &'static str| {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, value, reason })
            }
        };

        let physics = &self.physics;
        require(physics.max_frame_seconds > 0.0, "physics.max_frame_seconds", physics.max_frame_seconds, "must be positive")?;
        require(physics.min_separation >= 0.0, "physics.min_separation", physics.min_separation, "must not be negative")?;

        let collision = &self.collision;
        require(collision.collision_distance > 0.0, "collision.collision_distance", collision.collision_distance, "must be positive")?;
        require(collision.safe_speed >= 0.0, "collision.safe_speed", collision.safe_speed, "must not be negative")?;
        require(
            collision.atmosphere_margin_factor >= 0.0,
            "collision.atmosphere_margin_factor",
            collision.atmosphere_margin_factor,
            "must not be negative",
        )?;
        require(
            collision.debris_count % 2 == 1,
            "collision.debris_count",
            f64::from(collision.debris_count),
            "must be odd",
        )?;
        require(
            collision.debris_scale_factor > 0.0,
            "collision.debris_scale_factor",
            collision.debris_scale_factor,
            "must be positive",
        )?;
        require(
            collision.approach_range_factor >= 1.0,
            "collision.approach_range_factor",
            collision.approach_range_factor,
            "must be at least 1",
        )?;

        let time = &self.time;
        require(time.min_factor > 0.0, "time.min_factor", time.min_factor, "must be positive")?;
        require(time.max_factor >= time.min_factor, "time.max_factor", time.max_factor, "must not be below time.min_factor")?;
        require(time.step_multiplier > 1.0, "time.step_multiplier", time.step_multiplier, "must be greater than 1")?;
        require(
            (time.min_factor..=time.max_factor).contains(&time.initial_factor),
            "time.initial_factor",
            time.initial_factor,
            "must be within [time.min_factor, time.max_factor]",
        )?;

        Ok(())
    }

    /// Insert every section as a resource.
    pub fn insert_into(self, app: &mut App) {
        app.insert_resource(self.physics)
            .insert_resource(self.collision)
            .insert_resource(self.time);
    }
}
