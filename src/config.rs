//! Simulation configuration
//!
//! Injected into [`crate::GelatoWorld`] at construction and never mutated
//! afterwards. Loadable from JSON so tuning can live outside the binary.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// How the mascot interacts with the side walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WallMode {
    /// Side walls reflect the mascot using their restitution
    #[default]
    Bounce,
    /// Mascot leaving one side re-enters from the other
    Wrap,
}

impl WallMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WallMode::Bounce => "bounce",
            WallMode::Wrap => "wrap",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bounce" => Some(WallMode::Bounce),
            "wrap" => Some(WallMode::Wrap),
            _ => None,
        }
    }
}

/// What the word pointer does once the last word has been revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WordPolicy {
    /// Stay on the last word; further bounces reveal nothing
    #[default]
    Clamp,
    /// Start over from the first word
    Wrap,
}

/// Physical material of a body
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Bounciness (0 = dead stop, 1 = perfectly elastic)
    pub restitution: f32,
    /// Tangential damping applied on boundary contact (0-1)
    pub friction: f32,
    /// Velocity damping per reference frame while airborne (0-1)
    pub friction_air: f32,
    pub mass: f32,
}

impl Material {
    pub const MASCOT: Material = Material {
        restitution: 0.6,
        friction: 0.05,
        friction_air: 0.01,
        mass: 1.0,
    };

    pub const BOUNDARY: Material = Material {
        restitution: 0.5,
        friction: 0.1,
        friction_air: 0.0,
        mass: 0.0,
    };

    pub const SPRINGBOARD: Material = Material {
        restitution: 1.0,
        friction: 0.0,
        friction_air: 0.0,
        mass: 0.0,
    };
}

/// Complete simulation parameter set
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Integration ===
    /// Gravity multiplier applied to [`GRAVITY_BASE`]
    pub gravity_scale: f32,
    /// Largest timestep a single `step` will simulate (ms)
    pub max_step_ms: f32,
    pub max_velocity_x: f32,
    pub max_velocity_y: f32,

    // === Springboard ===
    pub spring_boost: f32,
    pub min_interval_ms: f64,
    pub max_length: f32,
    pub springboard_thickness: f32,
    pub fade_out_duration_ms: f64,

    // === Mascot ===
    pub mascot_radius: f32,
    pub mascot_material: Material,
    /// Spawn point as a fraction of the viewport (0-1 on each axis)
    pub spawn_fraction: Vec2,

    // === Boundaries ===
    pub boundary_material: Material,
    pub wall_thickness: f32,
    pub wall_mode: WallMode,
    pub boundary_event_min_speed: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,

    // === Words ===
    pub word_policy: WordPolicy,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            gravity_scale: 1.0,
            max_step_ms: MAX_STEP_MS,
            max_velocity_x: MAX_VELOCITY_X,
            max_velocity_y: MAX_VELOCITY_Y,

            spring_boost: SPRING_BOOST,
            min_interval_ms: MIN_BOUNCE_INTERVAL_MS,
            max_length: SPRINGBOARD_MAX_LENGTH,
            springboard_thickness: SPRINGBOARD_THICKNESS,
            fade_out_duration_ms: FADE_OUT_DURATION_MS,

            mascot_radius: MASCOT_RADIUS,
            mascot_material: Material::MASCOT,
            spawn_fraction: Vec2::new(0.5, 0.25),

            boundary_material: Material::BOUNDARY,
            wall_thickness: WALL_THICKNESS,
            wall_mode: WallMode::Bounce,
            boundary_event_min_speed: BOUNDARY_EVENT_MIN_SPEED,
            viewport_width: VIEWPORT_WIDTH,
            viewport_height: VIEWPORT_HEIGHT,

            word_policy: WordPolicy::Clamp,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Downward acceleration in pixels/s²
    pub fn gravity(&self) -> f32 {
        self.gravity_scale * GRAVITY_BASE
    }

    /// Reject parameter sets the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be positive, got {value}"),
                })
            }
        }

        fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be non-negative, got {value}"),
                })
            }
        }

        fn unit(name: &'static str, value: f32) -> Result<(), ConfigError> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(ConfigError::InvalidParameter {
                    name,
                    reason: format!("must be within 0..=1, got {value}"),
                })
            }
        }

        positive("max_step_ms", self.max_step_ms as f64)?;
        positive("max_velocity_x", self.max_velocity_x as f64)?;
        positive("max_velocity_y", self.max_velocity_y as f64)?;
        positive("max_length", self.max_length as f64)?;
        positive("springboard_thickness", self.springboard_thickness as f64)?;
        positive("mascot_radius", self.mascot_radius as f64)?;
        positive("wall_thickness", self.wall_thickness as f64)?;
        positive("viewport_width", self.viewport_width as f64)?;
        positive("viewport_height", self.viewport_height as f64)?;

        non_negative("gravity_scale", self.gravity_scale as f64)?;
        non_negative("spring_boost", self.spring_boost as f64)?;
        non_negative("min_interval_ms", self.min_interval_ms)?;
        non_negative("fade_out_duration_ms", self.fade_out_duration_ms)?;
        non_negative("boundary_event_min_speed", self.boundary_event_min_speed as f64)?;

        unit("mascot_material.restitution", self.mascot_material.restitution)?;
        unit("mascot_material.friction", self.mascot_material.friction)?;
        unit("mascot_material.friction_air", self.mascot_material.friction_air)?;
        unit("boundary_material.restitution", self.boundary_material.restitution)?;
        unit("boundary_material.friction", self.boundary_material.friction)?;
        unit("spawn_fraction.x", self.spawn_fraction.x)?;
        unit("spawn_fraction.y", self.spawn_fraction.y)?;

        Ok(())
    }
}
