//! Gelato Bounce - springboard bouncing game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, springboard lifecycle, bounce law, word reveal)
//! - `config`: Injected, immutable simulation parameters
//! - `feedback`: Haptics/audio-cue routing of simulation events
//! - `schedule`: Date-keyed message schedule with optimistic concurrency
//! - `speech`: Per-word audio readiness tracking
//! - `snapshot`: Read-only per-frame view for the rendering collaborator
//! - `platform`: Browser bindings (wasm32 only)

pub mod config;
pub mod error;
pub mod feedback;
pub mod platform;
pub mod schedule;
pub mod sim;
pub mod snapshot;
pub mod speech;

pub use config::{SimConfig, WallMode, WordPolicy};
pub use error::{ConfigError, LoadError, ScheduleError, SpeechError};
pub use sim::GelatoWorld;
pub use snapshot::RenderSnapshot;

use glam::Vec2;

/// Simulation constants
pub mod consts {
    /// Reference frame duration (ms) - one 60 Hz frame
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
    /// Default cap applied to every step (ms)
    pub const MAX_STEP_MS: f32 = FRAME_MS;

    /// Downward acceleration at gravity scale 1.0 (pixels/s²)
    pub const GRAVITY_BASE: f32 = 1000.0;

    /// Velocity caps (pixels/s)
    pub const MAX_VELOCITY_X: f32 = 600.0;
    pub const MAX_VELOCITY_Y: f32 = 1400.0;

    /// Extra outward speed added by a springboard, as a fraction of impact speed
    pub const SPRING_BOOST: f32 = 0.4;
    /// Minimum time between two qualifying springboard bounces (ms)
    pub const MIN_BOUNCE_INTERVAL_MS: f64 = 300.0;
    /// Time a springboard lingers after its bounce before removal (ms)
    pub const FADE_OUT_DURATION_MS: f64 = 400.0;

    /// Springboard geometry
    pub const SPRINGBOARD_MAX_LENGTH: f32 = 200.0;
    pub const SPRINGBOARD_THICKNESS: f32 = 12.0;

    /// Mascot defaults
    pub const MASCOT_RADIUS: f32 = 30.0;

    /// Boundary slab thickness (ground and side walls)
    pub const WALL_THICKNESS: f32 = 60.0;

    /// Boundary impacts slower than this do not notify feedback (pixels/s)
    pub const BOUNDARY_EVENT_MIN_SPEED: f32 = 80.0;

    /// Default viewport (portrait phone, logical pixels)
    pub const VIEWPORT_WIDTH: f32 = 390.0;
    pub const VIEWPORT_HEIGHT: f32 = 844.0;
}

/// Unit normal of a segment oriented at `angle`: `(-sin θ, cos θ)`
#[inline]
pub fn segment_normal(angle: f32) -> Vec2 {
    Vec2::new(-angle.sin(), angle.cos())
}

/// Rotate a vector by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}
