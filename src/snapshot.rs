//! Read-only frame snapshot for the rendering collaborator
//!
//! The core never draws; the renderer polls one of these per frame.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::{BounceImpact, GelatoWorld, LineData, Obstacle, RevealedWord};

/// Mascot pose
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MascotView {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

/// Everything the renderer reads in a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    /// Simulation time (ms)
    pub time_ms: f64,
    pub mascot: MascotView,
    pub obstacles: Vec<Obstacle>,
    pub springboard: Option<LineData>,
    /// For the springboard entrance animation
    pub springboard_created_at: Option<f64>,
    pub bounce_impact: Option<BounceImpact>,
    pub current_word: Option<RevealedWord>,
}

impl RenderSnapshot {
    pub fn capture(world: &GelatoWorld) -> Self {
        let mascot = world.mascot();
        Self {
            time_ms: world.now_ms(),
            mascot: MascotView {
                position: mascot.pos,
                velocity: mascot.vel,
                radius: mascot.radius(),
            },
            obstacles: world.obstacles(),
            springboard: world.springboard_line_data(),
            springboard_created_at: world.springboard_creation_time(),
            bounce_impact: world.bounce_impact(),
            current_word: world.current_word().cloned(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Fade progress of the spent springboard (0 = just bounced, 1 = gone)
    pub fn fade_progress(&self, fade_out_duration_ms: f64) -> Option<f32> {
        let impact = self.bounce_impact?;
        if fade_out_duration_ms <= 0.0 {
            return Some(1.0);
        }
        Some(((self.time_ms - impact.timestamp) / fade_out_duration_ms).clamp(0.0, 1.0) as f32)
    }
}

impl GelatoWorld {
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(self)
    }
}
