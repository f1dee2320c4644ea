//! Springboard ("Gelato") geometry and lifecycle records
//!
//! A springboard is a player-drawn segment turned into a thin static
//! rectangle. Only one exists at a time; the world stores it as an
//! `Option<Springboard>` so replacing it is a single assignment.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use crate::config::{Material, SimConfig};

/// Endpoints handed to the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineData {
    pub start: Vec2,
    pub end: Vec2,
}

impl LineData {
    /// Build a segment from a drag, clamping its length to `max_length`.
    ///
    /// The start point never moves; the end point is pulled toward it.
    /// Returns `None` for zero-length or non-finite input.
    pub fn clamped(start: Vec2, end: Vec2, max_length: f32) -> Option<Self> {
        if !start.is_finite() || !end.is_finite() {
            return None;
        }

        let delta = end - start;
        let length = delta.length();
        if length <= f32::EPSILON {
            return None;
        }

        let end = if length > max_length {
            start + delta * (max_length / length)
        } else {
            end
        };
        Some(Self { start, end })
    }

    pub fn center(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Orientation of the segment (radians, start → end)
    pub fn angle(&self) -> f32 {
        let delta = self.end - self.start;
        delta.y.atan2(delta.x)
    }
}

/// Record of the most recent qualifying bounce
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BounceImpact {
    pub position: Vec2,
    /// |impact speed| along the springboard normal (pixels/s)
    pub strength: f32,
    /// Simulation time of the bounce (ms)
    pub timestamp: f64,
}

/// Why a springboard left the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalReason {
    /// Fade after a bounce completed
    Faded,
    /// Replaced by a newly drawn springboard
    Replaced,
    /// Removed by the host (e.g. navigating away)
    Destroyed,
}

/// The single live springboard
#[derive(Debug, Clone)]
pub struct Springboard {
    pub line: LineData,
    pub body: Body,
    /// Simulation time of creation (ms), for the entrance animation
    pub created_at: f64,
    /// Set once the springboard has delivered its bounce; it no longer collides
    pub impact: Option<BounceImpact>,
}

impl Springboard {
    pub fn new(line: LineData, config: &SimConfig, now: f64) -> Self {
        let half_extents = Vec2::new(line.length() * 0.5, config.springboard_thickness * 0.5);
        Self {
            line,
            body: Body::springboard(line.center(), half_extents, line.angle(), Material::SPRINGBOARD),
            created_at: now,
            impact: None,
        }
    }

    /// A fading springboard has spent its bounce
    pub fn is_fading(&self) -> bool {
        self.impact.is_some()
    }

    pub fn angle(&self) -> f32 {
        self.line.angle()
    }

    /// Whether the fade that started at the impact has run its course
    pub fn fade_complete(&self, now: f64, fade_out_duration_ms: f64) -> bool {
        self.impact
            .is_some_and(|impact| now - impact.timestamp >= fade_out_duration_ms)
    }
}

/// Global minimum-interval gate for qualifying bounces
#[derive(Debug, Clone, Default)]
pub struct BounceGate {
    last_bounce_ms: Option<f64>,
}

impl BounceGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a bounce at `now` unless one was admitted less than
    /// `min_interval_ms` ago. Admitting records `now` as the last bounce.
    pub fn try_admit(&mut self, now: f64, min_interval_ms: f64) -> bool {
        if let Some(last) = self.last_bounce_ms {
            if now - last < min_interval_ms {
                return false;
            }
        }
        self.last_bounce_ms = Some(now);
        true
    }

    pub fn last_bounce_ms(&self) -> Option<f64> {
        self.last_bounce_ms
    }

    pub fn reset(&mut self) {
        self.last_bounce_ms = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Shape;

    #[test]
    fn test_clamp_preserves_start() {
        let line = LineData::clamped(Vec2::ZERO, Vec2::new(300.0, 0.0), 150.0).unwrap();
        assert_eq!(line.start, Vec2::ZERO);
        assert!((line.end - Vec2::new(150.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_short_segment_untouched() {
        let line = LineData::clamped(Vec2::new(10.0, 10.0), Vec2::new(40.0, 50.0), 150.0).unwrap();
        assert_eq!(line.end, Vec2::new(40.0, 50.0));
        assert!((line.length() - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_clamp_diagonal_exact_length() {
        let line = LineData::clamped(Vec2::new(5.0, 5.0), Vec2::new(305.0, 405.0), 100.0).unwrap();
        assert!((line.length() - 100.0).abs() < 1e-3);
        assert_eq!(line.start, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_zero_length_rejected() {
        assert!(LineData::clamped(Vec2::ONE, Vec2::ONE, 150.0).is_none());
        assert!(LineData::clamped(Vec2::ZERO, Vec2::new(f32::NAN, 0.0), 150.0).is_none());
    }

    #[test]
    fn test_springboard_body_matches_line() {
        let config = SimConfig::default();
        let line = LineData::clamped(Vec2::new(0.0, 100.0), Vec2::new(100.0, 100.0), 150.0).unwrap();
        let board = Springboard::new(line, &config, 42.0);
        assert_eq!(board.body.pos, Vec2::new(50.0, 100.0));
        assert_eq!(board.created_at, 42.0);
        match board.body.shape {
            Shape::Rect { half_extents, angle } => {
                assert!((half_extents.x - 50.0).abs() < 1e-4);
                assert!(angle.abs() < 1e-6);
            }
            Shape::Circle { .. } => panic!("springboard must be a rectangle"),
        }
    }

    #[test]
    fn test_fade_complete() {
        let config = SimConfig::default();
        let line = LineData::clamped(Vec2::ZERO, Vec2::new(100.0, 0.0), 150.0).unwrap();
        let mut board = Springboard::new(line, &config, 0.0);
        assert!(!board.fade_complete(10_000.0, 400.0));

        board.impact = Some(BounceImpact {
            position: Vec2::ZERO,
            strength: 1.0,
            timestamp: 100.0,
        });
        assert!(board.is_fading());
        assert!(!board.fade_complete(499.0, 400.0));
        assert!(board.fade_complete(500.0, 400.0));
    }

    #[test]
    fn test_bounce_gate_debounce() {
        let mut gate = BounceGate::new();
        assert!(gate.try_admit(1000.0, 300.0));
        assert!(!gate.try_admit(1299.0, 300.0));
        // Rejected attempt does not move the timer
        assert_eq!(gate.last_bounce_ms(), Some(1000.0));
        assert!(gate.try_admit(1301.0, 300.0));
        assert_eq!(gate.last_bounce_ms(), Some(1301.0));
    }

    #[test]
    fn test_bounce_gate_first_bounce_always_admitted() {
        let mut gate = BounceGate::new();
        assert!(gate.try_admit(0.0, 300.0));
        gate.reset();
        assert!(gate.try_admit(1.0, 300.0));
    }
}
