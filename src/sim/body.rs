//! Physics bodies
//!
//! The world holds exactly one dynamic body (the mascot), three static
//! boundaries and at most one static springboard.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::Material;

/// Which boundary slab a body is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryKind {
    Ground,
    LeftWall,
    RightWall,
}

impl BoundaryKind {
    /// Stable processing order for boundary contacts
    pub const ALL: [BoundaryKind; 3] = [
        BoundaryKind::Ground,
        BoundaryKind::LeftWall,
        BoundaryKind::RightWall,
    ];

    pub fn is_side_wall(&self) -> bool {
        matches!(self, BoundaryKind::LeftWall | BoundaryKind::RightWall)
    }
}

/// Body identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "boundary", rename_all = "snake_case")]
pub enum BodyKind {
    Mascot,
    Boundary(BoundaryKind),
    Springboard,
}

/// Collision shape, centered on the body position
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Circle { radius: f32 },
    /// Oriented rectangle; `angle` rotates the local x axis (radians)
    Rect { half_extents: Vec2, angle: f32 },
}

/// A rigid body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub kind: BodyKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub shape: Shape,
    pub is_static: bool,
    pub material: Material,
}

impl Body {
    pub fn mascot(pos: Vec2, radius: f32, material: Material) -> Self {
        Self {
            kind: BodyKind::Mascot,
            pos,
            vel: Vec2::ZERO,
            shape: Shape::Circle { radius },
            is_static: false,
            material,
        }
    }

    pub fn boundary(kind: BoundaryKind, center: Vec2, half_extents: Vec2, material: Material) -> Self {
        Self {
            kind: BodyKind::Boundary(kind),
            pos: center,
            vel: Vec2::ZERO,
            shape: Shape::Rect {
                half_extents,
                angle: 0.0,
            },
            is_static: true,
            material,
        }
    }

    pub fn springboard(center: Vec2, half_extents: Vec2, angle: f32, material: Material) -> Self {
        Self {
            kind: BodyKind::Springboard,
            pos: center,
            vel: Vec2::ZERO,
            shape: Shape::Rect {
                half_extents,
                angle,
            },
            is_static: true,
            material,
        }
    }

    /// Circle radius (0 for rectangles)
    pub fn radius(&self) -> f32 {
        match self.shape {
            Shape::Circle { radius } => radius,
            Shape::Rect { .. } => 0.0,
        }
    }

    /// Axis-aligned bounding box as (min, max)
    pub fn aabb(&self) -> (Vec2, Vec2) {
        match self.shape {
            Shape::Circle { radius } => (self.pos - Vec2::splat(radius), self.pos + Vec2::splat(radius)),
            Shape::Rect {
                half_extents,
                angle,
            } => {
                let (sin, cos) = angle.sin_cos();
                let extent = Vec2::new(
                    half_extents.x * cos.abs() + half_extents.y * sin.abs(),
                    half_extents.x * sin.abs() + half_extents.y * cos.abs(),
                );
                (self.pos - extent, self.pos + extent)
            }
        }
    }

    /// Rectangle view for the rendering collaborator (None for circles)
    pub fn obstacle(&self) -> Option<Obstacle> {
        match self.shape {
            Shape::Rect {
                half_extents,
                angle,
            } => Some(Obstacle {
                kind: self.kind,
                center: self.pos,
                size: half_extents * 2.0,
                angle,
            }),
            Shape::Circle { .. } => None,
        }
    }
}

/// Static rectangle as drawn by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: BodyKind,
    pub center: Vec2,
    /// Full width/height
    pub size: Vec2,
    pub angle: f32,
}

/// Test whether two bounding boxes overlap
#[inline]
pub fn aabb_overlap(a: (Vec2, Vec2), b: (Vec2, Vec2)) -> bool {
    a.0.x <= b.1.x && a.1.x >= b.0.x && a.0.y <= b.1.y && a.1.y >= b.0.y
}
