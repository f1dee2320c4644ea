//! Collision detection and response
//!
//! Narrow phase is circle vs oriented rectangle, which covers every pair the
//! world can produce (mascot vs boundary, mascot vs springboard). Response is
//! split into the elastic boundary bounce and the springboard bounce law.

use glam::Vec2;

use super::body::{Body, Shape, aabb_overlap};
use crate::{rotate, segment_normal};

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Closest point on the rectangle (if hit)
    pub point: Vec2,
    /// Surface normal at collision, pointing from the rectangle toward the circle
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check collision between a circle and an oriented rectangle
pub fn circle_rect_collision(
    circle_pos: Vec2,
    radius: f32,
    rect_center: Vec2,
    half_extents: Vec2,
    angle: f32,
) -> CollisionResult {
    // Work in the rectangle's local frame
    let local = rotate(circle_pos - rect_center, -angle);
    let clamped = local.clamp(-half_extents, half_extents);
    let inside = clamped == local;

    if !inside {
        let delta = local - clamped;
        let dist_sq = delta.length_squared();
        if dist_sq >= radius * radius {
            return CollisionResult::miss();
        }
        let dist = dist_sq.sqrt();
        let local_normal = if dist > f32::EPSILON { delta / dist } else { Vec2::Y };
        return CollisionResult {
            hit: true,
            point: rect_center + rotate(clamped, angle),
            normal: rotate(local_normal, angle),
            penetration: radius - dist,
        };
    }

    // Center is inside the rectangle: exit through the nearest face
    let to_face_x = half_extents.x - local.x.abs();
    let to_face_y = half_extents.y - local.y.abs();
    let (local_normal, face_point, depth) = if to_face_x < to_face_y {
        let sign = if local.x < 0.0 { -1.0 } else { 1.0 };
        (
            Vec2::new(sign, 0.0),
            Vec2::new(sign * half_extents.x, local.y),
            to_face_x,
        )
    } else {
        let sign = if local.y < 0.0 { -1.0 } else { 1.0 };
        (
            Vec2::new(0.0, sign),
            Vec2::new(local.x, sign * half_extents.y),
            to_face_y,
        )
    };

    CollisionResult {
        hit: true,
        point: rect_center + rotate(face_point, angle),
        normal: rotate(local_normal, angle),
        penetration: radius + depth,
    }
}

/// Circle body vs rectangle body, with an AABB early-out
pub fn body_collision(circle: &Body, rect: &Body) -> CollisionResult {
    let (Shape::Circle { radius }, Shape::Rect { half_extents, angle }) = (circle.shape, rect.shape) else {
        return CollisionResult::miss();
    };

    if !aabb_overlap(circle.aabb(), rect.aabb()) {
        return CollisionResult::miss();
    }

    circle_rect_collision(circle.pos, radius, rect.pos, half_extents, angle)
}

/// Boundary response: reflect the approaching normal component scaled by
/// `restitution`, damp the tangential component by `friction`.
///
/// Returns the new velocity and the (positive) normal impact speed, or
/// `None` when the body is already separating.
pub fn boundary_response(velocity: Vec2, normal: Vec2, restitution: f32, friction: f32) -> Option<(Vec2, f32)> {
    let vn = velocity.dot(normal);
    if vn >= 0.0 {
        return None;
    }

    let normal_part = normal * vn;
    let tangent_part = velocity - normal_part;
    let new_vel = tangent_part * (1.0 - friction) - normal_part * restitution;
    Some((new_vel, -vn))
}

/// Outcome of the springboard bounce law
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringBounce {
    pub velocity: Vec2,
    /// Signed velocity component along the springboard normal before the bounce
    pub impact_speed: f32,
}

/// Springboard bounce law
///
/// With board angle θ and normal n = (−sin θ, cos θ), the normal velocity
/// component `impact_speed = v·n` is removed and replaced with
/// `−impact_speed × (1 + spring_boost)`. The tangential component survives.
pub fn spring_bounce(velocity: Vec2, board_angle: f32, spring_boost: f32) -> SpringBounce {
    let normal = segment_normal(board_angle);
    let impact_speed = velocity.dot(normal);
    let boost_velocity = -impact_speed * (1.0 + spring_boost);
    SpringBounce {
        velocity: velocity - normal * impact_speed + normal * boost_velocity,
        impact_speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Material;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn test_circle_above_rect_hits_with_upward_normal() {
        // Rect 100x10 centered at origin, circle radius 8 resting 5 above the top face
        let result = circle_rect_collision(Vec2::new(0.0, -10.0), 8.0, Vec2::ZERO, Vec2::new(50.0, 5.0), 0.0);
        assert!(result.hit);
        assert!((result.normal - Vec2::new(0.0, -1.0)).length() < 0.001);
        assert!((result.penetration - 3.0).abs() < 0.001);
    }

    #[test]
    fn test_circle_miss() {
        let result = circle_rect_collision(Vec2::new(0.0, -20.0), 8.0, Vec2::ZERO, Vec2::new(50.0, 5.0), 0.0);
        assert!(!result.hit);
    }

    #[test]
    fn test_rotated_rect_collision() {
        // Vertical bar (rotated 90°), circle approaching from the right
        let result = circle_rect_collision(
            Vec2::new(10.0, 0.0),
            8.0,
            Vec2::ZERO,
            Vec2::new(50.0, 5.0),
            FRAC_PI_2,
        );
        assert!(result.hit);
        assert!(result.normal.x > 0.99);
    }

    #[test]
    fn test_center_inside_rect_exits_nearest_face() {
        let result = circle_rect_collision(Vec2::new(0.0, 4.0), 8.0, Vec2::ZERO, Vec2::new(50.0, 5.0), 0.0);
        assert!(result.hit);
        assert!((result.normal - Vec2::Y).length() < 0.001);
        assert!((result.penetration - 9.0).abs() < 0.001);
    }

    #[test]
    fn test_body_collision_requires_circle_and_rect() {
        let a = Body::mascot(Vec2::ZERO, 10.0, Material::MASCOT);
        let b = Body::mascot(Vec2::ZERO, 10.0, Material::MASCOT);
        assert!(!body_collision(&a, &b).hit);
    }

    #[test]
    fn test_boundary_response_elastic_and_damped() {
        let (vel, speed) = boundary_response(Vec2::new(10.0, 20.0), Vec2::new(0.0, -1.0), 0.5, 0.1).unwrap();
        assert!((speed - 20.0).abs() < 0.001);
        assert!((vel.y + 10.0).abs() < 0.001);
        assert!((vel.x - 9.0).abs() < 0.001);
    }

    #[test]
    fn test_boundary_response_ignores_separating() {
        assert!(boundary_response(Vec2::new(0.0, -20.0), Vec2::new(0.0, -1.0), 0.5, 0.1).is_none());
    }

    #[test]
    fn test_spring_bounce_horizontal_board() {
        let bounce = spring_bounce(Vec2::new(0.0, 10.0), 0.0, 1.5);
        assert!((bounce.impact_speed - 10.0).abs() < 1e-5);
        assert!((bounce.velocity.y + 25.0).abs() < 1e-4);
        assert!(bounce.velocity.x.abs() < 1e-5);
    }

    #[test]
    fn test_spring_bounce_keeps_tangential_component() {
        let bounce = spring_bounce(Vec2::new(7.0, 10.0), 0.0, 0.0);
        assert!((bounce.velocity.x - 7.0).abs() < 1e-5);
        assert!((bounce.velocity.y + 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_spring_bounce_tilted_board() {
        // Board at 45°: normal (-√½, √½). Velocity straight along the normal.
        let n = segment_normal(FRAC_PI_4);
        let bounce = spring_bounce(n * 4.0, FRAC_PI_4, 1.0);
        assert!((bounce.impact_speed - 4.0).abs() < 1e-4);
        assert!((bounce.velocity - n * -8.0).length() < 1e-4);
    }
}
