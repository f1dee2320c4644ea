//! Per-frame simulation step
//!
//! Order within a step: advance clock → integrate mascot → resolve boundary
//! contacts → resolve springboard contact (bounce law, impact, word reveal)
//! → cap velocity → expire a faded springboard.

use glam::Vec2;

use super::body::BoundaryKind;
use super::collision::{body_collision, boundary_response, spring_bounce};
use super::springboard::{BounceImpact, RemovalReason};
use super::state::{GameEvent, GelatoWorld};
use crate::config::{SimConfig, WallMode};
use crate::consts::FRAME_MS;
use crate::segment_normal;

/// Boundary impacts slower than this come to rest instead of bouncing (pixels/s)
pub const REST_SPEED: f32 = 40.0;

impl GelatoWorld {
    /// Advance the simulation by `delta_ms`, capped to `max_step_ms`.
    ///
    /// Never fails: degraded states (no message, no springboard) simply
    /// produce no reveals.
    pub fn step(&mut self, delta_ms: f32) {
        if !self.is_alive() {
            return;
        }

        let dt_ms = if delta_ms.is_finite() {
            delta_ms.clamp(0.0, self.config.max_step_ms)
        } else {
            0.0
        };
        self.now_ms += dt_ms as f64;
        self.step_count += 1;

        if dt_ms > 0.0 {
            integrate(self, dt_ms);
        }
        resolve_boundaries(self);
        resolve_springboard(self);
        cap_velocity(&mut self.mascot.vel, &self.config);
        expire_springboard(self);
    }
}

/// Clamp each velocity component to its configured limit
#[inline]
pub fn cap_velocity(vel: &mut Vec2, config: &SimConfig) {
    vel.x = vel.x.clamp(-config.max_velocity_x, config.max_velocity_x);
    vel.y = vel.y.clamp(-config.max_velocity_y, config.max_velocity_y);
}

/// Semi-implicit Euler: gravity and air drag, cap, then move
fn integrate(world: &mut GelatoWorld, dt_ms: f32) {
    let dt = dt_ms / 1000.0;
    let gravity = world.config.gravity();
    let mascot = &mut world.mascot;

    mascot.vel.y += gravity * dt;

    // Air friction is specified per reference frame
    let air = mascot.material.friction_air;
    if air > 0.0 {
        mascot.vel *= (1.0 - air).powf(dt_ms / FRAME_MS);
    }

    cap_velocity(&mut mascot.vel, &world.config);
    mascot.pos += mascot.vel * dt;

    if world.config.wall_mode == WallMode::Wrap {
        let radius = mascot.radius();
        wrap_horizontal(&mut mascot.pos, radius, world.viewport.x);
    }
}

/// Re-enter from the opposite side once fully off-screen
fn wrap_horizontal(pos: &mut Vec2, radius: f32, width: f32) {
    if pos.x + radius < 0.0 {
        pos.x += width + 2.0 * radius;
    } else if pos.x - radius > width {
        pos.x -= width + 2.0 * radius;
    }
}

/// Mascot vs ground and side walls. Not debounced.
fn resolve_boundaries(world: &mut GelatoWorld) {
    for (index, kind) in BoundaryKind::ALL.into_iter().enumerate() {
        if kind.is_side_wall() && world.config.wall_mode == WallMode::Wrap {
            continue;
        }

        let boundary = &world.boundaries[index];
        let contact = body_collision(&world.mascot, boundary);
        if !contact.hit {
            continue;
        }

        let restitution = world.mascot.material.restitution.max(boundary.material.restitution);
        let friction = world.mascot.material.friction.min(boundary.material.friction);

        world.mascot.pos += contact.normal * contact.penetration;

        let Some((mut vel, speed)) = boundary_response(world.mascot.vel, contact.normal, restitution, friction)
        else {
            continue;
        };

        if speed < REST_SPEED {
            // Settle instead of jittering on the surface
            vel -= contact.normal * vel.dot(contact.normal);
        }
        world.mascot.vel = vel;

        if speed >= world.config.boundary_event_min_speed {
            world.events.push(GameEvent::BoundaryBounce { boundary: kind, speed });
        }
    }
}

/// Mascot vs the live springboard: debounce, bounce law, impact, word reveal
fn resolve_springboard(world: &mut GelatoWorld) {
    let Some(board) = world.springboard.as_mut() else {
        return;
    };
    // A spent springboard only fades
    if board.is_fading() {
        return;
    }

    let contact = body_collision(&world.mascot, &board.body);
    if !contact.hit {
        return;
    }
    // Only a mascot moving into the face it touches bounces; end-cap
    // contacts have no face side and are ignored
    let face_normal = segment_normal(board.angle());
    let side = contact.normal.dot(face_normal);
    if world.mascot.vel.dot(contact.normal) >= 0.0 || world.mascot.vel.dot(face_normal) * side >= 0.0 {
        return;
    }

    let now = world.now_ms;
    if !world.gate.try_admit(now, world.config.min_interval_ms) {
        log::trace!("Springboard contact at {now:.1}ms debounced");
        return;
    }

    let bounce = spring_bounce(world.mascot.vel, board.angle(), world.config.spring_boost);
    let impact = BounceImpact {
        position: world.mascot.pos,
        strength: bounce.impact_speed.abs(),
        timestamp: now,
    };
    world.mascot.vel = bounce.velocity;
    // Reveal carries the velocity the mascot actually leaves with
    cap_velocity(&mut world.mascot.vel, &world.config);
    world.mascot.pos += contact.normal * contact.penetration;
    board.impact = Some(impact);

    let word = if world.message_state.is_ready() {
        world.words.advance(now, world.mascot.vel.y).cloned()
    } else {
        None
    };

    log::debug!(
        "Bounce at {now:.1}ms: strength {:.1}, word {:?}",
        impact.strength,
        word.as_ref().map(|w| w.word.as_str())
    );
    world.events.push(GameEvent::QualifyingBounce { impact, word });
}

/// Remove the springboard (and with it the impact) once its fade has elapsed
fn expire_springboard(world: &mut GelatoWorld) {
    let expired = world
        .springboard
        .as_ref()
        .is_some_and(|board| board.fade_complete(world.now_ms, world.config.fade_out_duration_ms));

    if expired {
        world.springboard = None;
        world.events.push(GameEvent::SpringboardRemoved {
            reason: RemovalReason::Faded,
        });
        log::debug!("Springboard faded out at {:.1}ms", world.now_ms);
    }
}
