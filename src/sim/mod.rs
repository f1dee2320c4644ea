//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Capped timestep only, simulation clock for every timestamp
//! - Stable contact order (ground, left wall, right wall, springboard)
//! - No rendering, audio or platform dependencies

pub mod body;
pub mod collision;
pub mod message;
pub mod springboard;
pub mod state;
pub mod tick;
pub mod words;

pub use body::{Body, BodyKind, BoundaryKind, Obstacle, Shape};
pub use collision::{CollisionResult, SpringBounce, circle_rect_collision, spring_bounce};
pub use message::{LoadTicket, MessageReady, MessageState, ReadyOutcome};
pub use springboard::{BounceGate, BounceImpact, LineData, RemovalReason, Springboard};
pub use state::{GameEvent, GelatoWorld, boundary_layout};
pub use tick::cap_velocity;
pub use words::{RevealedWord, WordSequence};
