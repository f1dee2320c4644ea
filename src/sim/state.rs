//! World state and host-facing operations
//!
//! Everything the host touches between frames lives here: springboard
//! creation/destruction, viewport resizing, message loading and the
//! read-only accessors the renderer polls. The per-frame advance is in
//! [`super::tick`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, BoundaryKind, Obstacle, Shape};
use super::message::{LoadTicket, MessageReady, MessageState, ReadyOutcome, ReadySignal};
use super::springboard::{BounceGate, BounceImpact, LineData, RemovalReason, Springboard};
use super::words::{RevealedWord, WordSequence};
use crate::config::SimConfig;
use crate::error::LoadError;

/// Discrete notifications for the haptics/audio-cue collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    SpringboardCreated { line: LineData, at: f64 },
    /// A mascot/springboard contact passed the debounce gate
    QualifyingBounce {
        impact: BounceImpact,
        word: Option<RevealedWord>,
    },
    BoundaryBounce { boundary: BoundaryKind, speed: f32 },
    SpringboardRemoved { reason: RemovalReason },
}

/// The physics & playback core
#[derive(Debug)]
pub struct GelatoWorld {
    pub(crate) config: SimConfig,
    /// Simulation clock (ms), the sum of capped steps
    pub(crate) now_ms: f64,
    pub(crate) step_count: u64,
    pub(crate) viewport: Vec2,
    pub(crate) mascot: Body,
    /// Indexed in [`BoundaryKind::ALL`] order
    pub(crate) boundaries: [Body; 3],
    pub(crate) springboard: Option<Springboard>,
    pub(crate) gate: BounceGate,
    pub(crate) message_state: MessageState,
    pub(crate) words: WordSequence,
    load_generation: u64,
    ready_signal: ReadySignal,
    pub(crate) events: Vec<GameEvent>,
    alive: bool,
}

impl GelatoWorld {
    /// Create a world sized to the configured viewport
    pub fn new(config: SimConfig) -> Self {
        let viewport = Vec2::new(config.viewport_width, config.viewport_height);
        let mascot = Body::mascot(
            viewport * config.spawn_fraction,
            config.mascot_radius,
            config.mascot_material,
        );
        let boundaries = BoundaryKind::ALL.map(|kind| {
            let (center, half_extents) = boundary_layout(kind, viewport, config.wall_thickness);
            Body::boundary(kind, center, half_extents, config.boundary_material)
        });
        let words = WordSequence::empty(config.word_policy);

        log::debug!(
            "World created: viewport {}x{}, wall mode {}",
            viewport.x,
            viewport.y,
            config.wall_mode.as_str()
        );

        Self {
            config,
            now_ms: 0.0,
            step_count: 0,
            viewport,
            mascot,
            boundaries,
            springboard: None,
            gate: BounceGate::new(),
            message_state: MessageState::NotLoaded,
            words,
            load_generation: 0,
            ready_signal: ReadySignal::new(),
            events: Vec::new(),
            alive: true,
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    // === Springboard lifecycle ===

    /// Draw a springboard from a completed drag.
    ///
    /// Any existing springboard is removed first. The segment is clamped to
    /// `max_length` (start point fixed). Zero-length input is a no-op.
    pub fn create_springboard(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) -> Option<LineData> {
        if !self.alive {
            return None;
        }

        let line = LineData::clamped(Vec2::new(x0, y0), Vec2::new(x1, y1), self.config.max_length)?;

        if self.springboard.take().is_some() {
            self.events.push(GameEvent::SpringboardRemoved {
                reason: RemovalReason::Replaced,
            });
        }
        self.springboard = Some(Springboard::new(line, &self.config, self.now_ms));
        self.events.push(GameEvent::SpringboardCreated {
            line,
            at: self.now_ms,
        });

        log::debug!(
            "Springboard created ({:.1},{:.1}) -> ({:.1},{:.1}), length {:.1}",
            line.start.x,
            line.start.y,
            line.end.x,
            line.end.y,
            line.length()
        );
        Some(line)
    }

    /// Create a springboard from the sampled points of a drag gesture.
    ///
    /// Uses the first and last points; fewer than two points is a no-op.
    pub fn create_springboard_from_gesture(&mut self, points: &[Vec2]) -> Option<LineData> {
        let (first, last) = match points {
            [first, .., last] => (*first, *last),
            _ => return None,
        };
        self.create_springboard(first.x, first.y, last.x, last.y)
    }

    /// Remove the springboard and its impact immediately, skipping any fade
    pub fn destroy_springboard(&mut self) {
        if self.springboard.take().is_some() {
            self.events.push(GameEvent::SpringboardRemoved {
                reason: RemovalReason::Destroyed,
            });
            log::debug!("Springboard destroyed");
        }
    }

    // === Boundaries ===

    /// Reposition ground and side walls for a new viewport.
    ///
    /// Leaves the mascot and springboard untouched. Invalid sizes are ignored.
    pub fn update_boundaries(&mut self, width: f32, height: f32) {
        if !self.alive {
            return;
        }
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            log::warn!("Ignoring invalid viewport size {width}x{height}");
            return;
        }

        self.viewport = Vec2::new(width, height);
        for (body, kind) in self.boundaries.iter_mut().zip(BoundaryKind::ALL) {
            let (center, half_extents) = boundary_layout(kind, self.viewport, self.config.wall_thickness);
            body.pos = center;
            body.shape = Shape::Rect {
                half_extents,
                angle: 0.0,
            };
        }
        log::debug!("Boundaries updated for {width}x{height}");
    }

    // === Mascot ===

    pub fn mascot(&self) -> &Body {
        &self.mascot
    }

    pub fn mascot_position(&self) -> Vec2 {
        self.mascot.pos
    }

    pub fn mascot_velocity(&self) -> Vec2 {
        self.mascot.vel
    }

    pub fn mascot_velocity_y(&self) -> f32 {
        self.mascot.vel.y
    }

    /// Teleport the mascot (respawn, portal exit)
    pub fn place_mascot(&mut self, pos: Vec2, vel: Vec2) {
        if !self.alive {
            return;
        }
        self.mascot.pos = pos;
        self.mascot.vel = vel;
    }

    /// Return the mascot to the spawn point at rest
    pub fn respawn_mascot(&mut self) {
        let spawn = self.viewport * self.config.spawn_fraction;
        self.place_mascot(spawn, Vec2::ZERO);
    }

    // === Read-only views ===

    /// Boundary rectangles followed by the live springboard, if any
    pub fn obstacles(&self) -> Vec<Obstacle> {
        if !self.alive {
            return Vec::new();
        }
        self.boundaries
            .iter()
            .chain(self.springboard.as_ref().map(|board| &board.body))
            .filter_map(Body::obstacle)
            .collect()
    }

    pub fn springboard(&self) -> Option<&Springboard> {
        self.springboard.as_ref()
    }

    pub fn springboard_line_data(&self) -> Option<LineData> {
        self.springboard.as_ref().map(|board| board.line)
    }

    /// Stored on the springboard, so it disappears with it
    pub fn bounce_impact(&self) -> Option<BounceImpact> {
        self.springboard.as_ref().and_then(|board| board.impact)
    }

    pub fn springboard_creation_time(&self) -> Option<f64> {
        self.springboard.as_ref().map(|board| board.created_at)
    }

    pub fn current_word(&self) -> Option<&RevealedWord> {
        self.words.current()
    }

    pub fn words(&self) -> &[String] {
        self.words.words()
    }

    pub fn last_bounce_ms(&self) -> Option<f64> {
        self.gate.last_bounce_ms()
    }

    // === Message loading ===

    pub fn message_state(&self) -> &MessageState {
        &self.message_state
    }

    /// Start a message load. Any earlier ticket becomes stale.
    ///
    /// A destroyed world refuses new loads and keeps its readiness
    /// signal cancelled.
    pub fn begin_message_load(&mut self) -> Result<LoadTicket, LoadError> {
        if !self.alive {
            return Err(LoadError::Destroyed);
        }
        self.load_generation += 1;
        if self.ready_signal.is_resolved() {
            self.ready_signal = ReadySignal::new();
        }
        self.message_state = MessageState::Loading;
        log::debug!("Message load {} started", self.load_generation);
        Ok(LoadTicket {
            generation: self.load_generation,
        })
    }

    /// Complete the load identified by `ticket`.
    ///
    /// On success the word pointer restarts and the word count is returned.
    /// A fetch failure is handed back to the caller while the core falls
    /// back to an empty sequence.
    pub fn finish_message_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<String, LoadError>,
    ) -> Result<usize, LoadError> {
        if !self.alive {
            return Err(LoadError::Destroyed);
        }
        if ticket.generation != self.load_generation {
            log::warn!(
                "Dropping stale message load {} (current {})",
                ticket.generation,
                self.load_generation
            );
            return Err(LoadError::StaleTicket {
                ticket: ticket.generation,
                current: self.load_generation,
            });
        }

        match result {
            Ok(text) => {
                self.words = WordSequence::from_text(&text, self.config.word_policy);
                self.message_state = MessageState::Ready;
                let word_count = self.words.len();
                self.ready_signal.resolve(ReadyOutcome::Ready { word_count });
                log::info!("Message loaded: {word_count} words");
                Ok(word_count)
            }
            Err(err) => {
                self.words = WordSequence::empty(self.config.word_policy);
                self.message_state = MessageState::Failed(err.to_string());
                self.ready_signal.resolve(ReadyOutcome::Failed(err.to_string()));
                log::warn!("Message load failed: {err}");
                Err(err)
            }
        }
    }

    /// Load message text that is already at hand
    pub fn set_message(&mut self, text: &str) -> Result<usize, LoadError> {
        let ticket = self.begin_message_load()?;
        self.finish_message_load(ticket, Ok(text.to_owned()))
    }

    /// Future that resolves once the current (or next) load finishes
    pub fn message_ready(&self) -> MessageReady {
        self.ready_signal.future()
    }

    // === Events ===

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    // === Teardown ===

    /// End the session: drop the springboard, clear words and events, and
    /// invalidate outstanding loads. Later calls on the world are no-ops.
    pub fn destroy(&mut self) {
        if !self.alive {
            return;
        }
        self.alive = false;
        self.springboard = None;
        self.mascot.vel = Vec2::ZERO;
        self.gate.reset();
        self.events.clear();
        self.words = WordSequence::empty(self.config.word_policy);
        self.message_state = MessageState::NotLoaded;
        self.load_generation += 1;
        self.ready_signal.resolve(ReadyOutcome::Cancelled);
        log::info!("World destroyed after {} steps", self.step_count);
    }
}

impl Default for GelatoWorld {
    fn default() -> Self {
        Self::new(SimConfig::default())
    }
}

/// Center and half-extents of a boundary slab for a viewport.
///
/// The ground's top face sits on the bottom edge of the viewport; the side
/// walls' inner faces sit on the left/right edges and extend two viewport
/// heights above the top so high bounces stay inside.
pub fn boundary_layout(kind: BoundaryKind, viewport: Vec2, thickness: f32) -> (Vec2, Vec2) {
    let half_t = thickness * 0.5;
    let wall_half_height = viewport.y * 1.5;
    let wall_center_y = viewport.y - wall_half_height;
    match kind {
        BoundaryKind::Ground => (
            Vec2::new(viewport.x * 0.5, viewport.y + half_t),
            Vec2::new(viewport.x * 0.5 + thickness, half_t),
        ),
        BoundaryKind::LeftWall => (
            Vec2::new(-half_t, wall_center_y),
            Vec2::new(half_t, wall_half_height),
        ),
        BoundaryKind::RightWall => (
            Vec2::new(viewport.x + half_t, wall_center_y),
            Vec2::new(half_t, wall_half_height),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::BodyKind;

    fn world() -> GelatoWorld {
        GelatoWorld::new(SimConfig {
            max_length: 150.0,
            ..Default::default()
        })
    }

    #[test]
    fn test_new_world_layout() {
        let w = world();
        let obstacles = w.obstacles();
        assert_eq!(obstacles.len(), 3);
        assert_eq!(obstacles[0].kind, BodyKind::Boundary(BoundaryKind::Ground));
        // Ground top face on the viewport bottom edge
        let ground_top = obstacles[0].center.y - obstacles[0].size.y / 2.0;
        assert!((ground_top - w.viewport().y).abs() < 0.001);
        assert!(w.springboard_line_data().is_none());
        assert!(w.bounce_impact().is_none());
        assert!(w.current_word().is_none());
    }

    #[test]
    fn test_length_clamp() {
        let mut w = world();
        let line = w.create_springboard(0.0, 0.0, 300.0, 0.0).unwrap();
        assert_eq!(line.start, Vec2::ZERO);
        assert!((line.end - Vec2::new(150.0, 0.0)).length() < 1e-4);
        assert_eq!(w.springboard_line_data(), Some(line));
    }

    #[test]
    fn test_second_springboard_replaces_first() {
        let mut w = world();
        w.create_springboard(10.0, 10.0, 60.0, 10.0).unwrap();
        let second = w.create_springboard(100.0, 200.0, 400.0, 200.0).unwrap();

        assert_eq!(w.springboard_line_data(), Some(second));
        assert!((second.end.x - 250.0).abs() < 1e-4);
        let boards = w
            .obstacles()
            .into_iter()
            .filter(|o| o.kind == BodyKind::Springboard)
            .count();
        assert_eq!(boards, 1);

        let events = w.drain_events();
        assert!(events.contains(&GameEvent::SpringboardRemoved {
            reason: RemovalReason::Replaced
        }));
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::SpringboardCreated { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_degenerate_gestures_are_ignored() {
        let mut w = world();
        assert!(w.create_springboard(5.0, 5.0, 5.0, 5.0).is_none());
        assert!(w.create_springboard_from_gesture(&[]).is_none());
        assert!(w.create_springboard_from_gesture(&[Vec2::ONE]).is_none());
        assert!(w.springboard_line_data().is_none());
        assert!(w.drain_events().is_empty());

        let line = w
            .create_springboard_from_gesture(&[Vec2::ZERO, Vec2::new(3.0, 3.0), Vec2::new(50.0, 0.0)])
            .unwrap();
        assert_eq!(line.end, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_destroy_springboard_clears_line_and_creation_time() {
        let mut w = world();
        w.create_springboard(0.0, 100.0, 100.0, 100.0);
        assert_eq!(w.springboard_creation_time(), Some(0.0));
        w.destroy_springboard();
        assert!(w.springboard_line_data().is_none());
        assert!(w.springboard_creation_time().is_none());
        assert!(w.bounce_impact().is_none());
    }

    #[test]
    fn test_update_boundaries_preserves_dynamic_state() {
        let mut w = world();
        w.place_mascot(Vec2::new(120.0, 300.0), Vec2::new(40.0, -90.0));
        let line = w.create_springboard(50.0, 500.0, 150.0, 520.0).unwrap();

        w.update_boundaries(800.0, 600.0);
        w.update_boundaries(800.0, 600.0);

        assert_eq!(w.mascot_position(), Vec2::new(120.0, 300.0));
        assert_eq!(w.mascot_velocity(), Vec2::new(40.0, -90.0));
        assert_eq!(w.springboard_line_data(), Some(line));
        let right = w.obstacles()[2];
        assert!((right.center.x - right.size.x / 2.0 - 800.0).abs() < 0.001);
    }

    #[test]
    fn test_update_boundaries_rejects_invalid() {
        let mut w = world();
        let before = w.viewport();
        w.update_boundaries(0.0, 100.0);
        w.update_boundaries(f32::NAN, 100.0);
        assert_eq!(w.viewport(), before);
    }

    #[test]
    fn test_message_load_lifecycle() {
        let mut w = world();
        let ready = w.message_ready();
        assert_eq!(w.message_state(), &MessageState::NotLoaded);

        let ticket = w.begin_message_load().unwrap();
        assert!(w.message_state().is_pending());
        assert_eq!(ready.outcome(), None);

        let count = w.finish_message_load(ticket, Ok("good morning sunshine".into())).unwrap();
        assert_eq!(count, 3);
        assert!(w.message_state().is_ready());
        assert_eq!(ready.outcome(), Some(ReadyOutcome::Ready { word_count: 3 }));
    }

    #[test]
    fn test_stale_ticket_rejected() {
        let mut w = world();
        let old = w.begin_message_load().unwrap();
        let current = w.begin_message_load().unwrap();

        let err = w.finish_message_load(old, Ok("late".into())).unwrap_err();
        assert!(matches!(err, LoadError::StaleTicket { .. }));
        assert!(w.message_state().is_pending());

        w.finish_message_load(current, Ok("fresh".into())).unwrap();
        assert_eq!(w.words(), ["fresh"]);
    }

    #[test]
    fn test_failed_load_falls_back_to_empty() {
        let mut w = world();
        w.set_message("previous words").unwrap();
        let ticket = w.begin_message_load().unwrap();
        let ready = w.message_ready();

        let err = w
            .finish_message_load(ticket, Err(LoadError::Fetch("offline".into())))
            .unwrap_err();
        assert!(matches!(err, LoadError::Fetch(_)));
        assert!(w.words().is_empty());
        assert!(matches!(w.message_state(), MessageState::Failed(_)));
        assert!(matches!(ready.outcome(), Some(ReadyOutcome::Failed(_))));
    }

    #[test]
    fn test_destroy_tears_down_and_cancels() {
        let mut w = world();
        w.create_springboard(0.0, 100.0, 100.0, 100.0);
        let ticket = w.begin_message_load().unwrap();
        let ready = w.message_ready();

        w.destroy();

        assert!(!w.is_alive());
        assert!(w.springboard_line_data().is_none());
        assert!(w.obstacles().is_empty());
        assert!(w.pending_events().is_empty());
        assert_eq!(ready.outcome(), Some(ReadyOutcome::Cancelled));
        assert!(matches!(
            w.finish_message_load(ticket, Ok("too late".into())),
            Err(LoadError::Destroyed)
        ));
        assert!(w.create_springboard(0.0, 0.0, 50.0, 0.0).is_none());
        assert!(w.words().is_empty());
    }

    #[test]
    fn test_destroyed_world_refuses_new_loads() {
        let mut w = world();
        w.destroy();

        assert!(matches!(w.begin_message_load(), Err(LoadError::Destroyed)));
        assert!(matches!(w.set_message("hello again"), Err(LoadError::Destroyed)));
        assert_eq!(w.message_state(), &MessageState::NotLoaded);
        assert_eq!(w.message_ready().outcome(), Some(ReadyOutcome::Cancelled));
        assert!(w.words().is_empty());
    }
}
