//! Haptics and audio-cue routing
//!
//! The world queues [`GameEvent`]s; once per frame the host drains them into
//! a [`FeedbackSink`]. [`FeedbackRouter`] is the stock sink: it maps events
//! to haptic patterns and short sound cues and hands those to a
//! platform-specific [`FeedbackOutput`]. Fire-and-forget: nothing flows back
//! into the simulation.

use serde::{Deserialize, Serialize};

use crate::sim::{GameEvent, GelatoWorld};

/// Short sound cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    /// Springboard placed
    SpringboardPlace,
    /// Mascot bounced off a springboard
    SpringboardBounce,
    /// Mascot hit the ground or a wall
    WallHit,
}

/// Haptic intensities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticPattern {
    Selection,
    Light,
    Medium,
    Heavy,
}

/// Platform side of feedback (vibration motor, audio player)
pub trait FeedbackOutput {
    fn haptic(&mut self, pattern: HapticPattern);
    /// `volume` is already scaled to 0.0 - 1.0
    fn cue(&mut self, cue: AudioCue, volume: f32);
}

/// Anything that consumes simulation events
pub trait FeedbackSink {
    fn notify(&mut self, event: &GameEvent);
}

impl GelatoWorld {
    /// Drain queued events into `sink`; returns how many were delivered
    pub fn dispatch_events<S: FeedbackSink + ?Sized>(&mut self, sink: &mut S) -> usize {
        let events = self.drain_events();
        for event in &events {
            sink.notify(event);
        }
        events.len()
    }
}

/// Impact strength (pixels/s) at or above which a bounce feels heavy
pub const HEAVY_BOUNCE_STRENGTH: f32 = 900.0;
/// Impact strength at or above which a bounce feels medium
pub const MEDIUM_BOUNCE_STRENGTH: f32 = 400.0;

/// Maps events to haptics and cues
#[derive(Debug)]
pub struct FeedbackRouter<O> {
    output: O,
    haptics_enabled: bool,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<O: FeedbackOutput> FeedbackRouter<O> {
    pub fn new(output: O) -> Self {
        Self {
            output,
            haptics_enabled: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    pub fn set_haptics_enabled(&mut self, enabled: bool) {
        self.haptics_enabled = enabled;
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn haptic(&mut self, pattern: HapticPattern) {
        if self.haptics_enabled {
            self.output.haptic(pattern);
        }
    }

    fn cue(&mut self, cue: AudioCue, gain: f32) {
        let vol = self.effective_volume() * gain;
        if vol > 0.0 {
            self.output.cue(cue, vol);
        }
    }
}

/// Haptic pattern for a springboard bounce of the given strength
pub fn bounce_pattern(strength: f32) -> HapticPattern {
    if strength >= HEAVY_BOUNCE_STRENGTH {
        HapticPattern::Heavy
    } else if strength >= MEDIUM_BOUNCE_STRENGTH {
        HapticPattern::Medium
    } else {
        HapticPattern::Light
    }
}

impl<O: FeedbackOutput> FeedbackSink for FeedbackRouter<O> {
    fn notify(&mut self, event: &GameEvent) {
        match event {
            GameEvent::SpringboardCreated { .. } => {
                self.haptic(HapticPattern::Selection);
                self.cue(AudioCue::SpringboardPlace, 0.5);
            }
            GameEvent::QualifyingBounce { impact, .. } => {
                self.haptic(bounce_pattern(impact.strength));
                self.cue(AudioCue::SpringboardBounce, 1.0);
            }
            GameEvent::BoundaryBounce { speed, .. } => {
                self.haptic(HapticPattern::Light);
                self.cue(AudioCue::WallHit, (speed / HEAVY_BOUNCE_STRENGTH).clamp(0.2, 1.0));
            }
            GameEvent::SpringboardRemoved { .. } => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{BounceImpact, BoundaryKind, LineData, RemovalReason};
    use glam::Vec2;

    #[derive(Debug, Default)]
    struct Recorder {
        haptics: Vec<HapticPattern>,
        cues: Vec<(AudioCue, f32)>,
    }

    impl FeedbackOutput for Recorder {
        fn haptic(&mut self, pattern: HapticPattern) {
            self.haptics.push(pattern);
        }

        fn cue(&mut self, cue: AudioCue, volume: f32) {
            self.cues.push((cue, volume));
        }
    }

    fn bounce(strength: f32) -> GameEvent {
        GameEvent::QualifyingBounce {
            impact: BounceImpact {
                position: Vec2::ZERO,
                strength,
                timestamp: 0.0,
            },
            word: None,
        }
    }

    #[test]
    fn test_bounce_strength_selects_pattern() {
        assert_eq!(bounce_pattern(100.0), HapticPattern::Light);
        assert_eq!(bounce_pattern(500.0), HapticPattern::Medium);
        assert_eq!(bounce_pattern(2000.0), HapticPattern::Heavy);
    }

    #[test]
    fn test_router_maps_events() {
        let mut router = FeedbackRouter::new(Recorder::default());
        router.notify(&GameEvent::SpringboardCreated {
            line: LineData {
                start: Vec2::ZERO,
                end: Vec2::X,
            },
            at: 0.0,
        });
        router.notify(&bounce(1000.0));
        router.notify(&GameEvent::BoundaryBounce {
            boundary: BoundaryKind::Ground,
            speed: 100.0,
        });
        router.notify(&GameEvent::SpringboardRemoved {
            reason: RemovalReason::Faded,
        });

        let out = router.output();
        assert_eq!(
            out.haptics,
            vec![HapticPattern::Selection, HapticPattern::Heavy, HapticPattern::Light]
        );
        let cues: Vec<AudioCue> = out.cues.iter().map(|(c, _)| *c).collect();
        assert_eq!(
            cues,
            vec![AudioCue::SpringboardPlace, AudioCue::SpringboardBounce, AudioCue::WallHit]
        );
    }

    #[test]
    fn test_muted_router_still_vibrates() {
        let mut router = FeedbackRouter::new(Recorder::default());
        router.set_muted(true);
        router.notify(&bounce(10.0));
        let out = router.into_output();
        assert!(out.cues.is_empty());
        assert_eq!(out.haptics, vec![HapticPattern::Light]);
    }

    #[test]
    fn test_haptics_can_be_disabled() {
        let mut router = FeedbackRouter::new(Recorder::default());
        router.set_haptics_enabled(false);
        router.set_master_volume(2.0);
        router.notify(&bounce(10.0));
        let out = router.into_output();
        assert!(out.haptics.is_empty());
        assert_eq!(out.cues, vec![(AudioCue::SpringboardBounce, 1.0)]);
    }

    #[test]
    fn test_dispatch_drains_world_queue() {
        let mut world = GelatoWorld::default();
        world.create_springboard(10.0, 10.0, 90.0, 10.0);
        let mut router = FeedbackRouter::new(Recorder::default());

        assert_eq!(world.dispatch_events(&mut router), 1);
        assert_eq!(world.dispatch_events(&mut router), 0);
        assert_eq!(router.output().haptics, vec![HapticPattern::Selection]);
    }
}
