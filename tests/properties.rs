//! Property tests for the physics invariants

use glam::Vec2;
use proptest::prelude::*;

use gelato_bounce::sim::{BounceGate, LineData, WordSequence, spring_bounce};
use gelato_bounce::{GelatoWorld, SimConfig, WordPolicy, segment_normal};

const EPS: f32 = 1e-3;

fn arb_point() -> impl Strategy<Value = Vec2> {
    (-2000.0..2000.0_f32, -2000.0..2000.0_f32).prop_map(|(x, y)| Vec2::new(x, y))
}

fn arb_velocity() -> impl Strategy<Value = Vec2> {
    (-5000.0..5000.0_f32, -5000.0..5000.0_f32).prop_map(|(x, y)| Vec2::new(x, y))
}

proptest! {
    #[test]
    fn velocity_stays_capped_after_any_step(
        pos in (40.0..350.0_f32, 40.0..800.0_f32),
        vel in arb_velocity(),
        board_y in 100.0..800.0_f32,
        delta_ms in -50.0..200.0_f32,
    ) {
        let mut world = GelatoWorld::default();
        world.create_springboard(20.0, board_y, 370.0, board_y - 40.0);
        world.place_mascot(Vec2::new(pos.0, pos.1), vel);

        for _ in 0..3 {
            world.step(delta_ms);
            let v = world.mascot_velocity();
            let config = world.config();
            prop_assert!(v.x.abs() <= config.max_velocity_x, "vx {}", v.x);
            prop_assert!(v.y.abs() <= config.max_velocity_y, "vy {}", v.y);
        }
    }

    #[test]
    fn springboard_length_is_clamped_from_start(
        start in arb_point(),
        end in arb_point(),
        max_length in 10.0..400.0_f32,
    ) {
        prop_assume!(start.distance(end) > 1e-3);
        let line = LineData::clamped(start, end, max_length).unwrap();

        prop_assert_eq!(line.start, start);
        prop_assert!(line.length() <= max_length + EPS * max_length);
        if start.distance(end) <= max_length {
            prop_assert_eq!(line.end, end);
        } else {
            // Same direction as the drag
            let drag = (end - start).normalize();
            let kept = (line.end - start).normalize();
            prop_assert!(drag.dot(kept) > 1.0 - EPS);
        }
    }

    #[test]
    fn bounce_boosts_normal_and_keeps_tangent(
        vel in arb_velocity(),
        angle in -std::f32::consts::PI..std::f32::consts::PI,
        boost in 0.0..3.0_f32,
    ) {
        let bounce = spring_bounce(vel, angle, boost);
        let normal = segment_normal(angle);
        let tangent = Vec2::new(normal.y, -normal.x);
        let scale = vel.length().max(1.0);

        prop_assert!((bounce.velocity.dot(tangent) - vel.dot(tangent)).abs() < EPS * scale);
        let expected = -vel.dot(normal) * (1.0 + boost);
        prop_assert!((bounce.velocity.dot(normal) - expected).abs() < EPS * scale * (1.0 + boost));
    }

    #[test]
    fn admitted_bounces_respect_min_interval(
        gaps in prop::collection::vec(0.0..500.0_f64, 1..40),
        min_interval in 50.0..400.0_f64,
    ) {
        let mut gate = BounceGate::new();
        let mut now = 0.0;
        let mut admitted: Vec<f64> = Vec::new();
        for gap in gaps {
            now += gap;
            if gate.try_admit(now, min_interval) {
                admitted.push(now);
            }
        }
        prop_assert!(!admitted.is_empty());
        for pair in admitted.windows(2) {
            prop_assert!(pair[1] - pair[0] >= min_interval);
        }
    }

    #[test]
    fn clamped_words_never_run_past_the_end(
        words in prop::collection::vec("[a-z]{1,8}", 0..12),
        bounces in 0usize..30,
    ) {
        let mut seq = WordSequence::new(words.clone(), WordPolicy::Clamp);
        let mut revealed = 0;
        for i in 0..bounces {
            if seq.advance(i as f64, -100.0).is_some() {
                revealed += 1;
            }
        }
        prop_assert_eq!(revealed, bounces.min(words.len()));
        if let Some(current) = seq.current() {
            prop_assert_eq!(&current.word, &words[current.index]);
        }
    }
}

#[test]
fn resize_with_default_config_is_idempotent() {
    let config = SimConfig::default();
    let mut once = GelatoWorld::new(config.clone());
    let mut twice = GelatoWorld::new(config);
    once.update_boundaries(500.0, 900.0);
    twice.update_boundaries(500.0, 900.0);
    twice.update_boundaries(500.0, 900.0);
    assert_eq!(once.obstacles(), twice.obstacles());
}
