//! Pincer arms: lagging joint follow and claw snap
//!
//! Joints chase their targets through exponential smoothing, so the arms
//! trail the body springily instead of locking to it. The claw angle is
//! tracked independently per arm.

use glam::Vec2;

use crate::config::PincerConfig;
use crate::{lerp, normalize_angle};

/// Per-tick snapshot the arms read
#[derive(Debug, Clone, Copy)]
pub struct PincerContext {
    /// Shoulder anchor (second spine point)
    pub anchor: Vec2,
    /// Current body heading
    pub heading: f32,
    pub head: Vec2,
    pub pointer: Vec2,
    pub grabbed: bool,
}

#[derive(Debug, Clone)]
pub struct PincerArm {
    /// +1 right, -1 left
    pub side: f32,
    /// Smoothed elbow joint
    pub elbow: Vec2,
    /// Smoothed hand joint
    pub hand: Vec2,
    /// Opening angle of the mobile claw finger
    pub claw_angle: f32,
}

impl PincerArm {
    pub fn new(side: f32, anchor: Vec2, heading: f32, config: &PincerConfig) -> Self {
        let elbow = anchor + Vec2::from_angle(heading + side * config.elbow_offset) * config.length_a;
        let hand = elbow + Vec2::from_angle(heading + side * config.hand_offset) * config.length_b;
        Self {
            side,
            elbow,
            hand,
            claw_angle: config.open_angle,
        }
    }

    /// Advance one tick. Returns the hand position when a closing snap
    /// completes (one flash burst per close).
    pub fn update(&mut self, ctx: &PincerContext, config: &PincerConfig) -> Option<Vec2> {
        let target_elbow =
            ctx.anchor + Vec2::from_angle(ctx.heading + self.side * config.elbow_offset) * config.length_a;

        // Hand target chains off the elbow target, nudged toward the pointer.
        let mut hand_angle = ctx.heading + self.side * config.hand_offset;
        let to_pointer = ctx.pointer - target_elbow;
        if to_pointer.length_squared() > 1e-6 {
            hand_angle += normalize_angle(to_pointer.to_angle() - hand_angle) * config.aim_bias;
        }
        let target_hand = target_elbow + Vec2::from_angle(hand_angle) * config.length_b;

        self.elbow = self.elbow.lerp(target_elbow, config.follow_lerp);
        self.hand = self.hand.lerp(target_hand, config.follow_lerp);

        let near = ctx.pointer.distance(ctx.head) < config.snap_distance && !ctx.grabbed;
        let target_angle = if near {
            config.closed_angle
        } else {
            config.open_angle
        };
        let prev = self.claw_angle;
        self.claw_angle = lerp(self.claw_angle, target_angle, config.snap_lerp);

        // Edge-triggered: fires once as the claw crosses the snap angle.
        if prev > config.snap_trigger_angle && self.claw_angle <= config.snap_trigger_angle {
            return Some(self.hand);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn pincer_config() -> PincerConfig {
        Config::default().pincers
    }

    fn far_context() -> PincerContext {
        PincerContext {
            anchor: Vec2::ZERO,
            heading: 0.0,
            head: Vec2::ZERO,
            pointer: Vec2::new(500.0, 0.0),
            grabbed: false,
        }
    }

    #[test]
    fn test_joints_converge_on_static_target() {
        let config = pincer_config();
        let ctx = far_context();
        let mut arm = PincerArm::new(1.0, Vec2::new(100.0, 100.0), 2.0, &config);
        for _ in 0..200 {
            arm.update(&ctx, &config);
        }
        let target_elbow =
            ctx.anchor + Vec2::from_angle(ctx.heading + config.elbow_offset) * config.length_a;
        assert!((arm.elbow - target_elbow).length() < 0.5);
        // Hand ends one segment past the elbow.
        assert!((arm.hand.distance(target_elbow) - config.length_b).abs() < 0.5);
    }

    #[test]
    fn test_follow_lags_target() {
        let config = pincer_config();
        let ctx = far_context();
        let mut arm = PincerArm::new(1.0, Vec2::new(100.0, 100.0), 2.0, &config);
        let before = arm.elbow;
        arm.update(&ctx, &config);
        let target_elbow =
            ctx.anchor + Vec2::from_angle(ctx.heading + config.elbow_offset) * config.length_a;
        // One tick moves a fraction of the way, not all of it.
        let moved = before.distance(arm.elbow);
        let total = before.distance(target_elbow);
        assert!(moved > 0.0 && moved < total * 0.5);
    }

    #[test]
    fn test_snap_fires_once_per_close() {
        let config = pincer_config();
        let mut arm = PincerArm::new(1.0, Vec2::ZERO, 0.0, &config);
        let mut ctx = far_context();
        ctx.pointer = Vec2::new(10.0, 0.0); // inside snap distance

        let mut snaps = 0;
        for _ in 0..300 {
            if arm.update(&ctx, &config).is_some() {
                snaps += 1;
            }
        }
        assert_eq!(snaps, 1);
        assert!(arm.claw_angle < config.snap_trigger_angle);

        // Reopen, then close again: exactly one more snap.
        ctx.pointer = Vec2::new(500.0, 0.0);
        for _ in 0..300 {
            assert!(arm.update(&ctx, &config).is_none());
        }
        ctx.pointer = Vec2::new(10.0, 0.0);
        let mut snaps = 0;
        for _ in 0..300 {
            if arm.update(&ctx, &config).is_some() {
                snaps += 1;
            }
        }
        assert_eq!(snaps, 1);
    }

    #[test]
    fn test_no_snap_while_grabbed() {
        let config = pincer_config();
        let mut arm = PincerArm::new(1.0, Vec2::ZERO, 0.0, &config);
        let mut ctx = far_context();
        ctx.pointer = Vec2::new(10.0, 0.0);
        ctx.grabbed = true;
        for _ in 0..300 {
            assert!(arm.update(&ctx, &config).is_none());
        }
        // Claw stayed open: the pointer is close but the body is held.
        assert!((arm.claw_angle - config.open_angle).abs() < 1e-3);
    }
}
