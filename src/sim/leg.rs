//! Leg gait and two-bone inverse kinematics
//!
//! Each leg owns only its foot: the foot stays planted in world space while
//! the body moves over it, and a step is triggered once the foot has
//! drifted too far from its natural resting position. Steps are predicted
//! ahead of the body so fast walks don't chase their own feet.

use glam::Vec2;
use std::f32::consts::PI;

use crate::config::LegConfig;
use crate::ease_in_out;

/// Gait state for one leg
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GaitPhase {
    /// Foot planted in world space
    Planted,
    /// Mid-swing toward a predicted target
    Stepping {
        progress: u32,
        duration: u32,
        start: Vec2,
        target: Vec2,
        /// One dust puff per step, just before touchdown
        dust_emitted: bool,
    },
}

/// Per-tick snapshot of the body state a leg reads. Legs never hold
/// references into the spine; the anchor is resolved fresh each tick.
#[derive(Debug, Clone, Copy)]
pub struct LegContext {
    pub body_point: Vec2,
    pub body_angle: f32,
    pub head_velocity: Vec2,
    pub head_angular_velocity: f32,
    pub head_speed: f32,
    /// No other leg of this gait group is mid-swing
    pub can_step: bool,
    pub grabbed: bool,
}

#[derive(Debug, Clone)]
pub struct Leg {
    pub spine_index: usize,
    /// +1 right, -1 left
    pub side: f32,
    /// 0 or 1; groups alternate so the gait never lifts both at once
    pub gait_group: u8,
    /// Resting angle from the body heading, mirrored by side
    pub rest_angle: f32,
    pub foot: Vec2,
    pub phase: GaitPhase,
}

impl Leg {
    pub fn new(
        spine_index: usize,
        side: f32,
        gait_group: u8,
        rest_angle: f32,
        body_point: Vec2,
        body_angle: f32,
        config: &LegConfig,
    ) -> Self {
        let mut leg = Self {
            spine_index,
            side,
            gait_group,
            rest_angle,
            foot: Vec2::ZERO,
            phase: GaitPhase::Planted,
        };
        leg.foot = leg.natural_rest(body_point, body_angle, config);
        leg
    }

    /// The position this foot would occupy with no gait deviation
    pub fn natural_rest(&self, body_point: Vec2, body_angle: f32, config: &LegConfig) -> Vec2 {
        let angle = body_angle + self.side * self.rest_angle;
        body_point + Vec2::from_angle(angle) * config.natural_length
    }

    pub fn is_stepping(&self) -> bool {
        matches!(self.phase, GaitPhase::Stepping { .. })
    }

    /// Current swing lift, subtracted from the drawn foot's y
    pub fn lift(&self, step_lift: f32) -> f32 {
        match self.phase {
            GaitPhase::Stepping {
                progress, duration, ..
            } => (progress as f32 / duration as f32 * PI).sin() * step_lift,
            GaitPhase::Planted => 0.0,
        }
    }

    /// Advance one tick. Returns the touchdown position when this step's
    /// dust puff should fire.
    pub fn update(&mut self, ctx: &LegContext, config: &LegConfig) -> Option<Vec2> {
        match self.phase {
            GaitPhase::Stepping {
                mut progress,
                duration,
                start,
                target,
                mut dust_emitted,
            } => {
                progress += 1;
                let t = progress as f32 / duration as f32;

                let mut dust = None;
                if t > 0.9 && !dust_emitted {
                    dust = Some(target);
                    dust_emitted = true;
                }

                self.foot = start.lerp(target, ease_in_out(t.min(1.0)));

                self.phase = if progress >= duration {
                    GaitPhase::Planted
                } else {
                    GaitPhase::Stepping {
                        progress,
                        duration,
                        start,
                        target,
                        dust_emitted,
                    }
                };
                dust
            }
            GaitPhase::Planted => {
                let natural = self.natural_rest(ctx.body_point, ctx.body_angle, config);
                let drift = self.foot.distance(natural);

                if drift > config.step_threshold
                    && ctx.can_step
                    && !ctx.grabbed
                    && ctx.head_speed > 0.2
                {
                    // Predict where the anchor will be when the foot lands,
                    // clamped so hard turns don't fling the target.
                    let mut predicted = ctx.body_point + ctx.head_velocity * config.step_prediction_frames;
                    let offset = predicted - ctx.body_point;
                    let dist = offset.length();
                    if dist > config.max_prediction_distance {
                        predicted = ctx.body_point + offset * (config.max_prediction_distance / dist);
                    }
                    let predicted_angle =
                        ctx.body_angle + ctx.head_angular_velocity * config.step_prediction_frames;

                    self.phase = GaitPhase::Stepping {
                        progress: 0,
                        duration: config.step_duration,
                        start: self.foot,
                        target: self.natural_rest(predicted, predicted_angle, config),
                        dust_emitted: false,
                    };
                }
                None
            }
        }
    }
}

/// Solved joint positions for drawing one leg
#[derive(Debug, Clone, Copy)]
pub struct LegPose {
    pub hip: Vec2,
    pub knee: Vec2,
    pub ankle: Vec2,
    pub foot: Vec2,
}

/// Two-bone analytic IK: place the knee of a (seg1, seg2) arm reaching from
/// `shoulder` to `foot`, bending toward `side`.
///
/// An unreachable foot is handled by pointing the arm straight at it, which
/// keeps the acos argument in range.
pub fn solve_knee(shoulder: Vec2, foot: Vec2, seg1: f32, seg2: f32, side: f32) -> Vec2 {
    let delta = foot - shoulder;
    let dist = delta.length();
    let max_reach = seg1 + seg2 - 1.0;

    if dist >= max_reach || dist < 1e-4 {
        return shoulder + delta.normalize_or_zero() * seg1;
    }

    let cos_bend = ((seg1 * seg1 + dist * dist - seg2 * seg2) / (2.0 * seg1 * dist)).clamp(-1.0, 1.0);
    let bend = cos_bend.acos();
    let to_foot = delta.to_angle();
    shoulder + Vec2::from_angle(to_foot + bend * side) * seg1
}

/// Full leg pose: knee from two-bone IK over (segment1, segment2+segment3),
/// ankle placed along the knee→foot line at segment2.
pub fn solve_pose(shoulder: Vec2, foot: Vec2, config: &LegConfig, side: f32) -> LegPose {
    let knee = solve_knee(
        shoulder,
        foot,
        config.segment1,
        config.segment2 + config.segment3,
        side,
    );
    let ankle = knee + (foot - knee).normalize_or_zero() * config.segment2;
    LegPose {
        hip: shoulder,
        knee,
        ankle,
        foot,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use proptest::prelude::*;

    fn leg_config() -> LegConfig {
        Config::default().legs
    }

    fn idle_context(body_point: Vec2) -> LegContext {
        LegContext {
            body_point,
            body_angle: 0.0,
            head_velocity: Vec2::ZERO,
            head_angular_velocity: 0.0,
            head_speed: 0.0,
            can_step: true,
            grabbed: false,
        }
    }

    #[test]
    fn test_natural_rest_geometry() {
        let config = leg_config();
        let leg = Leg::new(2, 1.0, 0, 1.3, Vec2::ZERO, 0.0, &config);
        let rest = leg.natural_rest(Vec2::ZERO, 0.0, &config);
        assert!((rest.length() - config.natural_length).abs() < 1e-3);
        assert!((rest.to_angle() - 1.3).abs() < 1e-5);
    }

    #[test]
    fn test_no_step_when_idle() {
        let config = leg_config();
        let mut leg = Leg::new(2, 1.0, 0, 1.3, Vec2::ZERO, 0.0, &config);
        // Drag the body far away but keep the head stationary: no step.
        let ctx = idle_context(Vec2::new(200.0, 0.0));
        leg.update(&ctx, &config);
        assert!(!leg.is_stepping());
    }

    #[test]
    fn test_no_step_while_grabbed() {
        let config = leg_config();
        let mut leg = Leg::new(2, 1.0, 0, 1.3, Vec2::ZERO, 0.0, &config);
        let mut ctx = idle_context(Vec2::new(200.0, 0.0));
        ctx.head_speed = 2.0;
        ctx.grabbed = true;
        leg.update(&ctx, &config);
        assert!(!leg.is_stepping());
    }

    #[test]
    fn test_step_triggers_and_lands_on_target() {
        let config = leg_config();
        let mut leg = Leg::new(2, 1.0, 0, 1.3, Vec2::ZERO, 0.0, &config);
        let mut ctx = idle_context(Vec2::new(200.0, 0.0));
        ctx.head_speed = 2.0;
        ctx.head_velocity = Vec2::new(2.0, 0.0);

        leg.update(&ctx, &config);
        let GaitPhase::Stepping { start, target, .. } = leg.phase else {
            panic!("expected a step to start");
        };
        // Ease endpoint t=0: foot still at the start position.
        assert_eq!(leg.foot, start);

        let mut dust_events = 0;
        for _ in 0..config.step_duration {
            if leg.update(&ctx, &config).is_some() {
                dust_events += 1;
            }
        }
        // Ease endpoint t=1: foot exactly on target, back to planted.
        assert!(!leg.is_stepping());
        assert!((leg.foot - target).length() < 1e-4);
        assert_eq!(dust_events, 1);
    }

    #[test]
    fn test_step_target_prediction_is_clamped() {
        let config = leg_config();
        let mut leg = Leg::new(2, 1.0, 0, 1.3, Vec2::ZERO, 0.0, &config);
        let mut ctx = idle_context(Vec2::new(200.0, 0.0));
        ctx.head_speed = 50.0;
        ctx.head_velocity = Vec2::new(50.0, 0.0);

        leg.update(&ctx, &config);
        let GaitPhase::Stepping { target, .. } = leg.phase else {
            panic!("expected a step to start");
        };
        let clamped_anchor = ctx.body_point + Vec2::new(config.max_prediction_distance, 0.0);
        let expected = leg.natural_rest(
            clamped_anchor,
            ctx.body_angle + ctx.head_angular_velocity * config.step_prediction_frames,
            &config,
        );
        assert!((target - expected).length() < 1e-3);
    }

    #[test]
    fn test_ik_reachable_satisfies_segment_lengths() {
        let shoulder = Vec2::new(10.0, -5.0);
        let foot = Vec2::new(40.0, 20.0);
        let (s1, s2) = (30.0, 40.0);
        let knee = solve_knee(shoulder, foot, s1, s2, 1.0);
        assert!((knee.distance(shoulder) - s1).abs() < 1e-3);
        assert!((knee.distance(foot) - s2).abs() < 1e-3);
    }

    #[test]
    fn test_ik_unreachable_extends_along_ray() {
        let shoulder = Vec2::ZERO;
        let foot = Vec2::new(200.0, 0.0);
        let knee = solve_knee(shoulder, foot, 30.0, 40.0, 1.0);
        assert!((knee - Vec2::new(30.0, 0.0)).length() < 1e-3);
    }

    #[test]
    fn test_ik_mirrors_by_side() {
        let shoulder = Vec2::ZERO;
        let foot = Vec2::new(40.0, 0.0);
        let left = solve_knee(shoulder, foot, 30.0, 40.0, -1.0);
        let right = solve_knee(shoulder, foot, 30.0, 40.0, 1.0);
        assert!((left.y + right.y).abs() < 1e-3);
        assert!((left.x - right.x).abs() < 1e-3);
    }

    #[test]
    fn test_pose_ankle_on_knee_foot_line() {
        let config = leg_config();
        let pose = solve_pose(Vec2::ZERO, Vec2::new(45.0, 25.0), &config, 1.0);
        let dir = (pose.foot - pose.knee).normalize_or_zero();
        let expected = pose.knee + dir * config.segment2;
        assert!((pose.ankle - expected).length() < 1e-3);
    }

    proptest! {
        #[test]
        fn prop_ik_branches_hold(fx in -200.0f32..200.0, fy in -200.0f32..200.0) {
            let shoulder = Vec2::ZERO;
            let foot = Vec2::new(fx, fy);
            let (s1, s2) = (30.0, 40.0);
            let knee = solve_knee(shoulder, foot, s1, s2, 1.0);
            let dist = foot.length();

            prop_assert!(knee.x.is_finite() && knee.y.is_finite());
            if dist >= s1 + s2 - 1.0 {
                // Fully extended: knee sits on the shoulder→foot ray at s1.
                let on_ray = shoulder + foot.normalize_or_zero() * s1;
                prop_assert!((knee - on_ray).length() < 1e-2);
            } else if dist > 1e-3 {
                prop_assert!((knee.distance(shoulder) - s1).abs() < 1e-2);
                // Triangle closes only when the foot is outside |s1 - s2|.
                if dist >= (s1 - s2).abs() + 1e-2 {
                    prop_assert!((knee.distance(foot) - s2).abs() < 1e-1);
                }
            }
        }
    }
}
