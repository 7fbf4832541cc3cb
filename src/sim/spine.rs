//! Spine chain: follow-the-leader motion and constraint relaxation
//!
//! The chain is deliberately springy: spacing is corrected by a partial,
//! single-sided nudge over a fixed number of iterations rather than an
//! exact solve, so total length breathes under fast motion.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::config::Config;

/// Per-tick head scalars the chain reads
#[derive(Debug, Clone, Copy)]
pub struct SpineMotion {
    pub head_angle: f32,
    pub head_speed: f32,
    pub angular_velocity: f32,
}

/// Ordered body centerline, head first
#[derive(Debug, Clone)]
pub struct SpineChain {
    pub points: Vec<Vec2>,
}

impl SpineChain {
    /// Lay the chain out straight behind the head
    pub fn new(origin: Vec2, count: usize, segment_length: f32) -> Self {
        let points = (0..count)
            .map(|i| origin - Vec2::new(i as f32 * segment_length, 0.0))
            .collect();
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn head(&self) -> Vec2 {
        self.points[0]
    }

    /// Follow drag plus the additive sway/wiggle/wag/undulation offsets.
    ///
    /// The head is the anchor and is never touched; a grabbed point is
    /// skipped so the pin stays exact.
    pub fn secondary_motion(
        &mut self,
        motion: &SpineMotion,
        pinned: Option<usize>,
        frame: u64,
        config: &Config,
    ) {
        let n = self.points.len();
        let frame = frame as f32;
        let perp = Vec2::from_angle(motion.head_angle + FRAC_PI_2);
        let heading = Vec2::from_angle(motion.head_angle);
        let moving = motion.head_speed > 0.2;
        let swing_amp = motion.head_speed.min(1.5);

        for i in 1..n {
            if pinned == Some(i) {
                continue;
            }
            let t = i as f32 / n as f32;

            if moving {
                // Looser drag toward the tail keeps the rear whippy.
                let drag = config.movement.spine_drag + (1.0 - config.movement.spine_drag) * t * 0.8;
                let target = self.points[i - 1] + heading * config.segment_length;
                self.points[i] = self.points[i] * drag + target * (1.0 - drag);
            }

            let envelope = (t * PI).sin();
            let sway = envelope * motion.angular_velocity * config.movement.turn_sway * i as f32;
            let idle = if moving {
                0.0
            } else {
                (frame * config.tail.idle_wiggle_speed + i as f32 * 0.3).sin()
                    * config.tail.idle_wiggle_amount
                    * (1.0 - t)
            };
            let wag_phase = frame * config.tail.wag_speed + i as f32 * 0.1;
            let wag = wag_phase.sin() * swing_amp * config.tail.wag_amount * envelope;

            self.points[i] += perp * (sway + idle + wag);

            let undulation_phase = frame * config.tail.undulation_speed - i as f32 * 0.1;
            self.points[i].y +=
                undulation_phase.sin() * swing_amp * config.tail.undulation_amount * envelope;
        }
    }

    /// Iterative relaxation: re-pin the grabbed point, pull the curl region
    /// toward a target ahead-and-above the head, then apply the single-sided
    /// spacing correction.
    pub fn relax(&mut self, pin: Option<(usize, Vec2)>, motion: &SpineMotion, config: &Config) {
        let n = self.points.len();
        let curl_start = config.tail.curl_start;
        let speed_factor = (motion.head_speed / config.max_speed).min(1.0);
        let dynamic_curl = config.tail.curl - speed_factor * config.tail.speed_curl_factor;
        let heading = Vec2::from_angle(motion.head_angle);
        let above = Vec2::from_angle(motion.head_angle - FRAC_PI_2);

        for _ in 0..config.physics_iterations {
            if let Some((index, pos)) = pin {
                self.points[index] = pos;
            }
            // The target rotates with the creature's heading.
            let curl_target =
                self.points[0] + heading * config.tail.curl_ahead + above * config.tail.curl_above;

            for i in 1..n {
                if pin.map(|(index, _)| index) == Some(i) {
                    continue;
                }

                if i > curl_start {
                    // Pull tightens quadratically toward the tail tip.
                    let progress = (i - curl_start) as f32 / (n - curl_start) as f32;
                    let pull = progress * progress * (dynamic_curl / 100.0);
                    let point = self.points[i];
                    self.points[i] = point + (curl_target - point) * pull;
                }

                let prev = self.points[i - 1];
                let delta = self.points[i] - prev;
                let dist = delta.length();
                if dist > 1e-6 {
                    let error = dist - config.segment_length;
                    self.points[i] -= delta / dist * (error * 0.5);
                }
            }
        }
    }
}
