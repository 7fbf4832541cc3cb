//! Frame assembly: creature state in, one colored triangle list out
//!
//! Strictly read-only over the simulation. Everything here is derived
//! geometry; the swing lift and the deconstruction blend are applied at
//! draw time and never written back.

use glam::Vec2;
use std::f32::consts::FRAC_PI_2;

use super::shapes::{circle, hsl_to_rgba, line, polyline, tapered_strip, triangle};
use super::vertex::{Vertex, colors};
use crate::ease_in_out;
use crate::sim::{Scorpion, StrikeState, solve_pose};

const STINGER_BULB: f32 = 7.0;
const STINGER_BARB: f32 = 15.0;
const STINGER_BARB_ANGLE: f32 = 0.4;

/// Build the triangle list for the current frame
pub fn build_frame(s: &Scorpion) -> Vec<Vertex> {
    let mut out = Vec::new();
    let cfg = &s.config;
    let n = s.spine.len();
    let blend = ease_in_out(s.assembly.blend());
    let scattered = blend > 0.0;

    let pulse = (s.frame as f32 * cfg.color.glow_pulse_speed).sin() * cfg.color.glow_pulse_amount;
    let lightness = (cfg.color.lightness + pulse + s.post_strike_glow).clamp(0.0, 100.0);
    let body_color = hsl_to_rgba(s.hue, cfg.color.saturation, lightness, 1.0);
    let glow_color = hsl_to_rgba(s.hue, cfg.color.saturation, cfg.color.glow_lightness, 1.0);

    let spine_pos = |i: usize| -> Vec2 {
        match &s.assembly.scatter {
            Some(map) if scattered => map.spine[i].at(blend),
            _ => s.spine.points[i],
        }
    };

    // Legs first so the body plates overlap them.
    for (li, leg) in s.legs.iter().enumerate() {
        let shoulder = spine_pos(leg.spine_index);
        let planted_foot = match &s.assembly.scatter {
            Some(map) if scattered => map.feet[li].at(blend),
            _ => leg.foot,
        };

        let lift = leg.lift(cfg.legs.step_lift);
        if lift > 0.1 {
            circle(&mut out, planted_foot, 1.5, colors::FOOT_SHADOW, 8);
        }
        let foot = planted_foot - Vec2::new(0.0, lift);

        let pose = solve_pose(shoulder, foot, &cfg.legs, leg.side);
        polyline(
            &mut out,
            &[pose.hip, pose.knee, pose.ankle, pose.foot],
            cfg.legs.leg_width * 0.2,
            body_color,
        );
        circle(&mut out, pose.hip, 1.8, body_color, 8);
        circle(&mut out, pose.knee, 1.2, body_color, 8);
        circle(&mut out, pose.ankle, 1.0, body_color, 8);
    }

    // Body plates, tail to head, tapering with a floor so the tail keeps
    // a visible thickness.
    let plate_width = |i: usize| -> f32 {
        let t = i as f32 / n as f32;
        let mut width = ((3.0 - t.powf(0.6) * 4.0) * 2.8).max(0.8);
        if i > cfg.body.thorax_end_index {
            width = width.max(cfg.body.abdomen_ring_scale * (1.0 - t) * 0.4);
        }
        width
    };
    let strip: Vec<(Vec2, f32)> = (1..n - 1)
        .rev()
        .map(|i| (spine_pos(i), plate_width(i)))
        .collect();
    tapered_strip(&mut out, &strip, body_color);
    let core: Vec<(Vec2, f32)> = strip.iter().map(|&(p, w)| (p, w * 0.55)).collect();
    tapered_strip(&mut out, &core, colors::BODY_FILL);

    draw_head(&mut out, s, spine_pos(0), body_color, glow_color);
    draw_pincers(&mut out, s, spine_pos(1), blend, body_color);
    draw_stinger(&mut out, s, spine_pos(n - 1), spine_pos(n - 2), body_color);

    for p in &s.particles.particles {
        let alpha = p.alpha();
        let color = hsl_to_rgba(p.hue, p.saturation, p.lightness, alpha * 0.9);
        line(&mut out, p.prev_pos, p.pos, p.size * alpha, color);
    }

    out
}

fn draw_head(out: &mut Vec<Vertex>, s: &Scorpion, center: Vec2, body_color: [f32; 4], glow_color: [f32; 4]) {
    let cfg = &s.config.head;
    let angle = s.head_angle;
    let width = cfg.size * cfg.width_factor;
    let length = cfg.size * cfg.length_factor;

    let hull = |scale: f32| -> [Vec2; 5] {
        let local = [
            Vec2::new(length, 0.0),
            Vec2::new(length * 0.6, -width / 2.5),
            Vec2::new(-length * 0.8, -width / 2.0),
            Vec2::new(-length * 0.8, width / 2.0),
            Vec2::new(length * 0.6, width / 2.5),
        ];
        local.map(|p| center + Vec2::from_angle(angle).rotate(p * scale))
    };

    // Outline pass, then the dark fill on top.
    fan(out, center, &hull(1.15), body_color);
    fan(out, center, &hull(1.0), colors::BODY_FILL);

    let eyes = &cfg.eyes;
    let forward = Vec2::from_angle(angle);
    let side_dir = Vec2::from_angle(angle + FRAC_PI_2);
    for side in [-1.0f32, 1.0] {
        let eye = center
            + forward * (eyes.offset_x * cfg.size)
            + side_dir * (eyes.offset_y * cfg.size * side);
        if s.eye_glow > 0.01 {
            let halo = [glow_color[0], glow_color[1], glow_color[2], s.eye_glow * 0.5];
            circle(out, eye, eyes.size * (1.0 + s.eye_glow), halo, 10);
            circle(out, eye, eyes.size, glow_color, 10);
        } else {
            circle(out, eye, eyes.size, body_color, 10);
        }
    }
}

fn draw_pincers(out: &mut Vec<Vertex>, s: &Scorpion, anchor: Vec2, blend: f32, body_color: [f32; 4]) {
    let cfg = &s.config.pincers;
    let scattered = blend > 0.0;

    for (ai, arm) in s.pincers.iter().enumerate() {
        let (elbow, hand) = match &s.assembly.scatter {
            Some(map) if scattered => (
                map.pincer_elbows[ai].at(blend),
                map.pincer_hands[ai].at(blend),
            ),
            _ => (arm.elbow, arm.hand),
        };

        line(out, anchor, elbow, cfg.arm_width * 0.8, body_color);

        // The hand swells from arm width out to the bulbous claw base.
        tapered_strip(
            out,
            &[(elbow, cfg.arm_width / 2.0), (hand, cfg.hand_width / 2.0)],
            body_color,
        );
        tapered_strip(
            out,
            &[
                (elbow, cfg.arm_width * 0.25),
                (hand, cfg.hand_width * 0.25),
            ],
            colors::BODY_FILL,
        );

        let hand_angle = (hand - elbow).to_angle();
        let claw_width = cfg.arm_width * 0.375;
        let mobile = hand_angle + arm.side * arm.claw_angle;
        let fixed = hand_angle - arm.side * 0.4;
        line(
            out,
            hand,
            hand + Vec2::from_angle(mobile) * cfg.length_finger,
            claw_width,
            body_color,
        );
        line(
            out,
            hand,
            hand + Vec2::from_angle(fixed) * (cfg.length_finger * 0.9),
            claw_width,
            body_color,
        );
    }
}

fn draw_stinger(out: &mut Vec<Vertex>, s: &Scorpion, tip: Vec2, pre_tip: Vec2, body_color: [f32; 4]) {
    let mut angle = (tip - pre_tip).to_angle();
    if let StrikeState::Striking { progress, .. } = s.strike {
        let phase = progress as f32 / s.config.strike.duration as f32;
        angle += (phase * std::f32::consts::PI).sin() * s.config.strike.angle_offset;
    }

    let p1 = tip;
    let p2 = tip + Vec2::from_angle(angle - FRAC_PI_2) * STINGER_BULB;
    let p3 = tip + Vec2::from_angle(angle + STINGER_BARB_ANGLE) * STINGER_BARB;
    let p4 = tip + Vec2::from_angle(angle + FRAC_PI_2) * STINGER_BULB;

    triangle(out, p1, p2, p3, body_color);
    triangle(out, p1, p3, p4, body_color);
}

/// Triangle fan around a convex hull
fn fan(out: &mut Vec<Vertex>, center: Vec2, hull: &[Vec2], color: [f32; 4]) {
    for i in 0..hull.len() {
        triangle(out, center, hull[i], hull[(i + 1) % hull.len()], color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::tick;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.num_spine_points = 10;
        config.tail.curl_start = 5;
        config.legs.indices = vec![2, 4];
        config.legs.angles = vec![1.1, 1.2];
        config
    }

    #[test]
    fn test_frame_is_nonempty_and_finite() {
        let mut s = Scorpion::new(small_config(), Vec2::ZERO, 1).unwrap();
        s.set_pointer(Vec2::new(150.0, 80.0));
        for _ in 0..30 {
            tick(&mut s);
        }
        let frame = build_frame(&s);
        assert!(!frame.is_empty());
        for v in &frame {
            assert!(v.position[0].is_finite() && v.position[1].is_finite());
            for c in v.color {
                assert!((0.0..=1.0).contains(&c));
            }
        }
    }

    #[test]
    fn test_frame_renders_while_scattered() {
        let mut s = Scorpion::new(small_config(), Vec2::ZERO, 1).unwrap();
        s.toggle_deconstruction();
        for _ in 0..60 {
            tick(&mut s);
        }
        let frame = build_frame(&s);
        assert!(!frame.is_empty());
        for v in &frame {
            assert!(v.position[0].is_finite() && v.position[1].is_finite());
        }
    }

    #[test]
    fn test_particles_add_vertices() {
        let mut s = Scorpion::new(small_config(), Vec2::ZERO, 1).unwrap();
        s.set_pointer(Vec2::new(400.0, 0.0));
        let before = build_frame(&s).len();
        s.trigger_strike();
        for _ in 0..=(s.config.strike.duration / 2) {
            tick(&mut s);
        }
        assert!(build_frame(&s).len() > before);
    }
}
