//! Per-frame simulation tick
//!
//! One call advances the whole creature by one display frame, in a fixed
//! order: head drive, spine passes, strike machine, particle aging, leg
//! gait, pincer follow, eye reaction. All speed and duration constants are
//! tuned in per-tick units against a ~60 Hz cadence.

use glam::Vec2;
use std::f32::consts::{FRAC_PI_2, PI};

use super::spine::SpineMotion;
use super::state::{Scorpion, StrikeState};
use crate::{lerp, normalize_angle};

/// Advance the creature by one frame
pub fn tick(s: &mut Scorpion) {
    // Scattered or mid-scatter: the world is frozen, only the
    // deconstruction progress advances.
    if !s.assembly.is_assembled() {
        s.assembly.advance();
        return;
    }

    s.frame += 1;
    s.hue = (s.hue + s.config.color.hue_change_speed) % 360.0;

    s.post_strike_glow *= s.config.color.post_strike_glow_decay;
    if s.post_strike_glow < 0.1 {
        s.post_strike_glow = 0.0;
    }

    update_movement(s);
    update_spine(s);
    update_strike(s);
    s.particles.update();
    update_legs(s);
    update_pincers(s);
    update_eyes(s);
}

/// Head drive toward the pointer, and the derived velocity/heading scalars
fn update_movement(s: &mut Scorpion) {
    let old_head = s.spine.head();

    match s.grabbed_pin() {
        Some((index, pos)) => {
            // Hard override: the grabbed point goes exactly to the pointer.
            s.spine.points[index] = pos;
        }
        None => {
            let head = s.spine.head();
            let to_target = s.pointer - head;
            let dist = to_target.length();

            if dist > 2.0 {
                let mut step = to_target / dist * s.config.movement.walk_speed;
                if dist < s.config.movement.slowdown_radius {
                    step *= dist / s.config.movement.slowdown_radius;
                }
                let step_len = step.length();
                if step_len > s.config.max_speed {
                    step *= s.config.max_speed / step_len;
                }
                s.spine.points[0] = head + step;
            }
        }
    }

    s.head_velocity = s.spine.head() - old_head;
    s.head_speed = s.head_velocity.length();
    // Hold the previous heading when nearly stationary: prevents jitter.
    if s.head_speed > 0.1 {
        s.head_angle = s.head_velocity.to_angle();
    }
    s.head_angular_velocity = normalize_angle(s.head_angle - s.last_head_angle);
    s.last_head_angle = s.head_angle;
}

fn update_spine(s: &mut Scorpion) {
    let motion = SpineMotion {
        head_angle: s.head_angle,
        head_speed: s.head_speed,
        angular_velocity: s.head_angular_velocity,
    };
    let pin = s.grabbed_pin();
    s.spine
        .secondary_motion(&motion, pin.map(|(i, _)| i), s.frame, &s.config);
    s.spine.relax(pin, &motion, &s.config);
}

fn update_strike(s: &mut Scorpion) {
    let StrikeState::Striking { progress, target } = s.strike else {
        return;
    };
    let duration = s.config.strike.duration;

    // The venom burst fires exactly at the midpoint tick.
    if progress == duration / 2 {
        let n = s.spine.len();
        let pre_tip = s.spine.points[n - 2];
        let tip = s.spine.points[n - 1];
        let base_angle = (tip - pre_tip).to_angle();

        let phase = progress as f32 / duration as f32;
        let angle = base_angle + (phase * PI).sin() * s.config.strike.angle_offset;
        let stinger_tip = tip + Vec2::from_angle(angle) * s.config.tail.stinger_length;

        s.particles.spawn_burst(
            stinger_tip,
            angle,
            &s.config.strike_burst,
            s.hue,
            s.config.color.saturation,
            s.config.color.glow_lightness,
            &mut s.rng,
        );
    }

    let progress = progress + 1;
    if progress >= duration {
        s.strike = StrikeState::Idle;
        s.post_strike_glow = s.config.color.post_strike_glow_boost;
        log::debug!("strike finished");
    } else {
        s.strike = StrikeState::Striking { progress, target };
    }
}

fn update_legs(s: &mut Scorpion) {
    // Gait-group occupancy; a group with a leg mid-swing blocks new steps.
    let mut stepping_in_group = [0u32; 2];
    for leg in &s.legs {
        if leg.is_stepping() {
            stepping_in_group[leg.gait_group as usize] += 1;
        }
    }

    let grabbed = s.is_grabbed();
    let head_velocity = s.head_velocity;
    let head_angular_velocity = s.head_angular_velocity;
    let head_speed = s.head_speed;
    let mut dust: Vec<Vec2> = Vec::new();

    let Scorpion {
        spine,
        legs,
        config,
        ..
    } = s;

    for leg in legs.iter_mut() {
        let body_point = spine.points[leg.spine_index];
        let body_angle = (spine.points[leg.spine_index + 1] - body_point).to_angle();
        let group = leg.gait_group as usize;
        let ctx = super::leg::LegContext {
            body_point,
            body_angle,
            head_velocity,
            head_angular_velocity,
            head_speed,
            can_step: stepping_in_group[group] == 0,
            grabbed,
        };

        let was_stepping = leg.is_stepping();
        if let Some(pos) = leg.update(&ctx, &config.legs) {
            dust.push(pos);
        }
        if !was_stepping && leg.is_stepping() {
            // Claim the group immediately so its partner waits this tick.
            stepping_in_group[group] += 1;
        }
    }

    for pos in dust {
        let hue = s.hue;
        s.particles.spawn_burst(
            pos,
            -FRAC_PI_2,
            &s.config.dust_burst,
            hue,
            s.config.color.saturation,
            s.config.color.glow_lightness,
            &mut s.rng,
        );
    }
}

fn update_pincers(s: &mut Scorpion) {
    let ctx = super::pincer::PincerContext {
        anchor: s.spine.points[1],
        heading: s.head_angle,
        head: s.spine.head(),
        pointer: s.pointer,
        grabbed: s.is_grabbed(),
    };

    let mut flashes: Vec<Vec2> = Vec::new();
    for arm in s.pincers.iter_mut() {
        if let Some(pos) = arm.update(&ctx, &s.config.pincers) {
            flashes.push(pos);
        }
    }

    for pos in flashes {
        let hue = s.hue;
        s.particles.spawn_burst(
            pos,
            0.0,
            &s.config.pincer_flash_burst,
            hue,
            s.config.color.saturation,
            s.config.color.glow_lightness,
            &mut s.rng,
        );
    }
}

fn update_eyes(s: &mut Scorpion) {
    let near = s.pointer.distance(s.spine.head()) < s.config.head.eyes.glow_distance;
    let target = if near && !s.is_grabbed() { 1.0 } else { 0.0 };
    s.eye_glow = lerp(s.eye_glow, target, s.config.head.eyes.glow_lerp);
}
