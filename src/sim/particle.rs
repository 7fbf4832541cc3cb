//! Particle bursts and lifecycle
//!
//! Pure decay model: particles drift, fall, slow down and die. No
//! collision, no interaction between particles. All randomness comes from
//! the creature's seeded RNG so bursts are reproducible.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::config::BurstProfile;

/// A single decaying streak particle
#[derive(Debug, Clone, Copy)]
pub struct Particle {
    pub pos: Vec2,
    /// Position one tick ago, for streak rendering
    pub prev_pos: Vec2,
    pub vel: Vec2,
    /// Remaining lifetime in ticks
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
    pub drag: f32,
    pub gravity: f32,
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

impl Particle {
    /// Advance one tick. Returns false once the particle is spent.
    pub fn update(&mut self) -> bool {
        self.prev_pos = self.pos;
        self.pos += self.vel;
        self.vel.y += self.gravity;
        self.vel *= self.drag;
        self.life -= 1.0;
        self.life > 0.0
    }

    /// Render alpha, fading out over the particle's lifetime
    pub fn alpha(&self) -> f32 {
        (self.life / self.max_life).clamp(0.0, 1.0)
    }
}

/// Owns the live particle set
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    pub particles: Vec<Particle>,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Spawn one burst of particles spraying around `base_angle`.
    ///
    /// The burst color is complementary to the creature's current hue,
    /// captured at spawn time.
    pub fn spawn_burst(
        &mut self,
        pos: Vec2,
        base_angle: f32,
        profile: &BurstProfile,
        hue: f32,
        saturation: f32,
        lightness: f32,
        rng: &mut Pcg32,
    ) {
        for _ in 0..profile.count {
            let speed = rng.random_range(profile.min_speed..=profile.max_speed);
            let spread = (rng.random::<f32>() - 0.5) * profile.spray_angle;
            let angle = base_angle + spread;
            self.particles.push(Particle {
                pos,
                prev_pos: pos,
                vel: Vec2::from_angle(angle) * speed,
                life: rng.random_range(profile.min_life..=profile.max_life),
                max_life: profile.max_life,
                size: 1.0 + rng.random::<f32>() * 2.5,
                drag: profile.drag,
                gravity: profile.gravity,
                hue: (hue + 180.0) % 360.0,
                saturation,
                lightness,
            });
        }
    }

    /// Age every particle and drop the spent ones
    pub fn update(&mut self) {
        self.particles.retain_mut(|p| p.update());
    }
}
