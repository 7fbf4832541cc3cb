//! Creature state and input entry points
//!
//! The `Scorpion` exclusively owns every mutable part: spine, legs,
//! pincers, particles and the seeded RNG. Input handlers only flip small
//! state that the next tick reads; the most recent pointer sample wins.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::deconstruct::{Assembly, PartScatter, ScatterMap};
use super::leg::Leg;
use super::particle::ParticleSystem;
use super::pincer::PincerArm;
use super::spine::SpineChain;
use crate::config::{Config, ConfigError};

/// Whether the pointer currently holds a spine point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrabState {
    Free,
    Held { point_index: usize },
}

/// Stinger strike animation state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrikeState {
    Idle,
    Striking {
        progress: u32,
        /// Pointer position captured at trigger time (cosmetic)
        target: Vec2,
    },
}

/// Complete creature state, advanced by [`super::tick`]
#[derive(Debug, Clone)]
pub struct Scorpion {
    pub config: Config,
    pub spine: SpineChain,
    pub legs: Vec<Leg>,
    pub pincers: [PincerArm; 2],
    pub particles: ParticleSystem,
    pub assembly: Assembly,

    /// Latest pointer sample in surface coordinates
    pub pointer: Vec2,
    /// Head displacement over the last tick
    pub head_velocity: Vec2,
    pub head_speed: f32,
    /// Heading; held when nearly stationary to avoid jitter
    pub head_angle: f32,
    pub last_head_angle: f32,
    /// Wrapped (-π, π] heading change over the last tick
    pub head_angular_velocity: f32,

    pub grab: GrabState,
    pub strike: StrikeState,

    /// Body hue, cycling mod 360
    pub hue: f32,
    /// Decaying boost applied when a strike lands
    pub post_strike_glow: f32,
    /// Smoothed 0..1 eye reaction to the pointer
    pub eye_glow: f32,

    /// Tick counter; phase accumulator for the oscillators
    pub frame: u64,
    pub rng: Pcg32,
}

impl Scorpion {
    /// Build the creature at `origin`, rejecting invalid configurations.
    pub fn new(config: Config, origin: Vec2, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;

        let spine = SpineChain::new(origin, config.num_spine_points, config.segment_length);

        let mut legs = Vec::with_capacity(config.legs.indices.len() * 2);
        let mut leg_counter: u8 = 0;
        for (pair, &spine_index) in config.legs.indices.iter().enumerate() {
            let body_point = spine.points[spine_index];
            let body_angle = (spine.points[spine_index + 1] - body_point).to_angle();
            for side in [-1.0, 1.0] {
                legs.push(Leg::new(
                    spine_index,
                    side,
                    leg_counter % 2,
                    config.legs.angles[pair],
                    body_point,
                    body_angle,
                    &config.legs,
                ));
                leg_counter += 1;
            }
        }

        let anchor = spine.points[1];
        let pincers = [
            PincerArm::new(-1.0, anchor, 0.0, &config.pincers),
            PincerArm::new(1.0, anchor, 0.0, &config.pincers),
        ];

        log::info!(
            "scorpion assembled: {} spine points, {} legs, seed {}",
            spine.len(),
            legs.len(),
            seed
        );

        Ok(Self {
            hue: config.color.initial_hue,
            spine,
            legs,
            pincers,
            particles: ParticleSystem::new(),
            assembly: Assembly::new(config.deconstruction.duration_frames),
            pointer: origin,
            head_velocity: Vec2::ZERO,
            head_speed: 0.0,
            head_angle: 0.0,
            last_head_angle: 0.0,
            head_angular_velocity: 0.0,
            grab: GrabState::Free,
            strike: StrikeState::Idle,
            post_strike_glow: 0.0,
            eye_glow: 0.0,
            frame: 0,
            rng: Pcg32::seed_from_u64(seed),
            config,
        })
    }

    pub fn head(&self) -> Vec2 {
        self.spine.head()
    }

    pub fn is_grabbed(&self) -> bool {
        matches!(self.grab, GrabState::Held { .. })
    }

    /// The grab pin for this tick, if any
    pub fn grabbed_pin(&self) -> Option<(usize, Vec2)> {
        match self.grab {
            GrabState::Held { point_index } => Some((point_index, self.pointer)),
            GrabState::Free => None,
        }
    }

    /// Update the pointer sample; called on every move/drag event
    pub fn set_pointer(&mut self, pos: Vec2) {
        self.pointer = pos;
    }

    /// Pick up the first spine point within the grab radius, if any
    pub fn begin_grab(&mut self) {
        if self.is_grabbed() || !self.assembly.is_assembled() {
            return;
        }
        for (i, point) in self.spine.points.iter().enumerate() {
            if self.pointer.distance(*point) < self.config.movement.grab_radius {
                self.grab = GrabState::Held { point_index: i };
                log::debug!("grabbed spine point {i}");
                return;
            }
        }
    }

    pub fn end_grab(&mut self) {
        if self.is_grabbed() {
            self.grab = GrabState::Free;
            log::debug!("grab released");
        }
    }

    /// Attempt Idle → Striking. No-op while striking, grabbed or scattered.
    pub fn trigger_strike(&mut self) {
        if self.strike == StrikeState::Idle && !self.is_grabbed() && self.assembly.is_assembled() {
            self.strike = StrikeState::Striking {
                progress: 0,
                target: self.pointer,
            };
            log::debug!("strike started toward {:?}", self.pointer);
        }
    }

    /// Flip Assembled ↔ Disassembled. No-op mid-transition.
    pub fn toggle_deconstruction(&mut self) {
        use super::deconstruct::AssemblyPhase;
        match self.assembly.phase {
            AssemblyPhase::Assembled => {
                self.end_grab();
                let map = self.capture_scatter();
                self.assembly.begin_disassemble(map);
                log::debug!("deconstruction started");
            }
            AssemblyPhase::Disassembled => {
                self.assembly.begin_reassemble();
                log::debug!("reassembly started");
            }
            AssemblyPhase::Disassembling | AssemblyPhase::Reassembling => {}
        }
    }

    /// Snapshot a scatter target for every part
    fn capture_scatter(&mut self) -> ScatterMap {
        let cfg = &self.config.deconstruction;
        let mut map = ScatterMap::default();
        for &point in &self.spine.points {
            map.spine
                .push(PartScatter::capture(point, cfg.spine_part, &mut self.rng));
        }
        for leg in &self.legs {
            map.feet
                .push(PartScatter::capture(leg.foot, cfg.leg_part, &mut self.rng));
        }
        for arm in &self.pincers {
            map.pincer_elbows
                .push(PartScatter::capture(arm.elbow, cfg.pincer_part, &mut self.rng));
            map.pincer_hands
                .push(PartScatter::capture(arm.hand, cfg.pincer_part, &mut self.rng));
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_config() -> Config {
        let mut config = Config::default();
        config.num_spine_points = 10;
        config.tail.curl_start = 5;
        config.legs.indices = vec![2, 4];
        config.legs.angles = vec![1.1, 1.2];
        config
    }

    #[test]
    fn test_construction_rejects_bad_config() {
        let mut config = Config::default();
        config.segment_length = 0.0;
        assert!(Scorpion::new(config, Vec2::ZERO, 1).is_err());
    }

    #[test]
    fn test_leg_layout_alternates_groups() {
        let scorpion = Scorpion::new(small_config(), Vec2::ZERO, 1).unwrap();
        assert_eq!(scorpion.legs.len(), 4);
        let groups: Vec<u8> = scorpion.legs.iter().map(|l| l.gait_group).collect();
        assert_eq!(groups, vec![0, 1, 0, 1]);
        let sides: Vec<f32> = scorpion.legs.iter().map(|l| l.side).collect();
        assert_eq!(sides, vec![-1.0, 1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_grab_requires_proximity() {
        let mut scorpion = Scorpion::new(small_config(), Vec2::ZERO, 1).unwrap();
        scorpion.set_pointer(Vec2::new(500.0, 500.0));
        scorpion.begin_grab();
        assert_eq!(scorpion.grab, GrabState::Free);

        scorpion.set_pointer(Vec2::ZERO);
        scorpion.begin_grab();
        assert_eq!(scorpion.grab, GrabState::Held { point_index: 0 });
    }

    #[test]
    fn test_strike_blocked_while_grabbed() {
        let mut scorpion = Scorpion::new(small_config(), Vec2::ZERO, 1).unwrap();
        scorpion.set_pointer(Vec2::ZERO);
        scorpion.begin_grab();
        scorpion.trigger_strike();
        assert_eq!(scorpion.strike, StrikeState::Idle);

        scorpion.end_grab();
        scorpion.trigger_strike();
        assert!(matches!(scorpion.strike, StrikeState::Striking { .. }));
    }

    #[test]
    fn test_retrigger_strike_is_noop() {
        let mut scorpion = Scorpion::new(small_config(), Vec2::ZERO, 1).unwrap();
        scorpion.trigger_strike();
        let before = scorpion.strike;
        scorpion.set_pointer(Vec2::new(100.0, 0.0));
        scorpion.trigger_strike();
        assert_eq!(scorpion.strike, before);
    }

    #[test]
    fn test_toggle_noop_mid_transition() {
        let mut scorpion = Scorpion::new(small_config(), Vec2::ZERO, 1).unwrap();
        scorpion.toggle_deconstruction();
        let phase = scorpion.assembly.phase;
        scorpion.toggle_deconstruction();
        assert_eq!(scorpion.assembly.phase, phase);
    }

    #[test]
    fn test_scatter_covers_every_part() {
        let mut scorpion = Scorpion::new(small_config(), Vec2::ZERO, 1).unwrap();
        scorpion.toggle_deconstruction();
        let map = scorpion.assembly.scatter.as_ref().unwrap();
        assert_eq!(map.spine.len(), 10);
        assert_eq!(map.feet.len(), 4);
        assert_eq!(map.pincer_elbows.len(), 2);
        assert_eq!(map.pincer_hands.len(), 2);
    }
}
