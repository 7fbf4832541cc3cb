//! Deconstruction: scatter the creature into parts and put it back
//!
//! A purely cosmetic state machine. While it is anywhere but `Assembled`
//! the simulation is frozen; only the transition counter advances, and the
//! renderer interpolates every part between its captured home pose and a
//! random scatter target.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use std::f32::consts::TAU;

use crate::config::ScatterProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyPhase {
    Assembled,
    Disassembling,
    Disassembled,
    Reassembling,
}

/// Home pose and scatter target for one part
#[derive(Debug, Clone, Copy)]
pub struct PartScatter {
    pub home: Vec2,
    pub scatter: Vec2,
}

impl PartScatter {
    /// Pick a random scatter target around `home`
    pub fn capture(home: Vec2, profile: ScatterProfile, rng: &mut Pcg32) -> Self {
        let angle = rng.random_range(0.0..TAU);
        let dist = profile.min_dist + rng.random::<f32>() * profile.rand_dist;
        Self {
            home,
            scatter: home + Vec2::from_angle(angle) * dist,
        }
    }

    pub fn at(&self, blend: f32) -> Vec2 {
        self.home.lerp(self.scatter, blend)
    }
}

/// Snapshot of every part, captured when disassembly starts
#[derive(Debug, Clone, Default)]
pub struct ScatterMap {
    pub spine: Vec<PartScatter>,
    pub feet: Vec<PartScatter>,
    pub pincer_elbows: Vec<PartScatter>,
    pub pincer_hands: Vec<PartScatter>,
}

#[derive(Debug, Clone)]
pub struct Assembly {
    pub phase: AssemblyPhase,
    /// Ticks elapsed in the current transition
    ticks: u32,
    /// Transition length in ticks
    duration: u32,
    pub scatter: Option<ScatterMap>,
}

impl Assembly {
    pub fn new(duration_frames: u32) -> Self {
        Self {
            phase: AssemblyPhase::Assembled,
            ticks: 0,
            duration: duration_frames,
            scatter: None,
        }
    }

    pub fn is_assembled(&self) -> bool {
        self.phase == AssemblyPhase::Assembled
    }

    /// Linear 0..1 within the current transition
    pub fn progress(&self) -> f32 {
        (self.ticks as f32 / self.duration as f32).min(1.0)
    }

    /// Scatter blend: 0 = home pose, 1 = fully scattered
    pub fn blend(&self) -> f32 {
        match self.phase {
            AssemblyPhase::Assembled => 0.0,
            AssemblyPhase::Disassembling => self.progress(),
            AssemblyPhase::Disassembled => 1.0,
            AssemblyPhase::Reassembling => 1.0 - self.progress(),
        }
    }

    /// Start scattering from the assembled pose. Caller captures the map.
    pub fn begin_disassemble(&mut self, scatter: ScatterMap) {
        self.phase = AssemblyPhase::Disassembling;
        self.ticks = 0;
        self.scatter = Some(scatter);
    }

    pub fn begin_reassemble(&mut self) {
        self.phase = AssemblyPhase::Reassembling;
        self.ticks = 0;
    }

    /// Advance the transition by one tick. No-op in the two rest states.
    pub fn advance(&mut self) {
        match self.phase {
            AssemblyPhase::Disassembling => {
                self.ticks += 1;
                if self.ticks >= self.duration {
                    self.ticks = self.duration;
                    self.phase = AssemblyPhase::Disassembled;
                    log::debug!("deconstruction complete");
                }
            }
            AssemblyPhase::Reassembling => {
                self.ticks += 1;
                if self.ticks >= self.duration {
                    self.ticks = 0;
                    self.phase = AssemblyPhase::Assembled;
                    self.scatter = None;
                    log::debug!("reassembly complete");
                }
            }
            AssemblyPhase::Assembled | AssemblyPhase::Disassembled => {}
        }
    }
}
