//! Deterministic simulation module
//!
//! All creature logic lives here. This module must be pure and deterministic:
//! - One tick per display frame, fixed order of update phases
//! - Seeded RNG only
//! - Cross-part reads are fresh per-tick snapshots, never cached references
//! - No rendering or platform dependencies

pub mod deconstruct;
pub mod leg;
pub mod particle;
pub mod pincer;
pub mod spine;
pub mod state;
pub mod tick;

pub use deconstruct::{Assembly, AssemblyPhase, PartScatter, ScatterMap};
pub use leg::{GaitPhase, Leg, LegContext, LegPose, solve_knee, solve_pose};
pub use particle::{Particle, ParticleSystem};
pub use pincer::{PincerArm, PincerContext};
pub use spine::{SpineChain, SpineMotion};
pub use state::{GrabState, Scorpion, StrikeState};
pub use tick::tick;
