//! Skitter entry point
//!
//! Headless demo driver: owns the frame cadence, feeds the creature a
//! scripted pointer path and periodically exercises the strike, grab and
//! deconstruction inputs. The simulation core itself has no loop.

use std::time::{Duration, Instant};

use glam::Vec2;

use skitter::config::Config;
use skitter::render::build_frame;
use skitter::sim::{Scorpion, tick};

const TICK_RATE: f32 = 60.0;
const DEMO_TICKS: u64 = 1200;
const ORIGIN: Vec2 = Vec2::new(480.0, 360.0);

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            log::info!("loaded config from {path}");
            Config::from_json(&json)?
        }
        None => Config::default(),
    };
    let seed = match args.next() {
        Some(raw) => raw.parse::<u64>()?,
        None => 0xC0FFEE,
    };

    let mut scorpion = Scorpion::new(config, ORIGIN, seed)?;
    let frame_budget = Duration::from_secs_f32(1.0 / TICK_RATE);

    for t in 0..DEMO_TICKS {
        let started = Instant::now();

        scorpion.set_pointer(pointer_path(t));
        script_inputs(&mut scorpion, t);
        tick(&mut scorpion);
        let frame = build_frame(&scorpion);

        if t % 60 == 0 {
            let head = scorpion.head();
            log::info!(
                "tick {t}: head ({:.1}, {:.1}), {} particles, {} vertices",
                head.x,
                head.y,
                scorpion.particles.len(),
                frame.len()
            );
        }

        if let Some(remaining) = frame_budget.checked_sub(started.elapsed()) {
            std::thread::sleep(remaining);
        }
    }

    log::info!("demo finished after {DEMO_TICKS} ticks");
    Ok(())
}

/// Slow lissajous sweep around the arena center
fn pointer_path(t: u64) -> Vec2 {
    let t = t as f32 / TICK_RATE;
    ORIGIN + Vec2::new((t * 0.7).cos() * 220.0, (t * 1.1).sin() * 150.0)
}

/// Exercise each input once in a while
fn script_inputs(scorpion: &mut Scorpion, t: u64) {
    match t {
        180 | 480 => scorpion.trigger_strike(),
        300 => {
            // Reach for the head so the grab actually lands, then let the
            // pointer path drag it around until release.
            scorpion.set_pointer(scorpion.head());
            scorpion.begin_grab();
        }
        360 => scorpion.end_grab(),
        600 | 900 => scorpion.toggle_deconstruction(),
        _ => {}
    }
}
