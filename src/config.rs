//! Creature tuning
//!
//! Every tunable lives in one structured [`Config`], read once at
//! construction time. Malformed configurations are rejected up front by
//! [`Config::validate`] rather than surfacing as NaN mid-animation.

use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};
use std::fmt;

/// Head geometry and eye reaction tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadConfig {
    pub size: f32,
    pub width_factor: f32,
    pub length_factor: f32,
    pub eyes: EyeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EyeConfig {
    /// Lateral offset from the head center, in head-size units
    pub offset_y: f32,
    /// Forward offset from the head center, in head-size units
    pub offset_x: f32,
    pub size: f32,
    /// Pointer distance at which the eyes start glowing
    pub glow_distance: f32,
    /// Per-tick smoothing factor for the glow intensity
    pub glow_lerp: f32,
}

/// Leg layout, gait timing and limb segment lengths
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegConfig {
    /// Spine indices carrying a leg pair (one leg per side each)
    pub indices: Vec<usize>,
    /// Resting angle from the body heading, one entry per pair
    pub angles: Vec<f32>,
    /// Distance from the body anchor to the natural resting position
    pub natural_length: f32,
    pub leg_width: f32,
    pub segment1: f32,
    pub segment2: f32,
    pub segment3: f32,
    /// Foot drift from the resting position that triggers a step
    pub step_threshold: f32,
    /// Swing duration in ticks
    pub step_duration: u32,
    /// Peak foot lift during the swing arc
    pub step_lift: f32,
    /// How many ticks ahead the body anchor is extrapolated for the step target
    pub step_prediction_frames: f32,
    /// Cap on the extrapolated displacement, so fast turns don't overshoot
    pub max_prediction_distance: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementConfig {
    pub walk_speed: f32,
    /// Pointer pick-up radius around a spine point
    pub grab_radius: f32,
    /// Base follow drag for the chain; loosens toward the tail
    pub spine_drag: f32,
    /// Head decelerates linearly inside this radius around the pointer
    pub slowdown_radius: f32,
    /// Gain of the turn-sway secondary motion
    pub turn_sway: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrikeConfig {
    /// Strike animation length in ticks
    pub duration: u32,
    /// Peak angular deflection of the stinger, radians
    pub angle_offset: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TailConfig {
    pub stinger_length: f32,
    pub idle_wiggle_speed: f32,
    pub idle_wiggle_amount: f32,
    /// Curl pull strength; divided by 100 per relaxation iteration
    pub curl: f32,
    /// First spine index affected by the curl pull
    pub curl_start: usize,
    /// How much the curl relaxes as the head speeds up
    pub speed_curl_factor: f32,
    /// Curl target offset along the heading, from the head
    pub curl_ahead: f32,
    /// Curl target offset perpendicular to the heading ("above" the body)
    pub curl_above: f32,
    pub wag_amount: f32,
    pub wag_speed: f32,
    pub undulation_amount: f32,
    pub undulation_speed: f32,
}

/// Body plate styling used by the renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BodyConfig {
    /// Spine index where the thorax plates end and the tail rings begin
    pub thorax_end_index: usize,
    pub abdomen_ring_scale: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PincerConfig {
    pub open_angle: f32,
    pub closed_angle: f32,
    /// Shoulder to elbow length
    pub length_a: f32,
    /// Elbow to hand length
    pub length_b: f32,
    pub length_finger: f32,
    pub arm_width: f32,
    pub hand_width: f32,
    /// Pointer distance to the head below which the claws snap shut
    pub snap_distance: f32,
    /// Per-tick easing factor for the claw angle
    pub snap_lerp: f32,
    /// Elbow target angle from the heading, mirrored per side
    pub elbow_offset: f32,
    /// Hand target angle from the heading, mirrored per side
    pub hand_offset: f32,
    /// Per-tick smoothing factor for the elbow/hand joints
    pub follow_lerp: f32,
    /// Angular blend of the hand target toward the pointer
    pub aim_bias: f32,
    /// Claw angle below which a closing transition counts as a snap
    pub snap_trigger_angle: f32,
}

/// One particle burst profile (strike spray, dust puff, pincer flash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BurstProfile {
    pub count: u32,
    pub min_life: f32,
    pub max_life: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    /// Full width of the spray cone, radians
    pub spray_angle: f32,
    pub drag: f32,
    pub gravity: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColorConfig {
    pub initial_hue: f32,
    pub saturation: f32,
    pub lightness: f32,
    pub glow_lightness: f32,
    /// Hue degrees advanced per tick, wrapping at 360
    pub hue_change_speed: f32,
    pub glow_pulse_speed: f32,
    pub glow_pulse_amount: f32,
    pub post_strike_glow_boost: f32,
    pub post_strike_glow_decay: f32,
}

/// Scatter distances for one part class during deconstruction
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScatterProfile {
    pub min_dist: f32,
    pub rand_dist: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeconstructionConfig {
    pub duration_frames: u32,
    pub spine_part: ScatterProfile,
    pub leg_part: ScatterProfile,
    pub pincer_part: ScatterProfile,
}

/// Complete creature configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub num_spine_points: usize,
    pub segment_length: f32,
    pub max_speed: f32,
    pub physics_iterations: u32,
    pub head: HeadConfig,
    pub legs: LegConfig,
    pub movement: MovementConfig,
    pub strike: StrikeConfig,
    pub tail: TailConfig,
    pub body: BodyConfig,
    pub pincers: PincerConfig,
    pub strike_burst: BurstProfile,
    pub dust_burst: BurstProfile,
    pub pincer_flash_burst: BurstProfile,
    pub color: ColorConfig,
    pub deconstruction: DeconstructionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_spine_points: 120,
            segment_length: 3.5,
            max_speed: 5.5,
            physics_iterations: 5,
            head: HeadConfig {
                size: 5.5,
                width_factor: 6.0,
                length_factor: 3.0,
                eyes: EyeConfig {
                    offset_y: 1.2,
                    offset_x: 1.8,
                    size: 1.5,
                    glow_distance: 120.0,
                    glow_lerp: 0.08,
                },
            },
            legs: LegConfig {
                indices: vec![2, 4, 6, 8, 10, 12, 14, 16],
                angles: vec![1.1, 1.2, 1.3, 1.4, 1.5, 1.6, 1.7, 1.8],
                natural_length: 50.0,
                leg_width: 4.5,
                segment1: 30.0,
                segment2: 25.0,
                segment3: 15.0,
                step_threshold: 30.0,
                step_duration: 18,
                step_lift: 15.0,
                step_prediction_frames: 12.0,
                max_prediction_distance: 50.0,
            },
            movement: MovementConfig {
                walk_speed: 1.2,
                grab_radius: 20.0,
                spine_drag: 0.9,
                slowdown_radius: 60.0,
                turn_sway: 0.4,
            },
            strike: StrikeConfig {
                duration: 25,
                angle_offset: -1.5,
            },
            tail: TailConfig {
                stinger_length: 22.0,
                idle_wiggle_speed: 0.05,
                idle_wiggle_amount: 0.15,
                curl: 8.0,
                curl_start: 15,
                speed_curl_factor: 1.5,
                curl_ahead: 40.0,
                curl_above: 60.0,
                wag_amount: 1.2,
                wag_speed: 0.2,
                undulation_amount: 2.0,
                undulation_speed: 0.2,
            },
            body: BodyConfig {
                thorax_end_index: 18,
                abdomen_ring_scale: 6.5,
            },
            pincers: PincerConfig {
                open_angle: 0.6,
                closed_angle: 0.05,
                length_a: 25.0,
                length_b: 25.0,
                length_finger: 38.0,
                arm_width: 12.0,
                hand_width: 22.0,
                snap_distance: 80.0,
                snap_lerp: 0.1,
                elbow_offset: 1.2,
                hand_offset: 0.5,
                follow_lerp: 0.2,
                aim_bias: 0.15,
                snap_trigger_angle: 0.1,
            },
            strike_burst: BurstProfile {
                count: 40,
                min_life: 25.0,
                max_life: 50.0,
                min_speed: 3.0,
                max_speed: 7.0,
                spray_angle: 0.8,
                drag: 0.96,
                gravity: 0.08,
            },
            dust_burst: BurstProfile {
                count: 4,
                min_life: 15.0,
                max_life: 30.0,
                min_speed: 0.5,
                max_speed: 1.2,
                spray_angle: PI,
                drag: 0.92,
                gravity: 0.08,
            },
            pincer_flash_burst: BurstProfile {
                count: 5,
                min_life: 10.0,
                max_life: 20.0,
                min_speed: 1.0,
                max_speed: 2.5,
                spray_angle: TAU,
                drag: 0.94,
                gravity: 0.08,
            },
            color: ColorConfig {
                initial_hue: 200.0,
                saturation: 90.0,
                lightness: 80.0,
                glow_lightness: 50.0,
                hue_change_speed: 0.1,
                glow_pulse_speed: 0.08,
                glow_pulse_amount: 3.0,
                post_strike_glow_boost: 10.0,
                post_strike_glow_decay: 0.95,
            },
            deconstruction: DeconstructionConfig {
                duration_frames: 120,
                spine_part: ScatterProfile {
                    min_dist: 150.0,
                    rand_dist: 150.0,
                },
                leg_part: ScatterProfile {
                    min_dist: 200.0,
                    rand_dist: 200.0,
                },
                pincer_part: ScatterProfile {
                    min_dist: 180.0,
                    rand_dist: 180.0,
                },
            },
        }
    }
}

/// Configuration rejected at construction time
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A length, speed, duration or threshold that must be > 0 wasn't
    NonPositive(&'static str),
    /// A [min, max] range with min > max, or a factor outside (0, 1]
    InvalidRange(&'static str),
    /// Fewer than 3 spine points can't carry legs, pincers and a stinger
    ChainTooShort(usize),
    /// A leg's spine index (plus the heading lookahead) must fit the chain
    LegIndexOutOfBounds { index: usize, chain_len: usize },
    /// One resting angle is required per leg pair
    LegAngleCountMismatch { indices: usize, angles: usize },
    /// The curl region must start inside the chain
    CurlStartOutOfBounds { start: usize, chain_len: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositive(field) => {
                write!(f, "config field `{field}` must be > 0")
            }
            ConfigError::InvalidRange(field) => {
                write!(f, "config field `{field}` has an invalid range")
            }
            ConfigError::ChainTooShort(n) => {
                write!(f, "num_spine_points = {n}, need at least 3")
            }
            ConfigError::LegIndexOutOfBounds { index, chain_len } => {
                write!(
                    f,
                    "leg spine index {index} needs index {} for its heading, chain has {chain_len} points",
                    index + 1
                )
            }
            ConfigError::LegAngleCountMismatch { indices, angles } => {
                write!(f, "{indices} leg pairs but {angles} resting angles")
            }
            ConfigError::CurlStartOutOfBounds { start, chain_len } => {
                write!(f, "curl_start {start} outside chain of {chain_len} points")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Parse a configuration from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would produce non-finite geometry
    pub fn validate(&self) -> Result<(), ConfigError> {
        use ConfigError::*;

        if self.num_spine_points < 3 {
            return Err(ChainTooShort(self.num_spine_points));
        }
        if self.segment_length <= 0.0 {
            return Err(NonPositive("segment_length"));
        }
        if self.max_speed <= 0.0 {
            return Err(NonPositive("max_speed"));
        }
        if self.physics_iterations == 0 {
            return Err(NonPositive("physics_iterations"));
        }
        if self.movement.walk_speed <= 0.0 {
            return Err(NonPositive("movement.walk_speed"));
        }
        if self.movement.grab_radius <= 0.0 {
            return Err(NonPositive("movement.grab_radius"));
        }
        if self.movement.slowdown_radius <= 0.0 {
            return Err(NonPositive("movement.slowdown_radius"));
        }
        if !(0.0..1.0).contains(&self.movement.spine_drag) {
            return Err(InvalidRange("movement.spine_drag"));
        }

        if self.legs.angles.len() != self.legs.indices.len() {
            return Err(LegAngleCountMismatch {
                indices: self.legs.indices.len(),
                angles: self.legs.angles.len(),
            });
        }
        for &index in &self.legs.indices {
            // The body heading at a leg anchor reads the next spine point.
            if index + 1 >= self.num_spine_points {
                return Err(LegIndexOutOfBounds {
                    index,
                    chain_len: self.num_spine_points,
                });
            }
        }
        if self.legs.natural_length <= 0.0 {
            return Err(NonPositive("legs.natural_length"));
        }
        if self.legs.segment1 <= 0.0 || self.legs.segment2 <= 0.0 || self.legs.segment3 <= 0.0 {
            return Err(NonPositive("legs.segment lengths"));
        }
        if self.legs.step_threshold <= 0.0 {
            return Err(NonPositive("legs.step_threshold"));
        }
        if self.legs.step_duration == 0 {
            return Err(NonPositive("legs.step_duration"));
        }
        if self.legs.max_prediction_distance <= 0.0 {
            return Err(NonPositive("legs.max_prediction_distance"));
        }

        if self.strike.duration == 0 {
            return Err(NonPositive("strike.duration"));
        }

        if self.tail.curl_start >= self.num_spine_points {
            return Err(CurlStartOutOfBounds {
                start: self.tail.curl_start,
                chain_len: self.num_spine_points,
            });
        }
        if self.tail.stinger_length <= 0.0 {
            return Err(NonPositive("tail.stinger_length"));
        }

        if self.pincers.length_a <= 0.0 || self.pincers.length_b <= 0.0 {
            return Err(NonPositive("pincers arm lengths"));
        }
        if self.pincers.open_angle <= self.pincers.closed_angle {
            return Err(InvalidRange("pincers.open_angle/closed_angle"));
        }
        if self.pincers.snap_distance <= 0.0 {
            return Err(NonPositive("pincers.snap_distance"));
        }
        if !(0.0..=1.0).contains(&self.pincers.snap_lerp)
            || !(0.0..=1.0).contains(&self.pincers.follow_lerp)
        {
            return Err(InvalidRange("pincers lerp factors"));
        }

        for (profile, life_field) in [
            (&self.strike_burst, "strike_burst life range"),
            (&self.dust_burst, "dust_burst life range"),
            (&self.pincer_flash_burst, "pincer_flash_burst life range"),
        ] {
            if profile.count == 0 {
                return Err(NonPositive("burst count"));
            }
            if profile.min_life <= 0.0 || profile.min_life > profile.max_life {
                return Err(InvalidRange(life_field));
            }
            if profile.min_speed < 0.0 || profile.min_speed > profile.max_speed {
                return Err(InvalidRange("burst speed range"));
            }
            if !(0.0..=1.0).contains(&profile.drag) {
                return Err(InvalidRange("burst drag"));
            }
        }

        if !(0.0..1.0).contains(&self.color.post_strike_glow_decay) {
            return Err(InvalidRange("color.post_strike_glow_decay"));
        }

        if self.deconstruction.duration_frames == 0 {
            return Err(NonPositive("deconstruction.duration_frames"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        Config::default().validate().expect("default must be valid");
    }

    #[test]
    fn test_rejects_short_chain() {
        let mut config = Config::default();
        config.num_spine_points = 2;
        assert_eq!(config.validate(), Err(ConfigError::ChainTooShort(2)));
    }

    #[test]
    fn test_rejects_leg_past_chain_end() {
        let mut config = Config::default();
        config.num_spine_points = 10;
        config.tail.curl_start = 5;
        // Pair index 14 has no heading lookahead in a 10-point chain.
        assert!(matches!(
            config.validate(),
            Err(ConfigError::LegIndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_rejects_nonpositive_step_duration() {
        let mut config = Config::default();
        config.legs.step_duration = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::NonPositive("legs.step_duration"))
        );
    }

    #[test]
    fn test_rejects_inverted_burst_life_range() {
        let mut config = Config::default();
        config.dust_burst.min_life = 40.0;
        config.dust_burst.max_life = 10.0;
        assert!(matches!(config.validate(), Err(ConfigError::InvalidRange(_))));
    }

    #[test]
    fn test_json_round_trip() {
        let config = Config::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed = Config::from_json(&json).unwrap();
        assert_eq!(parsed.num_spine_points, config.num_spine_points);
        assert_eq!(parsed.legs.indices, config.legs.indices);
    }
}
