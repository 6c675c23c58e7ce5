//! Vehicle tuning parameters
//!
//! Every magic number of the dynamics model lives here: gear range, power
//! and torque scale, the RPM rev/decay schedule, steering gains, braking,
//! camera smoothing, tick rate. The defaults reproduce the historical demo
//! car; a partial JSON file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error loading a tuning file from disk
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// All tunables of the simulation, with the historical constants as defaults
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Engine speed at rest, the floor for every reported RPM value
    pub idle_rpm: f64,
    /// Hard RPM ceiling when revving in neutral
    pub rpm_max: f64,
    /// RPM above which neutral revving slows down
    pub redline_onset: f64,
    /// Neutral rev step per tick below `redline_onset`
    pub rev_gain: f64,
    /// Neutral rev step per tick at or above `redline_onset`
    pub rev_gain_soft: f64,
    /// Neutral RPM falloff per tick with the throttle released
    pub rev_decay: f64,
    /// RPM reported when an engaged gear runs at exactly its top speed
    pub rpm_scale: f64,
    /// Highest forward gear
    pub top_gear: i32,
    /// Lowest (reverse) gear, zero or negative
    pub reverse_limit: i32,
    /// Below this absolute speed the car counts as stopped for shifting
    pub shift_stop_speed: f64,
    /// Top speed of a hypothetical gear at the far end of the curve
    pub power_max: f64,
    /// Scale from torque to speed gained per throttle tick
    pub accel_coefficient: f64,
    /// Per-tick speed retention, slightly below 1
    pub resistance_factor: f64,
    /// Maximum speed shed per braking tick
    pub brake_speed: f64,
    /// Divisor scale of the high-speed steering formula
    pub steering_coefficient: f64,
    /// Slope of the low-speed linear steering response
    pub steering_gain: f64,
    /// Steering authority above which the high-speed formula takes over
    pub steering_threshold: f64,
    /// Fraction of the remaining camera offset closed per tick
    pub camera_smoothing: f64,
    /// Multiplier from internal speed units to displayed km/h
    pub display_speed_scale: f64,
    /// Simulation ticks per second
    pub tick_rate: u32,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            idle_rpm: 750.0,
            rpm_max: 12_500.0,
            redline_onset: 12_000.0,
            rev_gain: 800.0,
            rev_gain_soft: 300.0,
            rev_decay: 150.0,
            rpm_scale: 12_500.0,
            top_gear: 7,
            reverse_limit: -1,
            shift_stop_speed: 0.5,
            power_max: 40.0,
            accel_coefficient: 0.005,
            resistance_factor: 0.998,
            brake_speed: 0.2,
            steering_coefficient: 550.0,
            steering_gain: 0.8,
            steering_threshold: 5.0,
            camera_smoothing: 0.3,
            display_speed_scale: 9.0,
            tick_rate: 60,
        }
    }
}

impl VehicleConfig {
    /// Load a tuning file. Missing fields fall back to defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        let config: VehicleConfig = serde_json::from_str(&json)?;
        Ok(config.normalized())
    }

    /// Load a tuning file, falling back to defaults if it is missing or bad
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                tracing::info!("Loaded vehicle config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("Using default vehicle config: {}", e);
                Self::default()
            }
        }
    }

    /// Clamp fields that other components divide by or iterate over
    pub fn normalized(mut self) -> Self {
        self.top_gear = self.top_gear.max(1);
        self.reverse_limit = self.reverse_limit.min(0);
        self.tick_rate = self.tick_rate.max(1);
        self.rpm_max = self.rpm_max.max(self.idle_rpm);
        self.camera_smoothing = self.camera_smoothing.clamp(f64::EPSILON, 1.0);
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
