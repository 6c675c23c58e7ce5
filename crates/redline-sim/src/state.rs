//! Vehicle state
//!
//! The one value type every component mutates and every boundary reads.
//! Renderers and HUDs get a shared reference to this; they never own
//! simulation fields of their own.

use crate::config::VehicleConfig;

/// Full physical state of the vehicle, updated in place once per tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleState {
    /// World position in simulation units
    pub position: (f64, f64),
    /// Travel direction in degrees, kept in [0, 360)
    pub heading: f64,
    /// Signed speed along the heading (negative while reversing)
    pub speed: f64,
    /// Selected gear: negative = reverse, 0 = neutral
    pub gear: i32,
    /// Engine speed, never below the configured idle
    pub rpm: f64,
    /// Throttle held this tick
    pub throttle: bool,
    /// Brake held this tick
    pub brake: bool,
    /// Steering intent this tick: +1 left, -1 right
    pub steering: i8,
}

impl VehicleState {
    /// Fresh state at the world origin: stopped, neutral, engine idling
    pub fn new(config: &VehicleConfig) -> Self {
        Self {
            position: (0.0, 0.0),
            heading: 0.0,
            speed: 0.0,
            gear: 0,
            rpm: config.idle_rpm,
            throttle: false,
            brake: false,
            steering: 0,
        }
    }

    /// Gear label for display: "N", "1".."7", "R1".."Rn"
    pub fn gear_label(&self) -> String {
        match self.gear {
            0 => "N".to_string(),
            g if g > 0 => g.to_string(),
            g => format!("R{}", -g),
        }
    }

    /// Speed scaled for display (km/h), signed while reversing
    pub fn display_speed(&self, config: &VehicleConfig) -> f64 {
        self.speed * config.display_speed_scale
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
