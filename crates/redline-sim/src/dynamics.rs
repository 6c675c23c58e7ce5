//! Speed integration
//!
//! Per-tick update of the signed speed scalar:
//!   - gear curves: `power` (a gear's top speed) and `torque` (its
//!     acceleration headroom), linear and complementary in the gear index
//!   - throttle acceleration plus an asymptotic limiter that pulls speed
//!     back toward the gear's top speed once it is exceeded
//!   - rolling resistance as a constant per-tick retention factor
//!   - braking that bleeds speed toward exactly zero, never past it
//!
//! Displacement is split into its own step so heading changes from the
//! steering model apply before the tick's movement.

use crate::config::VehicleConfig;
use crate::state::VehicleState;

/// Gear index as the curves see it: magnitude, floored at 1 so a stray
/// neutral never produces a zero divisor
fn effective_gear(gear: i32) -> f64 {
    gear.abs().max(1) as f64
}

/// Top speed reachable in a gear (always positive, by gear magnitude)
pub fn power(config: &VehicleConfig, gear: i32) -> f64 {
    let span = (config.top_gear + 1) as f64;
    config.power_max * effective_gear(gear) / span
}

/// Acceleration headroom of a gear: high in low gears, thin near the top
pub fn torque(config: &VehicleConfig, gear: i32) -> f64 {
    let span = (config.top_gear + 1) as f64;
    config.power_max * (1.0 - effective_gear(gear) / span)
}

#[derive(Debug, Clone)]
pub struct DynamicsIntegrator {
    config: VehicleConfig,
}

impl DynamicsIntegrator {
    pub fn new(config: VehicleConfig) -> Self {
        Self { config }
    }

    /// Run one tick of the speed model
    pub fn update_speed(&self, state: &mut VehicleState) {
        let config = &self.config;

        if state.gear != 0 {
            let dir = if state.gear > 0 { 1.0 } else { -1.0 };
            let throttle = if state.throttle { 1.0 } else { 0.0 };
            let cap = power(config, state.gear);

            if state.throttle {
                state.speed += dir * torque(config, state.gear) * config.accel_coefficient;
            }

            // Past the gear's top speed: approach the signed cap by half
            // the overshoot with throttle held, a third without
            if state.speed.abs() > cap {
                state.speed -= (state.speed - dir * cap) / (3.0 - throttle);
            }
        }

        state.speed *= config.resistance_factor;

        if state.brake {
            let coef = config.brake_speed.min(state.speed.abs());
            state.speed -= coef.copysign(state.speed);
        }
    }

    /// Move the car along its heading by the current speed
    pub fn advance_position(&self, state: &mut VehicleState) {
        let heading = state.heading.to_radians();
        state.position.0 += state.speed * heading.cos();
        state.position.1 += state.speed * heading.sin();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
