//! Gear selection
//!
//! Shifts are requested as press edges and applied at most once each. The
//! interlock keeps the box out of reverse while rolling forward and out of
//! the forward gears while rolling backward; near standstill both crossings
//! are allowed. Requests beyond the gear range are silently ignored.

use crate::config::VehicleConfig;
use crate::input::InputSnapshot;
use crate::state::VehicleState;

#[derive(Debug, Clone)]
pub struct Transmission {
    top_gear: i32,
    reverse_limit: i32,
    stop_speed: f64,
}

impl Transmission {
    pub fn new(config: &VehicleConfig) -> Self {
        Self {
            top_gear: config.top_gear,
            reverse_limit: config.reverse_limit,
            stop_speed: config.shift_stop_speed,
        }
    }

    /// Apply this tick's shift edges to the vehicle state
    pub fn apply(&self, state: &mut VehicleState, input: &InputSnapshot) {
        if input.shift_up {
            let gear = self.shift_up(state.gear, state.speed);
            if gear != state.gear {
                tracing::trace!("Shift up: {} -> {}", state.gear, gear);
            }
            state.gear = gear;
        }
        if input.shift_down {
            let gear = self.shift_down(state.gear, state.speed);
            if gear != state.gear {
                tracing::trace!("Shift down: {} -> {}", state.gear, gear);
            }
            state.gear = gear;
        }
    }

    /// Next gear for an upshift request, unchanged if the shift is blocked.
    /// Leaving reverse is always allowed; entering the forward range from
    /// neutral requires the car to not be rolling backward.
    pub fn shift_up(&self, gear: i32, speed: f64) -> i32 {
        if gear < 0 || (speed > -self.stop_speed && gear < self.top_gear) {
            gear + 1
        } else {
            gear
        }
    }

    /// Next gear for a downshift request, unchanged if the shift is blocked.
    /// Downshifting within the forward range is always allowed; entering
    /// reverse requires the car to be near standstill.
    pub fn shift_down(&self, gear: i32, speed: f64) -> i32 {
        if gear > 0 || (speed < self.stop_speed && gear > self.reverse_limit) {
            gear - 1
        } else {
            gear
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn gearbox() -> Transmission {
        Transmission::new(&VehicleConfig::default())
    }

    #[test]
    fn upshifts_run_through_forward_range() {
        let t = gearbox();
        let mut gear = 0;
        for expected in 1..=7 {
            gear = t.shift_up(gear, 0.0);
            assert_eq!(gear, expected);
        }
        assert_eq!(t.shift_up(7, 0.0), 7, "top gear clamps");
    }

    #[test]
    fn reverse_blocked_while_rolling_forward() {
        let t = gearbox();
        assert_eq!(t.shift_down(0, 2.0), 0);
        assert_eq!(t.shift_down(0, 0.5), 0, "exactly at the stop threshold still blocks");
        assert_eq!(t.shift_down(0, 0.3), -1, "near standstill engages reverse");
        assert_eq!(t.shift_down(0, -1.0), -1, "rolling backward may engage reverse");
    }

    #[test]
    fn forward_blocked_while_rolling_backward() {
        let t = gearbox();
        assert_eq!(t.shift_up(0, -2.0), 0);
        assert_eq!(t.shift_up(0, -0.2), 1);
        assert_eq!(t.shift_up(-1, -2.0), 0, "leaving reverse for neutral is always allowed");
    }

    #[test]
    fn downshift_in_forward_range_always_allowed() {
        let t = gearbox();
        assert_eq!(t.shift_down(5, 30.0), 4);
        assert_eq!(t.shift_down(1, 10.0), 0);
    }

    #[test]
    fn reverse_limit_clamps() {
        let t = gearbox();
        assert_eq!(t.shift_down(-1, 0.0), -1);

        let deep = Transmission::new(&VehicleConfig {
            reverse_limit: -3,
            ..VehicleConfig::default()
        });
        assert_eq!(deep.shift_down(-1, 0.0), -2);
        assert_eq!(deep.shift_down(-3, 0.0), -3);
    }

    #[test]
    fn apply_consumes_edges() {
        let t = gearbox();
        let config = VehicleConfig::default();
        let mut state = VehicleState::new(&config);

        let up = InputSnapshot {
            shift_up: true,
            ..InputSnapshot::default()
        };
        t.apply(&mut state, &up);
        assert_eq!(state.gear, 1);

        t.apply(&mut state, &InputSnapshot::default());
        assert_eq!(state.gear, 1, "no edge, no shift");
    }
}
