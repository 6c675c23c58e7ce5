//! Steering response
//!
//! Turn rate depends on speed in two pieces. At low speed the response is
//! linear in speed, so a stationary car cannot turn and a slowly reversing
//! car steers with inverted sense, like real counter-steering in reverse.
//! Once the linear authority would exceed a threshold the inverse-speed
//! formula takes over and turn rate shrinks again as speed grows.
//!
//! The resulting per-tick heading delta stays far below a full revolution,
//! so a single conditional step keeps the heading inside [0, 360).

use crate::config::VehicleConfig;
use crate::state::VehicleState;

#[derive(Debug, Clone)]
pub struct SteeringModel {
    config: VehicleConfig,
}

impl SteeringModel {
    pub fn new(config: VehicleConfig) -> Self {
        Self { config }
    }

    /// Apply this tick's steering intent to the heading
    pub fn update_heading(&self, state: &mut VehicleState) {
        let config = &self.config;
        let steering = state.steering as f64;

        let authority = steering * state.speed * config.steering_gain;
        let delta = if authority.abs() > config.steering_threshold {
            // Above the threshold speed is necessarily nonzero
            steering / (state.speed.abs() / 3.0 * 40.0 / config.steering_coefficient)
        } else {
            authority
        };

        state.heading += delta;
        if state.heading >= 360.0 {
            state.heading -= 360.0;
        }
        if state.heading < 0.0 {
            state.heading += 360.0;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn setup() -> (SteeringModel, VehicleState) {
        let config = VehicleConfig::default();
        (SteeringModel::new(config), VehicleState::new(&config))
    }

    #[test]
    fn stationary_car_does_not_turn() {
        let (model, mut state) = setup();
        state.steering = 1;
        model.update_heading(&mut state);
        assert_eq!(state.heading, 0.0);
    }

    #[test]
    fn low_speed_response_is_linear() {
        let (model, mut state) = setup();
        state.speed = 2.0;
        state.steering = 1;
        model.update_heading(&mut state);
        // 1 * 2.0 * 0.8 = 1.6 degrees, under the threshold of 5
        assert_relative_eq!(state.heading, 1.6);
    }

    #[test]
    fn slow_reverse_inverts_steering_sense() {
        let (model, mut state) = setup();
        state.speed = -2.0;
        state.steering = 1;
        model.update_heading(&mut state);
        assert_relative_eq!(state.heading, 360.0 - 1.6);
    }

    #[test]
    fn high_speed_switches_to_inverse_formula() {
        let (model, mut state) = setup();
        state.speed = 10.0;
        state.steering = 1;
        model.update_heading(&mut state);
        // authority 8.0 > 5, so delta = 1 / (10/3 * 40/550) = 4.125
        assert_relative_eq!(state.heading, 4.125, epsilon = 1e-9);
    }

    #[test]
    fn turn_rate_shrinks_as_speed_grows() {
        let (model, _) = setup();
        let config = VehicleConfig::default();

        let delta_at = |speed: f64| {
            let mut state = VehicleState::new(&config);
            state.speed = speed;
            state.steering = 1;
            model.update_heading(&mut state);
            state.heading
        };

        assert!(delta_at(35.0) < delta_at(10.0));
        assert!(delta_at(10.0) < delta_at(6.3));
    }

    #[test]
    fn heading_wraps_at_the_top() {
        let (model, mut state) = setup();
        state.heading = 359.0;
        state.speed = 2.0;
        state.steering = 1;
        model.update_heading(&mut state);
        assert!(state.heading < 360.0);
        assert!(state.heading >= 0.0);
        assert_relative_eq!(state.heading, 0.6, epsilon = 1e-9);
    }

    #[test]
    fn heading_wraps_below_zero() {
        let (model, mut state) = setup();
        state.heading = 0.5;
        state.speed = 2.0;
        state.steering = -1;
        model.update_heading(&mut state);
        assert!(state.heading < 360.0);
        assert!(state.heading >= 0.0);
        assert_relative_eq!(state.heading, 358.9, epsilon = 1e-9);
    }

    #[test]
    fn exact_threshold_uses_linear_branch() {
        let (model, mut state) = setup();
        // authority = 1 * 6.25 * 0.8 = 5.0 exactly, not above the threshold
        state.speed = 6.25;
        state.steering = 1;
        model.update_heading(&mut state);
        assert_relative_eq!(state.heading, 5.0, epsilon = 1e-9);
    }
}
