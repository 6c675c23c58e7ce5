//! Engine speed estimation and the audio-facing sink boundary
//!
//! In neutral the RPM is integrated: it revs up under throttle (fast until
//! the redline onset, slower above) to a hard ceiling, and decays back to
//! idle when the throttle is released. In an engaged gear it is derived
//! from the speed-to-power ratio instead, so it always agrees with what
//! the wheels are doing.
//!
//! Whatever happens, the reported value is finite and never below idle.

use crate::config::VehicleConfig;
use crate::dynamics;
use crate::state::VehicleState;

/// One-way, non-blocking consumer of the per-tick RPM value
pub trait RpmSink {
    fn report_rpm(&self, rpm: f64);
}

/// Sink used when no audio collaborator is attached
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl RpmSink for NullSink {
    fn report_rpm(&self, _rpm: f64) {}
}

#[derive(Debug, Clone)]
pub struct RpmEstimator {
    config: VehicleConfig,
}

impl RpmEstimator {
    pub fn new(config: VehicleConfig) -> Self {
        Self { config }
    }

    /// Update `state.rpm` from this tick's gear, speed, and throttle
    pub fn update(&self, state: &mut VehicleState) {
        let config = &self.config;

        if state.gear == 0 {
            state.rpm = if state.throttle {
                let gain = if state.rpm < config.redline_onset {
                    config.rev_gain
                } else {
                    config.rev_gain_soft
                };
                (state.rpm + gain).min(config.rpm_max)
            } else {
                (state.rpm - config.rev_decay).max(config.idle_rpm)
            };
            return;
        }

        if state.speed == 0.0 {
            state.rpm = config.idle_rpm;
            return;
        }

        let dir = if state.gear > 0 { 1.0 } else { -1.0 };
        let cap = dynamics::power(config, state.gear);
        let rpm = (state.speed * dir) / cap * config.rpm_scale;
        state.rpm = if rpm.is_finite() {
            rpm.max(config.idle_rpm)
        } else {
            config.idle_rpm
        };
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
