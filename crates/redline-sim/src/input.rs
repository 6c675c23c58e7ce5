//! Control input plumbing
//!
//! - `HeldKeys` / `SharedControls`: raw held key state, written by the host
//!   input loop, read by the simulation (single producer, single consumer)
//! - `ControlReader`: samples the cell once per tick and turns held shift
//!   keys into one-shot press edges
//! - `InputSnapshot`: what the simulation actually consumes each tick
//!
//! Shift keys must be edge-triggered: a naive level-triggered read would
//! run up the whole gearbox in a few frames of holding the key.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Raw held state of the six control keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub throttle: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    pub shift_up: bool,
    pub shift_down: bool,
}

/// One tick's worth of control input
///
/// `shift_up` / `shift_down` are press edges: true at most once per
/// physical key press, regardless of how long the key stays held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub throttle: bool,
    pub brake: bool,
    pub steer_left: bool,
    pub steer_right: bool,
    pub shift_up: bool,
    pub shift_down: bool,
}

impl InputSnapshot {
    /// Steering intent: +1 left, -1 right, 0 when neither or both are held
    pub fn steering(&self) -> i8 {
        (self.steer_left as i8) - (self.steer_right as i8)
    }
}

/// Lock-free cell carrying held key state from the input loop to the tick
/// loop. One writer, one reader; relaxed ordering is enough because the
/// only promise is "a recent value", never ordering against other data.
#[derive(Debug, Default)]
pub struct SharedControls {
    throttle: AtomicBool,
    brake: AtomicBool,
    steer_left: AtomicBool,
    steer_right: AtomicBool,
    shift_up: AtomicBool,
    shift_down: AtomicBool,
}

impl SharedControls {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Publish the current held state of all six keys (producer side)
    pub fn publish(&self, keys: HeldKeys) {
        self.throttle.store(keys.throttle, Ordering::Relaxed);
        self.brake.store(keys.brake, Ordering::Relaxed);
        self.steer_left.store(keys.steer_left, Ordering::Relaxed);
        self.steer_right.store(keys.steer_right, Ordering::Relaxed);
        self.shift_up.store(keys.shift_up, Ordering::Relaxed);
        self.shift_down.store(keys.shift_down, Ordering::Relaxed);
    }

    /// Read the most recently published held state (consumer side)
    pub fn held(&self) -> HeldKeys {
        HeldKeys {
            throttle: self.throttle.load(Ordering::Relaxed),
            brake: self.brake.load(Ordering::Relaxed),
            steer_left: self.steer_left.load(Ordering::Relaxed),
            steer_right: self.steer_right.load(Ordering::Relaxed),
            shift_up: self.shift_up.load(Ordering::Relaxed),
            shift_down: self.shift_down.load(Ordering::Relaxed),
        }
    }
}

/// Tick-side consumer of `SharedControls`
///
/// Remembers the previous sample of the shift keys so each physical press
/// produces exactly one edge in the emitted snapshot.
pub struct ControlReader {
    controls: Arc<SharedControls>,
    prev_shift_up: bool,
    prev_shift_down: bool,
}

impl ControlReader {
    pub fn new(controls: Arc<SharedControls>) -> Self {
        Self {
            controls,
            prev_shift_up: false,
            prev_shift_down: false,
        }
    }

    /// Sample the cell and latch shift keys into press edges
    pub fn sample(&mut self) -> InputSnapshot {
        let held = self.controls.held();
        let shift_up = held.shift_up && !self.prev_shift_up;
        let shift_down = held.shift_down && !self.prev_shift_down;
        self.prev_shift_up = held.shift_up;
        self.prev_shift_down = held.shift_down;
        InputSnapshot {
            throttle: held.throttle,
            brake: held.brake,
            steer_left: held.steer_left,
            steer_right: held.steer_right,
            shift_up,
            shift_down,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_shift_key_edges_once() {
        let controls = SharedControls::new();
        let mut reader = ControlReader::new(controls.clone());

        controls.publish(HeldKeys {
            shift_up: true,
            ..HeldKeys::default()
        });

        assert!(reader.sample().shift_up, "first sample sees the press");
        for _ in 0..10 {
            assert!(!reader.sample().shift_up, "held key must not re-trigger");
        }
    }

    #[test]
    fn release_and_repress_edges_again() {
        let controls = SharedControls::new();
        let mut reader = ControlReader::new(controls.clone());

        controls.publish(HeldKeys {
            shift_down: true,
            ..HeldKeys::default()
        });
        assert!(reader.sample().shift_down);

        controls.publish(HeldKeys::default());
        assert!(!reader.sample().shift_down);

        controls.publish(HeldKeys {
            shift_down: true,
            ..HeldKeys::default()
        });
        assert!(reader.sample().shift_down, "new press after release edges again");
    }

    #[test]
    fn level_keys_pass_through_unlatched() {
        let controls = SharedControls::new();
        let mut reader = ControlReader::new(controls.clone());

        controls.publish(HeldKeys {
            throttle: true,
            brake: true,
            ..HeldKeys::default()
        });
        for _ in 0..3 {
            let snap = reader.sample();
            assert!(snap.throttle);
            assert!(snap.brake);
        }
    }

    #[test]
    fn opposite_steer_keys_cancel() {
        let snap = InputSnapshot {
            steer_left: true,
            steer_right: true,
            ..InputSnapshot::default()
        };
        assert_eq!(snap.steering(), 0);

        let left = InputSnapshot {
            steer_left: true,
            ..InputSnapshot::default()
        };
        assert_eq!(left.steering(), 1);

        let right = InputSnapshot {
            steer_right: true,
            ..InputSnapshot::default()
        };
        assert_eq!(right.steering(), -1);
    }

    #[test]
    fn publish_overwrites_previous_state() {
        let controls = SharedControls::new();
        controls.publish(HeldKeys {
            throttle: true,
            ..HeldKeys::default()
        });
        controls.publish(HeldKeys {
            brake: true,
            ..HeldKeys::default()
        });
        let held = controls.held();
        assert!(!held.throttle);
        assert!(held.brake);
    }
}
