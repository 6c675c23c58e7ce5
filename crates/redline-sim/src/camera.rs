//! Camera follow
//!
//! Keeps a viewport origin trailing the car. Each tick the origin moves a
//! configured fraction of the remaining distance toward centering the
//! target, which gives exponential ease-out without any stored velocity.
//! A smoothing of 1.0 degenerates to a hard snap.

#[derive(Debug, Clone)]
pub struct CameraFollower {
    origin: (f64, f64),
    smoothing: f64,
}

impl CameraFollower {
    pub fn new(smoothing: f64) -> Self {
        Self {
            origin: (0.0, 0.0),
            smoothing: smoothing.clamp(f64::EPSILON, 1.0),
        }
    }

    /// Bottom-left corner of the viewport in world coordinates
    pub fn origin(&self) -> (f64, f64) {
        self.origin
    }

    /// Place the viewport so the target is centered immediately
    pub fn snap_to(&mut self, target: (f64, f64), viewport: (f64, f64)) {
        self.origin = Self::centered(target, viewport);
    }

    /// Move a fraction of the way toward centering the target
    pub fn follow(&mut self, target: (f64, f64), viewport: (f64, f64)) {
        let desired = Self::centered(target, viewport);
        self.origin.0 += (desired.0 - self.origin.0) * self.smoothing;
        self.origin.1 += (desired.1 - self.origin.1) * self.smoothing;
    }

    fn centered(target: (f64, f64), viewport: (f64, f64)) -> (f64, f64) {
        (target.0 - viewport.0 / 2.0, target.1 - viewport.1 / 2.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
