//! Simulation session
//!
//! Owns the vehicle state and runs the fixed pipeline once per tick:
//! controls -> transmission -> speed -> heading -> displacement -> RPM ->
//! sink report. Collaborators get a shared `ShutdownToken` for cooperative
//! teardown and a read-only view of the state; the only writeback offered
//! is a narrow position correction for hosts that resolve collisions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::VehicleConfig;
use crate::dynamics::DynamicsIntegrator;
use crate::input::{ControlReader, InputSnapshot, SharedControls};
use crate::rpm::{NullSink, RpmEstimator, RpmSink};
use crate::state::VehicleState;
use crate::steering::SteeringModel;
use crate::transmission::Transmission;

/// Cooperative cancellation flag shared by the session and its collaborators
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    cancelled: Arc<AtomicBool>,
}

impl ShutdownToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// One running simulation: state, components, input, and the audio sink
pub struct SimulationSession {
    config: VehicleConfig,
    state: VehicleState,
    transmission: Transmission,
    dynamics: DynamicsIntegrator,
    steering: SteeringModel,
    rpm: RpmEstimator,
    reader: ControlReader,
    sink: Box<dyn RpmSink + Send>,
    token: ShutdownToken,
    ticks: u64,
}

impl SimulationSession {
    /// Session with no audio collaborator attached
    pub fn new(config: VehicleConfig, controls: Arc<SharedControls>) -> Self {
        Self::with_sink(config, controls, Box::new(NullSink))
    }

    pub fn with_sink(
        config: VehicleConfig,
        controls: Arc<SharedControls>,
        sink: Box<dyn RpmSink + Send>,
    ) -> Self {
        tracing::debug!(
            "Simulation session started: gears {}..{}, {} Hz",
            config.reverse_limit,
            config.top_gear,
            config.tick_rate
        );
        Self {
            config,
            state: VehicleState::new(&config),
            transmission: Transmission::new(&config),
            dynamics: DynamicsIntegrator::new(config),
            steering: SteeringModel::new(config),
            rpm: RpmEstimator::new(config),
            reader: ControlReader::new(controls),
            sink,
            token: ShutdownToken::new(),
            ticks: 0,
        }
    }

    /// Run one tick from the shared control cell. Does nothing once the
    /// shutdown token is cancelled.
    pub fn tick(&mut self) {
        if self.token.is_cancelled() {
            return;
        }
        let snapshot = self.reader.sample();
        self.step(&snapshot);
    }

    /// Run one tick from an explicit snapshot, bypassing the shared cell.
    /// The snapshot's shift fields are taken as already edge-triggered.
    pub fn step(&mut self, snapshot: &InputSnapshot) {
        let state = &mut self.state;
        state.throttle = snapshot.throttle;
        state.brake = snapshot.brake;
        state.steering = snapshot.steering();

        self.transmission.apply(state, snapshot);
        self.dynamics.update_speed(state);
        self.steering.update_heading(state);
        self.dynamics.advance_position(state);
        self.rpm.update(state);

        self.sink.report_rpm(state.rpm);
        self.ticks += 1;
    }

    /// Read-only view for renderers and HUDs
    pub fn state(&self) -> &VehicleState {
        &self.state
    }

    pub fn config(&self) -> &VehicleConfig {
        &self.config
    }

    /// Ticks run so far
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Clone of the session's cancellation token for collaborator loops
    pub fn token(&self) -> ShutdownToken {
        self.token.clone()
    }

    /// Cancel the token; collaborators wind down on their next check
    pub fn shutdown(&self) {
        self.token.cancel();
        tracing::debug!("Simulation session shut down after {} ticks", self.ticks);
    }

    /// Writeback for hosts that resolve the tick's movement against
    /// obstacles. Speed is left alone so the car slides along walls.
    pub fn apply_position_correction(&mut self, position: (f64, f64)) {
        if position != self.state.position {
            tracing::trace!(
                "Position corrected ({:.1}, {:.1}) -> ({:.1}, {:.1})",
                self.state.position.0,
                self.state.position.1,
                position.0,
                position.1
            );
            self.state.position = position;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
