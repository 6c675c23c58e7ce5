//! Redline simulation core
//!
//! Tick-driven vehicle dynamics with no ties to any window, device, or
//! clock. A host samples its input into the shared control cell, calls
//! [`SimulationSession::tick`] at a fixed rate, reads the resulting
//! [`VehicleState`] for rendering, and receives the per-tick RPM through
//! an [`RpmSink`] of its choosing.
//!
//! Pipeline per tick:
//!   input snapshot -> transmission -> speed -> heading -> displacement
//!   -> RPM -> sink

pub mod camera;
pub mod config;
pub mod dynamics;
pub mod input;
pub mod rpm;
pub mod session;
pub mod state;
pub mod steering;
pub mod transmission;

pub use camera::CameraFollower;
pub use config::{ConfigError, VehicleConfig};
pub use dynamics::DynamicsIntegrator;
pub use input::{ControlReader, HeldKeys, InputSnapshot, SharedControls};
pub use rpm::{NullSink, RpmEstimator, RpmSink};
pub use session::{ShutdownToken, SimulationSession};
pub use state::VehicleState;
pub use steering::SteeringModel;
pub use transmission::Transmission;
