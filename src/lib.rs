//! tickdrive - step-driven progress and force accumulators
//!
//! The accumulators themselves live in `tickdrive_core`. This crate adds the
//! host side: layered configuration, logging, the physics-target seam and a
//! headless simulation loop.

pub mod config;
pub mod host;
pub mod logging;
pub mod systems;

pub use config::{AppConfig, ApplierConfig, ConfigError};
pub use host::{AppliedTotals, ApplierDriver, PhysicsTarget, RecordingTarget};
pub use systems::{SimulationResult, SimulationSystem};
