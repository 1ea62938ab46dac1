//! Core accumulators for tickdrive
//!
//! Each type here is advanced once per external time step by its owner:
//! - [`ProgressTracker`] - accelerating progress toward a target, quantized into phases
//! - [`ForceAccumulator`] - force, impulse and torque vectors for a host physics body
//!
//! Neither type schedules itself or touches a physics body; the caller
//! decides when to step and what to do with the result.

pub mod error;
pub mod force;
pub mod progress;

// Re-export commonly used types
pub use error::ConfigError;
pub use force::{
    Application, ApplicationKind, ForceAccumulator, ForceConfig, ForceMode, ForceSnapshot,
    CONTINUOUS_CLAMP_MULTIPLIER, MAX_DAMPING_FACTOR, MAX_MAGNITUDE,
};
pub use progress::{
    Phase, PhaseChange, PhaseObserver, ProgressConfig, ProgressStep, ProgressTracker,
    MIN_BASE_SPEED,
};

/// Clamp a caller-supplied step to a usable duration
///
/// Negative or non-finite steps become zero so one bad frame cannot poison
/// accumulated state.
pub(crate) fn sanitize_elapsed(elapsed_seconds: f32) -> f32 {
    if elapsed_seconds.is_finite() && elapsed_seconds >= 0.0 {
        elapsed_seconds
    } else {
        log::warn!("Ignoring invalid elapsed time: {}", elapsed_seconds);
        0.0
    }
}
