//! Accelerating progress with discrete phases
//!
//! A [`ProgressTracker`] eases a value toward its target. The easing speed
//! starts at `base_speed` and grows by `acceleration` every second, so
//! progress is slow at first and then picks up. The value is quantized into
//! `num_phases` equal buckets; observers hear about each bucket change once.

use crate::error::{check_non_negative, check_range, ConfigError};
use crate::sanitize_elapsed;
use serde::{Deserialize, Serialize};
use std::fmt;
use tickdrive_math::exp_decay_to;

/// Lowest accepted starting speed
pub const MIN_BASE_SPEED: f32 = 0.01;

/// Configuration for a [`ProgressTracker`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    /// Starting value, in `[0, 1]`
    pub initial_value: f32,
    /// Value being approached, in `[0, 1]`
    pub target: f32,
    /// Starting interpolation speed (per second)
    pub base_speed: f32,
    /// Growth of the interpolation speed per second
    pub acceleration: f32,
    /// Number of discrete phases the value is split into
    pub num_phases: u32,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            initial_value: 0.0,
            target: 1.0,
            base_speed: 0.1,
            acceleration: 0.3,
            num_phases: 6,
        }
    }
}

impl ProgressConfig {
    /// Set the target value
    pub fn with_target(mut self, target: f32) -> Self {
        self.target = target;
        self
    }

    /// Set the starting speed
    pub fn with_base_speed(mut self, base_speed: f32) -> Self {
        self.base_speed = base_speed;
        self
    }

    /// Set the speed growth per second
    pub fn with_acceleration(mut self, acceleration: f32) -> Self {
        self.acceleration = acceleration;
        self
    }

    /// Set the number of phases
    pub fn with_num_phases(mut self, num_phases: u32) -> Self {
        self.num_phases = num_phases;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_range("initial_value", self.initial_value, 0.0, 1.0)?;
        check_range("target", self.target, 0.0, 1.0)?;
        check_range("base_speed", self.base_speed, MIN_BASE_SPEED, f32::MAX)?;
        check_non_negative("acceleration", self.acceleration)?;
        if self.num_phases == 0 {
            return Err(ConfigError::ZeroPhaseCount);
        }
        Ok(())
    }
}

/// A discrete bucket of the progress value
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Phase(pub u32);

impl Phase {
    /// Bucket for `value` when `[0, 1]` is split into `num_phases` buckets
    ///
    /// `num_phases` must be at least 1.
    pub fn from_value(value: f32, num_phases: u32) -> Self {
        let last = num_phases.saturating_sub(1);
        let scaled = (value * num_phases as f32).floor();
        if scaled.is_nan() || scaled <= 0.0 {
            Phase(0)
        } else if scaled >= last as f32 {
            Phase(last)
        } else {
            Phase(scaled as u32)
        }
    }

    /// Zero-based index
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Phase {}", self.0)
    }
}

/// Notification payload for a phase transition
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseChange {
    pub previous: Phase,
    pub current: Phase,
}

/// Receives phase transitions from a [`ProgressTracker`]
pub trait PhaseObserver {
    fn on_phase_changed(&mut self, change: PhaseChange);
}

impl<F: FnMut(PhaseChange)> PhaseObserver for F {
    fn on_phase_changed(&mut self, change: PhaseChange) {
        (*self)(change)
    }
}

/// Result of one [`ProgressTracker::advance`] call
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProgressStep {
    pub value: f32,
    pub phase: Phase,
    pub phase_changed: bool,
}

/// Time-driven progress toward a target with phase notifications
pub struct ProgressTracker {
    config: ProgressConfig,
    value: f32,
    current_speed: f32,
    /// Last phase observers were told about
    phase: Phase,
    observers: Vec<Box<dyn PhaseObserver>>,
}

impl ProgressTracker {
    /// Create a tracker, rejecting invalid configuration
    pub fn new(config: ProgressConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let phase = Phase::from_value(config.initial_value, config.num_phases);
        Ok(Self {
            value: config.initial_value,
            current_speed: config.base_speed,
            phase,
            observers: Vec::new(),
            config,
        })
    }

    /// Register an observer; observers run in registration order
    pub fn subscribe<O: PhaseObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    /// Advance by `elapsed_seconds`
    ///
    /// Speed grows first, then the value eases toward the target at the new
    /// speed. Observers are notified at most once per call.
    pub fn advance(&mut self, elapsed_seconds: f32) -> ProgressStep {
        let dt = sanitize_elapsed(elapsed_seconds);

        self.current_speed += self.config.acceleration * dt;
        self.value = exp_decay_to(self.value, self.config.target, self.current_speed, dt);

        let phase_changed = self.update_phase();

        ProgressStep {
            value: self.value,
            phase: self.phase,
            phase_changed,
        }
    }

    /// Phase derived from the current value
    pub fn current_phase(&self) -> Phase {
        Phase::from_value(self.value, self.config.num_phases)
    }

    /// Last phase that was reported
    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    pub fn config(&self) -> &ProgressConfig {
        &self.config
    }

    /// True once the value has reached the target
    pub fn is_settled(&self) -> bool {
        self.value == self.config.target
    }

    /// Return to the construction state without notifying observers
    pub fn reset(&mut self) {
        self.value = self.config.initial_value;
        self.current_speed = self.config.base_speed;
        self.phase = self.current_phase();
    }

    fn update_phase(&mut self) -> bool {
        let current = self.current_phase();
        if current == self.phase {
            return false;
        }

        let change = PhaseChange {
            previous: self.phase,
            current,
        };
        for observer in &mut self.observers {
            observer.on_phase_changed(change);
        }
        log::info!("Progress phase changed: {} -> {}", change.previous, change.current);

        self.phase = current;
        true
    }
}

impl fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("config", &self.config)
            .field("value", &self.value)
            .field("current_speed", &self.current_speed)
            .field("phase", &self.phase)
            .field("observers", &self.observers.len())
            .finish()
    }
}
