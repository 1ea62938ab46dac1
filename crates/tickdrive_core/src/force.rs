//! Force, impulse and torque accumulation
//!
//! A [`ForceAccumulator`] turns a configured direction and magnitude into the
//! vector a host should apply to its physics body this step. It never touches
//! the body itself.

use crate::error::{check_finite, check_non_negative, check_range, ConfigError};
use crate::sanitize_elapsed;
use serde::{Deserialize, Serialize};
use tickdrive_math::Vec3;

/// Continuous force saturates at this multiple of the configured magnitude
pub const CONTINUOUS_CLAMP_MULTIPLIER: f32 = 10.0;

/// Largest accepted damping factor
pub const MAX_DAMPING_FACTOR: f32 = 10.0;

/// Largest accepted magnitude; keeps the continuous cap finite
pub const MAX_MAGNITUDE: f32 = 1.0e30;

/// How the configured magnitude is turned into an output each step
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForceMode {
    /// Force that ramps up every step until it saturates
    #[default]
    Continuous,
    /// One-shot impulse, re-armed externally
    Impulse,
    /// Same torque every step
    ConstantTorque,
    /// One-shot angular impulse, re-armed externally
    ImpulseTorque,
    /// Torque minus a term opposing spin along the axis
    DampedTorque,
}

impl ForceMode {
    /// Human-readable name
    pub fn label(self) -> &'static str {
        match self {
            ForceMode::Continuous => "Continuous Force",
            ForceMode::Impulse => "Instant Impulse",
            ForceMode::ConstantTorque => "Constant Torque",
            ForceMode::ImpulseTorque => "Impulse Torque",
            ForceMode::DampedTorque => "Damped Torque",
        }
    }

    /// True for modes whose vector is an axis of rotation
    pub fn is_torque(self) -> bool {
        matches!(
            self,
            ForceMode::ConstantTorque | ForceMode::ImpulseTorque | ForceMode::DampedTorque
        )
    }

    /// True for one-shot modes that need [`ForceAccumulator::rearm`]
    pub fn is_one_shot(self) -> bool {
        matches!(self, ForceMode::Impulse | ForceMode::ImpulseTorque)
    }

    /// How the host should apply this mode's output
    pub fn kind(self) -> ApplicationKind {
        match self {
            ForceMode::Continuous => ApplicationKind::Force,
            ForceMode::Impulse => ApplicationKind::Impulse,
            ForceMode::ConstantTorque | ForceMode::DampedTorque => ApplicationKind::Torque,
            ForceMode::ImpulseTorque => ApplicationKind::AngularImpulse,
        }
    }
}

/// Physics call a host should use for an [`Application`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApplicationKind {
    Force,
    Impulse,
    Torque,
    AngularImpulse,
}

/// Output of one accumulator step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Application {
    pub kind: ApplicationKind,
    pub vector: Vec3,
    /// Apply as acceleration / velocity change instead of scaling by mass
    pub ignore_mass: bool,
}

impl Application {
    /// True when there is nothing to apply this step
    pub fn is_zero(&self) -> bool {
        self.vector == Vec3::ZERO
    }
}

/// Configuration for a [`ForceAccumulator`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    pub mode: ForceMode,
    /// Force direction or torque axis; normalized on construction
    pub direction: Vec3,
    /// Force, impulse or torque magnitude (continuous mode: growth per second)
    pub magnitude: f32,
    /// Scale of the damping term in [`ForceMode::DampedTorque`]
    pub damping_factor: f32,
    pub ignore_mass: bool,
}

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            mode: ForceMode::Continuous,
            direction: Vec3::FORWARD,
            magnitude: 1000.0,
            damping_factor: 1.0,
            ignore_mass: false,
        }
    }
}

impl ForceConfig {
    /// Linear force or impulse along `direction`
    pub fn force(mode: ForceMode, direction: Vec3, magnitude: f32) -> Self {
        Self {
            mode,
            direction,
            magnitude,
            ..Self::default()
        }
    }

    /// Torque around `axis`
    pub fn torque(mode: ForceMode, axis: Vec3, magnitude: f32) -> Self {
        Self::force(mode, axis, magnitude)
    }

    /// Set the damping factor
    pub fn with_damping(mut self, damping_factor: f32) -> Self {
        self.damping_factor = damping_factor;
        self
    }

    /// Set whether mass is ignored
    pub fn with_ignore_mass(mut self, ignore_mass: bool) -> Self {
        self.ignore_mass = ignore_mass;
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        check_non_negative("magnitude", self.magnitude)?;
        check_range("magnitude", self.magnitude, 0.0, MAX_MAGNITUDE)?;
        check_range("damping_factor", self.damping_factor, 0.0, MAX_DAMPING_FACTOR)?;
        check_finite("direction.x", self.direction.x)?;
        check_finite("direction.y", self.direction.y)?;
        check_finite("direction.z", self.direction.z)?;
        Ok(())
    }
}

/// Read-only view of an accumulator, for visualizers and logging
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceSnapshot {
    pub mode: ForceMode,
    pub direction: Vec3,
    pub current_magnitude: f32,
    pub last_output: Vec3,
    /// One-shot modes: already fired since the last re-arm
    pub latched: bool,
}

/// Per-step force/torque source for one host body
#[derive(Clone, Debug)]
pub struct ForceAccumulator {
    config: ForceConfig,
    /// Unit direction, or zero when the configured one is degenerate
    direction: Vec3,
    degenerate: bool,
    current_magnitude: f32,
    latched: bool,
    last_output: Vec3,
    warned_missing_velocity: bool,
}

impl ForceAccumulator {
    /// Create an accumulator, rejecting invalid configuration
    ///
    /// A zero-length direction is accepted: the accumulator then emits zero
    /// vectors and reports [`is_degenerate`](Self::is_degenerate).
    pub fn new(config: ForceConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let (direction, degenerate) = match config.direction.try_normalize() {
            Some(direction) => (direction, false),
            None => {
                log::warn!(
                    "{}: zero-length direction {:?}, output will be zero",
                    config.mode.label(),
                    config.direction
                );
                (Vec3::ZERO, true)
            }
        };

        Ok(Self {
            config,
            direction,
            degenerate,
            current_magnitude: 0.0,
            latched: false,
            last_output: Vec3::ZERO,
            warned_missing_velocity: false,
        })
    }

    /// Compute this step's output
    ///
    /// `angular_velocity` is only read in [`ForceMode::DampedTorque`]; a
    /// missing or non-finite value counts as no spin.
    pub fn advance(&mut self, elapsed_seconds: f32, angular_velocity: Option<Vec3>) -> Application {
        let dt = sanitize_elapsed(elapsed_seconds);
        let magnitude = self.config.magnitude;

        let vector = match self.config.mode {
            ForceMode::Continuous => {
                let cap = magnitude * CONTINUOUS_CLAMP_MULTIPLIER;
                self.current_magnitude = (self.current_magnitude + magnitude * dt).clamp(0.0, cap);
                self.direction * self.current_magnitude
            }
            ForceMode::Impulse => {
                let fired = self.fire_once();
                self.current_magnitude = 0.0;
                fired
            }
            ForceMode::ConstantTorque => self.direction * magnitude,
            ForceMode::ImpulseTorque => self.fire_once(),
            ForceMode::DampedTorque => {
                let applied = self.direction * magnitude;
                let spin = self.spin_input(angular_velocity);
                let opposing = spin.dot(self.direction) * self.config.damping_factor;
                let damped = applied - self.direction * opposing;
                if damped.is_finite() {
                    damped
                } else {
                    self.warn_unusable_spin(Some(spin));
                    applied
                }
            }
        };
        let vector = if self.degenerate { Vec3::ZERO } else { vector };

        self.last_output = vector;
        Application {
            kind: self.config.mode.kind(),
            vector,
            ignore_mass: self.config.ignore_mass,
        }
    }

    /// Allow a one-shot mode to fire again; no effect on other modes
    pub fn rearm(&mut self) {
        if self.config.mode.is_one_shot() && self.latched {
            log::debug!("{}: re-armed", self.config.mode.label());
            self.latched = false;
        }
    }

    pub fn snapshot(&self) -> ForceSnapshot {
        ForceSnapshot {
            mode: self.config.mode,
            direction: self.direction,
            current_magnitude: self.current_magnitude,
            last_output: self.last_output,
            latched: self.latched,
        }
    }

    pub fn mode(&self) -> ForceMode {
        self.config.mode
    }

    /// Normalized direction (zero when degenerate)
    pub fn direction(&self) -> Vec3 {
        self.direction
    }

    pub fn current_magnitude(&self) -> f32 {
        self.current_magnitude
    }

    pub fn config(&self) -> &ForceConfig {
        &self.config
    }

    /// True when the configured direction could not be normalized
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }

    fn fire_once(&mut self) -> Vec3 {
        if self.latched {
            return Vec3::ZERO;
        }
        self.latched = true;
        self.direction * self.config.magnitude
    }

    fn spin_input(&mut self, angular_velocity: Option<Vec3>) -> Vec3 {
        match angular_velocity {
            Some(spin) if spin.is_finite() => spin,
            other => {
                self.warn_unusable_spin(other);
                Vec3::ZERO
            }
        }
    }

    fn warn_unusable_spin(&mut self, spin: Option<Vec3>) {
        if !self.warned_missing_velocity {
            log::warn!(
                "{}: no usable angular velocity ({:?}), damping disabled",
                self.config.mode.label(),
                spin
            );
            self.warned_missing_velocity = true;
        }
    }
}
