//! Host side of the accumulators
//!
//! The accumulators only compute vectors. Something has to own a physics
//! body, check that it is simulating, feed its angular velocity back in and
//! apply the results. [`ApplierDriver`] does that against any
//! [`PhysicsTarget`].

use tickdrive_core::{Application, ApplicationKind, ForceAccumulator};
use tickdrive_math::Vec3;

/// A physics body that can receive forces and torques
pub trait PhysicsTarget {
    /// Name used in log output
    fn name(&self) -> &str;

    /// Whether the body is currently simulating dynamics
    fn is_simulating(&self) -> bool;

    /// Enable or disable dynamics simulation
    fn set_simulate(&mut self, simulate: bool);

    /// Current angular velocity in radians per second
    fn angular_velocity(&self) -> Vec3;

    /// Apply one accumulator output
    fn apply(&mut self, application: &Application);
}

/// Running sums of everything applied to a [`RecordingTarget`]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AppliedTotals {
    pub force: Vec3,
    pub impulse: Vec3,
    pub torque: Vec3,
    pub angular_impulse: Vec3,
}

impl AppliedTotals {
    fn add(&mut self, application: &Application) {
        let slot = match application.kind {
            ApplicationKind::Force => &mut self.force,
            ApplicationKind::Impulse => &mut self.impulse,
            ApplicationKind::Torque => &mut self.torque,
            ApplicationKind::AngularImpulse => &mut self.angular_impulse,
        };
        *slot += application.vector;
    }
}

/// Stand-in body that records what it receives
///
/// It does not integrate anything; its angular velocity is whatever it was
/// configured with.
#[derive(Clone, Debug)]
pub struct RecordingTarget {
    name: String,
    simulating: bool,
    angular_velocity: Vec3,
    applications: usize,
    nonzero_applications: usize,
    totals: AppliedTotals,
}

impl RecordingTarget {
    /// Create a target that is not yet simulating
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            simulating: false,
            angular_velocity: Vec3::ZERO,
            applications: 0,
            nonzero_applications: 0,
            totals: AppliedTotals::default(),
        }
    }

    /// Set the reported angular velocity
    pub fn with_angular_velocity(mut self, angular_velocity: Vec3) -> Self {
        self.angular_velocity = angular_velocity;
        self
    }

    /// Set whether the target starts simulating
    pub fn with_simulating(mut self, simulating: bool) -> Self {
        self.simulating = simulating;
        self
    }

    /// Number of applications received, including zero vectors
    pub fn applications(&self) -> usize {
        self.applications
    }

    /// Number of applications with a non-zero vector
    pub fn nonzero_applications(&self) -> usize {
        self.nonzero_applications
    }

    pub fn totals(&self) -> &AppliedTotals {
        &self.totals
    }
}

impl PhysicsTarget for RecordingTarget {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_simulating(&self) -> bool {
        self.simulating
    }

    fn set_simulate(&mut self, simulate: bool) {
        self.simulating = simulate;
    }

    fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    fn apply(&mut self, application: &Application) {
        self.applications += 1;
        if !application.is_zero() {
            self.nonzero_applications += 1;
        }
        self.totals.add(application);
    }
}

/// Couples one [`ForceAccumulator`] to an optional target body
#[derive(Clone, Debug)]
pub struct ApplierDriver<T> {
    name: String,
    accumulator: ForceAccumulator,
    target: Option<T>,
    /// Re-arm period for one-shot modes
    rearm_every: Option<f32>,
    since_rearm: f32,
}

impl<T: PhysicsTarget> ApplierDriver<T> {
    /// Create a driver with no target assigned
    pub fn new(name: impl Into<String>, accumulator: ForceAccumulator) -> Self {
        Self {
            name: name.into(),
            accumulator,
            target: None,
            rearm_every: None,
            since_rearm: 0.0,
        }
    }

    /// Assign the target body
    pub fn with_target(mut self, target: T) -> Self {
        self.target = Some(target);
        self
    }

    /// Re-arm one-shot modes every `period` seconds (non-positive disables)
    pub fn with_rearm_every(mut self, period: Option<f32>) -> Self {
        self.rearm_every = period.filter(|p| p.is_finite() && *p > 0.0);
        self
    }

    /// Validate the target before the first tick
    ///
    /// Returns whether the driver will apply anything.
    pub fn begin(&mut self) -> bool {
        let Some(target) = self.target.as_mut() else {
            log::error!("[{}] No target assigned! {} won't be applied.", self.name, self.accumulator.mode().label());
            return false;
        };

        if !target.is_simulating() {
            log::warn!(
                "[{}] Target '{}' is not simulating physics. Enabling simulation.",
                self.name,
                target.name()
            );
            target.set_simulate(true);
        }
        true
    }

    /// Advance the accumulator and apply its output
    ///
    /// Does nothing, and leaves the accumulator untouched, without a
    /// simulating target.
    pub fn tick(&mut self, dt: f32) -> Option<Application> {
        let target = self.target.as_mut().filter(|t| t.is_simulating())?;

        if let Some(period) = self.rearm_every {
            self.since_rearm += dt.max(0.0);
            if self.since_rearm >= period {
                self.since_rearm -= period;
                self.accumulator.rearm();
            }
        }

        let spin = target.angular_velocity();
        let application = self.accumulator.advance(dt, Some(spin));
        target.apply(&application);
        Some(application)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accumulator(&self) -> &ForceAccumulator {
        &self.accumulator
    }

    pub fn accumulator_mut(&mut self) -> &mut ForceAccumulator {
        &mut self.accumulator
    }

    pub fn target(&self) -> Option<&T> {
        self.target.as_ref()
    }

    pub fn target_mut(&mut self) -> Option<&mut T> {
        self.target.as_mut()
    }
}
