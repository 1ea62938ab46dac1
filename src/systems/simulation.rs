//! Simulation system
//!
//! Manages one frame of the headless loop:
//! - Delta time capping
//! - Progress tracker stepping
//! - Applier stepping against their target bodies
//! - Periodic state reports

use tickdrive_core::{ForceAccumulator, ProgressStep, ProgressTracker};
use tickdrive_math::Vec3;

use crate::config::{AppConfig, ConfigError};
use crate::host::{ApplierDriver, PhysicsTarget, RecordingTarget};

/// Result of a simulation update
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationResult {
    /// Progress after this frame
    pub progress: ProgressStep,
    /// Number of appliers that applied a non-zero vector
    pub applied: usize,
}

/// Owns the progress tracker and every applier driver
pub struct SimulationSystem {
    tracker: ProgressTracker,
    drivers: Vec<ApplierDriver<RecordingTarget>>,
    max_frame_time: f32,
    elapsed: f32,
    report_interval: f32,
    since_report: f32,
}

impl SimulationSystem {
    /// Build every accumulator from configuration
    ///
    /// Fails on the first invalid section; nothing is built in that case.
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        config.simulation.validate()?;
        let tracker = ProgressTracker::new(config.progress.clone()).map_err(ConfigError::Progress)?;

        let drivers = config
            .appliers
            .iter()
            .map(|applier| -> Result<_, ConfigError> {
                let accumulator = ForceAccumulator::new(applier.to_force_config()).map_err(|source| {
                    ConfigError::Applier {
                        name: applier.name.clone(),
                        source,
                    }
                })?;
                let target = RecordingTarget::new(applier.name.clone())
                    .with_angular_velocity(Vec3::from(applier.angular_velocity));
                Ok(ApplierDriver::new(applier.name.clone(), accumulator)
                    .with_target(target)
                    .with_rearm_every(applier.rearm_every))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            tracker,
            drivers,
            max_frame_time: config.simulation.max_frame_time,
            elapsed: 0.0,
            report_interval: config.debug.report_interval,
            since_report: 0.0,
        })
    }

    /// Validate every applier's target
    ///
    /// Returns the number of appliers that will apply anything.
    pub fn begin(&mut self) -> usize {
        let ready = self.drivers.iter_mut().map(|d| d.begin()).filter(|ready| *ready).count();
        log::info!("{} of {} appliers ready", ready, self.drivers.len());
        ready
    }

    /// Run one simulation frame
    pub fn update(&mut self, raw_dt: f32) -> SimulationResult {
        // Cap dt so a stalled frame does not turn into one huge step
        let dt = raw_dt.min(self.max_frame_time);
        self.elapsed += dt.max(0.0);

        let progress = self.tracker.advance(dt);

        let applied = self
            .drivers
            .iter_mut()
            .filter_map(|d| d.tick(dt))
            .filter(|a| !a.is_zero())
            .count();

        if self.report_interval > 0.0 {
            self.since_report += dt.max(0.0);
            if self.since_report >= self.report_interval {
                self.since_report -= self.report_interval;
                self.report();
            }
        }

        SimulationResult { progress, applied }
    }

    /// Log the current state of every accumulator
    pub fn report(&self) {
        log::info!(
            "t={:.2}s progress={:.3} speed={:.3} {}",
            self.elapsed,
            self.tracker.value(),
            self.tracker.current_speed(),
            self.tracker.phase()
        );
        for driver in &self.drivers {
            let snap = driver.accumulator().snapshot();
            log::debug!(
                "  [{}] {} dir={:?} magnitude={:.1} output={:?} latched={}",
                driver.name(),
                snap.mode.label(),
                snap.direction.to_array(),
                snap.current_magnitude,
                snap.last_output.to_array(),
                snap.latched
            );
        }
    }

    /// Log per-target totals
    pub fn summarize(&self) {
        log::info!(
            "Finished after {:.2}s: progress={:.3} ({})",
            self.elapsed,
            self.tracker.value(),
            self.tracker.phase()
        );
        for driver in &self.drivers {
            if let Some(target) = driver.target() {
                log::info!(
                    "  [{}] {} applications ({} non-zero) on '{}': {:?}",
                    driver.name(),
                    target.applications(),
                    target.nonzero_applications(),
                    target.name(),
                    target.totals()
                );
            }
        }
    }

    pub fn tracker(&self) -> &ProgressTracker {
        &self.tracker
    }

    /// Mutable tracker access, e.g. to subscribe observers
    pub fn tracker_mut(&mut self) -> &mut ProgressTracker {
        &mut self.tracker
    }

    pub fn drivers(&self) -> &[ApplierDriver<RecordingTarget>] {
        &self.drivers
    }

    /// Total simulated time in seconds
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }
}
