//! Integration tests for accumulator behavior over many steps
//!
//! These tests drive the accumulators the way a host frame loop would:
//! 1. Progress converges monotonically and reports each phase once
//! 2. Step composition does not depend on frame rate
//! 3. Force modes keep their bounds and one-shot semantics across frames

use std::cell::RefCell;
use std::rc::Rc;

use tickdrive_core::{
    ForceAccumulator, ForceConfig, ForceMode, Phase, PhaseChange, ProgressConfig, ProgressTracker,
};
use tickdrive_math::Vec3;

const FRAME: f32 = 1.0 / 60.0;

fn record_changes(tracker: &mut ProgressTracker) -> Rc<RefCell<Vec<PhaseChange>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    tracker.subscribe(move |change: PhaseChange| sink.borrow_mut().push(change));
    seen
}

// ==================== Progress Tests ====================

/// Speed never decreases while acceleration is non-negative
#[test]
fn test_speed_is_non_decreasing() {
    let mut tracker = ProgressTracker::new(ProgressConfig::default()).unwrap();
    let mut last = tracker.current_speed();
    for i in 0..600 {
        // Mix of frame lengths, including zero
        let dt = [FRAME, 0.0, 0.1, 0.004][i % 4];
        tracker.advance(dt);
        assert!(tracker.current_speed() >= last);
        last = tracker.current_speed();
    }
}

/// Value rises monotonically to 1.0 and never overshoots
#[test]
fn test_converges_monotonically_to_target() {
    let mut tracker = ProgressTracker::new(ProgressConfig::default()).unwrap();
    let mut last = tracker.value();
    for _ in 0..(60 * 40) {
        let step = tracker.advance(FRAME);
        assert!(step.value >= last, "value went backwards: {} -> {}", last, step.value);
        assert!(step.value <= 1.0 + f32::EPSILON);
        last = step.value;
    }
    assert_eq!(tracker.value(), 1.0);
    assert!(tracker.is_settled());
}

/// Every phase from 1 to the last is reported exactly once, in order
#[test]
fn test_each_phase_reported_once() {
    let mut tracker = ProgressTracker::new(ProgressConfig::default()).unwrap();
    let seen = record_changes(&mut tracker);

    for _ in 0..(60 * 40) {
        tracker.advance(FRAME);
    }

    let phases: Vec<u32> = seen.borrow().iter().map(|c| c.current.index()).collect();
    assert_eq!(phases, vec![1, 2, 3, 4, 5]);
    assert_eq!(tracker.phase(), Phase(5));

    // Stable at the end: no further notifications
    for _ in 0..120 {
        assert!(!tracker.advance(FRAME).phase_changed);
    }
    assert_eq!(seen.borrow().len(), 5);
}

/// With five phases, staying inside [0.2, 0.4) reports phase 1 once
#[test]
fn test_no_refire_within_bucket() {
    let config = ProgressConfig::default().with_target(0.39).with_num_phases(5);
    let mut tracker = ProgressTracker::new(config).unwrap();
    let seen = record_changes(&mut tracker);

    for _ in 0..(60 * 60) {
        tracker.advance(FRAME);
    }

    assert!(tracker.value() >= 0.2 && tracker.value() < 0.4);
    assert_eq!(
        *seen.borrow(),
        vec![PhaseChange { previous: Phase(0), current: Phase(1) }]
    );
}

/// Without acceleration, many small steps land where one big step does
#[test]
fn test_small_steps_match_large_step() {
    let config = ProgressConfig::default().with_base_speed(0.8).with_acceleration(0.0);

    let mut fine = ProgressTracker::new(config.clone()).unwrap();
    for _ in 0..100 {
        fine.advance(0.01);
    }

    let mut coarse = ProgressTracker::new(config).unwrap();
    coarse.advance(1.0);

    assert!((fine.value() - coarse.value()).abs() < 1e-4);
}

/// Multiple observers all hear about each change, in registration order
#[test]
fn test_observers_called_in_order() {
    let mut tracker = ProgressTracker::new(ProgressConfig::default().with_base_speed(5.0)).unwrap();
    let log = Rc::new(RefCell::new(Vec::new()));

    let first = Rc::clone(&log);
    tracker.subscribe(move |c: PhaseChange| first.borrow_mut().push(("first", c.current)));
    let second = Rc::clone(&log);
    tracker.subscribe(move |c: PhaseChange| second.borrow_mut().push(("second", c.current)));

    let step = tracker.advance(0.1);
    assert!(step.phase_changed);

    let log = log.borrow();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].0, "first");
    assert_eq!(log[1].0, "second");
    assert_eq!(log[0].1, step.phase);
}

// ==================== Force Tests ====================

/// Continuous magnitude stays at or below ten times the rate
#[test]
fn test_continuous_force_clamped() {
    let mut acc = ForceAccumulator::new(ForceConfig::force(ForceMode::Continuous, Vec3::X, 1000.0)).unwrap();
    for _ in 0..(60 * 30) {
        let out = acc.advance(FRAME, None);
        assert!(acc.current_magnitude() <= 10_000.0);
        assert!(out.vector.x <= 10_000.0);
    }
    assert_eq!(acc.current_magnitude(), 10_000.0);
}

/// An impulse fires once per arm cycle over a run of frames
#[test]
fn test_impulse_arm_cycles() {
    let mut acc = ForceAccumulator::new(ForceConfig::force(ForceMode::Impulse, Vec3::X, 300.0)).unwrap();

    let mut fired = 0;
    for frame in 0..180 {
        // Re-arm once per second
        if frame > 0 && frame % 60 == 0 {
            acc.rearm();
        }
        if !acc.advance(FRAME, None).is_zero() {
            fired += 1;
        }
    }
    assert_eq!(fired, 3);
}

/// Damping cancels a spin that matches the torque magnitude
#[test]
fn test_damped_torque_near_zero_at_equilibrium() {
    let axis = Vec3::new(1.0, 1.0, 0.0);
    let config = ForceConfig::torque(ForceMode::DampedTorque, axis, 4.0).with_damping(1.0);
    let mut acc = ForceAccumulator::new(config).unwrap();

    let spin = axis.normalize_or_zero() * 4.0;
    let out = acc.advance(FRAME, Some(spin));
    assert!(out.vector.length() < 1e-4);
}

/// Degenerate direction never produces NaN or infinity
#[test]
fn test_zero_direction_never_nan() {
    let mut acc = ForceAccumulator::new(ForceConfig::force(ForceMode::Continuous, Vec3::ZERO, 1000.0)).unwrap();
    for _ in 0..120 {
        let out = acc.advance(FRAME, None);
        assert!(out.vector.is_finite());
        assert_eq!(out.vector, Vec3::ZERO);
    }
}
