//! Frame-rate-independent interpolation
//!
//! `exp_decay_to` moves a value toward a target so that the remaining
//! distance shrinks by `exp(-rate * dt)` each step. With a constant rate,
//! two steps of `dt / 2` land on the same value as one step of `dt`.

/// Distance below which the value snaps onto the target
pub const SNAP_EPSILON: f32 = 1e-4;

/// Fraction of the remaining distance kept after a step
///
/// Always in `[0, 1]`; non-positive rate or time keeps everything.
#[inline]
pub fn decay_factor(rate: f32, dt: f32) -> f32 {
    if rate <= 0.0 || dt <= 0.0 {
        return 1.0;
    }
    (-rate * dt).exp().clamp(0.0, 1.0)
}

/// Approach `target` from `current` at `rate` over `dt` seconds
#[inline]
pub fn exp_decay_to(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    if rate <= 0.0 || dt <= 0.0 {
        return current;
    }
    let remaining = (target - current) * decay_factor(rate, dt);
    if remaining.abs() < SNAP_EPSILON {
        return target;
    }
    target - remaining
}
