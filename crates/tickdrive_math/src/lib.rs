//! Math helpers for tickdrive
//!
//! This crate provides the small amount of vector math the accumulators need.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector with x, y, z components and safe normalization
//!
//! ## Interpolation
//!
//! - [`exp_decay_to`] - frame-rate-independent exponential approach
//! - [`decay_factor`] - the per-step retention factor behind it

mod vec3;
pub mod interp;

pub use vec3::Vec3;
pub use interp::{decay_factor, exp_decay_to, SNAP_EPSILON};
