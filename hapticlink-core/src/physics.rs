//! Pure numeric helpers for the intensity computation
//!
//! All functions here are stateless and allocation-free, safe to call from
//! the per-message path. Degenerate inputs return defined errors instead of
//! silently dividing by zero.

use libm::fabsf;

use crate::errors::PhysicsError;

/// Estimate the average speed between two position vectors.
///
/// Element-wise absolute difference divided by `dt`, then the arithmetic
/// mean. The vectors must be non-empty and of equal length.
pub fn average_velocity(curr: &[f32], prev: &[f32], dt: f32) -> Result<f32, PhysicsError> {
    if curr.is_empty() {
        return Err(PhysicsError::EmptyVector);
    }
    if curr.len() != prev.len() {
        return Err(PhysicsError::LengthMismatch {
            current: curr.len(),
            previous: prev.len(),
        });
    }

    let mut sum = 0.0f32;
    for (c, p) in curr.iter().zip(prev.iter()) {
        sum += fabsf((c - p) / dt);
    }
    Ok(sum / curr.len() as f32)
}

/// Linearly remap `v` from the domain `[s0, s1]` to `[t0, t1]`.
///
/// Precondition: `s0 != s1`. Configuration validation rejects degenerate
/// velocity ranges, so callers inside the router never hit the division
/// by zero; external callers own the check.
pub fn remap(v: f32, s0: f32, s1: f32, t0: f32, t1: f32) -> f32 {
    (v - s0) / (s1 - s0) * (t1 - t0) + t0
}

/// Clamp `v` into `[lo, hi]`.
pub fn constrain(v: f32, lo: f32, hi: f32) -> f32 {
    if v < lo {
        lo
    } else if v > hi {
        hi
    } else {
        v
    }
}
