// Re-export glam for convenience
pub use glam::*;

// Ember math types
mod aabb;
mod frame;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use frame::FrameExt;
pub use interval::Interval;
pub use ray::{Ray, RAY_EPSILON};

/// Component-wise mean of an RGB triple.
#[inline]
pub fn mean(v: Vec3) -> f32 {
    (v.x + v.y + v.z) / 3.0
}

/// Returns true if every channel of `v` is finite.
#[inline]
pub fn is_finite4(v: Vec4) -> bool {
    v.x.is_finite() && v.y.is_finite() && v.z.is_finite() && v.w.is_finite()
}
