use crate::{Interval, Vec3};

/// Offset used for the near end of spawned rays to avoid self-intersection.
pub const RAY_EPSILON: f32 = 1e-4;

/// A ray in 3D space with origin, direction, and a valid parameter range.
///
/// The direction is expected to be normalized for camera and bounce rays.
/// Instance-space copies produced by `FrameExt::transform_ray` keep the
/// world-space parameterization, so their directions may not be unit length.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub tmin: f32,
    pub tmax: f32,
}

impl Ray {
    /// Create a new ray with the default range `[RAY_EPSILON, f32::MAX]`.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction,
            tmin: RAY_EPSILON,
            tmax: f32::MAX,
        }
    }

    /// Create a ray restricted to the given parameter range.
    pub fn with_range(origin: Vec3, direction: Vec3, tmin: f32, tmax: f32) -> Self {
        Self {
            origin,
            direction,
            tmin,
            tmax,
        }
    }

    /// The parameter range as an interval.
    #[inline]
    pub fn range(&self) -> Interval {
        Interval::new(self.tmin, self.tmax)
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}
