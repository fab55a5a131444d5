//! The intersection contract between the renderer and scene geometry.

use ember_math::{Ray, Vec2};

/// Nearest hit along a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    /// Index into `Scene::instances`
    pub instance: usize,
    /// Element index within the instance's shape
    pub element: usize,
    /// Element-local coordinates of the hit
    pub uv: Vec2,
    /// Ray parameter of the hit
    pub distance: f32,
}

/// Trait for acceleration structures that answer nearest-hit queries.
///
/// Implementations are read-only after construction and are queried
/// concurrently from many pixel workers.
pub trait Intersector: Send + Sync {
    /// Find the nearest hit within the ray's `[tmin, tmax]` range.
    fn intersect(&self, ray: &Ray) -> Option<Intersection>;
}
