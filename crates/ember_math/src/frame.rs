// Frame utilities for Affine3A
//
// Extends glam::Affine3A with the point/vector/normal conventions the scene
// evaluation and intersection code need.
// Note: glam::Affine3A already provides transform_point3(), transform_vector3()
// and inverse()

use glam::{Affine3A, Vec3};

use crate::{Aabb, Ray};

/// Extension trait for Affine3A to provide additional transform utilities
pub trait FrameExt {
    /// Transform a surface normal (inverse transpose of the linear part),
    /// returned normalized.
    fn transform_normal(&self, normal: Vec3) -> Vec3;

    /// Transform a direction (no translation), returned normalized.
    fn transform_direction(&self, direction: Vec3) -> Vec3;

    /// Transform a ray, keeping its parameter range. The direction is not
    /// renormalized so hit distances stay comparable across frames.
    fn transform_ray(&self, ray: &Ray) -> Ray;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;

    /// Build a frame at `from` whose local -Z looks at `to`.
    fn look_at(from: Vec3, to: Vec3, up: Vec3) -> Self;
}

impl FrameExt for Affine3A {
    fn transform_normal(&self, normal: Vec3) -> Vec3 {
        let inverse_transpose = self.matrix3.inverse().transpose();
        (inverse_transpose * glam::Vec3A::from(normal))
            .normalize()
            .into()
    }

    fn transform_direction(&self, direction: Vec3) -> Vec3 {
        self.transform_vector3(direction).normalize()
    }

    fn transform_ray(&self, ray: &Ray) -> Ray {
        Ray::with_range(
            self.transform_point3(ray.origin),
            self.transform_vector3(ray.direction),
            ray.tmin,
            ray.tmax,
        )
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        let (lo, hi) = (aabb.min(), aabb.max());
        let corners = [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ];
        Aabb::from_iter_points(corners.iter().map(|&c| self.transform_point3(c)))
    }

    fn look_at(from: Vec3, to: Vec3, up: Vec3) -> Self {
        let w = (from - to).normalize();
        let u = up.cross(w).normalize();
        let v = w.cross(u);
        Affine3A::from_cols(u.into(), v.into(), w.into(), from.into())
    }
}
