//! Ray intersection for the element kinds a shape can hold.
//!
//! Every function reports the element-local `uv` with the same convention
//! `Shape::interpolate` uses, plus the ray parameter of the hit.

use ember_math::{Ray, Vec2, Vec3};

/// Element-local result of a primitive test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrimitiveHit {
    pub uv: Vec2,
    pub distance: f32,
}

/// Möller-Trumbore ray-triangle intersection.
pub fn intersect_triangle(ray: &Ray, p0: Vec3, p1: Vec3, p2: Vec3) -> Option<PrimitiveHit> {
    let edge1 = p1 - p0;
    let edge2 = p2 - p0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < 1e-12 {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - p0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    if !ray.range().contains(t) {
        return None;
    }

    Some(PrimitiveHit {
        uv: Vec2::new(u, v),
        distance: t,
    })
}

/// Quad intersection as two triangles split along the p1-p3 diagonal.
pub fn intersect_quad(ray: &Ray, p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Option<PrimitiveHit> {
    // Degenerate quads are triangles stored as quads
    if p2 == p3 {
        return intersect_triangle(ray, p0, p1, p3);
    }

    let first = intersect_triangle(ray, p0, p1, p3);
    let mut second_ray = *ray;
    if let Some(hit) = first {
        second_ray.tmax = hit.distance;
    }
    match intersect_triangle(&second_ray, p2, p3, p1) {
        Some(hit) => Some(PrimitiveHit {
            uv: Vec2::ONE - hit.uv,
            distance: hit.distance,
        }),
        None => first,
    }
}

/// Intersection with a line segment swept by a linearly varying radius.
///
/// Finds the closest approach between the ray and the segment's supporting
/// line and accepts it if the distance is within the interpolated radius.
/// `uv.x` is the position along the segment, `uv.y` the normalized distance
/// from its axis.
pub fn intersect_line(ray: &Ray, p0: Vec3, p1: Vec3, r0: f32, r1: f32) -> Option<PrimitiveHit> {
    let u = ray.direction;
    let v = p1 - p0;
    let w = ray.origin - p0;

    let a = u.dot(u);
    let b = u.dot(v);
    let c = v.dot(v);
    let d = u.dot(w);
    let e = v.dot(w);
    let det = a * c - b * b;

    // Ray parallel to the segment
    if det == 0.0 {
        return None;
    }

    let t = (b * e - c * d) / det;
    let s = (a * e - b * d) / det;
    if !ray.range().contains(t) {
        return None;
    }

    let s = s.clamp(0.0, 1.0);
    let on_segment = p0 * (1.0 - s) + p1 * s;
    let on_ray = ray.at(t);
    let delta = on_segment - on_ray;

    let r = r0 * (1.0 - s) + r1 * s;
    let d2 = delta.dot(delta);
    if d2 > r * r {
        return None;
    }

    Some(PrimitiveHit {
        uv: Vec2::new(s, d2.sqrt() / r),
        distance: t,
    })
}
