//! Shape geometry for the Ember scene model.
//!
//! A shape holds vertex data plus exactly one kind of element: triangles,
//! quads or lines. Elements index into the vertex arrays; optional per-vertex
//! normals, texture coordinates and radii are interpolated at an element-local
//! `uv` the same way the intersector reports it.

use std::f32::consts::PI;

use ember_math::{Aabb, Vec2, Vec3};

/// The kind of element a shape is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Triangles,
    Quads,
    Lines,
}

/// Indexed geometry with optional per-vertex attributes.
#[derive(Clone, Debug, Default)]
pub struct Shape {
    /// Vertex positions
    pub positions: Vec<Vec3>,

    /// Vertex normals (tangents for lines), empty if not provided
    pub normals: Vec<Vec3>,

    /// Vertex texture coordinates, empty if not provided
    pub texcoords: Vec<Vec2>,

    /// Vertex radii, used by lines
    pub radius: Vec<f32>,

    pub triangles: Vec<[usize; 3]>,
    pub quads: Vec<[usize; 4]>,
    pub lines: Vec<[usize; 2]>,
}

impl Shape {
    /// Create a triangle mesh from positions and indices.
    pub fn from_triangles(positions: Vec<Vec3>, triangles: Vec<[usize; 3]>) -> Self {
        Self {
            positions,
            triangles,
            ..Default::default()
        }
    }

    /// A 2x2 quad in the XY plane, centered at the origin and facing +Z.
    pub fn quad() -> Self {
        Self {
            positions: vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(1.0, 1.0, 0.0),
                Vec3::new(-1.0, 1.0, 0.0),
            ],
            normals: vec![Vec3::Z; 4],
            texcoords: vec![
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 0.0),
            ],
            quads: vec![[0, 1, 2, 3]],
            ..Default::default()
        }
    }

    /// A unit sphere tessellated into `steps * 2` by `steps` quads.
    pub fn sphere(steps: usize) -> Self {
        let steps = steps.max(2);
        let (nu, nv) = (steps * 2, steps);
        let mut shape = Shape::default();

        for j in 0..=nv {
            for i in 0..=nu {
                let uv = Vec2::new(i as f32 / nu as f32, j as f32 / nv as f32);
                let phi = 2.0 * PI * uv.x;
                let theta = PI * (1.0 - uv.y);
                let p = Vec3::new(phi.cos() * theta.sin(), theta.cos(), phi.sin() * theta.sin());
                shape.positions.push(p);
                shape.normals.push(p);
                shape.texcoords.push(uv);
            }
        }

        let vid = |i: usize, j: usize| j * (nu + 1) + i;
        for j in 0..nv {
            for i in 0..nu {
                shape
                    .quads
                    .push([vid(i, j), vid(i + 1, j), vid(i + 1, j + 1), vid(i, j + 1)]);
            }
        }
        shape
    }

    /// A single line segment with constant radius.
    pub fn line(p0: Vec3, p1: Vec3, radius: f32) -> Self {
        Self {
            positions: vec![p0, p1],
            radius: vec![radius, radius],
            lines: vec![[0, 1]],
            ..Default::default()
        }
    }

    /// The element kind this shape is made of, or None if it has no elements.
    pub fn kind(&self) -> Option<ElementKind> {
        if !self.triangles.is_empty() {
            Some(ElementKind::Triangles)
        } else if !self.quads.is_empty() {
            Some(ElementKind::Quads)
        } else if !self.lines.is_empty() {
            Some(ElementKind::Lines)
        } else {
            None
        }
    }

    /// Number of distinct element kinds present (valid shapes have one).
    pub fn kind_count(&self) -> usize {
        [
            !self.triangles.is_empty(),
            !self.quads.is_empty(),
            !self.lines.is_empty(),
        ]
        .iter()
        .filter(|&&present| present)
        .count()
    }

    /// Number of elements of the shape's kind.
    pub fn element_count(&self) -> usize {
        self.triangles.len() + self.quads.len() + self.lines.len()
    }

    /// Iterate over every vertex index referenced by any element.
    pub fn element_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.triangles
            .iter()
            .flat_map(|t| t.iter().copied())
            .chain(self.quads.iter().flat_map(|q| q.iter().copied()))
            .chain(self.lines.iter().flat_map(|l| l.iter().copied()))
    }

    /// Object-space bounding box of the vertices.
    pub fn bounds(&self) -> Aabb {
        Aabb::from_iter_points(self.positions.iter().copied())
    }

    /// Interpolate a per-vertex attribute at element-local `uv`.
    pub fn interpolate<T>(&self, values: &[T], element: usize, uv: Vec2) -> T
    where
        T: Copy + std::ops::Mul<f32, Output = T> + std::ops::Add<Output = T>,
    {
        match self.kind() {
            Some(ElementKind::Triangles) => {
                let [a, b, c] = self.triangles[element];
                interpolate_triangle(values[a], values[b], values[c], uv)
            }
            Some(ElementKind::Quads) => {
                let [a, b, c, d] = self.quads[element];
                interpolate_quad(values[a], values[b], values[c], values[d], uv)
            }
            Some(ElementKind::Lines) => {
                let [a, b] = self.lines[element];
                interpolate_line(values[a], values[b], uv.x)
            }
            None => values[0],
        }
    }

    /// Object-space position at element-local `uv`.
    pub fn eval_position(&self, element: usize, uv: Vec2) -> Vec3 {
        self.interpolate(&self.positions, element, uv)
    }

    /// Object-space geometric normal of an element (tangent for lines).
    pub fn eval_element_normal(&self, element: usize) -> Vec3 {
        let p = &self.positions;
        match self.kind() {
            Some(ElementKind::Triangles) => {
                let [a, b, c] = self.triangles[element];
                triangle_normal(p[a], p[b], p[c])
            }
            Some(ElementKind::Quads) => {
                let [a, b, c, d] = self.quads[element];
                (triangle_normal(p[a], p[b], p[d]) + triangle_normal(p[c], p[d], p[b]))
                    .normalize_or_zero()
            }
            Some(ElementKind::Lines) => {
                let [a, b] = self.lines[element];
                (p[b] - p[a]).normalize_or_zero()
            }
            None => Vec3::Z,
        }
    }

    /// Object-space shading normal at element-local `uv`.
    pub fn eval_normal(&self, element: usize, uv: Vec2) -> Vec3 {
        if self.normals.is_empty() {
            self.eval_element_normal(element)
        } else {
            self.interpolate(&self.normals, element, uv).normalize_or_zero()
        }
    }

    /// Texture coordinates at element-local `uv` (the uv itself if the shape
    /// carries none).
    pub fn eval_texcoord(&self, element: usize, uv: Vec2) -> Vec2 {
        if self.texcoords.is_empty() {
            uv
        } else {
            self.interpolate(&self.texcoords, element, uv)
        }
    }
}

#[inline]
fn triangle_normal(p0: Vec3, p1: Vec3, p2: Vec3) -> Vec3 {
    (p1 - p0).cross(p2 - p0).normalize_or_zero()
}

#[inline]
fn interpolate_line<T>(p0: T, p1: T, u: f32) -> T
where
    T: Copy + std::ops::Mul<f32, Output = T> + std::ops::Add<Output = T>,
{
    p0 * (1.0 - u) + p1 * u
}

#[inline]
fn interpolate_triangle<T>(p0: T, p1: T, p2: T, uv: Vec2) -> T
where
    T: Copy + std::ops::Mul<f32, Output = T> + std::ops::Add<Output = T>,
{
    p0 * (1.0 - uv.x - uv.y) + p1 * uv.x + p2 * uv.y
}

/// Quads are split along the p1-p3 diagonal; the second half uses mirrored uv.
#[inline]
fn interpolate_quad<T>(p0: T, p1: T, p2: T, p3: T, uv: Vec2) -> T
where
    T: Copy + std::ops::Mul<f32, Output = T> + std::ops::Add<Output = T>,
{
    if uv.x + uv.y <= 1.0 {
        interpolate_triangle(p0, p1, p3, uv)
    } else {
        interpolate_triangle(p2, p3, p1, Vec2::ONE - uv)
    }
}
