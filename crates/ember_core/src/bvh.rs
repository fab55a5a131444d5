//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Uses a binary tree over every instanced element of a scene. Element
//! vertices are baked into world space at build time, so traversal never
//! transforms rays; barycentric and segment coordinates are affine
//! invariant, which keeps the reported `uv` valid for scene evaluation.

use ember_math::{Aabb, Ray, Vec3};

use crate::intersect::{Intersection, Intersector};
use crate::primitive::{intersect_line, intersect_quad, intersect_triangle, PrimitiveHit};
use crate::scene::Scene;
use crate::shape::ElementKind;

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// World-space element geometry.
#[derive(Debug, Clone)]
enum Element {
    Triangle([Vec3; 3]),
    Quad([Vec3; 4]),
    Line([Vec3; 2], [f32; 2]),
}

/// A single intersectable element of an instance.
#[derive(Debug, Clone)]
struct Primitive {
    instance: usize,
    element: usize,
    geometry: Element,
    bbox: Aabb,
}

impl Primitive {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        let hit: Option<PrimitiveHit> = match &self.geometry {
            Element::Triangle([p0, p1, p2]) => intersect_triangle(ray, *p0, *p1, *p2),
            Element::Quad([p0, p1, p2, p3]) => intersect_quad(ray, *p0, *p1, *p2, *p3),
            Element::Line([p0, p1], [r0, r1]) => intersect_line(ray, *p0, *p1, *r0, *r1),
        };
        hit.map(|hit| Intersection {
            instance: self.instance,
            element: self.element,
            uv: hit.uv,
            distance: hit.distance,
        })
    }
}

/// BVH node - either a branch with two children or a leaf with primitives.
///
/// Using an enum allows for more cache-efficient traversal since
/// we avoid dynamic dispatch overhead.
#[derive(Debug)]
enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node with a small number of primitives.
    Leaf { primitives: Vec<Primitive>, bbox: Aabb },
    /// Empty node (scene without geometry).
    Empty,
}

impl BvhNode {
    /// Recursive BVH construction.
    ///
    /// Simple median-split approach: sort primitives by centroid on the
    /// longest axis, split in half, recurse.
    fn build(mut primitives: Vec<Primitive>) -> Self {
        if primitives.is_empty() {
            return BvhNode::Empty;
        }

        let n = primitives.len();
        let bbox = primitives
            .iter()
            .fold(Aabb::EMPTY, |acc, p| Aabb::surrounding(&acc, &p.bbox));

        if n <= LEAF_MAX_SIZE {
            return BvhNode::Leaf { primitives, bbox };
        }

        // Choose split axis based on centroid spread
        let centroids = Aabb::from_iter_points(primitives.iter().map(|p| p.bbox.centroid()));
        let axis = centroids.longest_axis();

        primitives.sort_unstable_by(|a, b| {
            a.bbox.centroid()[axis]
                .partial_cmp(&b.bbox.centroid()[axis])
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let right = primitives.split_off(n / 2);
        BvhNode::Branch {
            left: Box::new(Self::build(primitives)),
            right: Box::new(Self::build(right)),
            bbox,
        }
    }

    fn hit(&self, ray: &Ray) -> Option<Intersection> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { primitives, bbox } => {
                if !bbox.hit(ray, ray.range()) {
                    return None;
                }
                let mut ray = *ray;
                let mut closest = None;
                for primitive in primitives {
                    if let Some(hit) = primitive.intersect(&ray) {
                        ray.tmax = hit.distance;
                        closest = Some(hit);
                    }
                }
                closest
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray.range()) {
                    return None;
                }
                let hit_left = left.hit(ray);

                // Only check right up to closest hit
                let mut right_ray = *ray;
                if let Some(hit) = &hit_left {
                    right_ray.tmax = hit.distance;
                }
                right.hit(&right_ray).or(hit_left)
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
            _ => 1,
        }
    }
}

/// BVH over every element of every instance of a scene.
#[derive(Debug)]
pub struct SceneBvh {
    root: BvhNode,
    primitive_count: usize,
}

impl SceneBvh {
    /// Build the hierarchy for the scene's current instances.
    ///
    /// The scene should have passed `Scene::validate`.
    pub fn build(scene: &Scene) -> Self {
        let mut primitives = Vec::new();

        for (instance_id, instance) in scene.instances.iter().enumerate() {
            let shape = &scene.shapes[instance.shape];
            let frame = &instance.frame;
            let world = |v: usize| frame.transform_point3(shape.positions[v]);

            match shape.kind() {
                Some(ElementKind::Triangles) => {
                    for (element, &[a, b, c]) in shape.triangles.iter().enumerate() {
                        let points = [world(a), world(b), world(c)];
                        primitives.push(Primitive {
                            instance: instance_id,
                            element,
                            bbox: Aabb::from_iter_points(points),
                            geometry: Element::Triangle(points),
                        });
                    }
                }
                Some(ElementKind::Quads) => {
                    for (element, &[a, b, c, d]) in shape.quads.iter().enumerate() {
                        let points = [world(a), world(b), world(c), world(d)];
                        primitives.push(Primitive {
                            instance: instance_id,
                            element,
                            bbox: Aabb::from_iter_points(points),
                            geometry: Element::Quad(points),
                        });
                    }
                }
                Some(ElementKind::Lines) => {
                    // Radii follow the mean scale of the instance frame
                    let scale = frame.transform_vector3(Vec3::ONE).length() / Vec3::ONE.length();
                    let radius = |v: usize| shape.radius.get(v).copied().unwrap_or(0.001) * scale;
                    for (element, &[a, b]) in shape.lines.iter().enumerate() {
                        let points = [world(a), world(b)];
                        let radii = [radius(a), radius(b)];
                        primitives.push(Primitive {
                            instance: instance_id,
                            element,
                            bbox: Aabb::from_iter_points(points).inflate(radii[0].max(radii[1])),
                            geometry: Element::Line(points, radii),
                        });
                    }
                }
                None => {}
            }
        }

        let primitive_count = primitives.len();
        let root = BvhNode::build(primitives);
        log::debug!(
            "built scene bvh: {} primitives, depth {}",
            primitive_count,
            root.depth()
        );

        Self {
            root,
            primitive_count,
        }
    }

    /// Number of primitives in the hierarchy.
    pub fn primitive_count(&self) -> usize {
        self.primitive_count
    }

    /// World-space bounds of the whole scene.
    pub fn bounds(&self) -> Aabb {
        match &self.root {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => *bbox,
        }
    }
}

impl Intersector for SceneBvh {
    fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        if ray.range().size() < 0.0 {
            return None;
        }
        self.root.hit(ray)
    }
}
