//! Shading variants.
//!
//! Every variant implements [`Shader`]: a pure function of the scene, the
//! intersector, the ray, the bounce depth and the pixel's random stream that
//! returns RGBA radiance. The variant is resolved once per pass from
//! [`ShaderKind`].

mod debug;
mod path;

pub use debug::{EyelightShader, FlatColorShader, NormalShader, TexcoordShader};
pub use path::{MatteShader, PathTraceShader};

use ember_core::{ElementKind, Intersection, Intersector, Material, Scene};
use ember_math::{Ray, Vec2, Vec3, Vec4};

use crate::params::{RenderParams, ShaderKind};
use crate::sampling::PixelRng;

/// A per-ray integrator.
pub trait Shader: Send + Sync {
    /// Radiance arriving along `ray`, with the hit weight in alpha.
    fn shade(&self, tracer: &Tracer<'_>, ray: &Ray, bounce: u32, rng: &mut PixelRng) -> Vec4;
}

impl ShaderKind {
    /// The integrator implementing this variant.
    pub fn shader(self) -> &'static dyn Shader {
        match self {
            ShaderKind::PathTrace => &PathTraceShader,
            ShaderKind::MatteOnly => &MatteShader,
            ShaderKind::Eyelight => &EyelightShader,
            ShaderKind::NormalDebug => &NormalShader,
            ShaderKind::TexcoordDebug => &TexcoordShader,
            ShaderKind::FlatColor => &FlatColorShader,
        }
    }
}

/// Read-only context shared by every ray of a pass.
#[derive(Clone, Copy)]
pub struct Tracer<'a> {
    pub scene: &'a Scene,
    pub intersector: &'a dyn Intersector,
    pub params: &'a RenderParams,
}

impl<'a> Tracer<'a> {
    pub fn new(scene: &'a Scene, intersector: &'a dyn Intersector, params: &'a RenderParams) -> Self {
        Self {
            scene,
            intersector,
            params,
        }
    }

    #[inline]
    pub fn intersect(&self, ray: &Ray) -> Option<Intersection> {
        self.intersector.intersect(ray)
    }

    /// Radiance for a ray that left the scene.
    ///
    /// Alpha is 0 when there is no environment to composite over.
    pub fn miss(&self, ray: &Ray) -> Vec4 {
        let radiance = self.scene.eval_environment(ray.direction);
        let alpha = if self.scene.environments.is_empty() { 0.0 } else { 1.0 };
        radiance.extend(alpha)
    }

    /// Geometry and material at a hit.
    pub fn surface(&self, hit: &Intersection, ray: &Ray) -> SurfacePoint<'a> {
        let scene = self.scene;
        let instance = &scene.instances[hit.instance];
        let shape = &scene.shapes[instance.shape];
        let material = &scene.materials[instance.material];

        let texcoord = scene.eval_texcoord(hit.instance, hit.element, hit.uv);
        let emission_tex = scene.eval_texture(material.emission_tex, texcoord, true);
        let color_tex = scene.eval_texture(material.color_tex, texcoord, true);

        SurfacePoint {
            material,
            outgoing: -ray.direction,
            position: scene.eval_position(hit.instance, hit.element, hit.uv),
            normal: scene.eval_normal(hit.instance, hit.element, hit.uv),
            texcoord,
            is_line: shape.kind() == Some(ElementKind::Lines),
            emission: material.emission * emission_tex.truncate(),
            color: material.color * color_tex.truncate(),
            opacity: material.opacity * color_tex.w,
        }
    }
}

/// Shading inputs at a ray hit, in world space.
#[derive(Debug, Clone, Copy)]
pub struct SurfacePoint<'a> {
    pub material: &'a Material,
    /// Direction back towards the ray origin
    pub outgoing: Vec3,
    pub position: Vec3,
    /// Interpolated shading normal, not yet oriented
    pub normal: Vec3,
    pub texcoord: Vec2,
    pub is_line: bool,
    pub emission: Vec3,
    pub color: Vec3,
    pub opacity: f32,
}

impl SurfacePoint<'_> {
    /// True if the ray arrived on the side the normal points to.
    #[inline]
    pub fn entering(&self) -> bool {
        self.normal.dot(self.outgoing) > 0.0
    }

    /// Normal facing the outgoing direction.
    ///
    /// Lines have no consistent orientation, so their tangent is
    /// orthonormalized against the outgoing direction instead.
    pub fn facing_normal(&self) -> Vec3 {
        if self.is_line {
            crate::sampling::orthonormalize(self.outgoing, self.normal)
        } else if self.entering() {
            self.normal
        } else {
            -self.normal
        }
    }
}
