//! Single-bounce preview and debug views.

use ember_core::srgb_to_rgb;
use ember_math::{Ray, Vec3, Vec4};

use super::{Shader, Tracer};
use crate::sampling::PixelRng;

/// Headlight shading: emission plus color scaled by the view cosine.
#[derive(Debug, Clone, Copy, Default)]
pub struct EyelightShader;

impl Shader for EyelightShader {
    fn shade(&self, tracer: &Tracer<'_>, ray: &Ray, _bounce: u32, _rng: &mut PixelRng) -> Vec4 {
        let Some(hit) = tracer.intersect(ray) else {
            return tracer.miss(ray);
        };
        let surface = tracer.surface(&hit, ray);
        let cosine = surface.normal.dot(surface.outgoing).abs();
        (surface.emission + surface.color * cosine).extend(1.0)
    }
}

/// World-space shading normal remapped from `[-1,1]` to `[0,1]`.
///
/// The remapped value is decoded from sRGB so an sRGB-encoded output
/// displays it unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalShader;

impl Shader for NormalShader {
    fn shade(&self, tracer: &Tracer<'_>, ray: &Ray, _bounce: u32, _rng: &mut PixelRng) -> Vec4 {
        let Some(hit) = tracer.intersect(ray) else {
            return tracer.miss(ray);
        };
        let normal = tracer.scene.eval_normal(hit.instance, hit.element, hit.uv);
        let color = normal * 0.5 + 0.5;
        Vec3::new(srgb_to_rgb(color.x), srgb_to_rgb(color.y), srgb_to_rgb(color.z)).extend(1.0)
    }
}

/// Texture coordinates, wrapped to `[0,1)`, in red and green.
#[derive(Debug, Clone, Copy, Default)]
pub struct TexcoordShader;

impl Shader for TexcoordShader {
    fn shade(&self, tracer: &Tracer<'_>, ray: &Ray, _bounce: u32, _rng: &mut PixelRng) -> Vec4 {
        let Some(hit) = tracer.intersect(ray) else {
            return tracer.miss(ray);
        };
        let uv = tracer.scene.eval_texcoord(hit.instance, hit.element, hit.uv);
        Vec4::new(uv.x.rem_euclid(1.0), uv.y.rem_euclid(1.0), 0.0, 1.0)
    }
}

/// Unlit material color.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatColorShader;

impl Shader for FlatColorShader {
    fn shade(&self, tracer: &Tracer<'_>, ray: &Ray, _bounce: u32, _rng: &mut PixelRng) -> Vec4 {
        let Some(hit) = tracer.intersect(ray) else {
            return tracer.miss(ray);
        };
        let instance = &tracer.scene.instances[hit.instance];
        tracer.scene.materials[instance.material].color.extend(1.0)
    }
}
