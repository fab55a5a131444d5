//! Recursive path tracing.
//!
//! Brute-force unidirectional random walks: at each hit one scattering
//! direction is importance sampled from the material and traced
//! recursively. Paths are cut at `RenderParams::bounces`; there is no
//! Russian roulette and no explicit light sampling.

use ember_core::MaterialKind;
use ember_math::{mean, Ray, Vec3, Vec4};

use super::{Shader, SurfacePoint, Tracer};
use crate::sampling::{
    fresnel_dielectric, fresnel_schlick, rand1f, rand2f, reflect, refract, roughness_exponent,
    sample_hemisphere_cos, sample_hemisphere_cospower, PixelRng,
};

/// Reflectance at normal incidence of the dielectric coat on transparent and
/// glossy materials.
const COAT_SPECULAR: Vec3 = Vec3::splat(0.04);

/// Physical path tracer over every material model.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathTraceShader;

impl Shader for PathTraceShader {
    fn shade(&self, tracer: &Tracer<'_>, ray: &Ray, bounce: u32, rng: &mut PixelRng) -> Vec4 {
        let Some(hit) = tracer.intersect(ray) else {
            return tracer.miss(ray);
        };
        let surface = tracer.surface(&hit, ray);
        let entering = surface.entering();
        let normal = surface.facing_normal();
        let position = surface.position;
        let outgoing = surface.outgoing;

        // Stochastic cut-out. The skip costs a bounce but is always taken, so
        // fully transparent surfaces stay invisible past the bounce limit.
        if rand1f(rng) < 1.0 - surface.opacity {
            return self.shade(tracer, &Ray::new(position, ray.direction), bounce + 1, rng);
        }

        let mut radiance = surface.emission;
        if bounce >= tracer.params.bounces {
            return radiance.extend(1.0);
        }

        let trace = |direction: Vec3, rng: &mut PixelRng| -> Vec3 {
            self.shade(tracer, &Ray::new(position, direction), bounce + 1, rng)
                .truncate()
        };

        let material = surface.material;
        let color = surface.color;
        match material.kind {
            MaterialKind::Matte | MaterialKind::Volumetric => {
                let incoming = sample_hemisphere_cos(normal, rand2f(rng));
                radiance += color * trace(incoming, rng);
            }
            MaterialKind::Reflective => {
                let mnormal = microfacet_normal(&surface, normal, rng);
                let incoming = reflect(outgoing, mnormal);
                radiance += if material.roughness == 0.0 {
                    fresnel_schlick(color, mnormal, outgoing) * trace(incoming, rng)
                } else {
                    color * trace(incoming, rng)
                };
            }
            MaterialKind::Transparent => {
                let mnormal = microfacet_normal(&surface, normal, rng);
                if rand1f(rng) < mean(fresnel_schlick(COAT_SPECULAR, mnormal, outgoing)) {
                    radiance += trace(reflect(outgoing, mnormal), rng);
                } else {
                    radiance += color * trace(-outgoing, rng);
                }
            }
            MaterialKind::Glossy => {
                let mnormal = microfacet_normal(&surface, normal, rng);
                if rand1f(rng) < mean(fresnel_schlick(COAT_SPECULAR, mnormal, outgoing)) {
                    radiance += trace(reflect(outgoing, mnormal), rng);
                } else {
                    let incoming = sample_hemisphere_cos(normal, rand2f(rng));
                    radiance += color * trace(incoming, rng);
                }
            }
            MaterialKind::Refractive => {
                let mnormal = microfacet_normal(&surface, normal, rng);
                let ior = material.ior;
                let eta = if entering { ior } else { 1.0 / ior };
                if rand1f(rng) < fresnel_dielectric(eta, mnormal, outgoing) {
                    radiance += trace(reflect(outgoing, mnormal), rng);
                } else {
                    match refract_or_reflect(outgoing, normal, mnormal, eta) {
                        (incoming, true) => radiance += color * trace(incoming, rng),
                        (incoming, false) => radiance += trace(incoming, rng),
                    }
                }
            }
        }

        radiance.extend(1.0)
    }
}

/// Diffuse-only path tracer: every surface is shaded as matte.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatteShader;

impl Shader for MatteShader {
    fn shade(&self, tracer: &Tracer<'_>, ray: &Ray, bounce: u32, rng: &mut PixelRng) -> Vec4 {
        let Some(hit) = tracer.intersect(ray) else {
            return tracer.miss(ray);
        };
        let surface = tracer.surface(&hit, ray);

        let mut radiance = surface.emission;
        if bounce >= tracer.params.bounces {
            return radiance.extend(1.0);
        }

        let incoming = sample_hemisphere_cos(surface.facing_normal(), rand2f(rng));
        let lighting = self.shade(tracer, &Ray::new(surface.position, incoming), bounce + 1, rng);
        radiance += surface.color * lighting.truncate();

        radiance.extend(1.0)
    }
}

/// Shading normal, or a sampled microfacet normal for rough materials.
fn microfacet_normal(surface: &SurfacePoint<'_>, normal: Vec3, rng: &mut PixelRng) -> Vec3 {
    let roughness = surface.material.roughness;
    if roughness == 0.0 {
        normal
    } else {
        sample_hemisphere_cospower(roughness_exponent(roughness), normal, rand2f(rng))
    }
}

/// Refracted direction through the shading normal, flagged `true`.
///
/// A microfacet sample can pick transmission where the shading normal is
/// past the critical angle; the mirror direction about `mnormal` is
/// returned instead, flagged `false`.
fn refract_or_reflect(outgoing: Vec3, normal: Vec3, mnormal: Vec3, eta: f32) -> (Vec3, bool) {
    let incoming = refract(outgoing, normal, 1.0 / eta);
    if incoming == Vec3::ZERO {
        (reflect(outgoing, mnormal), false)
    } else {
        (incoming, true)
    }
}
