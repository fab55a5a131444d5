//! Random streams, direction sampling and Fresnel terms.
//!
//! Directions follow the "away from the surface" convention: `outgoing`
//! points back towards the viewer and every sampled `incoming` direction
//! points away from the shading point.

use std::f32::consts::PI;

use ember_math::{Vec2, Vec3};
use rand::Rng;
use rand_xoshiro::Xoshiro256Plus;

/// Per-pixel random number generator.
pub type PixelRng = Xoshiro256Plus;

/// Uniform float in `[0, 1)`.
#[inline]
pub fn rand1f(rng: &mut PixelRng) -> f32 {
    rng.gen::<f32>()
}

/// Pair of uniform floats in `[0, 1)`.
#[inline]
pub fn rand2f(rng: &mut PixelRng) -> Vec2 {
    let x = rand1f(rng);
    let y = rand1f(rng);
    Vec2::new(x, y)
}

/// Mirror `w` about `n`.
#[inline]
pub fn reflect(w: Vec3, n: Vec3) -> Vec3 {
    -w + 2.0 * n.dot(w) * n
}

/// Refract `w` through a surface with normal `n`.
///
/// `inv_eta` is the ratio of the index on the incoming side over the index on
/// the transmitted side. Returns zero on total internal reflection.
#[inline]
pub fn refract(w: Vec3, n: Vec3, inv_eta: f32) -> Vec3 {
    let cosine = n.dot(w);
    let k = 1.0 + inv_eta * inv_eta * (cosine * cosine - 1.0);
    if k < 0.0 {
        return Vec3::ZERO;
    }
    -w * inv_eta + (inv_eta * cosine - k.sqrt()) * n
}

/// Component of `a` orthogonal to `b`, normalized.
#[inline]
pub fn orthonormalize(a: Vec3, b: Vec3) -> Vec3 {
    (a - b * a.dot(b)).normalize_or_zero()
}

/// Schlick's approximation with per-channel reflectance at normal incidence.
pub fn fresnel_schlick(specular: Vec3, normal: Vec3, outgoing: Vec3) -> Vec3 {
    if specular == Vec3::ZERO {
        return Vec3::ZERO;
    }
    let cosine = normal.dot(outgoing);
    specular + (Vec3::ONE - specular) * (1.0 - cosine.abs()).clamp(0.0, 1.0).powi(5)
}

/// Exact Fresnel reflectance of an uncoated dielectric.
///
/// `eta` is the relative index of refraction across the surface as seen from
/// the side `outgoing` lies on. Returns 1 on total internal reflection.
pub fn fresnel_dielectric(eta: f32, normal: Vec3, outgoing: Vec3) -> f32 {
    let cosw = normal.dot(outgoing).abs();

    let sin2 = 1.0 - cosw * cosw;
    let eta2 = eta * eta;

    let cos2t = 1.0 - sin2 / eta2;
    if cos2t < 0.0 {
        return 1.0;
    }

    let t0 = cos2t.sqrt();
    let t1 = eta * t0;
    let t2 = eta * cosw;

    let rs = (cosw - t1) / (cosw + t1);
    let rp = (t0 - t2) / (t0 + t2);

    (rs * rs + rp * rp) / 2.0
}

/// Cosine-weighted direction in the hemisphere around `normal`.
pub fn sample_hemisphere_cos(normal: Vec3, ruv: Vec2) -> Vec3 {
    let z = ruv.y.sqrt();
    to_world(normal, ruv.x, z)
}

/// Direction from a normalized cosine-power lobe around `normal`.
pub fn sample_hemisphere_cospower(exponent: f32, normal: Vec3, ruv: Vec2) -> Vec3 {
    let z = ruv.y.powf(1.0 / (exponent + 1.0));
    to_world(normal, ruv.x, z)
}

/// Cosine-power exponent for a material roughness.
#[inline]
pub fn roughness_exponent(roughness: f32) -> f32 {
    2.0 / roughness.powi(4)
}

/// Direction at azimuth `2π·u` and cosine `z` about `normal`.
fn to_world(normal: Vec3, u: f32, z: f32) -> Vec3 {
    let r = (1.0 - z * z).max(0.0).sqrt();
    let phi = 2.0 * PI * u;
    let (tangent, bitangent) = build_orthonormal_basis(normal);
    (r * phi.cos()) * tangent + (r * phi.sin()) * bitangent + z * normal
}

/// Build an orthonormal basis from a normal vector.
fn build_orthonormal_basis(n: Vec3) -> (Vec3, Vec3) {
    let sign = if n.z >= 0.0 { 1.0 } else { -1.0 };
    let a = -1.0 / (sign + n.z);
    let b = n.x * n.y * a;

    let tangent = Vec3::new(1.0 + sign * n.x * n.x * a, sign * b, -sign * n.x);
    let bitangent = Vec3::new(b, sign + n.y * n.y * a, -n.y);

    (tangent, bitangent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_orthonormal_basis() {
        for n in [Vec3::Y, Vec3::NEG_Z, Vec3::new(1.0, 2.0, -3.0).normalize()] {
            let (t, b) = build_orthonormal_basis(n);

            // Check orthogonality
            assert!(t.dot(n).abs() < 0.001);
            assert!(b.dot(n).abs() < 0.001);
            assert!(t.dot(b).abs() < 0.001);

            // Check unit length
            assert!((t.length() - 1.0).abs() < 0.001);
            assert!((b.length() - 1.0).abs() < 0.001);
        }
    }

    #[test]
    fn test_hemisphere_samples_stay_above_surface() {
        let mut rng = PixelRng::seed_from_u64(3);
        let normal = Vec3::new(0.3, -0.8, 0.2).normalize();
        for _ in 0..1000 {
            let d = sample_hemisphere_cos(normal, rand2f(&mut rng));
            assert!((d.length() - 1.0).abs() < 1e-4);
            assert!(d.dot(normal) >= -1e-6);

            let d = sample_hemisphere_cospower(200.0, normal, rand2f(&mut rng));
            assert!(d.dot(normal) > 0.9);
        }
    }

    #[test]
    fn test_cosine_mean() {
        // E[cos] under a cosine-weighted distribution is 2/3
        let mut rng = PixelRng::seed_from_u64(11);
        let n = 20_000;
        let mean: f32 = (0..n)
            .map(|_| sample_hemisphere_cos(Vec3::Z, rand2f(&mut rng)).z)
            .sum::<f32>()
            / n as f32;
        assert!((mean - 2.0 / 3.0).abs() < 0.01);
    }

    #[test]
    fn test_reflect() {
        let n = Vec3::Y;
        let w = Vec3::new(1.0, 1.0, 0.0).normalize();
        let r = reflect(w, n);
        assert!((r - Vec3::new(-1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }

    #[test]
    fn test_refract() {
        // Normal incidence goes straight through
        let t = refract(Vec3::Y, Vec3::Y, 1.0 / 1.5);
        assert!((t - Vec3::NEG_Y).length() < 1e-6);

        // Snell's law at 45 degrees
        let w = Vec3::new(1.0, 1.0, 0.0).normalize();
        let t = refract(w, Vec3::Y, 1.0 / 1.5);
        let sin_t = t.x.abs();
        assert!((sin_t - (45f32.to_radians().sin() / 1.5)).abs() < 1e-5);
        assert!(t.y < 0.0);

        // Grazing exit from the dense side
        let w = Vec3::new(0.9, 0.1, 0.0).normalize();
        assert_eq!(refract(w, Vec3::Y, 1.5), Vec3::ZERO);
    }

    #[test]
    fn test_fresnel_schlick() {
        let f0 = Vec3::splat(0.04);
        let head_on = fresnel_schlick(f0, Vec3::Z, Vec3::Z);
        assert!((head_on - f0).length() < 1e-6);

        let grazing = fresnel_schlick(f0, Vec3::Z, Vec3::X);
        assert!((grazing - Vec3::ONE).length() < 1e-6);

        assert_eq!(fresnel_schlick(Vec3::ZERO, Vec3::Z, Vec3::X), Vec3::ZERO);
    }

    #[test]
    fn test_fresnel_dielectric() {
        // ((1 - 1.5) / (1 + 1.5))^2 at normal incidence
        let f = fresnel_dielectric(1.5, Vec3::Z, Vec3::Z);
        assert!((f - 0.04).abs() < 1e-5);

        // Total internal reflection inside glass at a grazing angle
        let w = Vec3::new(0.9, 0.0, 0.1).normalize();
        assert_eq!(fresnel_dielectric(1.0 / 1.5, Vec3::Z, w), 1.0);
    }

    #[test]
    fn test_orthonormalize() {
        let v = orthonormalize(Vec3::new(1.0, 1.0, 0.0), Vec3::X);
        assert!((v - Vec3::Y).length() < 1e-6);
    }

    #[test]
    fn test_roughness_exponent() {
        assert_eq!(roughness_exponent(1.0), 2.0);
        assert!((roughness_exponent(0.5) - 32.0).abs() < 1e-4);
    }
}
