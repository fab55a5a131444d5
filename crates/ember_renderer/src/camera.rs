//! Camera ray generation.

use ember_core::Camera;
use ember_math::{Ray, Vec2, Vec3};

/// Image size for a camera at the given long-edge resolution.
///
/// Landscape cameras keep `resolution` as the width, portrait cameras as the
/// height; the short edge is rounded to the nearest pixel.
pub fn image_size(camera: &Camera, resolution: u32) -> (usize, usize) {
    let resolution = resolution.max(1) as f32;
    let (width, height) = if camera.aspect >= 1.0 {
        (resolution, (resolution / camera.aspect).round())
    } else {
        ((resolution * camera.aspect).round(), resolution)
    };
    ((width as usize).max(1), (height as usize).max(1))
}

/// Generate the world-space ray through image-plane coordinate `uv`.
///
/// `uv` spans `[0,1]²` with `(0,0)` at the top-left of the image. The film is
/// `camera.film` wide along the long edge, matching `image_size`, so a pixel
/// lands on the same physical film location for either orientation.
pub fn eval_camera(camera: &Camera, uv: Vec2) -> Ray {
    let film = if camera.aspect >= 1.0 {
        Vec2::new(camera.film, camera.film / camera.aspect)
    } else {
        Vec2::new(camera.film * camera.aspect, camera.film)
    };
    let local = Vec3::new(
        (0.5 - uv.x) * film.x,
        (uv.y - 0.5) * film.y,
        camera.lens,
    );
    let q = camera.frame.transform_point3(local);
    let e = Vec3::from(camera.frame.translation);
    Ray::new(e, (e - q).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_math::Affine3A;

    #[test]
    fn test_image_size() {
        let landscape = Camera::default().with_aspect(16.0 / 9.0);
        assert_eq!(image_size(&landscape, 720), (720, 405));

        let portrait = Camera::default().with_aspect(0.5);
        assert_eq!(image_size(&portrait, 100), (50, 100));

        let square = Camera::default().with_aspect(1.0);
        assert_eq!(image_size(&square, 1), (1, 1));
    }

    #[test]
    fn test_center_ray_looks_down_minus_z() {
        let camera = Camera::default();
        let ray = eval_camera(&camera, Vec2::splat(0.5));
        assert_eq!(ray.origin, Vec3::ZERO);
        assert!((ray.direction - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-6);
    }

    #[test]
    fn test_image_corners() {
        let camera = Camera::default().with_aspect(2.0);

        // Top-left of the image points up and to the left
        let ray = eval_camera(&camera, Vec2::ZERO);
        assert!(ray.direction.x < 0.0 && ray.direction.y > 0.0);

        // Bottom-right points down and to the right
        let ray = eval_camera(&camera, Vec2::ONE);
        assert!(ray.direction.x > 0.0 && ray.direction.y < 0.0);

        // Half-film over lens gives the horizontal field of view
        let expected = (camera.film * 0.5 / camera.lens).atan();
        let ray = eval_camera(&camera, Vec2::new(1.0, 0.5));
        let angle = ray.direction.x.atan2(-ray.direction.z);
        assert!((angle - expected).abs() < 1e-5);
    }

    #[test]
    fn test_camera_frame() {
        let camera = Camera {
            frame: Affine3A::from_translation(Vec3::new(1.0, 2.0, 3.0)),
            ..Default::default()
        };
        let ray = eval_camera(&camera, Vec2::splat(0.5));
        assert_eq!(ray.origin, Vec3::new(1.0, 2.0, 3.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);

        let camera = Camera::look_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);
        let ray = eval_camera(&camera, Vec2::splat(0.5));
        assert!((ray.direction - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }
}
