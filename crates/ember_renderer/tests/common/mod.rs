//! Scenes shared by the integration tests.

#![allow(dead_code)]

use ember_core::{Camera, Environment, Instance, Material, Scene, Shape};
use ember_math::{Affine3A, Quat, Vec3};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Square camera at the origin looking down -Z.
pub fn camera() -> Camera {
    Camera::default().with_aspect(1.0)
}

/// Only a constant sky.
pub fn sky(emission: Vec3) -> Scene {
    let mut scene = Scene::new();
    scene.add_camera(camera());
    scene.add_environment(Environment::constant(emission));
    scene
}

/// An emissive quad filling the view, no environment.
pub fn emissive_quad(emission: Vec3) -> Scene {
    let mut scene = Scene::new();
    scene.add_camera(camera());
    let shape = scene.add_shape(Shape::quad());
    let material = scene.add_material(Material::emissive(emission));
    scene.add_instance(Instance::new(shape, material).with_frame(
        Affine3A::from_scale_rotation_translation(
            Vec3::splat(10.0),
            Quat::IDENTITY,
            Vec3::new(0.0, 0.0, -2.0),
        ),
    ));
    scene
}

/// A diffuse faceted sphere in front of the camera under a constant sky.
pub fn matte_sphere(albedo: Vec3, sky: Vec3) -> Scene {
    let mut scene = Scene::new();
    scene.add_camera(camera());
    let mut sphere = Shape::sphere(16);
    // Flat facets keep the surface convex for shading
    sphere.normals.clear();
    let shape = scene.add_shape(sphere);
    let material = scene.add_material(Material::matte(albedo));
    scene.add_instance(
        Instance::new(shape, material).with_frame(Affine3A::from_scale_rotation_translation(
            Vec3::splat(0.5),
            Quat::IDENTITY,
            Vec3::new(0.0, 0.0, -3.0),
        )),
    );
    scene.add_environment(Environment::constant(sky));
    scene
}

/// A diffuse sphere resting on a diffuse floor under a constant sky.
pub fn sphere_on_floor() -> Scene {
    let mut scene = matte_sphere(Vec3::new(0.8, 0.5, 0.3), Vec3::ONE);
    let floor = scene.add_shape(Shape::quad());
    let material = scene.add_material(Material::matte(Vec3::splat(0.7)));
    scene.add_instance(Instance::new(floor, material).with_frame(
        Affine3A::from_scale_rotation_translation(
            Vec3::splat(20.0),
            Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
            Vec3::new(0.0, -0.5, -3.0),
        ),
    ));
    scene
}

/// The camera sits inside a closed diffuse sphere, so every path runs to
/// the bounce limit. Used to make passes slow.
pub fn closed_room() -> Scene {
    let mut scene = Scene::new();
    scene.add_camera(camera());
    let shape = scene.add_shape(Shape::sphere(32));
    let material = scene.add_material(
        Material::matte(Vec3::splat(0.9)).with_emission(Vec3::splat(0.1)),
    );
    scene.add_instance(
        Instance::new(shape, material).with_frame(Affine3A::from_scale(Vec3::splat(5.0))),
    );
    scene
}
