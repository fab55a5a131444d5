//! Built-in demo scene.

use std::f32::consts::FRAC_PI_2;

use ember_core::{Camera, Environment, Instance, Material, MaterialKind, Scene, Shape, Texture};
use ember_math::{Affine3A, Quat, Vec3, Vec4};

/// A row of spheres, one per material model, on a checkered floor under a
/// soft sky, plus an emissive panel and a thin line.
pub fn demo_scene() -> Scene {
    let mut scene = Scene::new();
    scene.add_camera(Camera::look_at(
        Vec3::new(0.0, 1.2, 6.0),
        Vec3::new(0.0, 0.4, 0.0),
        Vec3::Y,
    ));

    let checker = scene.add_texture(Texture::checker(
        512,
        16,
        Vec4::new(0.7, 0.7, 0.7, 1.0),
        Vec4::new(0.3, 0.3, 0.3, 1.0),
    ));
    let floor_shape = scene.add_shape(Shape::quad());
    let floor = scene.add_material(Material::matte(Vec3::ONE).with_color_texture(checker));
    scene.add_instance(Instance::new(floor_shape, floor).with_frame(
        Affine3A::from_scale_rotation_translation(
            Vec3::splat(8.0),
            Quat::from_rotation_x(-FRAC_PI_2),
            Vec3::ZERO,
        ),
    ));

    let materials = [
        Material::matte(Vec3::new(0.7, 0.2, 0.2)),
        Material::new(MaterialKind::Glossy, Vec3::new(0.2, 0.5, 0.8)).with_roughness(0.3),
        Material::new(MaterialKind::Reflective, Vec3::new(0.9, 0.7, 0.4)).with_roughness(0.2),
        Material::new(MaterialKind::Reflective, Vec3::splat(0.9)),
        Material::new(MaterialKind::Refractive, Vec3::ONE).with_ior(1.5),
        Material::new(MaterialKind::Transparent, Vec3::new(0.6, 0.9, 0.6)),
        Material::matte(Vec3::new(0.9, 0.9, 0.2)).with_opacity(0.5),
    ];
    let sphere = scene.add_shape(Shape::sphere(64));
    let spacing = 0.9;
    let offset = (materials.len() - 1) as f32 * spacing / 2.0;
    for (i, material) in materials.into_iter().enumerate() {
        let material = scene.add_material(material);
        let center = Vec3::new(i as f32 * spacing - offset, 0.4, 0.0);
        scene.add_instance(Instance::new(sphere, material).with_frame(
            Affine3A::from_scale_rotation_translation(Vec3::splat(0.4), Quat::IDENTITY, center),
        ));
    }

    let panel_shape = scene.add_shape(Shape::quad());
    let panel = scene.add_material(Material::emissive(Vec3::splat(6.0)));
    scene.add_instance(Instance::new(panel_shape, panel).with_frame(
        Affine3A::from_scale_rotation_translation(
            Vec3::new(1.5, 0.5, 1.0),
            Quat::from_rotation_x(FRAC_PI_2),
            Vec3::new(0.0, 3.5, 1.0),
        ),
    ));

    let line_shape = scene.add_shape(Shape::line(
        Vec3::new(-3.0, 0.05, 1.2),
        Vec3::new(3.0, 0.05, 1.2),
        0.02,
    ));
    let line = scene.add_material(Material::matte(Vec3::new(0.1, 0.1, 0.8)));
    scene.add_instance(Instance::new(line_shape, line));

    scene.add_environment(Environment::constant(Vec3::new(0.5, 0.6, 0.8)));
    scene
}
