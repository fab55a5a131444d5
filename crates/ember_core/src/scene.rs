//! Scene model for Ember.
//!
//! A scene is a set of flat arrays (cameras, shapes, instances, materials,
//! environments, textures) that refer to each other by index. The renderer
//! only reads scenes; `Scene::validate` checks every cross reference once so
//! evaluation can index directly.

use std::f32::consts::PI;

use ember_math::{Affine3A, FrameExt, Vec2, Vec3, Vec4};
use thiserror::Error;

use crate::shape::Shape;
use crate::texture::Texture;

/// Errors found while validating a scene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    #[error("{owner} refers to {kind} {index}, but the scene has {len}")]
    InvalidReference {
        kind: &'static str,
        index: usize,
        owner: String,
        len: usize,
    },

    #[error("shape {index} has no elements")]
    EmptyShape { index: usize },

    #[error("shape {index} mixes element kinds")]
    MixedElements { index: usize },
}

pub type SceneResult<T> = Result<T, SceneError>;

/// Pinhole camera.
///
/// The camera looks down the local -Z axis of `frame`. `film` is the width of
/// the sensor for landscape aspects (the height for portrait ones) and `lens`
/// the distance from the pinhole to the film, both in meters.
#[derive(Clone, Debug)]
pub struct Camera {
    pub frame: Affine3A,
    pub lens: f32,
    pub film: f32,
    pub aspect: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            frame: Affine3A::IDENTITY,
            lens: 0.050,
            film: 0.036,
            aspect: 16.0 / 9.0,
        }
    }
}

impl Camera {
    /// Camera at `from` looking at `to`.
    pub fn look_at(from: Vec3, to: Vec3, up: Vec3) -> Self {
        Self {
            frame: Affine3A::look_at(from, to, up),
            ..Default::default()
        }
    }

    /// Set the aspect ratio (width / height).
    pub fn with_aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Set lens and film sizes.
    pub fn with_lens(mut self, lens: f32, film: f32) -> Self {
        self.lens = lens;
        self.film = film;
        self
    }
}

/// Closed set of material models understood by the path tracer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MaterialKind {
    #[default]
    Matte,
    Reflective,
    Transparent,
    Glossy,
    Refractive,
    /// Shaded as matte; there is no participating-media model.
    Volumetric,
}

/// Surface material.
#[derive(Clone, Debug)]
pub struct Material {
    pub kind: MaterialKind,

    /// Emitted radiance
    pub emission: Vec3,

    /// Base color (albedo, reflectance at normal incidence for metals)
    pub color: Vec3,

    /// Roughness (0=smooth, 1=rough)
    pub roughness: f32,

    /// Opacity (0=transparent, 1=opaque)
    pub opacity: f32,

    /// Index of refraction for refractive materials
    pub ior: f32,

    pub emission_tex: Option<usize>,
    pub color_tex: Option<usize>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            kind: MaterialKind::Matte,
            emission: Vec3::ZERO,
            color: Vec3::ZERO,
            roughness: 0.0,
            opacity: 1.0,
            ior: 1.5,
            emission_tex: None,
            color_tex: None,
        }
    }
}

impl Material {
    /// Create a new material of the given kind and base color.
    pub fn new(kind: MaterialKind, color: Vec3) -> Self {
        Self {
            kind,
            color,
            ..Default::default()
        }
    }

    /// Diffuse material.
    pub fn matte(color: Vec3) -> Self {
        Self::new(MaterialKind::Matte, color)
    }

    /// Black diffuse surface that only emits.
    pub fn emissive(emission: Vec3) -> Self {
        Self {
            emission,
            ..Default::default()
        }
    }

    /// Builder method to set roughness.
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    /// Builder method to set opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Builder method to set the index of refraction.
    pub fn with_ior(mut self, ior: f32) -> Self {
        self.ior = ior;
        self
    }

    /// Builder method to set emission.
    pub fn with_emission(mut self, emission: Vec3) -> Self {
        self.emission = emission;
        self
    }

    /// Builder method to set the color texture.
    pub fn with_color_texture(mut self, texture: usize) -> Self {
        self.color_tex = Some(texture);
        self
    }

    /// Check if this material is emissive.
    pub fn is_emissive(&self) -> bool {
        self.emission.length_squared() > 0.0
    }
}

/// A shape placed in the world with a material.
#[derive(Clone, Debug)]
pub struct Instance {
    pub frame: Affine3A,
    pub shape: usize,
    pub material: usize,
}

impl Instance {
    pub fn new(shape: usize, material: usize) -> Self {
        Self {
            frame: Affine3A::IDENTITY,
            shape,
            material,
        }
    }

    /// Builder method to set the instance frame.
    pub fn with_frame(mut self, frame: Affine3A) -> Self {
        self.frame = frame;
        self
    }
}

/// Infinitely distant light surrounding the scene.
#[derive(Clone, Debug)]
pub struct Environment {
    pub frame: Affine3A,
    pub emission: Vec3,
    pub emission_tex: Option<usize>,
}

impl Environment {
    /// Constant-color environment.
    pub fn constant(emission: Vec3) -> Self {
        Self {
            frame: Affine3A::IDENTITY,
            emission,
            emission_tex: None,
        }
    }

    /// Builder method to set the emission texture (latitude-longitude map).
    pub fn with_texture(mut self, texture: usize) -> Self {
        self.emission_tex = Some(texture);
        self
    }
}

/// A complete scene.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub cameras: Vec<Camera>,
    pub shapes: Vec<Shape>,
    pub instances: Vec<Instance>,
    pub materials: Vec<Material>,
    pub environments: Vec<Environment>,
    pub textures: Vec<Texture>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_camera(&mut self, camera: Camera) -> usize {
        self.cameras.push(camera);
        self.cameras.len() - 1
    }

    pub fn add_shape(&mut self, shape: Shape) -> usize {
        self.shapes.push(shape);
        self.shapes.len() - 1
    }

    pub fn add_material(&mut self, material: Material) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn add_instance(&mut self, instance: Instance) -> usize {
        self.instances.push(instance);
        self.instances.len() - 1
    }

    pub fn add_environment(&mut self, environment: Environment) -> usize {
        self.environments.push(environment);
        self.environments.len() - 1
    }

    pub fn add_texture(&mut self, texture: Texture) -> usize {
        self.textures.push(texture);
        self.textures.len() - 1
    }

    /// Check that every index referenced by instances, materials and
    /// environments is in range and that shapes are well formed.
    pub fn validate(&self) -> SceneResult<()> {
        let check = |kind: &'static str, index: usize, len: usize, owner: &dyn Fn() -> String| {
            if index < len {
                Ok(())
            } else {
                Err(SceneError::InvalidReference {
                    kind,
                    index,
                    owner: owner(),
                    len,
                })
            }
        };

        for (i, shape) in self.shapes.iter().enumerate() {
            match shape.kind_count() {
                0 => return Err(SceneError::EmptyShape { index: i }),
                1 => {}
                _ => return Err(SceneError::MixedElements { index: i }),
            }
            for v in shape.element_indices() {
                check("vertex", v, shape.positions.len(), &|| format!("shape {i}"))?;
            }
            let attributes = [
                ("normal", shape.normals.len()),
                ("texcoord", shape.texcoords.len()),
                ("radius", shape.radius.len()),
            ];
            for (kind, len) in attributes {
                if len != 0 {
                    check(kind, shape.positions.len() - 1, len, &|| format!("shape {i}"))?;
                }
            }
        }
        for (i, instance) in self.instances.iter().enumerate() {
            let owner = || format!("instance {i}");
            check("shape", instance.shape, self.shapes.len(), &owner)?;
            check("material", instance.material, self.materials.len(), &owner)?;
        }
        for (i, material) in self.materials.iter().enumerate() {
            let owner = || format!("material {i}");
            for tex in [material.emission_tex, material.color_tex].into_iter().flatten() {
                check("texture", tex, self.textures.len(), &owner)?;
            }
        }
        for (i, environment) in self.environments.iter().enumerate() {
            if let Some(tex) = environment.emission_tex {
                check("texture", tex, self.textures.len(), &|| format!("environment {i}"))?;
            }
        }
        Ok(())
    }

    /// World-space position on an instance element.
    pub fn eval_position(&self, instance: usize, element: usize, uv: Vec2) -> Vec3 {
        let instance = &self.instances[instance];
        let shape = &self.shapes[instance.shape];
        instance
            .frame
            .transform_point3(shape.eval_position(element, uv))
    }

    /// World-space shading normal on an instance element.
    pub fn eval_normal(&self, instance: usize, element: usize, uv: Vec2) -> Vec3 {
        let instance = &self.instances[instance];
        let shape = &self.shapes[instance.shape];
        instance
            .frame
            .transform_normal(shape.eval_normal(element, uv))
    }

    /// Texture coordinates on an instance element.
    pub fn eval_texcoord(&self, instance: usize, element: usize, uv: Vec2) -> Vec2 {
        let instance = &self.instances[instance];
        self.shapes[instance.shape].eval_texcoord(element, uv)
    }

    /// Texture lookup; a missing texture evaluates to white.
    pub fn eval_texture(&self, texture: Option<usize>, uv: Vec2, as_linear: bool) -> Vec4 {
        match texture {
            Some(id) => self.textures[id].eval(uv, as_linear),
            None => Vec4::ONE,
        }
    }

    /// Emission of one environment along a world-space direction.
    pub fn eval_environment_light(&self, environment: &Environment, direction: Vec3) -> Vec3 {
        let Some(tex) = environment.emission_tex else {
            return environment.emission;
        };
        let local = environment
            .frame
            .inverse()
            .transform_vector3(direction)
            .normalize_or_zero();
        let uv = Vec2::new(
            local.z.atan2(local.x) / (2.0 * PI),
            local.y.clamp(-1.0, 1.0).acos() / PI,
        );
        environment.emission * self.eval_texture(Some(tex), uv, true).truncate()
    }

    /// Summed emission of every environment along a world-space direction.
    pub fn eval_environment(&self, direction: Vec3) -> Vec3 {
        self.environments
            .iter()
            .map(|environment| self.eval_environment_light(environment, direction))
            .sum()
    }
}
