//! Render parameters and shader selection.

use std::fmt;
use std::str::FromStr;

use ember_core::{Camera, Scene};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigurationError;

/// The closed set of shading variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ShaderKind {
    /// Physical path tracer over every material model
    #[default]
    PathTrace,
    /// Path tracer that treats every surface as diffuse
    MatteOnly,
    /// Headlight preview, single bounce
    Eyelight,
    /// Shading normals mapped to colors
    NormalDebug,
    /// Texture coordinates mapped to colors
    TexcoordDebug,
    /// Unlit material color
    FlatColor,
}

impl ShaderKind {
    pub const ALL: [ShaderKind; 6] = [
        ShaderKind::PathTrace,
        ShaderKind::MatteOnly,
        ShaderKind::Eyelight,
        ShaderKind::NormalDebug,
        ShaderKind::TexcoordDebug,
        ShaderKind::FlatColor,
    ];

    /// Canonical snake-case name.
    pub fn name(self) -> &'static str {
        match self {
            ShaderKind::PathTrace => "path_trace",
            ShaderKind::MatteOnly => "matte_only",
            ShaderKind::Eyelight => "eyelight",
            ShaderKind::NormalDebug => "normal_debug",
            ShaderKind::TexcoordDebug => "texcoord_debug",
            ShaderKind::FlatColor => "flat_color",
        }
    }
}

impl fmt::Display for ShaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ShaderKind {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "path_trace" | "raytrace" => Ok(ShaderKind::PathTrace),
            "matte_only" | "matte" => Ok(ShaderKind::MatteOnly),
            "eyelight" => Ok(ShaderKind::Eyelight),
            "normal_debug" | "normal" => Ok(ShaderKind::NormalDebug),
            "texcoord_debug" | "texcoord" => Ok(ShaderKind::TexcoordDebug),
            "flat_color" | "color" => Ok(ShaderKind::FlatColor),
            other => Err(ConfigurationError::UnknownShader(other.to_string())),
        }
    }
}

impl Serialize for ShaderKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ShaderKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

/// Settings for one render. Immutable for the lifetime of a render state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderParams {
    /// Index into `Scene::cameras`
    pub camera: usize,
    /// Long edge of the image in pixels
    pub resolution: u32,
    pub shader: ShaderKind,
    /// Target sample count per pixel
    pub samples: u32,
    /// Maximum path depth
    pub bounces: u32,
    /// Basis for the per-pixel random streams
    pub seed: u64,
    /// Trace pixels on the rayon pool instead of in scanline order
    pub parallel: bool,
    /// Downscale factor of the preview pass
    pub pratio: u32,
}

impl Default for RenderParams {
    fn default() -> Self {
        Self {
            camera: 0,
            resolution: 720,
            shader: ShaderKind::PathTrace,
            samples: 512,
            bounces: 4,
            seed: 0,
            parallel: true,
            pratio: 8,
        }
    }
}

impl RenderParams {
    /// The camera these parameters render through.
    pub fn camera<'a>(&self, scene: &'a Scene) -> Result<&'a Camera, ConfigurationError> {
        scene
            .cameras
            .get(self.camera)
            .ok_or(ConfigurationError::InvalidCamera {
                index: self.camera,
                count: scene.cameras.len(),
            })
    }

    /// Check the parameters against a scene.
    pub fn validate(&self, scene: &Scene) -> Result<(), ConfigurationError> {
        self.camera(scene)?;
        if self.resolution == 0 {
            return Err(ConfigurationError::InvalidResolution);
        }
        if self.pratio == 0 {
            return Err(ConfigurationError::InvalidPreviewRatio);
        }
        scene.validate()?;
        Ok(())
    }
}
