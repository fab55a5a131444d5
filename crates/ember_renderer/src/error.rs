//! Error types for the renderer.

use ember_core::SceneError;
use thiserror::Error;

/// Invalid render setup, reported before any sampling begins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("unknown shader `{0}`")]
    UnknownShader(String),

    #[error("camera {index} does not exist, the scene has {count} cameras")]
    InvalidCamera { index: usize, count: usize },

    #[error("resolution must be at least one pixel")]
    InvalidResolution,

    #[error("preview ratio must be at least 1")]
    InvalidPreviewRatio,

    #[error("invalid scene: {0}")]
    InvalidScene(#[from] SceneError),
}

/// Destination image does not match the render state it is filled from.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeMismatchError {
    #[error("image should be {}x{}, got {}x{}", expected.0, expected.1, actual.0, actual.1)]
    Size {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("expected {} image", if *expected_linear { "linear" } else { "srgb" })]
    ColorSpace { expected_linear: bool },
}

/// Errors surfaced by the renderer API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    ShapeMismatch(#[from] ShapeMismatchError),

    #[error("a render task is still running; cancel it before starting another")]
    TaskInFlight,
}

pub type RenderResult<T> = Result<T, RenderError>;
