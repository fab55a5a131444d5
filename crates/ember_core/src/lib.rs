//! Ember Core - Scene model and scene services for the Ember path tracer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `Camera`, `Shape`, `Instance`, `Material`,
//!   `Environment`, `Texture`
//! - **Scene evaluation**: position/normal/texcoord interpolation, texture
//!   lookups and environment emission
//! - **Intersection**: the `Intersector` contract and `SceneBvh`, a
//!   bounding volume hierarchy over every instanced element
//!
//! # Example
//!
//! ```ignore
//! use ember_core::{Scene, SceneBvh, Intersector};
//!
//! let scene = build_scene();
//! scene.validate()?;
//! let bvh = SceneBvh::build(&scene);
//! if let Some(hit) = bvh.intersect(&ray) {
//!     let normal = scene.eval_normal(hit.instance, hit.element, hit.uv);
//! }
//! ```

pub mod bvh;
pub mod intersect;
pub mod primitive;
pub mod scene;
pub mod shape;
pub mod texture;

// Re-export commonly used types
pub use bvh::SceneBvh;
pub use intersect::{Intersection, Intersector};
pub use scene::{Camera, Environment, Instance, Material, MaterialKind, Scene, SceneError};
pub use shape::{ElementKind, Shape};
pub use texture::{rgb_to_srgb, srgb_to_rgb, Texture};
