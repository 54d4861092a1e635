//! APT Renderer - spherical-camera path tracing on the CPU.
//!
//! A Monte Carlo path tracer built around three pieces:
//! - [`Scene`] stores triangles, materials and media by index and runs the
//!   bounce loop for a single ray.
//! - [`SphericalCamera`] casts one ray per pixel and sub-pixel on an evenly
//!   spaced angular grid and folds each pass into an [`Image`].
//! - [`RandomGenerator`] gives every pixel its own persistent random stream,
//!   so passes run in parallel with rayon and stay reproducible.
//!
//! Materials, media, skyboxes and images are traits; [`Diffuse`],
//! [`NonAbsorber`], [`SkyboxFlat`], [`SkyboxGradient`] and
//! [`AccumulationImage`] are the implementations shipped here.

mod camera;
mod config;
mod error;
mod image_buffer;
mod material;
mod medium;
mod medium_list;
mod random;
mod ray;
mod scene;
mod shape;
mod skybox;
mod triangle;

pub use camera::SphericalCamera;
pub use config::RenderConfig;
pub use error::{RenderError, Result};
pub use image_buffer::{AccumulationImage, Image};
pub use material::{Color, Diffuse, Material};
pub use medium::{Medium, NonAbsorber};
pub use medium_list::{MediumList, MAX_MEDIUMS};
pub use random::{gen_f64, RandomGenerator};
pub use ray::Ray;
pub use scene::{trace, Scene};
pub use shape::{Intersection, Shape};
pub use skybox::{Skybox, SkyboxFlat, SkyboxGradient};
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from apt_math
pub use apt_math::{Aabb, Interval, TransformMatrix, Vec3};
