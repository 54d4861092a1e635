//! APT math - vectors, transformation matrices and bounding volumes.
//!
//! Everything is double precision. `Vec3` is glam's `DVec3` and is used
//! interchangeably as a point, a direction or an RGB colour.

// Re-export glam for convenience
pub use glam::{DMat4 as Mat4, DVec3 as Vec3, DVec4 as Vec4};

mod aabb;
mod interval;
mod transform;
mod vector;

pub use aabb::Aabb;
pub use interval::Interval;
pub use transform::TransformMatrix;
pub use vector::Vec3Ext;
