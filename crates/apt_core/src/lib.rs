//! APT Core - renderer-agnostic geometry for the APT path tracer.
//!
//! This crate provides [`MeshGeometry`], the shape every mesh loader produces:
//! flat arrays of nodes, normals and texture coordinates plus per-triangle
//! index triples into them. File parsing itself lives outside this workspace;
//! loaders feed faces through [`MeshGeometry::add_face`] and call
//! [`MeshGeometry::finish`] to fill whatever the file left out.
//!
//! # Example
//!
//! ```
//! use apt_core::{FaceVertex, MeshGeometry};
//! use apt_math::Vec3;
//!
//! let mut mesh = MeshGeometry::new();
//! mesh.add_node(Vec3::new(0.0, 0.0, 0.0));
//! mesh.add_node(Vec3::new(1.0, 0.0, 0.0));
//! mesh.add_node(Vec3::new(1.0, 1.0, 0.0));
//! mesh.add_node(Vec3::new(0.0, 1.0, 0.0));
//!
//! // A quad is split into two triangles.
//! let quad = [0, 1, 2, 3].map(FaceVertex::node);
//! mesh.add_face(&quad, "floor")?;
//! mesh.finish();
//!
//! assert_eq!(mesh.triangle_count(), 2);
//! # Ok::<(), apt_core::MeshError>(())
//! ```

pub mod error;
pub mod mesh;

pub use error::{MeshError, Result};
pub use mesh::{FaceVertex, MeshGeometry, MeshTriangle};
