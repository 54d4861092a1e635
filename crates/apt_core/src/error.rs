//! Error types for mesh construction.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("face has {0} vertices, at least 3 are needed")]
    DegenerateFace(usize),

    #[error("face references node {index} but the mesh has {len} nodes")]
    NodeOutOfRange { index: usize, len: usize },

    #[error("face references normal {index} but the mesh has {len} normals")]
    NormalOutOfRange { index: usize, len: usize },

    #[error("face references texture coordinate {index} but the mesh has {len} texture coordinates")]
    TextureCoordinateOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, MeshError>;
