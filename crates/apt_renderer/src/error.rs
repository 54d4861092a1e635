//! Error types for rendering.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid render config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("camera medium list is empty")]
    EmptyMediumList,

    #[error("medium list refers to medium {index} but the scene has {len} media")]
    MediumOutOfRange { index: usize, len: usize },

    #[error("shape {shape} refers to material {index} but the scene has {len} materials")]
    MaterialOutOfRange {
        shape: usize,
        index: usize,
        len: usize,
    },

    #[error("sub-pixel grid {subpix:?} has a zero dimension")]
    InvalidSubpix { subpix: [u32; 2] },

    #[error("random generator has {actual} streams, image needs {expected}")]
    GeneratorSizeMismatch { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, RenderError>;
