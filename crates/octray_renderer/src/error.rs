//! Error types for scene construction, rendering and image output.

use thiserror::Error;

/// Errors raised while building geometry or the scene partition.
#[derive(Debug, Error)]
pub enum SceneError {
    /// A primitive overlapped none of the partition cells. This points at a
    /// bounds bug and is never silently ignored.
    #[error("primitive {index} was not assigned to any partition cell")]
    UnassignedPrimitive { index: usize },

    #[error("split depth {depth} exceeds the maximum of {max}")]
    SplitDepthTooLarge { depth: u32, max: u32 },

    #[error("plane corners {corner_a:?} and {corner_b:?} do not share exactly one coordinate")]
    DegeneratePlane { corner_a: [f64; 3], corner_b: [f64; 3] },

    #[error("invalid shape: {0}")]
    InvalidShape(String),
}

/// Errors raised by the renderer itself.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid render configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("cannot merge a {found_width}x{found_height} buffer into a {width}x{height} image")]
    BufferMismatch {
        width: u32,
        height: u32,
        found_width: u32,
        found_height: u32,
    },
}

/// Errors raised while encoding or writing an image.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("pixel buffer does not match {width}x{height}")]
    BufferSize { width: u32, height: u32 },
}
