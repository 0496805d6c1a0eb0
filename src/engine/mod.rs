pub mod camera;
pub mod cli;
pub mod graphics;
pub mod math;
pub mod scene;
pub mod transform;
pub mod ui;
pub mod windowing;

use thiserror::Error;

/// Engine-level error type.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("mesh load failed ({path}): {message}")]
    MeshLoad { path: String, message: String },

    #[error("window error: {0}")]
    Window(String),

    #[error("renderer error: {0}")]
    Renderer(String),
}

pub type EngineResult<T> = Result<T, EngineError>;
