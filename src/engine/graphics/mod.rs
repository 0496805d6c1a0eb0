pub mod mesh;
pub mod obj;
pub mod renderer;
pub mod texture;

pub use mesh::{CpuMesh, CpuVertex, MeshFactory};
pub use renderer::{FrameContext, Renderer};
pub use texture::TextureData;

/// Renderer-owned mesh resource, looked up by handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub u32);

/// Renderer-owned texture resource, looked up by handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);
