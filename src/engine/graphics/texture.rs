//! Texture file decoding.

use std::path::Path;

use log::info;

use crate::engine::EngineResult;

/// Decoded image, tightly packed RGBA8.
#[derive(Debug, Clone)]
pub struct TextureData {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode an image file to RGBA8, flipped vertically so the first row is
/// the bottom of the image — the UV origin the mesh data assumes.
pub fn load_rgba8(path: impl AsRef<Path>) -> EngineResult<TextureData> {
    let path = path.as_ref();

    let image = image::open(path)?.flipv().into_rgba8();
    let (width, height) = image.dimensions();

    info!("loaded {}: {}x{}", path.display(), width, height);

    Ok(TextureData {
        rgba: image.into_raw(),
        width,
        height,
    })
}
