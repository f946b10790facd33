// Texture intermediate compiler: full image decode to raw pixels

use crate::assets::AssetError;
use image::DynamicImage;
use std::path::Path;

/// Raw 8-bit pixels at the source's native channel count, top row first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTexture {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
}

/// Decode an image file from disk
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<DecodedTexture, AssetError> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|e| AssetError::decode(path, e))?;
    Ok(from_image(image))
}

fn from_image(image: DynamicImage) -> DecodedTexture {
    let width = image.width();
    let height = image.height();

    // Wider sample formats are narrowed to 8 bits per channel
    let (pixels, channels) = match image.color().channel_count() {
        1 => (image.into_luma8().into_raw(), 1),
        2 => (image.into_luma_alpha8().into_raw(), 2),
        3 => (image.into_rgb8().into_raw(), 3),
        _ => (image.into_rgba8().into_raw(), 4),
    };

    DecodedTexture {
        pixels,
        width,
        height,
        channels,
    }
}
