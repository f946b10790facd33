// CPU-side texture data ready for upload

use crate::assets::{AssetError, TextureMetadata};
use crate::compile::texture::DecodedTexture;

/// A decoded texture held in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture2D {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl Texture2D {
    /// Create a texture from raw pixels, checking the buffer matches the dimensions
    pub fn from_raw(pixels: Vec<u8>, width: u32, height: u32, channels: u8) -> Result<Self, AssetError> {
        if !(1..=4).contains(&channels) {
            return Err(AssetError::decode(
                "texture data",
                format!("unsupported channel count {}", channels),
            ));
        }
        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(AssetError::decode(
                "texture data",
                format!("expected {} bytes, got {}", expected, pixels.len()),
            ));
        }

        Ok(Self {
            pixels,
            width,
            height,
            channels,
        })
    }

    /// Instantiate from a `.kgtexture` intermediate
    pub fn from_intermediate(bytes: Vec<u8>, metadata: &TextureMetadata) -> Result<Self, AssetError> {
        Self::from_raw(bytes, metadata.width, metadata.height, metadata.channels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Channels of the pixel at `(x, y)`, with `y = 0` the top row
    pub fn pixel(&self, x: u32, y: u32) -> Option<&[u8]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let stride = self.channels as usize;
        let start = (y as usize * self.width as usize + x as usize) * stride;
        self.pixels.get(start..start + stride)
    }

    /// Expand to RGBA8 for GPU upload
    pub fn to_rgba8(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.width as usize * self.height as usize * 4);
        for px in self.pixels.chunks_exact(self.channels as usize) {
            match *px {
                [l] => rgba.extend_from_slice(&[l, l, l, 255]),
                [l, a] => rgba.extend_from_slice(&[l, l, l, a]),
                [r, g, b] => rgba.extend_from_slice(&[r, g, b, 255]),
                [r, g, b, a] => rgba.extend_from_slice(&[r, g, b, a]),
                _ => {}
            }
        }
        rgba
    }
}

impl From<DecodedTexture> for Texture2D {
    fn from(decoded: DecodedTexture) -> Self {
        Self {
            pixels: decoded.pixels,
            width: decoded.width,
            height: decoded.height,
            channels: decoded.channels,
        }
    }
}
