// MSDF fonts: atlas bitmap plus glyph metrics

use crate::assets::{AssetError, FontMetadata};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Placement of one character in the atlas and on screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlyphMetrics {
    /// Character code
    pub character: u32,
    /// Glyph box size in atlas pixels
    pub size: Vec2,
    /// Horizontal advance in em units
    pub advance: f32,
    /// Atlas bounds, normalized with the origin at the bottom-left
    pub tex_coordinate_min: Vec2,
    pub tex_coordinate_max: Vec2,
    /// Quad bounds in em units relative to the pen position on the baseline
    pub quad_min: Vec2,
    pub quad_max: Vec2,
}

/// An instantiated font ready for text layout
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    atlas: Vec<u8>,
    atlas_width: u32,
    atlas_height: u32,
    line_height: f32,
    glyphs: HashMap<char, GlyphMetrics>,
}

impl Font {
    /// Instantiate from a `.kgfont` intermediate (RGB8 rows, bottom-up)
    pub fn from_intermediate(bytes: Vec<u8>, metadata: &FontMetadata) -> Result<Self, AssetError> {
        let expected = metadata.atlas_width as usize * metadata.atlas_height as usize * 3;
        if bytes.len() != expected {
            return Err(AssetError::decode(
                "font intermediate",
                format!("expected {} bytes, got {}", expected, bytes.len()),
            ));
        }

        let glyphs = metadata
            .characters
            .iter()
            .filter_map(|g| char::from_u32(g.character).map(|c| (c, *g)))
            .collect();

        Ok(Self {
            atlas: bytes,
            atlas_width: metadata.atlas_width,
            atlas_height: metadata.atlas_height,
            line_height: metadata.line_height,
            glyphs,
        })
    }

    pub fn atlas(&self) -> &[u8] {
        &self.atlas
    }

    pub fn atlas_size(&self) -> (u32, u32) {
        (self.atlas_width, self.atlas_height)
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn glyph(&self, character: char) -> Option<&GlyphMetrics> {
        self.glyphs.get(&character)
    }

    /// Width of a single line of text in em units; unknown characters are skipped
    pub fn text_width(&self, text: &str) -> f32 {
        text.chars()
            .filter_map(|c| self.glyph(c))
            .map(|g| g.advance)
            .sum()
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}
