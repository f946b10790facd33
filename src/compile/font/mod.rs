// Font intermediate compiler: MSDF atlas generation

mod coloring;
mod msdf;
mod shape;

pub use coloring::color_edges;
pub use msdf::{generate_msdf, DistanceField};
pub use shape::{Contour, EdgeColor, EdgeSegment, Segment, Shape, ShapeBuilder};

use crate::assets::{pack_tight, AssetError};
use crate::runtime::GlyphMetrics;
use glam::{DVec2, Vec2};
use log::debug;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Per-glyph coloring seeds are derived with this LCG
pub const LCG_MULTIPLIER: u64 = 6364136223846793005;
pub const LCG_INCREMENT: u64 = 1442695040888963407;

/// Parameters for atlas generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FontAtlasConfig {
    /// First character code in the charset
    pub charset_begin: u32,
    /// Last character code in the charset (inclusive)
    pub charset_end: u32,
    /// Atlas pixels per em
    pub em_size: f64,
    /// Width of the distance range in atlas pixels
    pub pixel_range: f64,
    /// Spacing between packed glyph boxes
    pub padding: u32,
    /// Turns sharper than this many radians are corners for edge coloring
    pub angle_threshold: f64,
    pub coloring_seed: u64,
    /// Defaults to half the available hardware threads
    pub worker_threads: Option<usize>,
}

impl Default for FontAtlasConfig {
    fn default() -> Self {
        Self {
            charset_begin: 0x20,
            charset_end: 0xFF,
            em_size: 40.0,
            pixel_range: 2.0,
            padding: 0,
            angle_threshold: 3.0,
            coloring_seed: 0,
            worker_threads: None,
        }
    }
}

impl FontAtlasConfig {
    pub fn worker_count(&self) -> usize {
        self.worker_threads
            .unwrap_or_else(|| {
                std::thread::available_parallelism()
                    .map(|n| n.get() / 2)
                    .unwrap_or(1)
            })
            .max(1)
    }
}

/// RGB8 atlas (rows bottom-up) plus its glyph table
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledFont {
    pub atlas: Vec<u8>,
    pub atlas_width: u32,
    pub atlas_height: u32,
    /// Line height in em units
    pub line_height: f32,
    pub glyphs: Vec<GlyphMetrics>,
}

/// Coloring seed for the glyph at `index`; a zero base seed keeps every glyph at zero
pub fn glyph_seed(seed: u64, index: u64) -> u64 {
    if seed == 0 {
        return 0;
    }
    LCG_MULTIPLIER
        .wrapping_mul(seed ^ index)
        .wrapping_add(LCG_INCREMENT)
}

/// Glyph box in atlas pixels and the em-to-box offset
#[derive(Debug, Clone, Copy)]
struct GlyphBox {
    width: u32,
    height: u32,
    translate: DVec2,
}

struct PendingGlyph {
    code: u32,
    advance: f64,
    shape: Shape,
    layout: Option<GlyphBox>,
}

fn glyph_box(shape: &Shape, scale: f64, pixel_range: f64) -> Option<GlyphBox> {
    let (min, max) = shape.bounds()?;
    let margin = DVec2::splat(pixel_range / 2.0 / scale);
    let (min, max) = (min - margin, max + margin);
    let size = max - min;

    let width = (size.x * scale).ceil().max(1.0) as u32;
    let height = (size.y * scale).ceil().max(1.0) as u32;

    // Center the outline inside the rounded-up box
    let slack = DVec2::new(width as f64, height as f64) / scale - size;
    Some(GlyphBox {
        width,
        height,
        translate: slack / 2.0 - min,
    })
}

/// Generate an atlas from a font file on disk
pub fn compile_file<P: AsRef<Path>>(
    path: P,
    config: &FontAtlasConfig,
) -> Result<CompiledFont, AssetError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|e| AssetError::decode(path, e))?;
    compile_font(&data, &path.display().to_string(), config)
}

/// Generate an atlas from font data held in memory
pub fn compile_font(
    data: &[u8],
    label: &str,
    config: &FontAtlasConfig,
) -> Result<CompiledFont, AssetError> {
    let face = ttf_parser::Face::parse(data, 0).map_err(|e| AssetError::decode(label, e))?;
    let units_per_em = face.units_per_em() as f64;
    let line_height =
        (face.ascender() as f64 - face.descender() as f64 + face.line_gap() as f64) / units_per_em;
    let scale = config.em_size;

    let mut glyphs = Vec::new();
    for code in config.charset_begin..=config.charset_end {
        let Some(character) = char::from_u32(code) else {
            continue;
        };
        let Some(glyph_id) = face.glyph_index(character) else {
            continue;
        };

        let mut builder = ShapeBuilder::new(units_per_em);
        face.outline_glyph(glyph_id, &mut builder);
        let shape = builder.finish();
        let layout = glyph_box(&shape, scale, config.pixel_range);

        glyphs.push(PendingGlyph {
            code,
            advance: face.glyph_hor_advance(glyph_id).unwrap_or(0) as f64 / units_per_em,
            shape,
            layout,
        });
    }

    if glyphs.is_empty() {
        return Err(AssetError::FontAtlas(format!(
            "{} has no glyphs in {:#x}..={:#x}",
            label, config.charset_begin, config.charset_end
        )));
    }

    let boxes: Vec<(u32, u32, u32)> = glyphs
        .iter()
        .enumerate()
        .filter_map(|(i, glyph)| glyph.layout.map(|b| (i as u32, b.width, b.height)))
        .collect();
    let (atlas_width, atlas_height, regions) = pack_tight(&boxes, config.padding);

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.worker_count())
        .build()
        .map_err(|e| AssetError::FontAtlas(e.to_string()))?;

    let bitmaps: Vec<Option<Vec<u8>>> = pool.install(|| {
        glyphs
            .par_iter()
            .enumerate()
            .map(|(i, glyph)| {
                glyph.layout.map(|layout| {
                    let mut shape = glyph.shape.clone();
                    color_edges(
                        &mut shape,
                        config.angle_threshold,
                        glyph_seed(config.coloring_seed, i as u64),
                    );
                    generate_msdf(
                        &shape,
                        layout.width,
                        layout.height,
                        scale,
                        layout.translate,
                        config.pixel_range,
                    )
                })
            })
            .collect()
    });

    let mut atlas = vec![0u8; atlas_width as usize * atlas_height as usize * 3];
    let mut placed = HashMap::new();
    for region in regions {
        if let Some(Some(bitmap)) = bitmaps.get(region.id as usize) {
            let row_bytes = region.width as usize * 3;
            for row in 0..region.height as usize {
                let dst = ((region.y as usize + row) * atlas_width as usize + region.x as usize) * 3;
                atlas[dst..dst + row_bytes]
                    .copy_from_slice(&bitmap[row * row_bytes..(row + 1) * row_bytes]);
            }
        }
        placed.insert(region.id, region);
    }

    let metrics = glyphs
        .iter()
        .enumerate()
        .map(|(i, glyph)| {
            let mut metrics = GlyphMetrics {
                character: glyph.code,
                advance: glyph.advance as f32,
                ..Default::default()
            };
            if let (Some(layout), Some(region)) = (glyph.layout, placed.get(&(i as u32))) {
                let quad_min = -layout.translate;
                let quad_max =
                    DVec2::new(layout.width as f64, layout.height as f64) / scale - layout.translate;
                metrics.size = Vec2::new(layout.width as f32, layout.height as f32);
                metrics.tex_coordinate_min = region.uv_min;
                metrics.tex_coordinate_max = region.uv_max;
                metrics.quad_min = quad_min.as_vec2();
                metrics.quad_max = quad_max.as_vec2();
            }
            metrics
        })
        .collect();

    debug!(
        "Generated {}x{} atlas with {} glyphs for {}",
        atlas_width,
        atlas_height,
        glyphs.len(),
        label
    );

    Ok(CompiledFont {
        atlas,
        atlas_width,
        atlas_height,
        line_height: line_height as f32,
        glyphs: metrics,
    })
}
