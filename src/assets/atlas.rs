// Glyph atlas packing

use glam::Vec2;

/// A region within a packed atlas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AtlasRegion {
    /// Caller-supplied identifier (glyph index, character code, ...)
    pub id: u32,

    /// Position in the atlas (pixels, origin at the first row)
    pub x: u32,
    pub y: u32,

    /// Size of the region (pixels)
    pub width: u32,
    pub height: u32,

    /// UV coordinates (0.0 to 1.0)
    pub uv_min: Vec2,
    pub uv_max: Vec2,
}

impl AtlasRegion {
    /// Create a new atlas region with calculated UV coordinates
    pub fn new(
        id: u32,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        atlas_width: u32,
        atlas_height: u32,
    ) -> Self {
        let uv_min = Vec2::new(
            x as f32 / atlas_width as f32,
            y as f32 / atlas_height as f32,
        );
        let uv_max = Vec2::new(
            (x + width) as f32 / atlas_width as f32,
            (y + height) as f32 / atlas_height as f32,
        );

        Self {
            id,
            x,
            y,
            width,
            height,
            uv_min,
            uv_max,
        }
    }
}

/// Row-based packer for a fixed-width atlas
pub struct AtlasBuilder {
    width: u32,
    height: u32,
    padding: u32,
    current_x: u32,
    current_y: u32,
    row_height: u32,
    used_width: u32,
    placed: Vec<(u32, u32, u32, u32, u32)>,
}

impl AtlasBuilder {
    /// Create a new atlas builder
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            padding: 0,
            current_x: 0,
            current_y: 0,
            row_height: 0,
            used_width: 0,
            placed: Vec::new(),
        }
    }

    /// Set the spacing between regions
    pub fn with_padding(mut self, padding: u32) -> Self {
        self.padding = padding;
        self
    }

    /// Place a region, returning its position or None if it doesn't fit
    pub fn add_region(&mut self, id: u32, width: u32, height: u32) -> Option<(u32, u32)> {
        if width > self.width {
            return None;
        }

        // Check if region fits in current row
        if self.current_x + width > self.width {
            // Move to next row
            self.current_x = 0;
            self.current_y += self.row_height + self.padding;
            self.row_height = 0;
        }

        // Check if region fits in atlas at all
        if self.current_y + height > self.height {
            return None;
        }

        let position = (self.current_x, self.current_y);
        self.placed.push((id, position.0, position.1, width, height));

        // Update position
        self.current_x += width + self.padding;
        self.row_height = self.row_height.max(height);
        self.used_width = self.used_width.max(position.0 + width);

        Some(position)
    }

    /// Extent actually covered by placed regions
    pub fn used_extent(&self) -> (u32, u32) {
        (self.used_width, self.current_y + self.row_height)
    }

    /// Build the final regions, trimming the atlas to its used extent
    pub fn build(self) -> (u32, u32, Vec<AtlasRegion>) {
        let (width, height) = self.used_extent();
        let (width, height) = (width.max(1), height.max(1));

        let regions = self
            .placed
            .into_iter()
            .map(|(id, x, y, w, h)| AtlasRegion::new(id, x, y, w, h, width, height))
            .collect();

        (width, height, regions)
    }
}

/// Pack `(id, width, height)` boxes into the smallest square-ish atlas the row packer finds
///
/// Boxes are placed tallest first. The side length starts at the square root of the total
/// area and grows until everything fits, then the atlas is trimmed to the used extent.
pub fn pack_tight(boxes: &[(u32, u32, u32)], padding: u32) -> (u32, u32, Vec<AtlasRegion>) {
    let mut order: Vec<(u32, u32, u32)> = boxes.to_vec();
    order.sort_by(|a, b| b.2.cmp(&a.2).then(b.1.cmp(&a.1)).then(a.0.cmp(&b.0)));

    let area: u64 = order
        .iter()
        .map(|&(_, w, h)| (w + padding) as u64 * (h + padding) as u64)
        .sum();
    let widest = order.iter().map(|&(_, w, _)| w).max().unwrap_or(0);
    let mut side = ((area as f64).sqrt().ceil() as u32).max(widest).max(1);

    loop {
        let mut builder = AtlasBuilder::new(side, side).with_padding(padding);
        let fits = order
            .iter()
            .all(|&(id, w, h)| builder.add_region(id, w, h).is_some());

        if fits {
            return builder.build();
        }
        side += (side / 32).max(1);
    }
}
