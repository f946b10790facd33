// Glyph outlines as colored edge contours

use crate::core::math::mix;
use glam::DVec2;
use std::ops::{BitAnd, BitOr, BitXor};

/// Channel mask of an edge: bit 0 red, bit 1 green, bit 2 blue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdgeColor(pub u8);

impl EdgeColor {
    pub const BLACK: EdgeColor = EdgeColor(0);
    pub const RED: EdgeColor = EdgeColor(1);
    pub const GREEN: EdgeColor = EdgeColor(2);
    pub const YELLOW: EdgeColor = EdgeColor(3);
    pub const BLUE: EdgeColor = EdgeColor(4);
    pub const MAGENTA: EdgeColor = EdgeColor(5);
    pub const CYAN: EdgeColor = EdgeColor(6);
    pub const WHITE: EdgeColor = EdgeColor(7);

    /// Whether this edge contributes to channel 0 (red), 1 (green) or 2 (blue)
    pub fn has_channel(&self, channel: usize) -> bool {
        self.0 & (1 << channel) != 0
    }
}

impl BitAnd for EdgeColor {
    type Output = EdgeColor;
    fn bitand(self, rhs: Self) -> Self {
        EdgeColor(self.0 & rhs.0)
    }
}

impl BitOr for EdgeColor {
    type Output = EdgeColor;
    fn bitor(self, rhs: Self) -> Self {
        EdgeColor(self.0 | rhs.0)
    }
}

impl BitXor for EdgeColor {
    type Output = EdgeColor;
    fn bitxor(self, rhs: Self) -> Self {
        EdgeColor(self.0 ^ rhs.0)
    }
}

/// Curve geometry of an edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Linear([DVec2; 2]),
    Quadratic([DVec2; 3]),
    Cubic([DVec2; 4]),
}

impl Segment {
    /// Point at parameter `t` in [0, 1]
    pub fn point(&self, t: f64) -> DVec2 {
        match self {
            Segment::Linear(p) => mix(p[0], p[1], t),
            Segment::Quadratic(p) => mix(mix(p[0], p[1], t), mix(p[1], p[2], t), t),
            Segment::Cubic(p) => {
                let p12 = mix(p[1], p[2], t);
                mix(
                    mix(mix(p[0], p[1], t), p12, t),
                    mix(p12, mix(p[2], p[3], t), t),
                    t,
                )
            }
        }
    }

    /// Tangent direction at parameter `t`, falling back to the chord for degenerate controls
    pub fn direction(&self, t: f64) -> DVec2 {
        match self {
            Segment::Linear(p) => p[1] - p[0],
            Segment::Quadratic(p) => {
                let tangent = mix(p[1] - p[0], p[2] - p[1], t);
                if tangent == DVec2::ZERO {
                    p[2] - p[0]
                } else {
                    tangent
                }
            }
            Segment::Cubic(p) => {
                let tangent = mix(
                    mix(p[1] - p[0], p[2] - p[1], t),
                    mix(p[2] - p[1], p[3] - p[2], t),
                    t,
                );
                if tangent != DVec2::ZERO {
                    tangent
                } else if t <= 0.0 {
                    p[2] - p[0]
                } else if t >= 1.0 {
                    p[3] - p[1]
                } else {
                    p[3] - p[0]
                }
            }
        }
    }

    pub fn start(&self) -> DVec2 {
        match self {
            Segment::Linear(p) => p[0],
            Segment::Quadratic(p) => p[0],
            Segment::Cubic(p) => p[0],
        }
    }

    pub fn end(&self) -> DVec2 {
        match self {
            Segment::Linear(p) => p[1],
            Segment::Quadratic(p) => p[2],
            Segment::Cubic(p) => p[3],
        }
    }

    /// Split into three pieces at t = 1/3 and t = 2/3
    pub fn split_in_thirds(&self) -> [Segment; 3] {
        match *self {
            Segment::Linear(p) => {
                let a = self.point(1.0 / 3.0);
                let b = self.point(2.0 / 3.0);
                [
                    Segment::Linear([p[0], a]),
                    Segment::Linear([a, b]),
                    Segment::Linear([b, p[1]]),
                ]
            }
            Segment::Quadratic(p) => {
                let a = self.point(1.0 / 3.0);
                let b = self.point(2.0 / 3.0);
                [
                    Segment::Quadratic([p[0], mix(p[0], p[1], 1.0 / 3.0), a]),
                    Segment::Quadratic([
                        a,
                        mix(
                            mix(p[0], p[1], 5.0 / 9.0),
                            mix(p[1], p[2], 4.0 / 9.0),
                            0.5,
                        ),
                        b,
                    ]),
                    Segment::Quadratic([b, mix(p[1], p[2], 2.0 / 3.0), p[2]]),
                ]
            }
            Segment::Cubic(_) => {
                let (first, rest) = self.split_at(1.0 / 3.0);
                let (second, third) = rest.split_at(0.5);
                [first, second, third]
            }
        }
    }

    /// De Casteljau subdivision at `t`
    fn split_at(&self, t: f64) -> (Segment, Segment) {
        match *self {
            Segment::Linear(p) => {
                let m = mix(p[0], p[1], t);
                (Segment::Linear([p[0], m]), Segment::Linear([m, p[1]]))
            }
            Segment::Quadratic(p) => {
                let a = mix(p[0], p[1], t);
                let b = mix(p[1], p[2], t);
                let m = mix(a, b, t);
                (
                    Segment::Quadratic([p[0], a, m]),
                    Segment::Quadratic([m, b, p[2]]),
                )
            }
            Segment::Cubic(p) => {
                let a = mix(p[0], p[1], t);
                let b = mix(p[1], p[2], t);
                let c = mix(p[2], p[3], t);
                let ab = mix(a, b, t);
                let bc = mix(b, c, t);
                let m = mix(ab, bc, t);
                (
                    Segment::Cubic([p[0], a, ab, m]),
                    Segment::Cubic([m, bc, c, p[3]]),
                )
            }
        }
    }

    /// Sample the segment into a polyline including both endpoints
    pub fn flatten(&self, steps: usize) -> Vec<DVec2> {
        match self {
            Segment::Linear(p) => p.to_vec(),
            _ => (0..=steps)
                .map(|i| self.point(i as f64 / steps as f64))
                .collect(),
        }
    }

    fn bounds(&self, min: &mut DVec2, max: &mut DVec2) {
        for point in self.flatten(16) {
            *min = min.min(point);
            *max = max.max(point);
        }
    }
}

/// A colored edge of a contour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSegment {
    pub segment: Segment,
    pub color: EdgeColor,
}

impl EdgeSegment {
    pub fn new(segment: Segment) -> Self {
        Self {
            segment,
            color: EdgeColor::WHITE,
        }
    }
}

/// A closed loop of edges
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contour {
    pub edges: Vec<EdgeSegment>,
}

/// A glyph outline
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shape {
    pub contours: Vec<Contour>,
}

impl Shape {
    /// Build a shape from closed polygons (used for synthetic outlines)
    pub fn from_polygons(polygons: &[Vec<DVec2>]) -> Self {
        let contours = polygons
            .iter()
            .map(|points| Contour {
                edges: (0..points.len())
                    .map(|i| {
                        EdgeSegment::new(Segment::Linear([
                            points[i],
                            points[(i + 1) % points.len()],
                        ]))
                    })
                    .collect(),
            })
            .collect();
        Self { contours }
    }

    pub fn is_empty(&self) -> bool {
        self.contours.iter().all(|c| c.edges.is_empty())
    }

    /// Axis-aligned bounds of the outline, or None for an empty shape
    pub fn bounds(&self) -> Option<(DVec2, DVec2)> {
        if self.is_empty() {
            return None;
        }
        let mut min = DVec2::splat(f64::MAX);
        let mut max = DVec2::splat(f64::MIN);
        for contour in &self.contours {
            for edge in &contour.edges {
                edge.segment.bounds(&mut min, &mut max);
            }
        }
        Some((min, max))
    }
}

/// Collects a font outline into a [`Shape`], scaling font units to em units
pub struct ShapeBuilder {
    scale: f64,
    shape: Shape,
    current: Vec<EdgeSegment>,
    start: DVec2,
    last: DVec2,
}

impl ShapeBuilder {
    pub fn new(units_per_em: f64) -> Self {
        Self {
            scale: 1.0 / units_per_em,
            shape: Shape::default(),
            current: Vec::new(),
            start: DVec2::ZERO,
            last: DVec2::ZERO,
        }
    }

    pub fn finish(mut self) -> Shape {
        self.close_contour();
        self.shape
    }

    fn point(&self, x: f32, y: f32) -> DVec2 {
        DVec2::new(x as f64, y as f64) * self.scale
    }

    fn push(&mut self, segment: Segment, end: DVec2) {
        if end != self.last || !matches!(segment, Segment::Linear(_)) {
            self.current.push(EdgeSegment::new(segment));
        }
        self.last = end;
    }

    fn close_contour(&mut self) {
        if self.current.is_empty() {
            return;
        }
        if self.last != self.start {
            self.current
                .push(EdgeSegment::new(Segment::Linear([self.last, self.start])));
        }
        self.shape.contours.push(Contour {
            edges: std::mem::take(&mut self.current),
        });
        self.last = self.start;
    }
}

impl ttf_parser::OutlineBuilder for ShapeBuilder {
    fn move_to(&mut self, x: f32, y: f32) {
        self.close_contour();
        self.start = self.point(x, y);
        self.last = self.start;
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let end = self.point(x, y);
        self.push(Segment::Linear([self.last, end]), end);
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let end = self.point(x, y);
        self.push(Segment::Quadratic([self.last, self.point(x1, y1), end]), end);
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let end = self.point(x, y);
        self.push(
            Segment::Cubic([self.last, self.point(x1, y1), self.point(x2, y2), end]),
            end,
        );
    }

    fn close(&mut self) {
        self.close_contour();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ttf_parser::OutlineBuilder;

    #[test]
    fn test_split_in_thirds_is_continuous() {
        let segments = [
            Segment::Linear([DVec2::new(0.0, 0.0), DVec2::new(3.0, 3.0)]),
            Segment::Quadratic([DVec2::new(0.0, 0.0), DVec2::new(1.0, 2.0), DVec2::new(2.0, 0.0)]),
            Segment::Cubic([
                DVec2::new(0.0, 0.0),
                DVec2::new(0.0, 1.0),
                DVec2::new(1.0, 1.0),
                DVec2::new(1.0, 0.0),
            ]),
        ];

        for segment in segments {
            let parts = segment.split_in_thirds();
            assert_eq!(parts[0].start(), segment.start());
            assert_eq!(parts[2].end(), segment.end());
            for (k, part) in parts.iter().enumerate() {
                let t = k as f64 / 3.0;
                let expected = segment.point(t + 1.0 / 6.0);
                let actual = part.point(0.5);
                assert_relative_eq!(actual.x, expected.x, epsilon = 1e-9);
                assert_relative_eq!(actual.y, expected.y, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_builder_closes_contours() {
        let mut builder = ShapeBuilder::new(1024.0);
        builder.move_to(0.0, 0.0);
        builder.line_to(1024.0, 0.0);
        builder.line_to(1024.0, 1024.0);
        builder.close();

        let shape = builder.finish();
        assert_eq!(shape.contours.len(), 1);
        assert_eq!(shape.contours[0].edges.len(), 3);

        let (min, max) = shape.bounds().unwrap();
        assert_eq!(min, DVec2::ZERO);
        assert_eq!(max, DVec2::ONE);
    }

    #[test]
    fn test_edge_color_channels() {
        assert!(EdgeColor::CYAN.has_channel(1));
        assert!(EdgeColor::CYAN.has_channel(2));
        assert!(!EdgeColor::CYAN.has_channel(0));
        assert_eq!(EdgeColor::CYAN ^ EdgeColor::WHITE, EdgeColor::RED);
    }
}
