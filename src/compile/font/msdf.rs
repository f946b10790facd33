// Multi-channel signed distance field generation for a colored shape

use super::shape::{EdgeColor, Shape};
use crate::core::math::{clamp, median};
use glam::DVec2;

/// Polyline resolution used for curved edges
const CURVE_STEPS: usize = 16;

/// Distances closer than this are treated as ties and resolved by orthogonality
const TIE_EPSILON: f64 = 1e-12;

/// An edge flattened into a polyline, keeping its color
struct FlatEdge {
    points: Vec<DVec2>,
    color: EdgeColor,
}

#[derive(Debug, Clone, Copy)]
struct EdgeDistance {
    /// Unsigned true distance to the edge
    distance: f64,
    /// |cos| of the angle between the edge and the offset to it, lower is more orthogonal
    orthogonality: f64,
    /// Signed distance, extended past the edge's endpoints along its tangents
    pseudo: f64,
}

impl EdgeDistance {
    fn closer_than(&self, other: &EdgeDistance) -> bool {
        self.distance < other.distance - TIE_EPSILON
            || ((self.distance - other.distance).abs() <= TIE_EPSILON
                && self.orthogonality < other.orthogonality)
    }
}

fn edge_distance(points: &[DVec2], p: DVec2) -> EdgeDistance {
    let mut best = EdgeDistance {
        distance: f64::MAX,
        orthogonality: f64::MAX,
        pseudo: 0.0,
    };
    let mut best_segment = 0;
    let mut best_t = 0.0;

    for (i, pair) in points.windows(2).enumerate() {
        let a = pair[0];
        let ab = pair[1] - a;
        let length_sq = ab.length_squared();
        if length_sq == 0.0 {
            continue;
        }

        let t = clamp((p - a).dot(ab) / length_sq, 0.0, 1.0);
        let offset = p - (a + ab * t);
        let distance = offset.length();
        let orthogonality = if distance > 0.0 {
            (ab.dot(offset) / (length_sq.sqrt() * distance)).abs()
        } else {
            0.0
        };

        let candidate = EdgeDistance {
            distance,
            orthogonality,
            pseudo: if ab.perp_dot(p - a) >= 0.0 {
                distance
            } else {
                -distance
            },
        };
        if candidate.closer_than(&best) {
            best = candidate;
            best_segment = i;
            best_t = t;
        }
    }

    let last_segment = points.len().saturating_sub(2);
    if best_segment == 0 && best_t <= 0.0 {
        let direction = (points[1] - points[0]).normalize_or_zero();
        let offset = p - points[0];
        if offset.dot(direction) < 0.0 {
            let pseudo = direction.perp_dot(offset);
            if pseudo.abs() <= best.distance {
                best.pseudo = pseudo;
            }
        }
    }
    if best_segment == last_segment && best_t >= 1.0 {
        let end = points[points.len() - 1];
        let direction = (end - points[points.len() - 2]).normalize_or_zero();
        let offset = p - end;
        if offset.dot(direction) > 0.0 {
            let pseudo = direction.perp_dot(offset);
            if pseudo.abs() <= best.distance {
                best.pseudo = pseudo;
            }
        }
    }

    best
}

/// A shape prepared for per-pixel distance queries
pub struct DistanceField {
    edges: Vec<FlatEdge>,
    contours: Vec<Vec<DVec2>>,
    /// +1 when the outline winds counter-clockwise overall, -1 otherwise
    orientation: f64,
}

impl DistanceField {
    pub fn new(shape: &Shape) -> Self {
        let mut edges = Vec::new();
        let mut contours = Vec::new();

        for contour in &shape.contours {
            let mut outline: Vec<DVec2> = Vec::new();
            for edge in &contour.edges {
                let points = edge.segment.flatten(CURVE_STEPS);
                outline.extend(points.iter().skip(usize::from(!outline.is_empty())));
                edges.push(FlatEdge {
                    points,
                    color: edge.color,
                });
            }
            if outline.len() >= 2 {
                contours.push(outline);
            }
        }

        let area: f64 = contours
            .iter()
            .map(|outline| {
                (0..outline.len())
                    .map(|i| outline[i].perp_dot(outline[(i + 1) % outline.len()]))
                    .sum::<f64>()
            })
            .sum();

        Self {
            edges,
            contours,
            orientation: if area >= 0.0 { 1.0 } else { -1.0 },
        }
    }

    /// Signed per-channel distances at `p` in shape units, positive inside
    pub fn sample(&self, p: DVec2) -> [f64; 3] {
        let mut best: [Option<EdgeDistance>; 3] = [None; 3];

        for edge in &self.edges {
            let distance = edge_distance(&edge.points, p);
            for (channel, slot) in best.iter_mut().enumerate() {
                if !edge.color.has_channel(channel) {
                    continue;
                }
                if slot.map_or(true, |current| distance.closer_than(&current)) {
                    *slot = Some(distance);
                }
            }
        }

        best.map(|slot| slot.map_or(-f64::MAX, |d| d.pseudo * self.orientation))
    }

    /// Nonzero winding number of the outline around `p`
    pub fn winding(&self, p: DVec2) -> i32 {
        let mut winding = 0;
        for outline in &self.contours {
            for i in 0..outline.len() {
                let a = outline[i];
                let b = outline[(i + 1) % outline.len()];
                let side = (b - a).perp_dot(p - a);
                if a.y <= p.y {
                    if b.y > p.y && side > 0.0 {
                        winding += 1;
                    }
                } else if b.y <= p.y && side < 0.0 {
                    winding -= 1;
                }
            }
        }
        winding
    }
}

fn encode(distance_px: f64, pixel_range: f64) -> u8 {
    (clamp(distance_px / pixel_range + 0.5, 0.0, 1.0) * 255.0).round() as u8
}

/// Render an RGB8 MSDF bitmap, row 0 at the bottom
///
/// Pixel `(x, y)` samples the shape at `(x + 0.5, y + 0.5) / scale - translate`.
pub fn generate_msdf(
    shape: &Shape,
    width: u32,
    height: u32,
    scale: f64,
    translate: DVec2,
    pixel_range: f64,
) -> Vec<u8> {
    let field = DistanceField::new(shape);
    let mut pixels = vec![0u8; width as usize * height as usize * 3];

    for y in 0..height {
        for x in 0..width {
            let p = DVec2::new(x as f64 + 0.5, y as f64 + 0.5) / scale - translate;
            let mut distances = field.sample(p);

            // Correct pixels whose median disagrees with the fill rule
            let inside = field.winding(p) != 0;
            let m = median(distances[0], distances[1], distances[2]);
            if m != 0.0 && (m > 0.0) != inside {
                distances = distances.map(|d| -d);
            }

            let index = (y as usize * width as usize + x as usize) * 3;
            for (channel, distance) in distances.iter().enumerate() {
                pixels[index + channel] = encode(distance * scale, pixel_range);
            }
        }
    }

    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::font::coloring::color_edges;

    fn pixel_median(pixels: &[u8], width: u32, x: u32, y: u32) -> u8 {
        let i = ((y * width + x) * 3) as usize;
        let (r, g, b) = (pixels[i], pixels[i + 1], pixels[i + 2]);
        r.min(g).max(r.max(g).min(b))
    }

    fn square(min: f64, max: f64, clockwise: bool) -> Vec<DVec2> {
        let mut points = vec![
            DVec2::new(min, min),
            DVec2::new(max, min),
            DVec2::new(max, max),
            DVec2::new(min, max),
        ];
        if clockwise {
            points.reverse();
        }
        points
    }

    #[test]
    fn test_square_inside_and_outside() {
        for clockwise in [false, true] {
            let mut shape = Shape::from_polygons(&[square(0.25, 0.75, clockwise)]);
            color_edges(&mut shape, 3.0, 0);
            let pixels = generate_msdf(&shape, 40, 40, 40.0, DVec2::ZERO, 2.0);

            assert!(pixel_median(&pixels, 40, 20, 20) > 127, "center, cw={}", clockwise);
            assert!(pixel_median(&pixels, 40, 0, 0) < 127, "corner, cw={}", clockwise);
            assert!(pixel_median(&pixels, 40, 39, 20) < 127, "right, cw={}", clockwise);
        }
    }

    #[test]
    fn test_ring_hole_is_outside() {
        let mut shape =
            Shape::from_polygons(&[square(0.1, 0.9, false), square(0.4, 0.6, true)]);
        color_edges(&mut shape, 3.0, 0);
        let pixels = generate_msdf(&shape, 40, 40, 40.0, DVec2::ZERO, 2.0);

        assert!(pixel_median(&pixels, 40, 20, 20) < 127, "hole");
        assert!(pixel_median(&pixels, 40, 10, 20) > 127, "ring body");
    }

    #[test]
    fn test_edge_is_half_intensity() {
        let mut shape = Shape::from_polygons(&[square(0.25, 0.75, false)]);
        color_edges(&mut shape, 3.0, 0);
        let field = DistanceField::new(&shape);

        let on_edge = field.sample(DVec2::new(0.5, 0.25));
        let m = median(on_edge[0], on_edge[1], on_edge[2]);
        assert!(m.abs() < 1e-9);
        assert_eq!(encode(0.0, 2.0), 128);
    }

    #[test]
    fn test_winding() {
        let shape = Shape::from_polygons(&[square(0.0, 1.0, false)]);
        let field = DistanceField::new(&shape);
        assert_eq!(field.winding(DVec2::new(0.5, 0.5)), 1);
        assert_eq!(field.winding(DVec2::new(1.5, 0.5)), 0);
    }
}
