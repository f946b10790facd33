// Edge coloring: assigns channel masks so that corners stay sharp in the distance field

use super::shape::{EdgeColor, EdgeSegment, Segment, Shape};
use glam::DVec2;

/// Two consecutive edge directions form a corner when the turn exceeds the threshold
fn is_corner(a: DVec2, b: DVec2, cross_threshold: f64) -> bool {
    a.dot(b) <= 0.0 || a.perp_dot(b).abs() > cross_threshold
}

/// Maps an edge's position along a teardrop contour to -1, 0 or 1
fn symmetrical_trichotomy(position: usize, n: usize) -> i32 {
    (3.0 + 2.875 * position as f64 / (n as f64 - 1.0) - 1.4375 + 0.5) as i32 - 3
}

/// Move to a different two-channel color, never sharing a single channel with `banned`
fn switch_color(color: &mut EdgeColor, seed: &mut u64, banned: EdgeColor) {
    let combined = *color & banned;
    if combined == EdgeColor::RED || combined == EdgeColor::GREEN || combined == EdgeColor::BLUE {
        *color = combined ^ EdgeColor::WHITE;
        return;
    }
    if *color == EdgeColor::BLACK || *color == EdgeColor::WHITE {
        const START: [EdgeColor; 3] = [EdgeColor::CYAN, EdgeColor::MAGENTA, EdgeColor::YELLOW];
        *color = START[(*seed % 3) as usize];
        *seed /= 3;
        return;
    }
    let shifted = (color.0 as u32) << (1 + (*seed & 1));
    *color = EdgeColor(((shifted | shifted >> 3) & EdgeColor::WHITE.0 as u32) as u8);
    *seed >>= 1;
}

fn unit(direction: DVec2) -> DVec2 {
    direction.normalize_or_zero()
}

/// Rough arc length of a segment from a few chord samples
fn estimate_length(segment: &Segment) -> f64 {
    const SAMPLES: usize = 4;
    let mut previous = segment.point(0.0);
    let mut length = 0.0;
    for i in 1..=SAMPLES {
        let point = segment.point(i as f64 / SAMPLES as f64);
        length += (point - previous).length();
        previous = point;
    }
    length
}

/// A corner and the length of the spline that ends at it
struct Corner {
    index: usize,
    spline_before: f64,
    minor: bool,
    color: EdgeColor,
}

/// Color the edges of every contour in `shape`
///
/// Smooth contours get a single color. A contour with one corner is a teardrop and is
/// split three ways around the corner. Otherwise the color switches at every corner, and
/// the last spline avoids the first spline's color so the seam where they meet stays sharp.
///
/// Ink traps are handled on contours with more than three corners: a spline shorter than
/// both of its neighbours opens a minor corner. Minor corners do not advance the color
/// sequence; the short spline takes the two channels its neighbours do not share.
pub fn color_edges(shape: &mut Shape, angle_threshold: f64, mut seed: u64) {
    let cross_threshold = angle_threshold.sin();
    let mut color = EdgeColor::WHITE;
    switch_color(&mut color, &mut seed, EdgeColor::BLACK);

    for contour in &mut shape.contours {
        let edges = &mut contour.edges;
        let mut corners = Vec::new();
        let mut spline_length = 0.0;

        if let Some(last) = edges.last() {
            let mut previous = unit(last.segment.direction(1.0));
            for (index, edge) in edges.iter().enumerate() {
                if is_corner(previous, unit(edge.segment.direction(0.0)), cross_threshold) {
                    corners.push(Corner {
                        index,
                        spline_before: spline_length,
                        minor: false,
                        color: EdgeColor::BLACK,
                    });
                    spline_length = 0.0;
                }
                spline_length += estimate_length(&edge.segment);
                previous = unit(edge.segment.direction(1.0));
            }
        }

        match corners.len() {
            0 => {
                switch_color(&mut color, &mut seed, EdgeColor::BLACK);
                for edge in edges.iter_mut() {
                    edge.color = color;
                }
            }
            1 => {
                switch_color(&mut color, &mut seed, EdgeColor::BLACK);
                let first = color;
                switch_color(&mut color, &mut seed, EdgeColor::BLACK);
                let colors = [first, EdgeColor::WHITE, color];
                let corner = corners[0].index;
                let m = edges.len();

                if m >= 3 {
                    for i in 0..m {
                        let slot = 1 + symmetrical_trichotomy(i, m);
                        edges[(corner + i) % m].color = colors[slot as usize];
                    }
                } else {
                    // Too few edges to spread three colors, so split each into thirds
                    let mut pieces: Vec<EdgeSegment> = Vec::with_capacity(6);
                    let order: Vec<usize> = if m == 2 && corner == 1 {
                        vec![1, 0]
                    } else {
                        (0..m).collect()
                    };
                    for index in order {
                        for segment in edges[index].segment.split_in_thirds() {
                            pieces.push(EdgeSegment::new(segment));
                        }
                    }

                    let piece_colors: &[EdgeColor] = if m >= 2 {
                        &[colors[0], colors[0], colors[1], colors[1], colors[2], colors[2]]
                    } else {
                        &colors
                    };
                    for (piece, piece_color) in pieces.iter_mut().zip(piece_colors) {
                        piece.color = *piece_color;
                    }
                    *edges = pieces;
                }
            }
            corner_count => {
                let mut major_count = corner_count;
                if corner_count > 3 {
                    // The spline that wraps past the end of the edge list ends at corner 0
                    corners[0].spline_before += spline_length;
                    for i in 0..corner_count {
                        let before = corners[i].spline_before;
                        let short = corners[(i + 1) % corner_count].spline_before;
                        let after = corners[(i + 2) % corner_count].spline_before;
                        if before > short && short < after {
                            corners[i].minor = true;
                            major_count -= 1;
                        }
                    }
                }

                let mut initial = EdgeColor::BLACK;
                for corner in corners.iter_mut().filter(|c| !c.minor) {
                    major_count -= 1;
                    let banned = if major_count == 0 { initial } else { EdgeColor::BLACK };
                    switch_color(&mut color, &mut seed, banned);
                    corner.color = color;
                    if initial == EdgeColor::BLACK {
                        initial = color;
                    }
                }
                for i in 0..corner_count {
                    if corners[i].minor {
                        let next = corners[(i + 1) % corner_count].color;
                        corners[i].color = (color & next) ^ EdgeColor::WHITE;
                    } else {
                        color = corners[i].color;
                    }
                }

                let m = edges.len();
                let start = corners[0].index;
                let mut spline = 0;
                let mut current = corners[0].color;
                for i in 0..m {
                    let index = (start + i) % m;
                    if spline + 1 < corner_count && corners[spline + 1].index == index {
                        spline += 1;
                        current = corners[spline].color;
                    }
                    edges[index].color = current;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::font::shape::{Contour, Segment};

    fn square() -> Shape {
        Shape::from_polygons(&[vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(0.0, 1.0),
        ]])
    }

    fn shares_one_channel_at_most(a: EdgeColor, b: EdgeColor) -> bool {
        (a & b).0.count_ones() <= 1
    }

    #[test]
    fn test_corners_get_distinct_colors() {
        for seed in 0..8 {
            let mut shape = square();
            color_edges(&mut shape, 3.0, seed);

            let edges = &shape.contours[0].edges;
            for i in 0..edges.len() {
                let a = edges[i].color;
                let b = edges[(i + 1) % edges.len()].color;
                assert_ne!(a, b, "seed {}", seed);
                assert!(shares_one_channel_at_most(a, b));
                assert_eq!(a.0.count_ones(), 2);
            }
        }
    }

    #[test]
    fn test_smooth_contour_single_color() {
        // A polygon with gentle turns has no corners at a 3 radian threshold
        let points: Vec<DVec2> = (0..64)
            .map(|i| {
                let angle = i as f64 / 64.0 * std::f64::consts::TAU;
                DVec2::new(angle.cos(), angle.sin())
            })
            .collect();
        let mut shape = Shape::from_polygons(&[points]);
        color_edges(&mut shape, 3.0, 0);

        let first = shape.contours[0].edges[0].color;
        assert!(shape.contours[0].edges.iter().all(|e| e.color == first));
        assert_ne!(first, EdgeColor::WHITE);
    }

    #[test]
    fn test_teardrop_with_two_edges_is_split() {
        let tip = DVec2::new(0.0, 0.0);
        let mut shape = Shape {
            contours: vec![Contour {
                edges: vec![
                    EdgeSegment::new(Segment::Cubic([
                        tip,
                        DVec2::new(1.0, 1.0),
                        DVec2::new(1.0, 2.0),
                        DVec2::new(0.0, 2.0),
                    ])),
                    EdgeSegment::new(Segment::Cubic([
                        DVec2::new(0.0, 2.0),
                        DVec2::new(-1.0, 2.0),
                        DVec2::new(-1.0, 1.0),
                        tip,
                    ])),
                ],
            }],
        };
        color_edges(&mut shape, 3.0, 0);

        let edges = &shape.contours[0].edges;
        assert_eq!(edges.len(), 6);
        assert_eq!(edges[0].segment.start(), tip);
        assert_eq!(edges[5].segment.end(), tip);
        assert_ne!(edges[0].color, edges[5].color);
    }

    #[test]
    fn test_short_chamfer_is_minor_corner() {
        // The clipped top-right corner is far shorter than the edges on either side
        let chamfered = || {
            Shape::from_polygons(&[vec![
                DVec2::new(0.0, 0.0),
                DVec2::new(10.0, 0.0),
                DVec2::new(10.0, 9.5),
                DVec2::new(9.5, 10.0),
                DVec2::new(0.0, 10.0),
            ]])
        };

        for seed in 0..8 {
            let mut shape = chamfered();
            color_edges(&mut shape, 3.0, seed);

            let edges = &shape.contours[0].edges;
            assert_eq!(edges.len(), 5);
            let (side, chamfer, top) = (edges[1].color, edges[2].color, edges[3].color);
            assert_ne!(side, top, "seed {}", seed);
            assert_eq!(chamfer, (side & top) ^ EdgeColor::WHITE, "seed {}", seed);
            for i in 0..edges.len() {
                let a = edges[i].color;
                let b = edges[(i + 1) % edges.len()].color;
                assert_ne!(a, b, "seed {}", seed);
                assert_eq!(a.0.count_ones(), 2);
            }
        }
    }

    #[test]
    fn test_edge_length_estimate() {
        let line = Segment::Linear([DVec2::ZERO, DVec2::new(3.0, 4.0)]);
        assert!((estimate_length(&line) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_trichotomy() {
        assert_eq!(symmetrical_trichotomy(0, 5), -1);
        assert_eq!(symmetrical_trichotomy(2, 5), 0);
        assert_eq!(symmetrical_trichotomy(4, 5), 1);
    }
}
