//! Polygon geometry for entity shapes
//!
//! Shapes are simple polygons (not necessarily convex) stored in local space
//! around the entity origin. Headings are in degrees, screen space (y down).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::rotate_degrees;

/// Areas below this are treated as degenerate
const MIN_AREA: f32 = 1e-4;

/// A simple polygon in local space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub vertices: Vec<Vec2>,
}

impl Shape {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    /// Build from flat `x, y` pairs
    pub fn from_coords(coords: &[f32]) -> Self {
        Self::new(
            coords
                .chunks_exact(2)
                .map(|c| Vec2::new(c[0], c[1]))
                .collect(),
        )
    }

    /// Scale every vertex about the local origin
    pub fn scaled(mut self, factor: f32) -> Self {
        for v in &mut self.vertices {
            *v *= factor;
        }
        self
    }

    /// Transform to world space: rotate by heading, then translate
    pub fn to_world(&self, position: Vec2, heading: f32) -> Vec<Vec2> {
        self.vertices
            .iter()
            .map(|&v| rotate_degrees(v, heading) + position)
            .collect()
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Bounding box of a point set (empty input gives an inverted box)
    pub fn from_points(points: &[Vec2]) -> Self {
        points.iter().fold(
            Aabb {
                min: Vec2::splat(f32::INFINITY),
                max: Vec2::splat(f32::NEG_INFINITY),
            },
            |acc, &p| Aabb {
                min: acc.min.min(p),
                max: acc.max.max(p),
            },
        )
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }
}

/// Signed area (shoelace)
pub fn signed_area(points: &[Vec2]) -> f32 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f32 = (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum();
    twice * 0.5
}

/// A polygon with fewer than three vertices or no area can never overlap anything
pub fn is_degenerate(points: &[Vec2]) -> bool {
    points.len() < 3 || signed_area(points).abs() < MIN_AREA
}

#[inline]
fn orientation(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (b - a).perp_dot(c - a)
}

#[inline]
fn on_segment(a: Vec2, b: Vec2, p: Vec2) -> bool {
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// Closed segment intersection (touching counts)
pub fn segments_intersect(p1: Vec2, p2: Vec2, q1: Vec2, q2: Vec2) -> bool {
    let d1 = orientation(q1, q2, p1);
    let d2 = orientation(q1, q2, p2);
    let d3 = orientation(p1, p2, q1);
    let d4 = orientation(p1, p2, q2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(q1, q2, p1))
        || (d2 == 0.0 && on_segment(q1, q2, p2))
        || (d3 == 0.0 && on_segment(p1, p2, q1))
        || (d4 == 0.0 && on_segment(p1, p2, q2))
}

/// Even-odd point in polygon test
pub fn point_in_polygon(point: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    let mut inside = false;
    let mut j = n.wrapping_sub(1);
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if (a.y > point.y) != (b.y > point.y) {
            let x_cross = (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x;
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

fn edges(polygon: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[i], polygon[(i + 1) % n]))
}

/// Exact overlap test for two simple polygons in world space.
///
/// Two polygons overlap when any pair of edges intersects, or when no edges
/// cross and one polygon lies entirely inside the other.
pub fn polygons_overlap(a: &[Vec2], b: &[Vec2]) -> bool {
    if is_degenerate(a) || is_degenerate(b) {
        return false;
    }
    if !Aabb::from_points(a).overlaps(&Aabb::from_points(b)) {
        return false;
    }

    for (a1, a2) in edges(a) {
        for (b1, b2) in edges(b) {
            if segments_intersect(a1, a2, b1, b2) {
                return true;
            }
        }
    }

    point_in_polygon(a[0], b) || point_in_polygon(b[0], a)
}

/// Circle vs polygon overlap (used for the ship safe zone)
pub fn circle_overlaps_polygon(center: Vec2, radius: f32, polygon: &[Vec2]) -> bool {
    if is_degenerate(polygon) {
        return false;
    }
    if point_in_polygon(center, polygon) {
        return true;
    }
    let radius_sq = radius * radius;
    edges(polygon).any(|(a, b)| {
        let ab = b - a;
        let len_sq = ab.length_squared();
        let t = if len_sq > 0.0 {
            ((center - a).dot(ab) / len_sq).clamp(0.0, 1.0)
        } else {
            0.0
        };
        (a + ab * t).distance_squared(center) <= radius_sq
    })
}

/// Normalize a vector, rejecting zero length instead of producing NaN
pub fn try_normalize(v: Vec2, context: &'static str) -> Result<Vec2, SimError> {
    v.try_normalize().ok_or(SimError::ZeroVector { context })
}

// === Shape factories ===

/// Player ship: an arrowhead pointing along +x
pub fn ship_shape(scale: f32) -> Shape {
    Shape::from_coords(&[-10.0, -11.0, -5.0, 0.0, -10.0, 11.0, 20.0, 0.0]).scaled(scale)
}

/// Projectile: a thin bar along +x
pub fn projectile_shape(scale: f32) -> Shape {
    Shape::from_coords(&[10.0, -4.0, 10.0, 4.0, -10.0, 4.0, -10.0, -4.0]).scaled(scale)
}

/// Four-pointed star used for background decoration
pub fn star_shape(scale: f32) -> Shape {
    let points = 4;
    let vertices = (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { 4.0 } else { 1.5 };
            let angle = i as f32 * 180.0 / points as f32;
            rotate_degrees(Vec2::new(0.0, r), angle)
        })
        .collect();
    Shape::new(vertices).scaled(scale)
}

/// Irregular asteroid outline with `2 * level + 1` vertices.
///
/// Vertices sit on a circle whose radius grows with level, then each
/// coordinate is nudged by the configured jitter.
pub fn asteroid_shape(
    level: u32,
    radius_per_level: f32,
    radius_jitter: f32,
    vertex_jitter: f32,
    scale: f32,
    rng: &mut impl Rng,
) -> Result<Shape, SimError> {
    if level < 1 {
        return Err(SimError::InvalidLevel { level });
    }
    let count = 2 * level + 1;
    let size = radius_per_level * level as f32 + rng.random::<f32>() * radius_jitter;
    let step = 360.0 / count as f32;

    let vertices = (0..count)
        .map(|i| {
            let base = rotate_degrees(Vec2::new(0.0, size), i as f32 * step);
            let nudge = Vec2::new(
                rng.random::<f32>() * 2.0 * vertex_jitter - vertex_jitter,
                rng.random::<f32>() * 2.0 * vertex_jitter - vertex_jitter,
            );
            base + nudge
        })
        .collect();

    Ok(Shape::new(vertices).scaled(scale))
}
