//! Geometry primitives
//!
//! Segment intersection and the reflection/refraction vector math. Pure functions, no state.

use serde::{Deserialize, Serialize};

use crate::{Point, Vec2};

/// A line segment between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}
impl Segment {
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }
}

/// Fractional position along `a` at which it crosses `b`
///
/// Returns `None` for parallel or coincident segments, and whenever the crossing falls outside
/// the open interval (0, 1) on either segment. Touching an endpoint exactly is not a hit.
pub fn intersect(a: &Segment, b: &Segment) -> Option<f64> {
    let (x1, y1) = (a.start[0], a.start[1]);
    let (x2, y2) = (a.end[0], a.end[1]);
    let (x3, y3) = (b.start[0], b.start[1]);
    let (x4, y4) = (b.end[0], b.end[1]);

    let denom = (y4 - y3) * (x2 - x1) - (x4 - x3) * (y2 - y1);
    if denom == 0.0 {
        return None;
    }
    let ua = ((x4 - x3) * (y1 - y3) - (y4 - y3) * (x1 - x3)) / denom;
    let ub = ((x2 - x1) * (y1 - y3) - (y2 - y1) * (x1 - x3)) / denom;

    if 0.0 < ua && ua < 1.0 && 0.0 < ub && ub < 1.0 {
        Some(ua)
    } else {
        None
    }
}

/// Perpendicular `(-dy, dx)` of the segment `p1 -> p2`. Not normalized, sign arbitrary.
pub fn normal(p1: &Point, p2: &Point) -> Vec2 {
    let d = *p2 - *p1;
    Vec2::new(-d[1], d[0])
}

/// Normalize, falling back to `(0, 1)` for a zero-length vector
pub fn normalize_or_default(v: &Vec2) -> Vec2 {
    v.try_normalize(0.0).unwrap_or_else(|| Vec2::new(0.0, 1.0))
}

/// Mirror `dir` about a unit `normal`
pub fn reflect(dir: &Vec2, normal: &Vec2) -> Vec2 {
    *dir - 2.0 * dir.dot(normal) * *normal
}

/// Snell's law in vector form
///
/// `normal` must be unit length and face against `dir`. `eta` is the ratio of the index being
/// left over the index being entered. Returns `None` on total internal reflection.
pub fn refract(dir: &Vec2, normal: &Vec2, eta: f64) -> Option<Vec2> {
    let cos_theta = -dir.dot(normal);
    let k = 1.0 - eta.powi(2) * (1.0 - cos_theta.powi(2));
    if k < 0.0 {
        return None;
    }
    Some(eta * *dir + (eta * cos_theta - k.sqrt()) * *normal)
}

/// Serializable point for configs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SerdePoint {
    pub x: f64,
    pub y: f64,
}
impl From<SerdePoint> for Point {
    fn from(p: SerdePoint) -> Self {
        Point::new(p.x, p.y)
    }
}
impl From<Point> for SerdePoint {
    fn from(p: Point) -> Self {
        Self { x: p[0], y: p[1] }
    }
}
