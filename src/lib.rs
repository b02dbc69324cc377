//! Stained Glass Optics Library
//!
//! Casts fans of rays from point lights through user-drawn refractive shards, bending each
//! wavelength channel by a slightly different amount, and hands the resulting polylines to a
//! renderer for additive compositing.

use nalgebra::Vector2;

pub mod error;
pub use error::{Error, Result};

pub mod geometry;

pub mod shard;

pub mod objects;

pub mod light;

pub mod tracer;

pub mod scene;

pub mod canvas;

pub type Vec2 = Vector2<f64>;
pub type Point = Vec2;

/// Prelude
pub mod prelude {
    pub use crate::canvas::Canvas;
    pub use crate::light::{Channel, LightSource};
    pub use crate::objects::{HitRecord, Hittable, ShardList};
    pub use crate::scene::{InputEvent, PathSink, Scene, SceneConfig};
    pub use crate::shard::{Shard, ShardParams};
    pub use crate::tracer::{TracedPath, Tracer};
    pub use crate::{Point, Ray, Vec2};
}

/// The ray in ray tracing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub orig: Point,
    /// Unit direction
    pub dir: Vec2,
}
impl Ray {
    pub fn new(orig: Point, dir: Vec2) -> Self {
        Self { orig, dir }
    }

    /// Ray pointing along `angle_deg`, measured from +x towards +y
    pub fn from_angle(orig: Point, angle_deg: f64) -> Self {
        let rad = angle_deg.to_radians();
        Self::new(orig, Vec2::new(rad.cos(), rad.sin()))
    }

    pub fn get(&self, t: f64) -> Point {
        self.orig + t * self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ray_from_angle_points_along_axes() {
        let ray = Ray::from_angle(Point::new(1.0, 2.0), 90.0);
        assert_relative_eq!(ray.dir, Vec2::new(0.0, 1.0), epsilon = 1e-12);
        assert_relative_eq!(ray.get(3.0), Point::new(1.0, 5.0), epsilon = 1e-12);
    }
}
