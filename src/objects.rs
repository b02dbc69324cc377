//! Objects rays can hit
use crate::{
    geometry::{self, Segment},
    shard::Shard,
    Point, Ray, Vec2,
};

pub trait Hittable {
    /// Nearest hit along `ray` closer than `t_max`
    ///
    /// The ray is probed as a segment of length `reach`; distances are measured along it.
    fn try_hit(&self, ray: &Ray, reach: f64, t_max: f64) -> Option<HitRecord>;
}

/// Represents a hit
#[derive(Debug, Clone, PartialEq)]
pub struct HitRecord {
    /// Point of intersection
    pub p: Point,
    /// Unit normal, facing against the incoming ray
    pub normal: Vec2,
    /// Distance from the ray origin
    pub t: f64,
    /// Whether the ray is entering the material
    pub front_face: bool,
    /// Index of the struck shard in its list
    pub shard: usize,
}
impl HitRecord {
    pub fn new(p: Point, t: f64, ray: &Ray, outward_normal: &Vec2, shard: usize) -> Self {
        let front_face = ray.dir.dot(outward_normal) < 0.0;
        let mut normal = outward_normal.to_owned();
        if !front_face {
            normal = -normal;
        }
        Self {
            p,
            normal,
            t,
            front_face,
            shard,
        }
    }
}

impl Hittable for Shard {
    fn try_hit(&self, ray: &Ray, reach: f64, t_max: f64) -> Option<HitRecord> {
        let probe = Segment::new(ray.orig, ray.get(reach));
        let mut closest_so_far = t_max;
        let mut hit_edge = None;

        for edge in self.edges() {
            if let Some(frac) = geometry::intersect(&probe, &edge) {
                let t = frac * reach;
                if t < closest_so_far {
                    closest_so_far = t;
                    hit_edge = Some(edge);
                }
            }
        }

        hit_edge.map(|edge| {
            let outward_normal =
                geometry::normalize_or_default(&geometry::normal(&edge.start, &edge.end));
            HitRecord::new(ray.get(closest_so_far), closest_so_far, ray, &outward_normal, 0)
        })
    }
}

/// Every shard in the scene, scanned exhaustively
#[derive(Debug, Clone, Default)]
pub struct ShardList(pub Vec<Shard>);
impl ShardList {
    pub fn add(&mut self, shard: Shard) {
        self.0.push(shard)
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Shard> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Shard> {
        self.0.iter_mut()
    }
}
impl Hittable for ShardList {
    fn try_hit(&self, ray: &Ray, reach: f64, t_max: f64) -> Option<HitRecord> {
        let mut closest_so_far = t_max;
        let mut hr_final = None;

        for (i, shard) in self.0.iter().enumerate() {
            if let Some(mut hr) = shard.try_hit(ray, reach, closest_so_far) {
                closest_so_far = hr.t;
                hr.shard = i;
                hr_final = Some(hr)
            }
        }
        hr_final
    }
}
