//! Ray tracing through shards
//!
//! Each ray is marched from hit to hit against every shard edge. At each hit it refracts by
//! Snell's law, or reflects on total internal reflection, until it escapes or runs out of
//! bounces.

use serde::{Deserialize, Serialize};

use crate::{
    geometry,
    light::{Channel, LightSource},
    objects::{Hittable, ShardList},
    Point, Ray,
};

/// A polyline traced by one ray, tagged with its channel
#[derive(Debug, Clone, PartialEq)]
pub struct TracedPath {
    pub channel: Channel,
    /// Starts at the light source, one more point per bounce
    pub points: Vec<Point>,
}
impl TracedPath {
    pub fn color(&self) -> [u8; 3] {
        self.channel.primary()
    }
}

/// A traced path plus the shards it struck, in order
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub path: TracedPath,
    pub hits: Vec<usize>,
}

/// Tracer Config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TracerConfig {
    pub max_bounces: usize,
    pub rays_per_source: usize,
    pub far_distance: f64,
    pub spin_rate: f64,
    pub parallel: bool,
}
impl Default for TracerConfig {
    fn default() -> Self {
        Self {
            max_bounces: 8,
            rays_per_source: 150,
            far_distance: 2000.0,
            spin_rate: 0.01,
            parallel: true,
        }
    }
}

/// Casts fans of rays from light sources
#[derive(Debug, Clone)]
pub struct Tracer {
    pub max_bounces: usize,
    pub rays_per_source: usize,
    /// Longer than the visible field, so missing everything and leaving the field coincide
    pub far_distance: f64,
    /// Rotation of the whole fan, in degrees per time unit
    pub spin_rate: f64,
    pub parallel: bool,
}
impl Default for Tracer {
    fn default() -> Self {
        Self::from_config(TracerConfig::default())
    }
}
impl Tracer {
    pub fn from_config(config: TracerConfig) -> Self {
        Self {
            max_bounces: config.max_bounces,
            rays_per_source: config.rays_per_source,
            far_distance: config.far_distance,
            spin_rate: config.spin_rate,
            parallel: config.parallel,
        }
    }

    /// Whole-degree angular step between sampled rays
    pub fn angle_step(&self) -> usize {
        (360 / self.rays_per_source.max(1)).max(1)
    }

    /// Emission angles in degrees, all rotated by the same drift for `time`
    pub fn angles(&self, time: f64) -> impl Iterator<Item = f64> {
        let spin = time * self.spin_rate;
        (0..360)
            .step_by(self.angle_step())
            .map(move |angle| angle as f64 + spin)
    }

    /// Every ray a light emits at `time`, channel by channel
    pub fn rays<'a>(
        &'a self,
        light: &'a LightSource,
        time: f64,
    ) -> impl Iterator<Item = (Ray, Channel)> + 'a {
        light.channels().flat_map(move |channel| {
            self.angles(time)
                .map(move |angle| (Ray::from_angle(light.position, angle), channel))
        })
    }

    /// Follow one ray through the shards
    ///
    /// Shards are only read; the caller feeds `hits` back into their energy.
    pub fn trace(&self, shards: &ShardList, ray: Ray, channel: Channel) -> Trace {
        let mut ray = ray;
        let mut points = vec![ray.orig];
        let mut hits = Vec::new();

        for _ in 0..self.max_bounces {
            let hr = match shards.try_hit(&ray, self.far_distance, self.far_distance) {
                Some(hr) => hr,
                None => {
                    points.push(ray.get(self.far_distance));
                    break;
                }
            };
            points.push(hr.p);
            hits.push(hr.shard);

            let index = shards.0[hr.shard].current_index() * channel.dispersion();
            let eta = if hr.front_face { 1.0 / index } else { index };

            let direction = geometry::refract(&ray.dir, &hr.normal, eta)
                .unwrap_or_else(|| geometry::reflect(&ray.dir, &hr.normal));
            ray = Ray::new(hr.p, direction);
        }

        Trace {
            path: TracedPath { channel, points },
            hits,
        }
    }

    /// Trace every ray of one light
    pub fn cast_source(&self, shards: &ShardList, light: &LightSource, time: f64) -> Vec<Trace> {
        self.rays(light, time)
            .map(|(ray, channel)| self.trace(shards, ray, channel))
            .collect()
    }
}
