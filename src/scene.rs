//! The frame driver
//!
//! A [`Scene`] owns the shards and lights, reacts to input events, and once per frame breathes
//! every shard, casts every light and hands the paths to a [`PathSink`].

use std::path::Path;

use log::{debug, info};
use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::{
    geometry::SerdePoint,
    light::{Channel, LightConfig, LightSource},
    objects::ShardList,
    shard::{Shard, ShardConfig},
    tracer::{Trace, TracedPath, Tracer, TracerConfig},
    Error, Point, Ray, Result,
};

/// Receives each frame's batch of paths, e.g. a renderer compositing them additively
pub trait PathSink {
    fn draw(&mut self, scene: &Scene, paths: &[TracedPath]);
}

/// Input from the user
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A finished outline, used verbatim as the shard boundary
    AddShard { points: Vec<Point> },
    MoveLight { light: usize, to: Point },
    /// Move whichever light is closest to `to`
    DragNearest { to: Point },
    /// Clear every shard
    Reset,
}

/// Serialized form of [`InputEvent`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EventConfig {
    AddShard { points: Vec<SerdePoint> },
    MoveLight { light: usize, to: SerdePoint },
    DragNearest { to: SerdePoint },
    Reset,
}
impl From<EventConfig> for InputEvent {
    fn from(config: EventConfig) -> Self {
        match config {
            EventConfig::AddShard { points } => InputEvent::AddShard {
                points: points.into_iter().map(Point::from).collect(),
            },
            EventConfig::MoveLight { light, to } => InputEvent::MoveLight {
                light,
                to: to.into(),
            },
            EventConfig::DragNearest { to } => InputEvent::DragNearest { to: to.into() },
            EventConfig::Reset => InputEvent::Reset,
        }
    }
}

/// An input event applied before the given frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub frame: usize,
    pub event: EventConfig,
}

/// Scene Config
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub width: u32,
    pub height: u32,
    pub seed: Option<u64>,
    pub tracer: TracerConfig,
    /// Cyan and magenta side by side when absent
    pub lights: Option<Vec<LightConfig>>,
    pub shards: Vec<ShardConfig>,
    pub events: Vec<ScheduledEvent>,
}
impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 900,
            seed: None,
            tracer: TracerConfig::default(),
            lights: None,
            shards: Vec::new(),
            events: Vec::new(),
        }
    }
}
impl SceneConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

/// The two lights of the default scene
pub fn default_lights(width: u32, height: u32) -> Vec<LightSource> {
    let (w, h) = (width as f64, height as f64);
    vec![
        LightSource::new(Point::new(w / 3.0, h / 2.0), [0, 255, 255]),
        LightSource::new(Point::new(2.0 * w / 3.0, h / 2.0), [255, 0, 255]),
    ]
}

/// Shards, lights and the tracer, advanced one frame at a time
///
/// Shards only enter through [`Scene::add_shard`] or [`Scene::insert_shard`], so every one of
/// them has a closed outline.
pub struct Scene {
    pub width: u32,
    pub height: u32,
    shards: ShardList,
    pub lights: Vec<LightSource>,
    pub tracer: Tracer,
    rng: StdRng,
}
impl Scene {
    pub fn new(width: u32, height: u32, lights: Vec<LightSource>, tracer: Tracer) -> Self {
        Self {
            width,
            height,
            shards: ShardList::default(),
            lights,
            tracer,
            rng: StdRng::from_entropy(),
        }
    }

    /// Seed the generator behind random shard properties
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn from_config(config: SceneConfig) -> Result<Self> {
        let lights = match config.lights {
            Some(lights) => lights.into_iter().map(LightSource::from_config).collect(),
            None => default_lights(config.width, config.height),
        };
        let mut scene = Self::new(
            config.width,
            config.height,
            lights,
            Tracer::from_config(config.tracer),
        );
        if let Some(seed) = config.seed {
            scene = scene.with_seed(seed);
        }
        for shard_cfg in config.shards {
            check_outline(shard_cfg.points.len())?;
            let shard = Shard::from_config(shard_cfg, &mut scene.rng);
            scene.insert_shard(shard)?;
        }
        info!(
            "scene {}x{} with {} lights and {} shards",
            scene.width,
            scene.height,
            scene.lights.len(),
            scene.shards.len()
        );
        Ok(scene)
    }

    /// Handle one input event; a rejected event leaves the scene untouched
    pub fn apply(&mut self, event: InputEvent) -> Result<()> {
        match event {
            InputEvent::AddShard { points } => self.add_shard(points),
            InputEvent::MoveLight { light, to } => self.move_light(light, to),
            InputEvent::DragNearest { to } => {
                if let Some(light) = self.nearest_light(&to) {
                    self.move_light(light, to)?;
                }
                Ok(())
            }
            InputEvent::Reset => {
                self.reset();
                Ok(())
            }
        }
    }

    /// Finalize a drawn outline into a shard with random properties
    pub fn add_shard(&mut self, points: Vec<Point>) -> Result<()> {
        check_outline(points.len())?;
        let shard = Shard::random(points, &mut self.rng);
        debug!("new shard {:?}", shard);
        self.insert_shard(shard)
    }

    /// Add an already built shard, rejecting an outline with fewer than three vertices
    pub fn insert_shard(&mut self, shard: Shard) -> Result<()> {
        check_outline(shard.boundary().len())?;
        self.shards.add(shard);
        Ok(())
    }

    pub fn shards(&self) -> &ShardList {
        &self.shards
    }

    pub fn move_light(&mut self, index: usize, to: Point) -> Result<()> {
        let count = self.lights.len();
        let light = self
            .lights
            .get_mut(index)
            .ok_or(Error::NoSuchLight { index, count })?;
        light.position = to;
        Ok(())
    }

    /// Index of the light closest to `p`, the last one on ties
    pub fn nearest_light(&self, p: &Point) -> Option<usize> {
        self.lights
            .iter()
            .enumerate()
            .map(|(i, light)| (i, (light.position - p).norm_squared()))
            .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
                Some((_, best_d)) if best_d < d => best,
                _ => Some((i, d)),
            })
            .map(|(i, _)| i)
    }

    pub fn reset(&mut self) {
        self.shards.clear();
    }

    /// Advance one frame to `time` and return every traced path
    ///
    /// Rays are traced against the shards as they stand after breathing; the energy from all
    /// their hits lands afterwards, ready for the next frame.
    pub fn step(&mut self, time: f64) -> Vec<TracedPath> {
        for shard in self.shards.iter_mut() {
            shard.update_breathing(time);
        }

        let tracer = &self.tracer;
        let shards = &self.shards;
        let jobs: Vec<(Ray, Channel)> = self
            .lights
            .iter()
            .flat_map(move |light| tracer.rays(light, time))
            .collect();

        let traces: Vec<Trace> = if tracer.parallel {
            jobs.par_iter()
                .map(|&(ray, channel)| tracer.trace(shards, ray, channel))
                .collect()
        } else {
            jobs.iter()
                .map(|&(ray, channel)| tracer.trace(shards, ray, channel))
                .collect()
        };

        let mut hits = 0;
        for &i in traces.iter().flat_map(|trace| trace.hits.iter()) {
            self.shards.0[i].absorb_hit();
            hits += 1;
        }
        debug!("t={time}: {} paths, {hits} hits", traces.len());

        traces.into_iter().map(|trace| trace.path).collect()
    }

    /// Step and hand the paths to `sink`
    pub fn render_frame(&mut self, time: f64, sink: &mut impl PathSink) -> usize {
        let paths = self.step(time);
        sink.draw(self, &paths);
        paths.len()
    }
}

fn check_outline(vertices: usize) -> Result<()> {
    if vertices < 3 {
        return Err(Error::DegenerateShard { vertices });
    }
    Ok(())
}
