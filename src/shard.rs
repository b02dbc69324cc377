//! Refractive shards
//!
//! A shard is a closed polygon of glass whose refractive index "breathes" over time and warms up
//! as light strikes it.

use dyn_clone::DynClone;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    geometry::{SerdePoint, Segment},
    Point,
};

/// Energy lost per breathing update
pub const ENERGY_DECAY: f64 = 0.01;
/// Energy gained per ray hit
pub const HIT_INCREMENT: f64 = 0.005;
/// How strongly energy raises the refractive index
pub const ENERGY_SCALE: f64 = 0.1;
/// The index never drops to vacuum, so rays always bend
pub const MIN_INDEX: f64 = 1.01;

pub type Drift = Box<dyn Breathing + Send + Sync>;

/// Time-driven variation of a shard's refractive index
pub trait Breathing: DynClone {
    fn drift(&self, time: f64, volatility: f64) -> f64;
}

/// Sinusoidal drift, `sin(time * volatility * frequency) * amplitude`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sine {
    pub amplitude: f64,
    pub frequency: f64,
}
impl Default for Sine {
    fn default() -> Self {
        Self {
            amplitude: 0.05,
            frequency: 0.1,
        }
    }
}
impl Breathing for Sine {
    fn drift(&self, time: f64, volatility: f64) -> f64 {
        (time * volatility * self.frequency).sin() * self.amplitude
    }
}

/// No drift at all
#[derive(Debug, Clone, Default)]
pub struct Still;
impl Breathing for Still {
    fn drift(&self, _time: f64, _volatility: f64) -> f64 {
        0.0
    }
}

/// Config for breathing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum DriftConfig {
    Sine(Sine),
    Still,
}
impl Default for DriftConfig {
    fn default() -> Self {
        Self::Sine(Sine::default())
    }
}
impl DriftConfig {
    pub fn build(self) -> Drift {
        match self {
            DriftConfig::Sine(s) => Box::new(s),
            DriftConfig::Still => Box::new(Still),
        }
    }
}

/// Physical parameters fixed at shard creation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShardParams {
    /// Baseline refractive index, in (1.0, 2.5)
    pub base_index: f64,
    /// Breathing rate
    pub volatility: f64,
}
impl ShardParams {
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            base_index: rng.gen_range(1.1..2.4),
            volatility: rng.gen_range(0.001..0.005),
        }
    }
}

/// A refractive polygon
pub struct Shard {
    boundary: Vec<Point>,
    /// Display hue in degrees
    pub hue: f64,
    /// Display saturation in percent
    pub saturation: f64,
    params: ShardParams,
    drift: Drift,
    energy: f64,
    current_index: f64,
}
impl Shard {
    /// Build a shard from an outline, kept in the given order
    ///
    /// The outline is not checked here; [`crate::scene::Scene`] refuses fewer than three vertices.
    pub fn new(boundary: Vec<Point>, params: ShardParams, drift: Drift) -> Self {
        Self {
            boundary,
            hue: 0.0,
            saturation: 100.0,
            params,
            drift,
            energy: 0.0,
            current_index: params.base_index,
        }
    }

    /// A freshly drawn shard with random hue and physics
    pub fn random<R: Rng>(boundary: Vec<Point>, rng: &mut R) -> Self {
        let mut shard = Self::new(
            boundary,
            ShardParams::random(rng),
            DriftConfig::default().build(),
        );
        shard.hue = rng.gen_range(0..=360) as f64;
        shard
    }

    pub fn from_config<R: Rng>(config: ShardConfig, rng: &mut R) -> Self {
        let random = ShardParams::random(rng);
        let params = ShardParams {
            base_index: config.base_index.unwrap_or(random.base_index),
            volatility: config.volatility.unwrap_or(random.volatility),
        };
        let hue = config
            .hue
            .unwrap_or_else(|| rng.gen_range(0..=360) as f64);
        let boundary = config.points.into_iter().map(Point::from).collect();
        let mut shard = Self::new(boundary, params, config.drift.build());
        shard.hue = hue;
        shard
    }

    pub fn boundary(&self) -> &[Point] {
        &self.boundary
    }

    pub fn params(&self) -> ShardParams {
        self.params
    }

    pub fn energy(&self) -> f64 {
        self.energy
    }

    pub fn current_index(&self) -> f64 {
        self.current_index
    }

    /// Edge `i` runs from vertex `i` to vertex `(i + 1) mod n`
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.boundary.len();
        (0..n).map(move |i| Segment::new(self.boundary[i], self.boundary[(i + 1) % n]))
    }

    /// Decay the energy, then recompute the refractive index for `time`
    pub fn update_breathing(&mut self, time: f64) {
        self.energy = (self.energy - ENERGY_DECAY).max(0.0);
        let drift = self.drift.drift(time, self.params.volatility);
        self.current_index =
            (self.params.base_index + drift + self.energy * ENERGY_SCALE).max(MIN_INDEX);
    }

    /// Heat from a single ray strike
    pub fn absorb_hit(&mut self) {
        self.energy = (self.energy + HIT_INCREMENT).min(1.0);
    }
}
impl Clone for Shard {
    fn clone(&self) -> Self {
        Self {
            boundary: self.boundary.clone(),
            hue: self.hue,
            saturation: self.saturation,
            params: self.params,
            drift: dyn_clone::clone_box(&*self.drift),
            energy: self.energy,
            current_index: self.current_index,
        }
    }
}
impl std::fmt::Debug for Shard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Shard")
            .field("boundary", &self.boundary)
            .field("hue", &self.hue)
            .field("params", &self.params)
            .field("energy", &self.energy)
            .field("current_index", &self.current_index)
            .finish()
    }
}

/// Shard Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShardConfig {
    pub points: Vec<SerdePoint>,
    #[serde(default)]
    pub base_index: Option<f64>,
    #[serde(default)]
    pub volatility: Option<f64>,
    #[serde(default)]
    pub hue: Option<f64>,
    #[serde(default)]
    pub drift: DriftConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::{rngs::StdRng, SeedableRng};

    fn triangle() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 10.0),
        ]
    }

    fn still(base_index: f64) -> Shard {
        Shard::new(
            triangle(),
            ShardParams {
                base_index,
                volatility: 0.003,
            },
            Box::new(Still),
        )
    }

    #[test]
    fn edges_wrap_around_in_insertion_order() {
        let shard = still(1.5);
        let edges: Vec<_> = shard.edges().collect();
        assert_eq!(edges.len(), 3);
        assert_eq!(edges[2].start, Point::new(0.0, 10.0));
        assert_eq!(edges[2].end, Point::new(0.0, 0.0));
    }

    #[test]
    fn energy_saturates_after_many_hits() {
        let mut shard = still(1.5);
        for _ in 0..7 {
            shard.absorb_hit();
        }
        assert_relative_eq!(shard.energy(), 7.0 * HIT_INCREMENT, epsilon = 1e-12);
        for _ in 0..1000 {
            shard.absorb_hit();
        }
        assert_eq!(shard.energy(), 1.0);
    }

    #[test]
    fn energy_decays_but_never_goes_negative() {
        let mut shard = still(1.5);
        for _ in 0..3 {
            shard.absorb_hit();
        }
        shard.update_breathing(0.0);
        assert_relative_eq!(shard.energy(), 0.015 - ENERGY_DECAY, epsilon = 1e-12);
        shard.update_breathing(0.0);
        assert_eq!(shard.energy(), 0.0);
        shard.update_breathing(0.0);
        assert_eq!(shard.energy(), 0.0);
    }

    #[test]
    fn index_is_clamped_above_vacuum() {
        let mut shard = Shard::new(
            triangle(),
            ShardParams {
                base_index: 1.02,
                volatility: 1.0,
            },
            Box::new(Sine {
                amplitude: 0.05,
                frequency: 1.0,
            }),
        );
        // sin(3pi/2) = -1
        shard.update_breathing(1.5 * std::f64::consts::PI);
        assert_eq!(shard.current_index(), MIN_INDEX);
    }

    #[test]
    fn index_includes_drift_and_energy() {
        let mut shard = Shard::new(
            triangle(),
            ShardParams {
                base_index: 1.5,
                volatility: 0.004,
            },
            DriftConfig::default().build(),
        );
        for _ in 0..100 {
            shard.absorb_hit();
        }
        shard.update_breathing(1000.0);
        let expected = 1.5 + (1000.0f64 * 0.004 * 0.1).sin() * 0.05 + (0.5 - ENERGY_DECAY) * 0.1;
        assert_relative_eq!(shard.current_index(), expected, epsilon = 1e-12);
    }

    #[test]
    fn frozen_clock_converges_to_a_fixed_point() {
        let mut shard = Shard::new(
            triangle(),
            ShardParams {
                base_index: 1.7,
                volatility: 0.002,
            },
            DriftConfig::default().build(),
        );
        for _ in 0..200 {
            shard.absorb_hit();
        }
        let mut previous = f64::INFINITY;
        for _ in 0..200 {
            shard.update_breathing(5000.0);
            assert!(shard.current_index() <= previous);
            previous = shard.current_index();
        }
        let settled = shard.current_index();
        shard.update_breathing(5000.0);
        assert_eq!(shard.current_index(), settled);
        assert_eq!(shard.energy(), 0.0);
    }

    #[test]
    fn random_shards_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..100 {
            let shard = Shard::random(triangle(), &mut rng);
            let p = shard.params();
            assert!((1.1..2.4).contains(&p.base_index));
            assert!((0.001..0.005).contains(&p.volatility));
            assert!((0.0..=360.0).contains(&shard.hue));
            assert_eq!(shard.current_index(), p.base_index);
        }
    }

    #[test]
    fn clone_keeps_breathing_behaviour() {
        let mut a = Shard::new(
            triangle(),
            ShardParams {
                base_index: 1.4,
                volatility: 0.003,
            },
            DriftConfig::default().build(),
        );
        let mut b = a.clone();
        a.update_breathing(777.0);
        b.update_breathing(777.0);
        assert_eq!(a.current_index(), b.current_index());
    }

    #[test]
    fn config_overrides_random_properties() {
        let yaml = r#"
points: [{ x: 0, y: 0 }, { x: 4, y: 0 }, { x: 0, y: 3 }]
base_index: 1.5
hue: 200
drift: { type: Still }
"#;
        let config: ShardConfig = serde_yaml::from_str(yaml).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let mut shard = Shard::from_config(config, &mut rng);
        assert_eq!(shard.params().base_index, 1.5);
        assert_eq!(shard.hue, 200.0);
        shard.update_breathing(1234.0);
        assert_eq!(shard.current_index(), 1.5);
    }
}
