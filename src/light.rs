//! Light sources and wavelength channels

use serde::{Deserialize, Serialize};

use crate::{geometry::SerdePoint, Point};

/// A wavelength channel, tied to one primary colour
///
/// Higher channels see a denser material and bend more, which splits white light like a prism.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
}
impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Multiplier applied to a shard's refractive index
    pub fn dispersion(self) -> f64 {
        match self {
            Channel::Red => 1.0,
            Channel::Green => 1.02,
            Channel::Blue => 1.05,
        }
    }

    /// Position of this channel in an RGB triple
    pub fn index(self) -> usize {
        match self {
            Channel::Red => 0,
            Channel::Green => 1,
            Channel::Blue => 2,
        }
    }

    /// Pure primary colour used to draw paths of this channel
    pub fn primary(self) -> [u8; 3] {
        let mut rgb = [0; 3];
        rgb[self.index()] = 255;
        rgb
    }
}

/// A point light
#[derive(Debug, Clone, PartialEq)]
pub struct LightSource {
    pub position: Point,
    /// Intensity per primary channel, RGB order
    pub color: [u8; 3],
}
impl LightSource {
    pub fn new(position: Point, color: [u8; 3]) -> Self {
        Self { position, color }
    }

    pub fn from_config(config: LightConfig) -> Self {
        Self::new(config.position.into(), config.color)
    }

    /// A channel with zero intensity emits nothing at all
    pub fn emits(&self, channel: Channel) -> bool {
        self.color[channel.index()] != 0
    }

    /// Channels this light casts rays in
    pub fn channels(&self) -> impl Iterator<Item = Channel> + '_ {
        Channel::ALL.into_iter().filter(|&c| self.emits(c))
    }
}

/// Light Config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightConfig {
    pub position: SerdePoint,
    pub color: [u8; 3],
}
