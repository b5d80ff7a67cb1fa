//! TOML terrain configuration.
//!
//! ```toml
//! detail_resolution = 16
//! chunk_length = 16.0
//! chunk_height = 6.0
//!
//! [noise]
//! seed = 7
//!
//! [streaming]
//! view_radius = 4
//! cache_radius = 6
//!
//! [[color_ramp]]
//! t = 0.0
//! color = "#1f3b73"
//! ```

use std::path::Path;

use bevy::prelude::*;
use serde::{Deserialize, Deserializer, de};

use crate::coords::RangeMetric;
use crate::error::ConfigError;
use crate::scheduling::DEFAULT_CREATION_BATCH;
use crate::seeding::{ColorStop, GradientRamp, PerlinField};
use crate::settings::{ChunkDescriptor, ChunkSettings};

/// Full terrain configuration.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct TerrainConfig {
  pub detail_resolution: u32,
  pub chunk_length: f32,
  pub chunk_height: f32,
  #[serde(default)]
  pub noise: NoiseConfig,
  #[serde(default)]
  pub streaming: StreamingConfig,
  /// Ramp stops. Omitted uses the built-in ramp.
  #[serde(default)]
  pub color_ramp: Option<Vec<ColorStopConfig>>,
}

impl Default for TerrainConfig {
  fn default() -> Self {
    Self {
      detail_resolution: 16,
      chunk_length: 16.0,
      chunk_height: 6.0,
      noise: NoiseConfig::default(),
      streaming: StreamingConfig::default(),
      color_ramp: None,
    }
  }
}

/// Parameters of the fractal Perlin height field.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct NoiseConfig {
  pub seed: u32,
  pub frequency: f64,
  pub octaves: usize,
}

impl Default for NoiseConfig {
  fn default() -> Self {
    Self {
      seed: 0,
      frequency: PerlinField::DEFAULT_FREQUENCY,
      octaves: PerlinField::DEFAULT_OCTAVES,
    }
  }
}

/// Radii and rate limits for the streamer.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct StreamingConfig {
  /// Chunks within this radius of an observer are active.
  pub view_radius: u32,
  /// Chunks within this radius stay loaded but hidden. Beyond it they are
  /// destroyed.
  pub cache_radius: u32,
  /// Mesh builds per scheduler step.
  pub creation_batch: usize,
  /// Distance metric for both radii.
  pub metric: RangeMetric,
  /// Drop queued, unbuilt creations that fall outside cache radius of every
  /// observer. Off by default: queued creations always finish and are then
  /// evicted normally.
  pub cancel_stale_creations: bool,
}

impl Default for StreamingConfig {
  fn default() -> Self {
    Self {
      view_radius: 4,
      cache_radius: 6,
      creation_batch: DEFAULT_CREATION_BATCH,
      metric: RangeMetric::default(),
      cancel_stale_creations: false,
    }
  }
}

/// One ramp stop with a hex color.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ColorStopConfig {
  pub t: f32,
  #[serde(deserialize_with = "deserialize_hex_color")]
  pub color: [f32; 3],
}

fn deserialize_hex_color<'de, D>(deserializer: D) -> Result<[f32; 3], D::Error>
where
  D: Deserializer<'de>,
{
  let s: String = Deserialize::deserialize(deserializer)?;
  let s = s.trim_start_matches('#');
  if s.len() != 6 {
    return Err(de::Error::custom("hex color must be 6 characters"));
  }
  let r = u8::from_str_radix(&s[0..2], 16).map_err(de::Error::custom)?;
  let g = u8::from_str_radix(&s[2..4], 16).map_err(de::Error::custom)?;
  let b = u8::from_str_radix(&s[4..6], 16).map_err(de::Error::custom)?;
  Ok([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
}

impl TerrainConfig {
  pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(source)?)
  }

  pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path)?;
    let config = Self::from_toml_str(&source)?;
    info!("Loaded terrain config from {}", path.display());
    Ok(config)
  }

  /// Builds the color ramp, falling back to the default when none is set.
  pub fn ramp(&self) -> Result<GradientRamp, ConfigError> {
    match &self.color_ramp {
      None => Ok(GradientRamp::default()),
      Some(stops) => {
        let stops: Vec<ColorStop> = stops
          .iter()
          .map(|s| ColorStop::new(s.t, s.color[0], s.color[1], s.color[2]))
          .collect();
        GradientRamp::new(&stops)
      }
    }
  }

  /// Builds validated chunk settings.
  pub fn chunk_settings(
    &self,
    descriptor: ChunkDescriptor,
    parent: Option<Entity>,
  ) -> Result<ChunkSettings, ConfigError> {
    let noise = PerlinField::new(self.noise.seed)
      .frequency(self.noise.frequency)
      .octaves(self.noise.octaves);

    let mut settings = ChunkSettings::new(self.detail_resolution, self.chunk_length, self.chunk_height)
      .with_noise(noise)
      .with_color_ramp(self.ramp()?)
      .with_descriptor(descriptor);
    settings.parent = parent;
    settings.validate()?;
    Ok(settings)
  }
}
