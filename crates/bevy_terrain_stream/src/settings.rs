//! Immutable per-streamer chunk settings.

use std::fmt;
use std::sync::Arc;

use bevy::prelude::*;

use crate::error::ConfigError;
use crate::seeding::{ColorRamp, FlatField, GradientRamp, NoiseField};

/// Describes how the host should instantiate a chunk representation.
///
/// Plays the role of a prefab: every chunk spawned by one streamer shares
/// the same descriptor.
#[derive(Clone, Debug)]
pub struct ChunkDescriptor {
  /// Name prefix for spawned chunk entities (`"{label} [x/z]"`).
  pub label: String,
  /// Material applied to every chunk. `None` spawns mesh-only entities.
  pub material: Option<Handle<StandardMaterial>>,
}

impl Default for ChunkDescriptor {
  fn default() -> Self {
    Self {
      label: "Chunk".to_string(),
      material: None,
    }
  }
}

/// Everything needed to build one chunk's geometry and representation.
///
/// Settings are immutable once a streamer is constructed; the streamer keeps
/// them behind an [`Arc`] and shares them with the mesh builder.
#[derive(Clone)]
pub struct ChunkSettings {
  /// Quads per chunk edge (R). Must be at least 1.
  pub detail_resolution: u32,
  /// Chunk edge length in world units.
  pub chunk_length: f32,
  /// Vertical scale applied to noise samples.
  pub chunk_height: f32,
  /// Height source.
  pub noise: Arc<dyn NoiseField>,
  /// Height-to-color mapping.
  pub color_ramp: Arc<dyn ColorRamp>,
  /// Instantiation descriptor passed to the host.
  pub descriptor: ChunkDescriptor,
  /// Parent scope for spawned representations.
  pub parent: Option<Entity>,
}

impl ChunkSettings {
  /// Creates settings with flat terrain, the default ramp and no parent.
  pub fn new(detail_resolution: u32, chunk_length: f32, chunk_height: f32) -> Self {
    Self {
      detail_resolution,
      chunk_length,
      chunk_height,
      noise: Arc::new(FlatField(0.0)),
      color_ramp: Arc::new(GradientRamp::default()),
      descriptor: ChunkDescriptor::default(),
      parent: None,
    }
  }

  /// Sets the noise field.
  pub fn with_noise(mut self, noise: impl NoiseField + 'static) -> Self {
    self.noise = Arc::new(noise);
    self
  }

  /// Sets the color ramp.
  pub fn with_color_ramp(mut self, ramp: impl ColorRamp + 'static) -> Self {
    self.color_ramp = Arc::new(ramp);
    self
  }

  /// Sets the instantiation descriptor.
  pub fn with_descriptor(mut self, descriptor: ChunkDescriptor) -> Self {
    self.descriptor = descriptor;
    self
  }

  /// Sets the parent scope entity.
  pub fn with_parent(mut self, parent: Entity) -> Self {
    self.parent = Some(parent);
    self
  }

  /// Checks the numeric fields.
  pub fn validate(&self) -> Result<(), ConfigError> {
    if self.detail_resolution == 0 {
      return Err(ConfigError::ZeroResolution);
    }
    if !self.chunk_length.is_finite() || self.chunk_length <= 0.0 {
      return Err(ConfigError::InvalidChunkLength(self.chunk_length));
    }
    if !self.chunk_height.is_finite() {
      return Err(ConfigError::InvalidChunkHeight(self.chunk_height));
    }
    Ok(())
  }
}

impl fmt::Debug for ChunkSettings {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("ChunkSettings")
      .field("detail_resolution", &self.detail_resolution)
      .field("chunk_length", &self.chunk_length)
      .field("chunk_height", &self.chunk_height)
      .field("descriptor", &self.descriptor)
      .field("parent", &self.parent)
      .finish_non_exhaustive()
  }
}
