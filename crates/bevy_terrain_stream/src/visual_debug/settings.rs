//! Visual debug settings resource.

use bevy::prelude::*;

/// Settings for visual debug overlays.
#[derive(Resource, Clone, Debug)]
pub struct VisualDebugSettings {
  /// Outline chunks colored by cache state.
  pub show_chunk_bounds: bool,
  /// Outline positions waiting to be built.
  pub show_pending: bool,
  /// Draw vertex normals of active chunks. Border vertices are highlighted.
  pub show_normals: bool,
  /// Normal ray length in world units.
  pub normal_length: f32,
}

impl Default for VisualDebugSettings {
  fn default() -> Self {
    Self {
      show_chunk_bounds: true,
      show_pending: true,
      show_normals: false,
      normal_length: 0.5,
    }
  }
}
