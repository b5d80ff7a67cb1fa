//! Visual debug gizmos for terrain streaming.
//!
//! Enable with the `visual-debug` feature flag.

pub(super) mod colors;
pub mod settings;
mod systems;

use bevy::prelude::*;
pub use settings::VisualDebugSettings;
use systems::{draw_chunk_bounds, draw_chunk_normals};

/// Plugin that enables visual debug gizmos.
///
/// Added automatically by the streaming plugin when the feature is on.
pub struct VisualDebugPlugin;

impl Plugin for VisualDebugPlugin {
  fn build(&self, app: &mut App) {
    app
      .init_resource::<VisualDebugSettings>()
      .add_systems(PostUpdate, (draw_chunk_bounds, draw_chunk_normals));
  }
}
