//! Terrain streaming plugin.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::common_conditions::on_timer;

use super::control::{StreamingState, streaming_running};
use super::systems::{drain_streaming, setup_terrain_streamer, update_streaming};
use crate::config::TerrainConfig;
use crate::diagnostics::{StreamingMetrics, log_streaming_metrics, record_streaming_metrics};
use crate::settings::ChunkDescriptor;

const METRICS_LOG_INTERVAL_SECS: u64 = 5;

/// System sets for terrain streaming, run in order on `Update`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TerrainStreamingSet {
  /// Occupancy and cache state transitions.
  Update,
  /// Rate-limited chunk creation and disposal.
  Drain,
}

/// Streams procedural terrain around [`StreamingObserver`] entities.
///
/// When the descriptor has no material and `Assets<StandardMaterial>` is
/// available, a white vertex-colored material is created at startup.
///
/// [`StreamingObserver`]: super::StreamingObserver
#[derive(Clone, Debug, Default)]
pub struct TerrainStreamingPlugin {
  pub config: TerrainConfig,
  pub descriptor: ChunkDescriptor,
}

impl TerrainStreamingPlugin {
  pub fn new(config: TerrainConfig) -> Self {
    Self {
      config,
      descriptor: ChunkDescriptor::default(),
    }
  }

  pub fn with_descriptor(mut self, descriptor: ChunkDescriptor) -> Self {
    self.descriptor = descriptor;
    self
  }
}

/// Plugin inputs kept until the startup system builds the streamer.
#[derive(Resource, Clone, Debug)]
pub(crate) struct TerrainStreamingSetup {
  pub config: TerrainConfig,
  pub descriptor: ChunkDescriptor,
}

impl Plugin for TerrainStreamingPlugin {
  fn build(&self, app: &mut App) {
    app
      .insert_resource(TerrainStreamingSetup {
        config: self.config.clone(),
        descriptor: self.descriptor.clone(),
      })
      .init_resource::<StreamingState>()
      .init_resource::<StreamingMetrics>()
      .configure_sets(
        Update,
        (TerrainStreamingSet::Update, TerrainStreamingSet::Drain)
          .chain()
          .run_if(streaming_running),
      )
      .add_systems(Startup, setup_terrain_streamer)
      .add_systems(
        Update,
        (
          update_streaming.in_set(TerrainStreamingSet::Update),
          drain_streaming.in_set(TerrainStreamingSet::Drain),
          record_streaming_metrics
            .after(TerrainStreamingSet::Drain)
            .run_if(streaming_running),
          log_streaming_metrics
            .after(record_streaming_metrics)
            .run_if(on_timer(Duration::from_secs(METRICS_LOG_INTERVAL_SECS))),
        ),
      );

    #[cfg(feature = "visual-debug")]
    app.add_plugins(crate::visual_debug::VisualDebugPlugin);
  }
}
