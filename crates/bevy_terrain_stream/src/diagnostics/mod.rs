//! Streaming metrics.

mod time_series;

use bevy::prelude::*;
pub use time_series::TimeSeries;

use crate::world::TerrainStreamer;

const SAMPLE_CAPACITY: usize = 300;

/// Per-frame streaming counters over the last few seconds.
#[derive(Resource, Debug, Clone)]
pub struct StreamingMetrics {
  /// Visible chunks.
  pub active: TimeSeries,
  /// Loaded chunks, visible or hidden.
  pub loaded: TimeSeries,
  /// Positions waiting to be built.
  pub queued: TimeSeries,
  /// Chunks built this frame.
  pub built: TimeSeries,
  /// Chunks destroyed this frame.
  pub disposed: TimeSeries,
}

impl Default for StreamingMetrics {
  fn default() -> Self {
    Self {
      active: TimeSeries::new(SAMPLE_CAPACITY),
      loaded: TimeSeries::new(SAMPLE_CAPACITY),
      queued: TimeSeries::new(SAMPLE_CAPACITY),
      built: TimeSeries::new(SAMPLE_CAPACITY),
      disposed: TimeSeries::new(SAMPLE_CAPACITY),
    }
  }
}

impl StreamingMetrics {
  /// One-line summary of the retained window.
  pub fn summary(&mut self) -> String {
    format!(
      "active {:.0} ({:.0}..{:.0}), loaded {:.0} ({:.0}..{:.0}), queued avg {:.1}, built {:.0}, disposed {:.0}",
      self.active.current().unwrap_or(0.0),
      self.active.min(),
      self.active.max(),
      self.loaded.current().unwrap_or(0.0),
      self.loaded.min(),
      self.loaded.max(),
      self.queued.avg(),
      self.built.sum(),
      self.disposed.sum(),
    )
  }
}

pub(crate) fn record_streaming_metrics(terrain: Res<TerrainStreamer>, mut metrics: ResMut<StreamingMetrics>) {
  let cache = terrain.streamer().cache();
  metrics.active.push(cache.active_len() as f32);
  metrics.loaded.push(cache.loaded_len() as f32);
  metrics.queued.push(cache.pending_len() as f32);
  metrics.built.push(terrain.last_step().built.len() as f32);
  metrics.disposed.push(terrain.last_step().disposed as f32);
}

/// System: logs the metrics summary. Run on a timer.
pub(crate) fn log_streaming_metrics(mut metrics: ResMut<StreamingMetrics>) {
  if metrics.active.is_empty() {
    return;
  }
  let summary = metrics.summary();
  debug!("Terrain streaming: {summary}");
}
