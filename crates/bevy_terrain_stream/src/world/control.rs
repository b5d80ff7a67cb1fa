//! Streaming run state.

use bevy::prelude::*;

/// Whether streaming systems run.
///
/// The plugin sets [`Halted`](StreamingState::Halted) when configuration is
/// invalid. Hosts may also pause streaming themselves, e.g. during a loading
/// screen:
///
/// ```ignore
/// fn pause_streaming(mut state: ResMut<StreamingState>) {
///     state.halt();
/// }
/// ```
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StreamingState {
  #[default]
  Running,
  Halted,
}

impl StreamingState {
  pub fn is_running(&self) -> bool {
    *self == Self::Running
  }

  pub fn halt(&mut self) {
    *self = Self::Halted;
  }

  pub fn resume(&mut self) {
    *self = Self::Running;
  }
}

/// Run condition: streaming is running and a streamer exists.
pub(crate) fn streaming_running(
  state: Res<StreamingState>,
  streamer: Option<Res<super::TerrainStreamer>>,
) -> bool {
  state.is_running() && streamer.is_some()
}
