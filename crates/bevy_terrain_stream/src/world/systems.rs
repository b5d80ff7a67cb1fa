//! Streaming systems.

use bevy::prelude::*;

use super::control::StreamingState;
use super::plugin::TerrainStreamingSetup;
use super::{BevyChunkSpawner, StreamingObserver, TerrainRoot, TerrainStreamer};
use crate::error::StreamError;
use crate::streaming::ChunkStreamer;

/// System: spawns the terrain root and creates the streamer.
///
/// Invalid configuration halts streaming instead of panicking.
pub(crate) fn setup_terrain_streamer(
  mut commands: Commands,
  setup: Res<TerrainStreamingSetup>,
  mut state: ResMut<StreamingState>,
  materials: Option<ResMut<Assets<StandardMaterial>>>,
) {
  let root = commands
    .spawn((
      Name::new("Terrain"),
      TerrainRoot,
      Transform::default(),
      Visibility::default(),
    ))
    .id();

  let mut descriptor = setup.descriptor.clone();
  if descriptor.material.is_none()
    && let Some(mut materials) = materials
  {
    descriptor.material = Some(materials.add(StandardMaterial {
      base_color: Color::WHITE,
      perceptual_roughness: 0.9,
      ..default()
    }));
  }

  let streamer: Result<ChunkStreamer<Entity>, StreamError> = setup
    .config
    .chunk_settings(descriptor, Some(root))
    .map_err(Into::into)
    .and_then(|settings| ChunkStreamer::new(settings, setup.config.streaming.clone()));

  match streamer {
    Ok(streamer) => {
      info!(
        "Terrain streaming ready: {} quads per chunk, view radius {}, cache radius {}",
        setup.config.detail_resolution,
        streamer.config().view_radius,
        streamer.config().cache_radius
      );
      commands.insert_resource(TerrainStreamer::new(streamer, root));
    }
    Err(err) => {
      error!("Terrain streaming halted: {err}");
      state.halt();
    }
  }
}

/// System: recomputes occupancy from observers and updates the cache.
#[cfg_attr(feature = "tracy", tracing::instrument(skip_all))]
pub(crate) fn update_streaming(
  mut commands: Commands,
  mut meshes: ResMut<Assets<Mesh>>,
  observers: Query<&GlobalTransform, With<StreamingObserver>>,
  mut terrain: ResMut<TerrainStreamer>,
) {
  let positions: Vec<Vec3> = observers.iter().map(GlobalTransform::translation).collect();
  let mut spawner = BevyChunkSpawner::new(&mut commands, &mut meshes);
  let report = terrain.streamer.update(&positions, &mut spawner);
  terrain.last_tick = report;
}

/// System: performs one rate-limited build/disposal step.
///
/// Instantiation failures are retried on a later frame. Configuration
/// errors halt streaming.
#[cfg_attr(feature = "tracy", tracing::instrument(skip_all))]
pub(crate) fn drain_streaming(
  mut commands: Commands,
  mut meshes: ResMut<Assets<Mesh>>,
  mut terrain: ResMut<TerrainStreamer>,
  mut state: ResMut<StreamingState>,
) {
  let mut spawner = BevyChunkSpawner::new(&mut commands, &mut meshes);
  let result = terrain.streamer.step(&mut spawner);
  match result {
    Ok(step) => terrain.last_step = step,
    Err(failure) => {
      if failure.is_retryable() {
        warn!("{failure}, retrying");
      } else {
        error!("Terrain streaming halted: {failure}");
        state.halt();
      }
      terrain.last_step = failure.report;
    }
  }
}
