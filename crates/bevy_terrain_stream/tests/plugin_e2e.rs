//! Headless Bevy app driving the streaming plugin end to end.

use std::collections::HashSet;

use bevy::app::{TaskPoolOptions, TaskPoolPlugin};
use bevy::prelude::*;
use bevy_terrain_stream::{
  ChunkPos, RangeMetric, StreamingConfig, StreamingMetrics, StreamingObserver, StreamingState,
  TerrainChunk, TerrainConfig, TerrainRoot, TerrainStreamer, TerrainStreamingPlugin,
};

const LENGTH: f32 = 8.0;

struct TestHarness {
  app: App,
  observer: Entity,
}

impl TestHarness {
  fn new(config: TerrainConfig) -> Self {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins.set(TaskPoolPlugin {
      task_pool_options: TaskPoolOptions::with_num_threads(2),
    }));

    // TransformPlugin is needed for GlobalTransform propagation
    app.add_plugins(bevy::transform::TransformPlugin);
    app.add_plugins(bevy::asset::AssetPlugin::default());
    app.init_asset::<Mesh>();
    #[cfg(feature = "visual-debug")]
    app.add_plugins(bevy::gizmos::GizmoPlugin);

    app.add_plugins(TerrainStreamingPlugin::new(config));

    let observer = app
      .world_mut()
      .spawn((Transform::from_xyz(LENGTH * 0.5, 0.0, LENGTH * 0.5), StreamingObserver))
      .id();

    Self { app, observer }
  }

  fn run(&mut self, updates: usize) {
    for _ in 0..updates {
      self.app.update();
    }
  }

  fn move_observer_to(&mut self, pos: ChunkPos) {
    let target = pos.to_world(LENGTH) + Vec3::new(LENGTH * 0.5, 0.0, LENGTH * 0.5);
    let mut transform = self
      .app
      .world_mut()
      .get_mut::<Transform>(self.observer)
      .unwrap();
    transform.translation = target;
  }

  fn streamer(&self) -> &TerrainStreamer {
    self.app.world().resource::<TerrainStreamer>()
  }

  fn chunk_positions(&mut self) -> HashSet<ChunkPos> {
    let mut query = self.app.world_mut().query::<&TerrainChunk>();
    query.iter(self.app.world()).map(|chunk| chunk.pos).collect()
  }

  fn visibility(&self, pos: ChunkPos) -> Visibility {
    let entity = self.streamer().chunk_entity(pos).unwrap();
    *self.app.world().get::<Visibility>(entity).unwrap()
  }
}

fn small_config() -> TerrainConfig {
  TerrainConfig {
    detail_resolution: 4,
    chunk_length: LENGTH,
    chunk_height: 3.0,
    streaming: StreamingConfig {
      view_radius: 1,
      cache_radius: 2,
      creation_batch: 4,
      metric: RangeMetric::Euclidean,
      cancel_stale_creations: false,
    },
    ..Default::default()
  }
}

fn cross(center: ChunkPos) -> HashSet<ChunkPos> {
  RangeMetric::Euclidean.cells_in_range(center, 1).collect()
}

#[test]
fn spawns_chunks_around_observer() {
  let mut harness = TestHarness::new(small_config());
  harness.run(6);

  assert_eq!(harness.chunk_positions(), cross(ChunkPos::new(0, 0)));

  let root = harness.streamer().root();
  let world = harness.app.world_mut();
  assert!(world.get::<TerrainRoot>(root).is_some());

  let mut query = world.query::<(&TerrainChunk, &ChildOf, &Mesh3d, &Name)>();
  let mut count = 0;
  for (chunk, parent, mesh, name) in query.iter(world) {
    assert_eq!(parent.parent(), root);
    assert_eq!(name.as_str(), format!("Chunk {}", chunk.pos));
    let mesh = world.resource::<Assets<Mesh>>().get(&mesh.0).unwrap();
    assert_eq!(mesh.count_vertices(), 25);
    count += 1;
  }
  assert_eq!(count, 5);
}

#[test]
fn hides_then_despawns_chunks_as_observer_leaves() {
  let mut harness = TestHarness::new(small_config());
  harness.run(6);
  let origin = ChunkPos::new(0, 0);
  assert_eq!(harness.visibility(origin), Visibility::Inherited);

  harness.move_observer_to(ChunkPos::new(2, 0));
  harness.run(6);
  assert!(harness.streamer().streamer().cache().is_loaded(origin));
  assert_eq!(harness.visibility(origin), Visibility::Hidden);

  harness.move_observer_to(ChunkPos::new(40, 40));
  harness.run(20);
  assert_eq!(harness.chunk_positions(), cross(ChunkPos::new(40, 40)));
  assert!(harness.streamer().chunk_entity(origin).is_none());
}

#[test]
fn invalid_config_halts_streaming() {
  let config = TerrainConfig {
    detail_resolution: 0,
    ..small_config()
  };
  let mut harness = TestHarness::new(config);
  harness.run(3);

  assert_eq!(*harness.app.world().resource::<StreamingState>(), StreamingState::Halted);
  assert!(harness.app.world().get_resource::<TerrainStreamer>().is_none());
  assert!(harness.chunk_positions().is_empty());
}

#[test]
fn missing_root_is_retried_without_halting() {
  let mut harness = TestHarness::new(small_config());
  // Run startup with nobody observing, then pull the root out from under the
  // streamer before any chunk is requested.
  harness.app.world_mut().entity_mut(harness.observer).remove::<StreamingObserver>();
  harness.run(1);
  let root = harness.streamer().root();
  harness.app.world_mut().despawn(root);
  harness.app.world_mut().entity_mut(harness.observer).insert(StreamingObserver);

  harness.run(5);
  assert_eq!(*harness.app.world().resource::<StreamingState>(), StreamingState::Running);
  assert_eq!(harness.streamer().streamer().cache().loaded_len(), 0);
  assert!(harness.chunk_positions().is_empty());
}

#[test]
fn halting_stops_streaming_updates() {
  let mut harness = TestHarness::new(small_config());
  harness.run(6);
  harness.app.world_mut().resource_mut::<StreamingState>().halt();

  harness.move_observer_to(ChunkPos::new(30, 0));
  harness.run(6);
  assert_eq!(harness.chunk_positions(), cross(ChunkPos::new(0, 0)));
}

#[test]
fn metrics_track_cache_sizes() {
  let mut harness = TestHarness::new(small_config());
  harness.run(6);
  let metrics = harness.app.world().resource::<StreamingMetrics>();
  assert_eq!(metrics.active.current(), Some(5.0));
  assert_eq!(metrics.loaded.current(), Some(5.0));
  assert_eq!(metrics.queued.current(), Some(0.0));
  assert!(metrics.built.sum() >= 5.0);
}
