//! Observer-driven streaming scenarios.

mod common;

use std::collections::HashSet;

use bevy::math::Vec3;
use bevy_terrain_stream::{ChunkPos, ChunkSettings, ChunkStreamer, RangeMetric, StreamingConfig};
use common::MockService;

const LENGTH: f32 = 10.0;

fn streamer(view: u32, cache: u32, metric: RangeMetric) -> ChunkStreamer<u32> {
  let config = StreamingConfig {
    view_radius: view,
    cache_radius: cache,
    creation_batch: 64,
    metric,
    ..Default::default()
  };
  ChunkStreamer::new(ChunkSettings::new(1, LENGTH, 1.0), config).unwrap()
}

fn center_of(pos: ChunkPos) -> Vec3 {
  pos.to_world(LENGTH) + Vec3::new(LENGTH * 0.5, 0.0, LENGTH * 0.5)
}

fn settle(streamer: &mut ChunkStreamer<u32>, service: &mut MockService) {
  while !streamer.is_settled() {
    streamer.step(service).unwrap();
  }
}

#[test]
fn single_observer_requests_view_and_evicts_far_chunks() {
  let mut streamer = streamer(2, 4, RangeMetric::Euclidean);
  let mut service = MockService::default();
  let far = ChunkPos::new(5, 0);

  streamer.update(&[center_of(far)], &mut service);
  settle(&mut streamer, &mut service);
  assert!(streamer.cache().is_active(far));

  let report = streamer.update(&[center_of(ChunkPos::new(0, 0))], &mut service);

  let expected: HashSet<ChunkPos> = RangeMetric::Euclidean.cells_in_range(ChunkPos::new(0, 0), 2).collect();
  let pending: HashSet<ChunkPos> = streamer.cache().pending_positions().collect();
  assert_eq!(pending, expected);
  assert_eq!(report.requested, 13);

  assert!(!streamer.cache().is_loaded(far), "chunk at distance 5 should be evicted");
  assert!(report.evicted >= 1);
  // Distance 3 is outside view but inside cache: hidden, kept.
  assert!(streamer.cache().is_loaded(ChunkPos::new(3, 0)));
  assert!(!streamer.cache().is_active(ChunkPos::new(3, 0)));
}

#[test]
fn returning_observer_promotes_without_rebuild() {
  let mut streamer = streamer(1, 3, RangeMetric::Euclidean);
  let mut service = MockService::default();
  let origin = ChunkPos::new(0, 0);

  streamer.update(&[center_of(origin)], &mut service);
  settle(&mut streamer, &mut service);
  let built = service.instantiated.len();

  streamer.update(&[center_of(ChunkPos::new(2, 0))], &mut service);
  settle(&mut streamer, &mut service);
  assert!(streamer.cache().is_loaded(origin) && !streamer.cache().is_active(origin));

  let built_second = service.instantiated.len();
  let report = streamer.update(&[center_of(origin)], &mut service);
  assert!(report.promoted >= 1);
  assert!(streamer.cache().is_active(origin));
  settle(&mut streamer, &mut service);
  assert_eq!(service.instantiated.len(), built_second);
  assert!(built_second > built);
}

#[test]
fn metric_is_shared_by_retention_and_activation() {
  for metric in [RangeMetric::Euclidean, RangeMetric::Manhattan, RangeMetric::Chebyshev] {
    let mut streamer = streamer(2, 2, metric);
    let mut service = MockService::default();

    streamer.update(&[center_of(ChunkPos::new(0, 0))], &mut service);
    settle(&mut streamer, &mut service);
    // A second tick from the same place must not evict anything it just
    // activated.
    let report = streamer.update(&[center_of(ChunkPos::new(0, 0))], &mut service);
    assert_eq!(report.evicted, 0, "{metric:?}");
    assert_eq!(report.deactivated, 0, "{metric:?}");
    assert_eq!(report.requested, 0, "{metric:?}");
    let expected = metric.cells_in_range(ChunkPos::new(0, 0), 2).count();
    assert_eq!(streamer.cache().active_len(), expected, "{metric:?}");
  }
}

#[test]
fn overlapping_observers_share_chunks() {
  let mut streamer = streamer(1, 2, RangeMetric::Chebyshev);
  let mut service = MockService::default();

  let a = center_of(ChunkPos::new(0, 0));
  let b = center_of(ChunkPos::new(1, 0));
  let report = streamer.update(&[a, b, a], &mut service);
  assert_eq!(report.occupied, 2);
  // Two 3x3 squares overlapping in a 2x3 strip.
  assert_eq!(report.requested, 12);
  settle(&mut streamer, &mut service);
  assert_eq!(service.live(), 12);
}

#[test]
fn negative_coordinates_floor_into_chunks() {
  let mut streamer = streamer(0, 0, RangeMetric::Euclidean);
  let mut service = MockService::default();
  streamer.update(&[Vec3::new(-0.01, 3.0, -LENGTH - 0.01)], &mut service);
  assert_eq!(streamer.occupied(), &[ChunkPos::new(-1, -2)]);
}

#[test]
fn view_radius_larger_than_cache_is_clamped() {
  let streamer = streamer(6, 2, RangeMetric::Euclidean);
  assert_eq!(streamer.config().view_radius, 2);
  assert_eq!(streamer.config().cache_radius, 2);
}

#[test]
fn evicted_then_rerequested_is_rebuilt() {
  let mut streamer = streamer(0, 0, RangeMetric::Euclidean);
  let mut service = MockService::default();
  let a = ChunkPos::new(0, 0);

  streamer.update(&[center_of(a)], &mut service);
  settle(&mut streamer, &mut service);
  streamer.update(&[center_of(ChunkPos::new(9, 9))], &mut service);
  settle(&mut streamer, &mut service);
  streamer.update(&[center_of(a)], &mut service);
  settle(&mut streamer, &mut service);

  assert_eq!(service.instantiated.iter().filter(|p| **p == a).count(), 2);
  assert_eq!(service.destroyed.len(), 2);
}
