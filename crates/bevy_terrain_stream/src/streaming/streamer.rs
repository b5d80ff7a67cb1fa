//! Observer-driven streaming controller.

use std::sync::Arc;

use bevy::math::Vec3;

use super::cache::{Activation, ChunkCache};
use crate::config::StreamingConfig;
use crate::coords::ChunkPos;
use crate::error::{StepError, StreamError};
use crate::instantiation::InstantiationService;
use crate::scheduling::StepReport;
use crate::settings::ChunkSettings;

/// Summary of one [`ChunkStreamer::update`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
  /// Distinct chunks containing at least one observer.
  pub occupied: usize,
  /// Loaded-inactive chunks made visible again.
  pub promoted: usize,
  /// Absent positions newly requested for creation.
  pub requested: usize,
  /// Active chunks hidden because they left view radius.
  pub deactivated: usize,
  /// Chunks detached and queued for destruction.
  pub evicted: usize,
  /// Queued creations dropped by `cancel_stale_creations`.
  pub cancelled: usize,
  /// Positions handed to the creation queue.
  pub submitted: usize,
}

impl TickReport {
  /// Returns true if the tick changed no cache state.
  pub fn is_quiet(&self) -> bool {
    self.promoted == 0
      && self.requested == 0
      && self.deactivated == 0
      && self.evicted == 0
      && self.cancelled == 0
      && self.submitted == 0
  }
}

/// Keeps chunks resident around a set of moving observers.
///
/// Call [`update`](Self::update) once per frame with the observer positions,
/// then [`step`](Self::step) to perform the rate-limited build and disposal
/// work.
pub struct ChunkStreamer<H> {
  cache: ChunkCache<H>,
  config: StreamingConfig,
  occupied: Vec<ChunkPos>,
}

impl<H> ChunkStreamer<H> {
  /// Creates a streamer.
  ///
  /// A view radius larger than the cache radius is clamped down.
  ///
  /// # Errors
  /// Returns [`StreamError::InvalidConfiguration`] if `settings` fail
  /// validation.
  pub fn new(settings: ChunkSettings, mut config: StreamingConfig) -> Result<Self, StreamError> {
    settings.validate()?;
    if config.view_radius > config.cache_radius {
      log::warn!(
        "View radius {} exceeds cache radius {}, clamping",
        config.view_radius,
        config.cache_radius
      );
      config.view_radius = config.cache_radius;
    }

    Ok(Self {
      cache: ChunkCache::new(Arc::new(settings), config.creation_batch),
      config,
      occupied: Vec::new(),
    })
  }

  pub fn cache(&self) -> &ChunkCache<H> {
    &self.cache
  }

  pub fn config(&self) -> &StreamingConfig {
    &self.config
  }

  pub fn settings(&self) -> &ChunkSettings {
    self.cache.settings()
  }

  /// Occupied positions from the last update, in first-seen order.
  pub fn occupied(&self) -> &[ChunkPos] {
    &self.occupied
  }

  /// Recomputes occupancy and drives cache state transitions.
  ///
  /// Eviction and demotion run before activation. A chunk evicted here and
  /// re-requested in the same call is rebuilt from scratch.
  pub fn update<S>(&mut self, observers: &[Vec3], service: &mut S) -> TickReport
  where
    S: InstantiationService<Handle = H>,
  {
    self.collect_occupied(observers);
    let mut report = TickReport {
      occupied: self.occupied.len(),
      ..Default::default()
    };

    self.evict_and_demote(service, &mut report);
    if self.config.cancel_stale_creations {
      self.cancel_stale(&mut report);
    }
    self.activate_in_view(service, &mut report);
    report.submitted = self.cache.submit_pending();

    if !report.is_quiet() {
      log::debug!(
        "Streaming tick: {} occupied, +{} requested, {} promoted, {} hidden, {} evicted",
        report.occupied,
        report.requested,
        report.promoted,
        report.deactivated,
        report.evicted
      );
    }
    report
  }

  /// Performs one scheduler step: up to `creation_batch` builds and at most
  /// one disposal.
  ///
  /// Disposal runs even when a build fails. The error carries the partial
  /// report, so builds completed before the failure are still counted.
  pub fn step<S>(&mut self, service: &mut S) -> Result<StepReport, StepError>
  where
    S: InstantiationService<Handle = H>,
  {
    let mut report = StepReport::default();
    let result = self.cache.drain_creation(service, &mut report.built);
    report.disposed = usize::from(self.cache.drain_destruction(service));
    match result {
      Ok(()) => Ok(report),
      Err(error) => Err(StepError { report, error }),
    }
  }

  /// Runs [`update`](Self::update) followed by one [`step`](Self::step).
  pub fn tick<S>(&mut self, observers: &[Vec3], service: &mut S) -> Result<(TickReport, StepReport), StepError>
  where
    S: InstantiationService<Handle = H>,
  {
    let report = self.update(observers, service);
    let step = self.step(service)?;
    Ok((report, step))
  }

  /// Returns true when no creation or destruction work is outstanding.
  pub fn is_settled(&self) -> bool {
    self.cache.pending_len() == 0 && self.cache.queue().is_idle()
  }

  fn collect_occupied(&mut self, observers: &[Vec3]) {
    let length = self.cache.settings().chunk_length;
    self.occupied.clear();
    for observer in observers {
      let pos = ChunkPos::from_world(*observer, length);
      if !self.occupied.contains(&pos) {
        self.occupied.push(pos);
      }
    }
  }

  fn within(&self, pos: ChunkPos, radius: u32) -> bool {
    self
      .occupied
      .iter()
      .any(|center| self.config.metric.in_range(*center, pos, radius))
  }

  fn evict_and_demote<S>(&mut self, service: &mut S, report: &mut TickReport)
  where
    S: InstantiationService<Handle = H>,
  {
    let mut loaded: Vec<ChunkPos> = self.cache.loaded_positions().collect();
    loaded.sort_unstable();

    for pos in loaded {
      if self.within(pos, self.config.view_radius) {
        continue;
      }
      if self.within(pos, self.config.cache_radius) {
        if self.cache.deactivate(pos, service) {
          report.deactivated += 1;
        }
      } else if let Some(chunk) = self.cache.remove(pos, service) {
        self.cache.schedule_destruction(chunk);
        report.evicted += 1;
      }
    }
  }

  fn cancel_stale(&mut self, report: &mut TickReport) {
    let stale: Vec<ChunkPos> = self
      .cache
      .pending_positions()
      .filter(|pos| !self.within(*pos, self.config.cache_radius))
      .collect();
    for pos in stale {
      if self.cache.cancel_creation(pos) {
        report.cancelled += 1;
      }
    }
  }

  fn activate_in_view<S>(&mut self, service: &mut S, report: &mut TickReport)
  where
    S: InstantiationService<Handle = H>,
  {
    let metric = self.config.metric;
    let radius = self.config.view_radius;
    for i in 0..self.occupied.len() {
      let center = self.occupied[i];
      for pos in metric.cells_in_range(center, radius) {
        let was_pending = self.cache.is_pending(pos);
        match self.cache.activate(pos, service) {
          Activation::Promoted => report.promoted += 1,
          Activation::Requested if !was_pending => report.requested += 1,
          _ => {}
        }
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use bevy::prelude::Entity;

  use super::*;
  use crate::coords::RangeMetric;
  use crate::error::InstantiationError;
  use crate::instantiation::ChunkInstance;
  use crate::settings::ChunkDescriptor;

  #[derive(Default)]
  struct Counter {
    next: u32,
    visible: HashMap<u32, bool>,
  }

  impl InstantiationService for Counter {
    type Handle = u32;

    fn instantiate(
      &mut self,
      _descriptor: &ChunkDescriptor,
      _parent: Option<Entity>,
      _instance: ChunkInstance,
    ) -> Result<u32, InstantiationError> {
      self.next += 1;
      self.visible.insert(self.next, true);
      Ok(self.next)
    }

    fn set_visible(&mut self, handle: &u32, visible: bool) {
      self.visible.insert(*handle, visible);
    }

    fn destroy(&mut self, handle: u32) {
      self.visible.remove(&handle);
    }
  }

  fn config(view: u32, cache: u32) -> StreamingConfig {
    StreamingConfig {
      view_radius: view,
      cache_radius: cache,
      ..Default::default()
    }
  }

  #[test]
  fn view_radius_is_clamped() {
    let streamer = ChunkStreamer::<u32>::new(ChunkSettings::new(1, 1.0, 1.0), config(9, 3)).unwrap();
    assert_eq!(streamer.config().view_radius, 3);
  }

  #[test]
  fn invalid_settings_are_rejected() {
    let result = ChunkStreamer::<u32>::new(ChunkSettings::new(0, 1.0, 1.0), config(1, 1));
    assert!(matches!(result, Err(StreamError::InvalidConfiguration(_))));
  }

  #[test]
  fn occupied_is_deduplicated_in_first_seen_order() {
    let mut streamer = ChunkStreamer::new(ChunkSettings::new(1, 10.0, 1.0), config(0, 0)).unwrap();
    let mut service = Counter::default();
    streamer.update(
      &[
        Vec3::new(15.0, 0.0, 1.0),
        Vec3::new(-0.5, 0.0, 0.0),
        Vec3::new(19.0, 5.0, 9.0),
      ],
      &mut service,
    );
    assert_eq!(streamer.occupied(), &[ChunkPos::new(1, 0), ChunkPos::new(-1, 0)]);
  }

  #[test]
  fn moving_away_demotes_then_evicts() {
    let mut streamer = ChunkStreamer::new(ChunkSettings::new(1, 1.0, 1.0), config(0, 1)).unwrap();
    let mut service = Counter::default();
    let origin = ChunkPos::new(0, 0);

    streamer.tick(&[Vec3::new(0.5, 0.0, 0.5)], &mut service).unwrap();
    assert!(streamer.cache().is_active(origin));

    let report = streamer.update(&[Vec3::new(1.5, 0.0, 0.5)], &mut service);
    assert_eq!(report.deactivated, 1);
    assert!(streamer.cache().is_loaded(origin) && !streamer.cache().is_active(origin));

    let report = streamer.update(&[Vec3::new(3.5, 0.0, 0.5)], &mut service);
    assert_eq!(report.evicted, 1);
    assert!(!streamer.cache().is_loaded(origin));
  }

  #[test]
  fn evicting_an_active_chunk_hides_it_immediately() {
    let mut streamer = ChunkStreamer::new(ChunkSettings::new(1, 1.0, 1.0), config(0, 0)).unwrap();
    let mut service = Counter::default();
    streamer.tick(&[Vec3::new(0.5, 0.0, 0.5)], &mut service).unwrap();
    let handle = *streamer.cache().get(ChunkPos::new(0, 0)).unwrap().representation();

    let report = streamer.update(&[Vec3::new(9.5, 0.0, 0.5)], &mut service);
    assert_eq!(report.evicted, 1);
    assert_eq!(service.visible.get(&handle), Some(&false));
  }

  #[test]
  fn observer_past_grid_edge_requests_only_valid_cells() {
    let mut cfg = config(1, 1);
    cfg.metric = RangeMetric::Chebyshev;
    let mut streamer = ChunkStreamer::new(ChunkSettings::new(1, 0.001, 1.0), cfg).unwrap();
    let mut service = Counter::default();

    let report = streamer.update(&[Vec3::new(2.2e6, 0.0, 0.0)], &mut service);
    assert_eq!(streamer.occupied()[0].x, i32::MAX);
    assert_eq!(report.requested, 6);
  }

  #[test]
  fn stale_creations_are_cancelled_when_enabled() {
    let mut cfg = config(1, 1);
    cfg.metric = RangeMetric::Chebyshev;
    cfg.cancel_stale_creations = true;
    let mut streamer = ChunkStreamer::new(ChunkSettings::new(1, 1.0, 1.0), cfg).unwrap();
    let mut service = Counter::default();

    streamer.update(&[Vec3::ZERO], &mut service);
    assert_eq!(streamer.cache().pending_len(), 9);

    let report = streamer.update(&[Vec3::new(100.0, 0.0, 0.0)], &mut service);
    assert_eq!(report.cancelled, 9);
    assert_eq!(streamer.cache().pending_len(), 9);
    assert!(!streamer.cache().is_pending(ChunkPos::new(0, 0)));
  }

  #[test]
  fn queued_creations_finish_by_default() {
    let mut streamer = ChunkStreamer::new(ChunkSettings::new(1, 1.0, 1.0), config(0, 0)).unwrap();
    let mut service = Counter::default();
    streamer.update(&[Vec3::ZERO], &mut service);
    streamer.update(&[Vec3::new(100.0, 0.0, 0.0)], &mut service);
    assert!(streamer.cache().is_pending(ChunkPos::new(0, 0)));
  }
}
