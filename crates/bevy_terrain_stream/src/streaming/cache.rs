//! Three-tier chunk cache.
//!
//! Every position is in exactly one of three states:
//!
//! - **active**: loaded and visible,
//! - **loaded**: built but hidden, kept so it can be shown again without a
//!   rebuild,
//! - **absent**: not loaded, possibly pending creation.
//!
//! The cache exclusively owns every [`Chunk`]. Representation handles move
//! in through the creation drain and out through the destruction drain.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::coords::ChunkPos;
use crate::error::StreamError;
use crate::instantiation::{ChunkInstance, InstantiationService};
use crate::meshing::build_terrain_mesh;
use crate::primitives::Chunk;
use crate::scheduling::WorkQueue;
use crate::settings::ChunkSettings;

/// Outcome of [`ChunkCache::activate`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Activation {
  /// The position was already active.
  AlreadyActive,
  /// A loaded-inactive chunk was made visible again.
  Promoted,
  /// The position was absent; a build was requested (or already pending).
  Requested,
}

/// Owns loaded chunks and the pending creation set.
pub struct ChunkCache<H> {
  settings: Arc<ChunkSettings>,
  loaded: HashMap<ChunkPos, Chunk<H>>,
  active: HashSet<ChunkPos>,
  pending: Vec<ChunkPos>,
  pending_set: HashSet<ChunkPos>,
  queue: WorkQueue<H>,
}

impl<H> ChunkCache<H> {
  pub fn new(settings: Arc<ChunkSettings>, creation_batch: usize) -> Self {
    Self {
      settings,
      loaded: HashMap::new(),
      active: HashSet::new(),
      pending: Vec::new(),
      pending_set: HashSet::new(),
      queue: WorkQueue::new(creation_batch),
    }
  }

  pub fn settings(&self) -> &Arc<ChunkSettings> {
    &self.settings
  }

  /// Requests a build for `pos`.
  ///
  /// No-op (returns false) if the position is pending, queued or loaded.
  pub fn request_create(&mut self, pos: ChunkPos) -> bool {
    if self.pending_set.contains(&pos) || self.queue.is_queued(pos) || self.loaded.contains_key(&pos) {
      return false;
    }
    self.pending_set.insert(pos);
    self.pending.push(pos);
    true
  }

  /// Makes `pos` active, promoting or requesting as needed.
  pub fn activate<S>(&mut self, pos: ChunkPos, service: &mut S) -> Activation
  where
    S: InstantiationService<Handle = H>,
  {
    if self.active.contains(&pos) {
      return Activation::AlreadyActive;
    }
    if let Some(chunk) = self.loaded.get(&pos) {
      service.set_visible(chunk.representation(), true);
      self.active.insert(pos);
      return Activation::Promoted;
    }
    self.request_create(pos);
    Activation::Requested
  }

  /// Hides an active chunk, keeping it loaded.
  ///
  /// Returns false if `pos` was not active.
  pub fn deactivate<S>(&mut self, pos: ChunkPos, service: &mut S) -> bool
  where
    S: InstantiationService<Handle = H>,
  {
    if !self.active.remove(&pos) {
      return false;
    }
    if let Some(chunk) = self.loaded.get(&pos) {
      service.set_visible(chunk.representation(), false);
    }
    true
  }

  /// Detaches a chunk from the cache without destroying it.
  ///
  /// A detached chunk is absent, so its representation is hidden here. The
  /// caller decides what happens to the returned chunk, usually
  /// [`schedule_destruction`](Self::schedule_destruction).
  pub fn remove<S>(&mut self, pos: ChunkPos, service: &mut S) -> Option<Chunk<H>>
  where
    S: InstantiationService<Handle = H>,
  {
    let chunk = self.loaded.remove(&pos)?;
    if self.active.remove(&pos) {
      service.set_visible(chunk.representation(), false);
    }
    Some(chunk)
  }

  /// Queues a detached chunk for disposal by the destruction drain.
  pub fn schedule_destruction(&mut self, chunk: Chunk<H>) {
    self.queue.push_destruction(chunk);
  }

  /// Drops a pending or queued creation. Returns true if one was dropped.
  pub fn cancel_creation(&mut self, pos: ChunkPos) -> bool {
    if self.pending_set.remove(&pos) {
      self.pending.retain(|p| *p != pos);
      return true;
    }
    self.queue.cancel(pos)
  }

  /// Moves pending positions into the creation queue, in request order.
  pub fn submit_pending(&mut self) -> usize {
    let count = self.pending.len();
    for pos in self.pending.drain(..) {
      self.queue.submit(pos);
    }
    self.pending_set.clear();
    count
  }

  /// Builds and instantiates up to `creation_batch` queued chunks, pushing
  /// each built position onto `built`.
  ///
  /// Built chunks become active and loaded. The batch stops at the first
  /// failure: the failed position is left absent and out of the queue so a
  /// later request retries, chunks built earlier stay inserted and listed in
  /// `built`, and later positions stay queued.
  pub fn drain_creation<S>(&mut self, service: &mut S, built: &mut Vec<ChunkPos>) -> Result<(), StreamError>
  where
    S: InstantiationService<Handle = H>,
  {
    for _ in 0..self.queue.creation_batch() {
      let Some(pos) = self.queue.next_creation() else {
        break;
      };

      let mesh = build_terrain_mesh(pos, &self.settings)?;
      let instance = ChunkInstance {
        pos,
        translation: pos.to_world(self.settings.chunk_length),
        mesh,
      };
      let handle = service
        .instantiate(&self.settings.descriptor, self.settings.parent, instance)
        .map_err(|source| StreamError::Instantiation { pos, source })?;

      self.loaded.insert(pos, Chunk::new(pos, handle));
      self.active.insert(pos);
      log::trace!("Created chunk {}", pos);
      built.push(pos);
    }
    Ok(())
  }

  /// Destroys one detached chunk's representation. Returns true if one was
  /// destroyed.
  pub fn drain_destruction<S>(&mut self, service: &mut S) -> bool
  where
    S: InstantiationService<Handle = H>,
  {
    let Some(chunk) = self.queue.next_destruction() else {
      return false;
    };
    log::trace!("Destroying chunk {}", chunk.pos());
    service.destroy(chunk.into_representation());
    true
  }

  #[inline]
  pub fn is_active(&self, pos: ChunkPos) -> bool {
    self.active.contains(&pos)
  }

  #[inline]
  pub fn is_loaded(&self, pos: ChunkPos) -> bool {
    self.loaded.contains_key(&pos)
  }

  /// Returns true if `pos` is pending submission or queued for building.
  pub fn is_pending(&self, pos: ChunkPos) -> bool {
    self.pending_set.contains(&pos) || self.queue.is_queued(pos)
  }

  pub fn get(&self, pos: ChunkPos) -> Option<&Chunk<H>> {
    self.loaded.get(&pos)
  }

  pub fn active_positions(&self) -> impl Iterator<Item = ChunkPos> + '_ {
    self.active.iter().copied()
  }

  pub fn loaded_positions(&self) -> impl Iterator<Item = ChunkPos> + '_ {
    self.loaded.keys().copied()
  }

  /// Pending and queued positions, oldest first.
  pub fn pending_positions(&self) -> impl Iterator<Item = ChunkPos> + '_ {
    self.queue.queued().chain(self.pending.iter().copied())
  }

  pub fn active_len(&self) -> usize {
    self.active.len()
  }

  pub fn loaded_len(&self) -> usize {
    self.loaded.len()
  }

  pub fn pending_len(&self) -> usize {
    self.pending.len() + self.queue.creation_len()
  }

  pub fn queue(&self) -> &WorkQueue<H> {
    &self.queue
  }
}
