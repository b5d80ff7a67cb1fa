//! Rate-limited work queues for chunk creation and disposal.
//!
//! The host drives the queue one step per frame. Each step performs at most
//! `creation_batch` builds and at most one disposal, which keeps a burst of
//! newly visible chunks from stalling a single frame.

use std::collections::{HashSet, VecDeque};

use crate::coords::ChunkPos;
use crate::primitives::Chunk;

/// Default number of chunk builds per step.
pub const DEFAULT_CREATION_BATCH: usize = 1;

/// FIFO creation and destruction queues.
#[derive(Debug)]
pub struct WorkQueue<H> {
  creation: VecDeque<ChunkPos>,
  in_creation: HashSet<ChunkPos>,
  destruction: VecDeque<Chunk<H>>,
  creation_batch: usize,
}

impl<H> WorkQueue<H> {
  /// Creates empty queues. A batch of zero is raised to one.
  pub fn new(creation_batch: usize) -> Self {
    Self {
      creation: VecDeque::new(),
      in_creation: HashSet::new(),
      destruction: VecDeque::new(),
      creation_batch: creation_batch.max(1),
    }
  }

  pub fn creation_batch(&self) -> usize {
    self.creation_batch
  }

  /// Queues a position for building. Returns false if already queued.
  pub fn submit(&mut self, pos: ChunkPos) -> bool {
    if !self.in_creation.insert(pos) {
      return false;
    }
    self.creation.push_back(pos);
    true
  }

  /// Returns true if `pos` is queued and not yet built.
  #[inline]
  pub fn is_queued(&self, pos: ChunkPos) -> bool {
    self.in_creation.contains(&pos)
  }

  /// Drops a queued position. Returns true if it was queued.
  pub fn cancel(&mut self, pos: ChunkPos) -> bool {
    if !self.in_creation.remove(&pos) {
      return false;
    }
    self.creation.retain(|p| *p != pos);
    true
  }

  /// Takes the oldest queued position.
  pub(crate) fn next_creation(&mut self) -> Option<ChunkPos> {
    let pos = self.creation.pop_front()?;
    self.in_creation.remove(&pos);
    Some(pos)
  }

  /// Iterates queued positions in build order.
  pub fn queued(&self) -> impl Iterator<Item = ChunkPos> + '_ {
    self.creation.iter().copied()
  }

  pub(crate) fn push_destruction(&mut self, chunk: Chunk<H>) {
    self.destruction.push_back(chunk);
  }

  pub(crate) fn next_destruction(&mut self) -> Option<Chunk<H>> {
    self.destruction.pop_front()
  }

  pub fn creation_len(&self) -> usize {
    self.creation.len()
  }

  pub fn destruction_len(&self) -> usize {
    self.destruction.len()
  }

  /// Returns true when neither queue holds work.
  pub fn is_idle(&self) -> bool {
    self.creation.is_empty() && self.destruction.is_empty()
  }
}

impl<H> Default for WorkQueue<H> {
  fn default() -> Self {
    Self::new(DEFAULT_CREATION_BATCH)
  }
}

/// What one scheduler step did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
  /// Positions built and inserted this step, in build order.
  pub built: Vec<ChunkPos>,
  /// Number of representations destroyed this step.
  pub disposed: usize,
}

impl StepReport {
  /// Returns true if the step did nothing.
  pub fn is_empty(&self) -> bool {
    self.built.is_empty() && self.disposed == 0
  }
}
