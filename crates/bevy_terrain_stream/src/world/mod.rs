//! Bevy host for the terrain streamer.
//!
//! The plugin owns a [`TerrainStreamer`] resource, feeds it the positions of
//! every [`StreamingObserver`] each frame and steps its work queue through a
//! [`BevyChunkSpawner`].

pub mod control;
pub mod plugin;
mod spawner;
pub(crate) mod systems;

use bevy::prelude::*;
pub use spawner::BevyChunkSpawner;

use crate::coords::ChunkPos;
use crate::scheduling::StepReport;
use crate::streaming::{ChunkStreamer, TickReport};

/// Marker for entities whose position drives streaming.
///
/// Any number of observers is supported; chunks stay resident around all of
/// them.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct StreamingObserver;

/// Parent entity of every spawned chunk.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct TerrainRoot;

/// Marker on spawned chunk entities.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerrainChunk {
  pub pos: ChunkPos,
}

/// The streamer driving this app's terrain.
#[derive(Resource)]
pub struct TerrainStreamer {
  streamer: ChunkStreamer<Entity>,
  root: Entity,
  last_tick: TickReport,
  last_step: StepReport,
}

impl TerrainStreamer {
  pub(crate) fn new(streamer: ChunkStreamer<Entity>, root: Entity) -> Self {
    Self {
      streamer,
      root,
      last_tick: TickReport::default(),
      last_step: StepReport::default(),
    }
  }

  pub fn streamer(&self) -> &ChunkStreamer<Entity> {
    &self.streamer
  }

  /// The [`TerrainRoot`] entity chunks are spawned under.
  pub fn root(&self) -> Entity {
    self.root
  }

  /// Report of the most recent streaming update.
  pub fn last_tick(&self) -> &TickReport {
    &self.last_tick
  }

  /// Report of the most recent scheduler step.
  pub fn last_step(&self) -> &StepReport {
    &self.last_step
  }

  /// Returns the chunk entity at `pos`, if loaded.
  pub fn chunk_entity(&self, pos: ChunkPos) -> Option<Entity> {
    self.streamer.cache().get(pos).map(|chunk| *chunk.representation())
  }
}
