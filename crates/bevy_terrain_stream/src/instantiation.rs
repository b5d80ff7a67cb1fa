//! Host seam for chunk representations.
//!
//! The streaming core never touches the ECS directly. Anything that spawns,
//! shows, hides or despawns a chunk goes through [`InstantiationService`],
//! which the host passes into every cache or streamer call that needs it.

use bevy::prelude::*;

use crate::coords::ChunkPos;
use crate::error::InstantiationError;
use crate::meshing::TerrainMesh;
use crate::settings::ChunkDescriptor;

/// A freshly built chunk, ready to be handed to the host.
#[derive(Clone, Debug)]
pub struct ChunkInstance {
  pub pos: ChunkPos,
  /// World-space origin of the chunk (its min corner).
  pub translation: Vec3,
  pub mesh: TerrainMesh,
}

/// Creates, toggles and disposes chunk representations.
///
/// `Handle` identifies one representation. Handles are moved into the cache
/// on success and moved back out exactly once, into [`destroy`].
///
/// [`destroy`]: InstantiationService::destroy
pub trait InstantiationService {
  type Handle;

  /// Creates a visible representation under `parent`.
  fn instantiate(
    &mut self,
    descriptor: &ChunkDescriptor,
    parent: Option<Entity>,
    instance: ChunkInstance,
  ) -> Result<Self::Handle, InstantiationError>;

  /// Shows or hides a representation without destroying it.
  fn set_visible(&mut self, handle: &Self::Handle, visible: bool);

  /// Releases a representation and everything it owns.
  fn destroy(&mut self, handle: Self::Handle);
}
