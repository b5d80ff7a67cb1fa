//! ECS-backed instantiation service.

use bevy::prelude::*;

use super::TerrainChunk;
use crate::error::InstantiationError;
use crate::instantiation::{ChunkInstance, InstantiationService};
use crate::settings::ChunkDescriptor;

/// Spawns chunk entities through [`Commands`].
///
/// Built per system run from the system's own parameters. Each chunk entity
/// owns its mesh through `Mesh3d`; despawning it drops the last strong handle
/// and releases the mesh asset.
pub struct BevyChunkSpawner<'a, 'w, 's> {
  commands: &'a mut Commands<'w, 's>,
  meshes: &'a mut Assets<Mesh>,
}

impl<'a, 'w, 's> BevyChunkSpawner<'a, 'w, 's> {
  pub fn new(commands: &'a mut Commands<'w, 's>, meshes: &'a mut Assets<Mesh>) -> Self {
    Self { commands, meshes }
  }
}

impl InstantiationService for BevyChunkSpawner<'_, '_, '_> {
  type Handle = Entity;

  fn instantiate(
    &mut self,
    descriptor: &ChunkDescriptor,
    parent: Option<Entity>,
    instance: ChunkInstance,
  ) -> Result<Entity, InstantiationError> {
    if let Some(parent) = parent
      && self.commands.get_entity(parent).is_err()
    {
      return Err(InstantiationError::MissingParent(parent));
    }

    let mesh = self.meshes.add(instance.mesh.into_mesh());
    let mut entity = self.commands.spawn((
      Name::new(format!("{} {}", descriptor.label, instance.pos)),
      TerrainChunk { pos: instance.pos },
      Mesh3d(mesh),
      Transform::from_translation(instance.translation),
      Visibility::Inherited,
    ));
    if let Some(material) = &descriptor.material {
      entity.insert(MeshMaterial3d(material.clone()));
    }
    if let Some(parent) = parent {
      entity.insert(ChildOf(parent));
    }
    Ok(entity.id())
  }

  fn set_visible(&mut self, handle: &Entity, visible: bool) {
    let visibility = if visible {
      Visibility::Inherited
    } else {
      Visibility::Hidden
    };
    if let Ok(mut entity) = self.commands.get_entity(*handle) {
      entity.insert(visibility);
    }
  }

  fn destroy(&mut self, handle: Entity) {
    if let Ok(mut entity) = self.commands.get_entity(handle) {
      entity.despawn();
    }
  }
}
