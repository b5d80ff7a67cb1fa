//! Shared test doubles.

#![allow(dead_code)]

use std::collections::HashMap;

use bevy::prelude::Entity;
use bevy_terrain_stream::{ChunkDescriptor, ChunkInstance, ChunkPos, InstantiationError, InstantiationService};

/// In-memory instantiation service recording every call.
#[derive(Default)]
pub struct MockService {
  next: u32,
  /// Live handles and their visibility.
  pub visible: HashMap<u32, bool>,
  /// Position each live handle was created for.
  pub positions: HashMap<u32, ChunkPos>,
  pub instantiated: Vec<ChunkPos>,
  pub destroyed: Vec<u32>,
  /// Positions whose instantiation is rejected.
  pub reject: Vec<ChunkPos>,
}

impl MockService {
  pub fn live(&self) -> usize {
    self.visible.len()
  }

  pub fn visible_count(&self) -> usize {
    self.visible.values().filter(|v| **v).count()
  }
}

impl InstantiationService for MockService {
  type Handle = u32;

  fn instantiate(
    &mut self,
    _descriptor: &ChunkDescriptor,
    _parent: Option<Entity>,
    instance: ChunkInstance,
  ) -> Result<u32, InstantiationError> {
    if self.reject.contains(&instance.pos) {
      return Err(InstantiationError::Rejected(format!("{}", instance.pos)));
    }
    self.next += 1;
    self.visible.insert(self.next, true);
    self.positions.insert(self.next, instance.pos);
    self.instantiated.push(instance.pos);
    Ok(self.next)
  }

  fn set_visible(&mut self, handle: &u32, visible: bool) {
    if let Some(v) = self.visible.get_mut(handle) {
      *v = visible;
    }
  }

  fn destroy(&mut self, handle: u32) {
    assert!(self.visible.remove(&handle).is_some(), "handle {handle} destroyed twice");
    self.positions.remove(&handle);
    self.destroyed.push(handle);
  }
}
