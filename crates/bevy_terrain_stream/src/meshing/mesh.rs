//! CPU-side terrain mesh buffers.

use bevy::asset::RenderAssetUsages;
use bevy::mesh::{Indices, PrimitiveTopology};
use bevy::prelude::*;

/// Vertex and index buffers for one chunk.
///
/// Vertices form a row-major `(R + 1) x (R + 1)` grid in chunk-local space;
/// vertex `(x, z)` is at index `z * (R + 1) + x`. Colors are linear RGBA.
#[derive(Clone, Debug, PartialEq)]
pub struct TerrainMesh {
  pub resolution: u32,
  pub positions: Vec<[f32; 3]>,
  pub normals: Vec<[f32; 3]>,
  pub tangents: Vec<[f32; 4]>,
  pub uvs: Vec<[f32; 2]>,
  pub colors: Vec<[f32; 4]>,
  pub indices: Vec<u32>,
}

impl TerrainMesh {
  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Returns the vertex at grid coordinate `(x, z)`.
  pub fn vertex_index(&self, x: u32, z: u32) -> usize {
    (z * (self.resolution + 1) + x) as usize
  }

  /// Converts into a render mesh, consuming the buffers.
  pub fn into_mesh(self) -> Mesh {
    Mesh::new(
      PrimitiveTopology::TriangleList,
      RenderAssetUsages::MAIN_WORLD | RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, self.normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_TANGENT, self.tangents)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, self.colors)
    .with_inserted_indices(Indices::U32(self.indices))
  }

  /// Builds a render mesh, leaving the buffers in place.
  pub fn to_mesh(&self) -> Mesh {
    self.clone().into_mesh()
  }
}
