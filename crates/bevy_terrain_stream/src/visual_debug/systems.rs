//! Debug gizmo rendering systems.

use bevy::mesh::VertexAttributeValues;
use bevy::prelude::*;

use super::colors;
use super::settings::VisualDebugSettings;
use crate::coords::ChunkPos;
use crate::world::{TerrainChunk, TerrainStreamer};

/// Height at which chunk outlines are drawn.
const OUTLINE_Y: f32 = 0.05;

fn outline(gizmos: &mut Gizmos, pos: ChunkPos, length: f32, inset: f32, color: Color) {
  let min = pos.to_world(length) + Vec3::new(inset, OUTLINE_Y, inset);
  let size = length - 2.0 * inset;
  gizmos.linestrip(
    [
      min,
      min + Vec3::X * size,
      min + Vec3::new(size, 0.0, size),
      min + Vec3::Z * size,
      min,
    ],
    color,
  );
}

/// System: outlines loaded and pending chunks.
///
/// Active chunks are green, hidden ones purple, pending ones gold and each
/// observer's chunk coral.
pub(crate) fn draw_chunk_bounds(
  mut gizmos: Gizmos,
  terrain: Option<Res<TerrainStreamer>>,
  settings: Res<VisualDebugSettings>,
) {
  let Some(terrain) = terrain else {
    return;
  };
  let streamer = terrain.streamer();
  let cache = streamer.cache();
  let length = streamer.settings().chunk_length;
  let inset = length * 0.02;

  if settings.show_chunk_bounds {
    for pos in cache.loaded_positions() {
      let color = if cache.is_active(pos) {
        colors::GREEN
      } else {
        colors::PURPLE
      };
      outline(&mut gizmos, pos, length, inset, color);
    }
    for pos in streamer.occupied() {
      outline(&mut gizmos, *pos, length, inset * 3.0, colors::CORAL);
    }
  }

  if settings.show_pending {
    for pos in cache.pending_positions() {
      outline(&mut gizmos, pos, length, inset * 2.0, colors::GOLD);
    }
  }
}

/// System: draws vertex normals of visible chunks.
pub(crate) fn draw_chunk_normals(
  mut gizmos: Gizmos,
  settings: Res<VisualDebugSettings>,
  meshes: Res<Assets<Mesh>>,
  chunks: Query<(&Mesh3d, &GlobalTransform, &InheritedVisibility), With<TerrainChunk>>,
) {
  if !settings.show_normals {
    return;
  }

  for (mesh, transform, visibility) in &chunks {
    if !visibility.get() {
      continue;
    }
    let Some(mesh) = meshes.get(&mesh.0) else {
      continue;
    };
    let (
      Some(VertexAttributeValues::Float32x3(positions)),
      Some(VertexAttributeValues::Float32x3(normals)),
    ) = (
      mesh.attribute(Mesh::ATTRIBUTE_POSITION),
      mesh.attribute(Mesh::ATTRIBUTE_NORMAL),
    )
    else {
      continue;
    };

    let side = (positions.len() as f32).sqrt().round() as usize;
    for (i, (p, n)) in positions.iter().zip(normals).enumerate() {
      let (x, z) = (i % side, i / side);
      let border = x == 0 || z == 0 || x + 1 == side || z + 1 == side;
      let start = transform.transform_point(Vec3::from(*p));
      let color = if border { colors::CORAL } else { colors::MINT };
      gizmos.ray(start, Vec3::from(*n) * settings.normal_length, color);
    }
  }
}
