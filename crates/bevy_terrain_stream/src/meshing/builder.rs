//! Overdraw-and-trim mesh builder.

use super::mesh::TerrainMesh;
use super::normals::{recompute_normals, recompute_tangents};
use crate::coords::ChunkPos;
use crate::error::ConfigError;
use crate::settings::ChunkSettings;

/// Padded vertex buffers before trimming.
struct PaddedGrid {
  /// Vertices per padded edge (R + 3).
  side: usize,
  positions: Vec<[f32; 3]>,
  uvs: Vec<[f32; 2]>,
  colors: Vec<[f32; 4]>,
}

impl PaddedGrid {
  /// Samples the padded grid for the chunk at `pos`.
  ///
  /// Noise is sampled at the vertex's world coordinate, derived from its
  /// global lattice index `pos * R + i - 1`. Neighboring chunks compute the
  /// same index for shared vertices and therefore the same coordinate,
  /// bit for bit.
  fn sample(pos: ChunkPos, settings: &ChunkSettings) -> Self {
    let r = settings.detail_resolution as usize;
    let side = r + 3;
    let length = settings.chunk_length as f64;
    let step = length / r as f64;

    let base_x = pos.x as i64 * r as i64;
    let base_z = pos.z as i64 * r as i64;

    let mut positions = Vec::with_capacity(side * side);
    let mut uvs = Vec::with_capacity(side * side);
    let mut colors = Vec::with_capacity(side * side);

    for iz in 0..side {
      let gz = base_z + iz as i64 - 1;
      let local_z = (iz as f64 - 1.0) * step;
      let world_z = gz as f64 * step;

      for ix in 0..side {
        let gx = base_x + ix as i64 - 1;
        let local_x = (ix as f64 - 1.0) * step;
        let world_x = gx as f64 * step;

        let sample = settings.noise.sample(world_x, world_z);
        let height = sample * settings.chunk_height;

        positions.push([local_x as f32, height, local_z as f32]);
        uvs.push([(local_x / length) as f32, (local_z / length) as f32]);
        colors.push(settings.color_ramp.evaluate(sample));
      }
    }

    Self {
      side,
      positions,
      uvs,
      colors,
    }
  }
}

/// Builds the mesh for one chunk.
///
/// Produces `(R + 1)²` vertices and `2R²` triangles in chunk-local space
/// (origin at the chunk's min corner), where `R` is
/// [`ChunkSettings::detail_resolution`]. The result is a pure function of
/// `pos` and `settings`: identical inputs give bit-identical buffers.
///
/// # Errors
/// Returns [`ConfigError`] for invalid settings (including `R == 0`) before
/// any buffer is allocated.
#[cfg_attr(feature = "tracy", tracing::instrument(skip(settings)))]
pub fn build_terrain_mesh(pos: ChunkPos, settings: &ChunkSettings) -> Result<TerrainMesh, ConfigError> {
  settings.validate()?;
  let resolution = settings.detail_resolution;

  let padded = PaddedGrid::sample(pos, settings);
  let padded_indices = grid_indices(resolution as usize + 2);
  let normals = recompute_normals(&padded.positions, &padded_indices);
  let tangents = recompute_tangents(&padded.positions, &padded.uvs, &normals, &padded_indices);

  let mesh = trim_border(padded, normals, tangents, resolution);
  log::trace!(
    "Built chunk {} mesh: {} vertices, {} triangles",
    pos,
    mesh.vertex_count(),
    mesh.triangle_count()
  );
  Ok(mesh)
}

/// Strips the outer vertex ring and rebuilds indices at `resolution`.
///
/// Kept vertices are copied in row-major order, so the interior grid has the
/// same layout as a grid built at `resolution` directly.
fn trim_border(
  padded: PaddedGrid,
  normals: Vec<[f32; 3]>,
  tangents: Vec<[f32; 4]>,
  resolution: u32,
) -> TerrainMesh {
  let kept = resolution as usize + 1;
  let count = kept * kept;

  let mut mesh = TerrainMesh {
    resolution,
    positions: Vec::with_capacity(count),
    normals: Vec::with_capacity(count),
    tangents: Vec::with_capacity(count),
    uvs: Vec::with_capacity(count),
    colors: Vec::with_capacity(count),
    indices: grid_indices(resolution as usize),
  };

  for iz in 1..=kept {
    let row = iz * padded.side;
    for ix in 1..=kept {
      let src = row + ix;
      mesh.positions.push(padded.positions[src]);
      mesh.normals.push(normals[src]);
      mesh.tangents.push(tangents[src]);
      mesh.uvs.push(padded.uvs[src]);
      mesh.colors.push(padded.colors[src]);
    }
  }

  mesh
}

/// Triangle indices for a square grid with `quads` quads per edge.
///
/// Two triangles per quad, counter-clockwise when viewed from +Y.
pub(crate) fn grid_indices(quads: usize) -> Vec<u32> {
  let row = quads + 1;
  let mut indices = Vec::with_capacity(quads * quads * 6);
  for z in 0..quads {
    for x in 0..quads {
      let v = (z * row + x) as u32;
      let above = v + row as u32;
      indices.extend_from_slice(&[v, above, v + 1, v + 1, above, above + 1]);
    }
  }
  indices
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn grid_indices_for_single_quad() {
    assert_eq!(grid_indices(1), vec![0, 2, 1, 1, 2, 3]);
  }

  #[test]
  fn padded_grid_has_extra_ring() {
    let settings = ChunkSettings::new(4, 8.0, 1.0);
    let padded = PaddedGrid::sample(ChunkPos::new(0, 0), &settings);
    assert_eq!(padded.side, 7);
    assert_eq!(padded.positions.len(), 49);
    // First padded vertex sits one step outside the chunk.
    assert_eq!(padded.positions[0][0], -2.0);
    assert_eq!(padded.positions[0][2], -2.0);
  }

  #[test]
  fn trimmed_grid_starts_at_origin() {
    let settings = ChunkSettings::new(2, 4.0, 1.0);
    let mesh = build_terrain_mesh(ChunkPos::new(3, -1), &settings).unwrap();
    assert_eq!(mesh.positions[0], [0.0, 0.0, 0.0]);
    assert_eq!(mesh.positions[8], [4.0, 0.0, 4.0]);
    assert_eq!(mesh.uvs[8], [1.0, 1.0]);
  }

  #[test]
  fn zero_resolution_is_rejected() {
    let settings = ChunkSettings::new(0, 4.0, 1.0);
    assert!(matches!(
      build_terrain_mesh(ChunkPos::new(0, 0), &settings),
      Err(ConfigError::ZeroResolution)
    ));
  }
}
