//! Smooth normal and tangent reconstruction for indexed triangle lists.

use bevy::math::{Vec2, Vec3};

/// Averages unit face normals into each vertex.
///
/// Vertices without incident triangles (or only degenerate ones) keep `+Y`.
pub(super) fn recompute_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
  let mut acc = vec![Vec3::ZERO; positions.len()];

  for tri in indices.chunks_exact(3) {
    let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
    let pa = Vec3::from(positions[a]);
    let pb = Vec3::from(positions[b]);
    let pc = Vec3::from(positions[c]);

    let face = (pb - pa).cross(pc - pa).normalize_or_zero();
    acc[a] += face;
    acc[b] += face;
    acc[c] += face;
  }

  acc
    .into_iter()
    .map(|n| n.try_normalize().unwrap_or(Vec3::Y).to_array())
    .collect()
}

/// Computes per-vertex tangents from UV gradients.
///
/// Tangents are orthogonalized against the vertex normal. The `w` component
/// stores bitangent handedness (`1.0` or `-1.0`).
pub(super) fn recompute_tangents(
  positions: &[[f32; 3]],
  uvs: &[[f32; 2]],
  normals: &[[f32; 3]],
  indices: &[u32],
) -> Vec<[f32; 4]> {
  let mut tangents = vec![Vec3::ZERO; positions.len()];
  let mut bitangents = vec![Vec3::ZERO; positions.len()];

  for tri in indices.chunks_exact(3) {
    let corners = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
    let [i0, i1, i2] = corners;
    let p0 = Vec3::from(positions[i0]);
    let e1 = Vec3::from(positions[i1]) - p0;
    let e2 = Vec3::from(positions[i2]) - p0;

    let uv0 = Vec2::from(uvs[i0]);
    let d1 = Vec2::from(uvs[i1]) - uv0;
    let d2 = Vec2::from(uvs[i2]) - uv0;

    let det = d1.x * d2.y - d2.x * d1.y;
    if det.abs() <= f32::EPSILON {
      continue;
    }
    let inv = 1.0 / det;
    let tangent = (e1 * d2.y - e2 * d1.y) * inv;
    let bitangent = (e2 * d1.x - e1 * d2.x) * inv;

    for i in corners {
      tangents[i] += tangent;
      bitangents[i] += bitangent;
    }
  }

  normals
    .iter()
    .zip(tangents.iter().zip(bitangents.iter()))
    .map(|(n, (t, b))| {
      let n = Vec3::from(*n);
      let ortho = (*t - n * n.dot(*t))
        .try_normalize()
        .or_else(|| (Vec3::X - n * n.x).try_normalize())
        .unwrap_or(Vec3::X);
      let w = if n.cross(ortho).dot(*b) < 0.0 { -1.0 } else { 1.0 };
      ortho.extend(w).to_array()
    })
    .collect()
}
