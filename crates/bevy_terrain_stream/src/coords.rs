//! Coordinate types and range metrics.
//!
//! Defines the coordinate system for the streamed terrain:
//! - [`ChunkPos`]: Chunk grid position on the XZ plane (i32)
//! - [`RangeMetric`]: Distance test shared by retention and activation
//!
//! World space is Y+ up. A chunk at `(x, z)` covers the square
//! `[x * L, (x + 1) * L) x [z * L, (z + 1) * L)` where `L` is the chunk length.

use std::fmt;

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

/// Position in the chunk grid.
///
/// Equality and hashing are structural, so positions can key hash maps
/// directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPos {
  pub x: i32,
  pub z: i32,
}

impl ChunkPos {
  /// Creates a new chunk position.
  pub const fn new(x: i32, z: i32) -> Self {
    Self { x, z }
  }

  /// Returns the chunk containing the given world position.
  ///
  /// Uses floor division for correct negative coordinate handling: world
  /// x = -0.1 lands in chunk -1.
  pub fn from_world(world: Vec3, chunk_length: f32) -> Self {
    let x = (world.x / chunk_length).floor() as i32;
    let z = (world.z / chunk_length).floor() as i32;
    Self::new(x, z)
  }

  /// Returns the chunk origin (min XZ corner) in world space.
  pub fn to_world(self, chunk_length: f32) -> Vec3 {
    Vec3::new(
      self.x as f32 * chunk_length,
      0.0,
      self.z as f32 * chunk_length,
    )
  }

  /// Returns this position shifted by the given grid offset.
  ///
  /// # Panics
  /// Overflows past the `i32` grid edge. Use
  /// [`checked_offset`](Self::checked_offset) near the edge.
  pub const fn offset(self, dx: i32, dz: i32) -> Self {
    Self::new(self.x + dx, self.z + dz)
  }

  /// Returns this position shifted by the given grid offset, or `None` if
  /// it would leave the `i32` grid.
  pub const fn checked_offset(self, dx: i32, dz: i32) -> Option<Self> {
    match (self.x.checked_add(dx), self.z.checked_add(dz)) {
      (Some(x), Some(z)) => Some(Self::new(x, z)),
      _ => None,
    }
  }

  /// Taxicab distance in chunks.
  pub fn manhattan(self, other: Self) -> u32 {
    self.x.abs_diff(other.x) + self.z.abs_diff(other.z)
  }

  /// Squared Euclidean distance in chunks.
  pub fn distance_squared(self, other: Self) -> u64 {
    let dx = self.x.abs_diff(other.x) as u64;
    let dz = self.z.abs_diff(other.z) as u64;
    dx * dx + dz * dz
  }

  /// Chessboard distance in chunks.
  pub fn chebyshev(self, other: Self) -> u32 {
    self.x.abs_diff(other.x).max(self.z.abs_diff(other.z))
  }
}

impl fmt::Display for ChunkPos {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "[{}/{}]", self.x, self.z)
  }
}

/// Distance test used to decide both chunk retention and activation.
///
/// A single metric drives both passes, so the view boundary is always nested
/// inside the cache boundary with the same shape. All metrics are inclusive:
/// a chunk exactly `radius` away is in range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeMetric {
  /// Circular range: `dx² + dz² <= r²`.
  #[default]
  Euclidean,
  /// Diamond range: `|dx| + |dz| <= r`.
  Manhattan,
  /// Square range: `max(|dx|, |dz|) <= r`.
  Chebyshev,
}

impl RangeMetric {
  /// Returns true if `a` and `b` are within `radius` chunks of each other.
  pub fn in_range(self, a: ChunkPos, b: ChunkPos, radius: u32) -> bool {
    match self {
      Self::Euclidean => {
        let r = radius as u64;
        a.distance_squared(b) <= r * r
      }
      Self::Manhattan => a.manhattan(b) <= radius,
      Self::Chebyshev => a.chebyshev(b) <= radius,
    }
  }

  /// Enumerates every cell within `radius` of `center`.
  ///
  /// Order is row-major (z outer, x inner), starting at the most negative
  /// corner, so the enumeration is deterministic. Cells past the edge of
  /// the `i32` grid are skipped.
  pub fn cells_in_range(self, center: ChunkPos, radius: u32) -> impl Iterator<Item = ChunkPos> {
    let r = radius.min(i32::MAX as u32) as i32;
    (-r..=r).flat_map(move |dz| {
      (-r..=r).filter_map(move |dx| {
        let cell = center.checked_offset(dx, dz)?;
        self.in_range(center, cell, radius).then_some(cell)
      })
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn from_world_floors_negative_coordinates() {
    assert_eq!(ChunkPos::from_world(Vec3::new(-0.1, 0.0, 0.1), 16.0), ChunkPos::new(-1, 0));
    assert_eq!(ChunkPos::from_world(Vec3::new(-16.0, 5.0, -16.01), 16.0), ChunkPos::new(-1, -2));
    assert_eq!(ChunkPos::from_world(Vec3::new(31.9, 0.0, 32.0), 16.0), ChunkPos::new(1, 2));
  }

  #[test]
  fn to_world_is_min_corner() {
    assert_eq!(ChunkPos::new(-2, 3).to_world(4.0), Vec3::new(-8.0, 0.0, 12.0));
  }

  #[test]
  fn distances() {
    let a = ChunkPos::new(0, 0);
    let b = ChunkPos::new(3, -4);
    assert_eq!(a.manhattan(b), 7);
    assert_eq!(a.distance_squared(b), 25);
    assert_eq!(a.chebyshev(b), 4);
  }

  #[test]
  fn euclidean_range_is_inclusive() {
    let c = ChunkPos::new(0, 0);
    assert!(RangeMetric::Euclidean.in_range(c, ChunkPos::new(2, 0), 2));
    assert!(!RangeMetric::Euclidean.in_range(c, ChunkPos::new(2, 1), 2));
  }

  #[test]
  fn cell_counts_per_metric() {
    let c = ChunkPos::new(5, -5);
    assert_eq!(RangeMetric::Euclidean.cells_in_range(c, 2).count(), 13);
    assert_eq!(RangeMetric::Manhattan.cells_in_range(c, 2).count(), 13);
    assert_eq!(RangeMetric::Chebyshev.cells_in_range(c, 2).count(), 25);
    assert_eq!(RangeMetric::Euclidean.cells_in_range(c, 0).collect::<Vec<_>>(), vec![c]);
  }

  #[test]
  fn enumeration_stops_at_grid_edge() {
    let far = ChunkPos::from_world(Vec3::new(2.2e6, 0.0, 0.0), 0.001);
    assert_eq!(far.x, i32::MAX);

    let cells: Vec<_> = RangeMetric::Chebyshev.cells_in_range(far, 1).collect();
    assert_eq!(cells.len(), 6);
    assert!(cells.iter().all(|c| c.x >= i32::MAX - 1));

    let corner = ChunkPos::new(i32::MIN, i32::MIN);
    assert_eq!(RangeMetric::Euclidean.cells_in_range(corner, 2).count(), 6);
    assert_eq!(corner.checked_offset(-1, 0), None);
  }

  #[test]
  fn enumeration_is_row_major() {
    let cells: Vec<_> = RangeMetric::Chebyshev.cells_in_range(ChunkPos::new(0, 0), 1).collect();
    assert_eq!(cells[0], ChunkPos::new(-1, -1));
    assert_eq!(cells[1], ChunkPos::new(0, -1));
    assert_eq!(cells[8], ChunkPos::new(1, 1));
  }
}
