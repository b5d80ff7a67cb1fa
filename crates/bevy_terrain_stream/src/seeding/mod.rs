//! Terrain seeding - the height and color sources sampled by the mesh builder.
//!
//! The [`NoiseField`] trait provides a pluggable height source and the
//! [`ColorRamp`] trait maps a height sample to a vertex color. Both are
//! injected through [`ChunkSettings`](crate::ChunkSettings).

mod noise;
mod ramp;

pub use noise::PerlinField;
pub use ramp::{ColorStop, GradientRamp};

/// Pure function from a world XZ position to a height sample in `[0, 1]`.
///
/// Implementations must not consult hidden mutable state: the same
/// coordinates always produce the same value, on any chunk. The mesh
/// builder relies on this to stitch neighboring chunks without seams.
///
/// The `Send + Sync` bounds let settings be shared as a Bevy resource.
pub trait NoiseField: Send + Sync {
  /// Samples the field at the given world coordinates.
  fn sample(&self, x: f64, z: f64) -> f32;
}

impl<F> NoiseField for F
where
  F: Fn(f64, f64) -> f32 + Send + Sync,
{
  fn sample(&self, x: f64, z: f64) -> f32 {
    self(x, z)
  }
}

/// Field that is the same value everywhere.
///
/// Produces flat terrain; useful for tests and as a placeholder.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlatField(pub f32);

impl NoiseField for FlatField {
  fn sample(&self, _x: f64, _z: f64) -> f32 {
    self.0
  }
}

/// Maps a normalized height `t` in `[0, 1]` to a linear RGBA color.
pub trait ColorRamp: Send + Sync {
  /// Evaluates the ramp. Values outside `[0, 1]` are clamped.
  fn evaluate(&self, t: f32) -> [f32; 4];
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn closures_are_noise_fields() {
    let field = |x: f64, z: f64| (x + z) as f32;
    assert_eq!(field.sample(1.0, 2.0), 3.0);
  }

  #[test]
  fn flat_field_ignores_position() {
    let field = FlatField(0.25);
    assert_eq!(field.sample(-1e6, 1e6), 0.25);
  }
}
