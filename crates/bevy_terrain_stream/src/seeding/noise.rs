//! Coherent noise height field.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::NoiseField;

/// Fractal Perlin height field.
///
/// Deterministic: same seed and parameters always produce identical samples,
/// so two streamers built from the same config generate the same terrain.
/// Raw fBm output in `[-1, 1]` is remapped and clamped to `[0, 1]`.
pub struct PerlinField {
  noise: Fbm<Perlin>,
  seed: u32,
}

impl PerlinField {
  /// Default sampling frequency (cycles per world unit).
  pub const DEFAULT_FREQUENCY: f64 = 0.03;
  /// Default number of fBm octaves.
  pub const DEFAULT_OCTAVES: usize = 4;

  /// Creates a new field with default frequency and octaves.
  ///
  /// Use builder methods to customize:
  /// - `frequency(f64)`: Feature density (default: 0.03)
  /// - `octaves(usize)`: Detail layers (default: 4)
  pub fn new(seed: u32) -> Self {
    let noise = Fbm::<Perlin>::new(seed)
      .set_frequency(Self::DEFAULT_FREQUENCY)
      .set_octaves(Self::DEFAULT_OCTAVES);
    Self { noise, seed }
  }

  /// Sets the base frequency (higher = smaller features).
  pub fn frequency(mut self, frequency: f64) -> Self {
    self.noise = self.noise.set_frequency(frequency);
    self
  }

  /// Sets the number of octaves. Clamped to at least one.
  pub fn octaves(mut self, octaves: usize) -> Self {
    self.noise = self.noise.set_octaves(octaves.max(1));
    self
  }

  /// Returns the seed this field was built with.
  pub fn seed(&self) -> u32 {
    self.seed
  }
}

impl NoiseField for PerlinField {
  fn sample(&self, x: f64, z: f64) -> f32 {
    let value = self.noise.get([x, z]);
    ((value + 1.0) * 0.5).clamp(0.0, 1.0) as f32
  }
}
