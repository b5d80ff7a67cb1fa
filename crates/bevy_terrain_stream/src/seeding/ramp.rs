//! Height-to-color gradient.

use palette::{LinSrgba, Mix, Srgba};

use super::ColorRamp;
use crate::error::ConfigError;

/// A color key on a [`GradientRamp`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
  /// Position on the ramp, in `[0, 1]`.
  pub t: f32,
  /// sRGB color with alpha.
  pub color: Srgba<f32>,
}

impl ColorStop {
  /// Creates a stop from sRGB components in `[0, 1]`.
  pub fn new(t: f32, r: f32, g: f32, b: f32) -> Self {
    Self {
      t,
      color: Srgba::new(r, g, b, 1.0),
    }
  }
}

/// Piecewise-linear color gradient.
///
/// Stops are interpolated in linear space. Below the first stop the first
/// color is used, above the last stop the last color.
#[derive(Clone, Debug)]
pub struct GradientRamp {
  stops: Vec<(f32, LinSrgba<f32>)>,
}

impl GradientRamp {
  /// Creates a ramp from stops sorted by `t`.
  pub fn new(stops: &[ColorStop]) -> Result<Self, ConfigError> {
    if stops.is_empty() {
      return Err(ConfigError::InvalidRamp("no color stops".into()));
    }
    for stop in stops {
      if !(0.0..=1.0).contains(&stop.t) {
        return Err(ConfigError::InvalidRamp(format!(
          "stop at {} is outside [0, 1]",
          stop.t
        )));
      }
    }
    if stops.windows(2).any(|w| w[1].t < w[0].t) {
      return Err(ConfigError::InvalidRamp("stops are not sorted".into()));
    }

    let stops = stops
      .iter()
      .map(|stop| (stop.t, stop.color.into_linear()))
      .collect();
    Ok(Self { stops })
  }

  /// Single-color ramp.
  pub fn solid(r: f32, g: f32, b: f32) -> Self {
    Self {
      stops: vec![(0.0, Srgba::new(r, g, b, 1.0).into_linear())],
    }
  }

  /// Returns the number of stops.
  pub fn len(&self) -> usize {
    self.stops.len()
  }

  /// Returns true if the ramp has no stops. Never true for a constructed ramp.
  pub fn is_empty(&self) -> bool {
    self.stops.is_empty()
  }
}

impl Default for GradientRamp {
  /// Water, sand, grass, rock, snow.
  fn default() -> Self {
    let stops = [
      ColorStop::new(0.0, 0.122, 0.231, 0.451),
      ColorStop::new(0.3, 0.851, 0.788, 0.580),
      ColorStop::new(0.45, 0.357, 0.561, 0.255),
      ColorStop::new(0.75, 0.463, 0.443, 0.420),
      ColorStop::new(1.0, 0.961, 0.965, 0.980),
    ];
    Self {
      stops: stops.iter().map(|s| (s.t, s.color.into_linear())).collect(),
    }
  }
}

impl ColorRamp for GradientRamp {
  fn evaluate(&self, t: f32) -> [f32; 4] {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

    let upper = self.stops.partition_point(|(stop_t, _)| *stop_t <= t);
    let color = match upper {
      0 => self.stops[0].1,
      n if n == self.stops.len() => self.stops[n - 1].1,
      n => {
        let (t0, c0) = self.stops[n - 1];
        let (t1, c1) = self.stops[n];
        let span = t1 - t0;
        if span <= f32::EPSILON {
          c1
        } else {
          c0.mix(c1, (t - t0) / span)
        }
      }
    };

    [color.color.red, color.color.green, color.color.blue, color.alpha]
  }
}
