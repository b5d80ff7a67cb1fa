use std::collections::VecDeque;

/// Ring buffer of samples with cached min/max/sum.
#[derive(Debug, Clone)]
pub struct TimeSeries {
  samples: VecDeque<f32>,
  capacity: usize,
  min_cached: f32,
  max_cached: f32,
  sum_cached: f32,
  dirty: bool,
}

impl TimeSeries {
  pub fn new(capacity: usize) -> Self {
    let capacity = capacity.max(1);
    Self {
      samples: VecDeque::with_capacity(capacity),
      capacity,
      min_cached: f32::MAX,
      max_cached: f32::MIN,
      sum_cached: 0.0,
      dirty: false,
    }
  }

  pub fn push(&mut self, value: f32) {
    if self.samples.len() >= self.capacity
      && let Some(removed) = self.samples.pop_front()
    {
      self.sum_cached -= removed;
      // Evicting an extreme invalidates the cached range.
      if removed <= self.min_cached || removed >= self.max_cached {
        self.dirty = true;
      }
    }

    self.samples.push_back(value);
    self.sum_cached += value;

    if !self.dirty {
      self.min_cached = self.min_cached.min(value);
      self.max_cached = self.max_cached.max(value);
    }
  }

  pub fn len(&self) -> usize {
    self.samples.len()
  }

  pub fn is_empty(&self) -> bool {
    self.samples.is_empty()
  }

  pub fn current(&self) -> Option<f32> {
    self.samples.back().copied()
  }

  pub fn min(&mut self) -> f32 {
    self.recalculate_if_dirty();
    self.min_cached
  }

  pub fn max(&mut self) -> f32 {
    self.recalculate_if_dirty();
    self.max_cached
  }

  pub fn avg(&self) -> f32 {
    if self.samples.is_empty() {
      0.0
    } else {
      self.sum_cached / self.samples.len() as f32
    }
  }

  /// Sum of all retained samples.
  pub fn sum(&self) -> f32 {
    self.sum_cached
  }

  fn recalculate_if_dirty(&mut self) {
    if self.dirty {
      self.min_cached = self.samples.iter().copied().fold(f32::MAX, f32::min);
      self.max_cached = self.samples.iter().copied().fold(f32::MIN, f32::max);
      self.dirty = false;
    }
  }
}
