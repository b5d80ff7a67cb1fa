//! Error types for configuration, instantiation and streaming.

use std::error::Error;
use std::{fmt, io};

use bevy::ecs::entity::Entity;

use crate::coords::ChunkPos;
use crate::scheduling::StepReport;

/// Invalid terrain configuration.
///
/// Surfaced at construction or build time; not recoverable locally.
#[derive(Debug)]
pub enum ConfigError {
  /// Detail resolution must be at least 1.
  ZeroResolution,
  /// Chunk length must be finite and positive.
  InvalidChunkLength(f32),
  /// Chunk height must be finite.
  InvalidChunkHeight(f32),
  /// Color ramp stops are empty, unsorted or outside [0, 1].
  InvalidRamp(String),
  /// Reading a config file failed.
  Io(io::Error),
  /// Parsing a config file failed.
  Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::ZeroResolution => write!(f, "detail resolution must be at least 1"),
      Self::InvalidChunkLength(l) => write!(f, "chunk length must be finite and positive, got {l}"),
      Self::InvalidChunkHeight(h) => write!(f, "chunk height must be finite, got {h}"),
      Self::InvalidRamp(reason) => write!(f, "invalid color ramp: {reason}"),
      Self::Io(e) => write!(f, "I/O error: {e}"),
      Self::Parse(e) => write!(f, "parse error: {e}"),
    }
  }
}

impl Error for ConfigError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      Self::Io(e) => Some(e),
      Self::Parse(e) => Some(e),
      _ => None,
    }
  }
}

impl From<io::Error> for ConfigError {
  fn from(err: io::Error) -> Self {
    Self::Io(err)
  }
}

impl From<toml::de::Error> for ConfigError {
  fn from(err: toml::de::Error) -> Self {
    Self::Parse(err)
  }
}

/// The host failed to instantiate a chunk representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstantiationError {
  /// The parent scope entity does not exist.
  MissingParent(Entity),
  /// The host refused the request for its own reasons.
  Rejected(String),
}

impl fmt::Display for InstantiationError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::MissingParent(e) => write!(f, "parent entity {e} does not exist"),
      Self::Rejected(reason) => write!(f, "instantiation rejected: {reason}"),
    }
  }
}

impl Error for InstantiationError {}

/// Error returned to the host by the streamer and cache.
#[derive(Debug)]
pub enum StreamError {
  /// The chunk settings are unusable. Retrying will not help.
  InvalidConfiguration(ConfigError),
  /// Building the representation for `pos` failed. The position was rolled
  /// back and may be requested again.
  Instantiation {
    pos: ChunkPos,
    source: InstantiationError,
  },
}

impl StreamError {
  /// Returns true if streaming can continue after this error.
  pub fn is_retryable(&self) -> bool {
    matches!(self, Self::Instantiation { .. })
  }
}

impl fmt::Display for StreamError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::InvalidConfiguration(e) => write!(f, "invalid configuration: {e}"),
      Self::Instantiation { pos, source } => {
        write!(f, "failed to instantiate chunk {pos}: {source}")
      }
    }
  }
}

impl Error for StreamError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    match self {
      Self::InvalidConfiguration(e) => Some(e),
      Self::Instantiation { source, .. } => Some(source),
    }
  }
}

impl From<ConfigError> for StreamError {
  fn from(err: ConfigError) -> Self {
    Self::InvalidConfiguration(err)
  }
}

/// A scheduler step that stopped on an error.
///
/// `report` holds the work the step completed before the failure: chunks
/// built earlier in the batch are inserted and listed there.
#[derive(Debug)]
pub struct StepError {
  pub report: StepReport,
  pub error: StreamError,
}

impl StepError {
  /// Returns true if streaming can continue after this error.
  pub fn is_retryable(&self) -> bool {
    self.error.is_retryable()
  }
}

impl fmt::Display for StepError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} (after {} built)", self.error, self.report.built.len())
  }
}

impl Error for StepError {
  fn source(&self) -> Option<&(dyn Error + 'static)> {
    Some(&self.error)
  }
}
