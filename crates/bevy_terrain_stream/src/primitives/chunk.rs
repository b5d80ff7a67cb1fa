//! A loaded terrain chunk.

use crate::coords::ChunkPos;

/// A chunk whose representation exists in the host.
///
/// Chunks are created only by the cache, after the host has successfully
/// instantiated a representation. The position never changes and the
/// representation handle is owned by exactly one chunk.
#[derive(Debug)]
pub struct Chunk<H> {
  pos: ChunkPos,
  representation: H,
}

impl<H> Chunk<H> {
  pub(crate) fn new(pos: ChunkPos, representation: H) -> Self {
    Self { pos, representation }
  }

  /// Grid coordinate of this chunk.
  #[inline]
  pub fn pos(&self) -> ChunkPos {
    self.pos
  }

  /// Host handle for the chunk's representation.
  #[inline]
  pub fn representation(&self) -> &H {
    &self.representation
  }

  /// Consumes the chunk, returning its representation for destruction.
  pub(crate) fn into_representation(self) -> H {
    self.representation
  }
}
