//! Chunk lifecycle management.
//!
//! [`ChunkCache`] owns chunks and their state transitions. [`ChunkStreamer`]
//! decides, from observer positions, which transitions happen each frame.

mod cache;
mod streamer;

pub use cache::{Activation, ChunkCache};
pub use streamer::{ChunkStreamer, TickReport};
