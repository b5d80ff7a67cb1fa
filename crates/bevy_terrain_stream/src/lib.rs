//! Terrain Stream - infinite procedural heightfield terrain for Bevy.
//!
//! Terrain is split into square chunks that are built from a noise field
//! and kept resident around moving observers. The engine-independent core
//! ([`streaming`], [`meshing`], [`scheduling`]) talks to the host only
//! through [`InstantiationService`]; the [`TerrainStreamingPlugin`] wires it
//! into a Bevy app.

pub mod config;
pub mod coords;
pub mod diagnostics;
pub mod error;
pub mod instantiation;
pub mod meshing;
pub mod primitives;
pub mod scheduling;
pub mod seeding;
pub mod settings;
pub mod streaming;
#[cfg(feature = "tracy")]
mod tracy_init;
#[cfg(feature = "visual-debug")]
pub mod visual_debug;
pub mod world;

pub use config::{ColorStopConfig, NoiseConfig, StreamingConfig, TerrainConfig};
pub use coords::{ChunkPos, RangeMetric};
pub use diagnostics::{StreamingMetrics, TimeSeries};
pub use error::{ConfigError, InstantiationError, StepError, StreamError};
pub use instantiation::{ChunkInstance, InstantiationService};
pub use meshing::{TerrainMesh, build_terrain_mesh};
pub use primitives::Chunk;
pub use scheduling::{StepReport, WorkQueue};
pub use seeding::{ColorRamp, ColorStop, FlatField, GradientRamp, NoiseField, PerlinField};
pub use settings::{ChunkDescriptor, ChunkSettings};
pub use streaming::{Activation, ChunkCache, ChunkStreamer, TickReport};
#[cfg(feature = "tracy")]
pub use tracy_init::init_tracy;
pub use world::control::StreamingState;
pub use world::plugin::{TerrainStreamingPlugin, TerrainStreamingSet};
pub use world::{BevyChunkSpawner, StreamingObserver, TerrainChunk, TerrainRoot, TerrainStreamer};
