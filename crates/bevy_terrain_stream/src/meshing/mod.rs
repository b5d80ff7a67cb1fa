//! Procedural heightfield meshing.
//!
//! Each chunk is meshed independently with the "overdraw and trim"
//! technique: the grid is built one vertex ring larger than needed, normals
//! and tangents are computed over the padded grid, then the padding is
//! stripped. Border normals therefore account for neighboring terrain that
//! the chunk never stores.

mod builder;
mod mesh;
mod normals;

pub use builder::build_terrain_mesh;
pub use mesh::TerrainMesh;
#[cfg(test)]
pub(crate) use builder::grid_indices;
