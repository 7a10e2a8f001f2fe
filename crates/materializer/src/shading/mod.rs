//! Shader-graph construction for PBR materials and environment worlds.

pub mod material_builder;
pub mod world_builder;

pub use material_builder::PbrMaterialBuilder;
pub use world_builder::WorldBuilder;

use thiserror::Error;

use crate::graph::GraphError;
use crate::texset::MapType;

/// Graph construction errors.
#[derive(Error, Debug)]
pub enum ShadingError {
    /// The map type has no wiring recipe in the builder. Fatal: graph
    /// construction aborts.
    #[error("unsupported map type: {0}")]
    UnsupportedMapType(MapType),

    /// An existing graph was expected to contain a principled BSDF node
    /// and does not.
    #[error("material graph is missing a principled BSDF node")]
    NoBsdfNode,

    /// An existing world graph was expected to contain an environment
    /// texture node and does not.
    #[error("world graph is missing an environment texture node")]
    NoEnvironmentNode,

    /// The host rejected a graph operation.
    #[error(transparent)]
    Graph(#[from] GraphError),
}
