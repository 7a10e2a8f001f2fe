//! # Materializer
//!
//! Texture-set classification and PBR shader-graph construction.
//!
//! Given a loose collection of texture images — a single file, a folder,
//! or a zip archive — this crate infers each file's physical map type
//! (albedo, roughness, normal, displacement, …) and target resolution from
//! its name, groups the results by resolution, and wires a chosen
//! resolution's maps into a parametric node graph for a physically-based
//! shading model.
//!
//! The host application owns the real node-graph objects; its capabilities
//! are expressed as the [`graph::ShadingHost`] trait, with an in-memory
//! implementation ([`graph::MemoryHost`]) backing the tests and the demo
//! CLI.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use materializer::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ImportConfig::default();
//!     let session = MaterialFactory::classify("wood.zip", &config)?;
//!
//!     let resolution = session.resolutions()[0];
//!     let maps = session.materialize(resolution, "textures".as_ref())?;
//!
//!     let mut host = MemoryHost::new();
//!     MaterialFactory::create_material(&mut host, "wood", &maps)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names)]

pub mod config;
pub mod diag;
pub mod factory;
pub mod graph;
pub mod io;
pub mod shading;
pub mod texset;

pub use config::{ConfigError, ImportConfig};
pub use diag::Diagnostic;
pub use factory::{MaterialFactory, WorldFactory};

/// Common imports for library users.
pub mod prelude {
    pub use crate::config::ImportConfig;
    pub use crate::diag::Diagnostic;
    pub use crate::factory::{MaterialFactory, WorldFactory};
    pub use crate::graph::{MemoryHost, ShadingHost};
    pub use crate::shading::{PbrMaterialBuilder, ShadingError, WorldBuilder};
    pub use crate::texset::{
        ImportSession, MapType, Materialized, Resolution, SourceKind, TexSetError, TextureSet,
    };
}
