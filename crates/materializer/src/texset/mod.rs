//! Texture set classification.
//!
//! Given a source location — a single image, a directory, or a zip archive
//! of texture maps — this module infers each file's map type and resolution
//! from its name and groups the results into a [`TextureSet`].

pub mod classifier;
pub mod map_type;
pub mod resolution;

pub use classifier::{classify, ImportSession, Materialized, SourceKind};
pub use map_type::MapType;
pub use resolution::Resolution;

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;

/// Classification and extraction errors.
///
/// Degraded outcomes (corrupt archives, skipped entries) are reported as
/// [`crate::diag::Diagnostic`] values, not errors; these variants cover the
/// cases where there is nothing sensible to degrade to.
#[derive(Error, Debug)]
pub enum TexSetError {
    /// The source path does not exist.
    #[error("source not found: {0}")]
    SourceNotFound(PathBuf),

    /// The source path is neither an archive, a directory, nor an accepted
    /// image file.
    #[error("unsupported source type: {0}")]
    UnsupportedSourceType(PathBuf),

    /// File-system level failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Classification result grouping files by resolution and map type.
///
/// Within one set, each (resolution, map type) pair holds at most one entry
/// reference; a later match for the same pair overwrites the earlier one,
/// in source enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureSet {
    maps: BTreeMap<Resolution, BTreeMap<MapType, String>>,
}

impl TextureSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entry for a (resolution, map type) pair. Returns the
    /// previous entry if one is overwritten.
    pub fn insert(
        &mut self,
        resolution: Resolution,
        map_type: MapType,
        entry: impl Into<String>,
    ) -> Option<String> {
        self.maps
            .entry(resolution)
            .or_default()
            .insert(map_type, entry.into())
    }

    /// Resolutions present in the set, in canonical order (1k first).
    pub fn resolutions(&self) -> impl Iterator<Item = Resolution> + '_ {
        self.maps.keys().copied()
    }

    /// The map-type → entry mapping for one resolution, if present.
    pub fn maps_for(&self, resolution: Resolution) -> Option<&BTreeMap<MapType, String>> {
        self.maps.get(&resolution)
    }

    /// Whether no entries were classified.
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// Total number of classified entries across all resolutions.
    pub fn len(&self) -> usize {
        self.maps.values().map(BTreeMap::len).sum()
    }
}
