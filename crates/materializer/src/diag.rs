//! Non-fatal observations collected while classifying, extracting, and
//! building.
//!
//! Best-effort file I/O in this crate never fails silently: every dropped
//! entry or skipped file produces a [`Diagnostic`] the caller can surface.

use std::fmt;
use std::path::PathBuf;

use crate::texset::MapType;

/// A single non-fatal observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// An archive could not be opened or read; classification degraded to
    /// an empty result.
    UnreadableArchive {
        /// Path of the archive.
        path: PathBuf,
        /// Underlying error text.
        detail: String,
    },
    /// A file matched a map-type pattern but carried no resolution token,
    /// so it could not be placed in the texture set.
    MissingResolution {
        /// Entry name within the source.
        entry: String,
        /// The map type that matched.
        map_type: MapType,
    },
    /// A directory (or single-image) source was detected; these sources are
    /// enumerated but not classified for map type or resolution.
    UnclassifiedDirectory {
        /// The directory that was scanned.
        path: PathBuf,
        /// Number of candidate image files found in it.
        candidates: usize,
    },
    /// One entry failed to extract; the remaining entries still proceed.
    ExtractionFailed {
        /// Entry name within the archive.
        entry: String,
        /// Underlying error text.
        detail: String,
    },
    /// An image failed to load; the graph node was created without an image.
    ImageLoadFailed {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying error text.
        detail: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnreadableArchive { path, detail } => {
                write!(f, "unreadable archive {}: {detail}", path.display())
            }
            Diagnostic::MissingResolution { entry, map_type } => {
                write!(f, "'{entry}' matched map type '{map_type}' but has no resolution token")
            }
            Diagnostic::UnclassifiedDirectory { path, candidates } => {
                write!(
                    f,
                    "directory {} contains {candidates} candidate file(s) but directory sources are not classified",
                    path.display()
                )
            }
            Diagnostic::ExtractionFailed { entry, detail } => {
                write!(f, "failed to extract '{entry}': {detail}")
            }
            Diagnostic::ImageLoadFailed { path, detail } => {
                write!(f, "failed to load image {}: {detail}", path.display())
            }
        }
    }
}
