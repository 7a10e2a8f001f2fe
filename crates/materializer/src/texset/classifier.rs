//! Source detection, classification, and extraction.
//!
//! The flow is: [`classify`] a source path into an [`ImportSession`], ask
//! the session for its available resolutions, then
//! [`ImportSession::materialize`] the chosen resolution into usable file
//! paths.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::ImportConfig;
use crate::diag::Diagnostic;
use crate::io::archive;
use crate::texset::map_type::{self, MapType};
use crate::texset::resolution::Resolution;
use crate::texset::{TexSetError, TextureSet};

/// A source location for texture maps, with the enumeration strategy it
/// implies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    /// A single image file. Classification falls back to the containing
    /// directory, so siblings are scanned too.
    Image(PathBuf),
    /// A directory of image files.
    Directory(PathBuf),
    /// A zip archive; entries need extraction before they are usable.
    Archive(PathBuf),
}

impl SourceKind {
    /// Determine the source kind for a path.
    pub fn detect(path: &Path, config: &ImportConfig) -> Result<Self, TexSetError> {
        if !path.exists() {
            return Err(TexSetError::SourceNotFound(path.to_path_buf()));
        }
        if path.is_dir() {
            return Ok(SourceKind::Directory(path.to_path_buf()));
        }

        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        if ext == "zip" {
            Ok(SourceKind::Archive(path.to_path_buf()))
        } else if config.accepts_extension(&ext) {
            Ok(SourceKind::Image(path.to_path_buf()))
        } else {
            Err(TexSetError::UnsupportedSourceType(path.to_path_buf()))
        }
    }

    /// The underlying path.
    pub fn path(&self) -> &Path {
        match self {
            SourceKind::Image(path) | SourceKind::Directory(path) | SourceKind::Archive(path) => {
                path
            }
        }
    }
}

/// One in-progress import: the classified texture set, its source, and the
/// diagnostics collected along the way.
///
/// The session is the unit of state between "pick a source" and "create the
/// material": it carries everything a resolution selector needs, and it is
/// discarded once the material is built.
#[derive(Debug, Clone)]
pub struct ImportSession {
    source: SourceKind,
    set: TextureSet,
    diagnostics: Vec<Diagnostic>,
}

impl ImportSession {
    /// The source this session was classified from.
    pub fn source(&self) -> &SourceKind {
        &self.source
    }

    /// The classified texture set.
    pub fn texture_set(&self) -> &TextureSet {
        &self.set
    }

    /// Observations collected during classification.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Resolutions present in the texture set, in canonical order (1k
    /// first), regardless of the order entries were encountered.
    pub fn resolutions(&self) -> Vec<Resolution> {
        self.set.resolutions().collect()
    }

    /// Produce usable absolute file paths for one resolution.
    ///
    /// For archive sources each selected entry is streamed into `dest_dir`
    /// (created if absent), named by its entry base name. A failed entry
    /// skips only that map and is reported in the result's diagnostics; the
    /// other entries still proceed. For non-archive sources the stored
    /// paths are already usable and nothing is copied.
    pub fn materialize(
        &self,
        resolution: Resolution,
        dest_dir: &Path,
    ) -> Result<Materialized, TexSetError> {
        let mut paths = BTreeMap::new();
        let mut diagnostics = Vec::new();

        let Some(maps) = self.set.maps_for(resolution) else {
            return Ok(Materialized { paths, diagnostics });
        };

        match &self.source {
            SourceKind::Archive(zip_path) => {
                for (&map_type, entry) in maps {
                    match archive::extract_entry(zip_path, entry, dest_dir) {
                        Ok(out_path) => {
                            paths.insert(map_type, out_path);
                        }
                        Err(err) => {
                            log::warn!("failed to extract '{entry}': {err}");
                            diagnostics.push(Diagnostic::ExtractionFailed {
                                entry: entry.clone(),
                                detail: err.to_string(),
                            });
                        }
                    }
                }
            }
            SourceKind::Image(_) | SourceKind::Directory(_) => {
                for (&map_type, entry) in maps {
                    paths.insert(map_type, PathBuf::from(entry));
                }
            }
        }

        Ok(Materialized { paths, diagnostics })
    }
}

/// Result of [`ImportSession::materialize`]: one usable file path per map
/// type, plus any per-entry failures.
#[derive(Debug, Clone)]
pub struct Materialized {
    paths: BTreeMap<MapType, PathBuf>,
    diagnostics: Vec<Diagnostic>,
}

impl Materialized {
    /// Build a map set directly from known paths, bypassing
    /// classification. Useful when the caller already knows which file is
    /// which.
    pub fn from_paths(paths: BTreeMap<MapType, PathBuf>) -> Self {
        Self {
            paths,
            diagnostics: Vec::new(),
        }
    }

    /// The map-type → file-path mapping.
    pub fn paths(&self) -> &BTreeMap<MapType, PathBuf> {
        &self.paths
    }

    /// Per-entry failures encountered during extraction.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Whether no maps were materialized.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Analyze a source path and classify its contents into a texture set.
///
/// Archives are fully classified from their entry names. Directories (and
/// single images, which anchor to their containing directory) are
/// enumerated but not classified; this is a deliberate limitation of the
/// design, surfaced as a diagnostic rather than silently "fixed". A corrupt
/// archive degrades to an empty set with a diagnostic; no error escapes for
/// it.
pub fn classify(
    path: impl AsRef<Path>,
    config: &ImportConfig,
) -> Result<ImportSession, TexSetError> {
    let path = path.as_ref();
    let source = SourceKind::detect(path, config)?;

    let mut set = TextureSet::new();
    let mut diagnostics = Vec::new();

    match &source {
        SourceKind::Archive(zip_path) => {
            match archive::list_entries(zip_path) {
                Ok(entries) => {
                    classify_entries(&entries, config, &mut set, &mut diagnostics);
                }
                Err(err) => {
                    log::warn!("failed to read archive {}: {err}", zip_path.display());
                    diagnostics.push(Diagnostic::UnreadableArchive {
                        path: zip_path.clone(),
                        detail: err.to_string(),
                    });
                }
            }
        }
        SourceKind::Image(image_path) => {
            // Single images scan their containing folder, like a directory
            // source anchored at the parent.
            let parent = image_path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            scan_directory(parent, config, &mut diagnostics)?;
        }
        SourceKind::Directory(dir_path) => {
            scan_directory(dir_path, config, &mut diagnostics)?;
        }
    }

    log::debug!(
        "classified {} with {} entries, {} diagnostic(s)",
        path.display(),
        set.len(),
        diagnostics.len()
    );

    Ok(ImportSession {
        source,
        set,
        diagnostics,
    })
}

/// Run filename matching over archive entry names, recording matches and
/// observable drops.
fn classify_entries(
    entries: &[String],
    config: &ImportConfig,
    set: &mut TextureSet,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for entry in entries {
        if !config.is_image_file(Path::new(entry)) {
            continue;
        }

        let base = map_type::base_name(entry);
        let Some(matched_type) = map_type::match_map_type(&base) else {
            continue;
        };

        match map_type::find_resolution(&base) {
            Some(resolution) => {
                if let Some(previous) = set.insert(resolution, matched_type, entry.clone()) {
                    log::debug!(
                        "'{entry}' replaces '{previous}' for {} {matched_type}",
                        resolution.label()
                    );
                }
            }
            None => {
                // Typed but unplaceable: the set is indexed by resolution
                diagnostics.push(Diagnostic::MissingResolution {
                    entry: entry.clone(),
                    map_type: matched_type,
                });
            }
        }
    }
}

/// Enumerate a directory's candidate image files. Directory sources are
/// detected but not classified for map type or resolution.
fn scan_directory(
    dir: &Path,
    config: &ImportConfig,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), TexSetError> {
    let mut candidates = 0;
    for dir_entry in fs::read_dir(dir)? {
        let dir_entry = dir_entry?;
        if dir_entry.file_type()?.is_file() && config.is_image_file(&dir_entry.path()) {
            candidates += 1;
        }
    }

    diagnostics.push(Diagnostic::UnclassifiedDirectory {
        path: dir.to_path_buf(),
        candidates,
    });

    Ok(())
}
