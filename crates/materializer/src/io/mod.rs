//! File input/output helpers.

pub mod archive;

pub use archive::{create_zip_archive, extract_entry, list_entries, ArchiveError};
