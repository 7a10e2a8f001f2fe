//! Zip archive access: entry listing, single-entry extraction, and archive
//! creation.
//!
//! Classification only ever looks at entry names; entry bytes are read
//! during extraction and nowhere else.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use zip::write::FileOptions;
use zip::{ZipArchive, ZipWriter};

/// Archive access errors.
#[derive(Error, Debug)]
pub enum ArchiveError {
    /// File-system level failure.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The zip container is corrupt or unreadable.
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A requested entry does not exist in the archive.
    #[error("entry not found in archive: {0}")]
    EntryNotFound(String),
}

/// List the entry names of a zip archive, in stored order.
///
/// Directory entries (names ending in `/`) are skipped.
pub fn list_entries(zip_path: &Path) -> Result<Vec<String>, ArchiveError> {
    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut names = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive.by_index(index)?;
        if entry.is_dir() {
            continue;
        }
        names.push(entry.name().to_string());
    }

    Ok(names)
}

/// Stream a single entry out of a zip archive into `dest_dir`, which is
/// created if absent. The output file is named by the entry's base name,
/// ignoring any directory components inside the archive.
///
/// Returns the path of the extracted file.
pub fn extract_entry(
    zip_path: &Path,
    entry_name: &str,
    dest_dir: &Path,
) -> Result<PathBuf, ArchiveError> {
    let file = File::open(zip_path)?;
    let mut archive = ZipArchive::new(file)?;

    let mut entry = match archive.by_name(entry_name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => {
            return Err(ArchiveError::EntryNotFound(entry_name.to_string()));
        }
        Err(err) => return Err(err.into()),
    };

    let base_name = entry_name
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())
        .ok_or_else(|| ArchiveError::EntryNotFound(entry_name.to_string()))?;

    fs::create_dir_all(dest_dir)?;
    let out_path = dest_dir.join(base_name);

    log::debug!("extracting '{}' to {}", entry_name, out_path.display());

    let mut out_file = File::create(&out_path)?;
    io::copy(&mut entry, &mut out_file)?;

    Ok(out_path)
}

/// Create a zip archive from a list of file names under `base_dir`.
///
/// Parent directories of `output_zip` are created as needed. Files that do
/// not exist are skipped with a warning; the remaining files are still
/// written.
pub fn create_zip_archive<P: AsRef<Path>>(
    output_zip: &Path,
    base_dir: &Path,
    file_names: &[P],
) -> Result<(), ArchiveError> {
    if let Some(parent) = output_zip.parent() {
        fs::create_dir_all(parent)?;
    }

    let out_file = File::create(output_zip)?;
    let mut writer = ZipWriter::new(out_file);
    let options = FileOptions::default();

    for file_name in file_names {
        let file_name = file_name.as_ref();
        let file_path = base_dir.join(file_name);

        if !file_path.exists() {
            log::warn!("file not found, skipping: {}", file_path.display());
            continue;
        }

        // Zip entry names use forward slashes regardless of platform
        let entry_name = file_name
            .to_string_lossy()
            .replace('\\', "/");

        writer.start_file(entry_name, options)?;
        let mut input = File::open(&file_path)?;
        io::copy(&mut input, &mut writer)?;
    }

    writer.finish()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        let mut file = File::create(path).unwrap();
        file.write_all(contents).unwrap();
    }

    #[test]
    fn test_create_list_extract_round_trip() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "wood_color_2k.jpg", b"color-bytes");
        write_file(dir.path(), "wood_normal_2k.jpg", b"normal-bytes");

        let zip_path = dir.path().join("out/wood.zip");
        create_zip_archive(
            &zip_path,
            dir.path(),
            &["wood_color_2k.jpg", "wood_normal_2k.jpg"],
        )
        .unwrap();

        let entries = list_entries(&zip_path).unwrap();
        assert_eq!(entries, vec!["wood_color_2k.jpg", "wood_normal_2k.jpg"]);

        let extract_dir = dir.path().join("extracted");
        let out_path = extract_entry(&zip_path, "wood_color_2k.jpg", &extract_dir).unwrap();
        assert_eq!(out_path, extract_dir.join("wood_color_2k.jpg"));
        assert_eq!(fs::read(out_path).unwrap(), b"color-bytes");
    }

    #[test]
    fn test_create_skips_missing_files() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "present.png", b"pixels");

        let zip_path = dir.path().join("partial.zip");
        create_zip_archive(&zip_path, dir.path(), &["present.png", "absent.png"]).unwrap();

        let entries = list_entries(&zip_path).unwrap();
        assert_eq!(entries, vec!["present.png"]);
    }

    #[test]
    fn test_extract_flattens_entry_paths() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "maps/wood_rough_4k.png", b"rough-bytes");

        let zip_path = dir.path().join("nested.zip");
        create_zip_archive(&zip_path, dir.path(), &["maps/wood_rough_4k.png"]).unwrap();

        let extract_dir = dir.path().join("textures");
        let out_path =
            extract_entry(&zip_path, "maps/wood_rough_4k.png", &extract_dir).unwrap();
        assert_eq!(out_path, extract_dir.join("wood_rough_4k.png"));
    }

    #[test]
    fn test_missing_entry_is_an_error() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.png", b"a");

        let zip_path = dir.path().join("a.zip");
        create_zip_archive(&zip_path, dir.path(), &["a.png"]).unwrap();

        let result = extract_entry(&zip_path, "b.png", dir.path());
        assert!(matches!(result, Err(ArchiveError::EntryNotFound(_))));
    }

    #[test]
    fn test_corrupt_archive_is_an_error() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "not_a.zip", b"these are not zip bytes");

        assert!(list_entries(&dir.path().join("not_a.zip")).is_err());
    }
}
