//! Material and world factories: the entry points a host action calls.
//!
//! `MaterialFactory` covers the texture-pack flow (classify a source, pick
//! a resolution, build the material); `WorldFactory` covers single
//! environment images.

use std::path::Path;

use crate::config::ImportConfig;
use crate::diag::Diagnostic;
use crate::graph::ShadingHost;
use crate::shading::{PbrMaterialBuilder, ShadingError, WorldBuilder};
use crate::texset::{self, ImportSession, Materialized, TexSetError};

/// Unified factory for PBR materials built from texture sets.
pub struct MaterialFactory;

impl MaterialFactory {
    /// Whether a picked path is something the import flow can handle: a
    /// zip archive or an accepted image file.
    pub fn can_import(path: &Path, config: &ImportConfig) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        ext.eq_ignore_ascii_case("zip") || config.accepts_extension(ext)
    }

    /// Classify a source path into an import session.
    ///
    /// The session carries the texture set, the diagnostics, and the
    /// source needed for extraction; it replaces any cross-call state
    /// between "analyze" and "create".
    pub fn classify(
        path: impl AsRef<Path>,
        config: &ImportConfig,
    ) -> Result<ImportSession, TexSetError> {
        texset::classify(path, config)
    }

    /// Build a material graph from a materialized map set.
    ///
    /// Construction is atomic: on failure the graph is cleared before the
    /// error is returned, so no partially wired graph is left attached.
    /// Returns the image-loading diagnostics on success.
    pub fn create_material<H: ShadingHost>(
        host: &mut H,
        name: &str,
        maps: &Materialized,
    ) -> Result<Vec<Diagnostic>, ShadingError> {
        host.set_graph_name(name);

        match Self::build_maps(host, maps) {
            Ok(diagnostics) => {
                log::info!("created material '{name}' with {} map(s)", maps.paths().len());
                Ok(diagnostics)
            }
            Err(err) => {
                host.clear();
                Err(err)
            }
        }
    }

    fn build_maps<H: ShadingHost>(
        host: &mut H,
        maps: &Materialized,
    ) -> Result<Vec<Diagnostic>, ShadingError> {
        let mut builder = PbrMaterialBuilder::new(host)?;
        for (&map_type, path) in maps.paths() {
            builder.load_image_map(map_type, path)?;
        }
        Ok(builder.into_diagnostics())
    }
}

/// Factory for environment worlds.
pub struct WorldFactory;

impl WorldFactory {
    /// Clear the world graph and create the environment preamble.
    pub fn create_world<H: ShadingHost>(host: &mut H) -> Result<(), ShadingError> {
        WorldBuilder::create(host)?;
        Ok(())
    }

    /// Assign an environment image to the world graph, creating the
    /// environment preamble first if the graph has none.
    pub fn load_environment_image<H: ShadingHost>(
        host: &mut H,
        path: &Path,
    ) -> Result<Vec<Diagnostic>, ShadingError> {
        let mut builder = match WorldBuilder::attach(host) {
            Ok(builder) => builder,
            Err(ShadingError::NoEnvironmentNode) => WorldBuilder::create(host)?,
            Err(err) => return Err(err),
        };

        builder.load_environment_image(path)?;
        Ok(builder.diagnostics().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryHost;
    use crate::io::archive::create_zip_archive;
    use crate::texset::Resolution;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, contents: &[u8]) {
        let path = dir.join(name);
        let mut file = File::create(path).unwrap();
        file.write_all(contents).unwrap();
    }

    #[test]
    fn test_can_import() {
        let config = ImportConfig::default();
        assert!(MaterialFactory::can_import(Path::new("pack.zip"), &config));
        assert!(MaterialFactory::can_import(Path::new("wood.jpg"), &config));
        assert!(MaterialFactory::can_import(Path::new("env.EXR"), &config));
        assert!(!MaterialFactory::can_import(Path::new("model.obj"), &config));
        assert!(!MaterialFactory::can_import(Path::new("no_extension"), &config));
    }

    #[test]
    fn test_end_to_end_archive_to_material() {
        let dir = TempDir::new().unwrap();
        let names = ["wood_color_2k.jpg", "wood_normal_2k.jpg", "wood_rough_2k.jpg"];
        for name in names {
            write_file(dir.path(), name, b"not real image bytes");
        }
        let zip_path = dir.path().join("wood.zip");
        create_zip_archive(&zip_path, dir.path(), &names).unwrap();

        let config = ImportConfig::default();
        let session = MaterialFactory::classify(&zip_path, &config).unwrap();
        assert_eq!(session.resolutions(), vec![Resolution::K2]);

        let dest = dir.path().join(&config.textures_dir);
        let maps = session.materialize(Resolution::K2, &dest).unwrap();
        assert_eq!(maps.paths().len(), 3);
        assert_eq!(fs::read_dir(&dest).unwrap().count(), 3);

        let mut host = MemoryHost::new();
        let diagnostics = MaterialFactory::create_material(&mut host, "wood", &maps).unwrap();

        assert_eq!(host.name(), "wood");
        assert_eq!(host.node_count(), 10);
        // The fixture files are not decodable images, so every map reports
        // a load failure and its node stays imageless
        assert_eq!(diagnostics.len(), 3);
    }

    #[test]
    fn test_round_trip_with_valid_images() {
        let dir = TempDir::new().unwrap();
        let names = ["wood_color_2k.png", "wood_normal_2k.png", "wood_rough_2k.png"];
        for name in names {
            let pixel = image::Rgba([128u8, 128, 128, 255]);
            image::RgbaImage::from_pixel(2, 2, pixel)
                .save(dir.path().join(name))
                .unwrap();
        }
        let zip_path = dir.path().join("wood.zip");
        create_zip_archive(&zip_path, dir.path(), &names).unwrap();

        let config = ImportConfig::default();
        let session = MaterialFactory::classify(&zip_path, &config).unwrap();
        let maps = session
            .materialize(Resolution::K2, &dir.path().join("textures"))
            .unwrap();

        let mut host = MemoryHost::new();
        let diagnostics = MaterialFactory::create_material(&mut host, "wood", &maps).unwrap();
        assert!(diagnostics.is_empty());

        // Every image node carries its loaded image, and data maps were
        // forced to non-color
        for (label, expected) in [
            ("Base Color", crate::graph::ColorSpace::Srgb),
            ("Normal", crate::graph::ColorSpace::NonColor),
            ("Roughness", crate::graph::ColorSpace::NonColor),
        ] {
            let (_, node) = host
                .nodes()
                .find(|(_, node)| node.label.as_deref() == Some(label))
                .unwrap();
            let image_key = node.image.expect("image node should carry an image");
            assert_eq!(host.image(image_key).unwrap().colorspace, expected);
        }
    }

    #[test]
    fn test_failed_build_leaves_no_partial_graph() {
        // Bypass classification: hand the builder an unsupported map type
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "wood_gloss_2k.jpg", b"bytes");
        let mut host = MemoryHost::new();

        let mut paths = std::collections::BTreeMap::new();
        paths.insert(
            crate::texset::MapType::Gloss,
            dir.path().join("wood_gloss_2k.jpg"),
        );
        let maps = Materialized::from_paths(paths);

        let err = MaterialFactory::create_material(&mut host, "wood", &maps).unwrap_err();
        assert!(matches!(err, ShadingError::UnsupportedMapType(_)));
        assert_eq!(host.node_count(), 0);
        assert_eq!(host.link_count(), 0);
    }

    #[test]
    fn test_world_factory_creates_preamble_on_demand() {
        let mut host = MemoryHost::new();
        let diagnostics =
            WorldFactory::load_environment_image(&mut host, Path::new("/no/such/env.exr"))
                .unwrap();

        // Preamble created even though the image load failed
        assert_eq!(host.node_count(), 6);
        assert_eq!(diagnostics.len(), 1);
    }
}
