//! Import configuration.
//!
//! Covers the knobs the import flow exposes: which image extensions are
//! accepted, whether WebP is enabled, and where extracted textures are
//! placed relative to the current project.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading/saving errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File-system level failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid TOML for this configuration.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Settings for texture import and material creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Accepted image file extensions, lower-case, without the dot.
    pub image_extensions: Vec<String>,
    /// Whether `.webp` files are accepted in addition to `image_extensions`.
    pub enable_webp: bool,
    /// Directory extracted textures are placed in, relative to the current
    /// project.
    pub textures_dir: String,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            image_extensions: vec![
                "jpg".to_string(),
                "png".to_string(),
                "tif".to_string(),
                "exr".to_string(),
            ],
            enable_webp: false,
            textures_dir: "textures".to_string(),
        }
    }
}

impl ImportConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Whether the given extension (without the dot, any case) is an
    /// accepted image extension.
    pub fn accepts_extension(&self, ext: &str) -> bool {
        let ext = ext.to_ascii_lowercase();
        if self.enable_webp && ext == "webp" {
            return true;
        }
        self.image_extensions.iter().any(|accepted| accepted == &ext)
    }

    /// Whether the given path has an accepted image extension.
    pub fn is_image_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.accepts_extension(ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_extensions() {
        let config = ImportConfig::default();
        assert!(config.accepts_extension("jpg"));
        assert!(config.accepts_extension("PNG"));
        assert!(config.accepts_extension("exr"));
        assert!(!config.accepts_extension("webp"));
        assert!(!config.accepts_extension("zip"));
    }

    #[test]
    fn test_webp_toggle() {
        let config = ImportConfig {
            enable_webp: true,
            ..Default::default()
        };
        assert!(config.accepts_extension("webp"));
        assert!(config.is_image_file(Path::new("env.webp")));
    }

    #[test]
    fn test_is_image_file() {
        let config = ImportConfig::default();
        assert!(config.is_image_file(Path::new("wood_color_4k.jpg")));
        assert!(config.is_image_file(Path::new("Wood_Color_4K.PNG")));
        assert!(!config.is_image_file(Path::new("pack.zip")));
        assert!(!config.is_image_file(Path::new("no_extension")));
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("import.toml");

        let mut config = ImportConfig::default();
        config.enable_webp = true;
        config.textures_dir = "assets/textures".to_string();
        config.save_to_file(&path).unwrap();

        let loaded = ImportConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.image_extensions, config.image_extensions);
        assert!(loaded.enable_webp);
        assert_eq!(loaded.textures_dir, "assets/textures");
    }
}
