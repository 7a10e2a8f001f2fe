//! Environment world graph construction.
//!
//! Builds the fixed environment preamble — world output fed by a
//! background shader, whose color comes through a gamma adjustment from an
//! equirectangular environment texture — and assigns environment images to
//! it.

use std::path::Path;

use crate::diag::Diagnostic;
use crate::graph::{NodeKind, ShadingHost, VectorType};

use super::ShadingError;

/// Builder for node-based environment worlds.
pub struct WorldBuilder<'h, H: ShadingHost> {
    host: &'h mut H,
    env_node: H::NodeId,
    diagnostics: Vec<Diagnostic>,
}

impl<'h, H: ShadingHost> WorldBuilder<'h, H> {
    /// Clear the graph and create the environment preamble.
    pub fn create(host: &'h mut H) -> Result<Self, ShadingError> {
        host.clear();

        let out_node = host.add_node(NodeKind::OutputWorld, [600.0, 300.0]);
        let bg_node = host.add_node(NodeKind::Background, [400.0, 300.0]);
        let gamma_node = host.add_node(NodeKind::Gamma, [200.0, 300.0]);
        let env_node = host.add_node(NodeKind::TexEnvironment, [-100.0, 300.0]);
        let map_node = host.add_node(NodeKind::Mapping(VectorType::Point), [-300.0, 300.0]);
        let tc_node = host.add_node(NodeKind::TexCoord, [-500.0, 300.0]);

        host.link((out_node, "Surface"), (bg_node, "Background"))?;
        host.link((bg_node, "Color"), (gamma_node, "Color"))?;
        host.link((gamma_node, "Color"), (env_node, "Color"))?;
        host.link((env_node, "Vector"), (map_node, "Vector"))?;
        host.link((map_node, "Vector"), (tc_node, "Generated"))?;

        Ok(Self {
            host,
            env_node,
            diagnostics: Vec::new(),
        })
    }

    /// Bind to an existing world graph, locating its environment texture
    /// node. [`ShadingError::NoEnvironmentNode`] if the graph has none.
    pub fn attach(host: &'h mut H) -> Result<Self, ShadingError> {
        let env_node = host
            .find_node_by_kind(NodeKind::TexEnvironment)
            .ok_or(ShadingError::NoEnvironmentNode)?;

        Ok(Self {
            host,
            env_node,
            diagnostics: Vec::new(),
        })
    }

    /// Load an environment image and assign it to the environment texture
    /// node. A failed load is recorded as a diagnostic and leaves the node
    /// unchanged.
    pub fn load_environment_image(&mut self, path: &Path) -> Result<(), ShadingError> {
        match self.host.load_image(path) {
            Ok(image) => {
                self.host.assign_image(self.env_node, image)?;
                log::info!("environment image loaded: {}", path.display());
            }
            Err(err) => {
                log::warn!(
                    "failed to load environment image {}: {err}",
                    path.display()
                );
                self.diagnostics.push(Diagnostic::ImageLoadFailed {
                    path: path.to_path_buf(),
                    detail: err.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Observations collected while loading images.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryHost;

    #[test]
    fn test_environment_preamble() {
        let mut host = MemoryHost::new();
        WorldBuilder::create(&mut host).unwrap();

        assert_eq!(host.node_count(), 6);
        let topology = host.topology();
        assert!(topology.contains(&"Background.Background -> OutputWorld.Surface".to_string()));
        assert!(topology.contains(&"Gamma.Color -> Background.Color".to_string()));
        assert!(topology.contains(&"TexEnvironment.Color -> Gamma.Color".to_string()));
        assert!(topology.contains(&"Mapping.Vector -> TexEnvironment.Vector".to_string()));
        assert!(topology.contains(&"TexCoord.Generated -> Mapping.Vector".to_string()));
    }

    #[test]
    fn test_attach_requires_environment_node() {
        let mut empty = MemoryHost::new();
        assert!(matches!(
            WorldBuilder::attach(&mut empty),
            Err(ShadingError::NoEnvironmentNode)
        ));

        let mut host = MemoryHost::new();
        WorldBuilder::create(&mut host).unwrap();
        assert!(WorldBuilder::attach(&mut host).is_ok());
    }

    #[test]
    fn test_missing_environment_image_is_non_fatal() {
        let mut host = MemoryHost::new();
        let mut builder = WorldBuilder::create(&mut host).unwrap();
        builder
            .load_environment_image(Path::new("/no/such/env.exr"))
            .unwrap();
        assert_eq!(builder.diagnostics().len(), 1);
    }
}
