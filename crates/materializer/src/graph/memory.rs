//! In-memory [`ShadingHost`] implementation.
//!
//! Stores nodes and images in slot maps and validates socket names against
//! each node kind's socket table, so tests exercise the same wiring
//! mistakes a real host would reject.

use std::path::{Path, PathBuf};

use slotmap::{new_key_type, SlotMap};

use super::{ColorSpace, GraphError, ImageError, NodeKind, ShadingHost};

new_key_type! {
    /// Stable handle to a node in a [`MemoryHost`] graph.
    pub struct NodeKey;

    /// Stable handle to an image loaded by a [`MemoryHost`].
    pub struct ImageKey;
}

/// A node in the in-memory graph.
#[derive(Debug, Clone)]
pub struct MemoryNode {
    /// Kind and construction parameters.
    pub kind: NodeKind,
    /// Display label, if one was set.
    pub label: Option<String>,
    /// Layout position.
    pub location: [f32; 2],
    /// Assigned image, for image-texture nodes.
    pub image: Option<ImageKey>,
}

/// A directed link from an output socket to an input socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryLink {
    /// Source node and output socket name.
    pub from: (NodeKey, String),
    /// Destination node and input socket name.
    pub to: (NodeKey, String),
}

/// A loaded image resource.
#[derive(Debug, Clone)]
pub struct MemoryImage {
    /// Path the image was loaded from.
    pub path: PathBuf,
    /// Decoded pixel dimensions.
    pub dimensions: (u32, u32),
    /// Current color space metadata.
    pub colorspace: ColorSpace,
}

/// In-memory shading graph plus its image resources.
#[derive(Debug, Default)]
pub struct MemoryHost {
    name: String,
    nodes: SlotMap<NodeKey, MemoryNode>,
    links: Vec<MemoryLink>,
    images: SlotMap<ImageKey, MemoryImage>,
}

impl MemoryHost {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// The graph name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of links.
    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    /// Access a node by handle.
    pub fn node(&self, key: NodeKey) -> Option<&MemoryNode> {
        self.nodes.get(key)
    }

    /// Access a loaded image by handle.
    pub fn image(&self, key: ImageKey) -> Option<&MemoryImage> {
        self.images.get(key)
    }

    /// Iterate over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeKey, &MemoryNode)> {
        self.nodes.iter()
    }

    /// All links, in creation order.
    pub fn links(&self) -> &[MemoryLink] {
        &self.links
    }

    /// The link feeding an input socket, if any.
    pub fn link_into(&self, node: NodeKey, socket: &str) -> Option<&MemoryLink> {
        self.links
            .iter()
            .find(|link| link.to.0 == node && link.to.1 == socket)
    }

    /// Topology summary: sorted `"FromKind.Socket -> ToKind.Socket"` lines,
    /// independent of node identity and layout. Two graphs with equal
    /// summaries (and equal node kind counts) are topologically identical.
    pub fn topology(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .links
            .iter()
            .map(|link| {
                let from = &self.nodes[link.from.0];
                let to = &self.nodes[link.to.0];
                format!(
                    "{}.{} -> {}.{}",
                    from.kind.name(),
                    link.from.1,
                    to.kind.name(),
                    link.to.1
                )
            })
            .collect();
        lines.sort();
        lines
    }

    fn check_socket(
        kind: NodeKind,
        socket: &str,
        direction: &'static str,
        table: &[&str],
    ) -> Result<(), GraphError> {
        if table.contains(&socket) {
            Ok(())
        } else {
            Err(GraphError::UnknownSocket {
                node: kind.name().to_string(),
                socket: socket.to_string(),
                direction,
            })
        }
    }
}

impl ShadingHost for MemoryHost {
    type NodeId = NodeKey;
    type ImageId = ImageKey;

    fn set_graph_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    fn clear(&mut self) {
        self.nodes.clear();
        self.links.clear();
    }

    fn add_node(&mut self, kind: NodeKind, location: [f32; 2]) -> NodeKey {
        self.nodes.insert(MemoryNode {
            kind,
            label: None,
            location,
            image: None,
        })
    }

    fn set_node_label(&mut self, node: NodeKey, label: &str) -> Result<(), GraphError> {
        let node = self.nodes.get_mut(node).ok_or(GraphError::UnknownNode)?;
        node.label = Some(label.to_string());
        Ok(())
    }

    fn find_node_by_label(&self, label: &str) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find(|(_, node)| node.label.as_deref() == Some(label))
            .map(|(key, _)| key)
    }

    fn find_node_by_kind(&self, kind: NodeKind) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find(|(_, node)| node.kind.name() == kind.name())
            .map(|(key, _)| key)
    }

    fn node_location(&self, node: NodeKey) -> Result<[f32; 2], GraphError> {
        self.nodes
            .get(node)
            .map(|node| node.location)
            .ok_or(GraphError::UnknownNode)
    }

    fn link(&mut self, input: (NodeKey, &str), output: (NodeKey, &str)) -> Result<(), GraphError> {
        let in_node = self.nodes.get(input.0).ok_or(GraphError::UnknownNode)?;
        let out_node = self.nodes.get(output.0).ok_or(GraphError::UnknownNode)?;

        Self::check_socket(in_node.kind, input.1, "input", in_node.kind.input_sockets())?;
        Self::check_socket(
            out_node.kind,
            output.1,
            "output",
            out_node.kind.output_sockets(),
        )?;

        // An input socket holds at most one link; relinking replaces it
        self.links
            .retain(|link| !(link.to.0 == input.0 && link.to.1 == input.1));
        self.links.push(MemoryLink {
            from: (output.0, output.1.to_string()),
            to: (input.0, input.1.to_string()),
        });
        Ok(())
    }

    fn load_image(&mut self, path: &Path) -> Result<ImageKey, ImageError> {
        if !path.exists() {
            return Err(ImageError::NotFound(path.to_path_buf()));
        }

        let dimensions = image::image_dimensions(path)
            .map_err(|err| ImageError::LoadFailed(err.to_string()))?;

        log::debug!(
            "loaded image {} ({}x{})",
            path.display(),
            dimensions.0,
            dimensions.1
        );

        Ok(self.images.insert(MemoryImage {
            path: path.to_path_buf(),
            dimensions,
            colorspace: ColorSpace::default(),
        }))
    }

    fn set_image_colorspace(
        &mut self,
        image: ImageKey,
        colorspace: ColorSpace,
    ) -> Result<(), GraphError> {
        let image = self.images.get_mut(image).ok_or(GraphError::UnknownImage)?;
        image.colorspace = colorspace;
        Ok(())
    }

    fn assign_image(&mut self, node: NodeKey, image: ImageKey) -> Result<(), GraphError> {
        if !self.images.contains_key(image) {
            return Err(GraphError::UnknownImage);
        }
        let node = self.nodes.get_mut(node).ok_or(GraphError::UnknownNode)?;
        node.image = Some(image);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Interpolation;

    #[test]
    fn test_add_and_label_nodes() {
        let mut host = MemoryHost::new();
        let bsdf = host.add_node(NodeKind::BsdfPrincipled, [0.0, 300.0]);
        host.set_node_label(bsdf, "Shader").unwrap();

        assert_eq!(host.find_node_by_label("Shader"), Some(bsdf));
        assert_eq!(host.find_node_by_label("Other"), None);
        assert_eq!(host.find_node_by_kind(NodeKind::BsdfPrincipled), Some(bsdf));
        assert_eq!(host.node_location(bsdf).unwrap(), [0.0, 300.0]);
    }

    #[test]
    fn test_link_validates_socket_names() {
        let mut host = MemoryHost::new();
        let out = host.add_node(NodeKind::OutputMaterial, [300.0, 300.0]);
        let bsdf = host.add_node(NodeKind::BsdfPrincipled, [0.0, 300.0]);

        host.link((out, "Surface"), (bsdf, "BSDF")).unwrap();

        let err = host.link((out, "Volume"), (bsdf, "BSDF")).unwrap_err();
        assert!(matches!(
            err,
            GraphError::UnknownSocket { direction: "input", .. }
        ));

        let err = host.link((out, "Surface"), (bsdf, "Shader")).unwrap_err();
        assert!(matches!(
            err,
            GraphError::UnknownSocket { direction: "output", .. }
        ));
    }

    #[test]
    fn test_relink_replaces_input_link() {
        let mut host = MemoryHost::new();
        let bsdf = host.add_node(NodeKind::BsdfPrincipled, [0.0, 0.0]);
        let tex_a = host.add_node(NodeKind::TexImage(Interpolation::Linear), [-500.0, 0.0]);
        let tex_b = host.add_node(NodeKind::TexImage(Interpolation::Linear), [-500.0, -280.0]);

        host.link((bsdf, "Base Color"), (tex_a, "Color")).unwrap();
        host.link((bsdf, "Base Color"), (tex_b, "Color")).unwrap();

        assert_eq!(host.link_count(), 1);
        let link = host.link_into(bsdf, "Base Color").unwrap();
        assert_eq!(link.from.0, tex_b);
    }

    #[test]
    fn test_clear_empties_graph() {
        let mut host = MemoryHost::new();
        let out = host.add_node(NodeKind::OutputMaterial, [300.0, 300.0]);
        let bsdf = host.add_node(NodeKind::BsdfPrincipled, [0.0, 300.0]);
        host.link((out, "Surface"), (bsdf, "BSDF")).unwrap();

        host.clear();
        assert_eq!(host.node_count(), 0);
        assert_eq!(host.link_count(), 0);
    }

    #[test]
    fn test_missing_image_load_fails() {
        let mut host = MemoryHost::new();
        let result = host.load_image(Path::new("/no/such/image.png"));
        assert!(matches!(result, Err(ImageError::NotFound(_))));
    }
}
