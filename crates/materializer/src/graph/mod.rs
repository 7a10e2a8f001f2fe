//! Abstract shading-graph capabilities.
//!
//! The host application owns the real node-graph objects; this module
//! specifies the small contract the builders need from it: create typed
//! nodes at positions, connect named sockets, look nodes up again, and load
//! images with mutable colorspace metadata. [`memory::MemoryHost`] is a
//! self-contained implementation backing the tests and the demo CLI.

pub mod memory;

pub use memory::MemoryHost;

use std::fmt::Debug;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Color space metadata attached to a loaded image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorSpace {
    /// Standard display color space; the default for loaded images.
    #[default]
    Srgb,
    /// Raw data channels (roughness, normals, height); not color-managed.
    NonColor,
}

/// Blend mode of a mix node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendType {
    /// Linear interpolation between the inputs.
    Mix,
    /// Component-wise multiplication.
    Multiply,
}

/// Operation of a math node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathOperation {
    /// `a * b`
    Multiply,
    /// `a + b`
    Add,
    /// `a * b + c`
    MultiplyAdd,
}

/// Texture sampling interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interpolation {
    /// Bilinear sampling; the default.
    Linear,
    /// Cubic sampling; used for height data fed into displacement.
    Cubic,
}

/// Coordinate interpretation of a mapping node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VectorType {
    /// Transform as a point.
    Point,
    /// Transform as a texture lookup (inverse point transform).
    Texture,
}

/// The node types the builders create, with per-kind parameters fixed at
/// construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// Material output (surface + displacement).
    OutputMaterial,
    /// World output.
    OutputWorld,
    /// Principled BSDF shading node.
    BsdfPrincipled,
    /// Texture coordinate source.
    TexCoord,
    /// Coordinate mapping transform.
    Mapping(VectorType),
    /// Image texture sampler.
    TexImage(Interpolation),
    /// Equirectangular environment texture sampler.
    TexEnvironment,
    /// Brightness/contrast adjustment.
    BrightContrast,
    /// Two-color mix with a blend factor.
    MixRgb {
        /// Blend mode.
        blend: BlendType,
        /// Blend factor default (0 = first input, 1 = full blend).
        factor: f32,
    },
    /// Scalar math.
    Math {
        /// Operation applied to the inputs.
        operation: MathOperation,
        /// Default for the second operand.
        operand_b: f32,
        /// Default for the third operand (multiply-add addend).
        operand_c: f32,
    },
    /// Tangent-space normal map decoder.
    NormalMap,
    /// Height-to-displacement conversion.
    Displacement,
    /// World background shader.
    Background,
    /// Gamma adjustment.
    Gamma,
}

impl NodeKind {
    /// Stable kind name, used for display and kind-based lookup. Two kinds
    /// with the same name differ only in parameters.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::OutputMaterial => "OutputMaterial",
            NodeKind::OutputWorld => "OutputWorld",
            NodeKind::BsdfPrincipled => "BsdfPrincipled",
            NodeKind::TexCoord => "TexCoord",
            NodeKind::Mapping(_) => "Mapping",
            NodeKind::TexImage(_) => "TexImage",
            NodeKind::TexEnvironment => "TexEnvironment",
            NodeKind::BrightContrast => "BrightContrast",
            NodeKind::MixRgb { .. } => "MixRgb",
            NodeKind::Math { .. } => "Math",
            NodeKind::NormalMap => "NormalMap",
            NodeKind::Displacement => "Displacement",
            NodeKind::Background => "Background",
            NodeKind::Gamma => "Gamma",
        }
    }

    /// Named input sockets of this kind.
    pub fn input_sockets(&self) -> &'static [&'static str] {
        match self {
            NodeKind::OutputMaterial => &["Surface", "Displacement"],
            NodeKind::OutputWorld => &["Surface"],
            NodeKind::BsdfPrincipled => {
                &["Base Color", "Metallic", "Roughness", "Alpha", "Normal"]
            }
            NodeKind::TexCoord => &[],
            NodeKind::Mapping(_) => &["Vector"],
            NodeKind::TexImage(_) | NodeKind::TexEnvironment => &["Vector"],
            NodeKind::BrightContrast => &["Color", "Bright", "Contrast"],
            NodeKind::MixRgb { .. } => &["Fac", "Color1", "Color2"],
            NodeKind::Math { .. } => &["Value"],
            NodeKind::NormalMap => &["Strength", "Color"],
            NodeKind::Displacement => &["Height", "Midlevel", "Scale"],
            NodeKind::Background => &["Color", "Strength"],
            NodeKind::Gamma => &["Color", "Gamma"],
        }
    }

    /// Named output sockets of this kind.
    pub fn output_sockets(&self) -> &'static [&'static str] {
        match self {
            NodeKind::OutputMaterial | NodeKind::OutputWorld => &[],
            NodeKind::BsdfPrincipled => &["BSDF"],
            NodeKind::TexCoord => &["UV", "Generated"],
            NodeKind::Mapping(_) => &["Vector"],
            NodeKind::TexImage(_) => &["Color", "Alpha"],
            NodeKind::TexEnvironment => &["Color"],
            NodeKind::BrightContrast | NodeKind::MixRgb { .. } | NodeKind::Gamma => &["Color"],
            NodeKind::Math { .. } => &["Value"],
            NodeKind::NormalMap => &["Normal"],
            NodeKind::Displacement => &["Displacement"],
            NodeKind::Background => &["Background"],
        }
    }
}

/// Graph manipulation errors.
#[derive(Error, Debug)]
pub enum GraphError {
    /// A node handle does not refer to a live node.
    #[error("unknown node")]
    UnknownNode,

    /// An image handle does not refer to a loaded image.
    #[error("unknown image")]
    UnknownImage,

    /// A socket name does not exist on the node it was addressed to.
    #[error("node '{node}' has no {direction} socket '{socket}'")]
    UnknownSocket {
        /// Kind name of the node.
        node: String,
        /// The socket that was requested.
        socket: String,
        /// `"input"` or `"output"`.
        direction: &'static str,
    },
}

/// Image loading errors.
#[derive(Error, Debug)]
pub enum ImageError {
    /// The image file does not exist.
    #[error("image not found: {0}")]
    NotFound(PathBuf),

    /// The image file exists but could not be decoded.
    #[error("failed to load image: {0}")]
    LoadFailed(String),
}

/// Capabilities a host must provide for graph construction.
///
/// One implementation wraps one shading graph (a material's or a world's
/// node tree). Links connect a named output socket of one node to a named
/// input socket of another; linking into an occupied input socket replaces
/// the previous link, so re-wiring is expressed the same way as wiring.
pub trait ShadingHost {
    /// Handle to a node in this graph.
    type NodeId: Copy + Eq + Debug;
    /// Handle to a loaded image resource.
    type ImageId: Copy + Eq + Debug;

    /// Name the graph (shown by hosts as the material/world name).
    fn set_graph_name(&mut self, name: &str);

    /// Remove all nodes and links.
    fn clear(&mut self);

    /// Create a node of the given kind at the given position.
    fn add_node(&mut self, kind: NodeKind, location: [f32; 2]) -> Self::NodeId;

    /// Attach a display label to a node.
    fn set_node_label(&mut self, node: Self::NodeId, label: &str) -> Result<(), GraphError>;

    /// Find the first node carrying the given label.
    fn find_node_by_label(&self, label: &str) -> Option<Self::NodeId>;

    /// Find the first node of the given kind, compared by kind name
    /// (parameters are ignored).
    fn find_node_by_kind(&self, kind: NodeKind) -> Option<Self::NodeId>;

    /// The position a node was created at.
    fn node_location(&self, node: Self::NodeId) -> Result<[f32; 2], GraphError>;

    /// Connect `output`'s named output socket to `input`'s named input
    /// socket, replacing any existing link into that input.
    fn link(
        &mut self,
        input: (Self::NodeId, &str),
        output: (Self::NodeId, &str),
    ) -> Result<(), GraphError>;

    /// Load an image resource from a path.
    fn load_image(&mut self, path: &Path) -> Result<Self::ImageId, ImageError>;

    /// Override an image's color space metadata.
    fn set_image_colorspace(
        &mut self,
        image: Self::ImageId,
        colorspace: ColorSpace,
    ) -> Result<(), GraphError>;

    /// Assign a loaded image to an image-texture node.
    fn assign_image(&mut self, node: Self::NodeId, image: Self::ImageId)
        -> Result<(), GraphError>;
}
