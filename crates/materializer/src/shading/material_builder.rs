//! PBR material graph construction.
//!
//! Builds the fixed preamble (output ← principled BSDF, texture coordinate
//! → mapping) and wires one image sub-graph per supplied map type into the
//! principled shading model.

use std::path::Path;

use crate::diag::Diagnostic;
use crate::graph::{
    BlendType, ColorSpace, Interpolation, MathOperation, NodeKind, ShadingHost, VectorType,
};
use crate::texset::MapType;

use super::ShadingError;

/// Vertical distance between successive map rows.
const ROW_STEP: f32 = 280.0;

/// X position of image texture nodes.
const MAP_COLUMN: f32 = -500.0;

/// X position of per-map processing nodes.
const ADJUST_COLUMN: f32 = -200.0;

/// Label of the color map's adjustment node; the occlusion recipe looks it
/// up to re-wire the shared base-color input.
const ADJUST_COLOR_LABEL: &str = "Adjust Color";

/// Label of the occlusion image node; the color recipe looks it up for the
/// same purpose.
const OCCLUSION_LABEL: &str = "Occlusion";

/// Builder for node-based PBR materials.
///
/// Maps may be added in any order; the color and occlusion recipes detect
/// each other through label lookup and converge on the same topology either
/// way.
#[derive(Debug)]
pub struct PbrMaterialBuilder<'h, H: ShadingHost> {
    host: &'h mut H,
    out_node: H::NodeId,
    bsdf_node: H::NodeId,
    mapping_node: H::NodeId,
    pos_y: f32,
    diagnostics: Vec<Diagnostic>,
}

impl<'h, H: ShadingHost> PbrMaterialBuilder<'h, H> {
    /// Map types this builder can wire into the shading model.
    pub const SUPPORTED_MAP_TYPES: &'static [MapType] = &[
        MapType::Color,
        MapType::Alpha,
        MapType::Occlusion,
        MapType::Roughness,
        MapType::Metalness,
        MapType::Normal,
        MapType::Displacement,
    ];

    /// Clear the graph and create the fixed preamble: an output node fed by
    /// a principled BSDF, and a texture-coordinate node feeding a mapping
    /// node that every image node samples through.
    pub fn new(host: &'h mut H) -> Result<Self, ShadingError> {
        host.clear();

        let out_node = host.add_node(NodeKind::OutputMaterial, [300.0, 300.0]);
        let bsdf_node = host.add_node(NodeKind::BsdfPrincipled, [0.0, 300.0]);
        host.link((out_node, "Surface"), (bsdf_node, "BSDF"))?;

        let tc_node = host.add_node(NodeKind::TexCoord, [-900.0, 300.0]);
        let mapping_node = host.add_node(NodeKind::Mapping(VectorType::Texture), [-700.0, 300.0]);
        host.link((mapping_node, "Vector"), (tc_node, "UV"))?;

        Ok(Self {
            host,
            out_node,
            bsdf_node,
            mapping_node,
            pos_y: 300.0,
            diagnostics: Vec::new(),
        })
    }

    /// Bind to an existing graph instead of clearing it.
    ///
    /// The principled BSDF node must already be present
    /// ([`ShadingError::NoBsdfNode`] otherwise); an output node is created
    /// if missing, and the coordinate/mapping preamble is always created
    /// fresh.
    pub fn attach(host: &'h mut H) -> Result<Self, ShadingError> {
        let bsdf_node = host
            .find_node_by_kind(NodeKind::BsdfPrincipled)
            .ok_or(ShadingError::NoBsdfNode)?;

        let out_node = match host.find_node_by_kind(NodeKind::OutputMaterial) {
            Some(node) => node,
            None => {
                let node = host.add_node(NodeKind::OutputMaterial, [300.0, 300.0]);
                host.link((node, "Surface"), (bsdf_node, "BSDF"))?;
                node
            }
        };

        let tc_node = host.add_node(NodeKind::TexCoord, [-900.0, 300.0]);
        let mapping_node = host.add_node(NodeKind::Mapping(VectorType::Texture), [-700.0, 300.0]);
        host.link((mapping_node, "Vector"), (tc_node, "UV"))?;

        Ok(Self {
            host,
            out_node,
            bsdf_node,
            mapping_node,
            pos_y: 300.0,
            diagnostics: Vec::new(),
        })
    }

    /// Load an image from `path` and add it as a map of the given type.
    ///
    /// A failed load is not fatal: the image node is still created and
    /// wired, without an image assigned, and the failure is recorded as a
    /// diagnostic.
    pub fn load_image_map(
        &mut self,
        map_type: MapType,
        path: &Path,
    ) -> Result<&mut Self, ShadingError> {
        match self.host.load_image(path) {
            Ok(image) => self.add_image_map(map_type, Some(image)),
            Err(err) => {
                log::warn!(
                    "failed to load {map_type} image from {}: {err}",
                    path.display()
                );
                self.diagnostics.push(Diagnostic::ImageLoadFailed {
                    path: path.to_path_buf(),
                    detail: err.to_string(),
                });
                self.add_image_map(map_type, None)
            }
        }
    }

    /// Add an image map of the given type and link the corresponding
    /// nodes into the shading model.
    pub fn add_image_map(
        &mut self,
        map_type: MapType,
        image: Option<H::ImageId>,
    ) -> Result<&mut Self, ShadingError> {
        let interpolation = if map_type == MapType::Displacement {
            Interpolation::Cubic
        } else {
            Interpolation::Linear
        };

        let map_node = self
            .host
            .add_node(NodeKind::TexImage(interpolation), [MAP_COLUMN, self.pos_y]);
        if let Some(image) = image {
            self.host.assign_image(map_node, image)?;
        }
        self.host
            .link((map_node, "Vector"), (self.mapping_node, "Vector"))?;

        match map_type {
            MapType::Color => {
                self.host.set_node_label(map_node, "Base Color")?;

                let bc_node = self
                    .host
                    .add_node(NodeKind::BrightContrast, [ADJUST_COLUMN, self.pos_y]);
                self.host.set_node_label(bc_node, ADJUST_COLOR_LABEL)?;
                self.host.link((bc_node, "Color"), (map_node, "Color"))?;

                if let Some(occ_node) = self.host.find_node_by_label(OCCLUSION_LABEL) {
                    let occ_y = self.host.node_location(occ_node)?[1];
                    let mix_node = self.add_multiply_node([ADJUST_COLUMN, occ_y]);
                    self.host.link((mix_node, "Color1"), (bc_node, "Color"))?;
                    self.host.link((mix_node, "Color2"), (occ_node, "Color"))?;
                    self.host
                        .link((self.bsdf_node, "Base Color"), (mix_node, "Color"))?;
                } else {
                    self.host
                        .link((self.bsdf_node, "Base Color"), (bc_node, "Color"))?;
                }
            }

            MapType::Alpha => {
                self.host.set_node_label(map_node, "Alpha")?;
                self.host
                    .link((self.bsdf_node, "Alpha"), (map_node, "Color"))?;
            }

            MapType::Occlusion => {
                self.host.set_node_label(map_node, OCCLUSION_LABEL)?;
                self.force_non_color(image)?;

                if let Some(bc_node) = self.host.find_node_by_label(ADJUST_COLOR_LABEL) {
                    let mix_node = self.add_multiply_node([ADJUST_COLUMN, self.pos_y]);
                    self.host.link((mix_node, "Color1"), (bc_node, "Color"))?;
                    self.host.link((mix_node, "Color2"), (map_node, "Color"))?;
                    self.host
                        .link((self.bsdf_node, "Base Color"), (mix_node, "Color"))?;
                } else {
                    self.host
                        .link((self.bsdf_node, "Base Color"), (map_node, "Color"))?;
                }
            }

            MapType::Roughness => {
                self.host.set_node_label(map_node, "Roughness")?;
                self.force_non_color(image)?;

                let math_node = self.host.add_node(
                    NodeKind::Math {
                        operation: MathOperation::MultiplyAdd,
                        operand_b: 1.0,
                        operand_c: 0.0,
                    },
                    [ADJUST_COLUMN, self.pos_y],
                );
                self.host
                    .link((self.bsdf_node, "Roughness"), (math_node, "Value"))?;
                self.host.link((math_node, "Value"), (map_node, "Color"))?;
            }

            MapType::Metalness => {
                self.host.set_node_label(map_node, "Metalness")?;
                self.force_non_color(image)?;
                self.host
                    .link((self.bsdf_node, "Metallic"), (map_node, "Color"))?;
            }

            MapType::Normal => {
                self.host.set_node_label(map_node, "Normal")?;
                self.force_non_color(image)?;

                let normal_node = self
                    .host
                    .add_node(NodeKind::NormalMap, [ADJUST_COLUMN, self.pos_y]);
                self.host
                    .link((self.bsdf_node, "Normal"), (normal_node, "Normal"))?;
                self.host.link((normal_node, "Color"), (map_node, "Color"))?;
            }

            MapType::Displacement => {
                self.host.set_node_label(map_node, "Displacement")?;
                self.force_non_color(image)?;

                let disp_node = self
                    .host
                    .add_node(NodeKind::Displacement, [ADJUST_COLUMN, self.pos_y]);
                self.host
                    .link((self.out_node, "Displacement"), (disp_node, "Displacement"))?;
                self.host.link((disp_node, "Height"), (map_node, "Color"))?;
            }

            unsupported => return Err(ShadingError::UnsupportedMapType(unsupported)),
        }

        self.pos_y -= ROW_STEP;
        Ok(self)
    }

    /// Observations collected while loading images.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Consume the builder, returning its diagnostics.
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    fn add_multiply_node(&mut self, location: [f32; 2]) -> H::NodeId {
        self.host.add_node(
            NodeKind::MixRgb {
                blend: BlendType::Multiply,
                factor: 1.0,
            },
            location,
        )
    }

    fn force_non_color(&mut self, image: Option<H::ImageId>) -> Result<(), ShadingError> {
        if let Some(image) = image {
            self.host
                .set_image_colorspace(image, ColorSpace::NonColor)?;
        }
        Ok(())
    }
}
