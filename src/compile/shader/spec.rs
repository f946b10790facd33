// Declarative shader specifications

use serde::{Deserialize, Serialize};

/// Where a shader's base color comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ColorInputType {
    #[default]
    None,
    /// One color per instance, supplied through the uniform list
    FlatColor,
    /// Per-vertex colors from the vertex buffer
    VertexColor,
}

/// What kind of texture a shader samples, if any
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextureInputType {
    #[default]
    None,
    ColorTexture,
    /// MSDF font atlas
    TextTexture,
}

/// Primitive topology the renderer draws this shader with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RenderingType {
    #[default]
    DrawIndex,
    DrawTriangle,
    DrawLine,
    DrawPoint,
}

/// Field-by-field description from which shader source is generated
///
/// Two specifications that compare equal always produce the same shader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShaderSpecification {
    pub color_input: ColorInputType,
    pub texture_input: TextureInputType,
    pub add_circle_shape: bool,
    pub add_projection_matrix: bool,
    pub add_entity_id: bool,
    pub draw_outline: bool,
    pub rendering_type: RenderingType,
}
