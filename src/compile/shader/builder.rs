// Deterministic GLSL generation from a shader specification

use super::layout::{InputBufferLayout, ShaderDataType, UniformBufferList};
use super::spec::{ColorInputType, ShaderSpecification, TextureInputType};

/// Generated multi-stage source plus the layouts the renderer needs to feed it
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedShader {
    pub source: String,
    pub input_layout: InputBufferLayout,
    pub uniform_list: UniformBufferList,
}

/// A vertex attribute forwarded unchanged to the fragment stage
struct Varying {
    data_type: ShaderDataType,
    attribute: &'static str,
    name: &'static str,
}

/// Generate `#type vertex` / `#type fragment` GLSL for a specification
///
/// The output depends only on the specification, so equal specifications yield
/// byte-identical source (and therefore equal checksums). A comment header ahead of
/// the first stage records every field, so unequal specifications never share source.
pub fn generate(spec: &ShaderSpecification) -> GeneratedShader {
    let mut input_layout = InputBufferLayout::default();
    let mut uniform_list = UniformBufferList::default();
    let mut varyings = Vec::new();

    input_layout.push(ShaderDataType::Float3, "a_Position");

    match spec.color_input {
        ColorInputType::None => {}
        ColorInputType::FlatColor => {
            uniform_list.push(ShaderDataType::Float4, "u_FlatColor");
            varyings.push(varying(ShaderDataType::Float4, "a_Color", "v_Color"));
        }
        ColorInputType::VertexColor => {
            varyings.push(varying(ShaderDataType::Float4, "a_Color", "v_Color"));
        }
    }

    match spec.texture_input {
        TextureInputType::None => {}
        TextureInputType::ColorTexture => {
            uniform_list.push(ShaderDataType::Float, "u_TilingFactor");
            varyings.push(varying(ShaderDataType::Float2, "a_TexCoordinate", "v_TexCoordinate"));
            varyings.push(varying(ShaderDataType::Float, "a_TilingFactor", "v_TilingFactor"));
        }
        TextureInputType::TextTexture => {
            varyings.push(varying(ShaderDataType::Float2, "a_TexCoordinate", "v_TexCoordinate"));
        }
    }

    if spec.add_circle_shape {
        uniform_list.push(ShaderDataType::Float, "u_Thickness");
        uniform_list.push(ShaderDataType::Float, "u_Fade");
        varyings.push(varying(ShaderDataType::Float3, "a_LocalPosition", "v_LocalPosition"));
        varyings.push(varying(ShaderDataType::Float, "a_Thickness", "v_Thickness"));
        varyings.push(varying(ShaderDataType::Float, "a_Fade", "v_Fade"));
    }

    if spec.add_entity_id {
        varyings.push(varying(ShaderDataType::Int, "a_EntityID", "v_EntityID"));
    }

    for v in &varyings {
        input_layout.push(v.data_type, v.attribute);
    }

    let mut lines = specification_header(spec);
    lines.push("#type vertex".to_string());
    vertex_stage(spec, &input_layout, &varyings, &mut lines);
    lines.push("#type fragment".to_string());
    fragment_stage(spec, &varyings, &mut lines);

    let mut source = lines.join("\n");
    source.push('\n');

    GeneratedShader {
        source,
        input_layout,
        uniform_list,
    }
}

fn specification_header(spec: &ShaderSpecification) -> Vec<String> {
    vec![
        format!("// Color Input: {:?}", spec.color_input),
        format!("// Texture Input: {:?}", spec.texture_input),
        format!("// Circle Shape: {}", spec.add_circle_shape),
        format!("// Projection Matrix: {}", spec.add_projection_matrix),
        format!("// Entity ID: {}", spec.add_entity_id),
        format!("// Draw Outline: {}", spec.draw_outline),
        format!("// Rendering Type: {:?}", spec.rendering_type),
    ]
}

fn varying(data_type: ShaderDataType, attribute: &'static str, name: &'static str) -> Varying {
    Varying {
        data_type,
        attribute,
        name,
    }
}

fn interpolation(data_type: ShaderDataType) -> &'static str {
    if data_type.is_integer() {
        "flat "
    } else {
        ""
    }
}

fn vertex_stage(
    spec: &ShaderSpecification,
    layout: &InputBufferLayout,
    varyings: &[Varying],
    lines: &mut Vec<String>,
) {
    lines.push("#version 450".to_string());
    lines.push(String::new());

    for (location, element) in layout.elements.iter().enumerate() {
        lines.push(format!(
            "layout(location = {}) in {} {};",
            location,
            element.data_type.glsl_name(),
            element.name
        ));
    }

    if spec.add_projection_matrix {
        lines.push(String::new());
        lines.push("layout(set = 0, binding = 0) uniform Camera {".to_string());
        lines.push("    mat4 u_ViewProjection;".to_string());
        lines.push("};".to_string());
    }

    if !varyings.is_empty() {
        lines.push(String::new());
    }
    for (location, v) in varyings.iter().enumerate() {
        lines.push(format!(
            "layout(location = {}) {}out {} {};",
            location,
            interpolation(v.data_type),
            v.data_type.glsl_name(),
            v.name
        ));
    }

    lines.push(String::new());
    lines.push("void main() {".to_string());
    for v in varyings {
        lines.push(format!("    {} = {};", v.name, v.attribute));
    }
    if spec.add_projection_matrix {
        lines.push("    gl_Position = u_ViewProjection * vec4(a_Position, 1.0);".to_string());
    } else {
        lines.push("    gl_Position = vec4(a_Position, 1.0);".to_string());
    }
    lines.push("}".to_string());
    lines.push(String::new());
}

fn fragment_stage(spec: &ShaderSpecification, varyings: &[Varying], lines: &mut Vec<String>) {
    lines.push("#version 450".to_string());
    lines.push(String::new());
    lines.push("layout(location = 0) out vec4 o_Color;".to_string());
    if spec.add_entity_id {
        lines.push("layout(location = 1) out int o_EntityID;".to_string());
    }

    if !varyings.is_empty() {
        lines.push(String::new());
    }
    for (location, v) in varyings.iter().enumerate() {
        lines.push(format!(
            "layout(location = {}) {}in {} {};",
            location,
            interpolation(v.data_type),
            v.data_type.glsl_name(),
            v.name
        ));
    }

    if spec.texture_input != TextureInputType::None {
        lines.push(String::new());
        lines.push("layout(set = 0, binding = 1) uniform texture2D u_Texture;".to_string());
        lines.push("layout(set = 0, binding = 2) uniform sampler u_Sampler;".to_string());
    }

    if spec.draw_outline {
        lines.push(String::new());
        lines.push("layout(set = 0, binding = 3) uniform Outline {".to_string());
        lines.push("    vec4 u_OutlineColor;".to_string());
        lines.push("};".to_string());
    }

    if spec.texture_input == TextureInputType::TextTexture {
        lines.push(String::new());
        lines.push("float median(float r, float g, float b) {".to_string());
        lines.push("    return max(min(r, g), min(max(r, g), b));".to_string());
        lines.push("}".to_string());
    }

    lines.push(String::new());
    lines.push("void main() {".to_string());
    lines.push("    vec4 color = vec4(1.0);".to_string());

    if spec.color_input != ColorInputType::None {
        lines.push("    color = color * v_Color;".to_string());
    }

    match spec.texture_input {
        TextureInputType::None => {}
        TextureInputType::ColorTexture => {
            lines.push(
                "    color = color * texture(sampler2D(u_Texture, u_Sampler), v_TexCoordinate * v_TilingFactor);"
                    .to_string(),
            );
        }
        TextureInputType::TextTexture => {
            lines.push(
                "    vec3 msd = texture(sampler2D(u_Texture, u_Sampler), v_TexCoordinate).rgb;"
                    .to_string(),
            );
            lines.push("    float sd = median(msd.r, msd.g, msd.b);".to_string());
            lines.push("    float screenWidth = fwidth(sd);".to_string());
            lines.push(
                "    float opacity = smoothstep(0.5 - screenWidth, 0.5 + screenWidth, sd);"
                    .to_string(),
            );
            lines.push("    if (opacity == 0.0) {".to_string());
            lines.push("        discard;".to_string());
            lines.push("    }".to_string());
            lines.push("    color.a = color.a * opacity;".to_string());
        }
    }

    if spec.add_circle_shape {
        lines.push("    float circleDistance = 1.0 - length(v_LocalPosition.xy);".to_string());
        lines.push("    float circle = smoothstep(0.0, v_Fade, circleDistance);".to_string());
        lines.push(
            "    circle = circle * smoothstep(v_Thickness + v_Fade, v_Thickness, circleDistance);"
                .to_string(),
        );
        lines.push("    if (circle == 0.0) {".to_string());
        lines.push("        discard;".to_string());
        lines.push("    }".to_string());
        lines.push("    color.a = color.a * circle;".to_string());
    }

    if spec.draw_outline {
        lines.push("    color = vec4(u_OutlineColor.rgb, u_OutlineColor.a * color.a);".to_string());
    }

    lines.push("    if (color.a == 0.0) {".to_string());
    lines.push("        discard;".to_string());
    lines.push("    }".to_string());
    lines.push("    o_Color = color;".to_string());
    if spec.add_entity_id {
        lines.push("    o_EntityID = v_EntityID;".to_string());
    }
    lines.push("}".to_string());
}

#[cfg(test)]
mod tests {
    use super::super::compiler::split_stages;
    use super::super::spec::RenderingType;
    use super::*;

    #[test]
    fn test_generation_is_deterministic() {
        let spec = ShaderSpecification {
            color_input: ColorInputType::FlatColor,
            add_projection_matrix: true,
            add_entity_id: true,
            ..Default::default()
        };
        let again = spec;
        assert_eq!(generate(&spec), generate(&again));
    }

    #[test]
    fn test_stage_pragmas_present() {
        let generated = generate(&ShaderSpecification::default());
        assert!(generated.source.starts_with("// Color Input: None\n"));
        assert!(generated.source.contains("#type vertex\n#version 450"));
        assert_eq!(generated.source.matches("#type ").count(), 2);
        assert!(generated.source.contains("#type fragment\n#version 450"));
    }

    #[test]
    fn test_rendering_type_changes_source() {
        let indexed = ShaderSpecification::default();
        let lines = ShaderSpecification {
            rendering_type: RenderingType::DrawLine,
            ..Default::default()
        };

        let indexed_source = generate(&indexed).source;
        let line_source = generate(&lines).source;
        assert_ne!(indexed_source, line_source);
        assert!(indexed_source.contains("// Rendering Type: DrawIndex"));
        assert!(line_source.contains("// Rendering Type: DrawLine"));
    }

    #[test]
    fn test_header_stays_out_of_stages() {
        let source = generate(&ShaderSpecification::default()).source;
        let stages = split_stages(&source).unwrap();
        assert_eq!(stages.len(), 2);
        assert!(stages.iter().all(|(_, body)| !body.contains("// Color Input")));
    }

    #[test]
    fn test_layouts_follow_spec() {
        let spec = ShaderSpecification {
            color_input: ColorInputType::FlatColor,
            add_circle_shape: true,
            add_entity_id: true,
            ..Default::default()
        };
        let generated = generate(&spec);

        let names: Vec<&str> = generated
            .input_layout
            .elements
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["a_Position", "a_Color", "a_LocalPosition", "a_Thickness", "a_Fade", "a_EntityID"]
        );
        assert_eq!(generated.input_layout.stride, 12 + 16 + 12 + 4 + 4 + 4);

        assert!(generated.uniform_list.find("u_FlatColor").is_some());
        assert!(generated.uniform_list.find("u_Thickness").is_some());
        assert_eq!(generated.uniform_list.size, 24);

        assert!(generated.source.contains("flat out int v_EntityID;"));
        assert!(generated.source.contains("o_EntityID = v_EntityID;"));
    }

    #[test]
    fn test_projection_and_text_sections() {
        let spec = ShaderSpecification {
            color_input: ColorInputType::FlatColor,
            texture_input: TextureInputType::TextTexture,
            add_projection_matrix: true,
            ..Default::default()
        };
        let source = generate(&spec).source;

        assert!(source.contains("uniform Camera"));
        assert!(source.contains("u_ViewProjection * vec4(a_Position, 1.0)"));
        assert!(source.contains("float median("));
        assert!(!source.contains("u_OutlineColor"));
    }
}
