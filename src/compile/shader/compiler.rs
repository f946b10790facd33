// Offline compilation of generated GLSL stages to SPIR-V

use crate::assets::AssetError;
use naga::back::spv;
use naga::front::glsl;
use naga::valid::{Capabilities, ValidationFlags, Validator};
use std::fmt;

const TYPE_TOKEN: &str = "#type";

/// Pipeline stages a generated shader contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn from_pragma(name: &str) -> Option<Self> {
        match name {
            "vertex" => Some(ShaderStage::Vertex),
            "fragment" | "pixel" => Some(ShaderStage::Fragment),
            _ => None,
        }
    }

    /// Extension of the stage's intermediate file
    pub fn extension(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "kgshadervert",
            ShaderStage::Fragment => "kgshaderfrag",
        }
    }

    fn naga_stage(&self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// SPIR-V words for both stages of a shader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledShader {
    pub vertex: Vec<u32>,
    pub fragment: Vec<u32>,
}

impl CompiledShader {
    pub fn stage(&self, stage: ShaderStage) -> &[u32] {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }
}

fn split_error(message: impl Into<String>) -> AssetError {
    AssetError::ShaderCompile {
        stage: "unknown".to_string(),
        message: message.into(),
    }
}

/// Split multi-stage source on its `#type <stage>` pragmas
pub fn split_stages(source: &str) -> Result<Vec<(ShaderStage, &str)>, AssetError> {
    let mut stages = Vec::new();
    let mut next = source.find(TYPE_TOKEN);

    while let Some(start) = next {
        let pragma_start = start + TYPE_TOKEN.len();
        let end_of_line = source[pragma_start..]
            .find('\n')
            .ok_or_else(|| split_error("stage pragma is not followed by any source"))?;

        let name = source[pragma_start..pragma_start + end_of_line].trim();
        let stage = ShaderStage::from_pragma(name)
            .ok_or_else(|| split_error(format!("invalid stage '{}'", name)))?;

        let body_start = pragma_start + end_of_line + 1;
        next = source[body_start..]
            .find(TYPE_TOKEN)
            .map(|offset| body_start + offset);
        let body_end = next.unwrap_or(source.len());

        if stages.iter().any(|(existing, _)| *existing == stage) {
            return Err(split_error(format!("duplicate {} stage", stage)));
        }
        stages.push((stage, &source[body_start..body_end]));
    }

    Ok(stages)
}

/// Parse, validate and emit SPIR-V for a single stage
pub fn compile_stage(stage: ShaderStage, source: &str) -> Result<Vec<u32>, AssetError> {
    let compile_error = |message: String| AssetError::ShaderCompile {
        stage: stage.to_string(),
        message,
    };

    let options = glsl::Options::from(stage.naga_stage());
    let module = glsl::Frontend::default()
        .parse(&options, source)
        .map_err(|e| compile_error(e.emit_to_string(source)))?;

    let info = Validator::new(ValidationFlags::all(), Capabilities::all())
        .validate(&module)
        .map_err(|e| compile_error(e.emit_to_string(source)))?;

    let pipeline = spv::PipelineOptions {
        shader_stage: stage.naga_stage(),
        entry_point: "main".to_string(),
    };
    spv::write_vec(&module, &info, &spv::Options::default(), Some(&pipeline))
        .map_err(|e| compile_error(e.to_string()))
}

/// Compile every stage of a generated shader
pub fn compile(source: &str) -> Result<CompiledShader, AssetError> {
    let mut vertex = None;
    let mut fragment = None;

    for (stage, body) in split_stages(source)? {
        let words = compile_stage(stage, body)?;
        match stage {
            ShaderStage::Vertex => vertex = Some(words),
            ShaderStage::Fragment => fragment = Some(words),
        }
    }

    Ok(CompiledShader {
        vertex: vertex.ok_or_else(|| split_error("missing vertex stage"))?,
        fragment: fragment.ok_or_else(|| split_error("missing fragment stage"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::shader::{generate, ColorInputType, ShaderSpecification, TextureInputType};

    const SPIRV_MAGIC: u32 = 0x0723_0203;

    #[test]
    fn test_split_stages() {
        let source = "#type vertex\nvoid main() {}\n#type fragment\nvoid main() {}\n";
        let stages = split_stages(source).unwrap();

        assert_eq!(stages.len(), 2);
        assert_eq!(stages[0], (ShaderStage::Vertex, "void main() {}\n"));
        assert_eq!(stages[1], (ShaderStage::Fragment, "void main() {}\n"));
    }

    #[test]
    fn test_split_rejects_unknown_stage() {
        let err = split_stages("#type geometry\nvoid main() {}\n").unwrap_err();
        assert!(matches!(err, AssetError::ShaderCompile { .. }));
    }

    #[test]
    fn test_compile_basic_spec() {
        let generated = generate(&ShaderSpecification {
            color_input: ColorInputType::VertexColor,
            add_projection_matrix: true,
            ..Default::default()
        });
        let compiled = compile(&generated.source).unwrap();

        assert_eq!(compiled.vertex[0], SPIRV_MAGIC);
        assert_eq!(compiled.fragment[0], SPIRV_MAGIC);
    }

    #[test]
    fn test_compile_every_feature() {
        let specs = [
            ShaderSpecification {
                color_input: ColorInputType::FlatColor,
                add_circle_shape: true,
                add_entity_id: true,
                add_projection_matrix: true,
                ..Default::default()
            },
            ShaderSpecification {
                color_input: ColorInputType::FlatColor,
                texture_input: TextureInputType::TextTexture,
                add_projection_matrix: true,
                ..Default::default()
            },
            ShaderSpecification {
                texture_input: TextureInputType::ColorTexture,
                draw_outline: true,
                ..Default::default()
            },
        ];

        for spec in specs {
            let generated = generate(&spec);
            let compiled = compile(&generated.source)
                .unwrap_or_else(|e| panic!("{:?} failed: {}\n{}", spec, e, generated.source));
            assert!(!compiled.stage(ShaderStage::Vertex).is_empty());
            assert!(!compiled.stage(ShaderStage::Fragment).is_empty());
        }
    }

    #[test]
    fn test_compile_error_is_reported() {
        let err = compile_stage(ShaderStage::Fragment, "#version 450\nvoid main() { nope; }\n")
            .unwrap_err();
        assert!(err.is_fatal());
    }
}
