// Compiled shaders with the layouts their specification implies

use crate::assets::ShaderMetadata;
use crate::compile::shader::{
    CompiledShader, InputBufferLayout, ShaderSpecification, ShaderStage, UniformBufferList,
};

/// SPIR-V for both stages plus the inputs a renderer must bind
#[derive(Debug, Clone, PartialEq)]
pub struct Shader {
    specification: ShaderSpecification,
    input_layout: InputBufferLayout,
    uniform_list: UniformBufferList,
    stages: CompiledShader,
}

impl Shader {
    pub fn new(metadata: &ShaderMetadata, stages: CompiledShader) -> Self {
        Self {
            specification: metadata.specification,
            input_layout: metadata.input_layout.clone(),
            uniform_list: metadata.uniform_list.clone(),
            stages,
        }
    }

    pub fn specification(&self) -> &ShaderSpecification {
        &self.specification
    }

    pub fn input_layout(&self) -> &InputBufferLayout {
        &self.input_layout
    }

    pub fn uniform_list(&self) -> &UniformBufferList {
        &self.uniform_list
    }

    pub fn spirv(&self, stage: ShaderStage) -> &[u32] {
        self.stages.stage(stage)
    }

    /// A zeroed per-instance buffer sized for this shader's uniform list
    pub fn empty_uniform_buffer(&self) -> Vec<u8> {
        vec![0; self.uniform_list.size as usize]
    }
}
