// Shader generation and compilation

mod builder;
mod compiler;
mod layout;
mod spec;

pub use builder::{generate, GeneratedShader};
pub use compiler::{compile, compile_stage, split_stages, CompiledShader, ShaderStage};
pub use layout::{
    InputBufferElement, InputBufferLayout, ShaderDataType, UniformBufferList, UniformElement,
};
pub use spec::{ColorInputType, RenderingType, ShaderSpecification, TextureInputType};
