// Vertex input layouts and per-instance uniform lists derived from a specification

use serde::{Deserialize, Serialize};

/// Data types that can appear in shader inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderDataType {
    Float,
    Float2,
    Float3,
    Float4,
    Mat3,
    Mat4,
    Int,
    Int2,
    Int3,
    Int4,
    Bool,
}

impl ShaderDataType {
    /// Size in bytes
    pub fn size(&self) -> u32 {
        match self {
            ShaderDataType::Float | ShaderDataType::Int => 4,
            ShaderDataType::Float2 | ShaderDataType::Int2 => 8,
            ShaderDataType::Float3 | ShaderDataType::Int3 => 12,
            ShaderDataType::Float4 | ShaderDataType::Int4 => 16,
            ShaderDataType::Mat3 => 36,
            ShaderDataType::Mat4 => 64,
            ShaderDataType::Bool => 1,
        }
    }

    pub fn component_count(&self) -> u32 {
        match self {
            ShaderDataType::Float | ShaderDataType::Int | ShaderDataType::Bool => 1,
            ShaderDataType::Float2 | ShaderDataType::Int2 => 2,
            ShaderDataType::Float3 | ShaderDataType::Int3 => 3,
            ShaderDataType::Float4 | ShaderDataType::Int4 => 4,
            ShaderDataType::Mat3 => 9,
            ShaderDataType::Mat4 => 16,
        }
    }

    /// GLSL type keyword
    pub fn glsl_name(&self) -> &'static str {
        match self {
            ShaderDataType::Float => "float",
            ShaderDataType::Float2 => "vec2",
            ShaderDataType::Float3 => "vec3",
            ShaderDataType::Float4 => "vec4",
            ShaderDataType::Mat3 => "mat3",
            ShaderDataType::Mat4 => "mat4",
            ShaderDataType::Int => "int",
            ShaderDataType::Int2 => "ivec2",
            ShaderDataType::Int3 => "ivec3",
            ShaderDataType::Int4 => "ivec4",
            ShaderDataType::Bool => "bool",
        }
    }

    /// Integer inputs cannot be interpolated between stages
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ShaderDataType::Int
                | ShaderDataType::Int2
                | ShaderDataType::Int3
                | ShaderDataType::Int4
                | ShaderDataType::Bool
        )
    }
}

/// One attribute in the vertex buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputBufferElement {
    pub name: String,
    pub data_type: ShaderDataType,
    pub size: u32,
    pub offset: u32,
    pub normalized: bool,
}

/// Interleaved vertex buffer layout
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBufferLayout {
    pub elements: Vec<InputBufferElement>,
    pub stride: u32,
}

impl InputBufferLayout {
    /// Append an attribute after the existing ones
    pub fn push(&mut self, data_type: ShaderDataType, name: &str) {
        self.elements.push(InputBufferElement {
            name: name.to_string(),
            data_type,
            size: data_type.size(),
            offset: self.stride,
            normalized: false,
        });
        self.stride += data_type.size();
    }

    pub fn find(&self, name: &str) -> Option<&InputBufferElement> {
        self.elements.iter().find(|element| element.name == name)
    }
}

/// One per-instance value packed into a shape's uniform buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniformElement {
    pub name: String,
    pub data_type: ShaderDataType,
    pub size: u32,
    pub offset: u32,
}

/// Packed per-instance values a shape must supply for its shader
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniformBufferList {
    pub elements: Vec<UniformElement>,
    pub size: u32,
}

impl UniformBufferList {
    /// Append a uniform after the existing ones
    pub fn push(&mut self, data_type: ShaderDataType, name: &str) {
        self.elements.push(UniformElement {
            name: name.to_string(),
            data_type,
            size: data_type.size(),
            offset: self.size,
        });
        self.size += data_type.size();
    }

    pub fn find(&self, name: &str) -> Option<&UniformElement> {
        self.elements.iter().find(|element| element.name == name)
    }

    /// Copy `bytes` into the slot for `name` inside a packed buffer
    ///
    /// Returns false if the uniform is unknown, the byte count does not match its size,
    /// or the buffer is too short.
    pub fn write(&self, buffer: &mut [u8], name: &str, bytes: &[u8]) -> bool {
        let Some(element) = self.find(name) else {
            return false;
        };
        let start = element.offset as usize;
        let end = start + element.size as usize;
        if bytes.len() != element.size as usize || end > buffer.len() {
            return false;
        }
        buffer[start..end].copy_from_slice(bytes);
        true
    }
}
