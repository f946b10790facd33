// Registry records: one Asset per handle, with per-type metadata

use super::{AssetError, AssetHandle, AssetType};
use crate::compile::shader::{InputBufferLayout, ShaderSpecification, UniformBufferList};
use crate::runtime::GlyphMetrics;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A registered asset as stored in its type's manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub handle: AssetHandle,

    pub checksum: String,

    /// Location of the intermediate (media) or document file, relative to the asset directory
    pub intermediate_location: PathBuf,

    #[serde(flatten)]
    pub metadata: TypeMetadata,
}

impl Asset {
    pub fn asset_type(&self) -> AssetType {
        self.metadata.asset_type()
    }

    /// Source file this asset was imported from, for media types that record one
    pub fn source_path(&self) -> Option<&Path> {
        match &self.metadata {
            TypeMetadata::Texture(meta) => meta.source_path.as_deref(),
            TypeMetadata::Audio(meta) => Some(&meta.source_path),
            TypeMetadata::Font(meta) => Some(&meta.source_path),
            _ => None,
        }
    }
}

/// Per-type metadata, tagged by `assetType` in the manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "assetType")]
pub enum TypeMetadata {
    Texture(TextureMetadata),
    Audio(AudioMetadata),
    Font(FontMetadata),
    Shader(ShaderMetadata),
    Scene(SceneMetadata),
    #[serde(rename = "UIObject")]
    UiObject(UiObjectMetadata),
    InputMode(InputModeMetadata),
    GameState(GameStateMetadata),
    EntityClass(EntityClassMetadata),
}

macro_rules! metadata_accessor {
    ($fn_name:ident, $variant:ident, $meta:ty) => {
        pub fn $fn_name(&self) -> Result<&$meta, AssetError> {
            match self {
                TypeMetadata::$variant(meta) => Ok(meta),
                other => Err(AssetError::MetadataShapeMismatch {
                    expected: AssetType::$variant,
                    actual: other.asset_type(),
                }),
            }
        }
    };
}

impl TypeMetadata {
    pub fn asset_type(&self) -> AssetType {
        match self {
            TypeMetadata::Texture(_) => AssetType::Texture,
            TypeMetadata::Audio(_) => AssetType::Audio,
            TypeMetadata::Font(_) => AssetType::Font,
            TypeMetadata::Shader(_) => AssetType::Shader,
            TypeMetadata::Scene(_) => AssetType::Scene,
            TypeMetadata::UiObject(_) => AssetType::UiObject,
            TypeMetadata::InputMode(_) => AssetType::InputMode,
            TypeMetadata::GameState(_) => AssetType::GameState,
            TypeMetadata::EntityClass(_) => AssetType::EntityClass,
        }
    }

    metadata_accessor!(as_texture, Texture, TextureMetadata);
    metadata_accessor!(as_audio, Audio, AudioMetadata);
    metadata_accessor!(as_font, Font, FontMetadata);
    metadata_accessor!(as_shader, Shader, ShaderMetadata);
}

/// Decoded texture description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureMetadata {
    pub width: u32,
    pub height: u32,
    pub channels: u8,

    /// Absent for textures imported from raw pixel data
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<PathBuf>,
}

/// Decoded PCM16 audio description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioMetadata {
    pub channels: u16,
    pub sample_rate: u32,
    pub frame_count: u64,
    pub byte_size: u64,
    pub source_path: PathBuf,
}

/// MSDF font atlas description and glyph table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontMetadata {
    pub atlas_width: u32,
    pub atlas_height: u32,
    pub line_height: f32,
    pub source_path: PathBuf,
    pub characters: Vec<GlyphMetrics>,
}

/// Compiled shader description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShaderMetadata {
    pub specification: ShaderSpecification,
    pub input_layout: InputBufferLayout,
    pub uniform_list: UniformBufferList,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneMetadata {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiObjectMetadata {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputModeMetadata {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStateMetadata {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityClassMetadata {
    pub name: String,
}
