// Declarative documents stored as YAML next to their registries
//
// Documents are never compiled; the file on disk is the intermediate.

mod entity_class;
mod game_state;
mod input_mode;
mod scene;
mod ui_object;

pub use entity_class::{ClassField, EntityClass};
pub use game_state::GameState;
pub use input_mode::{BindingKind, ClassBindings, InputBinding, InputMode, PollingSlot};
pub use scene::{
    AudioComponent, BodyType, BoxCollider2dComponent, CameraComponent, CircleCollider2dComponent,
    PhysicsSettings, ProjectionType, RigidBody2dComponent, Scene, SceneEntity, ScriptComponent,
    ScriptField, ShapeComponent, ShapeType, TagComponent, TransformComponent,
};
pub use ui_object::{UiObject, Widget, WidgetDirections, WidgetKind, Window};

use crate::assets::{AssetError, AssetType, TypeMetadata};
use glam::{Vec2, Vec3, Vec4};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A document asset type
pub trait Document: Serialize + DeserializeOwned {
    const ASSET_TYPE: AssetType;

    /// A fresh, default document for a newly created asset
    fn named(name: &str) -> Self;

    /// Registry metadata recorded when the document is created
    fn metadata(name: &str) -> TypeMetadata;
}

/// Document types that support deletion
pub trait Deletable: Document {}

pub fn to_yaml<D: Document>(document: &D, path: &Path) -> Result<String, AssetError> {
    serde_yaml::to_string(document).map_err(|source| AssetError::Document {
        path: path.display().to_string(),
        source,
    })
}

pub fn from_yaml<D: Document>(text: &str, path: &Path) -> Result<D, AssetError> {
    serde_yaml::from_str(text).map_err(|source| AssetError::Document {
        path: path.display().to_string(),
        source,
    })
}

/// The type of a scripted field, without a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WrappedVarType {
    Float,
    Double,
    Bool,
    Char,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Vector2,
    Vector3,
    Vector4,
    Entity,
}

impl WrappedVarType {
    pub fn default_value(&self) -> WrappedValue {
        match self {
            WrappedVarType::Float => WrappedValue::Float(0.0),
            WrappedVarType::Double => WrappedValue::Double(0.0),
            WrappedVarType::Bool => WrappedValue::Bool(false),
            WrappedVarType::Char => WrappedValue::Char('\0'),
            WrappedVarType::Int8 => WrappedValue::Int8(0),
            WrappedVarType::Int16 => WrappedValue::Int16(0),
            WrappedVarType::Int32 => WrappedValue::Int32(0),
            WrappedVarType::Int64 => WrappedValue::Int64(0),
            WrappedVarType::UInt8 => WrappedValue::UInt8(0),
            WrappedVarType::UInt16 => WrappedValue::UInt16(0),
            WrappedVarType::UInt32 => WrappedValue::UInt32(0),
            WrappedVarType::UInt64 => WrappedValue::UInt64(0),
            WrappedVarType::Vector2 => WrappedValue::Vector2(Vec2::ZERO),
            WrappedVarType::Vector3 => WrappedValue::Vector3(Vec3::ZERO),
            WrappedVarType::Vector4 => WrappedValue::Vector4(Vec4::ZERO),
            WrappedVarType::Entity => WrappedValue::Entity(0),
        }
    }
}

/// A typed scripted value, written as `{ type, value }`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum WrappedValue {
    Float(f32),
    Double(f64),
    Bool(bool),
    Char(char),
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Vector2(Vec2),
    Vector3(Vec3),
    Vector4(Vec4),
    /// Entity id within the owning scene
    Entity(u64),
}

impl WrappedValue {
    pub fn var_type(&self) -> WrappedVarType {
        match self {
            WrappedValue::Float(_) => WrappedVarType::Float,
            WrappedValue::Double(_) => WrappedVarType::Double,
            WrappedValue::Bool(_) => WrappedVarType::Bool,
            WrappedValue::Char(_) => WrappedVarType::Char,
            WrappedValue::Int8(_) => WrappedVarType::Int8,
            WrappedValue::Int16(_) => WrappedVarType::Int16,
            WrappedValue::Int32(_) => WrappedVarType::Int32,
            WrappedValue::Int64(_) => WrappedVarType::Int64,
            WrappedValue::UInt8(_) => WrappedVarType::UInt8,
            WrappedValue::UInt16(_) => WrappedVarType::UInt16,
            WrappedValue::UInt32(_) => WrappedVarType::UInt32,
            WrappedValue::UInt64(_) => WrappedVarType::UInt64,
            WrappedValue::Vector2(_) => WrappedVarType::Vector2,
            WrappedValue::Vector3(_) => WrappedVarType::Vector3,
            WrappedValue::Vector4(_) => WrappedVarType::Vector4,
            WrappedValue::Entity(_) => WrappedVarType::Entity,
        }
    }
}

/// Raw byte buffers stored as base64 strings
pub(crate) mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
