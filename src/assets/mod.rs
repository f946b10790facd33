// Asset management system
//
// Content-addressed registries of compiled intermediates with a per-project runtime cache.

mod asset;
mod atlas;
mod cache;
mod handle;
mod loader;
mod manager;
mod queue;
mod registry;

pub use asset::{
    Asset, AudioMetadata, EntityClassMetadata, FontMetadata, GameStateMetadata,
    InputModeMetadata, SceneMetadata, ShaderMetadata, TextureMetadata, TypeMetadata,
    UiObjectMetadata,
};
pub use atlas::{pack_tight, AtlasBuilder, AtlasRegion};
pub use cache::RuntimeCache;
pub use handle::AssetHandle;
pub use loader::{AssetLoader, AssetType};
pub use manager::{AssetStats, AssetStore};
pub use queue::{OwnerQueue, OwnerQueueSubmitter};
pub use registry::Registry;

/// Asset manager errors
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("Could not compute a checksum for {0}")]
    ChecksumFailure(String),

    #[error("Failed to decode {path}: {reason}")]
    DecodeFailure { path: String, reason: String },

    #[error("No project is open")]
    NoActiveProject,

    #[error("No {asset_type} asset is registered with handle {handle}")]
    UnknownHandle {
        asset_type: AssetType,
        handle: AssetHandle,
    },

    #[error("Asset metadata mismatch: expected {expected}, got {actual}")]
    MetadataShapeMismatch {
        expected: AssetType,
        actual: AssetType,
    },

    #[error("Failed to compile {stage} shader: {message}")]
    ShaderCompile { stage: String, message: String },

    #[error("Failed to generate font atlas: {0}")]
    FontAtlas(String),

    #[error("Malformed manifest {path}: {source}")]
    Manifest {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Malformed document {path}: {source}")]
    Document {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AssetError {
    /// Build a decode failure from any displayable cause
    pub fn decode(path: impl AsRef<std::path::Path>, reason: impl std::fmt::Display) -> Self {
        AssetError::DecodeFailure {
            path: path.as_ref().display().to_string(),
            reason: reason.to_string(),
        }
    }

    /// Errors that indicate a broken precondition rather than bad input
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AssetError::NoActiveProject
                | AssetError::MetadataShapeMismatch { .. }
                | AssetError::ShaderCompile { .. }
        )
    }
}
