// Asset types and the on-disk layout of a project's asset directory

use super::{AssetError, AssetHandle};
use crate::core::fs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Supported asset types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AssetType {
    Texture,
    Audio,
    Font,
    Shader,
    Scene,
    #[serde(rename = "UIObject")]
    UiObject,
    InputMode,
    GameState,
    EntityClass,
}

impl AssetType {
    pub const ALL: [AssetType; 9] = [
        AssetType::Texture,
        AssetType::Audio,
        AssetType::Font,
        AssetType::Shader,
        AssetType::Scene,
        AssetType::UiObject,
        AssetType::InputMode,
        AssetType::GameState,
        AssetType::EntityClass,
    ];

    /// Name used in manifests and logs
    pub fn name(&self) -> &'static str {
        match self {
            AssetType::Texture => "Texture",
            AssetType::Audio => "Audio",
            AssetType::Font => "Font",
            AssetType::Shader => "Shader",
            AssetType::Scene => "Scene",
            AssetType::UiObject => "UIObject",
            AssetType::InputMode => "InputMode",
            AssetType::GameState => "GameState",
            AssetType::EntityClass => "EntityClass",
        }
    }

    /// Get the directory for this asset type, relative to the asset directory
    pub fn directory(&self) -> &'static str {
        match self {
            AssetType::Texture => "Textures",
            AssetType::Audio => "Audio",
            AssetType::Font => "Fonts",
            AssetType::Shader => "Shaders",
            AssetType::Scene => "Scenes",
            AssetType::UiObject => "UserInterface",
            AssetType::InputMode => "Input",
            AssetType::GameState => "GameState",
            AssetType::EntityClass => "EntityClass",
        }
    }

    /// Media types are compiled into `Intermediates/` and cached at runtime.
    /// Document types are stored as named text files and reloaded on every get.
    pub fn is_media(&self) -> bool {
        matches!(
            self,
            AssetType::Texture | AssetType::Audio | AssetType::Font | AssetType::Shader
        )
    }

    /// Name of the registry inside its manifest
    pub fn registry_name(&self) -> &'static str {
        match self {
            AssetType::InputMode => "Input",
            other => other.name(),
        }
    }

    /// Location of this type's manifest, relative to the asset directory
    pub fn registry_location(&self) -> PathBuf {
        let file = format!("{}Registry.kgreg", self.registry_name());
        if self.is_media() {
            self.intermediate_directory().join(file)
        } else {
            PathBuf::from(self.directory()).join(file)
        }
    }

    /// Directory holding compiled intermediates for media types
    pub fn intermediate_directory(&self) -> PathBuf {
        PathBuf::from(self.directory()).join("Intermediates")
    }

    /// File extension of intermediates (media) or documents (document types)
    ///
    /// Shaders have one file per stage, so their location carries no extension.
    pub fn file_extension(&self) -> Option<&'static str> {
        match self {
            AssetType::Texture => Some("kgtexture"),
            AssetType::Audio => Some("kgaudio"),
            AssetType::Font => Some("kgfont"),
            AssetType::Shader => None,
            AssetType::Scene => Some("kgscene"),
            AssetType::UiObject => Some("kgui"),
            AssetType::InputMode => Some("kginput"),
            AssetType::GameState => Some("kgstate"),
            AssetType::EntityClass => Some("kgclass"),
        }
    }

    /// Get supported source file extensions for importable types
    pub fn source_extensions(&self) -> &'static [&'static str] {
        match self {
            AssetType::Texture => &["png", "jpg", "jpeg"],
            AssetType::Audio => &["wav"],
            AssetType::Font => &["ttf", "otf"],
            _ => &[],
        }
    }

    /// Classify a source file by its extension
    pub fn from_source_path<P: AsRef<Path>>(path: P) -> Option<AssetType> {
        let ext = path.as_ref().extension()?.to_string_lossy().to_lowercase();
        [AssetType::Texture, AssetType::Audio, AssetType::Font]
            .into_iter()
            .find(|asset_type| asset_type.source_extensions().contains(&ext.as_str()))
    }

    /// Relative location of a media intermediate for a handle
    pub fn intermediate_location(&self, handle: AssetHandle) -> PathBuf {
        let location = self.intermediate_directory().join(handle.to_string());
        match self.file_extension() {
            Some(ext) => location.with_extension(ext),
            None => location,
        }
    }

    /// Relative location of a named document
    pub fn document_location(&self, name: &str) -> PathBuf {
        let location = PathBuf::from(self.directory()).join(name);
        match self.file_extension() {
            Some(ext) => location.with_extension(ext),
            None => location,
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves and reads files inside a project's asset directory
#[derive(Debug, Clone)]
pub struct AssetLoader {
    base_path: PathBuf,
}

impl AssetLoader {
    /// Create a new asset loader rooted at the asset directory
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: fs::normalize(base_path),
        }
    }

    /// Get the full path for a relative asset location
    pub fn resolve<P: AsRef<Path>>(&self, location: P) -> PathBuf {
        self.base_path.join(location)
    }

    /// Normalize a path to its asset-directory-relative form
    pub fn relative<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        fs::relative_to(&self.base_path, path)
    }

    /// Load file bytes from a relative location
    pub fn load_bytes<P: AsRef<Path>>(&self, location: P) -> Result<Vec<u8>, AssetError> {
        let path = self.resolve(location);
        Ok(std::fs::read(path)?)
    }

    /// Load a text file from a relative location
    pub fn load_string<P: AsRef<Path>>(&self, location: P) -> Result<String, AssetError> {
        let path = self.resolve(location);
        Ok(std::fs::read_to_string(path)?)
    }

    /// Write bytes to a relative location, creating directories as needed
    pub fn write_bytes<P: AsRef<Path>>(&self, location: P, bytes: &[u8]) -> Result<(), AssetError> {
        fs::write_file(self.resolve(location), bytes)?;
        Ok(())
    }

    /// Remove the file at a relative location
    pub fn remove<P: AsRef<Path>>(&self, location: P) -> Result<(), AssetError> {
        fs::remove_file(self.resolve(location))?;
        Ok(())
    }

    /// Recursively list importable source files under a directory
    pub fn scan_sources<P: AsRef<Path>>(dir: P) -> Result<Vec<(AssetType, PathBuf)>, AssetError> {
        let dir = dir.as_ref();
        let mut sources = Vec::new();

        if !dir.exists() {
            return Ok(sources);
        }

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();

            if path.is_dir() {
                // Compiled output never gets re-imported
                if path.file_name().is_some_and(|name| name == "Intermediates") {
                    continue;
                }
                sources.extend(Self::scan_sources(&path)?);
            } else if let Some(asset_type) = AssetType::from_source_path(&path) {
                sources.push((asset_type, path));
            }
        }

        sources.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(sources)
    }

    /// Get the base path
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_type_directories() {
        assert_eq!(AssetType::Texture.directory(), "Textures");
        assert_eq!(AssetType::UiObject.directory(), "UserInterface");
        assert_eq!(AssetType::InputMode.directory(), "Input");
    }

    #[test]
    fn test_registry_locations() {
        assert_eq!(
            AssetType::Shader.registry_location(),
            PathBuf::from("Shaders/Intermediates/ShaderRegistry.kgreg")
        );
        assert_eq!(
            AssetType::Scene.registry_location(),
            PathBuf::from("Scenes/SceneRegistry.kgreg")
        );
        assert_eq!(
            AssetType::InputMode.registry_location(),
            PathBuf::from("Input/InputRegistry.kgreg")
        );
        assert_eq!(
            AssetType::UiObject.registry_location(),
            PathBuf::from("UserInterface/UIObjectRegistry.kgreg")
        );
    }

    #[test]
    fn test_intermediate_locations() {
        let handle = AssetHandle::from_u64(77);
        assert_eq!(
            AssetType::Texture.intermediate_location(handle),
            PathBuf::from("Textures/Intermediates/77.kgtexture")
        );
        assert_eq!(
            AssetType::Shader.intermediate_location(handle),
            PathBuf::from("Shaders/Intermediates/77")
        );
        assert_eq!(
            AssetType::GameState.document_location("Save1"),
            PathBuf::from("GameState/Save1.kgstate")
        );
    }

    #[test]
    fn test_asset_type_from_source() {
        assert_eq!(AssetType::from_source_path("a/b/player.PNG"), Some(AssetType::Texture));
        assert_eq!(AssetType::from_source_path("jump.wav"), Some(AssetType::Audio));
        assert_eq!(AssetType::from_source_path("Roboto.ttf"), Some(AssetType::Font));
        assert_eq!(AssetType::from_source_path("notes.txt"), None);
    }

    #[test]
    fn test_asset_type_serializes_by_name() {
        let yaml = serde_yaml::to_string(&AssetType::UiObject).unwrap();
        assert_eq!(yaml.trim(), "UIObject");
    }

    #[test]
    fn test_loader_path_resolution() {
        let loader = AssetLoader::new("/game/Assets");
        let path = loader.resolve("Textures/Intermediates/1.kgtexture");
        assert_eq!(path, PathBuf::from("/game/Assets/Textures/Intermediates/1.kgtexture"));

        let relative = loader.relative("/game/Assets/Scenes/./Level1.kgscene");
        assert_eq!(relative, PathBuf::from("Scenes/Level1.kgscene"));
    }

    #[test]
    fn test_scan_sources_skips_intermediates() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        std::fs::create_dir_all(root.join("Textures/Intermediates")).unwrap();
        std::fs::write(root.join("Textures/player.png"), b"").unwrap();
        std::fs::write(root.join("Textures/Intermediates/stale.png"), b"").unwrap();
        std::fs::write(root.join("readme.md"), b"").unwrap();
        std::fs::write(root.join("jump.wav"), b"").unwrap();

        let sources = AssetLoader::scan_sources(root).unwrap();
        let types: Vec<AssetType> = sources.iter().map(|(t, _)| *t).collect();
        assert_eq!(types, vec![AssetType::Texture, AssetType::Audio]);
    }
}
