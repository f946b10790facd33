// Project files: name, asset directory and asset pipeline settings

use crate::assets::AssetHandle;
use crate::compile::font::FontAtlasConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const PROJECT_EXTENSION: &str = "kproj";

/// Asset pipeline settings stored in the project file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetStoreConfig {
    /// Keep the generated GLSL next to compiled shader stages
    pub write_shader_sources: bool,
    pub font: FontAtlasConfig,
}

impl Default for AssetStoreConfig {
    fn default() -> Self {
        Self {
            write_shader_sources: cfg!(debug_assertions),
            font: FontAtlasConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,

    /// Relative to the directory holding the project file
    #[serde(default = "default_asset_directory")]
    pub asset_directory: PathBuf,

    #[serde(default)]
    pub start_scene: AssetHandle,

    #[serde(default)]
    pub assets: AssetStoreConfig,

    #[serde(skip)]
    pub project_directory: PathBuf,
}

fn default_asset_directory() -> PathBuf {
    PathBuf::from("Assets")
}

impl Project {
    pub fn new<P: AsRef<Path>>(project_directory: P, name: &str) -> Self {
        Self {
            name: name.to_string(),
            asset_directory: default_asset_directory(),
            start_scene: AssetHandle::EMPTY,
            assets: AssetStoreConfig::default(),
            project_directory: project_directory.as_ref().to_path_buf(),
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read project file {}", path.display()))?;
        let mut project: Project = serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse project file {}", path.display()))?;

        project.project_directory = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        log::info!("Loaded project '{}' from {}", project.name, path.display());
        Ok(project)
    }

    pub fn save(&self) -> Result<()> {
        let path = self.project_file();
        let text = serde_yaml::to_string(self).context("Failed to serialize project")?;
        crate::core::fs::write_file(&path, text.as_bytes())
            .with_context(|| format!("Failed to write project file {}", path.display()))?;
        Ok(())
    }

    /// Absolute (or working-directory relative) asset root
    pub fn asset_root(&self) -> PathBuf {
        self.project_directory.join(&self.asset_directory)
    }

    pub fn project_file(&self) -> PathBuf {
        self.project_directory
            .join(format!("{}.{}", self.name, PROJECT_EXTENSION))
    }
}
