// Durable per-type registries backed by YAML manifests

use super::{Asset, AssetError, AssetHandle, AssetType};
use crate::core::fs;
use log::{debug, error};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// On-disk manifest layout
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Manifest {
    registry_name: String,
    #[serde(default)]
    assets: Vec<Asset>,
}

/// Handle to metadata mapping for a single asset type
#[derive(Debug, Clone)]
pub struct Registry {
    asset_type: AssetType,
    assets: HashMap<AssetHandle, Asset>,
}

impl Registry {
    /// Create an empty registry
    pub fn new(asset_type: AssetType) -> Self {
        Self {
            asset_type,
            assets: HashMap::new(),
        }
    }

    /// Load the registry manifest for `asset_type` from the asset directory
    ///
    /// A missing manifest yields an empty registry. A malformed manifest, or an entry
    /// whose metadata belongs to another type, is an error.
    pub fn load(asset_type: AssetType, asset_directory: &Path) -> Result<Self, AssetError> {
        let mut registry = Self::new(asset_type);
        let path = asset_directory.join(asset_type.registry_location());

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                error!(
                    "{} registry manifest not found at {}, starting empty",
                    asset_type,
                    path.display()
                );
                return Ok(registry);
            }
            Err(e) => return Err(e.into()),
        };

        let manifest: Manifest =
            serde_yaml::from_str(&text).map_err(|source| AssetError::Manifest {
                path: path.display().to_string(),
                source,
            })?;

        for asset in manifest.assets {
            registry.insert(asset)?;
        }

        debug!("Loaded {} {} assets", registry.len(), asset_type);
        Ok(registry)
    }

    /// Rewrite the full manifest, creating parent directories as needed
    pub fn save(&self, asset_directory: &Path) -> Result<(), AssetError> {
        let path = asset_directory.join(self.asset_type.registry_location());

        let mut assets: Vec<Asset> = self.assets.values().cloned().collect();
        assets.sort_by_key(|asset| asset.handle);

        let manifest = Manifest {
            registry_name: self.asset_type.registry_name().to_string(),
            assets,
        };
        let text = serde_yaml::to_string(&manifest).map_err(|source| AssetError::Manifest {
            path: path.display().to_string(),
            source,
        })?;

        fs::write_file(&path, text.as_bytes())?;
        Ok(())
    }

    /// Empty the in-memory registry
    pub fn clear(&mut self) {
        self.assets.clear();
    }

    /// Insert an asset, rejecting metadata that belongs to another type
    pub fn insert(&mut self, asset: Asset) -> Result<(), AssetError> {
        if asset.asset_type() != self.asset_type {
            return Err(AssetError::MetadataShapeMismatch {
                expected: self.asset_type,
                actual: asset.asset_type(),
            });
        }
        self.assets.insert(asset.handle, asset);
        Ok(())
    }

    pub fn remove(&mut self, handle: AssetHandle) -> Option<Asset> {
        self.assets.remove(&handle)
    }

    pub fn get(&self, handle: AssetHandle) -> Option<&Asset> {
        self.assets.get(&handle)
    }

    /// Find the asset whose content produced `checksum`
    pub fn find_by_checksum(&self, checksum: &str) -> Option<AssetHandle> {
        self.assets
            .values()
            .find(|asset| asset.checksum == checksum)
            .map(|asset| asset.handle)
    }

    /// Find the asset stored at a relative intermediate location
    pub fn find_by_location(&self, location: &Path) -> Option<AssetHandle> {
        self.assets
            .values()
            .find(|asset| asset.intermediate_location == location)
            .map(|asset| asset.handle)
    }

    /// Find the media asset imported from a relative source path
    pub fn find_by_source(&self, source: &Path) -> Option<AssetHandle> {
        self.assets
            .values()
            .find(|asset| asset.source_path() == Some(source))
            .map(|asset| asset.handle)
    }

    /// All assets ordered by handle
    pub fn sorted(&self) -> Vec<&Asset> {
        let mut assets: Vec<&Asset> = self.assets.values().collect();
        assets.sort_by_key(|asset| asset.handle);
        assets
    }

    pub fn iter(&self) -> impl Iterator<Item = &Asset> {
        self.assets.values()
    }

    pub fn asset_type(&self) -> AssetType {
        self.asset_type
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::{AudioMetadata, SceneMetadata, TypeMetadata};
    use std::path::PathBuf;

    fn audio_asset(id: u64, checksum: &str) -> Asset {
        Asset {
            handle: AssetHandle::from_u64(id),
            checksum: checksum.to_string(),
            intermediate_location: AssetType::Audio.intermediate_location(AssetHandle::from_u64(id)),
            metadata: TypeMetadata::Audio(AudioMetadata {
                channels: 2,
                sample_rate: 44100,
                frame_count: 10,
                byte_size: 40,
                source_path: PathBuf::from(format!("Audio/{}.wav", id)),
            }),
        }
    }

    #[test]
    fn test_missing_manifest_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::load(AssetType::Audio, dir.path()).unwrap();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = Registry::new(AssetType::Audio);
        registry.insert(audio_asset(2, "bb")).unwrap();
        registry.insert(audio_asset(1, "aa")).unwrap();
        registry.save(dir.path()).unwrap();

        let manifest = dir.path().join("Audio/Intermediates/AudioRegistry.kgreg");
        let text = std::fs::read_to_string(&manifest).unwrap();
        assert!(text.starts_with("registryName: Audio"));
        assert!(text.find("handle: 1").unwrap() < text.find("handle: 2").unwrap());

        let reloaded = Registry::load(AssetType::Audio, dir.path()).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(
            reloaded.get(AssetHandle::from_u64(2)),
            registry.get(AssetHandle::from_u64(2))
        );
    }

    #[test]
    fn test_lookups() {
        let mut registry = Registry::new(AssetType::Audio);
        registry.insert(audio_asset(5, "cafe")).unwrap();

        assert_eq!(registry.find_by_checksum("cafe"), Some(AssetHandle::from_u64(5)));
        assert_eq!(registry.find_by_checksum("beef"), None);
        assert_eq!(
            registry.find_by_location(Path::new("Audio/Intermediates/5.kgaudio")),
            Some(AssetHandle::from_u64(5))
        );
        assert_eq!(
            registry.find_by_source(Path::new("Audio/5.wav")),
            Some(AssetHandle::from_u64(5))
        );

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_insert_rejects_wrong_type() {
        let mut registry = Registry::new(AssetType::Scene);
        let err = registry.insert(audio_asset(1, "aa")).unwrap_err();
        assert!(matches!(err, AssetError::MetadataShapeMismatch { .. }));

        let scene = Asset {
            handle: AssetHandle::from_u64(1),
            checksum: "aa".to_string(),
            intermediate_location: PathBuf::from("Scenes/Main.kgscene"),
            metadata: TypeMetadata::Scene(SceneMetadata {}),
        };
        registry.insert(scene).unwrap();
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_malformed_manifest_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(AssetType::Scene.registry_location());
        fs::write_file(&path, b"registryName: [unterminated").unwrap();

        let err = Registry::load(AssetType::Scene, dir.path()).unwrap_err();
        assert!(matches!(err, AssetError::Manifest { .. }));
    }
}
