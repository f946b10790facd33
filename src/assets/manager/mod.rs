// Central asset management system
//
// One registry and runtime cache per asset type, bound to a single open project.
// Everything here runs on the owning thread; other threads go through the OwnerQueue.

mod audio;
mod documents;
mod fonts;
mod shaders;
mod textures;

use super::{Asset, AssetError, AssetHandle, AssetLoader, AssetType, Registry, RuntimeCache};
use crate::project::{AssetStoreConfig, Project};
use crate::runtime::{AudioBuffer, Font, Shader, Texture2D};
use log::{error, info};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Registry and cache counts for diagnostics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetStats {
    pub registered: BTreeMap<AssetType, usize>,
    pub cached: BTreeMap<AssetType, usize>,
    /// Media intermediates written since the store was created
    pub intermediates_compiled: usize,
}

struct OpenProject {
    name: String,
    loader: AssetLoader,
    config: AssetStoreConfig,
}

/// Asset store for the active project
///
/// Import and create are idempotent on content. Gets return shared runtime objects,
/// instantiating them from intermediates on first use.
pub struct AssetStore {
    project: Option<OpenProject>,

    /// Indexed by `AssetType as usize`
    registries: Vec<Registry>,

    textures: RuntimeCache<Texture2D>,
    audio: RuntimeCache<AudioBuffer>,
    fonts: RuntimeCache<Font>,
    shaders: RuntimeCache<Shader>,

    compiled: usize,
}

impl AssetStore {
    /// Create a store with no project open
    pub fn new() -> Self {
        Self {
            project: None,
            registries: AssetType::ALL.iter().map(|t| Registry::new(*t)).collect(),
            textures: RuntimeCache::new(),
            audio: RuntimeCache::new(),
            fonts: RuntimeCache::new(),
            shaders: RuntimeCache::new(),
            compiled: 0,
        }
    }

    /// Open a project, loading every registry manifest
    ///
    /// On error the store is left closed.
    pub fn open(&mut self, project: &Project) -> Result<(), AssetError> {
        self.close();

        let root = project.asset_root();
        let mut registries = Vec::with_capacity(AssetType::ALL.len());
        for asset_type in AssetType::ALL {
            registries.push(Registry::load(asset_type, &root).map_err(|e| {
                error!("Failed to open project '{}': {}", project.name, e);
                e
            })?);
        }

        self.registries = registries;
        self.project = Some(OpenProject {
            name: project.name.clone(),
            loader: AssetLoader::new(&root),
            config: project.assets.clone(),
        });

        info!(
            "Opened project '{}' with {} registered assets",
            project.name,
            self.registries.iter().map(Registry::len).sum::<usize>()
        );
        Ok(())
    }

    /// Drop every registry and cached object
    pub fn close(&mut self) {
        if let Some(project) = self.project.take() {
            info!("Closed project '{}'", project.name);
        }
        for registry in &mut self.registries {
            registry.clear();
        }
        self.textures.clear();
        self.audio.clear();
        self.fonts.clear();
        self.shaders.clear();
    }

    pub fn is_open(&self) -> bool {
        self.project.is_some()
    }

    pub fn asset_root(&self) -> Option<&Path> {
        self.project.as_ref().map(|p| p.loader.base_path())
    }

    /// Registered assets of one type, ordered by handle
    pub fn assets(&self, asset_type: AssetType) -> Vec<&Asset> {
        self.registry(asset_type).sorted()
    }

    pub fn asset(&self, asset_type: AssetType, handle: AssetHandle) -> Option<&Asset> {
        self.registry(asset_type).get(handle)
    }

    /// Clear one registry and its cache without touching the manifest
    pub fn clear_registry(&mut self, asset_type: AssetType) {
        self.registry_mut(asset_type).clear();
        match asset_type {
            AssetType::Texture => self.textures.clear(),
            AssetType::Audio => self.audio.clear(),
            AssetType::Font => self.fonts.clear(),
            AssetType::Shader => self.shaders.clear(),
            _ => {}
        }
    }

    /// Rewrite every manifest
    pub fn serialize_all(&self) -> Result<(), AssetError> {
        let root = self.loader()?.base_path();
        for registry in &self.registries {
            registry.save(root)?;
        }
        Ok(())
    }

    pub fn stats(&self) -> AssetStats {
        let registered = self
            .registries
            .iter()
            .map(|r| (r.asset_type(), r.len()))
            .collect();

        let mut cached = BTreeMap::new();
        cached.insert(AssetType::Texture, self.textures.len());
        cached.insert(AssetType::Audio, self.audio.len());
        cached.insert(AssetType::Font, self.fonts.len());
        cached.insert(AssetType::Shader, self.shaders.len());

        AssetStats {
            registered,
            cached,
            intermediates_compiled: self.compiled,
        }
    }

    fn registry(&self, asset_type: AssetType) -> &Registry {
        &self.registries[asset_type as usize]
    }

    fn registry_mut(&mut self, asset_type: AssetType) -> &mut Registry {
        &mut self.registries[asset_type as usize]
    }

    fn loader(&self) -> Result<&AssetLoader, AssetError> {
        match &self.project {
            Some(project) => Ok(&project.loader),
            None => {
                error!("Asset operation attempted with no project open");
                Err(AssetError::NoActiveProject)
            }
        }
    }

    fn config(&self) -> Result<&AssetStoreConfig, AssetError> {
        self.project
            .as_ref()
            .map(|p| &p.config)
            .ok_or(AssetError::NoActiveProject)
    }

    /// Resolve a source path to (full path, asset-directory-relative path)
    fn source_paths(&self, path: &Path) -> Result<(PathBuf, PathBuf), AssetError> {
        let loader = self.loader()?;
        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            loader.resolve(path)
        };
        Ok((full.clone(), loader.relative(full)))
    }

    fn find_duplicate(&self, asset_type: AssetType, checksum: &str) -> Option<AssetHandle> {
        let handle = self.registry(asset_type).find_by_checksum(checksum)?;
        info!("{} already registered as {}", asset_type, handle);
        Some(handle)
    }

    /// Insert a new asset and persist its registry
    fn register(&mut self, asset: Asset) -> Result<(), AssetError> {
        let asset_type = asset.asset_type();
        let root = self.loader()?.base_path().to_path_buf();

        let registry = self.registry_mut(asset_type);
        registry.insert(asset)?;
        registry.save(&root)?;

        if asset_type.is_media() {
            self.compiled += 1;
        }
        Ok(())
    }

    /// Registry record for a handle, or UnknownHandle
    fn registered(&self, asset_type: AssetType, handle: AssetHandle) -> Result<Asset, AssetError> {
        self.registry(asset_type)
            .get(handle)
            .cloned()
            .ok_or(AssetError::UnknownHandle { asset_type, handle })
    }

    /// Handle whose media was imported from `path`
    fn registered_source(&self, asset_type: AssetType, path: &Path) -> Option<AssetHandle> {
        let (_, source) = self.source_paths(path).ok()?;
        let handle = self.registry(asset_type).find_by_source(&source);
        if handle.is_none() {
            error!("No {} asset was imported from {}", asset_type, source.display());
        }
        handle
    }
}

impl Default for AssetStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Log a failed lookup and collapse it to `None`
fn lookup<T>(asset_type: AssetType, handle: AssetHandle, result: Result<T, AssetError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            error!("Failed to get {} {}: {}", asset_type, handle, e);
            None
        }
    }
}

/// Log a failed import or create before handing it back
fn reported<T>(operation: &str, result: Result<T, AssetError>) -> Result<T, AssetError> {
    if let Err(e) = &result {
        error!("{} failed: {}", operation, e);
    }
    result
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn test_operations_need_a_project() {
        let mut store = AssetStore::new();
        let err = store.import_texture("Textures/a.png").unwrap_err();
        assert!(matches!(err, AssetError::NoActiveProject));
        assert!(err.is_fatal());
        assert!(store.get_texture(AssetHandle::from_u64(1)).is_none());
        assert!(store.serialize_all().is_err());
    }

    #[test]
    fn test_open_empty_project() {
        let (_dir, _project, store) = open_store();
        assert!(store.is_open());
        for asset_type in AssetType::ALL {
            assert!(store.assets(asset_type).is_empty());
        }
    }

    #[test]
    fn test_malformed_manifest_refuses_to_open() {
        let (_dir, project, mut store) = open_store();
        store.close();

        let manifest = project
            .asset_root()
            .join(AssetType::Scene.registry_location());
        crate::core::fs::write_file(&manifest, b"registryName: Scene\nassets: {{{").unwrap();

        let err = store.open(&project).unwrap_err();
        assert!(matches!(err, AssetError::Manifest { .. }));
        assert!(!store.is_open());
    }

    #[test]
    fn test_durability_across_reopen() {
        let (_dir, project, mut store) = open_store();
        let png = write_png(&project, "crate.png", [10, 20, 30, 255]);
        let handle = store.import_texture(&png).unwrap();
        let before = store.asset(AssetType::Texture, handle).cloned().unwrap();

        store.close();
        assert!(store.asset(AssetType::Texture, handle).is_none());
        assert!(store.get_texture(handle).is_none());

        store.open(&project).unwrap();
        assert_eq!(store.asset(AssetType::Texture, handle), Some(&before));
        let texture = store.get_texture(handle).unwrap();
        assert_eq!(texture.pixel(3, 1), Some(&[10u8, 20, 30, 255][..]));
    }

    #[test]
    fn test_clear_registry_keeps_manifest() {
        let (_dir, project, mut store) = open_store();
        let png = write_png(&project, "crate.png", [1, 1, 1, 255]);
        let handle = store.import_texture(&png).unwrap();

        store.clear_registry(AssetType::Texture);
        assert!(store.assets(AssetType::Texture).is_empty());
        assert_eq!(store.stats().cached[&AssetType::Texture], 0);

        store.open(&project).unwrap();
        assert!(store.asset(AssetType::Texture, handle).is_some());
    }

    #[test]
    fn test_stats() {
        let (_dir, project, mut store) = open_store();
        let png = write_png(&project, "crate.png", [1, 2, 3, 255]);
        store.import_texture(&png).unwrap();
        store.import_texture(&png).unwrap();

        let stats = store.stats();
        assert_eq!(stats.registered[&AssetType::Texture], 1);
        assert_eq!(stats.registered[&AssetType::Scene], 0);
        assert_eq!(stats.cached[&AssetType::Texture], 1);
        assert_eq!(stats.intermediates_compiled, 1);
    }
}
