// Document creation, lookup, saving and deletion
//
// Documents are read from disk on every get and never enter a runtime cache.

use super::{lookup, reported, AssetStore};
use crate::assets::{Asset, AssetError, AssetHandle};
use crate::core::checksum::checksum_str;
use crate::documents::{from_yaml, to_yaml, Deletable, Document};
use log::{info, warn};
use std::path::{Path, PathBuf};

impl AssetStore {
    /// Create a default document named `name`; an existing name returns its handle
    pub fn create_document<D: Document>(&mut self, name: &str) -> Result<AssetHandle, AssetError> {
        let result = self.create_document_inner::<D>(name);
        reported("Document creation", result)
    }

    /// Freshly deserialized document for a handle
    pub fn get_document<D: Document>(&self, handle: AssetHandle) -> Option<D> {
        lookup(D::ASSET_TYPE, handle, self.load_document(handle))
    }

    /// Document stored at `path`, creating a default one named after the file stem
    /// when no registered document lives there
    pub fn get_document_at<D: Document, P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Result<(AssetHandle, D), AssetError> {
        let path = path.as_ref();
        let location = self.loader()?.relative(path);

        if let Some(handle) = self.registry(D::ASSET_TYPE).find_by_location(&location) {
            return Ok((handle, self.load_document(handle)?));
        }

        let name = location
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.is_empty())
            .ok_or_else(|| AssetError::decode(path, "path has no file name"))?;
        warn!(
            "No {} registered at {}, creating '{}'",
            D::ASSET_TYPE,
            location.display(),
            name
        );

        let handle = self.create_document::<D>(&name)?;
        Ok((handle, self.load_document(handle)?))
    }

    /// Overwrite a registered document
    pub fn save_document<D: Document>(&self, handle: AssetHandle, document: &D) -> Result<(), AssetError> {
        let location = self.registered(D::ASSET_TYPE, handle)?.intermediate_location;
        let text = to_yaml(document, &location)?;
        self.loader()?.write_bytes(&location, text.as_bytes())
    }

    /// Whether a document with this name is registered
    pub fn document_exists<D: Document>(&self, name: &str) -> bool {
        self.registry(D::ASSET_TYPE)
            .find_by_checksum(&checksum_str(name))
            .is_some()
    }

    /// Asset-directory-relative file of a registered document
    pub fn document_location<D: Document>(&self, handle: AssetHandle) -> Option<PathBuf> {
        self.registry(D::ASSET_TYPE)
            .get(handle)
            .map(|asset| asset.intermediate_location.clone())
    }

    /// Remove a document's file and registry entry
    pub fn delete_document<D: Deletable>(&mut self, handle: AssetHandle) -> Result<(), AssetError> {
        let asset_type = D::ASSET_TYPE;
        let asset = self.registered(asset_type, handle)?;
        let root = self.loader()?.base_path().to_path_buf();

        // The manifest goes first so a failed save never leaves an entry without a file
        let registry = self.registry_mut(asset_type);
        registry.remove(handle);
        if let Err(err) = registry.save(&root) {
            registry.insert(asset)?;
            return Err(err);
        }
        self.loader()?.remove(&asset.intermediate_location)?;

        info!("Deleted {} {}", asset_type, asset.intermediate_location.display());
        Ok(())
    }

    fn create_document_inner<D: Document>(&mut self, name: &str) -> Result<AssetHandle, AssetError> {
        self.loader()?;

        let checksum = checksum_str(name);
        if let Some(handle) = self.find_duplicate(D::ASSET_TYPE, &checksum) {
            return Ok(handle);
        }

        let handle = AssetHandle::generate();
        let location = D::ASSET_TYPE.document_location(name);
        let text = to_yaml(&D::named(name), &location)?;
        self.loader()?.write_bytes(&location, text.as_bytes())?;

        self.register(Asset {
            handle,
            checksum,
            intermediate_location: location,
            metadata: D::metadata(name),
        })?;
        info!("Created {} '{}' as {}", D::ASSET_TYPE, name, handle);
        Ok(handle)
    }

    fn load_document<D: Document>(&self, handle: AssetHandle) -> Result<D, AssetError> {
        let asset = self.registered(D::ASSET_TYPE, handle)?;
        let text = self.loader()?.load_string(&asset.intermediate_location)?;
        from_yaml(&text, &asset.intermediate_location)
    }
}
