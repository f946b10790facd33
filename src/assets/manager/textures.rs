// Texture import and lookup

use super::{lookup, reported, AssetStore};
use crate::assets::{Asset, AssetError, AssetHandle, AssetType, TextureMetadata, TypeMetadata};
use crate::compile::texture;
use crate::core::checksum::{checksum_bytes, checksum_file};
use crate::runtime::Texture2D;
use std::path::Path;
use std::sync::Arc;

impl AssetStore {
    /// Import an image file, returning the existing handle if its content is registered
    pub fn import_texture<P: AsRef<Path>>(&mut self, path: P) -> Result<AssetHandle, AssetError> {
        let result = self.import_texture_file(path.as_ref());
        reported("Texture import", result)
    }

    /// Import raw pixels (`channels` bytes per pixel, top row first)
    ///
    /// The checksum covers the pixel bytes only. The same bytes imported again with a
    /// different width, height or channel count return the handle registered first.
    pub fn import_texture_from_data(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        channels: u8,
    ) -> Result<AssetHandle, AssetError> {
        let result = self.import_texture_data(pixels, width, height, channels);
        reported("Texture import from data", result)
    }

    /// Shared texture for a handle, instantiated from its intermediate on first use
    pub fn get_texture(&mut self, handle: AssetHandle) -> Option<Arc<Texture2D>> {
        if let Some(texture) = self.textures.get(handle) {
            return Some(texture);
        }
        let result = self.instantiate_texture(handle);
        lookup(AssetType::Texture, handle, result)
    }

    /// Texture imported from a source image
    pub fn get_texture_by_source<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Option<(AssetHandle, Arc<Texture2D>)> {
        let handle = self.registered_source(AssetType::Texture, path.as_ref())?;
        self.get_texture(handle).map(|texture| (handle, texture))
    }

    fn import_texture_file(&mut self, path: &Path) -> Result<AssetHandle, AssetError> {
        let (full, source) = self.source_paths(path)?;

        let checksum = checksum_file(&full);
        if checksum.is_empty() {
            return Err(AssetError::ChecksumFailure(full.display().to_string()));
        }
        if let Some(handle) = self.find_duplicate(AssetType::Texture, &checksum) {
            return Ok(handle);
        }

        let texture = Texture2D::from(texture::decode_file(&full)?);
        self.register_texture(texture, checksum, Some(source.as_path()))
    }

    fn import_texture_data(
        &mut self,
        pixels: &[u8],
        width: u32,
        height: u32,
        channels: u8,
    ) -> Result<AssetHandle, AssetError> {
        self.loader()?;
        let texture = Texture2D::from_raw(pixels.to_vec(), width, height, channels)?;

        let checksum = checksum_bytes(pixels);
        if let Some(handle) = self.find_duplicate(AssetType::Texture, &checksum) {
            return Ok(handle);
        }
        self.register_texture(texture, checksum, None)
    }

    fn register_texture(
        &mut self,
        texture: Texture2D,
        checksum: String,
        source: Option<&Path>,
    ) -> Result<AssetHandle, AssetError> {
        let handle = AssetHandle::generate();
        let location = AssetType::Texture.intermediate_location(handle);
        self.loader()?.write_bytes(&location, texture.pixels())?;

        self.register(Asset {
            handle,
            checksum,
            intermediate_location: location,
            metadata: TypeMetadata::Texture(TextureMetadata {
                width: texture.width(),
                height: texture.height(),
                channels: texture.channels(),
                source_path: source.map(Path::to_path_buf),
            }),
        })?;

        self.textures.insert(handle, texture);
        Ok(handle)
    }

    fn instantiate_texture(&mut self, handle: AssetHandle) -> Result<Arc<Texture2D>, AssetError> {
        let asset = self.registered(AssetType::Texture, handle)?;
        let metadata = asset.metadata.as_texture()?;
        let bytes = self.loader()?.load_bytes(&asset.intermediate_location)?;
        let texture = Texture2D::from_intermediate(bytes, metadata)?;
        Ok(self.textures.insert(handle, texture))
    }
}
