// Font import: MSDF atlas generation and lookup

use super::{lookup, reported, AssetStore};
use crate::assets::{Asset, AssetError, AssetHandle, AssetType, FontMetadata, TypeMetadata};
use crate::compile::font;
use crate::core::checksum::checksum_file;
use crate::runtime::Font;
use log::info;
use std::path::Path;
use std::sync::Arc;

impl AssetStore {
    /// Import a TrueType/OpenType font, generating its MSDF atlas
    pub fn import_font<P: AsRef<Path>>(&mut self, path: P) -> Result<AssetHandle, AssetError> {
        let result = self.import_font_file(path.as_ref());
        reported("Font import", result)
    }

    pub fn get_font(&mut self, handle: AssetHandle) -> Option<Arc<Font>> {
        if let Some(font) = self.fonts.get(handle) {
            return Some(font);
        }
        let result = self.instantiate_font(handle);
        lookup(AssetType::Font, handle, result)
    }

    pub fn get_font_by_source<P: AsRef<Path>>(&mut self, path: P) -> Option<(AssetHandle, Arc<Font>)> {
        let handle = self.registered_source(AssetType::Font, path.as_ref())?;
        self.get_font(handle).map(|font| (handle, font))
    }

    fn import_font_file(&mut self, path: &Path) -> Result<AssetHandle, AssetError> {
        let (full, source) = self.source_paths(path)?;

        let checksum = checksum_file(&full);
        if checksum.is_empty() {
            return Err(AssetError::ChecksumFailure(full.display().to_string()));
        }
        if let Some(handle) = self.find_duplicate(AssetType::Font, &checksum) {
            return Ok(handle);
        }

        let compiled = font::compile_file(&full, &self.config()?.font)?;
        info!(
            "Generated {}x{} atlas with {} glyphs from {}",
            compiled.atlas_width,
            compiled.atlas_height,
            compiled.glyphs.len(),
            source.display()
        );

        let handle = AssetHandle::generate();
        let location = AssetType::Font.intermediate_location(handle);
        self.loader()?.write_bytes(&location, &compiled.atlas)?;

        let metadata = FontMetadata {
            atlas_width: compiled.atlas_width,
            atlas_height: compiled.atlas_height,
            line_height: compiled.line_height,
            source_path: source,
            characters: compiled.glyphs,
        };
        let font = Font::from_intermediate(compiled.atlas, &metadata)?;

        self.register(Asset {
            handle,
            checksum,
            intermediate_location: location,
            metadata: TypeMetadata::Font(metadata),
        })?;

        self.fonts.insert(handle, font);
        Ok(handle)
    }

    fn instantiate_font(&mut self, handle: AssetHandle) -> Result<Arc<Font>, AssetError> {
        let asset = self.registered(AssetType::Font, handle)?;
        let metadata = asset.metadata.as_font()?;
        let bytes = self.loader()?.load_bytes(&asset.intermediate_location)?;
        let font = Font::from_intermediate(bytes, metadata)?;
        Ok(self.fonts.insert(handle, font))
    }
}
