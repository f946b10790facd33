// Audio import and lookup

use super::{lookup, reported, AssetStore};
use crate::assets::{Asset, AssetError, AssetHandle, AssetType, AudioMetadata, TypeMetadata};
use crate::compile::audio;
use crate::core::checksum::checksum_file;
use crate::runtime::AudioBuffer;
use std::path::Path;
use std::sync::Arc;

impl AssetStore {
    /// Import a WAV file as 16-bit PCM
    pub fn import_audio<P: AsRef<Path>>(&mut self, path: P) -> Result<AssetHandle, AssetError> {
        let result = self.import_audio_file(path.as_ref());
        reported("Audio import", result)
    }

    pub fn get_audio(&mut self, handle: AssetHandle) -> Option<Arc<AudioBuffer>> {
        if let Some(buffer) = self.audio.get(handle) {
            return Some(buffer);
        }
        let result = self.instantiate_audio(handle);
        lookup(AssetType::Audio, handle, result)
    }

    pub fn get_audio_by_source<P: AsRef<Path>>(
        &mut self,
        path: P,
    ) -> Option<(AssetHandle, Arc<AudioBuffer>)> {
        let handle = self.registered_source(AssetType::Audio, path.as_ref())?;
        self.get_audio(handle).map(|buffer| (handle, buffer))
    }

    fn import_audio_file(&mut self, path: &Path) -> Result<AssetHandle, AssetError> {
        let (full, source) = self.source_paths(path)?;

        let checksum = checksum_file(&full);
        if checksum.is_empty() {
            return Err(AssetError::ChecksumFailure(full.display().to_string()));
        }
        if let Some(handle) = self.find_duplicate(AssetType::Audio, &checksum) {
            return Ok(handle);
        }

        let decoded = audio::decode_file(&full)?;
        let handle = AssetHandle::generate();
        let location = AssetType::Audio.intermediate_location(handle);
        self.loader()?.write_bytes(&location, decoded.as_bytes())?;

        self.register(Asset {
            handle,
            checksum,
            intermediate_location: location,
            metadata: TypeMetadata::Audio(AudioMetadata {
                channels: decoded.channels,
                sample_rate: decoded.sample_rate,
                frame_count: decoded.frame_count(),
                byte_size: decoded.byte_size(),
                source_path: source,
            }),
        })?;

        self.audio.insert(handle, AudioBuffer::from(decoded));
        Ok(handle)
    }

    fn instantiate_audio(&mut self, handle: AssetHandle) -> Result<Arc<AudioBuffer>, AssetError> {
        let asset = self.registered(AssetType::Audio, handle)?;
        let metadata = asset.metadata.as_audio()?;
        let bytes = self.loader()?.load_bytes(&asset.intermediate_location)?;
        let buffer = AudioBuffer::from_intermediate(&bytes, metadata)?;
        Ok(self.audio.insert(handle, buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::*;
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_import_and_reload() {
        let (_dir, project, mut store) = open_store();
        let wav = write_wav(&project, "jump.wav", &[0, 100, -100, 32767]);

        let handle = store.import_audio(&wav).unwrap();
        assert_eq!(store.import_audio(&wav).unwrap(), handle);

        let metadata = store
            .asset(AssetType::Audio, handle)
            .unwrap()
            .metadata
            .as_audio()
            .unwrap()
            .clone();
        assert_eq!(metadata.channels, 1);
        assert_eq!(metadata.sample_rate, 8000);
        assert_eq!(metadata.frame_count, 4);
        assert_eq!(metadata.byte_size, 8);
        assert_eq!(metadata.source_path, PathBuf::from("Audio/jump.wav"));

        store.open(&project).unwrap();
        let buffer = store.get_audio(handle).unwrap();
        assert_eq!(buffer.samples(), &[0, 100, -100, 32767]);
        assert!(Arc::ptr_eq(&buffer, &store.get_audio(handle).unwrap()));
    }

    #[test]
    fn test_corrupt_wav_leaves_registry_untouched() {
        let (_dir, project, mut store) = open_store();
        let bad = project.asset_root().join("Audio/bad.wav");
        crate::core::fs::write_file(&bad, b"RIFF....WAVEjunk").unwrap();

        let err = store.import_audio(&bad).unwrap_err();
        assert!(matches!(err, AssetError::DecodeFailure { .. }));
        assert!(store.assets(AssetType::Audio).is_empty());
        assert_eq!(store.stats().intermediates_compiled, 0);
    }

    #[test]
    fn test_get_by_source() {
        let (_dir, project, mut store) = open_store();
        let wav = write_wav(&project, "hit.wav", &[1, 2]);
        let handle = store.import_audio(&wav).unwrap();

        assert_eq!(store.get_audio_by_source("Audio/hit.wav").unwrap().0, handle);
        assert!(store.get_audio_by_source("Audio/miss.wav").is_none());
    }
}
