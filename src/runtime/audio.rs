// Decoded PCM16 audio buffers

use crate::assets::{AssetError, AudioMetadata};
use crate::compile::audio::DecodedAudio;
use std::time::Duration;

/// Interleaved 16-bit samples ready for the audio engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioBuffer {
    samples: Vec<i16>,
    channels: u16,
    sample_rate: u32,
}

impl AudioBuffer {
    /// Instantiate from a `.kgaudio` intermediate
    pub fn from_intermediate(bytes: &[u8], metadata: &AudioMetadata) -> Result<Self, AssetError> {
        if bytes.len() as u64 != metadata.byte_size || bytes.len() % 2 != 0 {
            return Err(AssetError::decode(
                "audio intermediate",
                format!("expected {} bytes, got {}", metadata.byte_size, bytes.len()),
            ));
        }

        Ok(Self {
            samples: bytemuck::pod_collect_to_vec(bytes),
            channels: metadata.channels,
            sample_rate: metadata.sample_rate,
        })
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn frame_count(&self) -> u64 {
        (self.samples.len() / self.channels.max(1) as usize) as u64
    }

    pub fn duration(&self) -> Duration {
        if self.sample_rate == 0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(self.frame_count() as f64 / self.sample_rate as f64)
    }
}

impl From<DecodedAudio> for AudioBuffer {
    fn from(decoded: DecodedAudio) -> Self {
        Self {
            samples: decoded.samples,
            channels: decoded.channels,
            sample_rate: decoded.sample_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn metadata(byte_size: u64) -> AudioMetadata {
        AudioMetadata {
            channels: 2,
            sample_rate: 4,
            frame_count: byte_size / 4,
            byte_size,
            source_path: PathBuf::from("Audio/tone.wav"),
        }
    }

    #[test]
    fn test_from_intermediate() {
        let samples: Vec<i16> = vec![1, -1, 300, -300, 7, 8, 9, 10];
        let bytes: &[u8] = bytemuck::cast_slice(&samples);

        let buffer = AudioBuffer::from_intermediate(bytes, &metadata(16)).unwrap();
        assert_eq!(buffer.samples(), &samples[..]);
        assert_eq!(buffer.frame_count(), 4);
        assert_eq!(buffer.duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_size_mismatch() {
        assert!(AudioBuffer::from_intermediate(&[0; 6], &metadata(8)).is_err());
    }
}
