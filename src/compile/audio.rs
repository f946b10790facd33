// Audio intermediate compiler: WAV decode to interleaved PCM16

use crate::assets::AssetError;
use hound::{SampleFormat, WavReader};
use std::io::Read;
use std::path::Path;

/// Interleaved signed 16-bit samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedAudio {
    pub samples: Vec<i16>,
    pub channels: u16,
    pub sample_rate: u32,
}

impl DecodedAudio {
    pub fn frame_count(&self) -> u64 {
        (self.samples.len() / self.channels.max(1) as usize) as u64
    }

    pub fn byte_size(&self) -> u64 {
        (self.samples.len() * std::mem::size_of::<i16>()) as u64
    }

    /// Native-endian bytes as written to the intermediate file
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.samples)
    }
}

/// Decode a WAV file from disk
pub fn decode_file<P: AsRef<Path>>(path: P) -> Result<DecodedAudio, AssetError> {
    let path = path.as_ref();
    let reader = WavReader::open(path).map_err(|e| AssetError::decode(path, e))?;
    decode(reader, path)
}

fn decode<R: Read>(reader: WavReader<R>, path: &Path) -> Result<DecodedAudio, AssetError> {
    let spec = reader.spec();
    if spec.channels == 0 {
        return Err(AssetError::decode(path, "zero channels"));
    }

    let samples = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 1..=8) => reader
            .into_samples::<i8>()
            .map(|s| s.map(|v| (v as i16) << 8))
            .collect::<Result<Vec<i16>, _>>(),
        (SampleFormat::Int, bits @ 9..=16) => reader
            .into_samples::<i16>()
            .map(|s| s.map(|v| v << (16 - bits)))
            .collect::<Result<Vec<i16>, _>>(),
        (SampleFormat::Int, bits @ 17..=32) => reader
            .into_samples::<i32>()
            .map(|s| s.map(|v| (v >> (bits - 16)) as i16))
            .collect::<Result<Vec<i16>, _>>(),
        (SampleFormat::Float, 32) => reader
            .into_samples::<f32>()
            .map(|s| s.map(|v| (v.clamp(-1.0, 1.0) * i16::MAX as f32) as i16))
            .collect::<Result<Vec<i16>, _>>(),
        (format, bits) => {
            return Err(AssetError::decode(
                path,
                format!("unsupported {:?} sample format at {} bits", format, bits),
            ))
        }
    }
    .map_err(|e| AssetError::decode(path, e))?;

    if samples.len() % spec.channels as usize != 0 {
        return Err(AssetError::decode(path, "truncated sample frame"));
    }

    Ok(DecodedAudio {
        samples,
        channels: spec.channels,
        sample_rate: spec.sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::{WavSpec, WavWriter};

    fn write_wav(path: &Path, spec: WavSpec, samples: &[i32]) {
        let mut writer = WavWriter::create(path, spec).unwrap();
        for s in samples {
            writer.write_sample(*s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn test_decode_pcm16_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        write_wav(&path, spec, &[1, -1, 1000, -1000, 32767, -32768]);

        let decoded = decode_file(&path).unwrap();
        assert_eq!(decoded.channels, 2);
        assert_eq!(decoded.sample_rate, 22050);
        assert_eq!(decoded.frame_count(), 3);
        assert_eq!(decoded.byte_size(), 12);
        assert_eq!(decoded.samples, vec![1, -1, 1000, -1000, 32767, -32768]);
        assert_eq!(decoded.as_bytes().len(), 12);
    }

    #[test]
    fn test_decode_converts_24_bit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mono24.wav");
        let spec = WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 24,
            sample_format: SampleFormat::Int,
        };
        write_wav(&path, spec, &[256, -512, 0x7F_FFFF]);

        let decoded = decode_file(&path).unwrap();
        assert_eq!(decoded.samples, vec![1, -2, 32767]);
    }

    #[test]
    fn test_corrupt_wav_is_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wav");
        std::fs::write(&path, b"RIFF....WAVEjunk").unwrap();

        let err = decode_file(&path).unwrap_err();
        assert!(matches!(err, AssetError::DecodeFailure { .. }));
    }
}
