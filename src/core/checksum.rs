// Content checksums used for asset deduplication
//
// Checksums are only ever compared for equality. They are not a security boundary.

use log::error;
use std::fs::File;
use std::path::Path;

/// Checksum of a byte buffer, as lowercase hex
pub fn checksum_bytes(bytes: &[u8]) -> String {
    blake3::hash(bytes).to_hex().to_string()
}

/// Checksum of a canonical string (asset names, generated shader source)
pub fn checksum_str(input: &str) -> String {
    checksum_bytes(input.as_bytes())
}

/// Checksum of a file's contents
///
/// Returns an empty string if the file cannot be read.
pub fn checksum_file<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to open {} for checksum: {}", path.display(), e);
            return String::new();
        }
    };

    let mut hasher = blake3::Hasher::new();
    match hasher.update_reader(file) {
        Ok(_) => hasher.finalize().to_hex().to_string(),
        Err(e) => {
            error!("Failed to read {} for checksum: {}", path.display(), e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_deterministic() {
        assert_eq!(checksum_bytes(b"kiln"), checksum_bytes(b"kiln"));
        assert_ne!(checksum_bytes(b"kiln"), checksum_bytes(b"kilo"));
    }

    #[test]
    fn test_string_and_bytes_agree() {
        assert_eq!(checksum_str("MainMenu"), checksum_bytes(b"MainMenu"));
    }

    #[test]
    fn test_file_matches_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.bin");
        std::fs::write(&path, [1u8, 2, 3, 4]).unwrap();

        assert_eq!(checksum_file(&path), checksum_bytes(&[1, 2, 3, 4]));
    }

    #[test]
    fn test_unreadable_file_is_empty() {
        assert!(checksum_file("/nonexistent/kiln/file.png").is_empty());
    }
}
