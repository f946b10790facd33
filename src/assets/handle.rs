// Opaque asset handle system

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a registered asset
///
/// Handles are random 64-bit values. `AssetHandle::EMPTY` (zero) means "no asset" and
/// is never produced by [`AssetHandle::generate`]. Freshly generated handles are not
/// checked against existing registry entries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AssetHandle(u64);

impl AssetHandle {
    /// Reserved "no asset" sentinel
    pub const EMPTY: AssetHandle = AssetHandle(0);

    /// Generate a new random, non-empty handle
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        loop {
            let id: u64 = rng.gen();
            if id != 0 {
                return Self(id);
            }
        }
    }

    /// Create a handle from a raw u64
    pub fn from_u64(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw u64 value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for AssetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for AssetHandle {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_handles_are_not_empty() {
        for _ in 0..1000 {
            assert!(!AssetHandle::generate().is_empty());
        }
    }

    #[test]
    fn test_handle_roundtrip() {
        let handle = AssetHandle::from_u64(12345);
        assert_eq!(handle.as_u64(), 12345);
        assert_eq!(handle.to_string(), "12345");
    }

    #[test]
    fn test_handle_serializes_as_plain_integer() {
        let handle = AssetHandle::from(42);
        assert_eq!(serde_yaml::to_string(&handle).unwrap().trim(), "42");

        let parsed: AssetHandle = serde_yaml::from_str("42").unwrap();
        assert_eq!(parsed, handle);
    }

    #[test]
    fn test_empty_is_default() {
        assert_eq!(AssetHandle::default(), AssetHandle::EMPTY);
        assert!(AssetHandle::EMPTY.is_empty());
    }
}
