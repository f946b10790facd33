// Filesystem helpers for project-relative asset paths

use std::io;
use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: drops `.` components and folds `..` where possible
pub fn normalize<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.as_ref().components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Express `path` relative to `base` when it lives inside it
///
/// Relative inputs are assumed to already be base-relative and are only normalized.
pub fn relative_to<P: AsRef<Path>, B: AsRef<Path>>(base: B, path: P) -> PathBuf {
    let path = normalize(path);
    let base = normalize(base);
    match path.strip_prefix(&base) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => path,
    }
}

/// Write a file, creating parent directories as needed
pub fn write_file<P: AsRef<Path>>(path: P, bytes: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)
}

/// Remove a file, treating "already gone" as success
pub fn remove_file<P: AsRef<Path>>(path: P) -> io::Result<()> {
    match std::fs::remove_file(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("Scenes/./Level1.kgscene"), PathBuf::from("Scenes/Level1.kgscene"));
        assert_eq!(normalize("Scenes/../Input/Menu.kginput"), PathBuf::from("Input/Menu.kginput"));
    }

    #[test]
    fn test_relative_to_inside_base() {
        let rel = relative_to("/game/Assets", "/game/Assets/Scenes/Level1.kgscene");
        assert_eq!(rel, PathBuf::from("Scenes/Level1.kgscene"));
    }

    #[test]
    fn test_relative_to_passthrough() {
        let rel = relative_to("/game/Assets", "Scenes/Level1.kgscene");
        assert_eq!(rel, PathBuf::from("Scenes/Level1.kgscene"));
    }

    #[test]
    fn test_write_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a/b/c.bin");
        write_file(&path, b"x").unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"x");

        remove_file(&path).unwrap();
        remove_file(&path).unwrap();
        assert!(!path.exists());
    }
}
