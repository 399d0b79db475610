use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metadata values for one file, keyed by provider-specific names
/// (`modified`, `hash_sha256`, `EXIF:Model`, ...).
pub type Metadata = BTreeMap<String, String>;

/// Source of per-file metadata consumed by metadata modules.
pub trait MetadataProvider {
    /// Return the metadata for `path`, or `None` when nothing is available.
    fn metadata(&self, path: &Path) -> Option<Metadata>;
}

/// Reads modification time from the filesystem and hashes file content.
#[derive(Debug, Clone, Default)]
pub struct FsMetadataProvider {
    /// Skip hashing (the most expensive part) when false
    pub compute_hash: bool,
}

impl FsMetadataProvider {
    pub fn new() -> Self {
        Self { compute_hash: true }
    }
}

impl MetadataProvider for FsMetadataProvider {
    fn metadata(&self, path: &Path) -> Option<Metadata> {
        let fs_meta = fs::metadata(path).ok()?;
        let mut metadata = Metadata::new();

        if let Ok(modified) = fs_meta.modified() {
            let modified: chrono::DateTime<chrono::Local> = modified.into();
            metadata.insert("modified".to_string(), modified.to_rfc3339());
        }
        metadata.insert("size".to_string(), fs_meta.len().to_string());

        if self.compute_hash && fs_meta.is_file() {
            match sha256_file(path) {
                Ok(digest) => {
                    metadata.insert("hash_sha256".to_string(), digest);
                },
                Err(e) => debug!(path = %path.display(), error = %e, "could not hash file"),
            }
        }

        Some(metadata)
    }
}

/// Calculate the SHA-256 digest of a file as lowercase hex
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

/// In-memory provider keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MapMetadataProvider {
    entries: HashMap<PathBuf, Metadata>,
}

impl MapMetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<PathBuf>, metadata: Metadata) {
        self.entries.insert(path.into(), metadata);
    }

    pub fn with(mut self, path: impl Into<PathBuf>, metadata: Metadata) -> Self {
        self.insert(path, metadata);
        self
    }
}

impl MetadataProvider for MapMetadataProvider {
    fn metadata(&self, path: &Path) -> Option<Metadata> {
        self.entries.get(path).cloned()
    }
}

/// Provider that never has anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

impl MetadataProvider for NoMetadata {
    fn metadata(&self, _path: &Path) -> Option<Metadata> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_fs_provider_reads_mtime_and_hash() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.txt");
        fs::write(&path, "hello").unwrap();

        let metadata = FsMetadataProvider::new().metadata(&path).unwrap();
        assert!(metadata.contains_key("modified"));
        assert_eq!(metadata["size"], "5");
        assert_eq!(
            metadata["hash_sha256"],
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_fs_provider_without_hash() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a.txt");
        fs::write(&path, "hello").unwrap();

        let metadata = FsMetadataProvider::default().metadata(&path).unwrap();
        assert!(!metadata.contains_key("hash_sha256"));
    }

    #[test]
    fn test_fs_provider_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert!(FsMetadataProvider::new()
            .metadata(&temp_dir.path().join("missing"))
            .is_none());
    }

    #[test]
    fn test_map_provider() {
        let mut metadata = Metadata::new();
        metadata.insert("EXIF:Model".to_string(), "X100V".to_string());
        let provider = MapMetadataProvider::new().with("/photos/a.jpg", metadata);

        assert_eq!(
            provider.metadata(Path::new("/photos/a.jpg")).unwrap()["EXIF:Model"],
            "X100V"
        );
        assert!(provider.metadata(Path::new("/photos/b.jpg")).is_none());
        assert!(NoMetadata.metadata(Path::new("/photos/a.jpg")).is_none());
    }
}
