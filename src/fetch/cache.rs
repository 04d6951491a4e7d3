use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::foundation::error::{DocshotError, DocshotResult};
use crate::foundation::fs::write_atomic;

/// Key/value store deciding whether a remote asset must be downloaded.
///
/// Presence is the only signal: `exists` returning `true` means "do not fetch".
pub trait AssetCache {
    /// Return `true` when `key` is already cached.
    fn exists(&self, key: &str) -> bool;
    /// Store `bytes` under `key`, replacing any previous value.
    fn store(&mut self, key: &str, bytes: &[u8]) -> DocshotResult<()>;
}

/// Normalize and validate cache keys.
///
/// The result uses `/` separators, drops `.` segments, and rejects absolute paths or parent
/// traversals (`..`).
pub fn normalize_key(key: &str) -> DocshotResult<String> {
    let s = key.replace('\\', "/");
    if s.starts_with('/') {
        return Err(DocshotError::validation("cache keys must be relative"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(DocshotError::validation("cache keys must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(DocshotError::validation("cache key must contain a file name"));
    }
    Ok(out.join("/"))
}

/// Cache rooted at a directory; each key is a file below it.
#[derive(Clone, Debug)]
pub struct FsAssetCache {
    root: PathBuf,
}

impl FsAssetCache {
    /// Cache storing files under `root` (created lazily on first store).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cache directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local path for `key`.
    pub fn path_for(&self, key: &str) -> DocshotResult<PathBuf> {
        Ok(self.root.join(normalize_key(key)?))
    }
}

impl AssetCache for FsAssetCache {
    fn exists(&self, key: &str) -> bool {
        self.path_for(key).is_ok_and(|p| p.exists())
    }

    fn store(&mut self, key: &str, bytes: &[u8]) -> DocshotResult<()> {
        let path = self.path_for(key)?;
        write_atomic(&path, bytes)
    }
}

/// In-memory cache for tests and dry runs.
#[derive(Clone, Debug, Default)]
pub struct MemoryAssetCache {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryAssetCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the stored bytes for `key`.
    pub fn get(&self, key: &str) -> Option<&[u8]> {
        let key = normalize_key(key).ok()?;
        self.entries.get(&key).map(Vec::as_slice)
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl AssetCache for MemoryAssetCache {
    fn exists(&self, key: &str) -> bool {
        normalize_key(key).is_ok_and(|k| self.entries.contains_key(&k))
    }

    fn store(&mut self, key: &str, bytes: &[u8]) -> DocshotResult<()> {
        self.entries.insert(normalize_key(key)?, bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/cache.rs"]
mod tests;
