//! Where script bytes come from and go to.
//!
//! The codec only sees byte buffers. [`ByteStore`] is the seam used by
//! [`Document::load`](crate::Document::load) and
//! [`Document::save`](crate::Document::save).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;

/// Loads and saves whole script buffers.
pub trait ByteStore {
    /// Returns the complete contents stored at `path`.
    fn load_bytes(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replaces the contents stored at `path`.
    fn save_bytes(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()>;
}

/// Reads and writes files on the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileStore;

impl ByteStore for FileStore {
    fn load_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn save_bytes(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        fs::write(path, bytes)
    }
}

/// Keeps buffers in memory, keyed by path.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: FxHashMap<PathBuf, Vec<u8>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a buffer.
    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    /// Returns the buffer at `path`, if any.
    pub fn get(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }
}

impl ByteStore for MemoryStore {
    fn load_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no buffer stored at {}", path.display()),
            )
        })
    }

    fn save_bytes(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        self.files.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        let path = Path::new("scene01.mse");
        assert_eq!(
            store.load_bytes(path).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );

        store.save_bytes(path, &[1, 2, 3]).unwrap();
        assert_eq!(store.load_bytes(path).unwrap(), vec![1, 2, 3]);
        assert_eq!(store.get(path), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn test_file_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene01.mse");
        let mut store = FileStore;

        store.save_bytes(&path, b"script").unwrap();
        assert_eq!(store.load_bytes(&path).unwrap(), b"script");
    }
}
