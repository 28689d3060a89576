//! Content-addressed object store (spec §4.1): one file per object, named by
//! its full hash, in a flat `objects/` directory.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::error::{Result, UgitError};
use crate::hash::{self, Hash};
use crate::object::{self, Object};

/// Storage backend for framed object bytes, generic over disk vs. memory so
/// the commit/checkout/status engines can be exercised without touching a
/// filesystem in tests.
pub trait ObjectStore {
    /// Writes `payload` framed as `kind`, returning its hash. A no-op if an
    /// object with that hash already exists (spec §4.1: write-once per hash).
    fn put(&mut self, kind: &str, payload: &[u8]) -> Result<Hash>;

    /// Reads back `(kind, payload)` for `hash`.
    fn get(&self, hash: &Hash) -> Result<(String, Vec<u8>)>;

    fn exists(&self, hash: &Hash) -> bool;
}

/// Disk-backed store rooted at `.ugit/objects`.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(objects_dir: impl Into<PathBuf>) -> Result<Self> {
        let root = objects_dir.into();
        fs::create_dir_all(&root).map_err(|source| UgitError::WriteError {
            path: root.clone(),
            source,
        })?;
        Ok(FileStore { root })
    }

    fn path_for(&self, hash: &Hash) -> PathBuf {
        self.root.join(hash::hash_to_hex(hash))
    }
}

impl ObjectStore for FileStore {
    fn put(&mut self, kind: &str, payload: &[u8]) -> Result<Hash> {
        let _span = tracing::debug_span!("store::put", kind).entered();

        let framed = object::frame(kind, payload);
        let hash = hash::hash_bytes(&framed);
        let dest = self.path_for(&hash);

        if dest.exists() {
            return Ok(hash);
        }

        // Write to a sibling temp file and rename, so a crash mid-write never
        // leaves a partial object file at the real path (spec §5).
        let tmp = self.root.join(format!(".tmp-{}", hash::hash_to_hex(&hash)));
        fs::write(&tmp, &framed).map_err(|source| UgitError::WriteError {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &dest).map_err(|source| UgitError::WriteError {
            path: dest.clone(),
            source,
        })?;

        Ok(hash)
    }

    fn get(&self, hash: &Hash) -> Result<(String, Vec<u8>)> {
        let _span = tracing::debug_span!("store::get").entered();

        let path = self.path_for(hash);
        let framed = fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                UgitError::UnknownObject(hash::hash_to_hex(hash))
            } else {
                UgitError::ReadError {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        object::unframe(&framed).map_err(|e| match e {
            UgitError::Corrupt { reason, .. } => UgitError::Corrupt {
                hash: hash::hash_to_hex(hash),
                reason,
            },
            other => other,
        })
    }

    fn exists(&self, hash: &Hash) -> bool {
        self.path_for(hash).exists()
    }
}

/// In-memory store for tests. No disk I/O.
#[derive(Default)]
pub struct MemStore {
    objects: HashMap<Hash, Vec<u8>>,
}

impl MemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }
}

impl ObjectStore for MemStore {
    fn put(&mut self, kind: &str, payload: &[u8]) -> Result<Hash> {
        let framed = object::frame(kind, payload);
        let hash = hash::hash_bytes(&framed);
        self.objects.entry(hash).or_insert(framed);
        Ok(hash)
    }

    fn get(&self, hash: &Hash) -> Result<(String, Vec<u8>)> {
        let framed = self
            .objects
            .get(hash)
            .ok_or_else(|| UgitError::UnknownObject(hash::hash_to_hex(hash)))?;
        object::unframe(framed)
    }

    fn exists(&self, hash: &Hash) -> bool {
        self.objects.contains_key(hash)
    }
}

/// Reads `hash` from `store` and decodes it into a typed [`Object`].
pub fn read_object(store: &impl ObjectStore, hash: &Hash) -> Result<Object> {
    let (kind, payload) = store.get(hash)?;
    Object::decode(&kind, payload)
}

/// Encodes and writes `object`, returning its hash.
pub fn write_object(store: &mut impl ObjectStore, object: &Object) -> Result<Hash> {
    store.put(object.kind(), &object.payload())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Blob, KIND_BLOB};

    fn tmp_store() -> (tempfile::TempDir, FileStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("objects")).unwrap();
        (dir, store)
    }

    #[test]
    fn filestore_roundtrip() {
        let (_dir, mut store) = tmp_store();
        let hash = store.put(KIND_BLOB, b"hello").unwrap();
        assert!(store.exists(&hash));
        let (kind, payload) = store.get(&hash).unwrap();
        assert_eq!(kind, KIND_BLOB);
        assert_eq!(payload, b"hello");
    }

    #[test]
    fn filestore_put_is_idempotent() {
        let (_dir, mut store) = tmp_store();
        let h1 = store.put(KIND_BLOB, b"same").unwrap();
        let h2 = store.put(KIND_BLOB, b"same").unwrap();
        assert_eq!(h1, h2);
        assert_eq!(store.object_count_on_disk(), 1);
    }

    #[test]
    fn filestore_missing_object_errors() {
        let (_dir, store) = tmp_store();
        let bogus = hash::hash_bytes(b"never written");
        assert!(matches!(store.get(&bogus), Err(UgitError::UnknownObject(_))));
    }

    #[test]
    fn memstore_roundtrip() {
        let mut store = MemStore::new();
        let hash = store.put(KIND_BLOB, b"hello").unwrap();
        let (kind, payload) = store.get(&hash).unwrap();
        assert_eq!(kind, KIND_BLOB);
        assert_eq!(payload, b"hello");
        assert_eq!(store.object_count(), 1);
    }

    #[test]
    fn read_write_object_roundtrip() {
        let mut store = MemStore::new();
        let object = Object::Blob(Blob {
            data: b"content".to_vec(),
        });
        let hash = write_object(&mut store, &object).unwrap();
        let read_back = read_object(&store, &hash).unwrap();
        assert_eq!(read_back.into_blob().unwrap().data, b"content");
    }

    impl FileStore {
        fn object_count_on_disk(&self) -> usize {
            std::fs::read_dir(&self.root).unwrap().count()
        }
    }
}
