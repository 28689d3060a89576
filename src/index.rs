//! Staging index (spec §4.3): ordered mapping path → blob hash, persisted as
//! `<hash> <path>\n` lines, sorted.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::error::{Result, UgitError};
use crate::hash::{self, Hash};

#[derive(Debug, Clone, Default)]
pub struct Index {
    entries: BTreeMap<String, Hash>,
}

impl Index {
    pub fn load(index_path: &Path) -> Result<Self> {
        match fs::read_to_string(index_path) {
            Ok(content) => Self::parse(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(UgitError::ReadError {
                path: index_path.to_path_buf(),
                source,
            }),
        }
    }

    fn parse(content: &str) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for line in content.lines() {
            if line.is_empty() {
                continue;
            }
            let (hash_str, path) = line.split_once(' ').ok_or_else(|| UgitError::Corrupt {
                hash: String::new(),
                reason: format!("malformed index line {line:?}"),
            })?;
            entries.insert(path.to_string(), hash::hex_to_hash(hash_str)?);
        }
        Ok(Index { entries })
    }

    pub fn write(&self, index_path: &Path) -> Result<()> {
        fs::write(index_path, self.encode()).map_err(|source| UgitError::WriteError {
            path: index_path.to_path_buf(),
            source,
        })
    }

    /// Canonical serialization: sorted `<hash> <path>\n` lines (spec §4.3).
    /// `BTreeMap` keeps insertion order sorted already, so this is a fixed
    /// point: `read(write(m)) == m` and `write(read(write(m))) == write(m)`.
    #[must_use]
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (path, hash) in &self.entries {
            out.push_str(&hash::hash_to_hex(hash));
            out.push(' ');
            out.push_str(path);
            out.push('\n');
        }
        out
    }

    pub fn add(&mut self, path: impl Into<String>, hash: Hash) {
        self.entries.insert(path.into(), hash);
    }

    pub fn remove(&mut self, path: &str) -> bool {
        self.entries.remove(path).is_some()
    }

    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Hash> {
        self.entries.get(path)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn entries(&self) -> &BTreeMap<String, Hash> {
        &self.entries
    }

    #[must_use]
    pub fn into_entries(self) -> BTreeMap<String, Hash> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(byte: u8) -> Hash {
        hash::hash_bytes(&[byte])
    }

    #[test]
    fn add_replaces_existing_path() {
        let mut index = Index::default();
        index.add("a.txt", h(1));
        index.add("a.txt", h(2));
        assert_eq!(index.len(), 1);
        assert_eq!(index.find("a.txt"), Some(&h(2)));
    }

    #[test]
    fn remove_drops_entry() {
        let mut index = Index::default();
        index.add("a.txt", h(1));
        assert!(index.remove("a.txt"));
        assert!(!index.remove("a.txt"));
        assert!(index.is_empty());
    }

    #[test]
    fn roundtrip_through_disk_is_canonical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index");

        let mut index = Index::default();
        index.add("b.txt", h(2));
        index.add("a.txt", h(1));
        index.write(&path).unwrap();

        let loaded = Index::load(&path).unwrap();
        assert_eq!(loaded.entries(), index.entries());

        let encoded_once = index.encode();
        loaded.write(&path).unwrap();
        let reloaded = Index::load(&path).unwrap();
        assert_eq!(reloaded.encode(), encoded_once);
    }

    #[test]
    fn missing_index_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let index = Index::load(&dir.path().join("index")).unwrap();
        assert!(index.is_empty());
    }

    #[test]
    fn lines_are_sorted_by_path() {
        let mut index = Index::default();
        index.add("z.txt", h(1));
        index.add("a.txt", h(2));
        let encoded = index.encode();
        let lines: Vec<&str> = encoded.lines().collect();
        assert!(lines[0].ends_with("a.txt"));
        assert!(lines[1].ends_with("z.txt"));
    }
}
