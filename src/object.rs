//! The three object kinds (spec §3) and the framing format that gives each
//! its content hash (spec §4.1): `"<kind> <decimal-len>\0<payload>"`.

use std::collections::BTreeMap;

use crate::error::{Result, UgitError};
use crate::hash::{self, Hash};

pub const KIND_BLOB: &str = "blob";
pub const KIND_TREE: &str = "tree";
pub const KIND_COMMIT: &str = "commit";

/// Wraps `payload` in the `"<kind> <len>\0"` header that is hashed and stored.
#[must_use]
pub fn frame(kind: &str, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(kind.len() + 1 + 20 + 1 + payload.len());
    buf.extend_from_slice(kind.as_bytes());
    buf.push(b' ');
    buf.extend_from_slice(payload.len().to_string().as_bytes());
    buf.push(0);
    buf.extend_from_slice(payload);
    buf
}

/// Splits framed bytes back into `(kind, payload)`, checking the length prefix.
pub fn unframe(framed: &[u8]) -> Result<(String, Vec<u8>)> {
    let nul = framed
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| UgitError::Corrupt {
            hash: String::new(),
            reason: "missing NUL separator".to_string(),
        })?;
    let header = std::str::from_utf8(&framed[..nul]).map_err(|_| UgitError::Corrupt {
        hash: String::new(),
        reason: "header is not valid utf-8".to_string(),
    })?;
    let (kind, len_str) = header.split_once(' ').ok_or_else(|| UgitError::Corrupt {
        hash: String::new(),
        reason: "header missing space separator".to_string(),
    })?;
    let len: usize = len_str.parse().map_err(|_| UgitError::Corrupt {
        hash: String::new(),
        reason: format!("invalid length prefix {len_str:?}"),
    })?;
    let payload = &framed[nul + 1..];
    if payload.len() != len {
        return Err(UgitError::Corrupt {
            hash: String::new(),
            reason: format!("length prefix says {len}, payload is {}", payload.len()),
        });
    }
    Ok((kind.to_string(), payload.to_vec()))
}

/// Hashes `payload` as `kind` the same way the object store does, without
/// touching disk. Used by callers that need to predict a hash before writing.
#[must_use]
pub fn hash_of(kind: &str, payload: &[u8]) -> Hash {
    hash::hash_bytes(&frame(kind, payload))
}

#[derive(Debug, Clone)]
pub enum Object {
    Blob(Blob),
    Tree(Tree),
    Commit(Commit),
}

impl Object {
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Object::Blob(_) => KIND_BLOB,
            Object::Tree(_) => KIND_TREE,
            Object::Commit(_) => KIND_COMMIT,
        }
    }

    #[must_use]
    pub fn payload(&self) -> Vec<u8> {
        match self {
            Object::Blob(b) => b.data.clone(),
            Object::Tree(t) => t.encode(),
            Object::Commit(c) => c.encode(),
        }
    }

    pub fn decode(kind: &str, payload: Vec<u8>) -> Result<Self> {
        match kind {
            KIND_BLOB => Ok(Object::Blob(Blob { data: payload })),
            KIND_TREE => Ok(Object::Tree(Tree::decode(&payload)?)),
            KIND_COMMIT => Ok(Object::Commit(Commit::decode(&payload)?)),
            other => Err(UgitError::BadKind {
                expected: "blob|tree|commit",
                found: other.to_string(),
            }),
        }
    }

    pub fn into_blob(self) -> Result<Blob> {
        match self {
            Object::Blob(b) => Ok(b),
            other => Err(UgitError::BadKind {
                expected: KIND_BLOB,
                found: other.kind().to_string(),
            }),
        }
    }

    pub fn into_tree(self) -> Result<Tree> {
        match self {
            Object::Tree(t) => Ok(t),
            other => Err(UgitError::BadKind {
                expected: KIND_TREE,
                found: other.kind().to_string(),
            }),
        }
    }

    pub fn into_commit(self) -> Result<Commit> {
        match self {
            Object::Commit(c) => Ok(c),
            other => Err(UgitError::BadKind {
                expected: KIND_COMMIT,
                found: other.kind().to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Blob {
    pub data: Vec<u8>,
}

/// Flat mapping of repository-relative path to blob hash (spec §3, §9: no
/// nested tree objects). Entries are always kept sorted ascending by path.
#[derive(Debug, Clone, Default)]
pub struct Tree {
    entries: Vec<(String, Hash)>,
}

impl Tree {
    #[must_use]
    pub fn new(map: BTreeMap<String, Hash>) -> Self {
        Tree {
            entries: map.into_iter().collect(),
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[(String, Hash)] {
        &self.entries
    }

    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Hash> {
        self.entries
            .binary_search_by(|(p, _)| p.as_str().cmp(path))
            .ok()
            .map(|i| &self.entries[i].1)
    }

    #[must_use]
    pub fn into_map(self) -> BTreeMap<String, Hash> {
        self.entries.into_iter().collect()
    }

    /// Canonical line-based serialization: `<hash> <path>\n`, sorted by path,
    /// same shape as the staging index (spec §9 leaves tree serialization
    /// implementation-defined as long as it is deterministic).
    fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for (path, h) in &self.entries {
            out.extend_from_slice(hash::hash_to_hex(h).as_bytes());
            out.push(b' ');
            out.extend_from_slice(path.as_bytes());
            out.push(b'\n');
        }
        out
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|_| UgitError::Corrupt {
            hash: String::new(),
            reason: "tree payload is not valid utf-8".to_string(),
        })?;
        let mut entries = Vec::new();
        for line in text.lines() {
            let (hash_str, path) = line.split_once(' ').ok_or_else(|| UgitError::Corrupt {
                hash: String::new(),
                reason: format!("malformed tree line {line:?}"),
            })?;
            let h = hash::hex_to_hash(hash_str)?;
            entries.push((path.to_string(), h));
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(Tree { entries })
    }
}

/// Points at one tree and at most one parent commit (spec §3: merges are a
/// Non-goal, so only a single optional parent is modeled).
#[derive(Debug, Clone)]
pub struct Commit {
    pub tree: Hash,
    pub parent: Option<Hash>,
    pub author: String,
    pub timestamp: String,
    pub message: String,
}

impl Commit {
    fn encode(&self) -> Vec<u8> {
        let mut out = String::new();
        out.push_str(&format!("tree {}\n", hash::hash_to_hex(&self.tree)));
        if let Some(parent) = &self.parent {
            out.push_str(&format!("parent {}\n", hash::hash_to_hex(parent)));
        }
        out.push_str(&format!("author {}\n", self.author));
        out.push_str(&format!("timestamp {}\n", self.timestamp));
        out.push('\n');
        out.push_str(&self.message);
        out.into_bytes()
    }

    fn decode(bytes: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(bytes).map_err(|_| UgitError::Corrupt {
            hash: String::new(),
            reason: "commit payload is not valid utf-8".to_string(),
        })?;
        let (header, message) = text.split_once("\n\n").ok_or_else(|| UgitError::Corrupt {
            hash: String::new(),
            reason: "commit missing header/message separator".to_string(),
        })?;

        let mut tree = None;
        let mut parent = None;
        let mut author = None;
        let mut timestamp = None;

        for line in header.lines() {
            let (key, value) = line.split_once(' ').ok_or_else(|| UgitError::Corrupt {
                hash: String::new(),
                reason: format!("malformed commit header line {line:?}"),
            })?;
            match key {
                "tree" => tree = Some(hash::hex_to_hash(value)?),
                "parent" => parent = Some(hash::hex_to_hash(value)?),
                "author" => author = Some(value.to_string()),
                "timestamp" => timestamp = Some(value.to_string()),
                other => {
                    return Err(UgitError::Corrupt {
                        hash: String::new(),
                        reason: format!("unknown commit header field {other:?}"),
                    })
                }
            }
        }

        Ok(Commit {
            tree: tree.ok_or_else(|| UgitError::Corrupt {
                hash: String::new(),
                reason: "commit missing tree field".to_string(),
            })?,
            parent,
            author: author.unwrap_or_default(),
            timestamp: timestamp.unwrap_or_default(),
            message: message.to_string(),
        })
    }
}
