//! Reference Store (spec §4.2): HEAD and branch tips.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, UgitError};
use crate::hash::{self, Hash};

pub const DEFAULT_BRANCH: &str = "main";

/// HEAD's three possible states (spec §9: a tagged variant, not a raw
/// string, so callers cannot conflate "branch file missing" with "HEAD
/// malformed").
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    /// HEAD points at a branch name; that branch may or may not have a tip yet.
    Symbolic(String),
    /// HEAD points directly at a commit hash.
    Detached(Hash),
    /// HEAD file is absent, or symbolic but the branch it names has no tip yet.
    Unborn,
}

fn heads_dir(ugit_dir: &Path) -> PathBuf {
    ugit_dir.join("refs").join("heads")
}

fn branch_path(ugit_dir: &Path, name: &str) -> PathBuf {
    heads_dir(ugit_dir).join(name)
}

fn head_path(ugit_dir: &Path) -> PathBuf {
    ugit_dir.join("HEAD")
}

/// Reads `.ugit/HEAD` and classifies it without following the indirection.
pub fn read_head(ugit_dir: &Path) -> Result<HeadState> {
    let path = head_path(ugit_dir);
    let raw = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HeadState::Unborn),
        Err(source) => return Err(UgitError::ReadError { path, source }),
    };
    let raw = raw.trim();

    if let Some(refname) = raw.strip_prefix("ref: ") {
        let branch = refname
            .trim()
            .strip_prefix("refs/heads/")
            .unwrap_or(refname.trim())
            .to_string();
        return Ok(HeadState::Symbolic(branch));
    }

    hash::hex_to_hash(raw).map(HeadState::Detached)
}

/// Follows HEAD's indirection (if any) to a commit hash, or `None` if unborn
/// or the named branch has no tip yet.
pub fn resolve_head(ugit_dir: &Path) -> Result<Option<Hash>> {
    match read_head(ugit_dir)? {
        HeadState::Detached(hash) => Ok(Some(hash)),
        HeadState::Unborn => Ok(None),
        HeadState::Symbolic(branch) => read_branch(ugit_dir, &branch),
    }
}

pub fn read_branch(ugit_dir: &Path, name: &str) -> Result<Option<Hash>> {
    let path = branch_path(ugit_dir, name);
    match fs::read_to_string(&path) {
        Ok(content) => hash::hex_to_hash(content.trim()).map(Some),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(UgitError::ReadError { path, source }),
    }
}

pub fn write_branch(ugit_dir: &Path, name: &str, hash: &Hash) -> Result<()> {
    let dir = heads_dir(ugit_dir);
    fs::create_dir_all(&dir).map_err(|source| UgitError::WriteError {
        path: dir.clone(),
        source,
    })?;
    let path = branch_path(ugit_dir, name);
    fs::write(&path, format!("{}\n", hash::hash_to_hex(hash))).map_err(|source| {
        UgitError::WriteError {
            path: path.clone(),
            source,
        }
    })
}

pub fn list_branches(ugit_dir: &Path) -> Result<Vec<String>> {
    let dir = heads_dir(ugit_dir);
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut names: Vec<String> = fs::read_dir(&dir)
        .map_err(|source| UgitError::ReadError {
            path: dir.clone(),
            source,
        })?
        .filter_map(std::result::Result::ok)
        .filter_map(|entry| entry.file_name().into_string().ok())
        .collect();
    names.sort();
    Ok(names)
}

/// Points HEAD at a branch name (symbolic).
pub fn set_head_symbolic(ugit_dir: &Path, branch: &str) -> Result<()> {
    let path = head_path(ugit_dir);
    fs::write(&path, format!("ref: refs/heads/{branch}\n")).map_err(|source| {
        UgitError::WriteError {
            path: path.clone(),
            source,
        }
    })
}

/// Points HEAD directly at a commit hash (detached).
pub fn set_head_detached(ugit_dir: &Path, hash: &Hash) -> Result<()> {
    let path = head_path(ugit_dir);
    fs::write(&path, format!("{}\n", hash::hash_to_hex(hash))).map_err(|source| {
        UgitError::WriteError {
            path: path.clone(),
            source,
        }
    })
}

/// Advances the tip of whichever branch HEAD currently names. Only valid
/// when HEAD is symbolic; detached HEAD commits are not modeled (no CLI verb
/// exposes committing while detached, matching the spec's verb list).
pub fn advance_current_branch(ugit_dir: &Path, hash: &Hash) -> Result<()> {
    match read_head(ugit_dir)? {
        HeadState::Symbolic(branch) => write_branch(ugit_dir, &branch, hash),
        HeadState::Unborn => write_branch(ugit_dir, DEFAULT_BRANCH, hash),
        HeadState::Detached(_) => write_branch(ugit_dir, DEFAULT_BRANCH, hash),
    }
}

pub fn validate_branch_name(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        Some("branch name cannot be empty".to_string())
    } else if name.contains('/') {
        Some("branch name cannot contain '/'".to_string())
    } else if name.chars().any(char::is_whitespace) {
        Some("branch name cannot contain whitespace".to_string())
    } else if name == "HEAD" {
        Some("'HEAD' is not a valid branch name".to_string())
    } else {
        None
    };

    match reason {
        Some(reason) => Err(UgitError::Corrupt {
            hash: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unborn_head_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(read_head(dir.path()).unwrap(), HeadState::Unborn);
        assert_eq!(resolve_head(dir.path()).unwrap(), None);
    }

    #[test]
    fn symbolic_head_resolves_through_branch() {
        let dir = tempfile::tempdir().unwrap();
        set_head_symbolic(dir.path(), "main").unwrap();
        assert_eq!(
            read_head(dir.path()).unwrap(),
            HeadState::Symbolic("main".to_string())
        );
        assert_eq!(resolve_head(dir.path()).unwrap(), None);

        let hash = hash::hash_bytes(b"a commit");
        write_branch(dir.path(), "main", &hash).unwrap();
        assert_eq!(resolve_head(dir.path()).unwrap(), Some(hash));
    }

    #[test]
    fn detached_head_resolves_directly() {
        let dir = tempfile::tempdir().unwrap();
        let hash = hash::hash_bytes(b"detached commit");
        set_head_detached(dir.path(), &hash).unwrap();
        assert_eq!(read_head(dir.path()).unwrap(), HeadState::Detached(hash));
        assert_eq!(resolve_head(dir.path()).unwrap(), Some(hash));
    }

    #[test]
    fn branch_name_validation() {
        assert!(validate_branch_name("feature/x").is_err());
        assert!(validate_branch_name("").is_err());
        assert!(validate_branch_name("HEAD").is_err());
        assert!(validate_branch_name("topic").is_ok());
    }

    #[test]
    fn list_branches_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let hash = hash::hash_bytes(b"c");
        write_branch(dir.path(), "zeta", &hash).unwrap();
        write_branch(dir.path(), "alpha", &hash).unwrap();
        assert_eq!(list_branches(dir.path()).unwrap(), vec!["alpha", "zeta"]);
    }
}
