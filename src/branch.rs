//! Branch primitives (SPEC_FULL.md §B): create and list named branches on
//! top of the reference store's read/write primitives. Deletion, rename,
//! and reachability-safety checks are teacher-specific extras with no
//! grounding in this system and are not implemented here.

use crate::error::{Result, UgitError};
use crate::hash::{short_hex, Hash};
use crate::refs;
use crate::repository::Repository;

pub struct BranchInfo {
    pub name: String,
    pub hash: Option<Hash>,
    pub is_current: bool,
}

/// Creates `name` at `target_hash`, refusing to overwrite an existing branch.
pub fn create(repo: &Repository, name: &str, target_hash: Hash) -> Result<()> {
    refs::validate_branch_name(name)?;

    if refs::read_branch(&repo.ugit_path(), name)?.is_some() {
        return Err(UgitError::Corrupt {
            hash: name.to_string(),
            reason: "branch already exists".to_string(),
        });
    }

    refs::write_branch(&repo.ugit_path(), name, &target_hash)?;
    println!("created branch '{name}' at {}", short_hex(&target_hash));
    Ok(())
}

/// Lists all branches in sorted order, with their tip hash, marking the
/// branch HEAD currently points to.
pub fn list(repo: &Repository) -> Result<Vec<BranchInfo>> {
    let current = repo.current_branch()?;
    let names = refs::list_branches(&repo.ugit_path())?;

    names
        .into_iter()
        .map(|name| {
            let hash = refs::read_branch(&repo.ugit_path(), &name)?;
            let is_current = current.as_deref() == Some(name.as_str());
            Ok(BranchInfo {
                name,
                hash,
                is_current,
            })
        })
        .collect()
}

pub fn read(repo: &Repository, name: &str) -> Result<Option<Hash>> {
    refs::read_branch(&repo.ugit_path(), name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::hash_bytes;

    fn init_repo() -> (tempfile::TempDir, Repository) {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::init(dir.path()).unwrap();
        (dir, repo)
    }

    #[test]
    fn create_then_read() {
        let (_dir, repo) = init_repo();
        let hash = hash_bytes(b"a commit");
        create(&repo, "feature", hash).unwrap();
        assert_eq!(read(&repo, "feature").unwrap(), Some(hash));
    }

    #[test]
    fn create_rejects_duplicate() {
        let (_dir, repo) = init_repo();
        let hash = hash_bytes(b"a commit");
        create(&repo, "feature", hash).unwrap();
        assert!(create(&repo, "feature", hash).is_err());
    }

    #[test]
    fn create_rejects_invalid_name() {
        let (_dir, repo) = init_repo();
        let hash = hash_bytes(b"a commit");
        assert!(create(&repo, "has/slash", hash).is_err());
    }

    #[test]
    fn list_marks_current_branch() {
        let (_dir, repo) = init_repo();
        let hash = hash_bytes(b"a commit");
        refs::write_branch(&repo.ugit_path(), "main", &hash).unwrap();
        create(&repo, "feature", hash).unwrap();

        let branches = list(&repo).unwrap();
        let names: Vec<_> = branches.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["feature", "main"]);
        assert!(branches.iter().find(|b| b.name == "main").unwrap().is_current);
        assert!(!branches.iter().find(|b| b.name == "feature").unwrap().is_current);
    }
}
