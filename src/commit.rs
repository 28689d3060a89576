//! Commit engine (spec §4.6): turns the index into a tree object and appends
//! a commit object linked to the current branch tip.

use chrono::Local;

use crate::config::Config;
use crate::error::{Result, UgitError};
use crate::hash::Hash;
use crate::index::Index;
use crate::object::{Commit, Object, Tree};
use crate::refs;
use crate::repository::Repository;
use crate::store::{write_object, ObjectStore};

pub enum CommitOutcome {
    Committed { hash: Hash },
    /// Index has nothing staged. Reported as an informational message, not
    /// an error (spec §7: `EmptyIndex`).
    NothingToCommit,
}

pub fn commit(
    repo: &Repository,
    store: &mut impl ObjectStore,
    message: &str,
    author: Option<&str>,
) -> Result<CommitOutcome> {
    let author = match author {
        Some(a) => a.to_string(),
        None => Config::load(&repo.config_path())?.author_string(),
    };
    build(repo, store, message, &author, Local::now().to_rfc3339())
}

/// Builds a commit with an explicit author and timestamp, bypassing config
/// lookup and the system clock. Exposed so the checkout round-trip property
/// (spec §8: same tree/parent/author/timestamp/message yields the same hash)
/// can be exercised from outside the crate.
pub fn commit_at(
    repo: &Repository,
    store: &mut impl ObjectStore,
    message: &str,
    author: &str,
    timestamp: &str,
) -> Result<Hash> {
    match build(repo, store, message, author, timestamp.to_string())? {
        CommitOutcome::Committed { hash } => Ok(hash),
        CommitOutcome::NothingToCommit => Err(UgitError::Corrupt {
            hash: String::new(),
            reason: "nothing staged to commit".to_string(),
        }),
    }
}

fn build(
    repo: &Repository,
    store: &mut impl ObjectStore,
    message: &str,
    author: &str,
    timestamp: String,
) -> Result<CommitOutcome> {
    let message = message.trim();
    if message.is_empty() {
        return Err(UgitError::EmptyMessage);
    }

    let index = Index::load(&repo.index_path())?;
    if index.is_empty() {
        return Ok(CommitOutcome::NothingToCommit);
    }

    let tree = Tree::new(index.entries().clone());
    let tree_hash = write_object(store, &Object::Tree(tree))?;

    let parent = repo.resolve_head()?;

    let commit = Commit {
        tree: tree_hash,
        parent,
        author: author.to_string(),
        timestamp,
        message: message.to_string(),
    };

    let _span = tracing::debug_span!("commit::write", tree = %crate::hash::hash_to_hex(&tree_hash)).entered();

    let hash = write_object(store, &Object::Commit(commit))?;
    refs::advance_current_branch(&repo.ugit_path(), &hash)?;

    Ok(CommitOutcome::Committed { hash })
}
