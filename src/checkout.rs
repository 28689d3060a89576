//! Checkout engine (spec §4.9): materializes a commit's tree into the
//! working directory, replacing tracked files.

use std::collections::BTreeSet;
use std::fs;

use walkdir::WalkDir;

use crate::error::{Result, UgitError};
use crate::hash::Hash;
use crate::object::Tree;
use crate::refs;
use crate::repository::{Repository, METADATA_DIR};
use crate::store::{read_object, ObjectStore};

/// Whether the checkout target was named as a branch or a literal hash
/// (spec §9 Open Question: these are distinct operations, not one
/// heuristic-disambiguated input).
pub enum CheckoutTarget<'a> {
    Branch(&'a str),
    Commit(Hash),
}

/// Resolves `target` to a commit hash, then delegates to [`checkout_commit`]
/// or [`checkout_branch`] so HEAD ends up in the right state.
pub fn checkout(repo: &Repository, store: &impl ObjectStore, target: CheckoutTarget<'_>) -> Result<Hash> {
    match target {
        CheckoutTarget::Branch(name) => checkout_branch(repo, store, name),
        CheckoutTarget::Commit(hash) => checkout_commit(repo, store, hash),
    }
}

/// Checks out `branch`, leaving HEAD symbolic (spec §4.9 step 6).
pub fn checkout_branch(repo: &Repository, store: &impl ObjectStore, branch: &str) -> Result<Hash> {
    let hash = refs::read_branch(&repo.ugit_path(), branch)?
        .ok_or_else(|| UgitError::UnknownObject(branch.to_string()))?;
    materialize(repo, store, &hash)?;
    refs::set_head_symbolic(&repo.ugit_path(), branch)?;
    Ok(hash)
}

/// Checks out a literal commit hash, leaving HEAD detached (spec §4.9 step 6).
pub fn checkout_commit(repo: &Repository, store: &impl ObjectStore, hash: Hash) -> Result<Hash> {
    materialize(repo, store, &hash)?;
    refs::set_head_detached(&repo.ugit_path(), &hash)?;
    Ok(hash)
}

fn materialize(repo: &Repository, store: &impl ObjectStore, commit_hash: &Hash) -> Result<()> {
    let commit = read_object(store, commit_hash)?.into_commit()?;
    let tree = read_object(store, &commit.tree)?.into_tree()?;

    let targets = tree.into_map();

    delete_untracked_by_target(repo, &targets);
    write_targets(repo, store, &targets)?;
    remove_empty_dirs(&repo.root);

    Ok(())
}

/// Deletes working-tree files not present in the target tree (best-effort,
/// per spec §4.9 step 3 / §7 propagation policy). Never touches the
/// metadata directory.
fn delete_untracked_by_target(repo: &Repository, targets: &std::collections::BTreeMap<String, Hash>) {
    let metadata_dir = repo.root.join(METADATA_DIR);
    for entry in WalkDir::new(&repo.root)
        .into_iter()
        .filter_entry(|e| !e.path().starts_with(&metadata_dir))
        .filter_map(std::result::Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(&repo.root) else {
            continue;
        };
        let rel_str = rel.to_string_lossy().replace('\\', "/");
        if targets.contains_key(&rel_str) {
            continue;
        }
        if let Err(e) = fs::remove_file(entry.path()) {
            eprintln!("warning: failed to remove {}: {e}", entry.path().display());
        }
    }
}

fn write_targets(repo: &Repository, store: &impl ObjectStore, targets: &std::collections::BTreeMap<String, Hash>) -> Result<()> {
    for (path, hash) in targets {
        let abs = repo.root.join(path);
        if let Some(parent) = abs.parent() {
            fs::create_dir_all(parent).map_err(|source| UgitError::WriteError {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let blob = read_object(store, hash)?.into_blob()?;
        fs::write(&abs, &blob.data).map_err(|source| UgitError::WriteError {
            path: abs.clone(),
            source,
        })?;
    }
    Ok(())
}

/// Removes directories left empty after deletion, bottom-up (spec §4.9 step 5).
fn remove_empty_dirs(root: &std::path::Path) {
    let mut dirs: Vec<_> = WalkDir::new(root)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_dir() && e.path() != root)
        .map(|e| e.path().to_path_buf())
        .collect();
    // Deepest first, so a parent becomes eligible after its children are gone.
    dirs.sort_by_key(|p| std::cmp::Reverse(p.components().count()));

    let metadata_dir = root.join(METADATA_DIR);
    let mut seen = BTreeSet::new();
    for dir in dirs {
        if dir.starts_with(&metadata_dir) || seen.contains(&dir) {
            continue;
        }
        if fs::read_dir(&dir).map(|mut it| it.next().is_none()).unwrap_or(false) {
            let _ = fs::remove_dir(&dir);
            seen.insert(dir);
        }
    }
}
