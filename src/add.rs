//! Add engine (spec §4.5): stage files into the index, writing blobs as it goes.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{Result, UgitError};
use crate::hash::{short_hex, Hash};
use crate::index::Index;
use crate::object::KIND_BLOB;
use crate::repository::{Repository, METADATA_DIR};
use crate::store::ObjectStore;

/// One staged path and the hash it now maps to.
pub struct Staged {
    pub path: String,
    pub hash: Hash,
}

/// Result of an `add` call: what got staged, and any per-path failures that
/// did not abort the batch (spec §7 propagation policy).
#[derive(Default)]
pub struct AddReport {
    pub staged: Vec<Staged>,
    pub errors: Vec<(PathBuf, UgitError)>,
}

/// Stages `paths` (files or directories) into the index. Missing paths and
/// per-file I/O failures are collected in the report rather than aborting.
pub fn add(repo: &Repository, store: &mut impl ObjectStore, paths: &[PathBuf]) -> Result<AddReport> {
    let mut index = Index::load(&repo.index_path())?;
    let mut report = AddReport::default();

    let default = vec![PathBuf::from(".")];
    let paths = if paths.is_empty() { &default } else { paths };

    for input in paths {
        let full = if input.is_absolute() {
            input.clone()
        } else {
            repo.root.join(input)
        };

        if !full.exists() {
            report
                .errors
                .push((input.clone(), UgitError::PathNotFound(input.clone())));
            continue;
        }

        let full = match full.canonicalize() {
            Ok(p) => p,
            Err(source) => {
                report.errors.push((
                    input.clone(),
                    UgitError::ReadError {
                        path: input.clone(),
                        source,
                    },
                ));
                continue;
            }
        };

        if full.is_file() {
            stage_file(repo, store, &mut index, &full, &mut report);
            continue;
        }

        for entry in WalkDir::new(&full)
            .into_iter()
            .filter_entry(|e| !e.path().starts_with(repo.root.join(METADATA_DIR)))
            .filter_map(std::result::Result::ok)
        {
            if !entry.file_type().is_file() {
                continue;
            }
            if repo.ignore.is_ignored_abs(entry.path()) {
                continue;
            }
            stage_file(repo, store, &mut index, entry.path(), &mut report);
        }
    }

    index.write(&repo.index_path())?;

    for s in &report.staged {
        println!("staged {} ({})", s.path, short_hex(&s.hash));
    }

    Ok(report)
}

fn stage_file(
    repo: &Repository,
    store: &mut impl ObjectStore,
    index: &mut Index,
    abs_path: &Path,
    report: &mut AddReport,
) {
    let Ok(rel) = abs_path.strip_prefix(&repo.root) else {
        return;
    };
    let rel_str = rel.to_string_lossy().replace('\\', "/");

    if repo.ignore.is_ignored_rel(&rel_str) {
        return;
    }

    let data = match fs::read(abs_path) {
        Ok(d) => d,
        Err(source) => {
            report.errors.push((
                abs_path.to_path_buf(),
                UgitError::ReadError {
                    path: abs_path.to_path_buf(),
                    source,
                },
            ));
            return;
        }
    };

    let _span = tracing::debug_span!("add::stage_file", path = %rel_str).entered();

    let hash = match store.put(KIND_BLOB, &data) {
        Ok(h) => h,
        Err(e) => {
            report.errors.push((abs_path.to_path_buf(), e));
            return;
        }
    };

    index.add(rel_str.clone(), hash);
    report.staged.push(Staged {
        path: rel_str,
        hash,
    });
}
