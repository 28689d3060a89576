//! Status / diff engine (spec §4.8): three-way comparison of HEAD tree,
//! index, and working tree, computed in a single pass over each map.

use std::collections::BTreeSet;
use std::fs;

use walkdir::WalkDir;

use crate::error::{Result, UgitError};
use crate::hash::hash_of;
use crate::index::Index;
use crate::object::KIND_BLOB;
use crate::repository::{Repository, METADATA_DIR};
use crate::store::{read_object, ObjectStore};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub path: String,
    pub marker: char,
}

#[derive(Debug, Default)]
pub struct StatusReport {
    /// "Changes to be committed": staged-added ('A'), staged-modified ('M'),
    /// staged-deleted ('D').
    pub staged: Vec<StatusEntry>,
    /// "Changes not staged for commit": tracked files whose disk content no
    /// longer matches the index.
    pub unstaged_modified: Vec<String>,
    /// "Deleted": tracked files missing from disk.
    pub deleted: Vec<String>,
    /// "Untracked files".
    pub untracked: Vec<String>,
}

impl StatusReport {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.staged.is_empty()
            && self.unstaged_modified.is_empty()
            && self.deleted.is_empty()
            && self.untracked.is_empty()
    }
}

pub fn status(repo: &Repository, store: &impl ObjectStore) -> Result<StatusReport> {
    let head_tree = match repo.resolve_head()? {
        Some(commit_hash) => {
            let commit = read_object(store, &commit_hash)?.into_commit()?;
            read_object(store, &commit.tree)?.into_tree()?.into_map()
        }
        None => Default::default(),
    };

    let index = Index::load(&repo.index_path())?;
    let index_entries = index.entries();

    // Single walk of the working tree; its result is reused both for the
    // untracked list and for presence checks below (spec §9: compute the
    // three maps once).
    let mut disk_paths = BTreeSet::new();
    for entry in WalkDir::new(&repo.root)
        .into_iter()
        .filter_entry(|e| !e.path().starts_with(repo.root.join(METADATA_DIR)))
        .filter_map(std::result::Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(&repo.root) else {
            continue;
        };
        let rel_str = rel.to_string_lossy().replace('\\', "/");
        if rel_str.is_empty() || repo.ignore.is_ignored_rel(&rel_str) {
            continue;
        }
        disk_paths.insert(rel_str);
    }

    let mut report = StatusReport::default();

    for (path, index_hash) in index_entries {
        match head_tree.get(path) {
            None => report.staged.push(StatusEntry {
                path: path.clone(),
                marker: 'A',
            }),
            Some(head_hash) if head_hash != index_hash => report.staged.push(StatusEntry {
                path: path.clone(),
                marker: 'M',
            }),
            Some(_) => {}
        }

        if !disk_paths.contains(path) {
            report.deleted.push(path.clone());
            continue;
        }

        let abs = repo.root.join(path);
        let bytes = fs::read(&abs).map_err(|source| UgitError::ReadError {
            path: abs.clone(),
            source,
        })?;
        if hash_of(KIND_BLOB, &bytes) != *index_hash {
            report.unstaged_modified.push(path.clone());
        }
    }

    for path in head_tree.keys() {
        if !index_entries.contains_key(path) {
            report.staged.push(StatusEntry {
                path: path.clone(),
                marker: 'D',
            });
        }
    }

    for path in &disk_paths {
        if !index_entries.contains_key(path) {
            report.untracked.push(path.clone());
        }
    }

    report.staged.sort_by(|a, b| a.path.cmp(&b.path));
    report.unstaged_modified.sort();
    report.deleted.sort();
    report.untracked.sort();

    Ok(report)
}

fn stdout_is_tty() -> bool {
    use std::io::IsTerminal;
    std::io::stdout().is_terminal()
}

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn section_header(out: &mut (impl std::io::Write + ?Sized), title: &str) -> std::io::Result<()> {
    if stdout_is_tty() {
        writeln!(out, "  {BOLD}{title}{RESET}")
    } else {
        writeln!(out, "  {title}")
    }
}

fn path_line(out: &mut (impl std::io::Write + ?Sized), color: &str, marker: &str, path: &str) -> std::io::Result<()> {
    if stdout_is_tty() {
        writeln!(out, "    {color}{marker}{path}{RESET}")
    } else {
        writeln!(out, "    {marker}{path}")
    }
}

pub fn print_status(report: &StatusReport, out: &mut (impl std::io::Write + ?Sized)) -> std::io::Result<()> {
    if report.is_clean() {
        writeln!(out, "Nothing to commit, working tree clean")?;
        return Ok(());
    }

    if !report.staged.is_empty() {
        section_header(out, "Changes to be committed:")?;
        for entry in &report.staged {
            let color = if entry.marker == 'D' { RED } else { GREEN };
            path_line(out, color, &format!("{} ", entry.marker), &entry.path)?;
        }
        writeln!(out)?;
    }

    if !report.unstaged_modified.is_empty() {
        section_header(out, "Changes not staged for commit:")?;
        for path in &report.unstaged_modified {
            path_line(out, YELLOW, "M ", path)?;
        }
        writeln!(out)?;
    }

    if !report.deleted.is_empty() {
        section_header(out, "Deleted:")?;
        for path in &report.deleted {
            path_line(out, RED, "D ", path)?;
        }
        writeln!(out)?;
    }

    if !report.untracked.is_empty() {
        section_header(out, "Untracked files:")?;
        for path in &report.untracked {
            path_line(out, "", "? ", path)?;
        }
        writeln!(out)?;
    }

    Ok(())
}
